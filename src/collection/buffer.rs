//! Pending write buffer.

use std::mem;

use crate::document::document::Document;

/// A buffered write.
#[derive(Clone, Debug, PartialEq)]
pub enum Operation {
    /// Index a document, replacing any previous version with the same id.
    Upsert { id: String, document: Document },
    /// Remove a document.
    Delete { id: String },
}

impl Operation {
    /// The id of the document the operation applies to.
    pub fn id(&self) -> &str {
        match self {
            Operation::Upsert { id, .. } | Operation::Delete { id } => id,
        }
    }
}

/// An operation tagged with its sequence number.
#[derive(Clone, Debug, PartialEq)]
pub struct PendingOp {
    pub seq: u64,
    pub op: Operation,
}

/// Writes accepted since the last refresh, in sequence order.
#[derive(Debug, Default)]
pub struct PendingBuffer {
    ops: Vec<PendingOp>,
}

impl PendingBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an operation.
    pub fn push(&mut self, seq: u64, op: Operation) {
        self.ops.push(PendingOp { seq, op });
    }

    /// Number of buffered operations.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Check if nothing is buffered.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Drain the buffer, leaving a fresh one behind.
    pub fn take(&mut self) -> Vec<PendingOp> {
        mem::take(&mut self.ops)
    }

    /// Put drained operations back ahead of anything written since.
    pub fn requeue_front(&mut self, mut ops: Vec<PendingOp>) {
        ops.append(&mut self.ops);
        self.ops = ops;
    }
}
