//! Collections: buffered writes, refresh and snapshot-based reads.
//!
//! ```text
//! put / delete ──► PendingBuffer ──refresh──► Snapshot (generation n+1)
//!                                                 │
//! term query / suggest / get ◄────────────────────┘
//! ```
//!
//! Writes land in a [`PendingBuffer`](buffer::PendingBuffer). A refresh, either
//! explicit or from the background [`Refresher`](refresh::Refresher), drains
//! the buffer and publishes a new immutable [`Snapshot`](snapshot::Snapshot).
//! Readers only ever see published snapshots.

pub mod buffer;
#[allow(clippy::module_inception)]
pub mod collection;
pub mod refresh;
pub mod snapshot;

pub use collection::{Collection, CollectionState, CollectionStats};
