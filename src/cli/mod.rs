//! Command line interface for Pilum.
//!
//! Every command loads a mapping and a JSONL file of documents into an
//! in-memory engine, refreshes once, and runs a single read against it.

pub mod args;
pub mod commands;
pub mod output;

// Re-export commonly used types
pub use args::*;
pub use commands::*;
pub use output::*;
