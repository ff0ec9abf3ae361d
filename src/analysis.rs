//! Text analysis for Pilum.
//!
//! Text fields and completion fields run their values through an
//! [`Analyzer`](analyzer::analyzer::Analyzer) before they reach the inverted
//! index or the completion trie. An analyzer is a tokenizer followed by a
//! chain of token filters.

pub mod analyzer;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
