//! Token filter implementations for token transformation.
//!
//! - [`lowercase::LowercaseFilter`] - Converts tokens to lowercase
//! - [`truncate::TruncateFilter`] - Caps the length of each token
//!
//! Filters are chained after a tokenizer inside a
//! [`PipelineAnalyzer`](crate::analysis::analyzer::pipeline::PipelineAnalyzer):
//!
//! ```text
//! Tokenizer → Lowercase → Truncate → Index
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod truncate;
