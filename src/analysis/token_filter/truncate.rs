//! Truncate filter implementation.

use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::Filter;
use crate::error::Result;

/// A filter that truncates every token to at most `max_chars` characters.
///
/// Completion fields use it to bound the depth of the suggestion trie.
#[derive(Clone, Debug)]
pub struct TruncateFilter {
    max_chars: usize,
}

impl TruncateFilter {
    /// Create a new truncate filter.
    pub fn new(max_chars: usize) -> Self {
        TruncateFilter { max_chars }
    }

    /// Get the configured character limit.
    pub fn max_chars(&self) -> usize {
        self.max_chars
    }
}

impl Filter for TruncateFilter {
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream> {
        let max_chars = self.max_chars;
        Ok(Box::new(tokens.map(move |token| {
            match token.text.char_indices().nth(max_chars) {
                Some((cut, _)) => {
                    let text = token.text[..cut].to_string();
                    token.with_text(text)
                }
                None => token,
            }
        })))
    }

    fn name(&self) -> &'static str {
        "truncate"
    }
}
