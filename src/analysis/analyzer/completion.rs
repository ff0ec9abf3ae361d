//! Completion analyzer used for suggestion inputs and prefixes.
//!
//! The whole input becomes one token, lowercased and cut to
//! `max_input_length` characters. Prefixes go through the same pipeline at
//! suggest time, so `"AD"` matches an input of `"Advil"`. A prefix is also
//! analyzed without the cap so that the part past the cap can still be
//! compared against the full input.

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::token::TokenStream;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::token_filter::truncate::TruncateFilter;
use crate::analysis::tokenizer::whole::WholeTokenizer;
use crate::error::Result;

/// Default cap on the indexed length of a completion input.
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 50;

/// Analyzer for completion fields.
pub struct CompletionAnalyzer {
    inner: PipelineAnalyzer,
    max_input_length: usize,
}

impl CompletionAnalyzer {
    /// Create a completion analyzer with the given input length cap.
    pub fn new(max_input_length: usize) -> Self {
        let inner = Self::untruncated()
            .add_filter(Arc::new(TruncateFilter::new(max_input_length)))
            .with_name("completion");

        CompletionAnalyzer {
            inner,
            max_input_length,
        }
    }

    /// The completion pipeline without the length cap.
    pub fn untruncated() -> PipelineAnalyzer {
        PipelineAnalyzer::new(Arc::new(WholeTokenizer::new()))
            .add_filter(Arc::new(LowercaseFilter::new()))
            .with_name("completion_untruncated")
    }

    /// Get the input length cap.
    pub fn max_input_length(&self) -> usize {
        self.max_input_length
    }
}

impl Default for CompletionAnalyzer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_INPUT_LENGTH)
    }
}

impl Analyzer for CompletionAnalyzer {
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        self.inner.analyze(text)
    }

    fn name(&self) -> &str {
        "completion"
    }
}

impl std::fmt::Debug for CompletionAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompletionAnalyzer")
            .field("max_input_length", &self.max_input_length)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_completion_analyzer() {
        let analyzer = CompletionAnalyzer::default();
        let tokens: Vec<Token> = analyzer.analyze("Advil Liqui-Gels").unwrap().collect();

        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "advil liqui-gels");
    }

    #[test]
    fn test_completion_analyzer_truncates() {
        let analyzer = CompletionAnalyzer::new(5);
        let tokens: Vec<Token> = analyzer.analyze("Tylenol PM").unwrap().collect();

        assert_eq!(tokens[0].text, "tylen");
        assert_eq!(analyzer.max_input_length(), 5);
    }

    #[test]
    fn test_untruncated_keeps_full_value() {
        let analyzer = CompletionAnalyzer::untruncated();
        let tokens: Vec<Token> = analyzer.analyze("Tylenol PM").unwrap().collect();

        assert_eq!(tokens[0].text, "tylenol pm");
    }
}
