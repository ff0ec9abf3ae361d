//! Analyzer implementations that combine tokenizers and filters.
//!
//! Analyzers are referred to by name in a collection mapping. [`by_name`]
//! resolves those names:
//!
//! | name         | pipeline                                   |
//! |--------------|--------------------------------------------|
//! | `standard`   | Unicode words, lowercased                  |
//! | `whitespace` | whitespace split, case preserved           |
//! | `lowercase`  | whitespace split, lowercased               |
//! | `keyword`    | whole value, case preserved                |
//! | `completion` | whole value, lowercased, truncated         |

use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::completion::CompletionAnalyzer;
use crate::analysis::analyzer::keyword::KeywordAnalyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::analyzer::standard::StandardAnalyzer;
use crate::analysis::token_filter::lowercase::LowercaseFilter;
use crate::analysis::tokenizer::whitespace::WhitespaceTokenizer;
use crate::error::{PilumError, Result};

#[allow(clippy::module_inception)]
pub mod analyzer;
pub mod completion;
pub mod keyword;
pub mod pipeline;
pub mod standard;

/// Resolve a built-in analyzer by name.
pub fn by_name(name: &str) -> Result<Arc<dyn Analyzer>> {
    let analyzer: Arc<dyn Analyzer> = match name {
        "standard" => Arc::new(StandardAnalyzer::new()),
        "whitespace" => Arc::new(
            PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new())).with_name("whitespace"),
        ),
        "lowercase" => Arc::new(
            PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
                .add_filter(Arc::new(LowercaseFilter::new()))
                .with_name("lowercase"),
        ),
        "keyword" => Arc::new(KeywordAnalyzer::new()),
        "completion" => Arc::new(CompletionAnalyzer::default()),
        other => {
            return Err(PilumError::schema(format!("Unknown analyzer: {other}")));
        }
    };
    Ok(analyzer)
}

/// Run `analyzer` over `text` and collect the token texts.
pub fn analyze_terms(analyzer: &dyn Analyzer, text: &str) -> Result<Vec<String>> {
    Ok(analyzer
        .analyze(text)?
        .filter(|token| !token.is_empty())
        .map(|token| token.text)
        .collect())
}
