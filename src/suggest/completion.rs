//! Completion suggest requests and results.

use serde::{Deserialize, Serialize};

use crate::collection::snapshot::Snapshot;
use crate::document::parser::PrefixKey;
use crate::error::Result;
use crate::schema::SchemaField;

/// Default number of suggestions returned.
pub const DEFAULT_SIZE: usize = 5;

/// A prefix lookup against a completion field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionSuggest {
    /// The completion field to suggest from.
    pub field: String,
    /// The prefix typed so far. It is analyzed with the field's analyzer.
    pub prefix: String,
    /// Maximum number of distinct suggestions.
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_size() -> usize {
    DEFAULT_SIZE
}

impl CompletionSuggest {
    /// Create a new suggest request with the default size.
    pub fn new<F, P>(field: F, prefix: P) -> Self
    where
        F: Into<String>,
        P: Into<String>,
    {
        CompletionSuggest {
            field: field.into(),
            prefix: prefix.into(),
            size: DEFAULT_SIZE,
        }
    }

    /// Set the maximum number of suggestions.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Look up an analyzed prefix in a snapshot.
    ///
    /// When the prefix was longer than the field's input cap, the trie is
    /// walked with the cut key and each entry is checked against the full
    /// prefix.
    pub fn execute(
        &self,
        snapshot: &Snapshot,
        field: &SchemaField,
        prefix: &PrefixKey,
    ) -> Result<SuggestResults> {
        let mut options = Vec::new();

        if let Some(trie) = snapshot.completion(&self.field) {
            let limit = match prefix.full {
                Some(_) => usize::MAX,
                None => self.size,
            };
            for entry in trie.prefix_search(&prefix.key, limit) {
                if options.len() == self.size {
                    break;
                }
                if !prefix.matches(field, &entry.text)? {
                    continue;
                }
                options.push(SuggestOption {
                    text: entry.text.clone(),
                    doc_id: entry.doc_id.clone(),
                    score: entry.weight,
                });
            }
        }

        Ok(SuggestResults {
            generation: snapshot.generation(),
            options,
        })
    }
}

/// One suggestion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestOption {
    /// The suggested text, as it was written.
    pub text: String,
    /// The document the suggestion came from.
    pub doc_id: String,
    /// The input's weight.
    pub score: u32,
}

/// Ranked suggestions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestResults {
    /// Generation of the snapshot that served the request.
    pub generation: u64,
    /// Suggestions, best first.
    pub options: Vec<SuggestOption>,
}

impl SuggestResults {
    /// The suggestion texts, best first.
    pub fn texts(&self) -> Vec<String> {
        self.options.iter().map(|option| option.text.clone()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::collection::buffer::{Operation, PendingOp};
    use crate::document::document::Document;
    use crate::document::parser::{DocumentParser, prefix_key};
    use crate::schema::{Mapping, Schema};

    #[test]
    fn test_execute_reports_weight_as_score() {
        let mapping = Mapping::builder().completion("name_suggest").build();
        let parser = DocumentParser::new("brands", Arc::new(Schema::compile(&mapping).unwrap()));
        let ops = vec![
            PendingOp {
                seq: 0,
                op: Operation::Upsert {
                    id: "1".to_string(),
                    document: Document::builder()
                        .add_weighted_completion("name_suggest", ["Advil"], 2)
                        .build(),
                },
            },
            PendingOp {
                seq: 1,
                op: Operation::Upsert {
                    id: "2".to_string(),
                    document: Document::builder()
                        .add_weighted_completion("name_suggest", ["Adderall"], 7)
                        .build(),
                },
            },
        ];
        let snapshot = Snapshot::empty().apply(&ops, &parser).unwrap();

        let field = parser.schema().field("name_suggest").unwrap();
        let prefix = prefix_key(field, "ad").unwrap();

        let results = CompletionSuggest::new("name_suggest", "ad")
            .execute(&snapshot, field, &prefix)
            .unwrap();
        assert_eq!(results.texts(), vec!["Adderall", "Advil"]);
        assert_eq!(results.options[0].doc_id, "2");
        assert_eq!(results.options[0].score, 7);

        let results = CompletionSuggest::new("missing", "ad")
            .execute(&snapshot, field, &prefix)
            .unwrap();
        assert!(results.options.is_empty());
    }
}
