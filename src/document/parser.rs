//! Document parser for validating and analyzing documents.
//!
//! [`DocumentParser`] sits between the caller and the refresh path:
//!
//! ```text
//! put:     Document → DocumentParser::validate → PendingBuffer
//! refresh: Document → DocumentParser::parse    → AnalyzedDocument → Inverted Index / Completion Trie
//! ```
//!
//! Validation is cheap and runs on the write path; analysis runs during
//! refresh, off the write path.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use pilum::document::document::Document;
//! use pilum::document::parser::DocumentParser;
//! use pilum::schema::{Mapping, Schema};
//!
//! let mapping = Mapping::builder().text("name").completion("name_suggest").build();
//! let parser = DocumentParser::new("brands", Arc::new(Schema::compile(&mapping).unwrap()));
//!
//! let doc = Document::builder()
//!     .add_text("name", "Advil Liqui-Gels")
//!     .add_completion("name_suggest", "Advil")
//!     .build();
//! parser.validate(&doc).unwrap();
//!
//! let analyzed = parser.parse(&doc).unwrap();
//! assert_eq!(analyzed.terms[0].1, vec!["advil", "gels", "liqui"]);
//! assert_eq!(analyzed.suggestions[0].1[0].key, "advil");
//! ```

use std::sync::Arc;

use crate::document::document::Document;
use crate::document::field_value::FieldValue;
use crate::error::{PilumError, Result};
use crate::schema::{FieldType, Schema, SchemaField};

/// One analyzed completion input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyzedInput {
    /// Trie key produced by the field's analyzer
    pub key: String,
    /// Original input, returned as the suggestion text
    pub text: String,
    /// Ranking weight
    pub weight: u32,
}

/// A document broken into index-ready parts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalyzedDocument {
    /// Text field name → distinct terms, sorted
    pub terms: Vec<(String, Vec<String>)>,
    /// Completion field name → analyzed inputs
    pub suggestions: Vec<(String, Vec<AnalyzedInput>)>,
}

/// Validates documents against a schema and analyzes them for indexing.
#[derive(Clone, Debug)]
pub struct DocumentParser {
    collection: String,
    schema: Arc<Schema>,
}

impl DocumentParser {
    /// Create a parser for a collection's schema.
    pub fn new<S: Into<String>>(collection: S, schema: Arc<Schema>) -> Self {
        DocumentParser {
            collection: collection.into(),
            schema,
        }
    }

    /// The schema used by this parser.
    pub fn schema(&self) -> &Arc<Schema> {
        &self.schema
    }

    /// Check every field of `doc` against the mapping.
    ///
    /// Fails on the first field that is not mapped, or on a completion value
    /// written to a text field. Plain text in a completion field is accepted.
    pub fn validate(&self, doc: &Document) -> Result<()> {
        for (name, value) in doc.fields() {
            let field = self.field(name)?;
            if field.field_type() == FieldType::Text && value.as_text().is_none() {
                return Err(PilumError::type_mismatch(name, FieldType::Text, value.kind()));
            }
        }
        Ok(())
    }

    /// Analyze a validated document.
    pub fn parse(&self, doc: &Document) -> Result<AnalyzedDocument> {
        let mut analyzed = AnalyzedDocument::default();

        for (name, value) in doc.fields() {
            let field = self.field(name)?;
            match field.field_type() {
                FieldType::Text => {
                    let text = value.as_text().ok_or_else(|| {
                        PilumError::type_mismatch(name, FieldType::Text, value.kind())
                    })?;
                    let mut terms = field.analyze(text)?;
                    terms.sort();
                    terms.dedup();
                    analyzed.terms.push((name.to_string(), terms));
                }
                FieldType::Completion => {
                    let inputs = self.analyze_completion(field, value)?;
                    analyzed.suggestions.push((name.to_string(), inputs));
                }
            }
        }

        Ok(analyzed)
    }

    fn analyze_completion(
        &self,
        field: &SchemaField,
        value: &FieldValue,
    ) -> Result<Vec<AnalyzedInput>> {
        let completion = value.to_completion();
        let mut inputs = Vec::with_capacity(completion.input.len());

        for text in completion.input {
            let key = completion_key(field, &text)?;
            // Inputs that analyze to nothing cannot be reached by any prefix.
            if key.is_empty() {
                continue;
            }
            if inputs.iter().any(|input: &AnalyzedInput| input.key == key && input.text == text) {
                continue;
            }
            inputs.push(AnalyzedInput {
                key,
                text,
                weight: completion.weight,
            });
        }

        Ok(inputs)
    }

    fn field(&self, name: &str) -> Result<&SchemaField> {
        self.schema
            .field(name)
            .ok_or_else(|| PilumError::unknown_field(&self.collection, name))
    }
}

/// The trie key for a completion input or prefix: analyzed tokens joined by a space.
pub fn completion_key(field: &SchemaField, text: &str) -> Result<String> {
    Ok(field.analyze(text)?.join(" "))
}

/// A suggest prefix after analysis.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PrefixKey {
    /// The trie key, cut to the field's input length cap.
    pub key: String,
    /// The uncut analyzed prefix, set only when the cap shortened it.
    pub full: Option<String>,
}

impl PrefixKey {
    /// Check whether a stored input still matches once the cap is ignored.
    pub fn matches(&self, field: &SchemaField, text: &str) -> Result<bool> {
        match &self.full {
            Some(full) => Ok(field.analyze_prefix(text)?.join(" ").starts_with(full.as_str())),
            None => Ok(true),
        }
    }
}

/// Analyze a suggest prefix for a completion field.
pub fn prefix_key(field: &SchemaField, prefix: &str) -> Result<PrefixKey> {
    let key = completion_key(field, prefix)?;
    let full = field.analyze_prefix(prefix)?.join(" ");
    Ok(PrefixKey {
        full: (full != key).then_some(full),
        key,
    })
}
