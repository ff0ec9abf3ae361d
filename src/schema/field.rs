//! Field types for mapping definition.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::analysis::analyzer::completion::DEFAULT_MAX_INPUT_LENGTH;

/// The type of a mapped field.
///
/// `string` is accepted as an alias of `text` when a mapping is read from JSON.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Analyzed text, searchable by term queries.
    #[serde(alias = "string")]
    Text,
    /// Suggestion inputs, searchable by completion suggest.
    Completion,
}

impl FieldType {
    /// The analyzer used when the mapping does not name one.
    pub fn default_analyzer(&self) -> &'static str {
        match self {
            FieldType::Text => "standard",
            FieldType::Completion => "completion",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldType::Text => write!(f, "text"),
            FieldType::Completion => write!(f, "completion"),
        }
    }
}

/// Mapping of a single field.
///
/// # Examples
///
/// ```
/// use pilum::schema::{FieldMapping, FieldType};
///
/// let mapping: FieldMapping = serde_json::from_str(r#"{"type": "string"}"#).unwrap();
/// assert_eq!(mapping.field_type, FieldType::Text);
///
/// let suggest = FieldMapping::completion().with_max_input_length(20);
/// assert_eq!(suggest.max_input_length(), 20);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Field type
    #[serde(rename = "type")]
    pub field_type: FieldType,

    /// Analyzer name; the type's default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<String>,

    /// Completion only: maximum indexed input length in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_input_length: Option<usize>,
}

impl FieldMapping {
    /// Create a mapping for a field of the given type.
    pub fn new(field_type: FieldType) -> Self {
        FieldMapping {
            field_type,
            analyzer: None,
            max_input_length: None,
        }
    }

    /// A text field with the default analyzer.
    pub fn text() -> Self {
        Self::new(FieldType::Text)
    }

    /// A completion field with the default analyzer.
    pub fn completion() -> Self {
        Self::new(FieldType::Completion)
    }

    /// Use the named analyzer for this field.
    pub fn with_analyzer<S: Into<String>>(mut self, analyzer: S) -> Self {
        self.analyzer = Some(analyzer.into());
        self
    }

    /// Cap the indexed length of completion inputs.
    pub fn with_max_input_length(mut self, max_input_length: usize) -> Self {
        self.max_input_length = Some(max_input_length);
        self
    }

    /// Effective analyzer name.
    pub fn analyzer_name(&self) -> &str {
        self.analyzer
            .as_deref()
            .unwrap_or_else(|| self.field_type.default_analyzer())
    }

    /// Effective completion input length cap.
    pub fn max_input_length(&self) -> usize {
        self.max_input_length.unwrap_or(DEFAULT_MAX_INPUT_LENGTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_serde() {
        let text: FieldType = serde_json::from_str("\"text\"").unwrap();
        let legacy: FieldType = serde_json::from_str("\"string\"").unwrap();
        let completion: FieldType = serde_json::from_str("\"completion\"").unwrap();

        assert_eq!(text, FieldType::Text);
        assert_eq!(legacy, FieldType::Text);
        assert_eq!(completion, FieldType::Completion);
        assert_eq!(serde_json::to_string(&FieldType::Text).unwrap(), "\"text\"");
    }

    #[test]
    fn test_unknown_options_are_ignored() {
        let mapping: FieldMapping =
            serde_json::from_str(r#"{"type": "completion", "payloads": "false"}"#).unwrap();
        assert_eq!(mapping.field_type, FieldType::Completion);
        assert_eq!(mapping.analyzer_name(), "completion");
        assert_eq!(mapping.max_input_length(), DEFAULT_MAX_INPUT_LENGTH);
    }
}
