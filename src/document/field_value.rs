//! Field value types for documents.
//!
//! A field holds either analyzed text or completion inputs. Values serialize
//! untagged, so a stored document looks like the JSON it was built from:
//!
//! ```
//! use pilum::document::field_value::FieldValue;
//!
//! let value: FieldValue = serde_json::from_str("\"advil\"").unwrap();
//! assert_eq!(value.as_text(), Some("advil"));
//!
//! let value: FieldValue =
//!     serde_json::from_str(r#"{"input": "advil", "weight": 3}"#).unwrap();
//! assert_eq!(value.as_completion().unwrap().weight, 3);
//! ```

use serde::{Deserialize, Deserializer, Serialize};

/// A value stored in a document field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Text value
    Text(String),
    /// Completion inputs
    Completion(CompletionInput),
}

impl FieldValue {
    /// Get the text, if this is a text value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(text) => Some(text),
            FieldValue::Completion(_) => None,
        }
    }

    /// Get the completion inputs, if this is a completion value.
    pub fn as_completion(&self) -> Option<&CompletionInput> {
        match self {
            FieldValue::Completion(input) => Some(input),
            FieldValue::Text(_) => None,
        }
    }

    /// View the value as completion inputs.
    ///
    /// Plain text becomes a single input with weight 0.
    pub fn to_completion(&self) -> CompletionInput {
        match self {
            FieldValue::Text(text) => CompletionInput::new(vec![text.clone()]),
            FieldValue::Completion(input) => input.clone(),
        }
    }

    /// Short name of the value kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Completion(_) => "completion",
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<CompletionInput> for FieldValue {
    fn from(value: CompletionInput) -> Self {
        FieldValue::Completion(value)
    }
}

/// Suggestion inputs of a completion field.
///
/// Every input becomes a path in the completion trie. All inputs share the
/// document's weight, which ranks the suggestions (higher first).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionInput {
    /// Input strings; a single string is accepted when deserializing
    #[serde(deserialize_with = "one_or_many")]
    pub input: Vec<String>,

    /// Ranking weight
    #[serde(default)]
    pub weight: u32,
}

impl CompletionInput {
    /// Create completion inputs with weight 0.
    pub fn new(input: Vec<String>) -> Self {
        CompletionInput { input, weight: 0 }
    }

    /// Set the weight.
    pub fn with_weight(mut self, weight: u32) -> Self {
        self.weight = weight;
        self
    }
}

fn one_or_many<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(input) => vec![input],
        OneOrMany::Many(inputs) => inputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_to_completion() {
        let value = FieldValue::from("advil");
        let completion = value.to_completion();

        assert_eq!(completion.input, vec!["advil"]);
        assert_eq!(completion.weight, 0);
        assert_eq!(value.kind(), "text");
    }

    #[test]
    fn test_completion_input_many() {
        let value: FieldValue =
            serde_json::from_str(r#"{"input": ["Nurofen", "Brufen"], "weight": 2}"#).unwrap();
        let completion = value.as_completion().unwrap();

        assert_eq!(completion.input, vec!["Nurofen", "Brufen"]);
        assert_eq!(completion.weight, 2);
        assert!(value.as_text().is_none());
    }
}
