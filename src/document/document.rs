//! Document structure.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::document::field_value::{CompletionInput, FieldValue};

/// A document represents a single item to be indexed.
///
/// Field order is kept sorted so that stored documents serialize
/// deterministically.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: BTreeMap<String, FieldValue>,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Document {
            fields: BTreeMap::new(),
        }
    }

    /// Add a field value to the document, replacing any previous value.
    pub fn add_field<S: Into<String>>(&mut self, name: S, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Get a field value from the document.
    pub fn get_field(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    /// Check if the document has a field.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Remove a field from the document.
    pub fn remove_field(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    /// Iterate over `(name, value)` pairs in name order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Get the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the document is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Create a builder for constructing documents.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder::new()
    }
}

/// A builder for constructing documents in a fluent manner.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    /// Create a new document builder.
    pub fn new() -> Self {
        DocumentBuilder {
            document: Document::new(),
        }
    }

    /// Add a text field to the document.
    pub fn add_text<S: Into<String>, T: Into<String>>(mut self, name: S, value: T) -> Self {
        self.document
            .add_field(name, FieldValue::Text(value.into()));
        self
    }

    /// Add a completion field with a single input and weight 0.
    pub fn add_completion<S: Into<String>, T: Into<String>>(mut self, name: S, input: T) -> Self {
        self.document.add_field(
            name,
            FieldValue::Completion(CompletionInput::new(vec![input.into()])),
        );
        self
    }

    /// Add a completion field with several inputs and an explicit weight.
    pub fn add_weighted_completion<S, I, T>(mut self, name: S, inputs: I, weight: u32) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let inputs = inputs.into_iter().map(Into::into).collect();
        self.document.add_field(
            name,
            FieldValue::Completion(CompletionInput::new(inputs).with_weight(weight)),
        );
        self
    }

    /// Build the document.
    pub fn build(self) -> Document {
        self.document
    }
}
