//! Collection mappings and their compiled form.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::analyzer;
use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::completion::CompletionAnalyzer;
use crate::error::{PilumError, Result};
use crate::schema::field::{FieldMapping, FieldType};

/// A mapping declares the fields a collection accepts.
///
/// The mapping is fixed when the collection is created.
///
/// # Examples
///
/// ```
/// use pilum::schema::{FieldType, Mapping};
///
/// let mapping = Mapping::builder()
///     .text("name")
///     .completion("name_suggest")
///     .build();
///
/// assert_eq!(mapping.len(), 2);
/// assert_eq!(mapping.get("name_suggest").unwrap().field_type, FieldType::Completion);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Mapping {
    fields: BTreeMap<String, FieldMapping>,
}

impl Mapping {
    /// Create an empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a mapping.
    pub fn builder() -> MappingBuilder {
        MappingBuilder::default()
    }

    /// Parse a mapping from JSON.
    ///
    /// Both the bare form `{"name": {"type": "text"}}` and the wrapped form
    /// `{"properties": {...}}` are accepted. An object is only unwrapped when
    /// `properties` is its sole key, so a field named `properties` can still
    /// be declared next to other fields.
    pub fn from_json_value(value: &Value) -> Result<Self> {
        let properties = match value {
            Value::Object(object) if object.len() == 1 => match object.get("properties") {
                Some(inner @ Value::Object(_)) => inner,
                _ => value,
            },
            _ => value,
        };
        Ok(serde_json::from_value(properties.clone())?)
    }

    /// Parse a mapping from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json_value(&value)
    }

    /// Load a mapping from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Add or replace a field.
    pub fn insert<S: Into<String>>(&mut self, name: S, field: FieldMapping) {
        self.fields.insert(name.into(), field);
    }

    /// Look up a field mapping.
    pub fn get(&self, name: &str) -> Option<&FieldMapping> {
        self.fields.get(name)
    }

    /// Iterate over fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldMapping)> {
        self.fields.iter()
    }

    /// Number of mapped fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if the mapping is empty.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Builder for [`Mapping`].
#[derive(Debug, Default)]
pub struct MappingBuilder {
    mapping: Mapping,
}

impl MappingBuilder {
    /// Add a text field with the default analyzer.
    pub fn text<S: Into<String>>(self, name: S) -> Self {
        self.field(name, FieldMapping::text())
    }

    /// Add a completion field with the default analyzer.
    pub fn completion<S: Into<String>>(self, name: S) -> Self {
        self.field(name, FieldMapping::completion())
    }

    /// Add a field with an explicit mapping.
    pub fn field<S: Into<String>>(mut self, name: S, field: FieldMapping) -> Self {
        self.mapping.insert(name, field);
        self
    }

    /// Build the mapping.
    pub fn build(self) -> Mapping {
        self.mapping
    }
}

/// A mapped field with its analyzer resolved.
#[derive(Clone)]
pub struct SchemaField {
    name: String,
    mapping: FieldMapping,
    analyzer: Arc<dyn Analyzer>,
    prefix_analyzer: Arc<dyn Analyzer>,
}

impl SchemaField {
    /// Field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Field type.
    pub fn field_type(&self) -> FieldType {
        self.mapping.field_type
    }

    /// Original field mapping.
    pub fn mapping(&self) -> &FieldMapping {
        &self.mapping
    }

    /// Analyzer applied to values of this field.
    pub fn analyzer(&self) -> &Arc<dyn Analyzer> {
        &self.analyzer
    }

    /// Run the field's analyzer and collect the terms.
    pub fn analyze(&self, text: &str) -> Result<Vec<String>> {
        analyzer::analyze_terms(self.analyzer.as_ref(), text)
    }

    /// Analyze a suggest prefix without any input length cap.
    pub fn analyze_prefix(&self, text: &str) -> Result<Vec<String>> {
        analyzer::analyze_terms(self.prefix_analyzer.as_ref(), text)
    }
}

impl std::fmt::Debug for SchemaField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaField")
            .field("name", &self.name)
            .field("mapping", &self.mapping)
            .field("analyzer", &format!("<{}>", self.analyzer.name()))
            .finish()
    }
}

/// The compiled form of a [`Mapping`].
#[derive(Clone, Debug)]
pub struct Schema {
    mapping: Mapping,
    fields: BTreeMap<String, SchemaField>,
}

impl Schema {
    /// Validate a mapping and resolve its analyzers.
    pub fn compile(mapping: &Mapping) -> Result<Self> {
        let mut fields = BTreeMap::new();

        for (name, field) in mapping.iter() {
            if name.is_empty() {
                return Err(PilumError::schema("Field name cannot be empty"));
            }
            if field.field_type != FieldType::Completion && field.max_input_length.is_some() {
                return Err(PilumError::schema(format!(
                    "Field '{name}': max_input_length only applies to completion fields"
                )));
            }

            let (analyzer, prefix_analyzer) = match field.field_type {
                FieldType::Completion if field.analyzer_name() == "completion" => {
                    let max_input_length = field.max_input_length();
                    if max_input_length == 0 {
                        return Err(PilumError::schema(format!(
                            "Field '{name}': max_input_length must be positive"
                        )));
                    }
                    let analyzer: Arc<dyn Analyzer> =
                        Arc::new(CompletionAnalyzer::new(max_input_length));
                    let prefix_analyzer: Arc<dyn Analyzer> =
                        Arc::new(CompletionAnalyzer::untruncated());
                    (analyzer, prefix_analyzer)
                }
                _ => {
                    let analyzer = analyzer::by_name(field.analyzer_name())?;
                    (analyzer.clone(), analyzer)
                }
            };

            fields.insert(
                name.clone(),
                SchemaField {
                    name: name.clone(),
                    mapping: field.clone(),
                    analyzer,
                    prefix_analyzer,
                },
            );
        }

        Ok(Schema {
            mapping: mapping.clone(),
            fields,
        })
    }

    /// The mapping this schema was compiled from.
    pub fn mapping(&self) -> &Mapping {
        &self.mapping
    }

    /// Look up a field.
    pub fn field(&self, name: &str) -> Option<&SchemaField> {
        self.fields.get(name)
    }

    /// Iterate over all fields in name order.
    pub fn fields(&self) -> impl Iterator<Item = &SchemaField> {
        self.fields.values()
    }

    /// Iterate over fields of one type.
    pub fn fields_of_type(&self, field_type: FieldType) -> impl Iterator<Item = &SchemaField> {
        self.fields
            .values()
            .filter(move |field| field.field_type() == field_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mapping_from_wrapped_json() {
        let mapping = Mapping::from_json_str(
            r#"{
                "properties": {
                    "name": {"type": "string"},
                    "name_suggest": {"type": "completion", "payloads": "false"}
                }
            }"#,
        )
        .unwrap();

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("name").unwrap().field_type, FieldType::Text);
        assert_eq!(
            mapping.get("name_suggest").unwrap().field_type,
            FieldType::Completion
        );
    }

    #[test]
    fn test_mapping_from_bare_json() {
        let mapping =
            Mapping::from_json_str(r#"{"title": {"type": "text", "analyzer": "keyword"}}"#)
                .unwrap();
        assert_eq!(mapping.get("title").unwrap().analyzer_name(), "keyword");
    }

    #[test]
    fn test_mapping_with_field_named_properties() {
        let mapping = Mapping::from_json_str(
            r#"{
                "properties": {"type": "text"},
                "name": {"type": "text"}
            }"#,
        )
        .unwrap();

        assert_eq!(mapping.len(), 2);
        assert_eq!(mapping.get("properties").unwrap().field_type, FieldType::Text);
        assert_eq!(mapping.get("name").unwrap().field_type, FieldType::Text);
    }

    #[test]
    fn test_compile_resolves_analyzers() {
        let mapping = Mapping::builder()
            .text("name")
            .field(
                "name_suggest",
                FieldMapping::completion().with_max_input_length(3),
            )
            .build();
        let schema = Schema::compile(&mapping).unwrap();

        let name = schema.field("name").unwrap();
        assert_eq!(name.analyzer().name(), "standard");
        assert_eq!(name.analyze("Advil Tablets").unwrap(), vec!["advil", "tablets"]);

        let suggest = schema.field("name_suggest").unwrap();
        assert_eq!(suggest.analyze("Advil").unwrap(), vec!["adv"]);
        assert_eq!(suggest.analyze_prefix("Advil").unwrap(), vec!["advil"]);
        assert_eq!(name.analyze_prefix("Advil Tablets").unwrap(), vec!["advil", "tablets"]);

        assert_eq!(schema.fields_of_type(FieldType::Text).count(), 1);
        assert_eq!(schema.fields_of_type(FieldType::Completion).count(), 1);
    }

    #[test]
    fn test_compile_rejects_bad_mappings() {
        let unknown = Mapping::builder()
            .field("name", FieldMapping::text().with_analyzer("snowball"))
            .build();
        assert!(matches!(
            Schema::compile(&unknown),
            Err(PilumError::Schema(_))
        ));

        let zero = Mapping::builder()
            .field("s", FieldMapping::completion().with_max_input_length(0))
            .build();
        assert!(matches!(Schema::compile(&zero), Err(PilumError::Schema(_))));

        let misplaced = Mapping::builder()
            .field("t", FieldMapping::text().with_max_input_length(10))
            .build();
        assert!(matches!(
            Schema::compile(&misplaced),
            Err(PilumError::Schema(_))
        ));
    }
}
