//! JSON object to document conversion.

use serde_json::Value;

use crate::document::document::Document;
use crate::document::field_value::{CompletionInput, FieldValue};
use crate::error::{PilumError, Result};
use crate::schema::{FieldType, Mapping};

/// Convert a JSON object into a document.
///
/// Completion fields accept a string, an array of strings, or an object
/// `{"input": ..., "weight": n}`. Text fields accept a string. Fields that are
/// not in the mapping are converted by their JSON shape so that the write path
/// can report them as unknown fields.
///
/// # Examples
///
/// ```
/// use pilum::document::converter::json::document_from_json;
/// use pilum::schema::Mapping;
/// use serde_json::json;
///
/// let mapping = Mapping::builder().text("name").completion("name_suggest").build();
/// let doc = document_from_json(&mapping, &json!({"name": "advil", "name_suggest": "advil"})).unwrap();
///
/// assert_eq!(doc.get_field("name").unwrap().as_text(), Some("advil"));
/// assert!(doc.get_field("name_suggest").unwrap().as_completion().is_some());
/// ```
pub fn document_from_json(mapping: &Mapping, value: &Value) -> Result<Document> {
    let object = value.as_object().ok_or_else(|| {
        PilumError::invalid_argument(format!("Document must be a JSON object, got: {value}"))
    })?;

    let mut doc = Document::new();
    for (name, value) in object {
        let field_value = match mapping.get(name).map(|field| field.field_type) {
            Some(FieldType::Completion) => completion_value(name, value)?,
            Some(FieldType::Text) => text_value(name, value)?,
            None => serde_json::from_value::<FieldValue>(value.clone()).map_err(|_| {
                PilumError::invalid_argument(format!("Unsupported value for field '{name}'"))
            })?,
        };
        doc.add_field(name.clone(), field_value);
    }

    Ok(doc)
}

fn text_value(name: &str, value: &Value) -> Result<FieldValue> {
    match value {
        Value::String(text) => Ok(FieldValue::Text(text.clone())),
        Value::Number(number) => Ok(FieldValue::Text(number.to_string())),
        Value::Bool(flag) => Ok(FieldValue::Text(flag.to_string())),
        _ => Err(PilumError::type_mismatch(name, "text", json_kind(value))),
    }
}

fn completion_value(name: &str, value: &Value) -> Result<FieldValue> {
    match value {
        Value::String(input) => Ok(FieldValue::Completion(CompletionInput::new(vec![
            input.clone(),
        ]))),
        Value::Array(_) => {
            let inputs: Vec<String> = serde_json::from_value(value.clone()).map_err(|_| {
                PilumError::invalid_argument(format!(
                    "Completion field '{name}' expects an array of strings"
                ))
            })?;
            Ok(FieldValue::Completion(CompletionInput::new(inputs)))
        }
        Value::Object(_) => {
            let input: CompletionInput = serde_json::from_value(value.clone())?;
            Ok(FieldValue::Completion(input))
        }
        _ => Err(PilumError::type_mismatch(
            name,
            "completion",
            json_kind(value),
        )),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
