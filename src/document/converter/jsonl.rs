//! JSONL format document converter.
//!
//! Each non-empty line is a JSON object carrying its id in an id field
//! (`_id` by default):
//! ```jsonl
//! {"_id": "1", "name": "advil", "name_suggest": "advil"}
//! {"_id": "2", "name": "tylenol", "name_suggest": {"input": "tylenol", "weight": 5}}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use serde_json::Value;

use crate::document::converter::json::document_from_json;
use crate::document::converter::{DocumentConverter, IdentifiedDocument};
use crate::error::{PilumError, Result};
use crate::schema::Mapping;

/// Default name of the id field in JSONL input.
pub const DEFAULT_ID_FIELD: &str = "_id";

/// A document converter for JSONL format.
#[derive(Clone, Debug)]
pub struct JsonlDocumentConverter {
    mapping: Mapping,
    id_field: String,
}

impl JsonlDocumentConverter {
    /// Create a new JSONL converter for the given mapping.
    pub fn new(mapping: Mapping) -> Self {
        JsonlDocumentConverter {
            mapping,
            id_field: DEFAULT_ID_FIELD.to_string(),
        }
    }

    /// Read ids from a different field.
    pub fn with_id_field<S: Into<String>>(mut self, id_field: S) -> Self {
        self.id_field = id_field.into();
        self
    }

    /// Parse a single JSON line into an identified document.
    pub fn parse_line(&self, line: &str) -> Result<IdentifiedDocument> {
        let mut value: Value = serde_json::from_str(line)?;
        let object = value
            .as_object_mut()
            .ok_or_else(|| PilumError::invalid_argument("JSONL line must be a JSON object"))?;

        let id = match object.remove(&self.id_field) {
            Some(Value::String(id)) => id,
            Some(Value::Number(id)) => id.to_string(),
            Some(other) => {
                return Err(PilumError::invalid_argument(format!(
                    "Field '{}' must be a string or number, got: {other}",
                    self.id_field
                )));
            }
            None => {
                return Err(PilumError::invalid_argument(format!(
                    "Missing id field '{}'",
                    self.id_field
                )));
            }
        };

        let doc = document_from_json(&self.mapping, &value)?;
        Ok((id, doc))
    }
}

impl DocumentConverter for JsonlDocumentConverter {
    type Iter = JsonlDocumentIterator;

    fn convert<P: AsRef<Path>>(&self, path: P) -> Result<Self::Iter> {
        let file = File::open(path)?;
        Ok(JsonlDocumentIterator {
            lines: BufReader::new(file).lines(),
            converter: self.clone(),
            line_number: 0,
        })
    }
}

/// Iterator over the documents of a JSONL file.
#[derive(Debug)]
pub struct JsonlDocumentIterator {
    lines: Lines<BufReader<File>>,
    converter: JsonlDocumentConverter,
    line_number: usize,
}

impl Iterator for JsonlDocumentIterator {
    type Item = Result<IdentifiedDocument>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) => return Some(Err(e.into())),
            };
            self.line_number += 1;

            if line.trim().is_empty() {
                continue;
            }

            let line_number = self.line_number;
            return Some(self.converter.parse_line(&line).map_err(|e| {
                PilumError::invalid_argument(format!("Line {line_number}: {e}"))
            }));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn converter() -> JsonlDocumentConverter {
        JsonlDocumentConverter::new(
            Mapping::builder()
                .text("name")
                .completion("name_suggest")
                .build(),
        )
    }

    #[test]
    fn test_parse_line() {
        let (id, doc) = converter()
            .parse_line(r#"{"_id": 3, "name": "motrin", "name_suggest": "motrin"}"#)
            .unwrap();

        assert_eq!(id, "3");
        assert!(!doc.has_field("_id"));
        assert_eq!(doc.get_field("name").unwrap().as_text(), Some("motrin"));
    }

    #[test]
    fn test_missing_id() {
        let err = converter().parse_line(r#"{"name": "motrin"}"#).unwrap_err();
        assert!(matches!(err, PilumError::InvalidArgument(_)));
    }

    #[test]
    fn test_custom_id_field() {
        let (id, _) = converter()
            .with_id_field("sku")
            .parse_line(r#"{"sku": "A-1", "name": "advil"}"#)
            .unwrap();
        assert_eq!(id, "A-1");
    }

    #[test]
    fn test_convert_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"_id": "1", "name": "advil"}}"#).unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"_id": "2", "name": "tylenol"}}"#).unwrap();
        writeln!(file, "not json").unwrap();

        let results: Vec<_> = converter().convert(file.path()).unwrap().collect();

        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().0, "1");
        assert_eq!(results[1].as_ref().unwrap().0, "2");
        let err = results[2].as_ref().unwrap_err().to_string();
        assert!(err.contains("Line 4"), "{err}");
    }
}
