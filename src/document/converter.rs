//! Document converters for building documents from JSON input.
//!
//! [`json::document_from_json`] turns one JSON object into a [`Document`],
//! using the mapping to decide how each value is read. A [`DocumentConverter`]
//! turns a whole file into `(id, document)` pairs.

use std::path::Path;

use crate::document::document::Document;
use crate::error::Result;

pub mod json;
pub mod jsonl;

/// A document together with its caller-supplied id.
pub type IdentifiedDocument = (String, Document);

/// A trait for converting files into identified documents.
///
/// # Example
///
/// ```no_run
/// use pilum::document::converter::DocumentConverter;
/// use pilum::document::converter::jsonl::JsonlDocumentConverter;
/// use pilum::schema::Mapping;
///
/// let mapping = Mapping::builder().text("name").completion("name_suggest").build();
/// let converter = JsonlDocumentConverter::new(mapping);
/// for entry in converter.convert("brands.jsonl").unwrap() {
///     let (id, doc) = entry.unwrap();
///     println!("{id}: {doc:?}");
/// }
/// ```
pub trait DocumentConverter {
    /// The iterator type that yields documents.
    type Iter: Iterator<Item = Result<IdentifiedDocument>>;

    /// Convert a file into an iterator of documents.
    fn convert<P: AsRef<Path>>(&self, path: P) -> Result<Self::Iter>;
}
