//! Documents and field values.
//!
//! A [`Document`](document::Document) is a map from field name to
//! [`FieldValue`](field_value::FieldValue). Documents are validated against
//! the collection mapping when they are written.
//!
//! # Examples
//!
//! ```
//! use pilum::document::document::Document;
//!
//! let doc = Document::builder()
//!     .add_text("name", "advil")
//!     .add_completion("name_suggest", "advil")
//!     .build();
//!
//! assert_eq!(doc.len(), 2);
//! assert!(doc.has_field("name_suggest"));
//! ```

pub mod converter;
#[allow(clippy::module_inception)]
pub mod document;
pub mod field_value;
pub mod parser;
