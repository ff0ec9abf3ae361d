//! Schema module for Pilum.
//!
//! A collection is created with a [`Mapping`]: field name → [`FieldMapping`].
//! The mapping is compiled into a [`Schema`] that carries the resolved
//! analyzers and is shared read-only by writers, refresh workers and readers.

pub mod field;
#[allow(clippy::module_inception)]
pub mod schema;

// Re-export commonly used types
pub use field::{FieldMapping, FieldType};
pub use schema::{Mapping, MappingBuilder, Schema, SchemaField};
