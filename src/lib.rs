//! # Pilum
//!
//! An embeddable indexing and completion-suggestion engine for Rust.
//!
//! ## Features
//!
//! - Exact-match term queries over an inverted index
//! - Prefix completion suggestions with weighted ranking
//! - Buffered writes with explicit and background refresh
//! - Immutable snapshots shared copy-on-write between generations
//! - Configurable text analysis per field
//!
//! ## Example
//!
//! ```
//! use pilum::prelude::*;
//!
//! let engine = Engine::open(EngineConfig::default()).unwrap();
//! let mapping = Mapping::builder().text("name").completion("name_suggest").build();
//! engine.create_collection("brands", mapping).unwrap();
//!
//! let doc = Document::builder()
//!     .add_text("name", "advil")
//!     .add_completion("name_suggest", "advil")
//!     .build();
//! engine.put("brands", "1", doc).unwrap();
//!
//! // Not visible until the next refresh.
//! let hits = engine.term_query("brands", TermQuery::new("name", "advil")).unwrap();
//! assert_eq!(hits.total_hits, 0);
//!
//! engine.refresh("brands").unwrap();
//! let suggestions = engine
//!     .completion_suggest("brands", CompletionSuggest::new("name_suggest", "ad"))
//!     .unwrap();
//! assert_eq!(suggestions, vec!["advil"]);
//! ```

pub mod analysis;
pub mod cli;
pub mod collection;
pub mod document;
pub mod engine;
pub mod error;
pub mod lexical;
pub mod schema;
pub mod suggest;

pub mod prelude {
    pub use crate::collection::{Collection, CollectionState, CollectionStats};
    pub use crate::document::document::Document;
    pub use crate::document::field_value::{CompletionInput, FieldValue};
    pub use crate::engine::{CollectionSettings, Engine, EngineConfig};
    pub use crate::error::{PilumError, Result};
    pub use crate::lexical::query::{SearchResults, TermQuery};
    pub use crate::schema::{FieldMapping, FieldType, Mapping};
    pub use crate::suggest::completion::{CompletionSuggest, SuggestResults};
}

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
