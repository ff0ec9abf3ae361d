//! Term query execution.

use serde::{Deserialize, Serialize};

use crate::collection::snapshot::Snapshot;
use crate::document::document::Document;

/// Default number of hits returned by a term query.
pub const DEFAULT_SIZE: usize = 10;

/// A query that matches documents containing a specific term.
///
/// Like Lucene, a term query performs exact matching and does NOT analyze the
/// value. `TermQuery::new("name", "Advil")` only matches if the indexed term
/// is literally `Advil`; with the standard analyzer it never is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermQuery {
    /// The field to search in.
    pub field: String,
    /// The literal term to look up.
    pub value: String,
    /// Maximum number of hits to return.
    #[serde(default = "default_size")]
    pub size: usize,
}

fn default_size() -> usize {
    DEFAULT_SIZE
}

impl TermQuery {
    /// Create a new term query with the default size.
    pub fn new<F, V>(field: F, value: V) -> Self
    where
        F: Into<String>,
        V: Into<String>,
    {
        TermQuery {
            field: field.into(),
            value: value.into(),
            size: DEFAULT_SIZE,
        }
    }

    /// Set the maximum number of hits.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Run the query against a snapshot.
    ///
    /// The caller is responsible for checking that `field` is a text field of
    /// the snapshot's collection.
    pub fn execute(&self, snapshot: &Snapshot) -> SearchResults {
        let Some(postings) = snapshot.inverted().postings(&self.field, &self.value) else {
            return SearchResults::empty(snapshot.generation());
        };

        let hits = postings
            .iter()
            .filter_map(|doc_id| snapshot.document(doc_id))
            .take(self.size)
            .map(|stored| SearchHit {
                doc_id: stored.id.clone(),
                document: stored.document.clone(),
            })
            .collect();

        SearchResults {
            generation: snapshot.generation(),
            total_hits: postings.len() as u64,
            hits,
        }
    }
}

/// A single matching document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// The document id.
    pub doc_id: String,
    /// The stored document.
    pub document: Document,
}

/// Search results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchResults {
    /// Generation of the snapshot that served the query.
    pub generation: u64,
    /// Total number of matching documents.
    pub total_hits: u64,
    /// The hits, ordered by doc id.
    pub hits: Vec<SearchHit>,
}

impl SearchResults {
    /// Results with no hits.
    pub fn empty(generation: u64) -> Self {
        SearchResults {
            generation,
            total_hits: 0,
            hits: Vec::new(),
        }
    }

    /// The ids of the returned hits.
    pub fn doc_ids(&self) -> Vec<&str> {
        self.hits.iter().map(|hit| hit.doc_id.as_str()).collect()
    }
}
