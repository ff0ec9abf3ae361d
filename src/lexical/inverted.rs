//! Copy-on-write inverted index.
//!
//! The index maps `field → term → ordered set of doc ids`. Every level is held
//! behind an [`Arc`], so cloning an index is cheap and a refresh only copies
//! the fields and postings lists it actually touches.

use std::collections::BTreeSet;
use std::sync::Arc;

use ahash::AHashMap;

/// Doc ids containing a term, in id order.
pub type PostingList = BTreeSet<String>;

/// Postings for a single field.
#[derive(Clone, Debug, Default)]
pub struct FieldIndex {
    terms: AHashMap<String, Arc<PostingList>>,
}

impl FieldIndex {
    /// Get the postings for a term.
    pub fn postings(&self, term: &str) -> Option<&Arc<PostingList>> {
        self.terms.get(term)
    }

    /// Number of distinct terms in the field.
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Number of documents containing `term`.
    pub fn doc_freq(&self, term: &str) -> usize {
        self.terms.get(term).map_or(0, |postings| postings.len())
    }

    fn add(&mut self, term: &str, doc_id: &str) {
        let postings = self.terms.entry(term.to_string()).or_default();
        if !postings.contains(doc_id) {
            Arc::make_mut(postings).insert(doc_id.to_string());
        }
    }

    fn remove(&mut self, term: &str, doc_id: &str) {
        let Some(postings) = self.terms.get_mut(term) else {
            return;
        };
        if !postings.contains(doc_id) {
            return;
        }
        if postings.len() == 1 {
            self.terms.remove(term);
        } else {
            Arc::make_mut(postings).remove(doc_id);
        }
    }
}

/// Inverted index across all text fields of a collection.
///
/// # Examples
///
/// ```
/// use pilum::lexical::inverted::InvertedIndex;
///
/// let mut index = InvertedIndex::new();
/// index.insert("name", &["advil".to_string()], "1");
///
/// let snapshot = index.clone();
/// index.remove("name", &["advil".to_string()], "1");
///
/// assert!(index.postings("name", "advil").is_none());
/// assert!(snapshot.postings("name", "advil").unwrap().contains("1"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct InvertedIndex {
    fields: AHashMap<String, Arc<FieldIndex>>,
}

impl InvertedIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `doc_id` to the postings of each term.
    pub fn insert(&mut self, field: &str, terms: &[String], doc_id: &str) {
        if terms.is_empty() {
            return;
        }
        let index = Arc::make_mut(self.fields.entry(field.to_string()).or_default());
        for term in terms {
            index.add(term, doc_id);
        }
    }

    /// Remove `doc_id` from the postings of each term.
    ///
    /// Postings lists that become empty are dropped, as are fields without
    /// any remaining term.
    pub fn remove(&mut self, field: &str, terms: &[String], doc_id: &str) {
        let Some(index) = self.fields.get_mut(field) else {
            return;
        };
        let touched = terms.iter().any(|term| {
            index
                .postings(term)
                .is_some_and(|postings| postings.contains(doc_id))
        });
        if !touched {
            return;
        }

        let index = Arc::make_mut(index);
        for term in terms {
            index.remove(term, doc_id);
        }
        if index.term_count() == 0 {
            self.fields.remove(field);
        }
    }

    /// Get the postings of `term` in `field`.
    pub fn postings(&self, field: &str, term: &str) -> Option<&Arc<PostingList>> {
        self.fields.get(field)?.postings(term)
    }

    /// Get the index of a single field.
    pub fn field(&self, field: &str) -> Option<&Arc<FieldIndex>> {
        self.fields.get(field)
    }

    /// Number of distinct terms in `field`.
    pub fn term_count(&self, field: &str) -> usize {
        self.fields.get(field).map_or(0, |index| index.term_count())
    }

    /// Total number of distinct `(field, term)` pairs.
    pub fn total_terms(&self) -> usize {
        self.fields.values().map(|index| index.term_count()).sum()
    }
}
