//! Immutable, published views of a collection.
//!
//! A [`Snapshot`] bundles the stored documents, the inverted index and the
//! completion tries of one generation. Snapshots are never mutated once
//! published; a refresh derives the next one with [`Snapshot::apply`], sharing
//! every structure the batch did not touch.

use std::sync::Arc;

use ahash::AHashMap;
use chrono::{DateTime, Utc};
use log::trace;
use rayon::prelude::*;

use crate::collection::buffer::{Operation, PendingOp};
use crate::document::document::Document;
use crate::document::parser::{AnalyzedDocument, DocumentParser};
use crate::error::Result;
use crate::lexical::inverted::InvertedIndex;
use crate::suggest::trie::{CompletionTrie, SuggestEntry};

/// A document as stored in a snapshot.
#[derive(Clone, Debug, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    /// Sequence number of the write that produced this version.
    pub seq: u64,
    pub document: Document,
}

/// One generation of a collection's searchable state.
#[derive(Clone, Debug)]
pub struct Snapshot {
    generation: u64,
    refreshed_at: DateTime<Utc>,
    documents: Arc<AHashMap<String, Arc<StoredDocument>>>,
    inverted: InvertedIndex,
    completions: AHashMap<String, CompletionTrie>,
}

/// The effect of the last buffered operation for one id.
struct Change<'a> {
    id: &'a str,
    seq: u64,
    document: Option<&'a Document>,
    previous: Option<AnalyzedDocument>,
    next: Option<AnalyzedDocument>,
}

impl Snapshot {
    /// The generation-0 snapshot of a new collection.
    pub fn empty() -> Self {
        Snapshot {
            generation: 0,
            refreshed_at: Utc::now(),
            documents: Arc::new(AHashMap::new()),
            inverted: InvertedIndex::new(),
            completions: AHashMap::new(),
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// When this snapshot was built.
    pub fn refreshed_at(&self) -> DateTime<Utc> {
        self.refreshed_at
    }

    /// Look up a stored document.
    pub fn document(&self, id: &str) -> Option<&Arc<StoredDocument>> {
        self.documents.get(id)
    }

    pub fn num_docs(&self) -> usize {
        self.documents.len()
    }

    pub fn inverted(&self) -> &InvertedIndex {
        &self.inverted
    }

    /// The completion trie of a field, if it holds any entry.
    pub fn completion(&self, field: &str) -> Option<&CompletionTrie> {
        self.completions.get(field)
    }

    /// Number of completion entries per field.
    pub fn completion_entries(&self) -> impl Iterator<Item = (&str, usize)> {
        self.completions
            .iter()
            .map(|(field, trie)| (field.as_str(), trie.len()))
    }

    /// The next generation with identical content.
    pub fn advance(&self) -> Snapshot {
        Snapshot {
            generation: self.generation + 1,
            refreshed_at: Utc::now(),
            ..self.clone()
        }
    }

    /// Build the next generation by merging `ops` into this snapshot.
    ///
    /// Only the last operation for each id counts. Superseded and deleted
    /// versions are re-analyzed to find the postings and completion entries
    /// they contributed; analysis of the whole batch runs in parallel. On
    /// error nothing is published and `self` is left untouched.
    pub fn apply(&self, ops: &[PendingOp], parser: &DocumentParser) -> Result<Snapshot> {
        let mut latest: AHashMap<&str, usize> = AHashMap::with_capacity(ops.len());
        for (i, pending) in ops.iter().enumerate() {
            latest.insert(pending.op.id(), i);
        }
        let mut winners: Vec<&PendingOp> = latest.values().map(|&i| &ops[i]).collect();
        winners.sort_by_key(|pending| pending.seq);

        let changes = winners
            .par_iter()
            .map(|pending| self.analyze(*pending, parser))
            .collect::<Result<Vec<_>>>()?;

        let mut documents = Arc::clone(&self.documents);
        let mut inverted = self.inverted.clone();
        let mut completions = self.completions.clone();

        for change in &changes {
            if let Some(previous) = &change.previous {
                for (field, terms) in &previous.terms {
                    inverted.remove(field, terms, change.id);
                }
                for (field, inputs) in &previous.suggestions {
                    if let Some(trie) = completions.get_mut(field) {
                        for input in inputs {
                            trie.remove(&input.key, change.id);
                        }
                    }
                }
            }

            if let Some(next) = &change.next {
                for (field, terms) in &next.terms {
                    inverted.insert(field, terms, change.id);
                }
                for (field, inputs) in &next.suggestions {
                    if inputs.is_empty() {
                        continue;
                    }
                    let trie = completions.entry(field.clone()).or_default();
                    for input in inputs {
                        trie.insert(
                            &input.key,
                            SuggestEntry {
                                doc_id: change.id.to_string(),
                                text: input.text.clone(),
                                weight: input.weight,
                                seq: change.seq,
                            },
                        );
                    }
                }
            }

            match change.document {
                Some(document) => {
                    Arc::make_mut(&mut documents).insert(
                        change.id.to_string(),
                        Arc::new(StoredDocument {
                            id: change.id.to_string(),
                            seq: change.seq,
                            document: document.clone(),
                        }),
                    );
                }
                None => {
                    if documents.contains_key(change.id) {
                        Arc::make_mut(&mut documents).remove(change.id);
                    }
                }
            }
        }
        completions.retain(|_, trie| !trie.is_empty());

        trace!(
            "merged {} operations ({} distinct ids) into generation {}",
            ops.len(),
            changes.len(),
            self.generation + 1
        );

        Ok(Snapshot {
            generation: self.generation + 1,
            refreshed_at: Utc::now(),
            documents,
            inverted,
            completions,
        })
    }

    fn analyze<'a>(&self, pending: &'a PendingOp, parser: &DocumentParser) -> Result<Change<'a>> {
        let id = pending.op.id();
        let previous = match self.documents.get(id) {
            Some(stored) => Some(parser.parse(&stored.document)?),
            None => None,
        };
        let (document, next) = match &pending.op {
            Operation::Upsert { document, .. } => (Some(document), Some(parser.parse(document)?)),
            Operation::Delete { .. } => (None, None),
        };

        Ok(Change {
            id,
            seq: pending.seq,
            document,
            previous,
            next,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Mapping, Schema};

    fn parser() -> DocumentParser {
        let mapping = Mapping::builder().text("name").completion("name_suggest").build();
        DocumentParser::new("brands", Arc::new(Schema::compile(&mapping).unwrap()))
    }

    fn upsert(seq: u64, id: &str, name: &str) -> PendingOp {
        PendingOp {
            seq,
            op: Operation::Upsert {
                id: id.to_string(),
                document: Document::builder()
                    .add_text("name", name)
                    .add_completion("name_suggest", name)
                    .build(),
            },
        }
    }

    fn delete(seq: u64, id: &str) -> PendingOp {
        PendingOp {
            seq,
            op: Operation::Delete { id: id.to_string() },
        }
    }

    fn suggestions(snapshot: &Snapshot, prefix: &str) -> Vec<String> {
        snapshot
            .completion("name_suggest")
            .map(|trie| {
                trie.prefix_search(prefix, 10)
                    .into_iter()
                    .map(|e| e.text.clone())
                    .collect()
            })
            .unwrap_or_default()
    }

    #[test]
    fn test_apply_indexes_documents() {
        let parser = parser();
        let snapshot = Snapshot::empty()
            .apply(
                &[upsert(0, "1", "advil"), upsert(1, "2", "motrin"), upsert(2, "3", "tylenol")],
                &parser,
            )
            .unwrap();

        assert_eq!(snapshot.generation(), 1);
        assert_eq!(snapshot.num_docs(), 3);
        assert!(snapshot.inverted().postings("name", "advil").unwrap().contains("1"));
        assert_eq!(suggestions(&snapshot, "ad"), vec!["advil"]);
    }

    #[test]
    fn test_last_write_wins_within_batch() {
        let parser = parser();
        let snapshot = Snapshot::empty()
            .apply(&[upsert(0, "1", "advil"), upsert(1, "1", "motrin")], &parser)
            .unwrap();

        assert!(snapshot.inverted().postings("name", "advil").is_none());
        assert_eq!(snapshot.document("1").unwrap().seq, 1);
        assert_eq!(suggestions(&snapshot, "ad"), Vec::<String>::new());
        assert_eq!(suggestions(&snapshot, "mo"), vec!["motrin"]);
    }

    #[test]
    fn test_supersede_across_generations() {
        let parser = parser();
        let first = Snapshot::empty().apply(&[upsert(0, "1", "advil")], &parser).unwrap();
        let second = first.apply(&[upsert(1, "1", "motrin")], &parser).unwrap();

        assert!(second.inverted().postings("name", "advil").is_none());
        assert!(second.inverted().postings("name", "motrin").unwrap().contains("1"));
        assert!(suggestions(&second, "ad").is_empty());

        // The previous generation is unchanged.
        assert!(first.inverted().postings("name", "advil").unwrap().contains("1"));
        assert_eq!(suggestions(&first, "ad"), vec!["advil"]);
    }

    #[test]
    fn test_delete_removes_everywhere() {
        let parser = parser();
        let first = Snapshot::empty()
            .apply(&[upsert(0, "1", "advil"), upsert(1, "2", "advil pm")], &parser)
            .unwrap();
        let second = first.apply(&[delete(2, "1"), delete(3, "404")], &parser).unwrap();

        assert!(second.document("1").is_none());
        assert_eq!(second.num_docs(), 1);
        let postings = second.inverted().postings("name", "advil").unwrap();
        assert_eq!(postings.iter().collect::<Vec<_>>(), vec!["2"]);
        assert_eq!(suggestions(&second, "ad"), vec!["advil pm"]);
    }

    #[test]
    fn test_delete_then_upsert_in_same_batch() {
        let parser = parser();
        let first = Snapshot::empty().apply(&[upsert(0, "1", "advil")], &parser).unwrap();
        let second = first
            .apply(&[delete(1, "1"), upsert(2, "1", "advil")], &parser)
            .unwrap();

        assert_eq!(second.num_docs(), 1);
        assert_eq!(suggestions(&second, "ad"), vec!["advil"]);
        assert_eq!(second.completion("name_suggest").unwrap().len(), 1);
    }

    #[test]
    fn test_advance_keeps_content() {
        let parser = parser();
        let first = Snapshot::empty().apply(&[upsert(0, "1", "advil")], &parser).unwrap();
        let second = first.advance();

        assert_eq!(second.generation(), 2);
        assert!(Arc::ptr_eq(&first.documents, &second.documents));
        assert_eq!(suggestions(&second, "ad"), vec!["advil"]);
    }

    #[test]
    fn test_emptied_trie_is_dropped() {
        let parser = parser();
        let first = Snapshot::empty().apply(&[upsert(0, "1", "advil")], &parser).unwrap();
        let second = first.apply(&[delete(1, "1")], &parser).unwrap();

        assert!(second.completion("name_suggest").is_none());
        assert_eq!(second.completion_entries().count(), 0);
    }
}
