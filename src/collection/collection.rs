//! A single named collection.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use log::{debug, info};
use parking_lot::{Mutex, MutexGuard, RwLock};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::collection::buffer::{Operation, PendingBuffer};
use crate::collection::refresh::{BackgroundRefresh, Refresher};
use crate::collection::snapshot::Snapshot;
use crate::document::converter::json::document_from_json;
use crate::document::document::Document;
use crate::document::parser::{DocumentParser, prefix_key};
use crate::engine::config::CollectionSettings;
use crate::error::{PilumError, Result};
use crate::lexical::query::{SearchResults, TermQuery};
use crate::schema::{FieldType, Mapping, Schema, SchemaField};
use crate::suggest::completion::{CompletionSuggest, SuggestResults};

/// Lifecycle state of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionState {
    /// Accepting writes and serving reads.
    Writable,
    /// Accepting writes and serving reads while a refresh builds the next snapshot.
    Refreshing,
    /// Every operation fails.
    Closed,
}

/// Point-in-time statistics of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionStats {
    pub name: String,
    pub state: CollectionState,
    /// Generation of the current snapshot.
    pub generation: u64,
    /// Documents visible in the current snapshot.
    pub num_docs: usize,
    /// Buffered operations waiting for the next refresh.
    pub pending_ops: usize,
    /// Distinct terms per text field.
    pub terms: BTreeMap<String, usize>,
    /// Completion entries per completion field.
    pub completion_entries: BTreeMap<String, usize>,
    pub refreshed_at: DateTime<Utc>,
}

struct RefreshState {
    last_refresh: Instant,
}

/// State shared between a collection handle and its refresher thread.
struct CollectionInner {
    name: String,
    mapping: Mapping,
    parser: DocumentParser,
    settings: CollectionSettings,
    pending: Mutex<PendingBuffer>,
    current: RwLock<Arc<Snapshot>>,
    refresh_lock: Mutex<RefreshState>,
    next_seq: AtomicU64,
    refreshing: AtomicBool,
    closed: AtomicBool,
}

impl CollectionInner {
    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PilumError::closed(&self.name));
        }
        Ok(())
    }

    fn enqueue(&self, op: Operation) -> Result<u64> {
        let mut pending = self.pending.lock();
        // Checked under the buffer lock so nothing is accepted after close drains it.
        self.ensure_open()?;
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        pending.push(seq, op);
        Ok(seq)
    }

    fn refresh_locked(&self, state: &mut MutexGuard<'_, RefreshState>) -> Result<u64> {
        self.ensure_open()?;
        self.refreshing.store(true, Ordering::Release);

        let started = Instant::now();
        let ops = self.pending.lock().take();
        let current = Arc::clone(&self.current.read());

        let next = if ops.is_empty() {
            Ok(current.advance())
        } else {
            current.apply(&ops, &self.parser)
        };

        let next = match next {
            Ok(next) => next,
            Err(e) => {
                self.pending.lock().requeue_front(ops);
                self.refreshing.store(false, Ordering::Release);
                return Err(e);
            }
        };

        let generation = next.generation();
        *self.current.write() = Arc::new(next);
        state.last_refresh = Instant::now();
        self.refreshing.store(false, Ordering::Release);

        debug!(
            "refreshed '{}' to generation {generation} ({} ops in {:?})",
            self.name,
            ops.len(),
            started.elapsed()
        );
        Ok(generation)
    }

    fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.ensure_open()?;
        Ok(Arc::clone(&self.current.read()))
    }

    fn typed_field(&self, name: &str, expected: FieldType) -> Result<&SchemaField> {
        let field = self
            .parser
            .schema()
            .field(name)
            .ok_or_else(|| PilumError::unknown_field(&self.name, name))?;
        if field.field_type() != expected {
            return Err(PilumError::type_mismatch(name, expected, field.field_type()));
        }
        Ok(field)
    }
}

impl BackgroundRefresh for CollectionInner {
    fn refresh_if_due(&self, interval: Duration) -> Result<Option<u64>> {
        if self.closed.load(Ordering::Acquire) || self.pending.lock().is_empty() {
            return Ok(None);
        }
        // An explicit refresh is already running.
        let Some(mut state) = self.refresh_lock.try_lock() else {
            return Ok(None);
        };
        if state.last_refresh.elapsed() < interval {
            return Ok(None);
        }
        self.refresh_locked(&mut state).map(Some)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// A named container of documents with a fixed mapping.
///
/// Writes are buffered and become visible to reads only after a refresh.
///
/// # Examples
///
/// ```
/// use pilum::collection::Collection;
/// use pilum::document::document::Document;
/// use pilum::engine::config::CollectionSettings;
/// use pilum::lexical::query::TermQuery;
/// use pilum::schema::Mapping;
///
/// let mapping = Mapping::builder().text("name").build();
/// let settings = CollectionSettings::new().without_background_refresh();
/// let collection = Collection::new("brands", mapping, settings).unwrap();
///
/// collection.put("1", Document::builder().add_text("name", "advil").build()).unwrap();
/// assert_eq!(collection.term_query(TermQuery::new("name", "advil")).unwrap().total_hits, 0);
///
/// collection.refresh().unwrap();
/// assert_eq!(collection.term_query(TermQuery::new("name", "advil")).unwrap().total_hits, 1);
/// ```
pub struct Collection {
    inner: Arc<CollectionInner>,
    refresher: Mutex<Option<Refresher>>,
}

impl Collection {
    /// Create a collection and start its background refresher.
    pub fn new<S: Into<String>>(
        name: S,
        mapping: Mapping,
        settings: CollectionSettings,
    ) -> Result<Self> {
        let name = name.into();
        settings.validate()?;
        let schema = Arc::new(Schema::compile(&mapping)?);

        let inner = Arc::new(CollectionInner {
            parser: DocumentParser::new(name.clone(), schema),
            name,
            mapping,
            settings,
            pending: Mutex::new(PendingBuffer::new()),
            current: RwLock::new(Arc::new(Snapshot::empty())),
            refresh_lock: Mutex::new(RefreshState {
                last_refresh: Instant::now(),
            }),
            next_seq: AtomicU64::new(0),
            refreshing: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        });

        let refresher = match inner.settings.refresh_interval {
            Some(interval) => {
                let inner_dyn: Arc<dyn BackgroundRefresh> = inner.clone();
                Some(Refresher::spawn(Arc::downgrade(&inner_dyn), interval)?)
            }
            None => None,
        };

        Ok(Collection {
            inner,
            refresher: Mutex::new(refresher),
        })
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The mapping the collection was created with.
    pub fn mapping(&self) -> &Mapping {
        &self.inner.mapping
    }

    pub fn schema(&self) -> &Arc<Schema> {
        self.inner.parser.schema()
    }

    pub fn settings(&self) -> &CollectionSettings {
        &self.inner.settings
    }

    /// Buffer a document for indexing and return its sequence number.
    ///
    /// The document is validated against the mapping first, so a rejected
    /// write leaves nothing behind.
    pub fn put<S: Into<String>>(&self, id: S, document: Document) -> Result<u64> {
        let id = id.into();
        self.inner.ensure_open()?;
        check_id(&id)?;
        self.inner.parser.validate(&document)?;
        self.inner.enqueue(Operation::Upsert { id, document })
    }

    /// Convert a JSON object with the collection's mapping and buffer it.
    pub fn put_json<S: Into<String>>(&self, id: S, value: &Value) -> Result<u64> {
        self.inner.ensure_open()?;
        let document = document_from_json(&self.inner.mapping, value)?;
        self.put(id, document)
    }

    /// Buffer the removal of a document. Unknown ids are ignored at refresh.
    pub fn delete<S: Into<String>>(&self, id: S) -> Result<u64> {
        let id = id.into();
        self.inner.ensure_open()?;
        check_id(&id)?;
        self.inner.enqueue(Operation::Delete { id })
    }

    /// Get a document from the current snapshot.
    pub fn get(&self, id: &str) -> Result<Option<Document>> {
        let snapshot = self.inner.snapshot()?;
        Ok(snapshot.document(id).map(|stored| stored.document.clone()))
    }

    /// Publish all buffered writes and return the new generation.
    ///
    /// Every write whose `put` returned before this call is visible once it
    /// returns.
    pub fn refresh(&self) -> Result<u64> {
        self.inner.ensure_open()?;
        let mut state = self.inner.refresh_lock.lock();
        self.inner.refresh_locked(&mut state)
    }

    /// The current snapshot.
    pub fn snapshot(&self) -> Result<Arc<Snapshot>> {
        self.inner.snapshot()
    }

    /// Generation of the current snapshot.
    pub fn generation(&self) -> Result<u64> {
        Ok(self.inner.snapshot()?.generation())
    }

    /// Find documents containing a literal term.
    pub fn term_query(&self, query: TermQuery) -> Result<SearchResults> {
        self.inner.ensure_open()?;
        self.inner.typed_field(&query.field, FieldType::Text)?;
        if query.size > self.inner.settings.max_result_window {
            return Err(PilumError::invalid_argument(format!(
                "size {} exceeds max_result_window {}",
                query.size, self.inner.settings.max_result_window
            )));
        }
        let snapshot = self.inner.snapshot()?;
        Ok(query.execute(&snapshot))
    }

    /// Rank completion entries below a prefix.
    pub fn suggest(&self, request: CompletionSuggest) -> Result<SuggestResults> {
        self.inner.ensure_open()?;
        let field = self.inner.typed_field(&request.field, FieldType::Completion)?;
        if request.size == 0 {
            return Err(PilumError::invalid_argument("suggest size must be at least 1"));
        }
        let prefix = prefix_key(field, &request.prefix)?;
        let snapshot = self.inner.snapshot()?;
        request.execute(&snapshot, field, &prefix)
    }

    /// Like [`suggest`](Self::suggest), returning only the texts.
    pub fn completion_suggest(&self, request: CompletionSuggest) -> Result<Vec<String>> {
        Ok(self.suggest(request)?.texts())
    }

    pub fn state(&self) -> CollectionState {
        if self.inner.closed.load(Ordering::Acquire) {
            CollectionState::Closed
        } else if self.inner.refreshing.load(Ordering::Acquire) {
            CollectionState::Refreshing
        } else {
            CollectionState::Writable
        }
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    pub fn stats(&self) -> Result<CollectionStats> {
        let snapshot = self.inner.snapshot()?;
        let pending_ops = self.inner.pending.lock().len();

        let terms = self
            .schema()
            .fields_of_type(FieldType::Text)
            .map(|field| {
                let name = field.name().to_string();
                let count = snapshot.inverted().term_count(&name);
                (name, count)
            })
            .collect();
        let completion_entries = self
            .schema()
            .fields_of_type(FieldType::Completion)
            .map(|field| {
                let count = snapshot.completion(field.name()).map_or(0, |trie| trie.len());
                (field.name().to_string(), count)
            })
            .collect();

        Ok(CollectionStats {
            name: self.inner.name.clone(),
            state: self.state(),
            generation: snapshot.generation(),
            num_docs: snapshot.num_docs(),
            pending_ops,
            terms,
            completion_entries,
            refreshed_at: snapshot.refreshed_at(),
        })
    }

    /// Close the collection.
    ///
    /// Waits for an in-flight refresh, stops the background refresher and
    /// drops buffered writes and the snapshot. Closing twice is a no-op.
    pub fn close(&self) {
        if let Some(mut refresher) = self.refresher.lock().take() {
            refresher.stop();
        }

        let _state = self.inner.refresh_lock.lock();
        let dropped = {
            let mut pending = self.inner.pending.lock();
            if self.inner.closed.swap(true, Ordering::AcqRel) {
                return;
            }
            pending.take().len()
        };
        *self.inner.current.write() = Arc::new(Snapshot::empty());

        info!(
            "closed collection '{}' ({dropped} buffered operations dropped)",
            self.inner.name
        );
    }
}

impl std::fmt::Debug for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collection")
            .field("name", &self.inner.name)
            .field("state", &self.state())
            .finish()
    }
}

fn check_id(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(PilumError::invalid_argument("document id must not be empty"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldMapping;

    fn brands() -> Collection {
        let mapping = Mapping::builder().text("name").completion("name_suggest").build();
        Collection::new(
            "brands",
            mapping,
            CollectionSettings::new().without_background_refresh(),
        )
        .unwrap()
    }

    fn brand(name: &str) -> Document {
        Document::builder()
            .add_text("name", name)
            .add_completion("name_suggest", name)
            .build()
    }

    #[test]
    fn test_put_returns_increasing_sequence() {
        let collection = brands();
        assert_eq!(collection.put("1", brand("advil")).unwrap(), 0);
        assert_eq!(collection.put("2", brand("motrin")).unwrap(), 1);
        assert_eq!(collection.delete("1").unwrap(), 2);
        assert_eq!(collection.stats().unwrap().pending_ops, 3);
    }

    #[test]
    fn test_validation_rejects_before_enqueue() {
        let collection = brands();
        let doc = Document::builder().add_text("color", "red").build();
        assert!(matches!(
            collection.put("1", doc),
            Err(PilumError::UnknownField { .. })
        ));
        assert!(matches!(
            collection.put("", brand("advil")),
            Err(PilumError::InvalidArgument(_))
        ));
        assert_eq!(collection.stats().unwrap().pending_ops, 0);
    }

    #[test]
    fn test_refresh_publishes() {
        let collection = brands();
        collection.put("1", brand("advil")).unwrap();
        assert!(collection.get("1").unwrap().is_none());

        assert_eq!(collection.refresh().unwrap(), 1);
        assert_eq!(collection.get("1").unwrap(), Some(brand("advil")));
        assert_eq!(
            collection
                .completion_suggest(CompletionSuggest::new("name_suggest", "AD"))
                .unwrap(),
            vec!["advil"]
        );
        assert_eq!(collection.refresh().unwrap(), 2);
    }

    #[test]
    fn test_query_field_checks() {
        let collection = brands();
        assert!(matches!(
            collection.term_query(TermQuery::new("name_suggest", "advil")),
            Err(PilumError::FieldTypeMismatch { .. })
        ));
        assert!(matches!(
            collection.suggest(CompletionSuggest::new("name", "ad")),
            Err(PilumError::FieldTypeMismatch { .. })
        ));
        assert!(matches!(
            collection.term_query(TermQuery::new("color", "red")),
            Err(PilumError::UnknownField { .. })
        ));
        assert!(matches!(
            collection.suggest(CompletionSuggest::new("name_suggest", "ad").with_size(0)),
            Err(PilumError::InvalidArgument(_))
        ));
        assert!(matches!(
            collection.term_query(TermQuery::new("name", "advil").with_size(10_001)),
            Err(PilumError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_put_json_uses_mapping() {
        let collection = brands();
        collection
            .put_json(
                "1",
                &serde_json::json!({
                    "name": "Advil",
                    "name_suggest": {"input": ["Advil", "Ibuprofen"], "weight": 3}
                }),
            )
            .unwrap();
        collection.refresh().unwrap();

        let results = collection
            .suggest(CompletionSuggest::new("name_suggest", "ibu"))
            .unwrap();
        assert_eq!(results.texts(), vec!["Ibuprofen"]);
        assert_eq!(results.options[0].score, 3);
    }

    #[test]
    fn test_keyword_field_matches_whole_value() {
        let mapping = Mapping::builder()
            .field("code", FieldMapping::text().with_analyzer("keyword"))
            .build();
        let collection = Collection::new(
            "codes",
            mapping,
            CollectionSettings::new().without_background_refresh(),
        )
        .unwrap();
        collection
            .put("1", Document::builder().add_text("code", "A-1").build())
            .unwrap();
        collection.refresh().unwrap();

        let results = collection.term_query(TermQuery::new("code", "A-1")).unwrap();
        assert_eq!(results.doc_ids(), vec!["1"]);
    }

    #[test]
    fn test_close_is_idempotent_and_final() {
        let collection = brands();
        collection.put("1", brand("advil")).unwrap();
        collection.close();
        collection.close();

        assert_eq!(collection.state(), CollectionState::Closed);
        assert!(matches!(
            collection.put("2", brand("motrin")),
            Err(PilumError::ClosedCollection(_))
        ));
        assert!(matches!(collection.refresh(), Err(PilumError::ClosedCollection(_))));
        assert!(matches!(collection.stats(), Err(PilumError::ClosedCollection(_))));
        assert!(matches!(collection.get("1"), Err(PilumError::ClosedCollection(_))));
    }
}
