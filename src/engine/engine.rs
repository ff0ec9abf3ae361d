//! Engine implementation.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::info;
use parking_lot::RwLock;
use serde_json::Value;

use crate::collection::{Collection, CollectionStats};
use crate::document::document::Document;
use crate::engine::config::{CollectionSettings, EngineConfig};
use crate::error::{PilumError, Result};
use crate::lexical::query::{SearchResults, TermQuery};
use crate::schema::Mapping;
use crate::suggest::completion::{CompletionSuggest, SuggestResults};

/// An in-process indexing and suggestion engine.
///
/// # Examples
///
/// ```
/// use pilum::document::document::Document;
/// use pilum::engine::{Engine, EngineConfig};
/// use pilum::lexical::query::TermQuery;
/// use pilum::schema::Mapping;
/// use pilum::suggest::completion::CompletionSuggest;
///
/// let engine = Engine::open(EngineConfig::default()).unwrap();
/// let mapping = Mapping::builder().text("name").completion("name_suggest").build();
/// engine.create_collection("brands", mapping).unwrap();
///
/// for (id, name) in [("1", "advil"), ("2", "motrin"), ("3", "tylenol")] {
///     let doc = Document::builder()
///         .add_text("name", name)
///         .add_completion("name_suggest", name)
///         .build();
///     engine.put("brands", id, doc).unwrap();
/// }
/// engine.refresh("brands").unwrap();
///
/// let results = engine.term_query("brands", TermQuery::new("name", "advil")).unwrap();
/// assert_eq!(results.doc_ids(), vec!["1"]);
///
/// let suggestions = engine
///     .completion_suggest("brands", CompletionSuggest::new("name_suggest", "ad"))
///     .unwrap();
/// assert_eq!(suggestions, vec!["advil"]);
/// ```
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    collections: RwLock<BTreeMap<String, Arc<Collection>>>,
    closed: AtomicBool,
}

impl Engine {
    /// Open an engine with the given configuration.
    pub fn open(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Engine {
            config,
            collections: RwLock::new(BTreeMap::new()),
            closed: AtomicBool::new(false),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Create a collection with the engine's default settings.
    pub fn create_collection(&self, name: &str, mapping: Mapping) -> Result<Arc<Collection>> {
        let settings = self.config.collection_defaults.clone();
        self.create_collection_with_settings(name, mapping, settings)
    }

    /// Create a collection with explicit settings.
    pub fn create_collection_with_settings(
        &self,
        name: &str,
        mapping: Mapping,
        settings: CollectionSettings,
    ) -> Result<Arc<Collection>> {
        self.ensure_open()?;
        check_collection_name(name)?;

        let mut collections = self.collections.write();
        if collections.contains_key(name) {
            return Err(PilumError::duplicate(name));
        }
        let fields = mapping.len();
        let collection = Arc::new(Collection::new(name, mapping, settings)?);
        collections.insert(name.to_string(), Arc::clone(&collection));

        info!("created collection '{name}' with {fields} mapped fields");
        Ok(collection)
    }

    /// Get a collection by name.
    pub fn collection(&self, name: &str) -> Result<Arc<Collection>> {
        self.ensure_open()?;
        self.collections
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| PilumError::unknown_collection(name))
    }

    /// Names of all collections, sorted.
    pub fn collection_names(&self) -> Vec<String> {
        self.collections.read().keys().cloned().collect()
    }

    /// Close a collection and remove it from the engine.
    pub fn delete_collection(&self, name: &str) -> Result<()> {
        self.ensure_open()?;
        let collection = self
            .collections
            .write()
            .remove(name)
            .ok_or_else(|| PilumError::unknown_collection(name))?;
        collection.close();
        info!("deleted collection '{name}'");
        Ok(())
    }

    /// Close a collection. It stays registered and rejects every operation.
    pub fn close_collection(&self, name: &str) -> Result<()> {
        self.collection(name)?.close();
        Ok(())
    }

    pub fn put(&self, collection: &str, id: &str, document: Document) -> Result<u64> {
        self.collection(collection)?.put(id, document)
    }

    pub fn put_json(&self, collection: &str, id: &str, value: &Value) -> Result<u64> {
        self.collection(collection)?.put_json(id, value)
    }

    pub fn delete(&self, collection: &str, id: &str) -> Result<u64> {
        self.collection(collection)?.delete(id)
    }

    pub fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        self.collection(collection)?.get(id)
    }

    /// Refresh a collection and return its new generation.
    pub fn refresh(&self, collection: &str) -> Result<u64> {
        self.collection(collection)?.refresh()
    }

    /// Refresh every open collection.
    pub fn refresh_all(&self) -> Result<Vec<(String, u64)>> {
        self.ensure_open()?;
        let collections: Vec<Arc<Collection>> =
            self.collections.read().values().cloned().collect();

        let mut generations = Vec::with_capacity(collections.len());
        for collection in collections {
            // A collection may be closed after the registry was read.
            match collection.refresh() {
                Ok(generation) => generations.push((collection.name().to_string(), generation)),
                Err(PilumError::ClosedCollection(_)) => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(generations)
    }

    pub fn term_query(&self, collection: &str, query: TermQuery) -> Result<SearchResults> {
        self.collection(collection)?.term_query(query)
    }

    pub fn completion_suggest(
        &self,
        collection: &str,
        request: CompletionSuggest,
    ) -> Result<Vec<String>> {
        self.collection(collection)?.completion_suggest(request)
    }

    pub fn suggest(&self, collection: &str, request: CompletionSuggest) -> Result<SuggestResults> {
        self.collection(collection)?.suggest(request)
    }

    pub fn stats(&self, collection: &str) -> Result<CollectionStats> {
        self.collection(collection)?.stats()
    }

    /// Close every collection and reject further calls.
    pub fn close(&self) {
        if self.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        let collections = std::mem::take(&mut *self.collections.write());
        for collection in collections.values() {
            collection.close();
        }
        info!("engine closed ({} collections)", collections.len());
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(PilumError::EngineClosed);
        }
        Ok(())
    }
}

impl Drop for Engine {
    fn drop(&mut self) {
        self.close();
    }
}

fn check_collection_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(PilumError::invalid_argument("collection name must not be empty"));
    }
    if name.starts_with('_') {
        return Err(PilumError::invalid_argument(format!(
            "collection name '{name}' must not start with '_'"
        )));
    }
    if name
        .chars()
        .any(|c| c.is_whitespace() || matches!(c, ',' | '/' | '*'))
    {
        return Err(PilumError::invalid_argument(format!(
            "collection name '{name}' contains an invalid character"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    fn engine() -> Engine {
        let config = EngineConfig::new()
            .with_collection_defaults(CollectionSettings::new().without_background_refresh());
        Engine::open(config).unwrap()
    }

    fn mapping() -> Mapping {
        Mapping::builder().text("name").completion("name_suggest").build()
    }

    #[test]
    fn test_create_and_lookup() {
        let engine = engine();
        engine.create_collection("brands", mapping()).unwrap();
        engine.create_collection("generics", mapping()).unwrap();

        assert_eq!(engine.collection_names(), vec!["brands", "generics"]);
        assert_eq!(engine.collection("brands").unwrap().name(), "brands");
        assert!(matches!(
            engine.create_collection("brands", mapping()),
            Err(PilumError::DuplicateCollection(_))
        ));
        assert!(matches!(
            engine.put("missing", "1", Document::new()),
            Err(PilumError::UnknownCollection(_))
        ));
    }

    #[test]
    fn test_invalid_collection_names() {
        let engine = engine();
        for name in ["", "_all", "a b", "a,b", "a/b", "a*"] {
            assert!(
                matches!(
                    engine.create_collection(name, mapping()),
                    Err(PilumError::InvalidArgument(_))
                ),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_refresh_all_skips_closed() {
        let engine = engine();
        engine.create_collection("brands", mapping()).unwrap();
        engine.create_collection("generics", mapping()).unwrap();
        engine.refresh("brands").unwrap();
        engine.close_collection("generics").unwrap();

        let generations = engine.refresh_all().unwrap();
        assert_eq!(generations, vec![("brands".to_string(), 2)]);
    }

    #[test]
    fn test_refresh_all_while_closing() {
        let engine = Arc::new(engine());
        let names: Vec<String> = (0..8).map(|i| format!("brands{i}")).collect();
        for name in &names {
            engine.create_collection(name, mapping()).unwrap();
        }

        let closer = {
            let engine = Arc::clone(&engine);
            let names = names.clone();
            thread::spawn(move || {
                for name in &names {
                    engine.close_collection(name).unwrap();
                }
            })
        };
        for _ in 0..50 {
            let generations = engine.refresh_all().unwrap();
            assert!(generations.len() <= names.len());
        }
        closer.join().unwrap();

        assert!(engine.refresh_all().unwrap().is_empty());
    }

    #[test]
    fn test_delete_collection() {
        let engine = engine();
        let brands = engine.create_collection("brands", mapping()).unwrap();
        engine.delete_collection("brands").unwrap();

        assert!(brands.is_closed());
        assert!(engine.collection_names().is_empty());
        assert!(matches!(
            engine.delete_collection("brands"),
            Err(PilumError::UnknownCollection(_))
        ));
        engine.create_collection("brands", mapping()).unwrap();
    }

    #[test]
    fn test_closed_engine() {
        let engine = engine();
        let brands = engine.create_collection("brands", mapping()).unwrap();
        engine.close();

        assert!(brands.is_closed());
        assert!(matches!(
            engine.create_collection("generics", mapping()),
            Err(PilumError::EngineClosed)
        ));
        assert!(matches!(engine.refresh("brands"), Err(PilumError::EngineClosed)));
    }
}
