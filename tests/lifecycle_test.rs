#[cfg(test)]
mod tests {
    use std::time::Duration;

    use pilum::prelude::*;

    fn mapping() -> Mapping {
        Mapping::builder().text("name").completion("name_suggest").build()
    }

    fn brand(name: &str) -> Document {
        Document::builder()
            .add_text("name", name)
            .add_completion("name_suggest", name)
            .build()
    }

    fn assert_closed<T: std::fmt::Debug>(result: Result<T>) {
        match result {
            Err(PilumError::ClosedCollection(name)) => assert_eq!(name, "brands"),
            other => panic!("expected ClosedCollection, got {other:?}"),
        }
    }

    #[test]
    fn test_closed_collection_rejects_everything() {
        let engine = Engine::open(EngineConfig::default()).unwrap();
        let settings = CollectionSettings::new().with_refresh_interval(Duration::from_millis(10));
        engine
            .create_collection_with_settings("brands", mapping(), settings)
            .unwrap();
        engine.put("brands", "1", brand("advil")).unwrap();
        engine.refresh("brands").unwrap();
        engine.put("brands", "2", brand("motrin")).unwrap();

        engine.close_collection("brands").unwrap();
        assert_eq!(
            engine.collection("brands").unwrap().state(),
            CollectionState::Closed
        );

        assert_closed(engine.put("brands", "3", brand("aleve")));
        assert_closed(engine.put_json("brands", "3", &serde_json::json!({"name": "aleve"})));
        assert_closed(engine.delete("brands", "1"));
        assert_closed(engine.get("brands", "1"));
        assert_closed(engine.refresh("brands"));
        assert_closed(engine.term_query("brands", TermQuery::new("name", "advil")));
        assert_closed(engine.suggest("brands", CompletionSuggest::new("name_suggest", "ad")));
        assert_closed(
            engine.completion_suggest("brands", CompletionSuggest::new("name_suggest", "ad")),
        );
        assert_closed(engine.stats("brands"));

        // Closing again is harmless.
        engine.close_collection("brands").unwrap();
    }

    #[test]
    fn test_validation_errors() {
        let engine = Engine::open(EngineConfig::default()).unwrap();
        engine.create_collection("brands", mapping()).unwrap();

        let err = engine.put("brands", "1", Document::builder().add_text("color", "red").build());
        match err {
            Err(PilumError::UnknownField { collection, field }) => {
                assert_eq!(collection, "brands");
                assert_eq!(field, "color");
            }
            other => panic!("expected UnknownField, got {other:?}"),
        }

        let err = engine.put(
            "brands",
            "1",
            Document::builder().add_completion("name", "advil").build(),
        );
        assert!(matches!(err, Err(PilumError::FieldTypeMismatch { .. })));

        let err = engine.put_json("brands", "1", &serde_json::json!({"name": ["advil"]}));
        assert!(matches!(err, Err(PilumError::FieldTypeMismatch { .. })));

        assert!(matches!(
            engine.refresh("generics"),
            Err(PilumError::UnknownCollection(_))
        ));
        assert!(matches!(
            engine.create_collection("brands", mapping()),
            Err(PilumError::DuplicateCollection(_))
        ));

        // Nothing from the rejected writes was buffered.
        assert_eq!(engine.stats("brands").unwrap().pending_ops, 0);
    }

    #[test]
    fn test_invalid_mapping_is_rejected() {
        let engine = Engine::open(EngineConfig::default()).unwrap();
        let mapping = Mapping::from_json_str(r#"{"name": {"type": "text", "analyzer": "porter"}}"#)
            .unwrap();
        assert!(matches!(
            engine.create_collection("brands", mapping),
            Err(PilumError::Schema(_))
        ));
        assert!(engine.collection_names().is_empty());
    }

    #[test]
    fn test_engine_close() {
        let engine = Engine::open(EngineConfig::default()).unwrap();
        let brands = engine.create_collection("brands", mapping()).unwrap();
        brands.put("1", brand("advil")).unwrap();

        engine.close();
        engine.close();

        assert!(brands.is_closed());
        assert!(matches!(engine.collection("brands"), Err(PilumError::EngineClosed)));
        assert!(matches!(engine.refresh_all(), Err(PilumError::EngineClosed)));
    }
}
