use devdocs_core::store::{
    self, CollectionKind, METRICS_RETENTION_SECS, TTL_FIELD, collection, collections,
};
use serde_json::json;

#[test]
fn all_collections_in_order() {
    let names: Vec<&str> = collections().iter().map(|c| c.name).collect();
    assert_eq!(
        names,
        vec![
            "test_case_config",
            "test_log_detalle",
            "mock_server_config",
            "file_metadata",
            "audit_snapshots",
            "chatbot_messages",
            "notification_payload",
            "feedback_details",
            "api_metrics",
            "system_logs",
        ]
    );
}

#[test]
fn hybrid_collections_have_a_unique_foreign_key() {
    let hybrid: Vec<_> = collections()
        .into_iter()
        .filter_map(|c| match c.kind {
            CollectionKind::Hybrid {
                sql_table,
                foreign_key,
            } => Some((c, sql_table, foreign_key)),
            _ => None,
        })
        .collect();
    assert_eq!(hybrid.len(), 8);

    for (spec, sql_table, foreign_key) in hybrid {
        let first = &spec.indexes[0];
        assert!(first.unique, "{} first index should be unique", spec.name);
        assert_eq!(first.keys.keys().collect::<Vec<_>>(), vec![foreign_key]);

        assert!(spec.required_fields().contains(&foreign_key));
        let schema = spec.validator.as_ref().unwrap();
        assert_eq!(schema["properties"][foreign_key]["bsonType"], "long");
        let description = schema["properties"][foreign_key]["description"].as_str().unwrap();
        assert!(description.contains(sql_table));
    }
}

#[test]
fn ttl_index_exactly_where_documents_can_expire() {
    for spec in collections() {
        let ttl: Vec<_> = spec.indexes.iter().filter(|i| i.is_ttl()).collect();
        if spec.declares_ttl_field() {
            assert_eq!(ttl.len(), 1, "{} should have one TTL index", spec.name);
            assert_eq!(ttl[0].keys.get(TTL_FIELD), Some(&1));
            assert_eq!(ttl[0].expire_after_seconds, Some(0));
        } else {
            assert!(ttl.is_empty(), "{} should not expire documents", spec.name);
        }
    }
}

#[test]
fn metrics_are_a_time_series_kept_ninety_days() {
    let metrics = collection("api_metrics").unwrap();
    assert_eq!(metrics.kind, CollectionKind::TimeSeries);
    assert_eq!(METRICS_RETENTION_SECS, 7_776_000);
    assert_eq!(
        metrics.create_options(),
        json!({
            "timeseries": {
                "timeField": "timestamp",
                "metaField": "metadata",
                "granularity": "minutes",
            },
            "expireAfterSeconds": 7_776_000,
        })
    );
    assert!(metrics
        .indexes
        .iter()
        .all(|i| i.keys.get("timestamp") == Some(&-1)));
}

#[test]
fn system_logs_levels() {
    let logs = collection("system_logs").unwrap();
    assert_eq!(logs.kind, CollectionKind::Standalone);
    assert_eq!(logs.required_fields(), vec!["timestamp", "level", "message"]);
    let schema = logs.validator.unwrap();
    assert_eq!(
        schema["properties"]["level"]["enum"],
        json!(["DEBUG", "INFO", "WARN", "ERROR", "FATAL"])
    );
}

#[test]
fn enumerated_fields() {
    let chat = collection("chatbot_messages").unwrap().validator.unwrap();
    assert_eq!(
        chat["properties"]["mensajes"]["items"]["properties"]["remitente"]["enum"],
        json!(["USUARIO", "IA"])
    );

    let feedback = collection("feedback_details").unwrap().validator.unwrap();
    assert_eq!(
        feedback["properties"]["reproduccion_bug"]["properties"]["frecuencia"]["enum"],
        json!(["SIEMPRE", "A_VECES", "RARA_VEZ"])
    );

    let tests = collection("test_case_config").unwrap().validator.unwrap();
    assert_eq!(
        tests["properties"]["request"]["properties"]["method"]["enum"],
        json!(["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "HEAD"])
    );
}

#[test]
fn unknown_collection() {
    assert!(collection("sessions").is_none());
}

#[test]
fn full_script() {
    let script = store::emit_mongosh(&collections(), Some("devportal")).unwrap();
    assert_eq!(script.matches("db.createCollection(").count(), 10);
    assert!(script.contains(
        r#"db.createCollection("api_metrics", {"timeseries":{"timeField":"timestamp","metaField":"metadata","granularity":"minutes"},"expireAfterSeconds":7776000});"#
    ));
    assert!(script.contains(
        r#"db.audit_snapshots.createIndex({"entity_type":1,"entity_id":1});"#
    ));
    assert!(script.trim_end().ends_with(r#"print("10 collections created");"#));
}
