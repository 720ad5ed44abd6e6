use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Value, json};

/// Field holding a document's expiry date; indexed with `expireAfterSeconds: 0`.
pub const TTL_FIELD: &str = "expireAt";

/// Retention of the `api_metrics` time series: 90 days.
pub const METRICS_RETENTION_SECS: u64 = 90 * 24 * 60 * 60;

const HTTP_METHODS: [&str; 7] = ["GET", "POST", "PUT", "PATCH", "DELETE", "OPTIONS", "HEAD"];

/// How a collection relates to the relational database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CollectionKind {
    /// One document per row of `sql_table`, keyed by its numeric id.
    Hybrid {
        sql_table: &'static str,
        foreign_key: &'static str,
    },
    /// Append-only measurements partitioned by time.
    TimeSeries,
    Standalone,
}

/// A MongoDB index definition.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexSpec {
    pub keys: IndexMap<String, i32>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub unique: bool,
    #[serde(rename = "expireAfterSeconds", skip_serializing_if = "Option::is_none")]
    pub expire_after_seconds: Option<u64>,
}

impl IndexSpec {
    fn on(fields: &[(&str, i32)]) -> Self {
        Self {
            keys: fields.iter().map(|(f, d)| (f.to_string(), *d)).collect(),
            unique: false,
            expire_after_seconds: None,
        }
    }

    fn unique(field: &str) -> Self {
        Self {
            unique: true,
            ..Self::on(&[(field, 1)])
        }
    }

    fn ttl() -> Self {
        Self {
            expire_after_seconds: Some(0),
            ..Self::on(&[(TTL_FIELD, 1)])
        }
    }

    /// The second argument of `createIndex`, when there is one.
    pub fn options(&self) -> Option<Value> {
        let mut options = serde_json::Map::new();
        if self.unique {
            options.insert("unique".to_string(), json!(true));
        }
        if let Some(seconds) = self.expire_after_seconds {
            options.insert("expireAfterSeconds".to_string(), json!(seconds));
        }
        (!options.is_empty()).then_some(Value::Object(options))
    }

    pub fn is_ttl(&self) -> bool {
        self.expire_after_seconds.is_some()
    }
}

/// Time-series bucketing options.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimeSeriesOptions {
    #[serde(rename = "timeField")]
    pub time_field: &'static str,
    #[serde(rename = "metaField")]
    pub meta_field: &'static str,
    pub granularity: &'static str,
}

/// A collection with its validator and indexes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollectionSpec {
    pub name: &'static str,
    #[serde(flatten)]
    pub kind: CollectionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validator: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeseries: Option<TimeSeriesOptions>,
    #[serde(rename = "expireAfterSeconds", skip_serializing_if = "Option::is_none")]
    pub expire_after_seconds: Option<u64>,
    pub indexes: Vec<IndexSpec>,
}

impl CollectionSpec {
    fn hybrid(
        name: &'static str,
        sql_table: &'static str,
        foreign_key: &'static str,
        schema: Value,
    ) -> Self {
        Self {
            name,
            kind: CollectionKind::Hybrid {
                sql_table,
                foreign_key,
            },
            validator: Some(schema),
            timeseries: None,
            expire_after_seconds: None,
            indexes: vec![IndexSpec::unique(foreign_key)],
        }
    }

    fn index(mut self, index: IndexSpec) -> Self {
        self.indexes.push(index);
        self
    }

    /// The options document passed to `db.createCollection`.
    pub fn create_options(&self) -> Value {
        let mut options = serde_json::Map::new();
        if let Some(schema) = &self.validator {
            options.insert("validator".to_string(), json!({ "$jsonSchema": schema }));
        }
        if let Some(ts) = &self.timeseries {
            options.insert("timeseries".to_string(), json!(ts));
        }
        if let Some(seconds) = self.expire_after_seconds {
            options.insert("expireAfterSeconds".to_string(), json!(seconds));
        }
        Value::Object(options)
    }

    /// Top-level fields the validator requires.
    pub fn required_fields(&self) -> Vec<&str> {
        self.validator
            .as_ref()
            .and_then(|v| v.get("required"))
            .and_then(Value::as_array)
            .map(|fields| fields.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Whether documents may carry an `expireAt` date.
    pub fn declares_ttl_field(&self) -> bool {
        self.validator
            .as_ref()
            .and_then(|v| v.get("properties"))
            .is_some_and(|p| p.get(TTL_FIELD).is_some())
    }
}

fn typed(bson_type: &str) -> Value {
    json!({ "bsonType": bson_type })
}

fn nullable(bson_type: &str) -> Value {
    json!({ "bsonType": [bson_type, "null"] })
}

fn foreign_id(sql_table: &str) -> Value {
    json!({
        "bsonType": "long",
        "description": format!("id of the SQL table {sql_table} (required)"),
    })
}

fn expiry(description: &str) -> Value {
    json!({ "bsonType": ["date", "null"], "description": description })
}

fn object(required: &[&str], properties: Value) -> Value {
    let mut schema = json!({ "bsonType": "object" });
    if !required.is_empty() {
        schema["required"] = json!(required);
    }
    schema["properties"] = properties;
    schema
}

fn array_of(items: Value) -> Value {
    json!({ "bsonType": "array", "items": items })
}

fn one_of(values: &[&str]) -> Value {
    json!({ "bsonType": "string", "enum": values })
}

fn test_case_config() -> CollectionSpec {
    let schema = object(
        &["test_case_id", "request"],
        json!({
            "test_case_id": foreign_id("api_test_case"),
            "request": object(&["method", "endpoint"], json!({
                "method": one_of(&HTTP_METHODS),
                "endpoint": typed("string"),
                "headers": typed("object"),
                "query_params": typed("object"),
                "body": { "bsonType": ["object", "string", "null"] },
            })),
            "validations": array_of(object(&["type"], json!({
                "type": one_of(&["status_code", "json_path", "json_schema", "response_time", "custom_script"]),
                "expected": {},
                "path": typed("string"),
                "script": typed("string"),
            }))),
            "pre_request_script": nullable("string"),
            "post_response_script": nullable("string"),
            "created_at": typed("date"),
            "updated_at": typed("date"),
        }),
    );
    CollectionSpec::hybrid("test_case_config", "api_test_case", "test_case_id", schema)
        .index(IndexSpec::on(&[("created_at", -1)]))
}

fn test_log_detalle() -> CollectionSpec {
    let schema = object(
        &["test_log_id", "request", "response"],
        json!({
            "test_log_id": foreign_id("api_test_log"),
            "request": object(&[], json!({
                "url": typed("string"),
                "method": typed("string"),
                "headers": typed("object"),
                "body": {},
                "size_bytes": typed("int"),
                "timestamp": typed("date"),
            })),
            "response": object(&[], json!({
                "status_code": typed("int"),
                "headers": typed("object"),
                "body": {},
                "size_bytes": typed("int"),
                "time_ms": typed("int"),
                "timestamp": typed("date"),
            })),
            "validation_results": array_of(object(&[], json!({
                "validation_type": typed("string"),
                "passed": typed("bool"),
                "expected": {},
                "actual": {},
                "error_message": nullable("string"),
            }))),
            "console_output": nullable("string"),
            "error_stack": nullable("string"),
            "created_at": typed("date"),
            "expireAt": expiry("TTL: removed after 90 days"),
        }),
    );
    CollectionSpec::hybrid("test_log_detalle", "api_test_log", "test_log_id", schema)
        .index(IndexSpec::ttl())
        .index(IndexSpec::on(&[("created_at", -1)]))
}

fn mock_server_config() -> CollectionSpec {
    let mut endpoints = array_of(object(
        &["method", "path", "response"],
        json!({
            "method": one_of(&HTTP_METHODS),
            "path": typed("string"),
            "response": object(&["status_code"], json!({
                "status_code": typed("int"),
                "headers": typed("object"),
                "body_template": {},
                "delay_ms": typed("int"),
            })),
            "conditions": {
                "bsonType": ["array", "null"],
                "items": object(&[], json!({
                    "condition": typed("string"),
                    "response_override": typed("object"),
                })),
            },
        }),
    ));
    endpoints["minItems"] = json!(1);

    let schema = object(
        &["mock_server_id", "endpoints"],
        json!({
            "mock_server_id": foreign_id("api_mock_server"),
            "global_headers": typed("object"),
            "endpoints": endpoints,
            "fallback_response": object(&[], json!({
                "status_code": typed("int"),
                "body": {},
            })),
            "rules": array_of(object(&[], json!({
                "condition": typed("string"),
                "response": typed("object"),
            }))),
            "created_at": typed("date"),
            "updated_at": typed("date"),
        }),
    );
    CollectionSpec::hybrid("mock_server_config", "api_mock_server", "mock_server_id", schema)
        .index(IndexSpec::on(&[("created_at", -1)]))
}

fn file_metadata() -> CollectionSpec {
    let schema = object(
        &["enlace_id", "file_metadata"],
        json!({
            "enlace_id": foreign_id("enlace"),
            "file_metadata": object(&["size_bytes", "mime_type"], json!({
                "size_bytes": typed("long"),
                "checksum_sha256": nullable("string"),
                "checksum_md5": nullable("string"),
                "mime_type": typed("string"),
                "encoding": nullable("string"),
                "duration_seconds": nullable("int"),
                "resolution": nullable("string"),
                "bitrate": nullable("int"),
                "width": nullable("int"),
                "height": nullable("int"),
                "format": nullable("string"),
                "sample_rate": nullable("int"),
                "channels": nullable("int"),
            })),
            "versions": array_of(object(&["version", "url", "uploaded_at"], json!({
                "version": typed("int"),
                "url": typed("string"),
                "uploaded_at": typed("date"),
                "size_bytes": typed("long"),
                "changes": nullable("string"),
                "uploaded_by": nullable("long"),
            }))),
            "access_log": array_of(object(&[], json!({
                "usuario_id": typed("long"),
                "fecha": typed("date"),
                "ip": typed("string"),
            }))),
            "tags": array_of(typed("string")),
            "created_at": typed("date"),
            "expireAt": expiry("TTL: temporary files"),
        }),
    );
    CollectionSpec::hybrid("file_metadata", "enlace", "enlace_id", schema)
        .index(IndexSpec::ttl())
        .index(IndexSpec::on(&[("file_metadata.mime_type", 1)]))
        .index(IndexSpec::on(&[("file_metadata.size_bytes", -1)]))
        .index(IndexSpec::on(&[("tags", 1)]))
}

fn audit_snapshots() -> CollectionSpec {
    let schema = object(
        &["historial_id", "entity_type"],
        json!({
            "historial_id": foreign_id("historial"),
            "entity_type": {
                "bsonType": "string",
                "description": "kind of audited entity (api, proyecto, usuario, ...)",
            },
            "entity_id": { "bsonType": "long", "description": "id of the affected entity" },
            "before": {
                "bsonType": ["object", "null"],
                "description": "full snapshot before the change",
            },
            "after": {
                "bsonType": ["object", "null"],
                "description": "full snapshot after the change",
            },
            "diff": object(&[], json!({
                "added_fields": typed("array"),
                "modified_fields": typed("array"),
                "deleted_fields": typed("array"),
                "added_relations": typed("array"),
                "deleted_relations": typed("array"),
            })),
            "metadata": object(&[], json!({
                "user_agent": typed("string"),
                "ip": typed("string"),
                "geolocation": nullable("string"),
                "session_id": nullable("string"),
            })),
            "created_at": typed("date"),
            "expireAt": expiry("TTL: audits removed after 5 years"),
        }),
    );
    CollectionSpec::hybrid("audit_snapshots", "historial", "historial_id", schema)
        .index(IndexSpec::on(&[("entity_type", 1), ("entity_id", 1)]))
        .index(IndexSpec::ttl())
        .index(IndexSpec::on(&[("created_at", -1)]))
}

fn chatbot_messages() -> CollectionSpec {
    let schema = object(
        &["conversacion_id", "mensajes"],
        json!({
            "conversacion_id": foreign_id("chatbot_conversacion"),
            "mensajes": array_of(object(&["mensaje_id", "remitente", "contenido", "timestamp"], json!({
                "mensaje_id": typed("int"),
                "remitente": one_of(&["USUARIO", "IA"]),
                "contenido": typed("string"),
                "timestamp": typed("date"),
                "tokens": typed("int"),
                "modelo": nullable("string"),
                "confidence": nullable("double"),
                "referencias": {
                    "bsonType": ["array", "null"],
                    "items": object(&[], json!({
                        "tipo": typed("string"),
                        "id": typed("long"),
                        "titulo": typed("string"),
                        "url": nullable("string"),
                    })),
                },
            }))),
            "context_window": {
                "bsonType": "array",
                "description": "last messages kept as model context",
                "items": object(&[], json!({
                    "role": one_of(&["user", "assistant", "system"]),
                    "content": typed("string"),
                })),
            },
            "embeddings": {
                "bsonType": ["array", "null"],
                "description": "message embeddings for semantic search",
                "items": object(&[], json!({
                    "mensaje_id": typed("int"),
                    "embedding": array_of(typed("double")),
                })),
            },
            "metadata": object(&[], json!({
                "total_tokens": typed("int"),
                "last_ia_model": typed("string"),
                "sentiment": nullable("string"),
            })),
            "created_at": typed("date"),
            "updated_at": typed("date"),
            "expireAt": expiry("TTL: removed after 90 days"),
        }),
    );
    CollectionSpec::hybrid("chatbot_messages", "chatbot_conversacion", "conversacion_id", schema)
        .index(IndexSpec::ttl())
        .index(IndexSpec::on(&[("updated_at", -1)]))
}

fn notification_payload() -> CollectionSpec {
    let schema = object(
        &["notificacion_id", "payload"],
        json!({
            "notificacion_id": foreign_id("notificacion"),
            "payload": object(&["titulo", "mensaje"], json!({
                "titulo": typed("string"),
                "mensaje": typed("string"),
                "usuario_origen": {
                    "bsonType": ["object", "null"],
                    "properties": {
                        "usuario_id": typed("long"),
                        "nombre": typed("string"),
                        "avatar_url": nullable("string"),
                    },
                },
                "entidad_relacionada": {
                    "bsonType": ["object", "null"],
                    "properties": {
                        "tipo": typed("string"),
                        "id": typed("long"),
                        "nombre": typed("string"),
                        "url": nullable("string"),
                    },
                },
                "accion": {
                    "bsonType": ["object", "null"],
                    "properties": {
                        "texto": typed("string"),
                        "url": typed("string"),
                        "tipo": one_of(&["PRIMARY", "SECONDARY", "LINK"]),
                    },
                },
                "metadata": object(&[], json!({
                    "icono": nullable("string"),
                    "color": nullable("string"),
                    "imagen_preview": nullable("string"),
                })),
            })),
            "created_at": typed("date"),
            "expireAt": expiry("TTL: removed after 90 days"),
        }),
    );
    CollectionSpec::hybrid("notification_payload", "notificacion", "notificacion_id", schema)
        .index(IndexSpec::ttl())
        .index(IndexSpec::on(&[("created_at", -1)]))
}

fn feedback_details() -> CollectionSpec {
    let schema = object(
        &["feedback_id"],
        json!({
            "feedback_id": foreign_id("feedback"),
            "adjuntos": array_of(object(&["tipo", "nombre"], json!({
                "tipo": one_of(&["SCREENSHOT", "VIDEO", "LOG", "DOCUMENTO", "OTRO"]),
                "nombre": typed("string"),
                "url": nullable("string"),
                "contenido": nullable("string"),
                "size_bytes": nullable("long"),
                "mime_type": nullable("string"),
            }))),
            "metadata_navegador": object(&[], json!({
                "user_agent": typed("string"),
                "resolucion": typed("string"),
                "navegador": typed("string"),
                "version_navegador": typed("string"),
                "sistema_operativo": typed("string"),
                "idioma": typed("string"),
            })),
            "reproduccion_bug": {
                "bsonType": ["object", "null"],
                "properties": {
                    "pasos": array_of(typed("string")),
                    "esperado": typed("string"),
                    "obtenido": typed("string"),
                    "frecuencia": one_of(&["SIEMPRE", "A_VECES", "RARA_VEZ"]),
                },
            },
            "datos_tecnicos": object(&[], json!({
                "api_version": nullable("string"),
                "endpoint_afectado": nullable("string"),
                "errores_consola": array_of(typed("string")),
                "network_tab": array_of(object(&[], json!({
                    "url": typed("string"),
                    "method": typed("string"),
                    "status": typed("int"),
                    "duration_ms": typed("int"),
                }))),
            })),
            "created_at": typed("date"),
        }),
    );
    CollectionSpec::hybrid("feedback_details", "feedback", "feedback_id", schema)
        .index(IndexSpec::on(&[("created_at", -1)]))
        .index(IndexSpec::on(&[("metadata_navegador.navegador", 1)]))
        .index(IndexSpec::on(&[("metadata_navegador.sistema_operativo", 1)]))
}

fn api_metrics() -> CollectionSpec {
    CollectionSpec {
        name: "api_metrics",
        kind: CollectionKind::TimeSeries,
        validator: None,
        timeseries: Some(TimeSeriesOptions {
            time_field: "timestamp",
            meta_field: "metadata",
            granularity: "minutes",
        }),
        expire_after_seconds: Some(METRICS_RETENTION_SECS),
        indexes: vec![
            IndexSpec::on(&[("metadata.api_id", 1), ("timestamp", -1)]),
            IndexSpec::on(&[("metadata.endpoint", 1), ("timestamp", -1)]),
            IndexSpec::on(&[("metadata.status_code", 1), ("timestamp", -1)]),
        ],
    }
}

fn system_logs() -> CollectionSpec {
    let schema = object(
        &["timestamp", "level", "message"],
        json!({
            "timestamp": typed("date"),
            "level": one_of(&["DEBUG", "INFO", "WARN", "ERROR", "FATAL"]),
            "message": typed("string"),
            "logger": typed("string"),
            "thread": typed("string"),
            "context": typed("object"),
            "stack_trace": nullable("string"),
            "usuario_id": nullable("long"),
            "request_id": nullable("string"),
            "expireAt": expiry("TTL: logs removed after 30 days"),
        }),
    );
    CollectionSpec {
        name: "system_logs",
        kind: CollectionKind::Standalone,
        validator: Some(schema),
        timeseries: None,
        expire_after_seconds: None,
        indexes: vec![
            IndexSpec::ttl(),
            IndexSpec::on(&[("timestamp", -1)]),
            IndexSpec::on(&[("level", 1), ("timestamp", -1)]),
            IndexSpec::on(&[("usuario_id", 1), ("timestamp", -1)]),
            IndexSpec::on(&[("request_id", 1)]),
        ],
    }
}

/// All portal collections, hybrid ones first, in provisioning order.
pub fn collections() -> Vec<CollectionSpec> {
    vec![
        test_case_config(),
        test_log_detalle(),
        mock_server_config(),
        file_metadata(),
        audit_snapshots(),
        chatbot_messages(),
        notification_payload(),
        feedback_details(),
        api_metrics(),
        system_logs(),
    ]
}

pub fn collection(name: &str) -> Option<CollectionSpec> {
    collections().into_iter().find(|c| c.name == name)
}
