use minijinja::{AutoEscape, Environment, context};

use super::collections::{CollectionKind, CollectionSpec};
use crate::error::RenderError;

fn compact(value: &impl serde::Serialize, what: &'static str) -> Result<String, RenderError> {
    serde_json::to_string(value).map_err(|source| RenderError::Serialize { what, source })
}

/// Emit a mongosh script creating every collection and its indexes.
///
/// With `database` set, the script switches to it first.
pub fn emit_mongosh(
    collections: &[CollectionSpec],
    database: Option<&str>,
) -> Result<String, RenderError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_auto_escape_callback(|_| AutoEscape::None);
    env.add_template("schemas.js.j2", include_str!("../../templates/schemas.js.j2"))?;
    let tmpl = env.get_template("schemas.js.j2")?;

    let mut ctx = Vec::with_capacity(collections.len());
    for c in collections {
        let (sql_table, foreign_key) = match c.kind {
            CollectionKind::Hybrid {
                sql_table,
                foreign_key,
            } => (Some(sql_table), Some(foreign_key)),
            _ => (None, None),
        };

        let mut indexes = Vec::with_capacity(c.indexes.len());
        for index in &c.indexes {
            let keys = compact(&index.keys, "index keys")?;
            let options = match index.options() {
                Some(o) => Some(compact(&o, "index options")?),
                None => None,
            };
            indexes.push(context! { keys => keys, options => options });
        }

        let options = compact(&c.create_options(), "collection options")?;
        ctx.push(context! {
            name => c.name,
            sql_table => sql_table,
            foreign_key => foreign_key,
            options => options,
            indexes => indexes,
        });
    }

    // Quoted as a JS string literal
    let database = match database {
        Some(name) => Some(compact(&name, "database name")?),
        None => None,
    };
    Ok(tmpl.render(context! {
        database => database,
        collections => ctx,
    })?)
}

/// The collection definitions as one pretty-printed JSON array.
pub fn emit_json(collections: &[CollectionSpec]) -> Result<String, RenderError> {
    serde_json::to_string_pretty(collections).map_err(|source| RenderError::Serialize {
        what: "collections",
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::collection;

    #[test]
    fn test_script_creates_collection_and_indexes() {
        let spec = collection("feedback_details").unwrap();
        let script = emit_mongosh(&[spec], None).unwrap();
        assert!(script.contains(r#"db.createCollection("feedback_details", {"validator":{"$jsonSchema":"#));
        assert!(script.contains(r#"db.feedback_details.createIndex({"feedback_id":1}, {"unique":true});"#));
        assert!(script.contains(r#"db.feedback_details.createIndex({"created_at":-1});"#));
        assert!(script.contains("extends SQL table feedback via feedback_id"));
        assert!(script.contains(r#"print("1 collections created");"#));
        assert!(!script.contains("getSiblingDB"));
    }

    #[test]
    fn test_script_selects_database() {
        let spec = collection("system_logs").unwrap();
        let script = emit_mongosh(&[spec], Some("devportal")).unwrap();
        assert!(script.contains(r#"db = db.getSiblingDB("devportal");"#));
        assert!(script.contains(r#"db.system_logs.createIndex({"expireAt":1}, {"expireAfterSeconds":0});"#));
        assert!(!script.contains("extends SQL table"));
    }

    #[test]
    fn test_database_name_is_quoted() {
        let spec = collection("system_logs").unwrap();
        let script = emit_mongosh(&[spec], Some(r#"dev"portal"#)).unwrap();
        assert!(script.contains(r#"db = db.getSiblingDB("dev\"portal");"#));
    }

    #[test]
    fn test_json_carries_kind() {
        let json = emit_json(&[collection("api_metrics").unwrap()]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["kind"], "time_series");
        assert_eq!(value[0]["timeseries"]["timeField"], "timestamp");
        assert_eq!(value[0]["expireAfterSeconds"], 7_776_000);
    }
}
