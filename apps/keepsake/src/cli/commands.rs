//! # CLI Command Implementations
//!
//! This module contains the actual implementations of CLI commands.
//!
//! Every command opens the database fresh, performs one operation and
//! syncs; the inspector never holds a database across commands.

use keepsake_core::{KeepsakeError, RedbStore, SettingsStore, Value};
use std::path::Path;

// =============================================================================
// VALUE RENDERING / PARSING
// =============================================================================

/// Render a value for human-readable output.
fn format_value(value: &Value) -> String {
    match value {
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Real(r) => r.to_string(),
        Value::Text(s) => s.clone(),
        Value::List(items) => format!("[{}]", items.join(", ")),
        Value::Blob(bytes) => format!("<blob {} bytes>", bytes.len()),
        Value::Point(x, y) => format!("({x}, {y})"),
        Value::Size(w, h) => format!("{w}x{h}"),
    }
}

/// Parse a command-line value according to its declared kind.
fn parse_value(kind: &str, raw: &str) -> Result<Value, KeepsakeError> {
    match kind {
        "bool" => raw
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| KeepsakeError::DeserializationError(format!("invalid bool '{raw}'"))),
        "int" => raw
            .parse::<i64>()
            .map(Value::Int)
            .map_err(|_| KeepsakeError::DeserializationError(format!("invalid int '{raw}'"))),
        "real" => raw
            .parse::<f64>()
            .map(Value::Real)
            .map_err(|_| KeepsakeError::DeserializationError(format!("invalid real '{raw}'"))),
        "text" => Ok(Value::Text(raw.to_string())),
        _ => Err(KeepsakeError::DeserializationError(format!(
            "unknown kind '{kind}' (expected bool, int, real or text)"
        ))),
    }
}

fn to_json(value: &Value) -> Result<serde_json::Value, KeepsakeError> {
    serde_json::to_value(value).map_err(|e| KeepsakeError::SerializationError(e.to_string()))
}

// =============================================================================
// KEYS COMMAND
// =============================================================================

/// List persisted keys, optionally filtered by prefix.
pub fn cmd_keys(db_path: &Path, json: bool, prefix: Option<&str>) -> Result<(), KeepsakeError> {
    let store = RedbStore::open(db_path)?;
    let entries: Vec<(&str, &Value)> = store
        .entries()
        .filter(|(key, _)| prefix.is_none_or(|p| key.starts_with(p)))
        .collect();

    if json {
        let mut map = serde_json::Map::new();
        for (key, value) in &entries {
            map.insert((*key).to_string(), to_json(value)?);
        }
        let rendered = serde_json::to_string_pretty(&serde_json::Value::Object(map))
            .map_err(|e| KeepsakeError::SerializationError(e.to_string()))?;
        println!("{rendered}");
    } else {
        for (key, value) in &entries {
            println!("{key} = {}", format_value(value));
        }
        tracing::info!("{} entries", entries.len());
    }
    Ok(())
}

// =============================================================================
// GET COMMAND
// =============================================================================

/// Read the entry under one key.
pub fn cmd_get(db_path: &Path, json: bool, key: &str) -> Result<(), KeepsakeError> {
    let store = RedbStore::open(db_path)?;
    let value = store.value(key);

    if json {
        let rendered = match &value {
            Some(v) => to_json(v)?,
            None => serde_json::Value::Null,
        };
        println!(
            "{}",
            serde_json::json!({ "key": key, "value": rendered })
        );
    } else {
        match &value {
            Some(v) => println!("{}", format_value(v)),
            None => println!("(unset)"),
        }
    }
    Ok(())
}

// =============================================================================
// SET COMMAND
// =============================================================================

/// Write one entry and sync.
pub fn cmd_set(
    db_path: &Path,
    json: bool,
    key: &str,
    raw: &str,
    kind: &str,
) -> Result<(), KeepsakeError> {
    let value = parse_value(kind, raw)?;
    let mut store = RedbStore::open(db_path)?;
    store.set_value(key, value.clone());
    store.sync()?;

    if json {
        println!(
            "{}",
            serde_json::json!({ "key": key, "stored": true, "value": to_json(&value)? })
        );
    } else {
        println!("{key} = {}", format_value(&value));
    }
    Ok(())
}

// =============================================================================
// REMOVE COMMAND
// =============================================================================

/// Delete one entry and sync.
pub fn cmd_remove(db_path: &Path, json: bool, key: &str) -> Result<(), KeepsakeError> {
    let mut store = RedbStore::open(db_path)?;
    let removed = store.remove(key);
    store.sync()?;

    if json {
        println!("{}", serde_json::json!({ "key": key, "removed": removed }));
    } else if removed {
        println!("removed {key}");
    } else {
        println!("no entry under '{key}'");
    }
    Ok(())
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_value_by_kind() {
        assert_eq!(parse_value("bool", "true").ok(), Some(Value::Bool(true)));
        assert_eq!(parse_value("int", "-5").ok(), Some(Value::Int(-5)));
        assert_eq!(parse_value("real", "1.5").ok(), Some(Value::Real(1.5)));
        assert_eq!(
            parse_value("text", "plain").ok(),
            Some(Value::Text("plain".into()))
        );
        assert!(parse_value("bool", "maybe").is_err());
        assert!(parse_value("color", "red").is_err());
    }

    #[test]
    fn format_value_is_human_readable() {
        assert_eq!(format_value(&Value::Bool(false)), "false");
        assert_eq!(
            format_value(&Value::List(vec!["a".into(), "b".into()])),
            "[a, b]"
        );
        assert_eq!(format_value(&Value::Blob(vec![1, 2, 3])), "<blob 3 bytes>");
        assert_eq!(format_value(&Value::Point(4, 5)), "(4, 5)");
        assert_eq!(format_value(&Value::Size(800, 600)), "800x600");
    }
}
