//! Config redaction: safe-to-print snapshots with secrets masked.

use serde_json::Value;

use crate::schema::PsychoScoreConfig;

static SECRET_KEYS: &[&str] = &["apiKey", "api_key", "token", "secret", "password"];

/// Serialize the config with every secret replaced by a short hint.
pub fn redact(config: &PsychoScoreConfig) -> Value {
    let value = serde_json::to_value(config).unwrap_or(Value::Null);
    redact_value(&value)
}

/// Redact an arbitrary JSON tree by key name.
pub fn redact_value(value: &Value) -> Value {
    redact_recursive(value, "")
}

fn is_secret_key(key: &str) -> bool {
    SECRET_KEYS.iter().any(|k| k.eq_ignore_ascii_case(key))
}

fn redact_recursive(value: &Value, key: &str) -> Value {
    match value {
        Value::String(s) if is_secret_key(key) && !s.is_empty() => {
            // First 4 chars as a hint for long values only.
            let hint = if s.chars().count() > 8 {
                format!("{}***", s.chars().take(4).collect::<String>())
            } else {
                "***".to_string()
            };
            Value::String(hint)
        }
        Value::Array(arr) => Value::Array(arr.iter().map(|v| redact_recursive(v, key)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), redact_recursive(v, k)))
                .collect(),
        ),
        other => other.clone(),
    }
}
