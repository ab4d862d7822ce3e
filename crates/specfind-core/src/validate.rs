//! Payload validation.
//!
//! A guessed URL returning `200 OK` with some JSON is common; it is only an
//! API description when it carries one of the marker keys `openapi`,
//! `swagger` or `paths` at the top level with a present value.

use serde::Serialize;
use serde_json::Value;

/// Top-level keys that identify an API description.
pub const MARKER_KEYS: [&str; 3] = ["openapi", "swagger", "paths"];

/// Whether `value` is an OpenAPI/Swagger document.
///
/// A marker key counts only when its value is present: `null`, `false`, an
/// empty string and numeric zero are treated as absent.
///
/// ```rust
/// use serde_json::json;
/// use specfind_core::validate::is_api_description;
///
/// assert!(is_api_description(&json!({"openapi": "3.0.0", "paths": {}})));
/// assert!(!is_api_description(&json!({"hello": "world"})));
/// assert!(!is_api_description(&json!({"swagger": ""})));
/// ```
#[must_use]
pub fn is_api_description(value: &Value) -> bool {
    value.as_object().is_some_and(|object| {
        MARKER_KEYS
            .iter()
            .filter_map(|key| object.get(*key))
            .any(is_present)
    })
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() > 0.0),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Parse `body` as JSON and keep it only if it is an API description.
#[must_use]
pub fn parse_api_description(body: &str) -> Option<Value> {
    let value: Value = serde_json::from_str(body).ok()?;
    is_api_description(&value).then_some(value)
}

/// Headline facts about a discovered document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpecSummary {
    /// `info.title`, when present.
    pub title: Option<String>,
    /// `info.version`, when present.
    pub version: Option<String>,
    /// `OpenAPI 3.x.y`, `Swagger 2.0` or `unknown`.
    pub dialect: String,
    /// Number of entries under `paths`.
    pub path_count: usize,
}

impl SpecSummary {
    /// Extract the summary from a parsed document.
    #[must_use]
    pub fn from_value(value: &Value) -> Self {
        let info = value.get("info");
        let text = |field: &str| {
            info.and_then(|i| i.get(field))
                .and_then(Value::as_str)
                .map(str::to_string)
        };

        let dialect = if let Some(openapi) = value.get("openapi").and_then(Value::as_str) {
            format!("OpenAPI {openapi}")
        } else if let Some(swagger) = value.get("swagger").and_then(Value::as_str) {
            format!("Swagger {swagger}")
        } else {
            "unknown".to_string()
        };

        Self {
            title: text("title"),
            version: text("version"),
            dialect,
            path_count: value
                .get("paths")
                .and_then(Value::as_object)
                .map_or(0, serde_json::Map::len),
        }
    }
}
