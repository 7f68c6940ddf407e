//! Remote table documents and the paginated query envelope.
//!
//! Documents have no fixed shape. Each is kept as an ordered JSON object
//! with a mandatory string `_id`; the column set of a page is the union of
//! the keys of its documents.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, SecondsFormat};
use pagination::Page;
use serde::Serialize;
use serde_json::{Map, Number, Value};

/// Key holding the document identity.
pub const ID_FIELD: &str = "_id";

/// Epoch-millisecond range rendered as timestamps.
const TIMESTAMP_MS_RANGE: (f64, f64) = (1_000_000_000_000.0, 2_000_000_000_000.0);

/// One page of remote documents.
pub type DocumentPage = Page<DocumentRecord>;

/// A remote document with a string identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DocumentRecord(Map<String, Value>);

impl DocumentRecord {
    /// Accept `value` only when it is an object with a string `_id`.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(fields) if fields.get(ID_FIELD).is_some_and(Value::is_string) => {
                Some(Self(fields))
            }
            _ => None,
        }
    }

    /// Document identity.
    #[must_use]
    pub fn id(&self) -> &str {
        self.0.get(ID_FIELD).and_then(Value::as_str).unwrap_or_default()
    }

    /// Raw value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Keys in source order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Rendered cell for `key`; absent keys render as `null`.
    #[must_use]
    pub fn cell(&self, key: &str) -> String {
        self.0
            .get(key)
            .map_or_else(|| CellValue::Null.to_string(), format_cell)
    }

    /// Rendered cells for `columns`, in column order.
    #[must_use]
    pub fn cells(&self, columns: &[String]) -> Vec<String> {
        columns.iter().map(|column| self.cell(column)).collect()
    }

    /// Pretty-printed JSON for copying a whole row.
    #[must_use]
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(&self.0).unwrap_or_default()
    }
}

/// Display form of a single document value.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// JSON null or an absent key.
    Null,
    /// String value, shown verbatim.
    String(String),
    /// Numeric value.
    Number(Number),
    /// Boolean value.
    Boolean(bool),
    /// Array or object rendered as compact JSON.
    Text(String),
}

impl CellValue {
    /// Classify a JSON value.
    #[must_use]
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::String(text) => Self::String(text.clone()),
            Value::Number(number) => Self::Number(number.clone()),
            Value::Bool(flag) => Self::Boolean(*flag),
            nested @ (Value::Array(_) | Value::Object(_)) => Self::Text(nested.to_string()),
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::String(text) | Self::Text(text) => f.write_str(text),
            Self::Number(number) => match as_timestamp(number) {
                Some(timestamp) => f.write_str(&timestamp),
                None => write!(f, "{number}"),
            },
            Self::Boolean(flag) => write!(f, "{flag}"),
        }
    }
}

fn as_timestamp(number: &Number) -> Option<String> {
    let value = number.as_f64()?;
    let (low, high) = TIMESTAMP_MS_RANGE;
    if value <= low || value >= high {
        return None;
    }
    DateTime::from_timestamp_millis(whole_millis(number)?)
        .map(|timestamp| timestamp.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Integral part of a millisecond count; fractions are truncated.
fn whole_millis(number: &Number) -> Option<i64> {
    number.as_i64().or_else(|| {
        let text = number.to_string();
        text.split_once('.')
            .map_or(text.as_str(), |(whole, _)| whole)
            .parse()
            .ok()
    })
}

/// Render a JSON value for a table cell.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use studio::domain::format_cell;
///
/// assert_eq!(format_cell(&json!(null)), "null");
/// assert_eq!(format_cell(&json!(42)), "42");
/// assert_eq!(format_cell(&json!(1_700_000_000_000_i64)), "2023-11-14T22:13:20.000Z");
/// assert_eq!(format_cell(&json!({"a": [1]})), r#"{"a":[1]}"#);
/// ```
#[must_use]
pub fn format_cell(value: &Value) -> String {
    CellValue::from_json(value).to_string()
}

/// Union of keys across `documents`, in first-seen order.
#[must_use]
pub fn column_union(documents: &[DocumentRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    documents
        .iter()
        .flat_map(DocumentRecord::keys)
        .filter(|key| seen.insert(*key))
        .map(str::to_owned)
        .collect()
}

/// Parse a paginated query response body.
///
/// One `value` wrapper is unwrapped when present. Entries of `page` that are
/// not objects with a string `_id` are dropped. `has_more` is true only when
/// `isDone` is literally `false`. Unparseable bodies yield an empty page.
///
/// # Examples
/// ```
/// use studio::domain::parse_documents_response;
///
/// let page = parse_documents_response(
///     r#"{"value":{"page":[{"_id":"a"}],"continueCursor":"c1","isDone":false}}"#,
/// );
/// assert_eq!(page.items[0].id(), "a");
/// assert_eq!(page.cursor.as_deref(), Some("c1"));
/// assert!(page.has_more);
/// ```
#[must_use]
pub fn parse_documents_response(raw: &str) -> DocumentPage {
    let Ok(Value::Object(envelope)) = serde_json::from_str::<Value>(raw) else {
        return Page::empty();
    };
    let body = match envelope.get("value") {
        Some(Value::Object(inner)) => inner,
        Some(Value::Array(_)) => return Page::empty(),
        _ => &envelope,
    };

    let documents = match body.get("page") {
        Some(Value::Array(entries)) => entries
            .iter()
            .cloned()
            .filter_map(DocumentRecord::from_value)
            .collect(),
        _ => Vec::new(),
    };
    let cursor = body
        .get("continueCursor")
        .and_then(Value::as_str)
        .map(str::to_owned);
    let has_more = matches!(body.get("isDone"), Some(Value::Bool(false)));
    Page::new(documents, cursor, has_more)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn record(value: Value) -> DocumentRecord {
        DocumentRecord::from_value(value).expect("valid document")
    }

    #[rstest]
    fn unwraps_value_envelope() {
        let page = parse_documents_response(
            r#"{"status":"success","value":{"page":[{"_id":"a"}],"continueCursor":"c1","isDone":false}}"#,
        );
        assert_eq!(page.items, vec![record(json!({"_id": "a"}))]);
        assert_eq!(page.cursor.as_deref(), Some("c1"));
        assert!(page.has_more);
    }

    #[rstest]
    fn reads_unwrapped_body() {
        let page = parse_documents_response(
            r#"{"page":[{"_id":"a"},{"_id":"b"}],"continueCursor":null,"isDone":true}"#,
        );
        assert_eq!(page.items.len(), 2);
        assert!(page.cursor.is_none());
        assert!(!page.has_more);
    }

    #[rstest]
    #[case(r#"{"page":[],"isDone":"false"}"#)]
    #[case(r#"{"page":[]}"#)]
    #[case(r#"{"page":[],"isDone":null}"#)]
    fn only_literal_false_means_more(#[case] raw: &str) {
        assert!(!parse_documents_response(raw).has_more);
    }

    #[rstest]
    fn drops_malformed_documents() {
        let page = parse_documents_response(
            r#"{"page":[{"_id":"a"},{"_id":7},{"name":"x"},"str",null,[1],{"_id":"b"}],"isDone":true}"#,
        );
        let ids: Vec<&str> = page.items.iter().map(DocumentRecord::id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[rstest]
    #[case("")]
    #[case("not json")]
    #[case("null")]
    #[case("[1,2]")]
    #[case(r#"{"value":[1]}"#)]
    fn malformed_bodies_yield_empty_page(#[case] raw: &str) {
        assert_eq!(parse_documents_response(raw), Page::empty());
    }

    #[rstest]
    fn columns_follow_first_seen_order() {
        let documents = vec![
            record(json!({"_id": "a", "name": "x"})),
            record(json!({"_id": "b", "age": 3, "name": "y"})),
        ];
        assert_eq!(column_union(&documents), vec!["_id", "name", "age"]);
    }

    #[rstest]
    #[case(json!(null), "null")]
    #[case(json!("text"), "text")]
    #[case(json!(true), "true")]
    #[case(json!(12.5), "12.5")]
    #[case(json!(1_000_000_000_000_i64), "1000000000000")]
    #[case(json!(1_700_000_000_000_i64), "2023-11-14T22:13:20.000Z")]
    #[case(json!(1_700_000_000_123.75), "2023-11-14T22:13:20.123Z")]
    #[case(json!([1, "a"]), r#"[1,"a"]"#)]
    fn formats_cells(#[case] value: Value, #[case] expected: &str) {
        assert_eq!(format_cell(&value), expected);
    }

    #[rstest]
    fn absent_cells_render_null() {
        let document = record(json!({"_id": "a"}));
        assert_eq!(document.cell("missing"), "null");
    }

    #[rstest]
    fn cells_follow_column_order() {
        let document = record(json!({"_id": "a", "tags": ["x"], "score": 3}));
        let columns = ["score", "_id", "missing", "tags"].map(str::to_owned);
        assert_eq!(document.cells(&columns), vec!["3", "a", "null", r#"["x"]"#]);
    }

    #[rstest]
    fn pretty_json_keeps_key_order() {
        let document = record(json!({"_id": "a", "zeta": 1, "alpha": 2}));
        let pretty = document.to_pretty_json();
        let zeta = pretty.find("zeta").expect("zeta present");
        let alpha = pretty.find("alpha").expect("alpha present");
        assert!(zeta < alpha);
    }
}
