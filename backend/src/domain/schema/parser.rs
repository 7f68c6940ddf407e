//! Tolerant schema text parsing.
//!
//! Parsing never fails: text that is not JSON, or JSON of the wrong shape,
//! yields the empty schema so a partial hand-typed schema simply has nothing
//! to compare.

use std::collections::HashSet;

use serde_json::{Map, Value, json};

use super::{NormalizedSchema, SchemaField, SchemaTable};

const TABLES_KEY: &str = "tables";
const FUNCTIONS_KEY: &str = "functions";
const NON_TABLE_KEYS: [&str; 2] = [FUNCTIONS_KEY, "schemaValidation"];

/// Normalise raw schema text.
///
/// Tables without a string `name` are skipped and the first table with a
/// given name wins. Missing `fields` or `indexes` default to empty. Field
/// types that are not strings are kept as compact JSON text.
///
/// # Examples
/// ```
/// use studio::domain::schema::parse_schema;
///
/// let schema = parse_schema(r#"{"tables":[{"name":"users"}],"functions":["users:get"]}"#);
/// assert_eq!(schema.tables[0].name, "users");
/// assert!(schema.tables[0].fields.is_empty());
/// assert!(parse_schema("{not json").is_empty());
/// ```
#[must_use]
pub fn parse_schema(raw: &str) -> NormalizedSchema {
    let Ok(Value::Object(document)) = serde_json::from_str::<Value>(raw) else {
        return NormalizedSchema::default();
    };
    normalise(&document).unwrap_or_default()
}

fn normalise(document: &Map<String, Value>) -> Option<NormalizedSchema> {
    let tables = match document.get(TABLES_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => parse_tables(entries)?,
        Some(_) => return None,
    };
    let functions = match document.get(FUNCTIONS_KEY) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(entries)) => strings(entries),
        Some(_) => return None,
    };
    Some(NormalizedSchema { tables, functions })
}

fn parse_tables(entries: &[Value]) -> Option<Vec<SchemaTable>> {
    let mut seen = HashSet::new();
    let mut tables = Vec::with_capacity(entries.len());
    for entry in entries {
        let Some(table) = entry.as_object() else {
            continue;
        };
        let Some(name) = table.get("name").and_then(Value::as_str) else {
            continue;
        };
        if !seen.insert(name.to_owned()) {
            continue;
        }
        let fields = match table.get("fields") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Object(fields)) => fields
                .iter()
                .map(|(field, kind)| SchemaField::new(field.as_str(), type_text(kind)))
                .collect(),
            Some(_) => return None,
        };
        let indexes = match table.get("indexes") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(indexes)) => strings(indexes),
            Some(_) => return None,
        };
        tables.push(SchemaTable {
            name: name.to_owned(),
            fields,
            indexes,
        });
    }
    Some(tables)
}

fn strings(values: &[Value]) -> Vec<String> {
    values
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_owned)
        .collect()
}

fn type_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

/// Render a schema in the manual-input format accepted by [`parse_schema`].
///
/// # Examples
/// ```
/// use studio::domain::schema::{parse_schema, serialize_schema};
///
/// let raw = r#"{"tables":[{"name":"users","indexes":["by_email"],"fields":{"email":"string"}}],"functions":[]}"#;
/// let schema = parse_schema(raw);
/// assert_eq!(parse_schema(&serialize_schema(&schema)), schema);
/// ```
#[must_use]
pub fn serialize_schema(schema: &NormalizedSchema) -> String {
    let tables: Vec<Value> = schema
        .tables
        .iter()
        .map(|table| {
            let fields: Map<String, Value> = table
                .fields
                .iter()
                .map(|field| (field.name.clone(), Value::String(field.type_name.clone())))
                .collect();
            json!({
                "name": table.name,
                "indexes": table.indexes,
                "fields": fields,
            })
        })
        .collect();
    json!({ "tables": tables, "functions": schema.functions }).to_string()
}

/// Table names listed by raw schema text.
///
/// A `tables` array contributes the `name` of each entry that has one.
/// Without a `tables` array, every top-level key other than `functions` and
/// `schemaValidation` is taken as a table name. Unparseable text lists
/// nothing.
///
/// # Examples
/// ```
/// use studio::domain::schema::table_names;
///
/// assert_eq!(table_names(r#"{"tables":[{"name":"users"},{"x":1}]}"#), vec!["users"]);
/// assert_eq!(table_names(r#"{"users":{},"functions":[]}"#), vec!["users"]);
/// assert!(table_names("nope").is_empty());
/// ```
#[must_use]
pub fn table_names(raw: &str) -> Vec<String> {
    let Ok(Value::Object(document)) = serde_json::from_str::<Value>(raw) else {
        return Vec::new();
    };
    if let Some(Value::Array(tables)) = document.get(TABLES_KEY) {
        return tables
            .iter()
            .filter_map(|table| table.get("name").and_then(Value::as_str))
            .map(str::to_owned)
            .collect();
    }
    document
        .keys()
        .filter(|key| !NON_TABLE_KEYS.contains(&key.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("{not json")]
    #[case("[]")]
    #[case("42")]
    #[case(r#"{"tables": "users"}"#)]
    #[case(r#"{"tables": [], "functions": {"a": 1}}"#)]
    #[case(r#"{"tables": [{"name": "users", "fields": ["name"]}]}"#)]
    fn malformed_input_yields_empty_schema(#[case] raw: &str) {
        assert_eq!(parse_schema(raw), NormalizedSchema::default());
    }

    #[rstest]
    fn missing_collections_default_to_empty() {
        let schema = parse_schema(r#"{"tables":[{"name":"users"}]}"#);
        assert_eq!(schema.tables, vec![SchemaTable::named("users")]);
        assert!(schema.functions.is_empty());
    }

    #[rstest]
    fn first_duplicate_table_wins() {
        let schema = parse_schema(
            r#"{"tables":[{"name":"users","indexes":["a"]},{"name":"users","indexes":["b"]}]}"#,
        );
        assert_eq!(schema.tables.len(), 1);
        assert_eq!(schema.tables[0].indexes, vec!["a".to_owned()]);
    }

    #[rstest]
    fn field_order_follows_source() {
        let schema = parse_schema(
            r#"{"tables":[{"name":"users","fields":{"zeta":"string","alpha":"number"}}]}"#,
        );
        let names: Vec<&str> = schema.tables[0]
            .fields
            .iter()
            .map(|field| field.name.as_str())
            .collect();
        assert_eq!(names, vec!["zeta", "alpha"]);
    }

    #[rstest]
    fn non_string_field_types_become_json_text() {
        let schema =
            parse_schema(r#"{"tables":[{"name":"users","fields":{"tags":{"type":"array"}}}]}"#);
        assert_eq!(schema.tables[0].fields[0].type_name, r#"{"type":"array"}"#);
    }

    #[rstest]
    fn nameless_tables_are_skipped() {
        let schema = parse_schema(r#"{"tables":[{"fields":{}},"users",{"name":"posts"}]}"#);
        assert_eq!(schema.tables, vec![SchemaTable::named("posts")]);
    }

    #[rstest]
    fn serialise_round_trips_documented_shape() {
        let schema = NormalizedSchema {
            tables: vec![
                SchemaTable {
                    name: "users".to_owned(),
                    fields: vec![
                        SchemaField::new("name", "string"),
                        SchemaField::new("age", "number"),
                    ],
                    indexes: vec!["by_email".to_owned(), "by_age".to_owned()],
                },
                SchemaTable::named("posts"),
            ],
            functions: vec!["users:get".to_owned(), "users:list".to_owned()],
        };
        assert_eq!(parse_schema(&serialize_schema(&schema)), schema);
    }

    #[rstest]
    #[case(r#"{"tables":[{"name":"a"},{"name":"b"}]}"#, &["a", "b"])]
    #[case(r#"{"tables":[{"name":1},null,{"name":"c"}]}"#, &["c"])]
    #[case(r#"{"users":{},"functions":[],"schemaValidation":true,"posts":{}}"#, &["users", "posts"])]
    #[case(r#"["users"]"#, &[])]
    #[case("", &[])]
    fn table_names_follow_document_shape(#[case] raw: &str, #[case] expected: &[&str]) {
        assert_eq!(table_names(raw), expected);
    }
}
