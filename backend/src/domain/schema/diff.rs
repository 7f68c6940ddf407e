//! Classification of differences between two schema snapshots.

use std::collections::HashSet;

use serde::Serialize;

use super::{NormalizedSchema, SchemaTable};

const FIELDS_CHANGED: &str = "Fields changed";

/// How a named entity differs between the left and right snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffStatus {
    /// Present only on the right.
    Added,
    /// Present only on the left.
    Removed,
    /// Present on both sides with different content.
    Changed,
    /// Present on both sides with identical content.
    Unchanged,
}

/// One classified table, index or function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiffItem {
    /// Table name, `table.index` pair or function identifier.
    pub name: String,
    /// Classification.
    pub status: DiffStatus,
    /// Optional free-text explanation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl DiffItem {
    fn new(name: impl Into<String>, status: DiffStatus) -> Self {
        Self {
            name: name.into(),
            status,
            detail: None,
        }
    }

    fn index(table: &str, index: &str, status: DiffStatus) -> Self {
        Self::new(format!("{table}.{index}"), status)
    }

    /// Whether the item represents a change.
    #[must_use]
    pub fn is_change(&self) -> bool {
        self.status != DiffStatus::Unchanged
    }
}

/// Number of non-`unchanged` items per list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ChangeCounts {
    /// Changed tables.
    pub tables: usize,
    /// Changed indexes.
    pub indexes: usize,
    /// Changed functions.
    pub functions: usize,
}

/// Result of [`diff_schemas`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SchemaDiff {
    /// Table classifications.
    pub tables: Vec<DiffItem>,
    /// Index classifications, named `table.index`.
    pub indexes: Vec<DiffItem>,
    /// Function classifications.
    pub functions: Vec<DiffItem>,
}

impl SchemaDiff {
    /// Count the changes in each list.
    #[must_use]
    pub fn change_count(&self) -> ChangeCounts {
        let count = |items: &[DiffItem]| items.iter().filter(|item| item.is_change()).count();
        ChangeCounts {
            tables: count(&self.tables),
            indexes: count(&self.indexes),
            functions: count(&self.functions),
        }
    }
}

/// Compare two schema snapshots.
///
/// Tables added on the right come first (with each of their indexes reported
/// as added), then tables removed from the left (indexes reported as
/// removed), then tables present on both sides in left order. A shared table
/// is `changed` when its field lists differ, including by order alone. Its
/// indexes are reported as added, then unchanged, then removed. Functions
/// follow the same order and are never `changed`.
///
/// # Examples
/// ```
/// use studio::domain::schema::{DiffStatus, diff_schemas, parse_schema};
///
/// let left = parse_schema(r#"{"tables":[{"name":"users"}],"functions":["users:get"]}"#);
/// let right = parse_schema(r#"{"tables":[{"name":"users"}],"functions":["users:get","users:list"]}"#);
/// let diff = diff_schemas(&left, &right);
/// assert_eq!(diff.functions[0].name, "users:list");
/// assert_eq!(diff.functions[0].status, DiffStatus::Added);
/// assert_eq!(diff.tables[0].status, DiffStatus::Unchanged);
/// ```
#[must_use]
pub fn diff_schemas(left: &NormalizedSchema, right: &NormalizedSchema) -> SchemaDiff {
    let mut diff = SchemaDiff::default();

    for table in right.tables.iter().filter(|t| left.table(&t.name).is_none()) {
        push_whole_table(&mut diff, table, DiffStatus::Added);
    }
    for table in left.tables.iter().filter(|t| right.table(&t.name).is_none()) {
        push_whole_table(&mut diff, table, DiffStatus::Removed);
    }
    for left_table in &left.tables {
        if let Some(right_table) = right.table(&left_table.name) {
            push_shared_table(&mut diff, left_table, right_table);
        }
    }

    diff.functions = classify(&left.functions, &right.functions)
        .map(|(name, status)| DiffItem::new(name, status))
        .collect();
    diff
}

fn push_whole_table(diff: &mut SchemaDiff, table: &SchemaTable, status: DiffStatus) {
    diff.tables.push(DiffItem::new(table.name.as_str(), status));
    diff.indexes.extend(
        table
            .indexes
            .iter()
            .map(|index| DiffItem::index(&table.name, index, status)),
    );
}

fn push_shared_table(diff: &mut SchemaDiff, left: &SchemaTable, right: &SchemaTable) {
    let mut item = DiffItem::new(left.name.as_str(), DiffStatus::Unchanged);
    if left.fields != right.fields {
        item.status = DiffStatus::Changed;
        item.detail = Some(FIELDS_CHANGED.to_owned());
    }
    diff.tables.push(item);
    diff.indexes.extend(
        classify(&left.indexes, &right.indexes)
            .map(|(index, status)| DiffItem::index(&left.name, index, status)),
    );
}

/// Set comparison of two name lists: right-only names, then names on both
/// sides, both in right order, then left-only names in left order.
fn classify<'a>(
    left: &'a [String],
    right: &'a [String],
) -> impl Iterator<Item = (&'a str, DiffStatus)> + 'a {
    let left_set: HashSet<&str> = left.iter().map(String::as_str).collect();
    let right_set: HashSet<&str> = right.iter().map(String::as_str).collect();

    let added: Vec<&str> = right
        .iter()
        .map(String::as_str)
        .filter(|name| !left_set.contains(name))
        .collect();
    let unchanged: Vec<&str> = right
        .iter()
        .map(String::as_str)
        .filter(|name| left_set.contains(name))
        .collect();
    let removed: Vec<&str> = left
        .iter()
        .map(String::as_str)
        .filter(|name| !right_set.contains(name))
        .collect();

    added
        .into_iter()
        .map(|name| (name, DiffStatus::Added))
        .chain(unchanged.into_iter().map(|name| (name, DiffStatus::Unchanged)))
        .chain(removed.into_iter().map(|name| (name, DiffStatus::Removed)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::schema::{SchemaField, parse_schema};
    use rstest::{fixture, rstest};

    fn item(name: &str, status: DiffStatus) -> DiffItem {
        DiffItem::new(name, status)
    }

    #[fixture]
    fn left() -> NormalizedSchema {
        parse_schema(
            r#"{"tables":[{"name":"users","fields":{"name":"string"},"indexes":["by_email"]}],
                "functions":["users:get"]}"#,
        )
    }

    #[fixture]
    fn right() -> NormalizedSchema {
        parse_schema(
            r#"{"tables":[{"name":"users","fields":{"name":"string","age":"number"},
                "indexes":["by_email","by_age"]}],"functions":["users:get","users:list"]}"#,
        )
    }

    #[rstest]
    fn worked_example(left: NormalizedSchema, right: NormalizedSchema) {
        let diff = diff_schemas(&left, &right);
        assert_eq!(
            diff.tables,
            vec![DiffItem {
                name: "users".to_owned(),
                status: DiffStatus::Changed,
                detail: Some("Fields changed".to_owned()),
            }]
        );
        assert_eq!(
            diff.indexes,
            vec![
                item("users.by_age", DiffStatus::Added),
                item("users.by_email", DiffStatus::Unchanged),
            ]
        );
        assert_eq!(
            diff.functions,
            vec![
                item("users:list", DiffStatus::Added),
                item("users:get", DiffStatus::Unchanged),
            ]
        );
    }

    #[rstest]
    fn identical_schemas_are_unchanged(right: NormalizedSchema) {
        let diff = diff_schemas(&right, &right);
        assert_eq!(diff.tables.len(), right.tables.len());
        assert_eq!(diff.indexes.len(), 2);
        assert_eq!(diff.functions.len(), right.functions.len());
        assert_eq!(diff.change_count(), ChangeCounts::default());
    }

    #[rstest]
    fn added_and_removed_tables_cascade_indexes() {
        let left = parse_schema(r#"{"tables":[{"name":"old","indexes":["by_a","by_b"]}]}"#);
        let right = parse_schema(r#"{"tables":[{"name":"new","indexes":["by_c"]}]}"#);
        let diff = diff_schemas(&left, &right);
        assert_eq!(
            diff.tables,
            vec![item("new", DiffStatus::Added), item("old", DiffStatus::Removed)]
        );
        assert_eq!(
            diff.indexes,
            vec![
                item("new.by_c", DiffStatus::Added),
                item("old.by_a", DiffStatus::Removed),
                item("old.by_b", DiffStatus::Removed),
            ]
        );
    }

    #[rstest]
    fn whole_table_items_precede_shared_tables() {
        let left = parse_schema(r#"{"tables":[{"name":"shared"},{"name":"gone"}]}"#);
        let right = parse_schema(r#"{"tables":[{"name":"shared"},{"name":"fresh"}]}"#);
        let names: Vec<(String, DiffStatus)> = diff_schemas(&left, &right)
            .tables
            .into_iter()
            .map(|item| (item.name, item.status))
            .collect();
        assert_eq!(
            names,
            vec![
                ("fresh".to_owned(), DiffStatus::Added),
                ("gone".to_owned(), DiffStatus::Removed),
                ("shared".to_owned(), DiffStatus::Unchanged),
            ]
        );
    }

    #[rstest]
    fn field_reordering_is_reported_as_changed() {
        let mut left = NormalizedSchema::default();
        let mut table = SchemaTable::named("users");
        table.fields = vec![SchemaField::new("a", "string"), SchemaField::new("b", "number")];
        left.tables.push(table.clone());
        table.fields.reverse();
        let right = NormalizedSchema {
            tables: vec![table],
            functions: Vec::new(),
        };
        let diff = diff_schemas(&left, &right);
        assert_eq!(diff.tables[0].status, DiffStatus::Changed);
    }

    #[rstest]
    fn removed_index_on_shared_table() {
        let left = parse_schema(r#"{"tables":[{"name":"t","indexes":["a","b"]}]}"#);
        let right = parse_schema(r#"{"tables":[{"name":"t","indexes":["b","c"]}]}"#);
        let diff = diff_schemas(&left, &right);
        assert_eq!(
            diff.indexes,
            vec![
                item("t.c", DiffStatus::Added),
                item("t.b", DiffStatus::Unchanged),
                item("t.a", DiffStatus::Removed),
            ]
        );
        assert_eq!(diff.change_count().indexes, 2);
    }

    #[rstest]
    fn every_table_has_exactly_one_presence_status(
        left: NormalizedSchema,
        right: NormalizedSchema,
    ) {
        let mut right = right;
        right.tables.push(SchemaTable::named("posts"));
        let diff = diff_schemas(&left, &right);
        for table in &diff.tables {
            let in_left = left.table(&table.name).is_some();
            let in_right = right.table(&table.name).is_some();
            assert_eq!(table.status == DiffStatus::Added, in_right && !in_left);
            assert_eq!(table.status == DiffStatus::Removed, in_left && !in_right);
        }
        assert_eq!(diff.tables.len(), 2);
    }

    #[rstest]
    fn removed_functions_are_reported() {
        let left = parse_schema(r#"{"functions":["a","b"]}"#);
        let right = parse_schema(r#"{"functions":["b"]}"#);
        assert_eq!(
            diff_schemas(&left, &right).functions,
            vec![item("b", DiffStatus::Unchanged), item("a", DiffStatus::Removed)]
        );
    }

    #[rstest]
    fn removed_names_follow_added_and_unchanged() {
        let left = parse_schema(r#"{"functions":["x","shared","y"]}"#);
        let right = parse_schema(r#"{"functions":["new","shared"]}"#);
        let statuses: Vec<DiffStatus> = diff_schemas(&left, &right)
            .functions
            .into_iter()
            .map(|item| item.status)
            .collect();
        assert_eq!(
            statuses,
            vec![
                DiffStatus::Added,
                DiffStatus::Unchanged,
                DiffStatus::Removed,
                DiffStatus::Removed,
            ]
        );
    }

    #[rstest]
    fn serialises_lowercase_status_without_empty_detail() {
        let json = serde_json::to_value(item("users", DiffStatus::Added)).expect("serialise");
        assert_eq!(json, serde_json::json!({"name": "users", "status": "added"}));
    }
}
