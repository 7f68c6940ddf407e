//! Schema descriptions and schema comparison.
//!
//! Schemas arrive as raw JSON text, either fetched from a deployment or typed
//! in by hand, in the shape:
//!
//! ```json
//! {"tables": [{"name": "users", "indexes": ["by_email"], "fields": {"name": "string"}}],
//!  "functions": ["users:get"]}
//! ```
//!
//! [`parse_schema`] normalises that text and [`diff_schemas`] classifies the
//! differences between two normalised snapshots.

mod diff;
mod parser;

pub use diff::{ChangeCounts, DiffItem, DiffStatus, SchemaDiff, diff_schemas};
pub use parser::{parse_schema, serialize_schema, table_names};

/// One named field and its type description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    /// Field name.
    pub name: String,
    /// Type description, e.g. `string` or a compact JSON validator.
    pub type_name: String,
}

impl SchemaField {
    /// Build a field from its name and type description.
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }
}

/// A table within a [`NormalizedSchema`].
///
/// Fields keep their source order; two tables with the same fields in a
/// different order compare as different.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SchemaTable {
    /// Table name, unique within one schema.
    pub name: String,
    /// Fields in source order.
    pub fields: Vec<SchemaField>,
    /// Index names in source order.
    pub indexes: Vec<String>,
}

impl SchemaTable {
    /// Empty table called `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

/// Tables and functions described by one schema snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedSchema {
    /// Tables in source order.
    pub tables: Vec<SchemaTable>,
    /// Function identifiers in source order.
    pub functions: Vec<String>,
}

impl NormalizedSchema {
    /// Look up a table by name.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&SchemaTable> {
        self.tables.iter().find(|table| table.name == name)
    }

    /// Whether the schema has neither tables nor functions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.functions.is_empty()
    }
}
