//! In-memory catalog backed by a YAML schema snapshot
//!
//! A snapshot describes tables, their columns in declaration order, their
//! foreign keys and optionally some rows:
//!
//! ```yaml
//! tables:
//!   users:
//!     columns:
//!       - { name: id, type: bigint, nullable: false }
//!       - { name: name, type: varchar(255) }
//!     rows:
//!       - { id: 1, name: Alice }
//!   posts:
//!     columns:
//!       - { name: id, type: bigint }
//!       - { name: user_id, type: bigint }
//!     foreign_keys:
//!       - { column: user_id, references: users.id }
//! ```

use super::Catalog;
use crate::{Column, ForeignKeyConstraint, OptionEntry, Result, ScaffoldError};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;

/// Whole-database snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub tables: IndexMap<String, SnapshotTable>,
}

/// One table of a snapshot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotTable {
    #[serde(default)]
    pub columns: Vec<Column>,

    #[serde(default)]
    pub foreign_keys: Vec<SnapshotForeignKey>,

    #[serde(default)]
    pub rows: Vec<IndexMap<String, serde_json::Value>>,
}

/// Foreign key declared in a snapshot, `references` is `table.column`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotForeignKey {
    #[serde(default)]
    pub name: Option<String>,
    pub column: String,
    pub references: String,
}

impl SchemaSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a table
    pub fn with_table(mut self, name: impl Into<String>, table: SnapshotTable) -> Self {
        self.tables.insert(name.into(), table);
        self
    }

    /// Check that every foreign key points at an existing table and column
    pub fn validate(&self) -> Result<()> {
        for (table_name, table) in &self.tables {
            for fk in &table.foreign_keys {
                if !table.columns.iter().any(|c| c.name == fk.column) {
                    return Err(ScaffoldError::Config(format!(
                        "Foreign key on unknown column {}.{}",
                        table_name, fk.column
                    )));
                }
                let (ref_table, ref_column) = split_reference(&fk.references).ok_or_else(|| {
                    ScaffoldError::Config(format!(
                        "Invalid reference '{}' on {}.{}, expected 'table.column'",
                        fk.references, table_name, fk.column
                    ))
                })?;
                let target = self.tables.get(ref_table).ok_or_else(|| {
                    ScaffoldError::Config(format!(
                        "{}.{} references unknown table '{}'",
                        table_name, fk.column, ref_table
                    ))
                })?;
                if !target.columns.iter().any(|c| c.name == ref_column) {
                    return Err(ScaffoldError::Config(format!(
                        "{}.{} references unknown column '{}.{}'",
                        table_name, fk.column, ref_table, ref_column
                    )));
                }
            }
        }
        Ok(())
    }
}

impl SnapshotTable {
    pub fn new(columns: Vec<Column>) -> Self {
        Self {
            columns,
            ..Self::default()
        }
    }

    /// Declare `column` as referencing `table.referenced_column`
    pub fn with_foreign_key(
        mut self,
        column: impl Into<String>,
        table: &str,
        referenced_column: &str,
    ) -> Self {
        self.foreign_keys.push(SnapshotForeignKey {
            name: None,
            column: column.into(),
            references: format!("{}.{}", table, referenced_column),
        });
        self
    }

    /// Same as `with_foreign_key` with an explicit constraint name
    pub fn with_named_foreign_key(
        mut self,
        name: impl Into<String>,
        column: impl Into<String>,
        table: &str,
        referenced_column: &str,
    ) -> Self {
        self.foreign_keys.push(SnapshotForeignKey {
            name: Some(name.into()),
            column: column.into(),
            references: format!("{}.{}", table, referenced_column),
        });
        self
    }

    /// Append a row given as `(column, value)` pairs
    pub fn with_row(mut self, values: &[(&str, &str)]) -> Self {
        let row = values
            .iter()
            .map(|(k, v)| (k.to_string(), serde_json::Value::String(v.to_string())))
            .collect();
        self.rows.push(row);
        self
    }
}

fn split_reference(reference: &str) -> Option<(&str, &str)> {
    let (table, column) = reference.split_once('.')?;
    if table.is_empty() || column.is_empty() {
        None
    } else {
        Some((table, column))
    }
}

fn value_to_string(value: Option<&serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Order options like `ORDER BY key`: numerically when every key is an
/// integer, as strings otherwise
fn sort_by_key(options: &mut Vec<OptionEntry>) {
    let numeric: Option<Vec<i64>> = options.iter().map(|o| o.key.parse().ok()).collect();
    match numeric {
        Some(keys) => {
            let mut keyed: Vec<(i64, OptionEntry)> =
                keys.into_iter().zip(options.drain(..)).collect();
            keyed.sort_by_key(|(key, _)| *key);
            options.extend(keyed.into_iter().map(|(_, option)| option));
        }
        None => options.sort_by(|a, b| a.key.cmp(&b.key)),
    }
}

/// Catalog over a `SchemaSnapshot`
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalog {
    snapshot: SchemaSnapshot,
}

impl MemoryCatalog {
    pub fn new(snapshot: SchemaSnapshot) -> Self {
        Self { snapshot }
    }

    /// Parse and validate a YAML snapshot
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let snapshot: SchemaSnapshot = serde_yaml::from_str(contents)?;
        snapshot.validate()?;
        Ok(Self::new(snapshot))
    }

    /// Load a YAML snapshot file
    pub async fn from_yaml_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).await.map_err(|e| {
            ScaffoldError::Config(format!(
                "Failed to read schema file '{}': {}",
                path.display(),
                e
            ))
        })?;
        let catalog = Self::from_yaml_str(&contents)?;
        log::debug!(
            "Loaded {} table(s) from {}",
            catalog.snapshot.tables.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn snapshot(&self) -> &SchemaSnapshot {
        &self.snapshot
    }

    fn table(&self, table: &str) -> Result<&SnapshotTable> {
        self.snapshot
            .tables
            .get(table)
            .ok_or_else(|| ScaffoldError::schema_access(table, "table not found in snapshot"))
    }
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let mut tables: Vec<String> = self.snapshot.tables.keys().cloned().collect();
        tables.sort();
        Ok(tables)
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<Column>> {
        Ok(self.table(table)?.columns.clone())
    }

    async fn list_foreign_key_constraints(
        &self,
        table: &str,
        column: &str,
    ) -> Result<Vec<ForeignKeyConstraint>> {
        let mut constraints = Vec::new();
        for fk in self.table(table)?.foreign_keys.iter().filter(|fk| fk.column == column) {
            let (referenced_table, referenced_column) = split_reference(&fk.references)
                .ok_or_else(|| {
                    ScaffoldError::schema_access(
                        table,
                        format!("malformed reference '{}'", fk.references),
                    )
                })?;
            constraints.push(ForeignKeyConstraint {
                name: fk
                    .name
                    .clone()
                    .unwrap_or_else(|| format!("{}_{}_foreign", table, column)),
                table: table.to_string(),
                column: column.to_string(),
                referenced_table: referenced_table.to_string(),
                referenced_column: referenced_column.to_string(),
            });
        }
        constraints.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(constraints)
    }

    async fn fetch_options(
        &self,
        table: &str,
        key_column: &str,
        label_column: &str,
    ) -> Result<Vec<OptionEntry>> {
        let source = self.table(table)?;
        for column in [key_column, label_column] {
            if !source.columns.iter().any(|c| c.name == column) {
                return Err(ScaffoldError::schema_access(
                    table,
                    format!("unknown column '{}'", column),
                ));
            }
        }

        let mut options: Vec<OptionEntry> = source
            .rows
            .iter()
            .map(|row| {
                OptionEntry::new(
                    value_to_string(row.get(key_column)),
                    value_to_string(row.get(label_column)),
                )
            })
            .collect();
        sort_by_key(&mut options);
        Ok(options)
    }

    async fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.snapshot.tables.contains_key(table))
    }
}
