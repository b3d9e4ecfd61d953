//! Schema and relation type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// A table column as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,

    /// Catalog type, e.g. `bigint unsigned` or `varchar(255)`
    #[serde(rename = "type")]
    pub sql_type: String,

    #[serde(default)]
    pub nullable: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, sql_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            sql_type: sql_type.into(),
            nullable,
        }
    }
}

/// One foreign key constraint row from the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyConstraint {
    /// Constraint name, used as the tie-break key
    pub name: String,
    pub table: String,
    pub column: String,
    pub referenced_table: String,
    pub referenced_column: String,
}

/// Result of resolving a single (table, column) pair
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ForeignKeyInfo {
    pub is_foreign_key: bool,
    pub referenced_table: Option<String>,
    pub referenced_column: Option<String>,
}

impl ForeignKeyInfo {
    /// Plain column, no constraint
    pub fn none() -> Self {
        Self::default()
    }

    /// Foreign key pointing at `table.column`
    pub fn to(table: impl Into<String>, column: impl Into<String>) -> Self {
        Self {
            is_foreign_key: true,
            referenced_table: Some(table.into()),
            referenced_column: Some(column.into()),
        }
    }

    /// Referenced `(table, column)` when this is a foreign key
    pub fn target(&self) -> Option<(&str, &str)> {
        match (&self.referenced_table, &self.referenced_column) {
            (Some(table), Some(column)) if self.is_foreign_key => {
                Some((table.as_str(), column.as_str()))
            }
            _ => None,
        }
    }
}

/// One choice of a relation-backed selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionEntry {
    pub key: String,
    pub label: String,
}

impl OptionEntry {
    pub fn new(key: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
        }
    }
}

/// Relation kinds, ordered BelongsTo before HasMany
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    BelongsTo,
    HasMany,
}

impl RelationKind {
    /// Name of the relation builder method in the generated model
    pub fn builder(&self) -> &'static str {
        match self {
            RelationKind::BelongsTo => "belongsTo",
            RelationKind::HasMany => "hasMany",
        }
    }

    /// Return type named in the generated doc block
    pub fn return_type(&self) -> &'static str {
        match self {
            RelationKind::BelongsTo => "\\Illuminate\\Database\\Eloquent\\Relations\\BelongsTo",
            RelationKind::HasMany => "\\Illuminate\\Database\\Eloquent\\Relations\\HasMany",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationKind::BelongsTo => f.write_str("belongs_to"),
            RelationKind::HasMany => f.write_str("has_many"),
        }
    }
}

/// A relation derived from one foreign key constraint
///
/// For `BelongsTo`, `foreign_key` lives on `local_table` and `local_key` on
/// `related_table`. For `HasMany`, `foreign_key` lives on `related_table`
/// and `local_key` on `local_table`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelationDeclaration {
    pub kind: RelationKind,
    pub local_table: String,
    pub related_table: String,
    pub local_key: String,
    pub foreign_key: String,

    /// Relation method name in the generated model
    pub method: String,
}
