//! Catalog readers
//!
//! Read-only access to the database catalog. Every call reads current
//! schema state; nothing is cached across generation targets.

mod memory;
mod mysql;

use crate::{Column, ForeignKeyConstraint, OptionEntry, Result};
use async_trait::async_trait;

pub use memory::{MemoryCatalog, SchemaSnapshot, SnapshotForeignKey, SnapshotTable};
pub use mysql::MySqlCatalog;

/// Catalog reader trait for engine-specific implementations
#[async_trait]
pub trait Catalog: Send + Sync {
    /// List all base tables, sorted by name
    async fn list_tables(&self) -> Result<Vec<String>>;

    /// List the columns of `table` in declaration order
    ///
    /// Fails with `SchemaAccess` when the table does not exist.
    async fn list_columns(&self, table: &str) -> Result<Vec<Column>>;

    /// List foreign key constraints declared on `table.column`
    ///
    /// An existing column without constraints yields an empty list; a
    /// missing table fails with `SchemaAccess`.
    async fn list_foreign_key_constraints(
        &self,
        table: &str,
        column: &str,
    ) -> Result<Vec<ForeignKeyConstraint>>;

    /// `SELECT key, label FROM table ORDER BY key`
    async fn fetch_options(
        &self,
        table: &str,
        key_column: &str,
        label_column: &str,
    ) -> Result<Vec<OptionEntry>>;

    /// Check whether `table` exists
    async fn table_exists(&self, table: &str) -> Result<bool> {
        Ok(self.list_tables().await?.iter().any(|t| t == table))
    }
}

/// Create a catalog reader for a database URL
pub async fn connect(database_url: &str) -> Result<Box<dyn Catalog>> {
    if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok(Box::new(MySqlCatalog::connect(database_url).await?))
    } else {
        Err(crate::ScaffoldError::Config(format!(
            "Unsupported database URL '{}'. Supported: MySQL",
            mask_url(database_url)
        )))
    }
}

/// Mask credentials in a database URL for display
pub fn mask_url(database_url: &str) -> String {
    match database_url.split_once("://") {
        Some((protocol, rest)) => match rest.rfind('@') {
            Some(at_pos) => format!("{}://***{}", protocol, &rest[at_pos..]),
            None => format!("{}://{}", protocol, rest),
        },
        None => "***".to_string(),
    }
}
