//! Foreign key resolution

use crate::catalog::Catalog;
use crate::{ForeignKeyInfo, Result};

/// Resolve whether `table.column` is a foreign key
///
/// When several constraints cover the column, the one with the smallest
/// constraint name wins. No constraint is a normal outcome and yields
/// `ForeignKeyInfo::none()`.
pub async fn resolve(catalog: &dyn Catalog, table: &str, column: &str) -> Result<ForeignKeyInfo> {
    let mut constraints = catalog.list_foreign_key_constraints(table, column).await?;
    constraints.sort_by(|a, b| a.name.cmp(&b.name));

    match constraints.into_iter().next() {
        Some(constraint) => {
            log::debug!(
                "{}.{} references {}.{} ({})",
                table,
                column,
                constraint.referenced_table,
                constraint.referenced_column,
                constraint.name
            );
            Ok(ForeignKeyInfo::to(
                constraint.referenced_table,
                constraint.referenced_column,
            ))
        }
        None => Ok(ForeignKeyInfo::none()),
    }
}
