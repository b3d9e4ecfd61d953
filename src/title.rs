//! Title column inference

use crate::catalog::Catalog;
use crate::{Column, Result, ScaffoldError};

/// Pick the display column of `table` for rows keyed by `key_column`
///
/// Returns the column declared right after the key, or the one right before
/// it when the key is last. A single-column table has no candidate and
/// fails with `Inference`.
pub async fn infer_title_column(
    catalog: &dyn Catalog,
    table: &str,
    key_column: &str,
) -> Result<String> {
    let columns = catalog.list_columns(table).await?;
    let title = neighbor_column(&columns, table, key_column)?;
    log::debug!("Title column for {}.{} is '{}'", table, key_column, title);
    Ok(title)
}

/// Positional neighbour of `key_column` within `columns`
pub fn neighbor_column(columns: &[Column], table: &str, key_column: &str) -> Result<String> {
    let index = columns
        .iter()
        .position(|c| c.name == key_column)
        .ok_or_else(|| ScaffoldError::inference(table, key_column, "key column not found"))?;

    columns
        .get(index + 1)
        .or_else(|| index.checked_sub(1).and_then(|prev| columns.get(prev)))
        .map(|c| c.name.clone())
        .ok_or_else(|| {
            ScaffoldError::inference(table, key_column, "table has no column besides the key")
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn columns(names: &[&str]) -> Vec<Column> {
        names.iter().map(|n| Column::new(*n, "varchar(255)", false)).collect()
    }

    #[test]
    fn test_next_column_wins() {
        let cols = columns(&["id", "name", "email"]);
        assert_eq!(neighbor_column(&cols, "users", "id").unwrap(), "name");
        assert_eq!(neighbor_column(&cols, "users", "name").unwrap(), "email");
    }

    #[test]
    fn test_previous_column_when_key_is_last() {
        let cols = columns(&["name", "code"]);
        assert_eq!(neighbor_column(&cols, "countries", "code").unwrap(), "name");
    }

    #[test]
    fn test_single_column_table_is_an_error() {
        let cols = columns(&["id"]);
        let err = neighbor_column(&cols, "ids", "id").unwrap_err();
        assert!(matches!(err, ScaffoldError::Inference { .. }));
    }

    #[test]
    fn test_missing_key_is_an_error() {
        let cols = columns(&["id", "name"]);
        assert!(neighbor_column(&cols, "users", "uuid").is_err());
    }
}
