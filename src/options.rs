//! Option sets for relation-backed selectors

use crate::catalog::Catalog;
use crate::{OptionEntry, Result};

/// Load every row of `table` as a `key => label` option, ascending by key
///
/// No limit is applied: the whole referenced table is read into memory.
pub async fn build_options(
    catalog: &dyn Catalog,
    table: &str,
    key_column: &str,
    title_column: &str,
) -> Result<Vec<OptionEntry>> {
    let options = catalog.fetch_options(table, key_column, title_column).await?;
    log::debug!("Loaded {} option(s) from '{}'", options.len(), table);
    Ok(options)
}

/// Render options as the array literal substituted into the select stub
pub fn options_literal(options: &[OptionEntry]) -> String {
    let items: Vec<String> = options
        .iter()
        .map(|o| format!("'{}'=>'{}'", escape_quoted(&o.key), escape_quoted(&o.label)))
        .collect();
    format!("[{}]", items.join(","))
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}
