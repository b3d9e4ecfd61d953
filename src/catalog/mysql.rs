//! MySQL catalog implementation

use super::Catalog;
use crate::{Column, ForeignKeyConstraint, OptionEntry, Result, ScaffoldError};
use async_trait::async_trait;
use sqlx::{MySql, Pool, Row};

pub struct MySqlCatalog {
    pool: Pool<MySql>,
    db_name: String,
}

impl MySqlCatalog {
    /// Open a single-connection pool; generation issues one query at a time
    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = sqlx::mysql::MySqlPoolOptions::new()
            .max_connections(1)
            .connect(database_url)
            .await
            .map_err(|e| ScaffoldError::schema_access("<connection>", e))?;

        let db_name_row = sqlx::query("SELECT DATABASE() as db_name")
            .fetch_one(&pool)
            .await
            .map_err(|e| ScaffoldError::schema_access("<connection>", e))?;
        let db_name: Option<String> = db_name_row
            .try_get("db_name")
            .map_err(|e| ScaffoldError::schema_access("<connection>", e))?;
        let db_name = db_name.ok_or_else(|| {
            ScaffoldError::schema_access("<connection>", "no database selected in URL")
        })?;

        log::debug!("Connected to MySQL database '{}'", db_name);
        Ok(Self { pool, db_name })
    }

    /// Name of the connected database
    pub fn database_name(&self) -> &str {
        &self.db_name
    }
}

/// Backtick-quote an identifier for interpolation
fn quote_ident(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

#[async_trait]
impl Catalog for MySqlCatalog {
    async fn list_tables(&self) -> Result<Vec<String>> {
        let rows = sqlx::query(
            r#"
            SELECT TABLE_NAME as table_name
            FROM information_schema.tables
            WHERE TABLE_SCHEMA = ? AND TABLE_TYPE = 'BASE TABLE'
            ORDER BY TABLE_NAME
            "#,
        )
        .bind(&self.db_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ScaffoldError::schema_access("<catalog>", e))?;

        let mut tables = Vec::with_capacity(rows.len());
        for row in rows {
            tables.push(
                row.try_get("table_name")
                    .map_err(|e| ScaffoldError::schema_access("<catalog>", e))?,
            );
        }
        Ok(tables)
    }

    async fn list_columns(&self, table: &str) -> Result<Vec<Column>> {
        log::debug!("Listing columns of '{}'", table);
        let rows = sqlx::query(
            r#"
            SELECT
                c.COLUMN_NAME as column_name,
                CAST(c.COLUMN_TYPE AS CHAR) as column_type,
                c.IS_NULLABLE as is_nullable
            FROM information_schema.columns c
            WHERE c.TABLE_NAME = ? AND c.TABLE_SCHEMA = ?
            ORDER BY c.ORDINAL_POSITION
            "#,
        )
        .bind(table)
        .bind(&self.db_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ScaffoldError::schema_access(table, e))?;

        if rows.is_empty() {
            return Err(ScaffoldError::schema_access(
                table,
                format!("table not found in database '{}'", self.db_name),
            ));
        }

        let mut columns = Vec::with_capacity(rows.len());
        for row in rows {
            let is_nullable: String = row
                .try_get("is_nullable")
                .map_err(|e| ScaffoldError::schema_access(table, e))?;
            columns.push(Column {
                name: row
                    .try_get("column_name")
                    .map_err(|e| ScaffoldError::schema_access(table, e))?,
                sql_type: row
                    .try_get("column_type")
                    .map_err(|e| ScaffoldError::schema_access(table, e))?,
                nullable: is_nullable == "YES",
            });
        }
        Ok(columns)
    }

    async fn list_foreign_key_constraints(
        &self,
        table: &str,
        column: &str,
    ) -> Result<Vec<ForeignKeyConstraint>> {
        let rows = sqlx::query(
            r#"
            SELECT
                kcu.CONSTRAINT_NAME as constraint_name,
                kcu.REFERENCED_TABLE_NAME as referenced_table_name,
                kcu.REFERENCED_COLUMN_NAME as referenced_column_name
            FROM information_schema.key_column_usage kcu
            WHERE kcu.TABLE_SCHEMA = ?
                AND kcu.TABLE_NAME = ?
                AND kcu.COLUMN_NAME = ?
                AND kcu.REFERENCED_TABLE_NAME IS NOT NULL
            ORDER BY kcu.CONSTRAINT_NAME
            "#,
        )
        .bind(&self.db_name)
        .bind(table)
        .bind(column)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| ScaffoldError::schema_access(table, e))?;

        if rows.is_empty() && !self.table_exists(table).await? {
            return Err(ScaffoldError::schema_access(
                table,
                format!("table not found in database '{}'", self.db_name),
            ));
        }

        let mut constraints = Vec::with_capacity(rows.len());
        for row in rows {
            constraints.push(ForeignKeyConstraint {
                name: row
                    .try_get("constraint_name")
                    .map_err(|e| ScaffoldError::schema_access(table, e))?,
                table: table.to_string(),
                column: column.to_string(),
                referenced_table: row
                    .try_get("referenced_table_name")
                    .map_err(|e| ScaffoldError::schema_access(table, e))?,
                referenced_column: row
                    .try_get("referenced_column_name")
                    .map_err(|e| ScaffoldError::schema_access(table, e))?,
            });
        }
        Ok(constraints)
    }

    async fn fetch_options(
        &self,
        table: &str,
        key_column: &str,
        label_column: &str,
    ) -> Result<Vec<OptionEntry>> {
        let query = format!(
            "SELECT CAST({key} AS CHAR) as option_key, CAST({label} AS CHAR) as option_label FROM {table} ORDER BY {key}",
            key = quote_ident(key_column),
            label = quote_ident(label_column),
            table = quote_ident(table),
        );
        log::debug!("Fetching options: {}", query);

        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| ScaffoldError::schema_access(table, e))?;

        let mut options = Vec::with_capacity(rows.len());
        for row in rows {
            let key: Option<String> = row
                .try_get("option_key")
                .map_err(|e| ScaffoldError::schema_access(table, e))?;
            let label: Option<String> = row
                .try_get("option_label")
                .map_err(|e| ScaffoldError::schema_access(table, e))?;
            options.push(OptionEntry::new(
                key.unwrap_or_default(),
                label.unwrap_or_default(),
            ));
        }
        Ok(options)
    }

    async fn table_exists(&self, table: &str) -> Result<bool> {
        let row = sqlx::query(
            r#"
            SELECT COUNT(*) as table_count
            FROM information_schema.tables
            WHERE TABLE_SCHEMA = ? AND TABLE_NAME = ?
            "#,
        )
        .bind(&self.db_name)
        .bind(table)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| ScaffoldError::schema_access(table, e))?;

        let count: i64 = row
            .try_get("table_count")
            .map_err(|e| ScaffoldError::schema_access(table, e))?;
        Ok(count > 0)
    }
}
