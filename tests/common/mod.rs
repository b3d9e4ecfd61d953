#![allow(dead_code)]

use crud_scaffold::catalog::{MemoryCatalog, SchemaSnapshot, SnapshotTable};
use crud_scaffold::Column;

fn not_null(name: &str, sql_type: &str) -> Column {
    Column::new(name, sql_type, false)
}

fn null(name: &str, sql_type: &str) -> Column {
    Column::new(name, sql_type, true)
}

/// users <- posts <- comments, a self-referencing categories table and an
/// isolated tags table
pub fn blog_snapshot() -> SchemaSnapshot {
    SchemaSnapshot::new()
        .with_table(
            "users",
            SnapshotTable::new(vec![
                not_null("id", "bigint unsigned"),
                not_null("name", "varchar(255)"),
                not_null("email", "varchar(255)"),
                not_null("password", "varchar(255)"),
            ])
            .with_row(&[("id", "2"), ("name", "Bob")])
            .with_row(&[("id", "10"), ("name", "Zed")])
            .with_row(&[("id", "1"), ("name", "Alice")]),
        )
        .with_table(
            "posts",
            SnapshotTable::new(vec![
                not_null("id", "bigint unsigned"),
                not_null("title", "varchar(255)"),
                not_null("body", "text"),
                not_null("user_id", "bigint unsigned"),
                null("created_at", "timestamp"),
            ])
            .with_foreign_key("user_id", "users", "id"),
        )
        .with_table(
            "comments",
            SnapshotTable::new(vec![
                not_null("id", "bigint unsigned"),
                not_null("post_id", "bigint unsigned"),
                null("body", "text"),
            ])
            .with_foreign_key("post_id", "posts", "id"),
        )
        .with_table(
            "tags",
            SnapshotTable::new(vec![
                not_null("id", "bigint unsigned"),
                not_null("label", "varchar(64)"),
            ]),
        )
        .with_table(
            "categories",
            SnapshotTable::new(vec![
                not_null("id", "bigint unsigned"),
                null("parent_id", "bigint unsigned"),
                not_null("name", "varchar(255)"),
                null("deleted_at", "timestamp"),
            ])
            .with_foreign_key("parent_id", "categories", "id"),
        )
}

pub fn blog_catalog() -> MemoryCatalog {
    MemoryCatalog::new(blog_snapshot())
}
