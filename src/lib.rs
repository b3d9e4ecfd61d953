//! crud-scaffold - schema-driven CRUD scaffolding
//!
//! Introspects a relational table through its catalog, resolves foreign keys,
//! infers reciprocal relations and assembles the token map used to render
//! model, controller and view stubs.
//!
//! # Features
//!
//! - **Catalog abstraction** with a MySQL (`information_schema`) backend and an
//!   in-memory backend loaded from YAML snapshots
//! - **Foreign key resolution** with a deterministic tie-break
//! - **Title column inference** for selection widgets
//! - **Relation inference** (belongs-to / has-many) from constraint metadata
//! - **Replacement maps** over a fixed, closed token set
//!
//! # Example
//!
//! ```rust,no_run
//! use crud_scaffold::{catalog::MemoryCatalog, Generator, ScaffoldConfig};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = MemoryCatalog::from_yaml_file(Path::new("schema.yaml")).await?;
//! let generator = Generator::new(&catalog, ScaffoldConfig::default());
//! let plan = generator.generate("posts", &Default::default()).await?;
//! for file in &plan.files {
//!     println!("{}", file.path.display());
//! }
//! # Ok(())
//! # }
//! ```

use thiserror::Error;

pub mod catalog;
pub mod config;
pub mod generator;
pub mod naming;
pub mod options;
pub mod paths;
pub mod relations;
pub mod replacements;
pub mod resolver;
pub mod stubs;
pub mod title;
pub mod types;

pub use catalog::Catalog;
pub use config::ScaffoldConfig;
pub use generator::{
    Component, FileStatus, GenerateOptions, GeneratedFile, GenerationPlan, Generator,
    TableContext, TableDescription, WriteOptions, WriteReport,
};
pub use replacements::{FieldKind, ReplacementBuilder, ReplacementMap, Token};
pub use stubs::{StubKind, StubLoader};
pub use types::*;

/// Scaffolding errors
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("Schema access error on '{table}': {message}")]
    SchemaAccess { table: String, message: String },

    #[error("Cannot infer title column for {table}.{column}: {message}")]
    Inference {
        table: String,
        column: String,
        message: String,
    },

    #[error("Layout not found: {0}")]
    LayoutNotFound(String),

    #[error("Stub error ({name}): {message}")]
    Stub { name: String, message: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ScaffoldError {
    /// Wrap a catalog failure for `table`
    pub fn schema_access(table: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::SchemaAccess {
            table: table.into(),
            message: message.to_string(),
        }
    }

    /// Title column inference failure for `table.column`
    pub fn inference(
        table: impl Into<String>,
        column: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::Inference {
            table: table.into(),
            column: column.into(),
            message: message.into(),
        }
    }

    /// True for errors raised by the catalog
    pub fn is_schema_access(&self) -> bool {
        matches!(self, Self::SchemaAccess { .. })
    }
}

pub type Result<T> = std::result::Result<T, ScaffoldError>;
