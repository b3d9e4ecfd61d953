//! Per-table generation: context loading, rendering and writing

use crate::catalog::Catalog;
use crate::config::{ScaffoldConfig, DEFAULT_LAYOUT};
use crate::naming::{kebab, model_name};
use crate::paths::{controller_path, layout_path, model_path, view_path};
use crate::relations::{infer_relations, RelationSet};
use crate::replacements::ReplacementBuilder;
use crate::resolver::resolve;
use crate::stubs::{render, StubKind, StubLoader};
use crate::{Column, ForeignKeyInfo, Result, ScaffoldError};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// Columns of one generation target, fetched once and discarded with it
#[derive(Debug, Clone, Serialize)]
pub struct TableContext {
    pub table: String,
    pub model_name: String,
    pub columns: Vec<Column>,
}

impl TableContext {
    pub async fn load(catalog: &dyn Catalog, table: &str) -> Result<Self> {
        let columns = catalog.list_columns(table).await?;
        Ok(Self {
            table: table.to_string(),
            model_name: model_name(table),
            columns,
        })
    }

    /// Columns outside the configured unwanted set
    pub fn wanted_columns<'c>(&'c self, config: &'c ScaffoldConfig) -> impl Iterator<Item = &'c Column> {
        self.columns.iter().filter(move |c| !config.is_unwanted(&c.name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

/// Output groups selectable from the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Component {
    Model,
    Controller,
    Views,
}

#[derive(Debug, Clone, Default)]
pub struct GenerateOptions {
    /// Route name overriding the kebab-case plural
    pub route: Option<String>,
    /// Restrict output to one component
    pub only: Option<Component>,
}

impl GenerateOptions {
    fn includes(&self, component: Component) -> bool {
        self.only.map_or(true, |only| only == component)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GeneratedFile {
    /// Relative to the project root
    pub path: PathBuf,
    #[serde(skip)]
    pub contents: String,
    #[serde(skip)]
    pub kind: StubKind,
    /// Never overwritten, even when forced
    pub create_only_if_absent: bool,
}

/// Everything rendered for one table, not yet written
#[derive(Debug, Clone, Serialize)]
pub struct GenerationPlan {
    pub table: String,
    pub model_name: String,
    pub files: Vec<GeneratedFile>,
    /// Non-default layout the views extend; must already exist
    pub required_layout: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WriteOptions {
    pub force: bool,
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Created,
    Overwritten,
    Skipped,
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FileStatus::Created => write!(f, "created"),
            FileStatus::Overwritten => write!(f, "overwritten"),
            FileStatus::Skipped => write!(f, "skipped"),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct WriteReport {
    pub dry_run: bool,
    pub files: Vec<(PathBuf, FileStatus)>,
}

impl WriteReport {
    pub fn count(&self, status: FileStatus) -> usize {
        self.files.iter().filter(|(_, s)| *s == status).count()
    }
}

impl GenerationPlan {
    /// Write the plan under `root`
    ///
    /// Preconditions are checked before anything touches the disk. Existing
    /// files are skipped unless `force` is set; `dry_run` reports the outcome
    /// without writing.
    pub async fn write(&self, root: &Path, options: &WriteOptions) -> Result<WriteReport> {
        if let Some(layout) = &self.required_layout {
            if !root.join(layout).is_file() {
                return Err(ScaffoldError::LayoutNotFound(layout.display().to_string()));
            }
        }

        let mut report = WriteReport {
            dry_run: options.dry_run,
            files: Vec::with_capacity(self.files.len()),
        };

        for file in &self.files {
            let target = root.join(&file.path);
            let exists = tokio::fs::try_exists(&target).await?;

            let status = if exists && (file.create_only_if_absent || !options.force) {
                log::warn!("Skipping existing file: {}", file.path.display());
                FileStatus::Skipped
            } else if exists {
                FileStatus::Overwritten
            } else {
                FileStatus::Created
            };

            if status != FileStatus::Skipped && !options.dry_run {
                if let Some(parent) = target.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(&target, &file.contents).await?;
                log::info!("{} {}", status, file.path.display());
            }
            report.files.push((file.path.clone(), status));
        }

        Ok(report)
    }
}

/// Introspection summary of one table
#[derive(Debug, Clone, Serialize)]
pub struct TableDescription {
    pub table: String,
    pub model_name: String,
    pub columns: Vec<ColumnDescription>,
    pub relations: RelationSet,
}

#[derive(Debug, Clone, Serialize)]
pub struct ColumnDescription {
    #[serde(flatten)]
    pub column: Column,
    pub unwanted: bool,
    pub foreign_key: ForeignKeyInfo,
}

/// Renders model, controller and views for tables of one catalog
pub struct Generator<'a> {
    catalog: &'a dyn Catalog,
    config: ScaffoldConfig,
    stubs: StubLoader,
}

impl<'a> Generator<'a> {
    pub fn new(catalog: &'a dyn Catalog, config: ScaffoldConfig) -> Self {
        let stubs = StubLoader::new(config.stub_path.clone());
        Self {
            catalog,
            config,
            stubs,
        }
    }

    pub fn config(&self) -> &ScaffoldConfig {
        &self.config
    }

    async fn context(&self, table: &str) -> Result<TableContext> {
        if !self.catalog.table_exists(table).await? {
            return Err(ScaffoldError::schema_access(table, "table does not exist"));
        }
        TableContext::load(self.catalog, table).await
    }

    /// Render every file for `table`; nothing is written
    pub async fn generate(&self, table: &str, options: &GenerateOptions) -> Result<GenerationPlan> {
        let ctx = self.context(table).await?;
        log::info!("Generating {} from table '{}'", ctx.model_name, table);

        let builder =
            ReplacementBuilder::new(&self.config, &self.stubs).with_route(options.route.clone());
        let app_dir = &self.config.paths.app;
        let views_dir = &self.config.paths.views;
        let mut files = Vec::new();
        let mut required_layout = None;

        if options.includes(Component::Views) {
            let layout = layout_path(views_dir, &self.config.layout);
            if self.config.layout == DEFAULT_LAYOUT {
                files.push(GeneratedFile {
                    path: layout,
                    contents: self.stubs.load(StubKind::Layout).await?,
                    kind: StubKind::Layout,
                    create_only_if_absent: true,
                });
            } else {
                required_layout = Some(layout);
            }
        }

        if options.includes(Component::Model) {
            let relations =
                infer_relations(self.catalog, table, &ctx.columns, &self.config.model_namespace)
                    .await?;
            let map = builder.model_replacements(&ctx, &relations);
            files.push(GeneratedFile {
                path: model_path(app_dir, &self.config.model_namespace, &ctx.model_name),
                contents: render(&self.stubs.load(StubKind::Model).await?, &map),
                kind: StubKind::Model,
                create_only_if_absent: false,
            });
        }

        if options.includes(Component::Controller) {
            let map = builder.base_replacements(&ctx.model_name);
            files.push(GeneratedFile {
                path: controller_path(app_dir, &self.config.controller_namespace, &ctx.model_name),
                contents: render(&self.stubs.load(StubKind::Controller).await?, &map),
                kind: StubKind::Controller,
                create_only_if_absent: false,
            });
        }

        if options.includes(Component::Views) {
            let map = builder.view_replacements(self.catalog, &ctx).await?;
            let view_dir = kebab(&ctx.model_name);
            for kind in StubKind::VIEWS {
                let Some(view) = kind.view_name() else {
                    continue;
                };
                files.push(GeneratedFile {
                    path: view_path(views_dir, &view_dir, view),
                    contents: render(&self.stubs.load(kind).await?, &map),
                    kind,
                    create_only_if_absent: false,
                });
            }
        }

        Ok(GenerationPlan {
            table: ctx.table,
            model_name: ctx.model_name,
            files,
            required_layout,
        })
    }

    /// Columns, foreign keys and relations of `table`
    pub async fn describe(&self, table: &str) -> Result<TableDescription> {
        let ctx = self.context(table).await?;

        let mut columns = Vec::with_capacity(ctx.columns.len());
        for column in &ctx.columns {
            columns.push(ColumnDescription {
                unwanted: self.config.is_unwanted(&column.name),
                foreign_key: resolve(self.catalog, table, &column.name).await?,
                column: column.clone(),
            });
        }
        let relations =
            infer_relations(self.catalog, table, &ctx.columns, &self.config.model_namespace)
                .await?;

        Ok(TableDescription {
            table: ctx.table,
            model_name: ctx.model_name,
            columns,
            relations,
        })
    }
}
