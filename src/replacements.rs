//! Token maps substituted into stubs
//!
//! The token set is closed: every [`ReplacementMap`] carries all of them,
//! with an empty string for the ones a given stub does not use.

use crate::catalog::Catalog;
use crate::config::ScaffoldConfig;
use crate::generator::TableContext;
use crate::naming::{camel, kebab, plural, snake, title, ucfirst};
use crate::options::{build_options, options_literal};
use crate::relations::RelationSet;
use crate::resolver::resolve;
use crate::stubs::{render, StubKind, StubLoader};
use crate::title::infer_title_column;
use crate::{Column, Result};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Column marking soft-deletable models
pub const SOFT_DELETE_COLUMN: &str = "deleted_at";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Token {
    Layout,
    ModelName,
    ModelTitle,
    ModelNamespace,
    ControllerNamespace,
    ModelNamePluralLowerCase,
    ModelNamePluralUpperCase,
    ModelNameLowerCase,
    ModelRoute,
    ModelView,
    Fillable,
    Rules,
    Relations,
    Properties,
    SoftDeletesNamespace,
    SoftDeletes,
    Title,
    Column,
    Options,
    TableHeader,
    TableBody,
    ViewRows,
    Form,
}

impl Token {
    /// Substitution order
    pub const ALL: [Token; 23] = [
        Token::Layout,
        Token::ModelName,
        Token::ModelTitle,
        Token::ModelNamespace,
        Token::ControllerNamespace,
        Token::ModelNamePluralLowerCase,
        Token::ModelNamePluralUpperCase,
        Token::ModelNameLowerCase,
        Token::ModelRoute,
        Token::ModelView,
        Token::Fillable,
        Token::Rules,
        Token::Relations,
        Token::Properties,
        Token::SoftDeletesNamespace,
        Token::SoftDeletes,
        Token::Title,
        Token::Column,
        Token::Options,
        Token::TableHeader,
        Token::TableBody,
        Token::ViewRows,
        Token::Form,
    ];

    /// Literal placeholder as it appears in stubs
    pub fn as_str(self) -> &'static str {
        match self {
            Token::Layout => "{{layout}}",
            Token::ModelName => "{{modelName}}",
            Token::ModelTitle => "{{modelTitle}}",
            Token::ModelNamespace => "{{modelNamespace}}",
            Token::ControllerNamespace => "{{controllerNamespace}}",
            Token::ModelNamePluralLowerCase => "{{modelNamePluralLowerCase}}",
            Token::ModelNamePluralUpperCase => "{{modelNamePluralUpperCase}}",
            Token::ModelNameLowerCase => "{{modelNameLowerCase}}",
            Token::ModelRoute => "{{modelRoute}}",
            Token::ModelView => "{{modelView}}",
            Token::Fillable => "{{fillable}}",
            Token::Rules => "{{rules}}",
            Token::Relations => "{{relations}}",
            Token::Properties => "{{properties}}",
            Token::SoftDeletesNamespace => "{{softDeletesNamespace}}",
            Token::SoftDeletes => "{{softDeletes}}",
            Token::Title => "{{title}}",
            Token::Column => "{{column}}",
            Token::Options => "{{options}}",
            Token::TableHeader => "{{tableHeader}}",
            Token::TableBody => "{{tableBody}}",
            Token::ViewRows => "{{viewRows}}",
            Token::Form => "{{form}}",
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Token {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Ordered `Token -> value` map, always complete
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplacementMap {
    values: IndexMap<Token, String>,
}

impl Default for ReplacementMap {
    fn default() -> Self {
        Self::new()
    }
}

impl ReplacementMap {
    pub fn new() -> Self {
        Self {
            values: Token::ALL.iter().map(|t| (*t, String::new())).collect(),
        }
    }

    pub fn set(&mut self, token: Token, value: impl Into<String>) {
        self.values.insert(token, value.into());
    }

    pub fn with(mut self, token: Token, value: impl Into<String>) -> Self {
        self.set(token, value);
        self
    }

    pub fn get(&self, token: Token) -> &str {
        self.values.get(&token).map(String::as_str).unwrap_or("")
    }

    pub fn iter(&self) -> impl Iterator<Item = (Token, &str)> {
        self.values.iter().map(|(t, v)| (*t, v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Which per-column fragment to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Input widget, a select when the column is a foreign key
    Form,
    /// Read-only display row
    View,
}

/// Assembles replacement maps for one generation target
pub struct ReplacementBuilder<'a> {
    config: &'a ScaffoldConfig,
    stubs: &'a StubLoader,
    route: Option<String>,
}

impl<'a> ReplacementBuilder<'a> {
    pub fn new(config: &'a ScaffoldConfig, stubs: &'a StubLoader) -> Self {
        Self {
            config,
            stubs,
            route: None,
        }
    }

    /// Override the `{{modelRoute}}` value
    pub fn with_route(mut self, route: Option<String>) -> Self {
        self.route = route.filter(|r| !r.trim().is_empty());
        self
    }

    /// Naming tokens derived from the model name
    pub fn base_replacements(&self, name: &str) -> ReplacementMap {
        let plural_name = plural(name);
        let route = self
            .route
            .clone()
            .unwrap_or_else(|| kebab(&plural_name));

        ReplacementMap::new()
            .with(Token::Layout, self.config.layout.as_str())
            .with(Token::ModelName, name)
            .with(Token::ModelTitle, title(&snake(name)))
            .with(Token::ModelNamespace, self.config.model_namespace.as_str())
            .with(
                Token::ControllerNamespace,
                self.config.controller_namespace.as_str(),
            )
            .with(Token::ModelNamePluralLowerCase, camel(&plural_name))
            .with(Token::ModelNamePluralUpperCase, ucfirst(&plural_name))
            .with(Token::ModelNameLowerCase, camel(name))
            .with(Token::ModelRoute, route)
            .with(Token::ModelView, kebab(name))
    }

    /// Base tokens plus fillable, rules, relations, properties and soft deletes
    pub fn model_replacements(&self, ctx: &TableContext, relations: &RelationSet) -> ReplacementMap {
        let mut map = self.base_replacements(&ctx.model_name);
        map.set(Token::Fillable, self.fillable(&ctx.columns));
        map.set(Token::Rules, self.rules(&ctx.columns));
        map.set(Token::Relations, relations.relations_code.as_str());
        map.set(Token::Properties, properties(&ctx.columns, relations));

        if ctx.has_column(SOFT_DELETE_COLUMN) {
            map.set(
                Token::SoftDeletesNamespace,
                "use Illuminate\\Database\\Eloquent\\SoftDeletes;\n",
            );
            map.set(Token::SoftDeletes, "use SoftDeletes;\n");
        }
        map
    }

    /// Quoted CSV of the wanted columns: `'title','body','user_id'`
    pub fn fillable(&self, columns: &[Column]) -> String {
        columns
            .iter()
            .filter(|c| !self.config.is_unwanted(&c.name))
            .map(|c| format!("'{}'", c.name))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// One `required` rule per non-nullable wanted column
    pub fn rules(&self, columns: &[Column]) -> String {
        columns
            .iter()
            .filter(|c| !c.nullable && !self.config.is_unwanted(&c.name))
            .map(|c| format!("\n\t\t'{}' => 'required',", c.name))
            .collect()
    }

    pub async fn field(
        &self,
        catalog: &dyn Catalog,
        ctx: &TableContext,
        column: &str,
        kind: FieldKind,
    ) -> Result<String> {
        match kind {
            FieldKind::Form => self.form_field(catalog, ctx, column).await,
            FieldKind::View => self.view_field(ctx, column).await,
        }
    }

    /// Input fragment for `column`; foreign keys become a select populated
    /// from the referenced table
    pub async fn form_field(
        &self,
        catalog: &dyn Catalog,
        ctx: &TableContext,
        column: &str,
    ) -> Result<String> {
        let mut map = self.column_replacements(ctx, column);
        let info = resolve(catalog, &ctx.table, column).await?;

        let kind = match info.target() {
            Some((referenced_table, referenced_column)) => {
                let title_column =
                    infer_title_column(catalog, referenced_table, referenced_column).await?;
                let options =
                    build_options(catalog, referenced_table, referenced_column, &title_column)
                        .await?;
                map.set(Token::Options, options_literal(&options));
                StubKind::FormFieldSelect
            }
            None => StubKind::FormField,
        };

        Ok(render(&self.stubs.load(kind).await?, &map))
    }

    pub async fn view_field(&self, ctx: &TableContext, column: &str) -> Result<String> {
        let map = self.column_replacements(ctx, column);
        Ok(render(&self.stubs.load(StubKind::ViewField).await?, &map))
    }

    /// Table header cell for the index view
    pub fn list_heading(&self, column: &str) -> String {
        format!("{}<th>{}</th>\n", "\t".repeat(10), title(column))
    }

    /// Table body cell for the index view
    pub fn list_cell(&self, ctx: &TableContext, column: &str) -> String {
        format!(
            "{}<td>{{{{ ${}->{} }}}}</td>\n",
            "\t".repeat(11),
            camel(&ctx.model_name),
            column
        )
    }

    /// Base tokens plus the aggregated per-column view fragments
    pub async fn view_replacements(
        &self,
        catalog: &dyn Catalog,
        ctx: &TableContext,
    ) -> Result<ReplacementMap> {
        let mut table_header = String::new();
        let mut table_body = String::new();
        let mut view_rows = String::new();
        let mut form = String::new();

        for column in ctx.wanted_columns(self.config) {
            table_header.push_str(&self.list_heading(&column.name));
            table_body.push_str(&self.list_cell(ctx, &column.name));
            view_rows.push_str(&self.field(catalog, ctx, &column.name, FieldKind::View).await?);
            form.push_str(&self.field(catalog, ctx, &column.name, FieldKind::Form).await?);
        }

        Ok(self
            .base_replacements(&ctx.model_name)
            .with(Token::TableHeader, table_header)
            .with(Token::TableBody, table_body)
            .with(Token::ViewRows, view_rows)
            .with(Token::Form, form))
    }

    fn column_replacements(&self, ctx: &TableContext, column: &str) -> ReplacementMap {
        self.base_replacements(&ctx.model_name)
            .with(Token::Title, title(column))
            .with(Token::Column, column)
    }
}

/// Doc block body: every column, then the relation properties
fn properties(columns: &[Column], relations: &RelationSet) -> String {
    let mut doc = String::from("*");
    for column in columns {
        doc.push_str(&format!("\n * @property ${}", column.name));
    }
    doc.push_str("\n *");
    if !relations.properties_doc.is_empty() {
        doc.push('\n');
        doc.push_str(&relations.properties_doc);
    }
    doc
}
