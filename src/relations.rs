//! Relation inference from foreign key constraints
//!
//! Every foreign key `child.fk -> parent.key` yields a `BelongsTo` on the
//! child and a `HasMany` on the parent. Nothing is guessed from column
//! names: a relation exists only if the catalog reports the constraint.

use crate::catalog::Catalog;
use crate::naming::{camel, model_name, plural, studly};
use crate::resolver::resolve;
use crate::{Column, RelationDeclaration, RelationKind, Result};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Relations of one table plus the text fragments substituted into the model
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelationSet {
    pub declarations: Vec<RelationDeclaration>,

    /// Relation methods, one fragment per declaration
    pub relations_code: String,

    /// `@property` lines, one per declaration
    pub properties_doc: String,
}

impl RelationSet {
    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }
}

/// Infer the relations of `table`, listing its columns first
pub async fn infer_relations_for(
    catalog: &dyn Catalog,
    table: &str,
    model_namespace: &str,
) -> Result<RelationSet> {
    let columns = catalog.list_columns(table).await?;
    infer_relations(catalog, table, &columns, model_namespace).await
}

/// Infer the relations of `table` whose columns are already known
///
/// Scans all tables of the catalog, `table` included so that a
/// self-referencing key produces both sides. Any catalog failure aborts the
/// whole inference.
pub async fn infer_relations(
    catalog: &dyn Catalog,
    table: &str,
    columns: &[Column],
    model_namespace: &str,
) -> Result<RelationSet> {
    let mut declarations = Vec::new();

    for column in columns {
        let info = resolve(catalog, table, &column.name).await?;
        if let Some((referenced_table, referenced_column)) = info.target() {
            declarations.push(RelationDeclaration {
                kind: RelationKind::BelongsTo,
                local_table: table.to_string(),
                related_table: referenced_table.to_string(),
                local_key: referenced_column.to_string(),
                foreign_key: column.name.clone(),
                method: String::new(),
            });
        }
    }

    for other in catalog.list_tables().await? {
        let other_columns = if other == table {
            columns.to_vec()
        } else {
            catalog.list_columns(&other).await?
        };
        for column in &other_columns {
            let info = resolve(catalog, &other, &column.name).await?;
            if let Some((referenced_table, referenced_column)) = info.target() {
                if referenced_table == table {
                    declarations.push(RelationDeclaration {
                        kind: RelationKind::HasMany,
                        local_table: table.to_string(),
                        related_table: other.clone(),
                        local_key: referenced_column.to_string(),
                        foreign_key: column.name.clone(),
                        method: String::new(),
                    });
                }
            }
        }
    }

    declarations.sort_by(|a, b| {
        (&a.related_table, a.kind, &a.foreign_key).cmp(&(&b.related_table, b.kind, &b.foreign_key))
    });
    assign_method_names(&mut declarations);

    log::debug!("Inferred {} relation(s) for '{}'", declarations.len(), table);

    let relations_code = declarations
        .iter()
        .map(|d| relation_method(d, model_namespace))
        .collect::<String>();
    let properties_doc = declarations
        .iter()
        .map(property_line)
        .collect::<Vec<_>>()
        .join("\n");

    Ok(RelationSet {
        declarations,
        relations_code,
        properties_doc,
    })
}

fn default_method_name(declaration: &RelationDeclaration) -> String {
    let model = model_name(&declaration.related_table);
    match declaration.kind {
        RelationKind::BelongsTo => camel(&model),
        RelationKind::HasMany => camel(&plural(&model)),
    }
}

/// Name relations after the related model
///
/// Names shared by several declarations fall back to the foreign key
/// column. A fallback that still clashes with another name is qualified as
/// `{default}By{Key}`, and a numeric suffix settles anything left.
fn assign_method_names(declarations: &mut [RelationDeclaration]) {
    let defaults: Vec<String> = declarations.iter().map(default_method_name).collect();
    let mut names = defaults.clone();
    let fallbacks = duplicated(&names);

    for &index in &fallbacks {
        let declaration = &declarations[index];
        let stem = foreign_key_stem(declaration);
        names[index] = match declaration.kind {
            RelationKind::BelongsTo => camel(stem),
            RelationKind::HasMany => format!("{}By{}", defaults[index], studly(stem)),
        };
    }

    for index in duplicated(&names) {
        if fallbacks.contains(&index) {
            let stem = foreign_key_stem(&declarations[index]);
            names[index] = format!("{}By{}", defaults[index], studly(stem));
        }
    }

    let mut seen: HashSet<String> = HashSet::new();
    for name in names.iter_mut() {
        if !seen.insert(name.clone()) {
            let mut suffix = 2;
            while seen.contains(&format!("{}{}", name, suffix)) {
                suffix += 1;
            }
            *name = format!("{}{}", name, suffix);
            seen.insert(name.clone());
        }
    }

    for (declaration, method) in declarations.iter_mut().zip(names) {
        declaration.method = method;
    }
}

fn foreign_key_stem(declaration: &RelationDeclaration) -> &str {
    declaration
        .foreign_key
        .strip_suffix("_id")
        .unwrap_or(&declaration.foreign_key)
}

/// Positions whose name occurs more than once
fn duplicated(names: &[String]) -> Vec<usize> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for name in names {
        *counts.entry(name.as_str()).or_default() += 1;
    }
    names
        .iter()
        .enumerate()
        .filter(|(_, name)| counts[name.as_str()] > 1)
        .map(|(index, _)| index)
        .collect()
}

fn property_line(declaration: &RelationDeclaration) -> String {
    let model = model_name(&declaration.related_table);
    match declaration.kind {
        RelationKind::BelongsTo => format!(" * @property {} ${}", model, declaration.method),
        RelationKind::HasMany => format!(" * @property {}[] ${}", model, declaration.method),
    }
}

fn relation_method(declaration: &RelationDeclaration, model_namespace: &str) -> String {
    let class = format!(
        "{}\\{}",
        model_namespace.trim_end_matches('\\'),
        model_name(&declaration.related_table)
    );
    format!(
        "\n    /**\n     * @return {ret}\n     */\n    public function {method}()\n    {{\n        return $this->{builder}('{class}', '{fk}', '{key}');\n    }}\n",
        ret = declaration.kind.return_type(),
        method = declaration.method,
        builder = declaration.kind.builder(),
        class = class,
        fk = declaration.foreign_key,
        key = declaration.local_key,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn declaration(kind: RelationKind, related: &str, fk: &str) -> RelationDeclaration {
        RelationDeclaration {
            kind,
            local_table: "users".to_string(),
            related_table: related.to_string(),
            local_key: "id".to_string(),
            foreign_key: fk.to_string(),
            method: String::new(),
        }
    }

    #[test]
    fn test_default_names() {
        let mut decls = vec![
            declaration(RelationKind::BelongsTo, "teams", "team_id"),
            declaration(RelationKind::HasMany, "post_comments", "user_id"),
        ];
        assign_method_names(&mut decls);
        assert_eq!(decls[0].method, "team");
        assert_eq!(decls[1].method, "postComments");
    }

    #[test]
    fn test_colliding_names_use_foreign_key() {
        let mut decls = vec![
            declaration(RelationKind::HasMany, "posts", "author_id"),
            declaration(RelationKind::HasMany, "posts", "editor_id"),
            declaration(RelationKind::BelongsTo, "users", "manager_id"),
            declaration(RelationKind::BelongsTo, "users", "mentor_id"),
        ];
        assign_method_names(&mut decls);
        assert_eq!(decls[0].method, "postsByAuthor");
        assert_eq!(decls[1].method, "postsByEditor");
        assert_eq!(decls[2].method, "manager");
        assert_eq!(decls[3].method, "mentor");
    }

    #[test]
    fn test_fallback_name_does_not_reuse_a_default() {
        let mut decls = vec![
            declaration(RelationKind::BelongsTo, "authors", "writer_id"),
            declaration(RelationKind::BelongsTo, "users", "author_id"),
            declaration(RelationKind::BelongsTo, "users", "editor_id"),
        ];
        assign_method_names(&mut decls);
        let methods: Vec<&str> = decls.iter().map(|d| d.method.as_str()).collect();
        assert_eq!(methods, vec!["author", "userByAuthor", "editor"]);
    }

    #[test]
    fn test_identical_names_get_numeric_suffix() {
        let mut decls = vec![
            declaration(RelationKind::BelongsTo, "users", "user_id"),
            declaration(RelationKind::BelongsTo, "users", "user_id"),
        ];
        assign_method_names(&mut decls);
        assert_eq!(decls[0].method, "userByUser");
        assert_eq!(decls[1].method, "userByUser2");
    }

    #[test]
    fn test_relation_method_fragment() {
        let mut decl = declaration(RelationKind::BelongsTo, "users", "user_id");
        decl.method = "user".to_string();
        let code = relation_method(&decl, "App\\Models\\");
        assert!(code.contains("public function user()"));
        assert!(code.contains("return $this->belongsTo('App\\Models\\User', 'user_id', 'id');"));
        assert!(code.contains("@return \\Illuminate\\Database\\Eloquent\\Relations\\BelongsTo"));
    }

    #[test]
    fn test_property_lines() {
        let mut belongs = declaration(RelationKind::BelongsTo, "users", "user_id");
        belongs.method = "user".to_string();
        let mut many = declaration(RelationKind::HasMany, "comments", "post_id");
        many.method = "comments".to_string();
        assert_eq!(property_line(&belongs), " * @property User $user");
        assert_eq!(property_line(&many), " * @property Comment[] $comments");
    }
}
