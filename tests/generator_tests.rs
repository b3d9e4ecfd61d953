//! End-to-end generation against an in-memory catalog

mod common;

use common::blog_catalog;
use crud_scaffold::catalog::MemoryCatalog;
use crud_scaffold::{
    Component, FileStatus, GenerateOptions, Generator, ScaffoldConfig, ScaffoldError,
    WriteOptions,
};
use std::path::Path;
use tempfile::TempDir;
use tokio::fs;

async fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).await.unwrap()
}

#[tokio::test]
async fn test_generate_and_write_posts() {
    let catalog = blog_catalog();
    let generator = Generator::new(&catalog, ScaffoldConfig::default());
    let project = TempDir::new().unwrap();

    let plan = generator
        .generate("posts", &GenerateOptions::default())
        .await
        .unwrap();
    assert_eq!(plan.model_name, "Post");
    assert_eq!(plan.files.len(), 8);

    let report = plan
        .write(project.path(), &WriteOptions::default())
        .await
        .unwrap();
    assert_eq!(report.count(FileStatus::Created), 8);

    let root = project.path();
    let model = read(root, "app/Models/Post.php").await;
    assert!(model.contains("namespace App\\Models;"));
    assert!(model.contains("class Post extends Model"));
    assert!(model.contains("protected $fillable = ['title','body','user_id'];"));
    assert!(model.contains("public function comments()"));
    assert!(model.contains("public function user()"));
    assert!(model.contains(" * @property User $user"));
    assert!(!model.contains("{{"));

    let controller = read(root, "app/Http/Controllers/PostController.php").await;
    assert!(controller.contains("class PostController extends Controller"));
    assert!(controller.contains("use App\\Models\\Post;"));
    assert!(controller.contains("redirect()->route('posts.index')"));

    let index = read(root, "resources/views/post/index.blade.php").await;
    assert!(index.contains("@extends('layouts.app')"));
    assert!(index.contains("<th>User Id</th>"));
    assert!(index.contains("<td>{{ $post->title }}</td>"));
    assert!(index.contains("@foreach ($posts as $post)"));

    let form = read(root, "resources/views/post/form.blade.php").await;
    assert!(form.contains("Form::select('user_id', ['1'=>'Alice','2'=>'Bob','10'=>'Zed']"));

    let show = read(root, "resources/views/post/show.blade.php").await;
    assert!(show.contains("<strong>Title:</strong>"));

    for view in ["create", "edit"] {
        let text = read(root, &format!("resources/views/post/{}.blade.php", view)).await;
        assert!(text.contains("@include('post.form')"));
    }
    assert!(root.join("resources/views/layouts/app.blade.php").is_file());
}

#[tokio::test]
async fn test_existing_files_are_skipped_unless_forced() {
    let catalog = blog_catalog();
    let generator = Generator::new(&catalog, ScaffoldConfig::default());
    let project = TempDir::new().unwrap();
    let root = project.path();

    let plan = generator
        .generate("tags", &GenerateOptions::default())
        .await
        .unwrap();
    plan.write(root, &WriteOptions::default()).await.unwrap();

    fs::write(root.join("app/Models/Tag.php"), "custom").await.unwrap();
    fs::write(root.join("resources/views/layouts/app.blade.php"), "my layout")
        .await
        .unwrap();

    let report = plan.write(root, &WriteOptions::default()).await.unwrap();
    assert_eq!(report.count(FileStatus::Skipped), plan.files.len());
    assert_eq!(read(root, "app/Models/Tag.php").await, "custom");

    let forced = plan
        .write(
            root,
            &WriteOptions {
                force: true,
                dry_run: false,
            },
        )
        .await
        .unwrap();
    assert_eq!(forced.count(FileStatus::Skipped), 1);
    assert_eq!(forced.count(FileStatus::Overwritten), plan.files.len() - 1);
    assert!(read(root, "app/Models/Tag.php").await.contains("class Tag"));
    assert_eq!(
        read(root, "resources/views/layouts/app.blade.php").await,
        "my layout"
    );
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let catalog = blog_catalog();
    let generator = Generator::new(&catalog, ScaffoldConfig::default());
    let project = TempDir::new().unwrap();

    let plan = generator
        .generate("comments", &GenerateOptions::default())
        .await
        .unwrap();
    let report = plan
        .write(
            project.path(),
            &WriteOptions {
                force: false,
                dry_run: true,
            },
        )
        .await
        .unwrap();

    assert!(report.dry_run);
    assert_eq!(report.count(FileStatus::Created), plan.files.len());
    assert!(!project.path().join("app").exists());
    assert!(!project.path().join("resources").exists());
}

#[tokio::test]
async fn test_missing_custom_layout_aborts_before_writing() {
    let catalog = blog_catalog();
    let config = ScaffoldConfig {
        layout: "layouts.admin".to_string(),
        ..Default::default()
    };
    let generator = Generator::new(&catalog, config);
    let project = TempDir::new().unwrap();

    let plan = generator
        .generate("posts", &GenerateOptions::default())
        .await
        .unwrap();
    assert!(plan
        .files
        .iter()
        .all(|f| !f.path.ends_with("layouts/admin.blade.php")));

    let err = plan
        .write(project.path(), &WriteOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ScaffoldError::LayoutNotFound(_)));
    assert!(!project.path().join("app").exists());

    let layout = project.path().join("resources/views/layouts/admin.blade.php");
    fs::create_dir_all(layout.parent().unwrap()).await.unwrap();
    fs::write(&layout, "admin").await.unwrap();
    plan.write(project.path(), &WriteOptions::default())
        .await
        .unwrap();
    let index = read(project.path(), "resources/views/post/index.blade.php").await;
    assert!(index.contains("@extends('layouts.admin')"));
}

#[tokio::test]
async fn test_missing_table_is_schema_access_error() {
    let catalog = blog_catalog();
    let generator = Generator::new(&catalog, ScaffoldConfig::default());
    let err = generator
        .generate("invoices", &GenerateOptions::default())
        .await
        .unwrap_err();
    assert!(err.is_schema_access());
}

#[tokio::test]
async fn test_only_and_route_options() {
    let catalog = blog_catalog();
    let generator = Generator::new(&catalog, ScaffoldConfig::default());

    let model_only = generator
        .generate(
            "posts",
            &GenerateOptions {
                route: None,
                only: Some(Component::Model),
            },
        )
        .await
        .unwrap();
    assert_eq!(model_only.files.len(), 1);
    assert!(model_only.files[0].path.ends_with("Models/Post.php"));

    let controller = generator
        .generate(
            "posts",
            &GenerateOptions {
                route: Some("admin.posts".to_string()),
                only: Some(Component::Controller),
            },
        )
        .await
        .unwrap();
    assert_eq!(controller.files.len(), 1);
    assert!(controller.files[0]
        .contents
        .contains("redirect()->route('admin.posts.index')"));
}

#[tokio::test]
async fn test_custom_namespaces_and_paths() {
    let catalog = blog_catalog();
    let config = ScaffoldConfig {
        model_namespace: "App".to_string(),
        controller_namespace: "App\\Http\\Controllers\\Admin".to_string(),
        ..Default::default()
    };
    let generator = Generator::new(&catalog, config);
    let plan = generator
        .generate("categories", &GenerateOptions::default())
        .await
        .unwrap();

    let paths: Vec<String> = plan
        .files
        .iter()
        .map(|f| f.path.to_string_lossy().replace('\\', "/"))
        .collect();
    assert!(paths.contains(&"app/Category.php".to_string()));
    assert!(paths.contains(&"app/Http/Controllers/Admin/CategoryController.php".to_string()));
    assert!(paths.contains(&"resources/views/category/index.blade.php".to_string()));

    let model = &plan
        .files
        .iter()
        .find(|f| f.path.ends_with("Category.php"))
        .unwrap()
        .contents;
    assert!(model.contains("use SoftDeletes;"));
    assert!(model.contains("return $this->belongsTo('App\\Category', 'parent_id', 'id');"));
}

#[tokio::test]
async fn test_describe_reports_foreign_keys() {
    let catalog = blog_catalog();
    let generator = Generator::new(&catalog, ScaffoldConfig::default());
    let description = generator.describe("posts").await.unwrap();

    assert_eq!(description.columns.len(), 5);
    let user_id = description
        .columns
        .iter()
        .find(|c| c.column.name == "user_id")
        .unwrap();
    assert_eq!(user_id.foreign_key.target(), Some(("users", "id")));
    assert!(description.columns[0].unwanted);
    assert_eq!(description.relations.declarations.len(), 2);

    let json = serde_json::to_value(&description).unwrap();
    assert_eq!(json["columns"][3]["name"], "user_id");
    assert_eq!(json["columns"][3]["foreign_key"]["referenced_table"], "users");
}

#[tokio::test]
async fn test_generate_from_yaml_snapshot_file() {
    let dir = TempDir::new().unwrap();
    let schema = dir.path().join("schema.yaml");
    fs::write(
        &schema,
        r#"
tables:
  users:
    columns:
      - { name: id, type: bigint }
      - { name: name, type: varchar(255) }
    rows:
      - { id: 1, name: Alice }
  posts:
    columns:
      - { name: id, type: bigint }
      - { name: title, type: varchar(255) }
      - { name: user_id, type: bigint }
    foreign_keys:
      - { column: user_id, references: users.id }
"#,
    )
    .await
    .unwrap();

    let catalog = MemoryCatalog::from_yaml_file(&schema).await.unwrap();
    let generator = Generator::new(&catalog, ScaffoldConfig::default());
    let plan = generator
        .generate(
            "posts",
            &GenerateOptions {
                route: None,
                only: Some(Component::Views),
            },
        )
        .await
        .unwrap();

    let form = plan
        .files
        .iter()
        .find(|f| f.path.ends_with("form.blade.php"))
        .unwrap();
    assert!(form.contents.contains("['1'=>'Alice']"));
}
