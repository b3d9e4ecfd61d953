//! Output locations, as pure functions of explicit configuration values

use std::path::{Path, PathBuf};

/// Root namespace that maps onto the application directory itself
pub const ROOT_NAMESPACE: &str = "App";

/// Fold a namespace into a relative directory:
/// `App\Http\Controllers` -> `Http/Controllers`, `App` -> ``
pub fn namespace_path(namespace: &str) -> PathBuf {
    let trimmed = namespace.trim_matches('\\');
    let relative = trimmed
        .strip_prefix(ROOT_NAMESPACE)
        .filter(|rest| rest.is_empty() || rest.starts_with('\\'))
        .unwrap_or(trimmed);
    relative
        .split('\\')
        .filter(|segment| !segment.is_empty())
        .collect()
}

pub fn model_path(app_dir: &Path, model_namespace: &str, model_name: &str) -> PathBuf {
    app_dir
        .join(namespace_path(model_namespace))
        .join(format!("{}.php", model_name))
}

pub fn controller_path(app_dir: &Path, controller_namespace: &str, model_name: &str) -> PathBuf {
    app_dir
        .join(namespace_path(controller_namespace))
        .join(format!("{}Controller.php", model_name))
}

/// `resources/views/{view_dir}/{view}.blade.php`
pub fn view_path(views_dir: &Path, view_dir: &str, view: &str) -> PathBuf {
    views_dir.join(view_dir).join(format!("{}.blade.php", view))
}

/// Dotted layout name to file: `layouts.app` -> `layouts/app.blade.php`
pub fn layout_path(views_dir: &Path, layout: &str) -> PathBuf {
    let mut path: PathBuf = views_dir.to_path_buf();
    let segments: Vec<&str> = layout.split('.').filter(|s| !s.is_empty()).collect();
    if let Some((last, dirs)) = segments.split_last() {
        for dir in dirs {
            path.push(dir);
        }
        path.push(format!("{}.blade.php", last));
    }
    path
}
