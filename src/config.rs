//! Scaffolding configuration: TOML file, serde defaults and environment
//! overrides

use crate::{Result, ScaffoldError};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Default layout; the only one that is bootstrapped when missing
pub const DEFAULT_LAYOUT: &str = "layouts.app";

/// Scaffolding configuration, immutable for the duration of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    #[serde(default)]
    pub database_url: Option<String>,

    /// Columns never made fillable nor validated
    #[serde(default = "default_unwanted_columns")]
    pub unwanted_columns: Vec<String>,

    #[serde(default = "default_model_namespace")]
    pub model_namespace: String,

    #[serde(default = "default_controller_namespace")]
    pub controller_namespace: String,

    #[serde(default = "default_layout")]
    pub layout: String,

    /// Directory overriding the embedded stubs
    #[serde(default)]
    pub stub_path: Option<PathBuf>,

    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Application source root, where namespaces are folded into
    #[serde(default = "default_app_dir")]
    pub app: PathBuf,

    #[serde(default = "default_views_dir")]
    pub views: PathBuf,
}

fn default_unwanted_columns() -> Vec<String> {
    [
        "id",
        "password",
        "email_verified_at",
        "remember_token",
        "created_at",
        "updated_at",
        "deleted_at",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_model_namespace() -> String {
    "App\\Models".to_string()
}

fn default_controller_namespace() -> String {
    "App\\Http\\Controllers".to_string()
}

fn default_layout() -> String {
    DEFAULT_LAYOUT.to_string()
}

fn default_app_dir() -> PathBuf {
    PathBuf::from("app")
}

fn default_views_dir() -> PathBuf {
    PathBuf::from("resources/views")
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            unwanted_columns: default_unwanted_columns(),
            model_namespace: default_model_namespace(),
            controller_namespace: default_controller_namespace(),
            layout: default_layout(),
            stub_path: None,
            paths: PathsConfig::default(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            app: default_app_dir(),
            views: default_views_dir(),
        }
    }
}

impl ScaffoldConfig {
    /// Load `path` if it exists, defaults otherwise, then apply environment
    /// overrides and validate
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::load_from(path.as_ref(), None)
    }

    /// Like `load`, with a relative `stub_path` taken from `project_root`
    pub fn load_for_project<P: AsRef<Path>>(path: P, project_root: &Path) -> Result<Self> {
        Self::load_from(path.as_ref(), Some(project_root))
    }

    fn load_from(path_ref: &Path, project_root: Option<&Path>) -> Result<Self> {
        let mut config = if path_ref.exists() {
            Self::from_file(path_ref)?
        } else {
            log::debug!(
                "No config file at {}, using defaults",
                path_ref.display()
            );
            Self::default()
        };
        config.apply_env_overrides();
        if let Some(root) = project_root {
            config.resolve_relative_to(root);
        }
        config.validate()?;
        Ok(config)
    }

    /// Join a relative `stub_path` onto `root`
    pub fn resolve_relative_to(&mut self, root: &Path) {
        if let Some(stub_path) = &self.stub_path {
            if stub_path.is_relative() {
                self.stub_path = Some(root.join(stub_path));
            }
        }
    }

    /// Parse a TOML configuration file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let content = std::fs::read_to_string(path_ref).map_err(|e| {
            ScaffoldError::Config(format!(
                "Failed to read config file '{}': {}",
                path_ref.display(),
                e
            ))
        })?;
        let config = Self::from_toml_str(&content).map_err(|e| {
            ScaffoldError::Config(format!(
                "Failed to parse config file '{}': {}",
                path_ref.display(),
                e
            ))
        })?;
        log::debug!("Loaded configuration from: {}", path_ref.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(url) = env::var("DATABASE_URL") {
            if !url.is_empty() {
                self.database_url = Some(url);
            }
        }
        if let Ok(namespace) = env::var("CRUD_MODEL_NAMESPACE") {
            self.model_namespace = namespace;
        }
        if let Ok(namespace) = env::var("CRUD_CONTROLLER_NAMESPACE") {
            self.controller_namespace = namespace;
        }
        if let Ok(layout) = env::var("CRUD_LAYOUT") {
            self.layout = layout;
        }
        if let Ok(stub_path) = env::var("CRUD_STUB_PATH") {
            self.stub_path = Some(PathBuf::from(stub_path));
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.model_namespace.trim().is_empty() {
            return Err(ScaffoldError::Config("model_namespace cannot be empty".into()));
        }
        if self.controller_namespace.trim().is_empty() {
            return Err(ScaffoldError::Config(
                "controller_namespace cannot be empty".into(),
            ));
        }
        if self.layout.trim().is_empty() {
            return Err(ScaffoldError::Config("layout cannot be empty".into()));
        }
        if let Some(stub_path) = &self.stub_path {
            if !stub_path.is_dir() {
                log::warn!(
                    "Stub directory does not exist: {} (falling back to embedded stubs)",
                    stub_path.display()
                );
            }
        }
        Ok(())
    }

    /// True when `column` is excluded from fillable and rules
    pub fn is_unwanted(&self, column: &str) -> bool {
        self.unwanted_columns.iter().any(|c| c == column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ScaffoldConfig::default();
        assert_eq!(config.model_namespace, "App\\Models");
        assert_eq!(config.layout, DEFAULT_LAYOUT);
        assert!(config.is_unwanted("id"));
        assert!(config.is_unwanted("deleted_at"));
        assert!(!config.is_unwanted("title"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = ScaffoldConfig::from_toml_str(
            r#"
            unwanted_columns = ["id", "secret"]
            layout = "layouts.admin"

            [paths]
            views = "templates"
            "#,
        )
        .unwrap();
        assert_eq!(config.unwanted_columns, vec!["id", "secret"]);
        assert_eq!(config.layout, "layouts.admin");
        assert_eq!(config.paths.views, PathBuf::from("templates"));
        assert_eq!(config.paths.app, PathBuf::from("app"));
        assert_eq!(config.controller_namespace, "App\\Http\\Controllers");
    }

    #[test]
    fn test_empty_namespace_is_rejected() {
        let config = ScaffoldConfig {
            model_namespace: " ".to_string(),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(ScaffoldError::Config(_))));
    }

    #[test]
    fn test_relative_stub_path_follows_project_root() {
        let mut config = ScaffoldConfig {
            stub_path: Some(PathBuf::from("stubs")),
            ..Default::default()
        };
        config.resolve_relative_to(Path::new("/srv/shop"));
        assert_eq!(config.stub_path, Some(PathBuf::from("/srv/shop/stubs")));

        config.resolve_relative_to(Path::new("/elsewhere"));
        assert_eq!(config.stub_path, Some(PathBuf::from("/srv/shop/stubs")));

        let mut none = ScaffoldConfig::default();
        none.resolve_relative_to(Path::new("/srv/shop"));
        assert_eq!(none.stub_path, None);
    }

    #[test]
    fn test_invalid_toml() {
        assert!(ScaffoldConfig::from_toml_str("layout = [").is_err());
    }
}
