pub mod describe;
pub mod make;

use anyhow::{anyhow, Context, Result};
use crud_scaffold::catalog::{self, MemoryCatalog};
use crud_scaffold::{Catalog, ScaffoldConfig};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "crud.toml";

/// Where the configuration and the schema come from
pub struct SchemaSource {
    pub project_path: PathBuf,
    pub config_path: PathBuf,
    pub database_url: Option<String>,
    pub schema_file: Option<PathBuf>,
}

impl SchemaSource {
    pub fn load_config(&self) -> Result<ScaffoldConfig> {
        let mut config = ScaffoldConfig::load_for_project(&self.config_path, &self.project_path)
            .with_context(|| format!("loading {}", self.config_path.display()))?;
        if let Some(url) = &self.database_url {
            config.database_url = Some(url.clone());
        }
        Ok(config)
    }

    /// Snapshot file when given, the configured database otherwise
    pub async fn open_catalog(&self, config: &ScaffoldConfig) -> Result<Box<dyn Catalog>> {
        if let Some(path) = &self.schema_file {
            log::debug!("Reading schema snapshot: {}", path.display());
            let catalog = MemoryCatalog::from_yaml_file(path).await?;
            return Ok(Box::new(catalog));
        }

        let url = config.database_url.as_deref().ok_or_else(|| {
            anyhow!("No database configured. Use --database-url, DATABASE_URL or --schema-file")
        })?;
        log::debug!("Connecting to {}", catalog::mask_url(url));
        Ok(catalog::connect(url).await?)
    }
}
