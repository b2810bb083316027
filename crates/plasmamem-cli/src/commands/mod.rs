pub mod init;
pub mod inspect;
pub mod play;
pub mod rules;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use plasmamem_core::pool::CompoundPool;
use plasmamem_core::traits::CompoundSource;
use plasmamem_providers::config::load_config_from;
use plasmamem_providers::{create_source, PlasmamemConfig};

/// A loaded config and the compound source it describes.
pub struct Setup {
    pub config: PlasmamemConfig,
    pub source: Arc<dyn CompoundSource>,
}

impl Setup {
    pub fn load_pool(&self) -> Result<CompoundPool> {
        CompoundPool::load(&self.config.pool_path)
    }
}

/// Load config and build the configured source.
pub fn load_setup(config_path: Option<&Path>, pool_override: Option<PathBuf>) -> Result<Setup> {
    let mut config = load_config_from(config_path)?;
    if let Some(pool) = pool_override {
        config.pool_path = pool;
    }

    let source: Arc<dyn CompoundSource> = Arc::from(
        create_source(&config.source).context("failed to create compound source")?,
    );
    tracing::debug!(source = source.name(), "compound source ready");

    Ok(Setup { config, source })
}
