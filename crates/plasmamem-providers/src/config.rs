//! Quiz configuration and source factory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use plasmamem_core::assembler::DEFAULT_MAX_ATTEMPTS;
use plasmamem_core::engine::QuizEngineConfig;
use plasmamem_core::traits::CompoundSource;

use crate::fixture::FixtureSource;
use crate::pubchem::{PubChemSource, DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Where compound data comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceConfig {
    PubChem {
        #[serde(default = "default_base_url")]
        base_url: String,
        #[serde(default = "default_timeout")]
        timeout_secs: u64,
    },
    Fixture {
        path: PathBuf,
    },
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::PubChem {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}
fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Top-level plasmamem configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlasmamemConfig {
    #[serde(default)]
    pub source: SourceConfig,
    /// JSON file holding the candidate compound ids.
    #[serde(default = "default_pool_path")]
    pub pool_path: PathBuf,
    /// Candidates tried per round before giving up.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Per-call timeout in seconds; 0 disables it.
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

fn default_pool_path() -> PathBuf {
    PathBuf::from("cid_pool.json")
}
fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}
fn default_fetch_timeout() -> u64 {
    10
}

impl Default for PlasmamemConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            pool_path: default_pool_path(),
            max_attempts: default_max_attempts(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl PlasmamemConfig {
    /// Engine settings derived from this config.
    pub fn engine_config(&self, seed: Option<u64>) -> QuizEngineConfig {
        QuizEngineConfig {
            max_attempts: self.max_attempts,
            fetch_timeout: match self.fetch_timeout_secs {
                0 => None,
                secs => Some(Duration::from_secs(secs)),
            },
            seed,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

fn resolve_path(path: &Path) -> PathBuf {
    PathBuf::from(resolve_env_vars(&path.to_string_lossy()))
}

fn resolve_source_config(config: &SourceConfig) -> SourceConfig {
    match config {
        SourceConfig::PubChem {
            base_url,
            timeout_secs,
        } => SourceConfig::PubChem {
            base_url: resolve_env_vars(base_url),
            timeout_secs: *timeout_secs,
        },
        SourceConfig::Fixture { path } => SourceConfig::Fixture {
            path: resolve_path(path),
        },
    }
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `plasmamem.toml` in the current directory
/// 2. `~/.config/plasmamem/config.toml`
///
/// Environment variable overrides: `PLASMAMEM_POOL`, `PLASMAMEM_BASE_URL`.
pub fn load_config_from(path: Option<&Path>) -> Result<PlasmamemConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("plasmamem.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|dir| dir.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => PlasmamemConfig::default(),
    };

    Ok(apply_env_overrides(config))
}

/// Parse a TOML document and resolve `${VAR}` references in it.
pub fn parse_config(content: &str) -> Result<PlasmamemConfig> {
    let mut config: PlasmamemConfig = toml::from_str(content)?;
    config.source = resolve_source_config(&config.source);
    config.pool_path = resolve_path(&config.pool_path);
    Ok(config)
}

fn apply_env_overrides(mut config: PlasmamemConfig) -> PlasmamemConfig {
    if let Ok(pool) = std::env::var("PLASMAMEM_POOL") {
        config.pool_path = PathBuf::from(pool);
    }

    if let Ok(url) = std::env::var("PLASMAMEM_BASE_URL") {
        match &mut config.source {
            SourceConfig::PubChem { base_url, .. } => *base_url = url,
            SourceConfig::Fixture { .. } => {
                tracing::warn!("PLASMAMEM_BASE_URL ignored: source is a fixture file");
            }
        }
    }

    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("plasmamem"))
}

/// Create a compound source from its configuration.
pub fn create_source(config: &SourceConfig) -> Result<Box<dyn CompoundSource>> {
    match config {
        SourceConfig::PubChem {
            base_url,
            timeout_secs,
        } => Ok(Box::new(PubChemSource::new(
            Some(base_url.clone()),
            *timeout_secs,
        )?)),
        SourceConfig::Fixture { path } => Ok(Box::new(FixtureSource::load(path)?)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_PLASMAMEM_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_PLASMAMEM_TEST_VAR}"), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_PLASMAMEM_TEST_VAR}_suffix"),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("${unterminated"), "${unterminated");
        std::env::remove_var("_PLASMAMEM_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = PlasmamemConfig::default();
        assert_eq!(config.max_attempts, 12);
        assert_eq!(config.fetch_timeout_secs, 10);
        assert_eq!(config.pool_path, PathBuf::from("cid_pool.json"));
        assert!(matches!(config.source, SourceConfig::PubChem { .. }));
    }

    #[test]
    fn parse_fixture_source() {
        let toml_str = r#"
pool_path = "pool.json"
max_attempts = 3

[source]
type = "fixture"
path = "compounds.json"
"#;
        let config = parse_config(toml_str).unwrap();
        assert_eq!(config.max_attempts, 3);
        assert_eq!(config.fetch_timeout_secs, 10);
        assert_eq!(
            config.source,
            SourceConfig::Fixture {
                path: PathBuf::from("compounds.json")
            }
        );
    }

    #[test]
    fn parse_pubchem_defaults() {
        let config = parse_config("[source]\ntype = \"pubchem\"\n").unwrap();
        assert_eq!(config.source, SourceConfig::default());
    }

    #[test]
    fn unknown_source_type_is_rejected() {
        assert!(parse_config("[source]\ntype = \"chembl\"\n").is_err());
    }

    #[test]
    fn engine_config_maps_zero_timeout() {
        let config = PlasmamemConfig {
            fetch_timeout_secs: 0,
            ..Default::default()
        };
        let engine = config.engine_config(Some(5));
        assert_eq!(engine.fetch_timeout, None);
        assert_eq!(engine.seed, Some(5));
        assert_eq!(engine.max_attempts, 12);

        let engine = PlasmamemConfig::default().engine_config(None);
        assert_eq!(engine.fetch_timeout, Some(Duration::from_secs(10)));
    }

    #[test]
    fn env_overrides_pool_and_base_url() {
        std::env::set_var("PLASMAMEM_POOL", "/srv/pool.json");
        std::env::set_var("PLASMAMEM_BASE_URL", "http://127.0.0.1:9/rest");

        let pubchem = apply_env_overrides(PlasmamemConfig::default());
        assert_eq!(pubchem.pool_path, PathBuf::from("/srv/pool.json"));
        assert!(matches!(
            pubchem.source,
            SourceConfig::PubChem { ref base_url, .. } if base_url == "http://127.0.0.1:9/rest"
        ));

        let fixture = apply_env_overrides(PlasmamemConfig {
            source: SourceConfig::Fixture {
                path: PathBuf::from("compounds.json"),
            },
            ..Default::default()
        });
        assert_eq!(fixture.pool_path, PathBuf::from("/srv/pool.json"));
        assert_eq!(
            fixture.source,
            SourceConfig::Fixture {
                path: PathBuf::from("compounds.json")
            }
        );

        std::env::remove_var("PLASMAMEM_POOL");
        std::env::remove_var("PLASMAMEM_BASE_URL");
    }

    #[test]
    fn explicit_missing_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = load_config_from(Some(&missing)).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plasmamem.toml");
        std::fs::write(&path, "max_attempts = 4\nfetch_timeout_secs = 2\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.max_attempts, 4);
        assert_eq!(config.fetch_timeout_secs, 2);
    }

    #[test]
    fn create_fixture_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("compounds.json");
        std::fs::write(&path, r#"{"compounds": []}"#).unwrap();
        let source = create_source(&SourceConfig::Fixture { path }).unwrap();
        assert_eq!(source.name(), "fixture");

        let source = create_source(&SourceConfig::default()).unwrap();
        assert_eq!(source.name(), "pubchem");
    }
}
