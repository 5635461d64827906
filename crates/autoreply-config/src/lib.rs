use autoreply_core::{CatalogVariable, VariableCatalog};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Configuration for autoreply tools
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Rulebook used when no `--rulebook` is given
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rulebook: Option<PathBuf>,

    /// Default log filter when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default)]
    pub engine: EngineConfig,

    #[serde(default)]
    pub catalog: CatalogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Upper bound on a rule regex's compiled size, in bytes
    #[serde(default = "default_regex_size_limit")]
    pub regex_size_limit: usize,

    /// Skip matching rules whose template is inactive
    #[serde(default)]
    pub require_active_template: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CatalogConfig {
    /// Variables appended after the built-in catalog
    #[serde(default)]
    pub extra: Vec<CatalogVariable>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rulebook: None,
            log_level: default_log_level(),
            engine: EngineConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            regex_size_limit: default_regex_size_limit(),
            require_active_template: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_regex_size_limit() -> usize {
    1 << 20
}

impl CatalogConfig {
    /// Built-in catalog plus configured extras.
    pub fn build(&self) -> anyhow::Result<VariableCatalog> {
        Ok(VariableCatalog::builtin().with_extra(self.extra.iter().cloned())?)
    }
}

impl Config {
    /// Load config from default location or create default if not found
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path();

        if path.exists() {
            Self::load_from(&path)
        } else {
            // Create default config file
            let config = Config::default();
            config.save_to(&path)?;
            Ok(config)
        }
    }

    /// Load config from an explicit path; the file must exist.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get config file path
    pub fn config_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "autoreply", "autoreply") {
            dirs.config_dir().join("config.toml")
        } else {
            PathBuf::from("~/.autoreply/config.toml")
        }
    }
}
