use opendesign_import::{ExternalConverter, FormatConverter, NoConverter};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_NAME: &str = "opendesign.config.json";

/// OpenDesign configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Directory image references are resolved against
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,

    /// External program that converts legacy design files
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub converter: Option<ConverterConfig>,

    /// `tracing` filter used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

fn default_log_filter() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConverterConfig {
    pub command: String,

    #[serde(default)]
    pub args: Vec<String>,
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &Path) -> anyhow::Result<Self> {
        let config_path = cwd.join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            // Return default config if none exists
            Ok(Config::default())
        }
    }

    /// Get absolute path to the assets directory
    pub fn get_assets_dir(&self, cwd: &Path) -> PathBuf {
        cwd.join(&self.assets_dir)
    }

    /// Converter for non-canonical input
    pub fn converter(&self) -> Box<dyn FormatConverter> {
        match &self.converter {
            Some(converter) => {
                Box::new(ExternalConverter::new(&converter.command).with_args(converter.args.iter().cloned()))
            }
            None => Box::new(NoConverter),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            assets_dir: default_assets_dir(),
            converter: None,
            log_filter: default_log_filter(),
        }
    }
}
