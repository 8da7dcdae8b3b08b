//! User configuration loaded from `config.toml`

use crate::cli::{Mode, OutputFormat};
use anyhow::Context;
use serde::{de, Deserialize, Deserializer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default tokenization for `diff`
    pub mode: Mode,
    /// Default output for `diff`
    pub format: OutputFormat,
    /// Log level when `--verbose` is not given
    #[serde(deserialize_with = "deserialize_level")]
    pub log_level: Level,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            format: OutputFormat::default(),
            log_level: Level::WARN,
        }
    }
}

impl Config {
    /// `<config_dir>/seqdiff/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("seqdiff").join("config.toml"))
    }

    /// Load an explicit config file, or the default one if it exists
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::from_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn from_file(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}

/// Accepts the level names `tracing` understands (`error` through `trace`)
fn deserialize_level<'de, D>(deserializer: D) -> Result<Level, D::Error>
where
    D: Deserializer<'de>,
{
    let text = String::deserialize(deserializer)?;
    text.parse().map_err(de::Error::custom)
}
