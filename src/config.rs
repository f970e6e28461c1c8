use crate::flags::RegexFlags;
use crate::playground::DEFAULT_SAMPLE_TEXT;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_DIR: &str = "regex-dojo";
const CONFIG_FILE: &str = ".regex-dojo.toml";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(default)]
    pub playground: PlaygroundConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaygroundConfig {
    /// Flags in `gimsuy` notation used when `--flags` is not given.
    pub default_flags: String,
    /// Text matched when no text, file or piped input is supplied.
    pub sample_text: String,
}

impl Default for PlaygroundConfig {
    fn default() -> Self {
        Self {
            default_flags: RegexFlags::default().to_string(),
            sample_text: DEFAULT_SAMPLE_TEXT.to_string(),
        }
    }
}

impl PlaygroundConfig {
    pub fn flags(&self) -> crate::error::Result<RegexFlags> {
        self.default_flags.parse()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub color: bool,
    pub show_positions: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            color: true,
            show_positions: true,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        match Self::find_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config
            .playground
            .flags()
            .with_context(|| format!("Invalid default_flags in {}", path.display()))?;
        Ok(config)
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Some(xdg_config) = dirs::config_dir() {
            let xdg_path = xdg_config.join(CONFIG_DIR).join("config.toml");
            if xdg_path.exists() {
                return Some(xdg_path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let home_path = home.join(CONFIG_FILE);
            if home_path.exists() {
                return Some(home_path);
            }
        }

        let current_path = Path::new(CONFIG_FILE);
        if current_path.exists() {
            return Some(current_path.to_path_buf());
        }

        None
    }
}
