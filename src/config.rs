use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Deserialize;
use tracing::debug;

use crate::github::DEFAULT_BRANCH;
use crate::renderer::{RenderOptions, Theme};

const CONFIG_DIR: &str = "readme";
const CONFIG_FILE: &str = "config.json";

/// When to emit ANSI styling
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    pub fn theme(self) -> Theme {
        match self {
            ColorChoice::Auto => Theme::ansi(None),
            ColorChoice::Always => Theme::ansi(Some(true)),
            ColorChoice::Never => Theme::plain(),
        }
    }
}

/// Settings read from the configuration file; command-line flags override them
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub branch: String,
    pub raw: bool,
    pub no_images: bool,
    pub nest_sections: bool,
    pub color: ColorChoice,
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            branch: DEFAULT_BRANCH.to_string(),
            raw: false,
            no_images: false,
            nest_sections: false,
            color: ColorChoice::Auto,
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// `<config dir>/readme/config.json`, when the platform has a config dir
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the default config file, falling back to defaults when absent
    pub fn load() -> Result<Self> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        debug!(path = %path.display(), ?config, "loaded config");
        Ok(config)
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::new()
            .with_suppress_images(self.no_images)
            .with_nest_sections(self.nest_sections)
    }

    /// Request timeout; `timeout_secs: 0` disables it
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}
