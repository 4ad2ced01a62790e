use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::Deserialize;

use crate::api::DEFAULT_ENDPOINT;
use crate::feed::DEFAULT_PAGE_SIZE;

const APP_SENTINEL: &str = "shorts-viewer";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(rename = "_app")]
    pub app: String,

    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    #[serde(default)]
    pub theme: Option<String>,

    /// External command used to play a video; the system opener when unset.
    #[serde(default)]
    pub player: Option<String>,

    #[serde(default)]
    pub autoplay: bool,

    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: APP_SENTINEL.to_string(),
            endpoint: default_endpoint(),
            page_size: default_page_size(),
            theme: None,
            player: None,
            autoplay: false,
            timeout_secs: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    fn validate(&self) -> Result<()> {
        if self.app != APP_SENTINEL {
            bail!(
                "Settings file appears to belong to another application (expected _app = '{}', found '{}')",
                APP_SENTINEL,
                self.app
            );
        }
        if self.page_size == 0 {
            bail!("page_size must be at least 1");
        }
        Ok(())
    }
}

pub fn config_dir(custom: Option<&PathBuf>) -> Option<PathBuf> {
    custom
        .cloned()
        .or_else(|| dirs::home_dir().map(|p| p.join(".config").join("shorts")))
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.toml")
}

pub fn logs_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("logs")
}
