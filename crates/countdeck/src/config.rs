use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::store::{DEFAULT_QUOTA_BYTES, FileStore};
use crate::timer::{DEFAULT_ADVANCE_MS, Millis};

const FILENAME: &str = "config.yaml";
const APP_DIR: &str = "countdeck";

pub const VALID_KEYS: &str = "defaults.theme, defaults.fullscreen, slideshow.interval_secs, \
    slideshow.placeholder, storage.path, storage.quota_bytes";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defaults: Option<DefaultsConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slideshow: Option<SlideshowConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage: Option<StorageConfig>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fullscreen: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SlideshowConfig {
    /// Seconds between automatic slide changes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interval_secs: Option<u64>,

    /// Image shown while there are no slides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_bytes: Option<usize>,
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        dirs::config_dir()
            .map(|d| d.join(APP_DIR).join(FILENAME))
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                anyhow::anyhow!("No config found. Run `countdeck config show` to see defaults.")
            } else {
                anyhow::anyhow!("Failed to read config: {e}")
            }
        })?;
        let config: Config = serde_yaml::from_str(&contents)?;
        Ok(config)
    }

    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::debug!("Using default config: {e}");
            Self::default()
        })
    }

    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let yaml = serde_yaml::to_string(self)?;
        let contents = format!("# countdeck configuration\n{yaml}");
        std::fs::write(path, contents)?;
        Ok(())
    }

    pub fn theme(&self) -> &str {
        self.defaults
            .as_ref()
            .and_then(|d| d.theme.as_deref())
            .unwrap_or("dark")
    }

    pub fn fullscreen(&self) -> bool {
        self.defaults
            .as_ref()
            .and_then(|d| d.fullscreen)
            .unwrap_or(false)
    }

    pub fn advance_interval_ms(&self) -> Millis {
        self.slideshow
            .as_ref()
            .and_then(|s| s.interval_secs)
            .map(|secs| secs as Millis * 1_000)
            .unwrap_or(DEFAULT_ADVANCE_MS)
    }

    pub fn placeholder(&self) -> Option<&Path> {
        self.slideshow
            .as_ref()
            .and_then(|s| s.placeholder.as_deref())
    }

    pub fn store_path(&self) -> Result<PathBuf> {
        match self.storage.as_ref().and_then(|s| s.path.clone()) {
            Some(path) => Ok(path),
            None => FileStore::default_path(),
        }
    }

    pub fn quota_bytes(&self) -> usize {
        self.storage
            .as_ref()
            .and_then(|s| s.quota_bytes)
            .unwrap_or(DEFAULT_QUOTA_BYTES)
    }

    pub fn open_store(&self) -> Result<FileStore> {
        let path = self.store_path()?;
        Ok(FileStore::open(&path, self.quota_bytes()))
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "defaults.theme" => {
                match value {
                    "light" | "dark" => {}
                    _ => anyhow::bail!("Invalid theme: {value}. Must be 'light' or 'dark'."),
                }
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .theme = Some(value.to_string());
            }
            "defaults.fullscreen" => {
                let fullscreen = match value {
                    "true" => true,
                    "false" => false,
                    _ => anyhow::bail!("Invalid fullscreen: {value}. Must be 'true' or 'false'."),
                };
                self.defaults
                    .get_or_insert_with(DefaultsConfig::default)
                    .fullscreen = Some(fullscreen);
            }
            "slideshow.interval_secs" => {
                let secs = match value.parse::<u64>() {
                    Ok(secs) if secs > 0 => secs,
                    _ => anyhow::bail!(
                        "Invalid interval_secs: {value}. Must be a positive number of seconds."
                    ),
                };
                self.slideshow
                    .get_or_insert_with(SlideshowConfig::default)
                    .interval_secs = Some(secs);
            }
            "slideshow.placeholder" => {
                let path = PathBuf::from(value);
                if !path.is_file() {
                    anyhow::bail!("Placeholder image not found: {value}");
                }
                self.slideshow
                    .get_or_insert_with(SlideshowConfig::default)
                    .placeholder = Some(path);
            }
            "storage.path" => {
                if value.is_empty() {
                    anyhow::bail!("Invalid storage path: must not be empty.");
                }
                self.storage
                    .get_or_insert_with(StorageConfig::default)
                    .path = Some(PathBuf::from(value));
            }
            "storage.quota_bytes" => {
                let quota = match value.parse::<usize>() {
                    Ok(quota) if quota > 0 => quota,
                    _ => anyhow::bail!(
                        "Invalid quota_bytes: {value}. Must be a positive number of bytes."
                    ),
                };
                self.storage
                    .get_or_insert_with(StorageConfig::default)
                    .quota_bytes = Some(quota);
            }
            _ => anyhow::bail!("Unknown config key: {key}. Valid keys: {VALID_KEYS}"),
        }
        Ok(())
    }
}
