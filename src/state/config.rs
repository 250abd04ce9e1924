// Configuration file loading and saving

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::state::settings::Settings;

const APP_NAME: &str = "mongotree";
const SETTINGS_FILE: &str = "settings.json";

/// Reads and writes the settings file
#[derive(Clone, Debug)]
pub struct ConfigManager {
    settings_path: PathBuf,
}

impl ConfigManager {
    /// Settings in the platform config directory (e.g. `~/.config/mongotree/settings.json`)
    pub fn new() -> Result<Self> {
        let config_dir = dirs::config_dir()
            .map(|p| p.join(APP_NAME))
            .context("Could not determine config directory")?;
        Ok(Self { settings_path: config_dir.join(SETTINGS_FILE) })
    }

    /// Settings at an explicit path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { settings_path: path.into() }
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    /// Load settings; a missing file yields the defaults.
    pub fn load_settings(&self) -> Result<Settings> {
        let path = &self.settings_path;
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Settings::default());
        }

        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let settings: Settings = serde_json::from_str(&data)
            .with_context(|| format!("Failed to deserialize {}", path.display()))?;

        Ok(settings)
    }

    /// Save settings (atomic via temp + rename), creating the directory if needed.
    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let path = &self.settings_path;
        if let Some(dir) = path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(dir).context("Failed to create config directory")?;
        }

        let json = serde_json::to_string_pretty(settings)
            .with_context(|| format!("Failed to serialize {}", path.display()))?;

        atomic_write(path, json.as_bytes())
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }
}

fn atomic_write(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    std::io::Write::write_all(&mut tmp, data)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
