use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::AppResult;

pub const DEFAULT_PORT: u16 = 8787;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub game_save_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profiles_dir: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quest_data: Option<PathBuf>,
}

impl Settings {
    /// Port to bind; anything below 1024 falls back to the default.
    pub fn effective_port(&self) -> u16 {
        effective_port(self.port)
    }
}

pub fn effective_port(port: u16) -> u16 {
    if port < 1024 {
        return DEFAULT_PORT;
    }
    port
}

pub fn load(path: &Path) -> AppResult<Settings> {
    if !path.exists() {
        return Ok(Settings::default());
    }

    let raw = fs::read_to_string(path)?;
    match serde_json::from_str(&raw) {
        Ok(settings) => Ok(settings),
        Err(err) => {
            tracing::warn!(path = %path.display(), "ignoring unreadable config: {err}");
            Ok(Settings::default())
        }
    }
}

pub fn save(path: &Path, settings: &Settings) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut settings = settings.clone();
    if settings.port == 0 {
        settings.port = DEFAULT_PORT;
    }

    let payload = serde_json::to_string_pretty(&settings)?;
    fs::write(path, payload)?;
    Ok(())
}
