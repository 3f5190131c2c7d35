use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AppError, AppResult};

const APP_DIR: &str = "cybersaver";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone)]
pub struct AppPaths {
    config_dir: PathBuf,
    data_dir: PathBuf,
}

impl AppPaths {
    pub fn discover() -> AppResult<Self> {
        let config_root = dirs::config_dir()
            .ok_or_else(|| AppError::Config("unable to resolve config directory".to_string()))?;
        let data_root = dirs::data_dir()
            .ok_or_else(|| AppError::Config("unable to resolve data directory".to_string()))?;

        let config_dir = config_root.join(APP_DIR);
        fs::create_dir_all(&config_dir)?;

        Ok(Self {
            config_dir,
            data_dir: data_root.join(APP_DIR),
        })
    }

    pub fn rooted_at(root: &Path) -> Self {
        Self {
            config_dir: root.join("config"),
            data_dir: root.join("data"),
        }
    }

    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn default_profiles_dir(&self) -> PathBuf {
        self.data_dir.join("profiles")
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

pub fn default_game_save_path() -> Option<PathBuf> {
    let home = dirs::home_dir()?;
    Some(
        home.join("Saved Games")
            .join("CD Projekt Red")
            .join("Cyberpunk 2077"),
    )
}

/// Default save location and whether it is already a directory.
pub fn detect_game_save_path() -> (Option<PathBuf>, bool) {
    let path = default_game_save_path();
    let exists = path.as_deref().is_some_and(dir_exists);
    (path, exists)
}

pub fn dir_exists(path: &Path) -> bool {
    fs::metadata(path).is_ok_and(|meta| meta.is_dir())
}

pub fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Absolute, case-insensitive path equality.
pub fn same_path(a: &Path, b: &Path) -> bool {
    let a = absolute(a);
    let b = absolute(b);
    a.to_string_lossy()
        .to_lowercase()
        .trim_end_matches(['/', '\\'])
        == b.to_string_lossy()
            .to_lowercase()
            .trim_end_matches(['/', '\\'])
}
