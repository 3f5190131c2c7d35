use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};

use crate::config::same_path;
use crate::error::{AppError, AppResult};
use crate::saves::{self, QuestIndex, SaveInfo};

use super::fsops;

const NOTE_FILE: &str = ".note.txt";

/// Profiles are the subdirectories of `root`; saves are their subdirectories.
/// Names passed in are expected to be sanitized already.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    root: PathBuf,
}

impl ProfileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn open(root: PathBuf) -> AppResult<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self::new(root))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn profile_dir(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    pub fn exists(&self, name: &str) -> bool {
        self.profile_dir(name).is_dir()
    }

    pub fn list_profiles(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.root) else {
            return Vec::new();
        };

        let mut profiles = entries
            .flatten()
            .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_dir()))
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect::<Vec<_>>();
        profiles.sort();
        profiles
    }

    /// Profile whose directory is `link_target`, if any.
    pub fn profile_for_target(&self, link_target: &Path) -> Option<String> {
        self.list_profiles()
            .into_iter()
            .find(|name| same_path(link_target, &self.profile_dir(name)))
    }

    pub fn create_profile(&self, name: &str) -> AppResult<PathBuf> {
        let path = self.profile_dir(name);
        if path.exists() {
            return Err(AppError::Conflict("profile exists".to_string()));
        }
        fs::create_dir_all(&path)?;
        Ok(path)
    }

    /// Removes the profile tree unless the game link currently targets it.
    /// Missing profiles are not an error.
    pub fn delete_profile(&self, name: &str, link_target: Option<&Path>) -> AppResult<()> {
        let path = self.profile_dir(name);
        if link_target.is_some_and(|target| same_path(target, &path)) {
            return Err(AppError::Conflict(
                "profile is active, unload first".to_string(),
            ));
        }

        if path.exists() {
            fs::remove_dir_all(&path)?;
        }
        Ok(())
    }

    pub fn read_note(&self, name: &str) -> String {
        fs::read_to_string(self.profile_dir(name).join(NOTE_FILE))
            .map(|note| note.trim().to_string())
            .unwrap_or_default()
    }

    pub fn write_note(&self, name: &str, note: &str) -> AppResult<()> {
        fs::write(self.profile_dir(name).join(NOTE_FILE), note)?;
        Ok(())
    }

    /// Saves of a profile, newest first. Unreadable profiles have no saves.
    pub fn list_saves(&self, name: &str, quests: &QuestIndex) -> Vec<SaveInfo> {
        let base = self.profile_dir(name);
        let Ok(entries) = fs::read_dir(&base) else {
            return Vec::new();
        };

        let mut saves = Vec::new();
        for entry in entries.flatten() {
            if !entry.file_type().is_ok_and(|kind| kind.is_dir()) {
                continue;
            }
            let Ok(modified) = entry.metadata().and_then(|meta| meta.modified()) else {
                continue;
            };

            let save_name = entry.file_name().to_string_lossy().into_owned();
            let save_dir = entry.path();
            let meta = saves::read_metadata(&save_dir, quests);

            saves.push((
                modified,
                SaveInfo {
                    kind: saves::classify_save(&save_name),
                    screenshot: saves::find_screenshot(&save_dir).unwrap_or_default(),
                    modified: format_modified(modified),
                    name: save_name,
                    playtime: meta.playtime,
                    level: meta.level,
                    quest: meta.quest,
                    quest_title: meta.quest_title,
                    objective: meta.objective,
                },
            ));
        }

        saves.sort_by(|a, b| b.0.cmp(&a.0));
        saves.into_iter().map(|(_, info)| info).collect()
    }

    pub fn delete_save(&self, profile: &str, save: &str) -> AppResult<()> {
        let path = self.profile_dir(profile).join(save);
        if path.exists() {
            fs::remove_dir_all(&path)?;
        }
        Ok(())
    }

    /// Copies one save into `target`, suffixing `_copy_<ts>` on collision.
    pub fn copy_save(&self, profile: &str, save: &str, target: &str) -> AppResult<PathBuf> {
        let source = self.profile_dir(profile).join(save);
        if !source.exists() {
            return Err(AppError::NotFound("source save not found".to_string()));
        }

        let dest_dir = self.profile_dir(target);
        fs::create_dir_all(&dest_dir)?;

        let mut dest = dest_dir.join(save);
        if dest.exists() {
            dest = dest_dir.join(format!("{save}_copy_{}", timestamp()));
        }

        fsops::copy_dir(&source, &dest)?;
        Ok(dest)
    }

    /// Copies every entry of `game_dir` into the profile, creating it.
    /// Fails with Conflict when `game_dir` already resolves to the profile.
    pub fn import_from(&self, game_dir: &Path, name: &str) -> AppResult<PathBuf> {
        let dest = self.profile_dir(name);
        fs::create_dir_all(&dest)?;

        let source = fs::canonicalize(game_dir)?;
        let resolved = fs::canonicalize(&dest)?;
        if resolved.starts_with(&source) || source.starts_with(&resolved) {
            return Err(AppError::Conflict(
                "profile is already active at the game save path".to_string(),
            ));
        }

        for entry in fs::read_dir(game_dir)? {
            let entry = entry?;
            fsops::copy_dir(&entry.path(), &dest.join(entry.file_name()))?;
        }

        Ok(dest)
    }

    pub fn export_zip(&self, name: &str) -> AppResult<File> {
        if !self.exists(name) {
            return Err(AppError::NotFound("profile not found".to_string()));
        }
        fsops::zip_dir(&self.profile_dir(name))
    }
}

pub fn timestamp() -> String {
    Local::now().format("%Y%m%d_%H%M%S").to_string()
}

fn format_modified(modified: SystemTime) -> String {
    DateTime::<Local>::from(modified)
        .format("%Y-%m-%d %H:%M:%S")
        .to_string()
}
