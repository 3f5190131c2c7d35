use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use serde::Serialize;

use crate::config::{self, AppPaths, Settings, dir_exists};
use crate::error::{AppError, AppResult};
use crate::junction;
use crate::output::Output;
use crate::presence::{self, GAME_EXECUTABLE, Presence, ProcessProbe};
use crate::profiles::ProfileStore;
use crate::saves::QuestIndex;

/// Command-line values that win over the stored settings.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub port: Option<u16>,
    pub game_path: Option<PathBuf>,
    pub profiles_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StateView {
    pub profiles: Vec<String>,
    pub active: String,
    pub game_path: String,
    pub path_missing: bool,
    pub profiles_dir: String,
    pub game_running: bool,
}

#[derive(Debug)]
pub struct AppContext {
    pub verbose: u8,
    pub paths: AppPaths,
    pub store: ProfileStore,
    pub quests: QuestIndex,
    pub presence: Arc<Presence>,
    pub output: Output,
    settings: Mutex<Settings>,
    port_override: Option<u16>,
    game_save_path: RwLock<Option<PathBuf>>,
}

impl AppContext {
    pub fn bootstrap(overrides: Overrides, json: bool, verbose: u8) -> AppResult<Self> {
        let paths = AppPaths::discover()?;
        let settings = config::load_settings(&paths)?;
        Self::from_parts(paths, settings, overrides, Output::new(json), verbose)
    }

    pub fn from_parts(
        paths: AppPaths,
        settings: Settings,
        overrides: Overrides,
        output: Output,
        verbose: u8,
    ) -> AppResult<Self> {
        let game_save_path = overrides
            .game_path
            .or_else(|| settings.game_save_path.clone())
            .or_else(|| config::paths::detect_game_save_path().0);
        let profiles_dir = overrides
            .profiles_dir
            .or_else(|| settings.profiles_dir.clone())
            .unwrap_or_else(|| paths.default_profiles_dir());

        let store = ProfileStore::open(profiles_dir).map_err(|err| {
            AppError::Config(format!("failed to create profiles dir: {err}"))
        })?;
        let quests = QuestIndex::load(settings.quest_data.as_deref());

        tracing::debug!(
            profiles = %store.root().display(),
            game_path = ?game_save_path,
            quest_titles = quests.len(),
            "context ready"
        );

        Ok(Self {
            verbose,
            paths,
            store,
            quests,
            presence: Arc::new(Presence::default()),
            output,
            settings: Mutex::new(settings),
            port_override: overrides.port,
            game_save_path: RwLock::new(game_save_path),
        })
    }

    pub fn settings(&self) -> Settings {
        self.settings
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Port to bind: `--port` when given, otherwise the stored one.
    pub fn port(&self) -> u16 {
        config::settings::effective_port(self.port_override.unwrap_or(self.settings().port))
    }

    /// Writes the first `config.json`, keeping a `--port` given on this run.
    /// Returns false when a config already exists.
    pub fn persist_initial_settings(&self) -> AppResult<bool> {
        if self.paths.settings_file().exists() {
            return Ok(false);
        }
        let port = self.port();
        self.update_settings(|settings| settings.port = port)?;
        Ok(true)
    }

    pub fn update_settings(&self, apply: impl FnOnce(&mut Settings)) -> AppResult<()> {
        let mut settings = self.settings.lock().unwrap_or_else(PoisonError::into_inner);
        apply(&mut settings);
        config::save_settings(&self.paths, &settings)
    }

    pub fn game_save_path(&self) -> Option<PathBuf> {
        self.game_save_path
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn require_game_save_path(&self) -> AppResult<PathBuf> {
        self.game_save_path()
            .ok_or_else(|| AppError::InvalidInput("game save path not set".to_string()))
    }

    /// Replaces the game save path and persists it.
    pub fn set_game_save_path(&self, path: PathBuf) -> AppResult<()> {
        *self
            .game_save_path
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(path.clone());
        self.update_settings(|settings| settings.game_save_path = Some(path))
    }

    pub fn link_target(&self) -> Option<PathBuf> {
        junction::read_target(&self.game_save_path()?)
    }

    pub fn active_profile(&self) -> Option<String> {
        self.store.profile_for_target(&self.link_target()?)
    }

    pub fn state(&self) -> StateView {
        let game_path = self
            .game_save_path()
            .filter(|path| dir_exists(path))
            .map(|path| path.display().to_string())
            .unwrap_or_default();

        StateView {
            profiles: self.store.list_profiles(),
            active: self.active_profile().unwrap_or_default(),
            path_missing: game_path.is_empty(),
            game_path,
            profiles_dir: self.store.root().display().to_string(),
            game_running: self.presence.is_running(),
        }
    }

    /// Probes once; outside `serve` nothing else keeps the flag current.
    pub async fn refresh_presence<P: ProcessProbe>(&self, probe: &P) {
        presence::poll_once(&self.presence, probe, GAME_EXECUTABLE, &presence::log_change).await;
    }

    fn ensure_game_stopped(&self) -> AppResult<()> {
        if self.presence.is_running() {
            return Err(AppError::Conflict("game is running".to_string()));
        }
        Ok(())
    }

    /// Points the game save path at the profile, creating it when missing.
    pub fn load_profile(&self, name: &str) -> AppResult<PathBuf> {
        let link = self.require_game_save_path()?;
        self.ensure_game_stopped()?;

        let target = self.store.profile_dir(name);
        std::fs::create_dir_all(&target)?;
        junction::switch_junction(&link, &target)?;

        tracing::info!(profile = name, link = %link.display(), "profile loaded");
        Ok(target)
    }

    pub fn import_profile(&self, name: &str) -> AppResult<PathBuf> {
        let game_path = self.require_game_save_path()?;
        self.ensure_game_stopped()?;

        let dest = self.store.import_from(&game_path, name)?;
        tracing::info!(profile = name, from = %game_path.display(), "saves imported");
        Ok(dest)
    }

    pub fn delete_profile(&self, name: &str) -> AppResult<()> {
        self.store
            .delete_profile(name, self.link_target().as_deref())?;
        tracing::info!(profile = name, "profile deleted");
        Ok(())
    }

    pub fn profiles_root(&self) -> &Path {
        self.store.root()
    }
}
