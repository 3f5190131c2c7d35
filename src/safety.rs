use std::fs;
use std::path::{Path, PathBuf};

use crate::config::dir_exists;
use crate::error::AppResult;
use crate::junction;
use crate::profiles::fsops;
use crate::profiles::store::timestamp;

const MARKER_FILE: &str = ".warning_ack";

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProtectionReport {
    pub first_run: bool,
    pub foreign_link: Option<PathBuf>,
    pub backup: Option<PathBuf>,
}

/// First-run safeguard: warns about the junction, flags a link that points
/// outside `profiles_dir`, and copies the current saves next to the game
/// folder. A marker in `profiles_dir` keeps this from repeating.
pub fn ensure_protection(game_path: Option<&Path>, profiles_dir: &Path) -> AppResult<ProtectionReport> {
    let marker = profiles_dir.join(MARKER_FILE);
    if marker.exists() {
        return Ok(ProtectionReport::default());
    }

    tracing::warn!(
        profiles = %profiles_dir.display(),
        "the game save folder will be replaced by a junction; deleting the profiles folder loses the saves stored there"
    );

    let mut report = ProtectionReport {
        first_run: true,
        ..Default::default()
    };

    if let Some(game_path) = game_path {
        if let Some(target) = junction::read_target(game_path) {
            if !junction::points_into(&target, profiles_dir) {
                tracing::warn!(
                    link = %game_path.display(),
                    target = %target.display(),
                    "an existing link at the save location points elsewhere and will be replaced"
                );
                report.foreign_link = Some(target);
            }
        }

        if dir_exists(game_path) {
            let backup = backup_dir(game_path);
            match fsops::copy_dir(game_path, &backup) {
                Ok(()) => {
                    tracing::info!(path = %backup.display(), "backup created");
                    report.backup = Some(backup);
                }
                Err(err) => tracing::warn!("backup failed: {err}"),
            }
        }
    }

    fs::create_dir_all(profiles_dir)?;
    fs::write(&marker, "ack")?;
    Ok(report)
}

fn backup_dir(game_path: &Path) -> PathBuf {
    let parent = game_path.parent().unwrap_or(Path::new("."));
    parent.join(format!("Cyberpunk 2077_backup_{}", timestamp()))
}
