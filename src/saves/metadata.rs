use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::SaveKind;
use super::quests::QuestIndex;

const SCREENSHOT_CANDIDATES: [&str; 4] = [
    "screenshot.png",
    "screenshot.jpg",
    "screenshot.jpeg",
    "screenshot.bmp",
];

/// Display fields pulled from a save's `metadata*.json` sidecar.
/// Every field is empty when the sidecar is missing or unreadable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaSummary {
    pub playtime: String,
    pub level: String,
    pub quest: String,
    pub quest_title: String,
    pub objective: String,
}

#[derive(Debug, Default, Deserialize)]
struct SidecarFile {
    #[serde(rename = "Data", default)]
    data: SidecarData,
}

#[derive(Debug, Default, Deserialize)]
struct SidecarData {
    #[serde(default)]
    metadata: SidecarMetadata,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SidecarMetadata {
    #[serde(default)]
    tracked_quest_entry: String,
    #[serde(default)]
    play_time: f64,
    #[serde(default)]
    level: f64,
}

pub fn classify_save(name: &str) -> SaveKind {
    let lower = name.to_lowercase();
    if lower.contains("auto") {
        SaveKind::Auto
    } else if lower.contains("manual") {
        SaveKind::Manual
    } else {
        SaveKind::Other
    }
}

/// Relative `<save>/<file>` path of the first screenshot found.
pub fn find_screenshot(save_dir: &Path) -> Option<String> {
    let dir_name = save_dir.file_name()?.to_string_lossy();
    SCREENSHOT_CANDIDATES
        .iter()
        .find(|candidate| save_dir.join(candidate).exists())
        .map(|candidate| format!("{dir_name}/{candidate}"))
}

pub fn read_metadata(save_dir: &Path, quests: &QuestIndex) -> MetaSummary {
    let Some(sidecar) = find_sidecar(save_dir) else {
        return MetaSummary::default();
    };

    let parsed = fs::read_to_string(&sidecar)
        .ok()
        .and_then(|raw| serde_json::from_str::<SidecarFile>(&raw).ok());
    let Some(file) = parsed else {
        tracing::debug!(path = %sidecar.display(), "unreadable save metadata");
        return MetaSummary::default();
    };

    let meta = file.data.metadata;
    let lookup = quests.lookup(&meta.tracked_quest_entry);
    MetaSummary {
        playtime: format_playtime(meta.play_time),
        level: format_level(meta.level),
        quest: trim_quest(&meta.tracked_quest_entry).to_string(),
        quest_title: lookup.title.unwrap_or_default().to_string(),
        objective: lookup.objective.unwrap_or_default().to_string(),
    }
}

fn find_sidecar(save_dir: &Path) -> Option<std::path::PathBuf> {
    let mut candidates = fs::read_dir(save_dir)
        .ok()?
        .flatten()
        .filter(|entry| {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            name.starts_with("metadata") && name.ends_with(".json")
        })
        .map(|entry| entry.path())
        .collect::<Vec<_>>();
    candidates.sort();
    candidates.into_iter().next()
}

pub fn format_playtime(seconds: f64) -> String {
    if seconds <= 0.0 {
        return String::new();
    }
    let total_minutes = (seconds / 60.0) as u64;
    format!("{}h {}m", total_minutes / 60, total_minutes % 60)
}

pub fn format_level(level: f64) -> String {
    if level <= 0.0 {
        return String::new();
    }
    format!("Lvl {}", level as i64)
}

/// Last `/` segment of a quest path; the whole path when it has none.
pub fn trim_quest(quest: &str) -> &str {
    match quest.rfind('/') {
        Some(idx) if idx + 1 < quest.len() => &quest[idx + 1..],
        _ => quest,
    }
}
