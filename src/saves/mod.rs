pub mod metadata;
pub mod quests;

pub use metadata::{MetaSummary, classify_save, find_screenshot, read_metadata};
pub use quests::{QuestIndex, QuestLookup};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SaveKind {
    Auto,
    Manual,
    Other,
}

impl SaveKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SaveKind::Auto => "Auto",
            SaveKind::Manual => "Manual",
            SaveKind::Other => "Other",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveInfo {
    pub name: String,
    pub modified: String,
    #[serde(rename = "type")]
    pub kind: SaveKind,
    pub screenshot: String,
    pub playtime: String,
    pub level: String,
    pub quest: String,
    pub quest_title: String,
    pub objective: String,
}
