use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::{AppError, AppResult};

const BUNDLED_QUEST_DATA: &str = include_str!("../../data/journal-quest-data.json");

/// Quest path → title and objective path → description, keyed by
/// normalized journal paths. Built once, never mutated.
#[derive(Debug, Clone, Default)]
pub struct QuestIndex {
    path_to_title: HashMap<String, String>,
    objective_to_description: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestLookup<'a> {
    pub title: Option<&'a str>,
    pub objective: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct QuestEntry {
    #[serde(default)]
    path: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    phases: Vec<QuestPhase>,
}

#[derive(Debug, Deserialize)]
struct QuestPhase {
    #[serde(default)]
    path: String,
    #[serde(default)]
    objectives: Vec<QuestObjective>,
}

#[derive(Debug, Deserialize)]
struct QuestObjective {
    #[serde(default)]
    path: String,
    #[serde(default)]
    description: String,
}

impl QuestIndex {
    pub fn from_json(raw: &str) -> AppResult<Self> {
        let entries: Vec<QuestEntry> = serde_json::from_str(raw)?;
        let mut index = Self::default();

        for quest in &entries {
            insert_first(&mut index.path_to_title, &quest.path, &quest.title);
            for phase in &quest.phases {
                insert_first(&mut index.path_to_title, &phase.path, &quest.title);
                for objective in &phase.objectives {
                    insert_first(&mut index.path_to_title, &objective.path, &quest.title);
                    insert_first(
                        &mut index.objective_to_description,
                        &objective.path,
                        &objective.description,
                    );
                }
            }
        }

        Ok(index)
    }

    pub fn bundled() -> Self {
        Self::from_json(BUNDLED_QUEST_DATA).unwrap_or_else(|err| {
            tracing::warn!("failed to parse bundled quest data: {err}; quest titles unavailable");
            Self::default()
        })
    }

    /// Loads `custom` when given, falling back to the bundled table.
    pub fn load(custom: Option<&Path>) -> Self {
        let Some(path) = custom else {
            return Self::bundled();
        };

        let parsed = fs::read_to_string(path)
            .map_err(AppError::from)
            .and_then(|raw| Self::from_json(&raw));
        match parsed {
            Ok(index) => {
                tracing::debug!(path = %path.display(), titles = index.len(), "loaded quest data");
                index
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), "failed to load quest data: {err}");
                Self::bundled()
            }
        }
    }

    pub fn len(&self) -> usize {
        self.path_to_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.path_to_title.is_empty()
    }

    /// Exact match for the objective, longest known prefix for the title.
    pub fn lookup(&self, path: &str) -> QuestLookup<'_> {
        let normalized = normalize_path(path);
        if normalized.is_empty() {
            return QuestLookup::default();
        }

        let objective = self
            .objective_to_description
            .get(&normalized)
            .map(String::as_str);

        let mut cursor = normalized.as_str();
        let mut title = None;
        while !cursor.is_empty() {
            if let Some(found) = self.path_to_title.get(cursor) {
                title = Some(found.as_str());
                break;
            }
            cursor = parent_path(cursor);
        }

        QuestLookup { title, objective }
    }
}

fn insert_first(map: &mut HashMap<String, String>, path: &str, value: &str) {
    if path.is_empty() {
        return;
    }
    map.entry(normalize_path(path))
        .or_insert_with(|| value.to_string());
}

fn normalize_path(path: &str) -> String {
    path.to_lowercase().trim_matches('/').to_string()
}

fn parent_path(path: &str) -> &str {
    match path.rfind('/') {
        Some(idx) if idx > 0 => &path[..idx],
        _ => "",
    }
}
