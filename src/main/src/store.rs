use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use time::{macros::format_description, OffsetDateTime};

// Oldest notifications are discarded beyond this
const MAX_NOTIFICATIONS: usize = 50;

/// Entity states shared with the home automation host.
pub trait StateStore {
    /// Raw state of `entity_id`, `None` if the entity is unknown or has no state.
    fn state(&self, entity_id: &str) -> Result<Option<String>>;

    fn set_value(&mut self, entity_id: &str, value: f64) -> Result<()>;

    fn notify(&mut self, title: &str, message: &str) -> Result<()>;
}

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub created: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
struct StateDocument {
    #[serde(default)]
    states: BTreeMap<String, Value>,
    #[serde(default)]
    notifications: Vec<Notification>,
}

/// State store kept in a JSON file, re-read on every access so that
/// changes made by other processes are picked up.
#[derive(Clone, Debug)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    #[cfg(test)]
    pub fn notifications(&self) -> Result<Vec<Notification>> {
        Ok(self.load()?.notifications)
    }

    fn load(&self) -> Result<StateDocument> {
        if !self.path.exists() {
            return Ok(StateDocument::default());
        }
        let json = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read state file {}", self.path.display()))?;
        let document = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse state file {}", self.path.display()))?;
        Ok(document)
    }

    fn save(&self, document: &StateDocument) -> Result<()> {
        let json = serde_json::to_string_pretty(document)?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, json)
            .with_context(|| format!("Failed to write {}", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                tmp_path.display(),
                self.path.display()
            )
        })?;
        Ok(())
    }
}

impl StateStore for JsonFileStore {
    fn state(&self, entity_id: &str) -> Result<Option<String>> {
        let mut document = self.load()?;
        let state = match document.states.remove(entity_id) {
            None | Some(Value::Null) => None,
            Some(Value::String(text)) => Some(text),
            Some(other) => Some(other.to_string()),
        };
        Ok(state)
    }

    fn set_value(&mut self, entity_id: &str, value: f64) -> Result<()> {
        let mut document = self.load()?;
        document
            .states
            .insert(entity_id.to_string(), Value::from(value));
        self.save(&document)
    }

    fn notify(&mut self, title: &str, message: &str) -> Result<()> {
        let created = OffsetDateTime::now_utc()
            .format(format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]Z"))?;

        let mut document = self.load()?;
        document.notifications.push(Notification {
            title: title.to_string(),
            message: message.to_string(),
            created,
        });
        let excess = document.notifications.len().saturating_sub(MAX_NOTIFICATIONS);
        document.notifications.drain(..excess);
        self.save(&document)
    }
}

#[cfg(test)]
pub use memory::MemoryStore;
