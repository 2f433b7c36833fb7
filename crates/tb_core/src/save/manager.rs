use super::error::SaveError;
use super::format::TeamsEnvelope;
use super::migration::migrate_teams;
use super::storage::Storage;
use super::{LEGACY_STATE_KEY, LINK_LEVELS_KEY, TEAMS_KEY};
use crate::config::EngineConfig;
use crate::synergy::LinkLevels;
use crate::team::TeamCollection;
use serde_json::Value;

/// Reads and writes team collections and link levels through a [`Storage`]
pub struct SaveManager {
    storage: Box<dyn Storage>,
}

impl SaveManager {
    pub fn new(storage: impl Storage + 'static) -> Self {
        Self { storage: Box::new(storage) }
    }

    /// Loads the persisted collection, migrating the legacy single-team
    /// state when no collection was stored yet. `None` when nothing is stored.
    pub fn load_teams(&self, config: &EngineConfig) -> Result<Option<TeamCollection>, SaveError> {
        let text = match self.storage.get(TEAMS_KEY)? {
            Some(text) => text,
            None => match self.storage.get(LEGACY_STATE_KEY)? {
                Some(text) => {
                    log::info!("No stored team collection; found legacy state under '{}'", LEGACY_STATE_KEY);
                    text
                }
                None => return Ok(None),
            },
        };

        let value: Value = serde_json::from_str(&text)?;
        let envelope = migrate_teams(value)?;
        let collection = envelope.into_collection(config);
        log::info!("Loaded {} team(s), current index {}", collection.len(), collection.current_index());
        Ok(Some(collection))
    }

    pub fn save_teams(&mut self, collection: &TeamCollection) -> Result<(), SaveError> {
        let envelope = TeamsEnvelope::from_collection(collection);
        let text = serde_json::to_string(&envelope)?;
        self.storage.set(TEAMS_KEY, &text)?;
        log::debug!("Saved {} team(s)", collection.len());
        Ok(())
    }

    /// Link level choices; a missing entry is an empty map.
    pub fn load_link_levels(&self) -> Result<LinkLevels, SaveError> {
        match self.storage.get(LINK_LEVELS_KEY)? {
            Some(text) => Ok(serde_json::from_str(&text)?),
            None => Ok(LinkLevels::new()),
        }
    }

    pub fn save_link_levels(&mut self, levels: &LinkLevels) -> Result<(), SaveError> {
        let text = serde_json::to_string(levels)?;
        self.storage.set(LINK_LEVELS_KEY, &text)
    }

    pub fn storage(&self) -> &dyn Storage {
        self.storage.as_ref()
    }
}
