// Persisted team collection envelope (schema 2) and the legacy single-team state
use super::TEAMS_SCHEMA_VERSION;
use crate::config::EngineConfig;
use crate::formation::SLOT_COUNT;
use crate::team::{Team, TeamCollection, TeamState};
use serde::{Deserialize, Serialize};

/// One team as stored; every field tolerates absence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedTeam {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "layoutIdx")]
    pub layout_index: usize,
    #[serde(default)]
    pub slots: Vec<Option<String>>,
    #[serde(default)]
    pub bench: Vec<String>,
}

/// Slot list padded or cut to exactly [`SLOT_COUNT`] entries
fn slot_array(slots: Vec<Option<String>>) -> [Option<String>; SLOT_COUNT] {
    let mut out: [Option<String>; SLOT_COUNT] = Default::default();
    for (dst, src) in out.iter_mut().zip(slots) {
        *dst = src;
    }
    out
}

impl PersistedTeam {
    pub fn from_team(team: &Team) -> Self {
        Self {
            id: team.id.clone(),
            name: team.name.clone(),
            layout_index: team.layout_index(),
            slots: team.slots().to_vec(),
            bench: team.bench().to_vec(),
        }
    }

    /// Rebuilds a team with an empty undo history. Repairs are structural
    /// only: catalog constraints are not re-checked.
    pub fn into_team(self, position: usize, config: &EngineConfig) -> Team {
        if self.slots.len() != SLOT_COUNT {
            log::warn!("Persisted team '{}' has {} slots, repaired to {}", self.name, self.slots.len(), SLOT_COUNT);
        }
        let id = if self.id.trim().is_empty() { uuid::Uuid::new_v4().to_string() } else { self.id };
        let name = crate::team::normalize_team_name(&self.name, config.team_name_max_len)
            .unwrap_or_else(|_| format!("{} {}", config.default_team_name, position + 1));
        let state = TeamState { layout_index: self.layout_index, slots: slot_array(self.slots), bench: self.bench };
        Team::with_state(id, name, state, config.team_limits())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamsEnvelope {
    pub schema_version: u32,
    #[serde(default)]
    pub current_team_index: usize,
    #[serde(default)]
    pub teams: Vec<PersistedTeam>,
}

impl TeamsEnvelope {
    pub fn from_collection(collection: &TeamCollection) -> Self {
        Self {
            schema_version: TEAMS_SCHEMA_VERSION,
            current_team_index: collection.current_index(),
            teams: collection.teams().iter().map(PersistedTeam::from_team).collect(),
        }
    }

    pub fn into_collection(self, config: &EngineConfig) -> TeamCollection {
        let teams = self.teams.into_iter().enumerate().map(|(i, t)| t.into_team(i, config)).collect();
        TeamCollection::from_teams(teams, self.current_team_index, config)
    }
}

/// Single-team state written before multi-team support
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacyTeamState {
    #[serde(default)]
    pub layout_idx: usize,
    #[serde(default)]
    pub slots: Vec<Option<String>>,
    #[serde(default)]
    pub bench: Vec<String>,
}
