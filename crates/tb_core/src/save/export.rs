//! Team export files.
//!
//! An export carries a schema + app signature, a timestamp and the team's
//! occupied slots and bench entries with enough identity (`variantId`,
//! `baseId`, `position`) to re-resolve them against a different catalog
//! revision. Import re-applies every placement rule; entries that cannot be
//! resolved or placed are dropped and reported.

use super::EXPORT_SCHEMA;
use crate::catalog::{CatalogIndex, CharacterVariant, Position};
use crate::config::EngineConfig;
use crate::error::{Result, TeamError};
use crate::team::{normalize_team_name, Team, TeamState};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Entry identity fields are optional on read; an entry that cannot be
/// resolved is dropped at import instead of failing the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedSlot {
    pub slot_index: usize,
    #[serde(default)]
    pub variant_id: String,
    #[serde(default)]
    pub base_id: String,
    #[serde(default, deserialize_with = "lenient_position")]
    pub position: Option<Position>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedBenchEntry {
    pub order: usize,
    #[serde(default)]
    pub variant_id: String,
    #[serde(default)]
    pub base_id: String,
    #[serde(default, deserialize_with = "lenient_position")]
    pub position: Option<Position>,
}

/// Accepts position codes or role names; anything else reads as `None`.
fn lenient_position<'de, D>(deserializer: D) -> std::result::Result<Option<Position>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(Value::as_str).and_then(Position::from_role))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportedTeam {
    pub name: String,
    pub layout_index: usize,
    #[serde(default)]
    pub slots: Vec<ExportedSlot>,
    #[serde(default)]
    pub bench: Vec<ExportedBenchEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportFile {
    pub schema_version: String,
    pub app_name: String,
    pub exported_at: DateTime<Utc>,
    pub team_index: usize,
    pub team: ExportedTeam,
}

impl ExportFile {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| TeamError::ImportParse(e.to_string()))
    }
}

/// Builds the export for one team. Ids missing from the catalog are skipped.
pub fn export_team(team: &Team, team_index: usize, catalog: &CatalogIndex, config: &EngineConfig) -> ExportFile {
    let resolve = |id: &str| -> Option<&CharacterVariant> {
        let found = catalog.get(id);
        if found.is_none() {
            log::warn!("Export skips {}: not in catalog", id);
        }
        found
    };

    let slots = team
        .slots()
        .iter()
        .enumerate()
        .filter_map(|(slot_index, id)| id.as_deref().map(|id| (slot_index, id)))
        .filter_map(|(slot_index, id)| {
            resolve(id).map(|c| ExportedSlot {
                slot_index,
                variant_id: c.variant_id.clone(),
                base_id: c.base_id.clone(),
                position: Some(c.position),
            })
        })
        .collect();

    let bench = team
        .bench()
        .iter()
        .enumerate()
        .filter_map(|(order, id)| {
            resolve(id).map(|c| ExportedBenchEntry {
                order,
                variant_id: c.variant_id.clone(),
                base_id: c.base_id.clone(),
                position: Some(c.position),
            })
        })
        .collect();

    ExportFile {
        schema_version: EXPORT_SCHEMA.to_string(),
        app_name: config.export_app_name.clone(),
        exported_at: Utc::now(),
        team_index,
        team: ExportedTeam { name: team.name.clone(), layout_index: team.layout_index(), slots, bench },
    }
}

/// Parses an export and checks its schema + app signature.
pub fn parse_export(text: &str, config: &EngineConfig) -> Result<ExportFile> {
    let value: Value = serde_json::from_str(text.trim_start_matches('\u{feff}'))
        .map_err(|e| TeamError::ImportParse(e.to_string()))?;

    let field = |name: &str| value.get(name).and_then(Value::as_str).unwrap_or("").to_string();
    let (schema, app) = (field("schemaVersion"), field("appName"));
    if schema != EXPORT_SCHEMA || app != config.export_app_name {
        return Err(TeamError::ImportSchemaMismatch {
            expected: format!("{} / {}", EXPORT_SCHEMA, config.export_app_name),
            found: format!("{} / {}", schema, app),
        });
    }

    serde_json::from_value(value).map_err(|e| TeamError::ImportParse(e.to_string()))
}

/// Result of rebuilding an exported team
#[derive(Debug, Clone)]
pub struct ImportedTeam {
    pub team: Team,
    /// Entries that did not resolve or were rejected by placement rules
    pub dropped: Vec<String>,
}

fn resolve_entry<'a>(
    catalog: &'a CatalogIndex,
    variant_id: &str,
    base_id: &str,
    position: Option<Position>,
) -> Option<&'a CharacterVariant> {
    if !variant_id.is_empty() {
        if let Some(found) = catalog.get(variant_id) {
            return Some(found);
        }
    }
    match position {
        Some(position) if !base_id.is_empty() => catalog.find_by_base_and_position(base_id, position),
        _ => None,
    }
}

/// Name reported for a dropped entry: its variant id, else its base id.
fn entry_label(variant_id: &str, base_id: &str) -> String {
    if variant_id.is_empty() {
        base_id.to_string()
    } else {
        variant_id.to_string()
    }
}

/// Rebuilds a team from an export, applying the live placement rules.
///
/// Slots are placed in slot order, then bench entries in `order`. The team
/// gets a fresh id and an empty undo history.
pub fn import_team(file: &ExportFile, catalog: &CatalogIndex, config: &EngineConfig) -> ImportedTeam {
    let name = normalize_team_name(&file.team.name, config.team_name_max_len)
        .unwrap_or_else(|_| format!("{} (imported)", config.default_team_name));
    let initial = TeamState { layout_index: file.team.layout_index, ..TeamState::default() };
    let mut team = Team::with_state(uuid::Uuid::new_v4().to_string(), name, initial, config.team_limits());
    let mut dropped = Vec::new();

    let mut slots: Vec<&ExportedSlot> = file.team.slots.iter().collect();
    slots.sort_by_key(|s| s.slot_index);
    for entry in slots {
        let label = entry_label(&entry.variant_id, &entry.base_id);
        let placed = match resolve_entry(catalog, &entry.variant_id, &entry.base_id, entry.position) {
            Some(c) => team.place_in_slot(catalog, &c.variant_id, entry.slot_index).map(|_| ()),
            None => Err(TeamError::UnknownCharacter(label.clone())),
        };
        if let Err(e) = placed {
            log::warn!("Import dropped slot entry {}: {}", label, e);
            dropped.push(label);
        }
    }

    let mut bench: Vec<&ExportedBenchEntry> = file.team.bench.iter().collect();
    bench.sort_by_key(|b| b.order);
    for entry in bench {
        let label = entry_label(&entry.variant_id, &entry.base_id);
        let placed = match resolve_entry(catalog, &entry.variant_id, &entry.base_id, entry.position) {
            Some(c) => team.place_in_bench(catalog, &c.variant_id).map(|_| ()),
            None => Err(TeamError::UnknownCharacter(label.clone())),
        };
        if let Err(e) = placed {
            log::warn!("Import dropped bench entry {}: {}", label, e);
            dropped.push(label);
        }
    }

    let state = team.state().clone();
    team.restore_composition(state);
    ImportedTeam { team, dropped }
}
