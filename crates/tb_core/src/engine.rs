//! `TeamBuilderEngine`: the single owner of reference data, teams, link level
//! choices and persistence.
//!
//! Every successful mutating call runs the same pipeline: mutate, recompute
//! bonuses and synergies, notify listeners once, then persist (best effort).
//! Failed calls change nothing and notify nobody.

use crate::bonus::{compute_bonuses, BonusReport};
use crate::catalog::{CatalogQuery, CharacterVariant, Position, PositionGroup};
use crate::config::EngineConfig;
use crate::data::ReferenceData;
use crate::error::{Result, TeamError};
use crate::formation::{self, SLOT_COUNT};
use crate::save::{self, ExportFile, SaveManager, Storage};
use crate::synergy::{compute_synergies, LinkLevels, SynergyReport};
use crate::team::{PlacementOutcome, QuickPlacement, Team, TeamCollection};
use serde::Serialize;

pub type ListenerId = u64;

type Listener = Box<dyn FnMut(&EngineSnapshot)>;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotView {
    pub slot_index: usize,
    pub position: Position,
    pub variant_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub id: String,
    pub name: String,
    pub layout_index: usize,
    pub slots: Vec<SlotView>,
    pub bench: Vec<String>,
    pub bench_capacity: usize,
    pub undo_depth: usize,
}

impl TeamView {
    pub fn from_team(team: &Team) -> Self {
        let slots = (0..SLOT_COUNT)
            .map(|slot_index| SlotView {
                slot_index,
                position: formation::layout(team.layout_index())[slot_index].position,
                variant_id: team.slots()[slot_index].clone(),
            })
            .collect();
        Self {
            id: team.id.clone(),
            name: team.name.clone(),
            layout_index: team.layout_index(),
            slots,
            bench: team.bench().to_vec(),
            bench_capacity: team.limits().bench_capacity,
            undo_depth: team.undo_depth(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub index: usize,
    pub id: String,
    pub name: String,
}

/// Everything a renderer needs after a change
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngineSnapshot {
    pub team_index: usize,
    pub teams: Vec<TeamSummary>,
    pub team: TeamView,
    pub on_field: Vec<CharacterVariant>,
    pub bonuses: BonusReport,
    pub synergies: SynergyReport,
}

/// What changed, and so what must be written back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Changed {
    Teams,
    LinkLevels,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub team_index: usize,
    pub dropped: Vec<String>,
}

pub struct TeamBuilderEngine {
    data: ReferenceData,
    config: EngineConfig,
    teams: TeamCollection,
    link_levels: LinkLevels,
    save: Option<SaveManager>,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: ListenerId,
}

impl TeamBuilderEngine {
    /// Engine without persistence, starting from one empty team
    pub fn new(data: ReferenceData, config: EngineConfig) -> Self {
        Self {
            teams: TeamCollection::new(&config),
            data,
            config,
            link_levels: LinkLevels::new(),
            save: None,
            listeners: Vec::new(),
            next_listener_id: 1,
        }
    }

    /// Engine backed by `storage`. Unreadable stored state is logged and
    /// replaced by a fresh collection.
    pub fn with_storage(data: ReferenceData, config: EngineConfig, storage: impl Storage + 'static) -> Self {
        let manager = SaveManager::new(storage);
        let mut engine = Self::new(data, config);

        match manager.load_teams(&engine.config) {
            Ok(Some(teams)) => engine.teams = teams,
            Ok(None) => log::info!("No stored teams; starting with an empty team"),
            Err(e) => log::warn!("Stored teams unreadable, starting fresh: {}", e),
        }
        match manager.load_link_levels() {
            Ok(levels) => engine.link_levels = levels,
            Err(e) => log::warn!("Stored link levels unreadable, using defaults: {}", e),
        }

        engine.save = Some(manager);
        engine
    }

    pub fn data(&self) -> &ReferenceData {
        &self.data
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn teams(&self) -> &TeamCollection {
        &self.teams
    }

    pub fn current_team(&self) -> &Team {
        self.teams.current()
    }

    pub fn link_levels(&self) -> &LinkLevels {
        &self.link_levels
    }

    /// Reference tables that fell back to empty at load time
    pub fn reference_issues(&self) -> &[TeamError] {
        &self.data.issues
    }

    pub fn search(&self, query: &CatalogQuery) -> Vec<PositionGroup<'_>> {
        self.data.catalog.search(query)
    }

    pub fn bonuses(&self) -> BonusReport {
        let on_field = self.current_team().on_field(&self.data.catalog);
        compute_bonuses(&on_field, &self.data.bonuses)
    }

    pub fn synergies(&self) -> SynergyReport {
        let on_field = self.current_team().on_field(&self.data.catalog);
        compute_synergies(&on_field, &self.data.synergies, &self.link_levels, self.config.school_threshold)
    }

    /// Current team view plus freshly computed bonuses and synergies
    pub fn snapshot(&self) -> EngineSnapshot {
        let team = self.current_team();
        let on_field = team.on_field(&self.data.catalog);
        EngineSnapshot {
            team_index: self.teams.current_index(),
            teams: self
                .teams
                .teams()
                .iter()
                .enumerate()
                .map(|(index, t)| TeamSummary { index, id: t.id.clone(), name: t.name.clone() })
                .collect(),
            team: TeamView::from_team(team),
            bonuses: compute_bonuses(&on_field, &self.data.bonuses),
            synergies: compute_synergies(
                &on_field,
                &self.data.synergies,
                &self.link_levels,
                self.config.school_threshold,
            ),
            on_field: on_field.into_iter().cloned().collect(),
        }
    }

    /// Registers a callback run once per successful mutation.
    pub fn subscribe(&mut self, listener: impl FnMut(&EngineSnapshot) + 'static) -> ListenerId {
        let id = self.next_listener_id;
        self.next_listener_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns `false` when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    fn commit(&mut self, changed: Changed) {
        if !self.listeners.is_empty() {
            let snapshot = self.snapshot();
            for (_, listener) in self.listeners.iter_mut() {
                listener(&snapshot);
            }
        }

        let Some(manager) = self.save.as_mut() else {
            return;
        };
        let result = match changed {
            Changed::Teams => manager.save_teams(&self.teams),
            Changed::LinkLevels => manager.save_link_levels(&self.link_levels),
        };
        if let Err(e) = result {
            log::warn!("Persisting {:?} failed, keeping in-memory state: {}", changed, e);
        }
    }

    /// Runs a team mutation and commits on success
    fn mutate_team<T>(&mut self, op: impl FnOnce(&mut Team, &ReferenceData) -> Result<T>) -> Result<T> {
        let out = op(self.teams.current_mut(), &self.data)?;
        self.commit(Changed::Teams);
        Ok(out)
    }

    fn mutate_collection<T>(&mut self, op: impl FnOnce(&mut TeamCollection) -> Result<T>) -> Result<T> {
        let out = op(&mut self.teams)?;
        self.commit(Changed::Teams);
        Ok(out)
    }

    pub fn place_in_slot(&mut self, variant_id: &str, slot_index: usize) -> Result<PlacementOutcome> {
        self.mutate_team(|team, data| team.place_in_slot(&data.catalog, variant_id, slot_index))
    }

    pub fn place_in_bench(&mut self, variant_id: &str) -> Result<usize> {
        self.mutate_team(|team, data| team.place_in_bench(&data.catalog, variant_id))
    }

    pub fn remove_from_slot(&mut self, slot_index: usize) -> Result<Option<String>> {
        self.mutate_team(|team, _| team.remove_from_slot(slot_index))
    }

    pub fn rotate_formation(&mut self) -> usize {
        let layout_index = self.teams.current_mut().rotate();
        self.commit(Changed::Teams);
        layout_index
    }

    pub fn clear_all(&mut self) {
        self.teams.current_mut().clear_all();
        self.commit(Changed::Teams);
    }

    pub fn undo(&mut self) -> Result<()> {
        self.mutate_team(|team, _| team.undo())
    }

    pub fn move_bench_to_slot(&mut self, bench_index: usize, slot_index: usize) -> Result<PlacementOutcome> {
        self.mutate_team(|team, data| team.move_bench_to_slot(&data.catalog, bench_index, slot_index))
    }

    pub fn move_slot_to_bench(&mut self, slot_index: usize) -> Result<usize> {
        self.mutate_team(|team, data| team.move_slot_to_bench(&data.catalog, slot_index))
    }

    pub fn quick_place(&mut self, variant_id: &str) -> Result<QuickPlacement> {
        self.mutate_team(|team, data| team.quick_place(&data.catalog, variant_id))
    }

    pub fn add_team(&mut self, name: Option<&str>) -> Result<usize> {
        self.mutate_collection(|teams| teams.add_team(name))
    }

    pub fn duplicate_team(&mut self, index: usize) -> Result<usize> {
        self.mutate_collection(|teams| teams.duplicate_team(index))
    }

    pub fn rename_team(&mut self, index: usize, name: &str) -> Result<()> {
        self.mutate_collection(|teams| teams.rename_team(index, name))
    }

    pub fn delete_team(&mut self, index: usize) -> Result<()> {
        self.mutate_collection(|teams| teams.delete_team(index))
    }

    pub fn switch_team(&mut self, index: usize) -> Result<()> {
        self.mutate_collection(|teams| teams.switch_team(index))
    }

    /// Stores the level choice for a link; returns the effective level
    /// (clamped to the link's defined levels when the link is known).
    pub fn set_link_level(&mut self, link_id: &str, level: u32) -> u32 {
        self.link_levels.set(link_id, level);
        let max_level = self.data.synergies.link(link_id).map(|l| l.max_level()).unwrap_or(u32::MAX);
        let effective = self.link_levels.get(link_id, max_level);
        self.commit(Changed::LinkLevels);
        effective
    }

    /// Export file for the team at `index`
    pub fn export_team(&self, index: usize) -> Result<ExportFile> {
        let team = self.teams.get(index).ok_or(TeamError::InvalidTeamIndex(index))?;
        Ok(save::export_team(team, index, &self.data.catalog, &self.config))
    }

    pub fn export_current_team(&self) -> Result<ExportFile> {
        self.export_team(self.teams.current_index())
    }

    /// Imports an export file as a new current team.
    pub fn import_team(&mut self, text: &str) -> Result<ImportSummary> {
        let file = save::parse_export(text, &self.config)?;
        let imported = save::import_team(&file, &self.data.catalog, &self.config);
        let team_index = self.teams.push_team(imported.team);
        self.commit(Changed::Teams);
        Ok(ImportSummary { team_index, dropped: imported.dropped })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::RawReferenceTables;
    use crate::save::{FileStorage, MemoryStorage};
    use crate::synergy::RawLinkTable;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn data() -> ReferenceData {
        let raw = RawReferenceTables {
            characters: serde_json::from_value(json!([
                {"id": "hinata", "role": "Middle Blocker", "rarity": "SSR", "school": "Karasuno", "tags": ["Power"]},
                {"id": "hinata", "role": "Wing Spiker", "rarity": "SR", "school": "Karasuno"},
                {"id": "kageyama", "role": "Setter", "rarity": "SSR", "school": "Karasuno", "tags": ["power spike"]},
                {"id": "tanaka", "role": "Wing Spiker", "rarity": "R", "school": "Karasuno", "tags": "Power"},
                {"id": "asahi", "role": "Wing Spiker", "rarity": "SSR", "school": "Karasuno"},
                {"id": "nishinoya", "role": "Libero", "rarity": "SSR", "school": "Karasuno"},
                {"id": "kenma", "role": "Setter", "rarity": "SR", "school": "Nekoma"}
            ]))
            .unwrap(),
            tags: serde_json::from_value(json!([{"tagKey": "power_spike", "synonyms": ["power", "power spike"]}])).unwrap(),
            specialty_bonuses: serde_json::from_value(json!([
                {"tagKey": "power_spike", "tiers": [{"requiredCount": 2}, {"requiredCount": 4}]}
            ]))
            .unwrap(),
            position_bonuses: Vec::new(),
            schools: serde_json::from_value(json!([{"id": "karasuno", "name": "Karasuno"}])).unwrap(),
            links: serde_json::from_value::<RawLinkTable>(json!([
                {"id": "freak_duo", "miembros": ["hinata", "kageyama", "asahi"],
                 "niveles": [{"lvl": 1, "bono": {"team.attack_pct": 5}}, {"lvl": 2, "bono": {"team.attack_pct": 10}}]}
            ]))
            .unwrap(),
        };
        ReferenceData::from_raw(raw)
    }

    fn engine() -> TeamBuilderEngine {
        TeamBuilderEngine::new(data(), EngineConfig::default())
    }

    #[test]
    fn test_power_spike_tiers_from_roster() {
        let mut engine = engine();
        engine.place_in_slot("hinata__ssr", 1).unwrap();
        engine.place_in_slot("kageyama__ssr", 5).unwrap();
        engine.place_in_slot("tanaka__r", 2).unwrap();

        let status = &engine.bonuses().specialty_status["power_spike"];
        assert_eq!(status.count, 3);
        assert_eq!(status.active_tier.as_ref().unwrap().required_count, 2);
        assert_eq!(status.next_tier.as_ref().unwrap().required_count, 4);
        assert_eq!(status.missing, 1);
    }

    #[test]
    fn test_school_threshold() {
        let mut engine = engine();
        for (id, slot) in [("hinata__ssr", 1), ("kageyama__ssr", 5), ("tanaka__r", 2)] {
            engine.place_in_slot(id, slot).unwrap();
        }
        assert!(!engine.synergies().schools[0].active);
        engine.place_in_slot("asahi__ssr", 3).unwrap();
        assert!(engine.synergies().schools[0].active);
    }

    #[test]
    fn test_partial_link_and_level_totals() {
        let mut engine = engine();
        engine.place_in_slot("hinata__ssr", 1).unwrap();
        engine.place_in_slot("kageyama__ssr", 5).unwrap();

        let synergies = engine.synergies();
        assert!(synergies.links[0].visible);
        assert!(!synergies.links[0].active);
        assert_eq!(synergies.links[0].missing, vec!["asahi".to_string()]);

        engine.place_in_slot("asahi__ssr", 3).unwrap();
        assert_eq!(engine.set_link_level("freak_duo", 5), 2);
        let totals = engine.synergies().link_totals;
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].value, 10.0);
    }

    #[test]
    fn test_bench_duplicate_blocks_field_slot() {
        let mut engine = engine();
        engine.place_in_bench("hinata__sr").unwrap();
        let before = engine.current_team().state().clone();
        let err = engine.place_in_slot("hinata__ssr", 1).unwrap_err();
        assert!(matches!(err, TeamError::DuplicateCharacter { .. }));
        assert_eq!(engine.current_team().state(), &before);
    }

    #[test]
    fn test_one_notification_per_mutation() {
        let mut engine = engine();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let id = engine.subscribe(move |snapshot| sink.borrow_mut().push(snapshot.team.undo_depth));

        engine.place_in_slot("kageyama__ssr", 5).unwrap();
        engine.rotate_formation();
        assert!(engine.place_in_slot("kageyama__ssr", 5).is_err());
        assert!(engine.delete_team(0).is_err());
        engine.undo().unwrap();
        assert_eq!(*seen.borrow(), vec![1, 2, 1]);

        assert!(engine.unsubscribe(id));
        assert!(!engine.unsubscribe(id));
        engine.clear_all();
        assert_eq!(seen.borrow().len(), 3);
    }

    #[test]
    fn test_export_import_round_trip() {
        let mut engine = engine();
        engine.place_in_slot("nishinoya__ssr", 6).unwrap();
        engine.place_in_slot("kageyama__ssr", 5).unwrap();
        engine.place_in_bench("tanaka__r").unwrap();
        engine.rotate_formation();

        let text = engine.export_current_team().unwrap().to_json().unwrap();
        let summary = engine.import_team(&text).unwrap();
        assert_eq!(summary.team_index, 1);
        assert!(summary.dropped.is_empty());
        assert_eq!(engine.teams().current_index(), 1);
        assert_eq!(engine.teams().get(0).unwrap().state(), engine.teams().get(1).unwrap().state());
    }

    #[test]
    fn test_import_rejects_foreign_file() {
        let mut engine = engine();
        let err = engine.import_team(r#"{"schemaVersion": "x", "appName": "y"}"#).unwrap_err();
        assert!(matches!(err, TeamError::ImportSchemaMismatch { .. }));
        assert_eq!(engine.teams().len(), 1);
    }

    #[test]
    fn test_state_survives_restart() {
        let dir = tempfile::tempdir().unwrap();
        {
            let mut engine =
                TeamBuilderEngine::with_storage(data(), EngineConfig::default(), FileStorage::new(dir.path()));
            engine.place_in_slot("kageyama__ssr", 5).unwrap();
            engine.add_team(Some("Reserves")).unwrap();
            engine.set_link_level("freak_duo", 2);
        }
        let engine = TeamBuilderEngine::with_storage(data(), EngineConfig::default(), FileStorage::new(dir.path()));
        assert_eq!(engine.teams().len(), 2);
        assert_eq!(engine.current_team().name, "Reserves");
        assert_eq!(engine.teams().get(0).unwrap().slots()[5].as_deref(), Some("kageyama__ssr"));
        assert_eq!(engine.link_levels().get("freak_duo", 2), 2);
    }

    #[test]
    fn test_unreadable_storage_starts_fresh() {
        let mut storage = MemoryStorage::new();
        storage.set(save::TEAMS_KEY, "garbage").unwrap();
        let engine = TeamBuilderEngine::with_storage(data(), EngineConfig::default(), storage);
        assert_eq!(engine.teams().len(), 1);
        assert!(engine.current_team().bench().is_empty());
    }

    #[test]
    fn test_snapshot_shape() {
        let mut engine = engine();
        engine.place_in_slot("hinata__ssr", 1).unwrap();
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.team.slots.len(), SLOT_COUNT);
        assert_eq!(snapshot.team.slots[6].position, Position::L);
        assert_eq!(snapshot.on_field.len(), 1);
        assert_eq!(snapshot.teams[0].name, "Team 1");

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["team"]["slots"][1]["variantId"], "hinata__ssr");
    }
}
