// One team: 7 formation slots, a bench and an undo history
use super::undo::{UndoStack, DEFAULT_UNDO_CAPACITY};
use crate::catalog::{CatalogIndex, CharacterVariant, Position};
use crate::error::{Result, TeamError};
use crate::formation::{self, SLOT_COUNT};
use serde::{Deserialize, Serialize};

pub const DEFAULT_BENCH_CAPACITY: usize = 6;

/// Per-team capacity limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TeamLimits {
    pub bench_capacity: usize,
    pub undo_capacity: usize,
}

impl Default for TeamLimits {
    fn default() -> Self {
        Self { bench_capacity: DEFAULT_BENCH_CAPACITY, undo_capacity: DEFAULT_UNDO_CAPACITY }
    }
}

/// Restorable composition: what an undo snapshot captures
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamState {
    pub layout_index: usize,
    pub slots: [Option<String>; SLOT_COUNT],
    pub bench: Vec<String>,
}

impl TeamState {
    /// Structural repair of persisted state: layout index wrapped, bench
    /// truncated to capacity.
    pub fn sanitized(mut self, bench_capacity: usize) -> Self {
        self.layout_index %= formation::LAYOUT_COUNT;
        self.bench.retain(|id| !id.trim().is_empty());
        self.bench.truncate(bench_capacity);
        for slot in self.slots.iter_mut() {
            if slot.as_deref().map(str::trim).map_or(false, str::is_empty) {
                *slot = None;
            }
        }
        self
    }

    pub fn occupants(&self) -> impl Iterator<Item = &String> {
        self.slots.iter().flatten().chain(self.bench.iter())
    }
}

/// Where a displaced slot occupant ended up
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "variantId", rename_all = "camelCase")]
pub enum Displacement {
    Benched(String),
    /// Libero, or the bench was full
    Dropped(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacementOutcome {
    pub displaced: Option<Displacement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "index", rename_all = "camelCase")]
pub enum QuickPlacement {
    Slot(usize),
    Bench(usize),
}

/// Entry exempt from the duplicate check (the character being moved)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Exempt {
    None,
    Slot(usize),
    Bench(usize),
}

#[derive(Debug, Clone)]
pub struct Team {
    pub id: String,
    pub name: String,
    state: TeamState,
    limits: TeamLimits,
    undo: UndoStack,
}

fn lookup<'a>(catalog: &'a CatalogIndex, variant_id: &str) -> Result<&'a CharacterVariant> {
    catalog.get(variant_id).ok_or_else(|| TeamError::UnknownCharacter(variant_id.to_string()))
}

/// Base id of an occupant; ids missing from the catalog stand for themselves.
fn occupant_base<'a>(catalog: &'a CatalogIndex, variant_id: &'a str) -> &'a str {
    catalog.base_id_of(variant_id).unwrap_or(variant_id)
}

impl Team {
    pub fn new(name: impl Into<String>, limits: TeamLimits) -> Self {
        Self::with_state(uuid::Uuid::new_v4().to_string(), name, TeamState::default(), limits)
    }

    /// Team with existing state and an empty undo history
    pub fn with_state(id: String, name: impl Into<String>, state: TeamState, limits: TeamLimits) -> Self {
        Self {
            id,
            name: name.into(),
            state: state.sanitized(limits.bench_capacity),
            limits,
            undo: UndoStack::new(limits.undo_capacity),
        }
    }

    /// Copy of the composition under a new id, without undo history
    pub fn duplicate(&self, name: impl Into<String>) -> Self {
        Self::new(name, self.limits).with_composition(self.state.clone())
    }

    fn with_composition(mut self, state: TeamState) -> Self {
        self.state = state;
        self
    }

    pub fn state(&self) -> &TeamState {
        &self.state
    }

    pub fn layout_index(&self) -> usize {
        self.state.layout_index
    }

    pub fn slots(&self) -> &[Option<String>; SLOT_COUNT] {
        &self.state.slots
    }

    pub fn bench(&self) -> &[String] {
        &self.state.bench
    }

    pub fn limits(&self) -> TeamLimits {
        self.limits
    }

    pub fn undo_depth(&self) -> usize {
        self.undo.len()
    }

    pub fn is_bench_full(&self) -> bool {
        self.state.bench.len() >= self.limits.bench_capacity
    }

    /// Position painted on a slot by the current layout
    pub fn slot_position(&self, slot_index: usize) -> Option<Position> {
        formation::slot_position(self.state.layout_index, slot_index)
    }

    /// Resolved on-field characters in slot order; unknown ids are skipped.
    pub fn on_field<'a>(&self, catalog: &'a CatalogIndex) -> Vec<&'a CharacterVariant> {
        self.state.slots.iter().flatten().filter_map(|id| catalog.get(id)).collect()
    }

    pub fn bench_characters<'a>(&self, catalog: &'a CatalogIndex) -> Vec<&'a CharacterVariant> {
        self.state.bench.iter().filter_map(|id| catalog.get(id)).collect()
    }

    /// Whether `base_id` is fielded or benched, ignoring `exempt`
    fn holds_base(&self, catalog: &CatalogIndex, base_id: &str, exempt: Exempt) -> bool {
        let in_slots = self
            .state
            .slots
            .iter()
            .enumerate()
            .filter(|(i, _)| exempt != Exempt::Slot(*i))
            .filter_map(|(_, slot)| slot.as_deref())
            .any(|id| occupant_base(catalog, id) == base_id);
        let in_bench = self
            .state
            .bench
            .iter()
            .enumerate()
            .filter(|(i, _)| exempt != Exempt::Bench(*i))
            .any(|(_, id)| occupant_base(catalog, id) == base_id);
        in_slots || in_bench
    }

    pub fn contains_base(&self, catalog: &CatalogIndex, base_id: &str) -> bool {
        self.holds_base(catalog, base_id, Exempt::None)
    }

    fn check_slot(&self, slot_index: usize) -> Result<()> {
        if slot_index >= SLOT_COUNT {
            return Err(TeamError::InvalidSlot(slot_index));
        }
        Ok(())
    }

    fn check_slot_position(&self, character: &CharacterVariant, slot_index: usize) -> Result<()> {
        if formation::is_libero_slot(self.state.layout_index, slot_index) && !character.is_libero() {
            return Err(TeamError::PositionMismatch {
                variant_id: character.variant_id.clone(),
                slot_index,
                required: Position::L,
                actual: character.position,
            });
        }
        Ok(())
    }

    fn check_unique(&self, catalog: &CatalogIndex, character: &CharacterVariant, exempt: Exempt) -> Result<()> {
        if self.holds_base(catalog, &character.base_id, exempt) {
            return Err(TeamError::DuplicateCharacter { base_id: character.base_id.clone() });
        }
        Ok(())
    }

    fn check_benchable(&self, character: &CharacterVariant) -> Result<()> {
        if character.is_libero() {
            return Err(TeamError::InvalidPosition {
                variant_id: character.variant_id.clone(),
                position: character.position,
            });
        }
        if self.is_bench_full() {
            return Err(TeamError::BenchFull { capacity: self.limits.bench_capacity });
        }
        Ok(())
    }

    fn snapshot(&mut self) {
        self.undo.push(self.state.clone());
    }

    /// Writes `variant_id` into a slot and settles the previous occupant.
    fn put_in_slot(&mut self, catalog: &CatalogIndex, variant_id: String, slot_index: usize) -> PlacementOutcome {
        let Some(prev) = self.state.slots[slot_index].replace(variant_id) else {
            return PlacementOutcome::default();
        };
        let is_libero = catalog.get(&prev).map_or(false, CharacterVariant::is_libero);
        let displaced = if is_libero || self.is_bench_full() {
            log::warn!("Displaced {} dropped from team '{}' (libero or bench full)", prev, self.name);
            Displacement::Dropped(prev)
        } else {
            self.state.bench.push(prev.clone());
            Displacement::Benched(prev)
        };
        PlacementOutcome { displaced: Some(displaced) }
    }

    /// Places a character into a formation slot.
    ///
    /// Only the libero slot checks position. A displaced occupant moves to
    /// the bench unless it is a libero or the bench is full, in which case it
    /// leaves the team.
    pub fn place_in_slot(&mut self, catalog: &CatalogIndex, variant_id: &str, slot_index: usize) -> Result<PlacementOutcome> {
        self.check_slot(slot_index)?;
        let character = lookup(catalog, variant_id)?;
        self.check_slot_position(character, slot_index)?;
        self.check_unique(catalog, character, Exempt::None)?;

        self.snapshot();
        let outcome = self.put_in_slot(catalog, character.variant_id.clone(), slot_index);
        log::debug!("Placed {} in slot {} of '{}'", variant_id, slot_index, self.name);
        Ok(outcome)
    }

    /// Appends a character to the bench; returns its bench index.
    pub fn place_in_bench(&mut self, catalog: &CatalogIndex, variant_id: &str) -> Result<usize> {
        let character = lookup(catalog, variant_id)?;
        self.check_benchable(character)?;
        self.check_unique(catalog, character, Exempt::None)?;

        self.snapshot();
        self.state.bench.push(character.variant_id.clone());
        log::debug!("Benched {} in '{}'", variant_id, self.name);
        Ok(self.state.bench.len() - 1)
    }

    /// Empties a slot; returns the previous occupant.
    pub fn remove_from_slot(&mut self, slot_index: usize) -> Result<Option<String>> {
        self.check_slot(slot_index)?;
        self.snapshot();
        Ok(self.state.slots[slot_index].take())
    }

    /// Rotates one step; returns the new layout index.
    pub fn rotate(&mut self) -> usize {
        self.snapshot();
        let (layout_index, slots) = formation::rotate(self.state.layout_index, &self.state.slots);
        self.state.layout_index = layout_index;
        self.state.slots = slots;
        layout_index
    }

    /// Empties slots and bench; the layout is kept.
    pub fn clear_all(&mut self) {
        self.snapshot();
        self.state.slots = Default::default();
        self.state.bench.clear();
    }

    pub fn undo(&mut self) -> Result<()> {
        let previous = self.undo.pop().ok_or(TeamError::EmptyUndoStack)?;
        self.state = previous;
        Ok(())
    }

    /// Moves a benched character into a slot.
    pub fn move_bench_to_slot(
        &mut self,
        catalog: &CatalogIndex,
        bench_index: usize,
        slot_index: usize,
    ) -> Result<PlacementOutcome> {
        self.check_slot(slot_index)?;
        let variant_id =
            self.state.bench.get(bench_index).cloned().ok_or(TeamError::InvalidBenchIndex(bench_index))?;
        let character = lookup(catalog, &variant_id)?;
        self.check_slot_position(character, slot_index)?;
        self.check_unique(catalog, character, Exempt::Bench(bench_index))?;

        self.snapshot();
        self.state.bench.remove(bench_index);
        Ok(self.put_in_slot(catalog, variant_id, slot_index))
    }

    /// Moves a fielded character to the end of the bench.
    pub fn move_slot_to_bench(&mut self, catalog: &CatalogIndex, slot_index: usize) -> Result<usize> {
        self.check_slot(slot_index)?;
        let variant_id = self.state.slots[slot_index].clone().ok_or(TeamError::EmptySlot(slot_index))?;
        let character = lookup(catalog, &variant_id)?;
        self.check_benchable(character)?;
        self.check_unique(catalog, character, Exempt::Slot(slot_index))?;

        self.snapshot();
        self.state.slots[slot_index] = None;
        self.state.bench.push(variant_id);
        Ok(self.state.bench.len() - 1)
    }

    /// Open slot for `character` under the current layout.
    ///
    /// The slot painted with the character's position comes first; a libero
    /// whose libero slot is taken falls back to any open non-libero slot.
    fn open_slot_for(&self, character: &CharacterVariant) -> Option<usize> {
        let layout = self.state.layout_index;
        let open = |i: &usize| self.state.slots[*i].is_none();

        let matching = (0..SLOT_COUNT)
            .filter(open)
            .find(|&i| formation::slot_position(layout, i) == Some(character.position));
        if matching.is_some() || !character.is_libero() {
            return matching;
        }
        (0..SLOT_COUNT).filter(open).find(|&i| !formation::is_libero_slot(layout, i))
    }

    /// Places a character wherever it fits: matching open slot, else bench.
    pub fn quick_place(&mut self, catalog: &CatalogIndex, variant_id: &str) -> Result<QuickPlacement> {
        let character = lookup(catalog, variant_id)?;
        self.check_unique(catalog, character, Exempt::None)?;

        if let Some(slot_index) = self.open_slot_for(character) {
            self.snapshot();
            self.state.slots[slot_index] = Some(character.variant_id.clone());
            return Ok(QuickPlacement::Slot(slot_index));
        }
        if character.is_libero() {
            return Err(TeamError::NoPlacement(character.variant_id.clone()));
        }
        self.check_benchable(character)?;
        self.snapshot();
        self.state.bench.push(character.variant_id.clone());
        Ok(QuickPlacement::Bench(self.state.bench.len() - 1))
    }

    /// Replaces the composition wholesale, e.g. after an import.
    pub(crate) fn restore_composition(&mut self, state: TeamState) {
        self.state = state.sanitized(self.limits.bench_capacity);
        self.undo.clear();
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::catalog::{CatalogIndex, RawCharacterEntry};
    use serde_json::json;

    /// Small roster covering every position plus a two-variant character.
    pub fn catalog() -> CatalogIndex {
        let entries: Vec<RawCharacterEntry> = serde_json::from_value(json!([
            {"id": "ushijima", "role": "Opposite", "rarity": "UR"},
            {"id": "hinata", "role": "Middle Blocker", "rarity": "SSR"},
            {"id": "hinata", "role": "Wing Spiker", "rarity": "SR"},
            {"id": "tsukishima", "role": "Middle Blocker", "rarity": "SR"},
            {"id": "tanaka", "role": "Wing Spiker", "rarity": "R"},
            {"id": "asahi", "role": "Wing Spiker", "rarity": "SSR"},
            {"id": "kageyama", "role": "Setter", "rarity": "SSR"},
            {"id": "nishinoya", "role": "Libero", "rarity": "SSR"},
            {"id": "yaku", "role": "Libero", "rarity": "SR"},
            {"id": "kuroo", "role": "Middle Blocker", "rarity": "SSR"},
            {"id": "bokuto", "role": "Wing Spiker", "rarity": "UR"},
            {"id": "kenma", "role": "Setter", "rarity": "SR"}
        ]))
        .unwrap();
        CatalogIndex::from_entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::catalog;
    use super::*;

    fn team() -> Team {
        Team::new("Test", TeamLimits::default())
    }

    #[test]
    fn test_new_team_is_empty() {
        let team = team();
        assert_eq!(team.slots().len(), SLOT_COUNT);
        assert!(team.bench().is_empty());
        assert_eq!(team.undo_depth(), 0);
        assert!(!team.id.is_empty());
    }

    #[test]
    fn test_libero_slot_enforces_position() {
        let cat = catalog();
        let mut team = team();
        let err = team.place_in_slot(&cat, "kageyama__ssr", 6).unwrap_err();
        assert!(matches!(err, TeamError::PositionMismatch { required: Position::L, .. }));
        assert_eq!(team.undo_depth(), 0);

        team.place_in_slot(&cat, "nishinoya__ssr", 6).unwrap();
        // other slots accept any position
        team.place_in_slot(&cat, "kageyama__ssr", 0).unwrap();
        team.place_in_slot(&cat, "yaku__sr", 1).unwrap();
        assert_eq!(team.slots()[1].as_deref(), Some("yaku__sr"));
    }

    #[test]
    fn test_duplicate_base_on_bench_blocks_slot() {
        let cat = catalog();
        let mut team = team();
        team.place_in_bench(&cat, "hinata__sr").unwrap();
        let before = team.state().clone();

        let err = team.place_in_slot(&cat, "hinata__ssr", 1).unwrap_err();
        assert_eq!(err, TeamError::DuplicateCharacter { base_id: "hinata".into() });
        assert_eq!(team.state(), &before);
    }

    #[test]
    fn test_displaced_occupant_goes_to_bench() {
        let cat = catalog();
        let mut team = team();
        team.place_in_slot(&cat, "tanaka__r", 2).unwrap();
        let outcome = team.place_in_slot(&cat, "asahi__ssr", 2).unwrap();
        assert_eq!(outcome.displaced, Some(Displacement::Benched("tanaka__r".into())));
        assert_eq!(team.bench(), &["tanaka__r".to_string()]);
    }

    #[test]
    fn test_displaced_dropped_when_bench_full_or_libero() {
        let cat = catalog();
        let mut team = team();
        for id in ["ushijima__ur", "tsukishima__sr", "tanaka__r", "kuroo__ssr", "bokuto__ur", "kenma__sr"] {
            team.place_in_bench(&cat, id).unwrap();
        }
        assert!(team.is_bench_full());
        assert_eq!(team.place_in_bench(&cat, "asahi__ssr").unwrap_err(), TeamError::BenchFull { capacity: 6 });

        team.place_in_slot(&cat, "asahi__ssr", 0).unwrap();
        let outcome = team.place_in_slot(&cat, "kageyama__ssr", 0).unwrap();
        assert_eq!(outcome.displaced, Some(Displacement::Dropped("asahi__ssr".into())));
        assert_eq!(team.bench().len(), 6);

        let mut team = self::team();
        team.place_in_slot(&cat, "nishinoya__ssr", 3).unwrap();
        let outcome = team.place_in_slot(&cat, "asahi__ssr", 3).unwrap();
        assert_eq!(outcome.displaced, Some(Displacement::Dropped("nishinoya__ssr".into())));
        assert!(team.bench().is_empty());
    }

    #[test]
    fn test_libero_cannot_be_benched() {
        let cat = catalog();
        let mut team = team();
        let err = team.place_in_bench(&cat, "yaku__sr").unwrap_err();
        assert!(matches!(err, TeamError::InvalidPosition { position: Position::L, .. }));
    }

    #[test]
    fn test_unknown_and_invalid_indices() {
        let cat = catalog();
        let mut team = team();
        assert_eq!(
            team.place_in_slot(&cat, "oikawa__ur", 0).unwrap_err(),
            TeamError::UnknownCharacter("oikawa__ur".into())
        );
        assert_eq!(team.place_in_slot(&cat, "tanaka__r", 7).unwrap_err(), TeamError::InvalidSlot(7));
        assert_eq!(team.remove_from_slot(9).unwrap_err(), TeamError::InvalidSlot(9));
        assert_eq!(team.move_bench_to_slot(&cat, 0, 0).unwrap_err(), TeamError::InvalidBenchIndex(0));
        assert_eq!(team.move_slot_to_bench(&cat, 0).unwrap_err(), TeamError::EmptySlot(0));
    }

    #[test]
    fn test_undo_restores_and_reports_empty() {
        let cat = catalog();
        let mut team = team();
        assert_eq!(team.undo().unwrap_err(), TeamError::EmptyUndoStack);

        let empty = team.state().clone();
        team.place_in_slot(&cat, "kageyama__ssr", 5).unwrap();
        let placed = team.state().clone();
        team.rotate();
        team.clear_all();

        team.undo().unwrap();
        team.undo().unwrap();
        assert_eq!(team.state(), &placed);
        team.undo().unwrap();
        assert_eq!(team.state(), &empty);
    }

    #[test]
    fn test_undo_capacity() {
        let mut team = Team::new("Cap", TeamLimits { bench_capacity: 6, undo_capacity: 25 });
        for _ in 0..40 {
            team.rotate();
        }
        assert_eq!(team.undo_depth(), 25);
    }

    #[test]
    fn test_move_bench_to_slot_exempts_self() {
        let cat = catalog();
        let mut team = team();
        team.place_in_bench(&cat, "tanaka__r").unwrap();
        team.place_in_slot(&cat, "asahi__ssr", 2).unwrap();

        let outcome = team.move_bench_to_slot(&cat, 0, 2).unwrap();
        assert_eq!(team.slots()[2].as_deref(), Some("tanaka__r"));
        assert_eq!(outcome.displaced, Some(Displacement::Benched("asahi__ssr".into())));
        assert_eq!(team.bench(), &["asahi__ssr".to_string()]);
    }

    #[test]
    fn test_move_slot_to_bench() {
        let cat = catalog();
        let mut team = team();
        team.place_in_slot(&cat, "kenma__sr", 5).unwrap();
        team.place_in_slot(&cat, "nishinoya__ssr", 6).unwrap();

        assert_eq!(team.move_slot_to_bench(&cat, 5).unwrap(), 0);
        assert!(team.slots()[5].is_none());
        assert!(matches!(team.move_slot_to_bench(&cat, 6), Err(TeamError::InvalidPosition { .. })));
    }

    #[test]
    fn test_quick_place() {
        let cat = catalog();
        let mut team = team();
        // layout 0: OP, MB, WS, WS, MB, S, L
        assert_eq!(team.quick_place(&cat, "kageyama__ssr").unwrap(), QuickPlacement::Slot(5));
        assert_eq!(team.quick_place(&cat, "tanaka__r").unwrap(), QuickPlacement::Slot(2));
        assert_eq!(team.quick_place(&cat, "asahi__ssr").unwrap(), QuickPlacement::Slot(3));
        assert_eq!(team.quick_place(&cat, "bokuto__ur").unwrap(), QuickPlacement::Bench(0));
        assert_eq!(team.quick_place(&cat, "nishinoya__ssr").unwrap(), QuickPlacement::Slot(6));
        // libero slot taken: first open non-libero slot
        assert_eq!(team.quick_place(&cat, "yaku__sr").unwrap(), QuickPlacement::Slot(0));
        assert!(matches!(team.quick_place(&cat, "tanaka__r"), Err(TeamError::DuplicateCharacter { .. })));
    }

    #[test]
    fn test_quick_place_libero_without_room() {
        let cat = catalog();
        let mut team = team();
        for (slot, id) in [
            (0, "ushijima__ur"),
            (1, "hinata__ssr"),
            (2, "tanaka__r"),
            (3, "asahi__ssr"),
            (4, "kuroo__ssr"),
            (5, "kageyama__ssr"),
            (6, "nishinoya__ssr"),
        ] {
            team.place_in_slot(&cat, id, slot).unwrap();
        }
        let depth = team.undo_depth();
        assert_eq!(team.quick_place(&cat, "yaku__sr").unwrap_err(), TeamError::NoPlacement("yaku__sr".into()));
        assert_eq!(team.undo_depth(), depth);
    }

    #[test]
    fn test_rotate_four_times_restores_composition() {
        let cat = catalog();
        let mut team = team();
        team.place_in_slot(&cat, "ushijima__ur", 0).unwrap();
        team.place_in_slot(&cat, "kageyama__ssr", 5).unwrap();
        team.place_in_slot(&cat, "nishinoya__ssr", 6).unwrap();
        let mut before: Vec<String> = team.slots().iter().flatten().cloned().collect();
        before.sort();

        for _ in 0..4 {
            team.rotate();
        }
        let mut after: Vec<String> = team.slots().iter().flatten().cloned().collect();
        after.sort();
        assert_eq!(team.layout_index(), 0);
        assert_eq!(before, after);
        assert_eq!(team.slots()[6].as_deref(), Some("nishinoya__ssr"));
    }

    #[test]
    fn test_duplicate_resets_history() {
        let cat = catalog();
        let mut team = team();
        team.place_in_slot(&cat, "kageyama__ssr", 5).unwrap();
        let copy = team.duplicate("Copy");
        assert_ne!(copy.id, team.id);
        assert_eq!(copy.state(), team.state());
        assert_eq!(copy.undo_depth(), 0);
    }

    #[test]
    fn test_sanitized_state() {
        let state = TeamState {
            layout_index: 9,
            slots: [Some(" ".into()), None, None, None, None, None, None],
            bench: (0..9).map(|i| format!("c{}", i)).collect(),
        };
        let clean = state.sanitized(6);
        assert_eq!(clean.layout_index, 1);
        assert!(clean.slots[0].is_none());
        assert_eq!(clean.bench.len(), 6);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        const IDS: [&str; 12] = [
            "ushijima__ur",
            "hinata__ssr",
            "hinata__sr",
            "tsukishima__sr",
            "tanaka__r",
            "asahi__ssr",
            "kageyama__ssr",
            "nishinoya__ssr",
            "yaku__sr",
            "kuroo__ssr",
            "bokuto__ur",
            "kenma__sr",
        ];

        #[derive(Debug, Clone)]
        enum Op {
            PlaceInSlot(usize, usize),
            PlaceInBench(usize),
            RemoveFromSlot(usize),
            Rotate,
            ClearAll,
            Undo,
            MoveBenchToSlot(usize, usize),
            MoveSlotToBench(usize),
            QuickPlace(usize),
        }

        fn op() -> impl Strategy<Value = Op> {
            prop_oneof![
                4 => (0..IDS.len(), 0..SLOT_COUNT).prop_map(|(c, s)| Op::PlaceInSlot(c, s)),
                3 => (0..IDS.len()).prop_map(Op::PlaceInBench),
                1 => (0..SLOT_COUNT).prop_map(Op::RemoveFromSlot),
                1 => Just(Op::Rotate),
                1 => Just(Op::ClearAll),
                1 => Just(Op::Undo),
                2 => (0..8usize, 0..SLOT_COUNT).prop_map(|(b, s)| Op::MoveBenchToSlot(b, s)),
                1 => (0..SLOT_COUNT).prop_map(Op::MoveSlotToBench),
                3 => (0..IDS.len()).prop_map(Op::QuickPlace),
            ]
        }

        /// Applies an op; `true` when it is one of the undo-inverted ops and succeeded
        fn apply(team: &mut Team, cat: &CatalogIndex, op: &Op) -> bool {
            match op {
                Op::PlaceInSlot(c, s) => team.place_in_slot(cat, IDS[*c], *s).is_ok(),
                Op::PlaceInBench(c) => team.place_in_bench(cat, IDS[*c]).is_ok(),
                Op::RemoveFromSlot(s) => team.remove_from_slot(*s).is_ok(),
                Op::Rotate => {
                    team.rotate();
                    true
                }
                Op::ClearAll => {
                    team.clear_all();
                    true
                }
                Op::Undo => {
                    let _ = team.undo();
                    false
                }
                Op::MoveBenchToSlot(b, s) => team.move_bench_to_slot(cat, *b, *s).is_ok(),
                Op::MoveSlotToBench(s) => team.move_slot_to_bench(cat, *s).is_ok(),
                Op::QuickPlace(c) => team.quick_place(cat, IDS[*c]).is_ok(),
            }
        }

        fn assert_invariants(team: &Team, cat: &CatalogIndex) -> std::result::Result<(), TestCaseError> {
            prop_assert_eq!(team.slots().len(), SLOT_COUNT);
            prop_assert!(team.bench().len() <= team.limits().bench_capacity);
            prop_assert!(team.undo_depth() <= team.limits().undo_capacity);

            let mut bases: Vec<&str> = team.state().occupants().map(|id| occupant_base(cat, id)).collect();
            let total = bases.len();
            bases.sort();
            bases.dedup();
            prop_assert_eq!(bases.len(), total, "base id repeated: {:?}", team.state());

            for id in team.bench() {
                prop_assert!(!cat.get(id).unwrap().is_libero());
            }
            if let Some(id) = &team.slots()[formation::libero_slot(team.layout_index())] {
                prop_assert!(cat.get(id).unwrap().is_libero());
            }
            Ok(())
        }

        proptest! {
            /// Property: every op keeps slot/bench bounds and base-id uniqueness
            #[test]
            fn prop_invariants_hold(ops in proptest::collection::vec(op(), 0..60)) {
                let cat = catalog();
                let mut team = Team::new("Prop", TeamLimits::default());
                for op in &ops {
                    apply(&mut team, &cat, op);
                    assert_invariants(&team, &cat)?;
                }
            }

            /// Property: undo right after a successful op restores the prior state
            #[test]
            fn prop_undo_inverts_last_op(
                prefix in proptest::collection::vec(op(), 0..30),
                last in op()
            ) {
                let cat = catalog();
                let mut team = Team::new("Prop", TeamLimits::default());
                for op in &prefix {
                    apply(&mut team, &cat, op);
                }
                let before = team.state().clone();
                let depth = team.undo_depth();
                let mutated = apply(&mut team, &cat, &last);
                if mutated {
                    team.undo().unwrap();
                    prop_assert_eq!(team.state(), &before);
                    prop_assert!(team.undo_depth() <= depth);
                } else if !matches!(last, Op::Undo) {
                    prop_assert_eq!(team.state(), &before);
                }
            }

            /// Property: four rotations restore layout and on-field multiset
            #[test]
            fn prop_rotation_round_trip(prefix in proptest::collection::vec(op(), 0..30)) {
                let cat = catalog();
                let mut team = Team::new("Prop", TeamLimits::default());
                for op in &prefix {
                    apply(&mut team, &cat, op);
                }
                let layout = team.layout_index();
                let mut before: Vec<String> = team.slots().iter().flatten().cloned().collect();
                before.sort();
                for _ in 0..4 {
                    team.rotate();
                }
                let mut after: Vec<String> = team.slots().iter().flatten().cloned().collect();
                after.sort();
                prop_assert_eq!(team.layout_index(), layout);
                prop_assert_eq!(before, after);
            }
        }
    }
}
