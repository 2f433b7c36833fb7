//! Reference data: catalog, tag aliases, bonus tiers, schools and links.
//!
//! Tables load once per session and are read-only afterwards. A table that
//! cannot be read or parsed degrades to empty and is reported in
//! [`ReferenceData::issues`]; loading itself never fails.

pub mod lenient;

pub use lenient::{load_json_lenient, parse_json_lenient, strip_json_comments};

use crate::bonus::{BonusTables, RawBonusEntry, SpecialtyTagDefinition, TagIndex};
use crate::catalog::{CatalogIndex, RawCharacterEntry};
use crate::error::TeamError;
use crate::synergy::{RawLinkTable, RawSchool, SynergyTables};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Env var the CLI reads when `--data` is not given.
pub const DATA_DIR_ENV: &str = "TB_DATA_DIR";

pub const CHARACTERS_FILE: &str = "characters.json";
pub const TAGS_FILE: &str = "tags.json";
pub const SPECIALTY_BONUSES_FILE: &str = "specialty_bonuses.json";
pub const POSITION_BONUSES_FILE: &str = "position_bonuses.json";
pub const SCHOOLS_FILE: &str = "schools.json";
pub const LINKS_FILE: &str = "links.json";

/// Unresolved reference tables as read from disk
#[derive(Debug, Clone)]
pub struct RawReferenceTables {
    pub characters: Vec<RawCharacterEntry>,
    pub tags: Vec<SpecialtyTagDefinition>,
    pub specialty_bonuses: Vec<RawBonusEntry>,
    pub position_bonuses: Vec<RawBonusEntry>,
    pub schools: Vec<RawSchool>,
    pub links: RawLinkTable,
}

impl Default for RawReferenceTables {
    fn default() -> Self {
        Self {
            characters: Vec::new(),
            tags: Vec::new(),
            specialty_bonuses: Vec::new(),
            position_bonuses: Vec::new(),
            schools: Vec::new(),
            links: RawLinkTable::List(Vec::new()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReferenceData {
    pub catalog: CatalogIndex,
    pub tags: TagIndex,
    pub bonuses: BonusTables,
    pub synergies: SynergyTables,
    /// One `ReferenceDataLoadFailure` per table that fell back to empty
    pub issues: Vec<TeamError>,
}

impl ReferenceData {
    /// Resolves raw tables and canonicalizes every character's tags.
    pub fn from_raw(raw: RawReferenceTables) -> Self {
        let tags = TagIndex::new(raw.tags);
        let mut catalog = CatalogIndex::from_entries(raw.characters);
        catalog.apply_tag_index(&tags);

        Self {
            catalog,
            tags,
            bonuses: BonusTables::from_raw(raw.specialty_bonuses, raw.position_bonuses),
            synergies: SynergyTables::from_raw(raw.schools, raw.links.into_links()),
            issues: Vec::new(),
        }
    }

    /// Loads every table from `dir`, falling back to empty per table.
    pub fn load_dir(dir: &Path) -> Self {
        let mut issues = Vec::new();
        let raw = RawReferenceTables {
            characters: RawCharacterEntry::from_values(load_or_empty(dir, CHARACTERS_FILE, &mut issues, Vec::new)),
            tags: load_or_empty(dir, TAGS_FILE, &mut issues, Vec::new),
            specialty_bonuses: load_or_empty(dir, SPECIALTY_BONUSES_FILE, &mut issues, Vec::new),
            position_bonuses: load_or_empty(dir, POSITION_BONUSES_FILE, &mut issues, Vec::new),
            schools: load_or_empty(dir, SCHOOLS_FILE, &mut issues, Vec::new),
            links: load_or_empty(dir, LINKS_FILE, &mut issues, || RawLinkTable::List(Vec::new())),
        };

        let mut data = Self::from_raw(raw);
        data.issues = issues;
        log::info!(
            "Reference data loaded from {}: {} characters, {} tags, {} schools, {} links ({} issues)",
            dir.display(),
            data.catalog.len(),
            data.tags.len(),
            data.synergies.schools.len(),
            data.synergies.links.len(),
            data.issues.len()
        );
        data
    }

    /// Re-applies the tag index after the tag table changed.
    pub fn set_tags(&mut self, definitions: Vec<SpecialtyTagDefinition>) {
        self.tags = TagIndex::new(definitions);
        self.catalog.apply_tag_index(&self.tags);
    }
}

fn load_or_empty<T: DeserializeOwned>(
    dir: &Path,
    file: &str,
    issues: &mut Vec<TeamError>,
    empty: impl FnOnce() -> T,
) -> T {
    match load_json_lenient(&dir.join(file)) {
        Ok(table) => table,
        Err(e) => {
            log::warn!("{}; continuing with an empty table", e);
            issues.push(e);
            empty()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Position;

    fn write(dir: &Path, file: &str, text: &str) {
        std::fs::write(dir.join(file), text).unwrap();
    }

    #[test]
    fn test_load_dir_with_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            CHARACTERS_FILE,
            r#"// roster
            [
              {"id": "hinata", "name": "Hinata", "role": "Middle Blocker", "rarity": "ssr",
               "school": "Karasuno High School", "tags": "Ataque Rápido, Salto"},
              {"id": "nishinoya", "nombre": "Nishinoya", "posicion": "Libero", "escuela": "Karasuno"}
            ]"#,
        );
        write(dir.path(), TAGS_FILE, r#"[{"tagKey": "quick_attack", "synonyms": ["ataque rapido"]}]"#);
        write(dir.path(), LINKS_FILE, r#"{"synergies": [{"id": "duo", "miembros": ["hinata", "kageyama"]}]}"#);
        write(dir.path(), SCHOOLS_FILE, "[oops");

        let data = ReferenceData::load_dir(dir.path());
        assert_eq!(data.catalog.len(), 2);
        assert_eq!(data.synergies.links.len(), 1);
        assert!(data.synergies.schools.is_empty());

        let hinata = data.catalog.get("hinata__ssr").unwrap();
        assert_eq!(hinata.position, Position::MB);
        assert_eq!(hinata.canonical_specialty_tags, vec!["quick_attack".to_string()]);

        // schools.json is broken, both bonus tables are missing
        assert_eq!(data.issues.len(), 3);
        assert!(data.issues.iter().all(|e| !e.is_recoverable()));
    }

    #[test]
    fn test_bad_character_record_keeps_rest_of_table() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            CHARACTERS_FILE,
            r#"[
              {"id": 7, "role": "Setter"},
              {"id": "kageyama", "role": "Setter", "rarity": "SSR"}
            ]"#,
        );
        let data = ReferenceData::load_dir(dir.path());
        assert_eq!(data.catalog.len(), 1);
        assert!(data.catalog.get("kageyama__ssr").is_some());
        // only the five missing tables are reported
        assert_eq!(data.issues.len(), 5);
    }

    #[test]
    fn test_empty_dir_degrades_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let data = ReferenceData::load_dir(dir.path());
        assert!(data.catalog.is_empty());
        assert!(data.bonuses.is_empty());
        assert_eq!(data.issues.len(), 6);
    }
}
