// Roster search for the character picker
use super::character::{CharacterVariant, Position, Rarity};
use super::index::CatalogIndex;
use crate::text::fold;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Picker filters; empty fields match everything
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub school: Option<String>,
    #[serde(default)]
    pub rarity: Option<Rarity>,
}

/// Matches for one position, best rarity first
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionGroup<'a> {
    pub position: Position,
    pub characters: Vec<&'a CharacterVariant>,
}

impl CatalogQuery {
    pub fn matches(&self, variant: &CharacterVariant) -> bool {
        if let Some(school) = self.school.as_deref().filter(|s| !s.is_empty()) {
            if variant.school != school {
                return false;
            }
        }
        if let Some(rarity) = self.rarity {
            if variant.rarity != rarity {
                return false;
            }
        }
        match self.text.as_deref().map(fold).filter(|q| !q.is_empty()) {
            Some(needle) => std::iter::once(&variant.display_name)
                .chain(variant.alias_names.iter())
                .chain(std::iter::once(&variant.base_id))
                .any(|name| fold(name).contains(&needle)),
            None => true,
        }
    }
}

impl CatalogIndex {
    /// Filters the catalog and groups matches by position (OP, WS, MB, S, L),
    /// each group sorted by rarity descending then display name.
    pub fn search(&self, query: &CatalogQuery) -> Vec<PositionGroup<'_>> {
        Position::ALL
            .iter()
            .map(|&position| {
                let mut characters: Vec<&CharacterVariant> =
                    self.iter().filter(|v| v.position == position && query.matches(v)).collect();
                characters.sort_by(|a, b| {
                    Reverse(a.rarity.rank())
                        .cmp(&Reverse(b.rarity.rank()))
                        .then_with(|| a.display_name.cmp(&b.display_name))
                });
                PositionGroup { position, characters }
            })
            .collect()
    }

    /// Distinct school ids, sorted, for the school filter
    pub fn school_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.iter().map(|v| v.school.clone()).collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::RawCharacterEntry;
    use serde_json::json;

    fn catalog() -> CatalogIndex {
        let entries: Vec<RawCharacterEntry> = serde_json::from_value(json!([
            {"id": "oikawa", "name": "Tōru Oikawa", "role": "Setter", "rarity": "SR", "schoolId": "aoba_johsai"},
            {"id": "oikawa", "name": "Tōru Oikawa", "role": "Setter", "rarity": "UR", "schoolId": "aoba_johsai"},
            {"id": "kageyama", "name": "Tobio Kageyama", "role": "Setter", "rarity": "SP", "schoolId": "karasuno", "nameJP": "影山飛雄"},
            {"id": "nishinoya", "name": "Yu Nishinoya", "role": "Libero", "rarity": "SSR", "schoolId": "karasuno"}
        ]))
        .unwrap();
        CatalogIndex::from_entries(entries)
    }

    #[test]
    fn test_groups_sorted_by_rarity() {
        let catalog = catalog();
        let groups = catalog.search(&CatalogQuery::default());
        assert_eq!(groups.len(), 5);
        let setters = &groups[3];
        assert_eq!(setters.position, Position::S);
        let ids: Vec<&str> = setters.characters.iter().map(|v| v.variant_id.as_str()).collect();
        assert_eq!(ids, vec!["kageyama__sp", "oikawa__ur", "oikawa__sr"]);
        assert_eq!(groups[4].characters.len(), 1);
    }

    #[test]
    fn test_text_query_ignores_accents() {
        let catalog = catalog();
        let query = CatalogQuery { text: Some("TORU".to_string()), ..Default::default() };
        let total: usize = catalog.search(&query).iter().map(|g| g.characters.len()).sum();
        assert_eq!(total, 2);

        let query = CatalogQuery { text: Some("影山".to_string()), ..Default::default() };
        let total: usize = catalog.search(&query).iter().map(|g| g.characters.len()).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_school_and_rarity_filters() {
        let catalog = catalog();
        let query = CatalogQuery {
            school: Some("karasuno".to_string()),
            rarity: Some(Rarity::SSR),
            ..Default::default()
        };
        let total: usize = catalog.search(&query).iter().map(|g| g.characters.len()).sum();
        assert_eq!(total, 1);
        assert_eq!(catalog.school_ids(), vec!["aoba_johsai".to_string(), "karasuno".to_string()]);
    }
}
