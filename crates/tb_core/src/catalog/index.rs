// Catalog lookup indexes
use super::character::{CharacterVariant, Position};
use super::resolver::{resolve_entry, RawCharacterEntry};
use crate::bonus::tags::TagIndex;
use std::collections::HashMap;

/// Resolved catalog with `variant_id` and `base_id` lookups
#[derive(Debug, Clone, Default)]
pub struct CatalogIndex {
    variants: Vec<CharacterVariant>,
    by_variant: HashMap<String, usize>,
    by_base: HashMap<String, Vec<usize>>,
}

impl CatalogIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves raw entries and builds the indexes.
    pub fn from_entries(entries: Vec<RawCharacterEntry>) -> Self {
        Self::from_variants(entries.into_iter().filter_map(resolve_entry).collect())
    }

    /// Builds the indexes from already resolved variants.
    ///
    /// A repeated `variant_id` keeps the first record.
    pub fn from_variants(variants: Vec<CharacterVariant>) -> Self {
        let mut index = Self::new();
        for variant in variants {
            index.insert(variant);
        }
        log::debug!(
            "Catalog indexed: {} variants, {} base characters",
            index.variants.len(),
            index.by_base.len()
        );
        index
    }

    fn insert(&mut self, variant: CharacterVariant) {
        if self.by_variant.contains_key(&variant.variant_id) {
            log::warn!("Duplicate variant id '{}' ignored", variant.variant_id);
            return;
        }
        let idx = self.variants.len();
        self.by_variant.insert(variant.variant_id.clone(), idx);
        self.by_base.entry(variant.base_id.clone()).or_default().push(idx);
        self.variants.push(variant);
    }

    pub fn get(&self, variant_id: &str) -> Option<&CharacterVariant> {
        self.by_variant.get(variant_id).map(|&idx| &self.variants[idx])
    }

    pub fn contains(&self, variant_id: &str) -> bool {
        self.by_variant.contains_key(variant_id)
    }

    /// Base id of a variant, if the variant is known
    pub fn base_id_of(&self, variant_id: &str) -> Option<&str> {
        self.get(variant_id).map(|v| v.base_id.as_str())
    }

    /// All releases of a base character, in catalog order
    pub fn variants_of(&self, base_id: &str) -> Vec<&CharacterVariant> {
        self.by_base
            .get(base_id)
            .map(|idxs| idxs.iter().map(|&i| &self.variants[i]).collect())
            .unwrap_or_default()
    }

    /// First release of `base_id` playing `position`
    pub fn find_by_base_and_position(
        &self,
        base_id: &str,
        position: Position,
    ) -> Option<&CharacterVariant> {
        self.variants_of(base_id).into_iter().find(|v| v.position == position)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CharacterVariant> {
        self.variants.iter()
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Recomputes every variant's canonical specialty tags.
    pub fn apply_tag_index(&mut self, tags: &TagIndex) {
        for variant in &mut self.variants {
            variant.canonical_specialty_tags = tags.canonicalize(&variant.raw_tags);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn catalog() -> CatalogIndex {
        let entries: Vec<RawCharacterEntry> = serde_json::from_value(json!([
            {"id": "hinata", "role": "Middle Blocker", "rarity": "SSR"},
            {"id": "hinata", "role": "Wing Spiker", "rarity": "UR"},
            {"id": "kageyama", "role": "Setter", "rarity": "SR"},
            {"id": "kageyama", "role": "Setter", "rarity": "SR"}
        ]))
        .unwrap();
        CatalogIndex::from_entries(entries)
    }

    #[test]
    fn test_indexes() {
        let catalog = catalog();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.variants_of("hinata").len(), 2);
        assert_eq!(catalog.base_id_of("kageyama__sr"), Some("kageyama"));
        assert!(catalog.get("nobody__n").is_none());
    }

    #[test]
    fn test_find_by_base_and_position() {
        let catalog = catalog();
        let v = catalog.find_by_base_and_position("hinata", Position::WS).unwrap();
        assert_eq!(v.variant_id, "hinata__ur");
        assert!(catalog.find_by_base_and_position("hinata", Position::L).is_none());
    }
}
