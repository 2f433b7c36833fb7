//! Specialty and position bonus resolution.
//!
//! Counts are taken over the on-field roster only (bench never counts) and
//! every key that has tiers defined gets a [`TierStatus`], including keys with
//! a count of zero.

pub mod tags;
pub mod tiers;

pub use tags::{SpecialtyTagDefinition, TagIndex};
pub use tiers::{resolve_tiers, BonusDefinition, RawBonusEntry, ThresholdTier, TierStatus};

use crate::catalog::{CharacterVariant, Position};
use serde::Serialize;
use std::collections::BTreeMap;

/// Specialty and position tier tables
#[derive(Debug, Clone, Default)]
pub struct BonusTables {
    pub specialty: BTreeMap<String, BonusDefinition>,
    pub position: BTreeMap<Position, BonusDefinition>,
}

impl BonusTables {
    pub fn from_raw(specialty: Vec<RawBonusEntry>, position: Vec<RawBonusEntry>) -> Self {
        let specialty = specialty
            .into_iter()
            .filter_map(BonusDefinition::specialty_from_raw)
            .map(|def| (def.key.clone(), def))
            .collect();
        let position = position.into_iter().filter_map(BonusDefinition::position_from_raw).collect();
        Self { specialty, position }
    }

    pub fn is_empty(&self) -> bool {
        self.specialty.is_empty() && self.position.is_empty()
    }
}

/// Counts and tier states for the current on-field roster
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusReport {
    pub specialty_counts: BTreeMap<String, usize>,
    pub position_counts: BTreeMap<Position, usize>,
    pub specialty_status: BTreeMap<String, TierStatus>,
    pub position_status: BTreeMap<Position, TierStatus>,
}

impl BonusReport {
    /// Specialty keys whose first tier is reached
    pub fn active_specialties(&self) -> impl Iterator<Item = (&String, &TierStatus)> {
        self.specialty_status.iter().filter(|(_, s)| s.is_active())
    }

    pub fn active_positions(&self) -> impl Iterator<Item = (&Position, &TierStatus)> {
        self.position_status.iter().filter(|(_, s)| s.is_active())
    }
}

pub fn count_specialties(on_field: &[&CharacterVariant]) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for character in on_field {
        for tag in &character.canonical_specialty_tags {
            *counts.entry(tag.clone()).or_insert(0) += 1;
        }
    }
    counts
}

pub fn count_positions(on_field: &[&CharacterVariant]) -> BTreeMap<Position, usize> {
    let mut counts = BTreeMap::new();
    for character in on_field {
        *counts.entry(character.position).or_insert(0) += 1;
    }
    counts
}

/// Recomputes the full report. Pure; cheap for a 7-slot roster.
pub fn compute_bonuses(on_field: &[&CharacterVariant], tables: &BonusTables) -> BonusReport {
    let specialty_counts = count_specialties(on_field);
    let position_counts = count_positions(on_field);

    let specialty_status = tables
        .specialty
        .iter()
        .map(|(key, def)| {
            let count = specialty_counts.get(key).copied().unwrap_or(0);
            (key.clone(), def.resolve(count))
        })
        .collect();

    let position_status = tables
        .position
        .iter()
        .map(|(position, def)| {
            let count = position_counts.get(position).copied().unwrap_or(0);
            (*position, def.resolve(count))
        })
        .collect();

    BonusReport { specialty_counts, position_counts, specialty_status, position_status }
}
