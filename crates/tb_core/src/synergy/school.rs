// School bonuses: N on-field members of one school
use super::stat::{BonusDescriptor, RawDescriptor};
use crate::catalog::CharacterVariant;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const DEFAULT_SCHOOL_THRESHOLD: u32 = 4;

/// One row of `schools.json`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawSchool {
    pub id: String,
    #[serde(default, alias = "nombre")]
    pub name: Option<String>,
    #[serde(default)]
    pub threshold: Option<u32>,
    #[serde(default, rename = "bonusDescriptors", alias = "bonos")]
    pub bonus_descriptors: Vec<RawDescriptor>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct School {
    pub id: String,
    pub display_name: String,
    /// Explicit threshold; `None` uses the configured default
    pub threshold: Option<u32>,
    pub bonus_descriptors: Vec<BonusDescriptor>,
}

impl From<RawSchool> for School {
    fn from(raw: RawSchool) -> Self {
        let id = raw.id.trim().to_string();
        School {
            display_name: raw
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| crate::text::title_case(&id)),
            id,
            threshold: raw.threshold.filter(|&t| t > 0),
            bonus_descriptors: raw.bonus_descriptors.into_iter().map(BonusDescriptor::from).collect(),
        }
    }
}

/// School row for the current roster; only produced when `count > 0`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchoolStatus {
    pub school_id: String,
    pub display_name: String,
    pub count: usize,
    pub threshold: u32,
    pub active: bool,
    pub missing: usize,
    pub bonus_descriptors: Vec<BonusDescriptor>,
}

/// Evaluates every school with at least one on-field member, in table order.
pub fn evaluate_schools(
    on_field: &[&CharacterVariant],
    schools: &[School],
    default_threshold: u32,
) -> Vec<SchoolStatus> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for character in on_field {
        *counts.entry(character.school.as_str()).or_insert(0) += 1;
    }

    schools
        .iter()
        .filter_map(|school| {
            let count = counts.get(school.id.as_str()).copied().unwrap_or(0);
            if count == 0 {
                return None;
            }
            let threshold = school.threshold.unwrap_or(default_threshold);
            Some(SchoolStatus {
                school_id: school.id.clone(),
                display_name: school.display_name.clone(),
                count,
                threshold,
                active: count >= threshold as usize,
                missing: (threshold as usize).saturating_sub(count),
                bonus_descriptors: school.bonus_descriptors.clone(),
            })
        })
        .collect()
}
