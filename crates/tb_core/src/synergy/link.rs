//! Named multi-character links.
//!
//! Requirement ids are normalized once when the link table is loaded. A plain
//! id matches any variant of that base character; a rarity-qualified id
//! (`hinata-SSR`, `hinata__ssr`) only matches that exact release.

use super::stat::{number_from_value, ModifierType, StatKey, StatTotals};
use crate::catalog::{CharacterVariant, Rarity};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// Normalized identity a requirement matches on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RequirementKey {
    Base(String),
    VariantQualified { base_id: String, rarity: Rarity },
}

/// One required member. Compares by `key`; `raw` keeps the id as written in
/// the link table for display.
#[derive(Debug, Clone)]
pub struct LinkRequirement {
    pub key: RequirementKey,
    pub raw: String,
}

impl PartialEq for LinkRequirement {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for LinkRequirement {}

impl LinkRequirement {
    /// Parses a raw member id. The suffix after `__` or the last `-` only
    /// qualifies the id when it is a known rarity code.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let id = raw.to_lowercase();
        if id.is_empty() {
            return None;
        }
        let split = id.split_once("__").or_else(|| id.rsplit_once('-'));
        let qualified = split.and_then(|(base, suffix)| {
            let rarity = Rarity::from_code(suffix)?;
            (!base.is_empty()).then(|| RequirementKey::VariantQualified { base_id: base.to_string(), rarity })
        });
        let key = qualified.unwrap_or(RequirementKey::Base(id));
        Some(LinkRequirement { key, raw: raw.to_string() })
    }

    pub fn base_id(&self) -> &str {
        match &self.key {
            RequirementKey::Base(id) => id,
            RequirementKey::VariantQualified { base_id, .. } => base_id,
        }
    }

    pub fn is_met(&self, roster: &RosterKeys) -> bool {
        match &self.key {
            RequirementKey::Base(id) => roster.bases.contains(id),
            RequirementKey::VariantQualified { base_id, rarity } => {
                roster.variants.contains(&(base_id.clone(), *rarity))
            }
        }
    }
}

impl fmt::Display for LinkRequirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl Serialize for LinkRequirement {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// On-field identities used for requirement matching (base ids lower-cased)
#[derive(Debug, Clone, Default)]
pub struct RosterKeys {
    pub bases: HashSet<String>,
    pub variants: HashSet<(String, Rarity)>,
}

impl RosterKeys {
    pub fn from_on_field(on_field: &[&CharacterVariant]) -> Self {
        let mut keys = Self::default();
        for character in on_field {
            let base = character.base_id.to_lowercase();
            keys.variants.insert((base.clone(), character.rarity));
            keys.bases.insert(base);
        }
        keys
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawMember {
    Id(String),
    Ref {
        #[serde(rename = "characterId", alias = "id")]
        character_id: String,
    },
}

impl RawMember {
    fn id(&self) -> &str {
        match self {
            RawMember::Id(id) => id,
            RawMember::Ref { character_id } => character_id,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLinkLevel {
    #[serde(default, rename = "levelNumber", alias = "lvl", alias = "level")]
    pub level_number: Value,
    #[serde(default, rename = "bonusMap", alias = "bono")]
    pub bonus_map: BTreeMap<String, Value>,
    #[serde(default)]
    pub text: Value,
}

/// One row of the link table
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawLink {
    #[serde(default)]
    pub id: Value,
    #[serde(default, alias = "nombre")]
    pub name: Value,
    #[serde(default)]
    pub effect: Value,
    #[serde(
        default,
        rename = "requiredMembers",
        alias = "miembros",
        alias = "conjunto",
        alias = "requires",
        alias = "members"
    )]
    pub required_members: Vec<RawMember>,
    #[serde(default)]
    pub pairs: Vec<Vec<String>>,
    #[serde(default)]
    pub priority: Value,
    #[serde(default, alias = "niveles")]
    pub levels: Vec<RawLinkLevel>,
}

/// Link tables are a bare array or wrapped as `{"synergies": [...]}`
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawLinkTable {
    List(Vec<RawLink>),
    Wrapped { synergies: Vec<RawLink> },
}

impl RawLinkTable {
    pub fn into_links(self) -> Vec<RawLink> {
        match self {
            RawLinkTable::List(links) => links,
            RawLinkTable::Wrapped { synergies } => synergies,
        }
    }
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => ["es", "en"]
            .iter()
            .filter_map(|lang| map.get(*lang).and_then(Value::as_str))
            .find(|s| !s.trim().is_empty())
            .map(|s| s.trim().to_string()),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkLevel {
    pub level_number: u32,
    pub bonus_map: BTreeMap<String, f64>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub id: String,
    pub display_name: String,
    pub effect: String,
    pub requirements: Vec<LinkRequirement>,
    /// Pairs of base ids; one complete pair is needed when any are declared
    pub pairs: Vec<(String, String)>,
    pub priority: i64,
    /// Sorted ascending by `level_number`
    pub levels: Vec<LinkLevel>,
}

impl Link {
    /// Normalizes a raw row. Rows without an id are dropped.
    pub fn from_raw(raw: RawLink) -> Option<Self> {
        let id = text_of(&raw.id)?;

        let mut requirements: Vec<LinkRequirement> = Vec::new();
        for member in &raw.required_members {
            if let Some(req) = LinkRequirement::parse(member.id()) {
                if !requirements.contains(&req) {
                    requirements.push(req);
                }
            }
        }

        let pairs = raw
            .pairs
            .iter()
            .filter_map(|pair| match pair.as_slice() {
                [a, b, ..] => Some((a.trim().to_lowercase(), b.trim().to_lowercase())),
                _ => {
                    log::warn!("Link '{}': pair {:?} needs two members, skipped", id, pair);
                    None
                }
            })
            .collect();

        let mut levels: Vec<LinkLevel> = raw
            .levels
            .into_iter()
            .enumerate()
            .map(|(i, level)| {
                let number = number_from_value(&level.level_number) as u32;
                LinkLevel {
                    level_number: if number == 0 { i as u32 + 1 } else { number },
                    bonus_map: level.bonus_map.iter().map(|(k, v)| (k.clone(), number_from_value(v))).collect(),
                    text: text_of(&level.text).unwrap_or_default(),
                }
            })
            .collect();
        levels.sort_by_key(|l| l.level_number);

        Some(Link {
            display_name: text_of(&raw.name).unwrap_or_else(|| crate::text::title_case(&id)),
            effect: text_of(&raw.effect).unwrap_or_default(),
            priority: raw.priority.as_i64().unwrap_or(0),
            id,
            requirements,
            pairs,
            levels,
        })
    }

    /// Highest declared `level_number`; 0 when the link has no levels
    pub fn max_level(&self) -> u32 {
        self.levels.last().map_or(0, |l| l.level_number)
    }

    /// Payout for a selected level number. Gaps in the table fall back to
    /// the highest declared level below the selection.
    pub fn level(&self, selected: u32) -> Option<&LinkLevel> {
        self.levels.iter().rev().find(|l| l.level_number <= selected)
    }

    fn involves(&self, roster: &RosterKeys) -> bool {
        self.requirements.iter().any(|r| r.is_met(roster))
            || self.pairs.iter().any(|(a, b)| roster.bases.contains(a) || roster.bases.contains(b))
    }

    fn pair_complete(&self, roster: &RosterKeys) -> bool {
        self.pairs.is_empty()
            || self.pairs.iter().any(|(a, b)| roster.bases.contains(a) && roster.bases.contains(b))
    }

    fn is_complete(&self, roster: &RosterKeys) -> bool {
        let declared = !self.requirements.is_empty() || !self.pairs.is_empty();
        declared && self.requirements.iter().all(|r| r.is_met(roster)) && self.pair_complete(roster)
    }

    fn missing(&self, roster: &RosterKeys) -> Vec<String> {
        let mut missing: Vec<String> =
            self.requirements.iter().filter(|r| !r.is_met(roster)).map(|r| r.to_string()).collect();
        if !self.pair_complete(roster) {
            if let Some((a, b)) = self.pairs.first() {
                for id in [a, b] {
                    if !roster.bases.contains(id) && !missing.contains(id) {
                        missing.push(id.clone());
                    }
                }
            }
        }
        missing
    }
}

/// Sorts links by descending priority, keeping table order for ties.
pub fn sort_by_priority(links: &mut [Link]) {
    links.sort_by(|a, b| b.priority.cmp(&a.priority));
}

/// Player-selected level per link id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LinkLevels {
    levels: BTreeMap<String, u32>,
}

impl LinkLevels {
    pub fn new() -> Self {
        Self::default()
    }

    /// Selected level clamped to `[1, max_level]`; 1 when unset
    pub fn get(&self, link_id: &str, max_level: u32) -> u32 {
        let selected = self.levels.get(link_id).copied().unwrap_or(1);
        selected.clamp(1, max_level.max(1))
    }

    /// Stores a selection; 0 is stored as 1.
    pub fn set(&mut self, link_id: &str, level: u32) {
        self.levels.insert(link_id.to_string(), level.max(1));
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &u32)> {
        self.levels.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkBonusLine {
    pub target: Option<String>,
    pub stat: String,
    pub modifier: ModifierType,
    pub value: f64,
}

/// Evaluation of one visible link
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkStatus {
    pub link_id: String,
    pub display_name: String,
    pub effect: String,
    pub visible: bool,
    pub active: bool,
    pub have: usize,
    pub need: usize,
    pub missing: Vec<String>,
    /// `None` when the link defines no levels
    pub selected_level: Option<u32>,
    pub max_level: u32,
    pub bonuses: Vec<LinkBonusLine>,
}

/// Evaluates `links` (already priority-sorted) against the on-field roster.
///
/// Returns the visible links and the (stat, modifier) totals of the active
/// ones at their selected level.
pub fn evaluate_links(
    on_field: &[&CharacterVariant],
    links: &[Link],
    selections: &LinkLevels,
) -> (Vec<LinkStatus>, StatTotals) {
    let roster = RosterKeys::from_on_field(on_field);
    let mut totals = StatTotals::default();
    let mut statuses = Vec::new();

    for link in links {
        if !link.involves(&roster) {
            continue;
        }
        let active = link.is_complete(&roster);
        let max_level = link.max_level();
        let selected_level = (max_level > 0).then(|| selections.get(&link.id, max_level));

        let bonuses: Vec<LinkBonusLine> = selected_level
            .and_then(|lvl| link.level(lvl))
            .map(|level| {
                level
                    .bonus_map
                    .iter()
                    .map(|(key, value)| {
                        let key = StatKey::parse(key);
                        LinkBonusLine { target: key.target, stat: key.stat, modifier: key.modifier, value: *value }
                    })
                    .collect()
            })
            .unwrap_or_default();

        if active {
            for line in &bonuses {
                totals.add(&line.stat, line.modifier, line.value);
            }
        }

        statuses.push(LinkStatus {
            link_id: link.id.clone(),
            display_name: link.display_name.clone(),
            effect: link.effect.clone(),
            visible: true,
            active,
            have: link.requirements.iter().filter(|r| r.is_met(&roster)).count(),
            need: link.requirements.len(),
            missing: if active { Vec::new() } else { link.missing(&roster) },
            selected_level,
            max_level,
            bonuses,
        });
    }

    (statuses, totals)
}
