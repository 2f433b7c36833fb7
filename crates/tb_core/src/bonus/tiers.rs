// Threshold tiers and tier resolution
use crate::catalog::Position;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tier as written in the bonus tables.
///
/// The count field has gone by three names across table revisions and is
/// sometimes a string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTier {
    #[serde(default)]
    required_count: Option<Value>,
    #[serde(default)]
    min_count: Option<Value>,
    #[serde(default)]
    count: Option<Value>,
    #[serde(default)]
    stat_modifiers: Value,
    #[serde(default)]
    label: String,
}

fn count_from_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => Some(n.as_f64().map(|f| f.max(0.0) as u32).unwrap_or(0)),
        _ => None,
    }
}

fn count_from_str(value: &Value) -> Option<u32> {
    match value {
        Value::String(s) => Some(s.trim().parse::<u32>().unwrap_or(0)),
        _ => None,
    }
}

impl From<RawTier> for ThresholdTier {
    fn from(raw: RawTier) -> Self {
        let fields = [raw.required_count.as_ref(), raw.min_count.as_ref(), raw.count.as_ref()];
        let required_count = fields
            .iter()
            .flatten()
            .find_map(|v| count_from_value(v))
            .or_else(|| fields.iter().flatten().find_map(|v| count_from_str(v)))
            .unwrap_or(0);
        ThresholdTier { required_count, stat_modifiers: raw.stat_modifiers, label: raw.label }
    }
}

/// A bonus step unlocked at `required_count` on-field characters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawTier")]
pub struct ThresholdTier {
    pub required_count: u32,
    pub stat_modifiers: Value,
    pub label: String,
}

impl ThresholdTier {
    pub fn new(required_count: u32, label: impl Into<String>) -> Self {
        Self { required_count, stat_modifiers: Value::Null, label: label.into() }
    }
}

/// Bonus table row as written in the specialty/position files
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawBonusEntry {
    #[serde(default)]
    pub tag_key: Option<String>,
    #[serde(default)]
    pub position_key: Option<String>,
    #[serde(default)]
    pub key: Option<String>,
    /// Plain string or a localized object (`{"es": ..., "en": ...}`)
    #[serde(default)]
    pub name: Value,
    #[serde(default)]
    pub tiers: Vec<ThresholdTier>,
}

/// A keyed bonus with tiers sorted ascending by `required_count`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusDefinition {
    pub key: String,
    pub display_name: String,
    pub tiers: Vec<ThresholdTier>,
}

fn localized_name(name: &Value) -> Option<String> {
    match name {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Object(map) => ["es", "en"]
            .iter()
            .filter_map(|lang| map.get(*lang).and_then(Value::as_str))
            .find(|s| !s.trim().is_empty())
            .map(str::to_string),
        _ => None,
    }
}

impl BonusDefinition {
    pub fn new(key: impl Into<String>, mut tiers: Vec<ThresholdTier>) -> Self {
        let key = key.into();
        tiers.sort_by_key(|t| t.required_count);
        Self { display_name: key.clone(), key, tiers }
    }

    /// Specialty row keyed by `tagKey` (or `key`).
    pub fn specialty_from_raw(raw: RawBonusEntry) -> Option<Self> {
        let key = [&raw.tag_key, &raw.key]
            .iter()
            .filter_map(|k| k.as_deref())
            .map(str::trim)
            .find(|k| !k.is_empty())?
            .to_string();
        let display_name = localized_name(&raw.name).unwrap_or_else(|| key.clone());
        Some(Self { display_name, ..Self::new(key, raw.tiers) })
    }

    /// Position row keyed by `positionKey` (or `key`), upper-cased.
    pub fn position_from_raw(raw: RawBonusEntry) -> Option<(Position, Self)> {
        let key = [&raw.position_key, &raw.key]
            .iter()
            .filter_map(|k| k.as_deref())
            .map(str::trim)
            .find(|k| !k.is_empty())?
            .to_uppercase();
        let Some(position) = Position::from_role(&key) else {
            log::warn!("Position bonus '{}' does not name a position, skipped", key);
            return None;
        };
        let display_name = localized_name(&raw.name).unwrap_or_else(|| key.clone());
        Some((position, Self { display_name, ..Self::new(key, raw.tiers) }))
    }

    /// Resolves the tier state for `count` on-field characters.
    pub fn resolve(&self, count: usize) -> TierStatus {
        resolve_tiers(&self.tiers, count)
    }
}

/// Active and next tier for one bonus key
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TierStatus {
    pub count: usize,
    pub active_tier: Option<ThresholdTier>,
    pub next_tier: Option<ThresholdTier>,
    /// Characters still needed for `next_tier`; 0 when there is none
    pub missing: usize,
}

impl TierStatus {
    pub fn is_active(&self) -> bool {
        self.active_tier.is_some()
    }
}

/// Last tier reached and first tier not yet reached.
///
/// `tiers` must be sorted ascending by `required_count`.
pub fn resolve_tiers(tiers: &[ThresholdTier], count: usize) -> TierStatus {
    let mut active_tier = None;
    let mut next_tier = None;

    for tier in tiers {
        if tier.required_count as usize <= count {
            active_tier = Some(tier);
        } else {
            next_tier = Some(tier);
            break;
        }
    }

    let missing = next_tier.map(|t| (t.required_count as usize).saturating_sub(count)).unwrap_or(0);

    TierStatus {
        count,
        active_tier: active_tier.cloned(),
        next_tier: next_tier.cloned(),
        missing,
    }
}
