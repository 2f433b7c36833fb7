// Stat modifiers shared by school descriptors and link bonus maps
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModifierType {
    Percent,
    Flat,
}

impl ModifierType {
    /// `pct`, `porc`, `percent` and `%` are percentages; anything else is flat.
    pub fn from_kind(kind: &str) -> Self {
        match kind.trim().to_lowercase().as_str() {
            "pct" | "porc" | "percent" | "%" => ModifierType::Percent,
            _ => ModifierType::Flat,
        }
    }

    /// Formats a signed value (`+5%`, `-3`)
    pub fn format(&self, value: f64) -> String {
        let sign = if value >= 0.0 { "+" } else { "" };
        match self {
            ModifierType::Percent => format!("{}{}%", sign, value),
            ModifierType::Flat => format!("{}{}", sign, value),
        }
    }
}

/// Numbers pass through; numeric strings are parsed; everything else is 0.
pub fn number_from_value(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawDescriptor {
    #[serde(default)]
    pub stat: String,
    #[serde(default, alias = "tipo")]
    pub kind: String,
    #[serde(default, alias = "valor")]
    pub value: Value,
}

/// `{stat, kind, value}` as shown on a school card
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BonusDescriptor {
    pub stat: String,
    pub modifier: ModifierType,
    pub value: f64,
}

impl From<RawDescriptor> for BonusDescriptor {
    fn from(raw: RawDescriptor) -> Self {
        BonusDescriptor {
            stat: raw.stat.trim().to_string(),
            modifier: ModifierType::from_kind(&raw.kind),
            value: number_from_value(&raw.value),
        }
    }
}

impl fmt::Display for BonusDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.modifier.format(self.value), self.stat)
    }
}

/// Parsed bonus-map key (`target.stat_pct`, `target.stat_flat`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatKey {
    pub target: Option<String>,
    /// Stat name with the suffix removed and underscores turned into spaces
    pub stat: String,
    pub modifier: ModifierType,
}

impl StatKey {
    pub fn parse(key: &str) -> Self {
        let key = key.trim();
        let (target, raw_stat) = match key.split_once('.') {
            Some((target, stat)) => (Some(target.to_string()), stat),
            None => (None, key),
        };
        let (stem, modifier) = if let Some(stem) = raw_stat.strip_suffix("_pct") {
            (stem, ModifierType::Percent)
        } else if let Some(stem) = raw_stat.strip_suffix("_flat") {
            (stem, ModifierType::Flat)
        } else {
            (raw_stat, ModifierType::Flat)
        };
        StatKey { target, stat: stem.replace('_', " "), modifier }
    }
}

/// One aggregated stat total
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatTotal {
    pub stat: String,
    pub modifier: ModifierType,
    pub value: f64,
}

/// Running totals keyed by (stat, modifier type)
#[derive(Debug, Clone, Default)]
pub struct StatTotals {
    totals: BTreeMap<(String, ModifierType), f64>,
}

impl StatTotals {
    pub fn add(&mut self, stat: &str, modifier: ModifierType, value: f64) {
        *self.totals.entry((stat.to_string(), modifier)).or_insert(0.0) += value;
    }

    pub fn get(&self, stat: &str, modifier: ModifierType) -> f64 {
        self.totals.get(&(stat.to_string(), modifier)).copied().unwrap_or(0.0)
    }

    pub fn is_empty(&self) -> bool {
        self.totals.is_empty()
    }

    pub fn into_vec(self) -> Vec<StatTotal> {
        self.totals
            .into_iter()
            .map(|((stat, modifier), value)| StatTotal { stat, modifier, value })
            .collect()
    }
}
