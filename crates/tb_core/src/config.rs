//! # Engine configuration
//!
//! Tunable limits for team editing, school thresholds and the export
//! signature. Every field has a default, so a partial JSON file only
//! overrides what it names.
//!
//! ```rust
//! use tb_core::config::EngineConfig;
//!
//! let config = EngineConfig::default();
//! assert_eq!(config.bench_capacity, 6);
//! ```

use crate::synergy::DEFAULT_SCHOOL_THRESHOLD;
use crate::team::{TeamLimits, DEFAULT_BENCH_CAPACITY, DEFAULT_UNDO_CAPACITY};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Snapshots kept per team; the oldest is evicted first
    pub undo_capacity: usize,
    pub bench_capacity: usize,
    /// Team names are trimmed and cut to this many characters
    pub team_name_max_len: usize,
    /// Threshold for schools that do not declare one
    pub school_threshold: u32,
    /// New teams are named `"{prefix} {n}"`
    pub default_team_name: String,
    /// `appName` written to and required from export files
    pub export_app_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            undo_capacity: DEFAULT_UNDO_CAPACITY,
            bench_capacity: DEFAULT_BENCH_CAPACITY,
            team_name_max_len: 40,
            school_threshold: DEFAULT_SCHOOL_THRESHOLD,
            default_team_name: "Team".to_string(),
            export_app_name: "TeamBuilder".to_string(),
        }
    }
}

impl EngineConfig {
    /// Limits applied to every team. Configured values can lower the bench
    /// and undo limits but never raise them past 6 and 25.
    pub fn team_limits(&self) -> TeamLimits {
        TeamLimits {
            bench_capacity: self.bench_capacity.min(DEFAULT_BENCH_CAPACITY),
            undo_capacity: self.undo_capacity.min(DEFAULT_UNDO_CAPACITY),
        }
    }

    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        crate::data::parse_json_lenient(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.undo_capacity, 25);
        assert_eq!(cfg.team_name_max_len, 40);
        assert_eq!(cfg.school_threshold, 4);
    }

    #[test]
    fn test_partial_override() {
        let cfg = EngineConfig::from_json(r#"{ "benchCapacity": 4 } // smaller bench"#).unwrap();
        assert_eq!(cfg.bench_capacity, 4);
        assert_eq!(cfg.undo_capacity, 25);
        assert_eq!(cfg.team_limits().bench_capacity, 4);
    }

    #[test]
    fn test_limits_never_exceed_defaults() {
        let cfg = EngineConfig::from_json(r#"{ "benchCapacity": 12, "undoCapacity": 100 }"#).unwrap();
        let limits = cfg.team_limits();
        assert_eq!(limits.bench_capacity, 6);
        assert_eq!(limits.undo_capacity, 25);
    }

    #[test]
    fn test_config_serialization() {
        let cfg = EngineConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let parsed: EngineConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cfg);
    }
}
