use super::error::SaveError;
use super::format::{LegacyTeamState, PersistedTeam, TeamsEnvelope};
use super::TEAMS_SCHEMA_VERSION;
use serde_json::Value;

/// Schema version of a stored document.
///
/// Documents without `schemaVersion` but with `layoutIdx`/`slots` are the
/// version 1 single-team state.
pub fn detect_version(value: &Value) -> Result<u32, SaveError> {
    let obj = value.as_object().ok_or_else(|| SaveError::Corrupted("expected a JSON object".into()))?;
    if let Some(version) = obj.get("schemaVersion") {
        return version
            .as_u64()
            .map(|v| v as u32)
            .ok_or_else(|| SaveError::Corrupted(format!("schemaVersion is not a number: {}", version)));
    }
    if obj.contains_key("layoutIdx") || obj.contains_key("slots") {
        return Ok(1);
    }
    Err(SaveError::Corrupted("no schemaVersion and not a legacy team state".into()))
}

/// Migrates a stored teams document to the current envelope
pub fn migrate_teams(value: Value) -> Result<TeamsEnvelope, SaveError> {
    let original_version = detect_version(&value)?;

    let mut envelope = match original_version {
        1 => migrate_v1_to_v2(serde_json::from_value(value)?),
        2 => serde_json::from_value(value)?,
        v if v > TEAMS_SCHEMA_VERSION => {
            // Future version - might be compatible
            log::warn!("Loading teams from future schema {} (current: {})", v, TEAMS_SCHEMA_VERSION);
            serde_json::from_value(value)?
        }
        found => {
            return Err(SaveError::VersionMismatch { found, expected: TEAMS_SCHEMA_VERSION });
        }
    };

    envelope.schema_version = TEAMS_SCHEMA_VERSION;

    if original_version != TEAMS_SCHEMA_VERSION {
        log::info!("Migrated teams from schema {} to {}", original_version, TEAMS_SCHEMA_VERSION);
    }

    Ok(envelope)
}

/// Version 1 -> 2: the single team becomes the first entry of a collection
fn migrate_v1_to_v2(legacy: LegacyTeamState) -> TeamsEnvelope {
    log::info!("Migrating legacy single-team state");
    TeamsEnvelope {
        schema_version: 2,
        current_team_index: 0,
        teams: vec![PersistedTeam {
            id: String::new(),
            name: String::new(),
            layout_index: legacy.layout_idx,
            slots: legacy.slots,
            bench: legacy.bench,
        }],
    }
}

pub fn needs_migration(value: &Value) -> bool {
    detect_version(value).map(|v| v < TEAMS_SCHEMA_VERSION).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_migrate_legacy_state() {
        let legacy = json!({"layoutIdx": 2, "slots": ["a", null, null, null, null, null, "l"], "bench": ["b"]});
        assert!(needs_migration(&legacy));

        let envelope = migrate_teams(legacy).unwrap();
        assert_eq!(envelope.schema_version, TEAMS_SCHEMA_VERSION);
        assert_eq!(envelope.teams.len(), 1);
        assert_eq!(envelope.teams[0].layout_index, 2);
        assert_eq!(envelope.teams[0].slots[6].as_deref(), Some("l"));
        assert_eq!(envelope.teams[0].bench, vec!["b".to_string()]);
    }

    #[test]
    fn test_no_migration_needed() {
        let current = json!({"schemaVersion": 2, "currentTeamIndex": 0, "teams": []});
        assert!(!needs_migration(&current));
        assert!(migrate_teams(current).unwrap().teams.is_empty());
    }

    #[test]
    fn test_future_version_warning() {
        let future = json!({"schemaVersion": 9, "teams": [{"name": "x"}]});
        let envelope = migrate_teams(future).unwrap();
        assert_eq!(envelope.schema_version, TEAMS_SCHEMA_VERSION);
        assert_eq!(envelope.teams.len(), 1);
    }

    #[test]
    fn test_unknown_documents_rejected() {
        assert!(matches!(
            migrate_teams(json!({"schemaVersion": 0})),
            Err(SaveError::VersionMismatch { found: 0, expected: 2 })
        ));
        assert!(matches!(migrate_teams(json!([1, 2])), Err(SaveError::Corrupted(_))));
        assert!(matches!(migrate_teams(json!({"hello": 1})), Err(SaveError::Corrupted(_))));
    }
}
