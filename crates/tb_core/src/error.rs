use thiserror::Error;

use crate::catalog::Position;

/// Errors raised by team operations.
///
/// Every variant is recoverable: the operation that produced it leaves the
/// team untouched and the `Display` text is the notice shown to the player.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TeamError {
    #[error("Wrong position: slot {slot_index} requires {required}, {variant_id} plays {actual}")]
    PositionMismatch { variant_id: String, slot_index: usize, required: Position, actual: Position },

    #[error("Character already in use: {base_id} is already on this team")]
    DuplicateCharacter { base_id: String },

    #[error("Bench is full (maximum {capacity})")]
    BenchFull { capacity: usize },

    #[error("{variant_id} plays {position} and cannot be benched")]
    InvalidPosition { variant_id: String, position: Position },

    #[error("Nothing to undo")]
    EmptyUndoStack,

    #[error("The last remaining team cannot be deleted")]
    LastTeamDeletion,

    #[error("Import rejected: expected {expected}, found {found}")]
    ImportSchemaMismatch { expected: String, found: String },

    #[error("Import rejected: {0}")]
    ImportParse(String),

    #[error("Failed to load {table}: {reason}")]
    ReferenceDataLoadFailure { table: String, reason: String },

    #[error("Unknown character: {0}")]
    UnknownCharacter(String),

    #[error("Invalid slot index: {0}")]
    InvalidSlot(usize),

    #[error("Invalid bench index: {0}")]
    InvalidBenchIndex(usize),

    #[error("Slot {0} is empty")]
    EmptySlot(usize),

    #[error("Invalid team index: {0}")]
    InvalidTeamIndex(usize),

    #[error("Invalid team name")]
    InvalidTeamName,

    #[error("No open slot or bench place for {0}")]
    NoPlacement(String),
}

impl TeamError {
    /// Errors that only inform the player and never indicate bad data.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, TeamError::ReferenceDataLoadFailure { .. })
    }

    /// Short machine-readable code for the rendering collaborator.
    pub fn code(&self) -> &'static str {
        match self {
            TeamError::PositionMismatch { .. } => "position_mismatch",
            TeamError::DuplicateCharacter { .. } => "duplicate_character",
            TeamError::BenchFull { .. } => "bench_full",
            TeamError::InvalidPosition { .. } => "invalid_position",
            TeamError::EmptyUndoStack => "empty_undo_stack",
            TeamError::LastTeamDeletion => "last_team_deletion",
            TeamError::ImportSchemaMismatch { .. } => "import_schema_mismatch",
            TeamError::ImportParse(_) => "import_parse",
            TeamError::ReferenceDataLoadFailure { .. } => "reference_data_load_failure",
            TeamError::UnknownCharacter(_) => "unknown_character",
            TeamError::InvalidSlot(_) => "invalid_slot",
            TeamError::InvalidBenchIndex(_) => "invalid_bench_index",
            TeamError::EmptySlot(_) => "empty_slot",
            TeamError::InvalidTeamIndex(_) => "invalid_team_index",
            TeamError::InvalidTeamName => "invalid_team_name",
            TeamError::NoPlacement(_) => "no_placement",
        }
    }
}

pub type Result<T> = std::result::Result<T, TeamError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_text() {
        let err = TeamError::BenchFull { capacity: 6 };
        assert_eq!(err.to_string(), "Bench is full (maximum 6)");
        assert_eq!(err.code(), "bench_full");
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_load_failure_not_recoverable() {
        let err = TeamError::ReferenceDataLoadFailure {
            table: "links".to_string(),
            reason: "missing".to_string(),
        };
        assert!(!err.is_recoverable());
    }
}
