// Persistence for the team builder
// Versioned JSON envelopes over a key/value storage, plus team export files

pub mod error;
pub mod export;
pub mod format;
pub mod manager;
pub mod migration;
pub mod storage;

pub use error::SaveError;
pub use export::{export_team, import_team, parse_export, ExportFile, ExportedTeam, ImportedTeam};
pub use format::{LegacyTeamState, PersistedTeam, TeamsEnvelope};
pub use manager::SaveManager;
pub use migration::migrate_teams;
pub use storage::{FileStorage, MemoryStorage, Storage};

pub const TEAMS_SCHEMA_VERSION: u32 = 2;

/// Team collection envelope
pub const TEAMS_KEY: &str = "tb_teams_v2";
/// Single-team state from before multi-team support
pub const LEGACY_STATE_KEY: &str = "tb_state_v1";
pub const LINK_LEVELS_KEY: &str = "tb_links_levels_v1";

pub const EXPORT_SCHEMA: &str = "app.teambuilder.v1";
