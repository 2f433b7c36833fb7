//! # tb_core - Volleyball Team Builder Engine
//!
//! Formation, roster and synergy resolution for a 7-slot volleyball team
//! builder, with a JSON command API for UI front ends.
//!
//! ## Features
//! - Position-aware placement with libero rules, bench and bounded undo
//! - Four rotating formation layouts
//! - Specialty, position, school and link bonuses recomputed on every change
//! - Versioned persistence with legacy migration and team export/import

// Doc formatting lints - purely cosmetic
#![allow(clippy::doc_lazy_continuation)]
// Struct initialization pattern used intentionally
#![allow(clippy::field_reassign_with_default)]
// Complex types are sometimes necessary for generic APIs
#![allow(clippy::type_complexity)]
// Command enum carries the import payload inline
#![allow(clippy::large_enum_variant)]

pub mod api;
pub mod bonus;
pub mod catalog;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod formation;
pub mod save;
pub mod synergy;
pub mod team;
pub mod text;

// Re-export main API functions
pub use api::{execute_command, handle_command_json, search_catalog_json, snapshot_json, CommandResponse, TeamCommand};
pub use error::{Result, TeamError};

// Re-export catalog and reference data
pub use catalog::{CatalogIndex, CatalogQuery, CharacterVariant, Position, Rarity};
pub use data::{ReferenceData, DATA_DIR_ENV};

// Re-export engine
pub use config::EngineConfig;
pub use engine::{EngineSnapshot, ImportSummary, ListenerId, TeamBuilderEngine, TeamView};

// Re-export reports
pub use bonus::{BonusReport, TierStatus};
pub use synergy::{LinkLevels, LinkStatus, SchoolStatus, SynergyReport};

// Re-export team model
pub use team::{Displacement, PlacementOutcome, QuickPlacement, Team, TeamCollection, TeamState};

// Re-export save system
pub use save::{ExportFile, FileStorage, MemoryStorage, SaveError, SaveManager, Storage};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
