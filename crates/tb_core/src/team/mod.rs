//! Team state: placement rules, rotation, undo and multi-team management.
//!
//! Every failed operation leaves the team untouched. Successful mutations push
//! an undo snapshot first (placements, removals, rotation, clear, moves).

pub mod collection;
pub mod roster;
pub mod undo;

pub use collection::{normalize_team_name, TeamCollection};
pub use roster::{
    Displacement, PlacementOutcome, QuickPlacement, Team, TeamLimits, TeamState, DEFAULT_BENCH_CAPACITY,
};
pub use undo::{UndoStack, DEFAULT_UNDO_CAPACITY};
