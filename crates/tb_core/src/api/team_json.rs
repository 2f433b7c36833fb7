// Team builder JSON API layer
// Commands in, snapshots out; every call returns a response object, never panics

use crate::catalog::CatalogQuery;
use crate::engine::{EngineSnapshot, TeamBuilderEngine};
use crate::error::TeamError;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

// ========== Request/Response Structures ==========

/// One engine operation, tagged by `op`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum TeamCommand {
    #[serde(rename_all = "camelCase")]
    PlaceInSlot { variant_id: String, slot_index: usize },
    #[serde(rename_all = "camelCase")]
    PlaceInBench { variant_id: String },
    #[serde(rename_all = "camelCase")]
    RemoveFromSlot { slot_index: usize },
    #[serde(rename_all = "camelCase")]
    MoveBenchToSlot { bench_index: usize, slot_index: usize },
    #[serde(rename_all = "camelCase")]
    MoveSlotToBench { slot_index: usize },
    #[serde(rename_all = "camelCase")]
    QuickPlace { variant_id: String },
    Rotate,
    ClearAll,
    Undo,
    AddTeam {
        #[serde(default)]
        name: Option<String>,
    },
    DuplicateTeam { index: usize },
    RenameTeam { index: usize, name: String },
    DeleteTeam { index: usize },
    SwitchTeam { index: usize },
    #[serde(rename_all = "camelCase")]
    SetLinkLevel { link_id: String, level: u32 },
    ExportTeam {
        #[serde(default)]
        index: Option<usize>,
    },
    ImportTeam { json: String },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub success: bool,
    /// Operation-specific payload (placement outcome, new index, export text)
    pub result: Option<Value>,
    pub snapshot: Option<EngineSnapshot>,
    /// Stable error code, see [`TeamError::code`]
    pub code: Option<String>,
    pub error: Option<String>,
}

impl CommandResponse {
    fn ok(result: Value, snapshot: EngineSnapshot) -> Self {
        Self { success: true, result: Some(result), snapshot: Some(snapshot), code: None, error: None }
    }

    fn failed(code: &str, error: String) -> Self {
        Self { success: false, result: None, snapshot: None, code: Some(code.to_string()), error: Some(error) }
    }

    fn from_team_error(err: &TeamError) -> Self {
        Self::failed(err.code(), err.to_string())
    }
}

fn to_json_string<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value)
        .unwrap_or_else(|_| r#"{"success":false,"error":"Serialization failed"}"#.to_string())
}

fn to_value<T: Serialize>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or(Value::Null)
}

// ========== Public API Functions ==========

/// Runs one command and returns the response, with a fresh snapshot on success.
pub fn execute_command(engine: &mut TeamBuilderEngine, command: TeamCommand) -> CommandResponse {
    let result: Result<Value, TeamError> = match command {
        TeamCommand::PlaceInSlot { variant_id, slot_index } => {
            engine.place_in_slot(&variant_id, slot_index).map(|o| to_value(&o))
        }
        TeamCommand::PlaceInBench { variant_id } => {
            engine.place_in_bench(&variant_id).map(|i| json!({ "benchIndex": i }))
        }
        TeamCommand::RemoveFromSlot { slot_index } => {
            engine.remove_from_slot(slot_index).map(|removed| json!({ "removed": removed }))
        }
        TeamCommand::MoveBenchToSlot { bench_index, slot_index } => {
            engine.move_bench_to_slot(bench_index, slot_index).map(|o| to_value(&o))
        }
        TeamCommand::MoveSlotToBench { slot_index } => {
            engine.move_slot_to_bench(slot_index).map(|i| json!({ "benchIndex": i }))
        }
        TeamCommand::QuickPlace { variant_id } => engine.quick_place(&variant_id).map(|p| to_value(&p)),
        TeamCommand::Rotate => Ok(json!({ "layoutIndex": engine.rotate_formation() })),
        TeamCommand::ClearAll => {
            engine.clear_all();
            Ok(Value::Null)
        }
        TeamCommand::Undo => engine.undo().map(|_| Value::Null),
        TeamCommand::AddTeam { name } => engine.add_team(name.as_deref()).map(|i| json!({ "teamIndex": i })),
        TeamCommand::DuplicateTeam { index } => engine.duplicate_team(index).map(|i| json!({ "teamIndex": i })),
        TeamCommand::RenameTeam { index, name } => engine.rename_team(index, &name).map(|_| Value::Null),
        TeamCommand::DeleteTeam { index } => engine.delete_team(index).map(|_| Value::Null),
        TeamCommand::SwitchTeam { index } => engine.switch_team(index).map(|_| Value::Null),
        TeamCommand::SetLinkLevel { link_id, level } => {
            Ok(json!({ "linkId": link_id, "level": engine.set_link_level(&link_id, level) }))
        }
        TeamCommand::ExportTeam { index } => {
            let index = index.unwrap_or_else(|| engine.teams().current_index());
            engine.export_team(index).and_then(|file| file.to_json()).map(Value::String)
        }
        TeamCommand::ImportTeam { json } => engine.import_team(&json).map(|summary| to_value(&summary)),
    };

    match result {
        Ok(value) => CommandResponse::ok(value, engine.snapshot()),
        Err(e) => {
            log::debug!("Command rejected: {}", e);
            CommandResponse::from_team_error(&e)
        }
    }
}

/// JSON entry point for [`execute_command`]
pub fn handle_command_json(engine: &mut TeamBuilderEngine, request_json: &str) -> String {
    let command: TeamCommand = match serde_json::from_str(request_json) {
        Ok(cmd) => cmd,
        Err(e) => {
            return to_json_string(&CommandResponse::failed(
                "invalid_request",
                format!("Invalid request format: {}", e),
            ));
        }
    };
    to_json_string(&execute_command(engine, command))
}

/// Current snapshot without changing anything
pub fn snapshot_json(engine: &TeamBuilderEngine) -> String {
    to_json_string(&CommandResponse::ok(Value::Null, engine.snapshot()))
}

#[derive(Debug, Serialize)]
struct SearchResponse<'a> {
    success: bool,
    groups: Vec<crate::catalog::PositionGroup<'a>>,
    error: Option<String>,
}

/// Catalog search grouped by position; an empty request matches everything.
pub fn search_catalog_json(engine: &TeamBuilderEngine, query_json: &str) -> String {
    let query: CatalogQuery = if query_json.trim().is_empty() {
        CatalogQuery::default()
    } else {
        match serde_json::from_str(query_json) {
            Ok(q) => q,
            Err(e) => {
                return to_json_string(&SearchResponse {
                    success: false,
                    groups: vec![],
                    error: Some(format!("Invalid request format: {}", e)),
                });
            }
        }
    };
    to_json_string(&SearchResponse { success: true, groups: engine.search(&query), error: None })
}
