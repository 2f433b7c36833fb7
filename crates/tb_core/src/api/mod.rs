pub mod team_json;

pub use team_json::{
    execute_command, handle_command_json, search_catalog_json, snapshot_json, CommandResponse, TeamCommand,
};
