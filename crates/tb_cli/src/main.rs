//! Team Builder CLI
//!
//! Edits teams stored in a state directory against a reference data
//! directory, printing the resulting roster and bonuses.

#[cfg(feature = "cli")]
mod logging;

#[cfg(feature = "cli")]
use anyhow::{Context, Result};
#[cfg(feature = "cli")]
use clap::{Parser, Subcommand};
#[cfg(feature = "cli")]
use std::path::{Path, PathBuf};
#[cfg(feature = "cli")]
use tb_core::{
    CatalogQuery, EngineConfig, EngineSnapshot, FileStorage, Rarity, ReferenceData, TeamBuilderEngine, DATA_DIR_ENV,
};

#[cfg(feature = "cli")]
const STATE_DIR_ENV: &str = "TB_STATE_DIR";

#[cfg(feature = "cli")]
#[derive(Parser)]
#[command(name = "tb")]
#[command(about = "Build volleyball teams and inspect their bonuses", long_about = None)]
struct Cli {
    /// Reference data directory (falls back to $TB_DATA_DIR, then ./data)
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// State directory (falls back to $TB_STATE_DIR, then ./tb_state)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Engine config JSON file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print JSON snapshots instead of text
    #[arg(long, global = true, default_value = "false")]
    json: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum Commands {
    /// Show the current team and its bonuses
    Show,

    /// Place a character in a formation slot
    Place { variant_id: String, slot: usize },

    /// Add a character to the bench
    Bench { variant_id: String },

    /// Empty a formation slot
    Remove { slot: usize },

    /// Put a character in the first fitting slot, else the bench
    Quick { variant_id: String },

    /// Move a bench entry into a slot
    FromBench { bench_index: usize, slot: usize },

    /// Move a slot occupant to the bench
    ToBench { slot: usize },

    /// Rotate the formation one step
    Rotate,

    /// Empty every slot and the bench
    Clear,

    /// Team management
    #[command(subcommand)]
    Team(TeamCommands),

    /// Choose the level used for a link's bonuses
    Level { link_id: String, level: u32 },

    /// Write the current (or given) team as an export file
    Export {
        #[arg(long)]
        team: Option<usize>,

        /// Output file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Import an export file as a new team
    Import { file: PathBuf },

    /// Search the catalog
    Search {
        #[arg(long)]
        text: Option<String>,

        #[arg(long)]
        school: Option<String>,

        #[arg(long)]
        rarity: Option<String>,
    },

    /// Run newline-delimited JSON commands in one session
    Script { file: PathBuf },
}

#[cfg(feature = "cli")]
#[derive(Subcommand)]
enum TeamCommands {
    List,
    Add { name: Option<String> },
    Dup { index: usize },
    Rename { index: usize, name: String },
    Delete { index: usize },
    Switch { index: usize },
}

#[cfg(feature = "cli")]
fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(logging::level_for(cli.verbose)).context("Failed to install logger")?;
    let output = run(cli)?;
    print!("{}", output);
    Ok(())
}

#[cfg(feature = "cli")]
fn resolve_dir(flag: Option<PathBuf>, env: &str, fallback: &str) -> PathBuf {
    flag.or_else(|| std::env::var_os(env).map(PathBuf::from)).unwrap_or_else(|| PathBuf::from(fallback))
}

#[cfg(feature = "cli")]
fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    let Some(path) = path else {
        return Ok(EngineConfig::default());
    };
    let text = std::fs::read_to_string(path).with_context(|| format!("Failed to read config {}", path.display()))?;
    EngineConfig::from_json(&text).with_context(|| format!("Invalid config {}", path.display()))
}

#[cfg(feature = "cli")]
fn open_engine(cli: &Cli) -> Result<TeamBuilderEngine> {
    let data_dir = resolve_dir(cli.data.clone(), DATA_DIR_ENV, "data");
    let state_dir = resolve_dir(cli.state.clone(), STATE_DIR_ENV, "tb_state");
    let config = load_config(cli.config.as_deref())?;

    let data = ReferenceData::load_dir(&data_dir);
    for issue in &data.issues {
        log::warn!("{}", issue);
    }
    log::info!("State directory: {}", state_dir.display());
    Ok(TeamBuilderEngine::with_storage(data, config, FileStorage::new(state_dir)))
}

/// Runs one invocation and returns what should go to stdout.
#[cfg(feature = "cli")]
fn run(cli: Cli) -> Result<String> {
    let mut engine = open_engine(&cli)?;

    match cli.command {
        Commands::Show => {}
        Commands::Place { ref variant_id, slot } => {
            let outcome = engine.place_in_slot(variant_id, slot)?;
            if let Some(displaced) = outcome.displaced {
                log::info!("Displaced: {:?}", displaced);
            }
        }
        Commands::Bench { ref variant_id } => {
            engine.place_in_bench(variant_id)?;
        }
        Commands::Remove { slot } => {
            engine.remove_from_slot(slot)?;
        }
        Commands::Quick { ref variant_id } => {
            let placed = engine.quick_place(variant_id)?;
            log::info!("Quick placed {}: {:?}", variant_id, placed);
        }
        Commands::FromBench { bench_index, slot } => {
            engine.move_bench_to_slot(bench_index, slot)?;
        }
        Commands::ToBench { slot } => {
            engine.move_slot_to_bench(slot)?;
        }
        Commands::Rotate => {
            engine.rotate_formation();
        }
        Commands::Clear => engine.clear_all(),
        Commands::Team(ref cmd) => {
            match cmd {
                TeamCommands::List => return Ok(render_team_list(&engine.snapshot())),
                TeamCommands::Add { name } => {
                    engine.add_team(name.as_deref())?;
                }
                TeamCommands::Dup { index } => {
                    engine.duplicate_team(*index)?;
                }
                TeamCommands::Rename { index, name } => engine.rename_team(*index, name)?,
                TeamCommands::Delete { index } => engine.delete_team(*index)?,
                TeamCommands::Switch { index } => engine.switch_team(*index)?,
            }
        }
        Commands::Level { ref link_id, level } => {
            let effective = engine.set_link_level(link_id, level);
            if effective != level {
                log::warn!("Level {} for '{}' clamped to {}", level, link_id, effective);
            }
        }
        Commands::Export { team, ref out } => {
            let file = match team {
                Some(index) => engine.export_team(index)?,
                None => engine.export_current_team()?,
            };
            let text = file.to_json()?;
            return match out {
                Some(path) => {
                    std::fs::write(path, &text).with_context(|| format!("Failed to write {}", path.display()))?;
                    Ok(format!("Exported '{}' to {}\n", file.team.name, path.display()))
                }
                None => Ok(format!("{}\n", text)),
            };
        }
        Commands::Import { ref file } => {
            let text =
                std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
            let summary = engine.import_team(&text)?;
            for dropped in &summary.dropped {
                log::warn!("Import dropped {}", dropped);
            }
        }
        Commands::Search { ref text, ref school, ref rarity } => {
            let rarity = match rarity {
                Some(code) => Some(Rarity::from_code(code).with_context(|| format!("Unknown rarity '{}'", code))?),
                None => None,
            };
            let query = CatalogQuery { text: text.clone(), school: school.clone(), rarity };
            return Ok(render_search(&engine, &query, cli.json));
        }
        Commands::Script { ref file } => {
            let text =
                std::fs::read_to_string(file).with_context(|| format!("Failed to read {}", file.display()))?;
            let mut out = String::new();
            for line in text.lines().map(str::trim).filter(|l| !l.is_empty() && !l.starts_with("//")) {
                out.push_str(&tb_core::handle_command_json(&mut engine, line));
                out.push('\n');
            }
            return Ok(out);
        }
    }

    let snapshot = engine.snapshot();
    if cli.json {
        Ok(format!("{}\n", serde_json::to_string_pretty(&snapshot)?))
    } else {
        Ok(render_snapshot(&snapshot))
    }
}

#[cfg(feature = "cli")]
fn render_team_list(snapshot: &EngineSnapshot) -> String {
    let mut out = String::new();
    for team in &snapshot.teams {
        let marker = if team.index == snapshot.team_index { "*" } else { " " };
        out.push_str(&format!("{} {} {}\n", marker, team.index, team.name));
    }
    out
}

#[cfg(feature = "cli")]
fn render_snapshot(snapshot: &EngineSnapshot) -> String {
    let team = &snapshot.team;
    let mut out = format!(
        "Team {} '{}' (layout {}, undo {})\n",
        snapshot.team_index, team.name, team.layout_index, team.undo_depth
    );

    for slot in &team.slots {
        let occupant = slot.variant_id.as_deref().unwrap_or("-");
        out.push_str(&format!("  [{}] {:<2} {}\n", slot.slot_index, slot.position.code(), occupant));
    }
    out.push_str(&format!("  bench ({}/{}): {}\n", team.bench.len(), team.bench_capacity, team.bench.join(", ")));

    let bonuses = &snapshot.bonuses;
    for (key, status) in bonuses.active_specialties() {
        let tier = status.active_tier.as_ref().map(|t| t.label.as_str()).unwrap_or("");
        out.push_str(&format!("  specialty {} x{} {}\n", key, status.count, tier));
    }
    for (position, status) in bonuses.active_positions() {
        out.push_str(&format!("  position {} x{}\n", position, status.count));
    }

    for school in &snapshot.synergies.schools {
        let state = if school.active { "active".to_string() } else { format!("{} missing", school.missing) };
        out.push_str(&format!(
            "  school {} {}/{} ({})\n",
            school.display_name, school.count, school.threshold, state
        ));
    }
    for link in &snapshot.synergies.links {
        let state = if link.active { "active".to_string() } else { format!("needs {}", link.missing.join(", ")) };
        let level = link.selected_level.map(|l| format!(" lvl {}/{}", l, link.max_level)).unwrap_or_default();
        out.push_str(&format!("  link {} {}/{}{} ({})\n", link.display_name, link.have, link.need, level, state));
    }
    for total in &snapshot.synergies.link_totals {
        out.push_str(&format!("  total {} {}\n", total.stat, total.modifier.format(total.value)));
    }
    out
}

#[cfg(feature = "cli")]
fn render_search(engine: &TeamBuilderEngine, query: &CatalogQuery, json: bool) -> String {
    let groups = engine.search(query);
    if json {
        return serde_json::to_string_pretty(&groups).unwrap_or_default() + "\n";
    }
    let mut out = String::new();
    for group in groups.iter().filter(|g| !g.characters.is_empty()) {
        out.push_str(&format!("{}\n", group.position.label()));
        for c in &group.characters {
            out.push_str(&format!("  {:<20} {:<4} {}\n", c.variant_id, c.rarity.code(), c.school));
        }
    }
    out
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("tb CLI is not available. Enable the 'cli' feature to use it.");
    std::process::exit(1);
}
