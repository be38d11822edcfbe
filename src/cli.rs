use std::collections::BTreeSet;
use std::env;

use tracing::{info, warn};

use crate::config::OptimizerConfig;
use crate::data::export::lineups_to_csv;
use crate::data::import::load_player_pool;
use crate::data::player::PlayerRecord;
use crate::data::projections::{apply_projection_overrides, load_projection_overrides};
use crate::data::validate::validate_player_pool;
use crate::error::OptimizeError;
use crate::optimizer::solver::MicroLpSolver;
use crate::optimizer::{optimize_lineups, LineupRequest};
use crate::server::{self, AppState, BIND_ADDR_ENV, DEFAULT_BIND_ADDR, POOL_PATH_ENV};

const USAGE: &str = "usage: lineup-optimizer <serve|optimize|validate>";
const OPTIMIZE_USAGE: &str = "usage: lineup-optimizer optimize <pool.csv> [--lineups N] [--lock a,b] \
[--remove a,b] [--unique K] [--require-expected] [--seed S] [--projections file] [--config file] [--csv]";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Serve,
    Optimize,
    Validate,
}

pub fn parse_command(args: &[String]) -> Option<Command> {
    match args.get(1).map(String::as_str) {
        Some("serve") => Some(Command::Serve),
        Some("optimize") => Some(Command::Optimize),
        Some("validate") => Some(Command::Validate),
        _ => None,
    }
}

pub fn run_with_args(args: &[String]) -> i32 {
    match parse_command(args) {
        Some(Command::Serve) => handle_serve(args),
        Some(Command::Optimize) => handle_optimize(args),
        Some(Command::Validate) => handle_validate(args),
        None => {
            eprintln!("{USAGE}");
            2
        }
    }
}

fn handle_serve(args: &[String]) -> i32 {
    let Some(config) = resolve_config(args) else {
        return 1;
    };
    let pool_path = positional(args).or_else(|| env::var(POOL_PATH_ENV).ok());
    let players = match pool_path {
        Some(path) => match load_pool(&path, args) {
            Some(players) => players,
            None => return 1,
        },
        None => {
            warn!(event = "empty_pool", "no player pool given; PUT /api/players to load one");
            Vec::new()
        }
    };

    let bind_addr = env::var(BIND_ADDR_ENV).unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
    match server::run_server(&bind_addr, AppState::new(config, players)) {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("server error: {err}");
            1
        }
    }
}

fn handle_optimize(args: &[String]) -> i32 {
    let Some(path) = positional(args) else {
        eprintln!("{OPTIMIZE_USAGE}");
        return 2;
    };
    let Some(config) = resolve_config(args) else {
        return 1;
    };
    let Some(players) = load_pool(&path, args) else {
        return 1;
    };

    let request = LineupRequest {
        number_of_lineups: parse_usize_arg(flag_value(args, "--lineups"), "lineups", 1),
        locked_player_ids: id_list(flag_value(args, "--lock")),
        removed_player_ids: id_list(flag_value(args, "--remove")),
        min_uniqueness: parse_usize_arg(flag_value(args, "--unique"), "unique", 1),
        require_expected_players: has_flag(args, "--require-expected"),
        seed: flag_value(args, "--seed").and_then(|raw| match raw.parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                eprintln!("invalid seed '{raw}', using a random seed");
                None
            }
        }),
    };

    let lineups = match optimize_lineups(&players, &request, &config, &MicroLpSolver) {
        Ok(lineups) => lineups,
        Err(err @ OptimizeError::InvalidRequest(_)) => {
            eprintln!("{err}");
            return 2;
        }
        Err(err) => {
            eprintln!("optimization failed: {err}");
            return 1;
        }
    };
    if lineups.len() < request.number_of_lineups {
        eprintln!(
            "found {} of {} requested lineups",
            lineups.len(),
            request.number_of_lineups
        );
    }

    let rendered = if has_flag(args, "--csv") {
        lineups_to_csv(&lineups).map_err(|err| err.to_string())
    } else {
        serde_json::to_string_pretty(&lineups).map_err(|err| err.to_string())
    };
    match rendered {
        Ok(payload) => {
            print!("{payload}");
            if !payload.ends_with('\n') {
                println!();
            }
            0
        }
        Err(err) => {
            eprintln!("failed to render lineups: {err}");
            1
        }
    }
}

fn handle_validate(args: &[String]) -> i32 {
    let Some(path) = positional(args) else {
        eprintln!("usage: lineup-optimizer validate <pool.csv> [--projections file] [--config file]");
        return 2;
    };
    let Some(config) = resolve_config(args) else {
        return 1;
    };
    let Some(players) = load_pool(&path, args) else {
        return 1;
    };

    let report = validate_player_pool(&players, &config.rules);
    for diagnostic in &report.diagnostics {
        println!("{diagnostic}");
    }
    if report.has_errors() {
        eprintln!(
            "validation failed: {} issue(s) in {path}",
            report.diagnostics.len()
        );
        1
    } else {
        println!("validation passed: {path} ({} players)", players.len());
        0
    }
}

fn resolve_config(args: &[String]) -> Option<OptimizerConfig> {
    match OptimizerConfig::resolve(flag_value(args, "--config")) {
        Ok(config) => Some(config),
        Err(err) => {
            eprintln!("config error: {err}");
            None
        }
    }
}

/// Load the pool and apply `--projections` when given.
fn load_pool(path: &str, args: &[String]) -> Option<Vec<PlayerRecord>> {
    let mut players = match load_player_pool(path) {
        Ok(players) => players,
        Err(err) => {
            eprintln!("failed to load player pool {path}: {err}");
            return None;
        }
    };
    if let Some(projections) = flag_value(args, "--projections") {
        match load_projection_overrides(projections) {
            Ok(overrides) => {
                let updated = apply_projection_overrides(&mut players, &overrides);
                info!(event = "projections_applied", file = projections, updated);
            }
            Err(err) => {
                eprintln!("failed to load projections {projections}: {err}");
                return None;
            }
        }
    }
    Some(players)
}

/// First argument after the sub-command that is neither a flag nor a flag's value.
fn positional(args: &[String]) -> Option<String> {
    let mut rest = args.iter().skip(2);
    while let Some(arg) = rest.next() {
        if arg.starts_with("--") {
            if takes_value(arg) {
                rest.next();
            }
            continue;
        }
        return Some(arg.clone());
    }
    None
}

fn takes_value(flag: &str) -> bool {
    matches!(
        flag,
        "--lineups" | "--lock" | "--remove" | "--unique" | "--seed" | "--projections" | "--config"
    )
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|index| args.get(index + 1))
        .map(String::as_str)
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|arg| arg == flag)
}

fn id_list(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|value| {
        value
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn parse_usize_arg(raw: Option<&str>, name: &str, default: usize) -> usize {
    raw.and_then(|value| value.parse::<usize>().ok())
        .unwrap_or_else(|| {
            if let Some(value) = raw {
                eprintln!("invalid {name} '{value}', defaulting to {default}");
            }
            default
        })
}
