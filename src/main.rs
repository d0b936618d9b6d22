//! Badchess-Rust: a minimal alpha-beta chess engine.
//!
//! ## Usage
//!
//! - `badchess-rust` - Start the UCI loop on stdin/stdout
//! - `badchess-rust uci` - Same, explicitly
//! - `badchess-rust analyse --fen <FEN>` - Search one position and print the result

use std::fs::OpenOptions;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{ArgAction, Parser, Subcommand};

use badchess_rust::constants::{EngineConfig, DEFAULT_DEPTH, MAX_DEPTH, N_CONSUMERS};
use badchess_rust::position::{parse_fen, start_position, str_line, str_move};
use badchess_rust::search::{check_depth, find_best_move};
use badchess_rust::server;

/// Badchess-Rust: a minimal alpha-beta chess engine
#[derive(Parser)]
#[command(name = "badchess-rust")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Search depth in plies
    #[arg(long, global = true, default_value_t = DEFAULT_DEPTH)]
    depth: usize,

    /// Largest search depth accepted
    #[arg(long, global = true, default_value_t = MAX_DEPTH)]
    max_depth: usize,

    /// Number of threads processing UCI commands
    #[arg(long, global = true, default_value_t = N_CONSUMERS)]
    workers: usize,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    /// Log more (-v for info, -vv for debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Speak UCI on stdin/stdout for use with chess GUIs
    Uci,
    /// Search a single position and print the best line
    Analyse {
        /// Position to search (defaults to the initial position)
        #[arg(long)]
        fen: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let config = EngineConfig {
        depth: cli.depth,
        max_depth: cli.max_depth,
        workers: cli.workers,
        ..EngineConfig::default()
    };
    check_depth(config.depth, config.max_depth).context("invalid --depth")?;
    ensure!(config.workers > 0, "--workers must be at least 1");

    match cli.command {
        Some(Commands::Uci) | None => {
            // stdout carries protocol lines only
            server::run(BufReader::new(io::stdin()), io::stdout(), config)
        }
        Some(Commands::Analyse { fen }) => run_analyse(fen.as_deref(), config),
    }
}

fn init_logging(verbose: u8, log_file: Option<&Path>) -> Result<()> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, level),
    );
    if let Some(path) = log_file {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn run_analyse(fen: Option<&str>, config: EngineConfig) -> Result<()> {
    let pos = match fen {
        Some(fen) => parse_fen(fen)?,
        None => start_position(),
    };

    let result = find_best_move(&pos, config.depth, config.max_depth)?;
    println!("position: {pos}");
    println!("bestmove: {}", str_move(result.best_move()));
    println!("score:    {}", result.score);
    println!("line:     {}", str_line(&result.line));
    println!(
        "nodes:    {} expanded, {} evaluated, {} cutoffs",
        result.stats.nodes, result.stats.leaves, result.stats.cutoffs
    );
    Ok(())
}
