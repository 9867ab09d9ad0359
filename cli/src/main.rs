// SPDX-License-Identifier: MIT OR Apache-2.0

//! sgfgo - command-line recorder and viewer for Go game records
//!
//! A headless front end over `sgfgo-core`: it replays and prints saved
//! games, records a game from a list of moves, and rewrites SGF files in
//! normalized form.

mod render;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use sgfgo_core::{
    archiver,
    clock::NoClock,
    config::{self, RecorderConfig},
    rules::{self, Outcome},
    sgf, Color, Move, RunningGame,
};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Command-line arguments
#[derive(Parser, Debug)]
#[clap(name = "sgfgo", about = "Record, review and save Go games as SGF", version)]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[clap(long, global = true)]
    debug: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the board of a saved game
    Show {
        /// SGF file to read
        file: PathBuf,
        /// Show the position after this many main-line moves (default: the end)
        #[clap(long = "move")]
        at_move: Option<usize>,
        /// Print the game information as JSON instead of the board
        #[clap(long)]
        json: bool,
    },
    /// Record a game from moves given as SGF letters (`dd`), `pass` or `resign`
    Record {
        /// Board size (default from config)
        #[clap(short, long)]
        size: Option<u8>,
        /// Komi (default from config)
        #[clap(short, long)]
        komi: Option<f32>,
        /// Black player's name
        #[clap(long)]
        black: Option<String>,
        /// White player's name
        #[clap(long)]
        white: Option<String>,
        /// Directory to save into (default from config)
        #[clap(long)]
        out_dir: Option<PathBuf>,
        /// Moves, Black first
        moves: Vec<String>,
    },
    /// Read an SGF file and save it again in normalized form
    Resave {
        /// SGF file to read
        file: PathBuf,
        /// Directory to save into (default from config)
        #[clap(long)]
        out_dir: Option<PathBuf>,
    },
}

fn log_filter(level: &str, debug: bool) -> EnvFilter {
    if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    }
}

fn init_logging(level: &str, debug: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(level, debug))
        .with_writer(std::io::stderr)
        .init();
}

/// Load the configuration under a temporary stderr subscriber
///
/// The configured log level is not known yet, so events from loading
/// (such as writing a default file on first run) use the default level.
fn load_config_logged(path: &Path, debug: bool) -> Result<RecorderConfig> {
    let bootstrap = tracing_subscriber::fmt()
        .with_env_filter(log_filter(&RecorderConfig::default().log_level, debug))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::with_default(bootstrap, || config::load_config(path))
        .with_context(|| format!("Failed to load config from {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let config = load_config_logged(&config_path, args.debug)?;
    init_logging(&config.log_level, args.debug);
    config::validate(&config).context("Invalid configuration")?;
    tracing::debug!(?config, "configuration loaded");

    match args.command {
        Command::Show { file, at_move, json } => show(&file, at_move, json),
        Command::Record {
            size,
            komi,
            black,
            white,
            out_dir,
            moves,
        } => {
            let mut game = RunningGame::default();
            game.set_board_size(size.unwrap_or(config.board_size))
                .context("Invalid board size")?;
            let meta = game.meta_mut();
            meta.komi = komi.unwrap_or(config.komi);
            meta.black_name = black.unwrap_or_default();
            meta.white_name = white.unwrap_or_default();
            meta.dates = vec![chrono::Local::now().date_naive()];

            record(&mut game, &moves)?;
            save(&game, out_dir.as_deref(), &config)
        }
        Command::Resave { file, out_dir } => {
            let game = archiver::load_game(&file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            save(&game, out_dir.as_deref(), &config)
        }
    }
}

fn show(file: &Path, at_move: Option<usize>, json: bool) -> Result<()> {
    let mut game = archiver::load_game(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let target = match at_move {
        Some(depth) => game.main_line_path(depth),
        None => game.main_line_end(),
    };
    game.set_current(target)?;
    rules::calc_prisoners(&mut game, Color::Black)?;
    rules::calc_prisoners(&mut game, Color::White)?;

    if json {
        println!("{}", serde_json::to_string_pretty(game.meta())?);
        return Ok(());
    }

    let meta = game.meta();
    println!(
        "{} (B) vs {} (W), komi {}, {}",
        display_name(&meta.black_name),
        display_name(&meta.white_name),
        meta.komi,
        if meta.result.is_empty() { "no result" } else { meta.result.as_str() }
    );

    let board = rules::board_at(&game, game.current_path())?;
    let node = game.current_node();
    let last = node.position().and_then(|p| p.coord());
    print!("{}", render::render_board(&board, last));

    println!(
        "Move {} of {}, captures: B {} W {}",
        game.depth(),
        game.main_line_end().len(),
        meta.black_prisoners,
        meta.white_prisoners
    );
    if let Some(comment) = &node.comment {
        println!("{}", comment);
    }
    if rules::is_game_end(&game, game.current_path())? {
        println!("Game over");
    }
    Ok(())
}

/// Play the moves in order; stops at the first move that is not legal
fn record(game: &mut RunningGame, moves: &[String]) -> Result<()> {
    for token in moves {
        let action = parse_move(token, game.board_size())?;
        let color = game.to_play();

        match rules::submit_move(game, action, &NoClock)? {
            Outcome::Legal => println!("{:?} {}", color, describe(action)),
            outcome => {
                println!("{:?} {}: {:?}, recording stopped", color, describe(action), outcome);
                break;
            }
        }

        if rules::is_game_end(game, game.played_line())? {
            if action == Move::Resign {
                game.meta_mut().result = format!("{}+R", color.opposite().sgf_letter());
            }
            println!("Game over");
            break;
        }
    }

    let board = rules::board_at(game, game.played_line())?;
    let last = game.current_node().position().and_then(|p| p.coord());
    print!("{}", render::render_board(&board, last));
    Ok(())
}

fn parse_move(token: &str, board_size: u8) -> Result<Move> {
    match token.to_ascii_lowercase().as_str() {
        "pass" => Ok(Move::Pass),
        "resign" => Ok(Move::Resign),
        "" => bail!("Empty move"),
        letters => sgf::decode_move(letters, board_size)
            .with_context(|| format!("Invalid move '{}'", token)),
    }
}

fn describe(action: Move) -> String {
    match action {
        Move::Place(coord) => render::coord_name(coord),
        Move::Pass => "pass".to_string(),
        Move::Resign => "resigns".to_string(),
    }
}

fn display_name(name: &str) -> &str {
    if name.is_empty() {
        "?"
    } else {
        name
    }
}

fn save(game: &RunningGame, out_dir: Option<&Path>, config: &RecorderConfig) -> Result<()> {
    let dir = out_dir.unwrap_or(config.save_dir.as_path());
    let path = archiver::save_game_dated(game, dir)
        .with_context(|| format!("Failed to save into {}", dir.display()))?;
    println!("Saved {}", path.display());
    Ok(())
}
