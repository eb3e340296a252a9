use std::io::{self, BufRead, Write};

use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{Verbosity, WarnLevel};
use sweeper_core::{CellCount, Coord, GameConfig};
use tracing_subscriber::filter::LevelFilter;

use crate::command::Command;
use crate::game::{Game, Step};

mod command;
mod game;
mod render;

#[derive(Parser, Debug)]
#[command(name = "sweeper", version, about = "Minesweeper in the terminal")]
struct Args {
    /// Board width in cells
    #[arg(long, default_value_t = 20)]
    width: Coord,

    /// Board height in cells
    #[arg(long, default_value_t = 20)]
    height: Coord,

    /// Number of mines, must leave at least one safe cell
    #[arg(long, default_value_t = 30)]
    mines: CellCount,

    /// Seed for the first board, later rounds derive from it. Random if omitted.
    #[arg(long)]
    seed: Option<u64>,

    #[command(flatten)]
    verbose: Verbosity<WarnLevel>,
}

fn init_logging(verbose: &Verbosity<WarnLevel>) {
    let level = match verbose.log_level_filter() {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    // board goes to stdout, logs stay on stderr
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(&args.verbose);

    let config = GameConfig::new((args.width, args.height), args.mines)
        .context("invalid board settings")?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!(
        "Starting {}x{} board with {} mines, seed {}",
        args.width,
        args.height,
        args.mines,
        seed
    );

    let mut game = Game::new(config, seed).context("failed to generate board")?;
    let mut out = io::stdout().lock();
    write!(out, "{}", render::render(game.session(), game.preview()))?;
    out.flush()?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Help) => writeln!(out, "{}", render::HELP)?,
            Ok(command) => match game.handle(command) {
                Ok(Step::Quit) => break,
                Ok(Step::Continue) => {}
                Err(err) => writeln!(out, "{err}")?,
            },
            Err(err) => writeln!(out, "{err}, type `h` for help")?,
        }

        write!(out, "{}", render::render(game.session(), game.preview()))?;
        out.flush()?;
    }

    Ok(())
}
