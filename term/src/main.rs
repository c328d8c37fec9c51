use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use doubler_core::{Command, GameStore, JsonStore, RandomSpawner, Session, TileSpawner};

use crate::input::Input;
use crate::storage::FileBackend;

mod input;
mod render;
mod storage;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Where the saved game, best score, settings and statistics are kept
    #[arg(long, default_value = ".doubler")]
    data_dir: PathBuf,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Drop the saved game and start a new one
    #[arg(long)]
    fresh: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let backend = FileBackend::open(&args.data_dir)
        .with_context(|| format!("Could not use data directory {}", args.data_dir.display()))?;
    let mut store = JsonStore::new(backend);
    if args.fresh {
        store.clear_state().context("Could not drop the saved game")?;
    }
    let mut session = Session::open(store, RandomSpawner::from_seed(seed));

    play(&mut session, io::stdin().lock(), io::stdout().lock())?;

    log::info!("Bye, best score {}", session.state().best_score);
    Ok(())
}

/// Reads commands line by line until `q` or end of input, printing the board after each.
fn play<S: GameStore, T: TileSpawner>(
    session: &mut Session<S, T>,
    mut input: impl BufRead,
    mut out: impl Write,
) -> anyhow::Result<()> {
    writeln!(out, "{}", render::board(&session.state()))?;
    let mut line = String::new();
    loop {
        write!(out, "{}", render::PROMPT)?;
        out.flush()?;

        line.clear();
        match input.read_line(&mut line) {
            Ok(0) => break,
            Ok(_) => {}
            Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                writeln!(out, "Could not read that line: {err}. Type ? for help.")?;
                continue;
            }
            Err(err) => return Err(err).context("Could not read input"),
        }

        match input::parse(&line) {
            Ok(Some(Input::Command(command))) => {
                let event = session.apply(command);
                if let Some(message) = render::event_message(&event) {
                    writeln!(out, "{message}")?;
                }
                writeln!(out, "{}", render::board(&session.state()))?;
            }
            Ok(Some(Input::Reset)) => {
                if let Err(err) = session.clear_all() {
                    log::error!("Could not erase saved data: {}", err);
                    writeln!(out, "{err}")?;
                }
                session.apply(Command::Restart);
                writeln!(out, "Everything erased. New game.")?;
                writeln!(out, "{}", render::board(&session.state()))?;
            }
            Ok(Some(Input::Help)) => writeln!(out, "{}", render::HELP)?,
            Ok(Some(Input::Stats)) => writeln!(out, "{}", render::statistics(session.statistics()))?,
            Ok(Some(Input::Quit)) => break,
            Ok(None) => {}
            Err(err) => writeln!(out, "{err}. Type ? for help.")?,
        }
    }
    Ok(())
}
