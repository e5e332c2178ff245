//! Grail Quest: play the Holy Grail text adventure in the terminal.
//!
//! Usage: grail_quest [--seed <n>] [--scenario <file.ron>]
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`
//! (default `grail_quest=warn`).

use clap::Parser;
use grail_quest::core::session::Game;
use std::io;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "grail_quest")]
#[command(version, about = "Seek the Holy Grail, one scene at a time")]
struct Cli {
    /// Seed the random source for a reproducible quest
    #[arg(long)]
    seed: Option<u64>,

    /// Scenario file (RON) replacing the built-in scene text
    #[arg(long)]
    scenario: Option<PathBuf>,
}

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "grail_quest=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();

    let mut builder = Game::builder();
    if let Some(seed) = cli.seed {
        info!(seed, "using fixed seed");
        builder = builder.seed(seed);
    }
    if let Some(path) = cli.scenario {
        info!("Loading scenario from: {}", path.display());
        builder = builder.scenario_path(path);
    }

    let mut game = match builder.build() {
        Ok(game) => game,
        Err(e) => {
            error!("Failed to set up the game: {}", e);
            std::process::exit(1);
        }
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout().lock();

    if let Err(e) = game.play(&mut input, &mut output) {
        error!("Game aborted: {}", e);
        std::process::exit(1);
    }
}
