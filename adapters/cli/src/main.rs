#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Maze Sprint experience.

mod audio;
mod config;
mod simulation;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use maze_sprint_core::{GRID_COLUMNS, GRID_ROWS};
use maze_sprint_rendering::{text::maze_to_text, Presentation, RenderingBackend, Scene};
use maze_sprint_rendering_macroquad::MacroquadBackend;
use maze_sprint_system_bonus_placement::BonusPlacement;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::{
    audio::LogAudioSink,
    config::Config,
    simulation::{plan_round, Simulation},
};

/// Timed maze runner.
#[derive(Debug, Parser)]
#[command(name = "maze-sprint", version, about, long_about = None)]
struct Args {
    /// Seed for maze generation and bonus placement; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Path to a TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the first round's maze as text and exit.
    #[arg(long)]
    print_maze: bool,

    /// Synchronise frames with the display refresh rate.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    vsync: bool,

    /// Log the frame rate once per second.
    #[arg(long)]
    show_fps: bool,
}

/// Entry point for the Maze Sprint command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    log::debug!("starting with {args:?}");

    let config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Config::default(),
    };
    let seed = args.seed.unwrap_or_else(rand::random);

    let mut simulation = Simulation::new(seed, config.scheduler(), LogAudioSink);
    log::info!("{} (seed {seed})", simulation.welcome_banner());

    if args.print_maze {
        print!("{}", preview(seed));
        return Ok(());
    }

    let presentation = Presentation::new(
        config.window.title.clone(),
        config.window.width,
        config.window.height,
        Scene::empty(GRID_COLUMNS, GRID_ROWS),
    );

    MacroquadBackend::new()
        .with_vsync(args.vsync)
        .with_show_fps(args.show_fps)
        .run(presentation, move |dt, input, scene| {
            for intent in input.intents {
                simulation.handle_intent(intent);
            }
            simulation.advance(dt);
            *scene = Scene::from_snapshot(&simulation.snapshot());
        })
        .context("rendering backend failed")
}

/// Text rendering of the round a fresh session with `seed` starts with.
fn preview(seed: u64) -> String {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let setup = plan_round(&BonusPlacement::default(), &mut rng);
    maze_to_text(&setup.maze, &[(setup.lollipop, 'L'), (setup.ice_cream, 'I')])
}
