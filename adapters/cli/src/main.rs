#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that runs a headless Waypoint Defence session.

mod game;
mod level;

use std::{io, path::PathBuf, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use waypoint_defence_core::Command;
use waypoint_defence_rendering::{RenderingBackend, Scene, TextBackend};
use waypoint_defence_simulation::Simulation;
use waypoint_defence_system_spawning::Spawning;
use waypoint_defence_world::query;

use crate::{game::GameState, level::Level};

const DEFAULT_SEED: u64 = 0x5eed_0f_da7a;

/// Runs a tower-defence level without a window and prints a summary.
#[derive(Debug, Parser)]
#[command(name = "waypoint-defence", version, about)]
struct CliArgs {
    /// TOML level file; the built-in level is used when omitted.
    #[arg(long, value_name = "FILE")]
    level: Option<PathBuf>,
    /// Number of simulation steps to run.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// Length of one step in milliseconds.
    #[arg(
        long = "dt-ms",
        value_name = "MS",
        default_value_t = 16,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    dt_ms: u64,
    /// Let towers scan every enemy instead of querying the spatial index.
    #[arg(long)]
    no_index: bool,
    /// Print the board every N steps.
    #[arg(long, value_name = "N")]
    render_every: Option<u64>,
    /// Seed for the spawner's health rolls.
    #[arg(long)]
    seed: Option<u64>,
}

/// Entry point for the Waypoint Defence command-line interface.
fn main() -> Result<()> {
    env_logger::init();
    let args = CliArgs::parse();

    let level = match &args.level {
        Some(path) => {
            Level::load(path).with_context(|| format!("could not load {}", path.display()))?
        }
        None => Level::default(),
    };
    let seed = args.seed.unwrap_or(DEFAULT_SEED);
    let spawning = Spawning::new(level.spawn_config(seed)?);

    let mut simulation = Simulation::new(level.config, level.waypoints())
        .context("level does not describe a valid simulation")?
        .with_spawning(spawning);
    simulation.use_spatial_index(!args.no_index);
    for position in level.tower_positions() {
        let _ = simulation.apply(Command::PlaceTower { position });
    }

    let mut backend = match args.render_every {
        Some(every) if every > 0 => Some((
            TextBackend::new(io::stdout(), level.config.tile_size / 2.0)?,
            every,
        )),
        _ => None,
    };

    println!("{}", query::welcome_banner(simulation.world()));

    let dt = Duration::from_millis(args.dt_ms);
    let mut game = GameState::new(level.rules);
    for tick in 1..=args.ticks {
        let events = simulation.step(dt);
        game.observe(&events);

        if let Some((backend, every)) = backend.as_mut() {
            if tick % *every == 0 {
                backend.present(&Scene::from_world(simulation.world(), simulation.combat()))?;
            }
        }

        if game.is_over() {
            info!("no lives left after {tick} ticks");
            break;
        }
    }

    print_summary(&simulation, &game);
    Ok(())
}

fn print_summary(simulation: &Simulation, game: &GameState) {
    let world = simulation.world();
    let outcome = if game.is_over() { "defeat" } else { "survived" };

    println!("outcome: {outcome}");
    println!(
        "ticks: {} ({:.2}s simulated)",
        simulation.ticks(),
        simulation.elapsed().as_secs_f32()
    );
    println!(
        "enemies spawned: {}",
        simulation.spawning().map_or(0, Spawning::spawned)
    );
    println!("enemies killed: {}", game.kills());
    println!("enemies escaped: {}", game.escaped());
    println!("enemies on path: {}", query::enemies(world).len());
    println!("towers: {}", query::towers(world).len());
    println!("lives: {}", game.lives());
    println!("currency: {}", game.currency());
}
