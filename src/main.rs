//! Village Sim - headless runner
//!
//! Drives the simulation core at a fixed step, prints a status line at
//! every day boundary and optionally dumps the final snapshot as JSON.

use std::path::PathBuf;

use clap::Parser;

use village_sim::core::error::Result;
use village_sim::ecs::world::SimulationWorld;
use village_sim::simulation::tick::SimulationEvent;
use village_sim::SimulationConfig;

/// Headless Village Runner - advance a village for a fixed span of time
#[derive(Parser, Debug)]
#[command(name = "village_sim")]
#[command(about = "Run the village simulation headless and report on it")]
struct Args {
    /// Random seed; overrides the config file
    #[arg(long)]
    seed: Option<u64>,

    /// Simulated seconds to run
    #[arg(long, default_value_t = 300.0)]
    seconds: f32,

    /// Seconds per tick
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,

    /// TOML balance config; missing keys keep their defaults
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the final world snapshot as JSON
    #[arg(long)]
    snapshot: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "village_sim=info".into()),
        )
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut world = SimulationWorld::new(config)?;
    let dt = if args.dt > 0.0 { args.dt } else { 1.0 / 60.0 };
    let ticks = (args.seconds.max(0.0) / dt).ceil() as u64;

    tracing::info!("Running {} ticks of {:.4}s", ticks, dt);

    let mut deliveries = 0u32;
    let mut slain = 0u32;
    let mut deaths = 0u32;

    for _ in 0..ticks {
        for event in world.tick(dt) {
            match event {
                SimulationEvent::Delivered { .. } => deliveries += 1,
                SimulationEvent::EnemySlain { .. } => slain += 1,
                SimulationEvent::VillagerDied { .. } => deaths += 1,
                SimulationEvent::NewDay { .. } => print_status(&world),
                _ => {}
            }
        }
    }

    print_status(&world);
    println!(
        "Totals: {} deliveries, {} raiders slain, {} villagers lost",
        deliveries, slain, deaths
    );

    if args.snapshot {
        match serde_json::to_string_pretty(&world.snapshot()) {
            Ok(json) => println!("{}", json),
            Err(e) => tracing::error!("Failed to serialize snapshot: {}", e),
        }
    }

    Ok(())
}

fn print_status(world: &SimulationWorld) {
    let clock = &world.clock;
    let economy = &world.economy;
    println!(
        "Day {:>3} {:02}:{:02} {} | wood {:>5} stone {:>5} food {:>5} | pop {}/{} | raiders {}",
        clock.day(),
        clock.hour(),
        clock.minute(),
        if clock.is_night() { "night" } else { "day  " },
        economy.wood,
        economy.stone,
        economy.food,
        economy.population,
        economy.max_population,
        world.threats.len()
    );
}
