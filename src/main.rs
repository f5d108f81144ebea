use anyhow::Result;
use clap::Parser;
use log::info;

use intersection_sim::simulation::{
    ArrivalGenerator, Direction, IntersectionConfig, Simulation, VehicleSpec,
    DEFAULT_CROSSING_DURATION, DEFAULT_TIME_QUANTUM,
};

#[derive(Parser)]
#[command(name = "intersection_sim")]
#[command(about = "Four-way intersection simulation with round-robin signal scheduling")]
struct Cli {
    /// Simulated time to run until
    #[arg(long, default_value = "20")]
    duration: u64,

    /// Maximum ticks a direction stays green
    #[arg(long, default_value_t = DEFAULT_TIME_QUANTUM)]
    quantum: u64,

    /// Time each vehicle takes to cross
    #[arg(long, default_value_t = DEFAULT_CROSSING_DURATION)]
    crossing: u64,

    /// Vehicle as SRC:DST:ARRIVAL[:PRIORITY], e.g. N:S:0:1 (repeatable)
    #[arg(long = "vehicle")]
    vehicles: Vec<String>,

    /// Number of randomly generated vehicles to add
    #[arg(long, default_value = "0")]
    random: usize,

    /// Seed for the random arrival generator
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Mean random arrivals per time unit
    #[arg(long, default_value = "0.2")]
    rate: f64,

    /// Draw the intersection after every time unit
    #[arg(long)]
    draw: bool,
}

/// The six-vehicle demo scenario used when no vehicles are given
fn demo_vehicles() -> Vec<VehicleSpec> {
    use Direction::*;
    vec![
        VehicleSpec::new(1, 0, North, South, 0),
        VehicleSpec::new(2, 0, East, West, 0),
        VehicleSpec::new(3, 1, South, East, 0),
        VehicleSpec::new(4, 2, West, North, 1),
        VehicleSpec::new(5, 4, North, West, 1),
        VehicleSpec::new(6, 5, East, South, 0),
    ]
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = IntersectionConfig::new(cli.quantum, cli.crossing)?;
    let mut sim = Simulation::new(config)?;

    let mut specs = Vec::new();
    for (index, text) in cli.vehicles.iter().enumerate() {
        specs.push(VehicleSpec::parse(index + 1, text)?);
    }
    if cli.random > 0 {
        let mut generator = ArrivalGenerator::new(cli.seed, cli.rate, specs.len() + 1)?;
        specs.extend(generator.generate(cli.random));
    }
    if specs.is_empty() {
        specs = demo_vehicles();
    }
    sim.add_vehicles(specs)?;

    info!("Starting traffic simulation");
    info!(
        "Running simulation for {} time units (quantum {}, crossing {})",
        cli.duration, config.time_quantum, config.crossing_duration
    );

    if cli.draw {
        println!("{}", sim.snapshot());
        for time in 1..=cli.duration {
            sim.run(time)?;
            println!("{}", sim.snapshot());
        }
    } else {
        sim.run(cli.duration)?;
    }

    for vehicle in sim.vehicles() {
        info!("{}", vehicle);
    }
    sim.stats().log_report();
    Ok(())
}
