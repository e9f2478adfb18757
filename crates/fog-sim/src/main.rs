//! Fog of War Scenario Runner
//!
//! Run with: cargo run -p fog-sim
//!
//! Examples:
//!   cargo run -p fog-sim -- --ticks 300 --print-every 50
//!   cargo run -p fog-sim -- --config scenario.toml --output out/frames.jsonl
//!   cargo run -p fog-sim -- --dump-default-config > scenario.toml

use clap::Parser;
use std::path::PathBuf;
use std::error::Error;

use fog_sim::{default_scenario_toml, render_ascii, FrameWriter, ScenarioConfig, SimError, SimRunner};

/// Fog of War Scenario Runner
#[derive(Parser, Debug)]
#[command(name = "fog_sim")]
#[command(about = "Runs a fog-of-war scenario headlessly and records the published grids")]
struct Args {
    /// Scenario file (TOML); the built-in demo is used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the number of ticks to simulate
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write published frames (JSON Lines)
    #[arg(long, default_value = "output/frames.jsonl")]
    output: PathBuf,

    /// Print a text preview of the grid every N ticks (0 = never)
    #[arg(long, default_value_t = 0)]
    print_every: u64,

    /// Print the built-in scenario as TOML and exit
    #[arg(long)]
    dump_default_config: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    run(args).map_err(|e| {
        tracing::error!("{}", e);
        Box::<dyn Error>::from(e)
    })
}

fn run(args: Args) -> Result<(), SimError> {
    if args.dump_default_config {
        print!("{}", default_scenario_toml());
        return Ok(());
    }

    let mut scenario = match &args.config {
        Some(path) => ScenarioConfig::from_file(path)?,
        None => ScenarioConfig::from_str(&default_scenario_toml())?,
    };
    if let Some(ticks) = args.ticks {
        scenario.simulation.ticks = ticks;
    }
    if let Some(seed) = args.seed {
        scenario.simulation.seed = seed;
    }

    let mut runner = SimRunner::new(&scenario)?;
    let mut writer = FrameWriter::create(&args.output)?;
    let frame_interval = scenario.simulation.frame_interval;
    let mut published = 0u64;

    let summary = runner.run(scenario.simulation.ticks, |step| {
        for frame in &step.frames {
            if published % frame_interval == 0 {
                writer.write_frame(frame)?;
            }
            published += 1;
        }

        if args.print_every > 0 && step.report.tick % args.print_every == 0 {
            if let Some(frame) = step.frames.last() {
                println!("tick {}", step.report.tick);
                print!("{}", render_ascii(frame));
            }
        }
        Ok(())
    })?;

    let written = writer.finish()?;
    tracing::info!(
        "Wrote {} of {} frames to {:?} ({} visible, {} explored, {} unexplored cells)",
        written,
        summary.frames_published,
        args.output,
        summary.visible,
        summary.explored,
        summary.unexplored
    );

    Ok(())
}
