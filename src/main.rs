//! Headless skirmish runner.
//!
//! Loads a scenario file, steps the battle through a minimal Bevy app at a
//! fixed frame delta and prints the final result as JSON.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, ensure, Context, Result};
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use clap::Parser;
use skirmish::{init_logging, ActiveBattle, BattleSession, Collaborators, Scenario, SkirmishPlugin};

/// Runs a skirmish scenario headless and prints the result as JSON
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Scenario file (JSON)
    #[arg(short, long)]
    scenario: PathBuf,
    /// Seed for damage rolls; overrides the scenario's seed
    #[arg(long)]
    seed: Option<u64>,
    /// Let player units seek enemies without orders
    #[arg(long)]
    auto: bool,
    /// Fixed frame delta in seconds
    #[arg(long, default_value_t = 1.0 / 60.0)]
    dt: f32,
    /// Give up if the battle has not concluded after this much simulated time
    #[arg(long, default_value_t = 600.0)]
    max_seconds: f32,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    ensure!(
        args.dt.is_finite() && args.dt > 0.0,
        "--dt must be a positive number of seconds"
    );
    ensure!(
        args.max_seconds.is_finite() && args.max_seconds > 0.0,
        "--max-seconds must be a positive number of seconds"
    );

    let mut scenario = Scenario::load(&args.scenario)
        .with_context(|| format!("loading scenario {}", args.scenario.display()))?
        .with_seed(args.seed);
    scenario.auto_mode |= args.auto;
    let session = BattleSession::new(scenario.into_setup(), Collaborators::default(), |_| {})
        .context("setting up battle")?;

    let mut app = App::new();
    app.add_plugins(MinimalPlugins)
        .add_plugins(SkirmishPlugin)
        .insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f32(
            args.dt,
        )))
        .insert_resource(ActiveBattle(session));

    // The first frame carries no delta.
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "Both operands are validated positive; the frame budget fits in u64."
    )]
    let frames = (args.max_seconds / args.dt).ceil() as u64 + 1;
    for _ in 0..frames {
        app.update();
        let battle = &app.world().resource::<ActiveBattle>().0;
        if let Some(result) = battle.result() {
            println!("{}", serde_json::to_string_pretty(&result)?);
            return Ok(());
        }
    }
    bail!(
        "battle did not conclude within {} simulated seconds",
        args.max_seconds
    )
}
