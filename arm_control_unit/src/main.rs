//! # Arm Control Unit
//!
//! Fixed-period pose coordinator for the four-joint lift and arm.
//!
//! Loads the arm table (`--config`, the default path, or the compiled-in
//! table), requests one pose and ticks the coordinator against simulated
//! joints until the tick limit or Ctrl-C. On exit every joint is commanded to zero.

use arm_common::config::ArmConfig;
use arm_common::consts::DEFAULT_CONFIG_PATH;
use arm_common::pose::Pose;
use arm_control_unit::config::{ResolvedConfig, load_config};
use arm_control_unit::coordinator::Coordinator;
use arm_control_unit::cycle::CycleRunner;
use arm_control_unit::sim::SimRig;
use arm_control_unit::speed::SpeedScale;
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::atomic::Ordering;
use tracing::{Level, error, info};
use tracing_subscriber::EnvFilter;

/// Arm Control Unit: safety-interlocked pose coordinator
#[derive(Parser, Debug)]
#[command(name = "arm_control_unit")]
#[command(version)]
#[command(about = "Drive a four-joint lift and arm to a named pose")]
struct Args {
    /// Arm configuration TOML. Falls back to /etc/arm/arm.toml, then the
    /// compiled-in table.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pose to request: start, low, mid, loading or high.
    #[arg(long, default_value = "start")]
    pose: Pose,

    /// Global speed scale, clamped to [0, 1].
    #[arg(long, default_value_t = 1.0)]
    speed: f64,

    /// Ticks to run (0 = until Ctrl-C).
    #[arg(long, default_value_t = 0)]
    ticks: u64,

    /// Print the compiled-in table as TOML and exit.
    #[arg(long)]
    dump_config: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();

    if args.dump_config {
        match ArmConfig::default().to_toml() {
            Ok(text) => print!("{text}"),
            Err(e) => {
                eprintln!("{e}");
                process::exit(1);
            }
        }
        return;
    }

    setup_tracing(&args);

    info!("Arm Control Unit v{} starting...", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Arm Control Unit shutdown complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_config(Path::new(DEFAULT_CONFIG_PATH))?
        }
        None => {
            info!("No --config given and {DEFAULT_CONFIG_PATH} absent, using compiled-in table");
            ResolvedConfig::default()
        }
    };
    let speed = SpeedScale::new(args.speed)?;

    let rig = SimRig::stowed(&config);
    let coordinator = Coordinator::new(rig.bank(), config);
    let mut runner = CycleRunner::new(coordinator).with_plant(rig);

    let running = runner.running_flag();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        running.store(false, Ordering::SeqCst);
    })?;

    runner.coordinator_mut().request_pose(args.pose, speed);

    let max_ticks = (args.ticks > 0).then_some(args.ticks);
    let report = runner.run(max_ticks);

    info!(
        ticks = report.tick,
        pose = %args.pose,
        reached = report.all_at_target(),
        statuses = ?report.statuses.values(),
        "Final state"
    );
    Ok(())
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
