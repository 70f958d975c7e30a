//! hand_orbit: interactive entry point.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hand_orbit::app::{run, AppConfig, SourceKind};
use hand_orbit::perspective::DEFAULT_FOV_DEG;
use orbit_control::OrbitConfig;
use tracing::info;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG: &str = "hand_orbit=info,orbit_control=info";

#[derive(Parser, Debug)]
#[command(name = "hand_orbit", version, about = "Steer a 3-D preview camera with hand gestures")]
struct Cli {
    /// TOML file overriding the orbit tuning constants.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Play back recorded detections instead of the mouse simulator.
    #[arg(long, value_name = "FILE")]
    replay: Option<PathBuf>,

    /// Vertical field of view in degrees.
    #[arg(long, default_value_t = DEFAULT_FOV_DEG)]
    fov: f64,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("HAND_ORBIT_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    println!();
    println!("╔══════════════════════════════════════════════════════════════╗");
    println!("║             Hand Orbit : touchless camera control            ║");
    println!("╚══════════════════════════════════════════════════════════════╝");
    println!();

    let orbit = match &cli.config {
        Some(path) => OrbitConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => OrbitConfig::default(),
    };
    info!(?orbit, "orbit config");

    let source = match cli.replay {
        Some(path) => {
            println!("  Source: replay {}", path.display());
            SourceKind::Replay(path)
        }
        None => {
            println!("  Source: mouse simulation (left = rotate, right = zoom)");
            SourceKind::Simulated
        }
    };
    println!("  Keys:   R = reset view   Q / Esc = quit");
    println!();

    run(AppConfig { orbit, source, fov_deg: cli.fov })
}
