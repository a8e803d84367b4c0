use anyhow::Result;
use clap::Parser;
use tracing::info;

use runner::{load_config, load_scene, run, Args};

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let mut cfg = load_config(args.config.as_deref())?;
    if let Some(steps) = args.steps {
        cfg.steps = steps;
    }
    info!(?cfg, "Runner config loaded");

    let scene = load_scene(&cfg, &args)?;
    let summary = run(&cfg, scene)?;
    info!(
        scene = %summary.scene,
        time = summary.time,
        pool_height = summary.pool_height,
        liquid_before = summary.initial_liquid_volume,
        liquid_after = summary.total_liquid_volume,
        spill = ?summary.spill_state,
        "Run finished"
    );
    Ok(())
}
