//! Headless driver: loads a scene, steps it at a fixed `dt`, applies timed
//! script edits and logs readouts.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use buoyancy::{
    builtins, BodyId, BodyReport, DVec2, Gravity, Liquid, Material, PointMassEngine, SceneSpec, SimTuning,
    Simulation, SpillState,
};

#[derive(Parser, Debug, Clone)]
#[command(name = "buoyancy-runner")]
#[command(about = "Steps a liquid and buoyancy scene without rendering", long_about = None)]
pub struct Args {
    /// Run configuration (TOML). Defaults apply when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Override the configured number of steps
    #[arg(long)]
    pub steps: Option<u64>,
    /// Built-in scene to run instead of the configured one
    #[arg(long)]
    pub scene: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub dt: f64,
    pub steps: u64,
    /// Log readouts every this many steps; 0 disables.
    pub log_every: u64,
    /// Built-in scene name, used when `scene_file` is not set.
    pub scene: String,
    pub scene_file: Option<PathBuf>,
    /// Replaces the scene's tuning when present.
    pub tuning: Option<SimTuning>,
    pub script: Vec<ScriptEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dt: 1.0 / 60.0,
            steps: 600,
            log_every: 60,
            scene: "floating_block".to_string(),
            scene_file: None,
            tuning: None,
            script: Vec::new(),
        }
    }
}

/// One timed edit; applied before the first step starting at or after `at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptEntry {
    /// Simulation time in seconds.
    pub at: f64,
    #[serde(flatten)]
    pub action: ScriptAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BasinTarget {
    #[default]
    Pool,
    Boat,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ScriptAction {
    Drag { body: String, position: DVec2 },
    Release { body: String },
    Hide { body: String },
    Show { body: String },
    SetLiquidVolume {
        #[serde(default)]
        basin: BasinTarget,
        volume: f64,
    },
    SetBoatVolume { volume: f64 },
    SetMaterial { body: String, material: Material },
    SetLiquid { liquid: Liquid },
    SetGravity { gravity: Gravity },
    Reset,
}

/// Final readouts of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub scene: String,
    pub steps: u64,
    pub time: f64,
    pub initial_liquid_volume: f64,
    pub total_liquid_volume: f64,
    pub pool_height: f64,
    pub spill_state: Option<SpillState>,
    pub bodies: Vec<(String, BodyReport)>,
}

pub fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else { return Ok(Config::default()) };
    let text = std::fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

pub fn builtin_scene(name: &str) -> Result<SceneSpec> {
    builtins::scene_by_name(name)
        .ok_or_else(|| anyhow!("unknown scene `{name}`; built-in scenes: {}", builtins::SCENE_NAMES.join(", ")))
}

/// Resolves the scene to run: `--scene` wins over `scene_file`, which wins
/// over the configured built-in name.
pub fn load_scene(config: &Config, args: &Args) -> Result<SceneSpec> {
    let mut scene = match (&args.scene, &config.scene_file) {
        (Some(name), _) => builtin_scene(name)?,
        (None, Some(path)) => {
            let text = std::fs::read_to_string(path).with_context(|| format!("reading scene {}", path.display()))?;
            toml::from_str(&text).with_context(|| format!("parsing scene {}", path.display()))?
        }
        (None, None) => builtin_scene(&config.scene)?,
    };
    if let Some(tuning) = config.tuning {
        scene.tuning = tuning;
    }
    Ok(scene)
}

pub fn run(config: &Config, scene: SceneSpec) -> Result<RunSummary> {
    if !(config.dt.is_finite() && config.dt > 0.0) {
        bail!("dt must be positive, got {}", config.dt);
    }
    let name = scene.name.clone();
    let mut sim = Simulation::headless(scene).context("building simulation")?;
    let initial_liquid_volume = sim.total_liquid_volume();
    info!(scene = %name, bodies = sim.bodies().len(), liquid = initial_liquid_volume, "scene loaded");

    let mut script = config.script.clone();
    script.sort_by(|a, b| a.at.total_cmp(&b.at));
    let mut next = 0;

    for i in 0..config.steps {
        while let Some(entry) = script.get(next).filter(|e| e.at <= sim.time() + 0.5 * config.dt) {
            apply_action(&mut sim, &entry.action).with_context(|| format!("script action at t={}", entry.at))?;
            next += 1;
        }
        sim.step(config.dt);
        if config.log_every > 0 && (i + 1) % config.log_every == 0 {
            log_readouts(&sim);
        }
    }

    Ok(RunSummary {
        scene: name,
        steps: config.steps,
        time: sim.time(),
        initial_liquid_volume,
        total_liquid_volume: sim.total_liquid_volume(),
        pool_height: sim.pool().liquid_height(),
        spill_state: sim.spill_state(),
        bodies: sim
            .bodies()
            .iter()
            .map(|b| (b.name.clone(), sim.body_report(b.id).copied().unwrap_or_default()))
            .collect(),
    })
}

fn body_named(sim: &Simulation<PointMassEngine>, name: &str) -> Result<BodyId> {
    sim.body_id(name).ok_or_else(|| anyhow!("no body named `{name}`"))
}

pub fn apply_action(sim: &mut Simulation<PointMassEngine>, action: &ScriptAction) -> Result<()> {
    debug!(?action, t = sim.time(), "script action");
    match action {
        ScriptAction::Drag { body, position } => {
            let id = body_named(sim, body)?;
            sim.drag_body(id, *position)?;
        }
        ScriptAction::Release { body } => {
            let id = body_named(sim, body)?;
            sim.release_body(id)?;
        }
        ScriptAction::Hide { body } | ScriptAction::Show { body } => {
            let id = body_named(sim, body)?;
            sim.set_body_visible(id, matches!(action, ScriptAction::Show { .. }))?;
        }
        ScriptAction::SetLiquidVolume { basin, volume } => {
            let id = match basin {
                BasinTarget::Pool => sim.pool_id(),
                BasinTarget::Boat => sim.boat().map(|r| r.basin).ok_or_else(|| anyhow!("scene has no boat"))?,
            };
            sim.set_liquid_volume(id, *volume)?;
        }
        ScriptAction::SetBoatVolume { volume } => {
            sim.set_boat_volume(*volume)?;
        }
        ScriptAction::SetMaterial { body, material } => {
            let id = body_named(sim, body)?;
            sim.set_body_material(id, *material)?;
        }
        ScriptAction::SetLiquid { liquid } => sim.set_liquid(*liquid),
        ScriptAction::SetGravity { gravity } => sim.set_gravity(*gravity),
        ScriptAction::Reset => sim.reset(),
    }
    Ok(())
}

fn log_readouts(sim: &Simulation<PointMassEngine>) {
    let report = sim.report();
    info!(
        t = report.time,
        pool_height = sim.pool().liquid_height(),
        total_liquid = report.total_liquid_volume,
        spill = ?report.spill_state,
        "step"
    );
    for body in sim.bodies().iter().filter(|b| b.visible) {
        if let Some(r) = sim.body_report(body.id) {
            info!(
                body = %body.name,
                submerged = r.submerged_fraction,
                fully_submerged = r.fully_submerged,
                buoyant_n = r.buoyant_force.y,
                carried_kg = r.carried_mass,
                "body"
            );
        }
    }
}
