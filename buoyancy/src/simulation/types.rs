use bevy_math::DVec2;

use crate::basin::BasinId;
use crate::body::BodyId;
use crate::forces::BodyReport;
use crate::spill::{SpillController, SpillState};

/// The scene's boat: its rigid body, its interior basin and the controller
/// moving liquid between that basin and the pool.
#[derive(Debug, Clone)]
pub struct BoatRig {
    pub body: BodyId,
    pub basin: BasinId,
    pub multiplier: f64,
    /// Exterior displacement (m³).
    pub volume: f64,
    pub controller: SpillController,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BasinReport {
    pub liquid_volume: f64,
    pub liquid_height: f64,
    /// Container volume up to its top, ignoring bodies inside.
    pub capacity: f64,
    pub child: Option<BasinId>,
}

/// Readouts after the most recent step, indexed like the simulation's bodies
/// and basins.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepReport {
    pub time: f64,
    pub basins: Vec<BasinReport>,
    pub bodies: Vec<BodyReport>,
    pub spill_state: Option<SpillState>,
    pub total_liquid_volume: f64,
}

/// Extra telemetry from `Simulation::step_dbg`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepDebug {
    pub dt: f64,
    pub time: f64,
    pub assignments: Vec<Option<BasinId>>,
    /// Bisection iterations of the last solve, per basin.
    pub iterations: Vec<u32>,
    /// Pool to boat transfer this step (negative while spilling).
    pub transfer: f64,
    /// Liquid pushed over the pool's rim and lost.
    pub pool_overflow: f64,
    /// Liquid pushed over the boat's rim back into the pool.
    pub boat_overflow: f64,
    /// Gravity on carried liquid applied to the boat.
    pub carried_weight: DVec2,
    pub spill_state: Option<SpillState>,
}
