use serde::{Deserialize, Serialize};

/// Empirically tuned constants of the liquid model. Every field can be
/// overridden from a scene or run file; missing fields keep their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimTuning {
    /// Vertical allowance (m) for bodies sinking slightly into a basin floor
    /// under the rigid-body solver.
    pub slip_tolerance: f64,
    /// Boat spills its load once its top is this fraction of its height above
    /// the surrounding surface.
    pub spill_height_fraction: f64,
    /// Maximum fill/spill rate, in boat displacement volumes per second.
    pub fill_speed: f64,
    /// Engineering tolerance (m) for submersion checks.
    pub tolerance: f64,
    /// Bisection stops once the bracket is narrower than this (m).
    pub height_epsilon: f64,
    pub max_bisection_iterations: u32,
    /// Linear drag per unit displaced liquid mass (1/s).
    pub viscous_drag: f64,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            slip_tolerance: 0.01,
            spill_height_fraction: 0.9,
            fill_speed: 0.5,
            tolerance: 1e-4,
            height_epsilon: 1e-10,
            max_bisection_iterations: 40,
            viscous_drag: 10.0,
        }
    }
}

/// Volumes below this (m³) count as empty.
pub(crate) const VOLUME_EPSILON: f64 = 1e-12;
