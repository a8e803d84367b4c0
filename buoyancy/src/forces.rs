use bevy_math::DVec2;

use crate::basin::BasinId;
use crate::body::BodyStep;
use crate::tuning::SimTuning;

/// Per-body readout of one step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BodyReport {
    pub visible: bool,
    pub basin: Option<BasinId>,
    /// Surface height of the basin the body displaces into.
    pub liquid_level: Option<f64>,
    pub submerged_volume: f64,
    /// Displayed fraction in [0, 1]; exactly 1 once fully submerged.
    pub submerged_fraction: f64,
    pub fully_submerged: bool,
    pub buoyant_force: DVec2,
    pub drag_force: DVec2,
    /// Liquid carried in the body's own basin (boats only), kg.
    pub carried_mass: f64,
    /// Everything handed to the rigid-body engine for the next step.
    pub external_force: DVec2,
}

/// Archimedes: displaced liquid weight, opposite gravity.
#[inline]
pub fn buoyant_force(submerged_volume: f64, liquid_density: f64, gravity: DVec2) -> DVec2 {
    -gravity * (submerged_volume * liquid_density)
}

#[inline]
pub fn drag_force(submerged_volume: f64, liquid_density: f64, velocity: DVec2, viscous_drag: f64) -> DVec2 {
    -velocity * (viscous_drag * liquid_density * submerged_volume)
}

/// Caps `drag` at what stops a body of `mass` within one step of `dt`.
/// A non-positive `dt` leaves it untouched.
pub fn limit_drag(drag: DVec2, velocity: DVec2, mass: f64, dt: f64) -> DVec2 {
    if dt <= 0.0 {
        return drag;
    }
    let limit = mass * velocity.length() / dt;
    let magnitude = drag.length();
    if magnitude > limit && magnitude > 0.0 { drag * (limit / magnitude) } else { drag }
}

pub fn is_fully_submerged(body: &BodyStep, level: f64, tolerance: f64) -> bool {
    level - body.top > tolerance
}

pub fn submerged_fraction(body: &BodyStep, level: f64, tolerance: f64) -> f64 {
    if is_fully_submerged(body, level, tolerance) {
        return 1.0;
    }
    if body.volume <= 0.0 {
        return 0.0;
    }
    (body.displaced_volume(level) / body.volume).clamp(0.0, 1.0)
}

/// Buoyancy and drag of `body` against the surface `level` of `basin`.
/// Bodies outside every basin get an empty report.
pub fn evaluate_body(
    body: &BodyStep,
    basin: Option<BasinId>,
    level: Option<f64>,
    liquid_density: f64,
    gravity: DVec2,
    tuning: &SimTuning,
) -> BodyReport {
    let Some(level) = level else {
        return BodyReport { visible: true, basin, ..Default::default() };
    };
    let submerged_volume = body.displaced_volume(level);
    let buoyant = buoyant_force(submerged_volume, liquid_density, gravity);
    let drag = drag_force(submerged_volume, liquid_density, body.velocity, tuning.viscous_drag);
    BodyReport {
        visible: true,
        basin,
        liquid_level: Some(level),
        submerged_volume,
        submerged_fraction: submerged_fraction(body, level, tuning.tolerance),
        fully_submerged: is_fully_submerged(body, level, tuning.tolerance),
        buoyant_force: buoyant,
        drag_force: drag,
        carried_mass: 0.0,
        external_force: buoyant + drag,
    }
}
