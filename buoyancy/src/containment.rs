//! Which basin a body displaces liquid into.
//!
//! The pool is the fallback for any body over its footprint. Boat interiors
//! are tested geometrically: the body's bottom point is mapped into the
//! one-liter boat frame and tested against the interior outline.

use bevy_math::DVec2;

use crate::basin::{Basin, BasinId, BasinKind, PoolGeometry};
use crate::body::{BodyId, BodyStep};
use crate::boat::boat_design;
use crate::tuning::SimTuning;

pub fn is_body_inside(basin: &Basin, body: &BodyStep, tuning: &SimTuning) -> bool {
    match basin.kind() {
        BasinKind::Pool(geometry) => is_inside_pool(&geometry, body),
        BasinKind::BoatInterior { owner } => is_inside_boat(basin, owner, body, tuning),
    }
}

pub fn is_inside_pool(geometry: &PoolGeometry, body: &BodyStep) -> bool {
    body.x >= geometry.left && body.x <= geometry.right && body.bottom < geometry.top
}

pub fn is_inside_boat(basin: &Basin, owner: BodyId, body: &BodyStep, tuning: &SimTuning) -> bool {
    if body.id == owner || body.is_boat {
        return false;
    }
    let slip = tuning.slip_tolerance;
    // Slip only relaxes the lower bound, so a body resting on the floor does not flicker.
    if body.top < basin.step_bottom() - slip || body.bottom > basin.step_top() {
        return false;
    }

    let design = boat_design();
    let s = basin.step_multiplier();
    let hull_bottom = basin.step_bottom() - design.floor_height * s;
    let to_local = |y: f64| DVec2::new((body.x - basin.step_x()) / s, (y - hull_bottom) / s);

    // The rigid-body solver lets resting bodies sink up to `slip` into the
    // floor; probing that far above the bottom undoes it.
    design.interior_outline.contains_point(to_local(body.bottom))
        || design.interior_outline.contains_point(to_local(body.bottom + slip))
}

/// Assigns each body to at most one basin. `candidates` are tested in order,
/// so boat interiors must come before the pool.
pub fn assign(bodies: &[BodyStep], candidates: &[&Basin], tuning: &SimTuning) -> Vec<Option<BasinId>> {
    bodies
        .iter()
        .map(|body| {
            candidates
                .iter()
                .find(|basin| basin.is_body_inside(body, tuning))
                .map(|basin| basin.id)
        })
        .collect()
}
