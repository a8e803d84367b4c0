//! Liquid surface height per basin.
//!
//! A basin with nothing displacing into it inverts its own geometry directly.
//! Otherwise the height `y` solves `empty_volume(y) == liquid_volume`, where
//! the empty volume is the container volume below `y` minus what every
//! assigned body displaces below `y`. A floating boat contributes its whole
//! exterior, so the pool routes around the hull wherever the boat sits this
//! step. The empty volume is non-decreasing in `y` as long as the bodies fit in
//! the container, so bisection over the container's height converges.

use crate::basin::Basin;
use crate::body::BodyStep;
use crate::tuning::SimTuning;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SolveOutcome {
    pub height: f64,
    pub iterations: u32,
    /// Liquid that no longer fits below the container's top (m³). It has
    /// already been removed from the basin.
    pub overflow: f64,
}

pub fn empty_volume(basin: &Basin, displacers: &[BodyStep], y: f64) -> f64 {
    basin.maximum_volume(y) - displacers.iter().map(|b| b.displaced_volume(y)).sum::<f64>()
}

/// Solves and stores the basin's height for its current volume.
pub fn solve_basin(basin: &mut Basin, displacers: &[BodyStep], tuning: &SimTuning) -> SolveOutcome {
    let volume = basin.liquid_volume();
    let top = basin.step_top();
    let room = empty_volume(basin, displacers, top).max(0.0);

    if volume > room {
        let overflow = volume - room;
        let height = if displacers.is_empty() { basin.height_for_volume(room) } else { top };
        basin.set_solved(room, height);
        return SolveOutcome { height, iterations: 0, overflow };
    }

    if displacers.is_empty() {
        let height = basin.height_for_volume(volume);
        basin.set_solved(volume, height);
        return SolveOutcome { height, iterations: 0, overflow: 0.0 };
    }

    let bottom = basin.step_bottom();
    debug_assert!(
        room + tuning.tolerance >= empty_volume(basin, displacers, bottom),
        "basin {} has a non-monotonic empty volume",
        basin.id.0
    );
    let (height, iterations) = find_root(
        bottom,
        top,
        tuning.height_epsilon,
        tuning.max_bisection_iterations,
        |y| empty_volume(basin, displacers, y) - volume,
    );
    tracing::trace!(basin = basin.id.0, height, iterations, "basin height solved");
    basin.set_solved(volume, height);
    SolveOutcome { height, iterations, overflow: 0.0 }
}

/// Bisection for a non-decreasing `f` with a root in `[lo, hi]`.
pub fn find_root(
    mut lo: f64,
    mut hi: f64,
    epsilon: f64,
    max_iterations: u32,
    f: impl Fn(f64) -> f64,
) -> (f64, u32) {
    let mut iterations = 0;
    while iterations < max_iterations && hi - lo > epsilon {
        let mid = 0.5 * (lo + hi);
        if f(mid) < 0.0 { lo = mid; } else { hi = mid; }
        iterations += 1;
    }
    (0.5 * (lo + hi), iterations)
}
