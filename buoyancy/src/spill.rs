//! Rate-limited liquid exchange between the pool and a boat's interior.
//!
//! The boat's displacement and the pool level depend on each other; moving
//! liquid at a bounded rate instead of solving both at once lags the exchange
//! by one step, which keeps the surface from jumping.

use serde::{Deserialize, Serialize};

use crate::tuning::{SimTuning, VOLUME_EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpillState {
    #[default]
    Empty,
    Filling,
    Full,
    /// Partially filled, neither filling nor spilling.
    Holding,
    Spilling,
}

/// Quantities the controller reads once per step, after heights are solved.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpillInputs {
    pub dt: f64,
    /// Exterior displacement of the boat (m³); scales the transfer rate.
    pub boat_volume: f64,
    pub boat_top: f64,
    pub boat_height: f64,
    /// The boat currently sits in the pool.
    pub boat_in_pool: bool,
    pub pool_height: f64,
    pub pool_volume: f64,
    /// Liquid in the boat's interior (m³).
    pub carried: f64,
    /// Interior volume still available up to the rim, bodies inside excluded.
    pub capacity: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SpillController {
    state: SpillState,
}

impl SpillController {
    pub fn state(&self) -> SpillState { self.state }

    pub fn reset(&mut self) { self.state = SpillState::Empty; }

    /// Advances the state machine and returns the volume to move from the pool
    /// into the boat this step (negative when spilling back).
    pub fn update(&mut self, inputs: &SpillInputs, tuning: &SimTuning) -> f64 {
        let max_transfer = (tuning.fill_speed * inputs.boat_volume * inputs.dt).max(0.0);
        let carried = inputs.carried.max(0.0);
        let capacity = inputs.capacity.max(0.0);

        let lifted_out = inputs.boat_top - inputs.pool_height
            > tuning.spill_height_fraction * inputs.boat_height;
        let overtopped = inputs.boat_in_pool && inputs.pool_height > inputs.boat_top;

        let (next, transfer) = if carried > VOLUME_EPSILON && lifted_out {
            let out = max_transfer.min(carried);
            let state = if carried - out <= VOLUME_EPSILON { SpillState::Empty } else { SpillState::Spilling };
            (state, -out)
        } else if overtopped && carried < capacity - VOLUME_EPSILON {
            let inflow = max_transfer.min(capacity - carried).min(inputs.pool_volume.max(0.0));
            let state = if carried + inflow >= capacity - VOLUME_EPSILON {
                SpillState::Full
            } else {
                SpillState::Filling
            };
            (state, inflow)
        } else {
            (classify(carried, capacity), 0.0)
        };

        if next != self.state {
            tracing::debug!(from = ?self.state, to = ?next, transfer, carried, "boat spill state changed");
        }
        self.state = next;
        transfer
    }
}

fn classify(carried: f64, capacity: f64) -> SpillState {
    if carried <= VOLUME_EPSILON {
        SpillState::Empty
    } else if carried >= capacity - VOLUME_EPSILON {
        SpillState::Full
    } else {
        SpillState::Holding
    }
}
