//! Liquid reservoirs.
//!
//! A basin stores its liquid volume; the surface height is always derived from
//! that volume (plus whatever bodies displace into it, see `solver`). The pool
//! is fixed in the world, a boat interior moves with its hull and is rescaled
//! by the boat's `step_multiplier`.

use serde::{Deserialize, Serialize};

use crate::body::{BodyId, BodyStep};
use crate::boat::boat_design;
use crate::containment;
use crate::tuning::SimTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BasinId(pub usize);

/// Axis-aligned rectangular pool (meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoolGeometry {
    pub left: f64,
    pub right: f64,
    pub bottom: f64,
    pub top: f64,
    pub depth: f64,
}

impl PoolGeometry {
    pub fn width(&self) -> f64 { self.right - self.left }
    pub fn height(&self) -> f64 { self.top - self.bottom }
    pub fn footprint(&self) -> f64 { self.width() * self.depth }

    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0 && self.depth > 0.0
    }
}

impl Default for PoolGeometry {
    fn default() -> Self {
        Self { left: -0.45, right: 0.45, bottom: 0.0, top: 1.0, depth: 0.4 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BasinKind {
    Pool(PoolGeometry),
    BoatInterior { owner: BodyId },
}

#[derive(Debug, Clone)]
pub struct Basin {
    pub id: BasinId,
    kind: BasinKind,
    liquid_volume: f64,
    liquid_height: f64,
    step_bottom: f64,
    step_top: f64,
    step_x: f64,
    step_multiplier: f64,
    child: Option<BasinId>,
}

impl Basin {
    pub fn pool(id: BasinId, geometry: PoolGeometry) -> Self {
        Self {
            id,
            kind: BasinKind::Pool(geometry),
            liquid_volume: 0.0,
            liquid_height: geometry.bottom,
            step_bottom: geometry.bottom,
            step_top: geometry.top,
            step_x: 0.5 * (geometry.left + geometry.right),
            step_multiplier: 1.0,
            child: None,
        }
    }

    /// Interior of the boat `owner`. Call `update_boat_frame` before use.
    pub fn boat_interior(id: BasinId, owner: BodyId) -> Self {
        let design = boat_design();
        Self {
            id,
            kind: BasinKind::BoatInterior { owner },
            liquid_volume: 0.0,
            liquid_height: design.floor_height,
            step_bottom: design.floor_height,
            step_top: design.exterior_size.y,
            step_x: 0.0,
            step_multiplier: 1.0,
            child: None,
        }
    }

    pub fn kind(&self) -> BasinKind { self.kind }

    pub fn liquid_volume(&self) -> f64 { self.liquid_volume }
    pub fn liquid_height(&self) -> f64 { self.liquid_height }
    pub fn step_bottom(&self) -> f64 { self.step_bottom }
    pub fn step_top(&self) -> f64 { self.step_top }
    pub fn step_x(&self) -> f64 { self.step_x }
    pub fn step_multiplier(&self) -> f64 { self.step_multiplier }
    pub fn child(&self) -> Option<BasinId> { self.child }
    pub fn set_child(&mut self, child: Option<BasinId>) { self.child = child; }

    /// Moves a boat interior with its hull. `hull_bottom` is the world height
    /// of the hull's underside, `multiplier` the boat's linear scale.
    pub fn update_boat_frame(&mut self, x: f64, hull_bottom: f64, multiplier: f64) {
        if let BasinKind::BoatInterior { .. } = self.kind {
            let design = boat_design();
            self.step_x = x;
            self.step_multiplier = multiplier.max(f64::EPSILON);
            self.step_bottom = hull_bottom + design.floor_height * self.step_multiplier;
            self.step_top = hull_bottom + design.exterior_size.y * self.step_multiplier;
            self.liquid_height = self.height_for_volume(self.liquid_volume);
        }
    }

    /// Container cross-section at world height `y`, ignoring contents.
    pub fn maximum_area(&self, y: f64) -> f64 {
        match self.kind {
            BasinKind::Pool(g) => {
                if y < g.bottom || y > g.top { 0.0 } else { g.footprint() }
            }
            BasinKind::BoatInterior { .. } => {
                let Some(ratio) = self.interior_ratio(y) else { return 0.0; };
                let design = boat_design();
                let s = self.step_multiplier;
                let size = design.interior_size;
                design.interior.fill_factor() * size.x * size.z * s * s
                    * design.interior.area_fraction(ratio)
            }
        }
    }

    /// Container volume below world height `y`, ignoring contents.
    pub fn maximum_volume(&self, y: f64) -> f64 {
        match self.kind {
            BasinKind::Pool(g) => g.footprint() * (y - g.bottom).clamp(0.0, g.height()),
            BasinKind::BoatInterior { .. } => {
                let h = self.interior_height();
                if h <= 0.0 || y <= self.step_bottom {
                    return 0.0;
                }
                let ratio = ((y - self.step_bottom) / h).min(1.0);
                self.interior_capacity() * boat_design().interior.volume_fraction(ratio)
            }
        }
    }

    /// Volume up to the container's top.
    pub fn capacity(&self) -> f64 { self.maximum_volume(self.step_top) }

    /// Surface height of `volume` in the empty container.
    pub fn height_for_volume(&self, volume: f64) -> f64 {
        let v = volume.clamp(0.0, self.capacity());
        match self.kind {
            BasinKind::Pool(g) => g.bottom + v / g.footprint(),
            BasinKind::BoatInterior { .. } => {
                let cap = self.interior_capacity();
                if cap <= 0.0 {
                    return self.step_bottom;
                }
                let ratio = boat_design().interior.ratio_for_volume_fraction(v / cap);
                self.step_bottom + ratio * self.interior_height()
            }
        }
    }

    pub fn volume_for_height(&self, height: f64) -> f64 {
        self.maximum_volume(height.clamp(self.step_bottom, self.step_top))
    }

    /// Sets the stored volume, clamped to `[0, capacity]`, and re-derives the
    /// height for an empty container. Returns the volume actually stored.
    pub fn set_liquid_volume(&mut self, volume: f64) -> f64 {
        let clamped = if volume.is_finite() { volume.clamp(0.0, self.capacity()) } else { 0.0 };
        if clamped != volume {
            tracing::debug!(basin = self.id.0, requested = volume, clamped, "liquid volume clamped");
        }
        self.liquid_volume = clamped;
        self.liquid_height = self.height_for_volume(clamped);
        clamped
    }

    /// Writes the height through the container geometry.
    pub fn set_liquid_height(&mut self, height: f64) -> f64 {
        self.set_liquid_volume(self.volume_for_height(height))
    }

    /// Stores a solved (volume, height) pair.
    pub(crate) fn set_solved(&mut self, volume: f64, height: f64) {
        debug_assert!(volume >= 0.0, "negative basin volume {volume}");
        self.liquid_volume = volume.max(0.0);
        self.liquid_height = height.clamp(self.step_bottom, self.step_top);
    }

    pub fn is_body_inside(&self, body: &BodyStep, tuning: &SimTuning) -> bool {
        containment::is_body_inside(self, body, tuning)
    }

    fn interior_height(&self) -> f64 { self.step_top - self.step_bottom }

    fn interior_capacity(&self) -> f64 {
        boat_design().interior_capacity() * self.step_multiplier.powi(3)
    }

    fn interior_ratio(&self, y: f64) -> Option<f64> {
        let h = self.interior_height();
        if h <= 0.0 || y < self.step_bottom || y > self.step_top {
            return None;
        }
        Some((y - self.step_bottom) / h)
    }
}
