use bevy_math::DVec2;
use serde::{Deserialize, Serialize};

use crate::boat::boat_design;
use crate::engine::EngineHandle;
use crate::material::Material;
use crate::profile::ShapeProfile;
use crate::shape::BodyShape;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub usize);

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyRole {
    Solid,
    /// Displaces with its whole exterior and owns an interior basin.
    Boat { multiplier: f64 },
}

#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub name: String,
    pub role: BodyRole,
    pub shape: BodyShape,
    pub material: Material,
    pub handle: EngineHandle,
    pub fixed: bool,
    pub visible: bool,
    /// Held in place by the user (kinematic in the engine).
    pub dragged: bool,
}

impl Body {
    pub fn volume(&self) -> f64 { self.shape.volume() }

    pub fn is_boat(&self) -> bool { matches!(self.role, BodyRole::Boat { .. }) }

    /// Rigid-body mass. A boat's mass is its hull material only; liquid it
    /// carries is accounted for through its basin.
    pub fn mass(&self) -> f64 {
        let solid_volume = match self.role {
            BodyRole::Solid => self.volume(),
            BodyRole::Boat { multiplier } => boat_design().hull_material_volume(multiplier),
        };
        (self.material.density() * solid_volume).max(1e-6)
    }
}

/// Snapshot of a body taken once per step, after the engine has moved it.
/// Positions are the engine's bounding-box centers; bodies are upright.
#[derive(Debug, Clone, Copy)]
pub struct BodyStep {
    pub id: BodyId,
    pub x: f64,
    pub bottom: f64,
    pub top: f64,
    pub volume: f64,
    pub velocity: DVec2,
    pub profile: ShapeProfile,
    pub is_boat: bool,
}

impl BodyStep {
    pub fn capture(body: &Body, position: DVec2, velocity: DVec2) -> Self {
        let half = 0.5 * body.shape.height;
        Self {
            id: body.id,
            x: position.x,
            bottom: position.y - half,
            top: position.y + half,
            volume: body.volume(),
            velocity,
            profile: body.shape.profile(),
            is_boat: body.is_boat(),
        }
    }

    pub fn height(&self) -> f64 { self.top - self.bottom }

    #[inline]
    pub fn submersion_ratio(&self, level: f64) -> f64 {
        let h = self.height();
        if h <= 0.0 {
            return if level > self.bottom { 1.0 } else { 0.0 };
        }
        ((level - self.bottom) / h).clamp(0.0, 1.0)
    }

    /// Liquid displaced when the surface sits at `level`. Exactly 0 at or
    /// below the bottom and exactly the full volume at or above the top.
    pub fn displaced_volume(&self, level: f64) -> f64 {
        if level <= self.bottom {
            0.0
        } else if level >= self.top {
            self.volume
        } else {
            self.volume * self.profile.volume_fraction(self.submersion_ratio(level))
        }
    }

    /// Horizontal cross-section at `level`; 0 outside the body's extent.
    pub fn displaced_area(&self, level: f64) -> f64 {
        if level <= self.bottom || level >= self.top {
            return 0.0;
        }
        self.volume / self.height() * self.profile.area_fraction(self.submersion_ratio(level))
    }
}
