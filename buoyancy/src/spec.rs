use bevy_math::DVec2;
use serde::{Deserialize, Serialize};

use crate::basin::PoolGeometry;
use crate::error::SceneError;
use crate::material::{Gravity, Liquid, Material};
use crate::shape::{BodyShape, ShapeKind};
use crate::tuning::SimTuning;

fn default_true() -> bool { true }

/// Serializable description of a scene: one pool, its liquid, the bodies in
/// it and at most one boat. Positions are bounding-box centers in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSpec {
    pub name: String,
    pub pool: PoolGeometry,
    pub liquid: Liquid,
    pub gravity: Gravity,
    /// Initial pool volume (m³), clamped to the pool's capacity.
    pub liquid_volume: f64,
    pub bodies: Vec<BodySpec>,
    pub boat: Option<BoatSpec>,
    pub tuning: SimTuning,
}

impl Default for SceneSpec {
    fn default() -> Self {
        Self {
            name: "empty".to_string(),
            pool: PoolGeometry::default(),
            liquid: Liquid::default(),
            gravity: Gravity::default(),
            liquid_volume: 0.1,
            bodies: Vec::new(),
            boat: None,
            tuning: SimTuning::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodySpec {
    pub name: String,
    pub shape: BodyShape,
    #[serde(default)]
    pub material: Material,
    pub position: DVec2,
    /// Held by the world (a scale pan, a pedestal).
    #[serde(default)]
    pub fixed: bool,
    #[serde(default = "default_true")]
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoatSpec {
    pub name: String,
    /// Exterior displacement (m³), hull plus interior.
    pub volume: f64,
    #[serde(default)]
    pub material: Material,
    pub position: DVec2,
    #[serde(default = "default_true")]
    pub visible: bool,
    /// Liquid already in the boat (m³), clamped to its capacity.
    #[serde(default)]
    pub liquid_volume: f64,
}

impl SceneSpec {
    pub fn validate(&self) -> Result<(), SceneError> {
        if !self.pool.is_valid() {
            return Err(SceneError::InvalidPool);
        }
        let mut names: Vec<&str> = self.bodies.iter().map(|b| b.name.as_str()).collect();
        if let Some(boat) = &self.boat {
            names.push(boat.name.as_str());
        }
        names.sort_unstable();
        if let Some(w) = names.windows(2).find(|w| w[0] == w[1]) {
            return Err(SceneError::DuplicateBody(w[0].to_string()));
        }

        for body in &self.bodies {
            if !body.shape.is_valid() {
                return Err(SceneError::InvalidShape {
                    name: body.name.clone(),
                    reason: "dimensions must be finite and positive".into(),
                });
            }
            if matches!(body.shape.kind, ShapeKind::BoatHull) {
                return Err(SceneError::InvalidShape {
                    name: body.name.clone(),
                    reason: "boat hulls are declared under [boat]".into(),
                });
            }
            if !body.position.is_finite() {
                return Err(SceneError::InvalidShape { name: body.name.clone(), reason: "position is not finite".into() });
            }
        }
        if let Some(boat) = &self.boat {
            if !(boat.volume.is_finite() && boat.volume > 0.0) {
                return Err(SceneError::InvalidBoat { name: boat.name.clone(), reason: "volume must be positive".into() });
            }
            if !boat.position.is_finite() {
                return Err(SceneError::InvalidBoat { name: boat.name.clone(), reason: "position is not finite".into() });
            }
        }
        Ok(())
    }
}
