//! User-driven edits. Numeric inputs are clamped to what the scene can hold;
//! only references to bodies or basins that do not exist are errors. Every
//! edit re-runs the pipeline without advancing time.

use bevy_math::DVec2;

use crate::basin::BasinId;
use crate::body::{BodyId, BodyRole};
use crate::boat::{boat_design, BoatDesign};
use crate::engine::PhysicsEngine;
use crate::error::SceneError;
use crate::material::{Gravity, Liquid, Material};
use crate::shape::{BodyShape, ShapeKind};
use crate::solver::empty_volume;

use super::Simulation;

/// Smallest body or boat volume an edit can set (m³).
const MIN_BODY_VOLUME: f64 = 1e-6;

impl<E: PhysicsEngine> Simulation<E> {
    /// Sets a basin's liquid volume, clamped to `[0, capacity]`. Returns the
    /// volume it holds afterwards.
    pub fn set_liquid_volume(&mut self, basin: BasinId, volume: f64) -> Result<f64, SceneError> {
        let volume = if self.is_hidden_boat_basin(basin)? { 0.0 } else { volume };
        self.basins[basin.0].set_liquid_volume(volume);
        self.refresh();
        Ok(self.basins[basin.0].liquid_volume())
    }

    /// Sets a basin's surface height. The height is converted to the volume of
    /// liquid that reaches it around the bodies currently inside.
    pub fn set_liquid_height(&mut self, basin: BasinId, height: f64) -> Result<f64, SceneError> {
        if self.is_hidden_boat_basin(basin)? {
            return self.set_liquid_volume(basin, 0.0);
        }
        let b = &self.basins[basin.0];
        let height = if height.is_finite() { height.clamp(b.step_bottom(), b.step_top()) } else { b.step_bottom() };
        let volume = empty_volume(b, &self.context.displacers(basin), height).max(0.0);
        self.set_liquid_volume(basin, volume)
    }

    pub fn set_body_material(&mut self, id: BodyId, material: Material) -> Result<(), SceneError> {
        let i = self.body_index(id)?;
        let body = &mut self.bodies[i];
        body.material = material;
        self.engine.set_mass(body.handle, body.mass());
        self.refresh();
        Ok(())
    }

    pub fn set_liquid(&mut self, liquid: Liquid) {
        self.liquid = liquid;
        self.refresh();
    }

    pub fn set_gravity(&mut self, gravity: Gravity) {
        self.gravity = gravity;
        self.engine.set_gravity(gravity.vector());
        self.refresh();
    }

    /// Reshapes a body from slider ratios in `[0, 1]`, keeping its volume and
    /// the height of its bottom.
    pub fn set_body_shape_ratios(
        &mut self,
        id: BodyId,
        kind: ShapeKind,
        width_ratio: f64,
        height_ratio: f64,
    ) -> Result<(), SceneError> {
        let i = self.adjustable_index(id)?;
        if kind == ShapeKind::BoatHull {
            return Err(SceneError::NotAdjustable(self.bodies[i].name.clone()));
        }
        let shape = BodyShape::from_ratios(kind, self.bodies[i].volume(), width_ratio, height_ratio);
        self.replace_shape(i, shape);
        Ok(())
    }

    /// Rescales a body to `volume`, keeping its proportions.
    pub fn set_body_volume(&mut self, id: BodyId, volume: f64) -> Result<f64, SceneError> {
        let i = self.adjustable_index(id)?;
        let volume = clamp_volume(volume, self.bodies[i].volume());
        let shape = self.bodies[i].shape.with_volume(volume);
        self.replace_shape(i, shape);
        Ok(self.bodies[i].volume())
    }

    /// Resizes the boat to displace `volume`, keeping its hull bottom in place.
    /// Liquid that no longer fits in the smaller interior goes to the pool.
    pub fn set_boat_volume(&mut self, volume: f64) -> Result<f64, SceneError> {
        let Some(rig) = self.boat.as_mut() else { return Err(SceneError::NoBoat) };
        let volume = clamp_volume(volume, rig.volume);
        let multiplier = BoatDesign::multiplier_for_volume(volume);
        rig.volume = volume;
        rig.multiplier = multiplier;
        let (body_id, basin_id) = (rig.body, rig.basin);

        let body = &mut self.bodies[body_id.0];
        let position = self.engine.position(body.handle);
        let bottom = position.y - 0.5 * body.shape.height;
        body.role = BodyRole::Boat { multiplier };
        body.shape = boat_design().hull_shape(multiplier);
        self.engine.set_outline(body.handle, &body.shape.collision_outline());
        self.engine.set_mass(body.handle, body.mass());
        self.engine.set_position(body.handle, DVec2::new(position.x, bottom + 0.5 * body.shape.height));

        let basin = &mut self.basins[basin_id.0];
        basin.update_boat_frame(position.x, bottom, multiplier);
        let carried = basin.liquid_volume();
        let excess = carried - basin.set_liquid_volume(carried);
        if excess > 0.0 {
            tracing::debug!(excess, "resized boat returned liquid to the pool");
            self.pour_into_pool(excess);
        }
        self.refresh();
        Ok(volume)
    }

    /// Shows or hides a body. A hidden boat empties into the pool at once and
    /// its spill controller starts over.
    pub fn set_body_visible(&mut self, id: BodyId, visible: bool) -> Result<(), SceneError> {
        let i = self.body_index(id)?;
        let body = &mut self.bodies[i];
        body.visible = visible;
        self.engine.set_kinematic(body.handle, !visible || body.dragged);

        if !visible {
            if let Some(rig) = self.boat.as_mut().filter(|r| r.body == id) {
                rig.controller.reset();
                let basin = &mut self.basins[rig.basin.0];
                let carried = basin.liquid_volume();
                basin.set_liquid_volume(0.0);
                self.basins[self.pool.0].set_child(None);
                tracing::debug!(carried, "boat hidden, interior emptied into the pool");
                self.pour_into_pool(carried);
            }
        }
        self.refresh();
        Ok(())
    }

    /// Holds a body at `position` until released.
    pub fn drag_body(&mut self, id: BodyId, position: DVec2) -> Result<(), SceneError> {
        let i = self.body_index(id)?;
        if !position.is_finite() {
            return Ok(());
        }
        let body = &mut self.bodies[i];
        body.dragged = true;
        self.engine.set_kinematic(body.handle, true);
        self.engine.set_position(body.handle, position);
        self.refresh();
        Ok(())
    }

    pub fn release_body(&mut self, id: BodyId) -> Result<(), SceneError> {
        let i = self.body_index(id)?;
        let body = &mut self.bodies[i];
        body.dragged = false;
        self.engine.set_kinematic(body.handle, !body.visible);
        Ok(())
    }

    fn is_hidden_boat_basin(&self, basin: BasinId) -> Result<bool, SceneError> {
        if basin.0 >= self.basins.len() {
            return Err(SceneError::UnknownBasin(basin));
        }
        let boat_basin = self.boat.as_ref().map(|r| r.basin);
        Ok(boat_basin == Some(basin) && !self.boat_visible())
    }

    fn adjustable_index(&self, id: BodyId) -> Result<usize, SceneError> {
        let i = self.body_index(id)?;
        if self.bodies[i].is_boat() {
            return Err(SceneError::NotAdjustable(self.bodies[i].name.clone()));
        }
        Ok(i)
    }

    fn replace_shape(&mut self, i: usize, shape: BodyShape) {
        let body = &mut self.bodies[i];
        let position = self.engine.position(body.handle);
        let bottom = position.y - 0.5 * body.shape.height;
        body.shape = shape;
        self.engine.set_outline(body.handle, &shape.collision_outline());
        self.engine.set_mass(body.handle, body.mass());
        self.engine.set_position(body.handle, DVec2::new(position.x, bottom + 0.5 * shape.height));
        self.refresh();
    }
}

fn clamp_volume(requested: f64, current: f64) -> f64 {
    if requested.is_finite() { requested.max(MIN_BODY_VOLUME) } else { current }
}
