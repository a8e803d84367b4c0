//! Per-tick pipeline tying bodies, basins and the rigid-body engine together.
//!
//! `Simulation::step` runs, in this order: the engine step, the step context
//! refresh (body snapshots and the boat basin's frame), basin assignment, the
//! height solve (boat interior first, then the pool), the spill controller,
//! buoyancy and drag, and finally hands each body its force for the next
//! engine step.

mod edits;
mod step;
mod types;

pub use types::{BasinReport, BoatRig, StepDebug, StepReport};

use bevy_math::DVec2;

use crate::basin::{Basin, BasinId};
use crate::body::{Body, BodyId, BodyRole};
use crate::boat::{boat_design, BoatDesign};
use crate::engine::{BodyDesc, EngineHandle, PhysicsEngine, PointMassEngine};
use crate::error::SceneError;
use crate::forces::BodyReport;
use crate::material::{Gravity, Liquid};
use crate::spec::SceneSpec;
use crate::spill::{SpillController, SpillState};
use crate::tuning::SimTuning;

use step::StepContext;

pub struct Simulation<E: PhysicsEngine> {
    engine: E,
    scene: SceneSpec,
    tuning: SimTuning,
    liquid: Liquid,
    gravity: Gravity,
    bodies: Vec<Body>,
    basins: Vec<Basin>,
    pool: BasinId,
    boat: Option<BoatRig>,
    context: StepContext,
    report: StepReport,
    time: f64,
    last_dt: f64,
}

impl Simulation<PointMassEngine> {
    /// Scene on the reference point-mass engine.
    pub fn headless(scene: SceneSpec) -> Result<Self, SceneError> {
        let engine = PointMassEngine::for_pool(&scene.pool);
        Self::new(engine, scene)
    }
}

impl<E: PhysicsEngine> Simulation<E> {
    /// Registers the scene's bodies with `engine` and solves the initial
    /// liquid heights.
    pub fn new(mut engine: E, scene: SceneSpec) -> Result<Self, SceneError> {
        scene.validate()?;

        let pool = BasinId(0);
        let mut basins = vec![Basin::pool(pool, scene.pool)];

        let mut bodies = Vec::with_capacity(scene.bodies.len() + 1);
        for (i, spec) in scene.bodies.iter().enumerate() {
            let mut body = Body {
                id: BodyId(i),
                name: spec.name.clone(),
                role: BodyRole::Solid,
                shape: spec.shape,
                material: spec.material,
                handle: EngineHandle(0),
                fixed: spec.fixed,
                visible: spec.visible,
                dragged: false,
            };
            body.handle = engine.create_body(BodyDesc {
                mass: body.mass(),
                outline: body.shape.collision_outline(),
                position: spec.position,
                fixed: spec.fixed,
            });
            bodies.push(body);
        }

        let boat = match &scene.boat {
            Some(spec) => {
                let id = BodyId(bodies.len());
                let multiplier = BoatDesign::multiplier_for_volume(spec.volume);
                let mut body = Body {
                    id,
                    name: spec.name.clone(),
                    role: BodyRole::Boat { multiplier },
                    shape: boat_design().hull_shape(multiplier),
                    material: spec.material,
                    handle: EngineHandle(0),
                    fixed: false,
                    visible: spec.visible,
                    dragged: false,
                };
                body.handle = engine.create_body(BodyDesc {
                    mass: body.mass(),
                    outline: body.shape.collision_outline(),
                    position: spec.position,
                    fixed: false,
                });
                bodies.push(body);

                let basin = BasinId(basins.len());
                basins.push(Basin::boat_interior(basin, id));
                Some(BoatRig { body: id, basin, multiplier, volume: spec.volume, controller: SpillController::default() })
            }
            None => None,
        };

        let mut sim = Self {
            engine,
            tuning: scene.tuning,
            liquid: scene.liquid,
            gravity: scene.gravity,
            scene,
            bodies,
            basins,
            pool,
            boat,
            context: StepContext::default(),
            report: StepReport::default(),
            time: 0.0,
            last_dt: 0.0,
        };
        sim.reset();
        tracing::debug!(scene = %sim.scene.name, bodies = sim.bodies.len(), basins = sim.basins.len(), "simulation built");
        Ok(sim)
    }

    /// Restores the scene's initial state: body shapes, positions and flags,
    /// liquid volumes, liquid, gravity and the spill controller. Heights are
    /// solved before returning, so the next step starts from a consistent state.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.tuning = self.scene.tuning;
        self.liquid = self.scene.liquid;
        self.gravity = self.scene.gravity;
        self.engine.set_gravity(self.gravity.vector());

        for (body, spec) in self.bodies.iter_mut().zip(&self.scene.bodies) {
            body.shape = spec.shape;
            body.material = spec.material;
            body.visible = spec.visible;
            body.dragged = false;
            restore_body(&mut self.engine, body, spec.position);
        }

        let mut pool_volume = self.scene.liquid_volume;
        if let (Some(rig), Some(spec)) = (self.boat.as_mut(), self.scene.boat.as_ref()) {
            let multiplier = BoatDesign::multiplier_for_volume(spec.volume);
            rig.multiplier = multiplier;
            rig.volume = spec.volume;
            rig.controller.reset();

            let body = &mut self.bodies[rig.body.0];
            body.role = BodyRole::Boat { multiplier };
            body.shape = boat_design().hull_shape(multiplier);
            body.material = spec.material;
            body.visible = spec.visible;
            body.dragged = false;
            restore_body(&mut self.engine, body, spec.position);

            let hull_bottom = spec.position.y - 0.5 * body.shape.height;
            let basin = &mut self.basins[rig.basin.0];
            basin.update_boat_frame(spec.position.x, hull_bottom, multiplier);
            if spec.visible {
                basin.set_liquid_volume(spec.liquid_volume);
            } else {
                basin.set_liquid_volume(0.0);
                pool_volume += spec.liquid_volume.max(0.0);
            }
        }
        self.basins[self.pool.0].set_liquid_volume(pool_volume);
        self.refresh();
    }

    /// Re-runs the pipeline without advancing time. Edits call this so
    /// readouts and pending forces reflect them immediately.
    pub fn refresh(&mut self) { self.advance(0.0, None); }

    pub fn step(&mut self, dt: f64) -> &StepReport {
        self.advance(dt, None);
        &self.report
    }

    pub fn step_dbg(&mut self, dt: f64) -> StepDebug {
        let mut dbg = StepDebug::default();
        self.advance(dt, Some(&mut dbg));
        dbg
    }

    pub fn time(&self) -> f64 { self.time }
    pub fn scene(&self) -> &SceneSpec { &self.scene }
    pub fn tuning(&self) -> &SimTuning { &self.tuning }
    pub fn liquid(&self) -> Liquid { self.liquid }
    pub fn gravity(&self) -> Gravity { self.gravity }
    pub fn engine(&self) -> &E { &self.engine }
    pub fn report(&self) -> &StepReport { &self.report }

    pub fn bodies(&self) -> &[Body] { &self.bodies }
    pub fn body(&self, id: BodyId) -> Option<&Body> { self.bodies.get(id.0) }
    pub fn body_id(&self, name: &str) -> Option<BodyId> {
        self.bodies.iter().find(|b| b.name == name).map(|b| b.id)
    }
    pub fn body_position(&self, id: BodyId) -> Option<DVec2> {
        self.body(id).map(|b| self.engine.position(b.handle))
    }
    pub fn body_report(&self, id: BodyId) -> Option<&BodyReport> { self.report.bodies.get(id.0) }

    pub fn basins(&self) -> &[Basin] { &self.basins }
    pub fn basin(&self, id: BasinId) -> Option<&Basin> { self.basins.get(id.0) }
    pub fn pool_id(&self) -> BasinId { self.pool }
    pub fn pool(&self) -> &Basin { &self.basins[self.pool.0] }

    pub fn boat(&self) -> Option<&BoatRig> { self.boat.as_ref() }
    pub fn boat_body(&self) -> Option<BodyId> { self.boat.as_ref().map(|r| r.body) }
    pub fn boat_basin(&self) -> Option<&Basin> {
        self.boat.as_ref().map(|r| &self.basins[r.basin.0])
    }
    pub fn spill_state(&self) -> Option<SpillState> { self.boat.as_ref().map(|r| r.controller.state()) }

    /// Liquid held by every basin of the scene (m³).
    pub fn total_liquid_volume(&self) -> f64 {
        self.basins.iter().map(Basin::liquid_volume).sum()
    }

    fn body_index(&self, id: BodyId) -> Result<usize, SceneError> {
        if id.0 < self.bodies.len() { Ok(id.0) } else { Err(SceneError::UnknownBody(id)) }
    }

    fn boat_visible(&self) -> bool {
        self.boat.as_ref().is_some_and(|r| self.bodies[r.body.0].visible)
    }

    /// Adds `volume` to the pool; returns what did not fit.
    fn pour_into_pool(&mut self, volume: f64) -> f64 {
        let pool = &mut self.basins[self.pool.0];
        let requested = pool.liquid_volume() + volume;
        requested - pool.set_liquid_volume(requested)
    }
}

fn restore_body<E: PhysicsEngine>(engine: &mut E, body: &Body, position: DVec2) {
    engine.set_outline(body.handle, &body.shape.collision_outline());
    engine.set_mass(body.handle, body.mass());
    engine.set_position(body.handle, position);
    engine.set_kinematic(body.handle, !body.visible);
}
