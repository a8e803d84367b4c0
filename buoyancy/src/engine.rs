//! Seam to the rigid-body engine.
//!
//! The liquid model never integrates motion itself. It reads positions and
//! velocities from a `PhysicsEngine`, and hands back one external force per
//! body for the engine's next step. `PointMassEngine` is a small reference
//! engine for headless runs and tests: upright bodies, gravity, a stepped
//! floor, no body-to-body contact.

use bevy_math::DVec2;

use crate::basin::PoolGeometry;
use crate::math::Bounds2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineHandle(pub u32);

#[derive(Debug, Clone)]
pub struct BodyDesc {
    pub mass: f64,
    /// Side-view collision outline centered on `position`.
    pub outline: Vec<DVec2>,
    pub position: DVec2,
    /// Never moves (scales, pedestals).
    pub fixed: bool,
}

pub trait PhysicsEngine {
    fn create_body(&mut self, desc: BodyDesc) -> EngineHandle;
    fn set_outline(&mut self, handle: EngineHandle, outline: &[DVec2]);
    fn set_mass(&mut self, handle: EngineHandle, mass: f64);
    fn position(&self, handle: EngineHandle) -> DVec2;
    fn velocity(&self, handle: EngineHandle) -> DVec2;
    /// Teleports the body and zeroes its velocity.
    fn set_position(&mut self, handle: EngineHandle, position: DVec2);
    /// Kinematic bodies ignore gravity and forces until released.
    fn set_kinematic(&mut self, handle: EngineHandle, kinematic: bool);
    /// Replaces any force queued since the last step; consumed by `step`.
    fn apply_force(&mut self, handle: EngineHandle, force: DVec2);
    fn set_gravity(&mut self, gravity: DVec2);
    fn step(&mut self, dt: f64);
}

/// Floor seen by the reference engine: the pool floor over the pool's span,
/// ground level (the pool rim) everywhere else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Floor {
    pub left: f64,
    pub right: f64,
    pub basin_floor: f64,
    pub ground: f64,
}

impl Floor {
    pub fn from_pool(pool: &PoolGeometry) -> Self {
        Self { left: pool.left, right: pool.right, basin_floor: pool.bottom, ground: pool.top }
    }

    pub fn height_at(&self, x: f64) -> f64 {
        if x >= self.left && x <= self.right { self.basin_floor } else { self.ground }
    }
}

#[derive(Debug, Clone)]
struct PointBody {
    mass: f64,
    half_height: f64,
    position: DVec2,
    velocity: DVec2,
    force: DVec2,
    fixed: bool,
    kinematic: bool,
}

#[derive(Debug, Clone)]
pub struct PointMassEngine {
    bodies: Vec<PointBody>,
    gravity: DVec2,
    floor: Floor,
}

impl PointMassEngine {
    pub fn new(floor: Floor) -> Self {
        Self { bodies: Vec::new(), gravity: DVec2::new(0.0, -9.8), floor }
    }

    pub fn for_pool(pool: &PoolGeometry) -> Self { Self::new(Floor::from_pool(pool)) }

    pub fn gravity(&self) -> DVec2 { self.gravity }

    fn body(&self, handle: EngineHandle) -> &PointBody { &self.bodies[handle.0 as usize] }
    fn body_mut(&mut self, handle: EngineHandle) -> &mut PointBody { &mut self.bodies[handle.0 as usize] }
}

impl PhysicsEngine for PointMassEngine {
    fn create_body(&mut self, desc: BodyDesc) -> EngineHandle {
        let handle = EngineHandle(self.bodies.len() as u32);
        self.bodies.push(PointBody {
            mass: desc.mass.max(1e-6),
            half_height: 0.5 * Bounds2::from_points(&desc.outline).height(),
            position: desc.position,
            velocity: DVec2::ZERO,
            force: DVec2::ZERO,
            fixed: desc.fixed,
            kinematic: false,
        });
        handle
    }

    fn set_outline(&mut self, handle: EngineHandle, outline: &[DVec2]) {
        self.body_mut(handle).half_height = 0.5 * Bounds2::from_points(outline).height();
    }

    fn set_mass(&mut self, handle: EngineHandle, mass: f64) {
        self.body_mut(handle).mass = mass.max(1e-6);
    }

    fn position(&self, handle: EngineHandle) -> DVec2 { self.body(handle).position }

    fn velocity(&self, handle: EngineHandle) -> DVec2 { self.body(handle).velocity }

    fn set_position(&mut self, handle: EngineHandle, position: DVec2) {
        let b = self.body_mut(handle);
        b.position = position;
        b.velocity = DVec2::ZERO;
    }

    fn set_kinematic(&mut self, handle: EngineHandle, kinematic: bool) {
        let b = self.body_mut(handle);
        b.kinematic = kinematic;
        b.velocity = DVec2::ZERO;
    }

    fn apply_force(&mut self, handle: EngineHandle, force: DVec2) {
        self.body_mut(handle).force = force;
    }

    fn set_gravity(&mut self, gravity: DVec2) { self.gravity = gravity; }

    fn step(&mut self, dt: f64) {
        if dt <= 0.0 {
            return;
        }
        let gravity = self.gravity;
        let floor = self.floor;
        for b in &mut self.bodies {
            let force = std::mem::take(&mut b.force);
            if b.fixed || b.kinematic {
                continue;
            }
            // Semi-implicit Euler.
            b.velocity += (gravity + force / b.mass) * dt;
            b.position += b.velocity * dt;

            let rest = floor.height_at(b.position.x) + b.half_height;
            if b.position.y < rest {
                b.position.y = rest;
                b.velocity.y = b.velocity.y.max(0.0);
            }
        }
    }
}
