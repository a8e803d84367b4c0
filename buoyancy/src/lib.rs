//! Liquid levels and buoyancy for rigid bodies in nested containers.
//!
//! A pool holds liquid; bodies dropped into it displace that liquid according
//! to their shape profile, and a boat floating in the pool is itself a small
//! basin that fills when overtopped and spills when lifted out. The crate
//! never integrates motion: it reads body transforms from a `PhysicsEngine`,
//! solves every basin's surface height, and hands back buoyancy and drag
//! forces for the engine's next step.

mod math;
pub use math::{Bounds2, Outline};

pub mod profile;
pub use profile::{ProfileTable, ShapeProfile, PROFILE_SAMPLES};

mod material;
pub use material::{Gravity, Liquid, Material};

mod tuning;
pub use tuning::SimTuning;

mod shape;
pub use shape::{BodyShape, ShapeKind};

pub mod boat;
pub use boat::{boat_design, BoatDesign, BOAT_REFERENCE_VOLUME};

mod body;
pub use body::{Body, BodyId, BodyRole, BodyStep};

mod basin;
pub use basin::{Basin, BasinId, BasinKind, PoolGeometry};

pub mod containment;
pub mod solver;
pub use solver::{find_root, solve_basin, SolveOutcome};

mod spill;
pub use spill::{SpillController, SpillInputs, SpillState};

pub mod forces;
pub use forces::BodyReport;

pub mod engine;
pub use engine::{BodyDesc, EngineHandle, Floor, PhysicsEngine, PointMassEngine};

mod error;
pub use error::SceneError;

mod spec;
pub use spec::{BoatSpec, BodySpec, SceneSpec};

pub mod builtins;

mod simulation;
pub use simulation::{BasinReport, BoatRig, Simulation, StepDebug, StepReport};

pub use bevy_math::DVec2;
