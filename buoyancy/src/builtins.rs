use bevy_math::DVec2;

use crate::basin::PoolGeometry;
use crate::boat::{boat_design, BoatDesign};
use crate::material::{Gravity, Liquid, Material};
use crate::shape::{BodyShape, ShapeKind};
use crate::spec::{BoatSpec, BodySpec, SceneSpec};
use crate::tuning::SimTuning;

/// Standard demo pool: 0.9 m wide, 1 m tall, 0.4 m deep, holding 0.1 m³.
fn demo_pool() -> SceneSpec {
    SceneSpec {
        name: String::new(),
        pool: PoolGeometry::default(),
        liquid: Liquid::Water,
        gravity: Gravity::Earth,
        liquid_volume: 0.1,
        bodies: Vec::new(),
        boat: None,
        tuning: SimTuning::default(),
    }
}

/// Places `shape` so its bottom sits at `bottom`.
fn resting(shape: &BodyShape, x: f64, bottom: f64) -> DVec2 {
    DVec2::new(x, bottom + 0.5 * shape.height)
}

/// A single 10 liter cube, half as dense as water, dropped just above the surface.
pub fn floating_block_scene() -> SceneSpec {
    let shape = BodyShape::cube(0.01);
    SceneSpec {
        name: "floating_block".into(),
        bodies: vec![BodySpec {
            name: "block".into(),
            shape,
            material: Material::Custom { density: 500.0 },
            position: DVec2::new(0.0, 0.30),
            fixed: false,
            visible: true,
        }],
        ..demo_pool()
    }
}

/// A 10 liter wooden boat floating on the left, a small wooden block on the right.
pub fn boat_scene() -> SceneSpec {
    let volume = 0.01;
    let hull = boat_design().hull_shape(BoatDesign::multiplier_for_volume(volume));
    let block = BodyShape::cube(0.002);
    SceneSpec {
        name: "boat".into(),
        bodies: vec![BodySpec {
            name: "block".into(),
            shape: block,
            material: Material::Wood,
            position: resting(&block, 0.3, 0.3),
            fixed: false,
            visible: true,
        }],
        boat: Some(BoatSpec {
            name: "boat".into(),
            volume,
            material: Material::Wood,
            position: resting(&hull, -0.15, 0.25),
            visible: true,
            liquid_volume: 0.0,
        }),
        ..demo_pool()
    }
}

/// Equal-volume bodies of different shapes and materials side by side, plus a
/// fixed pedestal on the pool floor.
pub fn compare_scene() -> SceneSpec {
    let volume = 0.002;
    let entries = [
        ("styrofoam_cube", ShapeKind::Cuboid, Material::Styrofoam, 0.5, 0.5),
        ("ice_ball", ShapeKind::Ellipsoid, Material::Ice, 0.5, 0.5),
        ("wood_cone", ShapeKind::Cone, Material::Wood, 0.6, 0.4),
        ("human_log", ShapeKind::HorizontalCylinder, Material::Human, 0.5, 0.5),
        ("duck", ShapeKind::Duck, Material::Custom { density: 300.0 }, 0.5, 0.5),
        ("brick_bottle", ShapeKind::Bottle, Material::Brick, 0.3, 0.8),
    ];
    let spacing = 0.13;
    let first_x = -0.36;
    let mut bodies: Vec<BodySpec> = entries
        .iter()
        .enumerate()
        .map(|(i, (name, kind, material, wr, hr))| {
            let shape = BodyShape::from_ratios(*kind, volume, *wr, *hr);
            BodySpec {
                name: (*name).into(),
                shape,
                material: *material,
                position: resting(&shape, first_x + spacing * i as f64, 0.35),
                fixed: false,
                visible: true,
            }
        })
        .collect();

    let pedestal = BodyShape::new(ShapeKind::Cuboid, 0.08, 0.15, 0.08);
    bodies.push(BodySpec {
        name: "pedestal".into(),
        shape: pedestal,
        material: Material::Steel,
        position: resting(&pedestal, 0.4, 0.0),
        fixed: true,
        visible: true,
    });

    SceneSpec { name: "compare".into(), bodies, ..demo_pool() }
}

/// Built-in scene by name.
pub fn scene_by_name(name: &str) -> Option<SceneSpec> {
    match name {
        "floating_block" => Some(floating_block_scene()),
        "boat" => Some(boat_scene()),
        "compare" => Some(compare_scene()),
        _ => None,
    }
}

pub const SCENE_NAMES: [&str; 3] = ["floating_block", "boat", "compare"];
