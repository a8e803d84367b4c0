use buoyancy::{
    builtins, Gravity, Liquid, Material, SceneError, SceneSpec, ShapeKind, Simulation, SimTuning,
};

const TWO_BLOCKS: &str = r#"
name = "two_blocks"
liquid = "seawater"
gravity = "moon"
liquid_volume = 0.12

[pool]
left = -0.5
right = 0.5
bottom = 0.0
top = 0.8
depth = 0.3

[[bodies]]
name = "anchor"
material = "steel"
position = [0.1, 0.2]
shape = { kind = "cuboid", width = 0.1, height = 0.1, depth = 0.1 }

[[bodies]]
name = "float"
material = { custom = { density = 50.0 } }
position = [-0.2, 0.5]
shape = { kind = "ellipsoid", width = 0.1, height = 0.1, depth = 0.1 }

[boat]
name = "dinghy"
volume = 0.005
position = [0.3, 0.4]

[tuning]
fill_speed = 1.0
"#;

#[test]
fn scene_parses_from_toml_with_defaults() {
    let scene: SceneSpec = toml::from_str(TWO_BLOCKS).expect("scene parses");
    assert_eq!(scene.name, "two_blocks");
    assert_eq!(scene.liquid, Liquid::Seawater);
    assert_eq!(scene.gravity, Gravity::Moon);
    assert_eq!(scene.pool.top, 0.8);
    assert_eq!(scene.bodies.len(), 2);
    assert_eq!(scene.bodies[0].material, Material::Steel);
    assert_eq!(scene.bodies[1].material, Material::Custom { density: 50.0 });
    assert_eq!(scene.bodies[1].shape.kind, ShapeKind::Ellipsoid);
    assert!(scene.bodies.iter().all(|b| b.visible && !b.fixed));

    let boat = scene.boat.as_ref().expect("boat");
    assert_eq!(boat.material, Material::Wood);
    assert_eq!(boat.liquid_volume, 0.0);
    assert!(boat.visible);

    assert_eq!(scene.tuning.fill_speed, 1.0);
    assert_eq!(scene.tuning.spill_height_fraction, SimTuning::default().spill_height_fraction);
    assert!(scene.validate().is_ok());
}

#[test]
fn parsed_scene_builds_a_simulation() {
    let scene: SceneSpec = toml::from_str(TWO_BLOCKS).expect("scene parses");
    let sim = Simulation::headless(scene).expect("simulation builds");
    assert_eq!(sim.bodies().len(), 3);
    assert_eq!(sim.basins().len(), 2);
    assert_eq!(sim.gravity(), Gravity::Moon);
    assert!((sim.pool().liquid_volume() - 0.12).abs() < 1e-12);
    assert!(sim.boat_basin().is_some());
}

#[test]
fn builtin_scenes_round_trip_through_toml() {
    for name in builtins::SCENE_NAMES {
        let scene = builtins::scene_by_name(name).expect("builtin");
        let text = toml::to_string(&scene).expect("serializes");
        let back: SceneSpec = toml::from_str(&text).expect("parses back");
        assert_eq!(back, scene, "scene {name}");
        assert!(Simulation::headless(back).is_ok(), "scene {name} builds");
    }
}

#[test]
fn invalid_scenes_are_rejected() {
    let mut scene = builtins::floating_block_scene();
    scene.pool.depth = 0.0;
    assert_eq!(scene.validate(), Err(SceneError::InvalidPool));

    let mut scene = builtins::floating_block_scene();
    let twin = scene.bodies[0].clone();
    scene.bodies.push(twin);
    assert_eq!(scene.validate(), Err(SceneError::DuplicateBody("block".into())));

    let mut scene = builtins::floating_block_scene();
    scene.bodies[0].shape.width = -1.0;
    assert!(matches!(Simulation::headless(scene), Err(SceneError::InvalidShape { .. })));

    let mut scene = builtins::boat_scene();
    if let Some(boat) = scene.boat.as_mut() {
        boat.volume = 0.0;
    }
    assert!(matches!(scene.validate(), Err(SceneError::InvalidBoat { .. })));
}
