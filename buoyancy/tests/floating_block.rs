use buoyancy::{builtins, BodyShape, Gravity, Liquid, Material, PhysicsEngine, Simulation};

const DT: f64 = 1.0 / 60.0;

#[test]
fn half_density_cube_settles_half_submerged() {
    let mut sim = Simulation::headless(builtins::floating_block_scene()).expect("scene builds");
    let block = sim.body_id("block").expect("block");
    let initial = sim.total_liquid_volume();

    for _ in 0..1200 {
        sim.step(DT);
    }

    let report = *sim.body_report(block).expect("report");
    assert!(
        (report.submerged_fraction - 0.5).abs() < 0.01,
        "submerged fraction {}",
        report.submerged_fraction
    );
    assert!(!report.fully_submerged);
    let weight = 500.0 * 0.01 * 9.8;
    assert!((report.buoyant_force.y - weight).abs() < 0.02 * weight, "buoyancy {}", report.buoyant_force.y);

    let velocity = sim.engine().velocity(sim.body(block).expect("body").handle);
    assert!(velocity.length() < 1e-3, "still moving at {velocity:?}");

    // Pool rises by the displaced volume over its footprint.
    let expected_level = (0.1 + 0.005) / 0.36;
    assert!((sim.pool().liquid_height() - expected_level).abs() < 1e-3);
    assert_eq!(sim.total_liquid_volume(), initial);
}

#[test]
fn denser_than_liquid_sinks_to_the_floor_and_reports_full_submersion() {
    let mut sim = Simulation::headless(builtins::floating_block_scene()).expect("scene builds");
    let block = sim.body_id("block").expect("block");
    sim.set_body_material(block, Material::Steel).expect("material");

    for _ in 0..600 {
        sim.step(DT);
    }

    let report = *sim.body_report(block).expect("report");
    assert!(report.fully_submerged);
    assert_eq!(report.submerged_fraction, 1.0);
    assert!((report.submerged_volume - 0.01).abs() < 1e-12);
    let side = BodyShape::cube(0.01).height;
    let y = sim.body_position(block).expect("position").y;
    assert!((y - 0.5 * side).abs() < 1e-9, "resting center {y}");
}

#[test]
fn lighter_liquid_and_gravity_change_the_float_line() {
    let mut sim = Simulation::headless(builtins::floating_block_scene()).expect("scene builds");
    let block = sim.body_id("block").expect("block");
    sim.set_liquid(Liquid::Gasoline);
    sim.set_gravity(Gravity::Moon);

    for _ in 0..2400 {
        sim.step(DT);
    }

    // Floating fraction is density ratio; gravity cancels out.
    let report = *sim.body_report(block).expect("report");
    let expected = 500.0 / 680.0;
    assert!((report.submerged_fraction - expected).abs() < 0.01, "fraction {}", report.submerged_fraction);
}

#[test]
fn drag_opposes_motion_in_liquid() {
    let mut sim = Simulation::headless(builtins::floating_block_scene()).expect("scene builds");
    let block = sim.body_id("block").expect("block");
    let dbg = sim.step_dbg(DT);
    assert_eq!(dbg.iterations.len(), 1);

    let handle = sim.body(block).expect("body").handle;
    let v = sim.engine().velocity(handle);
    let report = *sim.body_report(block).expect("report");
    assert!(v.y < 0.0, "block should be falling after the first step");
    assert!(report.drag_force.y > 0.0);
    assert_eq!(report.external_force, report.buoyant_force + report.drag_force);
}

#[test]
fn reset_restores_the_initial_scene() {
    let scene = builtins::floating_block_scene();
    let mut sim = Simulation::headless(scene.clone()).expect("scene builds");
    let block = sim.body_id("block").expect("block");
    let start_report = *sim.body_report(block).expect("report");

    sim.set_body_material(block, Material::Brick).expect("material");
    sim.set_liquid(Liquid::Honey);
    for _ in 0..120 {
        sim.step(DT);
    }
    let pool = sim.pool_id();
    sim.set_liquid_volume(pool, 0.2).expect("volume");

    sim.reset();
    assert_eq!(sim.time(), 0.0);
    assert_eq!(sim.liquid(), Liquid::Water);
    assert_eq!(sim.body(block).expect("body").material, scene.bodies[0].material);
    assert_eq!(sim.body_position(block).expect("position"), scene.bodies[0].position);
    assert_eq!(sim.pool().liquid_volume(), 0.1);
    assert_eq!(*sim.body_report(block).expect("report"), start_report);
}
