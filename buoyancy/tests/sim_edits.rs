use buoyancy::{builtins, BasinId, BodyId, Material, SceneError, ShapeKind, Simulation, DVec2};

#[test]
fn liquid_volume_edits_clamp_to_the_pool() {
    let mut sim = Simulation::headless(builtins::floating_block_scene()).expect("scene builds");
    let pool = sim.pool_id();

    assert_eq!(sim.set_liquid_volume(pool, -2.0).expect("edit"), 0.0);
    assert!(sim.pool().liquid_height() < 1e-9);

    let stored = sim.set_liquid_volume(pool, 50.0).expect("edit");
    assert!(stored <= sim.pool().capacity());
    assert!(stored > 0.3);

    assert_eq!(sim.set_liquid_volume(BasinId(7), 0.1), Err(SceneError::UnknownBasin(BasinId(7))));
}

#[test]
fn liquid_height_edits_account_for_bodies_in_the_pool() {
    let mut sim = Simulation::headless(builtins::floating_block_scene()).expect("scene builds");
    let pool = sim.pool_id();
    // The block sits entirely below 0.5, so reaching it takes its volume less liquid.
    let stored = sim.set_liquid_height(pool, 0.5).expect("edit");
    assert!((stored - (0.18 - 0.01)).abs() < 1e-9, "stored {stored}");
    assert!((sim.pool().liquid_height() - 0.5).abs() < 1e-8);

    sim.set_liquid_height(pool, 3.0).expect("edit");
    assert!(sim.pool().liquid_height() <= 1.0);
}

#[test]
fn shape_edits_keep_volume_and_bottom() {
    let mut sim = Simulation::headless(builtins::compare_scene()).expect("scene builds");
    let id = sim.body_id("styrofoam_cube").expect("body");
    let before = sim.body(id).expect("body").clone();
    let bottom = sim.body_position(id).expect("position").y - 0.5 * before.shape.height;

    sim.set_body_shape_ratios(id, ShapeKind::Cone, 0.9, 0.2).expect("reshape");
    let after = sim.body(id).expect("body");
    assert_eq!(after.shape.kind, ShapeKind::Cone);
    assert!((after.volume() - before.volume()).abs() < 1e-12);
    assert!(after.shape.width > after.shape.height);
    let new_bottom = sim.body_position(id).expect("position").y - 0.5 * after.shape.height;
    assert!((new_bottom - bottom).abs() < 1e-12);

    let stored = sim.set_body_volume(id, 0.004).expect("resize");
    assert!((stored - 0.004).abs() < 1e-12);
    let smallest = sim.set_body_volume(id, -1.0).expect("resize");
    assert!((smallest - 1e-6).abs() < 1e-15);
}

#[test]
fn boat_hull_is_not_reshaped_by_body_edits() {
    let mut sim = Simulation::headless(builtins::boat_scene()).expect("scene builds");
    let boat = sim.boat_body().expect("boat");
    assert!(matches!(
        sim.set_body_shape_ratios(boat, ShapeKind::Cuboid, 0.5, 0.5),
        Err(SceneError::NotAdjustable(_))
    ));
    assert!(matches!(sim.set_body_volume(boat, 0.02), Err(SceneError::NotAdjustable(_))));

    let mut plain = Simulation::headless(builtins::floating_block_scene()).expect("scene builds");
    assert_eq!(plain.set_boat_volume(0.02), Err(SceneError::NoBoat));
}

#[test]
fn unknown_bodies_are_errors() {
    let mut sim = Simulation::headless(builtins::floating_block_scene()).expect("scene builds");
    let ghost = BodyId(99);
    assert_eq!(sim.set_body_material(ghost, Material::Ice), Err(SceneError::UnknownBody(ghost)));
    assert_eq!(sim.drag_body(ghost, DVec2::ZERO), Err(SceneError::UnknownBody(ghost)));
    assert_eq!(sim.set_body_visible(ghost, false), Err(SceneError::UnknownBody(ghost)));
    assert!(sim.body_id("ghost").is_none());
}

#[test]
fn hidden_bodies_stop_displacing() {
    let mut sim = Simulation::headless(builtins::floating_block_scene()).expect("scene builds");
    let block = sim.body_id("block").expect("block");
    let with_block = sim.pool().liquid_height();

    sim.set_body_visible(block, false).expect("hide");
    assert!(sim.pool().liquid_height() < with_block);
    assert!((sim.pool().liquid_height() - 0.1 / 0.36).abs() < 1e-12);
    let report = *sim.body_report(block).expect("report");
    assert!(!report.visible);
    assert_eq!(report.buoyant_force, DVec2::ZERO);

    let parked = sim.body_position(block).expect("position");
    for _ in 0..30 {
        sim.step(1.0 / 60.0);
    }
    assert_eq!(sim.body_position(block).expect("position"), parked);
}

#[test]
fn fixed_bodies_hold_still_under_buoyancy() {
    let mut sim = Simulation::headless(builtins::compare_scene()).expect("scene builds");
    let pedestal = sim.body_id("pedestal").expect("pedestal");
    let start = sim.body_position(pedestal).expect("position");
    for _ in 0..120 {
        sim.step(1.0 / 60.0);
    }
    assert_eq!(sim.body_position(pedestal).expect("position"), start);
    let report = *sim.body_report(pedestal).expect("report");
    assert!(report.fully_submerged);
}

#[test]
fn released_bodies_fall_again() {
    let mut sim = Simulation::headless(builtins::floating_block_scene()).expect("scene builds");
    let block = sim.body_id("block").expect("block");
    sim.drag_body(block, DVec2::new(0.0, 0.8)).expect("drag");
    for _ in 0..10 {
        sim.step(1.0 / 60.0);
    }
    assert_eq!(sim.body_position(block).expect("position"), DVec2::new(0.0, 0.8));

    sim.release_body(block).expect("release");
    sim.step(1.0 / 60.0);
    assert!(sim.body_position(block).expect("position").y < 0.8);
}
