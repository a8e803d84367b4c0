use buoyancy::{
    boat_design, builtins, BodyId, BodyShape, BodySpec, BoatDesign, Material, PointMassEngine, Simulation, SpillState, DVec2,
};

const DT: f64 = 1.0 / 60.0;

fn boat_sim() -> (Simulation<PointMassEngine>, BodyId, f64) {
    let sim = Simulation::headless(builtins::boat_scene()).expect("scene builds");
    let boat = sim.boat_body().expect("boat");
    let height = sim.body(boat).expect("body").shape.height;
    (sim, boat, height)
}

fn carried(sim: &Simulation<PointMassEngine>) -> f64 {
    sim.boat_basin().expect("boat basin").liquid_volume()
}

#[test]
fn submerged_boat_fills_then_spills_everything_back() {
    let (mut sim, boat, height) = boat_sim();
    let initial_pool = sim.pool().liquid_volume();
    let initial_total = sim.total_liquid_volume();
    assert_eq!(sim.spill_state(), Some(SpillState::Empty));

    sim.drag_body(boat, DVec2::new(-0.15, 0.01 + 0.5 * height)).expect("drag under");
    let mut saw_filling = false;
    for _ in 0..240 {
        sim.step(DT);
        saw_filling |= sim.spill_state() == Some(SpillState::Filling);
        assert!((sim.total_liquid_volume() - initial_total).abs() < 1e-12, "liquid created or lost while filling");
    }
    assert!(saw_filling);
    assert_eq!(sim.spill_state(), Some(SpillState::Full));
    let capacity = sim.boat_basin().expect("boat basin").capacity();
    assert!((carried(&sim) - capacity).abs() < 1e-9, "carried {} of {capacity}", carried(&sim));
    let expected_capacity = boat_design().interior_capacity() * 10.0;
    assert!((capacity - expected_capacity).abs() < 1e-9);

    let report = *sim.body_report(boat).expect("report");
    assert!(report.fully_submerged);
    assert_eq!(report.submerged_fraction, 1.0);
    assert!((report.carried_mass - 1000.0 * capacity).abs() < 1e-6);

    sim.drag_body(boat, DVec2::new(-0.15, 0.6 + 0.5 * height)).expect("drag out");
    let mut saw_spilling = false;
    for _ in 0..240 {
        sim.step(DT);
        saw_spilling |= sim.spill_state() == Some(SpillState::Spilling);
        assert!((sim.total_liquid_volume() - initial_total).abs() < 1e-12, "liquid created or lost while spilling");
    }
    assert!(saw_spilling);
    assert_eq!(sim.spill_state(), Some(SpillState::Empty));
    assert_eq!(carried(&sim), 0.0);
    assert!((sim.pool().liquid_volume() - initial_pool).abs() < 1e-9);
}

#[test]
fn transfer_rate_is_bounded_by_fill_speed() {
    let (mut sim, boat, height) = boat_sim();
    sim.drag_body(boat, DVec2::new(-0.15, 0.01 + 0.5 * height)).expect("drag under");
    let dbg = sim.step_dbg(DT);
    let max = sim.tuning().fill_speed * 0.01 * DT;
    assert!(dbg.transfer > 0.0);
    assert!(dbg.transfer <= max + 1e-15, "moved {} in one step, limit {max}", dbg.transfer);
    assert_eq!(dbg.spill_state, Some(SpillState::Filling));
    assert!(dbg.carried_weight.y < 0.0);
}

#[test]
fn floating_boat_above_the_surface_does_not_fill() {
    let (mut sim, boat, _) = boat_sim();
    for _ in 0..600 {
        sim.step(DT);
    }
    assert_eq!(carried(&sim), 0.0);
    assert_eq!(sim.spill_state(), Some(SpillState::Empty));
    let report = *sim.body_report(boat).expect("report");
    assert!(!report.fully_submerged);
    assert!(report.submerged_fraction > 0.0 && report.submerged_fraction < 1.0);
}

#[test]
fn hiding_the_boat_returns_its_liquid_at_once() {
    let (mut sim, boat, height) = boat_sim();
    let initial_pool = sim.pool().liquid_volume();
    sim.drag_body(boat, DVec2::new(-0.15, 0.01 + 0.5 * height)).expect("drag under");
    for _ in 0..30 {
        sim.step(DT);
    }
    assert!(carried(&sim) > 0.0);
    assert_eq!(sim.spill_state(), Some(SpillState::Filling));

    sim.set_body_visible(boat, false).expect("hide");
    assert_eq!(carried(&sim), 0.0);
    assert_eq!(sim.spill_state(), Some(SpillState::Empty));
    assert!((sim.pool().liquid_volume() - initial_pool).abs() < 1e-12);
    assert_eq!(sim.pool().child(), None);
    assert!(!sim.body_report(boat).expect("report").visible);

    // Hidden boats hold nothing, and stay out of every basin.
    let basin = sim.boat().expect("boat").basin;
    assert_eq!(sim.set_liquid_volume(basin, 0.001).expect("edit"), 0.0);
    sim.step(DT);
    assert_eq!(carried(&sim), 0.0);

    sim.set_body_visible(boat, true).expect("show");
    assert_eq!(sim.pool().child(), Some(basin));
}

#[test]
fn shrinking_a_full_boat_pours_the_excess_into_the_pool() {
    let (mut sim, boat, height) = boat_sim();
    let initial_total = sim.total_liquid_volume();
    sim.drag_body(boat, DVec2::new(-0.15, 0.01 + 0.5 * height)).expect("drag under");
    for _ in 0..240 {
        sim.step(DT);
    }
    assert_eq!(sim.spill_state(), Some(SpillState::Full));
    let bottom_before = sim.body_position(boat).expect("position").y - 0.5 * height;

    let stored = sim.set_boat_volume(0.005).expect("resize");
    assert_eq!(stored, 0.005);
    let new_height = sim.body(boat).expect("body").shape.height;
    assert!((new_height / height - 0.5f64.cbrt()).abs() < 1e-9);
    let bottom_after = sim.body_position(boat).expect("position").y - 0.5 * new_height;
    assert!((bottom_after - bottom_before).abs() < 1e-12);

    let capacity = sim.boat_basin().expect("boat basin").capacity();
    assert!((carried(&sim) - capacity).abs() < 1e-12);
    assert!((sim.total_liquid_volume() - initial_total).abs() < 1e-12);
    assert!((sim.boat().expect("boat").multiplier - BoatDesign::multiplier_for_volume(0.005)).abs() < 1e-12);
}

#[test]
fn reset_empties_the_boat_and_restores_the_pool() {
    let (mut sim, boat, height) = boat_sim();
    sim.drag_body(boat, DVec2::new(-0.15, 0.01 + 0.5 * height)).expect("drag under");
    for _ in 0..60 {
        sim.step(DT);
    }
    sim.set_boat_volume(0.02).expect("resize");
    sim.reset();

    assert_eq!(carried(&sim), 0.0);
    assert_eq!(sim.spill_state(), Some(SpillState::Empty));
    assert_eq!(sim.pool().liquid_volume(), 0.1);
    assert_eq!(sim.boat().expect("boat").volume, 0.01);
    assert!(!sim.body(boat).expect("body").dragged);
    let spec = builtins::boat_scene().boat.expect("boat");
    assert_eq!(sim.body_position(boat).expect("position"), spec.position);
}

#[test]
fn partly_filled_floating_boat_holds_its_load() {
    let (mut sim, _, _) = boat_sim();
    let basin = sim.boat().expect("boat").basin;
    let half = 0.5 * sim.boat_basin().expect("boat basin").capacity();
    assert!((sim.set_liquid_volume(basin, half).expect("edit") - half).abs() < 1e-15);
    assert_eq!(sim.spill_state(), Some(SpillState::Holding));

    let total = sim.total_liquid_volume();
    for _ in 0..600 {
        let dbg = sim.step_dbg(DT);
        assert_eq!(dbg.transfer, 0.0);
        assert_eq!(dbg.spill_state, Some(SpillState::Holding));
        assert!((sim.total_liquid_volume() - total).abs() < 1e-12);
    }
    assert!((carried(&sim) - half).abs() < 1e-12);
}

#[test]
fn cargo_entering_a_full_boat_pushes_liquid_into_the_pool() {
    let mut scene = builtins::boat_scene();
    let boat_spec = scene.boat.clone().expect("boat");
    let hull = boat_design().hull_shape(BoatDesign::multiplier_for_volume(boat_spec.volume));
    let rim = boat_spec.position.y + 0.5 * hull.height;
    let cargo = BodyShape::cube(0.0005);
    scene.bodies.push(BodySpec {
        name: "cargo".into(),
        shape: cargo,
        material: Material::Steel,
        position: DVec2::new(boat_spec.position.x, rim + 0.001 + 0.5 * cargo.height),
        fixed: false,
        visible: true,
    });

    let mut sim = Simulation::headless(scene).expect("scene builds");
    let boat = sim.boat_body().expect("boat");
    sim.drag_body(boat, boat_spec.position).expect("hold boat");
    let basin = sim.boat().expect("boat").basin;
    let capacity = sim.boat_basin().expect("boat basin").capacity();
    assert!((sim.set_liquid_volume(basin, 1.0).expect("edit") - capacity).abs() < 1e-15);
    assert_eq!(sim.spill_state(), Some(SpillState::Full));

    let total = sim.total_liquid_volume();
    let pool_before = sim.pool().liquid_volume();
    let mut boat_overflow = 0.0;
    for _ in 0..10 {
        let dbg = sim.step_dbg(DT);
        assert_eq!(dbg.pool_overflow, 0.0);
        boat_overflow += dbg.boat_overflow;
        assert!((sim.total_liquid_volume() - total).abs() < 1e-12, "liquid created or lost");
    }
    assert!(boat_overflow > 0.0, "cargo never displaced liquid out of the boat");
    assert!((sim.pool().liquid_volume() - (pool_before + boat_overflow)).abs() < 1e-12);
    assert!((carried(&sim) - (capacity - boat_overflow)).abs() < 1e-12);
}
