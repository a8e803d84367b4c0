use buoyancy::SpillState;
use runner::{builtin_scene, load_config, run, Config, ScriptAction};

const BOAT_ROUND_TRIP: &str = r#"
dt = 0.016666666666666666
steps = 480
log_every = 0
scene = "boat"

[[script]]
at = 0.0
action = "drag"
body = "boat"
position = [-0.15, 0.1]

[[script]]
at = 4.0
action = "drag"
body = "boat"
position = [-0.15, 0.7]
"#;

#[test]
fn default_config_floats_the_block() {
    let cfg = load_config(None).expect("default config");
    assert_eq!(cfg, Config::default());
    let cfg = Config { steps: 1200, log_every: 0, ..cfg };
    let summary = run(&cfg, builtin_scene(&cfg.scene).expect("scene")).expect("run");

    assert_eq!(summary.steps, 1200);
    assert!((summary.time - 20.0).abs() < 1e-9);
    let (name, block) = &summary.bodies[0];
    assert_eq!(name, "block");
    assert!((block.submerged_fraction - 0.5).abs() < 0.01, "fraction {}", block.submerged_fraction);
    assert_eq!(summary.total_liquid_volume, summary.initial_liquid_volume);
}

#[test]
fn scripted_boat_fills_and_spills_without_losing_liquid() {
    let cfg: Config = toml::from_str(BOAT_ROUND_TRIP).expect("config parses");
    assert_eq!(cfg.script.len(), 2);
    assert!(matches!(cfg.script[0].action, ScriptAction::Drag { .. }));

    let summary = run(&cfg, builtin_scene(&cfg.scene).expect("scene")).expect("run");
    assert_eq!(summary.spill_state, Some(SpillState::Empty));
    assert!((summary.total_liquid_volume - summary.initial_liquid_volume).abs() < 1e-9);
}

#[test]
fn script_edits_apply_at_their_time() {
    let cfg: Config = toml::from_str(
        r#"
        steps = 60
        log_every = 0

        [[script]]
        at = 0.5
        action = "set_liquid_volume"
        volume = 0.2

        [[script]]
        at = 0.5
        action = "set_material"
        body = "block"
        material = "ice"

        [[script]]
        at = 0.2
        action = "set_gravity"
        gravity = "jupiter"
        "#,
    )
    .expect("config parses");
    let summary = run(&cfg, builtin_scene("floating_block").expect("scene")).expect("run");
    assert_eq!(summary.total_liquid_volume, 0.2);
    assert!(summary.pool_height > 0.2 / 0.36);
}

#[test]
fn bad_inputs_are_reported() {
    assert!(builtin_scene("lagoon").is_err());

    let cfg: Config = toml::from_str(
        r#"
        steps = 10
        [[script]]
        at = 0.0
        action = "hide"
        body = "nobody"
        "#,
    )
    .expect("config parses");
    let err = run(&cfg, builtin_scene("floating_block").expect("scene")).expect_err("unknown body");
    assert!(format!("{err:#}").contains("nobody"));

    let cfg = Config { dt: 0.0, ..Config::default() };
    assert!(run(&cfg, builtin_scene("floating_block").expect("scene")).is_err());

    assert!(load_config(Some(std::path::Path::new("/nonexistent/run.toml"))).is_err());
}
