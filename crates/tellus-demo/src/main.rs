//! Headless walk across a spinning, cratered body.
//!
//! Configuration is loaded from `config.ron` and can be overridden via CLI
//! flags. Run with `cargo run -p tellus-demo`, or for example
//! `cargo run -p tellus-demo -- --radius 40 --spin-rate 0.2 --relief 0.08`.

mod body;

use std::path::PathBuf;

use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use tellus_config::{CliArgs, Config};
use tellus_input::{
    CursorCapture, HeadlessCursor, KeyCode, KeyInput, MouseButton, Platform, WalkAction,
    WalkBindings,
};
use tellus_scene::SceneGraph;
use tellus_walk::{BodyInfo, EnterOptions, SessionContext, SurfaceWalker, WalkWorld};
use tracing::{error, info, warn};

fn main() {
    let args = CliArgs::parse();

    let config_dir = args
        .config
        .clone()
        .or_else(tellus_config::default_config_dir)
        .unwrap_or_else(|| PathBuf::from(".tellus"));

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config: {e}, using defaults");
        Config::default()
    });
    config.apply_cli_overrides(&args);

    let log_dir = config_dir.join("logs");
    tellus_log::init_logging(Some(&log_dir), Some(&config));

    let bindings = load_bindings(&config_dir, &config);
    run(&config, bindings);
}

fn load_bindings(config_dir: &std::path::Path, config: &Config) -> WalkBindings {
    let path = config_dir.join("bindings.ron");
    let mut bindings = if path.exists() {
        WalkBindings::load(&path)
    } else {
        WalkBindings::default()
    };
    if let Err(e) = bindings.apply_overrides(&config.input.keybindings) {
        warn!("Ignoring keybinding overrides: {e}");
    }
    bindings
}

fn run(config: &Config, bindings: WalkBindings) {
    let mut scene = SceneGraph::new();
    let body = match body::spawn_body(&mut scene, &config.body) {
        Ok(body) => body,
        Err(e) => {
            error!("Could not build the body mesh: {e}");
            return;
        }
    };
    let mut camera = body::orbit_camera(config.body.radius, config.demo.camera_distance);
    let mut cursor = HeadlessCursor::granting();

    let body_info = BodyInfo {
        radius: config.body.radius,
        gravity: config.body.gravity,
    };
    let context = SessionContext {
        body_center: Some(body.center),
        spin_frame: Some(body.spin_frame),
        surface: Some(body.surface),
        body_info: Some(Box::new(move || body_info)),
        platform: Platform::detect(),
    };
    let mut walker = SurfaceWalker::new(context, config.walk.clone(), bindings.clone());

    let orbit_near = camera.near;
    let entered = walker.enter(
        &mut WalkWorld {
            scene: &mut scene,
            camera: &mut camera,
            cursor: &mut cursor,
        },
        EnterOptions::on_exit(|| info!("Walk session closed")),
    );
    if !entered {
        warn!("Walk mode unavailable on this platform or scene");
        return;
    }
    info!(near = camera.near, orbit_near, "Walking");

    let dt = config.demo.dt;
    let frames = config.demo.frames;
    let frames_per_second = (1.0 / dt).round().max(1.0) as u32;
    let jump_every = (config.demo.jump_interval / dt).round() as u32;
    let key = |action| {
        bindings
            .keys_for(action)
            .next()
            .map(KeyInput::code)
            .unwrap_or_else(|| KeyInput::code(KeyCode::Escape))
    };
    let forward = key(WalkAction::MoveForward);
    let jump = key(WalkAction::Jump);
    let exit = key(WalkAction::Exit);
    let mut rng = Xoshiro256StarStar::seed_from_u64(config.body.seed);

    for frame in 0..frames {
        body.spin.advance(&mut scene, body.spin_frame, dt);

        let mut world = WalkWorld {
            scene: &mut scene,
            camera: &mut camera,
            cursor: &mut cursor,
        };
        if frame == 0 {
            walker.handle_key_down(&mut world, &forward);
            walker.handle_pointer_down(&mut world, MouseButton::Left);
        }
        if frame == frames / 2 {
            walker.handle_key_up(&forward);
            walker.handle_pointer_up(&mut world, MouseButton::Left);
        }
        if jump_every > 0 && frame > 0 && frame % jump_every == 0 {
            walker.handle_key_down(&mut world, &jump);
            walker.handle_key_up(&jump);
        }
        walker.handle_pointer_motion(rng.gen_range(-4.0..4.0), rng.gen_range(-1.0..1.0));
        walker.update(&mut world, dt);

        if let Some(signal) = cursor.take_signal() {
            walker.handle_capture_change(signal);
        }
        if !walker.is_active() {
            warn!(frame, "Walk session ended early");
            break;
        }
        if frame % frames_per_second == 0 {
            let t = walker.telemetry();
            info!(
                second = frame / frames_per_second,
                grounded = t.grounded,
                altitude = t.altitude,
                speed = t.tangential_speed,
                vertical = t.vertical_speed,
                yaw = t.yaw.to_degrees(),
                pitch = t.pitch.to_degrees(),
                "Telemetry"
            );
        }
    }

    let mut world = WalkWorld {
        scene: &mut scene,
        camera: &mut camera,
        cursor: &mut cursor,
    };
    if !walker.handle_key_down(&mut world, &exit) {
        walker.exit(&mut world);
    }
    info!(
        near = camera.near,
        restored = camera.near == orbit_near,
        active = walker.is_active(),
        "Back in orbit"
    );
}
