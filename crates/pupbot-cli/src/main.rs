//! `pupbot` – puppy controller entry point.
//!
//! This binary is the ignition switch for the stack.  It:
//!
//! 1. Checks for `~/.pupbot/config.toml`, writing the reference-build
//!    defaults on first run.
//! 2. Validates the rig assembly and fails fast on a configuration fault.
//! 3. Runs the behavior loop against the in-process simulation rig with a
//!    scripted demo tape (three pets, the bathroom routine, then exit).
//! 4. Intercepts **Ctrl-C** by injecting the exit button, so shutdown
//!    always flows through the loop's own cleanup sequence.
//!
//! On a physical robot the simulated drivers are the only thing that
//! changes: real drivers implementing the `pupbot-hal` traits slot into
//! the same [`Rig`].

mod config;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use colored::Colorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};

use pupbot_hal::channel::{AngleTransform, MotorChannel};
use pupbot_hal::clock::MonotonicClock;
use pupbot_hal::input::ButtonPad;
use pupbot_hal::rig::Rig;
use pupbot_hal::sim::{
    SimButtonPad, SimDisplay, SimDisplayHandle, SimLight, SimMotor, SimMotorHandle, SimSpeaker,
    SimSpeakerHandle, SimTouchSensor,
};
use pupbot_hal::Clock;
use pupbot_runtime::Puppy;
use pupbot_types::{Button, PupError};

fn main() {
    // ── Structured logging ────────────────────────────────────────────────
    // Initialise tracing-subscriber using RUST_LOG (defaults to "info").
    // Set PUPBOT_LOG_FORMAT=json to emit newline-delimited JSON logs.
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("PUPBOT_LOG_FORMAT").as_deref() == Ok("json") {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(true)
            .compact()
            .init();
    }

    print_banner();

    // ── Configuration ─────────────────────────────────────────────────────
    let mut cfg = match config::load() {
        Ok(Some(cfg)) => {
            println!(
                "  Config loaded from {}",
                config::config_path().display().to_string().bold()
            );
            cfg
        }
        Ok(None) => {
            let cfg = config::Config::default();
            match config::save(&cfg) {
                Ok(()) => println!(
                    "  First run: wrote default config to {}",
                    config::config_path().display().to_string().bold()
                ),
                Err(e) => println!("{}: {}", "Could not write default config".yellow(), e),
            }
            cfg
        }
        Err(e) => {
            println!("{}: {}", "Config error".red(), e);
            println!("  Using the default configuration.");
            config::Config::default()
        }
    };

    config::apply_env_overrides(&mut cfg);
    if let Err(e) = cfg.validate() {
        println!("{}: {}", "Invalid rig".red().bold(), e);
        std::process::exit(1);
    }

    // ── Ctrl-C handler ────────────────────────────────────────────────────
    // The flag is read by the button pad wrapper below, which reports the
    // exit button held, so Ctrl-C shuts down through the loop's own
    // cleanup path (head stopped, angle re-zeroed, ready light).
    let shutdown = Arc::new(AtomicBool::new(false));
    let shutdown_flag = shutdown.clone();
    if let Err(e) = ctrlc::set_handler(move || {
        println!();
        println!("{}", "Ctrl-C received – pressing the exit button".yellow());
        shutdown_flag.store(true, Ordering::SeqCst);
    }) {
        warn!(error = %e, "failed to install Ctrl-C handler; use the scripted exit");
    }

    // ── Demo run on the simulation rig ────────────────────────────────────
    let clock = MonotonicClock::new();
    let (rig, handles) = match build_demo_rig(&cfg, clock.clone(), shutdown) {
        Ok(built) => built,
        Err(e) => {
            println!("{}: {}", "Invalid rig".red().bold(), e);
            std::process::exit(1);
        }
    };

    let rng = match cfg.seed {
        Some(seed) => {
            info!(seed, "seeding expression timers");
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };

    println!(
        "  Demo: three pets, one bathroom break.  {} to stop early.\n",
        "Ctrl-C".bold()
    );

    let mut puppy = Puppy::new(rig, clock, rng);
    match puppy.run() {
        Ok(()) => {
            println!();
            println!("{}", "  ✓ Clean shutdown.".green());
            print_summary(&handles);
        }
        Err(e) => {
            println!("{}: {}", "Hardware fault".red().bold(), e);
            std::process::exit(1);
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Demo rig assembly
// ─────────────────────────────────────────────────────────────────────────────

/// Handles kept for the end-of-run summary.
struct DemoHandles {
    head: SimMotorHandle,
    right_leg: SimMotorHandle,
    display: SimDisplayHandle,
    speaker: SimSpeakerHandle,
}

/// A button pad that reports the exit button held once Ctrl-C has fired,
/// and otherwise defers to the scripted demo tape.
struct SignalAwarePad {
    inner: Box<dyn ButtonPad>,
    shutdown: Arc<AtomicBool>,
}

impl ButtonPad for SignalAwarePad {
    fn pressed(&mut self) -> Result<Vec<Button>, PupError> {
        if self.shutdown.load(Ordering::SeqCst) {
            return Ok(vec![Button::Center]);
        }
        self.inner.pressed()
    }
}

/// Build the simulated rig from the validated config, wiring each motor
/// channel with the transform its port assignment dictates.
fn build_demo_rig(
    cfg: &config::Config,
    clock: Arc<dyn Clock>,
    shutdown: Arc<AtomicBool>,
) -> Result<(Rig, DemoHandles), PupError> {
    let head_transform = AngleTransform::new(cfg.head.direction, cfg.head.gears.as_ref())?;
    let left_transform = AngleTransform::new(cfg.left_leg.direction, cfg.left_leg.gears.as_ref())?;
    let right_transform =
        AngleTransform::new(cfg.right_leg.direction, cfg.right_leg.gears.as_ref())?;

    info!(
        head = ?cfg.head.port,
        left_leg = ?cfg.left_leg.port,
        right_leg = ?cfg.right_leg.port,
        touch = ?cfg.touch,
        "simulated rig assembled"
    );

    let (head, head_handle) = SimMotor::new("head");
    let (left, _left_handle) = SimMotor::new("left_leg");
    let (right, right_handle) = SimMotor::new("right_leg");
    let (display, display_handle) = SimDisplay::new();
    let (speaker, speaker_handle) = SimSpeaker::new();
    let (light, _light_handle) = SimLight::new();

    // Demo tape: one sample per tick.  Pets on ticks 5, 7, and 9 arm the
    // bathroom routine on tick 10; the scripted exit lands on tick 13.
    let touch_tape = vec![false, false, false, false, true, false, true, false, true];
    let mut button_tape: Vec<Vec<Button>> = vec![Vec::new(); 12];
    button_tape.push(vec![Button::Center]);

    let rig = Rig {
        head: MotorChannel::new(head, head_transform, clock.clone()),
        left_leg: MotorChannel::new(left, left_transform, clock.clone()),
        right_leg: MotorChannel::new(right, right_transform, clock),
        buttons: Box::new(SignalAwarePad {
            inner: SimButtonPad::scripted(button_tape),
            shutdown,
        }),
        touch: SimTouchSensor::scripted(touch_tape),
        display,
        speaker,
        light,
    };
    let handles = DemoHandles {
        head: head_handle,
        right_leg: right_handle,
        display: display_handle,
        speaker: speaker_handle,
    };
    Ok((rig, handles))
}

fn print_summary(handles: &DemoHandles) {
    println!("  Run summary:");
    println!("    sounds played  : {}", handles.speaker.sounds().len());
    println!("    faces drawn    : {}", handles.display.images().len());
    println!(
        "    right leg angle: {:.0}° (motor frame)",
        handles.right_leg.angle()
    );
    println!(
        "    head angle     : {:.0}° (motor frame)",
        handles.head.angle()
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Banner
// ─────────────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("{}", r#"   ___  __  _____  ___  ____  ______"#.bold().cyan());
    println!("{}", r#"  / _ \/ / / / _ \/ _ )/ __ \/_  __/"#.bold().cyan());
    println!("{}", r#" / ___/ /_/ / ___/ _  / /_/ / / /   "#.bold().cyan());
    println!("{}", r#"/_/   \____/_/  /____/\____/ /_/    "#.bold().cyan());
    println!();
    println!(
        "  {} {}",
        "pupbot".bold(),
        format!("v{}", env!("CARGO_PKG_VERSION")).dimmed()
    );
    println!("  Reactive controller for a small legged robot");
    println!();
}
