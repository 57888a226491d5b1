//! Nudge Arm - joystick-driven pan/tilt arm with a toggle claw
//!
//! Runs the control loop against a real gamepad or the built-in simulator
//! script. Servo commands go to the console sink.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::*;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nudge_arm::config::{ArmConfig, HoldMode};
use nudge_arm::control::ControlLoop;
use nudge_arm::hal::{AnalogInput, ButtonInput, Clock, MonotonicClock};
use nudge_arm::input::{self, gamepad, GamepadJoystick, StickMapping};
use nudge_arm::output::ConsoleServos;

/// Joystick source
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Backend {
    /// Replay the built-in demo gesture
    Sim,
    /// Read the first connected gamepad
    Gamepad,
}

/// Nudge Arm - drive a pan/tilt servo arm from a self-centering joystick
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Joystick source
    #[arg(short, long, value_enum, default_value = "sim")]
    backend: Backend,

    /// Log level (error, warn, info, debug, trace)
    #[arg(short, long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Stop after this many cycles (default: run forever, or the script length in sim)
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Delay between cycles in microseconds
    #[arg(long, default_value = "1000")]
    cycle_delay_us: u64,

    /// Gamepad button that toggles the claw
    #[arg(long, default_value = "south")]
    claw_button: String,

    /// Keep cycling while the claw settles instead of pausing the loop
    #[arg(long)]
    deferred_hold: bool,

    /// Print the compiled-in tuning and exit
    #[arg(long)]
    print_config: bool,

    /// List detected gamepads and exit
    #[arg(long)]
    diagnostics: bool,
}

fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let args = Args::parse();
    init_logging(&args.log_level)?;

    let mut config = ArmConfig::default();
    if args.deferred_hold {
        config.claw.hold_mode = HoldMode::Deferred;
    }

    if args.print_config {
        print_config(&config)?;
        return Ok(());
    }

    if args.diagnostics {
        input::print_gamepad_diagnostics(config.joystick.max_reading);
        return Ok(());
    }

    config.validate().context("Invalid compiled-in configuration")?;

    let pacing = (args.cycle_delay_us > 0).then(|| Duration::from_micros(args.cycle_delay_us));

    info!("Starting Nudge Arm ({:?} backend)...", args.backend);

    match args.backend {
        Backend::Sim => {
            let center = config.joystick.max_reading / 2;
            let (stick, button, script_cycles) = input::demo_script(center, config.joystick.max_reading);
            let max_cycles = args.max_cycles.or(Some(script_cycles as u64));
            drive(config, stick, button, max_cycles, pacing)
        }
        Backend::Gamepad => {
            let claw_button = gamepad::parse_button(&args.claw_button)?;
            let (stick, button) =
                GamepadJoystick::open(StickMapping::default(), claw_button, config.joystick.max_reading)
                    .context("Failed to open gamepad backend")?;
            drive(config, stick, button, args.max_cycles, pacing)
        }
    }
}

/// Home the arm, run the loop, and report what the servos were told
fn drive<I, B>(
    config: ArmConfig,
    stick: I,
    button: B,
    max_cycles: Option<u64>,
    pacing: Option<Duration>,
) -> Result<()>
where
    I: AnalogInput,
    B: ButtonInput,
{
    let clock = MonotonicClock::new();
    let mut control = ControlLoop::new(config, stick, ConsoleServos::new(), button, clock)?;

    control.home();
    info!("✅ Arm ready, nudge the stick to move");

    let started = control.clock_mut().now();
    let cycles = control.run(max_cycles, pacing);
    let elapsed = control.clock_mut().now().saturating_sub(started);

    info!(
        "Ran {} cycles in {:.2}s, pan at {:.1}°, tilt at {:.1}°, claw {}",
        cycles,
        elapsed.as_secs_f32(),
        control.pan_state().current_angle,
        control.tilt_state().current_angle,
        if control.toggle_state().is_open { "open" } else { "closed" }
    );
    control.servos().log_summary();

    Ok(())
}

fn print_config(config: &ArmConfig) -> Result<()> {
    let yaml = serde_yaml::to_string(config).context("Failed to serialize configuration")?;

    println!("\n{}", "=== Compiled-in Tuning ===".bold().cyan());
    println!("{}", yaml.trim_end());

    match config.validate() {
        Ok(()) => println!("\n{}", "✅ Configuration is valid".green().bold()),
        Err(e) => println!("\n{} {}", "❌ Configuration is invalid:".red().bold(), e),
    }

    Ok(())
}

fn init_logging(level: &str) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_thread_names(false),
        )
        .init();

    Ok(())
}
