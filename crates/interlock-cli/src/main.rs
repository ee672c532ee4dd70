//! `interlock-cli` – demo walkthrough of the guard stack.
//!
//! Wires a simulated patrol robot to guarded hardware actions and walks
//! through the four canonical scenarios:
//!
//! 1. healthy robot → the guarded action executes normally;
//! 2. low battery → the action is blocked with a structured result, no crash;
//! 3. dry-run → rules pass but the hardware is never touched;
//! 4. overheated robot with the raise policy → a violation is signalled.

mod config;

use std::path::Path;
use std::sync::Mutex;

use colored::Colorize;
use tracing::info;

use interlock_hal::{MotionDriver, SimMotion};
use interlock_kernel::{BatteryMin, Guard, MaxTemp, Outcome, RequireConnectivity, Subject};
use interlock_types::{InterlockError, OnFail, StateSnapshot};

use crate::config::Config;

/// Demo robot: sensor readings plus a dry-run toggle.
struct PatrolRobot {
    battery: f64,
    temperature: f64,
    connection: String,
    dry_run: bool,
}

impl PatrolRobot {
    fn new(battery: f64, temperature: f64, connection: &str) -> Self {
        Self {
            battery,
            temperature,
            connection: connection.to_string(),
            dry_run: false,
        }
    }
}

impl Subject for PatrolRobot {
    fn state_snapshot(&self) -> StateSnapshot {
        StateSnapshot::new()
            .with("battery", self.battery)
            .with("temperature", self.temperature)
            .with("connection", self.connection.as_str())
    }

    fn dry_run(&self) -> bool {
        self.dry_run
    }
}

fn main() {
    init_logging();

    let cfg = match Config::load(Path::new("interlock.toml")) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{}: {e}", "Error loading config".red());
            Config::default()
        }
    };
    info!(?cfg, "demo configuration loaded");

    println!("{}", "── Interlock demo ──".bold());
    println!();

    let driver = Mutex::new(SimMotion::new("vacuum_1"));

    // Strict safety on motion: battery level and connectivity. Blocked calls
    // come back as data, so the script never crashes on a refusal.
    let clean_zone = Guard::new()
        .with_rule(Box::new(BatteryMin {
            min_percent: cfg.min_battery_percent,
        }))
        .with_rule(Box::new(RequireConnectivity::new(
            cfg.required_connection.clone(),
        )))
        .wrap(
            |_robot: &PatrolRobot, zone: &str| -> Result<&'static str, InterlockError> {
                driver.lock().expect("driver mutex poisoned").move_to(zone)?;
                Ok("Cleaned")
            },
        );

    println!("{}", "1. Healthy robot".bold());
    let robot = PatrolRobot::new(80.0, 50.0, "WIFI");
    report(clean_zone.call(&robot, "Zone A"));

    println!("{}", "2. Low battery (zero-crash)".bold());
    let dying = PatrolRobot::new(10.0, 50.0, "WIFI");
    report(clean_zone.call(&dying, "Zone B"));

    println!("{}", "3. Dry run (simulation)".bold());
    let mut rehearsing = PatrolRobot::new(80.0, 50.0, "WIFI");
    rehearsing.dry_run = true;
    report(clean_zone.call(&rehearsing, "Zone C"));

    // Critical operation: silently returning an error object is not
    // acceptable here, so the guard raises instead.
    let emergency_shutdown = Guard::new()
        .with_rule(Box::new(MaxTemp {
            max_celsius: cfg.max_temp_celsius,
        }))
        .on_fail(OnFail::Raise)
        .wrap(
            |_robot: &PatrolRobot, _args: ()| -> Result<&'static str, InterlockError> {
                driver.lock().expect("driver mutex poisoned").halt()?;
                Ok("Shutdown complete")
            },
        );

    println!("{}", "4. Overheated robot, raise policy".bold());
    let overheated = PatrolRobot::new(80.0, 95.0, "WIFI");
    match emergency_shutdown.call(&overheated, ()) {
        Ok(outcome) => report(Ok(outcome)),
        Err(InterlockError::Violation {
            message,
            suggestion,
        }) => {
            println!("  {} {message}", "caught violation:".red().bold());
            println!("  {} {suggestion}", "hint:".yellow());
            println!();
        }
        Err(e) => {
            println!("  {} {e}", "unexpected error:".red().bold());
            println!();
        }
    }

    let unit = driver.lock().expect("driver mutex poisoned");
    println!(
        "{} {:?} (halted: {})",
        "Hardware actually visited:".bold(),
        unit.visited(),
        unit.is_halted()
    );
}

/// Print one guarded-call outcome: executed value, hardware fault, suppressed
/// record, or raised violation.
fn report(call: Result<Outcome<Result<&'static str, InterlockError>>, InterlockError>) {
    match call {
        Ok(Outcome::Executed(Ok(value))) => {
            println!("  {} {value}", "done:".green().bold());
        }
        Ok(Outcome::Executed(Err(fault))) => {
            println!("  {} {fault}", "hardware fault:".red().bold());
        }
        Ok(Outcome::Suppressed(result)) => {
            if result.is_error() {
                println!(
                    "  {} {} (dry_run: {})",
                    "blocked:".red().bold(),
                    result.reason,
                    result.dry_run
                );
            } else {
                println!("  {} {}", "simulated:".cyan().bold(), result.reason);
            }
        }
        Err(e) => {
            println!("  {} {e}", "violation:".red().bold());
        }
    }
    println!();
}

/// Initialise tracing-subscriber from `RUST_LOG` (default `info`).
/// Set `INTERLOCK_LOG_FORMAT=json` to emit newline-delimited JSON logs.
fn init_logging() {
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    if std::env::var("INTERLOCK_LOG_FORMAT").as_deref() == Ok("json") {
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
}
