//! # Mechanism Supervisor Demo
//!
//! Scripted reconciliation run against a simulated register bank: loads a
//! mechanism descriptor (falling back to built-in gripper defaults), then
//! walks the joint through a guarded mode sequence with fault injection
//! while the verify tick runs between steps.
//!
//! The simulated hardware is driven inline; the scenario shows a rejected
//! DRIVE request from OFF, the legal OFF → PARK → DRIVE path, a joint fault
//! with its operator-facing summary, and recovery back to PARK.

use clap::Parser;
use dex_common::config::ConfigError;
use dex_common::mechanism::{ControlMode, ModeRequest};
use dex_common::registers::{RegisterMap, SimRegisterBank};
use dex_supervisor::supervisor::MechanismSupervisor;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tracing::{Level, debug, error, info, warn};
use tracing_subscriber::EnvFilter;

/// Fallback descriptor used when no file is present at the descriptor path.
const DEFAULT_DESCRIPTOR: &str = r#"
[mechanism]
name = "left_gripper"
class = "gripper"
time_limit = 2.0

[status]
control_mode = "GripCtrlModeStat"
command_mode = "GripCmdModeStat"
calibration_mode = "GripCalModeStat"
clear_fault_mode = "GripClearFaultStat"
proc_alive = "GripProcAlive"
comm_alive = "GripCommAlive"
bridge_fault = "GripBridgeFault"
joint_fault = "GripJointFault"
bus_voltage_fault = "GripBusVoltFault"
aps_fault = "GripApsFault"
aps1_tol_fault = "GripAps1TolFault"
aps2_tol_fault = "GripAps2TolFault"
enc_drift_fault = "GripEncDriftFault"
velocity_fault = "GripVelocityFault"
limit_fault = "GripLimitFault"
coeffs_loaded = "GripCoeffsLoaded"
current_fault = "GripCurrentFault"

[control]
control_mode = "GripCtrlModeCmd"
command_mode = "GripCmdModeCmd"
calibration_mode = "GripCalModeCmd"
clear_fault_mode = "GripClearFaultCmd"
comm_enable = "GripCommEnable"
sensor_enable = "GripSensorEnable"
"#;

/// Mechanism supervisor — scripted reconciliation demo
#[derive(Parser, Debug)]
#[command(name = "dex_supervisor")]
#[command(author = "dexcore")]
#[command(version)]
#[command(about = "Mode reconciliation supervisor demo on a simulated register bank")]
struct Args {
    /// Path to the mechanism register descriptor TOML.
    #[arg(default_value = "config/gripper.toml")]
    descriptor: PathBuf,

    /// Verify tick period in milliseconds.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Verify ticks run after each scenario step.
    #[arg(long, default_value_t = 3)]
    settle_ticks: u32,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

fn main() {
    let args = Args::parse();
    setup_tracing(&args);

    info!(
        "Mechanism supervisor demo v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run(&args) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("Mechanism supervisor demo complete");
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let map = load_descriptor(&args.descriptor)?;
    info!(
        "Descriptor OK: mechanism={}, class={}, time_limit={}s",
        map.mechanism.name, map.mechanism.class, map.mechanism.time_limit
    );

    let bank = Arc::new(SimRegisterBank::new());
    bank.seed_defaults(&map);

    let mechanism = map.mechanism.name.clone();
    let control_word = map.status.control_mode.clone();
    let joint_fault_bit = map.status.joint_fault.clone();

    let mut supervisor = MechanismSupervisor::new(bank.clone(), map)?;
    let tick = Duration::from_millis(args.tick_ms);

    // ── Healthy and in sync ──
    settle(&mut supervisor, tick, args.settle_ticks);

    // ── DRIVE straight from OFF is refused by the guard ──
    let rejected = supervisor.apply_command(&ModeRequest::empty().with_control(ControlMode::Drive));
    if !rejected.is_empty() {
        info!(
            "Guard refused DRIVE while observed {}",
            rejected[0].observed
        );
    }

    // ── PARK is legal from OFF; the hardware follows ──
    supervisor.apply_command(&ModeRequest::empty().with_control(ControlMode::Park));
    settle(&mut supervisor, tick, args.settle_ticks);
    bank.set_status(&mechanism, &control_word, ControlMode::Park as i32);
    settle(&mut supervisor, tick, args.settle_ticks);

    // ── DRIVE goes through from PARK ──
    supervisor.apply_command(&ModeRequest::empty().with_control(ControlMode::Drive));
    bank.set_status(&mechanism, &control_word, ControlMode::Drive as i32);
    settle(&mut supervisor, tick, args.settle_ticks);
    info!("Actual states: {}", supervisor.actual_states());

    // ── Joint fault injection ──
    bank.set_status(&mechanism, &control_word, ControlMode::Faulted as i32);
    bank.set_status(&mechanism, &joint_fault_bit, 1);
    settle(&mut supervisor, tick, args.settle_ticks);
    info!("Fault summary: {}", supervisor.fault_summary());

    // ── Recovery: clear the fault, park the joint ──
    bank.set_status(&mechanism, &joint_fault_bit, 0);
    supervisor.apply_command(&ModeRequest::empty().with_control(ControlMode::Park));
    bank.set_status(&mechanism, &control_word, ControlMode::Park as i32);
    settle(&mut supervisor, tick, args.settle_ticks);
    info!("Fault summary: {}", supervisor.fault_summary());

    Ok(())
}

/// Run `ticks` verify passes spaced one tick period apart.
fn settle(supervisor: &mut MechanismSupervisor<SimRegisterBank>, tick: Duration, ticks: u32) {
    for _ in 0..ticks {
        let in_sync = supervisor.verify();
        debug!(
            "verify: {} actual: {}",
            in_sync,
            supervisor.actual_states()
        );
        thread::sleep(tick);
    }
}

/// Load the descriptor, falling back to the built-in gripper defaults when
/// no file exists at `path`.
fn load_descriptor(path: &Path) -> Result<RegisterMap, ConfigError> {
    match RegisterMap::load_validated(path) {
        Ok(map) => {
            info!("Loaded descriptor from {}", path.display());
            Ok(map)
        }
        Err(ConfigError::FileNotFound) => {
            warn!(
                "No descriptor at {}. Using built-in gripper defaults.",
                path.display()
            );
            let map = RegisterMap::from_toml(DEFAULT_DESCRIPTOR)?;
            map.validate()?;
            Ok(map)
        }
        Err(e) => Err(e),
    }
}

/// Setup tracing subscriber based on CLI arguments.
fn setup_tracing(args: &Args) {
    let level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
