//! Main rover-side executable entry point.
//!
//! # Architecture
//!
//! The general execution methodology consists of:
//!
//!     - Initialise all modules on the simulated equipment
//!     - Main loop:
//!         - Telecommand processing and handling
//!         - Safe mode handling
//!         - Arm control processing
//!         - Swerve control processing
//!         - Simulation step
//!         - Telemetry
//!
//! # Modules
//!
//! All modules (e.g. `arm_ctrl`) shall meet the following requirements:
//!     1. Provide a public struct implementing the `util::module::State` trait.
//!

// ---------------------------------------------------------------------------
// USE MODULES FROM LIBRARY
// ---------------------------------------------------------------------------

use rov_lib::{
    arm_ctrl::{self, ArmCtrl},
    data_store::DataStore,
    sim::{SimArm, SimSwerveModule, SimSwerveParams},
    swerve_ctrl::{self, SwerveModule},
    tm_server::TmServer,
    CYCLE_FREQUENCY_HZ, CYCLE_PERIOD_S,
};

mod tc_processor;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use color_eyre::{
    eyre::{eyre, WrapErr},
    Report,
};
use log::{debug, info, warn};
use std::env;
use std::thread;
use std::time::{Duration, Instant};

// Internal
use util::{
    logger::{logger_init, LevelFilter},
    module::State,
    script_interpreter::{PendingTcs, ScriptInterpreter},
    session::Session,
};

// ---------------------------------------------------------------------------
// FUNCTIONS
// ---------------------------------------------------------------------------

/// Executable main function, entry point.
fn main() -> Result<(), Report> {
    color_eyre::install()?;

    // ---- EARLY INITIALISATION ----

    // Initialise session
    let session = Session::new("rov_exec", "sessions").wrap_err("Failed to create the session")?;

    // Initialise logger
    logger_init(LevelFilter::Debug, &session).wrap_err("Failed to initialise logging")?;

    // Log information on this execution.
    info!("Rover Executable\n");
    info!("Session directory: {:?}\n", session.session_root);

    // ---- LOAD PARAMETERS ----

    let arm_params: arm_ctrl::Params =
        util::params::load("arm_ctrl.toml").wrap_err("Could not load ArmCtrl params")?;

    let swerve_params: swerve_ctrl::Params =
        util::params::load("swerve_ctrl.toml").wrap_err("Could not load SwerveCtrl params")?;

    info!("Exec parameters loaded");

    // ---- INITIALISE TC SOURCE ----

    // Collect all arguments
    let args: Vec<String> = env::args().collect();

    debug!("CLI arguments: {:?}", args);

    let script_path = script_path_from_args(&args)?;

    info!("Loading script from \"{}\"", script_path);

    let mut script = ScriptInterpreter::new(script_path).wrap_err("Failed to load script")?;

    info!(
        "Loaded script lasts {:.02} s and contains {} TCs\n",
        script.get_duration(),
        script.get_num_tcs()
    );

    // ---- INITIALISE MODULES ----

    info!("Initialising modules...");

    let mut ds = DataStore::default();

    let sim_arm = SimArm::default();
    let mut arm_ctrl = ArmCtrl::init((arm_params, sim_arm.eqpt()))
        .wrap_err("Failed to initialise ArmCtrl")?;
    info!("ArmCtrl init complete");

    let mut sim_swerve = Vec::with_capacity(swerve_params.modules.len());
    let mut swerve_modules = Vec::with_capacity(swerve_params.modules.len());

    for module_params in swerve_params.modules.iter() {
        // Start each simulated wheel pointing forward
        let sim = SimSwerveModule::new(SimSwerveParams::default(), module_params.abs_zero_offset_deg);

        let module = SwerveModule::init((swerve_params.clone(), module_params.clone(), sim.eqpt()))
            .wrap_err_with(|| format!("Failed to initialise swerve module {}", module_params.name))?;

        sim_swerve.push(sim);
        swerve_modules.push(module);
    }
    info!("SwerveCtrl init complete, {} modules", swerve_modules.len());

    let mut tm_server = TmServer::new(&session).wrap_err("Failed to initialise TmServer")?;
    info!("TmServer initialised");

    info!("Module initialisation complete\n");

    // ---- MAIN LOOP ----

    info!("Begining main loop\n");

    loop {
        // Get cycle start time
        let cycle_start_instant = Instant::now();

        // Clear items that need wiping at the start of the cycle
        ds.cycle_start(CYCLE_FREQUENCY_HZ);

        // ---- TELECOMMAND PROCESSING ----

        match script.get_pending_tcs(ds.sim_time_s) {
            PendingTcs::None => (),
            PendingTcs::Some(tc_vec) => {
                for tc in tc_vec.iter() {
                    tc_processor::exec(&mut ds, tc);
                }
            }
            // Exit if end of script reached
            PendingTcs::EndOfScript => {
                info!("End of TC script reached, stopping");
                break;
            }
        }

        // ---- SAFE MODE ----

        if ds.make_safe_pending {
            arm_ctrl.make_safe();
            for module in swerve_modules.iter_mut() {
                module.make_safe();
            }
        }

        // ---- CONTROL ALGORITHM PROCESSING ----

        match arm_ctrl.proc(&ds.arm_ctrl_input) {
            Ok((o, r)) => {
                ds.arm_ctrl_output = Some(o);
                ds.arm_ctrl_status_rpt = r;
            }
            Err(e) => warn!("Error during ArmCtrl processing: {}", e),
        }

        for module in swerve_modules.iter_mut() {
            match module.proc(&ds.swerve_ctrl_input) {
                Ok((o, r)) => {
                    ds.swerve_ctrl_outputs.push(o);
                    ds.swerve_ctrl_status_rpts.push(r);
                }
                Err(e) => warn!("Error during SwerveCtrl processing of {}: {}", module.name(), e),
            }
        }

        // ---- SIMULATION ----

        sim_arm.step(CYCLE_PERIOD_S);
        for sim in sim_swerve.iter() {
            sim.step(CYCLE_PERIOD_S);
        }

        // ---- TELEMETRY ----

        arm_ctrl.write_tm(&mut tm_server);
        for module in swerve_modules.iter() {
            module.write_tm(&mut tm_server);
        }

        if let Err(e) = tm_server.send(&ds) {
            warn!("TmServer error: {}", e)
        }

        // ---- CYCLE MANAGEMENT ----

        let cycle_dur = Instant::now() - cycle_start_instant;

        // Get sleep duration
        match Duration::from_secs_f64(CYCLE_PERIOD_S).checked_sub(cycle_dur) {
            Some(d) => {
                ds.num_consec_cycle_overruns = 0;
                thread::sleep(d);
            }
            None => {
                warn!(
                    "Cycle overran by {:.06} s",
                    cycle_dur.as_secs_f64() - CYCLE_PERIOD_S
                );
                ds.num_consec_cycle_overruns += 1;
            }
        }

        ds.cycle_end();
    }

    // ---- SHUTDOWN ----

    tm_server.flush().wrap_err("Failed to flush telemetry")?;

    info!("End of execution");

    Ok(())
}

/// Get the TC script path, which must be the only argument after the executable name.
fn script_path_from_args(args: &[String]) -> Result<&str, Report> {
    match args {
        [_, path] => Ok(path.as_str()),
        _ => Err(eyre!(
            "Expected the path to a TC script as the only argument, found {} arguments",
            args.len().saturating_sub(1)
        )),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_script_path_from_args() {
        let args = vec!["rov_exec".to_string(), "scripts/demo.tcs".to_string()];
        assert_eq!(script_path_from_args(&args).unwrap(), "scripts/demo.tcs");

        assert!(script_path_from_args(&args[..1]).is_err());
        assert!(script_path_from_args(&[]).is_err());

        let err = script_path_from_args(&[]).unwrap_err();
        assert!(err.to_string().contains("found 0 arguments"));
    }
}
