//! # Swerve Module Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use comms_if::eqpt::mech::PidGains;
use rov_lib::{
    sim::{SimSwerveModule, SimSwerveParams},
    swerve_ctrl::{FeedforwardGains, InputData, ModuleParams, ModuleState, Params, SwerveCmd, SwerveModule},
    CYCLE_PERIOD_S,
};
use util::module::State;

fn swerve_module_benchmark(c: &mut Criterion) {
    // ---- Build a module on simulated equipment ----

    let params = Params {
        drive_gear_ratio: 0.148,
        wheel_circumference_m: 0.319,
        control_period_s: CYCLE_PERIOD_S,
        max_voltage_v: 12.0,
        drive_gains: PidGains { k_p: 1.2, ..Default::default() },
        drive_ff: FeedforwardGains { k_s: 0.12, k_v: 2.6, k_a: 0.0 },
        turn_gains: PidGains { k_p: 6.0, k_d: 0.05, ..Default::default() },
        turn_max_ang_vel_rads: 12.0,
        turn_max_ang_accel_radss: 60.0,
        turn_ff: FeedforwardGains { k_s: 0.1, k_v: 0.35, k_a: 0.0 },
        modules: vec![],
    };

    let module_params = ModuleParams {
        name: "bench".into(),
        abs_zero_offset_deg: 45.0,
    };

    let sim = SimSwerveModule::new(SimSwerveParams::default(), 45.0);

    let mut module = SwerveModule::init((params, module_params, sim.eqpt())).unwrap();

    // Bench a full cycle, command and plant step
    let input = InputData {
        cmds: vec![SwerveCmd::SetState {
            speed_ms: 1.5,
            heading_rad: 2.5,
        }],
    };

    c.bench_function("SwerveModule::proc", |b| {
        b.iter(|| {
            module.proc(black_box(&input)).unwrap();
            sim.step(CYCLE_PERIOD_S);
        })
    });

    // Bench optimisation alone
    c.bench_function("ModuleState::optimize", |b| {
        b.iter(|| black_box(ModuleState::new(1.5, 2.5)).optimize(black_box(-0.3)))
    });
}

criterion_group!(benches, swerve_module_benchmark);
criterion_main!(benches);
