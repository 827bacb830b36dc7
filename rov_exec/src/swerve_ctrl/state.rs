//! Implementations for the SwerveModule state structure

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use serde::Serialize;
use std::f64::consts::PI;

// Internal
use super::{
    ModuleParams, ModulePosition, ModuleState, Params, PidController, ProfileConstraints,
    ProfiledPidController, SimpleMotorFeedforward, SwerveCmd, SwerveCtrlError,
};
use comms_if::{
    eqpt::{
        mech::VoltageActuator,
        sens::{AbsEncoder, AbsSensorRange, RelEncoder},
    },
    tm::TmSink,
};
use util::{
    maths::{clamp_sym, wrap_pi},
    module::State,
};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Control of a single swerve module.
pub struct SwerveModule {
    name: String,

    /// Units: meters/rotation
    meters_per_rot: f64,

    /// Units: volts
    max_voltage_v: f64,

    eqpt: SwerveEqpt,

    drive_pid: PidController,

    turn_pid: ProfiledPidController,

    drive_ff: SimpleMotorFeedforward,

    turn_ff: SimpleMotorFeedforward,

    /// Desired state, re-applied on every cycle.
    desired: ModuleState,
}

/// The equipment driven by a SwerveModule.
pub struct SwerveEqpt {
    pub drive_motor: Box<dyn VoltageActuator>,
    pub turn_motor: Box<dyn VoltageActuator>,
    pub drive_encoder: Box<dyn RelEncoder>,
    pub turn_encoder: Box<dyn AbsEncoder>,
}

/// Input data to a SwerveModule.
#[derive(Debug, Default, Clone)]
pub struct InputData {
    /// Commands received this cycle, executed in order.
    pub cmds: Vec<SwerveCmd>,
}

/// Motor commands computed for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SwerveOutput {
    /// Units: volts
    pub drive_voltage_v: f64,

    /// Units: volts
    pub turn_voltage_v: f64,

    /// The desired state after optimisation against the measured heading.
    pub optimized: ModuleState,
}

/// Status report for SwerveModule processing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StatusReport {
    /// The module is driving backwards to avoid turning more than 90 degrees.
    pub flipped: bool,

    pub drive_saturated: bool,

    pub turn_saturated: bool,

    /// Measured state of the module.
    pub measured: ModuleState,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl State for SwerveModule {
    type InitData = (Params, ModuleParams, SwerveEqpt);
    type InitError = SwerveCtrlError;

    type InputData = InputData;
    type OutputData = SwerveOutput;
    type StatusReport = StatusReport;
    type ProcError = SwerveCtrlError;

    fn init(init_data: Self::InitData) -> Result<Self, Self::InitError> {
        let (params, module_params, eqpt) = init_data;

        Self::new(&params, &module_params, eqpt)
    }

    /// Cyclic processing.
    ///
    /// Executes each new command in the order received, then drives the
    /// module towards the most recent desired state.
    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        for cmd in input_data.cmds.iter() {
            match *cmd {
                SwerveCmd::SetState {
                    speed_ms,
                    heading_rad,
                } => {
                    self.desired = ModuleState::new(speed_ms, wrap_pi(heading_rad));
                    debug!("{} module desired state {:?}", self.name, self.desired);
                }
                SwerveCmd::Stop => {
                    self.desired.speed_ms = 0.0;
                    debug!("{} module stopped", self.name);
                }
                SwerveCmd::ZeroEncoders => self.reset_encoders(),
            }
        }

        let output = self.set_desired_state(self.desired);

        let report = StatusReport {
            flipped: output.optimized.speed_ms != self.desired.speed_ms
                || output.optimized.heading_rad != self.desired.heading_rad,
            drive_saturated: output.drive_voltage_v.abs() >= self.max_voltage_v,
            turn_saturated: output.turn_voltage_v.abs() >= self.max_voltage_v,
            measured: self.state(),
        };

        Ok((output, report))
    }
}

impl SwerveModule {
    /// Create a new module.
    ///
    /// Configures the absolute heading sensor so it reads zero with the
    /// wheel pointing forward, in the signed range, and starts the turn
    /// profile from the current heading.
    pub fn new(
        params: &Params,
        module_params: &ModuleParams,
        mut eqpt: SwerveEqpt,
    ) -> Result<Self, SwerveCtrlError> {
        params.validate()?;

        eqpt.turn_encoder
            .configure_magnet_offset(-module_params.abs_zero_offset_deg);
        eqpt.turn_encoder.configure_range(AbsSensorRange::Signed);

        let drive_pid = PidController::new(params.drive_gains, params.control_period_s);

        let mut turn_pid = ProfiledPidController::new(
            params.turn_gains,
            ProfileConstraints {
                max_velocity: params.turn_max_ang_vel_rads,
                max_acceleration: params.turn_max_ang_accel_radss,
            },
            params.control_period_s,
        );
        turn_pid.enable_continuous_input(-PI, PI);

        let mut module = Self {
            name: module_params.name.clone(),
            meters_per_rot: params.meters_per_rot(),
            max_voltage_v: params.max_voltage_v,
            eqpt,
            drive_pid,
            turn_pid,
            drive_ff: SimpleMotorFeedforward::new(params.drive_ff),
            turn_ff: SimpleMotorFeedforward::new(params.turn_ff),
            desired: ModuleState::default(),
        };

        let heading_rad = module.heading_rad();
        module.turn_pid.reset(heading_rad);
        module.desired = ModuleState::new(0.0, heading_rad);

        debug!(
            "{} module initialised at {:.1} deg",
            module.name,
            module.module_heading_deg()
        );

        Ok(module)
    }

    /// Drive the module towards `desired` and command both motors.
    ///
    /// Both outputs are clamped to the max voltage.
    pub fn set_desired_state(&mut self, desired: ModuleState) -> SwerveOutput {
        self.desired = desired;

        let optimized = desired.optimize(self.heading_rad());

        let drive_voltage_v = clamp_sym(self.calc_drive(optimized), self.max_voltage_v);
        let turn_voltage_v = clamp_sym(self.calc_turn(optimized), self.max_voltage_v);

        self.eqpt.drive_motor.set_voltage(drive_voltage_v);
        self.eqpt.turn_motor.set_voltage(turn_voltage_v);

        trace!(
            "{} module drive {:.3} V, turn {:.3} V",
            self.name,
            drive_voltage_v,
            turn_voltage_v
        );

        SwerveOutput {
            drive_voltage_v,
            turn_voltage_v,
            optimized,
        }
    }

    /// Turn motor output needed to reach `desired`, without commanding the
    /// motor.
    ///
    /// This advances the turn profile by one period, so it must not be mixed
    /// with [`SwerveModule::set_desired_state`] in the same cycle.
    pub fn turn_output(&mut self, desired: ModuleState) -> f64 {
        let optimized = desired.optimize(self.heading_rad());
        self.calc_turn(optimized)
    }

    /// Drive motor output needed to reach `desired`, without commanding the
    /// motor.
    pub fn drive_output(&mut self, desired: ModuleState) -> f64 {
        let optimized = desired.optimize(self.heading_rad());
        self.calc_drive(optimized)
    }

    /// Stop the wheel, holding the current heading.
    pub fn make_safe(&mut self) {
        let heading_rad = self.heading_rad();
        self.set_desired_state(ModuleState::new(0.0, heading_rad));
    }

    /// Zero the drive encoder, so the distance travelled starts again from
    /// zero.
    ///
    /// The heading sensor is absolute and is not changed.
    pub fn reset_encoders(&mut self) {
        debug!("{} module drive encoder zeroed", self.name);
        self.eqpt.drive_encoder.set_position(0.0);
        self.drive_pid.reset();
    }

    // ---- ACCESSORS ----

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn desired(&self) -> ModuleState {
        self.desired
    }

    /// Distance travelled and heading of the wheel.
    pub fn position(&self) -> ModulePosition {
        ModulePosition {
            distance_m: self.eqpt.drive_encoder.position() * self.meters_per_rot,
            heading_rad: self.heading_rad(),
        }
    }

    /// Measured speed and heading of the wheel.
    pub fn state(&self) -> ModuleState {
        ModuleState::new(self.speed_ms(), self.heading_rad())
    }

    /// Units: degrees
    pub fn module_heading_deg(&self) -> f64 {
        self.eqpt.turn_encoder.abs_position_deg()
    }

    /// Publish the module telemetry.
    pub fn write_tm(&self, sink: &mut dyn TmSink) {
        let position = self.position();

        sink.put_number(&format!("{} heading", self.name), self.module_heading_deg());
        sink.put_number(&format!("{} speed", self.name), self.speed_ms());
        sink.put_number(&format!("{} distance", self.name), position.distance_m);
        sink.put_number(
            &format!("{} turn error", self.name),
            self.turn_pid.position_error(),
        );
        sink.put_number(
            &format!("{} drive voltage", self.name),
            self.eqpt.drive_motor.voltage_v(),
        );
        sink.put_number(
            &format!("{} turn voltage", self.name),
            self.eqpt.turn_motor.voltage_v(),
        );
    }

    // ---- PRIVATE ----

    /// Units: radians, in `[-pi, pi)`
    fn heading_rad(&self) -> f64 {
        wrap_pi(self.module_heading_deg().to_radians())
    }

    /// Units: meters/second
    fn speed_ms(&self) -> f64 {
        self.eqpt.drive_encoder.velocity() * self.meters_per_rot / 60.0
    }

    fn calc_drive(&mut self, optimized: ModuleState) -> f64 {
        let speed_ms = self.speed_ms();

        self.drive_pid.calculate(speed_ms, optimized.speed_ms)
            + self.drive_ff.calculate(optimized.speed_ms)
    }

    fn calc_turn(&mut self, optimized: ModuleState) -> f64 {
        let heading_rad = self.heading_rad();

        self.turn_pid.calculate(heading_rad, optimized.heading_rad)
            + self.turn_ff.calculate(self.turn_pid.setpoint().velocity)
    }
}
