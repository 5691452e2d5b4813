//! Hardware abstraction for the chassis collaborators
//!
//! The motion core drives the PID speed loop, motor driver, and hazard
//! sensors only through this trait, so the control logic is host-testable
//! against [`mock::MockChassis`] and target builds supply the real drivers.

pub mod mock;

use crate::odometry::Velocity;

/// Aggregated system fault bits consumed by the motion core.
pub mod fault {
    /// Communication layer stopped talking to us.
    pub const COMM_TIMEOUT: u32 = 1 << 0;
    /// Chassis tilt beyond the safe envelope.
    pub const TILT: u32 = 1 << 1;
    /// Motor driver reported an electrical fault.
    pub const MOTOR_DRIVER: u32 = 1 << 2;
    /// Battery critically low.
    pub const LOW_BATTERY: u32 = 1 << 3;

    /// Faults that force the motion target to zero every cycle.
    pub const FATAL: u32 = COMM_TIMEOUT | TILT;
}

/// Chassis collaborator interface.
///
/// Everything here is expected to complete in bounded time; implementations
/// must not block the control cycle.
pub trait ChassisHal {
    /// Latest measured chassis velocity from the speed-loop feedback.
    fn speed_feedback(&self) -> Velocity;

    /// Forward the arbitrated target to the speed-control loop.
    fn set_target_velocity(&mut self, target: &Velocity);

    /// Enable or disable the motor driver power stage.
    fn motor_driver_enable(&mut self, enable: bool);

    /// One-shot initialization of the PID speed loop state.
    fn pid_init(&mut self);

    /// Calibrated drop sensor bitmask; nonzero means a drop hazard.
    fn drop_sensor_read(&self) -> u8;

    /// Switch the drop sensor between calibration and normal sampling.
    fn drop_sensor_set_calibration(&mut self, calibrating: bool);

    /// Collision sensor bitmask; nonzero means a collision hazard.
    fn collision_sensor_read(&self) -> u8;

    /// Aggregated system fault bits (see [`fault`]).
    fn global_fault_flags(&self) -> u32;
}
