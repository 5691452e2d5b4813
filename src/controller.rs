//! Motion task orchestration
//!
//! Runs the per-cycle sequence when the scheduler's motion flag fires:
//! feedback -> pose integration -> status mirror -> sensor protection ->
//! staged-command merge -> fault override -> target hand-off to the speed
//! loop. Startup passes through motor init and a drop-sensor calibration
//! phase before any motion command is forwarded.

use crate::command::StagedCommand;
use crate::hal::{fault, ChassisHal};
use crate::odometry::{Odometer, Pose, Velocity};
use crate::params::{DROP_CALIBRATION_CYCLES, MOTION_FREQ, MOTION_PERIOD_US, PROTECT_FREQ};
use crate::protection::ProtectionMonitor;
use crate::status::{StatusMirror, StatusSnapshot};
use crate::timing::{TaskId, TaskTable};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Startup {
    MotorInit,
    SensorCalibrating(u16),
    Running,
}

/// Chassis motion controller.
///
/// Owns the pose, the protection monitor, and the active target; shares the
/// staged command buffer with the communication context and the status
/// mirror with external readers.
pub struct MotionController<H: ChassisHal> {
    hal: H,
    startup: Startup,
    pose: Pose,
    odometer: Odometer,
    protection: ProtectionMonitor,
    staged: Arc<StagedCommand>,
    status: Arc<StatusMirror>,
    target: Velocity,
    protect_divider: u16,
    last_drop: u8,
    last_collision: u8,
    last_faults: u32,
}

impl<H: ChassisHal> MotionController<H> {
    pub fn new(hal: H, staged: Arc<StagedCommand>, status: Arc<StatusMirror>) -> Self {
        Self {
            hal,
            startup: Startup::MotorInit,
            pose: Pose::default(),
            odometer: Odometer::new(),
            protection: ProtectionMonitor::new(),
            staged,
            status,
            target: Velocity::STOP,
            protect_divider: 0,
            last_drop: 0,
            last_collision: 0,
            last_faults: 0,
        }
    }

    /// Motion task entry point, invoked once per scheduler tick.
    ///
    /// Consumes the motion due flag; does nothing when the flag is not set.
    pub fn run(&mut self, tasks: &mut TaskTable) {
        if !tasks.take(TaskId::Motion) {
            return;
        }

        if let Startup::MotorInit = self.startup {
            log::info!("MotionController: initializing speed loop, enabling motor driver");
            self.hal.pid_init();
            self.hal.motor_driver_enable(true);
            self.startup = Startup::SensorCalibrating(0);
        }

        if let Startup::SensorCalibrating(cycles) = self.startup {
            if cycles < DROP_CALIBRATION_CYCLES {
                self.hal.drop_sensor_set_calibration(true);
                self.startup = Startup::SensorCalibrating(cycles + 1);
                return;
            }
            self.hal.drop_sensor_set_calibration(false);
            self.startup = Startup::Running;
            log::info!(
                "MotionController: drop sensor calibrated ({} cycles), entering run state",
                DROP_CALIBRATION_CYCLES
            );
        }

        self.cycle();
    }

    /// One steady-state motion control cycle.
    fn cycle(&mut self) {
        let speed = self.hal.speed_feedback();
        self.odometer
            .integrate(&mut self.pose, &speed, MOTION_PERIOD_US);

        // Sensor protection runs at its own divided rate
        self.protect_divider += 1;
        if self.protect_divider >= (MOTION_FREQ / PROTECT_FREQ as u32) as u16 {
            self.protect_divider = 0;
            self.last_drop = self.hal.drop_sensor_read();
            self.last_collision = self.hal.collision_sensor_read();
            self.protection.update(
                &mut self.target,
                self.last_drop,
                self.last_collision,
                PROTECT_FREQ,
            );
        }

        // Staged external commands only take effect outside protection
        if !self.protection.is_protecting() {
            if let Some(cmd) = self.staged.take() {
                self.target = cmd;
            }
        }

        // Global fault override has highest precedence
        let faults = self.hal.global_fault_flags() & fault::FATAL;
        if faults != self.last_faults {
            if faults != 0 {
                log::error!("MotionController: fatal fault flags {:#010x}, forcing stop", faults);
            } else {
                log::info!("MotionController: fatal fault flags cleared");
            }
            self.last_faults = faults;
        }
        if faults != 0 {
            self.target = Velocity::STOP;
        }

        self.hal.set_target_velocity(&self.target);

        // Mirror state for external readers; skipped on lock contention
        self.status.publish(&StatusSnapshot {
            distance_mm: self.pose.distance,
            theta_mdeg: self.pose.theta,
            velocity: speed,
            drop_sensor: self.last_drop,
            collision_sensor: self.last_collision,
            protecting: self.protection.is_protecting(),
        });
    }

    pub fn pose(&self) -> Pose {
        self.pose
    }

    pub fn is_protecting(&self) -> bool {
        self.protection.is_protecting()
    }

    /// True once startup (motor init + sensor calibration) has completed.
    pub fn is_running(&self) -> bool {
        self.startup == Startup::Running
    }

    pub fn hal(&self) -> &H {
        &self.hal
    }
}
