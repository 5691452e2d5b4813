//! Mock chassis for hardware-free testing and simulation
//!
//! Sensor values and fault bits are scripted through a shared handle while
//! the controller owns the [`MockChassis`] itself. Speed feedback follows the
//! forwarded target through a first-order lag filter, which is enough for the
//! integrator and protection paths to see realistic motion.

use super::ChassisHal;
use crate::command::{pack_velocity, unpack_velocity};
use crate::odometry::Velocity;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, AtomicU8, Ordering};
use std::sync::Arc;

/// First-order lag fusion between a target and a sample.
///
/// `factor` is the lag weight in thousandths: 0 tracks the sample
/// immediately, 1000 never moves.
pub fn first_order_filter(target: i32, sample: i32, factor: i32) -> i32 {
    ((target as i64 * factor as i64 + sample as i64 * (1000 - factor) as i64) / 1000) as i32
}

#[derive(Debug, Default)]
struct MockState {
    drop_sensor: AtomicU8,
    collision_sensor: AtomicU8,
    fault_flags: AtomicU32,
    feedback: AtomicU64,
    /// Lag factor for feedback tracking, thousandths. Zero = ideal tracking.
    feedback_lag: AtomicU32,
    calibrating: AtomicBool,
    motor_enabled: AtomicBool,
    pid_inits: AtomicU32,
    targets: Mutex<Vec<Velocity>>,
}

/// Scripting and inspection handle shared with [`MockChassis`].
#[derive(Debug, Clone, Default)]
pub struct MockHandle {
    state: Arc<MockState>,
}

impl MockHandle {
    pub fn set_drop_sensor(&self, value: u8) {
        self.state.drop_sensor.store(value, Ordering::Relaxed);
    }

    pub fn set_collision_sensor(&self, value: u8) {
        self.state.collision_sensor.store(value, Ordering::Relaxed);
    }

    pub fn set_fault_flags(&self, flags: u32) {
        self.state.fault_flags.store(flags, Ordering::Relaxed);
    }

    /// Lag factor for feedback tracking in thousandths (0 = ideal).
    pub fn set_feedback_lag(&self, factor: u32) {
        self.state.feedback_lag.store(factor.min(1000), Ordering::Relaxed);
    }

    /// Override the measured velocity directly (bypasses tracking).
    pub fn set_feedback(&self, v: Velocity) {
        self.state
            .feedback
            .store(pack_velocity(&v), Ordering::Relaxed);
    }

    pub fn is_motor_enabled(&self) -> bool {
        self.state.motor_enabled.load(Ordering::Relaxed)
    }

    pub fn is_calibrating(&self) -> bool {
        self.state.calibrating.load(Ordering::Relaxed)
    }

    pub fn pid_init_count(&self) -> u32 {
        self.state.pid_inits.load(Ordering::Relaxed)
    }

    /// All targets forwarded to the speed loop, in order.
    pub fn forwarded_targets(&self) -> Vec<Velocity> {
        self.state.targets.lock().clone()
    }

    pub fn last_target(&self) -> Option<Velocity> {
        self.state.targets.lock().last().copied()
    }

    pub fn clear_targets(&self) {
        self.state.targets.lock().clear();
    }
}

/// Mock implementation of [`ChassisHal`].
#[derive(Debug, Default)]
pub struct MockChassis {
    state: Arc<MockState>,
}

impl MockChassis {
    /// Create a mock chassis plus its scripting handle.
    pub fn new() -> (Self, MockHandle) {
        let state = Arc::new(MockState::default());
        (
            Self {
                state: Arc::clone(&state),
            },
            MockHandle { state },
        )
    }
}

impl ChassisHal for MockChassis {
    fn speed_feedback(&self) -> Velocity {
        unpack_velocity(self.state.feedback.load(Ordering::Relaxed))
    }

    fn set_target_velocity(&mut self, target: &Velocity) {
        self.state.targets.lock().push(*target);

        // Feedback tracks the commanded target through the lag filter
        let lag = self.state.feedback_lag.load(Ordering::Relaxed) as i32;
        let current = unpack_velocity(self.state.feedback.load(Ordering::Relaxed));
        let next = Velocity {
            linear: first_order_filter(current.linear, target.linear, lag),
            angular: first_order_filter(current.angular, target.angular, lag),
        };
        self.state
            .feedback
            .store(pack_velocity(&next), Ordering::Relaxed);
    }

    fn motor_driver_enable(&mut self, enable: bool) {
        log::debug!("MockChassis: motor driver enable={}", enable);
        self.state.motor_enabled.store(enable, Ordering::Relaxed);
    }

    fn pid_init(&mut self) {
        self.state.pid_inits.fetch_add(1, Ordering::Relaxed);
    }

    fn drop_sensor_read(&self) -> u8 {
        self.state.drop_sensor.load(Ordering::Relaxed)
    }

    fn drop_sensor_set_calibration(&mut self, calibrating: bool) {
        self.state.calibrating.store(calibrating, Ordering::Relaxed);
    }

    fn collision_sensor_read(&self) -> u8 {
        self.state.collision_sensor.load(Ordering::Relaxed)
    }

    fn global_fault_flags(&self) -> u32 {
        self.state.fault_flags.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_tracks_target_ideally() {
        let (mut chassis, handle) = MockChassis::new();
        handle.set_feedback_lag(0);

        chassis.set_target_velocity(&Velocity::new(250, -1_000));
        assert_eq!(chassis.speed_feedback(), Velocity::new(250, -1_000));
    }

    #[test]
    fn test_feedback_lag_converges() {
        let (mut chassis, handle) = MockChassis::new();
        handle.set_feedback_lag(500);

        let target = Velocity::new(200, 0);
        chassis.set_target_velocity(&target);
        let first = chassis.speed_feedback().linear;
        assert_eq!(first, 100);

        for _ in 0..32 {
            chassis.set_target_velocity(&target);
        }
        // Integer truncation settles one unit shy of the target
        assert!(chassis.speed_feedback().linear >= 195);
    }

    #[test]
    fn test_first_order_filter_extremes() {
        assert_eq!(first_order_filter(100, 900, 0), 900);
        assert_eq!(first_order_filter(100, 900, 1000), 100);
        assert_eq!(first_order_filter(0, 1000, 500), 500);
    }

    #[test]
    fn test_targets_recorded_in_order() {
        let (mut chassis, handle) = MockChassis::new();
        chassis.set_target_velocity(&Velocity::new(1, 0));
        chassis.set_target_velocity(&Velocity::new(2, 0));

        assert_eq!(
            handle.forwarded_targets(),
            vec![Velocity::new(1, 0), Velocity::new(2, 0)]
        );
        assert_eq!(handle.last_target(), Some(Velocity::new(2, 0)));
    }
}
