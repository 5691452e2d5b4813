//! Fixed-point dead-reckoning pose integration
//!
//! Accumulates instantaneous velocity samples into a pose (distance traveled
//! plus heading). Everything is integer fixed-point: velocities arrive in
//! mm/s and mdeg/s, periods in microseconds, and the sub-unit residue of each
//! cycle is carried into the next one so that truncation never accumulates
//! into drift.

use crate::params::{FIXED_POINT_SCALE, FULL_TURN_MDEG, W_NOISE_TH};

/// Chassis velocity sample: linear mm/s, angular mdeg/s (CCW positive).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Velocity {
    pub linear: i32,
    pub angular: i32,
}

impl Velocity {
    pub const STOP: Velocity = Velocity {
        linear: 0,
        angular: 0,
    };

    pub fn new(linear: i32, angular: i32) -> Self {
        Self { linear, angular }
    }

    /// True when both components are exactly zero.
    pub fn is_stop(&self) -> bool {
        self.linear == 0 && self.angular == 0
    }
}

/// Accumulated pose: distance in mm, heading in mdeg within `[0, 360_000)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pose {
    pub distance: i32,
    pub theta: i32,
}

/// Pose integrator with remainder carry.
///
/// The two residues persist for the lifetime of the control process; they are
/// the fractional (sub-mm / sub-mdeg) part of the previous cycle's delta.
#[derive(Debug, Default)]
pub struct Odometer {
    distance_rem: i64,
    angle_rem: i64,
}

impl Odometer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Integrate one velocity sample over `period_us` microseconds.
    ///
    /// Angular integration is gated: below [`W_NOISE_TH`] the delta is forced
    /// to zero and the angle residue is left untouched, so sensor noise while
    /// near-stationary never walks the heading. After integration the heading
    /// is wrapped back into `[0, 360_000)` with a floored modulo.
    pub fn integrate(&mut self, pose: &mut Pose, speed: &Velocity, period_us: i64) {
        let mut delta_distance = speed.linear as i64 * period_us + self.distance_rem;
        self.distance_rem = delta_distance % FIXED_POINT_SCALE;
        delta_distance /= FIXED_POINT_SCALE;

        // Left turn is the positive angular direction.
        let delta_theta = if speed.angular.abs() < W_NOISE_TH {
            0
        } else {
            let mut d = speed.angular as i64 * period_us + self.angle_rem;
            self.angle_rem = d % FIXED_POINT_SCALE;
            d /= FIXED_POINT_SCALE;
            d
        };

        let mut theta = pose.theta as i64 + delta_theta;
        theta %= FULL_TURN_MDEG as i64;
        if theta < 0 {
            theta += FULL_TURN_MDEG as i64;
        }
        pose.theta = theta as i32;

        pose.distance = pose.distance.wrapping_add(delta_distance as i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::MOTION_PERIOD_US;

    #[test]
    fn test_distance_accumulation_no_drift() {
        let mut odom = Odometer::new();
        let mut pose = Pose::default();
        let speed = Velocity::new(123, 0);

        // 123 mm/s * 2000 us = 246000 fixed-point units per cycle: individual
        // cycles truncate to zero mm, the carry must still sum exactly.
        let n = 500;
        for _ in 0..n {
            odom.integrate(&mut pose, &speed, MOTION_PERIOD_US);
        }

        let expected = (speed.linear as i64 * MOTION_PERIOD_US * n / 1_000_000) as i32;
        assert_eq!(pose.distance, expected);
        assert_eq!(pose.distance, 123);
    }

    #[test]
    fn test_reverse_distance() {
        let mut odom = Odometer::new();
        let mut pose = Pose::default();
        let speed = Velocity::new(-150, 0);

        for _ in 0..1000 {
            odom.integrate(&mut pose, &speed, MOTION_PERIOD_US);
        }

        // 2 seconds at -150 mm/s
        assert_eq!(pose.distance, -300);
    }

    #[test]
    fn test_heading_always_in_range() {
        let mut odom = Odometer::new();
        let mut pose = Pose::default();

        // Alternate large CCW and CW rates, each step crossing the wrap point
        for i in 0..2000 {
            let w = if i % 3 == 0 { 720_000 } else { -540_000 };
            odom.integrate(&mut pose, &Velocity::new(0, w), 1_000_000);
            assert!(
                (0..FULL_TURN_MDEG).contains(&pose.theta),
                "theta out of range: {}",
                pose.theta
            );
        }
    }

    #[test]
    fn test_negative_wrap_corrected() {
        let mut odom = Odometer::new();
        let mut pose = Pose::default();

        // -90 deg/s for one second from heading 0
        odom.integrate(&mut pose, &Velocity::new(0, -90_000), 1_000_000);
        assert_eq!(pose.theta, 270_000);
    }

    #[test]
    fn test_angular_noise_suppressed() {
        let mut odom = Odometer::new();
        let mut pose = Pose {
            distance: 0,
            theta: 45_000,
        };

        // Just below the 0.25 deg/s threshold: heading must never move,
        // no matter how many cycles accumulate.
        for _ in 0..100_000 {
            odom.integrate(&mut pose, &Velocity::new(0, W_NOISE_TH - 1), MOTION_PERIOD_US);
        }
        assert_eq!(pose.theta, 45_000);

        // At the threshold integration resumes
        for _ in 0..100_000 {
            odom.integrate(&mut pose, &Velocity::new(0, W_NOISE_TH), MOTION_PERIOD_US);
        }
        assert!(pose.theta != 45_000);
    }

    #[test]
    fn test_remainder_not_advanced_while_gated() {
        let mut odom = Odometer::new();
        let mut pose = Pose::default();

        // Build up a partial angle residue with an above-threshold rate
        odom.integrate(&mut pose, &Velocity::new(0, 300), MOTION_PERIOD_US);
        let rem_before = odom.angle_rem;
        assert!(rem_before != 0);

        // Gated cycles must leave the residue untouched
        for _ in 0..50 {
            odom.integrate(&mut pose, &Velocity::new(0, 100), MOTION_PERIOD_US);
        }
        assert_eq!(odom.angle_rem, rem_before);
    }

    #[test]
    fn test_combined_motion() {
        let mut odom = Odometer::new();
        let mut pose = Pose::default();
        let speed = Velocity::new(200, 90_000);

        // One simulated second of forward arc
        for _ in 0..500 {
            odom.integrate(&mut pose, &speed, MOTION_PERIOD_US);
        }
        assert_eq!(pose.distance, 200);
        assert_eq!(pose.theta, 90_000);
    }
}
