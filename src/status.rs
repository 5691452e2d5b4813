//! Shared status mirror for external readers
//!
//! The communication layer reads pose and velocity from another context, so
//! the mirror sits behind a mutex. The motion cycle publishes with `try_lock`
//! and simply skips the update on contention: the mirror may lag the control
//! state by one cycle, never block it.

use crate::odometry::Velocity;
use parking_lot::Mutex;

/// Snapshot of the externally visible chassis state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    /// Accumulated travel distance (mm).
    pub distance_mm: i32,
    /// Heading in mdeg, `[0, 360_000)`.
    pub theta_mdeg: i32,
    /// Measured velocity.
    pub velocity: Velocity,
    /// Latest drop sensor bitmask.
    pub drop_sensor: u8,
    /// Latest collision sensor bitmask.
    pub collision_sensor: u8,
    /// Protection state machine engaged or latched.
    pub protecting: bool,
}

/// Lock-guarded status register mirror.
#[derive(Debug, Default)]
pub struct StatusMirror {
    inner: Mutex<StatusSnapshot>,
}

impl StatusMirror {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a snapshot; returns false when the lock was contended and the
    /// update was skipped for this cycle.
    pub fn publish(&self, snapshot: &StatusSnapshot) -> bool {
        match self.inner.try_lock() {
            Some(mut guard) => {
                *guard = *snapshot;
                true
            }
            None => false,
        }
    }

    /// Blocking read for external consumers.
    pub fn snapshot(&self) -> StatusSnapshot {
        *self.inner.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_and_snapshot() {
        let mirror = StatusMirror::new();
        let snap = StatusSnapshot {
            distance_mm: 1234,
            theta_mdeg: 90_000,
            velocity: Velocity::new(200, 0),
            drop_sensor: 0,
            collision_sensor: 0,
            protecting: false,
        };
        assert!(mirror.publish(&snap));
        assert_eq!(mirror.snapshot(), snap);
    }

    #[test]
    fn test_publish_skips_under_contention() {
        let mirror = StatusMirror::new();
        let guard = mirror.inner.lock();
        assert!(!mirror.publish(&StatusSnapshot::default()));
        drop(guard);
        assert!(mirror.publish(&StatusSnapshot::default()));
    }
}
