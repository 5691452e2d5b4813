//! Asynchronous velocity-command staging
//!
//! The communication layer writes commands at arbitrary times relative to the
//! motion cycle. To keep the active command tear-free without a lock, the
//! staged command is double-buffered: both components are packed into a single
//! `AtomicU64` store, and a dirty flag is set with Release ordering only after
//! the store completes. The motion task consumes the flag with Acquire, so it
//! either sees a complete command or none at all.

use crate::odometry::Velocity;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

pub(crate) fn pack_velocity(v: &Velocity) -> u64 {
    ((v.linear as u32 as u64) << 32) | (v.angular as u32 as u64)
}

pub(crate) fn unpack_velocity(raw: u64) -> Velocity {
    Velocity {
        linear: (raw >> 32) as u32 as i32,
        angular: raw as u32 as i32,
    }
}

/// Staged velocity command shared between the communication context and the
/// motion task.
#[derive(Debug, Default)]
pub struct StagedCommand {
    packed: AtomicU64,
    dirty: AtomicBool,
}

impl StagedCommand {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a command for the next motion cycle.
    ///
    /// `duration_hint_ms` is accepted for interface compatibility with the
    /// upstream protocol; the controller currently runs every command until
    /// replaced.
    pub fn set(&self, linear: i32, angular: i32, _duration_hint_ms: u16) {
        log::debug!(
            "StagedCommand: staged linear={}mm/s angular={}mdeg/s",
            linear,
            angular
        );
        self.packed.store(
            pack_velocity(&Velocity { linear, angular }),
            Ordering::Relaxed,
        );
        self.dirty.store(true, Ordering::Release);
    }

    /// Consume the staged command, if a new one has been written since the
    /// last call.
    pub fn take(&self) -> Option<Velocity> {
        if self.dirty.swap(false, Ordering::Acquire) {
            Some(unpack_velocity(self.packed.load(Ordering::Relaxed)))
        } else {
            None
        }
    }

    /// True when an unconsumed command is pending.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::Relaxed)
    }
}
