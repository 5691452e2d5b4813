//! Sensor-triggered braking and release state machine
//!
//! When a drop or collision sensor trips while the chassis is moving forward
//! (or turning), the monitor overrides the active command with a slow reverse
//! creep to back the chassis clear of the hazard. The creep runs until either
//! the hazard clears and a release delay worth ~20 mm of reverse travel
//! expires, or a 3 second timeout latches the monitor into a full stop that
//! is reported upward as a persistent-hazard condition.

use crate::odometry::Velocity;
use crate::params::{CLEARANCE_MM, CREEP_SPEED_MM_S, PROTECT_TIMEOUT_S};

/// Drop/collision protection monitor.
///
/// Logically three phases: normal, protecting (creeping back), releasing
/// (hazard gone, waiting out the clearance delay). The phase is derived from
/// `is_protecting` plus the two counters.
#[derive(Debug, Default)]
pub struct ProtectionMonitor {
    is_protecting: bool,
    protect_ticks: u16,
    release_ticks: u16,
}

impl ProtectionMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Evaluate one protection cycle at `freq` Hz.
    ///
    /// `target` is the currently active command and is overwritten in place
    /// while protection is engaged. Returns the protecting flag; while it is
    /// set the caller must not adopt externally staged commands.
    pub fn update(
        &mut self,
        target: &mut Velocity,
        drop_sensor: u8,
        collision_sensor: u8,
        freq: u16,
    ) -> bool {
        let hazard = drop_sensor != 0 || collision_sensor != 0;
        let timeout_ticks = PROTECT_TIMEOUT_S * freq;

        if hazard {
            // Only forward or turning motion can carry the chassis into the
            // hazard; a stationary or reversing chassis is left alone.
            if target.linear > 0 || target.angular != 0 {
                if !self.is_protecting {
                    log::warn!(
                        "ProtectionMonitor: hazard while moving (drop={:#04x} collision={:#04x}), creeping back",
                        drop_sensor,
                        collision_sensor
                    );
                }
                self.is_protecting = true;
                self.release_ticks = 0;
            }

            if self.is_protecting {
                if self.protect_ticks > timeout_ticks {
                    // Persistent hazard: give up creeping and hold a full
                    // stop. The protecting flag stays latched for upstream
                    // fault reporting.
                    *target = Velocity::STOP;
                } else {
                    if self.protect_ticks == timeout_ticks {
                        log::error!(
                            "ProtectionMonitor: hazard persisted {}s, latching stop",
                            PROTECT_TIMEOUT_S
                        );
                    }
                    self.protect_ticks += 1;
                    target.linear = CREEP_SPEED_MM_S;
                    target.angular = 0;
                }
            }
        } else if self.is_protecting {
            if self.protect_ticks > timeout_ticks {
                // Latched: a human-level reset policy decides recovery.
                *target = Velocity::STOP;
            } else {
                self.release_ticks += 1;
                if self.release_ticks as i32 > Self::release_delay_ticks(target.linear, freq) {
                    log::info!("ProtectionMonitor: hazard cleared, releasing");
                    self.is_protecting = false;
                    *target = Velocity::STOP;
                    self.protect_ticks = 0;
                }
            }
        }

        self.is_protecting
    }

    /// Ticks of reverse creep needed to cover the clearance distance.
    ///
    /// The active speed during protection is always the nonzero creep value,
    /// so the division cannot hit zero in normal operation; the fallback to
    /// the creep constant keeps the math defined regardless.
    fn release_delay_ticks(active_linear: i32, freq: u16) -> i32 {
        let speed = if active_linear != 0 {
            active_linear
        } else {
            CREEP_SPEED_MM_S
        };
        (CLEARANCE_MM * freq as i32 / speed).abs()
    }

    /// Current protecting flag without evaluating a cycle.
    pub fn is_protecting(&self) -> bool {
        self.is_protecting
    }
}
