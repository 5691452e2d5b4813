//! Hardware timer interrupt entry point
//!
//! One invocation per basic-timer period: advances the overflow counter used
//! by the interval sampler and divides the interrupt rate down to the
//! speed-control sub-loop trigger. On target this runs in the timer ISR; the
//! daemon drives it from a dedicated thread at the same rate.

use crate::params::SPEED_LOOP_DIVISOR;
use crate::timing::{OverflowCounter, SubLoopDivider};

/// Timer interrupt handler state.
pub struct TimerIrq {
    divider: SubLoopDivider,
}

impl TimerIrq {
    pub fn new() -> Self {
        Self {
            divider: SubLoopDivider::new(SPEED_LOOP_DIVISOR),
        }
    }

    /// Service one timer interrupt.
    ///
    /// Increments `overflow` and invokes `speed_loop` every
    /// [`SPEED_LOOP_DIVISOR`] interrupts.
    pub fn on_tick<F: FnMut()>(&mut self, overflow: &OverflowCounter, speed_loop: &mut F) {
        overflow.on_overflow();
        if self.divider.tick() {
            speed_loop();
        }
    }
}

impl Default for TimerIrq {
    fn default() -> Self {
        Self::new()
    }
}
