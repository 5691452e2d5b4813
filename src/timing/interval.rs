//! Overflow-safe elapsed-time measurement on a free-running counter
//!
//! The low-order hardware counter wraps every `TIMER_PERIOD + 1` counts and
//! raises the timer interrupt, which increments the overflow counter. A
//! sample taken between the wrap and the interrupt servicing would pair a
//! fresh counter value with a stale overflow count, so both are read twice:
//! if the overflow count changed mid-read, the first counter sample is
//! discarded and the second matching pair is used.

use crate::params::{TIMER_COUNT_HZ, TIMER_PERIOD};
use std::sync::atomic::{AtomicU32, Ordering};

/// Timer overflow counter, incremented once per hardware-timer interrupt and
/// read lock-free from the main context.
#[derive(Debug, Default)]
pub struct OverflowCounter(AtomicU32);

impl OverflowCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interrupt-context increment.
    pub fn on_overflow(&self) {
        self.0.fetch_add(1, Ordering::Release);
    }

    pub fn read(&self) -> u32 {
        self.0.load(Ordering::Acquire)
    }
}

/// Low-order free-running counter source.
///
/// On target this is the timer CNT register; tests and the simulator provide
/// their own implementations.
pub trait HwCounter {
    /// Current count in `0..=TIMER_PERIOD`.
    fn count(&self) -> u16;
}

/// Elapsed-tick sampler holding the previous `(overflow, counter)` pair.
///
/// Wrapping subtraction makes a single overflow between successive calls
/// come out correct even when the new counter value is numerically below the
/// old one.
#[derive(Debug, Default)]
pub struct IntervalSampler {
    last_overflow: u32,
    last_count: u16,
}

impl IntervalSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed hardware ticks since the previous call.
    pub fn sample_ticks(&mut self, overflow: &OverflowCounter, counter: &dyn HwCounter) -> u32 {
        let mut ovf = overflow.read();
        let mut cnt = counter.count();
        let ovf_check = overflow.read();

        if ovf != ovf_check {
            // Wrap between the two reads: the first counter sample may pair
            // with the stale overflow count. Take a fresh matching pair.
            ovf = ovf_check;
            cnt = counter.count();
        }

        let ticks = ovf
            .wrapping_sub(self.last_overflow)
            .wrapping_mul(TIMER_PERIOD as u32 + 1)
            .wrapping_add(cnt as u32)
            .wrapping_sub(self.last_count as u32);

        self.last_overflow = ovf;
        self.last_count = cnt;

        ticks
    }

    /// Elapsed microseconds since the previous call.
    pub fn sample_us(&mut self, overflow: &OverflowCounter, counter: &dyn HwCounter) -> u32 {
        (self.sample_ticks(overflow, counter) as u64 * 1_000_000 / TIMER_COUNT_HZ) as u32
    }
}
