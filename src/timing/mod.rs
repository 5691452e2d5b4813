//! Timing backbone: periodic task scheduling and overflow-safe interval
//! measurement.
//!
//! Two execution contexts share this module: the hardware timer interrupt
//! (overflow counter, speed-loop divider) and the main control context
//! (scheduler table, interval sampler). The only cross-context state is the
//! overflow counter, which is kept safe by double-sample-and-compare rather
//! than a lock.

pub mod interval;
pub mod scheduler;

pub use interval::{HwCounter, IntervalSampler, OverflowCounter};
pub use scheduler::{SubLoopDivider, TaskId, TaskTable};
