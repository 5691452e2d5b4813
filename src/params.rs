//! Control-loop timing and protection constants
//!
//! All rates are compile-time constants: the scheduler table, the interrupt
//! divider, and the protection counters are sized from these values, so
//! changing a frequency here re-sizes the whole timing chain consistently.

/// Scheduler tick rate (Hz). One tick per millisecond.
pub const TICK_FREQ: u32 = 1_000;

/// Motion task rate (Hz). Must divide `TICK_FREQ`.
pub const MOTION_FREQ: u32 = 500;

/// Sensor protection check rate (Hz). Must divide `MOTION_FREQ`.
pub const PROTECT_FREQ: u16 = 500;

/// Supervision task rate (Hz).
pub const SUPERVISE_FREQ: u32 = 100;

/// Heartbeat / status log rate (Hz).
pub const HEARTBEAT_FREQ: u32 = 1;

/// Motion cycle period in microseconds.
pub const MOTION_PERIOD_US: i64 = (1_000_000 / MOTION_FREQ) as i64;

/// Basic hardware timer interrupt rate (Hz).
pub const BASIC_TIM_FREQ: u32 = 10_000;

/// Auto-reload value of the low-order hardware counter.
///
/// The counter counts 0..=TIMER_PERIOD, so its clock is
/// `BASIC_TIM_FREQ * (TIMER_PERIOD + 1)` = `TIMER_COUNT_HZ`.
pub const TIMER_PERIOD: u16 = 99;

/// Hardware counter clock (Hz). One count per microsecond.
pub const TIMER_COUNT_HZ: u64 = BASIC_TIM_FREQ as u64 * (TIMER_PERIOD as u64 + 1);

/// Speed-control sub-loop divider: interrupts per speed-loop invocation.
pub const SPEED_LOOP_DIVISOR: u32 = BASIC_TIM_FREQ / MOTION_FREQ;

/// Millidegrees in a full turn.
pub const FULL_TURN_MDEG: i32 = 360_000;

/// Angular-rate noise threshold (mdeg/s): one quarter of a degree per second.
///
/// Below this rate the angular integration is suppressed entirely so that
/// encoder noise while near-stationary does not walk the heading.
pub const W_NOISE_TH: i32 = 250;

/// Fixed-point scale between (mm/s x us) products and whole millimeters.
pub const FIXED_POINT_SCALE: i64 = 1_000_000;

/// Reverse creep speed commanded while backing away from a hazard (mm/s).
pub const CREEP_SPEED_MM_S: i32 = -150;

/// Reverse travel needed to clear a hazard before releasing protection (mm).
pub const CLEARANCE_MM: i32 = 20;

/// Continuous-hazard timeout before giving up the creep and latching (s).
pub const PROTECT_TIMEOUT_S: u16 = 3;

/// Motion cycles spent holding the drop sensor in calibration mode at startup.
pub const DROP_CALIBRATION_CYCLES: u16 = 500;
