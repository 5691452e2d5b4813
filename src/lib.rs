//! gati-core - Closed-loop motion control core for a wheeled robot chassis
//!
//! Fuses wheel-speed feedback into a fixed-point pose estimate, arbitrates
//! between externally staged velocity commands and sensor-triggered safety
//! overrides, and drives the downstream speed loop from a tick-driven
//! periodic scheduler.
//!
//! The hardware surface (speed loop, motor driver, hazard sensors, fault
//! flags) is abstracted behind [`hal::ChassisHal`]; [`hal::mock::MockChassis`]
//! provides a hardware-free implementation for tests and simulation.

pub mod command;
pub mod config;
pub mod controller;
pub mod error;
pub mod hal;
pub mod interrupt;
pub mod odometry;
pub mod params;
pub mod protection;
pub mod status;
pub mod timing;

// Re-export commonly used types
pub use command::StagedCommand;
pub use config::AppConfig;
pub use controller::MotionController;
pub use error::{Error, Result};
pub use hal::ChassisHal;
pub use interrupt::TimerIrq;
pub use odometry::{Odometer, Pose, Velocity};
pub use protection::ProtectionMonitor;
pub use status::{StatusMirror, StatusSnapshot};
pub use timing::{IntervalSampler, OverflowCounter, TaskId, TaskTable};
