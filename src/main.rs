//! gati-core daemon - chassis motion controller against the mock chassis
//!
//! Runs the full control stack in simulation: a timer thread stands in for
//! the hardware interrupt (overflow counter + speed-loop trigger) and the
//! main thread runs the millisecond scheduler and motion task. A demo drive
//! command from the config is staged once startup calibration completes.

use gati_core::config::AppConfig;
use gati_core::error::Result;
use gati_core::hal::mock::MockChassis;
use gati_core::params::{BASIC_TIM_FREQ, TIMER_PERIOD};
use gati_core::timing::HwCounter;
use gati_core::{
    IntervalSampler, MotionController, OverflowCounter, StagedCommand, StatusMirror, TaskId,
    TaskTable, TimerIrq,
};
use signal_hook::consts::{SIGINT, SIGTERM};
use signal_hook::iterator::Signals;
use std::env;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Parse config path from command line arguments.
///
/// Supports `gati-core <path>` and `gati-core --config <path>`; falls back
/// to built-in defaults when no file is given.
fn parse_config_path() -> Option<String> {
    let args: Vec<String> = env::args().collect();

    for i in 1..args.len() {
        if (args[i] == "--config" || args[i] == "-c") && i + 1 < args.len() {
            return Some(args[i + 1].clone());
        }
    }

    if args.len() > 1 && !args[1].starts_with('-') {
        return Some(args[1].clone());
    }

    None
}

/// Simulated low-order counter: phase of the wall clock within one timer
/// period. Pairs only approximately with the thread-driven overflow counter,
/// which is fine for the daemon's cycle statistics.
struct SimCounter {
    start: Instant,
}

impl HwCounter for SimCounter {
    fn count(&self) -> u16 {
        (self.start.elapsed().as_micros() % (TIMER_PERIOD as u128 + 1)) as u16
    }
}

fn main() -> Result<()> {
    let config = match parse_config_path() {
        Some(path) => AppConfig::from_file(&path)?,
        None => AppConfig::defaults(),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.logging.level.clone()),
    )
    .init();

    log::info!("gati-core starting");

    let staged = Arc::new(StagedCommand::new());
    let status = Arc::new(StatusMirror::new());
    let overflow = Arc::new(OverflowCounter::new());
    let shutdown = Arc::new(AtomicBool::new(false));
    let speed_loop_runs = Arc::new(AtomicU64::new(0));

    // Signal handler for graceful shutdown
    {
        let shutdown = Arc::clone(&shutdown);
        let mut signals = Signals::new([SIGINT, SIGTERM])?;
        thread::spawn(move || {
            if let Some(sig) = signals.forever().next() {
                log::info!("Received signal {}, shutting down", sig);
                shutdown.store(true, Ordering::Relaxed);
            }
        });
    }

    // Timer interrupt simulation thread
    let irq_thread = {
        let overflow = Arc::clone(&overflow);
        let shutdown = Arc::clone(&shutdown);
        let speed_loop_runs = Arc::clone(&speed_loop_runs);
        thread::Builder::new()
            .name("gati-timer-irq".to_string())
            .spawn(move || {
                let mut irq = TimerIrq::new();
                let period = Duration::from_micros(1_000_000 / BASIC_TIM_FREQ as u64);
                let mut trigger = || {
                    // Speed-loop PID runs downstream of this core; count the
                    // triggers so the heartbeat can report the rate.
                    speed_loop_runs.fetch_add(1, Ordering::Relaxed);
                };
                while !shutdown.load(Ordering::Relaxed) {
                    irq.on_tick(&overflow, &mut trigger);
                    thread::sleep(period);
                }
            })
            .expect("Failed to spawn timer thread")
    };

    let (chassis, _handle) = MockChassis::new();
    let mut controller = MotionController::new(chassis, Arc::clone(&staged), Arc::clone(&status));

    let counter = SimCounter {
        start: Instant::now(),
    };
    let mut sampler = IntervalSampler::new();
    let started = Instant::now();
    let mut tasks = TaskTable::new(0);
    let mut demo_staged = false;

    log::info!("Control loop running, press Ctrl+C to stop");

    while !shutdown.load(Ordering::Relaxed) {
        let tick = started.elapsed().as_millis() as u32;
        tasks.advance(tick);

        controller.run(&mut tasks);

        if controller.is_running() && !demo_staged {
            demo_staged = true;
            log::info!(
                "Staging demo command: linear={}mm/s angular={}mdeg/s",
                config.demo.linear_mm_s,
                config.demo.angular_mdeg_s
            );
            staged.set(config.demo.linear_mm_s, config.demo.angular_mdeg_s, 0);
        }

        if tasks.take(TaskId::Supervise) {
            let elapsed_us = sampler.sample_us(&overflow, &counter);
            log::trace!("Supervise: {}us since last check", elapsed_us);
        }

        if tasks.take(TaskId::Heartbeat) {
            let snap = status.snapshot();
            log::info!(
                "Status: dist={}mm theta={}mdeg v=({}, {}) protecting={} speed_loop_runs={}",
                snap.distance_mm,
                snap.theta_mdeg,
                snap.velocity.linear,
                snap.velocity.angular,
                snap.protecting,
                speed_loop_runs.load(Ordering::Relaxed)
            );
        }

        thread::sleep(Duration::from_millis(1));
    }

    log::info!("Shutting down");
    irq_thread.join().map_err(|_| {
        gati_core::Error::Other("timer thread panicked".to_string())
    })?;
    log::info!("Shutdown complete");
    Ok(())
}
