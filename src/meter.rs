//! Frame throughput counters
//!
//! Counts processed and skipped frames and logs the rates periodically.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::info;

pub static METER: Meter = Meter::new();

/// Interval between rate log lines
const LOG_INTERVAL: Duration = Duration::from_secs(2);

#[derive(Debug, Default)]
pub struct Meter {
    frames: AtomicU64,
    skipped: AtomicU64,
}

impl Meter {
    pub const fn new() -> Meter {
        Meter {
            frames: AtomicU64::new(0),
            skipped: AtomicU64::new(0),
        }
    }

    pub fn tick_frame(&self) {
        self.frames.fetch_add(1, Ordering::Relaxed);
    }

    pub fn tick_skipped(&self) {
        self.skipped.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_reset_frames(&self) -> u64 {
        self.frames.swap(0, Ordering::Relaxed)
    }

    pub fn get_reset_skipped(&self) -> u64 {
        self.skipped.swap(0, Ordering::Relaxed)
    }
}

/// Spawn a task logging frame rates from `METER`
pub fn spawn_meter_logger() -> JoinHandle<()> {
    tokio::spawn(async {
        let mut log_interval = interval(LOG_INTERVAL);
        log_interval.tick().await;

        loop {
            let start = Instant::now();
            log_interval.tick().await;

            let frames = METER.get_reset_frames();
            let skipped = METER.get_reset_skipped();
            let elapsed = start.elapsed().as_secs_f32();

            if frames > 0 || skipped > 0 {
                info!(
                    fps = %format!("{:.2}", frames as f32 / elapsed),
                    skipped_per_sec = %format!("{:.2}", skipped as f32 / elapsed),
                    "frame rate"
                );
            }
        }
    })
}
