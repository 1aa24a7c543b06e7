//! The clock timer: the single source of time for the app.
//!
//! On every tick the timer reads the wall clock in the configured timezone
//! and feeds `"<hour> <minute> <second>"` to the app as sender `"timer"`.

use crate::app::SharedApp;
use crate::common::TIMER_SENDER;
use crate::config::ClockConfig;
use chrono::{Timelike, Utc};
use chrono_tz::Tz;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, trace};

/// Formats a time of day the way the model expects it.
pub fn format_time(time: &impl Timelike) -> String {
    format!("{} {} {}", time.hour(), time.minute(), time.second())
}

/// Samples the wall clock at a fixed period.
///
/// Every tick is recorded as an undoable command and the history is never
/// trimmed, so a long-running timer grows it without bound.
#[derive(Debug)]
pub struct ClockTimer {
    period: Duration,
    timezone: Tz,
    enabled: Arc<AtomicBool>,
}

impl ClockTimer {
    pub fn new(config: &ClockConfig) -> Self {
        Self {
            period: config.resolution.period(),
            timezone: config.timezone,
            enabled: Arc::new(AtomicBool::new(true)),
        }
    }

    /// A flag that pauses the timer while `false`. Ticks are skipped, not queued.
    pub fn enabled_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.enabled)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// The current local time in the configured timezone.
    pub fn sample(&self) -> String {
        format_time(&Utc::now().with_timezone(&self.timezone))
    }

    /// Ticks until `shutdown_rx` fires. A failed tick is logged and the timer keeps going.
    pub async fn run(self, app: SharedApp, mut shutdown_rx: broadcast::Receiver<()>) {
        let mut ticker = tokio::time::interval(self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut tick_count: u64 = 0;
        info!("ClockTimer running every {:?} in {}.", self.period, self.timezone);
        loop {
            tokio::select! {
                biased;
                _ = shutdown_rx.recv() => break,
                _ = ticker.tick() => {
                    if !self.enabled.load(Ordering::Relaxed) {
                        continue;
                    }
                    tick_count += 1;
                    let time = self.sample();
                    trace!("Tick #{}: {}", tick_count, time);
                    if let Err(e) = app.lock().await.input_entered(&time, TIMER_SENDER) {
                        error!("Tick #{} failed: {}", tick_count, e);
                    }
                }
            }
        }
        info!("ClockTimer stopped after {} ticks.", tick_count);
    }
}
