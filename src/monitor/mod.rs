//! Live data monitor: fixed-period polling of the six dashboard parameters.
//!
//! Each tick issues all six reads concurrently; the command channel serializes them
//! on the wire, so "concurrent" is a convenience for the caller, not the adapter. A
//! tick where any read fails is skipped whole: no snapshot is emitted, the error is
//! logged, and the next tick proceeds. Snapshots never carry stale or partially
//! defaulted fields.

pub mod log;

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_stream::stream;
use tokio::sync::{broadcast, oneshot};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{info, warn};

pub use log::LogEntry;

use crate::elm::channel::ElmChannel;
use crate::obd::{self, Pid};
use crate::Stream;

/// Default tick period for live polling.
pub const DEFAULT_POLL_PERIOD: Duration = Duration::from_millis(1000);
const SNAPSHOT_BUFFER_SIZE: usize = 32;

/// One tick's worth of decoded values.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleSnapshot {
    pub rpm: f64,
    pub speed: f64,
    pub coolant_temp: f64,
    pub intake_temp: f64,
    pub maf: f64,
    pub throttle: f64,
}

impl VehicleSnapshot {
    /// Names addressable through [`VehicleSnapshot::value`].
    pub const NAMES: [&'static str; 6] = [
        "rpm",
        "speed",
        "coolant_temp",
        "intake_temp",
        "maf",
        "throttle",
    ];

    /// Value by parameter name, as used in the session log and the CSV export.
    pub fn value(&self, name: &str) -> Option<f64> {
        match name {
            "rpm" => Some(self.rpm),
            "speed" => Some(self.speed),
            "coolant_temp" => Some(self.coolant_temp),
            "intake_temp" => Some(self.intake_temp),
            "maf" => Some(self.maf),
            "throttle" => Some(self.throttle),
            _ => None,
        }
    }
}

struct PollTask {
    shutdown: oneshot::Sender<()>,
    handle: tokio::task::JoinHandle<()>,
}

/// Polls the adapter at a fixed period while started, broadcasting one
/// [`VehicleSnapshot`] per successful tick and appending to the session log when
/// logging is enabled. `start` and `stop` are both idempotent.
pub struct Monitor {
    channel: Arc<ElmChannel>,
    period: Mutex<Duration>,
    task: Mutex<Option<PollTask>>,
    snapshot_sender: broadcast::Sender<VehicleSnapshot>,
    log: Arc<log::SessionLog>,
}

impl Monitor {
    pub(crate) fn new(channel: Arc<ElmChannel>) -> Self {
        let (snapshot_sender, _) = broadcast::channel(SNAPSHOT_BUFFER_SIZE);

        Monitor {
            channel,
            period: Mutex::new(DEFAULT_POLL_PERIOD),
            task: Mutex::new(None),
            snapshot_sender,
            log: Arc::new(log::SessionLog::default()),
        }
    }

    /// Change the tick period. Takes effect on the next `start`.
    pub fn set_period(&self, period: Duration) {
        *self.period.lock().unwrap() = period;
    }

    /// Whether the poll timer is running.
    pub fn is_polling(&self) -> bool {
        self.task.lock().unwrap().is_some()
    }

    /// Begin polling. No-op when already polling.
    pub fn start(&self) {
        let mut task = self.task.lock().unwrap();
        if task.is_some() {
            return;
        }

        let period = *self.period.lock().unwrap();
        let channel = self.channel.clone();
        let sender = self.snapshot_sender.clone();
        let log = self.log.clone();
        let (shutdown_sender, mut shutdown_receiver) = oneshot::channel();

        let handle = tokio::spawn(async move {
            // First tick lands one full period after start.
            let mut ticks = interval_at(Instant::now() + period, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = &mut shutdown_receiver => break,
                    _ = ticks.tick() => poll_tick(&channel, &sender, &log).await,
                }
            }
        });

        info!("Monitor started");
        *task = Some(PollTask {
            shutdown: shutdown_sender,
            handle,
        });
    }

    /// Stop polling and wait for the poll task to finish. No-op when idle.
    pub async fn stop(&self) {
        let task = self.task.lock().unwrap().take();

        if let Some(task) = task {
            let _ = task.shutdown.send(());
            let _ = task.handle.await;
            info!("Monitor stopped");
        }
    }

    /// Stream of snapshots, one per successful tick. Subscribers joining mid-session
    /// receive snapshots from subscription onward.
    pub fn snapshots(&self) -> impl Stream<Item = VehicleSnapshot> {
        let mut receiver = self.snapshot_sender.subscribe();

        Box::pin(stream! {
            loop {
                match receiver.recv().await {
                    Ok(snapshot) => yield snapshot,
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        warn!("Snapshot subscriber lagged, skipped {}", n);
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    /// Enable or disable logging. Disabling clears the session history.
    pub fn set_logging(&self, enabled: bool) {
        self.log.set_enabled(enabled);
        info!("Logging {}", if enabled { "enabled" } else { "disabled" });
    }

    /// Whether snapshots are currently appended to the session log.
    pub fn is_logging(&self) -> bool {
        self.log.is_enabled()
    }

    /// Entries captured so far in this logging session.
    pub fn log_entries(&self) -> Vec<LogEntry> {
        self.log.entries()
    }

    /// Render the session log as the CSV export contract.
    pub fn export_csv(&self, parameters: &[&str]) -> String {
        self.log.to_csv(parameters)
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        // Cannot await the task here; aborting drops its channel handle so the
        // worker thread is not kept alive past the owning connection.
        if let Some(task) = self.task.lock().unwrap().take() {
            let _ = task.shutdown.send(());
            task.handle.abort();
        }
    }
}

/// One polling tick. All six reads are issued concurrently and joined; any failure
/// skips the tick so a snapshot never mixes fresh and missing values.
async fn poll_tick(
    channel: &ElmChannel,
    sender: &broadcast::Sender<VehicleSnapshot>,
    log: &log::SessionLog,
) {
    let results = tokio::join!(
        obd::read_value_or_default(channel, Pid::Rpm),
        obd::read_value_or_default(channel, Pid::Speed),
        obd::read_value_or_default(channel, Pid::CoolantTemp),
        obd::read_value_or_default(channel, Pid::IntakeTemp),
        obd::read_value_or_default(channel, Pid::Maf),
        obd::read_value_or_default(channel, Pid::Throttle),
    );

    match results {
        (Ok(rpm), Ok(speed), Ok(coolant_temp), Ok(intake_temp), Ok(maf), Ok(throttle)) => {
            let snapshot = VehicleSnapshot {
                rpm,
                speed,
                coolant_temp,
                intake_temp,
                maf,
                throttle,
            };

            // Send only fails when nobody is subscribed, which is fine.
            let _ = sender.send(snapshot.clone());
            log.append(snapshot);
        }
        (r1, r2, r3, r4, r5, r6) => {
            let errors = [r1.err(), r2.err(), r3.err(), r4.err(), r5.err(), r6.err()];
            for e in errors.into_iter().flatten() {
                warn!("Polling tick failed: {}", e);
            }
        }
    }
}
