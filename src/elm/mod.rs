//! ELM327 device handle: connection lifecycle, parameter getters and ad-hoc reads.
//! ## Example
//! ```rust
//! async fn elm_example() {
//!     let transport = scantool::serial::SerialTransport::open("/dev/ttyUSB0").unwrap();
//!     let elm = scantool::Elm327::connect(transport).await.unwrap();
//!
//!     println!("VIN: {}", elm.vin().await);
//!     println!("Speed: {} km/h", elm.speed().await.unwrap());
//!
//!     elm.disconnect().await;
//! }
//! ```

pub mod channel;
mod init;

use std::sync::Arc;

use tracing::{info, warn};

pub use channel::ElmChannel;

use crate::monitor::Monitor;
use crate::obd::{self, Pid};
use crate::transport::Transport;
use crate::Result;

/// Handle to a connected ELM327 adapter. Owns the command channel and the live data
/// monitor; every consumer of the connection (getters, ad-hoc reads, the monitor)
/// shares the same channel, which serializes their exchanges.
pub struct Elm327 {
    channel: Arc<ElmChannel>,
    monitor: Monitor,
}

impl Elm327 {
    /// Open the adapter over `transport` and run the AT setup sequence. On any
    /// initialization fault the worker is shut down, the transport released, and the
    /// error returned.
    pub async fn connect<T: Transport + Send + 'static>(transport: T) -> Result<Elm327> {
        let channel = Arc::new(ElmChannel::new(transport));

        if let Err(e) = init::initialize(&channel).await {
            warn!("Initialization failed: {}", e);
            channel.close();
            return Err(e);
        }

        info!("Connected");
        Ok(Elm327 {
            monitor: Monitor::new(channel.clone()),
            channel,
        })
    }

    /// Whether commands can currently be issued.
    pub fn is_connected(&self) -> bool {
        self.channel.is_connected()
    }

    /// Stop polling if active, then shut down the channel and release the transport.
    pub async fn disconnect(&self) {
        self.monitor.stop().await;
        self.channel.close();
        info!("Disconnected");
    }

    /// Live data monitor for this connection.
    pub fn monitor(&self) -> &Monitor {
        &self.monitor
    }

    /// Issue an ad-hoc OBD-II request and return the filtered hex payload line. An
    /// empty string means the vehicle produced no data for this request.
    pub async fn read_pid(&self, mode: &str, pid: &str) -> Result<String> {
        obd::read_pid(&self.channel, mode, pid).await
    }

    /// Vehicle Identification Number (mode 09 PID 02). Returns `"Unknown"` when the
    /// vehicle does not report one or the exchange fails; an unreadable VIN is never
    /// fatal to the connection.
    pub async fn vin(&self) -> String {
        obd::read_vin(&self.channel).await
    }

    /// Decoded value for `pid`, with missing or too-short data reported as 0. This is
    /// the surface the named getters are built on.
    pub async fn value(&self, pid: Pid) -> Result<f64> {
        obd::read_value_or_default(&self.channel, pid).await
    }

    /// Decoded value for `pid`, with missing or too-short data reported as `None`.
    /// Use this over [`Elm327::value`] when a genuine zero reading must be
    /// distinguishable from absent data.
    pub async fn value_opt(&self, pid: Pid) -> Result<Option<f64>> {
        obd::read_value(&self.channel, pid).await
    }

    /// Engine speed in rpm.
    pub async fn rpm(&self) -> Result<f64> {
        self.value(Pid::Rpm).await
    }

    /// Vehicle speed in km/h.
    pub async fn speed(&self) -> Result<f64> {
        self.value(Pid::Speed).await
    }

    /// Engine coolant temperature in °C.
    pub async fn coolant_temp(&self) -> Result<f64> {
        self.value(Pid::CoolantTemp).await
    }

    /// Intake air temperature in °C.
    pub async fn intake_temp(&self) -> Result<f64> {
        self.value(Pid::IntakeTemp).await
    }

    /// Mass air flow rate in g/s.
    pub async fn maf(&self) -> Result<f64> {
        self.value(Pid::Maf).await
    }

    /// Throttle position in percent.
    pub async fn throttle(&self) -> Result<f64> {
        self.value(Pid::Throttle).await
    }
}
