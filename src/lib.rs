//! # The Scantool Crate
//! Welcome to the `scantool` crate documentation. This crate talks to ELM327 OBD-II
//! interpreter adapters over a serial link: it drives the AT setup sequence, issues
//! PID requests, decodes the ASCII-hex replies into physical values, and polls a
//! dashboard's worth of parameters at a fixed period.
//!
//! ## Reading Parameters
//!
//! The following opens an adapter on a serial port, connects, and reads a few values.
//! The adapter is half-duplex, so commands from any number of tasks are serialized
//! internally by a single command channel.
//!
//! ```rust
//! async fn read_example() {
//!     let transport = scantool::serial::SerialTransport::open("/dev/ttyUSB0").unwrap();
//!     let elm = scantool::Elm327::connect(transport).await.unwrap();
//!
//!     println!("VIN: {}", elm.vin().await);
//!     println!("RPM: {}", elm.rpm().await.unwrap());
//!     println!("Coolant: {} °C", elm.coolant_temp().await.unwrap());
//!
//!     elm.disconnect().await;
//! }
//! ```
//!
//! ## Live Data
//!
//! The monitor polls the six dashboard parameters once per second and yields one
//! [`monitor::VehicleSnapshot`] per successful tick as an async stream.
//!
//! ```rust
//! use scantool::StreamExt;
//!
//! async fn live_data_example(elm: scantool::Elm327) {
//!     let mut snapshots = elm.monitor().snapshots();
//!     elm.monitor().start();
//!
//!     while let Some(snapshot) = snapshots.next().await {
//!         println!("{:.0} rpm\t{:.0} km/h", snapshot.rpm, snapshot.speed);
//!     }
//! }
//! ```

pub mod catalog;
pub mod elm;
mod error;
pub mod monitor;
pub mod obd;
pub mod serial;
pub mod transport;

pub use elm::Elm327;
pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;

pub use tokio_stream::{Stream, StreamExt};
