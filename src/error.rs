//! Contains the main error type for the library.
use thiserror::Error;

/// The main error type for the library. Absent or malformed response data is not an
/// error: numeric getters resolve it to a default and the VIN getter to `"Unknown"`.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Not Connected")]
    NotConnected,
    #[error("Timeout")]
    Timeout,
    #[error("Connection Closed")]
    ConnectionClosed,
    #[error(transparent)]
    Connection(#[from] serialport::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
