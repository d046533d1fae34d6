//! OBD-II request encoding and payload decoding.
//!
//! Requests are the 2-hex-digit mode concatenated with the hex PID (`010C`). Replies
//! come back as ASCII hex echoing the request: `410C1AF8` is mode `01` PID `0C` with
//! two data bytes. [`extract_payload`] picks that line out of whatever else the
//! adapter printed (`SEARCHING...`, `NO DATA`, voltage readouts) and [`Pid::decode`]
//! applies the per-parameter formula.

pub mod vin;

use strum_macros::EnumIter;
use tracing::warn;

use crate::elm::channel::ElmChannel;
use crate::Result;

/// Current-data mode used by all live parameters.
pub const MODE_CURRENT_DATA: &str = "01";
const VIN_COMMAND: &str = "0902";

/// OBD-II parameters the live data monitor polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Pid {
    Rpm = 0x0C,
    Speed = 0x0D,
    CoolantTemp = 0x05,
    IntakeTemp = 0x0F,
    Maf = 0x10,
    Throttle = 0x11,
}

impl Pid {
    /// PID number within mode 01.
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Full wire command, mode plus PID.
    pub fn command(&self) -> String {
        format!("{}{:02X}", MODE_CURRENT_DATA, self.code())
    }

    /// Key used in snapshots and the CSV export.
    pub fn name(&self) -> &'static str {
        match self {
            Pid::Rpm => "rpm",
            Pid::Speed => "speed",
            Pid::CoolantTemp => "coolant_temp",
            Pid::IntakeTemp => "intake_temp",
            Pid::Maf => "maf",
            Pid::Throttle => "throttle",
        }
    }

    /// Unit of the decoded value.
    pub fn unit(&self) -> &'static str {
        match self {
            Pid::Rpm => "rpm",
            Pid::Speed => "km/h",
            Pid::CoolantTemp | Pid::IntakeTemp => "°C",
            Pid::Maf => "g/s",
            Pid::Throttle => "%",
        }
    }

    /// Decode a filtered hex payload into a physical value. Offsets are counted in hex
    /// characters: the first data byte sits at offset 4, after the 4-character
    /// mode+PID echo. Returns `None` when the payload is too short for this parameter.
    pub fn decode(&self, payload: &str) -> Option<f64> {
        match self {
            Pid::Rpm => {
                let (a, b) = two_data_bytes(payload)?;
                Some((a * 256.0 + b) / 4.0)
            }
            Pid::Speed => data_byte(payload),
            Pid::CoolantTemp | Pid::IntakeTemp => Some(data_byte(payload)? - 40.0),
            Pid::Maf => {
                let (a, b) = two_data_bytes(payload)?;
                Some((a * 256.0 + b) / 100.0)
            }
            Pid::Throttle => Some(data_byte(payload)? * 100.0 / 255.0),
        }
    }
}

fn byte_at(payload: &str, offset: usize) -> Option<f64> {
    let pair = payload.get(offset..offset + 2)?;
    u8::from_str_radix(pair, 16).ok().map(f64::from)
}

/// First data byte. Requires the echo prefix plus one byte, 6 hex characters.
fn data_byte(payload: &str) -> Option<f64> {
    if payload.len() < 6 {
        return None;
    }
    byte_at(payload, 4)
}

/// First two data bytes. Requires the echo prefix plus two bytes, 8 hex characters.
fn two_data_bytes(payload: &str) -> Option<(f64, f64)> {
    if payload.len() < 8 {
        return None;
    }
    Some((byte_at(payload, 4)?, byte_at(payload, 6)?))
}

/// Filter a response down to the first non-empty line made of uppercase hex digits
/// and whitespace only, with the whitespace removed. Empty means the vehicle produced
/// no data for the request; callers apply their documented default.
pub fn extract_payload(response: &str) -> String {
    response
        .split('\n')
        .filter(|line| !line.trim().is_empty())
        .find(|line| {
            line.chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c) || c.is_whitespace())
        })
        .map(|line| line.chars().filter(|c| !c.is_whitespace()).collect())
        .unwrap_or_default()
}

/// Issue `mode` + `pid` and return the filtered hex payload line.
pub async fn read_pid(channel: &ElmChannel, mode: &str, pid: &str) -> Result<String> {
    let response = channel.execute(&format!("{}{}", mode, pid)).await?;
    Ok(extract_payload(&response))
}

/// Read and decode one parameter. `None` when the vehicle produced no or too little
/// data.
pub async fn read_value(channel: &ElmChannel, pid: Pid) -> Result<Option<f64>> {
    let response = channel.execute(&pid.command()).await?;
    Ok(pid.decode(&extract_payload(&response)))
}

/// Read and decode one parameter, reporting missing data as 0.
pub async fn read_value_or_default(channel: &ElmChannel, pid: Pid) -> Result<f64> {
    Ok(read_value(channel, pid).await?.unwrap_or(0.0))
}

/// Read the VIN. Never fails: an unreadable VIN is reported as `"Unknown"`.
pub async fn read_vin(channel: &ElmChannel) -> String {
    match channel.execute(VIN_COMMAND).await {
        Ok(response) => vin::parse_vin(&response),
        Err(e) => {
            warn!("VIN request failed: {}", e);
            vin::UNKNOWN.to_string()
        }
    }
}
