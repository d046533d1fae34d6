//! In-memory session log and the CSV export contract consumed by the logger UI.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, SecondsFormat, Utc};

use crate::monitor::VehicleSnapshot;

/// One logged snapshot with its capture time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub snapshot: VehicleSnapshot,
}

/// Append-only log of snapshots captured while logging is enabled. Disabling logging
/// discards the history rather than pausing it.
#[derive(Debug, Default)]
pub(crate) struct SessionLog {
    enabled: AtomicBool,
    entries: Mutex<Vec<LogEntry>>,
}

impl SessionLog {
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Release);
        if !enabled {
            self.entries.lock().unwrap().clear();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Record `snapshot` with the current time. No-op while logging is disabled.
    pub fn append(&self, snapshot: VehicleSnapshot) {
        if !self.is_enabled() {
            return;
        }

        let entry = LogEntry {
            timestamp: Utc::now(),
            snapshot,
        };
        self.entries.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn to_csv(&self, parameters: &[&str]) -> String {
        to_csv(&self.entries(), parameters)
    }
}

/// Render entries as the export contract: a `Timestamp,<names>` header and one row
/// per entry, timestamps in ISO-8601 with millisecond precision, parameter names not
/// present in a snapshot rendered as 0.
pub fn to_csv(entries: &[LogEntry], parameters: &[&str]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);

    let mut header = String::from("Timestamp");
    for name in parameters {
        header.push(',');
        header.push_str(name);
    }
    lines.push(header);

    for entry in entries {
        let mut row = entry.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true);
        for name in parameters {
            row.push(',');
            row.push_str(&entry.snapshot.value(name).unwrap_or(0.0).to_string());
        }
        lines.push(row);
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(timestamp: &str, rpm: f64, speed: f64) -> LogEntry {
        LogEntry {
            timestamp: timestamp.parse().unwrap(),
            snapshot: VehicleSnapshot {
                rpm,
                speed,
                ..Default::default()
            },
        }
    }

    #[test]
    fn append_requires_logging_enabled() {
        let log = SessionLog::default();
        log.append(VehicleSnapshot::default());
        assert!(log.entries().is_empty());

        log.set_enabled(true);
        log.append(VehicleSnapshot::default());
        assert_eq!(log.entries().len(), 1);
    }

    #[test]
    fn disabling_discards_history() {
        let log = SessionLog::default();
        log.set_enabled(true);
        log.append(VehicleSnapshot::default());
        log.append(VehicleSnapshot::default());
        assert_eq!(log.entries().len(), 2);

        log.set_enabled(false);
        assert!(log.entries().is_empty());
    }

    #[test]
    fn csv_header_and_rows() {
        let entries = vec![
            entry("2024-01-01T00:00:00Z", 1726.0, 65.0),
            entry("2024-01-01T00:00:01Z", 1800.0, 66.0),
        ];

        let csv = to_csv(&entries, &["rpm", "speed"]);
        assert_eq!(
            csv,
            "Timestamp,rpm,speed\n\
             2024-01-01T00:00:00.000Z,1726,65\n\
             2024-01-01T00:00:01.000Z,1800,66"
        );
    }

    #[test]
    fn csv_unknown_parameter_renders_as_zero() {
        let entries = vec![entry("2024-01-01T00:00:00Z", 1726.0, 65.0)];

        let csv = to_csv(&entries, &["rpm", "boost"]);
        assert_eq!(csv, "Timestamp,rpm,boost\n2024-01-01T00:00:00.000Z,1726,0");
    }

    #[test]
    fn csv_empty_log_is_header_only() {
        assert_eq!(to_csv(&[], &["rpm"]), "Timestamp,rpm");
    }
}
