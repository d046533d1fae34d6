//! Static reference catalog of the parameters the scan tool exposes.
//!
//! Read-only data backing a parameter browser: ids, wire commands, units, categories
//! and plausible value ranges. Ad-hoc reads split an entry's wire command into mode
//! and PID for [`crate::Elm327::read_pid`].

use std::fmt;

use strum_macros::EnumIter;

/// Grouping used by the parameter browser's category filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Category {
    Engine,
    Fuel,
    Ignition,
    Emissions,
    Electrical,
    Vehicle,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::Engine => "Engine",
            Category::Fuel => "Fuel",
            Category::Ignition => "Ignition",
            Category::Emissions => "Emissions",
            Category::Electrical => "Electrical",
            Category::Vehicle => "Vehicle",
        };
        write!(f, "{}", name)
    }
}

/// One catalog entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Parameter {
    pub id: &'static str,
    pub name: &'static str,
    /// Full wire command, mode plus PID.
    pub command: &'static str,
    pub description: &'static str,
    pub unit: &'static str,
    pub category: Category,
    /// Whether the module accepts writes for this parameter. Writing is outside this
    /// crate; the flag is carried for the consumer UI.
    pub writable: bool,
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Parameter {
    /// OBD-II mode part of the wire command.
    pub fn mode(&self) -> &str {
        &self.command[..2]
    }

    /// PID part of the wire command.
    pub fn pid(&self) -> &str {
        &self.command[2..]
    }
}

/// Every parameter the tool knows about, in display order.
pub fn parameters() -> &'static [Parameter] {
    PARAMETERS
}

/// Entry with the given id.
pub fn find(id: &str) -> Option<&'static Parameter> {
    PARAMETERS.iter().find(|p| p.id == id)
}

/// Entries in `category`, in catalog order.
pub fn in_category(category: Category) -> impl Iterator<Item = &'static Parameter> {
    PARAMETERS.iter().filter(move |p| p.category == category)
}

static PARAMETERS: &[Parameter] = &[
    Parameter {
        id: "rpm",
        name: "Engine RPM",
        command: "010C",
        description: "Engine speed measured at the crankshaft",
        unit: "rpm",
        category: Category::Engine,
        writable: false,
        min: Some(0.0),
        max: Some(16383.75),
    },
    Parameter {
        id: "speed",
        name: "Vehicle Speed",
        command: "010D",
        description: "Road speed from the vehicle speed sensor",
        unit: "km/h",
        category: Category::Vehicle,
        writable: false,
        min: Some(0.0),
        max: Some(255.0),
    },
    Parameter {
        id: "coolant_temp",
        name: "Coolant Temperature",
        command: "0105",
        description: "Engine coolant temperature at the thermostat housing",
        unit: "°C",
        category: Category::Engine,
        writable: false,
        min: Some(-40.0),
        max: Some(215.0),
    },
    Parameter {
        id: "intake_temp",
        name: "Intake Air Temperature",
        command: "010F",
        description: "Air temperature measured in the intake manifold",
        unit: "°C",
        category: Category::Engine,
        writable: false,
        min: Some(-40.0),
        max: Some(215.0),
    },
    Parameter {
        id: "maf",
        name: "Mass Air Flow",
        command: "0110",
        description: "Air mass entering the engine per second",
        unit: "g/s",
        category: Category::Engine,
        writable: false,
        min: Some(0.0),
        max: Some(655.35),
    },
    Parameter {
        id: "throttle",
        name: "Throttle Position",
        command: "0111",
        description: "Absolute throttle plate position",
        unit: "%",
        category: Category::Engine,
        writable: false,
        min: Some(0.0),
        max: Some(100.0),
    },
    Parameter {
        id: "engine_load",
        name: "Calculated Engine Load",
        command: "0104",
        description: "Current airflow as a fraction of peak airflow",
        unit: "%",
        category: Category::Engine,
        writable: false,
        min: Some(0.0),
        max: Some(100.0),
    },
    Parameter {
        id: "timing_advance",
        name: "Timing Advance",
        command: "010E",
        description: "Spark advance before top dead center, cylinder 1",
        unit: "°",
        category: Category::Ignition,
        writable: false,
        min: Some(-64.0),
        max: Some(63.5),
    },
    Parameter {
        id: "fuel_pressure",
        name: "Fuel Pressure",
        command: "010A",
        description: "Fuel rail gauge pressure",
        unit: "kPa",
        category: Category::Fuel,
        writable: false,
        min: Some(0.0),
        max: Some(765.0),
    },
    Parameter {
        id: "short_fuel_trim_1",
        name: "Short Term Fuel Trim (Bank 1)",
        command: "0106",
        description: "Momentary fueling correction applied by the ECM",
        unit: "%",
        category: Category::Fuel,
        writable: false,
        min: Some(-100.0),
        max: Some(99.2),
    },
    Parameter {
        id: "long_fuel_trim_1",
        name: "Long Term Fuel Trim (Bank 1)",
        command: "0107",
        description: "Learned fueling correction applied by the ECM",
        unit: "%",
        category: Category::Fuel,
        writable: false,
        min: Some(-100.0),
        max: Some(99.2),
    },
    Parameter {
        id: "fuel_level",
        name: "Fuel Level",
        command: "012F",
        description: "Fuel tank level input",
        unit: "%",
        category: Category::Fuel,
        writable: false,
        min: Some(0.0),
        max: Some(100.0),
    },
    Parameter {
        id: "o2_voltage_b1s1",
        name: "O2 Sensor Voltage (Bank 1, Sensor 1)",
        command: "0114",
        description: "Pre-catalyst oxygen sensor output voltage",
        unit: "V",
        category: Category::Emissions,
        writable: false,
        min: Some(0.0),
        max: Some(1.275),
    },
    Parameter {
        id: "barometric_pressure",
        name: "Barometric Pressure",
        command: "0133",
        description: "Absolute ambient air pressure",
        unit: "kPa",
        category: Category::Vehicle,
        writable: false,
        min: Some(0.0),
        max: Some(255.0),
    },
    Parameter {
        id: "control_module_voltage",
        name: "Control Module Voltage",
        command: "0142",
        description: "Battery voltage as seen by the ECM",
        unit: "V",
        category: Category::Electrical,
        writable: false,
        min: Some(0.0),
        max: Some(65.535),
    },
    Parameter {
        id: "ambient_temp",
        name: "Ambient Air Temperature",
        command: "0146",
        description: "Outside air temperature",
        unit: "°C",
        category: Category::Vehicle,
        writable: false,
        min: Some(-40.0),
        max: Some(215.0),
    },
    Parameter {
        id: "engine_oil_temp",
        name: "Engine Oil Temperature",
        command: "015C",
        description: "Oil temperature in the sump",
        unit: "°C",
        category: Category::Engine,
        writable: false,
        min: Some(-40.0),
        max: Some(210.0),
    },
    Parameter {
        id: "engine_runtime",
        name: "Run Time Since Engine Start",
        command: "011F",
        description: "Seconds since the engine was started",
        unit: "s",
        category: Category::Vehicle,
        writable: false,
        min: Some(0.0),
        max: Some(65535.0),
    },
];

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn find_by_id() {
        let rpm = find("rpm").unwrap();
        assert_eq!(rpm.command, "010C");
        assert_eq!(rpm.mode(), "01");
        assert_eq!(rpm.pid(), "0C");

        assert!(find("boost").is_none());
    }

    #[test]
    fn ids_are_unique() {
        for (i, a) in parameters().iter().enumerate() {
            for b in &parameters()[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn commands_are_mode_01_requests() {
        for parameter in parameters() {
            assert_eq!(parameter.command.len(), 4, "{}", parameter.id);
            assert_eq!(parameter.mode(), "01", "{}", parameter.id);
            assert!(
                parameter.command.chars().all(|c| c.is_ascii_hexdigit()),
                "{}",
                parameter.id
            );
        }
    }

    #[test]
    fn every_category_has_entries() {
        for category in Category::iter() {
            assert!(in_category(category).count() > 0, "{}", category);
        }
    }

    #[test]
    fn ranges_are_ordered() {
        for parameter in parameters() {
            if let (Some(min), Some(max)) = (parameter.min, parameter.max) {
                assert!(min < max, "{}", parameter.id);
            }
        }
    }
}
