//! Measurement system handling
//!
//! Excellon selects units with `M71` (metric) and `M72` (inch). The same
//! choice maps onto the G-code unit words `G21` and `G20`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Measurement system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementSystem {
    /// Metric system (mm)
    Metric,
    /// Imperial system (inches)
    Imperial,
}

impl MeasurementSystem {
    /// Map an Excellon unit M-code onto a measurement system
    pub fn from_excellon_mcode(code: i64) -> Option<Self> {
        match code {
            71 => Some(Self::Metric),
            72 => Some(Self::Imperial),
            _ => None,
        }
    }

    /// G-code word selecting this system
    pub fn gcode_word(&self) -> &'static str {
        match self {
            Self::Metric => "G21",
            Self::Imperial => "G20",
        }
    }

    /// Label written next to the unit word in generated programs
    pub fn gcode_label(&self) -> &'static str {
        match self {
            Self::Metric => "METRIC",
            Self::Imperial => "INCHES",
        }
    }

    /// Short length unit name
    pub fn unit_name(&self) -> &'static str {
        match self {
            Self::Metric => "mm",
            Self::Imperial => "in",
        }
    }
}

impl fmt::Display for MeasurementSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metric => write!(f, "Metric"),
            Self::Imperial => write!(f, "Imperial"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_excellon_mcode() {
        assert_eq!(
            MeasurementSystem::from_excellon_mcode(71),
            Some(MeasurementSystem::Metric)
        );
        assert_eq!(
            MeasurementSystem::from_excellon_mcode(72),
            Some(MeasurementSystem::Imperial)
        );
        assert_eq!(MeasurementSystem::from_excellon_mcode(48), None);
    }

    #[test]
    fn test_gcode_words() {
        assert_eq!(MeasurementSystem::Metric.gcode_word(), "G21");
        assert_eq!(MeasurementSystem::Imperial.gcode_word(), "G20");
        assert_eq!(MeasurementSystem::Imperial.gcode_label(), "INCHES");
    }
}
