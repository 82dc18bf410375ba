use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Distance unit an odometer is recorded in.
///
/// Tagliando never converts between units; a vehicle keeps the unit it was
/// created with and every derived figure (distance, efficiency, cost per
/// mile) is expressed in it. The enum exists so the stored code is a closed
/// set rather than a free string.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MileageUnit {
    #[default]
    Mi,
    Km,
}

impl MileageUnit {
    /// Canonical unit code as stored in the database.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            MileageUnit::Mi => "mi",
            MileageUnit::Km => "km",
        }
    }
}

impl core::fmt::Display for MileageUnit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.code())
    }
}

impl TryFrom<&str> for MileageUnit {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mi" => Ok(MileageUnit::Mi),
            "km" => Ok(MileageUnit::Km),
            other => Err(EngineError::InvalidUnit(format!(
                "unsupported mileage unit: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_known_codes() {
        assert_eq!(MileageUnit::try_from("mi").unwrap(), MileageUnit::Mi);
        assert_eq!(MileageUnit::try_from(" KM ").unwrap(), MileageUnit::Km);
        assert!(MileageUnit::try_from("leagues").is_err());
    }
}
