//! Parameters structure for maneuver construction

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::units::SpeedUnits;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Defaults used for new CoverArea maneuvers and for fields a binary message doesn't carry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct CoverAreaParams {
    /// Speed reference, interpreted according to `speed_units`.
    pub speed: f64,

    pub speed_units: SpeedUnits,

    /// Allowed deviation from `speed`, in the same units.
    pub speed_tolerance: f64,

    /// Distance within which a point counts as reached.
    ///
    /// Units: meters
    pub radius_tolerance_m: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for CoverAreaParams {
    fn default() -> Self {
        Self {
            speed: 1000.0,
            speed_units: SpeedUnits::Rpm,
            speed_tolerance: 0.0,
            radius_tolerance_m: 2.0,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_load_params_file() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../params/mnvr.toml");
        let params: CoverAreaParams = util::params::load(path).unwrap();
        assert_eq!(params, CoverAreaParams::default());
    }

    #[test]
    fn test_partial_params() {
        let params: CoverAreaParams = util::params::from_str(
            r#"
            speed = 1.5
            speed_units = "MetersPerSecond"
            "#,
        )
        .unwrap();

        assert_eq!(params.speed, 1.5);
        assert_eq!(params.speed_units, SpeedUnits::MetersPerSecond);
        assert_eq!(params.radius_tolerance_m, 2.0);
    }
}
