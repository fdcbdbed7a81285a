//! # Wire enumerations
//!
//! Enumerated fields of the maneuver messages. On the wire these are carried as raw `u8`
//! ordinals so that a message with an ordinal this crate doesn't know about can still be framed
//! and unframed, leaving the decision of what to do with it to the receiver.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Units of the `speed` field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MsgSpeedUnits {
    /// Meters per second
    MetersPs,

    /// Propeller revolutions per minute
    Rpm,

    /// Percentage of the maximum actuation
    Percentage,
}

/// Reference of the `z` field.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MsgZUnits {
    /// No z reference, the value is ignored
    None,

    /// Depth below the surface in meters
    Depth,

    /// Altitude above the bottom in meters
    Altitude,

    /// Height above the WGS-84 ellipsoid in meters
    Height,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MsgSpeedUnits {
    /// All variants in ordinal order.
    pub const ALL: [MsgSpeedUnits; 3] = [
        MsgSpeedUnits::MetersPs,
        MsgSpeedUnits::Rpm,
        MsgSpeedUnits::Percentage,
    ];

    /// The ordinal used on the wire.
    pub fn ordinal(self) -> u8 {
        match self {
            MsgSpeedUnits::MetersPs => 0,
            MsgSpeedUnits::Rpm => 1,
            MsgSpeedUnits::Percentage => 2,
        }
    }

    /// Get the variant for a wire ordinal, or `None` if the ordinal is unknown.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|u| u.ordinal() == ordinal)
    }

    /// The symbolic name of the variant as given in the message definitions.
    pub fn name(self) -> &'static str {
        match self {
            MsgSpeedUnits::MetersPs => "METERS_PS",
            MsgSpeedUnits::Rpm => "RPM",
            MsgSpeedUnits::Percentage => "PERCENTAGE",
        }
    }

    /// Get the variant from its symbolic name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|u| u.name() == name)
    }
}

impl MsgZUnits {
    /// All variants in ordinal order.
    pub const ALL: [MsgZUnits; 4] = [
        MsgZUnits::None,
        MsgZUnits::Depth,
        MsgZUnits::Altitude,
        MsgZUnits::Height,
    ];

    /// The ordinal used on the wire.
    pub fn ordinal(self) -> u8 {
        match self {
            MsgZUnits::None => 0,
            MsgZUnits::Depth => 1,
            MsgZUnits::Altitude => 2,
            MsgZUnits::Height => 3,
        }
    }

    /// Get the variant for a wire ordinal, or `None` if the ordinal is unknown.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|u| u.ordinal() == ordinal)
    }

    /// The symbolic name of the variant as given in the message definitions.
    pub fn name(self) -> &'static str {
        match self {
            MsgZUnits::None => "NONE",
            MsgZUnits::Depth => "DEPTH",
            MsgZUnits::Altitude => "ALTITUDE",
            MsgZUnits::Height => "HEIGHT",
        }
    }

    /// Get the variant from its symbolic name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|u| u.name() == name)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_ordinals_and_names() {
        for u in MsgSpeedUnits::ALL.iter() {
            assert_eq!(MsgSpeedUnits::from_ordinal(u.ordinal()), Some(*u));
            assert_eq!(MsgSpeedUnits::from_name(u.name()), Some(*u));
        }
        for u in MsgZUnits::ALL.iter() {
            assert_eq!(MsgZUnits::from_ordinal(u.ordinal()), Some(*u));
            assert_eq!(MsgZUnits::from_name(u.name()), Some(*u));
        }

        assert_eq!(MsgSpeedUnits::Rpm.ordinal(), 1);
        assert_eq!(MsgSpeedUnits::from_ordinal(3), None);
        assert_eq!(MsgZUnits::from_ordinal(200), None);
        assert_eq!(MsgZUnits::from_name("depth"), None);
    }
}
