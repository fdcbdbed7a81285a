//! # Units
//!
//! Speed units and z references shared by the XML and binary codecs. Each enum maps one to one
//! onto the wire enumerations in [`comms_if::imc`] and onto the strings used in plan documents.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::imc::{MsgSpeedUnits, MsgZUnits};
use serde::{Deserialize, Serialize};
use std::fmt;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Units in which a maneuver's speed is given.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedUnits {
    Rpm,
    MetersPerSecond,
    Percentage,
}

/// What a location's z value is measured against.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZUnits {
    /// No reference, the z value carries no meaning
    None,

    /// Depth below the surface, positive down
    Depth,

    /// Altitude above the bottom, positive up
    Altitude,

    /// Height above the ellipsoid, positive up
    Height,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SpeedUnits {
    /// Units used when a document or message gives units that can't be understood.
    pub const DEFAULT: SpeedUnits = SpeedUnits::Rpm;

    /// The string written into plan documents.
    pub fn as_xml_str(self) -> &'static str {
        match self {
            SpeedUnits::Rpm => "RPM",
            SpeedUnits::MetersPerSecond => "m/s",
            SpeedUnits::Percentage => "%",
        }
    }

    /// Parse the units from a plan document string.
    ///
    /// Matching is case-insensitive and accepts the older spellings found in legacy plans.
    pub fn from_xml_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rpm" => Some(SpeedUnits::Rpm),
            "m/s" | "mps" | "meters_ps" | "meters per second" => Some(SpeedUnits::MetersPerSecond),
            "%" | "percent" | "percentage" => Some(SpeedUnits::Percentage),
            _ => None,
        }
    }

    /// Get the units for a wire ordinal, or `None` if the ordinal is unknown.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        MsgSpeedUnits::from_ordinal(ordinal).map(Self::from)
    }

    /// The ordinal written on the wire.
    pub fn ordinal(self) -> u8 {
        MsgSpeedUnits::from(self).ordinal()
    }
}

impl ZUnits {
    /// Reference used when a document or message gives one that can't be understood.
    pub const DEFAULT: ZUnits = ZUnits::None;

    /// The string written into plan documents, the same as the wire name.
    pub fn as_xml_str(self) -> &'static str {
        MsgZUnits::from(self).name()
    }

    /// Parse the reference from a plan document string, ignoring case.
    pub fn from_xml_str(s: &str) -> Option<Self> {
        MsgZUnits::from_name(&s.trim().to_ascii_uppercase()).map(Self::from)
    }

    /// Get the reference for a wire ordinal, or `None` if the ordinal is unknown.
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        MsgZUnits::from_ordinal(ordinal).map(Self::from)
    }

    /// The ordinal written on the wire.
    pub fn ordinal(self) -> u8 {
        MsgZUnits::from(self).ordinal()
    }

    /// The sign of this reference's z axis relative to "down".
    ///
    /// A z value `z` sits `z * down_sign()` meters below the reference surface.
    pub fn down_sign(self) -> f64 {
        match self {
            ZUnits::Depth => 1.0,
            ZUnits::Altitude | ZUnits::Height => -1.0,
            ZUnits::None => 0.0,
        }
    }
}

impl Default for SpeedUnits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl Default for ZUnits {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for SpeedUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_xml_str())
    }
}

impl fmt::Display for ZUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_xml_str())
    }
}

impl From<MsgSpeedUnits> for SpeedUnits {
    fn from(u: MsgSpeedUnits) -> Self {
        match u {
            MsgSpeedUnits::MetersPs => SpeedUnits::MetersPerSecond,
            MsgSpeedUnits::Rpm => SpeedUnits::Rpm,
            MsgSpeedUnits::Percentage => SpeedUnits::Percentage,
        }
    }
}

impl From<SpeedUnits> for MsgSpeedUnits {
    fn from(u: SpeedUnits) -> Self {
        match u {
            SpeedUnits::MetersPerSecond => MsgSpeedUnits::MetersPs,
            SpeedUnits::Rpm => MsgSpeedUnits::Rpm,
            SpeedUnits::Percentage => MsgSpeedUnits::Percentage,
        }
    }
}

impl From<MsgZUnits> for ZUnits {
    fn from(u: MsgZUnits) -> Self {
        match u {
            MsgZUnits::None => ZUnits::None,
            MsgZUnits::Depth => ZUnits::Depth,
            MsgZUnits::Altitude => ZUnits::Altitude,
            MsgZUnits::Height => ZUnits::Height,
        }
    }
}

impl From<ZUnits> for MsgZUnits {
    fn from(u: ZUnits) -> Self {
        match u {
            ZUnits::None => MsgZUnits::None,
            ZUnits::Depth => MsgZUnits::Depth,
            ZUnits::Altitude => MsgZUnits::Altitude,
            ZUnits::Height => MsgZUnits::Height,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
