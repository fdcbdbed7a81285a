//! # Maneuver library.
//!
//! The maneuver model of the mission planner and its two serialised forms. Maneuvers are edited in
//! memory, saved into plan documents as XML, and sent to vehicles as binary messages. Any of the
//! three can be rebuilt from the others without losing information.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Location module - geodetic positions with a north/east/down offset frame
pub mod loc;

/// Maneuver module - the maneuver kinds and their XML and binary codecs
pub mod mnvr;

/// Speed and z reference units shared by both codecs
pub mod units;

/// XML element tree used for plan documents
pub mod xml;
