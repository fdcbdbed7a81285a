//! # Communications interface crate.
//!
//! Provides the message definitions and binary framing used to exchange maneuvers with
//! vehicles.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Vehicle message protocol
pub mod imc;
