//! # Location module
//!
//! Geodetic positions with an attached north/east/down offset frame.
//!
//! A [`Location`] is a reference position (WGS-84 latitude and longitude plus a z value) and an
//! offset in meters from that reference. A location with a zero offset is *absolute*, otherwise it
//! is *relative*. Offsets are applied on the local tangent plane at the reference position, which
//! is accurate over the short baselines maneuvers span.
//!
//! [`Location::translate`] and [`Location::offset_from`] are exact inverses about the same
//! origin, up to floating point round-off:
//!
//! ```
//! use mnvr_lib::loc::Location;
//!
//! let origin = Location::from_degrees(41.18, -8.70);
//! let moved = origin.translated(120.0, -45.0, 0.0);
//! let offset = moved.offset_from(&origin);
//!
//! assert!((offset.x - 120.0).abs() < 1e-6);
//! assert!((offset.y + 45.0).abs() < 1e-6);
//! ```

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod angle;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, PI};

use crate::units::ZUnits;
use util::maths::{approx_eq, wrap_pi};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// WGS-84 semi-major axis.
///
/// Units: meters
pub const WGS84_A: f64 = 6_378_137.0;

/// WGS-84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// WGS-84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A geodetic position, optionally expressed as an offset from a reference position.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Latitude of the reference position.
    ///
    /// Units: radians
    pub lat_rad: f64,

    /// Longitude of the reference position.
    ///
    /// Units: radians
    pub lon_rad: f64,

    /// Z value of the reference position, measured according to `z_units`.
    ///
    /// Units: meters
    pub z: f64,

    /// What `z` is measured against.
    pub z_units: ZUnits,

    /// Offset from the reference position.
    ///
    /// Units: meters,
    /// Frame: North/East/Down at the reference position
    pub offset_m_ned: Vector3<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Location {
    /// Create a new absolute location with no z reference.
    pub fn new(lat_rad: f64, lon_rad: f64) -> Self {
        let mut loc = Self {
            lat_rad,
            lon_rad,
            z: 0.0,
            z_units: ZUnits::None,
            offset_m_ned: Vector3::zeros(),
        };
        loc.normalize();
        loc
    }

    /// Create a new absolute location from decimal degrees.
    pub fn from_degrees(lat_deg: f64, lon_deg: f64) -> Self {
        Self::new(lat_deg.to_radians(), lon_deg.to_radians())
    }

    /// Set the z value and its reference.
    pub fn with_z(mut self, z: f64, z_units: ZUnits) -> Self {
        self.z = z;
        self.z_units = z_units;
        self
    }

    /// Returns true if the location has no offset from its reference.
    pub fn is_absolute(&self) -> bool {
        self.offset_m_ned == Vector3::zeros()
    }

    /// Absolute latitude in radians.
    pub fn latitude_rad(&self) -> f64 {
        self.to_absolute().lat_rad
    }

    /// Absolute longitude in radians.
    pub fn longitude_rad(&self) -> f64 {
        self.to_absolute().lon_rad
    }

    /// Absolute latitude in degrees.
    pub fn latitude_deg(&self) -> f64 {
        self.latitude_rad().to_degrees()
    }

    /// Absolute longitude in degrees.
    pub fn longitude_deg(&self) -> f64 {
        self.longitude_rad().to_degrees()
    }

    /// How far below the z reference surface the absolute position is, zero when there is no
    /// reference.
    ///
    /// Units: meters
    pub fn down_m(&self) -> f64 {
        let abs = self.to_absolute();
        abs.z * abs.z_units.down_sign()
    }

    /// Move the location along the local tangent plane.
    ///
    /// The move is accumulated into the offset, making the location relative. Use
    /// [`Location::to_absolute`] to fold it into the reference position.
    pub fn translate(&mut self, north_m: f64, east_m: f64, down_m: f64) {
        self.offset_m_ned += Vector3::new(north_m, east_m, down_m);
    }

    /// A translated copy of this location.
    pub fn translated(&self, north_m: f64, east_m: f64, down_m: f64) -> Self {
        let mut loc = *self;
        loc.translate(north_m, east_m, down_m);
        loc
    }

    /// Get a new absolute location at the same position as this one.
    ///
    /// The down offset is folded into `z` according to `z_units`. With no z reference the down
    /// offset has no meaning and is dropped.
    pub fn to_absolute(&self) -> Self {
        if self.is_absolute() {
            let mut loc = *self;
            loc.normalize();
            return loc;
        }

        let lat0 = self.lat_rad;
        let off = self.offset_m_ned;

        let mut loc = Self {
            lat_rad: lat0 + off.x / meridian_radius_m(lat0),
            lon_rad: self.lon_rad + off.y / (prime_vertical_radius_m(lat0) * lat0.cos()),
            z: match self.z_units {
                ZUnits::None => self.z,
                u => self.z + off.z * u.down_sign(),
            },
            z_units: self.z_units,
            offset_m_ned: Vector3::zeros(),
        };
        loc.normalize();
        loc
    }

    /// Fold the offset into the reference position in place.
    pub fn convert_to_absolute(&mut self) {
        *self = self.to_absolute();
    }

    /// The north/east/down offset of this location from `other`, on the tangent plane at `other`.
    ///
    /// The result is not meaningful at the poles, where the east component degenerates.
    ///
    /// Units: meters
    pub fn offset_from(&self, other: &Location) -> Vector3<f64> {
        let a = self.to_absolute();
        let b = other.to_absolute();

        Vector3::new(
            (a.lat_rad - b.lat_rad) * meridian_radius_m(b.lat_rad),
            wrap_pi(a.lon_rad - b.lon_rad) * prime_vertical_radius_m(b.lat_rad) * b.lat_rad.cos(),
            a.down_m() - b.down_m(),
        )
    }

    /// The absolute horizontal position of this location, with no z reference.
    pub fn horizontal(&self) -> Self {
        let abs = self.to_absolute();
        Self::new(abs.lat_rad, abs.lon_rad)
    }

    /// Bring the reference latitude into [-pi/2, pi/2] and longitude into (-pi, pi].
    ///
    /// A latitude past a pole is reflected back and the longitude moved to the other side of the
    /// globe. Values already in range are left bit for bit unchanged.
    pub fn normalize(&mut self) {
        if !(-FRAC_PI_2..=FRAC_PI_2).contains(&self.lat_rad) {
            let lat = wrap_pi(self.lat_rad);
            if lat > FRAC_PI_2 {
                self.lat_rad = PI - lat;
                self.lon_rad += PI;
            } else if lat < -FRAC_PI_2 {
                self.lat_rad = -PI - lat;
                self.lon_rad += PI;
            } else {
                self.lat_rad = lat;
            }
        }

        if self.lon_rad <= -PI || self.lon_rad > PI {
            self.lon_rad = wrap_pi(self.lon_rad);
        }
    }

    /// Returns true if both locations resolve to the same position within `tol_m` meters
    /// horizontally and vertically, with the same z reference.
    pub fn approx_eq(&self, other: &Location, tol_m: f64) -> bool {
        let a = self.to_absolute();
        let b = other.to_absolute();

        let offset = a.offset_from(&b);

        a.z_units == b.z_units
            && approx_eq(offset.x, 0.0, tol_m)
            && approx_eq(offset.y, 0.0, tol_m)
            && approx_eq(a.z, b.z, tol_m)
    }
}

impl Default for Location {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Radius of curvature in the meridian at the given latitude.
fn meridian_radius_m(lat_rad: f64) -> f64 {
    let w = 1.0 - WGS84_E2 * lat_rad.sin().powi(2);
    WGS84_A * (1.0 - WGS84_E2) / (w * w.sqrt())
}

/// Radius of curvature in the prime vertical at the given latitude.
fn prime_vertical_radius_m(lat_rad: f64) -> f64 {
    WGS84_A / (1.0 - WGS84_E2 * lat_rad.sin().powi(2)).sqrt()
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_normalize() {
        let loc = Location::from_degrees(10.0, 190.0);
        assert!((loc.lon_rad.to_degrees() + 170.0).abs() < 1e-9);

        let loc = Location::from_degrees(95.0, 20.0);
        assert!((loc.lat_rad.to_degrees() - 85.0).abs() < 1e-9);
        assert!((loc.lon_rad.to_degrees() + 160.0).abs() < 1e-9);

        let loc = Location::new(0.0, -PI);
        assert_eq!(loc.lon_rad, PI);

        // In-range values are not perturbed
        let lat = 0.123_456_789_f64;
        assert_eq!(Location::new(lat, -lat).lat_rad, lat);
        assert_eq!(Location::new(lat, -lat).lon_rad, -lat);
    }

    #[test]
    fn test_translate_and_offset_are_inverse() {
        let origin = Location::from_degrees(41.18, -8.70).with_z(10.0, ZUnits::Depth);

        let mut moved = origin;
        moved.translate(250.0, -1300.0, 2.5);
        assert!(!moved.is_absolute());

        let offset = moved.offset_from(&origin);
        assert!((offset.x - 250.0).abs() < 1e-6);
        assert!((offset.y + 1300.0).abs() < 1e-6);
        assert!((offset.z - 2.5).abs() < 1e-9);

        // Resolving to absolute changes nothing about where it is
        let abs = moved.to_absolute();
        assert!(abs.is_absolute());
        assert!((abs.z - 12.5).abs() < 1e-12);
        assert!(abs.approx_eq(&moved, 1e-6));

        // Idempotent
        assert_eq!(abs.to_absolute(), abs);
    }

    #[test]
    fn test_down_offset_folding() {
        let alt = Location::from_degrees(0.0, 0.0)
            .with_z(20.0, ZUnits::Altitude)
            .translated(0.0, 0.0, 5.0)
            .to_absolute();
        assert_eq!(alt.z, 15.0);

        let none = Location::from_degrees(0.0, 0.0)
            .with_z(3.0, ZUnits::None)
            .translated(1.0, 0.0, 5.0)
            .to_absolute();
        assert_eq!(none.z, 3.0);
    }

    #[test]
    fn test_offset_across_antimeridian() {
        let west = Location::from_degrees(0.0, 179.999);
        let east = Location::from_degrees(0.0, -179.999);

        let offset = east.offset_from(&west);
        assert!(offset.y > 0.0);
        assert!(offset.y < 250.0);
    }

    #[test]
    fn test_approx_eq() {
        let base = Location::from_degrees(41.18, -8.70).with_z(4.0, ZUnits::Depth);

        // Relative and absolute forms of one position compare equal
        let moved = base.translated(3.0, 0.0, 0.0);
        assert!(moved.approx_eq(&moved.to_absolute(), 1e-6));

        assert!(moved.approx_eq(&base, 3.5));
        assert!(!moved.approx_eq(&base, 2.5));
        assert!(!base.translated(0.0, -3.0, 0.0).approx_eq(&base, 2.5));

        let deeper = base.translated(0.0, 0.0, 2.0);
        assert!(deeper.approx_eq(&base, 2.0));
        assert!(!deeper.approx_eq(&base, 1.0));

        // Same numbers against another z reference never match
        let alt = Location::from_degrees(41.18, -8.70).with_z(4.0, ZUnits::Altitude);
        assert!(!alt.approx_eq(&base, 1e3));
    }

    #[test]
    fn test_metric_scale() {
        // One arc-minute of latitude is roughly one nautical mile
        let a = Location::from_degrees(45.0, 0.0);
        let b = Location::from_degrees(45.0 + 1.0 / 60.0, 0.0);
        let n = b.offset_from(&a).x;
        assert!((n - 1852.0).abs() < 5.0);
    }
}
