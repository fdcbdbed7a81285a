//! # CoverArea maneuver
//!
//! Cover the area enclosed by a polygon. The maneuver has an anchor location and a list of polygon
//! vertices. Vertices are stored as absolute horizontal positions, so moving the anchor on its own
//! leaves the polygon where it is in the world. [`Maneuver::translate`] moves the anchor and the
//! polygon together, keeping each vertex at the same tangent plane offset from the anchor.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod msg;
mod xml;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::imc::{Message, TupleList};
use log::trace;
use nalgebra::Vector3;

use super::{
    CoverAreaParams, LocatedManeuver, Maneuver, ManeuverError, ManeuverWithSpeed, PolygonManeuver,
};
use crate::{loc::Location, units::SpeedUnits, xml::XmlElement};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A polygon coverage maneuver.
#[derive(Debug, PartialEq)]
pub struct CoverArea {
    id: String,

    /// Reference location of the maneuver, may be relative
    anchor: Location,

    speed: f64,
    speed_units: SpeedUnits,

    /// Units: same as `speed`
    speed_tolerance: f64,

    /// Units: meters
    radius_tolerance_m: f64,

    /// Absolute horizontal positions
    vertices: Vec<Location>,

    /// Custom settings passed to the vehicle uninterpreted
    custom: TupleList,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CoverArea {
    /// Type tag of the maneuver and the root element name of its XML form.
    pub const TYPE_TAG: &'static str = "CoverArea";

    /// Create a new maneuver with the default parameters, at (0, 0) with no polygon.
    pub fn new() -> Self {
        Self::with_params(&CoverAreaParams::default())
    }

    /// Create a new maneuver from the given parameters, at (0, 0) with no polygon.
    pub fn with_params(params: &CoverAreaParams) -> Self {
        Self {
            id: String::new(),
            anchor: Location::default(),
            speed: params.speed,
            speed_units: params.speed_units,
            speed_tolerance: params.speed_tolerance,
            radius_tolerance_m: params.radius_tolerance_m,
            vertices: Vec::new(),
            custom: TupleList::new(),
        }
    }

    pub fn speed_tolerance(&self) -> f64 {
        self.speed_tolerance
    }

    /// Set the speed tolerance, which must be finite and not negative.
    pub fn set_speed_tolerance(&mut self, tolerance: f64) -> Result<(), ManeuverError> {
        self.speed_tolerance = check_tolerance("speedTolerance", tolerance)?;
        Ok(())
    }

    /// Units: meters
    pub fn radius_tolerance_m(&self) -> f64 {
        self.radius_tolerance_m
    }

    /// Set the radius tolerance, which must be finite and not negative.
    pub fn set_radius_tolerance_m(&mut self, tolerance_m: f64) -> Result<(), ManeuverError> {
        self.radius_tolerance_m = check_tolerance("radiusTolerance", tolerance_m)?;
        Ok(())
    }

    pub fn custom(&self) -> &TupleList {
        &self.custom
    }

    pub fn custom_mut(&mut self) -> &mut TupleList {
        &mut self.custom
    }

    /// Returns true if both maneuvers describe the same thing, with positions equal to within
    /// `tol_m` meters. The id and custom settings are not compared.
    pub fn approx_eq(&self, other: &CoverArea, tol_m: f64) -> bool {
        self.speed == other.speed
            && self.speed_units == other.speed_units
            && self.speed_tolerance == other.speed_tolerance
            && self.radius_tolerance_m == other.radius_tolerance_m
            && self.anchor.approx_eq(&other.anchor, tol_m)
            && self.vertices.len() == other.vertices.len()
            && self
                .vertices
                .iter()
                .zip(other.vertices.iter())
                .all(|(a, b)| a.approx_eq(b, tol_m))
    }

    /// Offsets of every vertex from the anchor.
    fn vertex_offsets(&self) -> Vec<Vector3<f64>> {
        self.vertices
            .iter()
            .map(|v| v.offset_from(&self.anchor))
            .collect()
    }
}

impl Default for CoverArea {
    fn default() -> Self {
        Self::new()
    }
}

/// Clones hold only absolute locations.
impl Clone for CoverArea {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            anchor: self.anchor.to_absolute(),
            speed: self.speed,
            speed_units: self.speed_units,
            speed_tolerance: self.speed_tolerance,
            radius_tolerance_m: self.radius_tolerance_m,
            vertices: self.vertices.iter().map(Location::to_absolute).collect(),
            custom: self.custom.clone(),
        }
    }
}

impl Maneuver for CoverArea {
    fn id(&self) -> &str {
        &self.id
    }

    fn set_id(&mut self, id: &str) {
        self.id = id.to_string();
    }

    fn type_tag(&self) -> &'static str {
        Self::TYPE_TAG
    }

    fn translate(&mut self, north_m: f64, east_m: f64, down_m: f64) {
        let offsets = self.vertex_offsets();

        self.anchor.translate(north_m, east_m, down_m);

        // Rebuild the polygon about the moved anchor so each vertex keeps its offset
        let origin = self.anchor.horizontal();
        self.vertices = offsets
            .iter()
            .map(|o| origin.translated(o.x, o.y, 0.0).to_absolute())
            .collect();

        trace!(
            "Translated {} {:?} by ({}, {}, {}) m",
            Self::TYPE_TAG,
            self.id,
            north_m,
            east_m,
            down_m
        );
    }

    fn to_xml(&self, root_name: &str) -> XmlElement {
        self.build_xml(root_name)
    }

    fn to_msg(&self) -> Message {
        Message::CoverArea(self.build_msg())
    }

    fn load_xml(&mut self, xml: &str) -> Result<Vec<ManeuverError>, ManeuverError> {
        let decoded = Self::from_xml(xml)?;

        let mut value = decoded.value;
        value.id = self.id.clone();
        value.custom = self.custom.clone();
        *self = value;

        Ok(decoded.recovered)
    }

    fn load_msg(&mut self, msg: &Message) -> Result<Vec<ManeuverError>, ManeuverError> {
        let params = CoverAreaParams {
            speed: self.speed,
            speed_units: self.speed_units,
            speed_tolerance: self.speed_tolerance,
            radius_tolerance_m: self.radius_tolerance_m,
        };
        let decoded = Self::from_msg(msg, &params)?;

        let mut value = decoded.value;
        value.id = self.id.clone();
        *self = value;

        Ok(decoded.recovered)
    }
}

impl LocatedManeuver for CoverArea {
    fn anchor(&self) -> &Location {
        &self.anchor
    }

    fn set_anchor(&mut self, loc: Location) {
        self.anchor = loc;
    }

    fn start_location(&self) -> Location {
        self.anchor
    }

    fn end_location(&self) -> Location {
        self.anchor
    }

    fn waypoints(&self) -> Vec<Location> {
        vec![self.start_location()]
    }
}

impl ManeuverWithSpeed for CoverArea {
    fn speed(&self) -> f64 {
        self.speed
    }

    fn speed_units(&self) -> SpeedUnits {
        self.speed_units
    }

    fn set_speed(&mut self, speed: f64, units: SpeedUnits) -> Result<(), ManeuverError> {
        if !speed.is_finite() {
            return Err(ManeuverError::InvalidField {
                path: "speed".to_string(),
                value: speed.to_string(),
            });
        }

        self.speed = speed;
        self.speed_units = units;
        Ok(())
    }
}

impl PolygonManeuver for CoverArea {
    fn vertices(&self) -> &[Location] {
        &self.vertices
    }

    fn add_vertex(&mut self, loc: &Location) {
        self.vertices.push(loc.horizontal());
    }

    fn clear_vertices(&mut self) {
        self.vertices.clear();
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn check_tolerance(path: &str, value: f64) -> Result<f64, ManeuverError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(ManeuverError::InvalidField {
            path: path.to_string(),
            value: value.to_string(),
        })
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
