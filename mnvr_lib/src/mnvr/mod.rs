//! # Maneuver module
//!
//! Mission plan maneuvers and their two serialised forms: an XML element in a plan document, and a
//! binary message sent to vehicles.
//!
//! Maneuvers are described by a set of capability traits rather than a type hierarchy. Every kind
//! implements [`Maneuver`], and kinds which have a location, a speed or a polygon additionally
//! implement [`LocatedManeuver`], [`ManeuverWithSpeed`] and [`PolygonManeuver`]. The closed set of
//! kinds known to this crate is [`Mnvr`].
//!
//! Decoding either form reports two kinds of problem. Fatal problems are returned as the `Err`
//! variant and no maneuver is produced. Problems the decoder recovered from, such as unknown units
//! or an unreadable polygon vertex, are returned alongside the maneuver in [`Decoded`].

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod cover_area;
mod params;

pub use cover_area::*;
pub use params::*;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::imc::{Message, MsgError, COVER_AREA_ID};
use log::debug;

use crate::{
    loc::Location,
    units::SpeedUnits,
    xml::{XmlElement, XmlError},
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Name of the element wrapping each maneuver in a plan document.
pub const PLAN_MNVR_ELEMENT: &str = "maneuver";

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Operations common to all maneuvers.
pub trait Maneuver {
    /// The identifier assigned by the owning plan.
    fn id(&self) -> &str;

    fn set_id(&mut self, id: &str);

    /// The fixed name of this kind of maneuver, also the default XML root name.
    fn type_tag(&self) -> &'static str;

    /// Move the whole maneuver along the local tangent plane, keeping its shape.
    fn translate(&mut self, north_m: f64, east_m: f64, down_m: f64);

    /// Build the XML element for this maneuver, with the given root element name.
    fn to_xml(&self, root_name: &str) -> XmlElement;

    /// Build the binary message for this maneuver.
    fn to_msg(&self) -> Message;

    /// Replace the state of this maneuver with the one described by an XML document.
    ///
    /// The id is kept. On error the maneuver is left untouched. On success any conditions
    /// recovered from are returned.
    fn load_xml(&mut self, xml: &str) -> Result<Vec<ManeuverError>, ManeuverError>;

    /// Replace the state of this maneuver with the one carried by a binary message.
    ///
    /// The id and any fields the message doesn't carry are kept. On error the maneuver is left
    /// untouched. On success any conditions recovered from are returned.
    fn load_msg(&mut self, msg: &Message) -> Result<Vec<ManeuverError>, ManeuverError>;
}

/// A maneuver with a reference location.
pub trait LocatedManeuver: Maneuver {
    /// The maneuver's reference location.
    fn anchor(&self) -> &Location;

    /// Move the reference location without moving anything else the maneuver defines.
    fn set_anchor(&mut self, loc: Location);

    /// Where the vehicle starts the maneuver.
    fn start_location(&self) -> Location;

    /// Where the vehicle ends the maneuver.
    fn end_location(&self) -> Location;

    /// The locations the vehicle passes through, in order.
    fn waypoints(&self) -> Vec<Location>;
}

/// A maneuver executed at a commanded speed.
pub trait ManeuverWithSpeed: Maneuver {
    fn speed(&self) -> f64;

    fn speed_units(&self) -> SpeedUnits;

    /// Set the speed reference. A speed which is not finite is rejected and the old speed and
    /// units are kept.
    fn set_speed(&mut self, speed: f64, units: SpeedUnits) -> Result<(), ManeuverError>;
}

/// A maneuver which covers or follows a polygon.
pub trait PolygonManeuver: LocatedManeuver {
    /// The vertices of the polygon as absolute horizontal locations, in order.
    fn vertices(&self) -> &[Location];

    /// Append a vertex to the polygon.
    fn add_vertex(&mut self, loc: &Location);

    /// Remove all vertices.
    fn clear_vertices(&mut self);
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A decoded value with the conditions the decoder recovered from while producing it.
#[derive(Debug)]
pub struct Decoded<T> {
    pub value: T,

    /// Non-fatal problems found during decoding, in the order they were found.
    pub recovered: Vec<ManeuverError>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// All maneuver kinds known to this crate.
#[derive(Debug, Clone)]
pub enum Mnvr {
    CoverArea(CoverArea),
}

/// Errors and recovered conditions from decoding maneuvers.
#[derive(Debug, thiserror::Error)]
pub enum ManeuverError {
    #[error("Malformed XML document: {0}")]
    MalformedDocument(#[from] XmlError),

    #[error("Required field `{0}` is missing")]
    MissingRequiredField(String),

    #[error("Field `{path}` has an invalid value {value:?}")]
    InvalidField { path: String, value: String },

    #[error("Unknown {kind} value {value:?}, using {default}")]
    UnknownEnumValue {
        kind: &'static str,
        value: String,
        default: String,
    },

    #[error("Polygon vertex {index} could not be read and was dropped: {reason}")]
    VertexParseError { index: usize, reason: String },

    #[error("Could not decode binary message: {0}")]
    BinaryDecode(#[from] MsgError),

    #[error("Expected a {expected} maneuver but found {found:?}")]
    WrongKind { expected: &'static str, found: String },

    #[error("Unknown maneuver kind {0:?}")]
    UnknownKind(String),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl<T> Decoded<T> {
    pub fn new(value: T, recovered: Vec<ManeuverError>) -> Self {
        Self { value, recovered }
    }

    /// Returns true if nothing had to be recovered from.
    pub fn is_clean(&self) -> bool {
        self.recovered.is_empty()
    }

    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Decoded<U> {
        Decoded {
            value: f(self.value),
            recovered: self.recovered,
        }
    }
}

impl Mnvr {
    /// Decode a maneuver from an XML document.
    ///
    /// The kind is chosen from the root element name. A plan wrapper element
    /// (`<maneuver id="...">`) around the maneuver is accepted, in which case the maneuver takes
    /// the wrapper's id.
    pub fn from_xml(xml: &str) -> Result<Decoded<Self>, ManeuverError> {
        let root = XmlElement::parse(xml)?;
        Self::from_xml_element(&root)
    }

    /// Decode a maneuver from a parsed XML element, see [`Mnvr::from_xml`].
    pub fn from_xml_element(el: &XmlElement) -> Result<Decoded<Self>, ManeuverError> {
        if el.name == PLAN_MNVR_ELEMENT {
            let inner = el
                .children
                .first()
                .ok_or_else(|| ManeuverError::MissingRequiredField(format!("{}/*", el.name)))?;

            let mut decoded = Self::from_xml_element(inner)?;
            if let Some(id) = el.attr("id") {
                decoded.value.set_id(id);
            }
            return Ok(decoded);
        }

        match el.name.as_str() {
            CoverArea::TYPE_TAG => Ok(CoverArea::from_xml_element(el)?.map(Mnvr::CoverArea)),
            other => Err(ManeuverError::UnknownKind(other.to_string())),
        }
    }

    /// Decode a maneuver from a binary message. The kind is chosen from the message id.
    pub fn from_msg(msg: &Message) -> Result<Decoded<Self>, ManeuverError> {
        debug!("Decoding maneuver from message id {}", msg.id());

        match msg.id() {
            COVER_AREA_ID => {
                Ok(CoverArea::from_msg(msg, &CoverAreaParams::default())?.map(Mnvr::CoverArea))
            }
            id => Err(ManeuverError::BinaryDecode(MsgError::UnknownId(id))),
        }
    }

    /// Decode a maneuver from a framed binary message.
    pub fn from_bytes(bytes: &[u8]) -> Result<Decoded<Self>, ManeuverError> {
        let (_, msg) = Message::from_bytes(bytes)?;
        Self::from_msg(&msg)
    }

    /// Build the plan document element for this maneuver: the maneuver's own element, named after
    /// its type, inside a wrapper carrying its id.
    pub fn to_plan_xml(&self) -> XmlElement {
        let mut wrapper = XmlElement::new(PLAN_MNVR_ELEMENT).with_attr("id", self.id());
        wrapper.add_child(self.to_xml(self.type_tag()));
        wrapper
    }

    /// Borrow the maneuver as a trait object.
    pub fn as_maneuver(&self) -> &dyn Maneuver {
        match self {
            Mnvr::CoverArea(m) => m,
        }
    }

    pub fn as_maneuver_mut(&mut self) -> &mut dyn Maneuver {
        match self {
            Mnvr::CoverArea(m) => m,
        }
    }

    /// Borrow the maneuver as a located maneuver, if it has a location.
    pub fn as_located(&self) -> Option<&dyn LocatedManeuver> {
        match self {
            Mnvr::CoverArea(m) => Some(m),
        }
    }

    /// Borrow the maneuver as a polygon maneuver, if it has a polygon.
    pub fn as_polygon(&self) -> Option<&dyn PolygonManeuver> {
        match self {
            Mnvr::CoverArea(m) => Some(m),
        }
    }
}

impl Maneuver for Mnvr {
    fn id(&self) -> &str {
        self.as_maneuver().id()
    }

    fn set_id(&mut self, id: &str) {
        self.as_maneuver_mut().set_id(id)
    }

    fn type_tag(&self) -> &'static str {
        self.as_maneuver().type_tag()
    }

    fn translate(&mut self, north_m: f64, east_m: f64, down_m: f64) {
        self.as_maneuver_mut().translate(north_m, east_m, down_m)
    }

    fn to_xml(&self, root_name: &str) -> XmlElement {
        self.as_maneuver().to_xml(root_name)
    }

    fn to_msg(&self) -> Message {
        self.as_maneuver().to_msg()
    }

    fn load_xml(&mut self, xml: &str) -> Result<Vec<ManeuverError>, ManeuverError> {
        self.as_maneuver_mut().load_xml(xml)
    }

    fn load_msg(&mut self, msg: &Message) -> Result<Vec<ManeuverError>, ManeuverError> {
        self.as_maneuver_mut().load_msg(msg)
    }
}

impl From<CoverArea> for Mnvr {
    fn from(m: CoverArea) -> Self {
        Mnvr::CoverArea(m)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
