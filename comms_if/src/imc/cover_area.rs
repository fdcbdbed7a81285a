//! # CoverArea message
//!
//! Payload of the polygon coverage maneuver and of its inlined polygon vertices.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use serde::{Deserialize, Serialize};
use std::{convert::TryFrom, io::Read};

use super::{MsgError, TupleList, POLYGON_VERTEX_ID};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Cover the area enclosed by a polygon.
///
/// Enumerated fields are kept as raw ordinals, see [`super::MsgSpeedUnits`] and
/// [`super::MsgZUnits`] for their meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverAreaMsg {
    /// WGS-84 latitude of the maneuver's location.
    ///
    /// Units: radians
    pub lat_rad: f64,

    /// WGS-84 longitude of the maneuver's location.
    ///
    /// Units: radians
    pub lon_rad: f64,

    /// Z reference value, interpreted according to `z_units`.
    ///
    /// Units: meters
    pub z: f64,

    /// Z reference ordinal.
    pub z_units: u8,

    /// Speed reference, interpreted according to `speed_units`.
    pub speed: f64,

    /// Speed units ordinal.
    pub speed_units: u8,

    /// The vertices of the polygon, in order.
    pub polygon: Vec<PolygonVertexMsg>,

    /// Custom settings, not interpreted by the protocol.
    pub custom: TupleList,
}

/// A single vertex of a polygon.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolygonVertexMsg {
    /// Units: radians
    pub lat_rad: f64,

    /// Units: radians
    pub lon_rad: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CoverAreaMsg {
    pub(crate) fn write_payload(&self, buf: &mut Vec<u8>) -> Result<(), MsgError> {
        buf.write_f64::<LittleEndian>(self.lat_rad)?;
        buf.write_f64::<LittleEndian>(self.lon_rad)?;
        buf.write_f64::<LittleEndian>(self.z)?;
        buf.write_u8(self.z_units)?;
        buf.write_f64::<LittleEndian>(self.speed)?;
        buf.write_u8(self.speed_units)?;

        // Message list: count followed by each inlined message with its id
        let count = u16::try_from(self.polygon.len())
            .map_err(|_| MsgError::TooLarge("polygon", self.polygon.len()))?;
        buf.write_u16::<LittleEndian>(count)?;
        for vertex in self.polygon.iter() {
            buf.write_u16::<LittleEndian>(POLYGON_VERTEX_ID)?;
            vertex.write_payload(buf)?;
        }

        // Plain text: length followed by the UTF-8 bytes
        let custom = self.custom.as_str();
        let len = u16::try_from(custom.len()).map_err(|_| MsgError::TooLarge("custom", custom.len()))?;
        buf.write_u16::<LittleEndian>(len)?;
        buf.extend_from_slice(custom.as_bytes());

        Ok(())
    }

    pub(crate) fn read_payload<R: Read>(rdr: &mut R) -> Result<Self, MsgError> {
        let lat_rad = rdr.read_f64::<LittleEndian>()?;
        let lon_rad = rdr.read_f64::<LittleEndian>()?;
        let z = rdr.read_f64::<LittleEndian>()?;
        let z_units = rdr.read_u8()?;
        let speed = rdr.read_f64::<LittleEndian>()?;
        let speed_units = rdr.read_u8()?;

        let count = rdr.read_u16::<LittleEndian>()?;
        let mut polygon = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let id = rdr.read_u16::<LittleEndian>()?;
            if id != POLYGON_VERTEX_ID {
                return Err(MsgError::UnexpectedInlineId {
                    expected: POLYGON_VERTEX_ID,
                    found: id,
                });
            }
            polygon.push(PolygonVertexMsg::read_payload(rdr)?);
        }

        let len = rdr.read_u16::<LittleEndian>()?;
        let mut text = vec![0u8; len as usize];
        rdr.read_exact(&mut text)?;
        let text = String::from_utf8(text).map_err(|_| MsgError::InvalidUtf8("custom"))?;
        let custom = TupleList::from_raw(text);

        Ok(Self {
            lat_rad,
            lon_rad,
            z,
            z_units,
            speed,
            speed_units,
            polygon,
            custom,
        })
    }
}

impl PolygonVertexMsg {
    pub fn new(lat_rad: f64, lon_rad: f64) -> Self {
        Self { lat_rad, lon_rad }
    }

    fn write_payload(&self, buf: &mut Vec<u8>) -> Result<(), MsgError> {
        buf.write_f64::<LittleEndian>(self.lat_rad)?;
        buf.write_f64::<LittleEndian>(self.lon_rad)?;
        Ok(())
    }

    fn read_payload<R: Read>(rdr: &mut R) -> Result<Self, MsgError> {
        Ok(Self {
            lat_rad: rdr.read_f64::<LittleEndian>()?,
            lon_rad: rdr.read_f64::<LittleEndian>()?,
        })
    }
}
