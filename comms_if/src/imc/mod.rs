//! # Vehicle message protocol
//!
//! Binary messages exchanged with vehicles. Each message is framed as a fixed little-endian
//! header followed by the message payload:
//!
//! | Field      | Type  | Notes                        |
//! |------------|-------|------------------------------|
//! | sync       | `u16` | always [`SYNC`]              |
//! | mgid       | `u16` | message id                   |
//! | size       | `u16` | payload size in bytes        |
//! | timestamp  | `f64` | seconds since the unix epoch |
//! | src        | `u16` | source system                |
//! | src_ent    | `u8`  | source entity                |
//! | dst        | `u16` | destination system           |
//! | dst_ent    | `u8`  | destination entity           |
//!
//! Repeated sub-messages are written as a `u16` count followed by each sub-message prefixed with
//! its own id. Plain text fields are a `u16` length followed by UTF-8 bytes.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod cover_area;
mod enums;
mod tuple_list;

pub use cover_area::*;
pub use enums::*;
pub use tuple_list::*;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use log::trace;
use serde::{Deserialize, Serialize};
use std::{
    convert::TryFrom,
    io::{Cursor, Read},
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Synchronisation number at the start of every frame.
pub const SYNC: u16 = 0xFE54;

/// Length of the frame header in bytes.
pub const HEADER_LEN: usize = 20;

/// Message id of [`CoverAreaMsg`].
pub const COVER_AREA_ID: u16 = 473;

/// Message id of [`PolygonVertexMsg`].
pub const POLYGON_VERTEX_ID: u16 = 474;

/// Address meaning "any system" or "any entity".
pub const BROADCAST_SYS: u16 = 0xFFFF;
pub const BROADCAST_ENT: u8 = 0xFF;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Routing information sent in front of every message.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Header {
    /// Time the message was created, in seconds since the unix epoch
    pub timestamp_s: f64,

    pub src: u16,
    pub src_ent: u8,
    pub dst: u16,
    pub dst_ent: u8,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// All top level messages understood by this crate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    CoverArea(CoverAreaMsg),
}

/// Errors which can occur while framing or unframing a message.
#[derive(Debug, thiserror::Error)]
pub enum MsgError {
    #[error("Message is truncated or unreadable: {0}")]
    Truncated(#[from] std::io::Error),

    #[error("Bad sync number {0:#06x}")]
    BadSync(u16),

    #[error("Unknown message id {0}")]
    UnknownId(u16),

    #[error("Header gives a payload of {header} bytes but {actual} were found")]
    SizeMismatch { header: usize, actual: usize },

    #[error("Expected an inline message with id {expected}, found {found}")]
    UnexpectedInlineId { expected: u16, found: u16 },

    #[error("Field `{0}` is not valid UTF-8")]
    InvalidUtf8(&'static str),

    #[error("Invalid tuple list: {0}")]
    InvalidTupleList(String),

    #[error("Field `{0}` is too large to encode ({1} items)")]
    TooLarge(&'static str, usize),

    #[error("Field `{field}` is invalid: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for Header {
    fn default() -> Self {
        Self {
            timestamp_s: 0.0,
            src: BROADCAST_SYS,
            src_ent: BROADCAST_ENT,
            dst: BROADCAST_SYS,
            dst_ent: BROADCAST_ENT,
        }
    }
}

impl Message {
    /// The id of the message on the wire.
    pub fn id(&self) -> u16 {
        match self {
            Message::CoverArea(_) => COVER_AREA_ID,
        }
    }

    /// The name of the message as given in the message definitions.
    pub fn name(&self) -> &'static str {
        match self {
            Message::CoverArea(_) => "CoverArea",
        }
    }

    /// Frame the message with the given header.
    pub fn to_bytes(&self, header: &Header) -> Result<Vec<u8>, MsgError> {
        let mut payload = Vec::new();
        match self {
            Message::CoverArea(m) => m.write_payload(&mut payload)?,
        }

        let size =
            u16::try_from(payload.len()).map_err(|_| MsgError::TooLarge("payload", payload.len()))?;

        let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
        buf.write_u16::<LittleEndian>(SYNC)?;
        buf.write_u16::<LittleEndian>(self.id())?;
        buf.write_u16::<LittleEndian>(size)?;
        buf.write_f64::<LittleEndian>(header.timestamp_s)?;
        buf.write_u16::<LittleEndian>(header.src)?;
        buf.write_u8(header.src_ent)?;
        buf.write_u16::<LittleEndian>(header.dst)?;
        buf.write_u8(header.dst_ent)?;
        buf.extend_from_slice(&payload);

        trace!("Framed {} message ({} bytes)", self.name(), buf.len());

        Ok(buf)
    }

    /// Unframe a message.
    ///
    /// The buffer must contain exactly one frame.
    pub fn from_bytes(bytes: &[u8]) -> Result<(Header, Self), MsgError> {
        let mut rdr = Cursor::new(bytes);

        let sync = rdr.read_u16::<LittleEndian>()?;
        if sync != SYNC {
            return Err(MsgError::BadSync(sync));
        }

        let id = rdr.read_u16::<LittleEndian>()?;
        let size = rdr.read_u16::<LittleEndian>()? as usize;
        let header = Header {
            timestamp_s: rdr.read_f64::<LittleEndian>()?,
            src: rdr.read_u16::<LittleEndian>()?,
            src_ent: rdr.read_u8()?,
            dst: rdr.read_u16::<LittleEndian>()?,
            dst_ent: rdr.read_u8()?,
        };

        let actual = bytes.len() - HEADER_LEN;
        if actual != size {
            return Err(MsgError::SizeMismatch {
                header: size,
                actual,
            });
        }

        let mut payload = (&bytes[HEADER_LEN..]).take(size as u64);
        let msg = match id {
            COVER_AREA_ID => Message::CoverArea(CoverAreaMsg::read_payload(&mut payload)?),
            _ => return Err(MsgError::UnknownId(id)),
        };

        // Anything the payload reader didn't consume means the payload layout doesn't match
        if payload.limit() != 0 {
            return Err(MsgError::SizeMismatch {
                header: size,
                actual: size - payload.limit() as usize,
            });
        }

        trace!("Unframed {} message ({} bytes)", msg.name(), bytes.len());

        Ok((header, msg))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    fn test_msg() -> Message {
        let mut custom = TupleList::new();
        custom.set("pattern", "lawnmower").unwrap();

        Message::CoverArea(CoverAreaMsg {
            lat_rad: 0.72,
            lon_rad: -0.15,
            z: 3.5,
            z_units: MsgZUnits::Depth.ordinal(),
            speed: 1.2,
            speed_units: MsgSpeedUnits::MetersPs.ordinal(),
            polygon: vec![
                PolygonVertexMsg::new(0.7201, -0.1501),
                PolygonVertexMsg::new(0.7202, -0.1499),
                PolygonVertexMsg::new(0.7199, -0.1498),
            ],
            custom,
        })
    }

    #[test]
    fn test_frame_unframe() {
        let header = Header {
            timestamp_s: 1_600_000_000.25,
            src: 0x4001,
            src_ent: 3,
            ..Default::default()
        };

        let msg = test_msg();
        let bytes = msg.to_bytes(&header).unwrap();

        // Header, 5 f64/u8 fields, polygon list and the custom text
        assert_eq!(
            bytes.len(),
            HEADER_LEN + 8 * 4 + 2 + 2 + 3 * (2 + 16) + 2 + "pattern=lawnmower".len()
        );
        assert_eq!(&bytes[0..2], &[0x54, 0xFE]);

        let (header_out, msg_out) = Message::from_bytes(&bytes).unwrap();
        assert_eq!(header_out, header);
        assert_eq!(msg_out, msg);
    }

    #[test]
    fn test_unknown_ordinals_survive_framing() {
        let mut msg = match test_msg() {
            Message::CoverArea(m) => m,
        };
        msg.speed_units = 42;
        msg.z_units = 99;

        let bytes = Message::CoverArea(msg.clone())
            .to_bytes(&Header::default())
            .unwrap();
        let (_, out) = Message::from_bytes(&bytes).unwrap();
        assert_eq!(out, Message::CoverArea(msg));
    }

    #[test]
    fn test_custom_text_survives_framing() {
        for raw in ["a=1;a=2", "flag", " k = v ;", "a=b=c", ";;"].iter() {
            let mut msg = match test_msg() {
                Message::CoverArea(m) => m,
            };
            msg.custom = TupleList::from_raw(*raw);

            let bytes = Message::CoverArea(msg).to_bytes(&Header::default()).unwrap();
            let (header, out) = Message::from_bytes(&bytes).unwrap();

            match &out {
                Message::CoverArea(m) => assert_eq!(m.custom.as_str(), *raw),
            }
            assert_eq!(out.to_bytes(&header).unwrap(), bytes);
        }
    }

    #[test]
    fn test_unframe_errors() {
        let bytes = test_msg().to_bytes(&Header::default()).unwrap();

        // Truncated header
        assert!(matches!(
            Message::from_bytes(&bytes[..10]),
            Err(MsgError::Truncated(_))
        ));

        // Truncated payload
        assert!(matches!(
            Message::from_bytes(&bytes[..bytes.len() - 4]),
            Err(MsgError::SizeMismatch { .. })
        ));

        // Bad sync
        let mut bad = bytes.clone();
        bad[0] = 0x00;
        assert!(matches!(Message::from_bytes(&bad), Err(MsgError::BadSync(_))));

        // Unknown id
        let mut bad = bytes.clone();
        bad[2] = 0x01;
        bad[3] = 0x00;
        assert!(matches!(Message::from_bytes(&bad), Err(MsgError::UnknownId(1))));

        // Wrong inline id on the first vertex, which starts after the six scalar fields and the
        // list count
        let mut bad = bytes.clone();
        let vertex_id_offset = HEADER_LEN + 8 * 4 + 2 + 2;
        bad[vertex_id_offset] = 0x00;
        assert!(matches!(
            Message::from_bytes(&bad),
            Err(MsgError::UnexpectedInlineId { expected: 474, .. })
        ));
    }
}
