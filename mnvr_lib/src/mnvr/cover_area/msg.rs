//! Binary message codec for CoverArea

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::imc::{CoverAreaMsg, Message, MsgError, PolygonVertexMsg};
use log::{debug, warn};
use std::f64::consts::FRAC_PI_2;

use super::CoverArea;
use crate::{
    loc::Location,
    mnvr::{CoverAreaParams, Decoded, ManeuverError},
    units::{SpeedUnits, ZUnits},
};

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CoverArea {
    /// Decode a maneuver from a binary message.
    ///
    /// The message carries no tolerances, these and the id are taken from `params`. Unknown unit
    /// ordinals fall back to the defaults and are reported as recovered. Any other bad field fails
    /// the decode.
    pub fn from_msg(msg: &Message, params: &CoverAreaParams) -> Result<Decoded<Self>, ManeuverError> {
        let msg = match msg {
            Message::CoverArea(m) => m,
        };

        let mut recovered = Vec::new();

        check_lat("lat", msg.lat_rad)?;
        check_finite("lon", msg.lon_rad)?;
        check_finite("z", msg.z)?;
        check_finite("speed", msg.speed)?;

        let speed_units = match SpeedUnits::from_ordinal(msg.speed_units) {
            Some(u) => u,
            None => {
                let err = ManeuverError::UnknownEnumValue {
                    kind: "speed units",
                    value: msg.speed_units.to_string(),
                    default: SpeedUnits::DEFAULT.to_string(),
                };
                warn!("{}", err);
                recovered.push(err);
                SpeedUnits::DEFAULT
            }
        };

        let z_units = match ZUnits::from_ordinal(msg.z_units) {
            Some(u) => u,
            None => {
                let err = ManeuverError::UnknownEnumValue {
                    kind: "z units",
                    value: msg.z_units.to_string(),
                    default: ZUnits::DEFAULT.to_string(),
                };
                warn!("{}", err);
                recovered.push(err);
                ZUnits::DEFAULT
            }
        };

        let mut vertices = Vec::with_capacity(msg.polygon.len());
        for v in msg.polygon.iter() {
            check_lat("polygon.lat", v.lat_rad)?;
            check_finite("polygon.lon", v.lon_rad)?;
            vertices.push(Location::new(v.lat_rad, v.lon_rad));
        }

        let mut ca = CoverArea::with_params(params);
        ca.anchor = Location::new(msg.lat_rad, msg.lon_rad).with_z(msg.z, z_units);
        ca.speed = msg.speed;
        ca.speed_units = speed_units;
        ca.vertices = vertices;
        ca.custom = msg.custom.clone();

        debug!(
            "Decoded {} message with {} vertices",
            Self::TYPE_TAG,
            ca.vertices.len()
        );

        Ok(Decoded::new(ca, recovered))
    }

    /// Build the message payload. The anchor is sent as an absolute position.
    pub(super) fn build_msg(&self) -> CoverAreaMsg {
        let anchor = self.anchor.to_absolute();

        CoverAreaMsg {
            lat_rad: anchor.lat_rad,
            lon_rad: anchor.lon_rad,
            z: anchor.z,
            z_units: anchor.z_units.ordinal(),
            speed: self.speed,
            speed_units: self.speed_units.ordinal(),
            polygon: self
                .vertices
                .iter()
                .map(|v| PolygonVertexMsg::new(v.latitude_rad(), v.longitude_rad()))
                .collect(),
            custom: self.custom.clone(),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn check_finite(field: &'static str, value: f64) -> Result<(), MsgError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(MsgError::InvalidField {
            field,
            reason: format!("{} is not finite", value),
        })
    }
}

fn check_lat(field: &'static str, lat_rad: f64) -> Result<(), MsgError> {
    check_finite(field, lat_rad)?;

    if lat_rad.abs() > FRAC_PI_2 {
        return Err(MsgError::InvalidField {
            field,
            reason: format!("latitude {} rad is out of range", lat_rad),
        });
    }

    Ok(())
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::mnvr::{LocatedManeuver, Maneuver, ManeuverWithSpeed, PolygonManeuver};
    use comms_if::imc::{Header, MsgSpeedUnits, TupleList};

    fn test_ca() -> CoverArea {
        let mut ca = CoverArea::new();
        ca.set_id("cover-1");
        ca.set_anchor(Location::from_degrees(41.18, -8.70).with_z(5.0, ZUnits::Depth));
        ca.set_speed(1.4, SpeedUnits::MetersPerSecond).unwrap();
        ca.add_vertex(&Location::from_degrees(41.181, -8.701));
        ca.add_vertex(&Location::from_degrees(41.182, -8.699));
        ca.add_vertex(&Location::from_degrees(41.179, -8.698));
        ca.custom_mut().set("pattern", "lawnmower").unwrap();
        ca
    }

    fn test_msg(ca: &CoverArea) -> CoverAreaMsg {
        match ca.to_msg() {
            Message::CoverArea(m) => m,
        }
    }

    #[test]
    fn test_round_trip() {
        let ca = test_ca();

        let bytes = ca.to_msg().to_bytes(&Header::default()).unwrap();
        let (_, msg) = Message::from_bytes(&bytes).unwrap();
        let decoded = CoverArea::from_msg(&msg, &CoverAreaParams::default()).unwrap();

        assert!(decoded.is_clean());
        assert!(decoded.value.approx_eq(&ca, 1e-6));
        assert_eq!(decoded.value.anchor().z_units, ZUnits::Depth);
        assert_eq!(decoded.value.custom(), ca.custom());
        assert_eq!(decoded.value.type_tag(), ca.type_tag());
    }

    #[test]
    fn test_custom_text_passed_through() {
        for raw in ["a=1;a=2", "flag", " k = v ;", "a=b=c"].iter() {
            let mut msg = test_msg(&test_ca());
            msg.custom = TupleList::from_raw(*raw);
            let bytes = Message::CoverArea(msg).to_bytes(&Header::default()).unwrap();

            let (_, msg) = Message::from_bytes(&bytes).unwrap();
            let decoded = CoverArea::from_msg(&msg, &CoverAreaParams::default()).unwrap();
            assert!(decoded.is_clean());
            assert_eq!(decoded.value.custom().as_str(), *raw);

            let out = decoded.value.to_msg().to_bytes(&Header::default()).unwrap();
            assert_eq!(out, bytes);
        }
    }

    #[test]
    fn test_relative_anchor_sent_absolute() {
        let mut ca = test_ca();
        ca.translate(200.0, 100.0, 2.0);
        assert!(!ca.anchor().is_absolute());

        let msg = test_msg(&ca);
        let abs = ca.anchor().to_absolute();
        assert_eq!(msg.lat_rad, abs.lat_rad);
        assert_eq!(msg.lon_rad, abs.lon_rad);
        assert_eq!(msg.z, 7.0);

        let decoded = CoverArea::from_msg(&Message::CoverArea(msg), &Default::default()).unwrap();
        assert!(decoded.value.anchor().is_absolute());
        assert!(decoded.value.approx_eq(&ca, 1e-6));
    }

    #[test]
    fn test_empty_polygon() {
        let mut ca = test_ca();
        ca.clear_vertices();

        let bytes = ca.to_msg().to_bytes(&Header::default()).unwrap();
        let (_, msg) = Message::from_bytes(&bytes).unwrap();
        let decoded = CoverArea::from_msg(&msg, &CoverAreaParams::default()).unwrap();

        assert!(decoded.value.vertices().is_empty());
        assert!(decoded.value.approx_eq(&ca, 1e-6));
    }

    #[test]
    fn test_unknown_speed_units() {
        let mut msg = test_msg(&test_ca());
        msg.speed_units = 42;

        let decoded = CoverArea::from_msg(&Message::CoverArea(msg), &Default::default()).unwrap();

        assert_eq!(decoded.value.speed_units(), SpeedUnits::Rpm);
        assert_eq!(decoded.value.speed(), 1.4);
        assert_eq!(decoded.value.vertices().len(), 3);
        assert_eq!(decoded.recovered.len(), 1);
        assert!(matches!(
            &decoded.recovered[0],
            ManeuverError::UnknownEnumValue { kind: "speed units", value, .. } if value == "42"
        ));
    }

    #[test]
    fn test_unknown_z_units() {
        let mut msg = test_msg(&test_ca());
        msg.z_units = 9;
        msg.speed_units = MsgSpeedUnits::Percentage.ordinal();

        let decoded = CoverArea::from_msg(&Message::CoverArea(msg), &Default::default()).unwrap();

        assert_eq!(decoded.value.anchor().z_units, ZUnits::None);
        assert_eq!(decoded.value.speed_units(), SpeedUnits::Percentage);
        assert!(matches!(
            &decoded.recovered[..],
            [ManeuverError::UnknownEnumValue { kind: "z units", .. }]
        ));
    }

    #[test]
    fn test_fatal_fields() {
        let base = test_msg(&test_ca());

        let mut msg = base.clone();
        msg.lat_rad = 2.0;
        assert!(matches!(
            CoverArea::from_msg(&Message::CoverArea(msg), &Default::default()),
            Err(ManeuverError::BinaryDecode(MsgError::InvalidField { field: "lat", .. }))
        ));

        let mut msg = base.clone();
        msg.speed = f64::NAN;
        assert!(CoverArea::from_msg(&Message::CoverArea(msg), &Default::default()).is_err());

        let mut msg = base;
        msg.polygon[1].lon_rad = f64::INFINITY;
        assert!(matches!(
            CoverArea::from_msg(&Message::CoverArea(msg), &Default::default()),
            Err(ManeuverError::BinaryDecode(MsgError::InvalidField {
                field: "polygon.lon",
                ..
            }))
        ));
    }

    #[test]
    fn test_params_fill_missing_fields() {
        let params = CoverAreaParams {
            speed_tolerance: 0.25,
            radius_tolerance_m: 7.5,
            ..Default::default()
        };
        let decoded = CoverArea::from_msg(&test_ca().to_msg(), &params).unwrap();
        assert_eq!(decoded.value.speed_tolerance(), 0.25);
        assert_eq!(decoded.value.radius_tolerance_m(), 7.5);
        assert_eq!(decoded.value.id(), "");
    }

    #[test]
    fn test_load_msg() {
        let mut target = CoverArea::new();
        target.set_id("keep-me");
        target.set_radius_tolerance_m(12.0).unwrap();

        let source = test_ca();
        let recovered = target.load_msg(&source.to_msg()).unwrap();
        assert!(recovered.is_empty());
        assert_eq!(target.id(), "keep-me");
        assert_eq!(target.radius_tolerance_m(), 12.0);
        assert_eq!(target.vertices().len(), 3);
        assert_eq!(target.speed(), 1.4);

        // A bad message leaves the maneuver untouched
        let before = target.clone();
        let mut bad = test_msg(&source);
        bad.lat_rad = f64::NAN;
        assert!(target.load_msg(&Message::CoverArea(bad)).is_err());
        assert_eq!(target, before);
    }
}
