//! XML codec for CoverArea
//!
//! The maneuver element has the layout:
//!
//! ```xml
//! <CoverArea kind="automatic">
//!   <finalPoint type="pointType">
//!     <point>
//!       <coordinate>
//!         <latitude>41.18</latitude>
//!         <longitude>-8.7</longitude>
//!         <z>0</z>
//!       </coordinate>
//!       <zunits>NONE</zunits>
//!     </point>
//!     <radiusTolerance>2</radiusTolerance>
//!   </finalPoint>
//!   <speed tolerance="0" type="float" unit="RPM">1000</speed>
//!   <trajectoryTolerance>
//!     <radiusTolerance>2</radiusTolerance>
//!   </trajectoryTolerance>
//!   <vertexPoints>
//!     <point><latitude>41.181</latitude><longitude>-8.701</longitude></point>
//!   </vertexPoints>
//! </CoverArea>
//! ```
//!
//! A relative anchor also writes `offset-north`, `offset-east` and `offset-down` inside
//! `coordinate`. Custom settings are not part of the XML form.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, warn};
use nalgebra::Vector3;

use super::CoverArea;
use crate::{
    loc::{angle, Location},
    mnvr::{Decoded, ManeuverError},
    units::{SpeedUnits, ZUnits},
    xml::XmlElement,
};

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl CoverArea {
    /// Decode a maneuver from an XML document whose root element is the maneuver.
    pub fn from_xml(xml: &str) -> Result<Decoded<Self>, ManeuverError> {
        let root = XmlElement::parse(xml)?;
        Self::from_xml_element(&root)
    }

    /// Decode a maneuver from its XML element.
    ///
    /// Unknown units and unreadable polygon vertices are recovered from and reported. Any other
    /// missing or invalid field fails the decode.
    pub fn from_xml_element(root: &XmlElement) -> Result<Decoded<Self>, ManeuverError> {
        if root.name != Self::TYPE_TAG {
            return Err(ManeuverError::WrongKind {
                expected: Self::TYPE_TAG,
                found: root.name.clone(),
            });
        }

        let mut recovered = Vec::new();
        let mut ca = CoverArea::new();

        // ---- LOCATION ----

        ca.anchor = read_point(root, "finalPoint/point", &mut recovered)?;

        ca.radius_tolerance_m = read_tolerance(root, "finalPoint/radiusTolerance")?;

        match root.select("trajectoryTolerance/radiusTolerance") {
            Some(el) => match el.text().parse::<f64>() {
                Ok(v) if v == ca.radius_tolerance_m => (),
                _ => warn!(
                    "trajectoryTolerance/radiusTolerance ({:?}) differs from \
                    finalPoint/radiusTolerance ({}), using the latter",
                    el.text(),
                    ca.radius_tolerance_m
                ),
            },
            None => debug!("No trajectoryTolerance/radiusTolerance in {}", root.name),
        }

        // ---- SPEED ----

        // Older plans call the speed "velocity"
        let speed_el = root
            .child("speed")
            .or_else(|| root.child("velocity"))
            .ok_or_else(|| ManeuverError::MissingRequiredField(format!("{}/speed", root.name)))?;
        let speed_path = format!("{}/{}", root.name, speed_el.name);

        ca.speed = parse_f64(&speed_path, speed_el.text())?;

        let tol_path = format!("{}/@tolerance", speed_path);
        let tol_str = speed_el
            .attr("tolerance")
            .ok_or_else(|| ManeuverError::MissingRequiredField(tol_path.clone()))?;
        ca.speed_tolerance = parse_tolerance(&tol_path, tol_str)?;

        let unit_str = speed_el.attr("unit").unwrap_or("");
        ca.speed_units = match SpeedUnits::from_xml_str(unit_str) {
            Some(u) => u,
            None => {
                let err = ManeuverError::UnknownEnumValue {
                    kind: "speed units",
                    value: unit_str.to_string(),
                    default: SpeedUnits::DEFAULT.to_string(),
                };
                warn!("{}", err);
                recovered.push(err);
                SpeedUnits::DEFAULT
            }
        };

        // ---- POLYGON ----

        if let Some(points) = root.child("vertexPoints") {
            for (index, point) in points.children_named("point").enumerate() {
                match read_vertex(point) {
                    Ok(loc) => ca.vertices.push(loc),
                    Err(reason) => {
                        let err = ManeuverError::VertexParseError { index, reason };
                        warn!("{}", err);
                        recovered.push(err);
                    }
                }
            }
        }

        Ok(Decoded::new(ca, recovered))
    }

    /// Build the XML element for the maneuver.
    pub(super) fn build_xml(&self, root_name: &str) -> XmlElement {
        let radius_tolerance = self.radius_tolerance_m.to_string();

        let mut root = XmlElement::new(root_name).with_attr("kind", "automatic");

        let final_point = root.add_element("finalPoint");
        final_point.set_attr("type", "pointType");
        final_point.add_child(point_element(&self.anchor));
        final_point.add_child(XmlElement::new("radiusTolerance").with_text(&radius_tolerance));

        root.add_child(
            XmlElement::new("speed")
                .with_attr("tolerance", &self.speed_tolerance.to_string())
                .with_attr("type", "float")
                .with_attr("unit", self.speed_units.as_xml_str())
                .with_text(&self.speed.to_string()),
        );

        root.add_element("trajectoryTolerance")
            .add_child(XmlElement::new("radiusTolerance").with_text(&radius_tolerance));

        let points = root.add_element("vertexPoints");
        for v in self.vertices.iter() {
            let point = points.add_element("point");
            point.add_child(
                XmlElement::new("latitude").with_text(&angle::format_deg(v.latitude_deg())),
            );
            point.add_child(
                XmlElement::new("longitude").with_text(&angle::format_deg(v.longitude_deg())),
            );
        }

        root
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build a `point` element for a location, keeping any offset from its reference.
fn point_element(loc: &Location) -> XmlElement {
    let mut point = XmlElement::new("point");

    let coord = point.add_element("coordinate");
    coord.add_child(
        XmlElement::new("latitude").with_text(&angle::format_deg(loc.lat_rad.to_degrees())),
    );
    coord.add_child(
        XmlElement::new("longitude").with_text(&angle::format_deg(loc.lon_rad.to_degrees())),
    );
    coord.add_child(XmlElement::new("z").with_text(&loc.z.to_string()));

    let off = loc.offset_m_ned;
    for (name, value) in [("offset-north", off.x), ("offset-east", off.y), ("offset-down", off.z)]
        .iter()
    {
        if *value != 0.0 {
            coord.add_child(XmlElement::new(name).with_text(&value.to_string()));
        }
    }

    point.add_child(XmlElement::new("zunits").with_text(loc.z_units.as_xml_str()));

    point
}

/// Read a `point` element at `path` below `root`.
fn read_point(
    root: &XmlElement,
    path: &str,
    recovered: &mut Vec<ManeuverError>,
) -> Result<Location, ManeuverError> {
    let full_path = format!("{}/{}", root.name, path);
    let point = root
        .select(path)
        .ok_or_else(|| ManeuverError::MissingRequiredField(full_path.clone()))?;

    let coord_path = format!("{}/coordinate", full_path);
    let coord = point
        .child("coordinate")
        .ok_or_else(|| ManeuverError::MissingRequiredField(coord_path.clone()))?;

    let lat_deg = read_deg(coord, &coord_path, "latitude")?;
    let lon_deg = read_deg(coord, &coord_path, "longitude")?;
    if lat_deg.abs() > 90.0 {
        return Err(ManeuverError::InvalidField {
            path: format!("{}/latitude", coord_path),
            value: lat_deg.to_string(),
        });
    }

    let z = read_optional_f64(coord, &coord_path, "z")?;
    let offset = Vector3::new(
        read_optional_f64(coord, &coord_path, "offset-north")?,
        read_optional_f64(coord, &coord_path, "offset-east")?,
        read_optional_f64(coord, &coord_path, "offset-down")?,
    );

    let z_units = match point.child("zunits") {
        Some(el) => match ZUnits::from_xml_str(el.text()) {
            Some(u) => u,
            None => {
                let err = ManeuverError::UnknownEnumValue {
                    kind: "z units",
                    value: el.text().to_string(),
                    default: ZUnits::DEFAULT.to_string(),
                };
                warn!("{}", err);
                recovered.push(err);
                ZUnits::DEFAULT
            }
        },
        None => ZUnits::DEFAULT,
    };

    let mut loc = Location::from_degrees(lat_deg, lon_deg).with_z(z, z_units);
    loc.offset_m_ned = offset;

    Ok(loc)
}

/// Read a polygon vertex, returning the reason it couldn't be read on failure.
fn read_vertex(point: &XmlElement) -> Result<Location, String> {
    let lat_str = child_text(point, "latitude")?;
    let lon_str = child_text(point, "longitude")?;

    let lat = angle::parse_deg(lat_str).ok_or_else(|| format!("invalid latitude {:?}", lat_str))?;
    let lon = angle::parse_deg(lon_str).ok_or_else(|| format!("invalid longitude {:?}", lon_str))?;

    if lat.abs() > 90.0 {
        return Err(format!("latitude {} out of range", lat));
    }

    Ok(Location::from_degrees(lat, lon))
}

fn child_text<'a>(el: &'a XmlElement, name: &str) -> Result<&'a str, String> {
    el.child(name)
        .map(XmlElement::text)
        .ok_or_else(|| format!("no {}", name))
}

/// Read a required angle in degrees from a child of `el`.
fn read_deg(el: &XmlElement, el_path: &str, name: &str) -> Result<f64, ManeuverError> {
    let path = format!("{}/{}", el_path, name);
    let child = el
        .child(name)
        .ok_or_else(|| ManeuverError::MissingRequiredField(path.clone()))?;

    angle::parse_deg(child.text()).ok_or_else(|| ManeuverError::InvalidField {
        path,
        value: child.text().to_string(),
    })
}

/// Read an optional number from a child of `el`, zero if the child is absent.
fn read_optional_f64(el: &XmlElement, el_path: &str, name: &str) -> Result<f64, ManeuverError> {
    match el.child(name) {
        Some(child) => parse_f64(&format!("{}/{}", el_path, name), child.text()),
        None => Ok(0.0),
    }
}

/// Read a required tolerance at `path` below `root`.
fn read_tolerance(root: &XmlElement, path: &str) -> Result<f64, ManeuverError> {
    let full_path = format!("{}/{}", root.name, path);
    let el = root
        .select(path)
        .ok_or_else(|| ManeuverError::MissingRequiredField(full_path.clone()))?;

    parse_tolerance(&full_path, el.text())
}

fn parse_f64(path: &str, s: &str) -> Result<f64, ManeuverError> {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ManeuverError::InvalidField {
            path: path.to_string(),
            value: s.to_string(),
        }),
    }
}

fn parse_tolerance(path: &str, s: &str) -> Result<f64, ManeuverError> {
    match parse_f64(path, s)? {
        v if v >= 0.0 => Ok(v),
        _ => Err(ManeuverError::InvalidField {
            path: path.to_string(),
            value: s.to_string(),
        }),
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
