//! # Angle text
//!
//! Formatting and parsing of angles as they appear in plan documents.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use conquer_once::Lazy;
use regex::{Regex, RegexBuilder};

// ------------------------------------------------------------------------------------------------
// STATICS
// ------------------------------------------------------------------------------------------------

/// Matches the legacy degrees/minutes/seconds form, e.g. `41N10'36.5''` or `8W36'`, where the
/// hemisphere letter separates the degrees from the minutes.
static DMS_RE: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r#"^(\d+(?:\.\d+)?)([NSEW])(\d+(?:\.\d+)?)'(?:(\d+(?:\.\d+)?)(?:''|"))?$"#)
        .case_insensitive(true)
        .build()
        .unwrap()
});

// ------------------------------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Format an angle in decimal degrees.
///
/// Uses the shortest representation that parses back to exactly the same value.
pub fn format_deg(deg: f64) -> String {
    format!("{}", deg)
}

/// Parse an angle in degrees, either as a decimal number or in the legacy DMS form.
///
/// Returns `None` for anything else, including non-finite numbers.
pub fn parse_deg(s: &str) -> Option<f64> {
    let s = s.trim();

    if let Ok(deg) = s.parse::<f64>() {
        return if deg.is_finite() { Some(deg) } else { None };
    }

    let caps = DMS_RE.captures(s)?;

    let deg: f64 = caps.get(1)?.as_str().parse().ok()?;
    let min: f64 = caps.get(3)?.as_str().parse().ok()?;
    let sec: f64 = match caps.get(4) {
        Some(m) => m.as_str().parse().ok()?,
        None => 0.0,
    };

    let magnitude = deg + min / 60.0 + sec / 3600.0;

    match caps.get(2)?.as_str() {
        "S" | "s" | "W" | "w" => Some(-magnitude),
        _ => Some(magnitude),
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_decimal() {
        assert_eq!(parse_deg("41.5"), Some(41.5));
        assert_eq!(parse_deg(" -8.25 "), Some(-8.25));
        assert_eq!(parse_deg("NaN"), None);
        assert_eq!(parse_deg("inf"), None);
        assert_eq!(parse_deg(""), None);

        let v = 41.176_342_123_456_78_f64;
        assert_eq!(parse_deg(&format_deg(v)), Some(v));
    }

    #[test]
    fn test_dms() {
        let lat = parse_deg("41N10'36.0''").unwrap();
        assert!((lat - (41.0 + 10.0 / 60.0 + 36.0 / 3600.0)).abs() < 1e-12);

        let lon = parse_deg("8w36'").unwrap();
        assert!((lon + 8.6).abs() < 1e-12);

        assert!(parse_deg("41X10'36''").is_none());
        assert!(parse_deg("N41").is_none());
    }
}
