//! # Tuple list
//!
//! Custom settings written on the wire as `key=value;key=value`. Maneuvers pass them to the
//! vehicle without interpreting them, so the list keeps the exact text it was built from and only
//! parses it when a value is looked up.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::fmt;

use super::MsgError;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Raw `key=value` text.
///
/// Segments which are not `key=value` (a bare flag, an empty segment) are kept in the text but
/// skipped by the lookups. When a key appears more than once the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TupleList {
    raw: String,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TupleList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap some text as it was received.
    pub fn from_raw<S: Into<String>>(raw: S) -> Self {
        Self { raw: raw.into() }
    }

    /// The text exactly as it will be sent.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// True when there is no text at all.
    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    /// Number of `key=value` segments.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Get the value of a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.iter().filter(|(k, _)| *k == key).map(|(_, v)| v).last()
    }

    /// Set the value of a key.
    ///
    /// The last segment holding the key is rewritten in place, otherwise a new segment is
    /// appended. The rest of the text is left untouched. Keys and values may not contain `=` or
    /// `;`, and keys may not be empty.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), MsgError> {
        if key.is_empty() || key.contains(&['=', ';'][..]) {
            return Err(MsgError::InvalidTupleList(format!("invalid key {:?}", key)));
        }
        if value.contains(&['=', ';'][..]) {
            return Err(MsgError::InvalidTupleList(format!(
                "invalid value {:?} for key {:?}",
                value, key
            )));
        }

        let pair = format!("{}={}", key, value);
        let mut segments: Vec<&str> = self.raw.split(';').collect();

        match segments
            .iter()
            .rposition(|s| matches!(split_pair(s), Some((k, _)) if k == key))
        {
            Some(idx) => {
                segments[idx] = &pair;
                self.raw = segments.join(";");
            }
            None => {
                if !self.raw.is_empty() && !self.raw.ends_with(';') {
                    self.raw.push(';');
                }
                self.raw.push_str(&pair);
            }
        }

        Ok(())
    }

    /// Remove every segment holding a key, returning the value that was in effect.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let value = self.get(key)?.to_string();

        self.raw = self
            .raw
            .split(';')
            .filter(|s| !matches!(split_pair(s), Some((k, _)) if k == key))
            .collect::<Vec<_>>()
            .join(";");

        Some(value)
    }

    /// Iterate over the `key=value` segments in order, with surrounding whitespace trimmed.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.raw.split(';').filter_map(split_pair)
    }
}

impl fmt::Display for TupleList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<String> for TupleList {
    fn from(raw: String) -> Self {
        Self::from_raw(raw)
    }
}

impl From<&str> for TupleList {
    fn from(raw: &str) -> Self {
        Self::from_raw(raw)
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Split a segment on its first `=`. Segments without one, or with an empty key, give `None`.
fn split_pair(segment: &str) -> Option<(&str, &str)> {
    let mut parts = segment.splitn(2, '=');
    let key = parts.next()?.trim();
    let value = parts.next()?.trim();

    if key.is_empty() {
        None
    } else {
        Some((key, value))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_lookup_and_display() {
        let list = TupleList::from_raw("pattern=lawnmower; spacing=20;");
        assert_eq!(list.len(), 2);
        assert_eq!(list.get("pattern"), Some("lawnmower"));
        assert_eq!(list.get("spacing"), Some("20"));
        assert_eq!(list.to_string(), "pattern=lawnmower; spacing=20;");

        let empty = TupleList::from_raw("");
        assert!(empty.is_empty());
        assert_eq!(empty.len(), 0);
        assert_eq!(empty.to_string(), "");
    }

    #[test]
    fn test_text_is_kept_verbatim() {
        let list = TupleList::from_raw("a=1;a=2");
        assert_eq!(list.as_str(), "a=1;a=2");
        assert_eq!(list.len(), 2);
        assert_eq!(list.get("a"), Some("2"));

        let list = TupleList::from_raw("flag");
        assert_eq!(list.as_str(), "flag");
        assert!(!list.is_empty());
        assert_eq!(list.len(), 0);
        assert_eq!(list.get("flag"), None);

        let list = TupleList::from_raw(" k = v ;");
        assert_eq!(list.as_str(), " k = v ;");
        assert_eq!(list.get("k"), Some("v"));

        let list = TupleList::from_raw("a=b=c");
        assert_eq!(list.as_str(), "a=b=c");
        assert_eq!(list.get("a"), Some("b=c"));

        let list = TupleList::from_raw("=x;y=1");
        assert_eq!(list.len(), 1);
        assert_eq!(list.get("y"), Some("1"));
    }

    #[test]
    fn test_edit_keeps_other_segments() {
        let mut list = TupleList::from_raw("flag; a=1;a=2");
        list.set("a", "3").unwrap();
        assert_eq!(list.as_str(), "flag; a=1;a=3");
        assert_eq!(list.get("a"), Some("3"));

        list.set("b", "4").unwrap();
        assert_eq!(list.as_str(), "flag; a=1;a=3;b=4");

        assert_eq!(list.remove("a"), Some("3".to_string()));
        assert_eq!(list.as_str(), "flag;b=4");
        assert_eq!(list.remove("a"), None);

        let mut list = TupleList::from_raw("x=1;");
        list.set("y", "2").unwrap();
        assert_eq!(list.as_str(), "x=1;y=2");
    }

    #[test]
    fn test_order_is_kept() {
        let mut list = TupleList::new();
        list.set("b", "1").unwrap();
        list.set("a", "2").unwrap();
        list.set("b", "3").unwrap();

        let keys: Vec<&str> = list.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(list.get("b"), Some("3"));

        assert_eq!(list.remove("b"), Some("3".to_string()));
        assert_eq!(list.to_string(), "a=2");
    }

    #[test]
    fn test_invalid_set() {
        let mut list = TupleList::new();
        assert!(list.set("k", "a;b").is_err());
        assert!(list.set("k=", "v").is_err());
        assert!(list.set("", "v").is_err());
        assert!(list.is_empty());
    }
}
