//! # XML element tree
//!
//! A small owned element tree used as the persisted form of maneuvers. Documents are parsed from
//! and written to text with `quick-xml`; nodes are located with slash separated paths relative
//! to an element, for example `finalPoint/point/coordinate/latitude`.
//!
//! Mixed content is not supported: the text of an element is the concatenation of all its text
//! nodes, and whitespace between elements is dropped.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use quick_xml::{
    events::{attributes::AttrError, BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Reader, Writer,
};
use serde::{Deserialize, Serialize};
use std::io::Write;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// An XML element with its attributes, text and child elements.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XmlElement {
    pub name: String,

    /// Attributes in document order
    pub attributes: Vec<(String, String)>,

    /// Text content, untrimmed
    pub text: String,

    pub children: Vec<XmlElement>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Errors raised while reading or writing XML text.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    #[error("XML syntax error: {0}")]
    Syntax(#[from] quick_xml::Error),

    #[error("Malformed attribute: {0}")]
    Attribute(#[from] AttrError),

    #[error("Document is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Document has no root element")]
    NoRoot,

    #[error("Document has more than one root element (found <{0}>)")]
    MultipleRoots(String),

    #[error("Element <{0}> is never closed")]
    Unclosed(String),

    #[error("Closing tag found with no open element")]
    UnexpectedEnd,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl XmlElement {
    /// Create an empty element.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Default::default()
        }
    }

    /// Builder style attribute setter.
    pub fn with_attr(mut self, key: &str, value: &str) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder style text setter.
    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, key: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == key) {
            Some(attr) => attr.1 = value.to_string(),
            None => self.attributes.push((key.to_string(), value.to_string())),
        }
    }

    /// Get the value of an attribute.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// The element's text with surrounding whitespace removed.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Append a child element, returning a mutable reference to it.
    pub fn add_child(&mut self, child: XmlElement) -> &mut XmlElement {
        self.children.push(child);
        let idx = self.children.len() - 1;
        &mut self.children[idx]
    }

    /// Append a new empty child element with the given name, returning a mutable reference to it.
    pub fn add_element(&mut self, name: &str) -> &mut XmlElement {
        self.add_child(XmlElement::new(name))
    }

    /// The first child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All child elements with the given name, in document order.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Follow a slash separated path of child names, taking the first match at each step.
    ///
    /// An empty path selects this element.
    pub fn select(&self, path: &str) -> Option<&XmlElement> {
        path.split('/')
            .filter(|p| !p.is_empty())
            .try_fold(self, |el, name| el.child(name))
    }

    /// Parse a document, returning its root element.
    pub fn parse(xml: &str) -> Result<XmlElement, XmlError> {
        let mut reader = Reader::from_str(xml);
        reader.trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            match reader.read_event()? {
                Event::Start(start) => stack.push(Self::from_start(&start)?),
                Event::Empty(start) => {
                    let el = Self::from_start(&start)?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::End(_) => {
                    let el = stack.pop().ok_or(XmlError::UnexpectedEnd)?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::Text(text) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&text.unescape()?);
                    }
                }
                Event::CData(data) => {
                    if let Some(top) = stack.last_mut() {
                        top.text.push_str(&String::from_utf8(data.into_inner().into_owned())?);
                    }
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions and doctypes carry nothing we
                // need
                _ => (),
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::Unclosed(open.name));
        }

        root.ok_or(XmlError::NoRoot)
    }

    /// Write the element as compact XML without a declaration.
    pub fn to_xml_string(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Vec::new());
        self.write(&mut writer)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Write the element as a complete document, with a declaration and indented by `indent`
    /// spaces per level.
    pub fn to_document_string(&self, indent: usize) -> Result<String, XmlError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', indent);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        self.write(&mut writer)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    /// Write the element and its children into a `quick-xml` writer.
    pub fn write<W: Write>(&self, writer: &mut Writer<W>) -> Result<(), XmlError> {
        let mut start = BytesStart::new(self.name.as_str());
        for (k, v) in self.attributes.iter() {
            start.push_attribute((k.as_str(), v.as_str()));
        }

        if self.children.is_empty() && self.text.is_empty() {
            writer.write_event(Event::Empty(start))?;
            return Ok(());
        }

        writer.write_event(Event::Start(start))?;
        if !self.text.is_empty() {
            writer.write_event(Event::Text(BytesText::new(&self.text)))?;
        }
        for child in self.children.iter() {
            child.write(writer)?;
        }
        writer.write_event(Event::End(BytesEnd::new(self.name.as_str())))?;

        Ok(())
    }

    fn from_start(start: &BytesStart) -> Result<Self, XmlError> {
        let mut el = XmlElement::new(&String::from_utf8(start.name().as_ref().to_vec())?);

        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8(attr.key.as_ref().to_vec())?;
            let value = attr.unescape_value()?;
            el.attributes.push((key, value.into_owned()));
        }

        Ok(el)
    }
}

// ------------------------------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Attach a completed element to its parent, or make it the root if there is no parent.
fn attach(
    stack: &mut Vec<XmlElement>,
    root: &mut Option<XmlElement>,
    el: XmlElement,
) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(parent) => {
            parent.children.push(el);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(el);
            Ok(())
        }
        None => Err(XmlError::MultipleRoots(el.name)),
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_and_select() {
        let xml = r#"<?xml version="1.0"?>
            <!-- plan fragment -->
            <Plan kind="automatic">
                <speed unit="m/s" tolerance="0.5">1.2</speed>
                <points>
                    <point><latitude>1</latitude></point>
                    <point><latitude>2 &amp; more</latitude></point>
                    <empty/>
                </points>
                <note><![CDATA[a < b]]></note>
            </Plan>"#;

        let root = XmlElement::parse(xml).unwrap();
        assert_eq!(root.name, "Plan");
        assert_eq!(root.attr("kind"), Some("automatic"));

        let speed = root.select("speed").unwrap();
        assert_eq!(speed.text(), "1.2");
        assert_eq!(speed.attr("unit"), Some("m/s"));
        assert_eq!(speed.attr("missing"), None);

        let lats: Vec<&str> = root
            .select("points")
            .unwrap()
            .children_named("point")
            .map(|p| p.select("latitude").unwrap().text())
            .collect();
        assert_eq!(lats, vec!["1", "2 & more"]);

        assert!(root.select("points/empty").is_some());
        assert!(root.select("points/point/longitude").is_none());
        assert_eq!(root.select("note").unwrap().text(), "a < b");
        assert_eq!(root.select("").unwrap().name, "Plan");
    }

    #[test]
    fn test_write_and_reparse() {
        let mut root = XmlElement::new("CoverArea").with_attr("kind", "automatic");
        root.add_child(XmlElement::new("speed").with_attr("unit", "%").with_text("50"));
        root.add_element("name").text = "<a & b>".to_string();
        root.add_element("empty");

        let compact = root.to_xml_string().unwrap();
        assert!(compact.starts_with("<CoverArea kind=\"automatic\">"));
        assert!(compact.contains("<empty/>"));
        assert_eq!(XmlElement::parse(&compact).unwrap(), root);

        let doc = root.to_document_string(2).unwrap();
        assert!(doc.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert_eq!(XmlElement::parse(&doc).unwrap(), root);
    }

    #[test]
    fn test_malformed() {
        assert!(matches!(XmlElement::parse(""), Err(XmlError::NoRoot)));
        assert!(matches!(
            XmlElement::parse("<a></a><b/>"),
            Err(XmlError::MultipleRoots(_))
        ));
        assert!(XmlElement::parse("<a><b></a>").is_err());
        assert!(XmlElement::parse("<a><b></b>").is_err());
        assert!(XmlElement::parse("<a x=1/>").is_err());
    }
}
