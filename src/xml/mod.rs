//! XML document model
//!
//! A small owned tree over `quick-xml` events. PDI transformations are read as a
//! whole document, rewritten in memory and written back. Text and attribute
//! values are kept in their raw (escaped) form so that a read/write round trip
//! only changes what the rewriter changes.

pub mod parser;
pub mod writer;

use anyhow::Context;
use quick_xml::events::Event;

pub use parser::parse_document;
pub use writer::write_document;

/// Error while reading or writing an XML document
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum XmlError {
    #[error("XML parse error at byte {position}: {message}")]
    Parse { position: u64, message: String },
    #[error("XML write error: {0}")]
    Write(String),
}

/// A parsed XML document.
#[derive(Debug, Clone)]
pub struct Document {
    /// Declaration, comments, processing instructions and whitespace before the root
    pub prolog: Vec<Node>,
    /// The root element
    pub root: Element,
    /// Comments and whitespace after the root
    pub epilog: Vec<Node>,
}

/// An XML element with its attributes and children.
#[derive(Debug, Clone, Default)]
pub struct Element {
    /// Qualified name as written in the source
    pub name: String,
    /// Attributes in source order; values are raw (escaped)
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
    /// Written as `<name/>` in the source
    pub self_closing: bool,
}

/// A child node of an element, or a top-level node of the prolog/epilog.
#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    /// Raw (escaped) character data
    Text(String),
    CData(String),
    /// Comments, processing instructions, the declaration and the doctype
    Misc(Event<'static>),
}

impl Element {
    /// Create an empty element with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Create an element holding a single text node.
    ///
    /// `text` is unescaped; it is escaped before being stored.
    pub fn with_text(name: impl Into<String>, text: &str) -> Self {
        Self {
            name: name.into(),
            children: vec![Node::Text(quick_xml::escape::escape(text).into_owned())],
            ..Default::default()
        }
    }

    /// Iterate over the direct child elements.
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            _ => None,
        })
    }

    /// First direct child element with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.child_elements().find(|element| element.name == name)
    }

    pub fn has_child_elements(&self) -> bool {
        self.child_elements().next().is_some()
    }

    /// Unescaped character data of the direct text and CDATA children.
    pub fn text(&self) -> Result<String, XmlError> {
        let mut text = String::new();
        for node in &self.children {
            match node {
                Node::Text(raw) => {
                    let unescaped =
                        quick_xml::escape::unescape(raw).map_err(|e| XmlError::Parse {
                            position: 0,
                            message: format!("invalid escape in <{}>: {}", self.name, e),
                        })?;
                    text.push_str(&unescaped);
                }
                Node::CData(data) => text.push_str(data),
                _ => {}
            }
        }
        Ok(text)
    }

    /// Raw (escaped) value of an attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

impl Node {
    /// True for text nodes made only of whitespace.
    pub fn is_whitespace(&self) -> bool {
        matches!(self, Node::Text(text) if text.trim().is_empty())
    }
}

/// Check that XML content is well-formed.
///
/// # Arguments
///
/// * `xml_content` - The XML content to check
///
/// # Returns
///
/// A `Result` indicating whether the content parsed as a single-rooted document.
pub fn check_well_formed(xml_content: &str) -> anyhow::Result<()> {
    parse_document(xml_content)
        .map(|_| ())
        .context("XML validation failed")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_text_unescapes() {
        let doc = parse_document("<a><b>x &amp; y<![CDATA[<z>]]></b></a>").unwrap();
        let b = doc.root.child("b").unwrap();
        assert_eq!(b.text().unwrap(), "x & y<z>");
    }

    #[test]
    fn test_with_text_escapes() {
        let element = Element::with_text("name", "R&D <prod>");
        assert!(matches!(&element.children[0], Node::Text(raw) if raw == "R&amp;D &lt;prod&gt;"));
        assert_eq!(element.text().unwrap(), "R&D <prod>");
    }

    #[test]
    fn test_check_well_formed() {
        assert!(check_well_formed("<?xml version=\"1.0\"?><a/>").is_ok());
        let err = check_well_formed("<a><b></a>").unwrap_err();
        assert!(err.to_string().contains("XML validation failed"));
    }
}
