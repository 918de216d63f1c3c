//! Whole-document XML reader
//!
//! Builds a [`Document`] from XML text. Anything that is not well-formed
//! (mismatched or unclosed tags, several roots, character data outside the
//! root, broken entity references) is rejected.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{Document, Element, Node, XmlError};

/// Parse XML content into a [`Document`].
///
/// # Arguments
///
/// * `xml_content` - The XML content as a string.
///
/// # Returns
///
/// The parsed document, or an `XmlError::Parse` with the byte position of the problem.
pub fn parse_document(xml_content: &str) -> Result<Document, XmlError> {
    let mut reader = Reader::from_str(xml_content);
    let mut builder = TreeBuilder::default();

    loop {
        let position = reader.buffer_position() as u64;
        let event = reader.read_event().map_err(|e| XmlError::Parse {
            position: reader.buffer_position() as u64,
            message: e.to_string(),
        })?;

        let result = match event {
            Event::Start(start) => element_from(&start).and_then(|element| builder.open(element)),
            Event::Empty(start) => element_from(&start).and_then(|mut element| {
                element.self_closing = true;
                builder.attach(Node::Element(element))
            }),
            Event::End(_) => builder.close(),
            Event::Text(text) => {
                let raw = String::from_utf8_lossy(&text).into_owned();
                let checked = quick_xml::escape::unescape(&raw)
                    .map(|_| ())
                    .map_err(|e| e.to_string());
                checked.and_then(|()| builder.attach(Node::Text(raw)))
            }
            Event::CData(data) => {
                builder.attach(Node::CData(String::from_utf8_lossy(&data).into_owned()))
            }
            Event::Eof => break,
            other => builder.attach(Node::Misc(other.into_owned())),
        };

        result.map_err(|message| XmlError::Parse { position, message })?;
    }

    builder.finish().map_err(|message| XmlError::Parse {
        position: xml_content.len() as u64,
        message,
    })
}

fn element_from(start: &BytesStart<'_>) -> Result<Element, String> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| e.to_string())?;
        let value = String::from_utf8_lossy(&attribute.value).into_owned();
        quick_xml::escape::unescape(&value).map_err(|e| e.to_string())?;
        element.attributes.push((
            String::from_utf8_lossy(attribute.key.as_ref()).into_owned(),
            value,
        ));
    }
    Ok(element)
}

#[derive(Default)]
struct TreeBuilder {
    prolog: Vec<Node>,
    epilog: Vec<Node>,
    open: Vec<Element>,
    root: Option<Element>,
}

impl TreeBuilder {
    fn open(&mut self, element: Element) -> Result<(), String> {
        if self.open.is_empty() && self.root.is_some() {
            return Err(format!(
                "second root element <{}> after the document root",
                element.name
            ));
        }
        self.open.push(element);
        Ok(())
    }

    fn close(&mut self) -> Result<(), String> {
        let element = self
            .open
            .pop()
            .ok_or_else(|| "end tag without a matching start tag".to_string())?;
        self.attach(Node::Element(element))
    }

    fn attach(&mut self, node: Node) -> Result<(), String> {
        if let Some(parent) = self.open.last_mut() {
            parent.children.push(node);
            return Ok(());
        }

        match node {
            Node::Element(element) => {
                if let Some(root) = &self.root {
                    return Err(format!(
                        "second root element <{}> after <{}>",
                        element.name, root.name
                    ));
                }
                self.root = Some(element);
            }
            Node::Text(text) if !text.trim().is_empty() => {
                return Err(format!(
                    "character data outside the root element: {:?}",
                    text.trim()
                ));
            }
            Node::CData(_) => return Err("CDATA section outside the root element".to_string()),
            other if self.root.is_none() => self.prolog.push(other),
            other => self.epilog.push(other),
        }
        Ok(())
    }

    fn finish(self) -> Result<Document, String> {
        if let Some(unclosed) = self.open.last() {
            return Err(format!("unclosed element <{}>", unclosed.name));
        }
        let root = self
            .root
            .ok_or_else(|| "document has no root element".to_string())?;
        Ok(Document {
            prolog: self.prolog,
            root,
            epilog: self.epilog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_elements() {
        let doc = parse_document(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<transformation>
  <info><name>load</name></info>
  <step id="1"><type>TableInput</type></step>
  <notepads/>
</transformation>"#,
        )
        .unwrap();

        assert_eq!(doc.root.name, "transformation");
        let names: Vec<&str> = doc.root.child_elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["info", "step", "notepads"]);
        assert_eq!(doc.root.child("step").unwrap().attribute("id"), Some("1"));
        assert!(doc.root.child("notepads").unwrap().self_closing);
        assert!(matches!(doc.prolog[0], Node::Misc(Event::Decl(_))));
    }

    #[test]
    fn test_parse_keeps_raw_text() {
        let doc = parse_document("<a x=\"1 &lt; 2\">Tom &amp; Jerry</a>").unwrap();
        assert_eq!(doc.root.attribute("x"), Some("1 &lt; 2"));
        assert!(matches!(&doc.root.children[0], Node::Text(t) if t == "Tom &amp; Jerry"));
    }

    #[test]
    fn test_parse_rejects_mismatched_tags() {
        assert!(parse_document("<a><b></a></b>").is_err());
    }

    #[test]
    fn test_parse_rejects_unclosed_root() {
        let err = parse_document("<a><b/>").unwrap_err();
        assert!(matches!(err, XmlError::Parse { .. }));
    }

    #[test]
    fn test_parse_rejects_second_root() {
        assert!(parse_document("<a/><b/>").is_err());
    }

    #[test]
    fn test_parse_rejects_text_outside_root() {
        assert!(parse_document("<a/>trailing").is_err());
    }

    #[test]
    fn test_parse_rejects_empty_document() {
        assert!(parse_document("").is_err());
        assert!(parse_document("<?xml version=\"1.0\"?>\n").is_err());
    }

    #[test]
    fn test_parse_rejects_bad_entity() {
        assert!(parse_document("<a>fish & chips</a>").is_err());
    }
}
