//! Document rewriter
//!
//! Turns a parsed PDI document into its Hop form. Only names change: element
//! and attribute names found in the [`RewriteMap`] are replaced, everything
//! else (nesting, order, attribute values, text) is kept. Embedded connection
//! blocks are dropped because Hop stores connections as metadata files.

use crate::import::{CONNECTION_TAG, connection_name, is_connection_block};
use crate::models::RewriteMap;
use crate::xml::{Document, Element, Node};

/// Applies a rewrite map to parsed documents.
#[derive(Debug, Clone)]
pub struct DocumentRewriter {
    map: RewriteMap,
    connection_tag: String,
    reference_tag: Option<String>,
}

impl DocumentRewriter {
    pub fn new(map: RewriteMap) -> Self {
        Self {
            map,
            connection_tag: CONNECTION_TAG.to_string(),
            reference_tag: None,
        }
    }

    /// Tag identifying embedded connection blocks (default `connection`).
    pub fn with_connection_tag(mut self, connection_tag: impl Into<String>) -> Self {
        self.connection_tag = connection_tag.into();
        self
    }

    /// Replace each removed connection block by `<tag>NAME</tag>`.
    ///
    /// Without a reference tag the blocks are removed outright.
    pub fn with_reference_tag(mut self, reference_tag: Option<String>) -> Self {
        self.reference_tag = reference_tag;
        self
    }

    pub fn connection_tag(&self) -> &str {
        &self.connection_tag
    }

    /// Rewrite a document.
    ///
    /// Names are looked up once; the destination of a rule is never rewritten
    /// again by another rule.
    pub fn rewrite(&self, document: Document) -> Document {
        Document {
            prolog: document.prolog,
            root: self.rewrite_element(document.root),
            epilog: document.epilog,
        }
    }

    fn rewrite_element(&self, element: Element) -> Element {
        let name = self.map.rewrite(&element.name).to_string();
        let attributes = element
            .attributes
            .into_iter()
            .map(|(key, value)| (self.map.rewrite(&key).to_string(), value))
            .collect();

        let mut children = Vec::with_capacity(element.children.len());
        for child in element.children {
            match child {
                Node::Element(child) if is_connection_block(&child, &self.connection_tag) => {
                    match (&self.reference_tag, connection_name(&child)) {
                        (Some(tag), Ok(name)) => {
                            children.push(Node::Element(Element::with_text(tag.as_str(), &name)))
                        }
                        _ => {
                            // drop the indentation that belonged to the removed block
                            if children.last().is_some_and(Node::is_whitespace) {
                                children.pop();
                            }
                        }
                    }
                }
                Node::Element(child) => children.push(Node::Element(self.rewrite_element(child))),
                other => children.push(other),
            }
        }

        Element {
            name,
            attributes,
            children,
            self_closing: element.self_closing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::{parse_document, write_document};

    fn rewrite(map: RewriteMap, xml: &str) -> String {
        let rewriter = DocumentRewriter::new(map);
        let document = parse_document(xml).unwrap();
        write_document(&rewriter.rewrite(document)).unwrap()
    }

    #[test]
    fn test_rewrites_element_names() {
        let output = rewrite(
            RewriteMap::pdi_to_hop(),
            "<transformation><info><trans_type>Normal</trans_type></info>\
             <step><name>in</name></step><step_error_handling/></transformation>",
        );
        assert_eq!(
            output,
            "<pipeline><info><pipeline_type>Normal</pipeline_type></info>\
             <transform><name>in</name></transform><transform_error_handling/></pipeline>"
        );
    }

    #[test]
    fn test_rewrites_attribute_names_not_values() {
        let map: RewriteMap = [("step", "transform")].into_iter().collect();
        let output = rewrite(map, r#"<a step="step" other="x"><step>step</step></a>"#);
        assert_eq!(
            output,
            r#"<a transform="step" other="x"><transform>step</transform></a>"#
        );
    }

    #[test]
    fn test_no_chained_rewrites() {
        let map: RewriteMap = [("a", "b"), ("b", "c")].into_iter().collect();
        assert_eq!(rewrite(map, "<a><b/></a>"), "<b><c/></b>");
    }

    #[test]
    fn test_removes_connection_blocks_keeps_references() {
        let xml = "<transformation>\n  <connection>\n    <name>SalesDB</name>\n  </connection>\n  \
                   <step>\n    <connection>SalesDB</connection>\n  </step>\n</transformation>";
        let output = rewrite(RewriteMap::pdi_to_hop(), xml);
        assert_eq!(
            output,
            "<pipeline>\n  <transform>\n    <connection>SalesDB</connection>\n  </transform>\n</pipeline>"
        );
    }

    #[test]
    fn test_reference_tag_replaces_blocks() {
        let rewriter = DocumentRewriter::new(RewriteMap::new())
            .with_reference_tag(Some("connection_ref".to_string()));
        let document =
            parse_document("<t>\n  <connection><name>A &amp; B</name></connection>\n</t>").unwrap();
        let output = write_document(&rewriter.rewrite(document)).unwrap();
        assert_eq!(output, "<t>\n  <connection_ref>A &amp; B</connection_ref>\n</t>");
    }

    #[test]
    fn test_preserves_prolog_comments_and_text() {
        let xml = "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- note -->\n\
                   <transformation><!-- inside --><info>1 &lt; 2</info></transformation>";
        let output = rewrite(RewriteMap::pdi_to_hop(), xml);
        assert_eq!(
            output,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<!-- note -->\n\
             <pipeline><!-- inside --><info>1 &lt; 2</info></pipeline>"
        );
    }
}
