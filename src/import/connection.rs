//! Connection extractor
//!
//! PDI embeds every database connection a transformation uses as a block:
//!
//! ```xml
//! <connection>
//!   <name>SalesDB</name>
//!   <server>localhost</server>
//!   <type>MYSQL</type>
//!   <access>Native</access>
//!   <database>sales</database>
//!   <port>3306</port>
//!   <username>etl</username>
//!   <password>Encrypted 2be98afc86aa7f2e4cb79ce10df90acde</password>
//!   <attributes>
//!     <attribute><code>PORT_NUMBER</code><attribute>3306</attribute></attribute>
//!   </attributes>
//! </connection>
//! ```
//!
//! Steps refer to a connection by name with a text-only `<connection>` element;
//! those references are not blocks and are left alone.

use std::collections::{BTreeMap, HashSet};
use tracing::warn;

use crate::convert::ConversionError;
use crate::models::{ConnectionDefinition, ConnectionTypeMap};
use crate::xml::{Document, Element};

/// Default tag of an embedded connection block
pub const CONNECTION_TAG: &str = "connection";

/// Connections found in one document.
#[derive(Debug, Default)]
pub struct ExtractedConnections {
    /// One definition per distinct name, in document order
    pub connections: Vec<ConnectionDefinition>,
    /// Blocks that could not be turned into a definition
    pub errors: Vec<ConversionError>,
    /// Names seen again after their first block, in document order
    pub duplicates: Vec<String>,
}

/// Extracts embedded connection blocks from a parsed PDI document.
#[derive(Debug, Clone)]
pub struct ConnectionExtractor<'a> {
    types: &'a ConnectionTypeMap,
    connection_tag: &'a str,
}

impl<'a> ConnectionExtractor<'a> {
    pub fn new(types: &'a ConnectionTypeMap) -> Self {
        Self {
            types,
            connection_tag: CONNECTION_TAG,
        }
    }

    pub fn with_connection_tag(mut self, connection_tag: &'a str) -> Self {
        self.connection_tag = connection_tag;
        self
    }

    /// Collect the connection blocks of `document`.
    ///
    /// When two blocks share a name, the first one in document order is kept
    /// and the name is recorded in `duplicates`. Type resolution happens after
    /// deduplication, so a later block never replaces an earlier one whose
    /// type is unknown.
    pub fn extract(&self, document: &Document) -> ExtractedConnections {
        let mut blocks = Vec::new();
        collect_blocks(&document.root, self.connection_tag, &mut blocks);

        let mut result = ExtractedConnections::default();
        let mut seen = HashSet::new();

        for block in blocks {
            let name = match connection_name(block) {
                Ok(name) => name,
                Err(err) => {
                    result.errors.push(err);
                    continue;
                }
            };

            if !seen.insert(name.clone()) {
                warn!(
                    "Connection '{}' is defined more than once, keeping the first definition",
                    name
                );
                result.duplicates.push(name);
                continue;
            }

            match self.definition_from(block, name) {
                Ok(definition) => result.connections.push(definition),
                Err(err) => result.errors.push(err),
            }
        }

        result
    }

    fn definition_from(
        &self,
        block: &Element,
        name: String,
    ) -> Result<ConnectionDefinition, ConversionError> {
        let type_id = match block.child("type") {
            Some(element) => text_of(element)?.trim().to_string(),
            None => String::new(),
        };

        let descriptor = self.types.resolve(&type_id).ok_or_else(|| {
            ConversionError::UnresolvedConnectionType {
                connection: name.clone(),
                type_id: type_id.clone(),
            }
        })?;

        let mut definition = ConnectionDefinition::new(name, type_id, descriptor);
        for child in block.child_elements() {
            if child.name == "attributes" {
                definition.options = options_of(child)?;
            } else if !child.has_child_elements() {
                definition
                    .attributes
                    .entry(child.name.clone())
                    .or_insert(text_of(child)?);
            }
        }
        Ok(definition)
    }
}

/// True if `element` is an embedded connection block rather than a reference.
pub fn is_connection_block(element: &Element, connection_tag: &str) -> bool {
    element.name == connection_tag && element.has_child_elements()
}

/// Name of a connection block, checked for use as a file name stem.
pub fn connection_name(block: &Element) -> Result<String, ConversionError> {
    let name = match block.child("name") {
        Some(element) => text_of(element)?.trim().to_string(),
        None => String::new(),
    };

    if name.is_empty() {
        return Err(ConversionError::MissingConnectionName);
    }
    if name == "." || name == ".." || name.contains(['/', '\\']) {
        return Err(ConversionError::InvalidConnectionName(name));
    }
    Ok(name)
}

fn collect_blocks<'d>(element: &'d Element, connection_tag: &str, blocks: &mut Vec<&'d Element>) {
    for child in element.child_elements() {
        if is_connection_block(child, connection_tag) {
            blocks.push(child);
        } else {
            collect_blocks(child, connection_tag, blocks);
        }
    }
}

fn options_of(attributes: &Element) -> Result<BTreeMap<String, String>, ConversionError> {
    let mut options = BTreeMap::new();
    for attribute in attributes.child_elements() {
        let (Some(code), Some(value)) = (attribute.child("code"), attribute.child("attribute"))
        else {
            continue;
        };
        options
            .entry(text_of(code)?.trim().to_string())
            .or_insert(text_of(value)?);
    }
    Ok(options)
}

fn text_of(element: &Element) -> Result<String, ConversionError> {
    element
        .text()
        .map_err(|e| ConversionError::ParseError(e.to_string()))
}
