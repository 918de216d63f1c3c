//! Import functionality
//!
//! Reads the parts of a PDI transformation that do not survive the rewrite
//! as XML: the embedded database connection blocks.

pub mod connection;

pub use connection::{
    CONNECTION_TAG, ConnectionExtractor, ExtractedConnections, connection_name,
    is_connection_block,
};
