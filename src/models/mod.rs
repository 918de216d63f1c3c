//! Models module
//!
//! Lookup tables and records shared by the importer, the rewriter and the
//! metadata exporter.

pub mod connection;
pub mod connection_type;
pub mod rewrite;

pub use connection::ConnectionDefinition;
pub use connection_type::ConnectionTypeMap;
pub use rewrite::RewriteMap;
