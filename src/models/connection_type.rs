//! Database connection type reference
//!
//! Maps the PDI connection type code (`<type>MYSQL</type>`) to the name Hop
//! uses for the same database plugin.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping of PDI connection type identifiers to Hop descriptors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConnectionTypeMap {
    entries: BTreeMap<String, String>,
}

impl ConnectionTypeMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Database types known to both PDI and Hop.
    pub fn pdi_to_hop() -> Self {
        [
            ("AS/400", "AS/400"),
            ("CACHE", "Intersystems Cache"),
            ("DB2", "IBM DB2"),
            ("DERBY", "Apache Derby"),
            ("EXASOL4", "Exasol 4"),
            ("FIREBIRD", "Firebird SQL"),
            ("GENERIC", "Generic database"),
            ("GREENPLUM", "Greenplum"),
            ("H2", "H2"),
            ("HYPERSONIC", "Hypersonic"),
            ("INFORMIX", "Informix"),
            ("INGRES", "Ingres"),
            ("MARIADB", "MariaDB"),
            ("MONETDB", "MonetDB"),
            ("MSSQL", "MS SQL Server"),
            ("MSSQLNATIVE", "MS SQL Server (Native)"),
            ("MYSQL", "MySQL"),
            ("NEOVIEW", "Neoview"),
            ("NETEZZA", "Netezza"),
            ("ORACLE", "Oracle"),
            ("POSTGRESQL", "PostgreSQL"),
            ("REDSHIFT", "Redshift"),
            ("SAPDB", "MaxDB (SAP DB)"),
            ("SQLITE", "SQLite"),
            ("SYBASE", "Sybase"),
            ("SYBASEIQ", "SybaseIQ"),
            ("TERADATA", "Teradata"),
            ("VERTICA", "Vertica"),
            ("VERTICA5", "Vertica 5+"),
        ]
        .into_iter()
        .collect()
    }

    pub fn insert(
        &mut self,
        type_id: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Option<String> {
        self.entries.insert(type_id.into(), descriptor.into())
    }

    /// Resolve a type identifier; exact match first, then ASCII case-insensitive.
    pub fn resolve(&self, type_id: &str) -> Option<&str> {
        if let Some(descriptor) = self.entries.get(type_id) {
            return Some(descriptor);
        }
        self.entries
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(type_id))
            .map(|(_, descriptor)| descriptor.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<S: Into<String>, D: Into<String>> FromIterator<(S, D)> for ConnectionTypeMap {
    fn from_iter<I: IntoIterator<Item = (S, D)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(type_id, descriptor)| (type_id.into(), descriptor.into()))
                .collect(),
        }
    }
}
