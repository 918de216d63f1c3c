//! Database connection definitions extracted from PDI files

use serde::Serialize;
use std::collections::BTreeMap;

/// A database connection embedded in a PDI transformation.
///
/// Connections are identified by name; two definitions with the same name are
/// equal regardless of their attributes.
#[derive(Debug, Clone, Serialize)]
pub struct ConnectionDefinition {
    /// Connection name, also the metadata file name stem
    pub name: String,
    /// PDI connection type code, e.g. `MYSQL`
    pub type_id: String,
    /// Hop descriptor resolved from the type code
    pub descriptor: String,
    /// Simple child elements of the connection block (`server`, `port`, ...)
    pub attributes: BTreeMap<String, String>,
    /// Code/value pairs from the nested `<attributes>` list
    pub options: BTreeMap<String, String>,
}

impl ConnectionDefinition {
    pub fn new(
        name: impl Into<String>,
        type_id: impl Into<String>,
        descriptor: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            type_id: type_id.into(),
            descriptor: descriptor.into(),
            attributes: BTreeMap::new(),
            options: BTreeMap::new(),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Hop access type code for the PDI `<access>` value.
    ///
    /// Unknown or missing values map to native access.
    pub fn access_type(&self) -> u8 {
        match self.attribute("access").map(str::trim) {
            Some(access) if access.eq_ignore_ascii_case("odbc") => 1,
            Some(access) if access.eq_ignore_ascii_case("oci") => 2,
            Some(access) if access.eq_ignore_ascii_case("jndi") => 4,
            _ => 0,
        }
    }
}

impl PartialEq for ConnectionDefinition {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ConnectionDefinition {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equality_by_name() {
        let mut a = ConnectionDefinition::new("SalesDB", "MYSQL", "MySQL");
        let b = ConnectionDefinition::new("SalesDB", "ORACLE", "Oracle");
        a.attributes.insert("server".to_string(), "db1".to_string());
        assert_eq!(a, b);
        assert_ne!(a, ConnectionDefinition::new("Other", "MYSQL", "MySQL"));
    }

    #[test]
    fn test_access_type() {
        let mut connection = ConnectionDefinition::new("c", "MYSQL", "MySQL");
        assert_eq!(connection.access_type(), 0);
        for (access, expected) in [("Native", 0), ("ODBC", 1), ("OCI", 2), ("JNDI", 4), ("Plugin", 0)] {
            connection
                .attributes
                .insert("access".to_string(), access.to_string());
            assert_eq!(connection.access_type(), expected, "access {}", access);
        }
    }
}
