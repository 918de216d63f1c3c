//! Tag and attribute rewrite map
//!
//! PDI and Hop share most of their XML vocabulary. The rewrite map lists the
//! element and attribute names that differ between the two dialects.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Mapping of source element/attribute names to destination names.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RewriteMap {
    rules: BTreeMap<String, String>,
}

impl RewriteMap {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Renames between a PDI transformation (`.ktr`) and a Hop pipeline (`.hpl`).
    pub fn pdi_to_hop() -> Self {
        [
            ("transformation", "pipeline"),
            ("trans_type", "pipeline_type"),
            ("trans_version", "pipeline_version"),
            ("trans_status", "pipeline_status"),
            ("step", "transform"),
            ("step_error_handling", "transform_error_handling"),
            ("source_step", "source_transform"),
            ("target_step", "target_transform"),
            ("capture_step_performance", "capture_transform_performance"),
            (
                "step_performance_capturing_delay",
                "transform_performance_capturing_delay",
            ),
            (
                "step_performance_capturing_size_limit",
                "transform_performance_capturing_size_limit",
            ),
        ]
        .into_iter()
        .collect()
    }

    /// Add a rule, returning the destination previously mapped for `source`.
    pub fn insert(
        &mut self,
        source: impl Into<String>,
        destination: impl Into<String>,
    ) -> Option<String> {
        self.rules.insert(source.into(), destination.into())
    }

    pub fn get(&self, source: &str) -> Option<&str> {
        self.rules.get(source).map(String::as_str)
    }

    /// Destination name for `name`, or `name` itself when no rule matches.
    pub fn rewrite<'a>(&'a self, name: &'a str) -> &'a str {
        self.get(name).unwrap_or(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<S: Into<String>, D: Into<String>> FromIterator<(S, D)> for RewriteMap {
    fn from_iter<I: IntoIterator<Item = (S, D)>>(iter: I) -> Self {
        Self {
            rules: iter
                .into_iter()
                .map(|(source, destination)| (source.into(), destination.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrite_mapped_and_unmapped() {
        let map = RewriteMap::pdi_to_hop();
        assert_eq!(map.rewrite("transformation"), "pipeline");
        assert_eq!(map.rewrite("step"), "transform");
        assert_eq!(map.rewrite("hop"), "hop");
        assert_eq!(map.rewrite("Step"), "Step");
    }

    #[test]
    fn test_insert_replaces_existing_rule() {
        let mut map = RewriteMap::new();
        assert!(map.is_empty());
        assert_eq!(map.insert("a", "b"), None);
        assert_eq!(map.insert("a", "c"), Some("b".to_string()));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Some("c"));
    }

    #[test]
    fn test_iter_sorted_by_source_name() {
        let map: RewriteMap = [("step", "transform"), ("source_step", "source_transform")]
            .into_iter()
            .collect();
        let rules: Vec<(&str, &str)> = map.iter().collect();
        assert_eq!(
            rules,
            vec![("source_step", "source_transform"), ("step", "transform")]
        );
    }
}
