//! Metric data model

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Attributes
// ============================================================================

/// Ordered attribute mapping
///
/// Built through [`AttributeSet::insert_non_empty`] a key is present iff its
/// value is non-empty, so record attribute sets are sparse.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeSet(BTreeMap<String, String>);

impl AttributeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert unconditionally
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Insert only if `value` is non-empty
    pub fn insert_non_empty(&mut self, key: impl Into<String>, value: &str) {
        if !value.is_empty() {
            self.0.insert(key.into(), value.to_string());
        }
    }

    /// Builder form of [`AttributeSet::insert_non_empty`]
    #[must_use]
    pub fn with_non_empty(mut self, key: impl Into<String>, value: &str) -> Self {
        self.insert_non_empty(key, value);
        self
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

// ============================================================================
// Metrics
// ============================================================================

/// One integer observation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Start of the cycle this point belongs to
    pub start_timestamp: DateTime<Utc>,
    /// Observation time
    pub timestamp: DateTime<Utc>,
    /// Observed value
    pub int_value: i64,
    /// Point attributes
    pub attributes: AttributeSet,
}

/// A named metric with its data points in recording order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metric {
    pub name: String,
    pub description: String,
    /// Unit of `int_value`; may be empty
    pub unit: String,
    pub data_points: Vec<DataPoint>,
}

impl Metric {
    /// Create a metric with room for `capacity` data points
    pub fn with_capacity(
        name: impl Into<String>,
        description: impl Into<String>,
        unit: impl Into<String>,
        capacity: usize,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            unit: unit.into(),
            data_points: Vec::with_capacity(capacity),
        }
    }
}

/// Instrumentation scope metrics were produced under
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub name: String,
    pub version: String,
}

/// Metrics of one resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceMetrics {
    /// Resource identifying attributes
    pub resource: AttributeSet,
    pub scope: Scope,
    /// Start of the cycle that produced these metrics
    pub start_time: DateTime<Utc>,
    pub metrics: Vec<Metric>,
}

/// Everything produced by one scrape cycle
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsBatch {
    pub resource_metrics: Vec<ResourceMetrics>,
}

impl MetricsBatch {
    /// Total number of metrics across resources
    #[must_use]
    pub fn metric_count(&self) -> usize {
        self.resource_metrics.iter().map(|rm| rm.metrics.len()).sum()
    }

    /// Total number of data points across resources and metrics
    #[must_use]
    pub fn data_point_count(&self) -> usize {
        self.resource_metrics
            .iter()
            .flat_map(|rm| &rm.metrics)
            .map(|m| m.data_points.len())
            .sum()
    }

    /// First metric with `name`
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&Metric> {
        self.resource_metrics
            .iter()
            .flat_map(|rm| &rm.metrics)
            .find(|m| m.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_non_empty_is_sparse() {
        let attrs = AttributeSet::new()
            .with_non_empty("installedsoftware.name", "bash")
            .with_non_empty("installedsoftware.publisher", "")
            .with_non_empty("installedsoftware.version", "5.1");

        assert_eq!(attrs.len(), 2);
        assert!(!attrs.contains_key("installedsoftware.publisher"));
        assert_eq!(attrs.get("installedsoftware.name"), Some("bash"));
    }

    #[test]
    fn test_attributes_serialize_as_map() {
        let attrs: AttributeSet = [("b", "2"), ("a", "1")].into_iter().collect();

        let json = serde_json::to_string(&attrs).unwrap();

        assert_eq!(json, r#"{"a":"1","b":"2"}"#);
    }
}
