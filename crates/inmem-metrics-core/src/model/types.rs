//! Index keys and typed metric values.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::{MetricsError, Result};
use crate::model::wire::MetricsQueryTag;

/// Primary index key within a project. RFC 3339 on the wire.
pub type Timestamp = DateTime<Utc>;

/// Metric name -> value for one (project, timestamp, tagset).
pub type ValueBag = BTreeMap<String, MetricValue>;

/// Unordered set of `key=value` labels identifying one series.
///
/// Backed by a sorted map so that equality and hashing ignore the order in
/// which labels were supplied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tagset(BTreeMap<String, String>);

impl Tagset {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// AND-match: every query tag must be present with an exact value.
    /// Labels not named by the query are ignored.
    pub fn matches(&self, query_tags: &[MetricsQueryTag]) -> bool {
        query_tags
            .iter()
            .all(|q| self.get(&q.tag_name) == Some(q.tag_value.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Tagset {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Declared kind of a metric. Fixed at first declaration and never changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub enum MetricType {
    /// Integer cumulative counter.
    Counter,
    /// Floating-point cumulative counter.
    FloatCounter,
    /// Instantaneous value, last write wins.
    Gauge,
}

impl MetricType {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricType::Counter => "COUNTER",
            MetricType::FloatCounter => "FLOAT_COUNTER",
            MetricType::Gauge => "GAUGE",
        }
    }

    /// Counters chain onto the previous cumulative value; gauges do not.
    pub fn is_cumulative(self) -> bool {
        matches!(self, MetricType::Counter | MetricType::FloatCounter)
    }

    /// Bring a candidate value into the shape this type stores.
    ///
    /// Integers widen to floats for `FLOAT_COUNTER` and `GAUGE`. A float aimed
    /// at an integer `COUNTER` disagrees with the declaration and is rejected
    /// as a metadata conflict.
    pub fn conform(self, metric: &str, value: MetricValue) -> Result<MetricValue> {
        match (self, value) {
            (MetricType::Counter, MetricValue::Integer(_)) => Ok(value),
            (MetricType::Counter, MetricValue::Float(f)) => Err(MetricsError::conflict(
                metric,
                format!("declared COUNTER (integer) but received float value {f}"),
            )),
            (MetricType::FloatCounter | MetricType::Gauge, v) => {
                let f = v.as_f64();
                if f.is_finite() {
                    Ok(MetricValue::Float(f))
                } else {
                    Err(MetricsError::validation(format!(
                        "metric '{metric}' value must be finite"
                    )))
                }
            }
        }
    }
}

impl fmt::Display for MetricType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MetricType {
    type Err = MetricsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "COUNTER" => Ok(MetricType::Counter),
            "FLOAT_COUNTER" => Ok(MetricType::FloatCounter),
            "GAUGE" => Ok(MetricType::Gauge),
            other => Err(MetricsError::validation(format!(
                "unrecognized metric type: {other:?}"
            ))),
        }
    }
}

impl TryFrom<String> for MetricType {
    type Error = MetricsError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl Serialize for MetricType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A stored or candidate value. Plain JSON number on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValue {
    Integer(i64),
    Float(f64),
}

impl MetricValue {
    pub fn as_f64(self) -> f64 {
        match self {
            MetricValue::Integer(i) => i as f64,
            MetricValue::Float(f) => f,
        }
    }

    /// Sum two values of the same shape. Integer sums saturate.
    pub fn accumulate(self, delta: MetricValue) -> MetricValue {
        match (self, delta) {
            (MetricValue::Integer(a), MetricValue::Integer(b)) => {
                MetricValue::Integer(a.saturating_add(b))
            }
            (a, b) => MetricValue::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl From<i64> for MetricValue {
    fn from(v: i64) -> Self {
        MetricValue::Integer(v)
    }
}

impl From<f64> for MetricValue {
    fn from(v: f64) -> Self {
        MetricValue::Float(v)
    }
}
