//! Data-layer records and read views.

use mtrrun_core::MetricKind;

/// Stored records carry their key and their type tag.
pub trait Record: Clone + Send + Sync + 'static {
    const KIND: MetricKind;
    fn name(&self) -> &str;
}

#[derive(Debug, Clone, PartialEq)]
pub struct GaugeRecord {
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CounterRecord {
    pub name: String,
    pub value: i64,
}

impl Record for GaugeRecord {
    const KIND: MetricKind = MetricKind::Gauge;
    fn name(&self) -> &str {
        &self.name
    }
}

impl Record for CounterRecord {
    const KIND: MetricKind = MetricKind::Counter;
    fn name(&self) -> &str {
        &self.name
    }
}

/// One rendered entry of the dashboard listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricView {
    pub name: String,
    pub value: String,
}
