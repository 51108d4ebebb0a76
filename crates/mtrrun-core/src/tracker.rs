//! In-process metric registry.

use dashmap::DashMap;

use crate::metric::{Metric, MetricKind};

/// Immutable snapshot of one metric, rendered at snapshot time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub name: String,
    pub kind: MetricKind,
    pub value: String,
}

/// Registry: `name -> Metric`.
///
/// Re-tracking a name replaces the previous instance. `status` reads each
/// entry under its shard lock, so every `Status` is internally consistent;
/// consistency across keys is not guaranteed.
#[derive(Default)]
pub struct Tracker {
    metrics: DashMap<String, Metric>,
}

impl Tracker {
    pub fn new() -> Self {
        Self {
            metrics: DashMap::new(),
        }
    }

    /// Insert or replace by name.
    pub fn track(&self, metric: impl Into<Metric>) {
        let metric = metric.into();
        let name = metric.name().to_string();
        if self.metrics.insert(name.clone(), metric).is_some() {
            tracing::debug!(%name, "tracked metric replaced");
        }
    }

    /// Remove by name; absent names are ignored.
    pub fn untrack(&self, metric: &Metric) {
        self.metrics.remove(metric.name());
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Snapshot of every tracked metric. Order is unspecified.
    pub fn status(&self) -> Vec<Status> {
        self.metrics
            .iter()
            .map(|r| Status {
                name: r.key().clone(),
                kind: r.value().kind(),
                value: r.value().render_value(),
            })
            .collect()
    }
}
