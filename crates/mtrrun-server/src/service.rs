//! Metric business logic.
//!
//! Writes are upserts: look the name up, insert on `NotFound`, otherwise
//! update. Gauges overwrite the stored value; counters add the delta to it.
//! Every other repository error propagates to the caller.
//!
//! The select-then-write sequence is serialized per kind so concurrent puts on
//! the same counter never lose a delta and concurrent first writes never see
//! `AlreadyExists`. Reads do not take the write lock.

use std::sync::Arc;

use tokio::sync::Mutex;

use mtrrun_core::error::{MtrrunError, Result};
use mtrrun_core::protocol::value;

use crate::model::{CounterRecord, GaugeRecord, MetricView};
use crate::repository::MetricRepository;

pub struct MetricService {
    repo: Arc<dyn MetricRepository>,
    gauge_writes: Mutex<()>,
    counter_writes: Mutex<()>,
}

impl MetricService {
    pub fn new(repo: Arc<dyn MetricRepository>) -> Self {
        Self {
            repo,
            gauge_writes: Mutex::new(()),
            counter_writes: Mutex::new(()),
        }
    }

    pub async fn get_gauge(&self, name: &str) -> Result<GaugeRecord> {
        let res = self.repo.select_gauge_by_name(name).await;
        if res.is_err() {
            tracing::debug!(%name, "metric with type 'gauge' not found");
        }
        res
    }

    pub async fn get_counter(&self, name: &str) -> Result<CounterRecord> {
        let res = self.repo.select_counter_by_name(name).await;
        if res.is_err() {
            tracing::debug!(%name, "metric with type 'counter' not found");
        }
        res
    }

    /// Store `value` under `name`, replacing any previous value.
    pub async fn put_gauge(&self, name: &str, value: f64) -> Result<()> {
        let _w = self.gauge_writes.lock().await;

        match self.repo.select_gauge_by_name(name).await {
            Ok(mut current) => {
                current.value = value;
                self.repo.update_gauge(current).await?;
                tracing::debug!(%name, value, "gauge updated");
            }
            Err(e) if e.is_not_found() => {
                self.repo
                    .insert_gauge(GaugeRecord {
                        name: name.to_string(),
                        value,
                    })
                    .await?;
                tracing::debug!(%name, value, "gauge created");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Add `delta` to the counter, creating it at `delta` when absent.
    pub async fn put_counter(&self, name: &str, delta: i64) -> Result<()> {
        let _w = self.counter_writes.lock().await;

        match self.repo.select_counter_by_name(name).await {
            Ok(mut current) => {
                current.value = current.value.checked_add(delta).ok_or_else(|| {
                    MtrrunError::Validation(format!(
                        "counter {name} overflows when adding {delta}"
                    ))
                })?;
                let total = current.value;
                self.repo.update_counter(current).await?;
                tracing::debug!(%name, delta, total, "counter updated");
            }
            Err(e) if e.is_not_found() => {
                self.repo
                    .insert_counter(CounterRecord {
                        name: name.to_string(),
                        value: delta,
                    })
                    .await?;
                tracing::debug!(%name, delta, "counter created");
            }
            Err(e) => return Err(e),
        }
        Ok(())
    }

    /// Gauges then counters, each rendered in its wire format. Unordered.
    pub async fn get_all(&self) -> Result<Vec<MetricView>> {
        let gauges = self.repo.select_gauges().await?;
        let counters = self.repo.select_counters().await?;

        let mut out = Vec::with_capacity(gauges.len() + counters.len());
        out.extend(gauges.into_iter().map(|g| MetricView {
            value: value::format_gauge(g.value),
            name: g.name,
        }));
        out.extend(counters.into_iter().map(|c| MetricView {
            value: value::format_counter(c.value),
            name: c.name,
        }));
        Ok(out)
    }
}
