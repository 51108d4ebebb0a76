//! In-memory metric repository.
//!
//! Gauges and counters live in two independent stores, each a `HashMap`
//! behind its own `RwLock`: operations on one kind never wait on the other.
//! Reads take the shared lock, writes the exclusive one.
//!
//! Contract per kind:
//! - `select_*_by_name`: `NotFound` on a miss.
//! - `insert_*`: rejects an existing name with `AlreadyExists`.
//! - `update_*` / `delete_*`: `NotFound` when the name is absent.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use mtrrun_core::error::{MtrrunError, Result};

use crate::model::{CounterRecord, GaugeRecord, Record};

#[async_trait]
pub trait MetricRepository: Send + Sync {
    async fn select_gauge_by_name(&self, name: &str) -> Result<GaugeRecord>;
    async fn select_counter_by_name(&self, name: &str) -> Result<CounterRecord>;
    async fn select_gauges(&self) -> Result<Vec<GaugeRecord>>;
    async fn select_counters(&self) -> Result<Vec<CounterRecord>>;
    async fn insert_gauge(&self, metric: GaugeRecord) -> Result<()>;
    async fn insert_counter(&self, metric: CounterRecord) -> Result<()>;
    async fn update_gauge(&self, metric: GaugeRecord) -> Result<()>;
    async fn update_counter(&self, metric: CounterRecord) -> Result<()>;
    async fn delete_gauge(&self, name: &str) -> Result<()>;
    async fn delete_counter(&self, name: &str) -> Result<()>;
}

/// One kind's map.
struct Store<V: Record> {
    map: RwLock<HashMap<String, V>>,
}

impl<V: Record> Store<V> {
    fn new() -> Self {
        Self {
            map: RwLock::new(HashMap::new()),
        }
    }

    async fn select_by_name(&self, name: &str) -> Result<V> {
        self.map
            .read()
            .await
            .get(name)
            .cloned()
            .ok_or_else(|| MtrrunError::not_found(V::KIND, name))
    }

    async fn select_all(&self) -> Vec<V> {
        self.map.read().await.values().cloned().collect()
    }

    async fn insert(&self, metric: V) -> Result<()> {
        let mut map = self.map.write().await;
        match map.entry(metric.name().to_string()) {
            Entry::Occupied(e) => Err(MtrrunError::already_exists(V::KIND, e.key().as_str())),
            Entry::Vacant(e) => {
                e.insert(metric);
                Ok(())
            }
        }
    }

    async fn update(&self, metric: V) -> Result<()> {
        let mut map = self.map.write().await;
        let slot = map
            .get_mut(metric.name())
            .ok_or_else(|| MtrrunError::not_found(V::KIND, metric.name()))?;
        *slot = metric;
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        self.map
            .write()
            .await
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| MtrrunError::not_found(V::KIND, name))
    }
}

/// Process-lifetime cache; state is lost on restart.
pub struct MemRepository {
    gauge: Store<GaugeRecord>,
    counter: Store<CounterRecord>,
}

impl Default for MemRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl MemRepository {
    pub fn new() -> Self {
        Self {
            gauge: Store::new(),
            counter: Store::new(),
        }
    }
}

#[async_trait]
impl MetricRepository for MemRepository {
    async fn select_gauge_by_name(&self, name: &str) -> Result<GaugeRecord> {
        self.gauge.select_by_name(name).await
    }

    async fn select_counter_by_name(&self, name: &str) -> Result<CounterRecord> {
        self.counter.select_by_name(name).await
    }

    async fn select_gauges(&self) -> Result<Vec<GaugeRecord>> {
        Ok(self.gauge.select_all().await)
    }

    async fn select_counters(&self) -> Result<Vec<CounterRecord>> {
        Ok(self.counter.select_all().await)
    }

    async fn insert_gauge(&self, metric: GaugeRecord) -> Result<()> {
        self.gauge.insert(metric).await
    }

    async fn insert_counter(&self, metric: CounterRecord) -> Result<()> {
        self.counter.insert(metric).await
    }

    async fn update_gauge(&self, metric: GaugeRecord) -> Result<()> {
        self.gauge.update(metric).await
    }

    async fn update_counter(&self, metric: CounterRecord) -> Result<()> {
        self.counter.update(metric).await
    }

    async fn delete_gauge(&self, name: &str) -> Result<()> {
        self.gauge.delete(name).await
    }

    async fn delete_counter(&self, name: &str) -> Result<()> {
        self.counter.delete(name).await
    }
}
