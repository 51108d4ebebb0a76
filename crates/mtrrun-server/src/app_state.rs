//! Shared application state for the collector.

use std::sync::Arc;

use crate::repository::{MemRepository, MetricRepository};
use crate::service::MetricService;

#[derive(Clone)]
pub struct AppState {
    service: Arc<MetricService>,
}

impl AppState {
    pub fn new(repo: Arc<dyn MetricRepository>) -> Self {
        Self {
            service: Arc::new(MetricService::new(repo)),
        }
    }

    /// State backed by a fresh in-memory repository.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemRepository::new()))
    }

    pub fn service(&self) -> &MetricService {
        &self.service
    }
}
