#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use mtrrun::core::{Counter, MetricKind, Tracker};
use mtrrun::server::app_state::AppState;

#[test]
fn core_types_are_reachable() {
    let tracker = Tracker::new();
    let c = Arc::new(Counter::new("hits", ""));
    c.inc();
    tracker.track(c);

    let status = tracker.status();
    assert_eq!(status.len(), 1);
    assert_eq!(status[0].kind, MetricKind::Counter);
    assert_eq!(status[0].value, "1");
}

#[tokio::test]
async fn server_service_is_reachable() {
    let state = AppState::in_memory();
    state.service().put_counter("hits", 3).await.unwrap();
    assert_eq!(state.service().get_counter("hits").await.unwrap().value, 3);
}
