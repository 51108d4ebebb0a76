//! HTTP surface driven in-process through the router.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use tower::util::ServiceExt;

use mtrrun_core::error::{MtrrunError, Result};
use mtrrun_server::app_state::AppState;
use mtrrun_server::model::{CounterRecord, GaugeRecord};
use mtrrun_server::repository::MetricRepository;
use mtrrun_server::router::build_router;

async fn call(app: &Router, method: &str, uri: &str) -> (StatusCode, String) {
    let req = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "text/plain")
        .body(Body::empty())
        .unwrap();
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn app() -> Router {
    build_router(AppState::in_memory())
}

#[tokio::test]
async fn counter_updates_accumulate() {
    let app = app();
    assert_eq!(call(&app, "POST", "/update/counter/hits/5").await, (StatusCode::OK, "OK".into()));
    assert_eq!(call(&app, "POST", "/update/counter/hits/7").await.0, StatusCode::OK);
    assert_eq!(call(&app, "GET", "/value/counter/hits").await, (StatusCode::OK, "12".into()));
}

#[tokio::test]
async fn gauge_round_trips_and_overwrites() {
    let app = app();
    assert_eq!(call(&app, "POST", "/update/gauge/temp/3.5").await.0, StatusCode::OK);
    assert_eq!(call(&app, "GET", "/value/gauge/temp").await, (StatusCode::OK, "3.5".into()));

    assert_eq!(call(&app, "POST", "/update/gauge/temp/-1.25").await.0, StatusCode::OK);
    assert_eq!(call(&app, "GET", "/value/gauge/temp").await.1, "-1.25");
}

#[tokio::test]
async fn percent_encoded_names_are_one_segment() {
    let app = app();
    assert_eq!(call(&app, "POST", "/update/gauge/disk%20%2Fvar/7").await.0, StatusCode::OK);
    assert_eq!(call(&app, "GET", "/value/gauge/disk%20%2Fvar").await, (StatusCode::OK, "7".into()));

    let (status, body) = call(&app, "GET", "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("<ol>disk /var: 7</ol>"));
}

#[tokio::test]
async fn agent_formatted_gauge_is_accepted() {
    let app = app();
    assert_eq!(call(&app, "POST", "/update/gauge/Alloc/1024.00").await.0, StatusCode::OK);
    assert_eq!(call(&app, "GET", "/value/gauge/Alloc").await.1, "1024");
}

#[tokio::test]
async fn error_statuses() {
    let app = app();
    assert_eq!(call(&app, "POST", "/update/unknowntype/x/1").await.0, StatusCode::NOT_IMPLEMENTED);
    assert_eq!(call(&app, "POST", "/update/counter/x/notanumber").await.0, StatusCode::BAD_REQUEST);
    assert_eq!(call(&app, "POST", "/update/counter/x/1.5").await.0, StatusCode::BAD_REQUEST);
    assert_eq!(call(&app, "POST", "/update/gauge/x/abc").await.0, StatusCode::BAD_REQUEST);
    assert_eq!(call(&app, "GET", "/value/counter/missing").await.0, StatusCode::NOT_FOUND);
    assert_eq!(call(&app, "GET", "/value/histogram/x").await.0, StatusCode::NOT_IMPLEMENTED);
}

#[tokio::test]
async fn gauge_and_counter_with_same_name_do_not_collide() {
    let app = app();
    call(&app, "POST", "/update/gauge/dup/2.5").await;
    call(&app, "POST", "/update/counter/dup/4").await;
    assert_eq!(call(&app, "GET", "/value/gauge/dup").await.1, "2.5");
    assert_eq!(call(&app, "GET", "/value/counter/dup").await.1, "4");
}

#[tokio::test]
async fn index_lists_every_metric() {
    let app = app();
    call(&app, "POST", "/update/gauge/temp/3.5").await;
    call(&app, "POST", "/update/counter/hits/12").await;

    let (status, body) = call(&app, "GET", "/").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("<!DOCTYPE html>"));
    assert!(body.contains("<ol>temp: 3.5</ol>"));
    assert!(body.contains("<ol>hits: 12</ol>"));
}

/// Repository that fails every call, either with an error or a panic.
struct FaultyRepo {
    panic: bool,
}

impl FaultyRepo {
    fn fail<T>(&self) -> Result<T> {
        if self.panic {
            panic!("store exploded");
        }
        Err(MtrrunError::Internal("store unavailable".into()))
    }
}

#[async_trait]
impl MetricRepository for FaultyRepo {
    async fn select_gauge_by_name(&self, _: &str) -> Result<GaugeRecord> { self.fail() }
    async fn select_counter_by_name(&self, _: &str) -> Result<CounterRecord> { self.fail() }
    async fn select_gauges(&self) -> Result<Vec<GaugeRecord>> { self.fail() }
    async fn select_counters(&self) -> Result<Vec<CounterRecord>> { self.fail() }
    async fn insert_gauge(&self, _: GaugeRecord) -> Result<()> { self.fail() }
    async fn insert_counter(&self, _: CounterRecord) -> Result<()> { self.fail() }
    async fn update_gauge(&self, _: GaugeRecord) -> Result<()> { self.fail() }
    async fn update_counter(&self, _: CounterRecord) -> Result<()> { self.fail() }
    async fn delete_gauge(&self, _: &str) -> Result<()> { self.fail() }
    async fn delete_counter(&self, _: &str) -> Result<()> { self.fail() }
}

#[tokio::test]
async fn store_errors_map_to_500() {
    let app = build_router(AppState::new(Arc::new(FaultyRepo { panic: false })));
    assert_eq!(call(&app, "POST", "/update/gauge/temp/1").await.0, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(call(&app, "GET", "/").await.0, StatusCode::INTERNAL_SERVER_ERROR);
    // validation still happens before the store is touched
    assert_eq!(call(&app, "POST", "/update/gauge/temp/x").await.0, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn handler_panic_becomes_500_and_server_keeps_serving() {
    let app = build_router(AppState::new(Arc::new(FaultyRepo { panic: true })));
    assert_eq!(call(&app, "POST", "/update/counter/hits/1").await.0, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(call(&app, "GET", "/").await.0, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(call(&app, "POST", "/update/nope/hits/1").await.0, StatusCode::NOT_IMPLEMENTED);
}
