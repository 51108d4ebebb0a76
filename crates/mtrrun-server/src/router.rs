//! Axum router wiring.
//!
//! - `POST /update/:kind/:name/:value` : upsert one metric
//! - `GET  /value/:kind/:name`         : read one metric
//! - `GET  /`                          : HTML listing of every metric
//!
//! Panics inside handlers become 500 responses instead of tearing down the
//! connection task.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;

use crate::{app_state::AppState, handler};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handler::list_metrics))
        .route("/update/:kind/:name/:value", post(handler::update_metric))
        .route("/value/:kind/:name", get(handler::get_metric))
        .layer(CatchPanicLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
