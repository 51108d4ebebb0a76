//! Upsert semantics of the service layer.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use mtrrun_core::error::ErrorCode;
use mtrrun_server::model::MetricView;
use mtrrun_server::repository::MemRepository;
use mtrrun_server::service::MetricService;

fn service() -> Arc<MetricService> {
    Arc::new(MetricService::new(Arc::new(MemRepository::new())))
}

#[tokio::test]
async fn counter_accumulates_every_delta() {
    let svc = service();
    let deltas = [5, 7, -2, 0, 100];
    for d in deltas {
        svc.put_counter("hits", d).await.unwrap();
    }
    assert_eq!(svc.get_counter("hits").await.unwrap().value, deltas.iter().sum::<i64>());
}

#[tokio::test]
async fn gauge_overwrites() {
    let svc = service();
    svc.put_gauge("temp", 5.0).await.unwrap();
    svc.put_gauge("temp", 3.0).await.unwrap();
    assert_eq!(svc.get_gauge("temp").await.unwrap().value, 3.0);
}

#[tokio::test]
async fn unknown_names_are_not_found() {
    let svc = service();
    assert_eq!(svc.get_gauge("nope").await.unwrap_err().code(), ErrorCode::NotFound);
    assert_eq!(svc.get_counter("nope").await.unwrap_err().code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn counter_overflow_is_rejected_and_value_kept() {
    let svc = service();
    svc.put_counter("big", i64::MAX).await.unwrap();
    let err = svc.put_counter("big", 1).await.unwrap_err();
    assert_eq!(err.code(), ErrorCode::Validation);
    assert_eq!(svc.get_counter("big").await.unwrap().value, i64::MAX);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_counter_puts_lose_nothing() {
    let svc = service();

    let mut tasks = Vec::new();
    for _ in 0..64 {
        let svc = Arc::clone(&svc);
        tasks.push(tokio::spawn(async move {
            for _ in 0..10 {
                svc.put_counter("hits", 1).await.unwrap();
            }
        }));
    }
    for t in tasks {
        t.await.unwrap();
    }

    assert_eq!(svc.get_counter("hits").await.unwrap().value, 640);
}

#[tokio::test]
async fn get_all_renders_both_kinds() {
    let svc = service();
    svc.put_gauge("temp", 3.5).await.unwrap();
    svc.put_gauge("whole", 2.0).await.unwrap();
    svc.put_counter("hits", 12).await.unwrap();

    let mut all = svc.get_all().await.unwrap();
    all.sort_by(|a, b| a.name.cmp(&b.name));

    let view = |name: &str, value: &str| MetricView { name: name.into(), value: value.into() };
    assert_eq!(all, vec![view("hits", "12"), view("temp", "3.5"), view("whole", "2")]);
}
