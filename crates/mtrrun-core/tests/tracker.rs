//! Registry snapshot behavior.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use mtrrun_core::{Counter, Gauge, Metric, MetricKind, Status, Tracker};

fn find<'a>(s: &'a [Status], name: &str) -> Option<&'a Status> {
    s.iter().find(|st| st.name == name)
}

#[test]
fn status_reflects_current_values() {
    let c = Arc::new(Counter::new("best_counter_total", "best counter ever"));
    let g = Arc::new(Gauge::new("best_gauge_total", "best gauge total"));

    let track = Tracker::new();
    track.track(Arc::clone(&c));
    track.track(Arc::clone(&g));

    c.inc();
    c.inc();
    g.dec();

    let s = track.status();
    assert_eq!(s.len(), 2);

    let cs = find(&s, "best_counter_total").unwrap();
    assert_eq!(cs.kind, MetricKind::Counter);
    assert_eq!(cs.value, "2");

    let gs = find(&s, "best_gauge_total").unwrap();
    assert_eq!(gs.kind, MetricKind::Gauge);
    assert_eq!(gs.value, "-1.00");
}

#[test]
fn untrack_removes_and_ignores_absent() {
    let track = Tracker::new();
    let m: Metric = Arc::new(Gauge::new("x", "")).into();

    track.track(m.clone());
    assert_eq!(track.status().iter().filter(|s| s.name == "x").count(), 1);

    track.untrack(&m);
    assert!(find(&track.status(), "x").is_none());

    // second removal is a no-op
    track.untrack(&m);
    assert!(track.is_empty());
}

#[test]
fn retracking_a_name_replaces_the_instance() {
    let track = Tracker::new();
    let first = Arc::new(Gauge::new("dup", ""));
    first.set(1.0);
    track.track(first);

    let second = Arc::new(Counter::new("dup", ""));
    second.inc();
    track.track(second);

    let s = track.status();
    assert_eq!(s.len(), 1);
    assert_eq!(s[0].kind, MetricKind::Counter);
    assert_eq!(s[0].value, "1");
}

#[test]
fn snapshots_during_concurrent_tracking_never_duplicate_names() {
    let track = Arc::new(Tracker::new());

    thread::scope(|s| {
        for i in 0..8 {
            let track = Arc::clone(&track);
            s.spawn(move || {
                for j in 0..100 {
                    track.track(Arc::new(Gauge::new(format!("g{}", (i * 100 + j) % 50), "")));
                }
            });
        }
        let track = Arc::clone(&track);
        s.spawn(move || {
            for _ in 0..100 {
                let snap = track.status();
                let mut names: Vec<_> = snap.iter().map(|s| s.name.clone()).collect();
                names.sort();
                names.dedup();
                assert_eq!(names.len(), snap.len());
            }
        });
    });

    assert_eq!(track.len(), 50);
}
