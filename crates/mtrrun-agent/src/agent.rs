//! Agent: registry facade, report loop and shutdown.
//!
//! Lifecycle: `Created -> Running -> Stopped`. `run` drives the report tick
//! until `shutdown` flips the state to `Stopped`; `shutdown` is idempotent.
//!
//! Each report cycle snapshots the tracker, then pushes every entry
//! concurrently through a semaphore of `max_requests_per_moment` permits.
//! Gauges are pushed as their current value. The collector adds counter
//! values to what it stores, so counters are pushed as the increase since the
//! last accepted push; a failed push leaves the baseline untouched and the
//! increase is carried into the next cycle.
//! No lock is held across a network call. Cycles never overlap: the loop
//! awaits the current cycle before taking the next tick and skips missed ones.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use dashmap::DashMap;
use futures_util::stream::FuturesUnordered;
use futures_util::StreamExt;
use reqwest::Method;
use tokio::sync::{watch, Semaphore};
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use mtrrun_core::error::Result;
use mtrrun_core::protocol::{path, CONTENT_TYPE_TEXT};
use mtrrun_core::{Metric, MetricKind, Status, Tracker};

use crate::client::{HttpClient, Transport};

pub const DEFAULT_REPORT_INTERVAL: Duration = Duration::from_secs(10);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(2);
pub const DEFAULT_MAX_REQUESTS_PER_MOMENT: usize = 5;
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);
pub const DEFAULT_MAX_IDLE_CONNS: usize = 10;

const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// Runtime parameters. Zero values are replaced by defaults in `normalized`,
/// and the request bound is capped at what a semaphore can hold.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Collector address, `addr:port`.
    pub host: String,
    pub timeout: Duration,
    pub max_idle_conns: usize,
    pub max_requests_per_moment: usize,
    pub report_interval: Duration,
    pub poll_interval: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1:8080".into(),
            timeout: DEFAULT_TIMEOUT,
            max_idle_conns: DEFAULT_MAX_IDLE_CONNS,
            max_requests_per_moment: DEFAULT_MAX_REQUESTS_PER_MOMENT,
            report_interval: DEFAULT_REPORT_INTERVAL,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

impl Settings {
    pub fn normalized(mut self) -> Self {
        if self.timeout.is_zero() {
            self.timeout = DEFAULT_TIMEOUT;
        }
        if self.max_idle_conns == 0 {
            self.max_idle_conns = DEFAULT_MAX_IDLE_CONNS;
        }
        if self.max_requests_per_moment == 0 {
            self.max_requests_per_moment = DEFAULT_MAX_REQUESTS_PER_MOMENT;
        }
        self.max_requests_per_moment = self.max_requests_per_moment.min(Semaphore::MAX_PERMITS);
        if self.report_interval.is_zero() {
            self.report_interval = DEFAULT_REPORT_INTERVAL;
        }
        if self.poll_interval.is_zero() {
            self.poll_interval = DEFAULT_POLL_INTERVAL;
        }
        self
    }
}

/// Resolves once the watched flag turns `true` (or its sender is gone).
pub async fn stopped(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow_and_update() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgentState {
    Created,
    Running,
    Stopped,
}

/// Result of one report cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportOutcome {
    pub sent: usize,
    pub failed: usize,
}

pub struct Agent {
    tracker: Tracker,
    /// Last counter total the collector accepted, by name.
    pushed: DashMap<String, u64>,
    transport: Arc<dyn Transport>,
    settings: Settings,
    state: Mutex<AgentState>,
    stop_tx: watch::Sender<bool>,
}

impl Agent {
    /// Build an agent with the reqwest-backed client.
    pub fn new(settings: Settings) -> Result<Self> {
        let settings = settings.normalized();
        let client = HttpClient::new(settings.timeout, settings.max_idle_conns)?;
        Ok(Self::with_transport(settings, Arc::new(client)))
    }

    /// Build an agent on a custom transport.
    pub fn with_transport(settings: Settings, transport: Arc<dyn Transport>) -> Self {
        let (stop_tx, _) = watch::channel(false);
        Self {
            tracker: Tracker::new(),
            pushed: DashMap::new(),
            transport,
            settings: settings.normalized(),
            state: Mutex::new(AgentState::Created),
            stop_tx,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn state(&self) -> AgentState {
        self.state
            .lock()
            .map(|g| *g)
            .unwrap_or(AgentState::Stopped)
    }

    pub fn track(&self, metric: impl Into<Metric>) {
        let metric = metric.into();
        self.pushed.remove(metric.name());
        self.tracker.track(metric);
    }

    pub fn untrack(&self, metric: &Metric) {
        self.tracker.untrack(metric);
        self.pushed.remove(metric.name());
    }

    pub fn status(&self) -> Vec<Status> {
        self.tracker.status()
    }

    /// Receiver whose value flips to `true` once `shutdown` has been called.
    pub fn shutdown_signal(&self) -> watch::Receiver<bool> {
        self.stop_tx.subscribe()
    }

    /// Report loop. Returns when `shutdown` is called; a second concurrent
    /// `run` (or a `run` after shutdown) returns immediately.
    pub async fn run(&self) {
        let stop = stopped(self.stop_tx.subscribe());
        tokio::pin!(stop);
        {
            let Ok(mut st) = self.state.lock() else {
                return;
            };
            if *st != AgentState::Created {
                tracing::warn!(state = ?*st, "agent run ignored");
                return;
            }
            *st = AgentState::Running;
        }

        let period = self.settings.report_interval;
        let mut tick = interval_at(Instant::now() + period, period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            host = %self.settings.host,
            report_interval_ms = period.as_millis() as u64,
            max_requests_per_moment = self.settings.max_requests_per_moment,
            "agent report loop started"
        );

        loop {
            tokio::select! {
                biased;
                _ = &mut stop => break,
                _ = tick.tick() => {
                    self.report().await;
                }
            }
        }

        tracing::info!("agent been gracefully shutdown");
    }

    /// Stop the loop and release pooled connections. Runs its effects once.
    pub fn shutdown(&self) {
        {
            let Ok(mut st) = self.state.lock() else {
                return;
            };
            if *st == AgentState::Stopped {
                return;
            }
            *st = AgentState::Stopped;
        }
        self.stop_tx.send_replace(true);
        self.transport.shutdown();
        tracing::info!("agent shutdown");
    }

    /// One report cycle. Failures are logged per metric and never escalate.
    pub async fn report(&self) -> ReportOutcome {
        let snapshot = self.tracker.status();
        let gate = Semaphore::new(self.settings.max_requests_per_moment);

        let mut sends = FuturesUnordered::new();
        for st in snapshot {
            let gate = &gate;
            sends.push(async move {
                let Ok(_permit) = gate.acquire().await else {
                    return false;
                };
                self.push(st).await
            });
        }

        let mut out = ReportOutcome::default();
        while let Some(ok) = sends.next().await {
            if ok {
                out.sent += 1;
            } else {
                out.failed += 1;
            }
        }

        tracing::debug!(sent = out.sent, failed = out.failed, "report cycle finished");
        out
    }

    async fn push(&self, st: Status) -> bool {
        if st.kind == MetricKind::Gauge {
            return self.send(&st).await;
        }

        let total = match st.value.parse::<u64>() {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(name = %st.name, value = %st.value, error = %e, "counter value unreadable");
                return false;
            }
        };
        let last = self.pushed.get(&st.name).map(|v| *v).unwrap_or(0);
        // A total below the baseline means the counter was replaced.
        let delta = if total >= last { total - last } else { total };

        let name = st.name.clone();
        let ok = self
            .send(&Status {
                value: delta.to_string(),
                ..st
            })
            .await;
        if ok {
            self.pushed.insert(name, total);
        }
        ok
    }

    async fn send(&self, st: &Status) -> bool {
        let url = path::update_url(&self.settings.host, st);
        tracing::debug!(%url, "start of request");

        let res = self
            .transport
            .do_request(
                Method::POST,
                &url,
                &[(CONTENT_TYPE_HEADER, CONTENT_TYPE_TEXT)],
                Vec::new(),
            )
            .await;

        match res {
            Ok(()) => {
                tracing::debug!(%url, "request ended without error");
                true
            }
            Err(e) => {
                tracing::warn!(%url, code = e.code().as_str(), error = %e, "request ended with error");
                false
            }
        }
    }
}
