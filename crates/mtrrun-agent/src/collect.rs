//! Metric catalog and poller.
//!
//! The catalog is a static table of `{name, kind, source}` rows. `Poller::register`
//! walks it once, creates one metric per row and tracks it on the agent; every
//! poll tick then refreshes the system statistics and writes each gauge from
//! its source. `PollCount` is bumped once per tick after the gauges are set, so
//! it counts polling activity rather than requests.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use sysinfo::{Pid, ProcessesToUpdate, System};
use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use mtrrun_core::{Counter, Gauge, MetricKind};

use crate::agent::{stopped, Agent};

pub const POLL_COUNT: &str = "PollCount";
pub const RANDOM_VALUE: &str = "RandomValue";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    TotalMemory,
    UsedMemory,
    FreeMemory,
    AvailableMemory,
    TotalSwap,
    UsedSwap,
    ProcessMemory,
    ProcessVirtualMemory,
    ProcessCpuUsage,
    GlobalCpuUsage,
    LoadAverageOne,
    LoadAverageFive,
    LoadAverageFifteen,
    Uptime,
    Random,
    PollTick,
}

struct Entry {
    name: &'static str,
    help: &'static str,
    kind: MetricKind,
    source: Source,
}

const fn gauge(name: &'static str, help: &'static str, source: Source) -> Entry {
    Entry { name, help, kind: MetricKind::Gauge, source }
}

const CATALOG: &[Entry] = &[
    gauge("TotalMemory", "Total RAM in bytes", Source::TotalMemory),
    gauge("UsedMemory", "Used RAM in bytes", Source::UsedMemory),
    gauge("FreeMemory", "Free RAM in bytes", Source::FreeMemory),
    gauge("AvailableMemory", "Available RAM in bytes", Source::AvailableMemory),
    gauge("TotalSwap", "Total swap in bytes", Source::TotalSwap),
    gauge("UsedSwap", "Used swap in bytes", Source::UsedSwap),
    gauge("ProcessMemory", "Agent resident memory in bytes", Source::ProcessMemory),
    gauge("ProcessVirtualMemory", "Agent virtual memory in bytes", Source::ProcessVirtualMemory),
    gauge("ProcessCpuUsage", "Agent CPU usage in percent", Source::ProcessCpuUsage),
    gauge("GlobalCpuUsage", "Host CPU usage in percent", Source::GlobalCpuUsage),
    gauge("LoadAverage1", "1 minute load average", Source::LoadAverageOne),
    gauge("LoadAverage5", "5 minute load average", Source::LoadAverageFive),
    gauge("LoadAverage15", "15 minute load average", Source::LoadAverageFifteen),
    gauge("Uptime", "Host uptime in seconds", Source::Uptime),
    gauge(RANDOM_VALUE, "Random value", Source::Random),
    Entry {
        name: POLL_COUNT,
        help: "Number of poll ticks",
        kind: MetricKind::Counter,
        source: Source::PollTick,
    },
];

/// Names of every metric the poller registers.
pub fn catalog_names() -> impl Iterator<Item = &'static str> {
    CATALOG.iter().map(|e| e.name)
}

pub struct Poller {
    gauges: Vec<(Source, Arc<Gauge>)>,
    counters: Vec<(Source, Arc<Counter>)>,
    system: System,
    pid: Option<Pid>,
}

impl Poller {
    /// Build every catalog metric and track it on `agent`.
    pub fn register(agent: &Agent) -> Self {
        let mut gauges = Vec::new();
        let mut counters = Vec::new();

        for e in CATALOG {
            match e.kind {
                MetricKind::Gauge => {
                    let g = Arc::new(Gauge::new(e.name, e.help));
                    agent.track(Arc::clone(&g));
                    gauges.push((e.source, g));
                }
                MetricKind::Counter => {
                    let c = Arc::new(Counter::new(e.name, e.help));
                    agent.track(Arc::clone(&c));
                    counters.push((e.source, c));
                }
            }
        }

        let pid = match sysinfo::get_current_pid() {
            Ok(pid) => Some(pid),
            Err(e) => {
                tracing::warn!(error = %e, "current pid unavailable; process metrics stay at zero");
                None
            }
        };

        Self {
            gauges,
            counters,
            system: System::new(),
            pid,
        }
    }

    /// One collection tick.
    pub fn poll(&mut self) {
        self.system.refresh_memory();
        self.system.refresh_cpu_usage();
        if let Some(pid) = self.pid {
            self.system.refresh_processes(ProcessesToUpdate::Some(&[pid]), true);
        }

        for (source, g) in &self.gauges {
            g.set(self.read(*source));
        }
        for (source, c) in &self.counters {
            if *source == Source::PollTick {
                c.inc();
            }
        }
    }

    fn read(&self, source: Source) -> f64 {
        let process = self.pid.and_then(|pid| self.system.process(pid));
        match source {
            Source::TotalMemory => self.system.total_memory() as f64,
            Source::UsedMemory => self.system.used_memory() as f64,
            Source::FreeMemory => self.system.free_memory() as f64,
            Source::AvailableMemory => self.system.available_memory() as f64,
            Source::TotalSwap => self.system.total_swap() as f64,
            Source::UsedSwap => self.system.used_swap() as f64,
            Source::ProcessMemory => process.map(|p| p.memory() as f64).unwrap_or(0.0),
            Source::ProcessVirtualMemory => {
                process.map(|p| p.virtual_memory() as f64).unwrap_or(0.0)
            }
            Source::ProcessCpuUsage => process.map(|p| p.cpu_usage() as f64).unwrap_or(0.0),
            Source::GlobalCpuUsage => self.system.global_cpu_usage() as f64,
            Source::LoadAverageOne => System::load_average().one,
            Source::LoadAverageFive => System::load_average().five,
            Source::LoadAverageFifteen => System::load_average().fifteen,
            Source::Uptime => System::uptime() as f64,
            Source::Random => rand::thread_rng().gen_range(0..i64::MAX) as f64,
            Source::PollTick => 0.0,
        }
    }

    /// Poll every `period` until `stop` flips to `true`.
    pub async fn run(mut self, period: Duration, stop: watch::Receiver<bool>) {
        let stop = stopped(stop);
        tokio::pin!(stop);

        let mut tick = interval_at(Instant::now() + period, period);
        tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(poll_interval_ms = period.as_millis() as u64, "poller started");

        loop {
            tokio::select! {
                biased;
                _ = &mut stop => break,
                _ = tick.tick() => self.poll(),
            }
        }

        tracing::info!("poller stopped");
    }
}
