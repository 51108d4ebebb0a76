//! Metric value holders.
//!
//! Both types are lock-free: the counter is a plain `AtomicU64`, the gauge
//! stores the bit pattern of an `f64` in an `AtomicU64` and mutates it with a
//! compare-exchange loop. A metric instance is shared between the poller (which
//! writes) and the report cycle (which reads) through `Arc`.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::MtrrunError;

/// Metric type tag. Part of the wire path (`/update/{kind}/...`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetricKind {
    Gauge,
    Counter,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Gauge => "gauge",
            MetricKind::Counter => "counter",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKind {
    type Err = MtrrunError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "gauge" => Ok(MetricKind::Gauge),
            "counter" => Ok(MetricKind::Counter),
            other => Err(MtrrunError::UnknownType(other.to_string())),
        }
    }
}

/// Name and help text. The name is the registry key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Description {
    pub name: String,
    pub help: String,
}

impl Description {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            help: help.into(),
        }
    }
}

/// Monotonic non-negative integer.
#[derive(Debug)]
pub struct Counter {
    desc: Description,
    val: AtomicU64,
}

impl Counter {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            desc: Description::new(name, help),
            val: AtomicU64::new(0),
        }
    }

    pub fn describe(&self) -> &Description {
        &self.desc
    }

    /// Increment by 1.
    pub fn inc(&self) {
        self.val.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.val.load(Ordering::Relaxed)
    }

    /// Plain integer.
    pub fn render_value(&self) -> String {
        self.get().to_string()
    }
}

/// Floating-point value that can move in both directions.
#[derive(Debug)]
pub struct Gauge {
    desc: Description,
    bits: AtomicU64,
}

impl Gauge {
    pub fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Self {
            desc: Description::new(name, help),
            bits: AtomicU64::new(0f64.to_bits()),
        }
    }

    pub fn describe(&self) -> &Description {
        &self.desc
    }

    /// Set to an arbitrary value.
    pub fn set(&self, v: f64) {
        self.bits.store(v.to_bits(), Ordering::Relaxed);
    }

    /// Increment by 1. Use `add` for arbitrary values.
    pub fn inc(&self) {
        self.add(1.0);
    }

    /// Decrement by 1. Use `sub` for arbitrary values.
    pub fn dec(&self) {
        self.add(-1.0);
    }

    pub fn add(&self, delta: f64) {
        let mut cur = self.bits.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(cur) + delta).to_bits();
            match self
                .bits
                .compare_exchange_weak(cur, next, Ordering::Relaxed, Ordering::Relaxed)
            {
                Ok(_) => return,
                Err(actual) => cur = actual,
            }
        }
    }

    pub fn sub(&self, delta: f64) {
        self.add(-delta);
    }

    pub fn get(&self) -> f64 {
        f64::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Fixed two-decimal rendering. Storage keeps full precision.
    pub fn render_value(&self) -> String {
        format!("{:.2}", self.get())
    }
}

/// A tracked metric. The variant is the type tag, so classification never
/// needs runtime inspection.
#[derive(Debug, Clone)]
pub enum Metric {
    Gauge(Arc<Gauge>),
    Counter(Arc<Counter>),
}

impl Metric {
    pub fn kind(&self) -> MetricKind {
        match self {
            Metric::Gauge(_) => MetricKind::Gauge,
            Metric::Counter(_) => MetricKind::Counter,
        }
    }

    pub fn describe(&self) -> &Description {
        match self {
            Metric::Gauge(g) => g.describe(),
            Metric::Counter(c) => c.describe(),
        }
    }

    pub fn name(&self) -> &str {
        &self.describe().name
    }

    pub fn render_value(&self) -> String {
        match self {
            Metric::Gauge(g) => g.render_value(),
            Metric::Counter(c) => c.render_value(),
        }
    }
}

impl From<Arc<Gauge>> for Metric {
    fn from(g: Arc<Gauge>) -> Self {
        Metric::Gauge(g)
    }
}

impl From<Arc<Counter>> for Metric {
    fn from(c: Arc<Counter>) -> Self {
        Metric::Counter(c)
    }
}
