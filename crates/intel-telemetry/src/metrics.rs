use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};

/// Type of metric.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MetricType {
    Counter,
    Histogram,
}

/// A point-in-time view of one metric series.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MetricsSnapshot {
    pub timestamp: String,
    pub name: String,
    pub labels: HashMap<String, String>,
    pub metric_type: MetricType,
    /// Counter value, or p50 for histograms.
    pub value: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<HistogramSummary>,
}

/// In-memory counter. Monotonically increasing.
struct Counter {
    value: AtomicU64,
}

impl Counter {
    fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }
    fn increment(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }
    fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Observations kept per histogram for percentile computation.
pub const HISTOGRAM_WINDOW: usize = 1024;

/// In-memory histogram. Count and sum cover every observation; percentiles
/// come from the most recent `HISTOGRAM_WINDOW` values.
struct Histogram {
    state: Mutex<HistogramState>,
}

struct HistogramState {
    window: VecDeque<f64>,
    count: u64,
    sum: f64,
}

impl Histogram {
    fn new() -> Self {
        Self {
            state: Mutex::new(HistogramState {
                window: VecDeque::with_capacity(HISTOGRAM_WINDOW),
                count: 0,
                sum: 0.0,
            }),
        }
    }
    fn observe(&self, value: f64) {
        let mut state = self.state.lock();
        if state.window.len() == HISTOGRAM_WINDOW {
            state.window.pop_front();
        }
        state.window.push_back(value);
        state.count += 1;
        state.sum += value;
    }
    fn summary(&self) -> HistogramSummary {
        let (mut obs, count, sum) = {
            let state = self.state.lock();
            (Vec::from_iter(state.window.iter().copied()), state.count, state.sum)
        };
        if obs.is_empty() {
            return HistogramSummary::default();
        }
        obs.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let n = obs.len();
        let p50 = obs[n / 2];
        let p95 = obs[((n as f64 * 0.95) as usize).min(n - 1)];
        let p99 = obs[((n as f64 * 0.99) as usize).min(n - 1)];
        HistogramSummary {
            count,
            sum,
            p50,
            p95,
            p99,
        }
    }
    #[cfg(test)]
    fn retained(&self) -> usize {
        self.state.lock().window.len()
    }
}

/// Summary statistics from a histogram.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct HistogramSummary {
    pub count: u64,
    pub sum: f64,
    pub p50: f64,
    pub p95: f64,
    pub p99: f64,
}

/// Metric key: name + labels.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
struct MetricKey {
    name: String,
    labels: Vec<(String, String)>,
}

impl MetricKey {
    fn new(name: impl Into<String>, labels: &[(&str, &str)]) -> Self {
        let mut sorted: Vec<(String, String)> = labels
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        Self {
            name: name.into(),
            labels: sorted,
        }
    }

    fn labels_map(&self) -> HashMap<String, String> {
        self.labels.iter().cloned().collect()
    }
}

/// Thread-safe in-process metrics recorder.
pub struct MetricsRecorder {
    counters: RwLock<HashMap<MetricKey, Counter>>,
    histograms: RwLock<HashMap<MetricKey, Histogram>>,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            counters: RwLock::new(HashMap::new()),
            histograms: RwLock::new(HashMap::new()),
        }
    }

    /// Increment a counter by n.
    pub fn counter_inc(&self, name: &str, labels: &[(&str, &str)], n: u64) {
        let key = MetricKey::new(name, labels);
        let counters = self.counters.read();
        if let Some(c) = counters.get(&key) {
            c.increment(n);
            return;
        }
        drop(counters);
        let mut counters = self.counters.write();
        let c = counters.entry(key).or_insert_with(Counter::new);
        c.increment(n);
    }

    /// Record a histogram observation.
    pub fn histogram_observe(&self, name: &str, labels: &[(&str, &str)], value: f64) {
        let key = MetricKey::new(name, labels);
        let histograms = self.histograms.read();
        if let Some(h) = histograms.get(&key) {
            h.observe(value);
            return;
        }
        drop(histograms);
        let mut histograms = self.histograms.write();
        let h = histograms.entry(key).or_insert_with(Histogram::new);
        h.observe(value);
    }

    /// Get current value of a counter.
    pub fn counter_get(&self, name: &str, labels: &[(&str, &str)]) -> u64 {
        let key = MetricKey::new(name, labels);
        self.counters.read().get(&key).map_or(0, |c| c.get())
    }

    #[cfg(test)]
    fn histogram_summary(&self, name: &str, labels: &[(&str, &str)]) -> HistogramSummary {
        let key = MetricKey::new(name, labels);
        self.histograms
            .read()
            .get(&key)
            .map(|h| h.summary())
            .unwrap_or_default()
    }

    /// Current value of every series, sorted by name.
    pub fn snapshot(&self) -> Vec<MetricsSnapshot> {
        let now = Utc::now().to_rfc3339();
        let mut out = Vec::new();

        for (key, counter) in self.counters.read().iter() {
            out.push(MetricsSnapshot {
                timestamp: now.clone(),
                name: key.name.clone(),
                labels: key.labels_map(),
                metric_type: MetricType::Counter,
                value: counter.get() as f64,
                summary: None,
            });
        }

        for (key, histogram) in self.histograms.read().iter() {
            let summary = histogram.summary();
            out.push(MetricsSnapshot {
                timestamp: now.clone(),
                name: key.name.clone(),
                labels: key.labels_map(),
                metric_type: MetricType::Histogram,
                value: summary.p50,
                summary: Some(summary),
            });
        }

        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_increments_per_label_set() {
        let m = MetricsRecorder::new();
        m.counter_inc("requests", &[("endpoint", "normalize")], 1);
        m.counter_inc("requests", &[("endpoint", "normalize")], 2);
        m.counter_inc("requests", &[("endpoint", "capabilities")], 1);
        assert_eq!(m.counter_get("requests", &[("endpoint", "normalize")]), 3);
        assert_eq!(m.counter_get("requests", &[("endpoint", "capabilities")]), 1);
        assert_eq!(m.counter_get("requests", &[]), 0);
    }

    #[test]
    fn label_order_does_not_matter() {
        let m = MetricsRecorder::new();
        m.counter_inc("x", &[("a", "1"), ("b", "2")], 1);
        m.counter_inc("x", &[("b", "2"), ("a", "1")], 1);
        assert_eq!(m.counter_get("x", &[("a", "1"), ("b", "2")]), 2);
    }

    #[test]
    fn histogram_percentiles() {
        let m = MetricsRecorder::new();
        for i in 1..=100 {
            m.histogram_observe("parsed", &[], i as f64);
        }
        let s = m.histogram_summary("parsed", &[]);
        assert_eq!(s.count, 100);
        assert_eq!(s.sum, 5050.0);
        assert_eq!(s.p50, 51.0);
        assert_eq!(s.p95, 96.0);
        assert_eq!(s.p99, 100.0);
    }

    #[test]
    fn histogram_retains_a_bounded_window() {
        let m = MetricsRecorder::new();
        let total = HISTOGRAM_WINDOW * 5;
        for i in 0..total {
            m.histogram_observe("parsed", &[], i as f64);
        }

        let key = MetricKey::new("parsed", &[]);
        let retained = m.histograms.read().get(&key).map(|h| h.retained());
        assert_eq!(retained, Some(HISTOGRAM_WINDOW));

        let s = m.histogram_summary("parsed", &[]);
        assert_eq!(s.count, total as u64);
        assert_eq!(s.sum, (0..total).map(|i| i as f64).sum::<f64>());
        // percentiles only see the most recent window
        assert!(s.p50 >= (total - HISTOGRAM_WINDOW) as f64);
        assert_eq!(s.p99, (total - 1) as f64);
    }

    #[test]
    fn empty_histogram_summary_is_default() {
        let m = MetricsRecorder::new();
        assert_eq!(m.histogram_summary("nothing", &[]), HistogramSummary::default());
    }

    #[test]
    fn snapshot_lists_all_series() {
        let m = MetricsRecorder::new();
        m.counter_inc("b_total", &[("outcome", "ok")], 4);
        m.histogram_observe("a_sizes", &[], 2.0);
        let snap = m.snapshot();
        assert_eq!(snap.len(), 2);
        assert_eq!(snap[0].name, "a_sizes");
        assert_eq!(snap[0].metric_type, MetricType::Histogram);
        assert_eq!(snap[1].value, 4.0);
        assert_eq!(snap[1].labels.get("outcome").map(String::as_str), Some("ok"));
    }
}
