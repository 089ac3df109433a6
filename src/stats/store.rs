// Latest/reference snapshot pair behind relative counters

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;

/// Baseline is re-pinned when updates are further apart than this.
pub const DEFAULT_REFERENCE_WINDOW: Duration = Duration::from_secs(3);

/// One counter reading. Integer JSON values stay integers so deltas between
/// large counters (byte totals past 2^53) are exact.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Counter {
    Int(i128),
    Float(f64),
}

impl Counter {
    pub fn as_f64(self) -> f64 {
        match self {
            Counter::Int(n) => n as f64,
            Counter::Float(n) => n,
        }
    }

    /// `self - base`, exact when both sides are integers.
    pub fn delta(self, base: Counter) -> f64 {
        match (self, base) {
            (Counter::Int(a), Counter::Int(b)) => (a - b) as f64,
            (a, b) => a.as_f64() - b.as_f64(),
        }
    }

    fn from_json(v: &serde_json::Value) -> Option<Self> {
        if let Some(n) = v.as_u64() {
            Some(Counter::Int(n.into()))
        } else if let Some(n) = v.as_i64() {
            Some(Counter::Int(n.into()))
        } else {
            v.as_f64().map(Counter::Float)
        }
    }
}

impl From<f64> for Counter {
    fn from(n: f64) -> Self {
        Counter::Float(n)
    }
}

impl From<u64> for Counter {
    fn from(n: u64) -> Self {
        Counter::Int(n.into())
    }
}

impl From<i64> for Counter {
    fn from(n: i64) -> Self {
        Counter::Int(n.into())
    }
}

/// Point-in-time counter values keyed by field name.
/// Non-numeric values in incoming JSON are dropped; they read as unavailable.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "HashMap<String, serde_json::Value>")]
pub struct Snapshot(HashMap<String, Counter>);

impl Snapshot {
    pub fn get(&self, field: &str) -> Option<f64> {
        self.counter(field).map(Counter::as_f64)
    }

    pub fn counter(&self, field: &str) -> Option<Counter> {
        self.0.get(field).copied()
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, serde_json::Value>> for Snapshot {
    fn from(raw: HashMap<String, serde_json::Value>) -> Self {
        Snapshot(
            raw.into_iter()
                .filter_map(|(k, v)| Counter::from_json(&v).map(|n| (k, n)))
                .collect(),
        )
    }
}

impl<K: Into<String>, V: Into<Counter>> FromIterator<(K, V)> for Snapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Snapshot(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Holds the latest snapshot and the baseline relative values are measured against.
/// Both sides are shared `Arc`s, so re-pinning is a single pointer assignment.
#[derive(Debug)]
pub struct StatsStore {
    latest: Arc<Snapshot>,
    reference: Option<Arc<Snapshot>>,
    last_update: Instant,
    window: Duration,
}

impl Default for StatsStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StatsStore {
    pub fn new() -> Self {
        Self::with_window(DEFAULT_REFERENCE_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            latest: Arc::new(Snapshot::default()),
            reference: None,
            last_update: Instant::now(),
            window,
        }
    }

    pub fn update(&mut self, snapshot: Snapshot) {
        self.update_at(snapshot, Instant::now());
    }

    /// Replaces the latest snapshot as of `now`. The baseline moves to it when
    /// none exists yet or the previous update is older than the window.
    pub fn update_at(&mut self, snapshot: Snapshot, now: Instant) {
        let elapsed = now.saturating_duration_since(self.last_update);
        self.latest = Arc::new(snapshot);
        if self.reference.is_none() || elapsed > self.window {
            tracing::debug!(
                ?elapsed,
                fields = self.latest.len(),
                "stats baseline re-pinned"
            );
            self.reference = Some(Arc::clone(&self.latest));
        }
        self.last_update = now;
    }

    /// Zeroes relative counters: the baseline becomes the current snapshot.
    pub fn clear_stats(&mut self) {
        self.reference = Some(Arc::clone(&self.latest));
    }

    /// Drops the latest values; the baseline is kept.
    pub fn invalidate(&mut self) {
        self.latest = Arc::new(Snapshot::default());
    }

    pub fn get_absolute(&self, field: &str) -> Option<f64> {
        self.latest.get(field)
    }

    /// `latest - reference`; unavailable if either side lacks the field.
    pub fn get_relative(&self, field: &str) -> Option<f64> {
        let latest = self.latest.counter(field)?;
        let reference = self.reference.as_ref()?.counter(field)?;
        Some(latest.delta(reference))
    }

    pub fn contains(&self, field: &str) -> bool {
        self.latest.contains(field)
    }

    pub fn latest(&self) -> &Snapshot {
        &self.latest
    }

    pub fn reference(&self) -> Option<&Snapshot> {
        self.reference.as_deref()
    }

    pub fn last_update(&self) -> Instant {
        self.last_update
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(pairs: &[(&str, f64)]) -> Snapshot {
        pairs.iter().map(|(k, v)| (*k, *v)).collect()
    }

    #[test]
    fn first_update_pins_reference() {
        let mut store = StatsStore::new();
        assert!(store.reference().is_none());
        store.update(snap(&[("opackets", 10.0)]));
        assert_eq!(store.reference().and_then(|r| r.get("opackets")), Some(10.0));
        assert_eq!(store.get_relative("opackets"), Some(0.0));
    }

    #[test]
    fn updates_within_window_keep_baseline() {
        let t0 = Instant::now();
        let mut store = StatsStore::new();
        store.update_at(snap(&[("opackets", 10.0)]), t0);
        store.update_at(snap(&[("opackets", 25.0)]), t0 + Duration::from_secs(2));
        store.update_at(snap(&[("opackets", 40.0)]), t0 + Duration::from_secs(4));
        assert_eq!(store.get_relative("opackets"), Some(30.0));
        assert_eq!(store.get_absolute("opackets"), Some(40.0));
    }

    #[test]
    fn gap_longer_than_window_repins() {
        let t0 = Instant::now();
        let mut store = StatsStore::new();
        store.update_at(snap(&[("obytes", 100.0)]), t0);
        store.update_at(snap(&[("obytes", 900.0)]), t0 + Duration::from_millis(3001));
        assert_eq!(store.get_relative("obytes"), Some(0.0));
    }

    #[test]
    fn gap_exactly_at_window_keeps_baseline() {
        let t0 = Instant::now();
        let mut store = StatsStore::new();
        store.update_at(snap(&[("obytes", 100.0)]), t0);
        store.update_at(snap(&[("obytes", 900.0)]), t0 + Duration::from_secs(3));
        assert_eq!(store.get_relative("obytes"), Some(800.0));
    }

    #[test]
    fn invalidate_keeps_reference() {
        let mut store = StatsStore::new();
        store.update(snap(&[("ipackets", 5.0)]));
        store.invalidate();
        assert!(store.latest().is_empty());
        assert_eq!(store.reference().and_then(|r| r.get("ipackets")), Some(5.0));
        assert_eq!(store.get_relative("ipackets"), None);
    }

    #[test]
    fn relative_without_reference_field_is_unavailable() {
        let t0 = Instant::now();
        let mut store = StatsStore::new();
        store.update_at(snap(&[("ipackets", 5.0)]), t0);
        store.update_at(snap(&[("ipackets", 7.0), ("ibytes", 700.0)]), t0);
        assert_eq!(store.get_relative("ibytes"), None);
        assert_eq!(store.get_absolute("ibytes"), Some(700.0));
    }

    #[test]
    fn snapshot_from_json_drops_non_numeric_values() {
        let s: Snapshot =
            serde_json::from_str(r#"{"opackets": 3, "m_cpu_util": 1.5, "name": "x", "z": null}"#)
                .unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.get("opackets"), Some(3.0));
        assert!(!s.contains("name"));
    }

    #[test]
    fn integer_counters_past_f64_precision_keep_exact_deltas() {
        let t0 = Instant::now();
        let mut store = StatsStore::new();
        let first: Snapshot = serde_json::from_str(r#"{"obytes": 9007199254740993}"#).unwrap();
        let second: Snapshot = serde_json::from_str(r#"{"obytes": 9007199254740994}"#).unwrap();
        assert_eq!(first.counter("obytes"), Some(Counter::Int(9_007_199_254_740_993)));

        store.update_at(first, t0);
        store.update_at(second, t0 + Duration::from_secs(1));
        assert_eq!(store.get_relative("obytes"), Some(1.0));
    }

    #[test]
    fn mixed_integer_and_float_readings_subtract_as_floats() {
        let t0 = Instant::now();
        let mut store = StatsStore::new();
        store.update_at(snap(&[("m_cpu_util", 1.5)]), t0);
        store.update_at(
            [("m_cpu_util", Counter::Int(4))].into_iter().collect(),
            t0 + Duration::from_secs(1),
        );
        assert_eq!(store.get_relative("m_cpu_util"), Some(2.5));
    }
}
