//! Time-ordered sample storage for delay-line elements.
//!
//! A [`History`] keeps one [`Series`] per tracked signal. Samples are appended
//! in time order at every accepted transient point and read back with linear
//! interpolation at retarded times.
//!
//! Only the last `span` seconds are retained, plus one older sample so that a
//! query inside the span always has a bracketing pair.

use std::collections::VecDeque;
use std::fmt::Debug;
use std::hash::Hash;

use indexmap::IndexMap;
use quadline_core::{Error, Result};

/// Samples of a single signal.
#[derive(Debug, Clone, Default)]
pub struct Series {
    times: VecDeque<f64>,
    values: VecDeque<f64>,
}

impl Series {
    /// Number of retained samples.
    pub fn len(&self) -> usize {
        self.times.len()
    }

    /// Whether no sample has been recorded.
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Time of the oldest retained sample.
    pub fn first_time(&self) -> Option<f64> {
        self.times.front().copied()
    }

    /// Time of the newest sample.
    pub fn last_time(&self) -> Option<f64> {
        self.times.back().copied()
    }

    /// Value at `time`.
    ///
    /// Linear interpolation between the bracketing samples. Returns 0.0 before
    /// the first sample (or when empty, or for a NaN time) and the newest
    /// value after the last.
    pub fn value_at(&self, time: f64) -> f64 {
        let (Some(&first), Some(&last)) = (self.times.front(), self.times.back()) else {
            return 0.0;
        };
        if time.is_nan() || time < first {
            return 0.0;
        }
        if time >= last {
            return self.values[self.values.len() - 1];
        }

        // first <= time < last, so 1 <= i < len
        let i = self.times.partition_point(|&t| t <= time);
        let (t0, t1) = (self.times[i - 1], self.times[i]);
        let (v0, v1) = (self.values[i - 1], self.values[i]);
        if time == t0 {
            return v0;
        }
        let alpha = (time - t0) / (t1 - t0);
        v0 + alpha * (v1 - v0)
    }

    /// Append a sample. Returns the newest time on an out-of-order sample.
    fn push(&mut self, time: f64, value: f64) -> std::result::Result<(), f64> {
        match self.times.back() {
            Some(&last) if time < last => return Err(last),
            Some(&last) if time == last => {
                // Same point evaluated again: keep the latest value.
                let n = self.values.len();
                self.values[n - 1] = value;
                return Ok(());
            }
            _ => {}
        }
        self.times.push_back(time);
        self.values.push_back(value);
        Ok(())
    }

    /// Drop samples older than `cutoff`, keeping the newest of them.
    fn trim_before(&mut self, cutoff: f64) {
        let older = self.times.partition_point(|&t| t < cutoff);
        if older > 1 {
            self.times.drain(..older - 1);
            self.values.drain(..older - 1);
        }
    }
}

/// Per-signal sample history with a bounded retention span.
#[derive(Debug, Clone)]
pub struct History<K> {
    span: f64,
    series: IndexMap<K, Series>,
}

impl<K: Copy + Eq + Hash + Debug> History<K> {
    /// Create an empty history retaining `span` seconds of samples.
    pub fn new(span: f64) -> Self {
        Self {
            span,
            series: IndexMap::new(),
        }
    }

    /// Retention span (s).
    pub fn span(&self) -> f64 {
        self.span
    }

    /// Record `value` for `signal` at `time`.
    ///
    /// Times must be non-decreasing per signal. Recording the newest time
    /// again replaces that sample.
    pub fn record(&mut self, signal: K, time: f64, value: f64) -> Result<()> {
        let series = self.series.entry(signal).or_default();
        series
            .push(time, value)
            .map_err(|last| Error::NonMonotonicTime {
                signal: format!("{:?}", signal),
                last,
                time,
            })?;
        series.trim_before(time - self.span);
        Ok(())
    }

    /// Interpolated value of `signal` at `time`; 0.0 when nothing was
    /// recorded at or before `time`.
    pub fn value_at(&self, signal: K, time: f64) -> f64 {
        self.series
            .get(&signal)
            .map(|s| s.value_at(time))
            .unwrap_or(0.0)
    }

    /// Samples recorded for `signal`.
    pub fn series(&self, signal: K) -> Option<&Series> {
        self.series.get(&signal)
    }

    /// Newest recorded time across all signals.
    pub fn latest_time(&self) -> Option<f64> {
        self.series
            .values()
            .filter_map(Series::last_time)
            .reduce(f64::max)
    }

    /// Discard every recorded sample.
    pub fn reset(&mut self) {
        self.series.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(span: f64) -> History<u8> {
        let mut h = History::new(span);
        for k in 0..=10 {
            let t = k as f64 * 0.1;
            h.record(0, t, 2.0 * t).unwrap();
        }
        h
    }

    #[test]
    fn test_exact_sample_returned_exactly() {
        let mut h = History::new(10.0);
        h.record(0u8, 0.0, 0.1).unwrap();
        h.record(0u8, 0.3, 0.7).unwrap();
        h.record(0u8, 0.7, 1.3).unwrap();

        assert_eq!(h.value_at(0, 0.0), 0.1);
        assert_eq!(h.value_at(0, 0.3), 0.7);
        assert_eq!(h.value_at(0, 0.7), 1.3);
    }

    #[test]
    fn test_before_first_sample_is_zero() {
        let mut h = History::new(10.0);
        h.record(0u8, 1.0, 5.0).unwrap();

        assert_eq!(h.value_at(0, 0.999), 0.0);
        assert_eq!(h.value_at(0, -1.0), 0.0);
        // Unknown signal
        assert_eq!(h.value_at(1, 2.0), 0.0);
    }

    #[test]
    fn test_linear_interpolation() {
        let h = ramp(10.0);
        assert!((h.value_at(0, 0.25) - 0.5).abs() < 1e-12);
        assert!((h.value_at(0, 0.55) - 1.1).abs() < 1e-12);
    }

    #[test]
    fn test_nan_time_reads_zero() {
        let h = ramp(10.0);
        assert_eq!(h.value_at(0, f64::NAN), 0.0);
        assert_eq!(h.value_at(0, f64::NEG_INFINITY), 0.0);
        assert_eq!(h.value_at(0, f64::INFINITY), h.value_at(0, 1.0));
    }

    #[test]
    fn test_after_last_sample_holds_value() {
        let h = ramp(10.0);
        assert_eq!(h.value_at(0, 5.0), h.value_at(0, 1.0));
    }

    #[test]
    fn test_reset_discards_samples() {
        let mut h = ramp(10.0);
        assert!(h.value_at(0, 0.5) > 0.0);

        h.reset();
        assert_eq!(h.value_at(0, 0.5), 0.0);
        assert!(h.latest_time().is_none());
    }

    #[test]
    fn test_rejects_out_of_order_sample() {
        let mut h = ramp(10.0);
        match h.record(0, 0.5, 1.0) {
            Err(Error::NonMonotonicTime { last, time, .. }) => {
                assert_eq!(last, 1.0);
                assert_eq!(time, 0.5);
            }
            other => panic!("expected NonMonotonicTime, got {:?}", other),
        }
    }

    #[test]
    fn test_same_time_replaces_sample() {
        let mut h = History::new(10.0);
        h.record(0u8, 0.0, 1.0).unwrap();
        h.record(0u8, 1.0, 2.0).unwrap();
        h.record(0u8, 1.0, 3.0).unwrap();

        assert_eq!(h.series(0).unwrap().len(), 2);
        assert_eq!(h.value_at(0, 1.0), 3.0);
    }

    #[test]
    fn test_trim_keeps_bracketing_sample() {
        // Span 0.25 s over samples every 0.1 s
        let h = ramp(0.25);
        let series = h.series(0).unwrap();

        // Cutoff at 0.75: 0.7 is kept as the bracket, 0.8..1.0 are in span
        let first = series.first_time().unwrap();
        assert!((first - 0.7).abs() < 1e-12, "oldest retained sample at {}", first);
        assert_eq!(series.len(), 4);

        // A query just inside the span still interpolates correctly
        assert!((h.value_at(0, 0.75) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_latest_time_across_signals() {
        let mut h = History::new(1.0);
        h.record(0u8, 0.2, 1.0).unwrap();
        h.record(1u8, 0.4, 1.0).unwrap();
        assert_eq!(h.latest_time(), Some(0.4));
    }
}
