//! Plain-sample latency digest
//!
//! [`SampleDigest`] is the default [`LatencyDigest`] implementation: it
//! keeps every sample and answers quantile/mean queries by sorting on
//! demand. Samples arrive once per timed gateway operation and queries
//! happen once at shutdown, so the naive representation is fine; anything
//! smarter can slot in behind the trait.

use std::time::Duration;

use staleprobe_core::LatencyDigest;

/// Latency accumulator over raw samples
#[derive(Debug, Default, Clone)]
pub struct SampleDigest {
    samples: Vec<Duration>,
}

impl SampleDigest {
    /// Create an empty digest
    pub fn new() -> Self {
        Self::default()
    }

    fn sorted(&self) -> Vec<Duration> {
        let mut sorted = self.samples.clone();
        sorted.sort_unstable();
        sorted
    }
}

impl LatencyDigest for SampleDigest {
    fn record(&mut self, sample: Duration) {
        self.samples.push(sample);
    }

    fn count(&self) -> usize {
        self.samples.len()
    }

    fn quantile(&self, q: f64) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let sorted = self.sorted();
        let q = q.clamp(0.0, 1.0);
        let idx = ((sorted.len() - 1) as f64 * q).round() as usize;
        Some(sorted[idx])
    }

    fn mean(&self) -> Option<Duration> {
        if self.samples.is_empty() {
            return None;
        }
        let total: Duration = self.samples.iter().sum();
        Some(total / self.samples.len() as u32)
    }
}

/// Shutdown summary of a populated digest
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencySummary {
    /// Number of timed operations
    pub count: usize,
    /// Fastest sample
    pub min: Duration,
    /// Lower quartile
    pub p25: Duration,
    /// Median
    pub median: Duration,
    /// Upper quartile
    pub p75: Duration,
    /// Slowest sample
    pub max: Duration,
    /// Arithmetic mean
    pub mean: Duration,
}

impl LatencySummary {
    /// Summarise a digest; `None` if it holds no samples
    pub fn from_digest(digest: &dyn LatencyDigest) -> Option<Self> {
        if digest.count() == 0 {
            return None;
        }
        Some(LatencySummary {
            count: digest.count(),
            min: digest.quantile(0.0)?,
            p25: digest.quantile(0.25)?,
            median: digest.quantile(0.5)?,
            p75: digest.quantile(0.75)?,
            max: digest.quantile(1.0)?,
            mean: digest.mean()?,
        })
    }
}

impl std::fmt::Display for LatencySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "samples: {}, min: {:?}, p25: {:?}, median: {:?}, p75: {:?}, max: {:?}, mean: {:?}",
            self.count, self.min, self.p25, self.median, self.p75, self.max, self.mean
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn digest_of(samples: &[u64]) -> SampleDigest {
        let mut digest = SampleDigest::new();
        for &ms in samples {
            digest.record(Duration::from_millis(ms));
        }
        digest
    }

    #[test]
    fn empty_digest_answers_none() {
        let digest = SampleDigest::new();
        assert_eq!(digest.count(), 0);
        assert!(digest.quantile(0.5).is_none());
        assert!(digest.mean().is_none());
        assert!(LatencySummary::from_digest(&digest).is_none());
    }

    #[test]
    fn single_sample_is_every_quantile() {
        let digest = digest_of(&[42]);
        let s = Duration::from_millis(42);
        assert_eq!(digest.quantile(0.0), Some(s));
        assert_eq!(digest.quantile(0.5), Some(s));
        assert_eq!(digest.quantile(1.0), Some(s));
        assert_eq!(digest.mean(), Some(s));
    }

    #[test]
    fn median_of_odd_sample_count() {
        let digest = digest_of(&[30, 10, 20]);
        assert_eq!(digest.quantile(0.5), Some(Duration::from_millis(20)));
    }

    #[test]
    fn mean_averages_samples() {
        let digest = digest_of(&[10, 20, 30, 40]);
        assert_eq!(digest.mean(), Some(Duration::from_millis(25)));
    }

    #[test]
    fn quantiles_ignore_insertion_order() {
        let a = digest_of(&[5, 1, 4, 2, 3]);
        let b = digest_of(&[1, 2, 3, 4, 5]);
        for q in [0.0, 0.25, 0.5, 0.75, 1.0] {
            assert_eq!(a.quantile(q), b.quantile(q));
        }
    }

    #[test]
    fn summary_collects_all_fields() {
        let digest = digest_of(&[10, 20, 30, 40, 50]);
        let summary = LatencySummary::from_digest(&digest).unwrap();
        assert_eq!(summary.count, 5);
        assert_eq!(summary.min, Duration::from_millis(10));
        assert_eq!(summary.median, Duration::from_millis(30));
        assert_eq!(summary.max, Duration::from_millis(50));
        assert_eq!(summary.mean, Duration::from_millis(30));
        let rendered = summary.to_string();
        assert!(rendered.contains("samples: 5"));
    }

    proptest! {
        /// Quantiles are monotonic in q and bracketed by min/max.
        #[test]
        fn quantiles_are_monotonic(mut samples in prop::collection::vec(0u64..10_000, 1..200)) {
            let digest = digest_of(&samples);
            samples.sort_unstable();
            let min = Duration::from_millis(samples[0]);
            let max = Duration::from_millis(*samples.last().unwrap());

            let mut last = min;
            for q in [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0] {
                let v = digest.quantile(q).unwrap();
                prop_assert!(v >= last);
                prop_assert!(v >= min && v <= max);
                last = v;
            }
        }

        /// The mean lies between min and max.
        #[test]
        fn mean_is_bracketed(samples in prop::collection::vec(0u64..10_000, 1..200)) {
            let digest = digest_of(&samples);
            let mean = digest.mean().unwrap();
            let min = digest.quantile(0.0).unwrap();
            let max = digest.quantile(1.0).unwrap();
            prop_assert!(mean >= min && mean <= max);
        }
    }
}
