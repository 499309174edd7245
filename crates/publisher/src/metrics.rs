//! Publisher metrics types.

use std::time::{Duration, Instant};

/// Publisher metrics for observability.
#[derive(Clone, Debug, Default)]
pub struct PublisherMetrics {
    /// Rollups that reached full confirmation.
    pub rollups_published: u64,
    /// Publish calls that returned aborted.
    pub rollups_aborted: u64,
    /// Transactions dispatched, counting resubmissions.
    pub txs_sent: u64,
    /// Outer retry iterations taken across all publishes.
    pub retry_iterations: u64,
    /// Total wall-clock time of successful publishes.
    pub total_publish_duration: Duration,
}

impl PublisherMetrics {
    /// Creates new metrics.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful publish and its duration.
    pub fn record_published(&mut self, duration: Duration) {
        self.rollups_published += 1;
        self.total_publish_duration += duration;
    }

    /// Records an aborted publish.
    pub const fn record_aborted(&mut self) {
        self.rollups_aborted += 1;
    }

    /// Records dispatched transactions.
    pub const fn record_sends(&mut self, count: u64) {
        self.txs_sent += count;
    }

    /// Records one outer retry iteration.
    pub const fn record_retry(&mut self) {
        self.retry_iterations += 1;
    }

    /// Average duration of a successful publish.
    #[must_use]
    pub fn average_publish_duration(&self) -> Duration {
        if self.rollups_published == 0 {
            return Duration::ZERO;
        }
        self.total_publish_duration / self.rollups_published as u32
    }
}

/// Measures the duration of a single publish attempt.
///
/// Recorded into the metrics only when the publish succeeds; aborted
/// attempts drop the timer.
#[derive(Debug)]
pub struct PublishTimer {
    started: Instant,
}

impl PublishTimer {
    /// Starts the timer.
    #[must_use]
    pub fn start() -> Self {
        Self { started: Instant::now() }
    }

    /// Elapsed time since the timer started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_metrics_are_zero() {
        let metrics = PublisherMetrics::new();
        assert_eq!(metrics.rollups_published, 0);
        assert_eq!(metrics.rollups_aborted, 0);
        assert_eq!(metrics.txs_sent, 0);
        assert_eq!(metrics.retry_iterations, 0);
        assert_eq!(metrics.total_publish_duration, Duration::ZERO);
    }

    #[test]
    fn record_published_accumulates_duration() {
        let mut metrics = PublisherMetrics::new();
        metrics.record_published(Duration::from_secs(2));
        metrics.record_published(Duration::from_secs(4));

        assert_eq!(metrics.rollups_published, 2);
        assert_eq!(metrics.total_publish_duration, Duration::from_secs(6));
        assert_eq!(metrics.average_publish_duration(), Duration::from_secs(3));
    }

    #[test]
    fn average_is_zero_without_publishes() {
        let metrics = PublisherMetrics::new();
        assert_eq!(metrics.average_publish_duration(), Duration::ZERO);
    }

    #[test]
    fn counters_accumulate() {
        let mut metrics = PublisherMetrics::new();
        metrics.record_aborted();
        metrics.record_sends(3);
        metrics.record_sends(1);
        metrics.record_retry();

        assert_eq!(metrics.rollups_aborted, 1);
        assert_eq!(metrics.txs_sent, 4);
        assert_eq!(metrics.retry_iterations, 1);
    }

    #[test]
    fn timer_elapsed_is_monotonic() {
        let timer = PublishTimer::start();
        let first = timer.elapsed();
        let second = timer.elapsed();
        assert!(second >= first);
    }
}
