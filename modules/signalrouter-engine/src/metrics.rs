//! Per-cycle metrics.
//!
//! `RouterMetrics` is shared across the concurrent per-source workers a
//! cycle fans out to, so every counter is an `AtomicU64`; `snapshot()` reads
//! a coherent-enough view for the once-per-cycle `info` log line, and
//! `reset()` zeroes the counters back out afterward so each cycle's log
//! reflects only that cycle's activity.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

#[derive(Default)]
pub struct RouterMetrics {
    pub articles_fetched: AtomicU64,
    pub articles_published: AtomicU64,
    pub channels_published: AtomicU64,
    pub dedup_hits: AtomicU64,
    pub publish_errors: AtomicU64,
    pub history_write_errors: AtomicU64,
    pub cursor_saved: AtomicU64,
}

impl RouterMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self, cycle_duration: Duration, lag_seconds: Option<i64>) -> MetricsSnapshot {
        MetricsSnapshot {
            articles_fetched: self.articles_fetched.load(Ordering::Relaxed),
            articles_published: self.articles_published.load(Ordering::Relaxed),
            channels_published: self.channels_published.load(Ordering::Relaxed),
            dedup_hits: self.dedup_hits.load(Ordering::Relaxed),
            publish_errors: self.publish_errors.load(Ordering::Relaxed),
            history_write_errors: self.history_write_errors.load(Ordering::Relaxed),
            cursor_saved: self.cursor_saved.load(Ordering::Relaxed),
            cycle_duration,
            lag_seconds,
        }
    }

    pub(crate) fn incr(counter: &AtomicU64) {
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Zeroes every counter. Called once per cycle, after `snapshot()`, so
    /// the next cycle's log line reports only what happened in that cycle.
    pub fn reset(&self) {
        self.articles_fetched.store(0, Ordering::Relaxed);
        self.articles_published.store(0, Ordering::Relaxed);
        self.channels_published.store(0, Ordering::Relaxed);
        self.dedup_hits.store(0, Ordering::Relaxed);
        self.publish_errors.store(0, Ordering::Relaxed);
        self.history_write_errors.store(0, Ordering::Relaxed);
        self.cursor_saved.store(0, Ordering::Relaxed);
    }
}

/// A point-in-time read of `RouterMetrics`, logged once per cycle at `info`
/// before the counters are reset for the next cycle.
#[derive(Debug, Clone)]
pub struct MetricsSnapshot {
    pub articles_fetched: u64,
    pub articles_published: u64,
    pub channels_published: u64,
    pub dedup_hits: u64,
    pub publish_errors: u64,
    pub history_write_errors: u64,
    pub cursor_saved: u64,
    pub cycle_duration: Duration,
    /// `cycle-start now - newest-article-published_at`, across all sources
    /// processed this cycle; `None` if no articles were fetched.
    pub lag_seconds: Option<i64>,
}

impl fmt::Display for MetricsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "articles_fetched={} articles_published={} channels_published={} dedup_hits={} \
             publish_errors={} history_write_errors={} cursor_saved={} cycle_duration_ms={} lag_seconds={}",
            self.articles_fetched,
            self.articles_published,
            self.channels_published,
            self.dedup_hits,
            self.publish_errors,
            self.history_write_errors,
            self.cursor_saved,
            self.cycle_duration.as_millis(),
            self.lag_seconds.map(|s| s.to_string()).unwrap_or_else(|| "n/a".to_string()),
        )
    }
}
