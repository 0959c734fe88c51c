//! Per-command usage counters.

use crate::commands::Router;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// Usage counters keyed by primary alias.
///
/// Counters are created for every registered command up front, so recording
/// is a lock-free atomic increment.
#[derive(Debug, Default)]
pub struct CommandStats {
    counts: HashMap<&'static str, AtomicU64>,
}

impl CommandStats {
    pub fn new(router: &Router) -> Self {
        Self {
            counts: router
                .aliases()
                .into_iter()
                .map(|alias| (alias, AtomicU64::new(0)))
                .collect(),
        }
    }

    pub fn record(&self, alias: &str) {
        if let Some(counter) = self.counts.get(alias) {
            counter.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn count(&self, alias: &str) -> u64 {
        self.counts
            .get(alias)
            .map_or(0, |counter| counter.load(Ordering::Relaxed))
    }

    /// Commands used at least once, most used first.
    pub fn snapshot(&self) -> Vec<(&'static str, u64)> {
        let mut stats: Vec<_> = self
            .counts
            .iter()
            .map(|(alias, count)| (*alias, count.load(Ordering::Relaxed)))
            .filter(|(_, count)| *count > 0)
            .collect();

        // Ties are broken by alias so the listing is stable
        stats.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        stats
    }

    pub fn total(&self) -> u64 {
        self.counts
            .values()
            .map(|count| count.load(Ordering::Relaxed))
            .sum()
    }
}
