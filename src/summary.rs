use dashmap::DashMap;
use log::info;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering::Relaxed};

use crate::split::Split;
use crate::types::CollectClasses;

/// Live counters for one split, shared by every worker of that split.
#[derive(Debug, Default)]
pub struct SplitSummary {
    success: AtomicUsize,
    failed: AtomicUsize,
    classes: DashMap<String, usize>,
}

impl SplitSummary {
    pub fn record_success(&self, classes: &CollectClasses) {
        for (name, count) in classes {
            *self.classes.entry(name.clone()).or_insert(0) += count;
        }
        self.success.fetch_add(1, Relaxed);
    }

    pub fn record_failure(&self) {
        self.failed.fetch_add(1, Relaxed);
    }

    pub fn snapshot(&self) -> SplitReport {
        SplitReport {
            success: self.success.load(Relaxed),
            failed: self.failed.load(Relaxed),
            classes: self
                .classes
                .iter()
                .map(|entry| (entry.key().clone(), *entry.value()))
                .collect(),
        }
    }
}

/// Summaries for every split.
#[derive(Debug)]
pub struct Summary {
    splits: HashMap<Split, SplitSummary>,
}

impl Default for Summary {
    fn default() -> Self {
        Self {
            splits: Split::ALL
                .into_iter()
                .map(|split| (split, SplitSummary::default()))
                .collect(),
        }
    }
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn split(&self, split: Split) -> &SplitSummary {
        // Every split is inserted at construction
        &self.splits[&split]
    }

    pub fn report(&self) -> BTreeMap<Split, SplitReport> {
        self.splits
            .iter()
            .map(|(split, summary)| (*split, summary.snapshot()))
            .collect()
    }
}

/// Final counts for one split.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    pub success: usize,
    pub failed: usize,
    pub classes: BTreeMap<String, usize>,
}

impl SplitReport {
    /// Images discovered for the split.
    pub fn total(&self) -> usize {
        self.success + self.failed
    }

    pub fn log(&self, split: Split) {
        let classes = serde_json::to_string(&self.classes).unwrap_or_default();
        info!(
            "Summary split={} count={} failed={} success={} classes={}",
            split,
            self.total(),
            self.failed,
            self.success,
            classes
        );
    }
}

/// Outcome of a whole collection run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectReport {
    pub splits: BTreeMap<Split, SplitReport>,
    pub skipped_sources: usize,
}

impl CollectReport {
    pub fn split(&self, split: Split) -> SplitReport {
        self.splits.get(&split).cloned().unwrap_or_default()
    }

    pub fn total_success(&self) -> usize {
        self.splits.values().map(|s| s.success).sum()
    }

    pub fn total_failed(&self) -> usize {
        self.splits.values().map(|s| s.failed).sum()
    }
}
