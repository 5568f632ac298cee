//! Per-batch and per-run counters

use crate::error::DropReason;
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::info;

/// Counts for one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BatchStats {
    pub batch: usize,
    pub input: usize,
    pub kept: usize,
    pub dropped: BTreeMap<DropReason, usize>,
}

impl BatchStats {
    pub fn new(batch: usize, input: usize) -> Self {
        Self {
            batch,
            input,
            ..Default::default()
        }
    }

    pub fn record_kept(&mut self) {
        self.kept += 1;
    }

    pub fn record_drop(&mut self, reason: DropReason) {
        *self.dropped.entry(reason).or_insert(0) += 1;
    }

    pub fn total_dropped(&self) -> usize {
        self.dropped.values().sum()
    }

    pub fn log_summary(&self) {
        let drops = self
            .dropped
            .iter()
            .map(|(reason, count)| format!("{}={}", reason.as_str(), count))
            .collect::<Vec<_>>()
            .join(" ");
        info!(
            batch = self.batch,
            input = self.input,
            kept = self.kept,
            dropped = self.total_dropped(),
            drops = %drops,
            "Batch complete"
        );
    }
}

/// Totals over a run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub batches_processed: usize,
    pub batches_skipped: usize,
    pub input: usize,
    pub kept: usize,
    pub dropped: BTreeMap<DropReason, usize>,
}

impl RunSummary {
    pub fn add(&mut self, stats: &BatchStats) {
        self.batches_processed += 1;
        self.input += stats.input;
        self.kept += stats.kept;
        for (reason, count) in &stats.dropped {
            *self.dropped.entry(*reason).or_insert(0) += count;
        }
    }

    pub fn record_skipped(&mut self) {
        self.batches_skipped += 1;
    }

    pub fn log_summary(&self) {
        info!(
            batches = self.batches_processed,
            skipped = self.batches_skipped,
            input = self.input,
            kept = self.kept,
            dropped = self.dropped.values().sum::<usize>(),
            "Run complete"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut stats = BatchStats::new(0, 4);
        stats.record_kept();
        stats.record_drop(DropReason::Adult);
        stats.record_drop(DropReason::Adult);
        stats.record_drop(DropReason::ShortFilm);
        assert_eq!(stats.total_dropped(), 3);
        assert_eq!(stats.dropped[&DropReason::Adult], 2);

        let mut summary = RunSummary::default();
        summary.add(&stats);
        summary.add(&stats);
        summary.record_skipped();
        assert_eq!(summary.batches_processed, 2);
        assert_eq!(summary.batches_skipped, 1);
        assert_eq!(summary.kept, 2);
        assert_eq!(summary.dropped[&DropReason::ShortFilm], 2);
    }
}
