//! The adaptive indexing controller.
//!
//! Re-derives the engine's indexing flag from store statistics after every
//! mutation, rather than maintaining long-lived derived state that could
//! fall out of sync. The thresholds are fields, not constants, so a caller
//! can tune them (or disable adaptivity entirely via `ForceIndexing`).

use spocp_store::IndexStats;

#[derive(Debug, Clone, Copy)]
pub struct AdaptiveController {
    pub total_min: usize,
    pub unique_tags_min: usize,
    pub avg_bucket_max: f64,
}

impl Default for AdaptiveController {
    fn default() -> Self {
        Self {
            total_min: 50,
            unique_tags_min: 5,
            avg_bucket_max: 100.0,
        }
    }
}

impl AdaptiveController {
    pub fn recompute(&self, stats: &IndexStats) -> bool {
        stats.total >= self.total_min
            && stats.distinct_tag_count >= self.unique_tags_min
            && stats.average_bucket_size <= self.avg_bucket_max
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn stats(total: usize, distinct_tag_count: usize, average_bucket_size: f64) -> IndexStats {
        IndexStats {
            total,
            distinct_tag_count,
            average_bucket_size,
            ..Default::default()
        }
    }

    #[test]
    fn below_every_threshold_disables_indexing() {
        let c = AdaptiveController::default();
        assert!(!c.recompute(&stats(10, 2, 5.0)));
    }

    #[test]
    fn all_thresholds_met_enables_indexing() {
        let c = AdaptiveController::default();
        assert!(c.recompute(&stats(50, 5, 10.0)));
    }

    #[test]
    fn one_failing_threshold_disables_indexing() {
        let c = AdaptiveController::default();
        assert!(!c.recompute(&stats(50, 5, 200.0)));
        assert!(!c.recompute(&stats(49, 5, 10.0)));
        assert!(!c.recompute(&stats(50, 4, 10.0)));
    }

    #[test]
    fn thresholds_are_configurable() {
        let c = AdaptiveController { total_min: 1, unique_tags_min: 1, avg_bucket_max: 1000.0 };
        assert!(c.recompute(&stats(1, 1, 1.0)));
    }
}
