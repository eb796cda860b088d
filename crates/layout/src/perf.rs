/// Counters for one layout pass.
///
/// Reset at the start of every [`crate::LayoutTree::calculate_layout`] and
/// read back with [`crate::LayoutTree::last_pass_stats`]. A pass over an
/// unchanged tree reports no `layouts`, `measures` or `measure_callbacks`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutStats {
    /// Full layouts computed (positions of children were written).
    pub layouts: usize,
    /// Measure-only computations.
    pub measures: usize,
    /// Full layouts answered from the cache.
    pub cached_layouts: usize,
    /// Measurements answered from the cache.
    pub cached_measures: usize,
    /// Calls into host measure functions.
    pub measure_callbacks: usize,
    /// Deepest measurement ring seen on any node.
    pub max_measure_cache: usize,
}

impl LayoutStats {
    pub fn cache_hits(&self) -> usize {
        self.cached_layouts + self.cached_measures
    }

    pub fn cache_misses(&self) -> usize {
        self.layouts + self.measures
    }

    pub(crate) fn count_hit(&mut self, perform_layout: bool) {
        if perform_layout {
            self.cached_layouts += 1;
        } else {
            self.cached_measures += 1;
        }
    }

    pub(crate) fn count_miss(&mut self, perform_layout: bool) {
        if perform_layout {
            self.layouts += 1;
        } else {
            self.measures += 1;
        }
    }

    pub(crate) fn record_cache_depth(&mut self, depth: usize) {
        self.max_measure_cache = self.max_measure_cache.max(depth);
    }

    pub fn log_summary(&self) {
        let hits = self.cache_hits();
        let total = hits + self.cache_misses();
        if total == 0 {
            return;
        }

        log::debug!("=== Layout Pass Summary ===");
        log::debug!(
            "Cache Hits: {} ({:.1}%)",
            hits,
            (hits as f64 / total as f64) * 100.0
        );
        log::debug!(
            "Layouts: {} computed, {} cached; Measures: {} computed, {} cached",
            self.layouts,
            self.cached_layouts,
            self.measures,
            self.cached_measures
        );
        log::debug!(
            "Measure callbacks: {}, deepest cache: {}",
            self.measure_callbacks,
            self.max_measure_cache
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hits_and_misses() {
        let mut stats = LayoutStats::default();
        stats.count_hit(true);
        stats.count_hit(false);
        stats.count_hit(false);
        stats.count_miss(true);
        stats.record_cache_depth(3);
        stats.record_cache_depth(1);

        assert_eq!(stats.cache_hits(), 3);
        assert_eq!(stats.cache_misses(), 1);
        assert_eq!(stats.cached_measures, 2);
        assert_eq!(stats.max_measure_cache, 3);
    }
}
