//! Per-node memo of previous measurements.
//!
//! Every node remembers the constraints of its last full layout plus a small
//! ring of measure-only results. Flex resolution measures the same child
//! several times under slightly different constraints, and most of those
//! requests can be answered from an earlier result.
use crate::measure::MeasureMode;
use flexlay_types::math::{floats_equal, is_undefined, round_value_to_pixel_grid};

/// Capacity of the measurement ring.
pub const MAX_CACHED_MEASUREMENTS: usize = 8;

/// Constraints of one request and the size it produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CachedMeasurement {
    pub available_width: f32,
    pub available_height: f32,
    pub width_mode: Option<MeasureMode>,
    pub height_mode: Option<MeasureMode>,
    pub computed_width: f32,
    pub computed_height: f32,
}

impl Default for CachedMeasurement {
    fn default() -> Self {
        Self {
            available_width: 0.0,
            available_height: 0.0,
            width_mode: None,
            height_mode: None,
            computed_width: -1.0,
            computed_height: -1.0,
        }
    }
}

impl CachedMeasurement {
    /// Same constraints, compared with tolerance.
    pub fn matches_exactly(
        &self,
        width: f32,
        height: f32,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
    ) -> bool {
        floats_equal(self.available_width, width)
            && floats_equal(self.available_height, height)
            && self.width_mode == Some(width_mode)
            && self.height_mode == Some(height_mode)
    }
}

/// Where a cache hit came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSlot {
    Layout,
    Measurement(usize),
}

/// One full-layout slot plus a ring of [`MAX_CACHED_MEASUREMENTS`] entries.
#[derive(Debug, Clone, Default)]
pub struct LayoutCache {
    pub(crate) layout: CachedMeasurement,
    pub(crate) measurements: [CachedMeasurement; MAX_CACHED_MEASUREMENTS],
    pub(crate) next_index: usize,
}

impl LayoutCache {
    /// Number of live ring entries.
    pub fn len(&self) -> usize {
        self.next_index
    }

    pub fn is_empty(&self) -> bool {
        self.next_index == 0
    }

    pub fn get(&self, slot: CacheSlot) -> &CachedMeasurement {
        match slot {
            CacheSlot::Layout => &self.layout,
            CacheSlot::Measurement(index) => &self.measurements[index],
        }
    }

    /// Forgets everything. Ring entries are overwritten in place later.
    pub fn invalidate(&mut self) {
        self.next_index = 0;
        self.layout.width_mode = None;
        self.layout.height_mode = None;
        self.layout.computed_width = -1.0;
        self.layout.computed_height = -1.0;
    }

    /// Exact lookup used for nodes without a measure callback.
    pub fn find_exact(
        &self,
        perform_layout: bool,
        width: f32,
        height: f32,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
    ) -> Option<CacheSlot> {
        if perform_layout {
            return self
                .layout
                .matches_exactly(width, height, width_mode, height_mode)
                .then_some(CacheSlot::Layout);
        }
        self.measurements[..self.next_index]
            .iter()
            .position(|entry| entry.matches_exactly(width, height, width_mode, height_mode))
            .map(CacheSlot::Measurement)
    }

    /// Tolerant lookup used for measure-callback leaves: the layout slot
    /// first, then the ring.
    pub fn find_compatible(&self, request: &MeasureRequest, point_scale_factor: f32) -> Option<CacheSlot> {
        if can_use_cached_measurement(request, &self.layout, point_scale_factor) {
            return Some(CacheSlot::Layout);
        }
        self.measurements[..self.next_index]
            .iter()
            .position(|entry| can_use_cached_measurement(request, entry, point_scale_factor))
            .map(CacheSlot::Measurement)
    }

    /// Records a result. Returns `true` when the ring was full and wrapped
    /// around to its first entry.
    pub fn store(&mut self, perform_layout: bool, entry: CachedMeasurement) -> bool {
        let wrapped = self.next_index == MAX_CACHED_MEASUREMENTS;
        if wrapped {
            self.next_index = 0;
        }
        if perform_layout {
            self.layout = entry;
            return wrapped;
        }
        self.measurements[self.next_index] = entry;
        self.next_index += 1;
        wrapped
    }
}

/// A sizing request, together with the node's margins on each axis.
#[derive(Debug, Clone, Copy)]
pub struct MeasureRequest {
    pub width: f32,
    pub width_mode: MeasureMode,
    pub height: f32,
    pub height_mode: MeasureMode,
    pub margin_row: f32,
    pub margin_column: f32,
}

/// An exact request whose size equals what was measured last time.
pub fn size_is_exact_and_matches_old(mode: MeasureMode, size: f32, last_computed_size: f32) -> bool {
    mode == MeasureMode::Exactly && floats_equal(size, last_computed_size)
}

/// An at-most request where the old one was unconstrained and the old
/// result still fits under the new bound.
pub fn old_size_is_unspecified_and_still_fits(
    mode: MeasureMode,
    size: f32,
    last_mode: Option<MeasureMode>,
    last_computed_size: f32,
) -> bool {
    mode == MeasureMode::AtMost
        && last_mode == Some(MeasureMode::Undefined)
        && (size >= last_computed_size || floats_equal(size, last_computed_size))
}

/// Both requests are at-most, the new bound is tighter, and the old result
/// already satisfies it.
pub fn new_size_is_stricter_and_still_valid(
    mode: MeasureMode,
    size: f32,
    last_mode: Option<MeasureMode>,
    last_size: f32,
    last_computed_size: f32,
) -> bool {
    last_mode == Some(MeasureMode::AtMost)
        && mode == MeasureMode::AtMost
        && !is_undefined(last_size)
        && !is_undefined(size)
        && !is_undefined(last_computed_size)
        && last_size > size
        && (last_computed_size <= size || floats_equal(size, last_computed_size))
}

/// Whether `entry` answers `request`. With a non-zero scale factor the
/// constraint sizes are compared on the pixel grid.
pub fn can_use_cached_measurement(
    request: &MeasureRequest,
    entry: &CachedMeasurement,
    point_scale_factor: f32,
) -> bool {
    if (!is_undefined(entry.computed_height) && entry.computed_height < 0.0)
        || (!is_undefined(entry.computed_width) && entry.computed_width < 0.0)
    {
        return false;
    }

    let snap = |value: f32| {
        if point_scale_factor != 0.0 {
            round_value_to_pixel_grid(value, point_scale_factor, false, false)
        } else {
            value
        }
    };

    let same_width_constraint = entry.width_mode == Some(request.width_mode)
        && floats_equal(snap(entry.available_width), snap(request.width));
    let same_height_constraint = entry.height_mode == Some(request.height_mode)
        && floats_equal(snap(entry.available_height), snap(request.height));

    let inner_width = request.width - request.margin_row;
    let width_compatible = same_width_constraint
        || size_is_exact_and_matches_old(request.width_mode, inner_width, entry.computed_width)
        || old_size_is_unspecified_and_still_fits(
            request.width_mode,
            inner_width,
            entry.width_mode,
            entry.computed_width,
        )
        || new_size_is_stricter_and_still_valid(
            request.width_mode,
            inner_width,
            entry.width_mode,
            entry.available_width,
            entry.computed_width,
        );

    let inner_height = request.height - request.margin_column;
    let height_compatible = same_height_constraint
        || size_is_exact_and_matches_old(request.height_mode, inner_height, entry.computed_height)
        || old_size_is_unspecified_and_still_fits(
            request.height_mode,
            inner_height,
            entry.height_mode,
            entry.computed_height,
        )
        || new_size_is_stricter_and_still_valid(
            request.height_mode,
            inner_height,
            entry.height_mode,
            entry.available_height,
            entry.computed_height,
        );

    width_compatible && height_compatible
}

#[cfg(test)]
mod tests {
    use super::*;
    use flexlay_types::UNDEFINED;

    fn entry(
        width: f32,
        width_mode: MeasureMode,
        height: f32,
        height_mode: MeasureMode,
        computed: (f32, f32),
    ) -> CachedMeasurement {
        CachedMeasurement {
            available_width: width,
            available_height: height,
            width_mode: Some(width_mode),
            height_mode: Some(height_mode),
            computed_width: computed.0,
            computed_height: computed.1,
        }
    }

    fn request(width: f32, width_mode: MeasureMode, height: f32, height_mode: MeasureMode) -> MeasureRequest {
        MeasureRequest {
            width,
            width_mode,
            height,
            height_mode,
            margin_row: 0.0,
            margin_column: 0.0,
        }
    }

    #[test]
    fn test_exact_spec_match() {
        let cached = entry(100.0, MeasureMode::Exactly, 50.0, MeasureMode::AtMost, (100.0, 20.0));
        let req = request(100.00001, MeasureMode::Exactly, 50.0, MeasureMode::AtMost);
        assert!(can_use_cached_measurement(&req, &cached, 0.0));

        let other_mode = request(100.0, MeasureMode::AtMost, 50.0, MeasureMode::AtMost);
        assert!(!can_use_cached_measurement(&other_mode, &cached, 0.0));
    }

    #[test]
    fn test_exact_request_matching_previous_result() {
        // Measured unconstrained at 40 wide; asking for exactly 40 is the same answer.
        let cached = entry(UNDEFINED, MeasureMode::Undefined, UNDEFINED, MeasureMode::Undefined, (40.0, 10.0));
        let req = request(40.0, MeasureMode::Exactly, 10.0, MeasureMode::Exactly);
        assert!(can_use_cached_measurement(&req, &cached, 0.0));
    }

    #[test]
    fn test_exact_request_subtracts_margin() {
        let cached = entry(UNDEFINED, MeasureMode::Undefined, UNDEFINED, MeasureMode::Undefined, (40.0, 10.0));
        let mut req = request(50.0, MeasureMode::Exactly, 10.0, MeasureMode::Exactly);
        req.margin_row = 10.0;
        assert!(can_use_cached_measurement(&req, &cached, 0.0));
    }

    #[test]
    fn test_unspecified_old_size_still_fits() {
        assert!(old_size_is_unspecified_and_still_fits(
            MeasureMode::AtMost,
            100.0,
            Some(MeasureMode::Undefined),
            60.0
        ));
        assert!(!old_size_is_unspecified_and_still_fits(
            MeasureMode::AtMost,
            50.0,
            Some(MeasureMode::Undefined),
            60.0
        ));
        assert!(!old_size_is_unspecified_and_still_fits(
            MeasureMode::AtMost,
            100.0,
            Some(MeasureMode::Exactly),
            60.0
        ));
    }

    #[test]
    fn test_stricter_bound_still_valid() {
        assert!(new_size_is_stricter_and_still_valid(
            MeasureMode::AtMost,
            80.0,
            Some(MeasureMode::AtMost),
            100.0,
            70.0
        ));
        // The old result no longer fits.
        assert!(!new_size_is_stricter_and_still_valid(
            MeasureMode::AtMost,
            60.0,
            Some(MeasureMode::AtMost),
            100.0,
            70.0
        ));
        // A looser bound is not "stricter".
        assert!(!new_size_is_stricter_and_still_valid(
            MeasureMode::AtMost,
            120.0,
            Some(MeasureMode::AtMost),
            100.0,
            70.0
        ));
        assert!(!new_size_is_stricter_and_still_valid(
            MeasureMode::AtMost,
            UNDEFINED,
            Some(MeasureMode::AtMost),
            100.0,
            70.0
        ));
    }

    #[test]
    fn test_empty_entries_never_match() {
        let empty = CachedMeasurement::default();
        let req = request(0.0, MeasureMode::Exactly, 0.0, MeasureMode::Exactly);
        assert!(!can_use_cached_measurement(&req, &empty, 1.0));
    }

    #[test]
    fn test_rounded_comparison_uses_pixel_grid() {
        // The old result overflows the new bound, so only grid snapping can match.
        let cached = entry(100.2, MeasureMode::AtMost, 50.0, MeasureMode::Exactly, (100.1, 50.0));
        let req = request(99.9, MeasureMode::AtMost, 50.0, MeasureMode::Exactly);
        assert!(can_use_cached_measurement(&req, &cached, 1.0));
        assert!(!can_use_cached_measurement(&req, &cached, 0.0));
    }

    #[test]
    fn test_ring_wraps_after_capacity() {
        let mut cache = LayoutCache::default();
        for i in 0..MAX_CACHED_MEASUREMENTS {
            let wrapped = cache.store(
                false,
                entry(i as f32, MeasureMode::Exactly, 0.0, MeasureMode::Exactly, (i as f32, 0.0)),
            );
            assert!(!wrapped);
        }
        assert_eq!(cache.len(), MAX_CACHED_MEASUREMENTS);

        let wrapped = cache.store(false, entry(99.0, MeasureMode::Exactly, 0.0, MeasureMode::Exactly, (99.0, 0.0)));
        assert!(wrapped);
        assert_eq!(cache.len(), 1);
        assert_eq!(
            cache.find_exact(false, 99.0, 0.0, MeasureMode::Exactly, MeasureMode::Exactly),
            Some(CacheSlot::Measurement(0))
        );
        // Entries past the wrap point are no longer consulted.
        assert_eq!(cache.find_exact(false, 3.0, 0.0, MeasureMode::Exactly, MeasureMode::Exactly), None);
    }

    #[test]
    fn test_full_ring_also_wraps_on_layout_store() {
        let mut cache = LayoutCache::default();
        for i in 0..MAX_CACHED_MEASUREMENTS {
            cache.store(
                false,
                entry(i as f32, MeasureMode::Exactly, 0.0, MeasureMode::Exactly, (i as f32, 0.0)),
            );
        }
        assert!(cache.store(true, entry(10.0, MeasureMode::Exactly, 20.0, MeasureMode::Exactly, (10.0, 20.0))));
        assert_eq!(cache.len(), 0);
        assert_eq!(
            cache.find_exact(true, 10.0, 20.0, MeasureMode::Exactly, MeasureMode::Exactly),
            Some(CacheSlot::Layout)
        );
    }

    #[test]
    fn test_layout_slot_and_invalidate() {
        let mut cache = LayoutCache::default();
        cache.store(true, entry(10.0, MeasureMode::Exactly, 20.0, MeasureMode::Exactly, (10.0, 20.0)));
        assert_eq!(
            cache.find_exact(true, 10.0, 20.0, MeasureMode::Exactly, MeasureMode::Exactly),
            Some(CacheSlot::Layout)
        );
        cache.invalidate();
        assert_eq!(cache.find_exact(true, 10.0, 20.0, MeasureMode::Exactly, MeasureMode::Exactly), None);
    }
}
