//! Per-node computed layout.
use crate::cache::LayoutCache;
use flexlay_style::{Direction, Edge};
use flexlay_types::UNDEFINED;
use flexlay_types::math::floats_equal;

/// The output of a layout pass for one node, plus the bookkeeping the
/// engine keeps between passes.
///
/// `position` and `dimensions` are the values readers should use: they are
/// rewritten from the raw algorithm output at the end of every pass and are
/// snapped to the pixel grid when the config asks for it. The raw values the
/// algorithm works with are kept separately so rounding never feeds back into
/// later passes.
#[derive(Debug, Clone)]
pub struct LayoutResults {
    /// Left, top, right and bottom offsets relative to the owner.
    pub position: [f32; 4],
    /// Width and height. Undefined until the node is first laid out.
    pub dimensions: [f32; 2],
    pub margin: [f32; 4],
    pub border: [f32; 4],
    pub padding: [f32; 4],
    pub direction: Direction,
    pub had_overflow: bool,
    pub did_use_legacy_flag: bool,
    pub does_legacy_stretch_flag_affect_layout: bool,

    pub(crate) raw_position: [f32; 4],
    pub(crate) raw_dimensions: [f32; 2],
    pub(crate) measured_dimensions: [f32; 2],
    pub(crate) computed_flex_basis: f32,
    pub(crate) computed_flex_basis_generation: u32,
    pub(crate) generation_count: u32,
    /// Generation in which the full algorithm last ran for this node, as
    /// opposed to being answered from the cache.
    pub(crate) computed_generation: u32,
    pub(crate) last_owner_direction: Option<Direction>,
    pub(crate) line_index: usize,
    pub(crate) cache: LayoutCache,
}

impl Default for LayoutResults {
    fn default() -> Self {
        Self {
            position: [0.0; 4],
            dimensions: [UNDEFINED; 2],
            margin: [0.0; 4],
            border: [0.0; 4],
            padding: [0.0; 4],
            direction: Direction::Inherit,
            had_overflow: false,
            did_use_legacy_flag: false,
            does_legacy_stretch_flag_affect_layout: false,
            raw_position: [0.0; 4],
            raw_dimensions: [UNDEFINED; 2],
            measured_dimensions: [UNDEFINED; 2],
            computed_flex_basis: UNDEFINED,
            computed_flex_basis_generation: 0,
            generation_count: 0,
            computed_generation: 0,
            last_owner_direction: None,
            line_index: 0,
            cache: LayoutCache::default(),
        }
    }
}

impl LayoutResults {
    pub fn measured_width(&self) -> f32 {
        self.measured_dimensions[0]
    }

    pub fn measured_height(&self) -> f32 {
        self.measured_dimensions[1]
    }

    pub fn computed_flex_basis(&self) -> f32 {
        self.computed_flex_basis
    }

    pub fn cache(&self) -> &LayoutCache {
        &self.cache
    }

    pub(crate) fn set_raw_position(&mut self, edge: Edge, value: f32) {
        self.raw_position[edge as usize] = value;
    }

    pub(crate) fn raw_position(&self, edge: Edge) -> f32 {
        self.raw_position[edge as usize]
    }

    /// Compares the user-visible output of two layouts.
    pub fn output_equals(&self, other: &LayoutResults) -> bool {
        fn all_equal<const N: usize>(a: &[f32; N], b: &[f32; N]) -> bool {
            a.iter().zip(b.iter()).all(|(x, y)| floats_equal(*x, *y))
        }

        all_equal(&self.position, &other.position)
            && all_equal(&self.dimensions, &other.dimensions)
            && all_equal(&self.margin, &other.margin)
            && all_equal(&self.border, &other.border)
            && all_equal(&self.padding, &other.padding)
            && self.direction == other.direction
            && self.had_overflow == other.had_overflow
    }
}
