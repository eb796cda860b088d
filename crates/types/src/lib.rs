pub mod geometry;
pub mod ids;
pub mod math;

pub use geometry::Size;
pub use ids::{ConfigId, NodeId};
pub use math::{UNDEFINED, float_max, float_min, floats_equal, is_undefined, round_value_to_pixel_grid};
