//! Callback types a host attaches to nodes.

use flexlay_types::{NodeId, Size};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// How a size passed to a measurement should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeasureMode {
    /// No constraint; the size is NaN.
    Undefined,
    /// The result must be exactly this size.
    Exactly,
    /// The result may be at most this size.
    AtMost,
}

impl fmt::Display for MeasureMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MeasureMode::Undefined => "UNDEFINED",
            MeasureMode::Exactly => "EXACTLY",
            MeasureMode::AtMost => "AT_MOST",
        })
    }
}

/// Measures leaf content: `(width, width_mode, height, height_mode) -> size`.
///
/// Must return defined, non-negative numbers for any axis measured with
/// [`MeasureMode::Exactly`].
pub type MeasureFunc = Arc<dyn Fn(f32, MeasureMode, f32, MeasureMode) -> Size + Send + Sync>;

/// Returns the distance from the top of a node to its baseline, given the
/// node's measured `(width, height)`. Must not return NaN.
pub type BaselineFunc = Arc<dyn Fn(f32, f32) -> f32 + Send + Sync>;

/// Invoked when a node goes from clean to dirty.
pub type DirtiedFunc = Arc<dyn Fn(NodeId) + Send + Sync>;
