use flexlay_types::{ConfigId, NodeId};
use thiserror::Error;

/// A call that would break a tree invariant. The tree is left unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TreeError {
    #[error("Node {0} does not exist in this tree.")]
    InvalidNode(NodeId),
    #[error("Config {0} does not exist in this tree.")]
    InvalidConfig(ConfigId),
    #[error("Child {child} already has owner {owner}, it must be removed first.")]
    ChildHasOwner { child: NodeId, owner: NodeId },
    #[error("Cannot add child to {0}: nodes with measure functions cannot have children.")]
    OwnerHasMeasureFunc(NodeId),
    #[error("Inserting {child} under {owner} would create a cycle.")]
    WouldCreateCycle { owner: NodeId, child: NodeId },
    #[error("Cannot set measure function on {0}: nodes with measure functions cannot have children.")]
    MeasureFuncOnNodeWithChildren(NodeId),
    #[error("Only leaf nodes with custom measure functions should manually mark themselves as dirty ({0}).")]
    MarkDirtyWithoutMeasureFunc(NodeId),
    #[error("Child index {index} is out of bounds for a node with {len} children.")]
    IndexOutOfBounds { index: usize, len: usize },
    #[error("Node {child} is not a child of {owner}.")]
    ChildNotFound { owner: NodeId, child: NodeId },
    #[error("Cannot reset {0}: it still has children or an owner attached.")]
    ResetNonLeaf(NodeId),
    #[error("Cannot free {node}: it is still listed as a child of {sharer}.")]
    NodeStillShared { node: NodeId, sharer: NodeId },
    #[error("Config {0} is still referenced by a node.")]
    ConfigInUse(ConfigId),
    #[error("Scale factor should not be less than zero, got {0}.")]
    InvalidScaleFactor(f32),
}

/// A failure during [`LayoutTree::calculate_layout`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("Baseline function of {0} returned NaN.")]
    BaselineIsNaN(NodeId),
    #[error("Measure function of {node} returned NaN for its {axis}.")]
    MeasureReturnedNaN { node: NodeId, axis: &'static str },
}

pub mod algorithm;
pub(crate) mod axis;
pub mod cache;
pub mod config;
pub mod measure;
pub mod node;
pub mod output;
pub mod perf;
pub mod print;
pub mod results;
pub mod setters;
pub mod tree;

pub use self::cache::{CachedMeasurement, LayoutCache, MAX_CACHED_MEASUREMENTS};
pub use self::config::{CloneNodeFunc, Config, ExperimentalFeature, LogLevel, Logger};
pub use self::measure::{BaselineFunc, DirtiedFunc, MeasureFunc, MeasureMode};
pub use self::node::{Node, NodeType};
pub use self::output::{LayoutEdge, LayoutSnapshot};
pub use self::perf::LayoutStats;
pub use self::print::PrintOptions;
pub use self::results::LayoutResults;
pub use self::tree::LayoutTree;

#[cfg(test)]
mod algorithm_test;
#[cfg(test)]
mod test_utils;
