//! Flexbox layout over an arena of nodes.
//!
//! Build a tree with [`LayoutTree`], set style properties through its typed
//! setters, attach measure functions to content leaves, then call
//! [`LayoutTree::calculate_layout`] and read the boxes back.
pub mod document;
pub mod error;

pub use document::NodeDescription;
pub use error::Error;

pub use flexlay_layout::{
    BaselineFunc, CloneNodeFunc, Config, DirtiedFunc, ExperimentalFeature, LayoutEdge, LayoutError,
    LayoutResults, LayoutSnapshot, LayoutStats, LayoutTree, LogLevel, Logger, MeasureFunc, MeasureMode,
    NodeType, PrintOptions, TreeError,
};
pub use flexlay_style::{
    Align, Dimension, Direction, Display, Edge, FlexDirection, Justify, Overflow, PositionType, Style, Unit,
    Value, Wrap,
};
pub use flexlay_types::{ConfigId, NodeId, Size, UNDEFINED};
