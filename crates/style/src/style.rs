//! The per-node style record.
use crate::dimension::{Dimension, Dimensions, Edge, Edges, Value};
use crate::flex::{Align, Direction, Display, FlexDirection, Justify, Overflow, PositionType, Wrap};
use serde::{Deserialize, Serialize};

/// Input style properties for one node.
///
/// Every enumerated property defaults independently. Lengths default to
/// undefined, except `flex_basis` and `dimensions` which default to `auto`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Style {
    pub direction: Direction,
    pub flex_direction: FlexDirection,
    pub justify_content: Justify,
    pub align_content: Align,
    pub align_items: Align,
    pub align_self: Align,
    pub position_type: PositionType,
    pub flex_wrap: Wrap,
    pub overflow: Overflow,
    pub display: Display,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_grow: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_shrink: Option<f32>,
    pub flex_basis: Value,
    pub margin: Edges,
    pub position: Edges,
    pub padding: Edges,
    pub border: Edges,
    pub dimensions: Dimensions,
    pub min_dimensions: Dimensions,
    pub max_dimensions: Dimensions,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<f32>,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            direction: Direction::Inherit,
            flex_direction: FlexDirection::Column,
            justify_content: Justify::FlexStart,
            align_content: Align::FlexStart,
            align_items: Align::Stretch,
            align_self: Align::Auto,
            position_type: PositionType::Relative,
            flex_wrap: Wrap::NoWrap,
            overflow: Overflow::Visible,
            display: Display::Flex,
            flex: None,
            flex_grow: None,
            flex_shrink: None,
            flex_basis: Value::AUTO,
            margin: Edges::default(),
            position: Edges::default(),
            padding: Edges::default(),
            border: Edges::default(),
            dimensions: Dimensions::splat(Value::AUTO),
            min_dimensions: Dimensions::default(),
            max_dimensions: Dimensions::default(),
            aspect_ratio: None,
        }
    }
}

impl Style {
    /// Defaults that match browser flexbox rather than the native ones:
    /// row direction and stretched lines.
    pub fn web_defaults() -> Self {
        Self {
            flex_direction: FlexDirection::Row,
            align_content: Align::Stretch,
            ..Self::default()
        }
    }

    pub fn dimension(&self, dim: Dimension) -> Value {
        self.dimensions[dim]
    }

    pub fn min_dimension(&self, dim: Dimension) -> Value {
        self.min_dimensions[dim]
    }

    pub fn max_dimension(&self, dim: Dimension) -> Value {
        self.max_dimensions[dim]
    }

    pub fn margin(&self, edge: Edge) -> Value {
        self.margin[edge]
    }

    pub fn padding(&self, edge: Edge) -> Value {
        self.padding[edge]
    }

    pub fn border(&self, edge: Edge) -> Value {
        self.border[edge]
    }

    pub fn position(&self, edge: Edge) -> Value {
        self.position[edge]
    }
}
