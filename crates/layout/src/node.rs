//! The node record and the style resolution rules that only need the node
//! itself.
use crate::axis::AxisExt;
use crate::measure::{BaselineFunc, DirtiedFunc, MeasureFunc};
use crate::results::LayoutResults;
use flexlay_style::{Dimension, Direction, Edge, Edges, FlexDirection, PositionType, Style, Unit, Value};
use flexlay_types::math::{float_max, is_undefined};
use flexlay_types::{ConfigId, NodeId};
use std::fmt;

/// Distinguishes nodes whose size comes from content. Text nodes round
/// their size up on the pixel grid so content is never clipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NodeType {
    #[default]
    Default,
    Text,
}

#[derive(Clone)]
pub struct Node {
    pub(crate) style: Style,
    pub(crate) layout: LayoutResults,
    pub(crate) config: ConfigId,
    pub(crate) children: Vec<NodeId>,
    pub(crate) owner: Option<NodeId>,
    pub(crate) measure: Option<MeasureFunc>,
    pub(crate) baseline: Option<BaselineFunc>,
    pub(crate) dirtied: Option<DirtiedFunc>,
    pub(crate) is_dirty: bool,
    pub(crate) has_new_layout: bool,
    pub(crate) node_type: NodeType,
    pub(crate) is_reference_baseline: bool,
    pub(crate) resolved_dimensions: [Value; 2],
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Node")
            .field("style", &self.style)
            .field("layout", &self.layout)
            .field("config", &self.config)
            .field("children", &self.children)
            .field("owner", &self.owner)
            .field("measure", &self.measure.is_some())
            .field("baseline", &self.baseline.is_some())
            .field("is_dirty", &self.is_dirty)
            .field("has_new_layout", &self.has_new_layout)
            .field("node_type", &self.node_type)
            .finish()
    }
}

impl Node {
    pub(crate) fn new(config: ConfigId, web_defaults: bool) -> Self {
        let style = if web_defaults { Style::web_defaults() } else { Style::default() };
        Self {
            style,
            layout: LayoutResults::default(),
            config,
            children: Vec::new(),
            owner: None,
            measure: None,
            baseline: None,
            dirtied: None,
            is_dirty: false,
            has_new_layout: true,
            node_type: NodeType::Default,
            is_reference_baseline: false,
            resolved_dimensions: [Value::AUTO; 2],
        }
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    pub fn layout(&self) -> &LayoutResults {
        &self.layout
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn owner(&self) -> Option<NodeId> {
        self.owner
    }

    pub fn config(&self) -> ConfigId {
        self.config
    }

    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    pub fn has_measure_func(&self) -> bool {
        self.measure.is_some()
    }

    pub fn has_baseline_func(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    // --- Dimensions ---

    /// Collapses `min == max` into the dimension itself.
    pub(crate) fn resolve_dimension(&mut self) {
        for dim in [Dimension::Width, Dimension::Height] {
            let max = self.style.max_dimension(dim);
            self.resolved_dimensions[dim.index()] = if !max.is_undefined() && max == self.style.min_dimension(dim) {
                max
            } else {
                self.style.dimension(dim)
            };
        }
    }

    pub(crate) fn resolved_dimension(&self, dim: Dimension) -> Value {
        self.resolved_dimensions[dim.index()]
    }

    pub(crate) fn resolve_direction(&self, owner_direction: Direction) -> Direction {
        match self.style.direction {
            Direction::Inherit if owner_direction != Direction::Inherit => owner_direction,
            Direction::Inherit => Direction::Ltr,
            direction => direction,
        }
    }

    /// A style size along `axis` that the algorithm may treat as definite.
    pub(crate) fn is_style_dim_defined(&self, axis: FlexDirection, owner_size: f32) -> bool {
        let resolved = self.resolved_dimension(axis.dimension());
        match resolved.unit {
            Unit::Auto | Unit::Undefined => false,
            Unit::Point => is_undefined(resolved.value) || resolved.value >= 0.0,
            Unit::Percent => {
                is_undefined(resolved.value) || (resolved.value >= 0.0 && !is_undefined(owner_size))
            }
        }
    }

    pub(crate) fn is_layout_dim_defined(&self, axis: FlexDirection) -> bool {
        let value = self.layout.measured_dimensions[axis.dimension().index()];
        !is_undefined(value) && value >= 0.0
    }

    pub(crate) fn measured_dimension(&self, dim: Dimension) -> f32 {
        self.layout.measured_dimensions[dim.index()]
    }

    pub(crate) fn dim_with_margin(&self, axis: FlexDirection, width_size: f32) -> f32 {
        self.measured_dimension(axis.dimension())
            + self.leading_margin(axis, width_size)
            + self.trailing_margin(axis, width_size)
    }

    /// Clamps `value` into the node's min/max range for `axis`.
    pub(crate) fn bound_axis_within_min_max(&self, axis: FlexDirection, value: f32, axis_size: f32) -> f32 {
        let dim = axis.dimension();
        let min = self.style.min_dimension(dim).resolve(axis_size);
        let max = self.style.max_dimension(dim).resolve(axis_size);
        if !is_undefined(max) && max >= 0.0 && value > max {
            return max;
        }
        if !is_undefined(min) && min >= 0.0 && value < min {
            return min;
        }
        value
    }

    /// Like [`Node::bound_axis_within_min_max`], but never smaller than the
    /// node's own padding and border.
    pub(crate) fn bound_axis(&self, axis: FlexDirection, value: f32, axis_size: f32, width_size: f32) -> f32 {
        float_max(
            self.bound_axis_within_min_max(axis, value, axis_size),
            self.padding_and_border_for_axis(axis, width_size),
        )
    }

    // --- Flex factors ---

    pub(crate) fn resolve_flex_grow(&self) -> f32 {
        if self.owner.is_none() {
            return 0.0;
        }
        if let Some(grow) = self.style.flex_grow {
            return grow;
        }
        match self.style.flex {
            Some(flex) if flex > 0.0 => flex,
            _ => 0.0,
        }
    }

    pub(crate) fn resolve_flex_shrink(&self, web_defaults: bool) -> f32 {
        if self.owner.is_none() {
            return 0.0;
        }
        if let Some(shrink) = self.style.flex_shrink {
            return shrink;
        }
        if !web_defaults {
            if let Some(flex) = self.style.flex {
                if flex < 0.0 {
                    return -flex;
                }
            }
        }
        if web_defaults { 1.0 } else { 0.0 }
    }

    pub(crate) fn resolve_flex_basis(&self, web_defaults: bool) -> Value {
        let basis = self.style.flex_basis;
        if basis.unit != Unit::Auto && basis.unit != Unit::Undefined {
            return basis;
        }
        match self.style.flex {
            Some(flex) if flex > 0.0 => {
                if web_defaults {
                    Value::AUTO
                } else {
                    Value::ZERO
                }
            }
            _ => Value::AUTO,
        }
    }

    pub(crate) fn is_flexible(&self, web_defaults: bool) -> bool {
        self.style.position_type == PositionType::Relative
            && (self.resolve_flex_grow() != 0.0 || self.resolve_flex_shrink(web_defaults) != 0.0)
    }

    // --- Edges ---

    /// Row axes consult an explicitly set `start` before the physical edge.
    fn logical_leading(edges: &Edges, axis: FlexDirection, default: Value) -> Value {
        if axis.is_row() && !edges[Edge::Start].is_undefined() {
            return edges[Edge::Start];
        }
        edges.computed(axis.leading_edge(), default)
    }

    fn logical_trailing(edges: &Edges, axis: FlexDirection, default: Value) -> Value {
        if axis.is_row() && !edges[Edge::End].is_undefined() {
            return edges[Edge::End];
        }
        edges.computed(axis.trailing_edge(), default)
    }

    /// Insets also let the shorthands stand in for `start` and `end`.
    fn inset_leading(&self, axis: FlexDirection) -> Value {
        let edges = &self.style.position;
        if axis.is_row() {
            let start = edges.computed(Edge::Start, Value::UNDEFINED);
            if !start.is_undefined() {
                return start;
            }
        }
        edges.computed(axis.leading_edge(), Value::UNDEFINED)
    }

    fn inset_trailing(&self, axis: FlexDirection) -> Value {
        let edges = &self.style.position;
        if axis.is_row() {
            let end = edges.computed(Edge::End, Value::UNDEFINED);
            if !end.is_undefined() {
                return end;
            }
        }
        edges.computed(axis.trailing_edge(), Value::UNDEFINED)
    }

    /// The leading margin as specified, `auto` included.
    pub(crate) fn margin_leading_value(&self, axis: FlexDirection) -> Value {
        Self::logical_leading(&self.style.margin, axis, Value::UNDEFINED)
    }

    pub(crate) fn margin_trailing_value(&self, axis: FlexDirection) -> Value {
        Self::logical_trailing(&self.style.margin, axis, Value::UNDEFINED)
    }

    pub(crate) fn leading_margin(&self, axis: FlexDirection, width_size: f32) -> f32 {
        Self::logical_leading(&self.style.margin, axis, Value::ZERO).resolve_margin(width_size)
    }

    pub(crate) fn trailing_margin(&self, axis: FlexDirection, width_size: f32) -> f32 {
        Self::logical_trailing(&self.style.margin, axis, Value::ZERO).resolve_margin(width_size)
    }

    pub(crate) fn margin_for_axis(&self, axis: FlexDirection, width_size: f32) -> f32 {
        self.leading_margin(axis, width_size) + self.trailing_margin(axis, width_size)
    }

    pub(crate) fn leading_padding(&self, axis: FlexDirection, width_size: f32) -> f32 {
        let value = Self::logical_leading(&self.style.padding, axis, Value::ZERO).resolve(width_size);
        float_max(value, 0.0)
    }

    pub(crate) fn trailing_padding(&self, axis: FlexDirection, width_size: f32) -> f32 {
        let value = Self::logical_trailing(&self.style.padding, axis, Value::ZERO).resolve(width_size);
        float_max(value, 0.0)
    }

    /// Borders only use the point payload; percentages are not supported.
    pub(crate) fn leading_border(&self, axis: FlexDirection) -> f32 {
        float_max(Self::logical_leading(&self.style.border, axis, Value::ZERO).value, 0.0)
    }

    pub(crate) fn trailing_border(&self, axis: FlexDirection) -> f32 {
        float_max(Self::logical_trailing(&self.style.border, axis, Value::ZERO).value, 0.0)
    }

    pub(crate) fn leading_padding_and_border(&self, axis: FlexDirection, width_size: f32) -> f32 {
        self.leading_padding(axis, width_size) + self.leading_border(axis)
    }

    pub(crate) fn trailing_padding_and_border(&self, axis: FlexDirection, width_size: f32) -> f32 {
        self.trailing_padding(axis, width_size) + self.trailing_border(axis)
    }

    pub(crate) fn padding_and_border_for_axis(&self, axis: FlexDirection, width_size: f32) -> f32 {
        self.leading_padding_and_border(axis, width_size) + self.trailing_padding_and_border(axis, width_size)
    }

    // --- Positions ---

    pub(crate) fn is_leading_position_defined(&self, axis: FlexDirection) -> bool {
        !self.inset_leading(axis).is_undefined()
    }

    pub(crate) fn is_trailing_position_defined(&self, axis: FlexDirection) -> bool {
        !self.inset_trailing(axis).is_undefined()
    }

    /// Leading inset, `0` when unset.
    pub(crate) fn leading_position(&self, axis: FlexDirection, axis_size: f32) -> f32 {
        let value = self.inset_leading(axis);
        if value.is_undefined() { 0.0 } else { value.resolve(axis_size) }
    }

    pub(crate) fn trailing_position(&self, axis: FlexDirection, axis_size: f32) -> f32 {
        let value = self.inset_trailing(axis);
        if value.is_undefined() { 0.0 } else { value.resolve(axis_size) }
    }

    /// Offset applied to a relatively positioned node: the leading inset if
    /// set, otherwise the negated trailing inset.
    pub(crate) fn relative_position(&self, axis: FlexDirection, axis_size: f32) -> f32 {
        if self.is_leading_position_defined(axis) {
            return self.leading_position(axis, axis_size);
        }
        let trailing = self.trailing_position(axis, axis_size);
        if is_undefined(trailing) { trailing } else { -trailing }
    }
}
