//! Typed style accessors on [`LayoutTree`].
//!
//! Every setter is a no-op when the value does not change. Otherwise it
//! writes the value and marks the node and all of its ancestors dirty.
use crate::tree::LayoutTree;
use crate::TreeError;
use flexlay_style::{Align, Direction, Display, Edge, FlexDirection, Justify, Overflow, PositionType, Style, Value, Wrap};
use flexlay_types::NodeId;
use flexlay_types::math::is_undefined;

macro_rules! enum_property {
    ($getter:ident, $setter:ident, $field:ident: $ty:ty) => {
        pub fn $getter(&self, node: NodeId) -> Result<$ty, TreeError> {
            Ok(self.node(node)?.style.$field)
        }

        pub fn $setter(&mut self, node: NodeId, value: $ty) -> Result<(), TreeError> {
            let style = &mut self.node_mut(node)?.style;
            if style.$field == value {
                return Ok(());
            }
            style.$field = value;
            self.mark_dirty_and_propagate(node);
            Ok(())
        }
    };
}

/// Optional factors. NaN unsets the property.
macro_rules! float_property {
    ($getter:ident, $setter:ident, $field:ident) => {
        pub fn $getter(&self, node: NodeId) -> Result<Option<f32>, TreeError> {
            Ok(self.node(node)?.style.$field)
        }

        pub fn $setter(&mut self, node: NodeId, value: f32) -> Result<(), TreeError> {
            let value = if is_undefined(value) { None } else { Some(value) };
            let style = &mut self.node_mut(node)?.style;
            if style.$field == value {
                return Ok(());
            }
            style.$field = value;
            self.mark_dirty_and_propagate(node);
            Ok(())
        }
    };
}

/// Length properties: a getter, a point setter and a percent setter, plus an
/// `auto` setter where the property accepts it.
macro_rules! value_property {
    ($getter:ident, $points:ident, $percent:ident, $($path:ident).+) => {
        pub fn $getter(&self, node: NodeId) -> Result<Value, TreeError> {
            Ok(self.node(node)?.style.$($path).+)
        }

        pub fn $points(&mut self, node: NodeId, points: f32) -> Result<(), TreeError> {
            self.write_style(node, Value::points(points), |style| &mut style.$($path).+)
        }

        pub fn $percent(&mut self, node: NodeId, percent: f32) -> Result<(), TreeError> {
            self.write_style(node, Value::percent(percent), |style| &mut style.$($path).+)
        }
    };
    ($getter:ident, $points:ident, $percent:ident, $auto:ident, $($path:ident).+) => {
        value_property!($getter, $points, $percent, $($path).+);

        pub fn $auto(&mut self, node: NodeId) -> Result<(), TreeError> {
            self.write_style(node, Value::AUTO, |style| &mut style.$($path).+)
        }
    };
}

impl LayoutTree {
    fn write_style<F>(&mut self, node: NodeId, value: Value, slot: F) -> Result<(), TreeError>
    where
        F: for<'a> FnOnce(&'a mut Style) -> &'a mut Value,
    {
        let current = slot(&mut self.node_mut(node)?.style);
        if *current == value {
            return Ok(());
        }
        *current = value;
        self.mark_dirty_and_propagate(node);
        Ok(())
    }

    /// Replaces the whole style record.
    pub fn set_style(&mut self, node: NodeId, style: Style) -> Result<(), TreeError> {
        let entry = self.node_mut(node)?;
        if entry.style == style {
            return Ok(());
        }
        entry.style = style;
        self.mark_dirty_and_propagate(node);
        Ok(())
    }

    /// Copies the style of `src` onto `dst`.
    pub fn copy_style(&mut self, dst: NodeId, src: NodeId) -> Result<(), TreeError> {
        let style = self.node(src)?.style.clone();
        self.set_style(dst, style)
    }

    enum_property!(direction, set_direction, direction: Direction);
    enum_property!(flex_direction, set_flex_direction, flex_direction: FlexDirection);
    enum_property!(justify_content, set_justify_content, justify_content: Justify);
    enum_property!(align_content, set_align_content, align_content: Align);
    enum_property!(align_items, set_align_items, align_items: Align);
    enum_property!(align_self, set_align_self, align_self: Align);
    enum_property!(position_type, set_position_type, position_type: PositionType);
    enum_property!(flex_wrap, set_flex_wrap, flex_wrap: Wrap);
    enum_property!(overflow, set_overflow, overflow: Overflow);
    enum_property!(display, set_display, display: Display);

    float_property!(flex, set_flex, flex);
    float_property!(flex_grow, set_flex_grow, flex_grow);
    float_property!(flex_shrink, set_flex_shrink, flex_shrink);
    float_property!(aspect_ratio, set_aspect_ratio, aspect_ratio);

    value_property!(flex_basis, set_flex_basis, set_flex_basis_percent, set_flex_basis_auto, flex_basis);
    value_property!(width, set_width, set_width_percent, set_width_auto, dimensions.width);
    value_property!(height, set_height, set_height_percent, set_height_auto, dimensions.height);
    value_property!(min_width, set_min_width, set_min_width_percent, min_dimensions.width);
    value_property!(min_height, set_min_height, set_min_height_percent, min_dimensions.height);
    value_property!(max_width, set_max_width, set_max_width_percent, max_dimensions.width);
    value_property!(max_height, set_max_height, set_max_height_percent, max_dimensions.height);

    pub fn position(&self, node: NodeId, edge: Edge) -> Result<Value, TreeError> {
        Ok(self.node(node)?.style.position[edge])
    }

    pub fn set_position(&mut self, node: NodeId, edge: Edge, points: f32) -> Result<(), TreeError> {
        self.write_style(node, Value::points(points), |style| &mut style.position[edge])
    }

    pub fn set_position_percent(&mut self, node: NodeId, edge: Edge, percent: f32) -> Result<(), TreeError> {
        self.write_style(node, Value::percent(percent), |style| &mut style.position[edge])
    }

    pub fn margin(&self, node: NodeId, edge: Edge) -> Result<Value, TreeError> {
        Ok(self.node(node)?.style.margin[edge])
    }

    pub fn set_margin(&mut self, node: NodeId, edge: Edge, points: f32) -> Result<(), TreeError> {
        self.write_style(node, Value::points(points), |style| &mut style.margin[edge])
    }

    pub fn set_margin_percent(&mut self, node: NodeId, edge: Edge, percent: f32) -> Result<(), TreeError> {
        self.write_style(node, Value::percent(percent), |style| &mut style.margin[edge])
    }

    /// An `auto` margin absorbs free space during placement.
    pub fn set_margin_auto(&mut self, node: NodeId, edge: Edge) -> Result<(), TreeError> {
        self.write_style(node, Value::AUTO, |style| &mut style.margin[edge])
    }

    pub fn padding(&self, node: NodeId, edge: Edge) -> Result<Value, TreeError> {
        Ok(self.node(node)?.style.padding[edge])
    }

    pub fn set_padding(&mut self, node: NodeId, edge: Edge, points: f32) -> Result<(), TreeError> {
        self.write_style(node, Value::points(points), |style| &mut style.padding[edge])
    }

    pub fn set_padding_percent(&mut self, node: NodeId, edge: Edge, percent: f32) -> Result<(), TreeError> {
        self.write_style(node, Value::percent(percent), |style| &mut style.padding[edge])
    }

    /// Border width in points, NaN when unset.
    pub fn border(&self, node: NodeId, edge: Edge) -> Result<f32, TreeError> {
        Ok(self.node(node)?.style.border[edge].resolve(0.0))
    }

    pub fn set_border(&mut self, node: NodeId, edge: Edge, points: f32) -> Result<(), TreeError> {
        self.write_style(node, Value::points(points), |style| &mut style.border[edge])
    }
}

#[cfg(test)]
mod tests {
    use crate::tree::LayoutTree;
    use flexlay_style::{Edge, FlexDirection, Unit, Value};

    #[test]
    fn test_setter_marks_dirty_only_on_change() {
        let mut tree = LayoutTree::new();
        let root = tree.new_node();
        let child = tree.new_node();
        tree.insert_child(root, child, 0).unwrap();
        tree.nodes[root.index()].is_dirty = false;
        tree.nodes[child.index()].is_dirty = false;

        tree.set_flex_direction(child, FlexDirection::Column).unwrap();
        assert!(!tree.is_dirty(child).unwrap());

        tree.set_flex_direction(child, FlexDirection::Row).unwrap();
        assert!(tree.is_dirty(child).unwrap());
        assert!(tree.is_dirty(root).unwrap());
    }

    #[test]
    fn test_nan_unsets_values() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();
        tree.set_width(node, 10.0).unwrap();
        tree.set_width(node, f32::NAN).unwrap();
        assert_eq!(tree.width(node).unwrap().unit, Unit::Undefined);

        tree.set_flex_grow(node, 2.0).unwrap();
        assert_eq!(tree.flex_grow(node).unwrap(), Some(2.0));
        tree.set_flex_grow(node, f32::NAN).unwrap();
        assert_eq!(tree.flex_grow(node).unwrap(), None);
    }

    #[test]
    fn test_unit_change_is_a_change() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();
        tree.set_width(node, 50.0).unwrap();
        tree.set_width_percent(node, 50.0).unwrap();
        assert_eq!(tree.width(node).unwrap(), Value::percent(50.0));
        tree.set_width_auto(node).unwrap();
        assert!(tree.width(node).unwrap().is_auto());
    }

    #[test]
    fn test_edge_setters() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();
        tree.set_margin_auto(node, Edge::Left).unwrap();
        tree.set_padding_percent(node, Edge::All, 5.0).unwrap();
        tree.set_border(node, Edge::Top, 2.0).unwrap();
        tree.set_position(node, Edge::Start, 4.0).unwrap();

        assert!(tree.margin(node, Edge::Left).unwrap().is_auto());
        assert_eq!(tree.padding(node, Edge::All).unwrap(), Value::percent(5.0));
        assert_eq!(tree.border(node, Edge::Top).unwrap(), 2.0);
        assert!(tree.border(node, Edge::Bottom).unwrap().is_nan());
        assert_eq!(tree.position(node, Edge::Start).unwrap(), Value::points(4.0));
    }

    #[test]
    fn test_setters_reject_unknown_nodes() {
        let mut tree = LayoutTree::new();
        let node = tree.new_node();
        tree.free(node).unwrap();
        assert!(tree.set_width(node, 1.0).is_err());
        assert!(tree.flex_direction(node).is_err());
    }
}
