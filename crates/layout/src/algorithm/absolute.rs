//! Absolutely positioned children.
use super::LayoutRequest;
use crate::axis::AxisExt;
use crate::measure::MeasureMode;
use crate::tree::LayoutTree;
use crate::LayoutError;
use flexlay_style::{Align, Dimension, Direction, FlexDirection, Justify, Wrap};
use flexlay_types::NodeId;
use flexlay_types::math::is_undefined;

impl LayoutTree {
    /// Sizes an absolute child from its style or its insets, measures
    /// whatever is still unknown, then places it against the container's
    /// padding box.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn layout_absolute_child(
        &mut self,
        id: NodeId,
        child: NodeId,
        width: f32,
        width_mode: MeasureMode,
        height: f32,
        direction: Direction,
        depth: usize,
    ) -> Result<(), LayoutError> {
        let node = self.node_at(id);
        let main_axis = node.style.flex_direction.resolve(direction);
        let cross_axis = main_axis.cross(direction);
        let is_main_axis_row = main_axis.is_row();
        let container = node.layout.measured_dimensions;

        let mut child_width = f32::NAN;
        let mut child_height = f32::NAN;

        let child_node = self.node_at(child);
        let margin_row = child_node.margin_for_axis(FlexDirection::Row, width);
        let margin_column = child_node.margin_for_axis(FlexDirection::Column, width);

        if child_node.is_style_dim_defined(FlexDirection::Row, width) {
            child_width = child_node.resolved_dimension(Dimension::Width).resolve(width) + margin_row;
        } else if child_node.is_leading_position_defined(FlexDirection::Row)
            && child_node.is_trailing_position_defined(FlexDirection::Row)
        {
            // Stretched between the left and right insets.
            child_width = container[0]
                - (node.leading_border(FlexDirection::Row) + node.trailing_border(FlexDirection::Row))
                - (child_node.leading_position(FlexDirection::Row, width)
                    + child_node.trailing_position(FlexDirection::Row, width));
            child_width = child_node.bound_axis(FlexDirection::Row, child_width, width, width);
        }

        if child_node.is_style_dim_defined(FlexDirection::Column, height) {
            child_height = child_node.resolved_dimension(Dimension::Height).resolve(height) + margin_column;
        } else if child_node.is_leading_position_defined(FlexDirection::Column)
            && child_node.is_trailing_position_defined(FlexDirection::Column)
        {
            child_height = container[1]
                - (node.leading_border(FlexDirection::Column) + node.trailing_border(FlexDirection::Column))
                - (child_node.leading_position(FlexDirection::Column, height)
                    + child_node.trailing_position(FlexDirection::Column, height));
            child_height = child_node.bound_axis(FlexDirection::Column, child_height, height, width);
        }

        // With exactly one size known the aspect ratio supplies the other.
        if is_undefined(child_width) ^ is_undefined(child_height) {
            if let Some(ratio) = child_node.style.aspect_ratio {
                if is_undefined(child_width) {
                    child_width = margin_row + (child_height - margin_column) * ratio;
                } else {
                    child_height = margin_column + (child_width - margin_row) / ratio;
                }
            }
        }

        if is_undefined(child_width) || is_undefined(child_height) {
            let mut child_width_mode = if is_undefined(child_width) {
                MeasureMode::Undefined
            } else {
                MeasureMode::Exactly
            };
            let child_height_mode = if is_undefined(child_height) {
                MeasureMode::Undefined
            } else {
                MeasureMode::Exactly
            };

            // Let content such as text wrap at the container's width.
            if !is_main_axis_row
                && is_undefined(child_width)
                && width_mode != MeasureMode::Undefined
                && !is_undefined(width)
                && width > 0.0
            {
                child_width = width;
                child_width_mode = MeasureMode::AtMost;
            }

            let request = LayoutRequest {
                available_width: child_width,
                available_height: child_height,
                owner_direction: direction,
                width_mode: child_width_mode,
                height_mode: child_height_mode,
                owner_width: child_width,
                owner_height: child_height,
                perform_layout: false,
            };
            self.layout_node(child, request, "abs-measure", depth + 1)?;

            let child_node = self.node_at(child);
            child_width = child_node.layout.measured_dimensions[0]
                + child_node.margin_for_axis(FlexDirection::Row, width);
            child_height = child_node.layout.measured_dimensions[1]
                + child_node.margin_for_axis(FlexDirection::Column, width);
        }

        let request = LayoutRequest {
            available_width: child_width,
            available_height: child_height,
            owner_direction: direction,
            width_mode: MeasureMode::Exactly,
            height_mode: MeasureMode::Exactly,
            owner_width: child_width,
            owner_height: child_height,
            perform_layout: true,
        };
        self.layout_node(child, request, "abs-layout", depth + 1)?;

        let node = self.node_at(id);
        let child_node = self.node_at(child);
        let justify = node.style.justify_content;
        let wrap_reverse = node.style.flex_wrap == Wrap::WrapReverse;
        let align = self.align_item(id, child);

        let main_index = main_axis.dimension().index();
        let cross_index = cross_axis.dimension().index();
        let child_size = child_node.layout.measured_dimensions;

        let main_position = if child_node.is_trailing_position_defined(main_axis)
            && !child_node.is_leading_position_defined(main_axis)
        {
            Some(
                container[main_index]
                    - child_size[main_index]
                    - node.trailing_border(main_axis)
                    - child_node.trailing_margin(main_axis, width)
                    - child_node.trailing_position(main_axis, if is_main_axis_row { width } else { height }),
            )
        } else if !child_node.is_leading_position_defined(main_axis) && justify == Justify::Center {
            Some((container[main_index] - child_size[main_index]) / 2.0)
        } else if !child_node.is_leading_position_defined(main_axis) && justify == Justify::FlexEnd {
            Some(container[main_index] - child_size[main_index])
        } else {
            None
        };

        let cross_position = if child_node.is_trailing_position_defined(cross_axis)
            && !child_node.is_leading_position_defined(cross_axis)
        {
            Some(
                container[cross_index]
                    - child_size[cross_index]
                    - node.trailing_border(cross_axis)
                    - child_node.trailing_margin(cross_axis, width)
                    - child_node.trailing_position(cross_axis, if is_main_axis_row { height } else { width }),
            )
        } else if !child_node.is_leading_position_defined(cross_axis) && align == Align::Center {
            Some((container[cross_index] - child_size[cross_index]) / 2.0)
        } else if !child_node.is_leading_position_defined(cross_axis)
            && ((align == Align::FlexEnd) ^ wrap_reverse)
        {
            Some(container[cross_index] - child_size[cross_index])
        } else {
            None
        };

        let layout = &mut self.node_at_mut(child).layout;
        if let Some(position) = main_position {
            layout.set_raw_position(main_axis.leading_edge(), position);
        }
        if let Some(position) = cross_position {
            layout.set_raw_position(cross_axis.leading_edge(), position);
        }
        Ok(())
    }
}
