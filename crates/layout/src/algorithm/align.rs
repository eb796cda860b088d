//! Cross-axis placement: items within a line, then lines within the
//! container.
use super::{FlexContext, FlexLine, LayoutRequest};
use crate::axis::AxisExt;
use crate::measure::MeasureMode;
use crate::tree::LayoutTree;
use crate::LayoutError;
use flexlay_style::{Align, Dimension, Display, Edge, FlexDirection, PositionType, Unit};
use flexlay_types::NodeId;
use flexlay_types::math::{float_max, floats_equal, is_undefined};

impl LayoutTree {
    /// Baseline alignment applies to row containers where the container or
    /// one of its in-flow children asks for it.
    pub(crate) fn is_baseline_layout(&self, id: NodeId) -> bool {
        let node = self.node_at(id);
        if node.style.flex_direction.is_column() {
            return false;
        }
        if node.style.align_items == Align::Baseline {
            return true;
        }
        node.children.iter().any(|&child| {
            let style = &self.node_at(child).style;
            style.position_type == PositionType::Relative && style.align_self == Align::Baseline
        })
    }

    /// Aligns every item of one line along the cross axis, stretching items
    /// that ask for it.
    #[allow(clippy::too_many_arguments)]
    pub(super) fn align_line_items(
        &mut self,
        id: NodeId,
        line: &FlexLine,
        start: usize,
        ctx: &FlexContext,
        total_line_cross_dim: f32,
        container_cross_axis: f32,
        leading_padding_and_border_cross: f32,
        depth: usize,
    ) -> Result<(), LayoutError> {
        let cross_axis = ctx.cross_axis;
        let main_axis = ctx.main_axis;
        let cross_edge = cross_axis.leading_edge();
        let node = self.node_at(id);
        let leading_border_cross = node.leading_border(cross_axis);
        let children = node.children[start..line.end_of_line_index].to_vec();

        for child in children {
            let child_node = self.node_at(child);
            if child_node.style.display == Display::None {
                continue;
            }

            if child_node.style.position_type == PositionType::Absolute {
                // Insets win; without one the item sits after the border
                // and its margin.
                let leading_margin = child_node.leading_margin(cross_axis, ctx.available_inner_width);
                let defined = child_node.is_leading_position_defined(cross_axis);
                let mut position = f32::NAN;
                if defined {
                    position = child_node.leading_position(cross_axis, ctx.available_inner_cross_dim)
                        + leading_border_cross
                        + leading_margin;
                }
                if !defined || is_undefined(position) {
                    position = leading_border_cross + leading_margin;
                }
                self.node_at_mut(child).layout.set_raw_position(cross_edge, position);
                continue;
            }

            let mut leading_cross_dim = leading_padding_and_border_cross;
            let align = self.align_item(id, child);
            let leading_auto = child_node.margin_leading_value(cross_axis).unit == Unit::Auto;
            let trailing_auto = child_node.margin_trailing_value(cross_axis).unit == Unit::Auto;

            if align == Align::Stretch && !leading_auto && !trailing_auto {
                // A definite cross size is never stretched.
                if !child_node.is_style_dim_defined(cross_axis, ctx.available_inner_cross_dim) {
                    let mut child_main_size = child_node.layout.measured_dimensions[main_axis.dimension().index()];
                    let mut child_cross_size = match child_node.style.aspect_ratio {
                        Some(ratio) => {
                            child_node.margin_for_axis(cross_axis, ctx.available_inner_width)
                                + if ctx.is_main_axis_row {
                                    child_main_size / ratio
                                } else {
                                    child_main_size * ratio
                                }
                        }
                        None => line.cross_dim,
                    };
                    child_main_size += child_node.margin_for_axis(main_axis, ctx.available_inner_width);

                    let mut child_main_mode = MeasureMode::Exactly;
                    let mut child_cross_mode = MeasureMode::Exactly;
                    self.constrain_max_size_for_mode(
                        child,
                        main_axis,
                        ctx.available_inner_main_dim,
                        ctx.available_inner_width,
                        &mut child_main_mode,
                        &mut child_main_size,
                    );
                    self.constrain_max_size_for_mode(
                        child,
                        cross_axis,
                        ctx.available_inner_cross_dim,
                        ctx.available_inner_width,
                        &mut child_cross_mode,
                        &mut child_cross_size,
                    );

                    let (child_width, child_height) = if ctx.is_main_axis_row {
                        (child_main_size, child_cross_size)
                    } else {
                        (child_cross_size, child_main_size)
                    };
                    let mode_for = |size: f32| {
                        if is_undefined(size) {
                            MeasureMode::Undefined
                        } else {
                            MeasureMode::Exactly
                        }
                    };

                    let request = LayoutRequest {
                        available_width: child_width,
                        available_height: child_height,
                        owner_direction: ctx.direction,
                        width_mode: mode_for(child_width),
                        height_mode: mode_for(child_height),
                        owner_width: ctx.available_inner_width,
                        owner_height: ctx.available_inner_height,
                        perform_layout: true,
                    };
                    self.layout_node(child, request, "stretch", depth + 1)?;
                }
            } else {
                let remaining_cross_dim =
                    container_cross_axis - child_node.dim_with_margin(cross_axis, ctx.available_inner_width);

                // A lone trailing auto margin keeps the item at the start.
                if leading_auto && trailing_auto {
                    leading_cross_dim += float_max(0.0, remaining_cross_dim / 2.0);
                } else if leading_auto {
                    leading_cross_dim += float_max(0.0, remaining_cross_dim);
                } else if trailing_auto || align == Align::FlexStart {
                } else if align == Align::Center {
                    leading_cross_dim += remaining_cross_dim / 2.0;
                } else {
                    leading_cross_dim += remaining_cross_dim;
                }
            }

            let child_layout = &mut self.node_at_mut(child).layout;
            let position = child_layout.raw_position(cross_edge) + total_line_cross_dim + leading_cross_dim;
            child_layout.set_raw_position(cross_edge, position);
        }
        Ok(())
    }

    /// Distributes lines along the cross axis per `align-content` and
    /// re-aligns each item against its line, including baselines.
    pub(super) fn align_lines_content(
        &mut self,
        id: NodeId,
        ctx: &FlexContext,
        line_count: usize,
        total_line_cross_dim: f32,
        leading_padding_and_border_cross: f32,
        depth: usize,
    ) -> Result<(), LayoutError> {
        let cross_axis = ctx.cross_axis;
        let cross_index = cross_axis.dimension().index();
        let cross_edge = cross_axis.leading_edge();
        let width = ctx.available_inner_width;
        let lines = line_count as f32;

        let mut cross_dim_lead = 0.0;
        let mut current_lead = leading_padding_and_border_cross;
        if !is_undefined(ctx.available_inner_cross_dim) {
            let remaining = ctx.available_inner_cross_dim - total_line_cross_dim;
            let has_room = ctx.available_inner_cross_dim > total_line_cross_dim;
            match self.node_at(id).style.align_content {
                Align::FlexEnd => current_lead += remaining,
                Align::Center => current_lead += remaining / 2.0,
                Align::Stretch => {
                    if has_room {
                        cross_dim_lead = remaining / lines;
                    }
                }
                Align::SpaceAround => {
                    if has_room {
                        current_lead += remaining / (2.0 * lines);
                        if line_count > 1 {
                            cross_dim_lead = remaining / lines;
                        }
                    } else {
                        current_lead += remaining / 2.0;
                    }
                }
                Align::SpaceBetween => {
                    if has_room && line_count > 1 {
                        cross_dim_lead = remaining / (lines - 1.0);
                    }
                }
                Align::Auto | Align::FlexStart | Align::Baseline => {}
            }
        }

        let children = self.node_at(id).children.clone();
        let mut end_index = 0;
        for line_index in 0..line_count {
            let start_index = end_index;

            // Line height and the extent of the line's items.
            let mut line_height: f32 = 0.0;
            let mut max_ascent: f32 = 0.0;
            let mut max_descent: f32 = 0.0;
            let mut index = start_index;
            while index < children.len() {
                let child = children[index];
                let child_node = self.node_at(child);
                if child_node.style.display == Display::None {
                    index += 1;
                    continue;
                }
                if child_node.style.position_type == PositionType::Relative {
                    if child_node.layout.line_index != line_index {
                        break;
                    }
                    if child_node.is_layout_dim_defined(cross_axis) {
                        line_height = float_max(
                            line_height,
                            child_node.layout.measured_dimensions[cross_index]
                                + child_node.margin_for_axis(cross_axis, width),
                        );
                    }
                    if self.align_item(id, child) == Align::Baseline {
                        let ascent =
                            self.baseline(child)? + child_node.leading_margin(FlexDirection::Column, width);
                        let descent = child_node.measured_dimension(Dimension::Height)
                            + child_node.margin_for_axis(FlexDirection::Column, width)
                            - ascent;
                        max_ascent = float_max(max_ascent, ascent);
                        max_descent = float_max(max_descent, descent);
                        line_height = float_max(line_height, max_ascent + max_descent);
                    }
                }
                index += 1;
            }
            end_index = index;
            line_height += cross_dim_lead;

            for &child in &children[start_index..end_index] {
                let child_node = self.node_at(child);
                if child_node.style.display == Display::None
                    || child_node.style.position_type != PositionType::Relative
                {
                    continue;
                }

                match self.align_item(id, child) {
                    Align::FlexStart => {
                        let position = current_lead + child_node.leading_margin(cross_axis, width);
                        self.node_at_mut(child).layout.set_raw_position(cross_edge, position);
                    }
                    Align::FlexEnd => {
                        let position = current_lead + line_height
                            - child_node.trailing_margin(cross_axis, width)
                            - child_node.layout.measured_dimensions[cross_index];
                        self.node_at_mut(child).layout.set_raw_position(cross_edge, position);
                    }
                    Align::Center => {
                        let child_height = child_node.layout.measured_dimensions[cross_index];
                        let position = current_lead + (line_height - child_height) / 2.0;
                        self.node_at_mut(child).layout.set_raw_position(cross_edge, position);
                    }
                    Align::Stretch => {
                        let position = current_lead + child_node.leading_margin(cross_axis, width);
                        let cross_defined =
                            child_node.is_style_dim_defined(cross_axis, ctx.available_inner_cross_dim);
                        let measured = child_node.layout.measured_dimensions;
                        let child_width = if ctx.is_main_axis_row {
                            measured[0] + child_node.margin_for_axis(ctx.main_axis, width)
                        } else {
                            line_height
                        };
                        let child_height = if ctx.is_main_axis_row {
                            line_height
                        } else {
                            measured[1] + child_node.margin_for_axis(cross_axis, width)
                        };
                        self.node_at_mut(child).layout.set_raw_position(cross_edge, position);

                        // Items were only measured against the container so
                        // far; size them to the line.
                        if !cross_defined
                            && !(floats_equal(child_width, measured[0]) && floats_equal(child_height, measured[1]))
                        {
                            let request = LayoutRequest {
                                available_width: child_width,
                                available_height: child_height,
                                owner_direction: ctx.direction,
                                width_mode: MeasureMode::Exactly,
                                height_mode: MeasureMode::Exactly,
                                owner_width: width,
                                owner_height: ctx.available_inner_height,
                                perform_layout: true,
                            };
                            self.layout_node(child, request, "multiline-stretch", depth + 1)?;
                        }
                    }
                    Align::Baseline => {
                        let position = current_lead + max_ascent - self.baseline(child)?
                            + child_node.leading_position(FlexDirection::Column, ctx.available_inner_cross_dim);
                        self.node_at_mut(child).layout.set_raw_position(Edge::Top, position);
                    }
                    Align::Auto | Align::SpaceBetween | Align::SpaceAround => {}
                }
            }
            current_lead += line_height;
        }
        Ok(())
    }
}
