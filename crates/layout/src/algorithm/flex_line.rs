//! Line collection, flexible length resolution and main-axis justification.
use super::{FlexContext, LayoutRequest};
use crate::axis::AxisExt;
use crate::measure::MeasureMode;
use crate::tree::LayoutTree;
use crate::LayoutError;
use flexlay_style::{Align, Dimension, Direction, Display, FlexDirection, Justify, PositionType, Unit, Wrap};
use flexlay_types::NodeId;
use flexlay_types::math::{float_max, is_undefined};

/// One line of flex items and the running totals used to size it.
#[derive(Debug, Clone, Default)]
pub(crate) struct FlexLine {
    /// Items that take part in flex layout on this line.
    pub items_on_line: usize,
    /// Sum of clamped bases and main-axis margins.
    pub size_consumed: f32,
    pub total_flex_grow_factors: f32,
    /// Sum of `-shrink * basis`; negative for shrinkable content.
    pub total_flex_shrink_scaled_factors: f32,
    /// One past the last child index on this line.
    pub end_of_line_index: usize,
    pub remaining_free_space: f32,
    pub main_dim: f32,
    pub cross_dim: f32,
    pub relative_children: Vec<NodeId>,
}

impl LayoutTree {
    /// Gathers children from `start` until the next one would overflow a
    /// wrapping container.
    pub(super) fn collect_flex_line(
        &mut self,
        id: NodeId,
        ctx: &FlexContext,
        owner_direction: Direction,
        start: usize,
        line_index: usize,
    ) -> FlexLine {
        let node = self.node_at(id);
        let children = node.children.clone();
        let main_axis = node.style.flex_direction.resolve(node.resolve_direction(owner_direction));
        let is_wrap = node.style.flex_wrap != Wrap::NoWrap;

        let mut line = FlexLine {
            relative_children: Vec::with_capacity(children.len()),
            ..FlexLine::default()
        };
        let mut size_consumed_including_min = 0.0;

        let mut end = start;
        while end < children.len() {
            let child = children[end];
            let web = self.web_defaults(child);
            let child_node = self.node_at(child);
            if child_node.style.display == Display::None || child_node.style.position_type == PositionType::Absolute {
                end += 1;
                continue;
            }

            let margin_main = child_node.margin_for_axis(main_axis, ctx.available_inner_width);
            let basis = child_node.bound_axis_within_min_max(
                main_axis,
                child_node.layout.computed_flex_basis,
                ctx.main_axis_owner_size,
            );

            if size_consumed_including_min + basis + margin_main > ctx.available_inner_main_dim
                && is_wrap
                && line.items_on_line > 0
            {
                break;
            }

            size_consumed_including_min += basis + margin_main;
            line.size_consumed += basis + margin_main;
            line.items_on_line += 1;

            if child_node.is_flexible(web) {
                line.total_flex_grow_factors += child_node.resolve_flex_grow();
                // Shrinking is weighted by the item's basis.
                line.total_flex_shrink_scaled_factors +=
                    -child_node.resolve_flex_shrink(web) * child_node.layout.computed_flex_basis;
            }

            line.relative_children.push(child);
            self.node_at_mut(child).layout.line_index = line_index;
            end += 1;
        }

        // Fractional totals are floored to 1 so that small factors do not
        // hand out more than the free space.
        if line.total_flex_grow_factors > 0.0 && line.total_flex_grow_factors < 1.0 {
            line.total_flex_grow_factors = 1.0;
        }
        if line.total_flex_shrink_scaled_factors > 0.0 && line.total_flex_shrink_scaled_factors < 1.0 {
            line.total_flex_shrink_scaled_factors = 1.0;
        }
        line.end_of_line_index = end;
        line
    }

    /// Distributes the line's free space and lays every item out at its
    /// final main size.
    pub(super) fn resolve_flexible_length(
        &mut self,
        id: NodeId,
        line: &mut FlexLine,
        ctx: &FlexContext,
        depth: usize,
    ) -> Result<(), LayoutError> {
        let original_free_space = line.remaining_free_space;
        self.distribute_free_space_first_pass(line, ctx);
        let distributed = self.distribute_free_space_second_pass(id, line, ctx, depth)?;
        line.remaining_free_space = original_free_space - distributed;
        Ok(())
    }

    /// Finds the items whose min/max constraints kick in and takes them out
    /// of the distribution, so the second pass sizes everyone else fairly.
    fn distribute_free_space_first_pass(&self, line: &mut FlexLine, ctx: &FlexContext) {
        let mut delta_free_space = 0.0;

        for &child in &line.relative_children {
            let web = self.web_defaults(child);
            let child_node = self.node_at(child);
            let basis = child_node.bound_axis_within_min_max(
                ctx.main_axis,
                child_node.layout.computed_flex_basis,
                ctx.main_axis_owner_size,
            );

            if line.remaining_free_space < 0.0 {
                let shrink_scaled = -child_node.resolve_flex_shrink(web) * basis;
                if !is_undefined(shrink_scaled) && shrink_scaled != 0.0 {
                    let base = basis + line.remaining_free_space / line.total_flex_shrink_scaled_factors * shrink_scaled;
                    let bound = child_node.bound_axis(
                        ctx.main_axis,
                        base,
                        ctx.available_inner_main_dim,
                        ctx.available_inner_width,
                    );
                    if !is_undefined(base) && !is_undefined(bound) && base != bound {
                        delta_free_space += bound - basis;
                        line.total_flex_shrink_scaled_factors -= shrink_scaled;
                    }
                }
            } else if !is_undefined(line.remaining_free_space) && line.remaining_free_space > 0.0 {
                let grow = child_node.resolve_flex_grow();
                if !is_undefined(grow) && grow != 0.0 {
                    let base = basis + line.remaining_free_space / line.total_flex_grow_factors * grow;
                    let bound = child_node.bound_axis(
                        ctx.main_axis,
                        base,
                        ctx.available_inner_main_dim,
                        ctx.available_inner_width,
                    );
                    if !is_undefined(base) && !is_undefined(bound) && base != bound {
                        delta_free_space += bound - basis;
                        line.total_flex_grow_factors -= grow;
                    }
                }
            }
        }
        line.remaining_free_space -= delta_free_space;
    }

    /// Sizes each item and lays it out. Returns how much free space was
    /// handed out.
    fn distribute_free_space_second_pass(
        &mut self,
        id: NodeId,
        line: &FlexLine,
        ctx: &FlexContext,
        depth: usize,
    ) -> Result<f32, LayoutError> {
        let main_axis = ctx.main_axis;
        let cross_axis = ctx.cross_axis;
        let node_direction = self.node_at(id).layout.direction;
        let mut delta_free_space = 0.0;

        for &child in &line.relative_children {
            let web = self.web_defaults(child);
            let align = self.align_item(id, child);
            let child_node = self.node_at(child);
            let basis = child_node.bound_axis_within_min_max(
                main_axis,
                child_node.layout.computed_flex_basis,
                ctx.main_axis_owner_size,
            );
            let mut updated_main_size = basis;

            if !is_undefined(line.remaining_free_space) && line.remaining_free_space < 0.0 {
                let shrink_scaled = -child_node.resolve_flex_shrink(web) * basis;
                if shrink_scaled != 0.0 {
                    let child_size = if !is_undefined(line.total_flex_shrink_scaled_factors)
                        && line.total_flex_shrink_scaled_factors == 0.0
                    {
                        basis + shrink_scaled
                    } else {
                        basis + (line.remaining_free_space / line.total_flex_shrink_scaled_factors) * shrink_scaled
                    };
                    updated_main_size = child_node.bound_axis(
                        main_axis,
                        child_size,
                        ctx.available_inner_main_dim,
                        ctx.available_inner_width,
                    );
                }
            } else if !is_undefined(line.remaining_free_space) && line.remaining_free_space > 0.0 {
                let grow = child_node.resolve_flex_grow();
                if !is_undefined(grow) && grow != 0.0 {
                    updated_main_size = child_node.bound_axis(
                        main_axis,
                        basis + line.remaining_free_space / line.total_flex_grow_factors * grow,
                        ctx.available_inner_main_dim,
                        ctx.available_inner_width,
                    );
                }
            }

            delta_free_space += updated_main_size - basis;

            let margin_main = child_node.margin_for_axis(main_axis, ctx.available_inner_width);
            let margin_cross = child_node.margin_for_axis(cross_axis, ctx.available_inner_width);

            let mut child_main_size = updated_main_size + margin_main;
            let mut child_main_mode = MeasureMode::Exactly;
            let mut child_cross_size;
            let mut child_cross_mode;

            let cross_dim_defined = child_node.is_style_dim_defined(cross_axis, ctx.available_inner_cross_dim);
            let auto_cross_margin = child_node.margin_leading_value(cross_axis).unit == Unit::Auto
                || child_node.margin_trailing_value(cross_axis).unit == Unit::Auto;

            if let Some(ratio) = child_node.style.aspect_ratio {
                child_cross_size = if ctx.is_main_axis_row {
                    (child_main_size - margin_main) / ratio
                } else {
                    (child_main_size - margin_main) * ratio
                };
                child_cross_mode = MeasureMode::Exactly;
                child_cross_size += margin_cross;
            } else if !is_undefined(ctx.available_inner_cross_dim)
                && !cross_dim_defined
                && ctx.measure_mode_cross == MeasureMode::Exactly
                && !(ctx.is_wrap && ctx.flex_basis_overflows)
                && align == Align::Stretch
                && !auto_cross_margin
            {
                child_cross_size = ctx.available_inner_cross_dim;
                child_cross_mode = MeasureMode::Exactly;
            } else if !cross_dim_defined {
                child_cross_size = ctx.available_inner_cross_dim;
                child_cross_mode = if is_undefined(child_cross_size) {
                    MeasureMode::Undefined
                } else {
                    MeasureMode::AtMost
                };
            } else {
                let resolved = child_node.resolved_dimension(cross_axis.dimension());
                child_cross_size = resolved.resolve(ctx.available_inner_cross_dim) + margin_cross;
                // Percentages of an inexact cross size are only a guess.
                let loose_percentage =
                    resolved.unit == Unit::Percent && ctx.measure_mode_cross != MeasureMode::Exactly;
                child_cross_mode = if is_undefined(child_cross_size) || loose_percentage {
                    MeasureMode::Undefined
                } else {
                    MeasureMode::Exactly
                };
            }

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

            // Stretched items are laid out again once the line's cross size
            // is known.
            let requires_stretch_layout = !cross_dim_defined && align == Align::Stretch && !auto_cross_margin;

            let (child_width, child_height, width_mode, height_mode) = if ctx.is_main_axis_row {
                (child_main_size, child_cross_size, child_main_mode, child_cross_mode)
            } else {
                (child_cross_size, child_main_size, child_cross_mode, child_main_mode)
            };

            let request = LayoutRequest {
                available_width: child_width,
                available_height: child_height,
                owner_direction: node_direction,
                width_mode,
                height_mode,
                owner_width: ctx.available_inner_width,
                owner_height: ctx.available_inner_height,
                perform_layout: ctx.perform_layout && !requires_stretch_layout,
            };
            self.layout_node(child, request, "flex", depth + 1)?;

            let child_overflow = self.node_at(child).layout.had_overflow;
            self.node_at_mut(id).layout.had_overflow |= child_overflow;
        }
        Ok(delta_free_space)
    }

    /// Places the line's items along the main axis and measures the line.
    /// Auto margins take precedence over `justify-content`.
    pub(super) fn justify_main_axis(
        &mut self,
        id: NodeId,
        line: &mut FlexLine,
        start: usize,
        ctx: &FlexContext,
    ) -> Result<(), LayoutError> {
        let main_axis = ctx.main_axis;
        let cross_axis = ctx.cross_axis;
        let owner_width = ctx.owner_width;
        let node = self.node_at(id);
        let leading_padding_and_border_main = node.leading_padding_and_border(main_axis, owner_width);
        let trailing_padding_and_border_main = node.trailing_padding_and_border(main_axis, owner_width);
        let leading_border_main = node.leading_border(main_axis);
        let justify_content = node.style.justify_content;

        // With an at-most main size the container shrinks to its content,
        // unless a min size leaves room to spare.
        if ctx.measure_mode_main == MeasureMode::AtMost && line.remaining_free_space > 0.0 {
            let min = node.style.min_dimension(main_axis.dimension());
            let min_resolved = min.resolve(ctx.main_axis_owner_size);
            if !min.is_undefined() && !is_undefined(min_resolved) {
                let min_available_main_dim =
                    min_resolved - leading_padding_and_border_main - trailing_padding_and_border_main;
                let occupied = ctx.available_inner_main_dim - line.remaining_free_space;
                line.remaining_free_space = float_max(0.0, min_available_main_dim - occupied);
            } else {
                line.remaining_free_space = 0.0;
            }
        }

        let children = node.children[start..line.end_of_line_index].to_vec();

        let mut auto_margins = 0;
        for &child in &children {
            let child_node = self.node_at(child);
            if child_node.style.position_type == PositionType::Relative {
                if child_node.margin_leading_value(main_axis).unit == Unit::Auto {
                    auto_margins += 1;
                }
                if child_node.margin_trailing_value(main_axis).unit == Unit::Auto {
                    auto_margins += 1;
                }
            }
        }

        let mut leading_main_dim = 0.0;
        let mut between_main_dim = 0.0;
        if auto_margins == 0 {
            let items = line.items_on_line as f32;
            match justify_content {
                Justify::Center => leading_main_dim = line.remaining_free_space / 2.0,
                Justify::FlexEnd => leading_main_dim = line.remaining_free_space,
                Justify::SpaceBetween => {
                    if line.items_on_line > 1 {
                        between_main_dim = float_max(line.remaining_free_space, 0.0) / (items - 1.0);
                    }
                }
                Justify::SpaceEvenly => {
                    between_main_dim = line.remaining_free_space / (items + 1.0);
                    leading_main_dim = between_main_dim;
                }
                Justify::SpaceAround => {
                    between_main_dim = line.remaining_free_space / items;
                    leading_main_dim = between_main_dim / 2.0;
                }
                Justify::FlexStart => {}
            }
        }

        line.main_dim = leading_padding_and_border_main + leading_main_dim;
        line.cross_dim = 0.0;

        let mut max_ascent: f32 = 0.0;
        let mut max_descent: f32 = 0.0;
        let is_baseline_layout = self.is_baseline_layout(id);
        let can_skip_flex = !ctx.perform_layout && ctx.measure_mode_cross == MeasureMode::Exactly;
        let main_edge = main_axis.leading_edge();

        for &child in &children {
            let child_node = self.node_at(child);
            if child_node.style.display == Display::None {
                continue;
            }

            if child_node.style.position_type == PositionType::Absolute
                && child_node.is_leading_position_defined(main_axis)
            {
                if ctx.perform_layout {
                    // Explicit insets win over justification.
                    let position = child_node.leading_position(main_axis, ctx.available_inner_main_dim)
                        + leading_border_main
                        + child_node.leading_margin(main_axis, ctx.available_inner_width);
                    self.node_at_mut(child).layout.set_raw_position(main_edge, position);
                }
                continue;
            }

            if child_node.style.position_type != PositionType::Relative {
                if ctx.perform_layout {
                    let child_layout = &mut self.node_at_mut(child).layout;
                    let position = child_layout.raw_position(main_edge) + leading_border_main + leading_main_dim;
                    child_layout.set_raw_position(main_edge, position);
                }
                continue;
            }

            let free_per_margin = if auto_margins > 0 {
                line.remaining_free_space / auto_margins as f32
            } else {
                0.0
            };
            if child_node.margin_leading_value(main_axis).unit == Unit::Auto {
                line.main_dim += free_per_margin;
            }

            if ctx.perform_layout {
                let main_dim = line.main_dim;
                let child_layout = &mut self.node_at_mut(child).layout;
                let position = child_layout.raw_position(main_edge) + main_dim;
                child_layout.set_raw_position(main_edge, position);
            }

            let child_node = self.node_at(child);
            if child_node.margin_trailing_value(main_axis).unit == Unit::Auto {
                line.main_dim += free_per_margin;
            }

            if can_skip_flex {
                // Measured sizes were never computed; fall back to the basis.
                line.main_dim += between_main_dim
                    + child_node.margin_for_axis(main_axis, ctx.available_inner_width)
                    + child_node.layout.computed_flex_basis;
                line.cross_dim = ctx.available_inner_cross_dim;
            } else {
                line.main_dim += between_main_dim + child_node.dim_with_margin(main_axis, ctx.available_inner_width);

                if is_baseline_layout {
                    let leading_margin_column =
                        child_node.leading_margin(FlexDirection::Column, ctx.available_inner_width);
                    let height = child_node.measured_dimension(Dimension::Height)
                        + child_node.margin_for_axis(FlexDirection::Column, ctx.available_inner_width);
                    let ascent = self.baseline(child)? + leading_margin_column;
                    let descent = height - ascent;
                    max_ascent = float_max(max_ascent, ascent);
                    max_descent = float_max(max_descent, descent);
                } else {
                    line.cross_dim =
                        float_max(line.cross_dim, child_node.dim_with_margin(cross_axis, ctx.available_inner_width));
                }
            }
        }
        line.main_dim += trailing_padding_and_border_main;

        if is_baseline_layout {
            line.cross_dim = max_ascent + max_descent;
        }
        Ok(())
    }
}
