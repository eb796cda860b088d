//! The flexbox layout algorithm.
//!
//! [`LayoutTree::calculate_layout`] sizes a root from its style and the
//! owner size, then recurses through [`LayoutTree::layout_node`]. Every
//! recursive call is either answered from the node's measurement cache or
//! runs the full algorithm in `layout_impl`, which measures children, sorts
//! them into lines, resolves flexible lengths and aligns everything. A final
//! top-down pass snaps the results to the pixel grid.
mod absolute;
mod align;
mod baseline;
mod flex_basis;
mod flex_line;
mod rounding;

use crate::axis::AxisExt;
use crate::cache::{CachedMeasurement, MeasureRequest};
use crate::config::LogLevel;
use crate::measure::MeasureMode;
use crate::node::Node;
use crate::perf::LayoutStats;
use crate::print::PrintOptions;
use crate::tree::LayoutTree;
use crate::LayoutError;
use flexlay_style::{Align, Dimension, Direction, Display, FlexDirection, Overflow, PositionType, Wrap};
use flexlay_types::NodeId;
use flexlay_types::math::{float_max, float_min, is_undefined};

pub(crate) use self::flex_line::FlexLine;

/// Constraints for one recursive visit.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LayoutRequest {
    pub available_width: f32,
    pub available_height: f32,
    pub owner_direction: Direction,
    pub width_mode: MeasureMode,
    pub height_mode: MeasureMode,
    pub owner_width: f32,
    pub owner_height: f32,
    /// Measure-only visits leave children where they are.
    pub perform_layout: bool,
}

/// Values shared by every step of laying out one container.
#[derive(Debug, Clone)]
pub(crate) struct FlexContext {
    pub direction: Direction,
    pub main_axis: FlexDirection,
    pub cross_axis: FlexDirection,
    pub is_main_axis_row: bool,
    pub is_wrap: bool,
    pub owner_width: f32,
    pub main_axis_owner_size: f32,
    pub cross_axis_owner_size: f32,
    pub available_inner_width: f32,
    pub available_inner_height: f32,
    pub available_inner_main_dim: f32,
    pub available_inner_cross_dim: f32,
    pub measure_mode_main: MeasureMode,
    pub measure_mode_cross: MeasureMode,
    pub flex_basis_overflows: bool,
    pub perform_layout: bool,
}

impl LayoutTree {
    #[inline]
    pub(crate) fn node_at(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn node_at_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    pub(crate) fn web_defaults(&self, id: NodeId) -> bool {
        self.node_config(id).use_web_defaults
    }

    /// Lays out the subtree under `root` inside an owner of the given size.
    ///
    /// Either size may be NaN for "unconstrained". Results are read back
    /// with the `layout_*` accessors. Calling this again on an unchanged tree
    /// is answered from the cache and produces identical output.
    pub fn calculate_layout(
        &mut self,
        root: NodeId,
        owner_width: f32,
        owner_height: f32,
        owner_direction: Direction,
    ) -> Result<(), LayoutError> {
        self.node(root)?;
        self.begin_pass();
        self.last_pass_generation = self.generation;
        self.stats = LayoutStats::default();

        let request = self.root_request(root, owner_width, owner_height, owner_direction);
        self.layout_node(root, request, "initial", 0)?;
        self.finish_pass(root, owner_width, owner_height);
        self.stats.log_summary();

        if self.node_config(root).should_diff_layout_without_legacy_stretch_behaviour
            && self.node_at(root).layout.did_use_legacy_flag
        {
            self.diff_without_legacy_stretch(root, request, owner_width, owner_height)?;
        }
        Ok(())
    }

    fn begin_pass(&mut self) {
        // Zero marks "never visited".
        self.generation = self.generation.wrapping_add(1).max(1);
    }

    fn root_request(
        &mut self,
        root: NodeId,
        owner_width: f32,
        owner_height: f32,
        owner_direction: Direction,
    ) -> LayoutRequest {
        let node = self.node_at_mut(root);
        node.resolve_dimension();

        let (width, width_mode) = Self::root_axis_constraint(node, FlexDirection::Row, owner_width, owner_width);
        let (height, height_mode) =
            Self::root_axis_constraint(node, FlexDirection::Column, owner_height, owner_width);

        LayoutRequest {
            available_width: width,
            available_height: height,
            owner_direction,
            width_mode,
            height_mode,
            owner_width,
            owner_height,
            perform_layout: true,
        }
    }

    /// A definite style size is exact, a max size is an upper bound, and
    /// otherwise the owner size applies.
    fn root_axis_constraint(node: &Node, axis: FlexDirection, owner_size: f32, owner_width: f32) -> (f32, MeasureMode) {
        let dim = axis.dimension();
        if node.is_style_dim_defined(axis, owner_size) {
            let size = node.resolved_dimension(dim).resolve(owner_size) + node.margin_for_axis(axis, owner_width);
            return (size, MeasureMode::Exactly);
        }
        let max = node.style.max_dimension(dim).resolve(owner_size);
        if !is_undefined(max) && max >= 0.0 {
            return (max, MeasureMode::AtMost);
        }
        let mode = if is_undefined(owner_size) {
            MeasureMode::Undefined
        } else {
            MeasureMode::Exactly
        };
        (owner_size, mode)
    }

    fn finish_pass(&mut self, root: NodeId, owner_width: f32, owner_height: f32) {
        let direction = self.node_at(root).layout.direction;
        self.set_layout_position(root, direction, owner_width, owner_height, owner_width);

        let config = self.node_config(root);
        let scale = config.point_scale_factor();
        let print_tree = config.print_tree;
        self.round_to_pixel_grid(root, scale, 0.0, 0.0);

        if print_tree {
            let dump = self.print_tree(root, PrintOptions::all()).unwrap_or_default();
            self.log(Some(root), LogLevel::Debug, &dump);
        }
    }

    /// Lays out a copy of the tree with legacy stretching disabled and
    /// records on `root` whether the result differs.
    fn diff_without_legacy_stretch(
        &mut self,
        root: NodeId,
        request: LayoutRequest,
        owner_width: f32,
        owner_height: f32,
    ) -> Result<(), LayoutError> {
        let saved_stats = self.stats;
        let mut config = self.node_config(root).clone();
        config.use_legacy_stretch_behaviour = false;
        config.should_diff_layout_without_legacy_stretch_behaviour = false;
        config.print_tree = false;
        let config_id = self.new_config(config);

        let copy = self.deep_clone_with_config(root, Some(config_id));
        self.node_at_mut(copy).resolve_dimension();
        self.mark_dirty_and_propagate_downwards(copy)?;
        self.begin_pass();

        let outcome = self.layout_node(copy, request, "diff", 0).map(|_| {
            self.finish_pass(copy, owner_width, owner_height);
            !self.layout_trees_equal(copy, root)
        });

        let cleanup = self.free_recursive(copy);
        self.configs.remove(config_id.index());
        self.stats = saved_stats;

        let differs = outcome?;
        cleanup?;
        self.node_at_mut(root).layout.does_legacy_stretch_flag_affect_layout = differs;
        Ok(())
    }

    fn layout_trees_equal(&self, a: NodeId, b: NodeId) -> bool {
        let (left, right) = (self.node_at(a), self.node_at(b));
        left.layout.output_equals(&right.layout)
            && left.children.len() == right.children.len()
            && left
                .children
                .iter()
                .zip(right.children.iter())
                .all(|(&x, &y)| self.layout_trees_equal(x, y))
    }

    /// Sizes `id` under `request`, reusing a cached result when one is
    /// compatible. Returns whether any work was done.
    pub(crate) fn layout_node(
        &mut self,
        id: NodeId,
        request: LayoutRequest,
        reason: &'static str,
        depth: usize,
    ) -> Result<bool, LayoutError> {
        let generation = self.generation;
        let scale = self.node_config(id).point_scale_factor();
        let node = self.node_at_mut(id);

        let need_to_visit = (node.is_dirty && node.layout.generation_count != generation)
            || node.layout.last_owner_direction != Some(request.owner_direction);
        if need_to_visit {
            node.layout.cache.invalidate();
        }

        let slot = if node.has_measure_func() {
            let measure_request = MeasureRequest {
                width: request.available_width,
                width_mode: request.width_mode,
                height: request.available_height,
                height_mode: request.height_mode,
                margin_row: node.margin_for_axis(FlexDirection::Row, request.owner_width),
                margin_column: node.margin_for_axis(FlexDirection::Column, request.owner_width),
            };
            node.layout.cache.find_compatible(&measure_request, scale)
        } else {
            node.layout.cache.find_exact(
                request.perform_layout,
                request.available_width,
                request.available_height,
                request.width_mode,
                request.height_mode,
            )
        };

        let hit = match slot {
            Some(slot) if !need_to_visit => Some(*node.layout.cache.get(slot)),
            _ => None,
        };

        if let Some(entry) = hit {
            node.layout.measured_dimensions = [entry.computed_width, entry.computed_height];
            self.stats.count_hit(request.perform_layout);
            log::trace!(
                "{:indent$}[skipped] {} {}: wm: {}, hm: {}, aw: {} ah: {} => d: ({}, {})",
                "",
                id,
                reason,
                request.width_mode,
                request.height_mode,
                request.available_width,
                request.available_height,
                entry.computed_width,
                entry.computed_height,
                indent = depth
            );
        } else {
            log::trace!(
                "{:indent$}{} {} {}: wm: {}, hm: {}, aw: {} ah: {}",
                "",
                if request.perform_layout { "layout" } else { "measure" },
                id,
                reason,
                request.width_mode,
                request.height_mode,
                request.available_width,
                request.available_height,
                indent = depth
            );
            self.stats.count_miss(request.perform_layout);
            self.layout_impl(id, &request, depth)?;

            let node = self.node_at_mut(id);
            node.layout.last_owner_direction = Some(request.owner_direction);
            node.layout.computed_generation = generation;

            if slot.is_none() {
                let depth_seen = node.layout.cache.len() + 1;
                let entry = CachedMeasurement {
                    available_width: request.available_width,
                    available_height: request.available_height,
                    width_mode: Some(request.width_mode),
                    height_mode: Some(request.height_mode),
                    computed_width: node.layout.measured_dimensions[0],
                    computed_height: node.layout.measured_dimensions[1],
                };
                let wrapped = node.layout.cache.store(request.perform_layout, entry);
                self.stats.record_cache_depth(depth_seen);
                if wrapped {
                    self.log(Some(id), LogLevel::Verbose, "Out of cache entries!");
                }
            }
        }

        let node = self.node_at_mut(id);
        if request.perform_layout {
            node.layout.raw_dimensions = node.layout.measured_dimensions;
            node.has_new_layout = true;
            node.is_dirty = false;
        }
        node.layout.generation_count = generation;
        Ok(need_to_visit || slot.is_none())
    }

    fn layout_impl(&mut self, id: NodeId, request: &LayoutRequest, depth: usize) -> Result<(), LayoutError> {
        let LayoutRequest {
            available_width,
            available_height,
            owner_direction,
            width_mode,
            height_mode,
            owner_width,
            owner_height,
            perform_layout,
        } = *request;

        let direction = self.node_at(id).resolve_direction(owner_direction);
        self.write_box_model(id, direction, owner_width);

        if self.node_at(id).has_measure_func() {
            return self.measure_leaf(id, request);
        }
        if self.node_at(id).children.is_empty() {
            self.size_empty_container(id, request);
            return Ok(());
        }
        if !perform_layout && self.size_fixed_container(id, request) {
            return Ok(());
        }

        // From here on children are laid out, so they must belong to us.
        self.clone_children_if_needed(id);
        self.node_at_mut(id).layout.had_overflow = false;

        // STEP 1: values used by the rest of the algorithm.
        let node = self.node_at(id);
        let main_axis = node.style.flex_direction.resolve(direction);
        let cross_axis = main_axis.cross(direction);
        let is_main_axis_row = main_axis.is_row();
        let is_wrap = node.style.flex_wrap != Wrap::NoWrap;

        let main_axis_owner_size = if is_main_axis_row { owner_width } else { owner_height };
        let cross_axis_owner_size = if is_main_axis_row { owner_height } else { owner_width };

        let leading_padding_and_border_cross = node.leading_padding_and_border(cross_axis, owner_width);
        let padding_and_border_main = node.padding_and_border_for_axis(main_axis, owner_width);
        let padding_and_border_cross = node.padding_and_border_for_axis(cross_axis, owner_width);

        let mut measure_mode_main = if is_main_axis_row { width_mode } else { height_mode };
        let measure_mode_cross = if is_main_axis_row { height_mode } else { width_mode };

        let padding_and_border_row = if is_main_axis_row { padding_and_border_main } else { padding_and_border_cross };
        let padding_and_border_column = if is_main_axis_row { padding_and_border_cross } else { padding_and_border_main };

        let margin_row = node.margin_for_axis(FlexDirection::Row, owner_width);
        let margin_column = node.margin_for_axis(FlexDirection::Column, owner_width);

        let min_inner_width = node.style.min_dimension(Dimension::Width).resolve(owner_width) - padding_and_border_row;
        let max_inner_width = node.style.max_dimension(Dimension::Width).resolve(owner_width) - padding_and_border_row;
        let min_inner_height =
            node.style.min_dimension(Dimension::Height).resolve(owner_height) - padding_and_border_column;
        let max_inner_height =
            node.style.max_dimension(Dimension::Height).resolve(owner_height) - padding_and_border_column;
        let min_inner_main_dim = if is_main_axis_row { min_inner_width } else { min_inner_height };
        let max_inner_main_dim = if is_main_axis_row { max_inner_width } else { max_inner_height };

        // STEP 2: available size in the main and cross directions.
        let available_inner_width = Self::available_inner_dim(node, FlexDirection::Row, available_width, owner_width);
        let available_inner_height =
            Self::available_inner_dim(node, FlexDirection::Column, available_height, owner_height);
        let available_inner_main_dim = if is_main_axis_row { available_inner_width } else { available_inner_height };
        let available_inner_cross_dim = if is_main_axis_row { available_inner_height } else { available_inner_width };

        let mut ctx = FlexContext {
            direction,
            main_axis,
            cross_axis,
            is_main_axis_row,
            is_wrap,
            owner_width,
            main_axis_owner_size,
            cross_axis_owner_size,
            available_inner_width,
            available_inner_height,
            available_inner_main_dim,
            available_inner_cross_dim,
            measure_mode_main,
            measure_mode_cross,
            flex_basis_overflows: false,
            perform_layout,
        };

        // STEP 3: flex basis of every child.
        let total_outer_flex_basis = self.compute_flex_basis_for_children(id, &ctx, width_mode, height_mode, depth)?;

        ctx.flex_basis_overflows = measure_mode_main != MeasureMode::Undefined
            && total_outer_flex_basis > ctx.available_inner_main_dim;
        if is_wrap && ctx.flex_basis_overflows && measure_mode_main == MeasureMode::AtMost {
            measure_mode_main = MeasureMode::Exactly;
            ctx.measure_mode_main = measure_mode_main;
        }

        // STEP 4: collect children into lines.
        let child_count = self.node_at(id).children.len();
        let mut start_of_line_index = 0;
        let mut line_count = 0;
        let mut total_line_cross_dim = 0.0;
        let mut max_line_main_dim: f32 = 0.0;

        while start_of_line_index < child_count {
            let mut line = self.collect_flex_line(id, &ctx, owner_direction, start_of_line_index, line_count);
            let end_of_line_index = line.end_of_line_index;

            let can_skip_flex = !perform_layout && measure_mode_cross == MeasureMode::Exactly;

            // STEP 5: resolve flexible lengths on the main axis.
            let mut size_based_on_content = false;
            if measure_mode_main != MeasureMode::Exactly {
                if !is_undefined(min_inner_main_dim) && line.size_consumed < min_inner_main_dim {
                    ctx.available_inner_main_dim = min_inner_main_dim;
                } else if !is_undefined(max_inner_main_dim) && line.size_consumed > max_inner_main_dim {
                    ctx.available_inner_main_dim = max_inner_main_dim;
                } else {
                    let legacy = self.node_config(id).use_legacy_stretch_behaviour;
                    let node_flex_grow = self.node_at(id).resolve_flex_grow();
                    if !legacy
                        && ((!is_undefined(line.total_flex_grow_factors) && line.total_flex_grow_factors == 0.0)
                            || (!is_undefined(node_flex_grow) && node_flex_grow == 0.0))
                    {
                        // Nothing can grow into the extra space, so the
                        // content size is all the space needed.
                        ctx.available_inner_main_dim = line.size_consumed;
                    }
                    if legacy {
                        self.node_at_mut(id).layout.did_use_legacy_flag = true;
                    }
                    size_based_on_content = !legacy;
                }
            }

            if !size_based_on_content && !is_undefined(ctx.available_inner_main_dim) {
                line.remaining_free_space = ctx.available_inner_main_dim - line.size_consumed;
            } else if line.size_consumed < 0.0 {
                // Sized by content that adds up to a negative amount: the
                // node allocates nothing, so the deficit is free space.
                line.remaining_free_space = -line.size_consumed;
            }

            if !can_skip_flex {
                self.resolve_flexible_length(id, &mut line, &ctx, depth)?;
            }

            let node = self.node_at_mut(id);
            node.layout.had_overflow |= line.remaining_free_space < 0.0;

            // STEP 6: main-axis justification and cross size.
            self.justify_main_axis(id, &mut line, start_of_line_index, &ctx)?;

            let mut container_cross_axis = ctx.available_inner_cross_dim;
            let node = self.node_at(id);
            if measure_mode_cross == MeasureMode::Undefined || measure_mode_cross == MeasureMode::AtMost {
                container_cross_axis = node.bound_axis(
                    cross_axis,
                    line.cross_dim + padding_and_border_cross,
                    cross_axis_owner_size,
                    owner_width,
                ) - padding_and_border_cross;
            }

            if !is_wrap && measure_mode_cross == MeasureMode::Exactly {
                line.cross_dim = ctx.available_inner_cross_dim;
            }

            line.cross_dim = node.bound_axis(
                cross_axis,
                line.cross_dim + padding_and_border_cross,
                cross_axis_owner_size,
                owner_width,
            ) - padding_and_border_cross;

            // STEP 7: cross-axis alignment within the line.
            if perform_layout {
                self.align_line_items(
                    id,
                    &line,
                    start_of_line_index,
                    &ctx,
                    total_line_cross_dim,
                    container_cross_axis,
                    leading_padding_and_border_cross,
                    depth,
                )?;
            }

            total_line_cross_dim += line.cross_dim;
            max_line_main_dim = float_max(max_line_main_dim, line.main_dim);
            line_count += 1;
            start_of_line_index = end_of_line_index;
        }

        // STEP 8: distribute lines along the cross axis.
        if perform_layout && (line_count > 1 || self.is_baseline_layout(id)) {
            self.align_lines_content(
                id,
                &ctx,
                line_count,
                total_line_cross_dim,
                leading_padding_and_border_cross,
                depth,
            )?;
        }

        // STEP 9: final dimensions.
        let node = self.node_at(id);
        let overflow = node.style.overflow;
        let mut measured = [
            node.bound_axis(FlexDirection::Row, available_width - margin_row, owner_width, owner_width),
            node.bound_axis(FlexDirection::Column, available_height - margin_column, owner_height, owner_width),
        ];

        let main_index = main_axis.dimension().index();
        if measure_mode_main == MeasureMode::Undefined
            || (overflow != Overflow::Scroll && measure_mode_main == MeasureMode::AtMost)
        {
            measured[main_index] = node.bound_axis(main_axis, max_line_main_dim, main_axis_owner_size, owner_width);
        } else if measure_mode_main == MeasureMode::AtMost && overflow == Overflow::Scroll {
            measured[main_index] = float_max(
                float_min(
                    ctx.available_inner_main_dim + padding_and_border_main,
                    node.bound_axis_within_min_max(main_axis, max_line_main_dim, main_axis_owner_size),
                ),
                padding_and_border_main,
            );
        }

        let cross_index = cross_axis.dimension().index();
        if measure_mode_cross == MeasureMode::Undefined
            || (overflow != Overflow::Scroll && measure_mode_cross == MeasureMode::AtMost)
        {
            measured[cross_index] = node.bound_axis(
                cross_axis,
                total_line_cross_dim + padding_and_border_cross,
                cross_axis_owner_size,
                owner_width,
            );
        } else if measure_mode_cross == MeasureMode::AtMost && overflow == Overflow::Scroll {
            measured[cross_index] = float_max(
                float_min(
                    ctx.available_inner_cross_dim + padding_and_border_cross,
                    node.bound_axis_within_min_max(
                        cross_axis,
                        total_line_cross_dim + padding_and_border_cross,
                        cross_axis_owner_size,
                    ),
                ),
                padding_and_border_cross,
            );
        }
        let wrap_reverse = node.style.flex_wrap == Wrap::WrapReverse;
        self.node_at_mut(id).layout.measured_dimensions = measured;

        let children = self.node_at(id).children.clone();

        // Lines were placed top to bottom; flip them for wrap-reverse.
        if perform_layout && wrap_reverse {
            let container_cross = measured[cross_index];
            let pos_edge = cross_axis.leading_edge();
            for &child in &children {
                let child_node = self.node_at_mut(child);
                if child_node.style.position_type == PositionType::Relative {
                    let flipped = container_cross
                        - child_node.layout.raw_position(pos_edge)
                        - child_node.layout.measured_dimensions[cross_index];
                    child_node.layout.set_raw_position(pos_edge, flipped);
                }
            }
        }

        if perform_layout {
            // STEP 10: absolutely positioned children.
            let absolute_width_mode = if is_main_axis_row { measure_mode_main } else { measure_mode_cross };
            for &child in &children {
                if self.node_at(child).style.position_type != PositionType::Absolute {
                    continue;
                }
                self.layout_absolute_child(
                    id,
                    child,
                    available_inner_width,
                    absolute_width_mode,
                    available_inner_height,
                    direction,
                    depth,
                )?;
            }

            // STEP 11: trailing positions for reversed axes.
            let needs_main_trailing = main_axis.is_reverse();
            let needs_cross_trailing = cross_axis.is_reverse();
            if needs_main_trailing || needs_cross_trailing {
                for &child in &children {
                    if self.node_at(child).style.display == Display::None {
                        continue;
                    }
                    if needs_main_trailing {
                        self.set_child_trailing_position(id, child, main_axis);
                    }
                    if needs_cross_trailing {
                        self.set_child_trailing_position(id, child, cross_axis);
                    }
                }
            }
        }
        Ok(())
    }

    /// Records the resolved direction, margin, border and padding on the
    /// node's layout, by physical edge.
    fn write_box_model(&mut self, id: NodeId, direction: Direction, owner_width: f32) {
        let node = self.node_at_mut(id);
        let flex_row = FlexDirection::Row.resolve(direction);
        let flex_column = FlexDirection::Column.resolve(direction);

        let mut margin = [0.0; 4];
        let mut border = [0.0; 4];
        let mut padding = [0.0; 4];
        for axis in [flex_row, flex_column] {
            let leading = axis.leading_edge() as usize;
            let trailing = axis.trailing_edge() as usize;
            margin[leading] = node.leading_margin(axis, owner_width);
            margin[trailing] = node.trailing_margin(axis, owner_width);
            border[leading] = node.leading_border(axis);
            border[trailing] = node.trailing_border(axis);
            padding[leading] = node.leading_padding(axis, owner_width);
            padding[trailing] = node.trailing_padding(axis, owner_width);
        }

        node.layout.direction = direction;
        node.layout.margin = margin;
        node.layout.border = border;
        node.layout.padding = padding;
    }

    /// Leaf with a measure function: ask the host, unless both sizes are
    /// already exact.
    fn measure_leaf(&mut self, id: NodeId, request: &LayoutRequest) -> Result<(), LayoutError> {
        let node = self.node_at(id);
        let padding_and_border_row = node.padding_and_border_for_axis(FlexDirection::Row, request.available_width);
        let padding_and_border_column =
            node.padding_and_border_for_axis(FlexDirection::Column, request.available_width);
        let margin_row = node.margin_for_axis(FlexDirection::Row, request.available_width);
        let margin_column = node.margin_for_axis(FlexDirection::Column, request.available_width);

        // Never hand the host a negative size.
        let inner_width = if is_undefined(request.available_width) {
            request.available_width
        } else {
            float_max(0.0, request.available_width - margin_row - padding_and_border_row)
        };
        let inner_height = if is_undefined(request.available_height) {
            request.available_height
        } else {
            float_max(0.0, request.available_height - margin_column - padding_and_border_column)
        };

        let measured = if request.width_mode == MeasureMode::Exactly && request.height_mode == MeasureMode::Exactly {
            [
                node.bound_axis(
                    FlexDirection::Row,
                    request.available_width - margin_row,
                    request.owner_width,
                    request.owner_width,
                ),
                node.bound_axis(
                    FlexDirection::Column,
                    request.available_height - margin_column,
                    request.owner_height,
                    request.owner_width,
                ),
            ]
        } else {
            let Some(measure) = node.measure.clone() else {
                return Ok(());
            };
            let size = measure(inner_width, request.width_mode, inner_height, request.height_mode);
            self.stats.measure_callbacks += 1;

            for (axis, mode, value) in [
                ("width", request.width_mode, size.width),
                ("height", request.height_mode, size.height),
            ] {
                if mode != MeasureMode::Exactly && is_undefined(value) {
                    let error = LayoutError::MeasureReturnedNaN { node: id, axis };
                    self.log(Some(id), LogLevel::Fatal, &error.to_string());
                    return Err(error);
                }
            }

            let node = self.node_at(id);
            let width = if request.width_mode == MeasureMode::Exactly {
                request.available_width - margin_row
            } else {
                size.width + padding_and_border_row
            };
            let height = if request.height_mode == MeasureMode::Exactly {
                request.available_height - margin_column
            } else {
                size.height + padding_and_border_column
            };
            [
                node.bound_axis(FlexDirection::Row, width, request.owner_width, request.owner_width),
                node.bound_axis(FlexDirection::Column, height, request.owner_height, request.owner_width),
            ]
        };

        self.node_at_mut(id).layout.measured_dimensions = measured;
        Ok(())
    }

    /// A container without children is as large as its padding and border,
    /// or the exact size it was given.
    fn size_empty_container(&mut self, id: NodeId, request: &LayoutRequest) {
        let node = self.node_at(id);
        let owner_width = request.owner_width;
        let padding_and_border_row = node.padding_and_border_for_axis(FlexDirection::Row, owner_width);
        let padding_and_border_column = node.padding_and_border_for_axis(FlexDirection::Column, owner_width);
        let margin_row = node.margin_for_axis(FlexDirection::Row, owner_width);
        let margin_column = node.margin_for_axis(FlexDirection::Column, owner_width);

        let width = if request.width_mode == MeasureMode::Exactly {
            request.available_width - margin_row
        } else {
            padding_and_border_row
        };
        let height = if request.height_mode == MeasureMode::Exactly {
            request.available_height - margin_column
        } else {
            padding_and_border_column
        };

        let measured = [
            node.bound_axis(FlexDirection::Row, width, owner_width, owner_width),
            node.bound_axis(FlexDirection::Column, height, request.owner_height, owner_width),
        ];
        self.node_at_mut(id).layout.measured_dimensions = measured;
    }

    /// Skips the algorithm when the size is already known: both axes exact,
    /// or an at-most bound that leaves no room at all.
    fn size_fixed_container(&mut self, id: NodeId, request: &LayoutRequest) -> bool {
        let LayoutRequest {
            available_width: width,
            available_height: height,
            width_mode,
            height_mode,
            owner_width,
            owner_height,
            ..
        } = *request;

        let no_width = !is_undefined(width) && width_mode == MeasureMode::AtMost && width <= 0.0;
        let no_height = !is_undefined(height) && height_mode == MeasureMode::AtMost && height <= 0.0;
        let both_exact = width_mode == MeasureMode::Exactly && height_mode == MeasureMode::Exactly;
        if !(no_width || no_height || both_exact) {
            return false;
        }

        let node = self.node_at(id);
        let margin_row = node.margin_for_axis(FlexDirection::Row, owner_width);
        let margin_column = node.margin_for_axis(FlexDirection::Column, owner_width);
        let inner_width = if is_undefined(width) || (width_mode == MeasureMode::AtMost && width < 0.0) {
            0.0
        } else {
            width - margin_row
        };
        let inner_height = if is_undefined(height) || (height_mode == MeasureMode::AtMost && height < 0.0) {
            0.0
        } else {
            height - margin_column
        };

        let measured = [
            node.bound_axis(FlexDirection::Row, inner_width, owner_width, owner_width),
            node.bound_axis(FlexDirection::Column, inner_height, owner_height, owner_width),
        ];
        self.node_at_mut(id).layout.measured_dimensions = measured;
        true
    }

    /// Space left for children along `axis` once margin, padding and border
    /// are taken away, clamped by the node's own min/max.
    fn available_inner_dim(node: &Node, axis: FlexDirection, available: f32, owner_dim: f32) -> f32 {
        let direction = if axis.is_row() { FlexDirection::Row } else { FlexDirection::Column };
        let dim = direction.dimension();
        let margin = node.margin_for_axis(direction, owner_dim);
        let padding_and_border = node.padding_and_border_for_axis(direction, owner_dim);
        let mut inner = available - margin - padding_and_border;

        if !is_undefined(inner) {
            let min = node.style.min_dimension(dim).resolve(owner_dim);
            let min_inner = if is_undefined(min) { 0.0 } else { min - padding_and_border };
            let max = node.style.max_dimension(dim).resolve(owner_dim);
            let max_inner = if is_undefined(max) { f32::MAX } else { max - padding_and_border };
            inner = float_max(float_min(inner, max_inner), min_inner);
        }
        inner
    }

    /// Places a node relative to its owner from its margins and relative
    /// insets. Roots are always placed left to right.
    pub(crate) fn set_layout_position(
        &mut self,
        id: NodeId,
        direction: Direction,
        main_size: f32,
        cross_size: f32,
        owner_width: f32,
    ) {
        let node = self.node_at_mut(id);
        let direction = if node.owner.is_some() { direction } else { Direction::Ltr };
        let main_axis = node.style.flex_direction.resolve(direction);
        let cross_axis = main_axis.cross(direction);

        let relative_main = node.relative_position(main_axis, main_size);
        let relative_cross = node.relative_position(cross_axis, cross_size);

        let leading_main = node.leading_margin(main_axis, owner_width) + relative_main;
        let trailing_main = node.trailing_margin(main_axis, owner_width) + relative_main;
        let leading_cross = node.leading_margin(cross_axis, owner_width) + relative_cross;
        let trailing_cross = node.trailing_margin(cross_axis, owner_width) + relative_cross;

        node.layout.set_raw_position(main_axis.leading_edge(), leading_main);
        node.layout.set_raw_position(main_axis.trailing_edge(), trailing_main);
        node.layout.set_raw_position(cross_axis.leading_edge(), leading_cross);
        node.layout.set_raw_position(cross_axis.trailing_edge(), trailing_cross);
    }

    fn set_child_trailing_position(&mut self, id: NodeId, child: NodeId, axis: FlexDirection) {
        let dim = axis.dimension().index();
        let container_size = self.node_at(id).layout.measured_dimensions[dim];
        let child_node = self.node_at_mut(child);
        let size = child_node.layout.measured_dimensions[dim];
        let leading = child_node.layout.raw_position(axis.leading_edge());
        child_node
            .layout
            .set_raw_position(axis.trailing_edge(), container_size - size - leading);
    }

    /// `align-self`, falling back to the owner's `align-items`. Baseline
    /// alignment only exists for row containers.
    pub(crate) fn align_item(&self, id: NodeId, child: NodeId) -> Align {
        let node = self.node_at(id);
        let child_node = self.node_at(child);
        let align = if child_node.style.align_self == Align::Auto {
            node.style.align_items
        } else {
            child_node.style.align_self
        };
        if align == Align::Baseline && node.style.flex_direction.is_column() {
            return Align::FlexStart;
        }
        align
    }

    /// Caps `size` at the node's max size along `axis` (plus margin). An
    /// unconstrained request becomes an at-most one.
    pub(crate) fn constrain_max_size_for_mode(
        &self,
        id: NodeId,
        axis: FlexDirection,
        owner_axis_size: f32,
        owner_width: f32,
        mode: &mut MeasureMode,
        size: &mut f32,
    ) {
        let node = self.node_at(id);
        let max_size = node.style.max_dimension(axis.dimension()).resolve(owner_axis_size)
            + node.margin_for_axis(axis, owner_width);
        match *mode {
            MeasureMode::Exactly | MeasureMode::AtMost => {
                let within = is_undefined(max_size) || *size < max_size;
                if !within {
                    *size = max_size;
                }
            }
            MeasureMode::Undefined => {
                if !is_undefined(max_size) {
                    *mode = MeasureMode::AtMost;
                    *size = max_size;
                }
            }
        }
    }
}
