//! Flex basis: the hypothetical main size of every child before free space
//! is distributed.
use super::{FlexContext, LayoutRequest};
use crate::axis::AxisExt;
use crate::config::ExperimentalFeature;
use crate::measure::MeasureMode;
use crate::results::LayoutResults;
use crate::tree::LayoutTree;
use crate::LayoutError;
use flexlay_style::{Align, Dimension, Direction, Display, FlexDirection, Overflow, PositionType};
use flexlay_types::NodeId;
use flexlay_types::math::{float_max, floats_equal, is_undefined};

impl LayoutTree {
    /// Positions every child at its starting offset and computes its flex
    /// basis. Returns the sum of the bases plus main-axis margins.
    pub(super) fn compute_flex_basis_for_children(
        &mut self,
        id: NodeId,
        ctx: &FlexContext,
        width_mode: MeasureMode,
        height_mode: MeasureMode,
        depth: usize,
    ) -> Result<f32, LayoutError> {
        let children = self.node_at(id).children.clone();
        let measure_mode_main = if ctx.is_main_axis_row { width_mode } else { height_mode };

        // A lone child that can both grow and shrink will end up exactly as
        // big as the free space, so measuring it is wasted work.
        let mut single_flex_child = None;
        if measure_mode_main == MeasureMode::Exactly {
            for &child in &children {
                let web = self.web_defaults(child);
                let child_node = self.node_at(child);
                if !child_node.is_flexible(web) {
                    continue;
                }
                if single_flex_child.is_some()
                    || floats_equal(child_node.resolve_flex_grow(), 0.0)
                    || floats_equal(child_node.resolve_flex_shrink(web), 0.0)
                {
                    single_flex_child = None;
                    break;
                }
                single_flex_child = Some(child);
            }
        }

        let mut total_outer_flex_basis = 0.0;
        for &child in &children {
            self.node_at_mut(child).resolve_dimension();

            if self.node_at(child).style.display == Display::None {
                self.zero_out_layout_recursively(child);
                let child_node = self.node_at_mut(child);
                child_node.has_new_layout = true;
                child_node.is_dirty = false;
                continue;
            }

            if ctx.perform_layout {
                let child_direction = self.node_at(child).resolve_direction(ctx.direction);
                let (main_dim, cross_dim) = if ctx.is_main_axis_row {
                    (ctx.available_inner_width, ctx.available_inner_height)
                } else {
                    (ctx.available_inner_height, ctx.available_inner_width)
                };
                self.set_layout_position(child, child_direction, main_dim, cross_dim, ctx.available_inner_width);
            }

            if self.node_at(child).style.position_type == PositionType::Absolute {
                continue;
            }

            if Some(child) == single_flex_child {
                let generation = self.generation;
                let layout = &mut self.node_at_mut(child).layout;
                layout.computed_flex_basis_generation = generation;
                layout.computed_flex_basis = 0.0;
            } else {
                self.compute_flex_basis_for_child(
                    id,
                    child,
                    ctx.available_inner_width,
                    width_mode,
                    ctx.available_inner_height,
                    height_mode,
                    ctx.direction,
                    depth,
                )?;
            }

            let child_node = self.node_at(child);
            total_outer_flex_basis += child_node.layout.computed_flex_basis
                + child_node.margin_for_axis(ctx.main_axis, ctx.available_inner_width);
        }
        Ok(total_outer_flex_basis)
    }

    /// `width` and `height` are the owner's inner size; they double as the
    /// size percentages resolve against.
    #[allow(clippy::too_many_arguments)]
    fn compute_flex_basis_for_child(
        &mut self,
        id: NodeId,
        child: NodeId,
        width: f32,
        width_mode: MeasureMode,
        height: f32,
        height_mode: MeasureMode,
        direction: Direction,
        depth: usize,
    ) -> Result<(), LayoutError> {
        let (owner_width, owner_height) = (width, height);
        let main_axis = self.node_at(id).style.flex_direction.resolve(direction);
        let is_main_axis_row = main_axis.is_row();
        let main_axis_size = if is_main_axis_row { width } else { height };
        let main_axis_owner_size = if is_main_axis_row { owner_width } else { owner_height };
        let owner_overflow = self.node_at(id).style.overflow;
        let align = self.align_item(id, child);

        let web = self.web_defaults(child);
        let generation = self.generation;
        let web_flex_basis = self
            .node_config(child)
            .is_experimental_feature_enabled(ExperimentalFeature::WebFlexBasis);

        let child_node = self.node_at(child);
        let resolved_flex_basis = child_node.resolve_flex_basis(web).resolve(main_axis_owner_size);
        let is_row_style_dim_defined = child_node.is_style_dim_defined(FlexDirection::Row, owner_width);
        let is_column_style_dim_defined = child_node.is_style_dim_defined(FlexDirection::Column, owner_height);

        if !is_undefined(resolved_flex_basis) && !is_undefined(main_axis_size) {
            let stale = is_undefined(child_node.layout.computed_flex_basis)
                || (web_flex_basis && child_node.layout.computed_flex_basis_generation != generation);
            if stale {
                let padding_and_border = child_node.padding_and_border_for_axis(main_axis, owner_width);
                self.node_at_mut(child).layout.computed_flex_basis =
                    float_max(resolved_flex_basis, padding_and_border);
            }
        } else if is_main_axis_row && is_row_style_dim_defined {
            // A definite width is the basis.
            let padding_and_border = child_node.padding_and_border_for_axis(FlexDirection::Row, owner_width);
            let width = child_node.resolved_dimension(Dimension::Width).resolve(owner_width);
            self.node_at_mut(child).layout.computed_flex_basis = float_max(width, padding_and_border);
        } else if !is_main_axis_row && is_column_style_dim_defined {
            let padding_and_border = child_node.padding_and_border_for_axis(FlexDirection::Column, owner_width);
            let height = child_node.resolved_dimension(Dimension::Height).resolve(owner_height);
            self.node_at_mut(child).layout.computed_flex_basis = float_max(height, padding_and_border);
        } else {
            // Measure the content to find the hypothetical main size.
            let mut child_width = f32::NAN;
            let mut child_height = f32::NAN;
            let mut child_width_mode = MeasureMode::Undefined;
            let mut child_height_mode = MeasureMode::Undefined;

            let margin_row = child_node.margin_for_axis(FlexDirection::Row, owner_width);
            let margin_column = child_node.margin_for_axis(FlexDirection::Column, owner_width);

            if is_row_style_dim_defined {
                child_width = child_node.resolved_dimension(Dimension::Width).resolve(owner_width) + margin_row;
                child_width_mode = MeasureMode::Exactly;
            }
            if is_column_style_dim_defined {
                child_height =
                    child_node.resolved_dimension(Dimension::Height).resolve(owner_height) + margin_column;
                child_height_mode = MeasureMode::Exactly;
            }

            // Scroll containers do not bound their content along the main
            // axis.
            if (!is_main_axis_row && owner_overflow == Overflow::Scroll) || owner_overflow != Overflow::Scroll {
                if is_undefined(child_width) && !is_undefined(width) {
                    child_width = width;
                    child_width_mode = MeasureMode::AtMost;
                }
            }
            if (is_main_axis_row && owner_overflow == Overflow::Scroll) || owner_overflow != Overflow::Scroll {
                if is_undefined(child_height) && !is_undefined(height) {
                    child_height = height;
                    child_height_mode = MeasureMode::AtMost;
                }
            }

            if let Some(ratio) = child_node.style.aspect_ratio {
                if !is_main_axis_row && child_width_mode == MeasureMode::Exactly {
                    child_height = margin_column + (child_width - margin_row) / ratio;
                    child_height_mode = MeasureMode::Exactly;
                } else if is_main_axis_row && child_height_mode == MeasureMode::Exactly {
                    child_width = margin_row + (child_height - margin_column) * ratio;
                    child_width_mode = MeasureMode::Exactly;
                }
            }

            // A stretched child with no cross size of its own takes the
            // owner's exact cross size.
            let has_exact_width = !is_undefined(width) && width_mode == MeasureMode::Exactly;
            let child_width_stretch = align == Align::Stretch && child_width_mode != MeasureMode::Exactly;
            if !is_main_axis_row && !is_row_style_dim_defined && has_exact_width && child_width_stretch {
                child_width = width;
                child_width_mode = MeasureMode::Exactly;
                if let Some(ratio) = child_node.style.aspect_ratio {
                    child_height = (child_width - margin_row) / ratio;
                    child_height_mode = MeasureMode::Exactly;
                }
            }

            let has_exact_height = !is_undefined(height) && height_mode == MeasureMode::Exactly;
            let child_height_stretch = align == Align::Stretch && child_height_mode != MeasureMode::Exactly;
            if is_main_axis_row && !is_column_style_dim_defined && has_exact_height && child_height_stretch {
                child_height = height;
                child_height_mode = MeasureMode::Exactly;
                if let Some(ratio) = child_node.style.aspect_ratio {
                    child_width = (child_height - margin_column) * ratio;
                    child_width_mode = MeasureMode::Exactly;
                }
            }

            self.constrain_max_size_for_mode(
                child,
                FlexDirection::Row,
                owner_width,
                owner_width,
                &mut child_width_mode,
                &mut child_width,
            );
            self.constrain_max_size_for_mode(
                child,
                FlexDirection::Column,
                owner_height,
                owner_width,
                &mut child_height_mode,
                &mut child_height,
            );

            let request = LayoutRequest {
                available_width: child_width,
                available_height: child_height,
                owner_direction: direction,
                width_mode: child_width_mode,
                height_mode: child_height_mode,
                owner_width,
                owner_height,
                perform_layout: false,
            };
            self.layout_node(child, request, "measure", depth + 1)?;

            let child_node = self.node_at(child);
            let basis = float_max(
                child_node.layout.measured_dimensions[main_axis.dimension().index()],
                child_node.padding_and_border_for_axis(main_axis, owner_width),
            );
            self.node_at_mut(child).layout.computed_flex_basis = basis;
        }

        self.node_at_mut(child).layout.computed_flex_basis_generation = generation;
        Ok(())
    }

    /// Hidden subtrees take up no space and report an all-zero layout.
    pub(super) fn zero_out_layout_recursively(&mut self, id: NodeId) {
        self.clone_children_if_needed(id);
        let node = self.node_at_mut(id);
        node.layout = LayoutResults {
            raw_dimensions: [0.0; 2],
            ..LayoutResults::default()
        };
        node.has_new_layout = true;

        let children = node.children.clone();
        for child in children {
            self.zero_out_layout_recursively(child);
        }
    }
}
