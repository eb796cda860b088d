//! Snapping the computed layout to the pixel grid.
use crate::node::NodeType;
use crate::tree::LayoutTree;
use flexlay_style::Edge;
use flexlay_types::NodeId;
use flexlay_types::math::{doubles_equal, round_value_to_pixel_grid};

fn has_fraction(value: f32, point_scale_factor: f32) -> bool {
    let mut fraction = (f64::from(value) * f64::from(point_scale_factor)) % 1.0;
    if fraction < 0.0 {
        fraction += 1.0;
    }
    !doubles_equal(fraction, 0.0) && !doubles_equal(fraction, 1.0)
}

impl LayoutTree {
    /// Writes the reported position and size of every node under `id` from
    /// the raw algorithm output.
    ///
    /// Edges are rounded in absolute coordinates so that adjacent boxes
    /// stay adjacent, and sizes are the difference of rounded edges. Text
    /// nodes never round their size down. A scale of zero copies the raw
    /// values through.
    pub(super) fn round_to_pixel_grid(&mut self, id: NodeId, point_scale_factor: f32, absolute_left: f32, absolute_top: f32) {
        let node = self.node_at_mut(id);
        let layout = &mut node.layout;
        let left = layout.raw_position(Edge::Left);
        let top = layout.raw_position(Edge::Top);
        let [width, height] = layout.raw_dimensions;

        layout.position = layout.raw_position;
        if point_scale_factor == 0.0 {
            layout.dimensions = layout.raw_dimensions;
        } else {
            let text = node.node_type == NodeType::Text;
            let absolute_left = absolute_left + left;
            let absolute_top = absolute_top + top;
            let absolute_right = absolute_left + width;
            let absolute_bottom = absolute_top + height;
            let fractional_width = has_fraction(width, point_scale_factor);
            let fractional_height = has_fraction(height, point_scale_factor);

            layout.position[Edge::Left as usize] = round_value_to_pixel_grid(left, point_scale_factor, false, text);
            layout.position[Edge::Top as usize] = round_value_to_pixel_grid(top, point_scale_factor, false, text);
            layout.dimensions = [
                round_value_to_pixel_grid(
                    absolute_right,
                    point_scale_factor,
                    text && fractional_width,
                    text && !fractional_width,
                ) - round_value_to_pixel_grid(absolute_left, point_scale_factor, false, text),
                round_value_to_pixel_grid(
                    absolute_bottom,
                    point_scale_factor,
                    text && fractional_height,
                    text && !fractional_height,
                ) - round_value_to_pixel_grid(absolute_top, point_scale_factor, false, text),
            ];
        }

        let children = node.children.clone();
        for child in children {
            self.round_to_pixel_grid(child, point_scale_factor, absolute_left + left, absolute_top + top);
        }
    }
}
