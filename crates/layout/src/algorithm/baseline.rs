//! Baselines for `align-items: baseline`.
use crate::config::LogLevel;
use crate::tree::LayoutTree;
use crate::LayoutError;
use flexlay_style::{Align, Edge, PositionType};
use flexlay_types::NodeId;
use flexlay_types::math::is_undefined;

impl LayoutTree {
    /// Distance from the top of `id` to its first baseline.
    ///
    /// A baseline callback wins. Otherwise the baseline comes from the first
    /// child on the first line that is baseline aligned or marked as the
    /// reference baseline, falling back to the first in-flow child. A node
    /// with neither uses its own bottom edge.
    pub(crate) fn baseline(&self, id: NodeId) -> Result<f32, LayoutError> {
        let node = self.node_at(id);
        if let Some(baseline) = &node.baseline {
            let [width, height] = node.layout.measured_dimensions;
            let value = baseline(width, height);
            if is_undefined(value) {
                let error = LayoutError::BaselineIsNaN(id);
                self.log(Some(id), LogLevel::Fatal, &error.to_string());
                return Err(error);
            }
            return Ok(value);
        }

        let mut baseline_child = None;
        for &child in &node.children {
            let child_node = self.node_at(child);
            if child_node.layout.line_index > 0 {
                break;
            }
            if child_node.style.position_type == PositionType::Absolute {
                continue;
            }
            if self.align_item(id, child) == Align::Baseline || child_node.is_reference_baseline {
                baseline_child = Some(child);
                break;
            }
            if baseline_child.is_none() {
                baseline_child = Some(child);
            }
        }

        match baseline_child {
            Some(child) => {
                let top = self.node_at(child).layout.raw_position(Edge::Top);
                Ok(self.baseline(child)? + top)
            }
            None => Ok(node.layout.measured_dimensions[1]),
        }
    }
}
