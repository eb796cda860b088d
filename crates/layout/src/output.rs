//! Reading computed layout back out of the tree.
//!
//! Positions are relative to the owner and, like sizes, already snapped to
//! the pixel grid when the config asks for it.
use crate::tree::LayoutTree;
use crate::TreeError;
use flexlay_style::{Direction, Edge};
use flexlay_types::NodeId;
use serde::{Deserialize, Serialize};

/// An edge of a computed box. `Start` and `End` follow the node's resolved
/// direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayoutEdge {
    Left,
    Top,
    Right,
    Bottom,
    Start,
    End,
}

impl LayoutEdge {
    fn physical(self, direction: Direction) -> Edge {
        let rtl = direction == Direction::Rtl;
        match self {
            LayoutEdge::Left => Edge::Left,
            LayoutEdge::Top => Edge::Top,
            LayoutEdge::Right => Edge::Right,
            LayoutEdge::Bottom => Edge::Bottom,
            LayoutEdge::Start if rtl => Edge::Right,
            LayoutEdge::Start => Edge::Left,
            LayoutEdge::End if rtl => Edge::Left,
            LayoutEdge::End => Edge::Right,
        }
    }
}

/// Computed boxes of a subtree, suitable for golden files and the CLI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<LayoutSnapshot>,
}

impl LayoutTree {
    pub fn layout_left(&self, node: NodeId) -> Result<f32, TreeError> {
        Ok(self.node(node)?.layout.position[Edge::Left as usize])
    }

    pub fn layout_top(&self, node: NodeId) -> Result<f32, TreeError> {
        Ok(self.node(node)?.layout.position[Edge::Top as usize])
    }

    pub fn layout_right(&self, node: NodeId) -> Result<f32, TreeError> {
        Ok(self.node(node)?.layout.position[Edge::Right as usize])
    }

    pub fn layout_bottom(&self, node: NodeId) -> Result<f32, TreeError> {
        Ok(self.node(node)?.layout.position[Edge::Bottom as usize])
    }

    pub fn layout_width(&self, node: NodeId) -> Result<f32, TreeError> {
        Ok(self.node(node)?.layout.dimensions[0])
    }

    pub fn layout_height(&self, node: NodeId) -> Result<f32, TreeError> {
        Ok(self.node(node)?.layout.dimensions[1])
    }

    pub fn layout_direction(&self, node: NodeId) -> Result<Direction, TreeError> {
        Ok(self.node(node)?.layout.direction)
    }

    /// Whether any line of the node's children needed more room than it had.
    pub fn layout_had_overflow(&self, node: NodeId) -> Result<bool, TreeError> {
        Ok(self.node(node)?.layout.had_overflow)
    }

    pub fn layout_margin(&self, node: NodeId, edge: LayoutEdge) -> Result<f32, TreeError> {
        let layout = &self.node(node)?.layout;
        Ok(layout.margin[edge.physical(layout.direction) as usize])
    }

    pub fn layout_border(&self, node: NodeId, edge: LayoutEdge) -> Result<f32, TreeError> {
        let layout = &self.node(node)?.layout;
        Ok(layout.border[edge.physical(layout.direction) as usize])
    }

    pub fn layout_padding(&self, node: NodeId, edge: LayoutEdge) -> Result<f32, TreeError> {
        let layout = &self.node(node)?.layout;
        Ok(layout.padding[edge.physical(layout.direction) as usize])
    }

    pub fn snapshot(&self, node: NodeId) -> Result<LayoutSnapshot, TreeError> {
        let entry = self.node(node)?;
        let children = entry
            .children
            .iter()
            .map(|&child| self.snapshot(child))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(LayoutSnapshot {
            left: entry.layout.position[Edge::Left as usize],
            top: entry.layout.position[Edge::Top as usize],
            width: entry.layout.dimensions[0],
            height: entry.layout.dimensions[1],
            children,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_end_follow_direction() {
        assert_eq!(LayoutEdge::Start.physical(Direction::Ltr), Edge::Left);
        assert_eq!(LayoutEdge::Start.physical(Direction::Rtl), Edge::Right);
        assert_eq!(LayoutEdge::End.physical(Direction::Rtl), Edge::Left);
        assert_eq!(LayoutEdge::Bottom.physical(Direction::Rtl), Edge::Bottom);
    }

    #[test]
    fn test_snapshot_serializes_without_empty_children() {
        let snapshot = LayoutSnapshot {
            left: 0.0,
            top: 10.0,
            width: 100.0,
            height: 20.0,
            children: Vec::new(),
        };
        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(json, r#"{"left":0.0,"top":10.0,"width":100.0,"height":20.0}"#);
    }
}
