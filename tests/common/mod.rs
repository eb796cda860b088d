#![allow(dead_code)]

use flexlay::{Direction, FlexDirection, LayoutTree, MeasureFunc, NodeId, Size};
use std::sync::Arc;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A sized container with `count` empty children.
pub fn container(
    tree: &mut LayoutTree,
    direction: FlexDirection,
    width: f32,
    height: f32,
    count: usize,
) -> Result<(NodeId, Vec<NodeId>), flexlay::Error> {
    let root = tree.new_node();
    tree.set_flex_direction(root, direction)?;
    tree.set_width(root, width)?;
    tree.set_height(root, height)?;
    let mut children = Vec::with_capacity(count);
    for _ in 0..count {
        let child = tree.new_node();
        tree.add_child(root, child)?;
        children.push(child);
    }
    Ok((root, children))
}

pub fn fixed_size(width: f32, height: f32) -> MeasureFunc {
    Arc::new(move |_, _, _, _| Size::new(width, height))
}

pub fn layout_ltr(tree: &mut LayoutTree, root: NodeId) -> Result<(), flexlay::Error> {
    tree.calculate_layout(root, f32::NAN, f32::NAN, Direction::Ltr)?;
    Ok(())
}

/// `(left, top, width, height)` of a node.
pub fn bounds(tree: &LayoutTree, node: NodeId) -> Result<(f32, f32, f32, f32), flexlay::Error> {
    Ok((
        tree.layout_left(node)?,
        tree.layout_top(node)?,
        tree.layout_width(node)?,
        tree.layout_height(node)?,
    ))
}

pub fn lefts(tree: &LayoutTree, nodes: &[NodeId]) -> Result<Vec<f32>, flexlay::Error> {
    nodes.iter().map(|&node| Ok(tree.layout_left(node)?)).collect()
}

pub fn tops(tree: &LayoutTree, nodes: &[NodeId]) -> Result<Vec<f32>, flexlay::Error> {
    nodes.iter().map(|&node| Ok(tree.layout_top(node)?)).collect()
}
