use crate::measure::{MeasureFunc, MeasureMode};
use crate::tree::LayoutTree;
use flexlay_types::{NodeId, Size};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A measure function that always reports the same size.
pub fn fixed_measure(width: f32, height: f32) -> MeasureFunc {
    Arc::new(move |_, _, _, _| Size::new(width, height))
}

/// A measure function that counts its invocations.
pub fn counting_measure(width: f32, height: f32) -> (MeasureFunc, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let measure: MeasureFunc = Arc::new(move |_, _, _, _| {
        counter.fetch_add(1, Ordering::SeqCst);
        Size::new(width, height)
    });
    (measure, calls)
}

/// Text-like content: `chars` glyphs of 10x10 that wrap to the offered
/// width when it is bounded.
pub fn text_measure(chars: usize) -> MeasureFunc {
    Arc::new(move |width, width_mode, _, _| {
        let natural = chars as f32 * 10.0;
        let line_width = match width_mode {
            MeasureMode::Exactly => width,
            MeasureMode::AtMost => natural.min(width),
            MeasureMode::Undefined => natural,
        };
        let per_line = (line_width / 10.0).floor().max(1.0);
        let lines = (chars as f32 / per_line).ceil().max(1.0);
        Size::new(line_width, lines * 10.0)
    })
}

/// A root of the given size with `count` fresh children.
pub fn root_with_children(tree: &mut LayoutTree, width: f32, height: f32, count: usize) -> (NodeId, Vec<NodeId>) {
    let root = tree.new_node();
    tree.set_width(root, width).unwrap();
    tree.set_height(root, height).unwrap();
    let children = (0..count)
        .map(|_| {
            let child = tree.new_node();
            tree.add_child(root, child).unwrap();
            child
        })
        .collect();
    (root, children)
}

/// Asserts the computed box of `node` as (left, top, width, height).
#[track_caller]
pub fn assert_layout(tree: &LayoutTree, node: NodeId, expected: (f32, f32, f32, f32)) {
    let actual = (
        tree.layout_left(node).unwrap(),
        tree.layout_top(node).unwrap(),
        tree.layout_width(node).unwrap(),
        tree.layout_height(node).unwrap(),
    );
    assert_eq!(actual, expected, "layout of {}", node);
}
