//! A human readable dump of a laid-out subtree.
use crate::tree::LayoutTree;
use crate::TreeError;
use bitflags::bitflags;
use flexlay_style::{Edge, Edges, Style, Unit, Value};
use flexlay_types::NodeId;
use std::fmt::Write;

bitflags! {
    /// What [`LayoutTree::print_tree`] includes.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PrintOptions: u32 {
        const LAYOUT = 0b001;
        const STYLE = 0b010;
        const CHILDREN = 0b100;
    }
}

fn format_value(value: Value) -> String {
    match value.unit {
        Unit::Point => format!("{}px", value.value),
        Unit::Percent => format!("{}%", value.value),
        Unit::Auto => "auto".to_string(),
        Unit::Undefined => "undefined".to_string(),
    }
}

fn append_value(out: &mut String, name: &str, value: Value) {
    if !value.is_undefined() {
        let _ = write!(out, "{}: {}; ", name, format_value(value));
    }
}

/// Sizes default to `auto`, so only other values are worth printing.
fn append_value_if_not_auto(out: &mut String, name: &str, value: Value) {
    if !value.is_auto() {
        append_value(out, name, value);
    }
}

fn append_factor(out: &mut String, name: &str, value: Option<f32>) {
    if let Some(value) = value {
        let _ = write!(out, "{}: {}; ", name, value);
    }
}

fn append_keyword<T: PartialEq + std::fmt::Display>(out: &mut String, name: &str, value: T, default: T) {
    if value != default {
        let _ = write!(out, "{}: {}; ", name, value);
    }
}

/// Writes the edges that are set, collapsing to the bare property name when
/// every physical edge has the same value.
fn append_edges(out: &mut String, name: &str, edges: &Edges) {
    let left = edges.computed(Edge::Left, Value::UNDEFINED);
    let uniform = [Edge::Top, Edge::Right, Edge::Bottom]
        .iter()
        .all(|&edge| edges.computed(edge, Value::UNDEFINED) == left)
        && edges[Edge::Start].is_undefined()
        && edges[Edge::End].is_undefined();
    if uniform {
        append_value(out, name, left);
        return;
    }
    for edge in [Edge::Left, Edge::Top, Edge::Right, Edge::Bottom, Edge::Start, Edge::End] {
        append_value(out, &format!("{}-{}", name, edge), edges.computed(edge, Value::UNDEFINED));
    }
}

fn describe_style(style: &Style) -> String {
    let defaults = Style::default();
    let mut out = String::new();
    append_keyword(&mut out, "direction", style.direction, defaults.direction);
    append_keyword(&mut out, "flex-direction", style.flex_direction, defaults.flex_direction);
    append_keyword(&mut out, "justify-content", style.justify_content, defaults.justify_content);
    append_keyword(&mut out, "align-items", style.align_items, defaults.align_items);
    append_keyword(&mut out, "align-content", style.align_content, defaults.align_content);
    append_keyword(&mut out, "align-self", style.align_self, defaults.align_self);
    append_factor(&mut out, "flex-grow", style.flex_grow);
    append_factor(&mut out, "flex-shrink", style.flex_shrink);
    append_value_if_not_auto(&mut out, "flex-basis", style.flex_basis);
    append_factor(&mut out, "flex", style.flex);
    append_keyword(&mut out, "flex-wrap", style.flex_wrap, defaults.flex_wrap);
    append_keyword(&mut out, "overflow", style.overflow, defaults.overflow);
    append_keyword(&mut out, "display", style.display, defaults.display);
    append_edges(&mut out, "margin", &style.margin);
    append_edges(&mut out, "padding", &style.padding);
    append_edges(&mut out, "border", &style.border);
    append_value_if_not_auto(&mut out, "width", style.dimensions.width);
    append_value_if_not_auto(&mut out, "height", style.dimensions.height);
    append_value(&mut out, "max-width", style.max_dimensions.width);
    append_value(&mut out, "max-height", style.max_dimensions.height);
    append_value(&mut out, "min-width", style.min_dimensions.width);
    append_value(&mut out, "min-height", style.min_dimensions.height);
    append_keyword(&mut out, "position", style.position_type, defaults.position_type);
    append_edges(&mut out, "position", &style.position);
    append_factor(&mut out, "aspect-ratio", style.aspect_ratio);
    out
}

impl LayoutTree {
    /// Renders the subtree under `node` as indented pseudo-HTML.
    pub fn print_tree(&self, node: NodeId, options: PrintOptions) -> Result<String, TreeError> {
        let mut out = String::new();
        self.print_node(node, options, 0, &mut out)?;
        Ok(out)
    }

    fn print_node(&self, id: NodeId, options: PrintOptions, level: usize, out: &mut String) -> Result<(), TreeError> {
        let node = self.node(id)?;
        let indent = "  ".repeat(level);
        let _ = write!(out, "{}<div ", indent);

        if options.contains(PrintOptions::LAYOUT) {
            let layout = &node.layout;
            let _ = write!(
                out,
                "layout=\"width: {}; height: {}; top: {}; left: {};\" ",
                layout.dimensions[0], layout.dimensions[1], layout.position[1], layout.position[0]
            );
        }
        if options.contains(PrintOptions::STYLE) {
            let _ = write!(out, "style=\"{}\" ", describe_style(&node.style));
            if node.has_measure_func() {
                out.push_str("has-custom-measure=\"true\" ");
            }
        }
        out.push('>');

        if options.contains(PrintOptions::CHILDREN) && !node.children.is_empty() {
            for &child in &node.children {
                out.push('\n');
                self.print_node(child, options, level + 1, out)?;
            }
            let _ = write!(out, "\n{}", indent);
        }
        out.push_str("</div>");
        Ok(())
    }
}
