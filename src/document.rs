//! JSON description of a node tree, as read by the command line.
use crate::Error;
use flexlay_layout::{LayoutTree, MeasureFunc};
use flexlay_style::Style;
use flexlay_types::{NodeId, Size};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// One node and its subtree.
///
/// ```json
/// { "style": { "flex-direction": "row", "padding": 8 },
///   "children": [ { "measure": { "width": 40, "height": 12 } } ] }
/// ```
///
/// A `measure` turns the node into a content leaf that always reports that
/// size, so it cannot have children.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDescription {
    pub style: Style,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeDescription>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub measure: Option<Size>,
}

impl NodeDescription {
    pub fn from_json(json: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(json)?)
    }

    /// Creates the described nodes in `tree` and returns the root.
    pub fn build(&self, tree: &mut LayoutTree) -> Result<NodeId, Error> {
        let node = tree.new_node();
        tree.set_style(node, self.style.clone())?;
        if let Some(size) = self.measure {
            let measure: MeasureFunc = Arc::new(move |_, _, _, _| size);
            tree.set_measure_func(node, Some(measure))?;
        }
        for child in &self.children {
            let child_id = child.build(tree)?;
            tree.add_child(node, child_id)?;
        }
        Ok(node)
    }
}
