//! The node arena and every structural mutation.
//!
//! Nodes live in a slab and refer to each other by [`NodeId`]. A node's
//! `owner` is a plain handle back to the node whose children list holds it;
//! it never keeps anything alive. The same id may sit in several children
//! lists when a subtree is shared between trees. Only the node named by the
//! child's `owner` may lay it out or mutate it; any other holder first
//! materializes its own copies (see [`LayoutTree::clone_children_if_needed`]).
use crate::config::{Config, LogLevel};
use crate::measure::{BaselineFunc, DirtiedFunc, MeasureFunc};
use crate::node::{Node, NodeType};
use crate::perf::LayoutStats;
use crate::results::LayoutResults;
use crate::TreeError;
use flexlay_style::Style;
use flexlay_types::{ConfigId, NodeId, UNDEFINED};
use slab::Slab;

pub struct LayoutTree {
    pub(crate) nodes: Slab<Node>,
    pub(crate) configs: Slab<Config>,
    default_config: ConfigId,
    /// Bumped at the start of every pass; cached results from older
    /// generations are only trusted for clean nodes.
    pub(crate) generation: u32,
    pub(crate) last_pass_generation: u32,
    pub(crate) stats: LayoutStats,
}

impl Default for LayoutTree {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutTree {
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// A tree whose default config is `config`.
    pub fn with_config(config: Config) -> Self {
        let mut configs = Slab::new();
        let default_config = ConfigId::new(configs.insert(config));
        Self {
            nodes: Slab::new(),
            configs,
            default_config,
            generation: 0,
            last_pass_generation: 0,
            stats: LayoutStats::default(),
        }
    }

    // --- Configs ---

    pub fn default_config(&self) -> ConfigId {
        self.default_config
    }

    pub fn new_config(&mut self, config: Config) -> ConfigId {
        ConfigId::new(self.configs.insert(config))
    }

    pub fn config(&self, id: ConfigId) -> Result<&Config, TreeError> {
        self.configs.get(id.index()).ok_or(TreeError::InvalidConfig(id))
    }

    /// Config changes only affect later passes; no node is dirtied.
    pub fn config_mut(&mut self, id: ConfigId) -> Result<&mut Config, TreeError> {
        self.configs.get_mut(id.index()).ok_or(TreeError::InvalidConfig(id))
    }

    /// Removes a config that no node references any more.
    pub fn free_config(&mut self, id: ConfigId) -> Result<Config, TreeError> {
        self.config(id)?;
        if id == self.default_config || self.nodes.iter().any(|(_, node)| node.config == id) {
            return Err(self.report(None, TreeError::ConfigInUse(id)));
        }
        Ok(self.configs.remove(id.index()))
    }

    pub fn config_of(&self, node: NodeId) -> Result<ConfigId, TreeError> {
        Ok(self.node(node)?.config)
    }

    pub fn set_config(&mut self, node: NodeId, config: ConfigId) -> Result<(), TreeError> {
        self.config(config)?;
        self.node_mut(node)?.config = config;
        Ok(())
    }

    pub(crate) fn node_config(&self, node: NodeId) -> &Config {
        self.nodes
            .get(node.index())
            .and_then(|n| self.configs.get(n.config.index()))
            .unwrap_or(&self.configs[self.default_config.index()])
    }

    /// Routes a message through the logger of `node`'s config.
    pub(crate) fn log(&self, node: Option<NodeId>, level: LogLevel, message: &str) {
        let config = match node {
            Some(node) => self.node_config(node),
            None => &self.configs[self.default_config.index()],
        };
        config.log(node, level, message);
    }

    /// Logs an invariant violation at fatal level and hands the error back.
    pub(crate) fn report(&self, node: Option<NodeId>, error: TreeError) -> TreeError {
        self.log(node, LogLevel::Fatal, &error.to_string());
        error
    }

    // --- Node lookup ---

    pub fn node(&self, id: NodeId) -> Result<&Node, TreeError> {
        self.nodes.get(id.index()).ok_or(TreeError::InvalidNode(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node, TreeError> {
        self.nodes.get_mut(id.index()).ok_or(TreeError::InvalidNode(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains(id.index())
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn style(&self, node: NodeId) -> Result<&Style, TreeError> {
        Ok(&self.node(node)?.style)
    }

    pub fn layout_results(&self, node: NodeId) -> Result<&LayoutResults, TreeError> {
        Ok(&self.node(node)?.layout)
    }

    pub fn children(&self, node: NodeId) -> Result<&[NodeId], TreeError> {
        Ok(&self.node(node)?.children)
    }

    pub fn child(&self, node: NodeId, index: usize) -> Result<Option<NodeId>, TreeError> {
        Ok(self.node(node)?.children.get(index).copied())
    }

    pub fn child_count(&self, node: NodeId) -> Result<usize, TreeError> {
        Ok(self.node(node)?.children.len())
    }

    pub fn owner(&self, node: NodeId) -> Result<Option<NodeId>, TreeError> {
        Ok(self.node(node)?.owner)
    }

    /// Alias of [`LayoutTree::owner`].
    pub fn parent(&self, node: NodeId) -> Result<Option<NodeId>, TreeError> {
        self.owner(node)
    }

    // --- Creation ---

    pub fn new_node(&mut self) -> NodeId {
        let config = self.default_config;
        let web_defaults = self.configs[config.index()].use_web_defaults;
        NodeId::new(self.nodes.insert(Node::new(config, web_defaults)))
    }

    pub fn new_node_with_config(&mut self, config: ConfigId) -> Result<NodeId, TreeError> {
        let web_defaults = self.config(config)?.use_web_defaults;
        Ok(NodeId::new(self.nodes.insert(Node::new(config, web_defaults))))
    }

    /// Creates a node and attaches `children` to it in order.
    pub fn new_node_with_children(&mut self, style: Style, children: &[NodeId]) -> Result<NodeId, TreeError> {
        let node = self.new_node();
        self.nodes[node.index()].style = style;
        if let Err(error) = self.set_children(node, children) {
            self.nodes.remove(node.index());
            return Err(error);
        }
        Ok(node)
    }

    /// Shallow copy: same style, layout, callbacks and children list. The
    /// copy has no owner and does not own the children it lists.
    pub fn clone_node(&mut self, node: NodeId) -> Result<NodeId, TreeError> {
        let mut copy = self.node(node)?.clone();
        copy.owner = None;
        Ok(NodeId::new(self.nodes.insert(copy)))
    }

    /// Recursive copy in which every cloned child is owned by its cloned
    /// parent.
    pub fn deep_clone(&mut self, node: NodeId) -> Result<NodeId, TreeError> {
        self.node(node)?;
        Ok(self.deep_clone_with_config(node, None))
    }

    pub(crate) fn deep_clone_with_config(&mut self, node: NodeId, config: Option<ConfigId>) -> NodeId {
        let mut copy = self.nodes[node.index()].clone();
        copy.owner = None;
        if let Some(config) = config {
            copy.config = config;
        }
        let children = std::mem::take(&mut copy.children);
        let copy_id = NodeId::new(self.nodes.insert(copy));

        let mut cloned_children = Vec::with_capacity(children.len());
        for child in children {
            let cloned = self.deep_clone_with_config(child, config);
            self.nodes[cloned.index()].owner = Some(copy_id);
            cloned_children.push(cloned);
        }
        self.nodes[copy_id.index()].children = cloned_children;
        copy_id
    }

    // --- Dirtiness ---

    /// Marks `node` and its ancestors dirty, stopping at the first node that
    /// already is. Dirtied callbacks fire on every clean-to-dirty change.
    pub(crate) fn mark_dirty_and_propagate(&mut self, node: NodeId) {
        let mut current = Some(node);
        while let Some(id) = current {
            let Some(entry) = self.nodes.get_mut(id.index()) else {
                break;
            };
            if entry.is_dirty {
                break;
            }
            entry.is_dirty = true;
            entry.layout.computed_flex_basis = UNDEFINED;
            current = entry.owner;
            if let Some(callback) = entry.dirtied.clone() {
                callback(id);
            }
        }
    }

    /// Only leaves with a measure function own their dirtiness; containers
    /// are dirtied through their children.
    pub fn mark_dirty(&mut self, node: NodeId) -> Result<(), TreeError> {
        if !self.node(node)?.has_measure_func() {
            return Err(self.report(Some(node), TreeError::MarkDirtyWithoutMeasureFunc(node)));
        }
        self.mark_dirty_and_propagate(node);
        Ok(())
    }

    /// Dirties the whole subtree under `node` without notifying callbacks.
    pub fn mark_dirty_and_propagate_downwards(&mut self, node: NodeId) -> Result<(), TreeError> {
        self.node(node)?;
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let entry = &mut self.nodes[id.index()];
            entry.is_dirty = true;
            stack.extend(entry.children.iter().copied());
        }
        Ok(())
    }

    pub fn is_dirty(&self, node: NodeId) -> Result<bool, TreeError> {
        Ok(self.node(node)?.is_dirty)
    }

    pub fn has_new_layout(&self, node: NodeId) -> Result<bool, TreeError> {
        Ok(self.node(node)?.has_new_layout)
    }

    /// Hosts clear this once they have consumed a node's new layout.
    pub fn set_has_new_layout(&mut self, node: NodeId, has_new_layout: bool) -> Result<(), TreeError> {
        self.node_mut(node)?.has_new_layout = has_new_layout;
        Ok(())
    }

    // --- Callbacks ---

    /// Installs or clears the measure function. A node with one becomes a
    /// [`NodeType::Text`] leaf and may not have children.
    pub fn set_measure_func(&mut self, node: NodeId, measure: Option<MeasureFunc>) -> Result<(), TreeError> {
        let entry = self.node(node)?;
        if measure.is_some() && !entry.children.is_empty() {
            return Err(self.report(Some(node), TreeError::MeasureFuncOnNodeWithChildren(node)));
        }
        let entry = &mut self.nodes[node.index()];
        entry.node_type = if measure.is_some() { NodeType::Text } else { NodeType::Default };
        entry.measure = measure;
        Ok(())
    }

    pub fn has_measure_func(&self, node: NodeId) -> Result<bool, TreeError> {
        Ok(self.node(node)?.has_measure_func())
    }

    pub fn set_baseline_func(&mut self, node: NodeId, baseline: Option<BaselineFunc>) -> Result<(), TreeError> {
        self.node_mut(node)?.baseline = baseline;
        Ok(())
    }

    pub fn has_baseline_func(&self, node: NodeId) -> Result<bool, TreeError> {
        Ok(self.node(node)?.has_baseline_func())
    }

    pub fn set_dirtied_func(&mut self, node: NodeId, dirtied: Option<DirtiedFunc>) -> Result<(), TreeError> {
        self.node_mut(node)?.dirtied = dirtied;
        Ok(())
    }

    pub fn node_type(&self, node: NodeId) -> Result<NodeType, TreeError> {
        Ok(self.node(node)?.node_type)
    }

    pub fn set_node_type(&mut self, node: NodeId, node_type: NodeType) -> Result<(), TreeError> {
        self.node_mut(node)?.node_type = node_type;
        Ok(())
    }

    pub fn is_reference_baseline(&self, node: NodeId) -> Result<bool, TreeError> {
        Ok(self.node(node)?.is_reference_baseline)
    }

    /// Makes `node` the baseline child of its owner, ahead of the default
    /// choice.
    pub fn set_is_reference_baseline(&mut self, node: NodeId, reference: bool) -> Result<(), TreeError> {
        let entry = self.node_mut(node)?;
        if entry.is_reference_baseline != reference {
            entry.is_reference_baseline = reference;
            self.mark_dirty_and_propagate(node);
        }
        Ok(())
    }

    // --- Children ---

    fn check_adoptable(&self, owner: NodeId, child: NodeId) -> Result<(), TreeError> {
        let child_node = self.node(child)?;
        if let Some(existing) = child_node.owner {
            if existing != owner {
                return Err(self.report(Some(child), TreeError::ChildHasOwner { child, owner: existing }));
            }
        }
        let mut ancestor = Some(owner);
        while let Some(id) = ancestor {
            if id == child {
                return Err(self.report(Some(owner), TreeError::WouldCreateCycle { owner, child }));
            }
            ancestor = self.nodes.get(id.index()).and_then(|node| node.owner);
        }
        Ok(())
    }

    /// Inserts `child` at `index`. The child must not have an owner yet.
    pub fn insert_child(&mut self, owner: NodeId, child: NodeId, index: usize) -> Result<(), TreeError> {
        let owner_node = self.node(owner)?;
        if owner_node.has_measure_func() {
            return Err(self.report(Some(owner), TreeError::OwnerHasMeasureFunc(owner)));
        }
        let len = owner_node.children.len();
        if let Some(existing) = self.node(child)?.owner {
            return Err(self.report(Some(child), TreeError::ChildHasOwner { child, owner: existing }));
        }
        self.check_adoptable(owner, child)?;
        if index > len {
            return Err(self.report(Some(owner), TreeError::IndexOutOfBounds { index, len }));
        }

        self.clone_children_if_needed(owner);
        self.nodes[owner.index()].children.insert(index, child);
        self.nodes[child.index()].owner = Some(owner);
        self.mark_dirty_and_propagate(owner);
        Ok(())
    }

    /// Appends `child` as the last child of `owner`.
    pub fn add_child(&mut self, owner: NodeId, child: NodeId) -> Result<(), TreeError> {
        let len = self.child_count(owner)?;
        self.insert_child(owner, child, len)
    }

    /// Removes `child` from `owner`.
    ///
    /// When `owner` does not own its children list (it is shared with
    /// another tree), the remaining children are cloned into fresh copies
    /// owned by `owner` and the removed child is left untouched for its real
    /// owner.
    pub fn remove_child(&mut self, owner: NodeId, child: NodeId) -> Result<(), TreeError> {
        let owner_node = self.node(owner)?;
        self.node(child)?;
        if !owner_node.children.contains(&child) {
            return Err(self.report(Some(owner), TreeError::ChildNotFound { owner, child }));
        }

        let first = owner_node.children[0];
        if self.nodes[first.index()].owner == Some(owner) {
            self.nodes[owner.index()].children.retain(|&c| c != child);
            let removed = &mut self.nodes[child.index()];
            removed.layout = LayoutResults::default();
            removed.owner = None;
            self.mark_dirty_and_propagate(owner);
            return Ok(());
        }

        let old_children = self.nodes[owner.index()].children.clone();
        let mut next_insert_index = 0;
        for old_child in old_children.iter().copied() {
            if old_child == child {
                self.mark_dirty_and_propagate(owner);
                continue;
            }
            let new_child = self.materialize_child(old_child, owner, next_insert_index);
            self.nodes[owner.index()].children[next_insert_index] = new_child;
            self.nodes[new_child.index()].owner = Some(owner);
            next_insert_index += 1;
        }
        self.nodes[owner.index()].children.truncate(next_insert_index);
        Ok(())
    }

    pub fn remove_all_children(&mut self, owner: NodeId) -> Result<(), TreeError> {
        let owner_node = self.node(owner)?;
        let Some(&first) = owner_node.children.first() else {
            return Ok(());
        };

        let children = std::mem::take(&mut self.nodes[owner.index()].children);
        if self.nodes[first.index()].owner == Some(owner) {
            for child in children {
                let node = &mut self.nodes[child.index()];
                node.layout = LayoutResults::default();
                node.owner = None;
            }
        }
        self.mark_dirty_and_propagate(owner);
        Ok(())
    }

    /// Puts `child` at `index` without dirtying anything or touching owners.
    pub fn swap_child(&mut self, owner: NodeId, child: NodeId, index: usize) -> Result<(), TreeError> {
        self.node(child)?;
        let len = self.node(owner)?.children.len();
        if index >= len {
            return Err(self.report(Some(owner), TreeError::IndexOutOfBounds { index, len }));
        }
        self.nodes[owner.index()].children[index] = child;
        Ok(())
    }

    /// Replaces the first occurrence of `old_child` with `new_child`.
    pub fn replace_child(&mut self, owner: NodeId, old_child: NodeId, new_child: NodeId) -> Result<(), TreeError> {
        let owner_node = self.node(owner)?;
        let Some(index) = owner_node.children.iter().position(|&c| c == old_child) else {
            return Err(self.report(
                Some(owner),
                TreeError::ChildNotFound {
                    owner,
                    child: old_child,
                },
            ));
        };
        if let Some(existing) = self.node(new_child)?.owner {
            return Err(self.report(
                Some(new_child),
                TreeError::ChildHasOwner {
                    child: new_child,
                    owner: existing,
                },
            ));
        }
        self.check_adoptable(owner, new_child)?;

        self.clone_children_if_needed(owner);
        let old_child = self.nodes[owner.index()].children[index];
        if self.nodes[old_child.index()].owner == Some(owner) {
            let old = &mut self.nodes[old_child.index()];
            old.layout = LayoutResults::default();
            old.owner = None;
        }
        self.nodes[owner.index()].children[index] = new_child;
        self.nodes[new_child.index()].owner = Some(owner);
        self.mark_dirty_and_propagate(owner);
        Ok(())
    }

    /// Replaces the whole children list. Old children that are not in the
    /// new list are detached; children present in both keep their layout.
    pub fn set_children(&mut self, owner: NodeId, children: &[NodeId]) -> Result<(), TreeError> {
        let owner_node = self.node(owner)?;
        if !children.is_empty() && owner_node.has_measure_func() {
            return Err(self.report(Some(owner), TreeError::OwnerHasMeasureFunc(owner)));
        }
        for (i, &child) in children.iter().enumerate() {
            self.check_adoptable(owner, child)?;
            if children[..i].contains(&child) {
                return Err(self.report(Some(child), TreeError::ChildHasOwner { child, owner }));
            }
        }
        if children.is_empty() && owner_node.children.is_empty() {
            return Ok(());
        }

        let old_children = std::mem::replace(&mut self.nodes[owner.index()].children, children.to_vec());
        for old_child in old_children {
            if children.contains(&old_child) {
                continue;
            }
            if let Some(node) = self.nodes.get_mut(old_child.index()) {
                if node.owner == Some(owner) {
                    node.layout = LayoutResults::default();
                    node.owner = None;
                }
            }
        }
        for &child in children {
            self.nodes[child.index()].owner = Some(owner);
        }
        self.mark_dirty_and_propagate(owner);
        Ok(())
    }

    /// Gives `owner` its own copies of its children if it does not own them
    /// yet. Ownership is judged by the first child only: a children list is
    /// either wholly owned or wholly shared.
    pub(crate) fn clone_children_if_needed(&mut self, owner: NodeId) {
        let Some(&first) = self.nodes[owner.index()].children.first() else {
            return;
        };
        if self.nodes[first.index()].owner == Some(owner) {
            return;
        }

        let count = self.nodes[owner.index()].children.len();
        for index in 0..count {
            let old_child = self.nodes[owner.index()].children[index];
            let new_child = self.materialize_child(old_child, owner, index);
            self.nodes[owner.index()].children[index] = new_child;
            self.nodes[new_child.index()].owner = Some(owner);
        }
    }

    /// Copies a shared child, through the config's clone hook when there is
    /// one. A hook that hands back an unusable node falls back to a plain
    /// shallow clone.
    fn materialize_child(&mut self, old_child: NodeId, owner: NodeId, index: usize) -> NodeId {
        let hook = self.node_config(owner).clone_node_func().cloned();
        if let Some(hook) = hook {
            let candidate = hook(self, old_child, owner, index);
            match self.nodes.get(candidate.index()) {
                Some(node) if candidate != old_child && node.owner.is_none() => return candidate,
                _ => self.log(
                    Some(owner),
                    LogLevel::Error,
                    &format!("Clone hook returned an unusable node {} for child {}", candidate, old_child),
                ),
            }
        }
        let mut copy = self.nodes[old_child.index()].clone();
        copy.owner = None;
        NodeId::new(self.nodes.insert(copy))
    }

    // --- Destruction ---

    /// Detaches `node` from its owner, cuts the back-references of the
    /// children it owns and discards it. Children are not freed.
    ///
    /// Fails with [`TreeError::NodeStillShared`] while a children list other
    /// than the owner's still lists `node`, as happens after
    /// [`LayoutTree::clone_node`].
    pub fn free(&mut self, node: NodeId) -> Result<(), TreeError> {
        let entry = self.node(node)?;
        let owner = entry.owner;
        let children = entry.children.clone();
        if let Some(sharer) = self.sharer_of(node, owner) {
            return Err(self.report(Some(node), TreeError::NodeStillShared { node, sharer }));
        }

        if let Some(owner) = owner {
            if let Some(owner_node) = self.nodes.get_mut(owner.index()) {
                owner_node.children.retain(|&c| c != node);
            }
            self.mark_dirty_and_propagate(owner);
        }
        for child in children {
            if let Some(child_node) = self.nodes.get_mut(child.index()) {
                if child_node.owner == Some(node) {
                    child_node.owner = None;
                }
            }
        }
        self.nodes.remove(node.index());
        Ok(())
    }

    /// Frees `root` and every descendant it owns. Shared children owned by
    /// another node survive.
    pub fn free_recursive(&mut self, root: NodeId) -> Result<(), TreeError> {
        let entry = self.node(root)?;
        let children = entry.children.clone();
        if let Some(sharer) = self.sharer_of(root, entry.owner) {
            return Err(self.report(Some(root), TreeError::NodeStillShared { node: root, sharer }));
        }
        for child in children {
            let owned = self.nodes.get(child.index()).is_some_and(|c| c.owner == Some(root));
            if !owned {
                continue;
            }
            if self.sharer_of(child, Some(root)).is_some() {
                // Still listed by a clone of `root`; hand it over unowned.
                self.nodes[child.index()].owner = None;
            } else {
                self.free_recursive(child)?;
            }
        }
        self.free(root)
    }

    /// A node other than `owner` whose children list contains `node`.
    fn sharer_of(&self, node: NodeId, owner: Option<NodeId>) -> Option<NodeId> {
        self.nodes
            .iter()
            .map(|(index, entry)| (NodeId::new(index), entry))
            .find(|&(id, entry)| Some(id) != owner && id != node && entry.children.contains(&node))
            .map(|(id, _)| id)
    }

    /// Returns a detached leaf to its freshly created state, keeping its
    /// config.
    pub fn reset(&mut self, node: NodeId) -> Result<(), TreeError> {
        let entry = self.node(node)?;
        if !entry.children.is_empty() || entry.owner.is_some() {
            return Err(self.report(Some(node), TreeError::ResetNonLeaf(node)));
        }
        let config = entry.config;
        let web_defaults = self.node_config(node).use_web_defaults;
        self.nodes[node.index()] = Node::new(config, web_defaults);
        Ok(())
    }

    /// Counters from the most recent [`LayoutTree::calculate_layout`].
    pub fn last_pass_stats(&self) -> LayoutStats {
        self.stats
    }

    /// Whether the last pass ran the full algorithm for `node` rather than
    /// reusing a cached result or skipping it.
    pub fn was_recomputed(&self, node: NodeId) -> Result<bool, TreeError> {
        let layout = &self.node(node)?.layout;
        Ok(self.last_pass_generation != 0 && layout.computed_generation == self.last_pass_generation)
    }
}
