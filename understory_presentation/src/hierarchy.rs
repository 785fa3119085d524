// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core hierarchy implementation: structure, mutations, queries.

use alloc::vec::Vec;

use crate::types::{NodeFlags, NodeId, NodeKind, NodeSpec, Pane, SplitMode};

impl<D> Default for Hierarchy<D> {
    fn default() -> Self {
        Self::new()
    }
}

/// Tree of presented nodes under a single root surface.
///
/// Nodes live in a generational arena. Two kinds of owning edges exist:
/// container → child (stack members, tabs, panes) and presenter → presented (modal layers).
/// A third, non-owning edge, [`next_of`](Self::next_of), links each node to the responder
/// that receives events it does not consume.
pub struct Hierarchy<D> {
    nodes: Vec<Option<Node<D>>>, // slots
    generations: Vec<u32>,       // last generation per slot (persists across frees)
    free_list: Vec<usize>,
    root: Option<NodeId>,
    split_mode: SplitMode,
}

impl<D> core::fmt::Debug for Hierarchy<D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let total = self.nodes.len();
        let alive = self.nodes.iter().filter(|n| n.is_some()).count();
        let free = self.free_list.len();
        f.debug_struct("Hierarchy")
            .field("nodes_total", &total)
            .field("nodes_alive", &alive)
            .field("free_list", &free)
            .field("root", &self.root)
            .field("split_mode", &self.split_mode)
            .finish_non_exhaustive()
    }
}

#[derive(Clone, Debug)]
struct Node<D> {
    generation: u32,
    kind: NodeKind,
    identity: Option<D>,
    flags: NodeFlags,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    selected: usize,
    presenter: Option<NodeId>,
    presented: Option<NodeId>,
    // Non-owning.
    next: Option<NodeId>,
}

impl<D> Node<D> {
    fn new(generation: u32, kind: NodeKind, identity: Option<D>, flags: NodeFlags) -> Self {
        Self {
            generation,
            kind,
            identity,
            flags,
            parent: None,
            children: Vec::new(),
            selected: 0,
            presenter: None,
            presented: None,
            next: None,
        }
    }
}

impl<D> Hierarchy<D> {
    /// Create a new empty hierarchy.
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: None,
            split_mode: SplitMode::Expanded,
        }
    }

    // --- construction ---

    /// Materialize a blueprint into live nodes and return the (detached) subtree root.
    ///
    /// Out-of-range tab selections are clamped to the last tab.
    pub fn build(&mut self, spec: NodeSpec<D>) -> NodeId {
        let NodeSpec {
            identity,
            kind,
            children,
            selected,
            flags,
        } = spec;
        let id = self.alloc(kind, identity, flags);
        if !kind.is_container() {
            return id;
        }
        let child_ids: Vec<NodeId> = children.into_iter().map(|c| self.build(c)).collect();
        for &child in &child_ids {
            self.node_mut(id).children.push(child);
            self.node_mut(child).parent = Some(id);
        }
        let n = self.node_mut(id);
        n.selected = selected.min(n.children.len().saturating_sub(1));
        self.relink_children(id);
        id
    }

    fn alloc(&mut self, kind: NodeKind, identity: Option<D>, flags: NodeFlags) -> NodeId {
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(Node::new(generation, kind, identity, flags));
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            (idx as u32, generation)
        } else {
            let generation = 1_u32;
            self.nodes
                .push(Some(Node::new(generation, kind, identity, flags)));
            self.generations.push(generation);
            #[allow(
                clippy::cast_possible_truncation,
                reason = "NodeId uses 32-bit indices by design."
            )]
            ((self.nodes.len() - 1) as u32, generation)
        };
        NodeId::new(idx, generation)
    }

    // --- structural mutations ---

    /// Install `node` as the root surface.
    ///
    /// The previous root subtree (including everything it presents) is freed; its now-stale id is returned.
    /// Returns `None` if there was no previous root, or if `node` already was the root.
    pub fn set_root(&mut self, node: NodeId) -> Option<NodeId> {
        if !self.is_alive(node) {
            return None;
        }
        let old = self.root;
        if old == Some(node) {
            return None;
        }
        self.detach(node);
        if let Some(old) = old {
            self.remove(old);
        }
        self.root = Some(node);
        self.node_mut(node).next = None;
        old
    }

    /// Push `node` on top of `stack`.
    ///
    /// Returns false if `stack` is not a live stack container, or if `node` encloses it.
    pub fn push(&mut self, stack: NodeId, node: NodeId) -> bool {
        if self.kind(stack) != Some(NodeKind::Stack)
            || !self.is_alive(node)
            || self.encloses(node, stack)
        {
            return false;
        }
        self.detach(node);
        self.node_mut(stack).children.push(node);
        self.node_mut(node).parent = Some(stack);
        self.relink_children(stack);
        true
    }

    /// Pop the top member of `stack`, freeing it.
    ///
    /// The bottom member is never popped. Returns the stale id of the popped member.
    pub fn pop(&mut self, stack: NodeId) -> Option<NodeId> {
        if self.kind(stack) != Some(NodeKind::Stack) {
            return None;
        }
        let members = &self.node(stack).children;
        if members.len() < 2 {
            return None;
        }
        let top = *members.last()?;
        self.remove(top);
        Some(top)
    }

    /// Pop every member above `member`, freeing them, and return their stale ids (bottom→top).
    ///
    /// Returns an empty list if `member` is not in `stack`.
    pub fn pop_to(&mut self, stack: NodeId, member: NodeId) -> Vec<NodeId> {
        let Some(pos) = self.stack_index_of(stack, member) else {
            return Vec::new();
        };
        let above: Vec<NodeId> = self.node(stack).children[pos + 1..].to_vec();
        self.remove_members(stack, &above)
    }

    /// Replace the members of `stack` with `members` (bottom→top).
    ///
    /// Previous members that are not reused are freed; their stale ids are returned.
    pub fn set_stack_contents(&mut self, stack: NodeId, members: &[NodeId]) -> Vec<NodeId> {
        if self.kind(stack) != Some(NodeKind::Stack) {
            return Vec::new();
        }
        let enclosing = self.path_to(stack);
        let old = core::mem::take(&mut self.node_mut(stack).children);
        for &m in &old {
            self.node_mut(m).parent = None;
        }
        for &m in members {
            if !self.is_alive(m) || enclosing.contains(&m) {
                continue;
            }
            self.detach(m);
            self.node_mut(stack).children.push(m);
            self.node_mut(m).parent = Some(stack);
        }
        let mut dropped = Vec::new();
        for m in old {
            if !members.contains(&m) {
                self.free_subtree(m);
                dropped.push(m);
            }
        }
        self.relink_children(stack);
        dropped
    }

    /// Remove the given members from `stack`, wherever they occur, and free them.
    ///
    /// Surrounding members are relinked so the responder chain stays connected.
    /// Ids that are not members of `stack` are ignored. Returns the stale ids actually removed.
    pub fn remove_members(&mut self, stack: NodeId, members: &[NodeId]) -> Vec<NodeId> {
        if self.kind(stack) != Some(NodeKind::Stack) {
            return Vec::new();
        }
        let mut removed = Vec::new();
        self.node_mut(stack).children.retain(|c| {
            let hit = members.contains(c);
            if hit {
                removed.push(*c);
            }
            !hit
        });
        for &m in &removed {
            self.node_mut(m).parent = None;
            self.free_subtree(m);
        }
        self.relink_children(stack);
        removed
    }

    /// Discard non-essential intermediate members of `stack`.
    ///
    /// The bottom and top members, and any member flagged [`NodeFlags::ESSENTIAL`], are kept.
    pub fn compact_stack(&mut self, stack: NodeId) -> Vec<NodeId> {
        if self.kind(stack) != Some(NodeKind::Stack) {
            return Vec::new();
        }
        let members = &self.node(stack).children;
        if members.len() < 3 {
            return Vec::new();
        }
        let intermediate: Vec<NodeId> = members[1..members.len() - 1]
            .iter()
            .copied()
            .filter(|&m| !self.node(m).flags.contains(NodeFlags::ESSENTIAL))
            .collect();
        self.remove_members(stack, &intermediate)
    }

    /// Present `node` modally over `presenter`.
    ///
    /// Returns false if `presenter` already presents something, or if `node` encloses it.
    pub fn present(&mut self, presenter: NodeId, node: NodeId) -> bool {
        if !self.is_alive(presenter) || !self.is_alive(node) || self.encloses(node, presenter) {
            return false;
        }
        if self.node(presenter).presented.is_some() {
            return false;
        }
        self.detach(node);
        self.node_mut(presenter).presented = Some(node);
        let n = self.node_mut(node);
        n.presenter = Some(presenter);
        n.next = Some(presenter);
        true
    }

    /// Dismiss every modal layer presented from `from`, outermost first.
    ///
    /// Returns the stale ids of the dismissed layers.
    pub fn dismiss_all_presented(&mut self, from: NodeId) -> Vec<NodeId> {
        let chain = self.presented_chain_from(from);
        if let Some(&first) = chain.first() {
            self.remove(first);
        }
        chain
    }

    /// Select tab `index` of a tab container.
    pub fn select_tab(&mut self, tabs: NodeId, index: usize) -> bool {
        match self.node_opt_mut(tabs) {
            Some(n) if n.kind == NodeKind::Tabs && index < n.children.len() => {
                n.selected = index;
                true
            }
            _ => false,
        }
    }

    /// Put `node` into `pane` of a split container, freeing the node it replaces.
    ///
    /// The secondary pane can only be set once a primary pane exists.
    pub fn set_pane(&mut self, split: NodeId, pane: Pane, node: NodeId) -> bool {
        if self.kind(split) != Some(NodeKind::Split)
            || !self.is_alive(node)
            || self.encloses(node, split)
        {
            return false;
        }
        let idx = pane.index();
        if idx > self.node(split).children.len() {
            return false;
        }
        self.detach(node);
        let replaced = {
            let s = self.node_mut(split);
            if idx < s.children.len() {
                Some(core::mem::replace(&mut s.children[idx], node))
            } else {
                s.children.push(node);
                None
            }
        };
        self.node_mut(node).parent = Some(split);
        if let Some(old) = replaced {
            self.node_mut(old).parent = None;
            self.free_subtree(old);
        }
        self.relink_children(split);
        true
    }

    /// Remove a node (its children and everything it presents) from the hierarchy.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_alive(id) {
            return;
        }
        self.detach(id);
        self.free_subtree(id);
    }

    /// Replace the identity tag of a node.
    pub fn set_identity(&mut self, id: NodeId, identity: Option<D>) {
        if let Some(n) = self.node_opt_mut(id) {
            n.identity = identity;
        }
    }

    /// Update node flags.
    pub fn set_flags(&mut self, id: NodeId, flags: NodeFlags) {
        if let Some(n) = self.node_opt_mut(id) {
            n.flags = flags;
        }
    }

    /// Set how split containers are displayed.
    pub fn set_split_mode(&mut self, mode: SplitMode) {
        self.split_mode = mode;
    }

    // --- queries ---

    /// Returns true if `id` refers to a live node.
    ///
    /// See [`NodeId`] docs for the generational semantics.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .map(|n| n.generation == id.1)
            .unwrap_or(false)
    }

    /// Number of live nodes, attached or not.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    /// Returns true if no node is alive.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The root surface, if one has been set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Current split display mode.
    pub fn split_mode(&self) -> SplitMode {
        self.split_mode
    }

    /// Identity tag of a live node.
    pub fn identity(&self, id: NodeId) -> Option<&D> {
        self.get(id)?.identity.as_ref()
    }

    /// Kind of a live node.
    pub fn kind(&self, id: NodeId) -> Option<NodeKind> {
        self.get(id).map(|n| n.kind)
    }

    /// Flags of a live node.
    pub fn flags(&self, id: NodeId) -> Option<NodeFlags> {
        self.get(id).map(|n| n.flags)
    }

    /// Children of a live container, in container order. Empty for screens and stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Owning container of a node, if it is a child.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent
    }

    /// Node that presents `id` modally, if any.
    pub fn presenter(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.presenter
    }

    /// Node presented modally over `id`, if any.
    pub fn presented(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.presented
    }

    /// Next responder of `id`.
    pub fn next_of(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.next
    }

    /// Index of the selected tab of a tab container.
    pub fn selected_tab(&self, tabs: NodeId) -> Option<usize> {
        match self.get(tabs) {
            Some(n) if n.kind == NodeKind::Tabs => Some(n.selected),
            _ => None,
        }
    }

    /// Node currently in `pane` of a split container.
    pub fn pane(&self, split: NodeId, pane: Pane) -> Option<NodeId> {
        match self.get(split) {
            Some(n) if n.kind == NodeKind::Split => n.children.get(pane.index()).copied(),
            _ => None,
        }
    }

    /// Position of `member` in `stack`, bottom = 0.
    pub fn stack_index_of(&self, stack: NodeId, member: NodeId) -> Option<usize> {
        match self.get(stack) {
            Some(n) if n.kind == NodeKind::Stack => n.children.iter().position(|&c| c == member),
            _ => None,
        }
    }

    /// The chain of modal layers presented from `from`, outermost first.
    pub fn presented_chain_from(&self, from: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = self.presented(from);
        while let Some(p) = cur {
            out.push(p);
            // Nested presentations may hang off any node of the layer's visible path.
            cur = self
                .visible_path_from(p)
                .into_iter()
                .find_map(|n| self.presented(n));
        }
        out
    }

    /// The topmost visible node, or `None` for an empty hierarchy.
    pub fn topmost(&self) -> Option<NodeId> {
        self.root.map(|r| self.topmost_from(r))
    }

    /// The topmost visible node at or above `node`.
    ///
    /// Descends into presented modals, the selected tab, the top of a stack, or the last pane
    /// of a split, until none apply.
    pub fn topmost_from(&self, node: NodeId) -> NodeId {
        self.visible_path_from(node).last().copied().unwrap_or(node)
    }

    /// Root→topmost path of visible nodes.
    pub fn visible_path(&self) -> Vec<NodeId> {
        self.root
            .map(|r| self.visible_path_from(r))
            .unwrap_or_default()
    }

    /// `node`→topmost path of visible nodes.
    pub fn visible_path_from(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = Some(node);
        while let Some(id) = cur {
            let Some(n) = self.get(id) else { break };
            out.push(id);
            cur = n.presented.or_else(|| match n.kind {
                NodeKind::Screen => None,
                NodeKind::Stack | NodeKind::Split => n.children.last().copied(),
                NodeKind::Tabs => n.children.get(n.selected).copied(),
            });
        }
        out
    }

    /// Deepest container of `kind` within the topmost modal layer.
    ///
    /// Containers underneath a presented modal are covered and never returned.
    pub fn active_container(&self, kind: NodeKind) -> Option<NodeId> {
        let mut found = None;
        let mut prev: Option<NodeId> = None;
        for id in self.visible_path() {
            if prev.is_some_and(|p| self.presented(p) == Some(id)) {
                found = None;
            }
            if self.kind(id) == Some(kind) {
                found = Some(id);
            }
            prev = Some(id);
        }
        found
    }

    /// The stack that push and pop operate on.
    pub fn active_stack(&self) -> Option<NodeId> {
        self.active_container(NodeKind::Stack)
    }

    /// The split container that pane-targeted operations address.
    pub fn active_split(&self) -> Option<NodeId> {
        self.active_container(NodeKind::Split)
    }

    /// The most recently presented modal layer on the visible path, if any.
    pub fn top_presented(&self) -> Option<NodeId> {
        let path = self.visible_path();
        path.windows(2)
            .rev()
            .find(|w| self.presented(w[0]) == Some(w[1]))
            .map(|w| w[1])
    }

    /// Root→`node` path following container and presenter edges.
    ///
    /// Returns just `[node]` for a detached node and an empty list for a stale id.
    pub fn path_to(&self, node: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut cur = Some(node);
        while let Some(id) = cur {
            let Some(n) = self.get(id) else { break };
            out.push(id);
            cur = n.parent.or(n.presenter);
        }
        out.reverse();
        out
    }

    /// Returns true if `node` is `target` or lies on its path from the root.
    fn encloses(&self, node: NodeId, target: NodeId) -> bool {
        self.path_to(target).contains(&node)
    }

    /// Returns true if `node` is reachable from the root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.root.is_some() && self.path_to(node).first().copied() == self.root
    }

    /// Depth-first search from the root.
    ///
    /// Every stack member, every tab, every pane, and every presented node is visited,
    /// not just the visible ones. Children are visited before a node's presented modal.
    pub fn find(&self, pred: impl FnMut(&Self, NodeId) -> bool) -> Option<NodeId> {
        self.find_from(self.root?, pred)
    }

    /// Depth-first search of the subtree rooted at `start`.
    pub fn find_from(
        &self,
        start: NodeId,
        mut pred: impl FnMut(&Self, NodeId) -> bool,
    ) -> Option<NodeId> {
        let mut pending = Vec::new();
        pending.push(start);
        while let Some(id) = pending.pop() {
            let Some(n) = self.get(id) else { continue };
            if pred(self, id) {
                return Some(id);
            }
            pending.extend(n.presented);
            pending.extend(n.children.iter().rev().copied());
        }
        None
    }

    /// Returns true if no live node has a responder link to a freed node.
    pub fn responder_links_are_live(&self) -> bool {
        self.nodes
            .iter()
            .flatten()
            .all(|n| n.next.is_none_or(|next| self.is_alive(next)))
    }

    // --- internals ---

    fn get(&self, id: NodeId) -> Option<&Node<D>> {
        let n = self.nodes.get(id.idx())?.as_ref()?;
        (n.generation == id.1).then_some(n)
    }

    /// Access a node; panics if `id` is stale.
    fn node(&self, id: NodeId) -> &Node<D> {
        self.nodes[id.idx()].as_ref().expect("dangling NodeId")
    }

    /// Access a node mutably; panics if `id` is stale.
    fn node_mut(&mut self, id: NodeId) -> &mut Node<D> {
        self.nodes[id.idx()].as_mut().expect("dangling NodeId")
    }

    fn node_opt_mut(&mut self, id: NodeId) -> Option<&mut Node<D>> {
        let n = self.nodes.get_mut(id.idx())?.as_mut()?;
        if n.generation != id.1 {
            return None;
        }
        Some(n)
    }

    /// Unlink `id` from its container, presenter, or the root slot.
    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            let p = self.node_mut(parent);
            p.children.retain(|c| *c != id);
            p.selected = p.selected.min(p.children.len().saturating_sub(1));
            self.relink_children(parent);
        }
        if let Some(presenter) = self.node(id).presenter {
            self.node_mut(presenter).presented = None;
        }
        if self.root == Some(id) {
            self.root = None;
        }
        let n = self.node_mut(id);
        n.parent = None;
        n.presenter = None;
        n.next = None;
    }

    /// Free `id` and everything below it. The caller has already unlinked `id`.
    fn free_subtree(&mut self, id: NodeId) {
        let Some(n) = self.nodes[id.idx()].take() else {
            return;
        };
        self.free_list.push(id.idx());
        for child in n.children {
            self.free_subtree(child);
        }
        if let Some(p) = n.presented {
            self.free_subtree(p);
        }
    }

    /// Re-derive the responder links of a container's children.
    ///
    /// Stack members link to the member below them (the bottom member to the stack);
    /// tabs and panes link to their container.
    fn relink_children(&mut self, container: NodeId) {
        let (kind, children) = {
            let c = self.node(container);
            (c.kind, c.children.clone())
        };
        for (i, &child) in children.iter().enumerate() {
            let next = match kind {
                NodeKind::Stack if i > 0 => children[i - 1],
                _ => container,
            };
            self.node_mut(child).next = Some(next);
        }
    }
}

impl<D: PartialEq> Hierarchy<D> {
    /// Find the first node (depth-first from the root) whose identity equals `identity`.
    ///
    /// Matching is structural: logically equal identities on distinct nodes all match.
    pub fn find_identity(&self, identity: &D) -> Option<NodeId> {
        self.find(|h, id| h.identity(id) == Some(identity))
    }

    /// Members of `stack` whose identity equals `identity`, bottom→top.
    pub fn stack_members_matching(&self, stack: NodeId, identity: &D) -> Vec<NodeId> {
        self.children(stack)
            .iter()
            .copied()
            .filter(|&m| self.identity(m) == Some(identity))
            .collect()
    }
}
