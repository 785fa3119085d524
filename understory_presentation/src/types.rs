// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Public types for the presentation hierarchy: node identifiers, kinds, flags, and blueprints.

use alloc::vec::Vec;

/// Identifier for a node in the hierarchy.
///
/// This is a small, copyable handle that stays stable across structural changes but becomes
/// invalid once the node is removed (popped, dismissed, or replaced).
/// It consists of a slot index and a generation counter.
///
/// ## Semantics
///
/// - On insert, a fresh slot is allocated with generation `1`.
/// - On remove, the slot is freed; any existing `NodeId` that pointed to that slot is now stale.
/// - On reuse of a freed slot, its generation is incremented, producing a new, distinct `NodeId`.
///
/// ### Liveness
///
/// Use [`Hierarchy::is_alive`](crate::Hierarchy::is_alive) to check whether a `NodeId` still refers to a live node.
/// Stale `NodeId`s never alias a different live node because the generation must match.
///
/// ### Notes
///
/// - The generation increments on slot reuse and never decreases.
/// - `u32` is ample for practical lifetimes; behavior on generation overflow is unspecified.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct NodeId(pub(crate) u32, pub(crate) u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// Structural role of a node.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NodeKind {
    /// A leaf screen. Has no children but may present a modal.
    Screen,
    /// An ordered stack; the last member is on top.
    Stack,
    /// A tab container; exactly one child is selected.
    Tabs,
    /// A multi-pane container; see [`Pane`].
    Split,
}

impl NodeKind {
    /// Returns true for every kind that owns children.
    pub const fn is_container(self) -> bool {
        !matches!(self, Self::Screen)
    }
}

bitflags::bitflags! {
    /// Per-node flags.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct NodeFlags: u8 {
        /// Stack member that must survive [compaction](crate::Hierarchy::compact_stack).
        const ESSENTIAL = 0b0000_0001;
    }
}

/// A pane of a split container.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Pane {
    /// The leading (sidebar or master) pane.
    Primary,
    /// The trailing (detail) pane.
    Secondary,
}

impl Pane {
    pub(crate) const fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }
}

/// Whether split containers show all panes or collapse into a single visible stack.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum SplitMode {
    /// Every pane is visible.
    #[default]
    Expanded,
    /// Only one column is visible; pane-targeted navigation degrades to stack navigation.
    Collapsed,
}

/// A value description of a node subtree.
///
/// Destination resolvers return these; [`Hierarchy::build`](crate::Hierarchy::build)
/// materializes one into live, detached nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeSpec<D> {
    /// Identity tag of the node, if any.
    pub identity: Option<D>,
    /// Structural role.
    pub kind: NodeKind,
    /// Children in container order (stack bottom→top, tabs left→right, panes primary→secondary).
    pub children: Vec<Self>,
    /// Selected child index; only meaningful for [`NodeKind::Tabs`].
    pub selected: usize,
    /// Initial flags.
    pub flags: NodeFlags,
}

impl<D> NodeSpec<D> {
    fn container(kind: NodeKind, children: Vec<Self>) -> Self {
        Self {
            identity: None,
            kind,
            children,
            selected: 0,
            flags: NodeFlags::empty(),
        }
    }

    /// A leaf screen tagged with `identity`.
    pub fn screen(identity: D) -> Self {
        Self {
            identity: Some(identity),
            ..Self::container(NodeKind::Screen, Vec::new())
        }
    }

    /// An untagged stack container.
    pub fn stack(members: Vec<Self>) -> Self {
        Self::container(NodeKind::Stack, members)
    }

    /// An untagged tab container with `selected` as the visible tab.
    pub fn tabs(tabs: Vec<Self>, selected: usize) -> Self {
        Self {
            selected,
            ..Self::container(NodeKind::Tabs, tabs)
        }
    }

    /// An untagged split container.
    pub fn split(primary: Self, secondary: Option<Self>) -> Self {
        let mut panes = Vec::with_capacity(2);
        panes.push(primary);
        panes.extend(secondary);
        Self::container(NodeKind::Split, panes)
    }

    /// Tag this node with `identity`.
    #[must_use]
    pub fn with_identity(mut self, identity: D) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Replace the initial flags.
    #[must_use]
    pub fn with_flags(mut self, flags: NodeFlags) -> Self {
        self.flags = flags;
        self
    }
}
