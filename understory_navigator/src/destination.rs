// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Destinations: what the caller wants visible next.

use core::fmt::Debug;

use understory_presentation::{Hierarchy, NodeId};

/// Requirements on destination identity types.
///
/// Equality must be structural: two independently constructed identities with equal fields are equal.
/// Composite identities (for example a tab container listing its tabs) are fine.
pub trait Identity: Clone + PartialEq + Debug + 'static {}

impl<T: Clone + PartialEq + Debug + 'static> Identity for T {}

/// A navigation target.
#[derive(Clone, Debug, PartialEq)]
pub enum Destination<D> {
    /// An identity still to be resolved into a node.
    Identity(D),
    /// A node that already exists in the arena.
    ///
    /// Inserting strategies require it to be detached; revealing strategies accept attached nodes.
    Node(NodeId),
}

impl<D> From<D> for Destination<D> {
    fn from(identity: D) -> Self {
        Self::Identity(identity)
    }
}

impl<D: PartialEq> Destination<D> {
    /// The identity this destination stands for, if any.
    pub fn identity<'a>(&'a self, hierarchy: &'a Hierarchy<D>) -> Option<&'a D> {
        match self {
            Self::Identity(identity) => Some(identity),
            Self::Node(id) => hierarchy.identity(*id),
        }
    }

    /// Returns true if `node` shows this destination.
    ///
    /// Identities compare structurally; an untagged concrete node only matches itself.
    pub fn matches(&self, hierarchy: &Hierarchy<D>, node: NodeId) -> bool {
        if let Self::Node(id) = self
            && *id == node
        {
            return true;
        }
        match self.identity(hierarchy) {
            Some(identity) => hierarchy.identity(node) == Some(identity),
            None => false,
        }
    }

    /// The first attached node showing this destination, searching the whole hierarchy.
    pub fn find_in(&self, hierarchy: &Hierarchy<D>) -> Option<NodeId> {
        if let Self::Node(id) = self
            && hierarchy.is_attached(*id)
        {
            return Some(*id);
        }
        let identity = self.identity(hierarchy)?;
        hierarchy.find_identity(identity)
    }
}
