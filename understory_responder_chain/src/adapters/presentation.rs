// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Adapter for Understory Presentation.
//!
//! ## Feature
//!
//! Enable with `presentation_adapter`.
//!
//! ## Notes
//!
//! The hierarchy already maintains the `next` links; this adapter only exposes them.
//! Stale ids have no next responder, so a path never walks into a freed node.

use understory_presentation::{Hierarchy, NodeId};

use crate::types::NextLookup;

impl<D> NextLookup<NodeId> for Hierarchy<D> {
    #[inline]
    fn next_of(&self, node: &NodeId) -> Option<NodeId> {
        Self::next_of(self, *node)
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;
    use understory_presentation::{Hierarchy, NodeSpec};

    use crate::chain::ResponderChain;

    #[test]
    fn path_follows_hierarchy_links() {
        let mut h = Hierarchy::new();
        let stack = h.build(NodeSpec::stack(vec![
            NodeSpec::screen("a"),
            NodeSpec::screen("b"),
        ]));
        h.set_root(stack);
        let top = h.topmost().unwrap();
        let sheet = h.build(NodeSpec::screen("sheet"));
        h.present(top, sheet);

        let chain: ResponderChain<_, ()> = ResponderChain::new();
        let a = h.children(stack)[0];
        assert_eq!(chain.path_from(sheet, &h), vec![sheet, top, a, stack]);
    }
}
