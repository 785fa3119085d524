// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_presentation --heading-base-level=0

//! Understory Presentation: an arena-backed presentation hierarchy for app navigation.
//!
//! The hierarchy models what a mobile-style app shows: a single root surface holding nested
//! stack containers, tab containers, split (multi-pane) containers, and layered modal presentations.
//!
//! - Nodes are addressed by generational [`NodeId`] handles; stale handles never alias live nodes.
//! - Nodes optionally carry an identity tag `D`. Search matches tags structurally (`PartialEq`),
//!   never by handle, so two nodes showing logically equal destinations are both found.
//! - Each node has a non-owning responder link ([`Hierarchy::next_of`]) that mirrors presentation
//!   nesting and is kept connected across every structural mutation.
//!
//! ## Not a renderer
//!
//! This crate does not animate or draw anything. Mutations here are synchronous model updates;
//! a higher layer (for example `understory_navigator`) sequences them with transition animations.
//!
//! ## API overview
//!
//! - [`Hierarchy`]: the arena and all structural operations.
//! - [`NodeSpec`]: a value blueprint of a subtree, materialized with [`Hierarchy::build`].
//! - [`NodeKind`]: screen, stack, tabs, or split.
//! - [`NodeFlags`]: per-node flags, e.g. [`NodeFlags::ESSENTIAL`] for compaction.
//! - [`Pane`] and [`SplitMode`]: split container addressing and display mode.
//!
//! Key operations:
//! - Queries: [`Hierarchy::topmost`], [`Hierarchy::find`], [`Hierarchy::find_identity`],
//!   [`Hierarchy::active_stack`], [`Hierarchy::path_to`].
//! - Mutations: [`Hierarchy::set_root`], [`Hierarchy::push`], [`Hierarchy::pop`], [`Hierarchy::pop_to`],
//!   [`Hierarchy::set_stack_contents`], [`Hierarchy::remove_members`], [`Hierarchy::present`],
//!   [`Hierarchy::dismiss_all_presented`], [`Hierarchy::select_tab`], [`Hierarchy::set_pane`],
//!   [`Hierarchy::compact_stack`].
//!
//! ## Responder links
//!
//! - Stack member *k* links to member *k − 1*; the bottom member links to the stack.
//! - Tabs and panes link to their container.
//! - A presented node links to its presenter.
//! - The root has no link.
//!
//! # Example
//!
//! ```rust
//! use understory_presentation::{Hierarchy, NodeSpec};
//!
//! let mut h = Hierarchy::new();
//! let stack = h.build(NodeSpec::stack(vec![NodeSpec::screen("home")]));
//! h.set_root(stack);
//!
//! let detail = h.build(NodeSpec::screen("detail"));
//! h.push(stack, detail);
//! assert_eq!(h.topmost(), Some(detail));
//!
//! // Responder links run from the top of the stack outward.
//! let home = h.find_identity(&"home").unwrap();
//! assert_eq!(h.next_of(detail), Some(home));
//! assert_eq!(h.next_of(home), Some(stack));
//!
//! // Present a sheet over the top screen.
//! let sheet = h.build(NodeSpec::screen("sheet"));
//! h.present(detail, sheet);
//! assert_eq!(h.topmost(), Some(sheet));
//! assert_eq!(h.active_stack(), None, "the stack is covered by the sheet");
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod hierarchy;
mod types;

pub use hierarchy::Hierarchy;
pub use types::{NodeFlags, NodeId, NodeKind, NodeSpec, Pane, SplitMode};
