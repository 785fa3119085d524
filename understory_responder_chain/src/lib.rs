// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_responder_chain --heading-base-level=0

//! Understory Responder Chain: asynchronous, `no_std` event propagation along `next` links.
//!
//! ## Overview
//!
//! Every presented node may have a responder, and every node has a non-owning `next` link
//! (a screen to the screen beneath it, a stack member to the stack, a modal to its presenter, …).
//! An event starts at one node and walks outward: each responder on the way either consumes the
//! event or lets it continue to `next`. Nodes without a responder forward implicitly.
//!
//! ## Inputs
//!
//! - A [`NextLookup`](crate::types::NextLookup) that answers "what is the next responder of this node".
//!   With the `presentation_adapter` feature, `understory_presentation::Hierarchy` implements it.
//! - A [`ResponderChain`](crate::chain::ResponderChain) registry mapping node keys to
//!   [`Responder`](crate::types::Responder) objects.
//!
//! ## Layering
//!
//! Resolving the path is synchronous and borrows the lookup only briefly; delivery is asynchronous
//! and owns everything it needs. This lets callers keep their hierarchy behind a `RefCell` and still
//! await responders that themselves trigger navigation.
//!
//! ## Workflow
//!
//! 1) Compute the path with [`ResponderChain::path_from`](crate::chain::ResponderChain::path_from).
//! 2) Snapshot the responders with [`ResponderChain::responders_along`](crate::chain::ResponderChain::responders_along).
//! 3) Await [`dispatch`](crate::chain::dispatch); it returns the key of the consuming node, if any.
//!
//! ```
//! use std::rc::Rc;
//! use futures::executor::block_on;
//! use understory_responder_chain::chain::{ResponderChain, dispatch};
//! use understory_responder_chain::types::{FnResponder, NextLookup};
//!
//! struct Outward;
//! impl NextLookup<u32> for Outward {
//!     fn next_of(&self, node: &u32) -> Option<u32> {
//!         node.checked_sub(1)
//!     }
//! }
//!
//! let mut chain: ResponderChain<u32, &str> = ResponderChain::new();
//! chain.attach(0, Rc::new(FnResponder::new(|e: &&str| *e == "back")));
//!
//! let path = chain.path_from(3, &Outward);
//! assert_eq!(path, vec![3, 2, 1, 0]);
//! let responders = chain.responders_along(&path);
//! assert_eq!(block_on(dispatch(&responders, &"back")), Some(0));
//! assert_eq!(block_on(dispatch(&responders, &"other")), None);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

pub mod adapters;
pub mod chain;
pub mod types;
