// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The destination resolver boundary (the screen factory).

use std::rc::Rc;

use understory_presentation::NodeSpec;
use understory_responder_chain::types::Responder;

use crate::event::NavigationEvent;

/// Turns destination identities into node blueprints.
///
/// The engine resolves each identity at most once per navigation step and tags the resulting
/// root node with the identity itself.
pub trait DestinationResolver<D, E> {
    /// Describe the node (or subtree) that presents `identity`.
    fn resolve(&self, identity: &D) -> NodeSpec<D>;

    /// The responder for a freshly materialized node tagged with `identity`.
    ///
    /// Called for every tagged node of a resolved subtree.
    fn responder_for(&self, _identity: &D) -> Option<Rc<dyn Responder<NavigationEvent<E>>>> {
        None
    }
}

/// Resolves every identity into a plain screen.
#[derive(Copy, Clone, Debug, Default)]
pub struct ScreenResolver;

impl<D: Clone, E> DestinationResolver<D, E> for ScreenResolver {
    fn resolve(&self, identity: &D) -> NodeSpec<D> {
        NodeSpec::screen(identity.clone())
    }
}

/// A resolver backed by a closure.
pub struct FnResolver<F> {
    f: F,
}

impl<F> FnResolver<F> {
    /// Wrap `f`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> core::fmt::Debug for FnResolver<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnResolver").finish_non_exhaustive()
    }
}

impl<D, E, F: Fn(&D) -> NodeSpec<D>> DestinationResolver<D, E> for FnResolver<F> {
    fn resolve(&self, identity: &D) -> NodeSpec<D> {
        (self.f)(identity)
    }
}
