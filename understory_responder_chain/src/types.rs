// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Core types for the responder chain: responders and next-link lookups.
//!
//! ## Overview
//!
//! These types describe the responder protocol.
//! They are consumed by the [`chain`](crate::chain) module and implemented by downstream toolkits.

use alloc::boxed::Box;
use futures::future::LocalBoxFuture;

/// An object that may consume events.
///
/// Handling is asynchronous and cooperative: a responder may await other work (including
/// further navigation) before deciding. Return `true` to consume the event; `false` lets it
/// continue to the next responder.
pub trait Responder<E> {
    /// Handle `event`, resolving to whether it was consumed.
    fn handle<'a>(&'a self, event: &'a E) -> LocalBoxFuture<'a, bool>;
}

/// Look up the next responder of a node.
///
/// The link is non-owning: implementations must never keep a node alive because something links to it.
pub trait NextLookup<K> {
    /// Returns the next responder of `node`, or `None` at the end of the chain.
    fn next_of(&self, node: &K) -> Option<K>;
}

/// A lookup with no links; every chain is a singleton.
#[derive(Copy, Clone, Debug, Default)]
pub struct NoNext;

impl<K> NextLookup<K> for NoNext {
    #[inline]
    fn next_of(&self, _node: &K) -> Option<K> {
        None
    }
}

/// A responder backed by a synchronous predicate.
pub struct FnResponder<F> {
    f: F,
}

impl<F> FnResponder<F> {
    /// Wrap `f`; it returns `true` for events it consumes.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> core::fmt::Debug for FnResponder<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnResponder").finish_non_exhaustive()
    }
}

impl<E, F: Fn(&E) -> bool> Responder<E> for FnResponder<F> {
    fn handle<'a>(&'a self, event: &'a E) -> LocalBoxFuture<'a, bool> {
        let handled = (self.f)(event);
        Box::pin(core::future::ready(handled))
    }
}
