// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Responder registry and dispatch.
//!
//! ## Overview
//!
//! [`ResponderChain`] stores which node has which responder. It never owns the structure the
//! responders are arranged in; that comes from a [`NextLookup`] at dispatch time.
//!
//! ## Ordering
//!
//! - The path starts at the target node and follows `next` links outward.
//! - Responders are awaited one at a time, in path order.
//! - The first responder that consumes the event stops propagation.
//!
//! ## Cycles
//!
//! A well-formed lookup is acyclic. [`ResponderChain::path_from`] still stops at the first
//! repeated node, so a corrupted link can never cause an endless walk.

use alloc::rc::Rc;
use alloc::vec::Vec;

use crate::types::{NextLookup, Responder};

/// Registry of responders keyed by node.
pub struct ResponderChain<K, E> {
    entries: Vec<(K, Rc<dyn Responder<E>>)>,
}

impl<K, E> Default for ResponderChain<K, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, E> core::fmt::Debug for ResponderChain<K, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ResponderChain")
            .field("responders", &self.entries.len())
            .finish_non_exhaustive()
    }
}

impl<K, E> ResponderChain<K, E> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Number of registered responders.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no responder is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every responder whose node fails `keep`.
    ///
    /// Call after structural removals so freed nodes do not pin their responders.
    pub fn retain_live(&mut self, mut keep: impl FnMut(&K) -> bool) {
        self.entries.retain(|(k, _)| keep(k));
    }
}

impl<K: Copy + Eq, E> ResponderChain<K, E> {
    /// Attach `responder` to `node`, replacing any previous one.
    pub fn attach(&mut self, node: K, responder: Rc<dyn Responder<E>>) {
        if let Some(slot) = self.entries.iter_mut().find(|(k, _)| *k == node) {
            slot.1 = responder;
        } else {
            self.entries.push((node, responder));
        }
    }

    /// Detach and return the responder of `node`.
    pub fn detach(&mut self, node: K) -> Option<Rc<dyn Responder<E>>> {
        let pos = self.entries.iter().position(|(k, _)| *k == node)?;
        Some(self.entries.swap_remove(pos).1)
    }

    /// The responder attached to `node`.
    pub fn get(&self, node: K) -> Option<Rc<dyn Responder<E>>> {
        self.entries
            .iter()
            .find(|(k, _)| *k == node)
            .map(|(_, r)| Rc::clone(r))
    }

    /// The propagation path from `start` outward, `start` first.
    pub fn path_from(&self, start: K, lookup: &impl NextLookup<K>) -> Vec<K> {
        let mut out = Vec::new();
        let mut cur = Some(start);
        while let Some(k) = cur {
            if out.contains(&k) {
                break;
            }
            out.push(k);
            cur = lookup.next_of(&k);
        }
        out
    }

    /// Snapshot the responders along `path`, skipping nodes without one.
    pub fn responders_along(&self, path: &[K]) -> Vec<(K, Rc<dyn Responder<E>>)> {
        path.iter()
            .filter_map(|&k| self.get(k).map(|r| (k, r)))
            .collect()
    }
}

/// Deliver `event` along a responder snapshot.
///
/// Returns the node whose responder consumed the event, or `None` if every responder declined.
pub async fn dispatch<K: Copy, E>(
    responders: &[(K, Rc<dyn Responder<E>>)],
    event: &E,
) -> Option<K> {
    for (node, responder) in responders {
        if responder.handle(event).await {
            return Some(*node);
        }
    }
    None
}
