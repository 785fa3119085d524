// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Interception: deferring a navigation until an external condition holds.
//!
//! ## Overview
//!
//! Before each chain link is dispatched, the [`Interceptor`] sees its destination. Returning an
//! [`InterceptionResult`] parks the rest of the chain (together with the chain's event and the
//! caller's completion) in the [`InterceptionGate`] under the result's reason, and runs the
//! substitute chain instead. The caller keeps waiting.
//!
//! Later, some other part of the application resolves the reason with a [`Resolution`]. The
//! parked chain is replayed, optionally surrounded by extra links and with its first strategy
//! replaced, and the original caller receives the replay's outcome.
//!
//! ## Lifecycle
//!
//! - At most one entry exists per reason. Parking under a reason that is already pending drops
//!   the older entry; its caller completes with [`NavigationError::Abandoned`].
//! - Clearing an entry likewise completes the parked caller with [`NavigationError::Abandoned`].
//! - A parked caller's future holds its navigator, and with it the gate. Dropping that future
//!   is how a caller stops waiting; the entry itself stays until it is resolved or cleared.
//! - Resolving an unknown reason does nothing.

use core::fmt::Debug;
use core::future::Future;
use core::hash::Hash;
use core::pin::Pin;
use core::task::{Context, Poll};
use std::collections::HashMap;

use futures::channel::oneshot;
use understory_presentation::Hierarchy;

use crate::chain::NavigationChain;
use crate::destination::Destination;
use crate::error::{NavigationError, Outcome};
use crate::strategy::NavigationStrategy;

/// What to do instead of an intercepted navigation.
#[derive(Clone, Debug, PartialEq)]
pub struct InterceptionResult<D, E, R> {
    /// The chain to run now.
    pub chain: NavigationChain<D>,
    /// Event delivered with the substitute chain.
    pub event: Option<E>,
    /// Key under which the original request is parked.
    pub reason: R,
}

impl<D, E, R> InterceptionResult<D, E, R> {
    /// Redirect to `chain`, parking the original under `reason`.
    pub fn new(chain: NavigationChain<D>, reason: R) -> Self {
        Self {
            chain,
            event: None,
            reason,
        }
    }

    /// Deliver `event` with the substitute chain.
    #[must_use]
    pub fn with_event(mut self, event: E) -> Self {
        self.event = Some(event);
        self
    }
}

/// Decides, per destination, whether a navigation has to wait.
pub trait Interceptor<D, E, R> {
    /// Inspect `destination` against the current `hierarchy`; `None` lets it through.
    fn intercept(
        &self,
        destination: &Destination<D>,
        hierarchy: &Hierarchy<D>,
    ) -> Option<InterceptionResult<D, E, R>>;
}

/// An interceptor backed by a closure.
pub struct FnInterceptor<F> {
    f: F,
}

impl<F> FnInterceptor<F> {
    /// Wrap `f`.
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Debug for FnInterceptor<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("FnInterceptor").finish_non_exhaustive()
    }
}

impl<D, E, R, F> Interceptor<D, E, R> for FnInterceptor<F>
where
    F: Fn(&Destination<D>, &Hierarchy<D>) -> Option<InterceptionResult<D, E, R>>,
{
    fn intercept(
        &self,
        destination: &Destination<D>,
        hierarchy: &Hierarchy<D>,
    ) -> Option<InterceptionResult<D, E, R>> {
        (self.f)(destination, hierarchy)
    }
}

/// How to replay a parked navigation.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution<D> {
    /// Replaces the strategy of the parked chain's first link.
    pub strategy: Option<NavigationStrategy>,
    /// Links run before the parked chain.
    pub prefix: NavigationChain<D>,
    /// Links run after the parked chain.
    pub suffix: NavigationChain<D>,
}

impl<D> Default for Resolution<D> {
    fn default() -> Self {
        Self {
            strategy: None,
            prefix: Vec::new(),
            suffix: Vec::new(),
        }
    }
}

impl<D> Resolution<D> {
    /// Replay the parked chain unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the first link's strategy.
    #[must_use]
    pub fn with_strategy(mut self, strategy: NavigationStrategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Run `prefix` first.
    #[must_use]
    pub fn with_prefix(mut self, prefix: NavigationChain<D>) -> Self {
        self.prefix = prefix;
        self
    }

    /// Run `suffix` last.
    #[must_use]
    pub fn with_suffix(mut self, suffix: NavigationChain<D>) -> Self {
        self.suffix = suffix;
        self
    }

    /// Assemble the chain to replay.
    pub(crate) fn apply(self, mut parked: NavigationChain<D>) -> NavigationChain<D> {
        if let (Some(strategy), Some(first)) = (self.strategy, parked.first_mut()) {
            first.strategy = strategy;
        }
        let mut chain = self.prefix;
        chain.append(&mut parked);
        chain.extend(self.suffix);
        chain
    }
}

/// A parked navigation: the remaining chain, its event, and the waiting caller.
pub struct PendingNavigation<D, E> {
    /// Links that have not run yet.
    pub chain: NavigationChain<D>,
    /// The event for the chain's final link.
    pub event: Option<E>,
    completion: oneshot::Sender<Outcome>,
}

impl<D: Debug, E> Debug for PendingNavigation<D, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("PendingNavigation")
            .field("chain", &self.chain)
            .field("has_event", &self.event.is_some())
            .finish_non_exhaustive()
    }
}

impl<D, E> PendingNavigation<D, E> {
    pub(crate) fn into_parts(
        self,
    ) -> (NavigationChain<D>, Option<E>, oneshot::Sender<Outcome>) {
        (self.chain, self.event, self.completion)
    }

    /// Hand `outcome` to the waiting caller.
    ///
    /// Does nothing if the caller stopped waiting.
    pub fn complete(self, outcome: Outcome) {
        let _ = self.completion.send(outcome);
    }
}

/// The pending map: at most one parked navigation per reason.
pub struct InterceptionGate<D, E, R> {
    pending: HashMap<R, PendingNavigation<D, E>>,
}

impl<D, E, R> Default for InterceptionGate<D, E, R> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<D, E, R: Debug> Debug for InterceptionGate<D, E, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("InterceptionGate")
            .field("reasons", &self.pending.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl<D, E, R: Eq + Hash + Clone> InterceptionGate<D, E, R> {
    /// Create an empty gate.
    pub fn new() -> Self {
        Self::default()
    }

    /// Park `chain` under `reason`, replacing any entry already there.
    ///
    /// The returned future completes when the entry is resolved, or with
    /// [`NavigationError::Abandoned`] when it is dropped.
    pub fn park(&mut self, reason: R, chain: NavigationChain<D>, event: Option<E>) -> Resumed {
        let (completion, receiver) = oneshot::channel();
        let pending = PendingNavigation {
            chain,
            event,
            completion,
        };
        if self.pending.insert(reason, pending).is_some() {
            tracing::debug!("replaced an older pending navigation");
        }
        Resumed { receiver }
    }

    /// Remove and return the entry for `reason`.
    pub fn take(&mut self, reason: &R) -> Option<PendingNavigation<D, E>> {
        self.pending.remove(reason)
    }

    /// Reasons with a parked navigation, in no particular order.
    pub fn pending_reasons(&self) -> Vec<R> {
        self.pending.keys().cloned().collect()
    }

    /// Returns true if a navigation is parked under `reason`.
    pub fn has_pending(&self, reason: &R) -> bool {
        self.pending.contains_key(reason)
    }

    /// Abandon the entry for `reason`. Returns true if there was one.
    pub fn clear(&mut self, reason: &R) -> bool {
        self.pending.remove(reason).is_some()
    }

    /// Abandon every entry.
    pub fn clear_all(&mut self) {
        self.pending.clear();
    }

    /// Number of parked navigations.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns true if nothing is parked.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// Completion of a parked or replayed navigation.
#[derive(Debug)]
pub struct Resumed {
    receiver: oneshot::Receiver<Outcome>,
}

impl Resumed {
    pub(crate) fn new(receiver: oneshot::Receiver<Outcome>) -> Self {
        Self { receiver }
    }
}

impl Future for Resumed {
    type Output = Outcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Outcome> {
        Pin::new(&mut self.receiver)
            .poll(cx)
            .map(|received| received.unwrap_or(Err(NavigationError::Abandoned)))
    }
}
