// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The navigator façade: shared state plus the public entry points.

use core::cell::{Ref, RefCell};
use core::fmt::Debug;
use core::hash::Hash;
use std::rc::Rc;

use futures::channel::oneshot;
use futures::future::LocalBoxFuture;
use futures::task::{LocalSpawn, LocalSpawnExt};
use understory_presentation::{Hierarchy, NodeId};
use understory_responder_chain::chain::{ResponderChain, dispatch};
use understory_responder_chain::types::Responder;

use crate::chain::{NavigationChain, NavigationChainLink};
use crate::destination::{Destination, Identity};
use crate::error::Outcome;
use crate::event::NavigationEvent;
use crate::intercept::{InterceptionGate, Interceptor, Resolution, Resumed};
use crate::options::NavigatorOptions;
use crate::resolver::DestinationResolver;
use crate::strategy::NavigationStrategy;
use crate::transition::{Immediate, Transitioner};

pub(crate) struct Shared<D, E, R> {
    pub(crate) hierarchy: RefCell<Hierarchy<D>>,
    pub(crate) responders: RefCell<ResponderChain<NodeId, NavigationEvent<E>>>,
    pub(crate) resolver: Box<dyn DestinationResolver<D, E>>,
    pub(crate) transitioner: Box<dyn Transitioner>,
    pub(crate) interceptor: RefCell<Option<Rc<dyn Interceptor<D, E, R>>>>,
    pub(crate) gate: RefCell<InterceptionGate<D, E, R>>,
    pub(crate) spawner: Box<dyn LocalSpawn>,
    pub(crate) options: NavigatorOptions,
}

/// Drives a [`Hierarchy`] toward requested destinations.
///
/// A `Navigator` is a cheap handle; clones share the same hierarchy, responders, and pending
/// interceptions. Everything runs on one thread. Returned futures are `!Send` and must be
/// driven by a local executor; the spawner given at construction runs event delivery and
/// replayed navigations.
///
/// Type parameters: `D` is the destination identity, `E` the application event, and `R` the
/// interception reason.
pub struct Navigator<D, E = (), R = &'static str> {
    pub(crate) shared: Rc<Shared<D, E, R>>,
}

impl<D, E, R> Clone for Navigator<D, E, R> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<D: Debug, E, R: Debug> Debug for Navigator<D, E, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let mut s = f.debug_struct("Navigator");
        if let Ok(h) = self.shared.hierarchy.try_borrow() {
            s.field("nodes", &h.len()).field("root", &h.root());
        }
        if let Ok(gate) = self.shared.gate.try_borrow() {
            s.field("gate", &*gate);
        }
        s.field("options", &self.shared.options).finish_non_exhaustive()
    }
}

/// Configures and creates a [`Navigator`].
pub struct NavigatorBuilder<D, E, R> {
    hierarchy: Hierarchy<D>,
    resolver: Box<dyn DestinationResolver<D, E>>,
    transitioner: Box<dyn Transitioner>,
    interceptor: Option<Rc<dyn Interceptor<D, E, R>>>,
    spawner: Box<dyn LocalSpawn>,
    options: NavigatorOptions,
}

impl<D, E, R> Debug for NavigatorBuilder<D, E, R> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("NavigatorBuilder")
            .field("nodes", &self.hierarchy.len())
            .field("interceptor", &self.interceptor.is_some())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<D, E, R> NavigatorBuilder<D, E, R> {
    /// Start from an existing hierarchy instead of an empty one.
    #[must_use]
    pub fn hierarchy(mut self, hierarchy: Hierarchy<D>) -> Self {
        self.hierarchy = hierarchy;
        self
    }

    /// Show transitions with `transitioner` instead of completing them immediately.
    #[must_use]
    pub fn transitioner(mut self, transitioner: impl Transitioner + 'static) -> Self {
        self.transitioner = Box::new(transitioner);
        self
    }

    /// Install an interceptor.
    #[must_use]
    pub fn interceptor(mut self, interceptor: impl Interceptor<D, E, R> + 'static) -> Self {
        self.interceptor = Some(Rc::new(interceptor));
        self
    }

    /// Replace the default options.
    #[must_use]
    pub fn options(mut self, options: NavigatorOptions) -> Self {
        self.options = options;
        self
    }

    /// Create the navigator.
    pub fn build(self) -> Navigator<D, E, R> {
        Navigator {
            shared: Rc::new(Shared {
                hierarchy: RefCell::new(self.hierarchy),
                responders: RefCell::new(ResponderChain::new()),
                resolver: self.resolver,
                transitioner: self.transitioner,
                interceptor: RefCell::new(self.interceptor),
                gate: RefCell::new(InterceptionGate::default()),
                spawner: self.spawner,
                options: self.options,
            }),
        }
    }
}

impl<D, E, R> Navigator<D, E, R>
where
    D: Identity,
    E: 'static,
    R: Eq + Hash + Clone + Debug + 'static,
{
    /// Create a navigator over an empty hierarchy with default options.
    pub fn new(
        resolver: impl DestinationResolver<D, E> + 'static,
        spawner: impl LocalSpawn + 'static,
    ) -> Self {
        Self::builder(resolver, spawner).build()
    }

    /// Start configuring a navigator.
    pub fn builder(
        resolver: impl DestinationResolver<D, E> + 'static,
        spawner: impl LocalSpawn + 'static,
    ) -> NavigatorBuilder<D, E, R> {
        NavigatorBuilder {
            hierarchy: Hierarchy::new(),
            resolver: Box::new(resolver),
            transitioner: Box::new(Immediate),
            interceptor: None,
            spawner: Box::new(spawner),
            options: NavigatorOptions::default(),
        }
    }

    /// The options this navigator was built with.
    pub fn options(&self) -> NavigatorOptions {
        self.shared.options
    }

    // --- navigation ---

    /// Navigate to `destination` using `strategy`, animated, without an event.
    pub fn navigate(
        &self,
        destination: impl Into<Destination<D>>,
        strategy: NavigationStrategy,
    ) -> LocalBoxFuture<'static, Outcome> {
        self.navigate_link(NavigationChainLink::new(destination, strategy), None)
    }

    /// Run a single link (with its fallbacks) and deliver `event` on success.
    pub fn navigate_link(
        &self,
        link: NavigationChainLink<D>,
        event: Option<E>,
    ) -> LocalBoxFuture<'static, Outcome> {
        self.run(vec![link], event)
    }

    /// Run `chain` link by link; see the [crate docs](crate#sequencing).
    ///
    /// Every link passes the interceptor first. The outcome is the last link's.
    pub fn run(
        &self,
        chain: NavigationChain<D>,
        event: Option<E>,
    ) -> LocalBoxFuture<'static, Outcome> {
        let this = self.clone();
        Box::pin(async move { this.run_chain(chain, event, true, &[]).await })
    }

    /// Run one link through the strategy engine, bypassing interception.
    pub fn execute(
        &self,
        link: NavigationChainLink<D>,
        event: Option<E>,
    ) -> LocalBoxFuture<'static, Outcome> {
        let this = self.clone();
        Box::pin(async move { this.execute_link(&link, event).await })
    }

    // --- interception ---

    /// Install (or replace) the interceptor.
    pub fn set_interceptor(&self, interceptor: impl Interceptor<D, E, R> + 'static) {
        *self.shared.interceptor.borrow_mut() = Some(Rc::new(interceptor));
    }

    /// Remove the interceptor; later navigations pass straight through.
    pub fn clear_interceptor(&self) {
        self.shared.interceptor.borrow_mut().take();
    }

    /// Replay the navigation parked under `reason`.
    ///
    /// Returns `None`, and does nothing, if nothing is parked under `reason`. Otherwise the
    /// replay is spawned immediately; the returned future yields its outcome, which is also
    /// handed to the caller that was originally parked.
    pub fn resolve_interception(&self, reason: &R, resolution: Resolution<D>) -> Option<Resumed> {
        let Some(pending) = self.shared.gate.borrow_mut().take(reason) else {
            tracing::debug!(?reason, "nothing pending; resolution ignored");
            return None;
        };
        tracing::info!(?reason, "resuming parked navigation");
        let (parked, event, completion) = pending.into_parts();
        let chain = resolution.apply(parked);
        let (tx, rx) = oneshot::channel();
        let this = self.clone();
        let replay = async move {
            let outcome = this.run_chain(chain, event, true, &[]).await;
            let _ = tx.send(outcome);
            let _ = completion.send(outcome);
        };
        if let Err(err) = self.shared.spawner.spawn_local(replay) {
            tracing::warn!(?reason, %err, "could not spawn replay; navigation abandoned");
        }
        Some(Resumed::new(rx))
    }

    /// Reasons with a parked navigation, in no particular order.
    pub fn pending_reasons(&self) -> Vec<R> {
        self.shared.gate.borrow().pending_reasons()
    }

    /// Returns true if a navigation is parked under `reason`.
    pub fn has_pending(&self, reason: &R) -> bool {
        self.shared.gate.borrow().has_pending(reason)
    }

    /// Abandon the navigation parked under `reason`.
    ///
    /// Its caller completes with [`Abandoned`](crate::NavigationError::Abandoned).
    pub fn clear_pending(&self, reason: &R) -> bool {
        let cleared = self.shared.gate.borrow_mut().clear(reason);
        if cleared {
            tracing::info!(?reason, "pending navigation abandoned");
        }
        cleared
    }

    /// Abandon every parked navigation.
    pub fn clear_all_pending(&self) {
        self.shared.gate.borrow_mut().clear_all();
    }

    // --- responders and events ---

    /// Attach `responder` to `node`, replacing any previous one.
    pub fn attach_responder(&self, node: NodeId, responder: Rc<dyn Responder<NavigationEvent<E>>>) {
        self.shared.responders.borrow_mut().attach(node, responder);
    }

    /// Detach the responder of `node`.
    pub fn detach_responder(&self, node: NodeId) -> Option<Rc<dyn Responder<NavigationEvent<E>>>> {
        self.shared.responders.borrow_mut().detach(node)
    }

    /// Send an application event up the responder chain starting at `node`.
    ///
    /// Resolves to the node whose responder consumed it.
    pub fn send_event(&self, node: NodeId, event: E) -> LocalBoxFuture<'static, Option<NodeId>> {
        let responders = self.responders_from(node);
        Box::pin(async move { dispatch(&responders, &NavigationEvent::App(event)).await })
    }

    /// Snapshot of the responders along the chain from `node`.
    pub(crate) fn responders_from(
        &self,
        node: NodeId,
    ) -> Vec<(NodeId, Rc<dyn Responder<NavigationEvent<E>>>)> {
        let h = self.shared.hierarchy.borrow();
        let responders = self.shared.responders.borrow();
        let path = responders.path_from(node, &*h);
        responders.responders_along(&path)
    }

    /// Deliver `events` in order along the chain from `node`, without waiting for them.
    pub(crate) fn deliver(&self, node: NodeId, events: Vec<NavigationEvent<E>>) {
        if events.is_empty() {
            return;
        }
        let responders = self.responders_from(node);
        if responders.is_empty() {
            return;
        }
        let delivery = async move {
            for event in &events {
                let consumer = dispatch(&responders, event).await;
                tracing::trace!(?consumer, synthetic = event.is_synthetic(), "event delivered");
            }
        };
        if let Err(err) = self.shared.spawner.spawn_local(delivery) {
            tracing::warn!(%err, "could not spawn event delivery");
        }
    }

    /// Drop responders whose node no longer exists.
    pub(crate) fn prune_responders(&self) {
        let h = self.shared.hierarchy.borrow();
        self.shared
            .responders
            .borrow_mut()
            .retain_live(|node| h.is_alive(*node));
    }

    // --- hierarchy access ---

    /// Read access to the hierarchy.
    ///
    /// Do not hold the guard across an `.await` on this navigator's futures.
    pub fn hierarchy(&self) -> Ref<'_, Hierarchy<D>> {
        self.shared.hierarchy.borrow()
    }

    /// Mutate the hierarchy directly, without transitions.
    ///
    /// Responders of nodes freed by `f` are dropped afterwards.
    pub fn with_hierarchy_mut<T>(&self, f: impl FnOnce(&mut Hierarchy<D>) -> T) -> T {
        let out = f(&mut self.shared.hierarchy.borrow_mut());
        self.prune_responders();
        out
    }

    /// The topmost visible node.
    pub fn topmost(&self) -> Option<NodeId> {
        self.hierarchy().topmost()
    }

    /// Identity of the topmost visible node.
    pub fn topmost_identity(&self) -> Option<D> {
        let h = self.hierarchy();
        h.topmost().and_then(|top| h.identity(top).cloned())
    }

    /// Discard non-essential intermediate members of `stack` and their responders.
    ///
    /// The responder chain stays connected around the removed members.
    pub fn compact_stack(&self, stack: NodeId) -> Vec<NodeId> {
        let removed = self.with_hierarchy_mut(|h| h.compact_stack(stack));
        if !removed.is_empty() {
            tracing::debug!(?stack, removed = removed.len(), "stack compacted");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::intercept::{FnInterceptor, InterceptionResult};
    use crate::resolver::ScreenResolver;
    use futures::executor::LocalPool;
    use tracing_test::traced_test;
    use understory_presentation::NodeSpec;

    fn navigator(pool: &LocalPool) -> Navigator<&'static str> {
        Navigator::new(ScreenResolver, pool.spawner())
    }

    #[test]
    fn clones_share_state() {
        let pool = LocalPool::new();
        let nav = navigator(&pool);
        let other = nav.clone();
        let root = nav.with_hierarchy_mut(|h| {
            let root = h.build(NodeSpec::stack(vec![NodeSpec::screen("home")]));
            h.set_root(root);
            root
        });
        assert_eq!(other.hierarchy().root(), Some(root));
        assert_eq!(other.topmost_identity(), Some("home"));
    }

    #[test]
    fn compaction_prunes_responders() {
        let pool = LocalPool::new();
        let nav = navigator(&pool);
        let stack = nav.with_hierarchy_mut(|h| {
            let stack = h.build(NodeSpec::stack(
                ["a", "b", "c", "d"].map(NodeSpec::screen).to_vec(),
            ));
            h.set_root(stack);
            stack
        });
        let (b, c) = {
            let h = nav.hierarchy();
            (h.find_identity(&"b").unwrap(), h.find_identity(&"c").unwrap())
        };
        nav.attach_responder(
            b,
            Rc::new(understory_responder_chain::types::FnResponder::new(
                |_: &NavigationEvent<()>| true,
            )),
        );
        assert_eq!(nav.compact_stack(stack), vec![b, c]);
        assert!(nav.shared.responders.borrow().is_empty());
        assert!(nav.hierarchy().responder_links_are_live());
    }

    #[traced_test]
    #[test]
    fn parking_and_resuming_are_logged() {
        let mut pool = LocalPool::new();
        let nav = navigator(&pool);
        nav.with_hierarchy_mut(|h| {
            let root = h.build(NodeSpec::stack(vec![NodeSpec::screen("home")]));
            h.set_root(root);
        });
        nav.set_interceptor(FnInterceptor::new(
            |dest: &Destination<&'static str>, _: &Hierarchy<&'static str>| {
                (*dest == Destination::Identity("vault")).then(|| {
                    InterceptionResult::new(
                        vec![NavigationChainLink::new("login", NavigationStrategy::PRESENT)],
                        "auth",
                    )
                })
            },
        ));

        let parked = nav.navigate("vault", NavigationStrategy::PUSH);
        let handle = pool.spawner().spawn_local_with_handle(parked).unwrap();
        pool.run_until_stalled();
        assert!(logs_contain("navigation parked"));
        assert_eq!(nav.pending_reasons(), vec!["auth"]);

        nav.clear_interceptor();
        pool.run_until(nav.navigate("login", NavigationStrategy::CLOSE_IF_TOP))
            .unwrap();
        let resumed = nav.resolve_interception(&"auth", Resolution::new()).unwrap();
        let outcome = pool.run_until(resumed);
        assert!(logs_contain("resuming parked navigation"));
        assert_eq!(pool.run_until(handle), outcome);
        assert_eq!(nav.topmost_identity(), Some("vault"));
    }
}
