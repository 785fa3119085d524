// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The strategy engine: one link, its fallbacks, and the structural plan per strategy.
//!
//! ## Phases
//!
//! Every attempt runs in three phases:
//!
//! 1. Plan: check the strategy's preconditions against the hierarchy without changing it.
//!    A failed precondition ends the attempt here, so a failed attempt never leaves a trace.
//! 2. Apply: resolve the destination if a new node is needed, then mutate the model.
//! 3. Show: await each resulting [`Transition`] in order.
//!
//! Only after the last transition completes does the attempt report success. Events are then
//! handed to the responder chain without waiting for them.

use core::fmt::Debug;
use core::hash::Hash;

use understory_presentation::{Hierarchy, NodeId, NodeKind, NodeSpec, Pane, SplitMode};

use crate::chain::NavigationChainLink;
use crate::destination::{Destination, Identity};
use crate::error::{NavigationError, Outcome};
use crate::event::NavigationEvent;
use crate::navigator::Navigator;
use crate::strategy::{NavigationStrategy, RootTransition, SplitAction};
use crate::transition::Transition;

/// Where a freshly materialized node goes.
#[derive(Clone, Copy, Debug)]
enum Placement {
    Root(Option<RootTransition>),
    Push(NodeId),
    Present { presenter: NodeId, embed: bool },
    StackRoot(NodeId),
    Pane { split: NodeId, pane: Pane, embed: bool },
}

/// The outcome of the planning phase.
#[derive(Clone, Debug)]
enum Plan {
    /// Already where it should be.
    Keep(NodeId),
    Insert(Placement),
    Reveal(NodeId),
    Pop(NodeId),
    Dismiss(NodeId),
    Remove { stack: NodeId, members: Vec<NodeId> },
}

#[derive(Clone, Copy, Debug)]
enum Synthetic {
    RootReplaced,
    ClosedToExisting,
}

impl Synthetic {
    fn event<E>(self) -> NavigationEvent<E> {
        match self {
            Self::RootReplaced => NavigationEvent::RootReplaced,
            Self::ClosedToExisting => NavigationEvent::ClosedToExisting,
        }
    }
}

struct Applied {
    node: NodeId,
    transitions: Vec<Transition>,
    synthetic: Option<Synthetic>,
}

impl Applied {
    fn new(node: NodeId, transitions: Vec<Transition>) -> Self {
        Self {
            node,
            transitions,
            synthetic: None,
        }
    }
}

impl<D, E, R> Navigator<D, E, R>
where
    D: Identity,
    E: 'static,
    R: Eq + Hash + Clone + Debug + 'static,
{
    /// Try `link`, then each of its fallbacks in turn, until one succeeds.
    pub(crate) async fn execute_link(
        &self,
        link: &NavigationChainLink<D>,
        event: Option<E>,
    ) -> Outcome {
        let limit = self.shared.options.max_fallback_depth;
        if link.depth() > limit.saturating_add(1) {
            tracing::warn!(depth = link.depth(), limit, "fallback list too long; not attempted");
            return Err(NavigationError::FallbackDepthExceeded(limit));
        }

        let mut attempt = link;
        let mut tried = 1_usize;
        loop {
            match self.attempt(attempt).await {
                Ok(applied) => {
                    let mut events = Vec::with_capacity(2);
                    if self.shared.options.emit_synthetic_events {
                        events.extend(applied.synthetic.map(Synthetic::event));
                    }
                    events.extend(event.map(NavigationEvent::App));
                    self.deliver(applied.node, events);
                    return Ok(applied.node);
                }
                Err(err) => match attempt.fallback.as_deref() {
                    Some(next) => {
                        tracing::debug!(
                            strategy = ?attempt.strategy,
                            %err,
                            fallback = ?next.strategy,
                            "precondition unmet; falling back"
                        );
                        attempt = next;
                        tried += 1;
                    }
                    None => {
                        if tried > 1 {
                            tracing::warn!(tried, %err, "every fallback failed");
                        } else {
                            tracing::debug!(strategy = ?attempt.strategy, %err, "navigation failed");
                        }
                        return Err(err);
                    }
                },
            }
        }
    }

    async fn attempt(&self, link: &NavigationChainLink<D>) -> Result<Applied, NavigationError> {
        tracing::debug!(
            strategy = ?link.strategy,
            destination = ?link.destination,
            animated = link.animated,
            "dispatching"
        );
        let plan = plan(
            &self.shared.hierarchy.borrow(),
            &link.destination,
            link.strategy,
        )?;
        let applied = self.apply(&link.destination, plan)?;
        self.prune_responders();
        for transition in &applied.transitions {
            self.shared
                .transitioner
                .perform(transition, link.animated)
                .await;
        }
        Ok(applied)
    }

    fn apply(&self, destination: &Destination<D>, plan: Plan) -> Result<Applied, NavigationError> {
        let placement = match plan {
            Plan::Keep(node) => return Ok(Applied::new(node, Vec::new())),
            Plan::Insert(placement) => placement,
            plan => return apply_structural(&mut self.shared.hierarchy.borrow_mut(), plan),
        };
        let node = self.materialize(destination);
        let placed = {
            let mut h = self.shared.hierarchy.borrow_mut();
            let placed = place(&mut h, node, placement);
            if placed.is_none() && matches!(destination, Destination::Identity(_)) {
                h.remove(node);
            }
            placed
        };
        if placed.is_none() {
            self.prune_responders();
        }
        placed.ok_or(NavigationError::InvalidNode)
    }

    /// Produce the node for `destination`, resolving identities through the resolver.
    ///
    /// Node destinations have already been validated by the planner.
    fn materialize(&self, destination: &Destination<D>) -> NodeId {
        let identity = match destination {
            Destination::Node(node) => return *node,
            Destination::Identity(identity) => identity,
        };
        let spec = self.shared.resolver.resolve(identity);
        let (node, tagged) = {
            let mut h = self.shared.hierarchy.borrow_mut();
            let node = h.build(spec);
            h.set_identity(node, Some(identity.clone()));
            let mut tagged = Vec::new();
            h.find_from(node, |h, n| {
                if let Some(id) = h.identity(n) {
                    tagged.push((n, id.clone()));
                }
                false
            });
            (node, tagged)
        };
        for (n, identity) in tagged {
            if let Some(responder) = self.shared.resolver.responder_for(&identity) {
                self.shared.responders.borrow_mut().attach(n, responder);
            }
        }
        tracing::trace!(?identity, ?node, "destination materialized");
        node
    }
}

// --- planning ---

fn plan<D: PartialEq>(
    h: &Hierarchy<D>,
    destination: &Destination<D>,
    strategy: NavigationStrategy,
) -> Result<Plan, NavigationError> {
    use NavigationStrategy as S;

    if h.root().is_none() && !matches!(strategy, S::ReplaceRoot { .. }) {
        return Err(NavigationError::NoRoot);
    }
    let insert = |placement: Placement| materializable(h, destination).map(|()| Plan::Insert(placement));
    let over = |source: Option<NodeId>, embed: bool| -> Result<Plan, NavigationError> {
        let presenter = match source {
            Some(source) if h.is_attached(source) && h.presented(source).is_none() => source,
            Some(_) => return Err(NavigationError::InvalidNode),
            None => h.topmost().ok_or(NavigationError::NoRoot)?,
        };
        insert(Placement::Present { presenter, embed })
    };
    let over_top = |embed: bool| over(None, embed);

    match strategy {
        S::ReplaceRoot { transition } => match destination {
            Destination::Node(node) if h.root() == Some(*node) => Ok(Plan::Keep(*node)),
            _ => insert(Placement::Root(transition)),
        },
        S::Push { always_embedded } => match h.active_stack() {
            Some(stack) => insert(Placement::Push(stack)),
            None if always_embedded => over_top(true),
            None => Err(NavigationError::NoStackContainer),
        },
        S::PushOrPopToExisting => {
            let stack = h.active_stack().ok_or(NavigationError::NoStackContainer)?;
            match last_matching_member(h, stack, destination) {
                Some(member) => Ok(Plan::Reveal(member)),
                None => insert(Placement::Push(stack)),
            }
        }
        S::Present {
            source,
            embed_in_stack,
        } => over(source, embed_in_stack),
        S::PresentOrCloseToExisting => match destination.find_in(h) {
            Some(target) => Ok(Plan::Reveal(target)),
            None => over_top(false),
        },
        S::ReplaceStackRoot => {
            let stack = h.active_stack().ok_or(NavigationError::NoStackContainer)?;
            insert(Placement::StackRoot(stack))
        }
        S::CloseIfTop {
            try_pop,
            try_dismiss,
        } => close_if_top(h, destination, try_pop, try_dismiss),
        S::CloseToExisting { or_present } => match destination.find_in(h) {
            Some(target) => Ok(Plan::Reveal(target)),
            None if or_present => over_top(false),
            None => Err(NavigationError::TargetNotFound),
        },
        S::PopToExisting { include_tabs } => {
            let target = destination
                .find_in(h)
                .ok_or(NavigationError::TargetNotFound)?;
            if reachable_by_popping(h, target, include_tabs) {
                Ok(Plan::Reveal(target))
            } else {
                Err(NavigationError::TargetNotFound)
            }
        }
        S::RemoveFromStack => {
            let stack = h.active_stack().ok_or(NavigationError::NoStackContainer)?;
            let members: Vec<NodeId> = h
                .children(stack)
                .iter()
                .copied()
                .filter(|&m| destination.matches(h, m))
                .collect();
            if members.is_empty() {
                Err(NavigationError::TargetNotFound)
            } else if members.len() == h.children(stack).len() {
                Err(NavigationError::NothingToClose)
            } else {
                Ok(Plan::Remove { stack, members })
            }
        }
        S::Split { pane, action } => {
            if h.split_mode() == SplitMode::Collapsed {
                let degraded = match action {
                    SplitAction::Push | SplitAction::Replace => S::PUSH,
                    SplitAction::Pop => S::PopToExisting {
                        include_tabs: false,
                    },
                };
                return plan(h, destination, degraded);
            }
            let split = h.active_split().ok_or(NavigationError::NoSplitContainer)?;
            if pane == Pane::Secondary && h.pane(split, Pane::Primary).is_none() {
                return Err(NavigationError::NoSplitContainer);
            }
            let current = h.pane(split, pane);
            match action {
                SplitAction::Replace => insert(Placement::Pane {
                    split,
                    pane,
                    embed: false,
                }),
                SplitAction::Push => match current {
                    Some(c) if h.kind(c) == Some(NodeKind::Stack) => insert(Placement::Push(c)),
                    Some(_) => Err(NavigationError::NoStackContainer),
                    None => insert(Placement::Pane {
                        split,
                        pane,
                        embed: true,
                    }),
                },
                SplitAction::Pop => current
                    .filter(|&c| h.kind(c) == Some(NodeKind::Stack))
                    .and_then(|stack| last_matching_member(h, stack, destination))
                    .map(Plan::Reveal)
                    .ok_or(NavigationError::TargetNotFound),
            }
        }
    }
}

/// A node destination can only be inserted if it is live and not already placed.
fn materializable<D>(h: &Hierarchy<D>, destination: &Destination<D>) -> Result<(), NavigationError> {
    match destination {
        Destination::Identity(_) => Ok(()),
        Destination::Node(node)
            if h.is_alive(*node)
                && h.parent(*node).is_none()
                && h.presenter(*node).is_none()
                && h.root() != Some(*node) =>
        {
            Ok(())
        }
        Destination::Node(_) => Err(NavigationError::InvalidNode),
    }
}

fn last_matching_member<D: PartialEq>(
    h: &Hierarchy<D>,
    stack: NodeId,
    destination: &Destination<D>,
) -> Option<NodeId> {
    h.children(stack)
        .iter()
        .rev()
        .copied()
        .find(|&m| destination.matches(h, m))
}

fn close_if_top<D: PartialEq>(
    h: &Hierarchy<D>,
    destination: &Destination<D>,
    try_pop: bool,
    try_dismiss: bool,
) -> Result<Plan, NavigationError> {
    let shows = |start: NodeId| {
        h.visible_path_from(start)
            .into_iter()
            .any(|n| destination.matches(h, n))
    };
    if try_pop
        && let Some(stack) = h.active_stack()
        && let [_, .., top] = h.children(stack)
        && shows(*top)
    {
        return Ok(Plan::Pop(stack));
    }
    if try_dismiss
        && let Some(layer) = h.top_presented()
        && shows(layer)
        && let Some(presenter) = h.presenter(layer)
    {
        return Ok(Plan::Dismiss(presenter));
    }
    Err(NavigationError::NothingToClose)
}

/// Returns true if `target` lies in the topmost modal layer and, unless `include_tabs`,
/// no tab switch is needed to show it.
fn reachable_by_popping<D>(h: &Hierarchy<D>, target: NodeId, include_tabs: bool) -> bool {
    let path = h.path_to(target);
    let mut layer = None;
    for w in path.windows(2) {
        let (outer, inner) = (w[0], w[1]);
        if h.presented(outer) == Some(inner) {
            layer = Some(inner);
        }
        if !include_tabs
            && h.kind(outer) == Some(NodeKind::Tabs)
            && h.children(outer).get(h.selected_tab(outer).unwrap_or(0)) != Some(&inner)
        {
            return false;
        }
    }
    layer == h.top_presented()
}

// --- applying ---

fn place<D>(h: &mut Hierarchy<D>, node: NodeId, placement: Placement) -> Option<Applied> {
    let embedded = |h: &mut Hierarchy<D>, embed: bool| {
        if !embed {
            return node;
        }
        let stack = h.build(NodeSpec::stack(Vec::new()));
        h.push(stack, node);
        stack
    };
    let transition = match placement {
        Placement::Root(style) => {
            let old = h.set_root(node);
            if h.root() != Some(node) {
                return None;
            }
            let mut applied = Applied::new(
                node,
                vec![Transition::SetRoot {
                    old,
                    new: node,
                    style,
                }],
            );
            applied.synthetic = old.map(|_| Synthetic::RootReplaced);
            return Some(applied);
        }
        Placement::Push(stack) => {
            h.push(stack, node).then_some(())?;
            Transition::Push { stack, node }
        }
        Placement::Present { presenter, embed } => {
            let shown = embedded(h, embed);
            if !h.present(presenter, shown) {
                if shown != node {
                    h.remove(shown);
                }
                return None;
            }
            Transition::Present {
                presenter,
                node: shown,
            }
        }
        Placement::StackRoot(stack) => {
            let removed = h.set_stack_contents(stack, &[node]);
            if h.parent(node) != Some(stack) {
                return None;
            }
            Transition::SetStackContents { stack, removed }
        }
        Placement::Pane { split, pane, embed } => {
            let shown = embedded(h, embed);
            let replaced = h.pane(split, pane);
            if !h.set_pane(split, pane, shown) {
                if shown != node {
                    h.remove(shown);
                }
                return None;
            }
            Transition::SetPane {
                split,
                pane,
                node: shown,
                replaced,
            }
        }
    };
    Some(Applied::new(node, vec![transition]))
}

fn apply_structural<D>(h: &mut Hierarchy<D>, plan: Plan) -> Result<Applied, NavigationError> {
    let mut transitions = Vec::new();
    let mut synthetic = None;
    let revealed = match plan {
        Plan::Keep(node) | Plan::Reveal(node) => Some(node),
        _ => None,
    };
    match plan {
        Plan::Keep(_) | Plan::Insert(_) => {}
        Plan::Reveal(target) => {
            transitions = reveal(h, target);
            synthetic = Some(Synthetic::ClosedToExisting);
        }
        Plan::Pop(stack) => {
            if let Some(popped) = h.pop(stack) {
                transitions.push(Transition::Pop {
                    stack,
                    removed: vec![popped],
                });
            }
        }
        Plan::Dismiss(presenter) => {
            let dismissed = h.dismiss_all_presented(presenter);
            transitions.push(Transition::Dismiss {
                presenter,
                dismissed,
            });
        }
        Plan::Remove { stack, members } => {
            let removed = h.remove_members(stack, &members);
            transitions.push(Transition::RemoveFromStack { stack, removed });
        }
    }
    let node = match revealed {
        Some(node) => node,
        None => h.topmost().ok_or(NavigationError::NoRoot)?,
    };
    Ok(Applied {
        node,
        transitions,
        synthetic,
    })
}

/// Bring `target` to the front: select tabs, pop stacks, then dismiss covering modals.
fn reveal<D>(h: &mut Hierarchy<D>, target: NodeId) -> Vec<Transition> {
    let mut transitions = Vec::new();
    let path = h.path_to(target);

    for w in path.windows(2) {
        let (outer, inner) = (w[0], w[1]);
        if h.kind(outer) != Some(NodeKind::Tabs) {
            continue;
        }
        if let Some(index) = h.children(outer).iter().position(|&c| c == inner)
            && h.selected_tab(outer) != Some(index)
            && h.select_tab(outer, index)
        {
            transitions.push(Transition::SelectTab { tabs: outer, index });
        }
    }

    for w in path.windows(2) {
        let (outer, inner) = (w[0], w[1]);
        if h.kind(outer) != Some(NodeKind::Stack) {
            continue;
        }
        let removed = h.pop_to(outer, inner);
        if !removed.is_empty() {
            transitions.push(Transition::Pop {
                stack: outer,
                removed,
            });
        }
    }

    // Modals hanging off the path cover everything below them.
    for w in path.windows(2) {
        let (outer, inner) = (w[0], w[1]);
        if h.presented(outer).is_some_and(|p| p != inner) {
            let dismissed = h.dismiss_all_presented(outer);
            transitions.push(Transition::Dismiss {
                presenter: outer,
                dismissed,
            });
        }
    }
    if let Some(presenter) = h
        .visible_path_from(target)
        .into_iter()
        .find(|&n| h.presented(n).is_some())
    {
        let dismissed = h.dismiss_all_presented(presenter);
        transitions.push(Transition::Dismiss {
            presenter,
            dismissed,
        });
    }
    transitions
}
