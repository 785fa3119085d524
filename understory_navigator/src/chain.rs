// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chain links and fallback lists.
//!
//! A [`NavigationChainLink`] is one attempt plus an optional fallback attempt, forming a singly
//! linked "try this, else try this" list. A [`NavigationChain`] is an ordered sequence of links
//! executed strictly one after another; each link's fallback list is independent of chain order.
//!
//! Fallbacks are owned boxes, so a fallback list is acyclic by construction.

use crate::destination::Destination;
use crate::strategy::NavigationStrategy;

/// An ordered sequence of navigation steps.
pub type NavigationChain<D> = Vec<NavigationChainLink<D>>;

/// One navigation attempt and what to try if it cannot be carried out.
#[derive(Clone, Debug, PartialEq)]
pub struct NavigationChainLink<D> {
    /// What to show.
    pub destination: Destination<D>,
    /// How to show it. Interception resolution may override this on the first link of a deferred chain.
    pub strategy: NavigationStrategy,
    /// Whether transitions animate.
    pub animated: bool,
    /// Attempt to make when this one's structural precondition is unmet.
    pub fallback: Option<Box<Self>>,
}

impl<D> NavigationChainLink<D> {
    /// An animated link without fallback.
    pub fn new(destination: impl Into<Destination<D>>, strategy: NavigationStrategy) -> Self {
        Self {
            destination: destination.into(),
            strategy,
            animated: true,
            fallback: None,
        }
    }

    /// Set the animated flag.
    #[must_use]
    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = animated;
        self
    }

    /// Append `fallback` at the end of this link's fallback list.
    #[must_use]
    pub fn or_else(mut self, fallback: Self) -> Self {
        self.fallback = Some(Box::new(match self.fallback.take() {
            Some(next) => (*next).or_else(fallback),
            None => fallback,
        }));
        self
    }

    /// Number of links in this fallback list, including `self`.
    pub fn depth(&self) -> usize {
        self.attempts().count()
    }

    /// Iterate this link and its fallbacks in the order they would be tried.
    pub fn attempts(&self) -> impl Iterator<Item = &Self> {
        core::iter::successors(Some(self), |link| link.fallback.as_deref())
    }
}

impl<D: Clone> NavigationChainLink<D> {
    /// Build a fallback list trying `strategies` in order for the same destination.
    ///
    /// `[A, B, C]` becomes `link(A, fallback: link(B, fallback: link(C)))`.
    /// Returns `None` for an empty strategy list.
    pub fn fallback_chain(
        destination: impl Into<Destination<D>>,
        strategies: impl IntoIterator<Item = NavigationStrategy>,
        animated: bool,
    ) -> Option<Self> {
        let destination = destination.into();
        let strategies: Vec<NavigationStrategy> = strategies.into_iter().collect();
        strategies.into_iter().rev().fold(None, |fallback, strategy| {
            Some(Self {
                destination: destination.clone(),
                strategy,
                animated,
                fallback: fallback.map(Box::new),
            })
        })
    }
}
