// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chain sequencer and the interception hook in front of every link.

use core::fmt::Debug;
use core::hash::Hash;

use futures::future::LocalBoxFuture;

use crate::chain::NavigationChain;
use crate::destination::{Destination, Identity};
use crate::error::{NavigationError, Outcome};
use crate::intercept::InterceptionResult;
use crate::navigator::Navigator;

impl<D, E, R> Navigator<D, E, R>
where
    D: Identity,
    E: 'static,
    R: Eq + Hash + Clone + Debug + 'static,
{
    /// Run `chain` one link at a time.
    ///
    /// Each link starts only after the previous one, including its transitions, has finished,
    /// whatever its outcome. `event` goes with the final link.
    ///
    /// With `intercept` set, each link's destination is offered to the interceptor first, except
    /// for reasons listed in `diverted`: those are the reasons whose substitute chain is the one
    /// currently running.
    pub(crate) async fn run_chain(
        &self,
        chain: NavigationChain<D>,
        mut event: Option<E>,
        intercept: bool,
        diverted: &[R],
    ) -> Outcome {
        if chain.is_empty() {
            tracing::debug!("empty chain");
            return Err(NavigationError::EmptyChain);
        }
        let total = chain.len();
        let mut links = chain.into_iter();
        let mut outcome = Err(NavigationError::EmptyChain);
        let mut step = 0_usize;
        while let Some(link) = links.next() {
            step += 1;
            if intercept && let Some(hit) = self.intercept(&link.destination, diverted) {
                let parked: NavigationChain<D> = core::iter::once(link).chain(links).collect();
                return self.divert(hit, parked, event.take(), diverted).await;
            }
            tracing::debug!(step, total, "chain step");
            let last = links.as_slice().is_empty();
            outcome = self
                .execute_link(&link, if last { event.take() } else { None })
                .await;
        }
        outcome
    }

    fn intercept(
        &self,
        destination: &Destination<D>,
        diverted: &[R],
    ) -> Option<InterceptionResult<D, E, R>> {
        let interceptor = self.shared.interceptor.borrow().clone()?;
        let hit = interceptor.intercept(destination, &self.shared.hierarchy.borrow())?;
        if diverted.contains(&hit.reason) {
            tracing::trace!(reason = ?hit.reason, "already diverted for this reason");
            return None;
        }
        Some(hit)
    }

    /// Park `parked`, run the substitute chain, then wait for the parked chain to be replayed.
    async fn divert(
        &self,
        hit: InterceptionResult<D, E, R>,
        parked: NavigationChain<D>,
        event: Option<E>,
        diverted: &[R],
    ) -> Outcome {
        let InterceptionResult {
            chain,
            event: substitute_event,
            reason,
        } = hit;
        tracing::info!(?reason, parked = parked.len(), "navigation parked");
        let resumed = self
            .shared
            .gate
            .borrow_mut()
            .park(reason.clone(), parked, event);

        let mut nested = diverted.to_vec();
        nested.push(reason);
        let substitute: LocalBoxFuture<'_, Outcome> = Box::pin(self.run_chain(
            chain,
            substitute_event,
            self.shared.options.intercept_substitutes,
            &nested,
        ));
        match substitute.await {
            Ok(node) => tracing::debug!(?node, "substitute chain finished"),
            Err(err) => tracing::warn!(%err, "substitute chain failed"),
        }
        resumed.await
    }
}
