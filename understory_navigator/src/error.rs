// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation failures.

use understory_presentation::NodeId;

/// Result of a navigation: the resolved node on success.
pub type Outcome = Result<NodeId, NavigationError>;

/// Why a navigation did not take place.
///
/// Every variant is recoverable; callers usually recover by supplying a fallback link.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum NavigationError {
    /// The operation needs a root surface and none is installed.
    #[error("no root surface is installed")]
    NoRoot,
    /// No stack container is visible in the topmost layer.
    #[error("no stack container is visible")]
    NoStackContainer,
    /// No split container is visible in the topmost layer.
    #[error("no split container is visible")]
    NoSplitContainer,
    /// The destination is not shown anywhere.
    #[error("destination is not present in the hierarchy")]
    TargetNotFound,
    /// The destination is not on top, or closing is not allowed.
    #[error("nothing to close")]
    NothingToClose,
    /// The chain has no links.
    #[error("navigation chain is empty")]
    EmptyChain,
    /// The fallback list is longer than the configured limit.
    #[error("fallback list exceeds {0} links")]
    FallbackDepthExceeded(usize),
    /// A concrete destination node is stale or already attached.
    #[error("destination node is stale or already attached")]
    InvalidNode,
    /// A deferred navigation was cleared, or replaced by a newer one with the same reason.
    #[error("deferred navigation was abandoned")]
    Abandoned,
}
