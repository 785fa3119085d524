// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigation strategies: the structural maneuver used to make a destination visible.

pub use understory_presentation::Pane;

use understory_presentation::NodeId;

/// Visual style for replacing the root surface.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum RootTransition {
    /// Cross-fade between the old and the new root.
    Fade,
    /// Slide the new root in over the old one.
    Slide,
}

/// What to do inside a split pane.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SplitAction {
    /// Push onto the stack shown in the pane.
    Push,
    /// Pop the pane's stack back to an existing member.
    Pop,
    /// Replace the pane's content.
    Replace,
}

/// How a destination is brought on screen.
///
/// Revealing strategies bring an existing node to the front; inserting strategies materialize
/// a new node. Several do one or the other depending on what the hierarchy already shows.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum NavigationStrategy {
    /// Install the destination as the root surface.
    ReplaceRoot {
        /// Optional transition style.
        transition: Option<RootTransition>,
    },
    /// Push onto the active stack.
    Push {
        /// Without a stack, present the destination wrapped in a new stack instead of failing.
        always_embedded: bool,
    },
    /// Pop the active stack to an existing match, or push.
    PushOrPopToExisting,
    /// Present modally over the topmost node, or over `source`.
    Present {
        /// Attached node to present from; it must not already present anything.
        source: Option<NodeId>,
        /// Wrap the destination in a fresh stack container.
        embed_in_stack: bool,
    },
    /// Reveal an existing match anywhere, or present.
    PresentOrCloseToExisting,
    /// Replace the whole active stack with the destination.
    ReplaceStackRoot,
    /// Close the destination if it is on top; never creates a node.
    CloseIfTop {
        /// Pop it from the active stack.
        try_pop: bool,
        /// Dismiss the topmost modal showing it.
        try_dismiss: bool,
    },
    /// Reveal an existing match anywhere.
    CloseToExisting {
        /// Present the destination when no match exists.
        or_present: bool,
    },
    /// Pop the active stack back to an existing match.
    PopToExisting {
        /// Also look at the other tabs of the active tab container.
        include_tabs: bool,
    },
    /// Remove every match from the active stack.
    RemoveFromStack,
    /// Operate on one pane of the active split container.
    Split {
        /// Target pane.
        pane: Pane,
        /// Action within the pane.
        action: SplitAction,
    },
}

impl NavigationStrategy {
    /// `Push` without implicit embedding.
    pub const PUSH: Self = Self::Push {
        always_embedded: false,
    };
    /// `Present` without a wrapping stack.
    pub const PRESENT: Self = Self::Present {
        source: None,
        embed_in_stack: false,
    };
    /// `Present` wrapped in a new stack.
    pub const PRESENT_EMBEDDED: Self = Self::Present {
        source: None,
        embed_in_stack: true,
    };
    /// `CloseIfTop` allowing both pop and dismiss.
    pub const CLOSE_IF_TOP: Self = Self::CloseIfTop {
        try_pop: true,
        try_dismiss: true,
    };
    /// `ReplaceRoot` with the default transition.
    pub const REPLACE_ROOT: Self = Self::ReplaceRoot { transition: None };

    /// `Present` over `source` without a wrapping stack.
    pub const fn present_from(source: NodeId) -> Self {
        Self::Present {
            source: Some(source),
            embed_in_stack: false,
        }
    }
}
