// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transitions: the asynchronous half of every structural operation.
//!
//! The hierarchy model is updated synchronously; the engine then hands a [`Transition`] to the
//! [`Transitioner`] and does not continue until the returned future completes. A chain's next
//! step therefore never starts before the previous step's animation has finished.

use futures::future::{self, LocalBoxFuture};
use understory_presentation::{NodeId, Pane};

use crate::strategy::RootTransition;

/// A structural change that has been applied to the model and now needs to be shown.
///
/// Removed nodes are reported by their (now stale) ids.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Transition {
    /// The root surface changed.
    SetRoot {
        /// Previous root, if any.
        old: Option<NodeId>,
        /// New root.
        new: NodeId,
        /// Requested style.
        style: Option<RootTransition>,
    },
    /// A node was pushed.
    Push {
        /// The stack.
        stack: NodeId,
        /// The pushed node.
        node: NodeId,
    },
    /// Members were popped off the top.
    Pop {
        /// The stack.
        stack: NodeId,
        /// Popped members, bottom→top.
        removed: Vec<NodeId>,
    },
    /// A stack's contents were replaced.
    SetStackContents {
        /// The stack.
        stack: NodeId,
        /// Members that left the stack.
        removed: Vec<NodeId>,
    },
    /// Members were removed from anywhere in a stack.
    RemoveFromStack {
        /// The stack.
        stack: NodeId,
        /// Removed members.
        removed: Vec<NodeId>,
    },
    /// A node was presented modally.
    Present {
        /// The presenting node.
        presenter: NodeId,
        /// The presented node.
        node: NodeId,
    },
    /// Modal layers were dismissed.
    Dismiss {
        /// The node they were presented from.
        presenter: NodeId,
        /// Dismissed layers, outermost first.
        dismissed: Vec<NodeId>,
    },
    /// A tab was selected.
    SelectTab {
        /// The tab container.
        tabs: NodeId,
        /// Newly selected index.
        index: usize,
    },
    /// A split pane changed.
    SetPane {
        /// The split container.
        split: NodeId,
        /// The pane.
        pane: Pane,
        /// The new content.
        node: NodeId,
        /// The replaced content, if any.
        replaced: Option<NodeId>,
    },
}

/// Shows transitions.
pub trait Transitioner {
    /// Run `transition`, resolving once it is fully on screen.
    ///
    /// Unanimated transitions should resolve immediately.
    fn perform(&self, transition: &Transition, animated: bool) -> LocalBoxFuture<'static, ()>;
}

/// Completes every transition immediately.
#[derive(Copy, Clone, Debug, Default)]
pub struct Immediate;

impl Transitioner for Immediate {
    fn perform(&self, _transition: &Transition, _animated: bool) -> LocalBoxFuture<'static, ()> {
        Box::pin(future::ready(()))
    }
}
