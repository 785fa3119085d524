// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_navigator --heading-base-level=0

//! Understory Navigator: strategy-driven navigation over a presentation hierarchy.
//!
//! A [`Navigator`] turns "show me this destination" into structural changes of an
//! [`understory_presentation::Hierarchy`]: pushes, modal presentations, root replacements,
//! tab switches, pops, dismissals, and split-pane updates.
//!
//! ## Concepts
//!
//! - A [`Destination`] is either an identity `D` (compared structurally) or an existing node.
//! - A [`NavigationStrategy`] names the maneuver: push, present, replace the root, close, and so on.
//!   Strategies either reveal an existing node or insert a new one resolved by a
//!   [`DestinationResolver`].
//! - A [`NavigationChainLink`] is one attempt plus an optional fallback attempt. When a strategy's
//!   precondition is unmet (no stack to push onto, no split to address, nothing to close) the
//!   fallback runs instead.
//! - A [`NavigationChain`] is a list of links run one after another.
//! - An [`Interceptor`] may defer a navigation under a reason, run a substitute chain, and have the
//!   original replayed later with [`Navigator::resolve_interception`].
//!
//! ## Sequencing
//!
//! Structural changes are applied to the model synchronously and then shown by a
//! [`Transitioner`], whose future the navigator awaits. The next chain link never starts before
//! the previous link's transitions have completed. Independent calls to [`Navigator::navigate`]
//! are not queued: callers that need ordering await each call before issuing the next.
//!
//! ## Events
//!
//! On success, events are delivered along the responder chain of the resolved node, without
//! being awaited: first [`NavigationEvent::RootReplaced`] or [`NavigationEvent::ClosedToExisting`]
//! when applicable, then the caller's event wrapped in [`NavigationEvent::App`].
//!
//! ## Failures
//!
//! Nothing panics and nothing is thrown: every navigation resolves to an [`Outcome`], which is
//! either the resolved node or a [`NavigationError`] naming the unmet precondition.
//!
//! # Example
//!
//! ```rust
//! use futures::executor::LocalPool;
//! use understory_navigator::{NavigationStrategy, Navigator, ScreenResolver};
//!
//! let mut pool = LocalPool::new();
//! let nav: Navigator<&str> = Navigator::new(ScreenResolver, pool.spawner());
//!
//! pool.run_until(async {
//!     // Nothing is shown yet, so there is no stack to push onto.
//!     let push = nav.navigate("home", NavigationStrategy::PUSH).await;
//!     assert!(push.is_err());
//!
//!     nav.navigate("home", NavigationStrategy::REPLACE_ROOT).await.unwrap();
//!     nav.navigate("sheet", NavigationStrategy::PRESENT).await.unwrap();
//!     assert_eq!(nav.topmost_identity(), Some("sheet"));
//!
//!     nav.navigate("sheet", NavigationStrategy::CLOSE_IF_TOP).await.unwrap();
//!     assert_eq!(nav.topmost_identity(), Some("home"));
//! });
//! ```

mod chain;
mod destination;
mod engine;
mod error;
mod event;
mod intercept;
mod navigator;
mod options;
mod resolver;
mod sequencer;
mod strategy;
mod transition;

pub use chain::{NavigationChain, NavigationChainLink};
pub use destination::{Destination, Identity};
pub use error::{NavigationError, Outcome};
pub use event::NavigationEvent;
pub use intercept::{
    FnInterceptor, InterceptionGate, InterceptionResult, Interceptor, PendingNavigation,
    Resolution, Resumed,
};
pub use navigator::{Navigator, NavigatorBuilder};
pub use options::NavigatorOptions;
pub use resolver::{DestinationResolver, FnResolver, ScreenResolver};
pub use strategy::{NavigationStrategy, Pane, RootTransition, SplitAction};
pub use transition::{Immediate, Transition, Transitioner};

pub use understory_presentation::{Hierarchy, NodeFlags, NodeId, NodeKind, NodeSpec, SplitMode};
pub use understory_responder_chain::types::{FnResponder, Responder};
