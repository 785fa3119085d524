// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Events delivered to responders after navigation.

/// An event relayed through the responder chain of a navigation's resolved node.
///
/// The engine never interprets application events; it only relays them.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NavigationEvent<E> {
    /// The destination replaced an already visible root.
    RootReplaced,
    /// The destination already existed and was revealed (tab selected, popped, or uncovered).
    ClosedToExisting,
    /// The caller-supplied event.
    App(E),
}

impl<E> NavigationEvent<E> {
    /// The application payload, if this is not a synthetic event.
    pub fn app(&self) -> Option<&E> {
        match self {
            Self::App(e) => Some(e),
            Self::RootReplaced | Self::ClosedToExisting => None,
        }
    }

    /// Returns true for events the engine emits on its own.
    pub fn is_synthetic(&self) -> bool {
        self.app().is_none()
    }
}
