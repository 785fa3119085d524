// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Navigator configuration.

/// Tunables for a [`Navigator`](crate::Navigator).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NavigatorOptions {
    /// Maximum number of fallbacks tried after the first attempt.
    pub max_fallback_depth: usize,
    /// Deliver [`RootReplaced`](crate::NavigationEvent::RootReplaced) and
    /// [`ClosedToExisting`](crate::NavigationEvent::ClosedToExisting) to responders.
    pub emit_synthetic_events: bool,
    /// Let the interceptor see the substitute chains it produced.
    pub intercept_substitutes: bool,
}

impl NavigatorOptions {
    /// Default fallback limit.
    pub const DEFAULT_MAX_FALLBACK_DEPTH: usize = 16;

    /// Set [`max_fallback_depth`](Self::max_fallback_depth).
    #[must_use]
    pub fn with_max_fallback_depth(mut self, depth: usize) -> Self {
        self.max_fallback_depth = depth;
        self
    }

    /// Set [`emit_synthetic_events`](Self::emit_synthetic_events).
    #[must_use]
    pub fn with_synthetic_events(mut self, emit: bool) -> Self {
        self.emit_synthetic_events = emit;
        self
    }

    /// Set [`intercept_substitutes`](Self::intercept_substitutes).
    #[must_use]
    pub fn with_intercept_substitutes(mut self, intercept: bool) -> Self {
        self.intercept_substitutes = intercept;
        self
    }
}

impl Default for NavigatorOptions {
    fn default() -> Self {
        Self {
            max_fallback_depth: Self::DEFAULT_MAX_FALLBACK_DEPTH,
            emit_synthetic_events: true,
            intercept_substitutes: true,
        }
    }
}
