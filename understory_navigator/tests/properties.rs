// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests over random navigation sequences.

mod common;

use common::{Harness, Screen};
use proptest::prelude::*;
use understory_navigator::{NavigationStrategy, NodeSpec};

use NavigationStrategy as S;
use Screen::{Detail, Home};

#[derive(Clone, Debug)]
enum Step {
    Push(u32),
    Present(u32),
    PresentEmbedded(u32),
    CloseIfTop(u32),
    CloseToExisting(u32),
    Remove(u32),
    ReplaceStackRoot(u32),
}

fn step() -> impl Strategy<Value = Step> {
    let id = 0_u32..4;
    prop_oneof![
        3 => id.clone().prop_map(Step::Push),
        1 => id.clone().prop_map(Step::Present),
        1 => id.clone().prop_map(Step::PresentEmbedded),
        2 => id.clone().prop_map(Step::CloseIfTop),
        1 => id.clone().prop_map(Step::CloseToExisting),
        1 => id.clone().prop_map(Step::Remove),
        1 => id.prop_map(Step::ReplaceStackRoot),
    ]
}

impl Step {
    fn run(&self, h: &mut Harness) {
        let (id, strategy) = match *self {
            Self::Push(id) => (id, S::PUSH),
            Self::Present(id) => (id, S::PRESENT),
            Self::PresentEmbedded(id) => (id, S::PRESENT_EMBEDDED),
            Self::CloseIfTop(id) => (id, S::CLOSE_IF_TOP),
            Self::CloseToExisting(id) => (id, S::CloseToExisting { or_present: false }),
            Self::Remove(id) => (id, S::RemoveFromStack),
            Self::ReplaceStackRoot(id) => (id, S::ReplaceStackRoot),
        };
        // Failures are legitimate outcomes here; only the resulting state is checked.
        let _ = h.go(Detail(id), strategy);
    }
}

proptest! {
    #[test]
    fn identities_compare_structurally(
        a in "[a-z]{0,6}",
        b in "[a-z]{0,6}",
        n in 0_u32..4,
    ) {
        let profile = |user: &str| Screen::Profile { user: user.to_owned() };
        let nested = |user: &str| Screen::Nav(vec![Detail(n), profile(user)]);
        prop_assert_eq!(profile(&a), profile(&a));
        prop_assert_eq!(nested(&a), nested(&a));
        prop_assert_eq!(profile(&a) == profile(&b), a == b);
        prop_assert_eq!(nested(&a) == nested(&b), a == b);
        prop_assert_ne!(profile(&a), Detail(n));
    }

    #[test]
    fn random_navigation_keeps_the_hierarchy_consistent(
        steps in prop::collection::vec(step(), 1..24),
    ) {
        let mut h = Harness::with_stack(vec![Home]);
        for step in &steps {
            step.run(&mut h);
            h.settle();
            let hier = h.nav.hierarchy();
            prop_assert!(hier.responder_links_are_live(), "after {step:?}");
            let top = hier.topmost();
            prop_assert!(top.is_some(), "something stays on screen after {step:?}");
            if let Some(top) = top {
                prop_assert!(hier.is_attached(top), "top is reachable from the root");
            }
        }
    }

    #[test]
    fn present_then_close_restores_the_start(
        ids in prop::collection::vec(0_u32..1000, 1..8),
        embedded in any::<bool>(),
    ) {
        let mut h = Harness::with_stack(vec![Home]);
        let nodes_before = h.nav.hierarchy().len();
        let present = if embedded { S::PRESENT_EMBEDDED } else { S::PRESENT };
        for &id in &ids {
            prop_assert!(h.go(Detail(id), present).is_ok());
        }
        prop_assert_eq!(h.modal_depth(), ids.len());
        for &id in ids.iter().rev() {
            prop_assert_eq!(h.top(), Some(Detail(id)));
            prop_assert!(h.go(Detail(id), S::CLOSE_IF_TOP).is_ok());
        }
        prop_assert_eq!(h.top(), Some(Home));
        prop_assert_eq!(h.modal_depth(), 0);
        prop_assert_eq!(h.nav.hierarchy().len(), nodes_before);
    }

    #[test]
    fn search_matches_structurally_equal_identities(
        ids in prop::collection::vec(0_u32..6, 1..12),
        probe in 0_u32..6,
    ) {
        let h = Harness::with_stack(vec![Home]);
        h.nav.with_hierarchy_mut(|hier| {
            let stack = hier.active_stack().expect("root is a stack");
            for &id in &ids {
                let node = hier.build(NodeSpec::screen(Detail(id)));
                hier.push(stack, node);
            }
        });
        let hier = h.nav.hierarchy();
        let stack = hier.active_stack().expect("root is a stack");
        let matching = hier.stack_members_matching(stack, &Detail(probe));
        prop_assert_eq!(matching.len(), ids.iter().filter(|&&id| id == probe).count());
        match hier.find_identity(&Detail(probe)) {
            Some(found) => {
                prop_assert_eq!(hier.identity(found), Some(&Detail(probe)));
                prop_assert_eq!(Some(&found), matching.first());
            }
            None => prop_assert!(matching.is_empty()),
        }
    }
}
