// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reveal screens buried in other tabs and watch the events their responders receive.

use std::error::Error;
use std::rc::Rc;

use futures::executor::LocalPool;
use tracing_subscriber::EnvFilter;
use understory_navigator::{
    DestinationResolver, FnResponder, NavigationChainLink, NavigationEvent, NavigationStrategy,
    Navigator, NodeSpec, Responder,
};

type Event = NavigationEvent<&'static str>;

struct Screens;

impl DestinationResolver<&'static str, &'static str> for Screens {
    fn resolve(&self, identity: &&'static str) -> NodeSpec<&'static str> {
        let stack = |root: &'static str| NodeSpec::stack(vec![NodeSpec::screen(root)]);
        match *identity {
            "tabs" => NodeSpec::tabs(vec![stack("feed"), stack("inbox")], 0).with_identity("tabs"),
            other => NodeSpec::screen(other),
        }
    }

    fn responder_for(&self, identity: &&'static str) -> Option<Rc<dyn Responder<Event>>> {
        let screen = *identity;
        Some(Rc::new(FnResponder::new(move |event: &Event| {
            tracing::info!(screen, ?event, "event");
            false
        })))
    }
}

fn describe(nav: &Navigator<&'static str, &'static str>) -> Vec<&'static str> {
    let h = nav.hierarchy();
    h.visible_path()
        .into_iter()
        .filter_map(|n| h.identity(n).copied())
        .collect()
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut pool = LocalPool::new();
    let nav: Navigator<&'static str, &'static str> = Navigator::new(Screens, pool.spawner());

    let steps = [
        ("tabs", NavigationStrategy::REPLACE_ROOT),
        ("post-1", NavigationStrategy::PUSH),
        ("post-2", NavigationStrategy::PUSH),
        ("inbox", NavigationStrategy::CloseToExisting { or_present: false }),
        ("feed", NavigationStrategy::PopToExisting { include_tabs: true }),
    ];
    for (screen, strategy) in steps {
        let link = NavigationChainLink::new(screen, strategy);
        let outcome = pool.run_until(nav.navigate_link(link, Some("shown")));
        pool.run_until_stalled();
        tracing::info!(screen, ?strategy, ?outcome, visible = ?describe(&nav), "step");
    }

    // Without `include_tabs`, a match in another tab is out of reach.
    pool.run_until(nav.navigate("inbox", NavigationStrategy::CloseToExisting { or_present: false }))?;
    let outcome = pool.run_until(nav.navigate(
        "feed",
        NavigationStrategy::PopToExisting {
            include_tabs: false,
        },
    ));
    tracing::info!(?outcome, visible = ?describe(&nav), "pop without tabs");
    Ok(())
}
