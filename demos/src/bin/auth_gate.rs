// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Defer a protected navigation behind a sign-in sheet, then replay it.
//!
//! Run with `RUST_LOG=understory_navigator=trace` to see every step of the sequencer.

use std::cell::Cell;
use std::error::Error;
use std::rc::Rc;

use futures::executor::LocalPool;
use futures::future::{self, LocalBoxFuture};
use futures::task::LocalSpawnExt;
use tracing_subscriber::EnvFilter;
use understory_navigator::{
    Destination, FnInterceptor, FnResolver, Hierarchy, InterceptionResult, NavigationChainLink,
    NavigationStrategy, Navigator, NodeSpec, Resolution, Transition, Transitioner,
};

/// Logs each transition instead of animating it.
#[derive(Debug)]
struct Narrate;

impl Transitioner for Narrate {
    fn perform(&self, transition: &Transition, animated: bool) -> LocalBoxFuture<'static, ()> {
        tracing::info!(?transition, animated, "transition");
        Box::pin(future::ready(()))
    }
}

fn spec_for(identity: &&'static str) -> NodeSpec<&'static str> {
    match *identity {
        "main" => NodeSpec::stack(vec![NodeSpec::screen("home")]).with_identity("main"),
        other => NodeSpec::screen(other),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut pool = LocalPool::new();
    let signed_in = Rc::new(Cell::new(false));
    let gate = {
        let signed_in = Rc::clone(&signed_in);
        FnInterceptor::new(
            move |dest: &Destination<&'static str>, h: &Hierarchy<&'static str>| {
                let protected = dest.identity(h) == Some(&"vault");
                (protected && !signed_in.get()).then(|| {
                    InterceptionResult::<_, (), _>::new(
                        vec![NavigationChainLink::new(
                            "login",
                            NavigationStrategy::PRESENT_EMBEDDED,
                        )],
                        "auth",
                    )
                })
            },
        )
    };
    let nav: Navigator<&'static str> = Navigator::builder(FnResolver::new(spec_for), pool.spawner())
        .transitioner(Narrate)
        .interceptor(gate)
        .build();

    pool.run_until(nav.navigate("main", NavigationStrategy::REPLACE_ROOT))?;

    let original = pool
        .spawner()
        .spawn_local_with_handle(nav.navigate("vault", NavigationStrategy::PUSH))?;
    pool.run_until_stalled();
    tracing::info!(
        top = ?nav.topmost_identity(),
        pending = ?nav.pending_reasons(),
        "vault deferred"
    );

    signed_in.set(true);
    pool.run_until(nav.navigate("login", NavigationStrategy::CLOSE_IF_TOP))?;
    let resumed = nav
        .resolve_interception(&"auth", Resolution::new())
        .ok_or("nothing was parked under \"auth\"")?;
    let vault = pool.run_until(resumed)?;
    let seen_by_caller = pool.run_until(original)?;

    tracing::info!(
        ?vault,
        same = vault == seen_by_caller,
        top = ?nav.topmost_identity(),
        "vault shown"
    );
    Ok(())
}
