// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared fixtures: an app-like identity type, a recording resolver and transitioner.

#![allow(dead_code, reason = "each test binary uses a different subset")]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::LocalPool;
use futures::future::{self, LocalBoxFuture, RemoteHandle};
use futures::task::LocalSpawnExt;
use understory_navigator::{
    Destination, DestinationResolver, FnInterceptor, Hierarchy, InterceptionResult, Interceptor,
    NavigationChainLink, NavigationEvent, NavigationStrategy, Navigator, NavigatorOptions, NodeId,
    NodeSpec, Outcome, Responder, Transition, Transitioner,
};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Screen {
    Home,
    Login,
    Vault,
    Settings,
    Profile { user: String },
    Detail(u32),
    /// A stack of the given screens.
    Nav(Vec<Screen>),
    /// Tabs, each a stack rooted at the given screen.
    Tabs(Vec<Screen>),
    /// A split: a primary stack and an optional secondary stack.
    Split(Box<Screen>, Option<Box<Screen>>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppEvent {
    Refresh,
    Ping(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Reason {
    Auth,
    Onboarding,
}

pub type Nav = Navigator<Screen, AppEvent, Reason>;
pub type EventLog = Rc<RefCell<Vec<(Screen, NavigationEvent<AppEvent>)>>>;

pub fn spec_for(identity: &Screen) -> NodeSpec<Screen> {
    let stack_of = |s: &Screen| NodeSpec::stack(vec![spec_for(s)]);
    let spec = match identity {
        Screen::Nav(members) => NodeSpec::stack(members.iter().map(spec_for).collect()),
        Screen::Tabs(roots) => NodeSpec::tabs(roots.iter().map(stack_of).collect(), 0),
        Screen::Split(primary, secondary) => {
            NodeSpec::split(stack_of(primary.as_ref()), secondary.as_deref().map(stack_of))
        }
        leaf => return NodeSpec::screen(leaf.clone()),
    };
    spec.with_identity(identity.clone())
}

/// Logs every event it sees and consumes none.
struct Recorder {
    screen: Screen,
    log: EventLog,
}

impl Responder<NavigationEvent<AppEvent>> for Recorder {
    fn handle<'a>(&'a self, event: &'a NavigationEvent<AppEvent>) -> LocalBoxFuture<'a, bool> {
        self.log
            .borrow_mut()
            .push((self.screen.clone(), event.clone()));
        Box::pin(future::ready(false))
    }
}

pub struct AppResolver {
    pub log: EventLog,
    pub resolved: Rc<RefCell<Vec<Screen>>>,
}

impl DestinationResolver<Screen, AppEvent> for AppResolver {
    fn resolve(&self, identity: &Screen) -> NodeSpec<Screen> {
        self.resolved.borrow_mut().push(identity.clone());
        spec_for(identity)
    }

    fn responder_for(
        &self,
        identity: &Screen,
    ) -> Option<Rc<dyn Responder<NavigationEvent<AppEvent>>>> {
        Some(Rc::new(Recorder {
            screen: identity.clone(),
            log: Rc::clone(&self.log),
        }))
    }
}

/// Records transitions; when gated, animated ones wait for [`Recording::release`].
#[derive(Clone, Default)]
pub struct Recording {
    pub performed: Rc<RefCell<Vec<Transition>>>,
    gates: Rc<RefCell<Vec<oneshot::Sender<()>>>>,
    gated: bool,
}

impl Recording {
    pub fn gated() -> Self {
        Self {
            gated: true,
            ..Self::default()
        }
    }

    /// Let the oldest waiting transition finish.
    pub fn release(&self) -> bool {
        let mut gates = self.gates.borrow_mut();
        if gates.is_empty() {
            return false;
        }
        let _ = gates.remove(0).send(());
        true
    }

    pub fn waiting(&self) -> usize {
        self.gates.borrow().len()
    }

    pub fn take(&self) -> Vec<Transition> {
        core::mem::take(&mut *self.performed.borrow_mut())
    }
}

impl Transitioner for Recording {
    fn perform(&self, transition: &Transition, animated: bool) -> LocalBoxFuture<'static, ()> {
        self.performed.borrow_mut().push(transition.clone());
        if !(self.gated && animated) {
            return Box::pin(future::ready(()));
        }
        let (tx, rx) = oneshot::channel();
        self.gates.borrow_mut().push(tx);
        Box::pin(async move {
            let _ = rx.await;
        })
    }
}

pub struct Harness {
    pub pool: LocalPool,
    pub nav: Nav,
    pub events: EventLog,
    pub resolved: Rc<RefCell<Vec<Screen>>>,
    pub transitions: Recording,
}

pub fn harness() -> Harness {
    harness_with(NavigatorOptions::default(), Recording::default())
}

pub fn harness_with(options: NavigatorOptions, transitions: Recording) -> Harness {
    let pool = LocalPool::new();
    let events = EventLog::default();
    let resolved = Rc::new(RefCell::new(Vec::new()));
    let resolver = AppResolver {
        log: Rc::clone(&events),
        resolved: Rc::clone(&resolved),
    };
    let nav = Navigator::builder(resolver, pool.spawner())
        .transitioner(transitions.clone())
        .options(options)
        .build();
    Harness {
        pool,
        nav,
        events,
        resolved,
        transitions,
    }
}

impl Harness {
    /// Harness whose root is a stack of `members`.
    pub fn with_stack(members: Vec<Screen>) -> Self {
        let mut h = harness();
        h.go(Screen::Nav(members), NavigationStrategy::REPLACE_ROOT)
            .unwrap();
        h.reset_logs();
        h
    }

    pub fn go(
        &mut self,
        destination: impl Into<Destination<Screen>>,
        strategy: NavigationStrategy,
    ) -> Outcome {
        let fut = self.nav.navigate(destination, strategy);
        self.pool.run_until(fut)
    }

    pub fn go_link(
        &mut self,
        link: NavigationChainLink<Screen>,
        event: Option<AppEvent>,
    ) -> Outcome {
        let fut = self.nav.navigate_link(link, event);
        self.pool.run_until(fut)
    }

    /// Run everything spawned so far (event delivery, replays).
    pub fn settle(&mut self) {
        self.pool.run_until_stalled();
    }

    /// Spawn `fut` and return a handle to its outcome.
    pub fn spawn(&self, fut: LocalBoxFuture<'static, Outcome>) -> RemoteHandle<Outcome> {
        self.pool
            .spawner()
            .spawn_local_with_handle(fut)
            .expect("pool is alive")
    }

    pub fn reset_logs(&mut self) {
        self.settle();
        self.events.borrow_mut().clear();
        self.resolved.borrow_mut().clear();
        self.transitions.take();
    }

    pub fn top(&self) -> Option<Screen> {
        self.nav.topmost_identity()
    }

    pub fn find(&self, screen: &Screen) -> Option<NodeId> {
        self.nav.hierarchy().find_identity(screen)
    }

    /// Identities of the active stack's members, bottom→top.
    pub fn stack(&self) -> Vec<Screen> {
        let h = self.nav.hierarchy();
        let Some(stack) = h.active_stack() else {
            return Vec::new();
        };
        identities(&h, h.children(stack))
    }

    /// Number of modal layers on screen.
    pub fn modal_depth(&self) -> usize {
        let h = self.nav.hierarchy();
        h.root()
            .map(|root| {
                h.visible_path_from(root)
                    .windows(2)
                    .filter(|w| h.presented(w[0]) == Some(w[1]))
                    .count()
            })
            .unwrap_or(0)
    }

    pub fn events_for(&self, screen: &Screen) -> Vec<NavigationEvent<AppEvent>> {
        self.events
            .borrow()
            .iter()
            .filter(|(s, _)| s == screen)
            .map(|(_, e)| e.clone())
            .collect()
    }
}

pub fn identities(h: &Hierarchy<Screen>, nodes: &[NodeId]) -> Vec<Screen> {
    nodes
        .iter()
        .filter_map(|&n| h.identity(n).cloned())
        .collect()
}

/// Redirects protected screens to an embedded login while signed out.
pub fn auth_gate(signed_in: Rc<Cell<bool>>) -> impl Interceptor<Screen, AppEvent, Reason> {
    FnInterceptor::new(
        move |dest: &Destination<Screen>, h: &Hierarchy<Screen>| {
            let protected = matches!(
                dest.identity(h),
                Some(Screen::Vault | Screen::Profile { .. })
            );
            (protected && !signed_in.get()).then(|| {
                InterceptionResult::<Screen, AppEvent, Reason>::new(
                    vec![NavigationChainLink::new(
                        Screen::Login,
                        NavigationStrategy::PRESENT_EMBEDDED,
                    )],
                    Reason::Auth,
                )
            })
        },
    )
}
