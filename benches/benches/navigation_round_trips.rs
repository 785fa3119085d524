// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use futures::executor::LocalPool;
use understory_navigator::{
    NavigationChainLink, NavigationStrategy as S, Navigator, NodeSpec, ScreenResolver,
};

fn navigator(pool: &LocalPool) -> Navigator<u32> {
    let nav = Navigator::new(ScreenResolver, pool.spawner());
    nav.with_hierarchy_mut(|h| {
        let stack = h.build(NodeSpec::stack(vec![NodeSpec::screen(0)]));
        h.set_root(stack);
    });
    nav
}

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("navigate");

    let mut pool = LocalPool::new();
    let nav = navigator(&pool);
    group.bench_function("push_close_if_top", |b| {
        b.iter(|| {
            let pushed = pool.run_until(nav.navigate(1_u32, S::PUSH));
            let closed = pool.run_until(nav.navigate(1_u32, S::CLOSE_IF_TOP));
            black_box((pushed, closed));
        });
    });

    group.bench_function("present_embedded_close_if_top", |b| {
        b.iter(|| {
            let shown = pool.run_until(nav.navigate(2_u32, S::PRESENT_EMBEDDED));
            let closed = pool.run_until(nav.navigate(2_u32, S::CLOSE_IF_TOP));
            black_box((shown, closed));
        });
    });

    for &depth in &[4_u32, 32] {
        let chain: Vec<_> = (1..=depth)
            .map(|d| NavigationChainLink::new(d, S::PUSH).animated(false))
            .collect();
        group.bench_function(format!("chain_then_pop_to_root_d{depth}"), |b| {
            b.iter(|| {
                let top = pool.run_until(nav.run(chain.clone(), None));
                let back = pool.run_until(nav.navigate(0_u32, S::PopToExisting { include_tabs: false }));
                pool.run_until_stalled();
                black_box((top, back));
            });
        });
    }

    let head = NavigationChainLink::fallback_chain(
        9_u32,
        [
            S::PopToExisting { include_tabs: true },
            S::CloseToExisting { or_present: false },
            S::PUSH,
        ],
        false,
    )
    .expect("non-empty strategy list");
    group.bench_function("fallbacks_then_close", |b| {
        b.iter(|| {
            let shown = pool.run_until(nav.navigate_link(head.clone(), None));
            let closed = pool.run_until(nav.navigate(9_u32, S::CLOSE_IF_TOP));
            black_box((shown, closed));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_strategies);
criterion_main!(benches);
