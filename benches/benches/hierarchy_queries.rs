// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_presentation::{Hierarchy, NodeId, NodeSpec};

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn below(&mut self, n: u64) -> u64 {
        self.next_u64() % n
    }
}

/// `tabs` tabs, each a stack of `depth` screens, then `modals` layers presented on top.
fn gen_app(tabs: u32, depth: u32, modals: u32) -> Hierarchy<u32> {
    let mut h = Hierarchy::new();
    let stacks = (0..tabs)
        .map(|t| NodeSpec::stack((0..depth).map(|d| NodeSpec::screen(t * 10_000 + d)).collect()))
        .collect();
    let root = h.build(NodeSpec::tabs(stacks, 0));
    h.set_root(root);
    for m in 0..modals {
        let top = h.topmost().expect("root is set");
        let sheet = h.build(NodeSpec::stack(vec![NodeSpec::screen(1_000_000 + m)]));
        h.present(top, sheet);
    }
    h
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");
    for &(tabs, depth) in &[(4_u32, 8_u32), (8, 64), (16, 256)] {
        let h = gen_app(tabs, depth, 3);
        let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
        let probes: Vec<u32> = (0..256)
            .map(|_| {
                let t = rng.below(u64::from(tabs)) as u32;
                let d = rng.below(u64::from(depth)) as u32;
                t * 10_000 + d
            })
            .collect();
        group.throughput(Throughput::Elements(probes.len() as u64));
        group.bench_function(format!("find_identity_hit_t{tabs}_d{depth}"), |b| {
            b.iter(|| {
                let found = probes
                    .iter()
                    .filter(|p| h.find_identity(p).is_some())
                    .count();
                black_box(found);
            });
        });
        group.bench_function(format!("find_identity_miss_t{tabs}_d{depth}"), |b| {
            b.iter(|| black_box(h.find_identity(&u32::MAX)));
        });
    }
    group.finish();
}

fn bench_visible(c: &mut Criterion) {
    let mut group = c.benchmark_group("visible");
    for &modals in &[0_u32, 4, 32] {
        let h = gen_app(8, 64, modals);
        group.bench_function(format!("topmost_m{modals}"), |b| {
            b.iter(|| black_box(h.topmost()));
        });
        group.bench_function(format!("active_stack_m{modals}"), |b| {
            b.iter(|| black_box(h.active_stack()));
        });
        let top = h.topmost().expect("root is set");
        group.bench_function(format!("path_to_top_m{modals}"), |b| {
            b.iter(|| black_box(h.path_to(top)));
        });
    }
    group.finish();
}

fn bench_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutations");
    for &depth in &[16_u32, 256] {
        group.throughput(Throughput::Elements(u64::from(depth)));
        group.bench_function(format!("push_then_pop_to_bottom_d{depth}"), |b| {
            b.iter_batched(
                || {
                    let mut h = Hierarchy::new();
                    let stack = h.build(NodeSpec::stack(vec![NodeSpec::screen(0_u32)]));
                    h.set_root(stack);
                    (h, stack)
                },
                |(mut h, stack): (Hierarchy<u32>, NodeId)| {
                    for d in 1..depth {
                        let node = h.build(NodeSpec::screen(d));
                        h.push(stack, node);
                    }
                    let bottom = h.children(stack)[0];
                    black_box(h.pop_to(stack, bottom));
                },
                BatchSize::SmallInput,
            );
        });
        group.bench_function(format!("remove_every_other_d{depth}"), |b| {
            b.iter_batched(
                || {
                    let mut h = Hierarchy::new();
                    let stack = h.build(NodeSpec::stack(
                        (0..depth).map(|d| NodeSpec::screen(d % 2)).collect(),
                    ));
                    h.set_root(stack);
                    (h, stack)
                },
                |(mut h, stack): (Hierarchy<u32>, NodeId)| {
                    let odd = h.stack_members_matching(stack, &1);
                    black_box(h.remove_members(stack, &odd));
                    debug_assert!(h.responder_links_are_live());
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_search, bench_visible, bench_mutations);
criterion_main!(benches);
