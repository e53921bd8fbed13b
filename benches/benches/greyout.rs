// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_greyout::arena::{NodeId, SceneArena};
use understory_greyout::{Classification, Mode, Reconciler};

/// Builds a complete tree with the given fan-out and depth. Every node has a
/// visual. Returns the arena, the root, and one node at each level along the
/// leftmost spine.
fn build_tree(fanout: usize, depth: usize) -> (SceneArena<u32>, NodeId, Vec<NodeId>) {
    let mut scene = SceneArena::new();
    let root = scene.insert(None, Some(0));
    let mut spine = vec![root];
    let mut level = vec![root];
    let mut next_value = 1_u32;
    for _ in 1..depth {
        let mut next = Vec::with_capacity(level.len() * fanout);
        for &parent in &level {
            for _ in 0..fanout {
                next.push(scene.insert(Some(parent), Some(next_value)));
                next_value += 1;
            }
        }
        spine.push(next[0]);
        level = next;
    }
    (scene, root, spine)
}

fn bench_classification(c: &mut Criterion) {
    let mut group = c.benchmark_group("greyout/apply_greyed");

    // Hypothesis: `AncestorWalk` grows with depth while `Inherited` stays
    // linear in node count.
    for (fanout, depth) in [(8usize, 4usize), (4, 7), (2, 13)] {
        let (scene, root, spine) = build_tree(fanout, depth);
        let selection = [spine[depth / 2]];
        group.throughput(Throughput::Elements(scene.len() as u64));

        for strategy in [Classification::AncestorWalk, Classification::Inherited] {
            let mut scene = scene.clone();
            let mut reconciler = Reconciler::new().with_classification(strategy);
            reconciler.capture_baseline(&scene, root).unwrap();

            group.bench_with_input(
                BenchmarkId::new(format!("{strategy:?}"), format!("f{fanout}_d{depth}")),
                &selection,
                |b, selection| {
                    b.iter(|| {
                        let stats = reconciler
                            .apply_mode(&mut scene, root, selection, Mode::Greyed, &u32::MAX)
                            .unwrap();
                        black_box(stats);
                    });
                },
            );
        }
    }

    group.finish();
}

fn bench_round_trip(c: &mut Criterion) {
    let mut group = c.benchmark_group("greyout/round_trip");

    let (mut scene, root, spine) = build_tree(4, 7);
    let selection = [spine[3]];
    group.throughput(Throughput::Elements(scene.len() as u64 * 2));

    let mut reconciler = Reconciler::new();
    reconciler.capture_baseline(&scene, root).unwrap();
    group.bench_function("greyed_then_normal", |b| {
        b.iter(|| {
            for mode in [Mode::Greyed, Mode::Normal] {
                let stats = reconciler
                    .apply_mode(&mut scene, root, &selection, mode, &u32::MAX)
                    .unwrap();
                black_box(stats);
            }
        });
    });

    group.finish();
}

criterion_group!(benches, bench_classification, bench_round_trip);
criterion_main!(benches);
