//! 网络流算法基准测试
//!
//! 运行: cargo bench --bench flow

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use flowgraph::{find_negative_cycle, max_flow, min_cost_flow, Arc, Graph, Node, NodeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// 分层网格：第一层为供给，最后一层为需求，相邻层之间随机连弧
fn layered_graph(layers: u64, width: u64, seed: u64) -> Graph {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph = Graph::new();
    let id = |layer: u64, slot: u64| NodeId(layer * width + slot + 1);

    for layer in 0..layers {
        for slot in 0..width {
            let balance = match layer {
                0 => 5,
                l if l + 1 == layers => -5,
                _ => 0,
            };
            graph.add_node(Node::new(id(layer, slot), balance)).unwrap();
        }
    }

    for layer in 0..layers - 1 {
        for slot in 0..width {
            for next in 0..width {
                if next == slot || rng.gen_bool(0.5) {
                    let arc = Arc::new(
                        id(layer + 1, next),
                        rng.gen_range(1..=20),
                        rng.gen_range(1..=10),
                    );
                    graph.add_arc(id(layer, slot), arc).unwrap();
                }
            }
        }
    }

    graph
}

fn bench_max_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("max_flow");
    for width in [4u64, 8, 16] {
        let graph = layered_graph(6, width, 7);
        let source = NodeId(1);
        let sink = graph.max_node_id().unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(width), &graph, |b, graph| {
            b.iter(|| max_flow(black_box(graph), Some((source, sink))).unwrap())
        });
    }
    group.finish();
}

fn bench_min_cost_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("min_cost_flow");
    group.sample_size(20);
    for width in [4u64, 8] {
        let graph = layered_graph(5, width, 11);
        group.bench_with_input(BenchmarkId::from_parameter(width), &graph, |b, graph| {
            b.iter(|| min_cost_flow(black_box(graph)).unwrap())
        });
    }
    group.finish();
}

fn bench_negative_cycle(c: &mut Criterion) {
    let graph = layered_graph(8, 8, 3);
    c.bench_function("find_negative_cycle", |b| {
        b.iter(|| find_negative_cycle(black_box(&graph)))
    });
}

criterion_group!(benches, bench_max_flow, bench_min_cost_flow, bench_negative_cycle);
criterion_main!(benches);
