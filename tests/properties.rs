//! 随机图上的网络流性质测试

use flowgraph::algorithm::residual::to_residual;
use flowgraph::{
    find_negative_cycle, max_flow, min_cost_flow, shortest_paths_or_negative_cycle, Amount, Arc,
    EdmondsKarp, FlowOptions, Graph, MaxFlow, MinCostFlow, Node, NodeId, SearchStrategy,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use tracing_subscriber::EnvFilter;

const SEEDS: u64 = 40;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// 随机生成带平衡的有向图，允许反平行弧和负费用
fn random_graph(rng: &mut StdRng) -> Graph {
    let size = rng.gen_range(2..=8u64);
    let mut graph = Graph::new();
    for id in 1..=size {
        graph.add_node(Node::new(NodeId(id), 0)).unwrap();
    }

    let mut pairs = HashSet::new();
    for _ in 0..rng.gen_range(size..=size * 3) {
        let tail = rng.gen_range(1..=size);
        let head = rng.gen_range(1..=size);
        if tail == head || !pairs.insert((tail, head)) {
            continue;
        }
        let cost = rng.gen_range(-3..=10);
        let capacity = rng.gen_range(0..=10);
        graph
            .add_arc(NodeId(tail), Arc::new(NodeId(head), cost, capacity))
            .unwrap();
    }

    // 一个供给节点和一个需求节点，平衡相反
    let supply = rng.gen_range(0..=12);
    let source = rng.gen_range(1..=size);
    let mut sink = rng.gen_range(1..=size);
    while sink == source {
        sink = rng.gen_range(1..=size);
    }
    graph.set_balance(NodeId(source), supply).unwrap();
    graph.set_balance(NodeId(sink), -supply).unwrap();

    graph
}

fn graphs() -> impl Iterator<Item = Graph> {
    (0..SEEDS).map(|seed| random_graph(&mut StdRng::seed_from_u64(seed)))
}

fn net_outflow(graph: &Graph, id: NodeId) -> Amount {
    graph.outflow(id).unwrap() - graph.inflow(id).unwrap()
}

/// 结果图中的每条弧都来自原图，且流量在 (0, capacity] 内
fn assert_flow_arcs(input: &Graph, result: &Graph) {
    for (tail, arc) in result.arcs() {
        let original = input.arc(tail, arc.head()).unwrap();
        assert_eq!(arc.cost(), original.cost());
        assert_eq!(arc.capacity(), original.capacity());
        assert!(arc.flow() > 0 && arc.flow() <= arc.capacity());
    }
}

fn terminals(graph: &Graph) -> (NodeId, NodeId) {
    let first = graph.nodes().next().unwrap().id();
    let last = graph.max_node_id().unwrap();
    (first, last)
}

#[test]
fn test_max_flow_equals_min_cut() -> anyhow::Result<()> {
    init_tracing();
    for graph in graphs() {
        let (source, sink) = terminals(&graph);
        let result: MaxFlow = max_flow(&graph, Some((source, sink)))?;

        assert_eq!(result.cut_capacity(&graph), result.value);
        assert!(result.source_side.contains(&source));
        assert!(!result.source_side.contains(&sink));
    }
    Ok(())
}

#[test]
fn test_max_flow_conservation() -> anyhow::Result<()> {
    init_tracing();
    for graph in graphs() {
        let (source, sink) = terminals(&graph);
        let result = max_flow(&graph, Some((source, sink)))?;

        assert_flow_arcs(&graph, &result.graph);
        for node in graph.nodes() {
            let expected = match node.id() {
                id if id == source => result.value,
                id if id == sink => -result.value,
                _ => 0,
            };
            assert_eq!(net_outflow(&result.graph, node.id()), expected);
        }
    }
    Ok(())
}

#[test]
fn test_strategies_agree() -> anyhow::Result<()> {
    for graph in graphs() {
        let (source, sink) = terminals(&graph);
        let bfs = max_flow(&graph, Some((source, sink)))?;
        let dfs = EdmondsKarp::new(&graph)
            .with_options(FlowOptions::default().with_strategy(SearchStrategy::DepthFirst))
            .max_flow(source, sink)?;
        assert_eq!(bfs.value, dfs.value);
    }
    Ok(())
}

#[test]
fn test_min_cost_mass_balance() -> anyhow::Result<()> {
    init_tracing();
    for graph in graphs() {
        let result: MinCostFlow = min_cost_flow(&graph)?;
        assert_flow_arcs(&graph, &result.graph);

        for node in graph.nodes() {
            let net = net_outflow(&result.graph, node.id());
            match node.balance() {
                0 => assert_eq!(net, 0),
                balance if balance > 0 => assert!((0..=balance).contains(&net)),
                balance => assert!((balance..=0).contains(&net)),
            }
            if result.is_feasible() {
                assert_eq!(net, node.balance());
            }
        }
        assert_eq!(result.cost, result.graph.total_cost());
    }
    Ok(())
}

#[test]
fn test_min_cost_flow_matches_feasible_flow() -> anyhow::Result<()> {
    for graph in graphs() {
        let feasible = max_flow(&graph, None)?;
        let optimal = min_cost_flow(&graph)?;
        assert_eq!(optimal.flow, feasible.value);
        assert!(optimal.cost <= feasible.graph.total_cost());
    }
    Ok(())
}

#[test]
fn test_min_cost_leaves_no_negative_cycle() -> anyhow::Result<()> {
    init_tracing();
    for graph in graphs() {
        let result = min_cost_flow(&graph)?;

        let mut with_flow = graph.clone();
        for (tail, arc) in result.graph.arcs() {
            with_flow.arc_mut(tail, arc.head())?.set_flow(arc.flow());
        }
        let residual = to_residual(&with_flow)?;
        assert_eq!(find_negative_cycle(&residual), None);
    }
    Ok(())
}

#[test]
fn test_results_are_deterministic() -> anyhow::Result<()> {
    for graph in graphs() {
        let first = min_cost_flow(&graph)?;
        let second = min_cost_flow(&graph)?;
        assert_eq!(first.graph, second.graph);
        assert_eq!(first.cost, second.cost);
        assert_eq!(first.cycles_canceled, second.cycles_canceled);

        let (source, sink) = terminals(&graph);
        let a = shortest_paths_or_negative_cycle(&graph, source)?;
        let b = shortest_paths_or_negative_cycle(&graph, source)?;
        assert_eq!(a, b);
        assert_eq!(
            max_flow(&graph, Some((source, sink)))?.graph,
            max_flow(&graph, Some((source, sink)))?.graph
        );
    }
    Ok(())
}

#[test]
fn test_input_untouched() -> anyhow::Result<()> {
    for graph in graphs() {
        let before = graph.clone();
        let (source, sink) = terminals(&graph);

        max_flow(&graph, Some((source, sink)))?;
        max_flow(&graph, None)?;
        min_cost_flow(&graph)?;
        shortest_paths_or_negative_cycle(&graph, source)?;

        assert_eq!(graph, before);
    }
    Ok(())
}

#[test]
fn test_json_round_trip_preserves_results() -> anyhow::Result<()> {
    for graph in graphs() {
        let restored = Graph::from_json(&graph.to_json()?)?;
        assert_eq!(restored, graph);
        assert_eq!(min_cost_flow(&restored)?.cost, min_cost_flow(&graph)?.cost);
    }
    Ok(())
}
