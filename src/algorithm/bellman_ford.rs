//! Bellman-Ford 最短路径与负环检测
//!
//! 对 `|V| - 1` 轮松弛后再做一轮检测：检测轮仍能松弛说明存在负环。
//! 负环从检测轮最后一个被松弛的节点出发，沿前驱回溯到第一个重复节点，
//! 去掉非环前缀后反转为弧的方向。
//!
//! 时间复杂度 O(V * E)。

use crate::error::Result;
use crate::graph::Graph;
use crate::types::{format_path, Amount, NodeId};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::HashMap;
use tracing::trace;

/// 节点标签：前驱和距离
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Label {
    pub predecessor: Option<NodeId>,
    pub distance: Amount,
}

/// 最短路径树
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortestPathTree {
    source: NodeId,
    labels: IndexMap<NodeId, Label>,
}

impl ShortestPathTree {
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// 到 `id` 的最短距离，不可达为 `None`
    pub fn distance(&self, id: NodeId) -> Option<Amount> {
        self.labels.get(&id).map(|label| label.distance)
    }

    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        self.labels.get(&id).and_then(|label| label.predecessor)
    }

    /// 可达节点及其标签
    pub fn labels(&self) -> impl Iterator<Item = (NodeId, &Label)> {
        self.labels.iter().map(|(id, label)| (*id, label))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// 从源点到 `target` 的最短路径
    pub fn path_to(&self, target: NodeId) -> Option<Vec<NodeId>> {
        if !self.labels.contains_key(&target) {
            return None;
        }
        let mut path = vec![target];
        let mut current = target;
        while let Some(prev) = self.predecessor(current) {
            path.push(prev);
            current = prev;
        }
        path.reverse();
        Some(path)
    }
}

/// Bellman-Ford 的结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum BellmanFord {
    /// 没有可达负环
    ShortestPaths(ShortestPathTree),
    /// 负环上的节点，按弧的方向排列，首节点不重复
    NegativeCycle(Vec<NodeId>),
}

impl BellmanFord {
    pub fn negative_cycle(&self) -> Option<&[NodeId]> {
        match self {
            BellmanFord::NegativeCycle(cycle) => Some(cycle),
            BellmanFord::ShortestPaths(_) => None,
        }
    }

    pub fn shortest_paths(&self) -> Option<&ShortestPathTree> {
        match self {
            BellmanFord::ShortestPaths(tree) => Some(tree),
            BellmanFord::NegativeCycle(_) => None,
        }
    }
}

/// 从 `source` 出发计算最短路径，或返回一个可达负环
pub fn shortest_paths_or_negative_cycle(graph: &Graph, source: NodeId) -> Result<BellmanFord> {
    graph.node(source)?;

    let mut labels = IndexMap::from([(
        source,
        Label {
            predecessor: None,
            distance: 0,
        },
    )]);

    Ok(match relax(graph, &mut labels) {
        Some(cycle) => BellmanFord::NegativeCycle(cycle),
        None => BellmanFord::ShortestPaths(ShortestPathTree { source, labels }),
    })
}

/// 查找图中任意负环
///
/// 以虚拟根为起点（到每个节点的零费用弧），所有节点初始距离为 0，
/// 因此不依赖某个具体节点的可达范围。
pub fn find_negative_cycle(graph: &Graph) -> Option<Vec<NodeId>> {
    let mut labels: IndexMap<NodeId, Label> = graph
        .node_ids()
        .map(|id| {
            (
                id,
                Label {
                    predecessor: None,
                    distance: 0,
                },
            )
        })
        .collect();

    relax(graph, &mut labels)
}

/// 给环补上首节点，得到可直接推送流量的闭合路径
pub fn close_cycle(cycle: &[NodeId]) -> Vec<NodeId> {
    let mut closed = cycle.to_vec();
    if let Some(&first) = cycle.first() {
        closed.push(first);
    }
    closed
}

/// 松弛 `|V|` 轮，最后一轮仍有松弛时返回负环
fn relax(graph: &Graph, labels: &mut IndexMap<NodeId, Label>) -> Option<Vec<NodeId>> {
    let rounds = graph.len();

    for round in 0..rounds {
        let mut last_relaxed = None;

        for (tail, arc) in graph.arcs() {
            let Some(base) = labels.get(&tail).map(|label| label.distance) else {
                continue;
            };
            let candidate = base.saturating_add(arc.cost());
            let improves = labels
                .get(&arc.head())
                .map_or(true, |label| candidate < label.distance);

            if improves {
                labels.insert(
                    arc.head(),
                    Label {
                        predecessor: Some(tail),
                        distance: candidate,
                    },
                );
                last_relaxed = Some(arc.head());
            }
        }

        trace!(round, relaxed = last_relaxed.is_some(), "Bellman-Ford 松弛");

        match last_relaxed {
            None => return None,
            Some(node) if round + 1 == rounds => {
                let cycle = trace_cycle(labels, node);
                if let Some(cycle) = &cycle {
                    trace!(cycle = %format_path(cycle), "发现负环");
                }
                return cycle;
            }
            Some(_) => {}
        }
    }

    None
}

/// 从 `start` 沿前驱回溯，截取第一个重复节点开始的环
fn trace_cycle(labels: &IndexMap<NodeId, Label>, start: NodeId) -> Option<Vec<NodeId>> {
    let mut walk = Vec::new();
    let mut position = HashMap::new();
    let mut current = start;

    loop {
        if let Some(&first) = position.get(&current) {
            let mut cycle = walk.split_off(first);
            cycle.reverse();
            return Some(cycle);
        }
        position.insert(current, walk.len());
        walk.push(current);
        current = labels.get(&current)?.predecessor?;
    }
}
