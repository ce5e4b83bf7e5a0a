//! 路径搜索
//!
//! 广度优先（队列）和深度优先（栈）搜索，返回源点到汇点的一条路径，
//! 或在未指定汇点时返回完整的前驱树。弧的探索顺序等于插入顺序，
//! 因此对未修改的图结果是确定的。

use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::types::NodeId;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// 搜索策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchStrategy {
    /// 广度优先（队列），得到边数最少的路径
    #[default]
    BreadthFirst,
    /// 深度优先（栈）
    DepthFirst,
}

/// 待访问节点集合
struct Frontier {
    strategy: SearchStrategy,
    items: VecDeque<NodeId>,
}

impl Frontier {
    fn new(strategy: SearchStrategy, start: NodeId) -> Self {
        Self {
            strategy,
            items: VecDeque::from([start]),
        }
    }

    fn push(&mut self, id: NodeId) {
        self.items.push_back(id);
    }

    fn pop(&mut self) -> Option<NodeId> {
        match self.strategy {
            SearchStrategy::BreadthFirst => self.items.pop_front(),
            SearchStrategy::DepthFirst => self.items.pop_back(),
        }
    }
}

/// 前驱树
///
/// 覆盖从源点可达的所有节点，源点的前驱为 `None`。
/// 路径按需通过 [`SearchTree::path_to`] 生成。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchTree {
    source: NodeId,
    predecessors: IndexMap<NodeId, Option<NodeId>>,
}

impl SearchTree {
    pub fn source(&self) -> NodeId {
        self.source
    }

    /// 节点的前驱；源点和不可达节点返回 `None`
    pub fn predecessor(&self, id: NodeId) -> Option<NodeId> {
        self.predecessors.get(&id).copied().flatten()
    }

    /// 节点是否可达
    pub fn contains(&self, id: NodeId) -> bool {
        self.predecessors.contains_key(&id)
    }

    /// 可达节点（按发现顺序）
    pub fn reachable(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.predecessors.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.predecessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predecessors.is_empty()
    }

    /// 从源点到 `target` 的路径，不可达时为 `None`
    pub fn path_to(&self, target: NodeId) -> Option<Vec<NodeId>> {
        if !self.contains(target) {
            return None;
        }
        Some(reconstruct_path(&self.predecessors, target))
    }
}

/// 路径查找器
pub struct PathFinder<'g> {
    graph: &'g Graph,
    strategy: SearchStrategy,
}

impl<'g> PathFinder<'g> {
    /// 创建路径查找器（默认广度优先）
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            strategy: SearchStrategy::default(),
        }
    }

    /// 设置搜索策略
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// 查找从 `source` 到 `sink` 的路径
    ///
    /// 一旦出队的节点有弧指向汇点就立即停止。汇点不可达时返回 `Ok(None)`。
    pub fn find_path(&self, source: NodeId, sink: NodeId) -> Result<Option<Vec<NodeId>>> {
        self.graph.node(source)?;
        if !self.graph.has_node(sink) {
            return Err(Error::NodeNotFound(sink));
        }
        if source == sink {
            return Ok(Some(vec![source]));
        }

        let mut predecessors = IndexMap::from([(source, None)]);
        let mut frontier = Frontier::new(self.strategy, source);

        while let Some(current) = frontier.pop() {
            let node = self.graph.node(current)?;

            if node.has_arc_to(sink) {
                predecessors.insert(sink, Some(current));
                return Ok(Some(reconstruct_path(&predecessors, sink)));
            }

            for arc in node.arcs() {
                let next = arc.head();
                if !predecessors.contains_key(&next) {
                    predecessors.insert(next, Some(current));
                    frontier.push(next);
                }
            }
        }

        Ok(None)
    }

    /// 生成以 `source` 为根的前驱树
    pub fn tree(&self, source: NodeId) -> Result<SearchTree> {
        self.graph.node(source)?;

        let mut predecessors = IndexMap::from([(source, None)]);
        let mut frontier = Frontier::new(self.strategy, source);

        while let Some(current) = frontier.pop() {
            for arc in self.graph.node(current)?.arcs() {
                let next = arc.head();
                if !predecessors.contains_key(&next) {
                    predecessors.insert(next, Some(current));
                    frontier.push(next);
                }
            }
        }

        Ok(SearchTree {
            source,
            predecessors,
        })
    }
}

/// 广度优先查找路径
pub fn bfs(graph: &Graph, source: NodeId, sink: NodeId) -> Result<Option<Vec<NodeId>>> {
    PathFinder::new(graph).find_path(source, sink)
}

/// 深度优先查找路径
pub fn dfs(graph: &Graph, source: NodeId, sink: NodeId) -> Result<Option<Vec<NodeId>>> {
    PathFinder::new(graph)
        .with_strategy(SearchStrategy::DepthFirst)
        .find_path(source, sink)
}

/// 从终点沿前驱回溯，再反转为源点到终点的顺序
fn reconstruct_path(predecessors: &IndexMap<NodeId, Option<NodeId>>, target: NodeId) -> Vec<NodeId> {
    let mut path = vec![target];
    let mut current = target;
    while let Some(&Some(prev)) = predecessors.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}
