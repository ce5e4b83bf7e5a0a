//! 最大流算法
//!
//! 实现 Edmonds-Karp 算法（基于 BFS 的 Ford-Fulkerson）。
//! 算法在残量网络的副本上运行，调用方的图不会被修改。
//! 平衡驱动形式通过超级源点和超级汇点把供给/需求转化为单源单汇问题。

use crate::config::FlowOptions;
use crate::error::{Error, Result};
use crate::graph::{Arc, Graph, Node};
use crate::types::{format_path, Amount, NodeId};
use serde::Serialize;
use tracing::{debug, info};

use super::path_search::PathFinder;
use super::residual::{extract_optimal_graph, residual_capacity, send_flow, to_residual};

/// 最大流结果
#[derive(Debug, Clone, Serialize)]
pub struct MaxFlow {
    /// 只含流量弧的图，方向与原图一致
    pub graph: Graph,
    /// 最大流量值
    pub value: Amount,
    /// 源点（平衡驱动形式下为超级源点）
    pub source: NodeId,
    /// 汇点（平衡驱动形式下为超级汇点）
    pub sink: NodeId,
    /// 最小割的源侧节点：最终残量网络中从源点可达的节点
    pub source_side: Vec<NodeId>,
}

impl MaxFlow {
    /// 流量等于容量的弧
    pub fn saturated_arcs(&self) -> Vec<(NodeId, &Arc)> {
        self.graph
            .arcs()
            .filter(|(_, arc)| arc.is_saturated())
            .collect()
    }

    /// 原图中跨越最小割（源侧 -> 汇侧）的弧
    pub fn cut_arcs<'g>(&self, graph: &'g Graph) -> Vec<(NodeId, &'g Arc)> {
        graph
            .arcs()
            .filter(|(tail, arc)| {
                arc.is_forward()
                    && self.source_side.contains(tail)
                    && !self.source_side.contains(&arc.head())
            })
            .collect()
    }

    /// 最小割容量
    pub fn cut_capacity(&self, graph: &Graph) -> Amount {
        self.cut_arcs(graph)
            .iter()
            .map(|(_, arc)| arc.capacity())
            .sum()
    }
}

/// Edmonds-Karp 最大流算法
pub struct EdmondsKarp<'g> {
    graph: &'g Graph,
    options: FlowOptions,
}

impl<'g> EdmondsKarp<'g> {
    /// 创建算法实例
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            options: FlowOptions::default(),
        }
    }

    /// 设置求解选项
    pub fn with_options(mut self, options: FlowOptions) -> Self {
        self.options = options;
        self
    }

    /// 计算从 source 到 sink 的最大流
    pub fn max_flow(&self, source: NodeId, sink: NodeId) -> Result<MaxFlow> {
        self.graph.node(source)?;
        self.graph.node(sink)?;

        let mut working = self.graph.clone();
        working.reset_flow();
        let mut residual = to_residual(&working)?;

        let value = augment(&mut residual, source, sink, &self.options)?;
        let source_side = PathFinder::new(&residual)
            .tree(source)?
            .reachable()
            .collect();
        let graph = extract_optimal_graph(&residual)?;

        info!(%source, %sink, value, "最大流计算完成");
        Ok(MaxFlow {
            graph,
            value,
            source,
            sink,
            source_side,
        })
    }

    /// 按节点平衡计算可行流
    ///
    /// 超级源点连向每个供给节点（容量为供给量），每个需求节点连向超级汇点
    /// （容量为需求量），然后求两者之间的最大流。结果图去掉了超级节点并恢复原平衡。
    pub fn feasible_flow(&self) -> Result<MaxFlow> {
        let mut working = self.graph.clone();
        working.reset_flow();
        let (source, sink) = add_super_terminals(&mut working)?;
        let mut residual = to_residual(&working)?;

        let value = augment(&mut residual, source, sink, &self.options)?;
        let source_side = PathFinder::new(&residual)
            .tree(source)?
            .reachable()
            .filter(|&id| id != source && id != sink)
            .collect();

        let mut graph = extract_optimal_graph(&residual)?;
        remove_super_terminals(&mut graph, (source, sink), self.graph)?;

        info!(value, supply = self.graph.total_supply(), "可行流计算完成");
        Ok(MaxFlow {
            graph,
            value,
            source,
            sink,
            source_side,
        })
    }
}

/// 计算最大流
///
/// 指定 `(source, sink)` 时求直接最大流，否则按节点平衡求可行流。
pub fn max_flow(graph: &Graph, terminals: Option<(NodeId, NodeId)>) -> Result<MaxFlow> {
    let engine = EdmondsKarp::new(graph);
    match terminals {
        Some((source, sink)) => engine.max_flow(source, sink),
        None => engine.feasible_flow(),
    }
}

/// 在残量网络上反复增广，直到汇点不可达，返回增广的总流量
pub(crate) fn augment(
    residual: &mut Graph,
    source: NodeId,
    sink: NodeId,
    options: &FlowOptions,
) -> Result<Amount> {
    let mut value = 0;
    let mut iterations = 0;

    loop {
        let path = PathFinder::new(residual)
            .with_strategy(options.strategy)
            .find_path(source, sink)?;
        let Some(path) = path else { break };
        // 源点即汇点时路径没有弧
        let Some(amount) = residual_capacity(residual, &path)? else {
            break;
        };

        options.checkpoint(iterations)?;
        send_flow(residual, &path, amount)?;
        value += amount;
        iterations += 1;

        debug!(path = %format_path(&path), amount, total = value, "增广路径");
    }

    Ok(value)
}

/// 添加超级源点 `max_id + 1` 和超级汇点 `max_id + 2`，并清零所有节点平衡
///
/// 最大 ID 之后没有两个可用编号时返回 `NodeIdExhausted`。
pub(crate) fn add_super_terminals(graph: &mut Graph) -> Result<(NodeId, NodeId)> {
    let top = graph.max_node_id().map_or(0, NodeId::as_u64);
    let (Some(source), Some(sink)) = (top.checked_add(1), top.checked_add(2)) else {
        return Err(Error::NodeIdExhausted(NodeId(top)));
    };
    let (source, sink) = (NodeId(source), NodeId(sink));

    let balances: Vec<(NodeId, Amount)> = graph
        .nodes()
        .map(|node| (node.id(), node.balance()))
        .collect();

    graph.add_node(Node::new(source, 0))?;
    graph.add_node(Node::new(sink, 0))?;

    for (id, balance) in balances {
        if balance > 0 {
            graph.add_arc(source, Arc::new(id, 0, balance))?;
        } else if balance < 0 {
            graph.add_arc(id, Arc::new(sink, 0, -balance))?;
        }
        graph.set_balance(id, 0)?;
    }

    Ok((source, sink))
}

/// 删除超级源汇点，并从 `original` 恢复节点平衡
pub(crate) fn remove_super_terminals(
    graph: &mut Graph,
    (source, sink): (NodeId, NodeId),
    original: &Graph,
) -> Result<()> {
    graph.remove_node(source)?;
    graph.remove_node(sink)?;
    for node in original.nodes() {
        graph.set_balance(node.id(), node.balance())?;
    }
    Ok(())
}
