//! 残量网络
//!
//! 所有弧都以"容量 + 流量"表示，剩余容量按需推导：
//! 正向弧为 `capacity - flow`，反向弧为 `flow`。
//! 残量网络中只保留剩余容量为正的弧，因此可达性即可增广性。
//!
//! 每条正向弧 `u -> v` 与反向弧 `v -> u` 成对出现，二者记录相同的流量：
//! 正向弧在 `flow < capacity` 时存在，反向弧在 `flow > 0` 时存在。

use crate::error::{Error, Result};
use crate::graph::{Arc, ArcKey, Graph, Node, Orientation};
use crate::types::{Amount, NodeId};
use tracing::trace;

/// 把流量图转换为残量网络
///
/// 为每条有流量的正向弧补上反向弧（费用取反，容量和流量相同），
/// 并删除剩余容量为 0 的弧。
pub fn to_residual(graph: &Graph) -> Result<Graph> {
    let mut residual = graph.clone();

    let twins: Vec<(NodeId, Arc)> = graph
        .arcs()
        .filter(|(_, arc)| arc.is_forward() && arc.flow() > 0)
        .map(|(tail, arc)| (arc.head(), twin_of(tail, arc, arc.flow())))
        .collect();

    residual.retain_arcs(|arc| !arc.is_saturated());

    for (head, twin) in twins {
        residual.node_mut(head)?.put_arc(twin);
    }

    Ok(residual)
}

/// 路径的剩余容量：各步剩余容量的最小值
///
/// 没有弧的路径（单个节点）返回 `None`，即不受限。
pub fn residual_capacity(graph: &Graph, path: &[NodeId]) -> Result<Option<Amount>> {
    let mut bottleneck: Option<Amount> = None;
    for step in path.windows(2) {
        let residual = step_arc(graph, step[0], step[1])?.residual_capacity();
        bottleneck = Some(bottleneck.map_or(residual, |b| b.min(residual)));
    }
    Ok(bottleneck)
}

/// 沿路径推送 `amount` 单位流量
///
/// 推送前先校验每一步的剩余容量，失败时图保持不变。
/// 非正的 `amount` 不做任何修改。
pub fn send_flow(graph: &mut Graph, path: &[NodeId], amount: Amount) -> Result<()> {
    if amount <= 0 {
        return Ok(());
    }

    let mut steps: Vec<(NodeId, ArcKey)> = Vec::with_capacity(path.len().saturating_sub(1));
    for step in path.windows(2) {
        let (tail, head) = (step[0], step[1]);
        let arc = step_arc(graph, tail, head)?;
        if arc.residual_capacity() < amount {
            return Err(Error::InsufficientCapacity {
                tail,
                head,
                requested: amount,
                available: arc.residual_capacity(),
            });
        }
        steps.push((tail, arc.key()));
    }

    for (tail, key) in steps {
        push(graph, tail, key, amount)?;
    }
    Ok(())
}

/// 在单条弧上推送流量并维护成对的另一侧弧
///
/// 正向弧：流量增加，占满时删除；反向弧 `head -> tail` 不存在则创建（费用取反），
/// 存在则同步流量。反向弧：可撤销流量减少，降为 0 时删除；对应正向弧同理重建或更新。
pub fn push(graph: &mut Graph, tail: NodeId, key: ArcKey, amount: Amount) -> Result<()> {
    let (head, orientation) = key;
    if !graph.has_node(head) {
        return Err(Error::NodeNotFound(head));
    }
    if amount <= 0 {
        return Ok(());
    }

    let (flow, twin) = {
        let node = graph.node_mut(tail)?;
        let arc = node
            .arc_with_mut(key)
            .ok_or(Error::ArcNotFound { tail, head })?;

        let available = arc.residual_capacity();
        if amount > available {
            return Err(Error::InsufficientCapacity {
                tail,
                head,
                requested: amount,
                available,
            });
        }

        let flow = match orientation {
            Orientation::Forward => arc.flow() + amount,
            Orientation::Backward => arc.flow() - amount,
        };
        arc.set_flow(flow);
        let twin = twin_of(tail, arc, flow);

        if arc.is_saturated() {
            node.take_arc(key);
        }
        (flow, twin)
    };

    let head_node = graph.node_mut(head)?;
    match head_node.arc_with_mut(twin.key()) {
        Some(existing) => existing.set_flow(flow),
        None => head_node.put_arc(twin),
    }

    trace!(%tail, %head, ?orientation, amount, flow, "推送流量");
    Ok(())
}

/// 从残量网络提取只含流量的最优图
///
/// 每条反向弧 `x -> y` 对应原图中承载流量的弧 `y -> x`，
/// 输出弧方向为 `y -> x`，费用还原，容量和流量照抄。正向残量弧被丢弃。
pub fn extract_optimal_graph(residual: &Graph) -> Result<Graph> {
    let mut optimal = Graph::new();
    for node in residual.nodes() {
        optimal.add_node(Node::new(node.id(), node.balance()))?;
    }

    for (tail, arc) in residual.arcs() {
        if arc.orientation() == Orientation::Backward {
            let flow_arc = Arc::new(tail, -arc.cost(), arc.capacity()).with_flow(arc.flow());
            optimal.add_arc(arc.head(), flow_arc)?;
        }
    }

    Ok(optimal)
}

/// 路径上 `tail -> head` 一步实际使用的弧：费用最低的一条（相同时优先正向）
fn step_arc(graph: &Graph, tail: NodeId, head: NodeId) -> Result<&Arc> {
    graph
        .node(tail)?
        .arcs_to(head)
        .min_by_key(|arc| arc.cost())
        .ok_or(Error::ArcNotFound { tail, head })
}

/// 构造 `arc`（尾节点为 `tail`）成对的另一侧弧
fn twin_of(tail: NodeId, arc: &Arc, flow: Amount) -> Arc {
    match arc.orientation() {
        Orientation::Forward => Arc::backward(tail, -arc.cost(), arc.capacity(), flow),
        Orientation::Backward => Arc::new(tail, -arc.cost(), arc.capacity()).with_flow(flow),
    }
}
