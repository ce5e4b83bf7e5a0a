//! 图数据结构
//!
//! 节点按 ID 保存在有序映射中，节点和弧的增删查均为常数时间。
//! `Clone` 即深拷贝：副本与原图的弧实例互相独立。

use super::arc::Arc;
use super::node::Node;
use crate::error::{Error, Result};
use crate::types::{Amount, NodeId};
use indexmap::IndexMap;

/// 有向容量图
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Graph {
    nodes: IndexMap<NodeId, Node>,
}

impl Graph {
    /// 创建空图
    pub fn new() -> Self {
        Self::default()
    }

    // ==================== 节点操作 ====================

    /// 添加节点
    ///
    /// 节点可以携带指向尚未加入的节点的弧，完整性由 [`Graph::check_integrity`] 检查。
    pub fn add_node(&mut self, node: Node) -> Result<()> {
        if self.nodes.contains_key(&node.id()) {
            return Err(Error::DuplicateNode(node.id()));
        }
        self.nodes.insert(node.id(), node);
        Ok(())
    }

    /// 删除节点，同时删除所有指向它的弧
    pub fn remove_node(&mut self, id: NodeId) -> Result<Node> {
        let node = self
            .nodes
            .shift_remove(&id)
            .ok_or(Error::NodeNotFound(id))?;

        for other in self.nodes.values_mut() {
            other.retain_arcs(|arc| arc.head() != id);
        }

        Ok(node)
    }

    /// 获取节点
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or(Error::NodeNotFound(id))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or(Error::NodeNotFound(id))
    }

    pub fn has_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// 所有节点（插入顺序）
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// 节点数量
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 最大节点 ID，空图为 `None`
    pub fn max_node_id(&self) -> Option<NodeId> {
        self.nodes.keys().copied().max()
    }

    /// 设置节点余额
    pub fn set_balance(&mut self, id: NodeId, balance: Amount) -> Result<()> {
        self.node_mut(id)?.set_balance(balance);
        Ok(())
    }

    // ==================== 弧操作 ====================

    /// 添加弧，尾节点和头节点都必须存在
    pub fn add_arc(&mut self, tail: NodeId, arc: Arc) -> Result<()> {
        if !self.has_node(arc.head()) {
            return Err(Error::NodeNotFound(arc.head()));
        }
        self.node_mut(tail)?.add_arc(arc)
    }

    /// 删除正向弧
    pub fn remove_arc(&mut self, tail: NodeId, head: NodeId) -> Result<Arc> {
        self.node_mut(tail)?.remove_arc(head)
    }

    /// 获取正向弧
    pub fn arc(&self, tail: NodeId, head: NodeId) -> Result<&Arc> {
        self.node(tail)?.arc(head)
    }

    /// 获取正向弧（可变）
    pub fn arc_mut(&mut self, tail: NodeId, head: NodeId) -> Result<&mut Arc> {
        self.node_mut(tail)?.arc_mut(head)
    }

    /// 弧总数（包括反向弧）
    pub fn arc_count(&self) -> usize {
        self.nodes.values().map(Node::len).sum()
    }

    /// 遍历所有弧，返回 `(tail, arc)`
    pub fn arcs(&self) -> impl Iterator<Item = (NodeId, &Arc)> {
        self.nodes
            .values()
            .flat_map(|node| node.arcs().map(move |arc| (node.id(), arc)))
    }

    /// 按条件保留所有节点上的弧
    pub(crate) fn retain_arcs<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Arc) -> bool,
    {
        for node in self.nodes.values_mut() {
            node.retain_arcs(&mut keep);
        }
    }

    /// 清空流量并删除所有反向弧
    pub fn reset_flow(&mut self) {
        for node in self.nodes.values_mut() {
            node.retain_arcs(Arc::is_forward);
            for arc in node.arcs_mut() {
                arc.set_flow(0);
            }
        }
    }

    // ==================== 完整性 ====================

    /// 检查所有弧的头节点都存在
    pub fn check_integrity(&self) -> bool {
        self.validate().is_ok()
    }

    /// 同 [`Graph::check_integrity`]，返回第一条悬空弧
    pub fn validate(&self) -> Result<()> {
        for (tail, arc) in self.arcs() {
            if !self.has_node(arc.head()) {
                return Err(Error::IntegrityError {
                    tail,
                    head: arc.head(),
                });
            }
        }
        Ok(())
    }

    // ==================== 流量统计 ====================

    /// 总供给（正余额之和）
    pub fn total_supply(&self) -> Amount {
        self.nodes.values().map(|n| n.balance().max(0)).sum()
    }

    /// 正向弧上的总费用 `Σ cost × flow`
    pub fn total_cost(&self) -> Amount {
        self.arcs()
            .filter(|(_, arc)| arc.is_forward())
            .map(|(_, arc)| arc.cost() * arc.flow())
            .sum()
    }

    /// 节点的流出量（正向弧）
    pub fn outflow(&self, id: NodeId) -> Result<Amount> {
        Ok(self
            .node(id)?
            .arcs()
            .filter(|arc| arc.is_forward())
            .map(Arc::flow)
            .sum())
    }

    /// 节点的流入量（正向弧）
    pub fn inflow(&self, id: NodeId) -> Result<Amount> {
        if !self.has_node(id) {
            return Err(Error::NodeNotFound(id));
        }
        Ok(self
            .arcs()
            .filter(|(_, arc)| arc.is_forward() && arc.head() == id)
            .map(|(_, arc)| arc.flow())
            .sum())
    }
}
