//! 节点定义
//!
//! 节点持有全部出弧，按插入顺序保存，增删查均为常数时间。

use super::arc::{Arc, ArcKey, Orientation};
use crate::error::{Error, Result};
use crate::types::{Amount, NodeId};
use indexmap::IndexMap;

/// 节点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// 节点 ID
    id: NodeId,
    /// 余额：正数为供给，负数为需求
    balance: Amount,
    /// 出弧（键为头节点 + 方向）
    arcs: IndexMap<ArcKey, Arc>,
}

impl Node {
    /// 创建没有出弧的节点
    pub fn new(id: NodeId, balance: Amount) -> Self {
        Self {
            id,
            balance,
            arcs: IndexMap::new(),
        }
    }

    /// 以构建器方式添加出弧
    pub fn with_arc(mut self, arc: Arc) -> Result<Self> {
        self.add_arc(arc)?;
        Ok(self)
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    pub fn set_balance(&mut self, balance: Amount) {
        self.balance = balance;
    }

    /// 添加出弧
    pub fn add_arc(&mut self, arc: Arc) -> Result<()> {
        if arc.capacity() < 0 {
            return Err(Error::InvalidCapacity {
                tail: self.id,
                head: arc.head(),
                capacity: arc.capacity(),
            });
        }
        if self.arcs.contains_key(&arc.key()) {
            return Err(Error::DuplicateArc {
                tail: self.id,
                head: arc.head(),
            });
        }
        self.arcs.insert(arc.key(), arc);
        Ok(())
    }

    /// 移除指向 `head` 的正向弧
    pub fn remove_arc(&mut self, head: NodeId) -> Result<Arc> {
        self.arcs
            .shift_remove(&(head, Orientation::Forward))
            .ok_or(Error::ArcNotFound {
                tail: self.id,
                head,
            })
    }

    /// 获取指向 `head` 的正向弧
    pub fn arc(&self, head: NodeId) -> Result<&Arc> {
        self.arcs
            .get(&(head, Orientation::Forward))
            .ok_or(Error::ArcNotFound {
                tail: self.id,
                head,
            })
    }

    /// 获取指向 `head` 的正向弧（可变）
    pub fn arc_mut(&mut self, head: NodeId) -> Result<&mut Arc> {
        let tail = self.id;
        self.arcs
            .get_mut(&(head, Orientation::Forward))
            .ok_or(Error::ArcNotFound { tail, head })
    }

    /// 是否存在指向 `head` 的正向弧
    pub fn has_arc(&self, head: NodeId) -> bool {
        self.arcs.contains_key(&(head, Orientation::Forward))
    }

    /// 是否存在指向 `head` 的任意方向的弧
    pub fn has_arc_to(&self, head: NodeId) -> bool {
        self.has_arc(head) || self.arcs.contains_key(&(head, Orientation::Backward))
    }

    /// 按键获取弧
    pub fn arc_with(&self, key: ArcKey) -> Option<&Arc> {
        self.arcs.get(&key)
    }

    pub(crate) fn arc_with_mut(&mut self, key: ArcKey) -> Option<&mut Arc> {
        self.arcs.get_mut(&key)
    }

    /// 插入或覆盖弧，不做重复检查
    pub(crate) fn put_arc(&mut self, arc: Arc) {
        self.arcs.insert(arc.key(), arc);
    }

    pub(crate) fn take_arc(&mut self, key: ArcKey) -> Option<Arc> {
        self.arcs.shift_remove(&key)
    }

    pub(crate) fn retain_arcs<F>(&mut self, mut keep: F)
    where
        F: FnMut(&Arc) -> bool,
    {
        self.arcs.retain(|_, arc| keep(arc));
    }

    pub(crate) fn arcs_mut(&mut self) -> impl Iterator<Item = &mut Arc> {
        self.arcs.values_mut()
    }

    /// 所有出弧（插入顺序）
    pub fn arcs(&self) -> impl Iterator<Item = &Arc> {
        self.arcs.values()
    }

    /// 指向 `head` 的所有弧（至多一条正向、一条反向）
    pub fn arcs_to(&self, head: NodeId) -> impl Iterator<Item = &Arc> {
        [Orientation::Forward, Orientation::Backward]
            .into_iter()
            .filter_map(move |o| self.arcs.get(&(head, o)))
    }

    /// 出弧数量
    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_arcs() {
        let mut node = Node::new(NodeId(1), 2);
        node.add_arc(Arc::new(NodeId(2), 5, 10)).unwrap();

        assert_eq!(node.len(), 1);
        assert_eq!(node.arc(NodeId(2)).unwrap().cost(), 5);

        node.arc_mut(NodeId(2)).unwrap().set_cost(10);
        assert_eq!(node.arc(NodeId(2)).unwrap().cost(), 10);

        node.remove_arc(NodeId(2)).unwrap();
        assert!(node.is_empty());
        assert!(matches!(
            node.arc(NodeId(2)),
            Err(Error::ArcNotFound { .. })
        ));
        assert!(matches!(
            node.remove_arc(NodeId(2)),
            Err(Error::ArcNotFound { .. })
        ));
    }

    #[test]
    fn test_duplicate_arc() {
        let mut node = Node::new(NodeId(2), 3);
        node.add_arc(Arc::new(NodeId(1), 3, 14)).unwrap();

        let err = node.add_arc(Arc::new(NodeId(1), 1, 1)).unwrap_err();
        assert!(matches!(
            err,
            Error::DuplicateArc { tail, head } if tail == NodeId(2) && head == NodeId(1)
        ));
    }

    #[test]
    fn test_negative_capacity_rejected() {
        let mut node = Node::new(NodeId(1), 0);
        let err = node.add_arc(Arc::new(NodeId(2), 0, -1)).unwrap_err();
        assert!(matches!(err, Error::InvalidCapacity { capacity: -1, .. }));
    }

    #[test]
    fn test_forward_and_backward_coexist() {
        let mut node = Node::new(NodeId(1), 0);
        node.add_arc(Arc::new(NodeId(2), 4, 5)).unwrap();
        node.put_arc(Arc::backward(NodeId(2), -1, 3, 2));

        assert_eq!(node.len(), 2);
        assert!(node.has_arc(NodeId(2)));
        assert!(node.has_arc_to(NodeId(2)));
        assert_eq!(node.arcs_to(NodeId(2)).count(), 2);
        assert_eq!(node.arc(NodeId(2)).unwrap().cost(), 4);
    }

    #[test]
    fn test_arc_order_is_insertion_order() {
        let node = Node::new(NodeId(1), 0)
            .with_arc(Arc::new(NodeId(5), 0, 1))
            .unwrap()
            .with_arc(Arc::new(NodeId(3), 0, 1))
            .unwrap()
            .with_arc(Arc::new(NodeId(4), 0, 1))
            .unwrap();

        let heads: Vec<_> = node.arcs().map(|a| a.head().as_u64()).collect();
        assert_eq!(heads, vec![5, 3, 4]);
    }
}
