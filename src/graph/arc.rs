//! 弧定义
//!
//! 弧由尾节点独占持有，只记录头节点 ID。

use crate::types::{Amount, NodeId};
use serde::{Deserialize, Serialize};

/// 弧的方向
///
/// 用显式标记区分原始弧和残量网络中的反向弧，
/// 不依赖费用的符号（包括 `-0`）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Orientation {
    /// 与图描述一致的方向，承载流量
    Forward,
    /// 残量网络中用于撤销流量的反向弧，对应的正向弧是 `head -> tail`
    Backward,
}

impl Orientation {
    /// 成对弧的另一侧方向
    pub fn reverse(self) -> Self {
        match self {
            Orientation::Forward => Orientation::Backward,
            Orientation::Backward => Orientation::Forward,
        }
    }
}

/// 弧在尾节点中的键：头节点 + 方向
pub type ArcKey = (NodeId, Orientation);

/// 弧
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Arc {
    /// 头节点 ID
    head: NodeId,
    /// 单位流量费用
    cost: Amount,
    /// 容量上限
    capacity: Amount,
    /// 对应正向弧上的流量
    flow: Amount,
    /// 方向
    orientation: Orientation,
}

impl Arc {
    /// 创建新的正向弧（流量为 0）
    pub fn new(head: NodeId, cost: Amount, capacity: Amount) -> Self {
        Self {
            head,
            cost,
            capacity,
            flow: 0,
            orientation: Orientation::Forward,
        }
    }

    /// 设置初始流量
    pub fn with_flow(mut self, flow: Amount) -> Self {
        self.flow = flow;
        self
    }

    /// 创建反向弧
    pub(crate) fn backward(head: NodeId, cost: Amount, capacity: Amount, flow: Amount) -> Self {
        Self {
            head,
            cost,
            capacity,
            flow,
            orientation: Orientation::Backward,
        }
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn cost(&self) -> Amount {
        self.cost
    }

    pub fn capacity(&self) -> Amount {
        self.capacity
    }

    pub fn flow(&self) -> Amount {
        self.flow
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn is_forward(&self) -> bool {
        self.orientation == Orientation::Forward
    }

    pub fn key(&self) -> ArcKey {
        (self.head, self.orientation)
    }

    pub fn set_cost(&mut self, cost: Amount) {
        self.cost = cost;
    }

    pub fn set_capacity(&mut self, capacity: Amount) {
        self.capacity = capacity;
    }

    pub fn set_flow(&mut self, flow: Amount) {
        self.flow = flow;
    }

    /// 剩余容量
    ///
    /// 正向弧为 `capacity - flow`，反向弧为可撤销的 `flow`。
    pub fn residual_capacity(&self) -> Amount {
        match self.orientation {
            Orientation::Forward => self.capacity - self.flow,
            Orientation::Backward => self.flow,
        }
    }

    /// 流量已占满（正向）或已无可撤销流量（反向）
    pub fn is_saturated(&self) -> bool {
        self.residual_capacity() <= 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_residual() {
        let arc = Arc::new(NodeId(2), 3, 10).with_flow(4);

        assert!(arc.is_forward());
        assert_eq!(arc.key(), (NodeId(2), Orientation::Forward));
        assert_eq!(arc.residual_capacity(), 6);
        assert!(!arc.is_saturated());
    }

    #[test]
    fn test_backward_residual() {
        let arc = Arc::backward(NodeId(1), -3, 10, 4);

        assert_eq!(arc.orientation(), Orientation::Backward);
        assert_eq!(arc.residual_capacity(), 4);

        let empty = Arc::backward(NodeId(1), -3, 10, 0);
        assert!(empty.is_saturated());
    }

    #[test]
    fn test_orientation_reverse() {
        assert_eq!(Orientation::Forward.reverse(), Orientation::Backward);
        assert_eq!(Orientation::Backward.reverse(), Orientation::Forward);
    }
}
