//! 通用类型定义

use serde::{Deserialize, Serialize};
use std::fmt;

/// 数量类型（余额、费用、容量、流量）
///
/// 使用整数保证消圈算法在有限步内终止。
pub type Amount = i64;

/// 节点 ID（图内唯一的正整数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 把节点 ID 序列格式化为 `1 -> 2 -> 3`，用于日志输出
pub(crate) fn format_path(path: &[NodeId]) -> String {
    path.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
