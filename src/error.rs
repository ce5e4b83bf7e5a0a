//! 错误类型定义

use crate::types::{Amount, NodeId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("节点已存在: {0}")]
    DuplicateNode(NodeId),

    #[error("节点不存在: {0}")]
    NodeNotFound(NodeId),

    #[error("弧已存在: {tail} -> {head}")]
    DuplicateArc { tail: NodeId, head: NodeId },

    #[error("弧不存在: {tail} -> {head}")]
    ArcNotFound { tail: NodeId, head: NodeId },

    #[error("图完整性校验失败: 弧 {tail} -> {head} 指向不存在的节点")]
    IntegrityError { tail: NodeId, head: NodeId },

    #[error("无效的容量: 弧 {tail} -> {head} 的容量为 {capacity}")]
    InvalidCapacity {
        tail: NodeId,
        head: NodeId,
        capacity: Amount,
    },

    #[error("剩余容量不足: 弧 {tail} -> {head} 需要 {requested}, 可用 {available}")]
    InsufficientCapacity {
        tail: NodeId,
        head: NodeId,
        requested: Amount,
        available: Amount,
    },

    #[error("节点 ID 已耗尽: 无法在 {0} 之后分配超级源汇点")]
    NodeIdExhausted(NodeId),

    #[error("迭代次数超过上限: {0}")]
    IterationLimit(usize),

    #[error("计算已取消")]
    Cancelled,

    #[error("序列化错误: {0}")]
    Json(#[from] serde_json::Error),
}
