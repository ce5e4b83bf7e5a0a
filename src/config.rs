//! 求解配置
//!
//! 控制增广路径的搜索策略、迭代上限和取消标记。

use crate::algorithm::SearchStrategy;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// 取消标记
///
/// 由调用方持有，在增广或消圈的迭代之间检查。
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// 请求取消
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 求解选项
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowOptions {
    /// 增广路径搜索策略，BFS 即 Edmonds-Karp
    pub strategy: SearchStrategy,
    /// 单个阶段允许的最大迭代次数（增广或消圈）
    pub max_iterations: Option<usize>,
    /// 取消标记
    #[serde(skip)]
    pub cancel: Option<CancelToken>,
}

impl FlowOptions {
    /// 设置搜索策略
    pub fn with_strategy(mut self, strategy: SearchStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// 设置迭代上限
    pub fn with_max_iterations(mut self, limit: usize) -> Self {
        self.max_iterations = Some(limit);
        self
    }

    /// 设置取消标记
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// 从 JSON 字符串解析
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// 迭代检查点：`completed` 为已完成的迭代次数
    pub(crate) fn checkpoint(&self, completed: usize) -> Result<()> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            return Err(Error::Cancelled);
        }
        match self.max_iterations {
            Some(limit) if completed >= limit => Err(Error::IterationLimit(limit)),
            _ => Ok(()),
        }
    }
}
