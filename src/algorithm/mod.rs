//! 图算法模块
//!
//! 包含路径搜索、残量网络、最大流、负环检测和最小费用流算法

mod bellman_ford;
mod max_flow;
mod min_cost_flow;
mod path_search;
pub mod residual;

pub use bellman_ford::{
    close_cycle, find_negative_cycle, shortest_paths_or_negative_cycle, BellmanFord, Label,
    ShortestPathTree,
};
pub use max_flow::{max_flow, EdmondsKarp, MaxFlow};
pub use min_cost_flow::{min_cost_flow, CycleCanceling, MinCostFlow, Phase};
pub use path_search::{bfs, dfs, PathFinder, SearchStrategy, SearchTree};
