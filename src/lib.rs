//! FlowGraph - 有向容量图上的网络流算法
//!
//! 在带节点平衡（正为供给，负为需求）的有向容量图上计算：
//! - 最大流（Edmonds-Karp）与最小割
//! - 可行流（超级源点/超级汇点）
//! - 负环检测（Bellman-Ford）
//! - 最小费用流（消圈法）
//!
//! ```
//! use flowgraph::{min_cost_flow, Graph};
//!
//! let graph = Graph::from_json(r#"[
//!     { "id": 1, "balance": 10, "arcs": [{ "head": 2, "cost": 2, "capacity": 10 }] },
//!     { "id": 2, "balance": -10 }
//! ]"#).unwrap();
//!
//! let result = min_cost_flow(&graph).unwrap();
//! assert_eq!(result.flow, 10);
//! assert_eq!(result.cost, 20);
//! ```

pub mod algorithm;
pub mod config;
pub mod error;
pub mod graph;
pub mod import;
pub mod types;

// 重导出常用类型
pub use algorithm::{
    bfs, dfs, find_negative_cycle, max_flow, min_cost_flow, shortest_paths_or_negative_cycle,
    BellmanFord, CycleCanceling, EdmondsKarp, MaxFlow, MinCostFlow, PathFinder, SearchStrategy,
};
pub use config::{CancelToken, FlowOptions};
pub use error::{Error, Result};
pub use graph::{Arc, Graph, Node, Orientation};
pub use import::{build_graph, ArcData, NodeData};
pub use types::{Amount, NodeId};

/// 库版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
