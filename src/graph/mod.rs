//! 图核心模块
//!
//! 定义节点、弧和图的核心数据结构

mod arc;
mod graph;
mod node;

pub use arc::{Arc, ArcKey, Orientation};
pub use graph::Graph;
pub use node::Node;
