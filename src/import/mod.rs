//! 图描述的导入与导出
//!
//! 图以纯数据描述：节点列表，每个节点带有平衡和出弧列表。
//! JSON 格式示例：
//!
//! ```json
//! [
//!   { "id": 1, "balance": 10, "arcs": [{ "head": 2, "cost": 2, "capacity": 10 }] },
//!   { "id": 2, "balance": -10 }
//! ]
//! ```

use crate::error::{Error, Result};
use crate::graph::{Arc, Graph, Node};
use crate::types::{Amount, NodeId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

/// 节点描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeData {
    pub id: NodeId,
    #[serde(default)]
    pub balance: Amount,
    #[serde(default)]
    pub arcs: Vec<ArcData>,
}

/// 弧描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArcData {
    pub head: NodeId,
    pub cost: Amount,
    pub capacity: Amount,
    #[serde(default)]
    pub flow: Amount,
}

impl From<&Arc> for ArcData {
    fn from(arc: &Arc) -> Self {
        Self {
            head: arc.head(),
            cost: arc.cost(),
            capacity: arc.capacity(),
            flow: arc.flow(),
        }
    }
}

/// 从描述构建图
///
/// 先声明全部节点再添加弧，因此弧可以指向列表中靠后的节点；
/// 指向未声明节点的弧返回 `IntegrityError`。
pub fn build_graph(data: &[NodeData]) -> Result<Graph> {
    let mut graph = Graph::new();
    for node in data {
        graph.add_node(Node::new(node.id, node.balance))?;
    }

    for node in data {
        for arc in &node.arcs {
            if !graph.has_node(arc.head) {
                return Err(Error::IntegrityError {
                    tail: node.id,
                    head: arc.head,
                });
            }
            graph.add_arc(
                node.id,
                Arc::new(arc.head, arc.cost, arc.capacity).with_flow(arc.flow),
            )?;
        }
    }

    debug!(nodes = graph.len(), arcs = graph.arc_count(), "图构建完成");
    Ok(graph)
}

impl Graph {
    /// 导出为描述数据（只包含正向弧）
    pub fn to_data(&self) -> Vec<NodeData> {
        self.nodes()
            .map(|node| NodeData {
                id: node.id(),
                balance: node.balance(),
                arcs: node
                    .arcs()
                    .filter(|arc| arc.is_forward())
                    .map(ArcData::from)
                    .collect(),
            })
            .collect()
    }

    /// 从 JSON 描述构建图
    pub fn from_json(json: &str) -> Result<Self> {
        let data: Vec<NodeData> = serde_json::from_str(json)?;
        build_graph(&data)
    }

    /// 导出为 JSON 描述
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_data())?)
    }
}

impl Serialize for Graph {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_data().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Graph {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let data = Vec::<NodeData>::deserialize(deserializer)?;
        build_graph(&data).map_err(serde::de::Error::custom)
    }
}
