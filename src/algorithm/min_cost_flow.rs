//! 最小费用流算法（消圈法）
//!
//! 先用 Edmonds-Karp 在超级源汇之间求可行流，然后反复在残量网络中
//! 寻找负环并沿环推送瓶颈流量，直到不存在负环。费用为整数时每次消圈
//! 总费用至少下降 1，因此算法必然终止。

use crate::config::FlowOptions;
use crate::error::Result;
use crate::graph::Graph;
use crate::types::{format_path, Amount, NodeId};
use serde::Serialize;
use tracing::{debug, info, trace, warn};

use super::bellman_ford::{close_cycle, find_negative_cycle};
use super::max_flow::{add_super_terminals, augment, remove_super_terminals};
use super::residual::{extract_optimal_graph, residual_capacity, send_flow, to_residual};

/// 求解阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// 在超级源汇之间求可行流
    Feasibility,
    /// 在残量网络中查找负环
    CycleDetection,
    /// 沿负环推送瓶颈流量
    Cancel,
    /// 提取最优图
    Done,
}

/// 最小费用流结果
#[derive(Debug, Clone, Serialize)]
pub struct MinCostFlow {
    /// 只含流量弧的最优图，节点平衡与输入一致
    pub graph: Graph,
    /// 从供给节点送出的总流量
    pub flow: Amount,
    /// 总费用 `Σ cost × flow`
    pub cost: Amount,
    /// 总供给量
    pub supply: Amount,
    /// 消去的负环数
    pub cycles_canceled: usize,
}

impl MinCostFlow {
    /// 供给是否全部送达
    pub fn is_feasible(&self) -> bool {
        self.flow == self.supply
    }
}

/// 求解过程中的工作状态
struct State {
    residual: Graph,
    terminals: (NodeId, NodeId),
    flow: Amount,
    cycles_canceled: usize,
    cycle: Vec<NodeId>,
}

/// 消圈法最小费用流
pub struct CycleCanceling<'g> {
    graph: &'g Graph,
    options: FlowOptions,
}

impl<'g> CycleCanceling<'g> {
    pub fn new(graph: &'g Graph) -> Self {
        Self {
            graph,
            options: FlowOptions::default(),
        }
    }

    /// 设置求解选项
    pub fn with_options(mut self, options: FlowOptions) -> Self {
        self.options = options;
        self
    }

    /// 运行算法
    pub fn run(&self) -> Result<MinCostFlow> {
        let mut working = self.graph.clone();
        working.reset_flow();
        let terminals = add_super_terminals(&mut working)?;

        let mut state = State {
            residual: to_residual(&working)?,
            terminals,
            flow: 0,
            cycles_canceled: 0,
            cycle: Vec::new(),
        };

        let mut phase = Phase::Feasibility;
        while phase != Phase::Done {
            let next = self.step(phase, &mut state)?;
            trace!(from = ?phase, to = ?next, "阶段切换");
            phase = next;
        }

        self.finish(state)
    }

    fn step(&self, phase: Phase, state: &mut State) -> Result<Phase> {
        match phase {
            Phase::Feasibility => {
                let (source, sink) = state.terminals;
                state.flow = augment(&mut state.residual, source, sink, &self.options)?;

                let supply = self.graph.total_supply();
                if state.flow < supply {
                    warn!(flow = state.flow, supply, "供给无法全部送达");
                }
                Ok(Phase::CycleDetection)
            }
            Phase::CycleDetection => match find_negative_cycle(&state.residual) {
                Some(cycle) => {
                    state.cycle = close_cycle(&cycle);
                    Ok(Phase::Cancel)
                }
                None => Ok(Phase::Done),
            },
            Phase::Cancel => {
                self.options.checkpoint(state.cycles_canceled)?;

                let amount = residual_capacity(&state.residual, &state.cycle)?.unwrap_or(0);
                send_flow(&mut state.residual, &state.cycle, amount)?;
                state.cycles_canceled += 1;

                debug!(cycle = %format_path(&state.cycle), amount, "消去负环");
                Ok(Phase::CycleDetection)
            }
            Phase::Done => Ok(Phase::Done),
        }
    }

    fn finish(&self, state: State) -> Result<MinCostFlow> {
        let mut graph = extract_optimal_graph(&state.residual)?;
        remove_super_terminals(&mut graph, state.terminals, self.graph)?;

        let result = MinCostFlow {
            cost: graph.total_cost(),
            graph,
            flow: state.flow,
            supply: self.graph.total_supply(),
            cycles_canceled: state.cycles_canceled,
        };

        info!(
            flow = result.flow,
            cost = result.cost,
            cycles = result.cycles_canceled,
            "最小费用流计算完成"
        );
        Ok(result)
    }
}

/// 按节点平衡计算最小费用流
pub fn min_cost_flow(graph: &Graph) -> Result<MinCostFlow> {
    CycleCanceling::new(graph).run()
}
