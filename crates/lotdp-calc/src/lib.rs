//! # Lot-sizing DP Engine
//!
//! 容量受限的多期排產動態規劃引擎

pub mod builder;
pub mod planner;
pub mod reconstruct;

// Re-export 主要類型
pub use builder::StageBuilder;
pub use planner::ProductionPlanner;
pub use reconstruct::PlanReconstructor;

/// 排產計算結果
#[derive(Debug, Clone)]
pub struct PlanningResult {
    /// 完整的 DP 階段表
    pub table: lotdp_core::StageTable,

    /// 最優生產計劃
    pub plan: lotdp_core::ProductionPlan,

    /// 計算耗時（毫秒）
    pub calculation_time_ms: Option<u128>,
}
