//! # lotdp
//!
//! 容量受限排產 DP 的命令列介面：參數解析與執行流程、日誌初始化、表格輸出

pub mod cli;
pub mod logging;
pub mod render;

pub use lotdp_calc::{PlanReconstructor, PlanningResult, ProductionPlanner, StageBuilder};
pub use lotdp_core::{PlanError, PlanningConfig, ProductionPlan, StageTable};
