//! # Lot-sizing DP Core
//!
//! 核心資料模型與類型定義

pub mod config;
pub mod plan;
pub mod stage;

// Re-export 主要類型
pub use config::{ConfigDocument, PlanningConfig, TableDimensions, MAX_TABLE_CELLS};
pub use plan::{PeriodRecord, PlanViolation, ProductionPlan};
pub use stage::{StageSlot, StageTable, StageView, StateCell};

/// 排產錯誤類型
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error("無效的配置: {0}")]
    InvalidConfiguration(String),

    #[error("無可行解: 第 {period} 期（攜入庫存 {inventory}）沒有可行的生產決策")]
    NoSolution { period: usize, inventory: usize },

    #[error("配置解析錯誤: {0}")]
    ConfigParse(String),

    #[error("讀取配置檔失敗: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for PlanError {
    fn from(err: serde_json::Error) -> Self {
        PlanError::ConfigParse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PlanError>;
