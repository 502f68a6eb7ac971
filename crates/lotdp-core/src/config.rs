//! 排產配置模型

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::{PlanError, Result};

/// 單一產品多期排產參數
///
/// 所有數量與成本皆為整數；負值僅在 [`PlanningConfig::validate`] 時被拒絕，
/// 以便外部載入的資料能回報明確的錯誤而非在解析時失敗。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanningConfig {
    /// 每期最大生產量
    pub production_capacity: i64,

    /// 最大庫存量
    pub store_capacity: i64,

    /// 單位庫存成本（按期初庫存計）
    pub store_cost_per_unit: i64,

    /// 生產準備成本（生產量 > 0 時收取）
    pub setup_cost: i64,

    /// 單位變動生產成本
    pub unit_cost: i64,

    /// 各期需求（按時間順序）
    pub demand: Vec<i64>,
}

impl PlanningConfig {
    /// 創建新的排產配置（成本預設為 0）
    pub fn new(production_capacity: i64, store_capacity: i64, demand: Vec<i64>) -> Self {
        Self {
            production_capacity,
            store_capacity,
            store_cost_per_unit: 0,
            setup_cost: 0,
            unit_cost: 0,
            demand,
        }
    }

    /// 建構器模式：設置生產準備成本
    pub fn with_setup_cost(mut self, cost: i64) -> Self {
        self.setup_cost = cost;
        self
    }

    /// 建構器模式：設置單位庫存成本
    pub fn with_store_cost_per_unit(mut self, cost: i64) -> Self {
        self.store_cost_per_unit = cost;
        self
    }

    /// 建構器模式：設置單位變動成本
    pub fn with_unit_cost(mut self, cost: i64) -> Self {
        self.unit_cost = cost;
        self
    }

    /// 從 JSON 字串載入（`production` / `store` / `request` 格式）並驗證
    pub fn from_json_str(json: &str) -> Result<Self> {
        let document: ConfigDocument = serde_json::from_str(json)?;
        let config = Self::from(document);
        config.validate()?;
        Ok(config)
    }

    /// 從配置檔載入並驗證
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// 驗證配置
    ///
    /// 任何容量或成本為負、需求為空或含負值，或 [`Self::cost_upper_bound`] 溢出時
    /// 回傳 [`PlanError::InvalidConfiguration`]。
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("production_capacity", self.production_capacity),
            ("store_capacity", self.store_capacity),
            ("store_cost_per_unit", self.store_cost_per_unit),
            ("setup_cost", self.setup_cost),
            ("unit_cost", self.unit_cost),
        ];

        for (name, value) in fields {
            if value < 0 {
                return Err(PlanError::InvalidConfiguration(format!(
                    "{} 不可為負值: {}",
                    name, value
                )));
            }
        }

        if self.demand.is_empty() {
            return Err(PlanError::InvalidConfiguration(
                "需求序列不可為空".to_string(),
            ));
        }

        if let Some((period, qty)) = self.demand.iter().enumerate().find(|(_, q)| **q < 0) {
            return Err(PlanError::InvalidConfiguration(format!(
                "第 {} 期需求不可為負值: {}",
                period, qty
            )));
        }

        if self.cost_upper_bound().is_none() {
            return Err(PlanError::InvalidConfiguration(format!(
                "成本上界超出 i64 範圍: {} 期，準備成本 {}，單位庫存成本 {} × 容量 {}，單位成本 {}",
                self.demand.len(),
                self.setup_cost,
                self.store_cost_per_unit,
                self.store_capacity,
                self.unit_cost
            )));
        }

        Ok(())
    }

    /// 任一可行計劃總成本的上界，溢出 `i64` 時回傳 `None`
    ///
    /// 每期至多收取一次準備成本與 `store_capacity` 單位的庫存成本，
    /// 變動成本為 `unit_cost × Σ需求`。通過此檢查後 DP 中的所有中間成本都不會溢出。
    pub fn cost_upper_bound(&self) -> Option<i64> {
        let periods = i64::try_from(self.demand.len()).ok()?;
        let per_period = self
            .store_cost_per_unit
            .checked_mul(self.store_capacity)?
            .checked_add(self.setup_cost)?;
        let chained = per_period.checked_mul(periods)?;

        let total_demand = self
            .demand
            .iter()
            .try_fold(0i64, |acc, &qty| acc.checked_add(qty))?;
        let variable = self.unit_cost.checked_mul(total_demand)?;

        chained.checked_add(variable)
    }

    /// 驗證並計算 DP 表格尺寸
    pub fn dimensions(&self) -> Result<TableDimensions> {
        self.validate()?;

        let to_count = |name: &str, value: i64| -> Result<usize> {
            usize::try_from(value)
                .ok()
                .and_then(|v| v.checked_add(1))
                .ok_or_else(|| {
                    PlanError::InvalidConfiguration(format!("{} 超出可表示範圍: {}", name, value))
                })
        };

        TableDimensions::new(
            self.demand.len(),
            to_count("store_capacity", self.store_capacity)?,
            to_count("production_capacity", self.production_capacity)?,
        )
    }

    /// 期數
    pub fn period_count(&self) -> usize {
        self.demand.len()
    }

    /// 處理序號對應的時間期（處理序號 0 為最後一期）
    pub fn period_of_stage(&self, stage: usize) -> usize {
        self.demand.len() - 1 - stage
    }

    /// 時間期對應的處理序號
    pub fn stage_of_period(&self, period: usize) -> usize {
        self.demand.len() - 1 - period
    }

    /// 處理序號 `stage` 的需求，即 `r[stage]`
    pub fn stage_demand(&self, stage: usize) -> i64 {
        self.demand[self.period_of_stage(stage)]
    }

    /// 總需求
    pub fn total_demand(&self) -> i64 {
        self.demand.iter().sum()
    }
}

impl From<ConfigDocument> for PlanningConfig {
    fn from(doc: ConfigDocument) -> Self {
        Self {
            production_capacity: doc.production.capacity,
            store_capacity: doc.store.capacity,
            store_cost_per_unit: doc.store.cost,
            setup_cost: doc.production.constant_cost,
            unit_cost: doc.production.unit_cost,
            demand: doc.request,
        }
    }
}

/// 配置檔格式
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigDocument {
    pub production: ProductionSection,
    pub store: StoreSection,
    /// 各期需求
    pub request: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductionSection {
    pub capacity: i64,
    /// 生產準備成本
    pub constant_cost: i64,
    #[serde(default)]
    pub unit_cost: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSection {
    pub capacity: i64,
    /// 單位庫存成本
    pub cost: i64,
}

/// DP 表格決策格數上限（每格 16 bytes，約 1 GiB）
pub const MAX_TABLE_CELLS: usize = 1 << 26;

/// DP 表格尺寸
///
/// 只能經由 [`TableDimensions::new`] 或 [`PlanningConfig::dimensions`] 建立，
/// 保證各維度非零且決策格總數不超過 [`MAX_TABLE_CELLS`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableDimensions {
    stage_count: usize,
    state_count: usize,
    decision_count: usize,
}

impl TableDimensions {
    /// 創建表格尺寸
    pub fn new(stage_count: usize, state_count: usize, decision_count: usize) -> Result<Self> {
        if stage_count == 0 || state_count == 0 || decision_count == 0 {
            return Err(PlanError::InvalidConfiguration(format!(
                "DP 表格維度不可為 0: {} 期 × {} 狀態 × {} 決策",
                stage_count, state_count, decision_count
            )));
        }

        let cells = stage_count
            .checked_mul(state_count)
            .and_then(|v| v.checked_mul(decision_count));

        match cells {
            Some(cells) if cells <= MAX_TABLE_CELLS => Ok(Self {
                stage_count,
                state_count,
                decision_count,
            }),
            _ => Err(PlanError::InvalidConfiguration(format!(
                "DP 表格規模過大: {} 期 × {} 狀態 × {} 決策（上限 {} 格）",
                stage_count, state_count, decision_count, MAX_TABLE_CELLS
            ))),
        }
    }

    /// 階段數（= 期數）
    pub fn stage_count(&self) -> usize {
        self.stage_count
    }

    /// 每階段狀態數（= 庫存容量 + 1）
    pub fn state_count(&self) -> usize {
        self.state_count
    }

    /// 每狀態決策數（= 生產容量 + 1）
    pub fn decision_count(&self) -> usize {
        self.decision_count
    }

    /// 決策格總數
    pub fn cell_count(&self) -> usize {
        self.stage_count * self.state_count * self.decision_count
    }
}
