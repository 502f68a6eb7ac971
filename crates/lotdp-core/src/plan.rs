//! 生產計劃模型

use serde::{Deserialize, Serialize};

use crate::PlanningConfig;

/// 生產計劃（DP 重建結果）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionPlan {
    /// 各期生產量（按時間順序）
    pub quantities: Vec<i64>,

    /// 準備成本 + 庫存成本（沿階段鏈累積的最優成本）
    pub chained_cost: i64,

    /// 變動生產成本
    pub variable_cost: i64,

    /// 總成本
    pub total_cost: i64,
}

impl ProductionPlan {
    /// 創建新的生產計劃
    pub fn new(quantities: Vec<i64>, chained_cost: i64, variable_cost: i64) -> Self {
        Self {
            quantities,
            chained_cost,
            variable_cost,
            total_cost: variable_cost + chained_cost,
        }
    }

    /// 期數
    pub fn period_count(&self) -> usize {
        self.quantities.len()
    }

    /// 總生產量
    pub fn total_production(&self) -> i64 {
        self.quantities.iter().sum()
    }

    /// 生產批次數（生產量 > 0 的期數）
    pub fn setup_count(&self) -> usize {
        self.quantities.iter().filter(|&&q| q > 0).count()
    }

    /// 按時間順序重播計劃，計算各期期初/期末庫存
    pub fn replay(&self, config: &PlanningConfig) -> Vec<PeriodRecord> {
        let mut opening = 0;

        self.quantities
            .iter()
            .zip(config.demand.iter())
            .enumerate()
            .map(|(period, (&production, &demand))| {
                let closing = opening + production - demand;
                let record = PeriodRecord {
                    period,
                    opening_inventory: opening,
                    production,
                    demand,
                    closing_inventory: closing,
                };
                opening = closing;
                record
            })
            .collect()
    }

    /// 依配置重新計算總成本
    ///
    /// 每期收取準備成本（生產量 > 0）、期初庫存的庫存成本與變動成本。
    pub fn replay_cost(&self, config: &PlanningConfig) -> i64 {
        self.replay(config)
            .iter()
            .map(|r| {
                let setup = if r.production > 0 { config.setup_cost } else { 0 };
                setup
                    + config.store_cost_per_unit * r.opening_inventory
                    + config.unit_cost * r.production
            })
            .sum()
    }

    /// 檢查計劃是否違反任何約束
    pub fn violations(&self, config: &PlanningConfig) -> Vec<PlanViolation> {
        let mut violations = Vec::new();

        if self.quantities.len() != config.demand.len() {
            violations.push(PlanViolation::PeriodCountMismatch {
                expected: config.demand.len(),
                actual: self.quantities.len(),
            });
            return violations;
        }

        let records = self.replay(config);
        for r in &records {
            if r.production < 0 || r.production > config.production_capacity {
                violations.push(PlanViolation::ProductionOutOfRange {
                    period: r.period,
                    quantity: r.production,
                });
            }
            if r.closing_inventory < 0 {
                violations.push(PlanViolation::Shortage {
                    period: r.period,
                    missing: -r.closing_inventory,
                });
            } else if r.closing_inventory > config.store_capacity {
                violations.push(PlanViolation::StorageOverflow {
                    period: r.period,
                    inventory: r.closing_inventory,
                });
            }
        }

        if let Some(last) = records.last() {
            if last.closing_inventory > 0 {
                violations.push(PlanViolation::LeftoverInventory {
                    quantity: last.closing_inventory,
                });
            }
        }

        violations
    }

    /// 計劃是否滿足所有約束
    pub fn is_feasible_for(&self, config: &PlanningConfig) -> bool {
        self.violations(config).is_empty()
    }
}

/// 單期重播記錄
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    /// 時間期（從 0 起算）
    pub period: usize,
    pub opening_inventory: i64,
    pub production: i64,
    pub demand: i64,
    pub closing_inventory: i64,
}

/// 約束違反
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlanViolation {
    /// 期數與需求序列不一致
    PeriodCountMismatch { expected: usize, actual: usize },
    /// 生產量為負或超過產能
    ProductionOutOfRange { period: usize, quantity: i64 },
    /// 需求未被滿足
    Shortage { period: usize, missing: i64 },
    /// 期末庫存超過庫存容量
    StorageOverflow { period: usize, inventory: i64 },
    /// 計劃結束時仍有庫存
    LeftoverInventory { quantity: i64 },
}
