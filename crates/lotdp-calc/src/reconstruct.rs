//! 最優計劃重建

use lotdp_core::{PlanError, PlanningConfig, ProductionPlan, StageTable};

/// 計劃重建器
pub struct PlanReconstructor;

impl PlanReconstructor {
    /// 從已完成的 DP 表回溯出按時間順序的生產計劃
    ///
    /// 由時間上第一期（處理序號 n-1，期初庫存 0）開始，沿最優決策推進攜入庫存。
    /// 任一狀態沒有最優決策時回傳 [`PlanError::NoSolution`]。
    pub fn reconstruct(
        table: &StageTable,
        config: &PlanningConfig,
    ) -> lotdp_core::Result<ProductionPlan> {
        config.validate()?;

        let stage_count = config.period_count();
        if table.completed_stages() != stage_count {
            return Err(PlanError::InvalidConfiguration(format!(
                "DP 表未完成：已計算 {} 階段，需要 {} 階段",
                table.completed_stages(),
                stage_count
            )));
        }

        let mut quantities = Vec::with_capacity(stage_count);
        let mut carried: usize = 0;

        for stage in (0..stage_count).rev() {
            let period = config.period_of_stage(stage);
            let decision = table.optimal_decision(stage, carried).ok_or_else(|| {
                tracing::warn!("第 {} 期攜入庫存 {} 時無可行決策", period, carried);
                PlanError::NoSolution {
                    period,
                    inventory: carried,
                }
            })?;

            quantities.push(decision as i64);

            if stage > 0 {
                // 等同該狀態計算成本時使用的 to_store
                let supply = carried + decision;
                carried = usize::try_from(supply as i64 - config.stage_demand(stage))
                    .map_err(|_| PlanError::NoSolution {
                        period,
                        inventory: carried,
                    })?;
            }
        }

        let opening_stage = stage_count - 1;
        let chained_cost = table
            .optimal_cost(opening_stage, 0)
            .ok_or(PlanError::NoSolution {
                period: 0,
                inventory: 0,
            })?;
        let variable_cost = config.unit_cost * config.total_demand();

        Ok(ProductionPlan::new(quantities, chained_cost, variable_cost))
    }
}
