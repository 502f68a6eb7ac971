//! 排產主計算器

use lotdp_core::{PlanningConfig, StageTable};

use crate::{PlanReconstructor, PlanningResult, StageBuilder};

/// 排產計算器
pub struct ProductionPlanner {
    /// 排產配置
    config: PlanningConfig,

    /// 是否在階段內並行計算
    parallel: bool,
}

impl ProductionPlanner {
    /// 創建新的排產計算器
    pub fn new(config: PlanningConfig) -> Self {
        Self {
            config,
            parallel: false,
        }
    }

    /// 建構器模式：設置階段內並行
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// 只建構 DP 表（不重建計劃）
    pub fn build_table(&self) -> lotdp_core::Result<StageTable> {
        if self.parallel {
            StageBuilder::build_parallel(&self.config)
        } else {
            StageBuilder::build(&self.config)
        }
    }

    /// 主排產計算入口
    pub fn plan(&self) -> lotdp_core::Result<PlanningResult> {
        self.config.validate()?;

        tracing::info!(
            "開始排產計算：{} 期，產能 {}，庫存容量 {}",
            self.config.period_count(),
            self.config.production_capacity,
            self.config.store_capacity
        );

        let start_time = std::time::Instant::now();

        tracing::debug!("Step 1: 建構 DP 表");
        let table = self.build_table()?;

        tracing::debug!("Step 2: 重建最優計劃");
        let plan = PlanReconstructor::reconstruct(&table, &self.config)?;

        tracing::info!("排產計算完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "總成本 {}（準備+庫存 {}，變動 {}），生產批次 {}",
            plan.total_cost,
            plan.chained_cost,
            plan.variable_cost,
            plan.setup_count()
        );

        Ok(PlanningResult {
            table,
            plan,
            calculation_time_ms: Some(start_time.elapsed().as_millis()),
        })
    }

    /// 獲取配置引用
    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }
}
