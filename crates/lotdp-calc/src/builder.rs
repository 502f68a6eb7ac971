//! DP 階段表建構

use lotdp_core::{PlanningConfig, StageTable, StageView, StateCell};
use rayon::prelude::*;

/// 單一階段的計算參數
#[derive(Debug, Clone, Copy)]
struct StageContext {
    /// 處理序號
    index: usize,
    /// 處理序號 0（時間上最後一期）：期末不留庫存
    closes_horizon: bool,
    /// 處理序號 n-1（時間上第一期）：期初庫存必須為 0
    opens_horizon: bool,
    /// 本期需求 `r[i]`
    requirement: usize,
    setup_cost: i64,
    store_cost_per_unit: i64,
}

/// 階段表建構器
pub struct StageBuilder;

impl StageBuilder {
    /// 依處理順序逐階段建構 DP 表
    pub fn build(config: &PlanningConfig) -> lotdp_core::Result<StageTable> {
        Self::build_with(config, false)
    }

    /// 同 [`StageBuilder::build`]，但在單一階段內並行計算各狀態
    ///
    /// 階段之間仍嚴格循序：下一階段在本階段所有狀態寫入後才開始。
    pub fn build_parallel(config: &PlanningConfig) -> lotdp_core::Result<StageTable> {
        Self::build_with(config, true)
    }

    fn build_with(config: &PlanningConfig, parallel: bool) -> lotdp_core::Result<StageTable> {
        let dims = config.dimensions()?;
        let requirements = Self::stage_requirements(config)?;
        let mut table = StageTable::allocate(dims);

        tracing::debug!(
            "建構 DP 表：{} 階段 × {} 狀態 × {} 決策（並行: {}）",
            dims.stage_count(),
            dims.state_count(),
            dims.decision_count(),
            parallel
        );

        for (index, &requirement) in requirements.iter().enumerate() {
            let ctx = StageContext {
                index,
                closes_horizon: index == 0,
                opens_horizon: index + 1 == dims.stage_count(),
                requirement,
                setup_cost: config.setup_cost,
                store_cost_per_unit: config.store_cost_per_unit,
            };

            table.fill_next_stage(|_, previous, slot| {
                let decision_count = slot.decision_count();
                let (rows, cells) = slot.into_parts();

                if parallel {
                    rows.par_chunks_mut(decision_count)
                        .zip(cells.par_iter_mut())
                        .enumerate()
                        .for_each(|(state, (row, cell))| {
                            *cell = evaluate_state(&ctx, previous.as_ref(), state, row);
                        });
                } else {
                    for (state, (row, cell)) in rows
                        .chunks_mut(decision_count)
                        .zip(cells.iter_mut())
                        .enumerate()
                    {
                        *cell = evaluate_state(&ctx, previous.as_ref(), state, row);
                    }
                }
            });

            if let Some(view) = table.stage(index) {
                tracing::debug!(
                    "階段 {}（第 {} 期，需求 {}）完成：可行狀態 {}/{}",
                    index,
                    config.period_of_stage(index),
                    requirement,
                    view.feasible_states(),
                    view.state_count()
                );
            }
        }

        Ok(table)
    }

    /// 依處理順序排列的需求 `r[0..n]`
    fn stage_requirements(config: &PlanningConfig) -> lotdp_core::Result<Vec<usize>> {
        (0..config.period_count())
            .map(|stage| {
                let qty = config.stage_demand(stage);
                usize::try_from(qty).map_err(|_| {
                    lotdp_core::PlanError::InvalidConfiguration(format!(
                        "第 {} 期需求超出可表示範圍: {}",
                        config.period_of_stage(stage),
                        qty
                    ))
                })
            })
            .collect()
    }
}

/// 計算狀態 `(i, s)` 的所有決策，寫入 `row`，回傳最優結果
///
/// 決策依生產量遞增評估，只有嚴格更小的成本才更新最優解，
/// 因此成本相同時保留最小的生產量。
fn evaluate_state(
    ctx: &StageContext,
    previous: Option<&StageView<'_>>,
    state: usize,
    row: &mut [Option<i64>],
) -> StateCell {
    let mut best = StateCell::default();

    // 計劃起點不允許攜入庫存
    if ctx.opens_horizon && state > 0 {
        return best;
    }

    let holding = ctx.store_cost_per_unit * state as i64;

    for (x, slot) in row.iter_mut().enumerate() {
        let supply = state + x;

        if ctx.closes_horizon && supply != ctx.requirement {
            continue;
        }
        if supply < ctx.requirement {
            continue;
        }

        let to_store = supply - ctx.requirement;
        let downstream = match previous {
            Some(prev) => match prev.optimal_cost(to_store) {
                Some(cost) => cost,
                // 超出庫存容量或後續無解
                None => continue,
            },
            None => 0,
        };

        let setup = if x > 0 { ctx.setup_cost } else { 0 };
        let cost = setup + holding + downstream;
        *slot = Some(cost);

        if best.optimal_cost.map_or(true, |current| cost < current) {
            best.optimal_cost = Some(cost);
            best.optimal_decision = Some(x);
        }
    }

    if best.optimal_cost.is_none() {
        tracing::trace!("階段 {} 狀態 {} 無可行決策", ctx.index, state);
    }

    best
}
