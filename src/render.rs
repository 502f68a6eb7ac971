//! 表格與計劃的文字輸出

use std::fmt::Write;

use lotdp_core::{ProductionPlan, StageView};

const STAGE_SEPARATOR: &str = "______________________________";

fn cell_text<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

/// 輸出單一階段
///
/// 每個庫存水準一行：各生產量的成本（不可行為 `-`），`||` 之後為最小成本與最優決策。
pub fn render_stage(stage: &StageView<'_>) -> String {
    let mut out = String::new();

    for (decisions, cell) in stage.rows() {
        for cost in decisions {
            let _ = write!(out, "{}\t", cell_text(*cost));
        }
        let _ = writeln!(
            out,
            "||\t{}\t{}",
            cell_text(cell.optimal_cost),
            cell_text(cell.optimal_decision)
        );
    }

    let _ = writeln!(out, "{}", STAGE_SEPARATOR);
    out.push('\n');
    out
}

/// 輸出生產計劃：每期一行 `x_t: 數量`（t 從 1 起算），最後一行為總成本
pub fn render_plan(plan: &ProductionPlan) -> String {
    let mut out = String::new();

    for (period, quantity) in plan.quantities.iter().enumerate() {
        let _ = writeln!(out, "x_{}: {}", period + 1, quantity);
    }
    let _ = writeln!(out, "total cost: {}", plan.total_cost);

    out
}
