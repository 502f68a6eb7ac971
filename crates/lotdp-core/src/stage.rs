//! DP 階段表（arena）
//!
//! 全部階段在建立時一次配置，決策成本以 `(階段, 狀態, 決策)` 索引存放在
//! 連續記憶體中。階段只能透過 [`StageTable::fill_next_stage`] 依處理順序逐一填入，
//! 填入後即為唯讀。

use serde::Serialize;

use crate::TableDimensions;

/// 單一狀態 `(i, s)` 的最優結果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StateCell {
    /// 最小可行成本（無可行決策時為 `None`）
    pub optimal_cost: Option<i64>,

    /// 達到最小成本的最小生產量
    pub optimal_decision: Option<usize>,
}

impl StateCell {
    /// 是否存在可行決策
    pub fn is_feasible(&self) -> bool {
        self.optimal_cost.is_some()
    }
}

/// DP 階段表
#[derive(Debug, Clone)]
pub struct StageTable {
    dims: TableDimensions,

    /// 決策成本，長度 = 階段數 × 狀態數 × 決策數
    decisions: Vec<Option<i64>>,

    /// 每個狀態的最優結果，長度 = 階段數 × 狀態數
    cells: Vec<StateCell>,

    /// 已完成的階段數
    completed: usize,
}

impl StageTable {
    /// 配置全部階段（所有決策初始為不可行）
    ///
    /// [`TableDimensions`] 保證各維度非零且規模在上限之內。
    pub fn allocate(dims: TableDimensions) -> Self {
        let state_total = dims.stage_count() * dims.state_count();
        Self {
            dims,
            decisions: vec![None; state_total * dims.decision_count()],
            cells: vec![StateCell::default(); state_total],
            completed: 0,
        }
    }

    /// 表格尺寸
    pub fn dimensions(&self) -> TableDimensions {
        self.dims
    }

    /// 已完成的階段數
    pub fn completed_stages(&self) -> usize {
        self.completed
    }

    /// 是否全部階段皆已計算
    pub fn is_complete(&self) -> bool {
        self.completed == self.dims.stage_count()
    }

    /// 填入下一個階段
    ///
    /// `fill` 收到待填階段的序號、前一階段的唯讀視圖（第 0 階段為 `None`）
    /// 以及待填階段的可寫槽位。`fill` 返回後該階段即標記為完成。
    /// 全部階段已完成時不呼叫 `fill`，回傳 `None`。
    pub fn fill_next_stage<F>(&mut self, fill: F) -> Option<usize>
    where
        F: FnOnce(usize, Option<StageView<'_>>, StageSlot<'_>),
    {
        let stage = self.completed;
        if stage >= self.dims.stage_count() {
            return None;
        }

        let state_count = self.dims.state_count();
        let decision_count = self.dims.decision_count();
        let row_len = state_count * decision_count;

        let (done_rows, pending_rows) = self.decisions.split_at_mut(stage * row_len);
        let (done_cells, pending_cells) = self.cells.split_at_mut(stage * state_count);

        let previous = stage.checked_sub(1).map(|prev| StageView {
            index: prev,
            decision_count,
            decisions: &done_rows[prev * row_len..],
            cells: &done_cells[prev * state_count..],
        });

        let slot = StageSlot {
            index: stage,
            decision_count,
            decisions: &mut pending_rows[..row_len],
            cells: &mut pending_cells[..state_count],
        };

        fill(stage, previous, slot);
        self.completed += 1;

        Some(stage)
    }

    /// 獲取已完成階段的唯讀視圖
    pub fn stage(&self, index: usize) -> Option<StageView<'_>> {
        if index >= self.completed {
            return None;
        }

        let row_len = self.dims.state_count() * self.dims.decision_count();
        let cell_start = index * self.dims.state_count();
        Some(StageView {
            index,
            decision_count: self.dims.decision_count(),
            decisions: &self.decisions[index * row_len..(index + 1) * row_len],
            cells: &self.cells[cell_start..cell_start + self.dims.state_count()],
        })
    }

    /// 依處理順序迭代所有已完成階段
    pub fn stages(&self) -> impl Iterator<Item = StageView<'_>> {
        (0..self.completed).filter_map(move |i| self.stage(i))
    }

    /// 狀態 `(stage, state)` 的最優結果
    pub fn cell(&self, stage: usize, state: usize) -> Option<&StateCell> {
        if stage >= self.completed || state >= self.dims.state_count() {
            return None;
        }
        self.cells.get(stage * self.dims.state_count() + state)
    }

    /// 狀態 `(stage, state)` 的最小成本
    pub fn optimal_cost(&self, stage: usize, state: usize) -> Option<i64> {
        self.cell(stage, state).and_then(|c| c.optimal_cost)
    }

    /// 狀態 `(stage, state)` 的最優決策
    pub fn optimal_decision(&self, stage: usize, state: usize) -> Option<usize> {
        self.cell(stage, state).and_then(|c| c.optimal_decision)
    }

    /// 決策 `(stage, state, x)` 的成本
    pub fn decision(&self, stage: usize, state: usize, x: usize) -> Option<i64> {
        self.stage(stage).and_then(|view| view.decision(state, x))
    }
}

/// 已完成階段的唯讀視圖
#[derive(Debug, Clone, Copy)]
pub struct StageView<'a> {
    index: usize,
    decision_count: usize,
    decisions: &'a [Option<i64>],
    cells: &'a [StateCell],
}

impl<'a> StageView<'a> {
    /// 處理序號
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state_count(&self) -> usize {
        self.cells.len()
    }

    pub fn decision_count(&self) -> usize {
        self.decision_count
    }

    /// 狀態 `state` 的全部決策成本（索引即生產量）
    pub fn decisions(&self, state: usize) -> &'a [Option<i64>] {
        let start = state * self.decision_count;
        &self.decisions[start..start + self.decision_count]
    }

    pub fn decision(&self, state: usize, x: usize) -> Option<i64> {
        if state >= self.state_count() || x >= self.decision_count {
            return None;
        }
        self.decisions(state)[x]
    }

    pub fn cell(&self, state: usize) -> Option<&'a StateCell> {
        self.cells.get(state)
    }

    pub fn optimal_cost(&self, state: usize) -> Option<i64> {
        self.cells.get(state).and_then(|c| c.optimal_cost)
    }

    pub fn optimal_decision(&self, state: usize) -> Option<usize> {
        self.cells.get(state).and_then(|c| c.optimal_decision)
    }

    /// 可行狀態數
    pub fn feasible_states(&self) -> usize {
        self.cells.iter().filter(|c| c.is_feasible()).count()
    }

    /// 依庫存水準迭代 `(決策成本, 最優結果)`
    pub fn rows(&self) -> impl Iterator<Item = (&'a [Option<i64>], &'a StateCell)> {
        self.decisions
            .chunks(self.decision_count)
            .take(self.cells.len())
            .zip(self.cells.iter())
    }
}

/// 待填階段的可寫槽位
#[derive(Debug)]
pub struct StageSlot<'a> {
    index: usize,
    decision_count: usize,
    decisions: &'a mut [Option<i64>],
    cells: &'a mut [StateCell],
}

impl<'a> StageSlot<'a> {
    /// 處理序號
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn state_count(&self) -> usize {
        self.cells.len()
    }

    pub fn decision_count(&self) -> usize {
        self.decision_count
    }

    /// 拆成決策成本與最優結果兩個可寫切片
    ///
    /// 決策切片按狀態分段，每段長度為 `decision_count`，可用 `chunks_mut` 逐狀態處理。
    pub fn into_parts(self) -> (&'a mut [Option<i64>], &'a mut [StateCell]) {
        (self.decisions, self.cells)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> TableDimensions {
        TableDimensions::new(2, 3, 2).unwrap()
    }

    #[test]
    fn test_allocate() {
        let table = StageTable::allocate(dims());

        assert_eq!(table.completed_stages(), 0);
        assert!(!table.is_complete());
        assert!(table.stage(0).is_none());
        assert!(table.cell(0, 0).is_none());
    }

    #[test]
    fn test_fill_in_processing_order() {
        let mut table = StageTable::allocate(dims());

        let first = table.fill_next_stage(|stage, previous, slot| {
            assert_eq!(stage, 0);
            assert!(previous.is_none());
            assert_eq!(slot.state_count(), 3);
            assert_eq!(slot.decision_count(), 2);

            let (decisions, cells) = slot.into_parts();
            assert_eq!(decisions.len(), 6);
            decisions[2] = Some(7);
            cells[1] = StateCell {
                optimal_cost: Some(7),
                optimal_decision: Some(0),
            };
        });
        assert_eq!(first, Some(0));

        let second = table.fill_next_stage(|stage, previous, slot| {
            assert_eq!(stage, 1);
            let previous = previous.unwrap();
            assert_eq!(previous.index(), 0);
            assert_eq!(previous.optimal_cost(1), Some(7));
            assert_eq!(previous.decision(1, 0), Some(7));
            assert_eq!(previous.decision(0, 0), None);
            assert_eq!(slot.index(), 1);
        });
        assert_eq!(second, Some(1));

        assert!(table.is_complete());
        assert_eq!(table.fill_next_stage(|_, _, _| unreachable!()), None);

        assert_eq!(table.optimal_cost(0, 1), Some(7));
        assert_eq!(table.optimal_decision(0, 1), Some(0));
        assert_eq!(table.decision(0, 1, 0), Some(7));
        assert_eq!(table.optimal_cost(1, 1), None);
        assert_eq!(table.stages().count(), 2);
    }

    #[test]
    fn test_view_bounds() {
        let mut table = StageTable::allocate(dims());
        table.fill_next_stage(|_, _, _| {});

        let view = table.stage(0).unwrap();
        assert_eq!(view.decision(3, 0), None);
        assert_eq!(view.decision(0, 2), None);
        assert_eq!(view.optimal_cost(5), None);
        assert_eq!(view.feasible_states(), 0);
        assert_eq!(view.rows().count(), 3);
        assert!(table.cell(0, 3).is_none());
    }

    #[test]
    fn test_single_decision_rows() {
        // 產能 0 時每個狀態只有一個決策
        let mut table = StageTable::allocate(TableDimensions::new(1, 2, 1).unwrap());
        table.fill_next_stage(|_, _, _| {});

        let view = table.stage(0).unwrap();
        assert_eq!(view.rows().count(), 2);
        assert!(view.rows().all(|(row, _)| row.len() == 1));
    }
}
