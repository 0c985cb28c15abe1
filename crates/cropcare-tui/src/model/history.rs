use cropcare_core::HistoryTable;

use super::Loadable;

#[derive(Debug, Clone, Default)]
pub struct HistoryState {
    pub table: Loadable<HistoryTable>,
    pub cursor: usize,
}

impl HistoryState {
    pub fn row_count(&self) -> usize {
        self.table.ready().map_or(0, |t| t.rows.len())
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.row_count() {
            self.cursor += 1;
        }
    }

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }
}
