//! Virtual list / table navigation routing (spec §4.8 "Virtual list / table
//! routing").

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableState {
    pub focused_row: usize,
    pub focused_col: usize,
    pub scroll_top: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKey {
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Enter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAction {
    None,
    Select { row: usize },
    RowPress { row: usize },
}

/// A table's visible geometry: total row/column counts and the visible row
/// span used by `PageUp`/`PageDown` (spec §4.8 "computed visible row span").
pub struct TableGeometry {
    pub row_count: usize,
    pub col_count: usize,
    pub visible_rows: usize,
}

/// Route one key against `state`, clamping stale indices (after a data
/// shrink) *before* producing any action (spec §4.8 "Stale indices... are
/// clamped before producing actions").
#[must_use]
pub fn route(state: TableState, geometry: &TableGeometry, key: TableKey) -> (TableState, TableAction) {
    let state = clamp(state, geometry);
    if geometry.row_count == 0 {
        return (state, TableAction::None);
    }
    let last_row = geometry.row_count - 1;
    let last_col = geometry.col_count.saturating_sub(1);
    let next = match key {
        TableKey::Up => TableState { focused_row: state.focused_row.saturating_sub(1), ..state },
        TableKey::Down => TableState { focused_row: (state.focused_row + 1).min(last_row), ..state },
        TableKey::Left => TableState { focused_col: state.focused_col.saturating_sub(1), ..state },
        TableKey::Right => TableState { focused_col: (state.focused_col + 1).min(last_col), ..state },
        TableKey::PageUp => TableState { focused_row: state.focused_row.saturating_sub(geometry.visible_rows), ..state },
        TableKey::PageDown => TableState { focused_row: (state.focused_row + geometry.visible_rows).min(last_row), ..state },
        TableKey::Home => TableState { focused_row: 0, scroll_top: 0, ..state },
        TableKey::End => TableState { focused_row: last_row, scroll_top: last_row.saturating_sub(geometry.visible_rows.saturating_sub(1)), ..state },
        TableKey::Enter => return (state, TableAction::Select { row: state.focused_row }),
    };
    let next = snap_scroll(next, geometry);
    (next, TableAction::None)
}

fn clamp(state: TableState, geometry: &TableGeometry) -> TableState {
    let last_row = geometry.row_count.saturating_sub(1);
    let last_col = geometry.col_count.saturating_sub(1);
    TableState {
        focused_row: state.focused_row.min(last_row),
        focused_col: state.focused_col.min(last_col),
        scroll_top: state.scroll_top.min(last_row),
    }
}

fn snap_scroll(state: TableState, geometry: &TableGeometry) -> TableState {
    let visible = geometry.visible_rows.max(1);
    let scroll_top = if state.focused_row < state.scroll_top {
        state.focused_row
    } else if state.focused_row >= state.scroll_top + visible {
        state.focused_row + 1 - visible
    } else {
        state.scroll_top
    };
    TableState { scroll_top, ..state }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> TableGeometry {
        TableGeometry { row_count: 100, col_count: 3, visible_rows: 10 }
    }

    #[test]
    fn page_down_advances_by_the_visible_row_span() {
        let (next, _) = route(TableState { focused_row: 0, focused_col: 0, scroll_top: 0 }, &geometry(), TableKey::PageDown);
        assert_eq!(next.focused_row, 10);
    }

    #[test]
    fn end_jumps_to_the_last_row_and_snaps_scroll() {
        let (next, _) = route(TableState { focused_row: 0, focused_col: 0, scroll_top: 0 }, &geometry(), TableKey::End);
        assert_eq!(next.focused_row, 99);
        assert_eq!(next.scroll_top, 90);
    }

    #[test]
    fn enter_emits_select_for_the_focused_row() {
        let (_, action) = route(TableState { focused_row: 5, focused_col: 0, scroll_top: 0 }, &geometry(), TableKey::Enter);
        assert_eq!(action, TableAction::Select { row: 5 });
    }

    #[test]
    fn stale_focused_row_is_clamped_before_producing_an_action() {
        let shrunk = TableGeometry { row_count: 3, col_count: 1, visible_rows: 10 };
        let (next, action) = route(TableState { focused_row: 50, focused_col: 0, scroll_top: 40 }, &shrunk, TableKey::Enter);
        assert_eq!(next.focused_row, 2);
        assert_eq!(action, TableAction::Select { row: 2 });
    }

    #[test]
    fn down_past_the_visible_window_pulls_scroll_top_forward() {
        let g = TableGeometry { row_count: 100, col_count: 1, visible_rows: 5 };
        let mut state = TableState { focused_row: 4, focused_col: 0, scroll_top: 0 };
        let (next, _) = route(state, &g, TableKey::Down);
        state = next;
        assert_eq!(state.focused_row, 5);
        assert_eq!(state.scroll_top, 1);
    }
}
