//! Table view model: the render-ready output of [`DataTable::view`](super::DataTable::view).
//!
//! The view model is a plain value with every callback already resolved
//! (cell text, action labels, variants and availability), so the UI layer
//! only decides how it looks.

use super::action::ButtonVariant;
use super::column::ColumnSize;
use super::sort::SortDirection;

/// What an empty table shows instead of rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyState {
    /// Primary message (e.g., "No books found").
    pub message: String,
    /// Secondary explanatory text.
    pub subtitle: String,
}

impl Default for EmptyState {
    fn default() -> Self {
        Self {
            message: "No records".to_string(),
            subtitle: String::new(),
        }
    }
}

/// One header cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub id: String,
    pub label: String,
    pub size: ColumnSize,
    pub sortable: bool,
    /// Direction marker when this column is the active sort.
    pub sort: Option<SortDirection>,
}

/// One body cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub text: String,
    pub size: ColumnSize,
    /// Character ranges to highlight, `(start, end)` with exclusive end.
    pub highlight_ranges: Vec<(usize, usize)>,
}

/// A resolved action button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub label: String,
    pub variant: ButtonVariant,
    pub enabled: bool,
}

/// One body row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub cells: Vec<CellView>,
    /// Checkbox state; `None` when the table is not selectable.
    pub selected: Option<bool>,
    /// Whether the host cursor sits on this row.
    pub focused: bool,
    pub actions: Vec<ActionButton>,
}

/// Summary bar shown while the selection intersects the loaded rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionBar {
    pub count: usize,
    pub bulk_actions: Vec<ActionButton>,
}

/// Previous/next controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationControls {
    pub page: usize,
    pub last_page: usize,
    pub page_size: usize,
    pub total: usize,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

/// A table with rows to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopulatedTable {
    pub headers: Vec<HeaderCell>,
    pub rows: Vec<RowView>,
    pub all_selected: bool,
    pub selection_bar: Option<SelectionBar>,
    pub pagination: Option<PaginationControls>,
}

/// Complete table output. Loading wins over empty, empty wins over rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableViewModel {
    Loading,
    Empty(EmptyState),
    Populated(PopulatedTable),
}

impl TableViewModel {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    #[must_use]
    pub fn rows(&self) -> &[RowView] {
        match self {
            Self::Populated(table) => table.rows.as_slice(),
            Self::Loading | Self::Empty(_) => &[],
        }
    }
}
