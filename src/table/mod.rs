//! Generic data table: columns, selection, sorting, pagination and actions.
//!
//! The table is headless and stateless. A host screen owns the rows, the total
//! and a [`TableState`], and asks a [`DataTable`] to turn them into a
//! [`TableViewModel`] or to dispatch a user intent (header click, row toggle,
//! action invocation). The table never fetches and never performs I/O.
//!
//! ```text
//! data + total ─▶ DataTable::view(data, &state, is_loading) ─▶ TableViewModel ─▶ ui
//!                      │
//!   header click ─▶ SortController ─▶ SortState ─▶ host refetch
//!   page change  ─▶ PaginationController ─▶ offset/limit ─▶ host refetch
//!   action       ─▶ on_click(record) ─▶ O (host side effects)
//! ```
//!
//! # Example
//!
//! ```
//! use registrar::table::{ColumnDescriptor, ColumnSet, DataTable, RowAction, TableState};
//!
//! struct Book { id: u64, title: &'static str, issued: bool }
//!
//! let columns = ColumnSet::new(vec![
//!     ColumnDescriptor::new("title", "Title", |b: &Book| b.title.to_string()).sortable("title"),
//! ])?;
//! let table: DataTable<Book, u64, String> = DataTable::new(columns, |b| b.id)
//!     .selectable()
//!     .row_action(RowAction::new("Issue", |b: &Book| format!("issue {}", b.id)).when(|b| !b.issued));
//!
//! let books = vec![Book { id: 1, title: "Dune", issued: false }];
//! let state = TableState::new(10)?;
//! let view = table.view(&books, &state, false, Some(0));
//! assert_eq!(view.rows().len(), 1);
//! assert_eq!(table.invoke_row_action(&books, 0, 0)?, "issue 1");
//! # Ok::<(), registrar::table::TableError>(())
//! ```

pub mod action;
pub mod column;
pub mod error;
pub mod pagination;
pub mod selection;
pub mod sort;
pub mod view;

pub use action::{BulkAction, ButtonVariant, Label, RowAction, Variant};
pub use column::{ColumnDescriptor, ColumnSet, ColumnSize};
pub use error::TableError;
pub use pagination::{PaginationController, DEFAULT_PAGE_SIZE};
pub use selection::SelectionTracker;
pub use sort::{SortController, SortDirection, SortState};
pub use view::{
    ActionButton, CellView, EmptyState, HeaderCell, PaginationControls, PopulatedTable, RowView,
    SelectionBar, TableViewModel,
};

use std::collections::HashSet;
use std::fmt::Debug;
use std::hash::Hash;

/// State a host screen keeps for one table instance.
#[derive(Debug, Clone)]
pub struct TableState<K> {
    pub selection: SelectionTracker<K>,
    pub sort: SortController,
    /// `None` renders the table without pagination controls.
    pub pagination: Option<PaginationController>,
}

impl<K> TableState<K> {
    /// Creates state with pagination at `page_size` rows per page.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::ZeroPageSize`] for a page size of zero.
    pub fn new(page_size: usize) -> Result<Self, TableError> {
        Ok(Self {
            selection: SelectionTracker::default(),
            sort: SortController::default(),
            pagination: Some(PaginationController::new(page_size)?),
        })
    }

    /// State for a table that shows everything on one page.
    #[must_use]
    pub fn unpaginated() -> Self {
        Self {
            selection: SelectionTracker::default(),
            sort: SortController::default(),
            pagination: None,
        }
    }
}

/// Extracts the identity key of a record.
pub type KeyFn<T, K> = Box<dyn Fn(&T) -> K>;

/// Table configuration: what to render and which actions to offer.
pub struct DataTable<T, K, O> {
    columns: ColumnSet<T>,
    key_fn: KeyFn<T, K>,
    selectable: bool,
    actions: Vec<RowAction<T, O>>,
    bulk_actions: Vec<BulkAction<T, O>>,
    empty_state: EmptyState,
    on_row_click: Option<Box<dyn Fn(&T) -> O>>,
}

impl<T, K, O> DataTable<T, K, O>
where
    K: Eq + Hash + Clone + Debug,
{
    pub fn new(columns: ColumnSet<T>, key_fn: impl Fn(&T) -> K + 'static) -> Self {
        Self {
            columns,
            key_fn: Box::new(key_fn),
            selectable: false,
            actions: Vec::new(),
            bulk_actions: Vec::new(),
            empty_state: EmptyState::default(),
            on_row_click: None,
        }
    }

    /// Shows a checkbox per row.
    #[must_use]
    pub const fn selectable(mut self) -> Self {
        self.selectable = true;
        self
    }

    #[must_use]
    pub fn row_action(mut self, action: RowAction<T, O>) -> Self {
        self.actions.push(action);
        self
    }

    #[must_use]
    pub fn bulk_action(mut self, action: BulkAction<T, O>) -> Self {
        self.bulk_actions.push(action);
        self
    }

    #[must_use]
    pub fn empty_state(mut self, message: impl Into<String>, subtitle: impl Into<String>) -> Self {
        self.empty_state = EmptyState {
            message: message.into(),
            subtitle: subtitle.into(),
        };
        self
    }

    #[must_use]
    pub fn on_row_click(mut self, f: impl Fn(&T) -> O + 'static) -> Self {
        self.on_row_click = Some(Box::new(f));
        self
    }

    #[must_use]
    pub const fn columns(&self) -> &ColumnSet<T> {
        &self.columns
    }

    pub fn columns_mut(&mut self) -> &mut ColumnSet<T> {
        &mut self.columns
    }

    #[must_use]
    pub fn actions(&self) -> &[RowAction<T, O>] {
        &self.actions
    }

    #[must_use]
    pub fn bulk_actions(&self) -> &[BulkAction<T, O>] {
        &self.bulk_actions
    }

    #[must_use]
    pub const fn is_selectable(&self) -> bool {
        self.selectable
    }

    pub fn key_of(&self, record: &T) -> K {
        (self.key_fn)(record)
    }

    /// Keys of the loaded rows, in row order.
    pub fn visible_keys(&self, data: &[T]) -> Vec<K> {
        data.iter().map(|r| self.key_of(r)).collect()
    }

    /// Checks that every loaded record has a distinct key.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::DuplicateKey`] for the first repeated key.
    pub fn validate_rows(&self, data: &[T]) -> Result<(), TableError> {
        let mut seen = HashSet::with_capacity(data.len());
        for record in data {
            let key = self.key_of(record);
            if !seen.insert(key.clone()) {
                return Err(TableError::DuplicateKey(format!("{key:?}")));
            }
        }
        Ok(())
    }

    /// Records in `data` that are currently selected.
    pub fn selected_records<'a>(&self, data: &'a [T], state: &TableState<K>) -> Vec<&'a T> {
        state.selection.selected_records(data, |r| self.key_of(r))
    }

    /// Clicks the header of the column at `index`. Returns whether the sort changed.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownColumn`] if `index` is out of range.
    pub fn click_header(&self, index: usize, state: &mut TableState<K>) -> Result<bool, TableError> {
        let column = self
            .columns
            .get(index)
            .ok_or_else(|| TableError::UnknownColumn(format!("#{}", index + 1)))?;
        self.columns.header_clicked(&column.id, &mut state.sort)
    }

    /// Toggles the checkbox of row `row`. Returns whether it is selected afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownRow`] if `row` is out of range.
    pub fn toggle_row(&self, data: &[T], row: usize, state: &mut TableState<K>) -> Result<bool, TableError> {
        let record = data.get(row).ok_or(TableError::UnknownRow(row))?;
        Ok(state.selection.toggle(self.key_of(record)))
    }

    /// Header checkbox: selects every loaded row, or clears them if all are selected.
    pub fn toggle_all(&self, data: &[T], state: &mut TableState<K>) {
        state.selection.toggle_all(&self.visible_keys(data));
    }

    /// Runs row action `action` on row `row`.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownRow`] or [`TableError::UnknownAction`] for
    /// bad indices and [`TableError::ActionUnavailable`] when the action's
    /// condition rejects the record.
    pub fn invoke_row_action(&self, data: &[T], row: usize, action: usize) -> Result<O, TableError> {
        let record = data.get(row).ok_or(TableError::UnknownRow(row))?;
        let action = self.actions.get(action).ok_or(TableError::UnknownAction(action))?;
        action.invoke(record)
    }

    /// Index of the first row action available for row `row`.
    pub fn first_available_action(&self, data: &[T], row: usize) -> Option<usize> {
        let record = data.get(row)?;
        self.actions.iter().position(|a| a.is_available(record))
    }

    /// Runs bulk action `action` once over the selected loaded records.
    ///
    /// Returns `Ok(None)` without calling the action when nothing loaded is selected.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownAction`] if `action` is out of range.
    pub fn invoke_bulk_action(
        &self,
        data: &[T],
        state: &TableState<K>,
        action: usize,
    ) -> Result<Option<O>, TableError> {
        let action = self.bulk_actions.get(action).ok_or(TableError::UnknownAction(action))?;
        let records = self.selected_records(data, state);
        if records.is_empty() {
            tracing::debug!(action = %action.label, "bulk action skipped, nothing selected");
            return Ok(None);
        }
        Ok(Some(action.invoke(&records)))
    }

    /// Fires the row-click callback for row `row`, if one is configured.
    pub fn click_row(&self, data: &[T], row: usize) -> Option<O> {
        let callback = self.on_row_click.as_ref()?;
        data.get(row).map(|r| callback(r))
    }

    /// Composes the render-ready view of `data`.
    ///
    /// Loading takes precedence over the empty state, which takes precedence
    /// over rows. Duplicate keys are logged as errors but still rendered.
    pub fn view(&self, data: &[T], state: &TableState<K>, is_loading: bool, cursor: Option<usize>) -> TableViewModel {
        let _span = tracing::debug_span!("table_view", rows = data.len(), is_loading).entered();

        if is_loading {
            return TableViewModel::Loading;
        }
        if data.is_empty() {
            return TableViewModel::Empty(self.empty_state.clone());
        }
        if let Err(e) = self.validate_rows(data) {
            tracing::error!(error = %e, "table rows are misconfigured");
        }

        let sort = state.sort.state();
        let headers = self
            .columns
            .iter()
            .map(|c| HeaderCell {
                id: c.id.clone(),
                label: c.header.clone(),
                size: c.size,
                sortable: c.sortable,
                sort: c.sort_key.as_deref().and_then(|k| sort.direction_for(k)),
            })
            .collect();

        let rows = data
            .iter()
            .enumerate()
            .map(|(index, record)| self.row_view(record, state, cursor == Some(index)))
            .collect();

        let selected = self.selected_records(data, state);
        let selection_bar = (!selected.is_empty()).then(|| SelectionBar {
            count: selected.len(),
            bulk_actions: self
                .bulk_actions
                .iter()
                .map(|a| ActionButton {
                    label: a.label.clone(),
                    variant: a.variant,
                    enabled: true,
                })
                .collect(),
        });

        let pagination = state.pagination.as_ref().map(|p| PaginationControls {
            page: p.page(),
            last_page: p.last_page(),
            page_size: p.page_size(),
            total: p.total(),
            previous_enabled: p.has_previous(),
            next_enabled: p.has_next(),
        });

        TableViewModel::Populated(PopulatedTable {
            headers,
            rows,
            all_selected: self.selectable && state.selection.all_selected(&self.visible_keys(data)),
            selection_bar,
            pagination,
        })
    }

    fn row_view(&self, record: &T, state: &TableState<K>, focused: bool) -> RowView {
        let cells = self
            .columns
            .iter()
            .map(|c| CellView {
                text: c.render(record),
                size: c.size,
                highlight_ranges: Vec::new(),
            })
            .collect();

        let actions = self
            .actions
            .iter()
            .map(|a| ActionButton {
                label: a.label_for(record),
                variant: a.variant.resolve(record),
                enabled: a.is_available(record),
            })
            .collect();

        RowView {
            cells,
            selected: self
                .selectable
                .then(|| state.selection.is_selected(&self.key_of(record))),
            focused,
            actions,
        }
    }
}

impl<T, K, O> std::fmt::Debug for DataTable<T, K, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("columns", &self.columns)
            .field("selectable", &self.selectable)
            .field("actions", &self.actions)
            .field("bulk_actions", &self.bulk_actions)
            .field("empty_state", &self.empty_state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        name: &'static str,
    }

    fn items() -> Vec<Item> {
        vec![Item { id: 1, name: "a" }, Item { id: 2, name: "b" }]
    }

    fn table() -> DataTable<Item, u32, String> {
        let columns = ColumnSet::new(vec![
            ColumnDescriptor::new("name", "Name", |i: &Item| i.name.to_string()).sortable("name"),
            ColumnDescriptor::new("id", "Id", |i: &Item| i.id.to_string()),
        ])
        .unwrap();
        DataTable::new(columns, |i: &Item| i.id)
            .selectable()
            .row_action(RowAction::new("Open", |i: &Item| format!("open {}", i.id)))
            .bulk_action(BulkAction::new("Archive", |items: &[&Item]| format!("archive {}", items.len())))
            .empty_state("Nothing here", "Try another search")
    }

    #[test]
    fn empty_data_shows_configured_empty_state() {
        let state = TableState::new(10).unwrap();
        let view = table().view(&[], &state, false, None);
        assert_eq!(
            view,
            TableViewModel::Empty(EmptyState {
                message: "Nothing here".into(),
                subtitle: "Try another search".into(),
            })
        );
    }

    #[test]
    fn header_marks_active_sort() {
        let table = table();
        let mut state = TableState::new(10).unwrap();
        table.click_header(0, &mut state).unwrap();
        let TableViewModel::Populated(view) = table.view(&items(), &state, false, None) else {
            panic!("expected rows");
        };
        assert_eq!(view.headers[0].sort, Some(SortDirection::Asc));
        assert_eq!(view.headers[1].sort, None);
    }

    #[test]
    fn selection_bar_appears_only_with_loaded_selection() {
        let table = table();
        let mut state = TableState::new(10).unwrap();
        state.selection.toggle(42);
        let TableViewModel::Populated(view) = table.view(&items(), &state, false, None) else {
            panic!("expected rows");
        };
        assert!(view.selection_bar.is_none());

        table.toggle_row(&items(), 1, &mut state).unwrap();
        let TableViewModel::Populated(view) = table.view(&items(), &state, false, None) else {
            panic!("expected rows");
        };
        assert_eq!(view.selection_bar.map(|b| b.count), Some(1));
        assert_eq!(view.rows[1].selected, Some(true));
        assert_eq!(view.rows[0].selected, Some(false));
    }

    #[test]
    fn bulk_action_without_selection_is_skipped() {
        let state = TableState::new(10).unwrap();
        assert_eq!(table().invoke_bulk_action(&items(), &state, 0), Ok(None));
    }

    #[test]
    fn duplicate_keys_are_reported() {
        let data = vec![Item { id: 1, name: "a" }, Item { id: 1, name: "b" }];
        assert_eq!(table().validate_rows(&data), Err(TableError::DuplicateKey("1".into())));
    }

    #[test]
    fn pagination_controls_reflect_state() {
        let table = table();
        let mut state = TableState::new(1).unwrap();
        if let Some(p) = state.pagination.as_mut() {
            p.set_total(2);
        }
        let TableViewModel::Populated(view) = table.view(&items()[..1], &state, false, None) else {
            panic!("expected rows");
        };
        let controls = view.pagination.unwrap();
        assert!(!controls.previous_enabled);
        assert!(controls.next_enabled);
        assert_eq!(controls.last_page, 2);

        let unpaginated = TableState::unpaginated();
        let TableViewModel::Populated(view) = table.view(&items(), &unpaginated, false, None) else {
            panic!("expected rows");
        };
        assert!(view.pagination.is_none());
    }

    #[test]
    fn row_click_is_optional() {
        let table = table();
        assert_eq!(table.click_row(&items(), 0), None);
        let table = table.on_row_click(|i: &Item| format!("details {}", i.id));
        assert_eq!(table.click_row(&items(), 1), Some("details 2".to_string()));
    }

    #[test]
    fn unknown_indices_are_errors() {
        let table = table();
        let mut state = TableState::new(10).unwrap();
        assert_eq!(table.click_header(5, &mut state), Err(TableError::UnknownColumn("#6".into())));
        assert_eq!(table.invoke_row_action(&items(), 9, 0), Err(TableError::UnknownRow(9)));
        assert_eq!(table.invoke_row_action(&items(), 0, 3), Err(TableError::UnknownAction(3)));
    }
}
