//! Column descriptors: how a record becomes a row of cells.
//!
//! A [`ColumnDescriptor`] maps a record to the text of one cell and carries the
//! sort metadata for its header. A [`ColumnSet`] is the validated, ordered list
//! of descriptors a table renders; no descriptor is ever skipped.

use super::error::TableError;
use super::sort::SortController;
use std::collections::HashSet;
use std::fmt;

/// Width class of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColumnSize {
    Sm,
    #[default]
    Md,
    Lg,
}

impl ColumnSize {
    /// Display width in terminal cells.
    #[must_use]
    pub const fn width(self) -> usize {
        match self {
            Self::Sm => 10,
            Self::Md => 20,
            Self::Lg => 36,
        }
    }

    /// Parses a size name, falling back to the default width for anything unknown.
    ///
    /// ```
    /// use registrar::table::ColumnSize;
    ///
    /// assert_eq!(ColumnSize::parse("lg"), ColumnSize::Lg);
    /// assert_eq!(ColumnSize::parse("huge"), ColumnSize::Md);
    /// ```
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "sm" | "small" => Self::Sm,
            "md" | "medium" => Self::Md,
            "lg" | "large" => Self::Lg,
            other => {
                tracing::debug!(size = %other, "unknown column size, using default width");
                Self::default()
            }
        }
    }
}

/// Renders one cell of a record.
pub type CellFn<T> = Box<dyn Fn(&T) -> String>;

/// Declarative description of one table column.
pub struct ColumnDescriptor<T> {
    /// Identifier, unique within the table.
    pub id: String,
    /// Header text.
    pub header: String,
    /// Cell renderer.
    pub cell: CellFn<T>,
    /// Whether clicking the header changes the sort.
    pub sortable: bool,
    /// Sort key handed to the data source; required when `sortable` is set.
    pub sort_key: Option<String>,
    /// Width class.
    pub size: ColumnSize,
}

impl<T> ColumnDescriptor<T> {
    /// Creates a non-sortable, medium-width column.
    pub fn new(
        id: impl Into<String>,
        header: impl Into<String>,
        cell: impl Fn(&T) -> String + 'static,
    ) -> Self {
        Self {
            id: id.into(),
            header: header.into(),
            cell: Box::new(cell),
            sortable: false,
            sort_key: None,
            size: ColumnSize::default(),
        }
    }

    /// Makes the column sortable under `key`.
    #[must_use]
    pub fn sortable(mut self, key: impl Into<String>) -> Self {
        self.sortable = true;
        self.sort_key = Some(key.into());
        self
    }

    #[must_use]
    pub const fn size(mut self, size: ColumnSize) -> Self {
        self.size = size;
        self
    }

    /// Renders this column's cell for `record`.
    pub fn render(&self, record: &T) -> String {
        (self.cell)(record)
    }
}

impl<T> fmt::Debug for ColumnDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("id", &self.id)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("sort_key", &self.sort_key)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

/// Ordered, validated list of column descriptors.
pub struct ColumnSet<T> {
    columns: Vec<ColumnDescriptor<T>>,
}

impl<T> fmt::Debug for ColumnSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(&self.columns).finish()
    }
}

impl<T> ColumnSet<T> {
    /// Validates and wraps a list of descriptors.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::DuplicateColumn`] when two descriptors share an id
    /// and [`TableError::MissingSortKey`] when a sortable column has no key.
    pub fn new(columns: Vec<ColumnDescriptor<T>>) -> Result<Self, TableError> {
        let mut seen = HashSet::with_capacity(columns.len());
        for column in &columns {
            if !seen.insert(column.id.as_str()) {
                tracing::error!(column = %column.id, "duplicate column id");
                return Err(TableError::DuplicateColumn(column.id.clone()));
            }
            if column.sortable && column.sort_key.is_none() {
                tracing::error!(column = %column.id, "sortable column without sort key");
                return Err(TableError::MissingSortKey(column.id.clone()));
            }
        }
        Ok(Self { columns })
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnDescriptor<T>> {
        self.columns.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ColumnDescriptor<T>> {
        self.columns.get(index)
    }

    #[must_use]
    pub fn find(&self, id: &str) -> Option<&ColumnDescriptor<T>> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Overrides the width class of the column with `id`, if present.
    pub fn resize(&mut self, id: &str, size: ColumnSize) {
        if let Some(column) = self.columns.iter_mut().find(|c| c.id == id) {
            column.size = size;
        }
    }

    /// Renders every cell of `record`, one per descriptor, in column order.
    pub fn render_row(&self, record: &T) -> Vec<String> {
        self.columns.iter().map(|c| c.render(record)).collect()
    }

    /// Handles a click on the header of column `id`.
    ///
    /// Sortable headers advance `sort`; clicking a non-sortable header leaves it
    /// untouched. Returns whether the sort state changed.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::UnknownColumn`] if no column has this id.
    pub fn header_clicked(&self, id: &str, sort: &mut SortController) -> Result<bool, TableError> {
        let column = self
            .find(id)
            .ok_or_else(|| TableError::UnknownColumn(id.to_string()))?;

        match (column.sortable, &column.sort_key) {
            (true, Some(key)) => {
                sort.click(key);
                Ok(true)
            }
            _ => Ok(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::sort::{SortDirection, SortState};

    struct Row {
        name: &'static str,
        age: u32,
    }

    fn columns() -> ColumnSet<Row> {
        ColumnSet::new(vec![
            ColumnDescriptor::new("name", "Name", |r: &Row| r.name.to_string()).sortable("name"),
            ColumnDescriptor::new("age", "Age", |r: &Row| r.age.to_string()).size(ColumnSize::Sm),
        ])
        .unwrap()
    }

    #[test]
    fn renders_one_cell_per_descriptor() {
        let row = Row { name: "Ada", age: 36 };
        assert_eq!(columns().render_row(&row), vec!["Ada", "36"]);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = ColumnSet::new(vec![
            ColumnDescriptor::new("a", "A", |_: &Row| String::new()),
            ColumnDescriptor::new("a", "A again", |_: &Row| String::new()),
        ])
        .unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("a".into()));
    }

    #[test]
    fn rejects_sortable_without_key() {
        let mut column = ColumnDescriptor::new("a", "A", |_: &Row| String::new());
        column.sortable = true;
        let err = ColumnSet::new(vec![column]).unwrap_err();
        assert_eq!(err, TableError::MissingSortKey("a".into()));
    }

    #[test]
    fn non_sortable_header_click_is_ignored() {
        let mut sort = SortController::default();
        assert!(!columns().header_clicked("age", &mut sort).unwrap());
        assert_eq!(sort.state(), SortState::unsorted());
    }

    #[test]
    fn sortable_header_click_activates_ascending() {
        let mut sort = SortController::default();
        assert!(columns().header_clicked("name", &mut sort).unwrap());
        assert_eq!(sort.state().column.as_deref(), Some("name"));
        assert_eq!(sort.state().direction, SortDirection::Asc);
    }

    #[test]
    fn unknown_sizes_fall_back_to_default() {
        assert_eq!(ColumnSize::parse("xl").width(), ColumnSize::default().width());
        assert_eq!(ColumnSize::parse("SM"), ColumnSize::Sm);
    }

    #[test]
    fn debug_does_not_need_debug_records() {
        let debug = format!("{:?}", columns());
        assert!(debug.contains("\"name\""));
        assert!(debug.contains("\"age\""));
    }
}
