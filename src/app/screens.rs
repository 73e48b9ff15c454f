//! Table definitions for each screen.
//!
//! Tables hold boxed callbacks, so they are rebuilt on demand from these
//! functions instead of living in `AppState`. Every callback turns the
//! record(s) it receives into worker requests; nothing is applied locally
//! until the worker confirms and the page is reloaded.

use crate::app::Action;
use crate::domain::{
    AdminStatus, Administrator, AdministratorPatch, Book, BookPatch, BookStatus, Expense, RecordId,
};
use crate::table::{
    BulkAction, ButtonVariant, ColumnDescriptor, ColumnSet, ColumnSize, DataTable, RowAction, TableError,
};
use crate::worker::{EntityKind, RecordPatch, WorkerMessage};
use std::collections::BTreeMap;

/// Column width overrides from the `column_sizes` setting, keyed by column id.
pub type ColumnSizes = BTreeMap<String, ColumnSize>;

/// Table as used by every screen: keyed by record id, callbacks yield actions.
pub type ScreenTable<T> = DataTable<T, RecordId, Vec<Action>>;

fn post(message: WorkerMessage) -> Vec<Action> {
    vec![Action::PostToWorker(message)]
}

fn ids<T>(records: &[&T], id: impl Fn(&T) -> RecordId) -> Vec<RecordId> {
    records.iter().map(|r| id(*r)).collect()
}

fn with_sizes<T>(columns: Vec<ColumnDescriptor<T>>, sizes: &ColumnSizes) -> Result<ColumnSet<T>, TableError> {
    let mut set = ColumnSet::new(columns)?;
    for (id, size) in sizes {
        set.resize(id, *size);
    }
    Ok(set)
}

fn set_book_status(book: &Book, status: BookStatus) -> Vec<Action> {
    post(WorkerMessage::update(
        vec![book.id],
        RecordPatch::Book(BookPatch::status(status)),
    ))
}

/// Books: issue/return gated on circulation status, delete, bulk delete.
///
/// # Errors
///
/// Returns an error if the column set is invalid.
pub fn books(sizes: &ColumnSizes) -> Result<ScreenTable<Book>, TableError> {
    let columns = with_sizes(
        vec![
            ColumnDescriptor::new("title", "Title", |b: &Book| b.title.clone())
                .sortable("title")
                .size(ColumnSize::Lg),
            ColumnDescriptor::new("author", "Author", |b: &Book| b.author.clone()).sortable("author"),
            ColumnDescriptor::new("category", "Category", |b: &Book| b.category.clone())
                .sortable("category"),
            ColumnDescriptor::new("status", "Status", |b: &Book| b.status.to_string())
                .sortable("status")
                .size(ColumnSize::Sm),
        ],
        sizes,
    )?;

    Ok(DataTable::new(columns, |b: &Book| b.id)
        .selectable()
        .row_action(
            RowAction::new("Issue", |b: &Book| set_book_status(b, BookStatus::Issued))
                .variant(ButtonVariant::Primary)
                .when(|b: &Book| !b.is_issued()),
        )
        .row_action(
            RowAction::new("Return", |b: &Book| set_book_status(b, BookStatus::NotIssued))
                .variant(ButtonVariant::Secondary)
                .when(Book::is_issued),
        )
        .row_action(
            RowAction::new("Delete", |b: &Book| {
                post(WorkerMessage::delete(EntityKind::Books, vec![b.id]))
            })
            .variant(ButtonVariant::Destructive),
        )
        .bulk_action(
            BulkAction::new("Delete selected", |books: &[&Book]| {
                post(WorkerMessage::delete(EntityKind::Books, ids(books, |b| b.id)))
            })
            .variant(ButtonVariant::Destructive),
        )
        .empty_state("No books found", "Nothing in this school's catalogue matches"))
}

/// Administrators: one suspend/reactivate toggle per row, bulk suspend.
///
/// # Errors
///
/// Returns an error if the column set is invalid.
pub fn administrators(sizes: &ColumnSizes) -> Result<ScreenTable<Administrator>, TableError> {
    let columns = with_sizes(
        vec![
            ColumnDescriptor::new("name", "Name", |a: &Administrator| a.name.clone()).sortable("name"),
            ColumnDescriptor::new("email", "Email", |a: &Administrator| a.email.clone())
                .sortable("email")
                .size(ColumnSize::Lg),
            ColumnDescriptor::new("role", "Role", |a: &Administrator| a.role.clone()).sortable("role"),
            ColumnDescriptor::new("status", "Status", |a: &Administrator| a.status.to_string())
                .sortable("status")
                .size(ColumnSize::Sm),
        ],
        sizes,
    )?;

    let toggle = RowAction::new("Suspend", |a: &Administrator| {
        let status = if a.is_suspended() {
            AdminStatus::Active
        } else {
            AdminStatus::Suspended
        };
        post(WorkerMessage::update(
            vec![a.id],
            RecordPatch::Administrator(AdministratorPatch::status(status)),
        ))
    })
    .label_fn(|a: &Administrator| {
        let label = if a.is_suspended() { "Reactivate" } else { "Suspend" };
        label.to_string()
    })
    .variant_fn(|a: &Administrator| {
        if a.is_suspended() {
            ButtonVariant::Primary
        } else {
            ButtonVariant::Destructive
        }
    });

    Ok(DataTable::new(columns, |a: &Administrator| a.id)
        .selectable()
        .row_action(toggle)
        .bulk_action(
            BulkAction::new("Suspend selected", |admins: &[&Administrator]| {
                post(WorkerMessage::update(
                    ids(admins, |a| a.id),
                    RecordPatch::Administrator(AdministratorPatch::status(AdminStatus::Suspended)),
                ))
            })
            .variant(ButtonVariant::Destructive),
        )
        .empty_state("No administrators found", "No staff accounts match"))
}

/// Expenses: delete and bulk delete.
///
/// # Errors
///
/// Returns an error if the column set is invalid.
pub fn expenses(sizes: &ColumnSizes) -> Result<ScreenTable<Expense>, TableError> {
    let columns = with_sizes(
        vec![
            ColumnDescriptor::new("title", "Title", |e: &Expense| e.title.clone())
                .sortable("title")
                .size(ColumnSize::Lg),
            ColumnDescriptor::new("category", "Category", |e: &Expense| e.category.clone())
                .sortable("category"),
            ColumnDescriptor::new("amount", "Amount", Expense::formatted_amount)
                .sortable("amount")
                .size(ColumnSize::Sm),
            ColumnDescriptor::new("date", "Date", |e: &Expense| e.date.format("%Y-%m-%d").to_string())
                .sortable("date")
                .size(ColumnSize::Sm),
        ],
        sizes,
    )?;

    Ok(DataTable::new(columns, |e: &Expense| e.id)
        .selectable()
        .row_action(
            RowAction::new("Delete", |e: &Expense| {
                post(WorkerMessage::delete(EntityKind::Expenses, vec![e.id]))
            })
            .variant(ButtonVariant::Destructive),
        )
        .bulk_action(
            BulkAction::new("Delete selected", |expenses: &[&Expense]| {
                post(WorkerMessage::delete(EntityKind::Expenses, ids(expenses, |e| e.id)))
            })
            .variant(ButtonVariant::Destructive),
        )
        .empty_state("No expenses found", "No spending recorded for this school matches"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn book(id: RecordId, status: BookStatus) -> Book {
        let mut book = Book::new("north-high", "Dune", "Frank Herbert", "Fiction");
        book.id = id;
        book.status = status;
        book
    }

    #[test]
    fn issue_and_return_are_mutually_exclusive() {
        let table = books(&ColumnSizes::new()).unwrap();
        let data = vec![book(1, BookStatus::NotIssued), book(2, BookStatus::Issued)];

        assert_eq!(table.first_available_action(&data, 0), Some(0));
        assert_eq!(table.first_available_action(&data, 1), Some(1));
        assert!(table.invoke_row_action(&data, 1, 0).is_err());

        let actions = table.invoke_row_action(&data, 0, 0).unwrap();
        assert_eq!(
            actions,
            vec![Action::PostToWorker(WorkerMessage::update(
                vec![1],
                RecordPatch::Book(BookPatch::status(BookStatus::Issued)),
            ))]
        );
    }

    #[test]
    fn suspend_toggle_follows_status() {
        let table = administrators(&ColumnSizes::new()).unwrap();
        let mut suspended = Administrator::new("north-high", "Tomasz", "t@school.test", "Bursar");
        suspended.id = 5;
        suspended.status = AdminStatus::Suspended;

        let actions = table.invoke_row_action(&[suspended.clone()], 0, 0).unwrap();
        assert_eq!(
            actions,
            vec![Action::PostToWorker(WorkerMessage::update(
                vec![5],
                RecordPatch::Administrator(AdministratorPatch::status(AdminStatus::Active)),
            ))]
        );
        assert_eq!(table.actions()[0].label_for(&suspended), "Reactivate");
    }

    #[test]
    fn bulk_delete_collects_every_selected_id() {
        let table = expenses(&ColumnSizes::new()).unwrap();
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let data: Vec<Expense> = (1..=3)
            .map(|id| {
                let mut e = Expense::new("north-high", "Chalk", "Supplies", 1200, date);
                e.id = id;
                e
            })
            .collect();

        let mut state = crate::table::TableState::new(10).unwrap();
        table.toggle_row(&data, 0, &mut state).unwrap();
        table.toggle_row(&data, 2, &mut state).unwrap();

        let actions = table.invoke_bulk_action(&data, &state, 0).unwrap().unwrap();
        let [Action::PostToWorker(WorkerMessage::Delete { entity, ids, .. })] = actions.as_slice() else {
            panic!("unexpected actions: {actions:?}");
        };
        assert_eq!(*entity, EntityKind::Expenses);
        assert_eq!(ids, &vec![1, 3]);
    }

    #[test]
    fn configured_sizes_override_defaults() {
        let mut sizes = ColumnSizes::new();
        sizes.insert("email".to_string(), ColumnSize::Sm);
        let table = administrators(&sizes).unwrap();
        assert_eq!(table.columns().find("email").map(|c| c.size), Some(ColumnSize::Sm));
    }
}
