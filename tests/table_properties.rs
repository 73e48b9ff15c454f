//! Behavioural properties of the data table core, driven through its public API.

use registrar::table::{
    BulkAction, ColumnDescriptor, ColumnSet, DataTable, PaginationController, RowAction, SortController,
    SortDirection, SortState, TableError, TableState, TableViewModel,
};
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Clone, PartialEq)]
struct Loan {
    id: u32,
    title: String,
    returned: bool,
}

fn loans(ids: &[u32]) -> Vec<Loan> {
    ids.iter()
        .map(|&id| Loan {
            id,
            title: format!("Loan {id}"),
            returned: id % 2 == 0,
        })
        .collect()
}

fn table() -> DataTable<Loan, u32, String> {
    let columns = ColumnSet::new(vec![
        ColumnDescriptor::new("title", "Title", |l: &Loan| l.title.clone()).sortable("title"),
        ColumnDescriptor::new("state", "State", |l: &Loan| {
            let state = if l.returned { "returned" } else { "out" };
            state.to_string()
        }),
    ])
    .unwrap();

    DataTable::new(columns, |l: &Loan| l.id)
        .selectable()
        .row_action(RowAction::new("Return", |l: &Loan| format!("return {}", l.id)).when(|l| !l.returned))
        .row_action(RowAction::new("Delete", |l: &Loan| format!("delete {}", l.id)))
}

#[test]
fn sort_cycle_returns_to_unsorted_after_three_clicks() {
    let mut sort = SortController::default();
    assert_eq!(sort.click("title").direction, SortDirection::Asc);
    assert_eq!(sort.click("title").direction, SortDirection::Desc);
    assert_eq!(sort.click("title"), SortState::unsorted());

    sort.click("title");
    assert_eq!(sort.click("author"), SortState::ascending("author"));
}

#[test]
fn selection_follows_keys_not_positions() {
    let table = table();
    let mut state = TableState::new(10).unwrap();
    let first = loans(&[1, 2, 3]);
    table.toggle_row(&first, 1, &mut state).unwrap();

    let refreshed = loans(&[2, 3, 4]);
    let selected: Vec<u32> = table.selected_records(&refreshed, &state).iter().map(|l| l.id).collect();
    assert_eq!(selected, vec![2]);

    let without_two = loans(&[3, 1]);
    assert!(table.selected_records(&without_two, &state).is_empty());
}

#[test]
fn toggle_all_twice_restores_none_or_all_but_clears_partial() {
    let table = table();
    let mut state = TableState::new(10).unwrap();
    let data = loans(&[1, 2, 3]);

    table.toggle_all(&data, &mut state);
    assert_eq!(state.selection.len(), 3);
    table.toggle_all(&data, &mut state);
    assert!(state.selection.is_empty());

    // A partial selection is completed first, so two toggles end empty.
    table.toggle_row(&data, 0, &mut state).unwrap();
    table.toggle_all(&data, &mut state);
    assert_eq!(state.selection.len(), 3);
    table.toggle_all(&data, &mut state);
    assert!(state.selection.is_empty());
}

#[test]
fn shrinking_total_clamps_to_the_last_page() {
    let mut pagination = PaginationController::new(10).unwrap();
    pagination.set_total(60);
    pagination.set_page(5);

    assert!(pagination.set_total(22));
    assert_eq!(pagination.page(), 3);
    assert!(!pagination.has_next());

    assert!(pagination.set_total(0));
    assert_eq!(pagination.page(), 1);
}

#[test]
fn changing_page_size_returns_to_the_first_page() {
    let mut pagination = PaginationController::new(10).unwrap();
    pagination.set_total(100);
    pagination.set_page(4);

    pagination.set_page_size(25).unwrap();
    assert_eq!((pagination.page(), pagination.page_size()), (1, 25));

    assert_eq!(pagination.set_page_size(0), Err(TableError::ZeroPageSize));
    assert_eq!(pagination.page_size(), 25);
}

#[test]
fn loading_wins_over_the_empty_state() {
    let table = table();
    let state = TableState::new(10).unwrap();

    assert_eq!(table.view(&[], &state, true, None), TableViewModel::Loading);
    assert!(matches!(table.view(&[], &state, false, None), TableViewModel::Empty(_)));
    assert_eq!(table.view(&loans(&[1]), &state, true, Some(0)), TableViewModel::Loading);
}

#[test]
fn conditional_actions_are_disabled_and_refuse_to_run() {
    let table = table();
    let state = TableState::unpaginated();
    let data = loans(&[1, 2]);

    let view = table.view(&data, &state, false, None);
    let enabled: Vec<Vec<bool>> = view
        .rows()
        .iter()
        .map(|r| r.actions.iter().map(|a| a.enabled).collect())
        .collect();
    assert_eq!(enabled, vec![vec![true, true], vec![false, true]]);

    assert_eq!(table.invoke_row_action(&data, 0, 0).unwrap(), "return 1");
    assert_eq!(
        table.invoke_row_action(&data, 1, 0),
        Err(TableError::ActionUnavailable {
            label: "Return".to_string()
        })
    );
    assert_eq!(table.first_available_action(&data, 1), Some(1));
}

#[test]
fn bulk_action_runs_once_with_exactly_the_selection() {
    let calls: Rc<RefCell<Vec<Vec<u32>>>> = Rc::default();
    let recorded = Rc::clone(&calls);
    let table = table().bulk_action(BulkAction::new("Archive", move |loans: &[&Loan]| {
        recorded.borrow_mut().push(loans.iter().map(|l| l.id).collect());
        format!("archive {}", loans.len())
    }));

    let data = loans(&(1..=10).collect::<Vec<_>>());
    let mut state = TableState::new(10).unwrap();

    assert_eq!(table.invoke_bulk_action(&data, &state, 0), Ok(None));
    assert!(calls.borrow().is_empty());

    for row in [8, 1, 4] {
        table.toggle_row(&data, row, &mut state).unwrap();
    }
    assert_eq!(table.invoke_bulk_action(&data, &state, 0), Ok(Some("archive 3".to_string())));
    assert_eq!(*calls.borrow(), vec![vec![2, 5, 9]]);
}
