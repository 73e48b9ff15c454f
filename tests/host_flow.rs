//! End-to-end flows: the app state talking to a real worker over a temporary
//! JSON store, with worker requests answered synchronously.

use registrar::app::{handle_event, Action, AppState, Event, NotificationLevel};
use registrar::table::TableViewModel;
use registrar::worker::{RegistrarWorker, ScreenRows, WorkerMessage, WorkerResponse};
use registrar::{initialize, Config};
use tempfile::TempDir;

struct Harness {
    state: AppState,
    worker: RegistrarWorker,
    _dir: TempDir,
}

impl Harness {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let mut worker = RegistrarWorker::default();
        let path = dir.path().join("records.json").display().to_string();
        assert!(matches!(
            worker.handle_message(WorkerMessage::open(path)),
            WorkerResponse::Opened { .. }
        ));

        let config = Config {
            school: Some("north-high".to_string()),
            page_size: 5,
            ..Config::default()
        };
        let mut harness = Self {
            state: initialize(&config).unwrap(),
            worker,
            _dir: dir,
        };

        let seeded = harness.worker.handle_message(WorkerMessage::seed("north-high".to_string()));
        harness.send(Event::WorkerResponse(seeded));
        harness
    }

    /// Handles `event` and answers every worker request it causes, including
    /// follow-ups, until nothing is left in flight.
    fn send(&mut self, event: Event) {
        let (_, mut actions) = handle_event(&mut self.state, &event).unwrap();
        while !actions.is_empty() {
            let mut follow_up = Vec::new();
            for action in actions {
                if let Action::PostToWorker(message) = action {
                    let response = self.worker.handle_message(message);
                    let (_, more) = handle_event(&mut self.state, &Event::WorkerResponse(response)).unwrap();
                    follow_up.extend(more);
                }
            }
            actions = follow_up;
        }
    }

    fn page(&self) -> usize {
        self.state.table.pagination.as_ref().map_or(0, |p| p.page())
    }

    fn book_titles(&self) -> Vec<String> {
        match &self.state.rows {
            ScreenRows::Books(books) => books.iter().map(|b| b.title.clone()).collect(),
            other => panic!("expected books, got {:?}", other.kind()),
        }
    }

    fn notification(&self) -> Option<&str> {
        self.state.notification.as_ref().map(|n| n.message.as_str())
    }
}

#[test]
fn seeding_loads_the_first_page() {
    let harness = Harness::new();
    assert!(!harness.state.is_loading);
    assert_eq!(harness.state.total, 12);
    assert_eq!(harness.state.rows.len(), 5);
    assert_eq!(harness.notification(), Some("Loaded 24 demo records"));
}

#[test]
fn sorting_and_paging_go_through_the_store() {
    let mut harness = Harness::new();

    harness.send(Event::SortColumn(0));
    assert_eq!(harness.book_titles()[0], "A Brief History of Time");

    harness.send(Event::SortColumn(0));
    assert_eq!(harness.book_titles()[0], "World Atlas");

    harness.send(Event::NextPage);
    harness.send(Event::NextPage);
    assert_eq!(harness.page(), 3);
    assert_eq!(harness.book_titles().len(), 2);

    harness.send(Event::NextPage);
    assert_eq!(harness.page(), 3);
}

#[test]
fn selection_survives_re_sorting() {
    let mut harness = Harness::new();
    assert_eq!(harness.book_titles()[0], "Dune");
    harness.send(Event::ToggleRow);

    harness.send(Event::SortColumn(0));
    let titles = harness.book_titles();
    let dune = titles.iter().position(|t| t == "Dune").unwrap();
    let selected: Vec<bool> = harness
        .state
        .table_view()
        .unwrap()
        .rows()
        .iter()
        .map(|r| r.selected == Some(true))
        .collect();
    assert_eq!(selected.iter().filter(|s| **s).count(), 1);
    assert!(selected[dune]);

    // Off the page under the new order, but still selected.
    harness.send(Event::SortColumn(0));
    assert!(!harness.book_titles().contains(&"Dune".to_string()));
    assert_eq!(harness.state.table.selection.len(), 1);
}

#[test]
fn page_size_change_keeps_the_selection() {
    let mut harness = Harness::new();
    harness.send(Event::ToggleAll);
    assert_eq!(harness.state.table.selection.len(), 5);

    harness.send(Event::GrowPage);
    assert_eq!(harness.state.rows.len(), 10);
    assert_eq!(harness.state.table.selection.len(), 5);
}

#[test]
fn row_action_updates_the_record_and_reloads() {
    let mut harness = Harness::new();
    harness.send(Event::SortColumn(0));

    let view = harness.state.table_view().unwrap();
    let labels: Vec<&str> = view.rows()[0]
        .actions
        .iter()
        .filter(|a| a.enabled)
        .map(|a| a.label.as_str())
        .collect();
    assert_eq!(labels, vec!["Return", "Delete"]);

    harness.send(Event::PrimaryRowAction);
    assert_eq!(harness.notification(), Some("Updated 1 book"));

    let ScreenRows::Books(books) = &harness.state.rows else {
        panic!("expected books");
    };
    assert!(!books[0].is_issued());
}

#[test]
fn bulk_delete_removes_the_selected_page() {
    let mut harness = Harness::new();
    harness.send(Event::NextScreen);
    harness.send(Event::NextScreen);
    assert_eq!(harness.state.total, 7);

    harness.send(Event::ToggleAll);
    assert_eq!(harness.state.table.selection.len(), 5);

    harness.send(Event::BulkAction(0));
    assert_eq!(harness.notification(), Some("Deleted 5 expenses"));
    assert!(harness.state.table.selection.is_empty());
    assert_eq!(harness.state.total, 2);
    assert_eq!(harness.state.rows.len(), 2);
}

#[test]
fn search_filters_on_the_first_page() {
    let mut harness = Harness::new();
    harness.send(Event::NextPage);

    harness.send(Event::SearchMode);
    for c in "herbert".chars() {
        harness.send(Event::Char(c));
    }
    assert_eq!(harness.page(), 1);
    assert_eq!(harness.book_titles(), vec!["Dune".to_string()]);

    harness.send(Event::ExitSearch);
    assert_eq!(harness.state.total, 12);
}

#[test]
fn signing_out_discards_records_until_signing_back_in() {
    let mut harness = Harness::new();

    harness.send(Event::ToggleSignIn);
    assert!(harness.state.rows.is_empty());
    assert!(matches!(harness.state.table_view(), Ok(TableViewModel::Empty(_))));

    harness.send(Event::Refresh);
    assert!(harness.state.rows.is_empty());

    harness.send(Event::ToggleSignIn);
    assert_eq!(harness.state.rows.len(), 5);
}

#[test]
fn store_failures_become_error_notifications() {
    let mut harness = Harness::new();
    let failed = WorkerResponse::Failed {
        operation: "delete records".to_string(),
        message: "disk full".to_string(),
        generation: None,
    };
    harness.send(Event::WorkerResponse(failed));

    let notification = harness.state.notification.as_ref().unwrap();
    assert_eq!(notification.level, NotificationLevel::Error);
    assert_eq!(notification.message, "Could not delete records: disk full");
    assert_eq!(harness.state.rows.len(), 5);
}

#[test]
fn frame_renders_the_loaded_page() {
    let harness = Harness::new();
    let frame = registrar::ui::render(&harness.state, 30, 140);
    assert!(frame.contains("Registrar · Books (12)"));
    assert!(frame.contains("Page 1 of 3"));
}
