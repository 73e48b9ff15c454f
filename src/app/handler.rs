//! Event handling and state transitions.
//!
//! [`handle_event`] is the only place `AppState` changes. Each event is
//! matched, state is mutated, and the side effects are returned as actions
//! for the plugin runtime to run:
//!
//! 1. Key presses arrive from the plugin as [`Event`]s (the key map lives in
//!    the binary)
//! 2. Table intents go through the screen's `DataTable`, whose callbacks
//!    produce worker requests
//! 3. Anything that changes what the data source must return calls
//!    `request_refresh`
//! 4. Worker responses come back as [`Event::WorkerResponse`]

use super::modes::{InputMode, Screen, SearchFocus};
use super::state::{with_screen_table, PAGE_SIZE_STEPS};
use super::{screens, Action, AppState};
use crate::domain::error::Result;
use crate::table::TableError;
use crate::worker::{ScreenRows, WorkerResponse};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    CursorDown,
    CursorUp,

    /// Toggles the checkbox of the focused row.
    ToggleRow,
    /// Header checkbox.
    ToggleAll,
    ClearSelection,

    /// Clicks the header of the column at this zero-based index.
    SortColumn(usize),

    PreviousPage,
    NextPage,
    /// Moves to the next larger page size step.
    GrowPage,
    ShrinkPage,

    /// Runs the first row action available for the focused row.
    PrimaryRowAction,
    /// Runs the row action at this index on the focused row.
    RowAction(usize),
    /// Runs the bulk action at this index over the selection.
    BulkAction(usize),

    SearchMode,
    FocusSearchBar,
    FocusResults,
    ExitSearch,
    Char(char),
    Backspace,

    NextScreen,
    /// Signs out, or back in when signed out.
    ToggleSignIn,
    Refresh,
    /// Dismisses the notification.
    Dismiss,
    CloseFocus,

    WorkerResponse(WorkerResponse),
}

/// Processes `event`. Returns whether to re-render and the actions to run.
///
/// # Errors
///
/// Returns an error if the current screen's table is misconfigured.
#[allow(clippy::too_many_lines)]
pub fn handle_event(state: &mut AppState, event: &Event) -> Result<(bool, Vec<Action>)> {
    let _span = tracing::debug_span!("handle_event", event_type = ?event).entered();

    match event {
        Event::CursorDown => {
            state.move_cursor_down();
            Ok((true, vec![]))
        }
        Event::CursorUp => {
            state.move_cursor_up();
            Ok((true, vec![]))
        }
        Event::ToggleRow => {
            if state.rows.is_empty() {
                return Ok((false, vec![]));
            }
            let cursor = state.cursor;
            let selected = with_screen_table!(&state.rows, &state.column_sizes, |table, data| {
                table.toggle_row(data, cursor, &mut state.table)
            })??;
            tracing::debug!(row = cursor, selected, "row toggled");
            Ok((true, vec![]))
        }
        Event::ToggleAll => {
            with_screen_table!(&state.rows, &state.column_sizes, |table, data| {
                table.toggle_all(data, &mut state.table);
            })?;
            Ok((true, vec![]))
        }
        Event::ClearSelection => {
            if state.table.selection.is_empty() {
                return Ok((false, vec![]));
            }
            state.table.selection.clear();
            Ok((true, vec![]))
        }
        Event::SortColumn(index) => {
            let clicked = with_screen_table!(&state.rows, &state.column_sizes, |table, _data| {
                table.click_header(*index, &mut state.table)
            })?;
            match clicked {
                Ok(true) => {
                    tracing::debug!(sort = ?state.table.sort.state(), "sort changed");
                    Ok((true, state.request_refresh()))
                }
                Ok(false) => Ok((false, vec![])),
                Err(TableError::UnknownColumn(column)) => {
                    tracing::debug!(column = %column, "no such column");
                    Ok((false, vec![]))
                }
                Err(e) => Err(e.into()),
            }
        }
        Event::PreviousPage | Event::NextPage => {
            let moved = state.table.pagination.as_mut().is_some_and(|p| {
                if *event == Event::NextPage {
                    p.next()
                } else {
                    p.previous()
                }
            });
            if !moved {
                return Ok((false, vec![]));
            }
            state.reset_selection();
            Ok((true, state.request_refresh()))
        }
        Event::GrowPage | Event::ShrinkPage => {
            let current = state.page_size();
            let next = if *event == Event::GrowPage {
                PAGE_SIZE_STEPS.iter().copied().find(|&s| s > current)
            } else {
                PAGE_SIZE_STEPS.iter().rev().copied().find(|&s| s < current)
            };
            let (Some(size), Some(pagination)) = (next, state.table.pagination.as_mut()) else {
                return Ok((false, vec![]));
            };
            pagination.set_page_size(size)?;
            tracing::debug!(page_size = size, "page size changed");
            state.cursor = 0;
            Ok((true, state.request_refresh()))
        }
        Event::PrimaryRowAction => {
            let cursor = state.cursor;
            let outcome = with_screen_table!(&state.rows, &state.column_sizes, |table, data| {
                table
                    .first_available_action(data, cursor)
                    .map(|action| table.invoke_row_action(data, cursor, action))
            })?;
            match outcome {
                Some(actions) => Ok((false, actions?)),
                None => Ok((false, vec![])),
            }
        }
        Event::RowAction(index) => {
            if state.rows.is_empty() {
                return Ok((false, vec![]));
            }
            let cursor = state.cursor;
            let outcome = with_screen_table!(&state.rows, &state.column_sizes, |table, data| {
                table.invoke_row_action(data, cursor, *index)
            })?;
            match outcome {
                Ok(actions) => Ok((false, actions)),
                Err(TableError::ActionUnavailable { label }) => {
                    state.notify(format!("{label} is not available for this record"));
                    Ok((true, vec![]))
                }
                Err(TableError::UnknownAction(_)) => Ok((false, vec![])),
                Err(e) => Err(e.into()),
            }
        }
        Event::BulkAction(index) => {
            let outcome = with_screen_table!(&state.rows, &state.column_sizes, |table, data| {
                table.invoke_bulk_action(data, &state.table, *index)
            })?;
            match outcome {
                Ok(Some(actions)) => {
                    state.table.selection.clear();
                    Ok((true, actions))
                }
                Ok(None) | Err(TableError::UnknownAction(_)) => Ok((false, vec![])),
                Err(e) => Err(e.into()),
            }
        }
        Event::SearchMode => {
            tracing::debug!("entering search mode");
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusSearchBar => {
            state.input_mode = InputMode::Search(SearchFocus::Typing);
            Ok((true, vec![]))
        }
        Event::FocusResults => {
            state.input_mode = if state.search_query.is_empty() {
                InputMode::Normal
            } else {
                InputMode::Search(SearchFocus::Navigating)
            };
            Ok((true, vec![]))
        }
        Event::ExitSearch => {
            tracing::debug!(query = %state.search_query, "exiting search mode");
            state.input_mode = InputMode::Normal;
            if state.search_query.is_empty() {
                return Ok((true, vec![]));
            }
            state.search_query.clear();
            Ok((true, search_changed(state)))
        }
        Event::Char(c) => {
            if state.input_mode != InputMode::Search(SearchFocus::Typing) {
                return Ok((false, vec![]));
            }
            state.search_query.push(*c);
            tracing::trace!(query = %state.search_query, "search query updated");
            Ok((true, search_changed(state)))
        }
        Event::Backspace => {
            if state.input_mode != InputMode::Search(SearchFocus::Typing) || state.search_query.pop().is_none() {
                return Ok((false, vec![]));
            }
            Ok((true, search_changed(state)))
        }
        Event::NextScreen => {
            let next = state.screen.next();
            tracing::debug!(screen = next.title(), "switching screen");
            Ok((true, state.switch_screen(next)))
        }
        Event::ToggleSignIn => {
            if state.context.is_some() {
                state.logout();
                Ok((true, vec![]))
            } else {
                Ok((true, state.login()))
            }
        }
        Event::Refresh => Ok((true, state.request_refresh())),
        Event::Dismiss => Ok((state.notification.take().is_some(), vec![])),
        Event::CloseFocus => Ok((false, vec![Action::CloseFocus])),
        Event::WorkerResponse(response) => handle_worker_response(state, response),
    }
}

/// New query text: back to page 1 with nothing selected, then reload.
fn search_changed(state: &mut AppState) -> Vec<Action> {
    if let Some(pagination) = state.table.pagination.as_mut() {
        pagination.set_page(1);
    }
    state.reset_selection();
    state.request_refresh()
}

fn handle_worker_response(state: &mut AppState, response: &WorkerResponse) -> Result<(bool, Vec<Action>)> {
    match response {
        WorkerResponse::Opened { path } => {
            tracing::debug!(path = %path, "record store opened");
            Ok((false, vec![]))
        }
        WorkerResponse::Listed { generation, rows, total } => {
            Ok(state.apply_listed(*generation, rows.clone(), *total))
        }
        WorkerResponse::Updated { entity, count } => {
            let screen = Screen::from(*entity);
            state.notify(format!("Updated {count} {}", screen.noun(*count)));
            Ok((true, refresh_if_showing(state, screen)))
        }
        WorkerResponse::Deleted { entity, count } => {
            let screen = Screen::from(*entity);
            state.notify(format!("Deleted {count} {}", screen.noun(*count)));
            Ok((true, refresh_if_showing(state, screen)))
        }
        WorkerResponse::Seeded { count } => {
            if *count == 0 {
                return Ok((false, vec![]));
            }
            tracing::info!(count, "demo records seeded");
            state.notify(format!("Loaded {count} demo records"));
            Ok((true, state.request_refresh()))
        }
        WorkerResponse::Failed {
            operation,
            message,
            generation,
        } => {
            tracing::error!(operation = %operation, error = %message, "worker request failed");
            Ok((state.apply_failure(operation, message, *generation), vec![]))
        }
    }
}

fn refresh_if_showing(state: &mut AppState, screen: Screen) -> Vec<Action> {
    if state.screen == screen {
        state.request_refresh()
    } else {
        vec![]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AdminStatus, Administrator, AdministratorPatch, Book};
    use crate::table::{SortDirection, TableViewModel};
    use crate::ui::Theme;
    use crate::worker::{EntityKind, RecordPatch, WorkerMessage};

    fn loaded_state(rows: ScreenRows, total: usize) -> AppState {
        let mut state = AppState::new(Theme::default(), Some("north-high".to_string()), 10).unwrap();
        if rows.kind() != EntityKind::Books {
            state.switch_screen(Screen::from(rows.kind()));
        } else {
            state.request_refresh();
        }
        let generation = state.generation;
        state.apply_listed(generation, rows, total);
        state
    }

    fn book(id: u64, issued: bool) -> Book {
        let mut book = Book::new("north-high", format!("Book {id}"), "Author", "Fiction");
        book.id = id;
        if issued {
            book.status = crate::domain::BookStatus::Issued;
        }
        book
    }

    fn listed(actions: &[Action]) -> Option<&crate::storage::ListQuery> {
        actions.iter().find_map(|a| match a {
            Action::PostToWorker(WorkerMessage::List { query, .. }) => Some(query),
            _ => None,
        })
    }

    #[test]
    fn header_key_cycles_sort_and_refetches() {
        let mut state = loaded_state(ScreenRows::Books(vec![book(1, false)]), 1);

        let (_, actions) = handle_event(&mut state, &Event::SortColumn(0)).unwrap();
        let query = listed(&actions).unwrap();
        assert_eq!(query.sort.column.as_deref(), Some("title"));
        assert_eq!(query.sort.direction, SortDirection::Asc);

        let (_, actions) = handle_event(&mut state, &Event::SortColumn(0)).unwrap();
        assert_eq!(listed(&actions).unwrap().sort.direction, SortDirection::Desc);

        let (_, actions) = handle_event(&mut state, &Event::SortColumn(0)).unwrap();
        assert_eq!(listed(&actions).unwrap().sort.column, None);

        let (render, actions) = handle_event(&mut state, &Event::SortColumn(8)).unwrap();
        assert!(!render);
        assert!(actions.is_empty());
    }

    #[test]
    fn enter_runs_the_first_available_action() {
        let mut state = loaded_state(ScreenRows::Books(vec![book(7, true)]), 1);
        let (_, actions) = handle_event(&mut state, &Event::PrimaryRowAction).unwrap();
        assert_eq!(
            actions,
            vec![Action::PostToWorker(WorkerMessage::update(
                vec![7],
                RecordPatch::Book(crate::domain::BookPatch::status(crate::domain::BookStatus::NotIssued)),
            ))]
        );
    }

    #[test]
    fn unavailable_action_notifies_instead_of_running() {
        let mut state = loaded_state(ScreenRows::Books(vec![book(7, true)]), 1);
        let (render, actions) = handle_event(&mut state, &Event::RowAction(0)).unwrap();
        assert!(render);
        assert!(actions.is_empty());
        assert_eq!(
            state.notification.map(|n| n.message),
            Some("Issue is not available for this record".to_string())
        );
    }

    #[test]
    fn bulk_action_needs_a_selection() {
        let admins: Vec<Administrator> = (1..=3)
            .map(|id| {
                let mut a = Administrator::new("north-high", format!("Admin {id}"), "a@school.test", "Clerk");
                a.id = id;
                a
            })
            .collect();
        let mut state = loaded_state(ScreenRows::Administrators(admins), 3);

        let (render, actions) = handle_event(&mut state, &Event::BulkAction(0)).unwrap();
        assert!(!render);
        assert!(actions.is_empty());

        handle_event(&mut state, &Event::ToggleAll).unwrap();
        let (_, actions) = handle_event(&mut state, &Event::BulkAction(0)).unwrap();
        assert_eq!(
            actions,
            vec![Action::PostToWorker(WorkerMessage::update(
                vec![1, 2, 3],
                RecordPatch::Administrator(AdministratorPatch::status(AdminStatus::Suspended)),
            ))]
        );
        assert!(state.table.selection.is_empty());
    }

    #[test]
    fn page_navigation_clears_selection() {
        let mut state = loaded_state(ScreenRows::Books((1..=10).map(|id| book(id, false)).collect()), 25);
        handle_event(&mut state, &Event::ToggleRow).unwrap();
        assert_eq!(state.table.selection.len(), 1);

        let (_, actions) = handle_event(&mut state, &Event::NextPage).unwrap();
        assert_eq!(listed(&actions).unwrap().page, 2);
        assert!(state.table.selection.is_empty());
        assert!(matches!(state.table_view(), Ok(TableViewModel::Loading)));
    }

    #[test]
    fn page_size_steps_reset_to_first_page() {
        let mut state = loaded_state(ScreenRows::Books(vec![book(1, false)]), 40);
        handle_event(&mut state, &Event::NextPage).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::GrowPage).unwrap();
        let query = listed(&actions).unwrap();
        assert_eq!((query.page, query.page_size), (1, 20));

        let (_, actions) = handle_event(&mut state, &Event::ShrinkPage).unwrap();
        assert_eq!(listed(&actions).unwrap().page_size, 10);
    }

    #[test]
    fn page_size_change_keeps_the_selection() {
        let mut state = loaded_state(ScreenRows::Books(vec![book(1, false), book(2, false)]), 2);
        handle_event(&mut state, &Event::CursorDown).unwrap();
        handle_event(&mut state, &Event::ToggleRow).unwrap();

        handle_event(&mut state, &Event::GrowPage).unwrap();
        assert_eq!(state.table.selection.len(), 1);
        assert_eq!(state.cursor, 0);

        handle_event(&mut state, &Event::ShrinkPage).unwrap();
        assert_eq!(state.table.selection.len(), 1);
    }

    #[test]
    fn sorting_keeps_the_selection() {
        let mut state = loaded_state(ScreenRows::Books(vec![book(1, false), book(2, false)]), 2);
        handle_event(&mut state, &Event::ToggleRow).unwrap();

        handle_event(&mut state, &Event::SortColumn(0)).unwrap();
        assert_eq!(state.table.selection.len(), 1);

        let generation = state.generation;
        state.apply_listed(generation, ScreenRows::Books(vec![book(2, false), book(1, false)]), 2);
        assert!(state.table.selection.is_selected(&1));
        assert!(!state.table.selection.is_selected(&2));
    }

    #[test]
    fn typing_filters_from_the_first_page() {
        let mut state = loaded_state(ScreenRows::Books(vec![book(1, false)]), 40);
        handle_event(&mut state, &Event::NextPage).unwrap();
        handle_event(&mut state, &Event::SearchMode).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::Char('d')).unwrap();
        let query = listed(&actions).unwrap();
        assert_eq!(query.filter.as_deref(), Some("d"));
        assert_eq!(query.page, 1);

        let (_, actions) = handle_event(&mut state, &Event::ExitSearch).unwrap();
        assert_eq!(listed(&actions).unwrap().filter, None);
        assert_eq!(state.input_mode, InputMode::Normal);
    }

    #[test]
    fn mutations_notify_and_reload_the_visible_screen() {
        let mut state = loaded_state(ScreenRows::Books(vec![book(1, false)]), 1);
        let response = WorkerResponse::Deleted {
            entity: EntityKind::Books,
            count: 1,
        };
        let (_, actions) = handle_event(&mut state, &Event::WorkerResponse(response)).unwrap();
        assert!(listed(&actions).is_some());
        assert_eq!(state.notification.map(|n| n.message), Some("Deleted 1 book".to_string()));
    }

    #[test]
    fn failures_surface_as_notifications() {
        let mut state = loaded_state(ScreenRows::Books(vec![book(1, false)]), 1);
        let response = WorkerResponse::Failed {
            operation: "delete records".to_string(),
            message: "disk full".to_string(),
            generation: None,
        };
        let (render, _) = handle_event(&mut state, &Event::WorkerResponse(response)).unwrap();
        assert!(render);
        assert_eq!(state.rows.len(), 1);
        assert!(handle_event(&mut state, &Event::Dismiss).unwrap().0);
        assert!(state.notification.is_none());
    }

    #[test]
    fn screen_switch_resets_table_state() {
        let mut state = loaded_state(ScreenRows::Books(vec![book(1, false)]), 1);
        handle_event(&mut state, &Event::ToggleRow).unwrap();
        handle_event(&mut state, &Event::SortColumn(1)).unwrap();

        let (_, actions) = handle_event(&mut state, &Event::NextScreen).unwrap();
        let [Action::PostToWorker(WorkerMessage::List { entity, query, .. })] = actions.as_slice() else {
            panic!("unexpected actions: {actions:?}");
        };
        assert_eq!(*entity, EntityKind::Administrators);
        assert_eq!(query.sort.column, None);
        assert!(state.table.selection.is_empty());
        assert!(state.rows.is_empty());
    }

    #[test]
    fn sign_out_then_in() {
        let mut state = loaded_state(ScreenRows::Books(vec![book(1, false)]), 1);
        let (_, actions) = handle_event(&mut state, &Event::ToggleSignIn).unwrap();
        assert!(actions.is_empty());
        assert!(state.rows.is_empty());

        let (_, actions) = handle_event(&mut state, &Event::ToggleSignIn).unwrap();
        assert_eq!(listed(&actions).unwrap().school, "north-high");
    }
}
