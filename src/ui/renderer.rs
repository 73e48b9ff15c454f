//! Rendering entry point.

use crate::app::AppState;
use crate::ui::components;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

/// Renders `state` into an ANSI frame of `rows` × `cols`.
///
/// The plugin prints the returned string once per render call.
#[must_use]
pub fn render(state: &AppState, rows: usize, cols: usize) -> String {
    let viewmodel = state.compute_viewmodel(rows, cols);
    render_viewmodel(&viewmodel, &state.theme, rows, cols)
}

#[must_use]
pub fn render_viewmodel(vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) -> String {
    let mut out = String::with_capacity(rows * cols * 2);
    components::render_frame(&mut out, vm, theme, rows, cols);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{EmptyState, TableViewModel};
    use crate::ui::viewmodel::{FooterInfo, HeaderInfo, NotificationInfo, TabInfo};

    fn viewmodel(table: TableViewModel) -> UIViewModel {
        UIViewModel {
            header: HeaderInfo {
                title: "Books (0)".to_string(),
                tabs: vec![TabInfo {
                    label: "Books".to_string(),
                    active: true,
                }],
                school: Some("north-high".to_string()),
            },
            search_bar: None,
            table,
            rows_above: 0,
            rows_below: 0,
            notification: None,
            footer: FooterInfo {
                keybindings: "q: quit".to_string(),
            },
        }
    }

    #[test]
    fn loading_hides_the_empty_state() {
        let frame = render_viewmodel(&viewmodel(TableViewModel::Loading), &Theme::default(), 24, 80);
        assert!(frame.contains("Loading…"));
        assert!(!frame.contains("No records"));
    }

    #[test]
    fn empty_state_and_chrome_are_drawn() {
        let empty = EmptyState {
            message: "No books found".to_string(),
            subtitle: "Try another search".to_string(),
        };
        let mut vm = viewmodel(TableViewModel::Empty(empty));
        vm.notification = Some(NotificationInfo {
            message: "Deleted 2 books".to_string(),
            is_error: false,
        });
        let frame = render_viewmodel(&vm, &Theme::default(), 24, 80);

        assert!(frame.contains("No books found"));
        assert!(frame.contains("school: north-high"));
        assert!(frame.contains("Deleted 2 books"));
        assert!(frame.contains("\u{1b}[23;1H"));
    }
}
