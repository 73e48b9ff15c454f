//! Component renderers, one per screen region.
//!
//! Every component writes into the frame buffer at an absolute row and
//! returns the next free row. [`render_frame`] stacks them:
//!
//! ```text
//! [blank]
//! [Header]
//! [Tabs                                school]
//! [Border]
//! [Search bar, 3 lines, search mode only]
//! [Table headers]
//! [Rows | Loading… | Empty state]
//! ...
//! [Selection bar]
//! [Pager line]
//! [Notification]
//! [Border]
//! [Footer]
//! ```

mod empty;
mod footer;
mod header;
mod notification;
mod search;
mod table;

use crate::table::TableViewModel;
use crate::ui::helpers::position_cursor;
use crate::ui::theme::Theme;
use crate::ui::viewmodel::UIViewModel;

use empty::{render_empty_state, render_loading};
use footer::render_footer;
use header::{render_header, render_tabs};
use notification::render_notification;
use search::render_search_bar;
use table::{render_selection_bar, render_status_line, render_table_headers, render_table_rows};

/// Rows taken by everything except table rows.
pub const CHROME_ROWS: usize = 11;

/// Extra rows taken by the search bar.
pub const SEARCH_BAR_ROWS: usize = 3;

fn render_border(out: &mut String, row: usize, color: &str, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(color));
    out.push_str(&"─".repeat(cols));
    out.push_str(Theme::reset());
    row + 1
}

/// Renders a complete frame of `rows` × `cols`.
pub fn render_frame(out: &mut String, vm: &UIViewModel, theme: &Theme, rows: usize, cols: usize) {
    let mut current_row = 2;

    current_row = render_header(out, current_row, &vm.header, theme, cols);
    current_row = render_tabs(out, current_row, &vm.header, theme, cols);
    current_row = render_border(out, current_row, &theme.colors.border, cols);

    if let Some(search) = &vm.search_bar {
        current_row = render_search_bar(out, current_row, search, theme, cols);
    }

    let footer_row = rows.saturating_sub(1);
    let border_row = footer_row.saturating_sub(1);
    let notification_row = border_row.saturating_sub(1);
    let status_row = notification_row.saturating_sub(1);
    let selection_row = status_row.saturating_sub(1);

    match &vm.table {
        TableViewModel::Loading => {
            render_loading(out, current_row, theme, cols);
        }
        TableViewModel::Empty(empty) => {
            render_empty_state(out, current_row, empty, theme, cols);
        }
        TableViewModel::Populated(table) => {
            current_row = render_table_headers(out, current_row, table, theme, cols);
            render_table_rows(out, current_row, &table.rows, theme, cols);
            render_selection_bar(out, selection_row, table.selection_bar.as_ref(), theme, cols);
            render_status_line(
                out,
                status_row,
                table.pagination.as_ref(),
                (vm.rows_above, vm.rows_below),
                theme,
                cols,
            );
        }
    }

    if let Some(notification) = &vm.notification {
        render_notification(out, notification_row, notification, theme, cols);
    }
    render_border(out, border_row, &theme.colors.border, cols);
    render_footer(out, footer_row, &vm.footer, theme, cols);
}
