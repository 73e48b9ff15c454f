//! Placeholders shown instead of rows: the empty state and the loading indicator.

use crate::table::EmptyState;
use crate::ui::helpers::{self, position_cursor};
use crate::ui::theme::Theme;

/// Renders the message two rows below `row` and the subtitle under it.
pub fn render_empty_state(out: &mut String, row: usize, empty: &EmptyState, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row + 2, 1);
    out.push_str(&Theme::fg(&theme.colors.empty_state_fg));
    helpers::centered(out, &empty.message, cols);
    out.push_str(Theme::reset());

    position_cursor(out, row + 3, 1);
    out.push_str(Theme::dim());
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    helpers::centered(out, &empty.subtitle, cols);
    out.push_str(Theme::reset());

    row + 4
}

/// Renders the loading indicator. Rows and the empty state are suppressed while it shows.
pub fn render_loading(out: &mut String, row: usize, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row + 2, 1);
    out.push_str(Theme::dim());
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    helpers::centered(out, "Loading…", cols);
    out.push_str(Theme::reset());
    row + 3
}
