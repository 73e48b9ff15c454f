//! Search input box.

use crate::ui::helpers::{char_len, pad, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::SearchBarInfo;

/// Spaces left and right of the box.
const SEARCH_BOX_MARGIN: usize = 5;

/// Renders a three-line bordered box holding the query. Returns `row + 3`.
pub fn render_search_bar(out: &mut String, row: usize, search: &SearchBarInfo, theme: &Theme, cols: usize) -> usize {
    let box_width = cols.saturating_sub(SEARCH_BOX_MARGIN * 2);
    let inner_width = box_width.saturating_sub(2);
    let border = Theme::fg(&theme.colors.search_bar_border);

    position_cursor(out, row, 1);
    pad(out, SEARCH_BOX_MARGIN);
    out.push_str(&border);
    out.push('┌');
    out.push_str(&"─".repeat(inner_width));
    out.push('┐');
    out.push_str(Theme::reset());

    let caret = if search.is_typing { "█" } else { "" };
    let text = truncate(&format!(" Search: {}{caret}", search.query), inner_width);

    position_cursor(out, row + 1, 1);
    pad(out, SEARCH_BOX_MARGIN);
    out.push_str(&border);
    out.push('│');
    out.push_str(&Theme::fg(&theme.colors.text_normal));
    out.push_str(&text);
    pad(out, inner_width.saturating_sub(char_len(&text)));
    out.push_str(&border);
    out.push('│');
    out.push_str(Theme::reset());

    position_cursor(out, row + 2, 1);
    pad(out, SEARCH_BOX_MARGIN);
    out.push_str(&border);
    out.push('└');
    out.push_str(&"─".repeat(inner_width));
    out.push('┘');
    out.push_str(Theme::reset());

    row + 3
}
