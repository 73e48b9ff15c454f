//! Table body: column headers, rows, selection bar and pager line.
//!
//! Each row is laid out as
//!
//! ```text
//! [x] CELL…          CELL            CELL    [Action] [Action]
//! ```
//!
//! Cells are truncated to their column width class. The focused row is drawn
//! in the selection colors across the full terminal width.

use crate::table::{ActionButton, PaginationControls, PopulatedTable, RowView, SelectionBar};
use crate::ui::helpers::{self, char_len, pad, position_cursor, truncate};
use crate::ui::theme::Theme;

/// Width of the `[x] ` checkbox column.
const CHECKBOX_WIDTH: usize = 4;

/// Spaces between columns.
const GAP: usize = 2;

const fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

fn render_buttons(out: &mut String, buttons: &[ActionButton], theme: &Theme, restore: &str) -> usize {
    let mut used = 0;
    for button in buttons {
        if !button.enabled {
            out.push_str(Theme::dim());
        }
        out.push_str(&Theme::fg(theme.button_color(button.variant, button.enabled)));
        let label = format!("[{}]", button.label);
        out.push_str(&label);
        out.push_str(Theme::reset());
        out.push_str(restore);
        out.push(' ');
        used += char_len(&label) + 1;
    }
    used
}

/// Renders the header row with sort markers. Returns the next row.
pub fn render_table_headers(out: &mut String, row: usize, table: &PopulatedTable, theme: &Theme, cols: usize) -> usize {
    let selectable = table.rows.first().is_some_and(|r| r.selected.is_some());

    position_cursor(out, row, 1);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.header_fg));

    let mut used = 0;
    if selectable {
        out.push_str(checkbox(table.all_selected));
        out.push(' ');
        used += CHECKBOX_WIDTH;
    }

    for header in &table.headers {
        let width = header.size.width();
        let label = header.sort.map_or_else(
            || header.label.to_uppercase(),
            |direction| format!("{} {}", header.label.to_uppercase(), direction.marker()),
        );
        let label = truncate(&label, width);
        if header.sort.is_some() {
            out.push_str(&Theme::fg(&theme.colors.accent));
        }
        out.push_str(&label);
        out.push_str(&Theme::fg(&theme.colors.header_fg));
        pad(out, width.saturating_sub(char_len(&label)) + GAP);
        used += width + GAP;
    }

    if table.rows.iter().any(|r| !r.actions.is_empty()) {
        out.push_str("ACTIONS");
        used += "ACTIONS".len();
    }

    pad(out, cols.saturating_sub(used));
    out.push_str(Theme::reset());
    row + 1
}

/// Renders every row in `rows`. Returns the row after the last one.
pub fn render_table_rows(out: &mut String, row: usize, rows: &[RowView], theme: &Theme, cols: usize) -> usize {
    let mut current_row = row;
    for item in rows {
        current_row = render_table_row(out, current_row, item, theme, cols);
    }
    current_row
}

fn render_table_row(out: &mut String, row: usize, item: &RowView, theme: &Theme, cols: usize) -> usize {
    let base = if item.focused {
        format!("{}{}", Theme::fg(&theme.colors.selection_fg), Theme::bg(&theme.colors.selection_bg))
    } else {
        Theme::fg(&theme.colors.text_normal)
    };

    position_cursor(out, row, 1);
    out.push_str(&base);

    let mut used = 0;
    if let Some(selected) = item.selected {
        if selected && !item.focused {
            out.push_str(&Theme::fg(&theme.colors.accent));
        }
        out.push_str(checkbox(selected));
        out.push_str(&base);
        out.push(' ');
        used += CHECKBOX_WIDTH;
    }

    for cell in &item.cells {
        let width = cell.size.width();
        let text = truncate(&cell.text, width);
        // The ellipsis of a cut cell is never highlighted.
        let visible = if char_len(&text) < char_len(&cell.text) {
            width.saturating_sub(1)
        } else {
            usize::MAX
        };
        let ranges = helpers::clip_ranges(&cell.highlight_ranges, visible);
        helpers::render_highlighted_text(out, &text, &ranges, theme, &base);
        pad(out, width.saturating_sub(char_len(&text)) + GAP);
        used += width + GAP;
    }

    used += render_buttons(out, &item.actions, theme, &base);

    pad(out, cols.saturating_sub(used));
    out.push_str(Theme::reset());
    row + 1
}

/// Renders the selection count and bulk actions, or a blank line without a selection.
pub fn render_selection_bar(
    out: &mut String,
    row: usize,
    bar: Option<&SelectionBar>,
    theme: &Theme,
    cols: usize,
) -> usize {
    position_cursor(out, row, 1);
    let Some(bar) = bar else {
        pad(out, cols);
        return row + 1;
    };

    let count = format!(" {} selected  ", bar.count);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.accent));
    out.push_str(&count);
    out.push_str(Theme::reset());

    let mut used = char_len(&count);
    used += render_buttons(out, &bar.bulk_actions, theme, "");

    let hint = " b: apply  c: clear";
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    out.push_str(hint);
    out.push_str(Theme::reset());
    used += char_len(hint);

    pad(out, cols.saturating_sub(used));
    row + 1
}

/// Renders the pager line plus scroll hints for rows outside the window.
pub fn render_status_line(
    out: &mut String,
    row: usize,
    pagination: Option<&PaginationControls>,
    (above, below): (usize, usize),
    theme: &Theme,
    cols: usize,
) -> usize {
    let mut line = String::new();
    if let Some(p) = pagination {
        let previous = if p.previous_enabled { "◀ h" } else { "   " };
        let next = if p.next_enabled { "l ▶" } else { "   " };
        line = format!(
            "{previous}  Page {} of {}  ·  {} records  ·  {} per page  {next}",
            p.page, p.last_page, p.total, p.page_size
        );
    }
    if above > 0 {
        line.push_str(&format!("  ↑{above}"));
    }
    if below > 0 {
        line.push_str(&format!("  ↓{below}"));
    }

    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    helpers::centered(out, &line, cols);
    out.push_str(Theme::reset());
    row + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{ButtonVariant, CellView, ColumnSize};

    fn row(focused: bool) -> RowView {
        RowView {
            cells: vec![CellView {
                text: "The Left Hand of Darkness".to_string(),
                size: ColumnSize::Sm,
                highlight_ranges: Vec::new(),
            }],
            selected: Some(true),
            focused,
            actions: vec![ActionButton {
                label: "Issue".to_string(),
                variant: ButtonVariant::Primary,
                enabled: false,
            }],
        }
    }

    #[test]
    fn row_shows_checkbox_truncated_cell_and_buttons() {
        let theme = Theme::default();
        let mut out = String::new();
        let next = render_table_rows(&mut out, 5, &[row(false)], &theme, 80);

        assert_eq!(next, 6);
        assert!(out.starts_with("\u{1b}[5;1H"));
        assert!(out.contains("[x]"));
        assert!(out.contains("The Left …"));
        assert!(out.contains("[Issue]"));
        assert!(out.contains(&Theme::fg(&theme.colors.disabled)));
    }

    #[test]
    fn highlights_stop_before_the_ellipsis() {
        let theme = Theme::default();
        let highlight = Theme::bg(&theme.colors.match_highlight_bg);

        let mut hidden = row(false);
        hidden.cells[0].highlight_ranges = vec![(9, 13)];
        let mut out = String::new();
        render_table_rows(&mut out, 1, &[hidden], &theme, 80);
        assert!(!out.contains(&highlight));
        assert!(out.contains("The Left …"));

        let mut visible = row(false);
        visible.cells[0].highlight_ranges = vec![(4, 13)];
        let mut out = String::new();
        render_table_rows(&mut out, 1, &[visible], &theme, 80);
        assert!(out.contains(&format!("{highlight}Left ")));
        assert!(!out.contains(&format!("{highlight}Left …")));
    }

    #[test]
    fn focused_row_uses_selection_background() {
        let theme = Theme::default();
        let mut out = String::new();
        render_table_rows(&mut out, 1, &[row(true)], &theme, 80);
        assert!(out.contains(&Theme::bg(&theme.colors.selection_bg)));
    }

    #[test]
    fn status_line_shows_page_and_hidden_rows() {
        let theme = Theme::default();
        let controls = PaginationControls {
            page: 2,
            last_page: 3,
            page_size: 10,
            total: 25,
            previous_enabled: true,
            next_enabled: true,
        };
        let mut out = String::new();
        render_status_line(&mut out, 1, Some(&controls), (0, 4), &theme, 120);
        assert!(out.contains("Page 2 of 3"));
        assert!(out.contains("25 records"));
        assert!(out.contains("↓4"));
        assert!(!out.contains('↑'));
    }
}
