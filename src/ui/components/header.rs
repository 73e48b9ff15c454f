//! Title bar and screen tabs.

use crate::ui::helpers::{self, char_len, pad, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::HeaderInfo;

/// Renders the centered title at `row`. Returns the next row.
pub fn render_header(out: &mut String, row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(Theme::bold());
    out.push_str(&Theme::fg(&theme.colors.header_fg));
    if let Some(bg) = &theme.colors.header_bg {
        out.push_str(&Theme::bg(bg));
    }
    helpers::centered(out, &header.title, cols);
    out.push_str(Theme::reset());
    row + 1
}

/// Renders the tab strip with the signed-in school right-aligned.
pub fn render_tabs(out: &mut String, row: usize, header: &HeaderInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);

    let mut used = 0;
    for tab in &header.tabs {
        let label = format!(" {} ", tab.label);
        if tab.active {
            out.push_str(Theme::bold());
            out.push_str(Theme::underline());
            out.push_str(&Theme::fg(&theme.colors.accent));
        } else {
            out.push_str(&Theme::fg(&theme.colors.text_dim));
        }
        out.push_str(&label);
        out.push_str(Theme::reset());
        out.push(' ');
        used += char_len(&label) + 1;
    }

    let school = header
        .school
        .as_ref()
        .map_or_else(|| "signed out".to_string(), |s| format!("school: {s}"));
    let school_len = char_len(&school);
    if used + school_len < cols {
        pad(out, cols - used - school_len);
        out.push_str(&Theme::fg(&theme.colors.text_dim));
        out.push_str(&school);
        out.push_str(Theme::reset());
    }
    row + 1
}
