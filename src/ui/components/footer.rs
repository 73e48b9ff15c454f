//! Key hint bar.

use crate::ui::helpers::{self, position_cursor};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::FooterInfo;

/// Renders the centered, dimmed key hints. Overlong hints are truncated.
pub fn render_footer(out: &mut String, row: usize, footer: &FooterInfo, theme: &Theme, cols: usize) -> usize {
    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(&theme.colors.text_dim));
    helpers::centered(out, &footer.keybindings, cols);
    out.push_str(Theme::reset());
    row + 1
}
