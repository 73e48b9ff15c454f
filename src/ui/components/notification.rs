//! One-line transient notification.

use crate::ui::helpers::{char_len, pad, position_cursor, truncate};
use crate::ui::theme::Theme;
use crate::ui::viewmodel::NotificationInfo;

pub fn render_notification(
    out: &mut String,
    row: usize,
    notification: &NotificationInfo,
    theme: &Theme,
    cols: usize,
) -> usize {
    let (color, prefix) = if notification.is_error {
        (&theme.colors.error, " ✗ ")
    } else {
        (&theme.colors.notice, " ✓ ")
    };
    let text = truncate(&format!("{prefix}{}", notification.message), cols);

    position_cursor(out, row, 1);
    out.push_str(&Theme::fg(color));
    out.push_str(&text);
    pad(out, cols.saturating_sub(char_len(&text)));
    out.push_str(Theme::reset());
    row + 1
}
