//! Shared rendering utilities.
//!
//! Every renderer writes into a `String` frame buffer instead of stdout; the
//! plugin prints the finished frame once. All widths and highlight ranges are
//! counted in characters, never bytes.

use crate::ui::theme::Theme;
use std::fmt::Write as _;

/// Moves the cursor to `row`/`col` (1-indexed).
pub fn position_cursor(out: &mut String, row: usize, col: usize) {
    let _ = write!(out, "\u{1b}[{row};{col}H");
}

/// Number of characters in `text`.
#[must_use]
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Cuts `text` to `width` characters, ending in `…` when shortened.
#[must_use]
pub fn truncate(text: &str, width: usize) -> String {
    if char_len(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(width - 1).collect();
    cut.push('…');
    cut
}

/// Clips highlight ranges to the first `limit` characters.
#[must_use]
pub fn clip_ranges(ranges: &[(usize, usize)], limit: usize) -> Vec<(usize, usize)> {
    ranges
        .iter()
        .filter(|&&(start, _)| start < limit)
        .map(|&(start, end)| (start, end.min(limit)))
        .collect()
}

/// Appends `count` spaces.
pub fn pad(out: &mut String, count: usize) {
    out.extend(std::iter::repeat(' ').take(count));
}

/// Writes `text` centered in a line of `cols` characters.
pub fn centered(out: &mut String, text: &str, cols: usize) {
    let text = truncate(text, cols);
    let len = char_len(&text);
    let left = cols.saturating_sub(len) / 2;
    pad(out, left);
    out.push_str(&text);
    pad(out, cols.saturating_sub(left + len));
}

/// Writes `text` with the character ranges in `ranges` highlighted.
///
/// `restore` is re-emitted after each highlight so the surrounding style
/// (e.g. the focused-row background) continues. Ranges past the end of the
/// text are clipped.
pub fn render_highlighted_text(
    out: &mut String,
    text: &str,
    ranges: &[(usize, usize)],
    theme: &Theme,
    restore: &str,
) {
    if ranges.is_empty() {
        out.push_str(text);
        return;
    }

    let chars: Vec<char> = text.chars().collect();
    let mut current_pos = 0;

    for &(start, end) in ranges {
        let start = start.min(chars.len()).max(current_pos);
        let end = end.min(chars.len());
        if start >= end {
            continue;
        }

        out.extend(&chars[current_pos..start]);
        out.push_str(&Theme::fg(&theme.colors.match_highlight_fg));
        out.push_str(&Theme::bg(&theme.colors.match_highlight_bg));
        out.extend(&chars[start..end]);
        out.push_str(Theme::reset());
        out.push_str(restore);

        current_pos = end;
    }

    out.extend(&chars[current_pos..]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_characters() {
        assert_eq!(truncate("Zoë Müller", 20), "Zoë Müller");
        assert_eq!(truncate("Zoë Müller", 4), "Zoë…");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn clipping_drops_and_shortens_ranges() {
        assert_eq!(clip_ranges(&[(0, 2), (3, 6), (9, 12)], 4), vec![(0, 2), (3, 4)]);
    }

    #[test]
    fn centered_text_fills_the_line() {
        let mut out = String::new();
        centered(&mut out, "ab", 6);
        assert_eq!(out, "  ab  ");
    }

    #[test]
    fn highlights_are_clipped_to_the_text() {
        let theme = Theme::default();
        let mut out = String::new();
        render_highlighted_text(&mut out, "Dune", &[(1, 2), (3, 9)], &theme, "");

        let plain: String = out
            .split('\u{1b}')
            .map(|part| part.split_once('m').map_or(part, |(_, rest)| rest))
            .collect();
        assert_eq!(plain, "Dune");
        assert_eq!(out.matches(Theme::reset()).count(), 2);
    }

    #[test]
    fn cursor_escape_is_one_indexed() {
        let mut out = String::new();
        position_cursor(&mut out, 3, 1);
        assert_eq!(out, "\u{1b}[3;1H");
    }
}
