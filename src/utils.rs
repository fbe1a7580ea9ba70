pub mod markdown;

use ratatui::text::Text;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Simulates ratatui's `Wrap { trim: true }` on `text`, breaking at explicit
/// newlines and at `max_width` columns. Returns `(line, start, end)` byte
/// ranges for every visual line.
fn simulate_wrapped_lines(text: &str, max_width: usize) -> Vec<(String, usize, usize)> {
    let max_width = max_width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut width = 0;
    let mut start = 0;

    for (idx, ch) in text.char_indices() {
        if ch == '\n' {
            lines.push((current.trim_end().to_string(), start, idx));
            current.clear();
            width = 0;
            start = idx + 1;
            continue;
        }
        let ch_width = ch.width().unwrap_or(1);
        if width + ch_width > max_width && width > 0 {
            lines.push((current.trim_end().to_string(), start, idx));
            current = ch.to_string();
            width = ch_width;
            start = idx;
        } else {
            current.push(ch);
            width += ch_width;
        }
    }

    if !current.is_empty() || text.ends_with('\n') {
        lines.push((current.trim_end().to_string(), start, text.len()));
    }
    lines
}

/// Line and display column of the byte offset `cursor_index` once `text` is
/// wrapped to `max_width`.
pub fn calculate_wrapped_cursor_position(
    text: &str,
    cursor_index: usize,
    max_width: usize,
) -> (usize, usize) {
    if text.is_empty() || cursor_index == 0 {
        return (0, 0);
    }

    let wrapped = simulate_wrapped_lines(text, max_width);
    for (line_idx, (_, start, end)) in wrapped.iter().enumerate() {
        if cursor_index >= *start && cursor_index <= *end {
            let column = text
                .get(*start..cursor_index)
                .map(|s| s.width())
                .unwrap_or(0);
            return (line_idx, column.min(max_width.max(1)));
        }
    }

    match wrapped.last() {
        Some((visible, _, _)) => (wrapped.len() - 1, visible.width()),
        None => (0, 0),
    }
}

/// Rows a wrapped `Text` takes at `width`, counting every line as at least
/// one row. Word wrapping can push this higher, so callers pad it.
pub fn estimate_text_height(text: &Text, width: usize) -> usize {
    let width = width.max(1);
    text.lines
        .iter()
        .map(|line| line.width().div_ceil(width).max(1))
        .sum()
}

pub fn calculate_max_scroll(content_height: usize, visible_height: usize) -> u16 {
    content_height
        .saturating_sub(visible_height)
        .min(u16::MAX as usize) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_empty_text() {
        assert_eq!(calculate_wrapped_cursor_position("", 0, 10), (0, 0));
    }

    #[test]
    fn test_cursor_single_line() {
        assert_eq!(calculate_wrapped_cursor_position("x + 2 = 5", 3, 20), (0, 3));
    }

    #[test]
    fn test_cursor_wraps_to_second_line() {
        let text = "Solve 3x + 4 = 19 for x";
        assert_eq!(calculate_wrapped_cursor_position(text, 15, 10), (1, 5));
    }

    #[test]
    fn test_cursor_at_end_of_exact_width() {
        let text = "0123456789";
        assert_eq!(calculate_wrapped_cursor_position(text, 10, 10), (0, 10));
        let text = "0123456789A";
        assert_eq!(calculate_wrapped_cursor_position(text, 11, 10), (1, 1));
    }

    #[test]
    fn test_cursor_after_newline() {
        assert_eq!(calculate_wrapped_cursor_position("2x = 8\nx = 4", 9, 20), (1, 2));
    }

    #[test]
    fn test_cursor_counts_display_width_not_bytes() {
        let text = "x² + y²";
        assert_eq!(calculate_wrapped_cursor_position(text, text.len(), 40), (0, 7));
    }

    #[test]
    fn test_explicit_newlines_split_lines() {
        let lines = simulate_wrapped_lines("Line 1\nLine 2\nLine 3", 20);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[2].0, "Line 3");
    }

    #[test]
    fn test_estimate_text_height() {
        let text = Text::from("0123456789A\n\nshort");
        assert_eq!(estimate_text_height(&text, 10), 4);
    }

    #[test]
    fn test_calculate_max_scroll() {
        assert_eq!(calculate_max_scroll(5, 10), 0);
        assert_eq!(calculate_max_scroll(25, 10), 15);
    }
}
