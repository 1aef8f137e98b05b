use std::error::Error;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for the detail overlay.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Combine the top-level message with the innermost cause, which is usually
/// the one SQLite produced.
pub(crate) fn surface_error(err: &(dyn Error + 'static)) -> String {
    let mut root = err;
    let mut depth = 0;
    while let Some(source) = root.source() {
        root = source;
        depth += 1;
    }
    if depth == 0 {
        err.to_string()
    } else {
        format!("{err}: {root}")
    }
}

/// Word-wrap `text` to `width` columns without splitting words. Always returns
/// at least one line.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec![text.to_string()];
    }

    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        if current_len == 0 {
            current = word.to_string();
            current_len = word_len;
        } else if current_len + 1 + word_len <= width {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
            current_len = word_len;
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    if lines.is_empty() {
        lines.push(String::new());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::StoreError;

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text("In the beginning was the Word", 12);
        assert_eq!(lines, vec!["In the", "beginning", "was the Word"]);
    }

    #[test]
    fn wrap_counts_characters_not_bytes() {
        let lines = wrap_text("εν αρχη ην ο λογος", 10);
        assert_eq!(lines, vec!["εν αρχη ην", "ο λογος"]);
    }

    #[test]
    fn wrap_of_empty_text_is_one_blank_line() {
        assert_eq!(wrap_text("", 20), vec![String::new()]);
    }

    #[test]
    fn surface_error_appends_root_cause() {
        let err = StoreError::Query(rusqlite::Error::QueryReturnedNoRows);
        let text = surface_error(&err);
        assert!(text.starts_with("verse database query failed: "));

        let plain = StoreError::Poisoned;
        assert_eq!(
            surface_error(&plain),
            "verse database connection lock was poisoned"
        );
    }
}
