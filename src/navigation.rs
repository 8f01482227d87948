//! Cursor and scroll logic as pure functions for testability.
//!
//! Nothing in here touches the terminal; callers pass in the visible sizes.

// ============================================================================
// Scrolling
// ============================================================================

/// Adjust a scroll offset so that `cursor` lies inside a window of `visible`
/// rows (or columns). Returns the new offset.
pub fn scroll_to_show(cursor: usize, scroll: usize, visible: usize) -> usize {
    if visible == 0 {
        return cursor;
    }
    if cursor < scroll {
        cursor
    } else if cursor >= scroll + visible {
        cursor + 1 - visible
    } else {
        scroll
    }
}

/// Largest scroll offset that still fills the window.
pub fn max_scroll(total: usize, visible: usize) -> usize {
    total.saturating_sub(visible)
}

/// Move a scroll offset by `delta` rows, clamped to `[0, max_scroll]`.
pub fn scroll_by(scroll: usize, delta: isize, total: usize, visible: usize) -> usize {
    let target = if delta < 0 {
        scroll.saturating_sub(delta.unsigned_abs())
    } else {
        scroll.saturating_add(delta as usize)
    };
    target.min(max_scroll(total, visible))
}

// ============================================================================
// Word Navigation
// ============================================================================

/// Check if a character is a word boundary (whitespace or punctuation).
/// Underscores count as word characters.
fn is_word_boundary(c: char) -> bool {
    !(c.is_alphanumeric() || c == '_')
}

/// Find the start of the previous word from cursor position (char index).
/// Returns 0 if at the start of the line.
pub fn find_prev_word_boundary(line: &str, cursor_pos: usize) -> usize {
    let chars: Vec<char> = line.chars().collect();
    let mut pos = cursor_pos.min(chars.len());

    // Skip boundaries directly before the cursor, then the word itself
    while pos > 0 && is_word_boundary(chars[pos - 1]) {
        pos -= 1;
    }
    while pos > 0 && !is_word_boundary(chars[pos - 1]) {
        pos -= 1;
    }

    pos
}

/// Find the start of the next word from cursor position (char index).
/// Returns the line length if there is no further word.
pub fn find_next_word_boundary(line: &str, cursor_pos: usize) -> usize {
    let chars: Vec<char> = line.chars().collect();
    let mut pos = cursor_pos.min(chars.len());

    while pos < chars.len() && !is_word_boundary(chars[pos]) {
        pos += 1;
    }
    while pos < chars.len() && is_word_boundary(chars[pos]) {
        pos += 1;
    }

    pos
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod scroll_tests {
    use super::*;

    #[test]
    fn test_scroll_cursor_visible() {
        assert_eq!(scroll_to_show(5, 0, 10), 0);
    }

    #[test]
    fn test_scroll_cursor_above() {
        assert_eq!(scroll_to_show(3, 8, 10), 3);
    }

    #[test]
    fn test_scroll_cursor_below() {
        assert_eq!(scroll_to_show(15, 0, 10), 6);
    }

    #[test]
    fn test_scroll_cursor_at_last_visible_row() {
        assert_eq!(scroll_to_show(9, 0, 10), 0);
        assert_eq!(scroll_to_show(10, 0, 10), 1);
    }

    #[test]
    fn test_scroll_zero_height() {
        assert_eq!(scroll_to_show(4, 0, 0), 4);
    }

    #[test]
    fn test_max_scroll() {
        assert_eq!(max_scroll(100, 20), 80);
        assert_eq!(max_scroll(5, 20), 0);
    }

    #[test]
    fn test_scroll_by_clamps() {
        assert_eq!(scroll_by(0, -5, 100, 20), 0);
        assert_eq!(scroll_by(10, 5, 100, 20), 15);
        assert_eq!(scroll_by(78, 10, 100, 20), 80);
        assert_eq!(scroll_by(3, 1, 10, 20), 0);
    }
}
