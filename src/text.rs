use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Safely truncate text to visual width limit.
/// Returns string that fits within `max_width` visual columns.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for ch in text.chars() {
        let char_width = ch.width().unwrap_or(0);
        if current_width + char_width > max_width {
            break;
        }
        result.push(ch);
        current_width += char_width;
    }

    result
}

/// Horizontal window over styled pieces: drops the first `skip` visual
/// columns and keeps at most `width` columns after that. Wide characters cut
/// at the left edge become spaces; at the right edge they are dropped.
pub fn clip_styled<T: Copy>(pieces: &[(T, &str)], skip: usize, width: usize) -> Vec<(T, String)> {
    let mut result = Vec::new();
    let mut col = 0;
    let end = skip + width;

    for (style, text) in pieces {
        let mut visible = String::new();
        for ch in text.chars() {
            let char_width = ch.width().unwrap_or(0);
            let next = col + char_width;
            if next > end {
                break;
            }
            if col >= skip {
                visible.push(ch);
            } else if next > skip {
                visible.push_str(&" ".repeat(next - skip));
            }
            col = next;
        }
        if !visible.is_empty() {
            result.push((*style, visible));
        }
        if col >= end {
            break;
        }
    }

    result
}

/// Calculate visual column position of character at `char_index` in text.
/// Returns the visual width from start of text to the character position.
pub fn char_index_to_visual_col(text: &str, char_index: usize) -> usize {
    text.chars()
        .take(char_index)
        .map(|c| c.width().unwrap_or(0))
        .sum()
}

/// Calculate padding needed to reach visual width.
/// Returns number of spaces needed.
pub fn calculate_padding(current_text: &str, target_width: usize) -> usize {
    target_width.saturating_sub(current_text.width())
}

/// Hard-wraps styled pieces into rows of at most `width` visual columns.
/// Whitespace is kept as-is since it may be part of a difference. Adjacent
/// pieces with the same style are merged. Empty input yields one empty row.
pub fn wrap_styled<T: Copy + PartialEq>(pieces: &[(T, String)], width: usize) -> Vec<Vec<(T, String)>> {
    let width = width.max(1);
    let mut rows: Vec<Vec<(T, String)>> = Vec::new();
    let mut row: Vec<(T, String)> = Vec::new();
    let mut row_width = 0;

    for (style, text) in pieces {
        for ch in text.chars() {
            let char_width = ch.width().unwrap_or(0);
            if row_width + char_width > width && row_width > 0 {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            match row.last_mut() {
                Some((last_style, last_text)) if *last_style == *style => last_text.push(ch),
                _ => row.push((*style, ch.to_string())),
            }
            row_width += char_width;
        }
    }

    if !row.is_empty() || rows.is_empty() {
        rows.push(row);
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_width_ascii() {
        let text = "Hello World";
        assert_eq!(truncate_to_width(text, 5), "Hello");
        assert_eq!(truncate_to_width(text, 11), "Hello World");
        assert_eq!(truncate_to_width(text, 0), "");
    }

    #[test]
    fn test_truncate_to_width_emoji() {
        let text = "Hello 🎉 World";
        // "Hello " = 6 cols, 🎉 = 2 cols, so max 7 should give "Hello "
        assert_eq!(truncate_to_width(text, 7), "Hello ");
        assert_eq!(truncate_to_width(text, 8), "Hello 🎉");
    }

    #[test]
    fn test_truncate_to_width_cjk() {
        let text = "你好世界"; // Each CJK char = 2 visual columns
        assert_eq!(truncate_to_width(text, 5), "你好");
        assert_eq!(truncate_to_width(text, 3), "你");
    }

    #[test]
    fn test_clip_styled_window() {
        let pieces = [(1, "abc"), (2, "def")];
        assert_eq!(clip_styled(&pieces, 2, 3), vec![(1, "c".to_string()), (2, "de".to_string())]);
        assert_eq!(clip_styled(&pieces, 0, 10).len(), 2);
        assert!(clip_styled(&pieces, 6, 5).is_empty());
    }

    #[test]
    fn test_clip_styled_wide_chars_at_edges() {
        let pieces = [(0, "你好")];
        assert_eq!(clip_styled(&pieces, 1, 10), vec![(0, " 好".to_string())]);
        assert_eq!(clip_styled(&pieces, 0, 3), vec![(0, "你".to_string())]);
    }

    #[test]
    fn test_char_index_to_visual_col_mixed() {
        let text = "Hi你好"; // "Hi" = 2 cols + "你好" = 4 cols
        assert_eq!(char_index_to_visual_col(text, 0), 0);
        assert_eq!(char_index_to_visual_col(text, 2), 2);
        assert_eq!(char_index_to_visual_col(text, 3), 4);
        assert_eq!(char_index_to_visual_col(text, 4), 6);
    }

    #[test]
    fn test_char_index_to_visual_col_past_end() {
        assert_eq!(char_index_to_visual_col("ab", 10), 2);
    }

    #[test]
    fn test_calculate_padding_wide_chars() {
        let text = "你好"; // 2 chars = 4 visual columns
        assert_eq!(calculate_padding(text, 10), 6);
        assert_eq!(calculate_padding(text, 2), 0); // Saturating sub
    }

    #[test]
    fn test_wrap_styled_single_row() {
        let rows = wrap_styled(&[(1, "ab".to_string()), (2, "cd".to_string())], 10);
        assert_eq!(rows, vec![vec![(1, "ab".to_string()), (2, "cd".to_string())]]);
    }

    #[test]
    fn test_wrap_styled_breaks_inside_piece() {
        let rows = wrap_styled(&[(1, "abc".to_string()), (2, "defg".to_string())], 4);
        assert_eq!(
            rows,
            vec![
                vec![(1, "abc".to_string()), (2, "d".to_string())],
                vec![(2, "efg".to_string())],
            ]
        );
    }

    #[test]
    fn test_wrap_styled_merges_same_style() {
        let rows = wrap_styled(&[(1, "a".to_string()), (1, "b".to_string())], 10);
        assert_eq!(rows, vec![vec![(1, "ab".to_string())]]);
    }

    #[test]
    fn test_wrap_styled_empty() {
        let rows: Vec<Vec<(u8, String)>> = wrap_styled(&[], 10);
        assert_eq!(rows, vec![Vec::new()]);
    }

    #[test]
    fn test_wrap_styled_wide_chars() {
        let rows = wrap_styled(&[(0, "你好世".to_string())], 4);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec![(0, "世".to_string())]);
    }
}
