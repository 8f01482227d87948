//! Editable multi-line text buffer backing one input pane.
//!
//! The cursor column is a character index into the current line, never a byte
//! offset. Scroll offsets are in lines (vertical) and display columns
//! (horizontal).

use crate::navigation::{find_next_word_boundary, find_prev_word_boundary, scroll_to_show};
use crate::text::char_index_to_visual_col;

#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<String>,
    pub cursor_row: usize,
    pub cursor_col: usize,
    pub scroll_row: usize,
    pub scroll_col: usize,
}

impl Default for TextBuffer {
    fn default() -> Self {
        TextBuffer {
            lines: vec![String::new()],
            cursor_row: 0,
            cursor_col: 0,
            scroll_row: 0,
            scroll_col: 0,
        }
    }
}

/// Convert CRLF and lone CR line endings to LF.
pub fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

fn byte_index(line: &str, char_index: usize) -> usize {
    line.char_indices()
        .nth(char_index)
        .map(|(i, _)| i)
        .unwrap_or(line.len())
}

impl TextBuffer {
    pub fn from_text(text: &str) -> Self {
        let mut buffer = TextBuffer::default();
        buffer.set_text(text);
        buffer
    }

    /// Replace the whole content and move the cursor to the top.
    pub fn set_text(&mut self, text: &str) {
        self.lines = normalize_newlines(text)
            .split('\n')
            .map(str::to_string)
            .collect();
        self.cursor_row = 0;
        self.cursor_col = 0;
        self.scroll_row = 0;
        self.scroll_col = 0;
    }

    pub fn clear(&mut self) {
        self.set_text("");
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn current_line(&self) -> &str {
        &self.lines[self.cursor_row]
    }

    fn current_len(&self) -> usize {
        self.lines[self.cursor_row].chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.len() == 1 && self.lines[0].is_empty()
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.newline();
            return;
        }
        let idx = byte_index(&self.lines[self.cursor_row], self.cursor_col);
        self.lines[self.cursor_row].insert(idx, c);
        self.cursor_col += 1;
    }

    /// Insert pasted text at the cursor. Line endings are normalised.
    pub fn insert_str(&mut self, text: &str) {
        let text = normalize_newlines(text);
        let mut parts = text.split('\n');

        let first = parts.next().unwrap_or("");
        let line = &mut self.lines[self.cursor_row];
        let idx = byte_index(line, self.cursor_col);
        let tail = line.split_off(idx);
        line.push_str(first);
        self.cursor_col += first.chars().count();

        for part in parts {
            self.cursor_row += 1;
            self.lines.insert(self.cursor_row, part.to_string());
            self.cursor_col = part.chars().count();
        }

        self.lines[self.cursor_row].push_str(&tail);
    }

    /// Split the current line at the cursor.
    pub fn newline(&mut self) {
        let line = &mut self.lines[self.cursor_row];
        let idx = byte_index(line, self.cursor_col);
        let tail = line.split_off(idx);
        self.cursor_row += 1;
        self.lines.insert(self.cursor_row, tail);
        self.cursor_col = 0;
    }

    /// Delete the character before the cursor, joining lines at column 0.
    pub fn backspace(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
            let line = &mut self.lines[self.cursor_row];
            let idx = byte_index(line, self.cursor_col);
            line.remove(idx);
        } else if self.cursor_row > 0 {
            let line = self.lines.remove(self.cursor_row);
            self.cursor_row -= 1;
            self.cursor_col = self.current_len();
            self.lines[self.cursor_row].push_str(&line);
        }
    }

    /// Delete the character under the cursor, joining with the next line at
    /// the end of a line.
    pub fn delete(&mut self) {
        if self.cursor_col < self.current_len() {
            let line = &mut self.lines[self.cursor_row];
            let idx = byte_index(line, self.cursor_col);
            line.remove(idx);
        } else if self.cursor_row + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_row + 1);
            self.lines[self.cursor_row].push_str(&next);
        }
    }

    pub fn move_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.current_len();
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor_col < self.current_len() {
            self.cursor_col += 1;
        } else if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_up(&mut self) {
        if self.cursor_row > 0 {
            self.cursor_row -= 1;
            self.cursor_col = self.cursor_col.min(self.current_len());
        }
    }

    pub fn move_down(&mut self) {
        if self.cursor_row + 1 < self.lines.len() {
            self.cursor_row += 1;
            self.cursor_col = self.cursor_col.min(self.current_len());
        }
    }

    pub fn move_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor_col = self.current_len();
    }

    pub fn move_top(&mut self) {
        self.cursor_row = 0;
        self.cursor_col = 0;
    }

    pub fn move_bottom(&mut self) {
        self.cursor_row = self.lines.len() - 1;
        self.cursor_col = self.current_len();
    }

    pub fn word_left(&mut self) {
        if self.cursor_col == 0 {
            self.move_left();
        } else {
            self.cursor_col = find_prev_word_boundary(self.current_line(), self.cursor_col);
        }
    }

    pub fn word_right(&mut self) {
        if self.cursor_col >= self.current_len() {
            self.move_right();
        } else {
            self.cursor_col = find_next_word_boundary(self.current_line(), self.cursor_col);
        }
    }

    pub fn page_up(&mut self, page: usize) {
        self.cursor_row = self.cursor_row.saturating_sub(page.max(1));
        self.cursor_col = self.cursor_col.min(self.current_len());
    }

    pub fn page_down(&mut self, page: usize) {
        self.cursor_row = (self.cursor_row + page.max(1)).min(self.lines.len() - 1);
        self.cursor_col = self.cursor_col.min(self.current_len());
    }

    /// Display column of the cursor within its line.
    pub fn cursor_visual_col(&self) -> usize {
        char_index_to_visual_col(self.current_line(), self.cursor_col)
    }

    /// Keep the cursor inside a viewport of `height` rows and `width` columns.
    pub fn scroll_into_view(&mut self, height: usize, width: usize) {
        self.scroll_row = scroll_to_show(self.cursor_row, self.scroll_row, height);
        self.scroll_col = scroll_to_show(self.cursor_visual_col(), self.scroll_col, width);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_text_splits_lines() {
        let buffer = TextBuffer::from_text("a\nb\n");
        assert_eq!(buffer.lines(), &["a", "b", ""]);
        assert_eq!(buffer.text(), "a\nb\n");
    }

    #[test]
    fn test_from_text_normalizes_crlf() {
        let buffer = TextBuffer::from_text("a\r\nb\rc");
        assert_eq!(buffer.text(), "a\nb\nc");
    }

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buffer = TextBuffer::default();
        assert_eq!(buffer.line_count(), 1);
        assert!(buffer.is_empty());
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn test_insert_char_multibyte() {
        let mut buffer = TextBuffer::from_text("пр");
        buffer.cursor_col = 1;
        buffer.insert_char('и');
        assert_eq!(buffer.text(), "пир");
        assert_eq!(buffer.cursor_col, 2);
    }

    #[test]
    fn test_newline_splits_line() {
        let mut buffer = TextBuffer::from_text("hello world");
        buffer.cursor_col = 5;
        buffer.newline();
        assert_eq!(buffer.lines(), &["hello", " world"]);
        assert_eq!((buffer.cursor_row, buffer.cursor_col), (1, 0));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut buffer = TextBuffer::from_text("ab\ncd");
        buffer.cursor_row = 1;
        buffer.cursor_col = 0;
        buffer.backspace();
        assert_eq!(buffer.text(), "abcd");
        assert_eq!((buffer.cursor_row, buffer.cursor_col), (0, 2));
    }

    #[test]
    fn test_backspace_at_origin_is_noop() {
        let mut buffer = TextBuffer::from_text("ab");
        buffer.backspace();
        assert_eq!(buffer.text(), "ab");
    }

    #[test]
    fn test_delete_joins_with_next_line() {
        let mut buffer = TextBuffer::from_text("ab\ncd");
        buffer.move_end();
        buffer.delete();
        assert_eq!(buffer.text(), "abcd");
    }

    #[test]
    fn test_delete_removes_char_under_cursor() {
        let mut buffer = TextBuffer::from_text("abc");
        buffer.cursor_col = 1;
        buffer.delete();
        assert_eq!(buffer.text(), "ac");
        assert_eq!(buffer.cursor_col, 1);
    }

    #[test]
    fn test_insert_str_multiline_paste() {
        let mut buffer = TextBuffer::from_text("start end");
        buffer.cursor_col = 6;
        buffer.insert_str("one\r\ntwo\nthree ");
        assert_eq!(buffer.text(), "start one\ntwo\nthree end");
        assert_eq!((buffer.cursor_row, buffer.cursor_col), (2, 6));
    }

    #[test]
    fn test_insert_str_single_line() {
        let mut buffer = TextBuffer::from_text("ac");
        buffer.cursor_col = 1;
        buffer.insert_str("b");
        assert_eq!(buffer.text(), "abc");
        assert_eq!(buffer.cursor_col, 2);
    }

    #[test]
    fn test_move_left_wraps_to_previous_line() {
        let mut buffer = TextBuffer::from_text("abc\nd");
        buffer.cursor_row = 1;
        buffer.move_left();
        assert_eq!((buffer.cursor_row, buffer.cursor_col), (0, 3));
    }

    #[test]
    fn test_move_right_wraps_to_next_line() {
        let mut buffer = TextBuffer::from_text("ab\ncd");
        buffer.move_end();
        buffer.move_right();
        assert_eq!((buffer.cursor_row, buffer.cursor_col), (1, 0));
    }

    #[test]
    fn test_move_down_clamps_column() {
        let mut buffer = TextBuffer::from_text("long line\nab");
        buffer.move_end();
        buffer.move_down();
        assert_eq!((buffer.cursor_row, buffer.cursor_col), (1, 2));
    }

    #[test]
    fn test_page_navigation_clamps() {
        let text = (0..50).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        let mut buffer = TextBuffer::from_text(&text);
        buffer.page_down(20);
        assert_eq!(buffer.cursor_row, 20);
        buffer.page_down(100);
        assert_eq!(buffer.cursor_row, 49);
        buffer.page_up(30);
        assert_eq!(buffer.cursor_row, 19);
        buffer.page_up(100);
        assert_eq!(buffer.cursor_row, 0);
    }

    #[test]
    fn test_word_motion_crosses_lines() {
        let mut buffer = TextBuffer::from_text("foo bar\nbaz");
        buffer.word_right();
        assert_eq!(buffer.cursor_col, 4);
        buffer.word_right();
        assert_eq!(buffer.cursor_col, 7);
        buffer.word_right();
        assert_eq!((buffer.cursor_row, buffer.cursor_col), (1, 0));
        buffer.word_left();
        assert_eq!((buffer.cursor_row, buffer.cursor_col), (0, 7));
        buffer.word_left();
        assert_eq!(buffer.cursor_col, 4);
    }

    #[test]
    fn test_move_bottom_and_top() {
        let mut buffer = TextBuffer::from_text("a\nbb\nccc");
        buffer.move_bottom();
        assert_eq!((buffer.cursor_row, buffer.cursor_col), (2, 3));
        buffer.move_top();
        assert_eq!((buffer.cursor_row, buffer.cursor_col), (0, 0));
    }

    #[test]
    fn test_scroll_into_view() {
        let text = (0..30).map(|_| "x".repeat(40)).collect::<Vec<_>>().join("\n");
        let mut buffer = TextBuffer::from_text(&text);
        buffer.cursor_row = 25;
        buffer.cursor_col = 35;
        buffer.scroll_into_view(10, 20);
        assert_eq!(buffer.scroll_row, 16);
        assert_eq!(buffer.scroll_col, 16);
    }

    #[test]
    fn test_cursor_visual_col_wide_chars() {
        let mut buffer = TextBuffer::from_text("你好x");
        buffer.cursor_col = 2;
        assert_eq!(buffer.cursor_visual_col(), 4);
    }

    #[test]
    fn test_clear_resets_cursor() {
        let mut buffer = TextBuffer::from_text("a\nb");
        buffer.move_bottom();
        buffer.clear();
        assert!(buffer.is_empty());
        assert_eq!((buffer.cursor_row, buffer.cursor_col), (0, 0));
    }
}
