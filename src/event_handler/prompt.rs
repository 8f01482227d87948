//! Prompt event handler.
//!
//! Single-line text input at the bottom of the screen, used for the path of
//! a file to open. `cursor_pos` is a char index into the buffer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Result of handling key events in Prompt state.
#[derive(Debug, PartialEq, Eq)]
pub enum PromptResult {
    Continue,
    /// Enter pressed with the trimmed input
    Submit(String),
    Cancel,
}

fn byte_index(buffer: &str, char_pos: usize) -> usize {
    buffer
        .char_indices()
        .nth(char_pos)
        .map_or(buffer.len(), |(idx, _)| idx)
}

/// Handles key events in Prompt state.
/// Does NOT modify editor_state - returns a result that caller interprets.
pub fn handle_prompt_input(key: KeyEvent, buffer: &mut String, cursor_pos: &mut usize) -> PromptResult {
    let len = buffer.chars().count();
    *cursor_pos = (*cursor_pos).min(len);

    match (key.code, key.modifiers) {
        (KeyCode::Enter, _) => {
            let input = buffer.trim();
            if input.is_empty() {
                return PromptResult::Cancel;
            }
            return PromptResult::Submit(input.to_string());
        }
        (KeyCode::Esc, _) => return PromptResult::Cancel,
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => return PromptResult::Cancel,
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            buffer.insert(byte_index(buffer, *cursor_pos), c);
            *cursor_pos += 1;
        }
        (KeyCode::Backspace, _) => {
            if *cursor_pos > 0 {
                *cursor_pos -= 1;
                buffer.remove(byte_index(buffer, *cursor_pos));
            }
        }
        (KeyCode::Delete, _) => {
            if *cursor_pos < len {
                buffer.remove(byte_index(buffer, *cursor_pos));
            }
        }
        (KeyCode::Left, _) => *cursor_pos = cursor_pos.saturating_sub(1),
        (KeyCode::Right, _) => *cursor_pos = (*cursor_pos + 1).min(len),
        (KeyCode::Home, _) => *cursor_pos = 0,
        (KeyCode::End, _) => *cursor_pos = len,
        _ => {}
    }
    PromptResult::Continue
}

/// Inserts pasted text at the cursor. Newlines are dropped.
pub fn paste_into_prompt(text: &str, buffer: &mut String, cursor_pos: &mut usize) {
    let clean: String = text.chars().filter(|c| *c != '\n' && *c != '\r').collect();
    *cursor_pos = (*cursor_pos).min(buffer.chars().count());
    buffer.insert_str(byte_index(buffer, *cursor_pos), &clean);
    *cursor_pos += clean.chars().count();
}
