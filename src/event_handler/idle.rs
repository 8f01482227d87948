//! Idle mode event handler.
//!
//! Hotkeys work the same whatever has focus. Editing keys go to the focused
//! pane's buffer; when the result area has focus they scroll it instead.

use super::matches_ctrl_key;
use crate::buffer::TextBuffer;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Scroll request for the result area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultScroll {
    By(isize),
    Top,
    Bottom,
}

/// Result of handling key events in Idle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleModeResult {
    Continue,
    Exit,
    ShowHelp,
    ToggleTheme,
    FocusNext,
    FocusPrev,
    /// Prompt for a file to load into the focused pane
    OpenFile,
    ClearPane,
    FormatJson,
    CycleGranularity,
    ToggleDiffsOnly,
    ToggleLineNumbers,
    /// Focused pane text was edited; the comparison is stale
    TextChanged,
    ScrollResult(ResultScroll),
}

/// Handles key events in Idle state.
/// `buffer` is the focused pane, or `None` when the result area has focus.
/// `page` is the number of visible rows in the focused area.
pub fn handle_idle_mode(key: KeyEvent, buffer: Option<&mut TextBuffer>, page: usize) -> IdleModeResult {
    if let Some(result) = hotkey(&key) {
        return result;
    }

    match key.code {
        KeyCode::Tab => return IdleModeResult::FocusNext,
        KeyCode::BackTab => return IdleModeResult::FocusPrev,
        _ => {}
    }

    match buffer {
        Some(buffer) => edit_pane(key, buffer, page),
        None => scroll_result(key, page),
    }
}

fn hotkey(key: &KeyEvent) -> Option<IdleModeResult> {
    // Each entry: English letter and the Russian letter on the same physical key
    let bindings: [(&[char], IdleModeResult); 9] = [
        (&['x', 'ч'], IdleModeResult::Exit),
        (&['g', 'п'], IdleModeResult::ShowHelp),
        (&['t', 'е'], IdleModeResult::ToggleTheme),
        (&['o', 'щ'], IdleModeResult::OpenFile),
        (&['k', 'л'], IdleModeResult::ClearPane),
        (&['f', 'а'], IdleModeResult::FormatJson),
        (&['r', 'к'], IdleModeResult::CycleGranularity),
        (&['d', 'в'], IdleModeResult::ToggleDiffsOnly),
        (&['l', 'д'], IdleModeResult::ToggleLineNumbers),
    ];

    bindings
        .iter()
        .find(|(alternatives, _)| matches_ctrl_key(key, alternatives))
        .map(|(_, result)| *result)
}

fn edit_pane(key: KeyEvent, buffer: &mut TextBuffer, page: usize) -> IdleModeResult {
    match (key.code, key.modifiers) {
        (KeyCode::Char(c), KeyModifiers::NONE | KeyModifiers::SHIFT) => {
            buffer.insert_char(c);
            return IdleModeResult::TextChanged;
        }
        (KeyCode::Enter, _) => {
            buffer.newline();
            return IdleModeResult::TextChanged;
        }
        (KeyCode::Backspace, _) => {
            buffer.backspace();
            return IdleModeResult::TextChanged;
        }
        (KeyCode::Delete, _) => {
            buffer.delete();
            return IdleModeResult::TextChanged;
        }
        (KeyCode::PageUp, _) | (KeyCode::Up, KeyModifiers::ALT) => buffer.page_up(page),
        (KeyCode::PageDown, _) | (KeyCode::Down, KeyModifiers::ALT) => buffer.page_down(page),
        (KeyCode::Left, KeyModifiers::ALT) | (KeyCode::Left, KeyModifiers::CONTROL) => {
            buffer.word_left()
        }
        (KeyCode::Right, KeyModifiers::ALT) | (KeyCode::Right, KeyModifiers::CONTROL) => {
            buffer.word_right()
        }
        (KeyCode::Home, KeyModifiers::CONTROL) => buffer.move_top(),
        (KeyCode::End, KeyModifiers::CONTROL) => buffer.move_bottom(),
        (KeyCode::Left, _) => buffer.move_left(),
        (KeyCode::Right, _) => buffer.move_right(),
        (KeyCode::Up, _) => buffer.move_up(),
        (KeyCode::Down, _) => buffer.move_down(),
        (KeyCode::Home, _) => buffer.move_home(),
        (KeyCode::End, _) => buffer.move_end(),
        _ => {}
    }
    IdleModeResult::Continue
}

fn scroll_result(key: KeyEvent, page: usize) -> IdleModeResult {
    let page = page.max(1) as isize;
    let scroll = match (key.code, key.modifiers) {
        (KeyCode::PageUp, _) | (KeyCode::Up, KeyModifiers::ALT) => ResultScroll::By(-page),
        (KeyCode::PageDown, _) | (KeyCode::Down, KeyModifiers::ALT) => ResultScroll::By(page),
        (KeyCode::Up, _) => ResultScroll::By(-1),
        (KeyCode::Down, _) => ResultScroll::By(1),
        (KeyCode::Home, _) => ResultScroll::Top,
        (KeyCode::End, _) => ResultScroll::Bottom,
        _ => return IdleModeResult::Continue,
    };
    IdleModeResult::ScrollResult(scroll)
}
