//! Event handler module for keyboard input processing.
//!
//! This module handles keyboard events for different editor states:
//! - Idle mode: hotkeys, pane editing and result scrolling
//! - Prompt mode: entering the path of a file to open

mod idle;
mod prompt;

pub use idle::{handle_idle_mode, IdleModeResult, ResultScroll};
pub use prompt::{handle_prompt_input, paste_into_prompt, PromptResult};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

// ============================================================================
// Multi-Hotkey Helper for Keyboard Layout Independence
// ============================================================================

/// Check if a key event matches Ctrl+<one of the alternatives>.
/// This enables hotkeys to work across different keyboard layouts (EN/RU/etc.).
///
/// For example, matches_ctrl_key(&key, &['x', 'ч']) will return true if:
/// - English layout: Ctrl+X pressed (produces 'x')
/// - Russian layout: Ctrl+X physical key pressed (produces 'ч')
pub(crate) fn matches_ctrl_key(key: &KeyEvent, alternatives: &[char]) -> bool {
    if key.modifiers != KeyModifiers::CONTROL {
        return false;
    }
    if let KeyCode::Char(c) = key.code {
        let c_lower = c.to_lowercase().next().unwrap_or(c);
        alternatives.contains(&c_lower)
    } else {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_ctrl_key_latin() {
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert!(matches_ctrl_key(&key, &['x', 'ч']));
    }

    #[test]
    fn test_matches_ctrl_key_cyrillic() {
        let key = KeyEvent::new(KeyCode::Char('ч'), KeyModifiers::CONTROL);
        assert!(matches_ctrl_key(&key, &['x', 'ч']));
    }

    #[test]
    fn test_matches_ctrl_key_uppercase() {
        // Some terminals report Ctrl+letter with caps lock as uppercase
        let key = KeyEvent::new(KeyCode::Char('X'), KeyModifiers::CONTROL);
        assert!(matches_ctrl_key(&key, &['x', 'ч']));
    }

    #[test]
    fn test_matches_ctrl_key_no_match() {
        let key = KeyEvent::new(KeyCode::Char('a'), KeyModifiers::CONTROL);
        assert!(!matches_ctrl_key(&key, &['x', 'ч']));
    }

    #[test]
    fn test_matches_ctrl_key_no_modifier() {
        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert!(!matches_ctrl_key(&key, &['x', 'ч']));
    }

    #[test]
    fn test_matches_ctrl_key_with_shift() {
        let key = KeyEvent::new(
            KeyCode::Char('x'),
            KeyModifiers::CONTROL | KeyModifiers::SHIFT,
        );
        assert!(!matches_ctrl_key(&key, &['x', 'ч']));
    }

    #[test]
    fn test_matches_ctrl_key_wrong_keycode_type() {
        let key = KeyEvent::new(KeyCode::Enter, KeyModifiers::CONTROL);
        assert!(!matches_ctrl_key(&key, &['x', 'ч']));
    }
}
