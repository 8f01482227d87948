use std::path::PathBuf;

use crate::buffer::TextBuffer;
use crate::json::is_valid_json;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneId {
    Left,
    Right,
}

impl PaneId {
    pub fn label(self) -> &'static str {
        match self {
            PaneId::Left => "v1",
            PaneId::Right => "v2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Pane(PaneId),
    Result,
}

impl Default for Focus {
    fn default() -> Self {
        Focus::Pane(PaneId::Left)
    }
}

impl Focus {
    /// Left -> Right -> Result -> Left
    pub fn next(self) -> Self {
        match self {
            Focus::Pane(PaneId::Left) => Focus::Pane(PaneId::Right),
            Focus::Pane(PaneId::Right) => Focus::Result,
            Focus::Result => Focus::Pane(PaneId::Left),
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Focus::Pane(PaneId::Left) => Focus::Result,
            Focus::Pane(PaneId::Right) => Focus::Pane(PaneId::Left),
            Focus::Result => Focus::Pane(PaneId::Right),
        }
    }

    pub fn pane(self) -> Option<PaneId> {
        match self {
            Focus::Pane(id) => Some(id),
            Focus::Result => None,
        }
    }
}

/// One editable input with its JSON flag and optional source file.
#[derive(Default)]
pub struct Pane {
    pub buffer: TextBuffer,
    pub is_json: bool,
    pub source: Option<PathBuf>,
}

impl Pane {
    pub fn set_text(&mut self, text: &str) {
        self.buffer = TextBuffer::from_text(text);
        self.refresh_json();
    }

    pub fn refresh_json(&mut self) {
        self.is_json = !self.buffer.is_empty() && is_valid_json(&self.buffer.text());
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Open(PaneId),
}

pub enum EditorState {
    Idle,
    Prompt {
        kind: PromptKind,
        buffer: String,
        cursor_pos: usize,
    },
    ShowingHelp,
}
