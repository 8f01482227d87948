use crate::compare::{compare, CompareOptions, DiffResult, Granularity};
use crate::config::Config;
use crate::event_handler::{self, IdleModeResult, PromptResult, ResultScroll};
use crate::file;
use crate::highlighting::SyntaxHighlighter;
use crate::json;
use crate::models::{EditorState, Focus, Pane, PaneId, PromptKind};
use crate::navigation::{max_scroll, scroll_by};
use crate::report::{build_rows, Row};
use crate::theme::Theme;
use crate::ui::{self, Layout};
use crossterm::{
    cursor::{Hide, Show},
    event::{self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::{debug, info};
use std::io;
use std::path::Path;

pub struct Editor {
    pub left: Pane,
    pub right: Pane,
    pub focus: Focus,
    pub options: CompareOptions,
    pub show_line_numbers: bool,
    pub theme: Theme,
    pub highlighter: SyntaxHighlighter,
    /// Comparison of the current pane texts under the current options
    pub result: DiffResult,
    /// `result` mapped to display rows
    pub rows: Vec<Row>,
    /// First visible visual line of the result area
    pub result_scroll: usize,
    /// What input mode the user is in (Idle, Prompt, ShowingHelp)
    pub editor_state: EditorState,
    /// Message to display in status bar (clears on next action)
    pub status_message: Option<String>,
}

impl Editor {
    pub fn new(config: &Config) -> Self {
        let mut editor = Editor {
            left: Pane::default(),
            right: Pane::default(),
            focus: Focus::default(),
            options: config.compare_options(),
            show_line_numbers: config.show_line_numbers,
            theme: config.theme,
            highlighter: SyntaxHighlighter::new(config.theme.is_dark()),
            result: DiffResult::default(),
            rows: Vec::new(),
            result_scroll: 0,
            editor_state: EditorState::Idle,
            status_message: None,
        };
        editor.recompute();
        editor
    }

    pub fn pane(&self, id: PaneId) -> &Pane {
        match id {
            PaneId::Left => &self.left,
            PaneId::Right => &self.right,
        }
    }

    pub fn pane_mut(&mut self, id: PaneId) -> &mut Pane {
        match id {
            PaneId::Left => &mut self.left,
            PaneId::Right => &mut self.right,
        }
    }

    /// Re-run the comparison. Called after every change to text or options.
    pub fn recompute(&mut self) {
        self.result = compare(&self.left.buffer.text(), &self.right.buffer.text(), &self.options);
        self.rows = build_rows(&self.result, self.options.show_only_diffs);
        self.result_scroll = self.result_scroll.min(self.rows.len().saturating_sub(1));
    }

    pub fn set_text(&mut self, id: PaneId, text: &str) {
        self.pane_mut(id).set_text(text);
        self.recompute();
    }

    pub fn load_file(&mut self, id: PaneId, path: &Path) -> io::Result<()> {
        let content = file::read_text(path)?;
        let pane = self.pane_mut(id);
        pane.set_text(&content);
        pane.source = Some(path.to_path_buf());
        self.status_message = Some(format!("Loaded {} into {}", file::display_name(path), id.label()));
        self.recompute();
        Ok(())
    }

    pub fn clear(&mut self, id: PaneId) {
        let pane = self.pane_mut(id);
        pane.buffer.clear();
        pane.source = None;
        pane.refresh_json();
        self.recompute();
    }

    /// Pretty print the pane's JSON in place. Leaves non-JSON text alone.
    pub fn format_json(&mut self, id: PaneId) {
        if !self.pane(id).is_json {
            self.status_message = Some(format!("{} is not valid JSON", id.label()));
            return;
        }
        match json::format_json(&self.pane(id).buffer.text()) {
            Ok(formatted) => self.set_text(id, &formatted),
            Err(err) => self.status_message = Some(err.to_string()),
        }
    }

    pub fn set_granularity(&mut self, granularity: Granularity) {
        self.options.granularity = granularity;
        self.recompute();
    }

    pub fn cycle_granularity(&mut self) {
        self.set_granularity(self.options.granularity.next());
        self.status_message = Some(format!("Compare by: {}", self.options.granularity));
    }

    pub fn toggle_show_only_diffs(&mut self) {
        self.options.show_only_diffs = !self.options.show_only_diffs;
        self.result_scroll = 0;
        self.recompute();
    }

    pub fn toggle_line_numbers(&mut self) {
        self.show_line_numbers = !self.show_line_numbers;
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.highlighter = SyntaxHighlighter::new(self.theme.is_dark());
    }

    /// Bracketed paste goes to the prompt when one is open, else to the
    /// focused pane.
    pub fn paste(&mut self, text: &str) {
        if let EditorState::Prompt {
            buffer, cursor_pos, ..
        } = &mut self.editor_state
        {
            event_handler::paste_into_prompt(text, buffer, cursor_pos);
            return;
        }
        if let Some(id) = self.focus.pane() {
            let pane = self.pane_mut(id);
            pane.buffer.insert_str(text);
            pane.refresh_json();
            self.recompute();
        }
    }

    fn open_prompt(&mut self, id: PaneId) {
        let buffer = self
            .pane(id)
            .source
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let cursor_pos = buffer.chars().count();
        self.editor_state = EditorState::Prompt {
            kind: PromptKind::Open(id),
            buffer,
            cursor_pos,
        };
    }

    fn focused_pane_or_warn(&mut self) -> Option<PaneId> {
        let id = self.focus.pane();
        if id.is_none() {
            self.status_message = Some("Focus v1 or v2 first (Tab)".to_string());
        }
        id
    }

    fn scroll_result(&mut self, scroll: ResultScroll, layout: &Layout) {
        let total = ui::result_lines(&self.rows, layout.result.width as usize, self.show_line_numbers).len();
        let visible = layout.result.height as usize;
        self.result_scroll = match scroll {
            ResultScroll::By(delta) => scroll_by(self.result_scroll, delta, total, visible),
            ResultScroll::Top => 0,
            ResultScroll::Bottom => max_scroll(total, visible),
        };
    }

    /// Keep each pane's cursor inside its viewport.
    fn scroll_panes_into_view(&mut self, layout: &Layout) {
        let show_line_numbers = self.show_line_numbers;
        for (pane, rect) in [(&mut self.left, layout.left), (&mut self.right, layout.right)] {
            let gutter = ui::gutter_width(pane.buffer.line_count(), show_line_numbers);
            let text_width = (rect.width as usize).saturating_sub(gutter);
            pane.buffer.scroll_into_view(rect.height as usize, text_width);
        }
    }

    /// Dispatch one key press. Returns false when the editor should exit.
    pub fn handle_key(&mut self, key: KeyEvent, layout: &Layout) -> bool {
        match &mut self.editor_state {
            EditorState::ShowingHelp => {
                // Any key exits help
                self.editor_state = EditorState::Idle;
            }

            EditorState::Prompt {
                kind,
                buffer,
                cursor_pos,
            } => {
                let PromptKind::Open(id) = *kind;
                match event_handler::handle_prompt_input(key, buffer, cursor_pos) {
                    PromptResult::Submit(path) => {
                        self.editor_state = EditorState::Idle;
                        if let Err(err) = self.load_file(id, Path::new(&path)) {
                            self.status_message = Some(format!("Cannot open {}: {}", path, err));
                        }
                    }
                    PromptResult::Cancel => self.editor_state = EditorState::Idle,
                    PromptResult::Continue => {}
                }
            }

            EditorState::Idle => {
                let (buffer, page) = match self.focus {
                    Focus::Pane(id) => {
                        let page = layout.left.height as usize;
                        (Some(&mut self.pane_mut(id).buffer), page)
                    }
                    Focus::Result => (None, layout.result.height as usize),
                };

                match event_handler::handle_idle_mode(key, buffer, page) {
                    IdleModeResult::Exit => return false,
                    IdleModeResult::ShowHelp => self.editor_state = EditorState::ShowingHelp,
                    IdleModeResult::ToggleTheme => self.toggle_theme(),
                    IdleModeResult::FocusNext => self.focus = self.focus.next(),
                    IdleModeResult::FocusPrev => self.focus = self.focus.prev(),
                    IdleModeResult::OpenFile => {
                        if let Some(id) = self.focused_pane_or_warn() {
                            self.open_prompt(id);
                        }
                    }
                    IdleModeResult::ClearPane => {
                        if let Some(id) = self.focused_pane_or_warn() {
                            self.clear(id);
                        }
                    }
                    IdleModeResult::FormatJson => {
                        if let Some(id) = self.focused_pane_or_warn() {
                            self.format_json(id);
                        }
                    }
                    IdleModeResult::CycleGranularity => self.cycle_granularity(),
                    IdleModeResult::ToggleDiffsOnly => self.toggle_show_only_diffs(),
                    IdleModeResult::ToggleLineNumbers => self.toggle_line_numbers(),
                    IdleModeResult::TextChanged => {
                        if let Some(id) = self.focus.pane() {
                            self.pane_mut(id).refresh_json();
                        }
                        self.recompute();
                    }
                    IdleModeResult::ScrollResult(scroll) => self.scroll_result(scroll, layout),
                    IdleModeResult::Continue => {}
                }
            }
        }
        true
    }

    pub fn run(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableBracketedPaste, Hide)?;
        info!("editor started");

        let result = self.event_loop();

        execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen, Show)?;
        terminal::disable_raw_mode()?;

        result
    }

    fn event_loop(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        loop {
            let (width, height) = terminal::size()?;
            let layout = ui::compute_layout(width, height);
            self.scroll_panes_into_view(&layout);

            ui::render(&mut stdout, self, &layout)?;

            // Clear status message after displaying
            self.status_message = None;

            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if !self.handle_key(key, &layout) {
                        break;
                    }
                }
                Event::Paste(text) => {
                    debug!("paste of {} bytes", text.len());
                    self.paste(&text);
                }
                // Resize and the rest just trigger a redraw
                _ => {}
            }
        }

        Ok(())
    }
}
