use crate::editor::Editor;
use crate::file;
use crate::highlighting::{to_crossterm_color, SyntaxHighlighter};
use crate::models::{EditorState, Focus, Pane, PaneId, PromptKind};
use crate::report::{self, Row, RowStyle};
use crate::text::{calculate_padding, char_index_to_visual_col, clip_styled, truncate_to_width, wrap_styled};
use crate::theme::ColorScheme;
use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
};
use std::io::{self, Write};
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// Screen regions, top to bottom: pane titles, the two panes with a
/// separator column between them, the result title, the result area and
/// the status bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub width: u16,
    pub height: u16,
    pub pane_title_y: u16,
    pub left: Rect,
    pub separator_x: u16,
    pub right: Rect,
    pub result_title_y: u16,
    pub result: Rect,
    pub status_y: u16,
}

/// Split the terminal. Panes get the larger half of the rows left after the
/// three single-row bars; the left pane gets the smaller half of the columns.
pub fn compute_layout(width: u16, height: u16) -> Layout {
    let body = height.saturating_sub(3);
    let pane_height = body.div_ceil(2);
    let result_height = body - pane_height;

    let left_width = width.saturating_sub(1) / 2;
    let separator_x = left_width;
    let right_x = separator_x.saturating_add(1).min(width);
    let right_width = width - right_x;

    let result_title_y = 1 + pane_height;

    Layout {
        width,
        height,
        pane_title_y: 0,
        left: Rect {
            x: 0,
            y: 1,
            width: left_width,
            height: pane_height,
        },
        separator_x,
        right: Rect {
            x: right_x,
            y: 1,
            width: right_width,
            height: pane_height,
        },
        result_title_y,
        result: Rect {
            x: 0,
            y: result_title_y + 1,
            width,
            height: result_height,
        },
        status_y: height.saturating_sub(1),
    }
}

/// Columns taken by a pane's line-number gutter (digits plus one space).
pub fn gutter_width(line_count: usize, show_line_numbers: bool) -> usize {
    if show_line_numbers {
        line_count.max(1).to_string().len() + 1
    } else {
        0
    }
}

/// One screen line of the result area after wrapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualLine {
    pub gutter: String,
    pub marker: char,
    /// Background style for the whole line
    pub fill: RowStyle,
    pub pieces: Vec<(RowStyle, String)>,
}

/// Wrap report rows to the result width. Continuation lines get a blank
/// gutter and marker.
pub fn result_lines(rows: &[Row], width: usize, show_line_numbers: bool) -> Vec<VisualLine> {
    let number_width = report::gutter_width(rows);
    let gutter = if show_line_numbers { number_width + 1 } else { 0 };
    let text_width = width.saturating_sub(gutter + 2).max(1);

    let mut lines = Vec::with_capacity(rows.len());
    for row in rows {
        let fill = match row.marker {
            '+' => RowStyle::Added,
            '-' => RowStyle::Removed,
            _ => RowStyle::Plain,
        };
        for (i, pieces) in wrap_styled(&row.pieces, text_width).into_iter().enumerate() {
            let first = i == 0;
            let gutter_text = match (show_line_numbers, first, row.line_number) {
                (false, _, _) => String::new(),
                (true, true, Some(n)) => format!("{n:>number_width$} "),
                (true, _, _) => " ".repeat(gutter),
            };
            lines.push(VisualLine {
                gutter: gutter_text,
                marker: if first { row.marker } else { ' ' },
                fill,
                pieces,
            });
        }
    }
    lines
}

/// Renders the whole screen. Uses editor_state for the status bar, prompt
/// and help overlay.
pub fn render<W: Write>(out: &mut W, editor: &Editor, layout: &Layout) -> io::Result<()> {
    let colors = editor.theme.colors();

    if layout.width < 20 || layout.height < 6 {
        queue!(
            out,
            MoveTo(0, 0),
            SetBackgroundColor(colors.bg),
            SetForegroundColor(colors.fg),
            Print(truncate_to_width("Terminal too small", layout.width as usize)),
            ResetColor,
            Hide
        )?;
        return out.flush();
    }

    for (id, rect) in [(PaneId::Left, layout.left), (PaneId::Right, layout.right)] {
        let focused = editor.focus == Focus::Pane(id);
        render_pane_title(out, id, editor.pane(id), rect, layout.pane_title_y, focused, &colors)?;
        render_pane(
            out,
            editor.pane(id),
            rect,
            focused,
            editor.show_line_numbers,
            &editor.highlighter,
            &colors,
        )?;
    }
    render_separator(out, layout, &colors)?;

    render_result_title(out, editor, layout, &colors)?;
    render_result(out, editor, layout.result, &colors)?;
    render_status_bar(out, editor, layout, &colors)?;

    if matches!(editor.editor_state, EditorState::ShowingHelp) {
        render_help_overlay(out, &colors, layout.width, layout.height)?;
    }

    position_cursor(out, editor, layout)?;

    out.flush()
}

/// Print `text` truncated and padded to exactly `width` columns.
fn print_padded<W: Write>(out: &mut W, text: &str, width: usize) -> io::Result<()> {
    let text = truncate_to_width(text, width);
    let padding = calculate_padding(&text, width);
    queue!(out, Print(text), Print(" ".repeat(padding)))
}

fn render_pane_title<W: Write>(
    out: &mut W,
    id: PaneId,
    pane: &Pane,
    rect: Rect,
    y: u16,
    focused: bool,
    colors: &ColorScheme,
) -> io::Result<()> {
    let (bg, fg) = if focused {
        (colors.title_focused_bg, colors.title_focused_fg)
    } else {
        (colors.title_bg, colors.title_fg)
    };
    let name = pane
        .source
        .as_deref()
        .map(file::display_name)
        .unwrap_or_default();
    let title = if name.is_empty() {
        format!(" {}", id.label())
    } else {
        format!(" {} | {}", id.label(), name)
    };

    let badge = " JSON ";
    let width = rect.width as usize;
    let badge_width = if pane.is_json && width > badge.len() { badge.len() } else { 0 };

    queue!(out, MoveTo(rect.x, y), SetBackgroundColor(bg), SetForegroundColor(fg))?;
    print_padded(out, &title, width - badge_width)?;
    if badge_width > 0 {
        queue!(
            out,
            SetBackgroundColor(colors.json_badge_bg),
            SetForegroundColor(colors.json_badge_fg),
            Print(badge)
        )?;
    }
    queue!(out, ResetColor)
}

fn render_pane<W: Write>(
    out: &mut W,
    pane: &Pane,
    rect: Rect,
    focused: bool,
    show_line_numbers: bool,
    highlighter: &SyntaxHighlighter,
    colors: &ColorScheme,
) -> io::Result<()> {
    let buffer = &pane.buffer;
    let gutter = gutter_width(buffer.line_count(), show_line_numbers).min(rect.width as usize);
    let text_width = (rect.width as usize) - gutter;
    let highlighted =
        highlighter.highlight_lines(buffer.lines(), pane.is_json, buffer.scroll_row + rect.height as usize);

    for row in 0..rect.height {
        let line_idx = buffer.scroll_row + row as usize;
        let line = buffer.lines().get(line_idx);
        let bg = if focused && line_idx == buffer.cursor_row {
            colors.cursor_line_bg
        } else {
            colors.bg
        };

        queue!(out, MoveTo(rect.x, rect.y + row), SetBackgroundColor(colors.bg))?;
        if gutter > 0 {
            let number = match line {
                Some(_) => format!("{:>width$} ", line_idx + 1, width = gutter - 1),
                None => " ".repeat(gutter),
            };
            queue!(out, SetForegroundColor(colors.line_number_fg), Print(number))?;
        }

        queue!(out, SetBackgroundColor(bg))?;
        let mut used = 0;
        if let Some(pieces) = highlighted.get(line_idx) {
            let styled: Vec<(Color, &str)> = pieces
                .iter()
                .map(|(style, text)| (to_crossterm_color(style.foreground), *text))
                .collect();
            for (fg, text) in clip_styled(&styled, buffer.scroll_col, text_width) {
                used += text.width();
                queue!(out, SetForegroundColor(fg), Print(text))?;
            }
        }
        queue!(out, Print(" ".repeat(text_width.saturating_sub(used))), ResetColor)?;
    }

    Ok(())
}

fn render_separator<W: Write>(out: &mut W, layout: &Layout, colors: &ColorScheme) -> io::Result<()> {
    if layout.separator_x >= layout.width {
        return Ok(());
    }
    queue!(out, SetBackgroundColor(colors.bg), SetForegroundColor(colors.separator_fg))?;
    queue!(out, MoveTo(layout.separator_x, layout.pane_title_y), Print("│"))?;
    for row in 0..layout.left.height {
        queue!(out, MoveTo(layout.separator_x, layout.left.y + row), Print("│"))?;
    }
    queue!(out, ResetColor)
}

fn render_result_title<W: Write>(
    out: &mut W,
    editor: &Editor,
    layout: &Layout,
    colors: &ColorScheme,
) -> io::Result<()> {
    let (bg, fg) = if editor.focus == Focus::Result {
        (colors.title_focused_bg, colors.title_focused_fg)
    } else {
        (colors.title_bg, colors.title_fg)
    };

    let mut title = format!(" Result | {}", editor.options.granularity);
    if editor.options.show_only_diffs {
        title.push_str(" | diffs only");
    }
    if editor.result.json_normalized {
        title.push_str(" | JSON normalized");
    }
    if !editor.result.is_error() {
        match editor.result.changed_lines() {
            0 => {}
            1 => title.push_str(" | 1 change"),
            n => title.push_str(&format!(" | {n} changes")),
        }
    }

    queue!(
        out,
        MoveTo(0, layout.result_title_y),
        SetBackgroundColor(bg),
        SetForegroundColor(fg)
    )?;
    print_padded(out, &title, layout.width as usize)?;
    queue!(out, ResetColor)
}

fn style_colors(style: RowStyle, fill_bg: Color, colors: &ColorScheme) -> (Color, Color) {
    let (fg, bg) = style.colors(colors);
    (fg.unwrap_or(colors.fg), bg.unwrap_or(fill_bg))
}

fn render_result<W: Write>(out: &mut W, editor: &Editor, rect: Rect, colors: &ColorScheme) -> io::Result<()> {
    let width = rect.width as usize;
    let lines = result_lines(&editor.rows, width, editor.show_line_numbers);

    for row in 0..rect.height {
        queue!(out, MoveTo(rect.x, rect.y + row))?;
        let Some(line) = lines.get(editor.result_scroll + row as usize) else {
            queue!(out, SetBackgroundColor(colors.bg), Print(" ".repeat(width)), ResetColor)?;
            continue;
        };

        let fill_bg = line.fill.colors(colors).1.unwrap_or(colors.bg);
        queue!(
            out,
            SetBackgroundColor(colors.bg),
            SetForegroundColor(colors.line_number_fg),
            Print(&line.gutter),
            SetBackgroundColor(fill_bg),
            SetForegroundColor(colors.fg),
            Print(format!("{} ", line.marker)),
        )?;

        let mut used = line.gutter.width() + 2;
        for (style, text) in &line.pieces {
            let (fg, bg) = style_colors(*style, fill_bg, colors);
            used += text.width();
            queue!(out, SetBackgroundColor(bg), SetForegroundColor(fg), Print(text))?;
        }
        queue!(
            out,
            SetBackgroundColor(fill_bg),
            Print(" ".repeat(width.saturating_sub(used))),
            ResetColor
        )?;
    }

    Ok(())
}

fn prompt_prefix(kind: PromptKind) -> String {
    match kind {
        PromptKind::Open(id) => format!(" Open file into {}: ", id.label()),
    }
}

fn render_status_bar<W: Write>(
    out: &mut W,
    editor: &Editor,
    layout: &Layout,
    colors: &ColorScheme,
) -> io::Result<()> {
    let text = if let Some(msg) = &editor.status_message {
        format!(" {msg}")
    } else {
        match &editor.editor_state {
            EditorState::Idle => {
                " ^G Help  ^X Exit  ^O Open  ^K Clear  ^F Format  ^R Mode  ^D Diffs  ^L Lines  ^T Theme  Tab Focus"
                    .to_string()
            }
            EditorState::Prompt { kind, buffer, .. } => {
                format!("{}{}", prompt_prefix(*kind), buffer)
            }
            EditorState::ShowingHelp => " Help Mode - Press any key to return".to_string(),
        }
    };

    queue!(
        out,
        MoveTo(0, layout.status_y),
        SetBackgroundColor(colors.status_bg),
        SetForegroundColor(colors.status_fg)
    )?;
    print_padded(out, &text, layout.width as usize)?;
    queue!(out, ResetColor)
}

fn position_cursor<W: Write>(out: &mut W, editor: &Editor, layout: &Layout) -> io::Result<()> {
    match &editor.editor_state {
        EditorState::Prompt {
            kind,
            buffer,
            cursor_pos,
        } if editor.status_message.is_none() => {
            let x = prompt_prefix(*kind).width() + char_index_to_visual_col(buffer, *cursor_pos);
            if x < layout.width as usize {
                return queue!(out, MoveTo(x as u16, layout.status_y), Show);
            }
        }
        EditorState::Idle => {
            if let Focus::Pane(id) = editor.focus {
                let rect = if id == PaneId::Left { layout.left } else { layout.right };
                let buffer = &editor.pane(id).buffer;
                let gutter = gutter_width(buffer.line_count(), editor.show_line_numbers);
                let row = buffer.cursor_row.checked_sub(buffer.scroll_row);
                let col = buffer.cursor_visual_col().checked_sub(buffer.scroll_col);
                if let (Some(row), Some(col)) = (row, col) {
                    if row < rect.height as usize && gutter + col < rect.width as usize {
                        let x = rect.x + (gutter + col) as u16;
                        let y = rect.y + row as u16;
                        return queue!(out, MoveTo(x, y), Show);
                    }
                }
            }
        }
        _ => {}
    }
    queue!(out, Hide)
}

const HELP_LINES: [&str; 18] = [
    " HELP",
    "",
    " ^O         Open file into focused pane",
    " ^K         Clear focused pane",
    " ^F         Format JSON in focused pane",
    " ^R         Granularity: char/word/line",
    " ^D         Show only differences",
    " ^L         Line numbers",
    " ^T         Toggle theme",
    " ^X         Exit",
    " ^G         Toggle help",
    "",
    " Tab        Next: v1, v2, result",
    " Arrows     Move cursor / scroll result",
    " Alt+←/→    Word left / right",
    " PgUp/PgDn  Page up / down",
    "",
    " Press any key to close",
];

fn render_help_overlay<W: Write>(out: &mut W, colors: &ColorScheme, width: u16, height: u16) -> io::Result<()> {
    // Center the box
    let box_width: u16 = 46;
    let box_height = HELP_LINES.len() as u16 + 2;
    let start_x = width.saturating_sub(box_width) / 2;
    let start_y = height.saturating_sub(box_height) / 2;
    let inner = box_width as usize - 2;

    queue!(out, SetBackgroundColor(colors.help_bg), SetForegroundColor(colors.help_fg))?;
    queue!(out, MoveTo(start_x, start_y), Print(format!("╔{}╗", "═".repeat(inner))))?;
    for (i, text) in HELP_LINES.iter().enumerate() {
        let y = start_y + 1 + i as u16;
        if y >= height {
            break;
        }
        let text = truncate_to_width(text, inner);
        let padding = calculate_padding(&text, inner);
        queue!(
            out,
            MoveTo(start_x, y),
            Print(format!("║{}{}║", text, " ".repeat(padding)))
        )?;
    }
    if start_y + box_height - 1 < height {
        queue!(
            out,
            MoveTo(start_x, start_y + box_height - 1),
            Print(format!("╚{}╝", "═".repeat(inner)))
        )?;
    }
    queue!(out, ResetColor)
}



#[cfg(test)]
mod render_tests {
    use super::*;
    use crate::config::Config;

    fn render_to_string(editor: &Editor, width: u16, height: u16) -> String {
        let mut out = Vec::new();
        render(&mut out, editor, &compute_layout(width, height)).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_render_shows_panes_and_result() {
        let mut editor = Editor::new(&Config::default());
        editor.set_text(PaneId::Left, "alpha beta");
        editor.set_text(PaneId::Right, "alpha gamma");
        let screen = render_to_string(&editor, 80, 24);
        assert!(screen.contains(" v1"));
        assert!(screen.contains(" v2"));
        assert!(screen.contains("Result | Word | 1 change"));
        assert!(screen.contains("gamma"));
        assert!(screen.contains("^G Help"));
    }

    #[test]
    fn test_render_json_badge() {
        let mut editor = Editor::new(&Config::default());
        editor.set_text(PaneId::Left, "[1, 2]");
        let screen = render_to_string(&editor, 80, 24);
        assert!(screen.contains(" JSON "));
    }

    #[test]
    fn test_render_no_differences_banner() {
        let mut editor = Editor::new(&Config::default());
        editor.toggle_show_only_diffs();
        let screen = render_to_string(&editor, 80, 24);
        assert!(screen.contains(report::NO_DIFFERENCES));
        assert!(screen.contains("diffs only"));
    }

    #[test]
    fn test_render_help_overlay() {
        let mut editor = Editor::new(&Config::default());
        editor.editor_state = EditorState::ShowingHelp;
        let screen = render_to_string(&editor, 80, 30);
        assert!(screen.contains("Press any key to close"));
    }

    #[test]
    fn test_render_prompt() {
        let mut editor = Editor::new(&Config::default());
        editor.editor_state = EditorState::Prompt {
            kind: PromptKind::Open(PaneId::Right),
            buffer: "data.json".to_string(),
            cursor_pos: 9,
        };
        let screen = render_to_string(&editor, 80, 24);
        assert!(screen.contains("Open file into v2: data.json"));
    }

    #[test]
    fn test_render_tiny_terminal() {
        let editor = Editor::new(&Config::default());
        let screen = render_to_string(&editor, 10, 3);
        assert!(screen.contains("Terminal"));
    }
}
