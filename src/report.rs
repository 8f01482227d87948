//! Turns a [`DiffResult`] into display rows shared by the TUI result area and
//! the `--print` report.

use std::io::{self, Write};

use crossterm::queue;
use crossterm::style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor};

use crate::compare::{DiffResult, Segment, SpanTag};
use crate::theme::{ColorScheme, Theme};

pub const NO_DIFFERENCES: &str = "No differences found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowStyle {
    Plain,
    Muted,
    Added,
    Removed,
    AddedSpan,
    RemovedSpan,
    Error,
}

impl RowStyle {
    /// Foreground and background for this style; `None` keeps the default.
    pub fn colors(self, scheme: &ColorScheme) -> (Option<Color>, Option<Color>) {
        match self {
            RowStyle::Plain => (None, None),
            RowStyle::Muted => (Some(scheme.muted_fg), None),
            RowStyle::Added => (None, Some(scheme.diff_added_bg)),
            RowStyle::Removed => (None, Some(scheme.diff_removed_bg)),
            RowStyle::AddedSpan => (None, Some(scheme.diff_added_span_bg)),
            RowStyle::RemovedSpan => (None, Some(scheme.diff_removed_span_bg)),
            RowStyle::Error => (Some(scheme.error_fg), None),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub line_number: Option<usize>,
    pub marker: char,
    pub pieces: Vec<(RowStyle, String)>,
}

impl Row {
    fn single(line_number: Option<usize>, marker: char, style: RowStyle, text: &str) -> Self {
        Row {
            line_number,
            marker,
            pieces: vec![(style, text.to_string())],
        }
    }

    #[cfg(test)]
    pub fn text(&self) -> String {
        self.pieces.iter().map(|(_, text)| text.as_str()).collect()
    }
}

fn collapsed_label(count: usize) -> String {
    if count == 1 {
        "... 1 unchanged line ...".to_string()
    } else {
        format!("... {count} unchanged lines ...")
    }
}

fn segment_rows(segment: &Segment, rows: &mut Vec<Row>) {
    match segment {
        Segment::Unchanged {
            line_number,
            content,
        } => rows.push(Row::single(Some(*line_number), ' ', RowStyle::Plain, content)),
        Segment::Collapsed { count } => rows.push(Row::single(
            None,
            ' ',
            RowStyle::Muted,
            &collapsed_label(*count),
        )),
        Segment::Added {
            line_number,
            content,
        } => rows.push(Row::single(Some(*line_number), '+', RowStyle::Added, content)),
        Segment::Removed {
            line_number,
            content,
        } => rows.push(Row::single(Some(*line_number), '-', RowStyle::Removed, content)),
        Segment::Modified {
            line_number,
            old,
            new,
        } => {
            rows.push(Row::single(Some(*line_number), '-', RowStyle::Removed, old));
            rows.push(Row::single(Some(*line_number), '+', RowStyle::Added, new));
        }
        Segment::Inline { line_number, spans } => {
            let pieces = spans
                .iter()
                .map(|span| {
                    let style = match span.tag {
                        SpanTag::Common => RowStyle::Plain,
                        SpanTag::Added => RowStyle::AddedSpan,
                        SpanTag::Removed => RowStyle::RemovedSpan,
                    };
                    (style, span.text.clone())
                })
                .collect();
            rows.push(Row {
                line_number: Some(*line_number),
                marker: '~',
                pieces,
            });
        }
        Segment::Error { message } => rows.push(Row::single(None, ' ', RowStyle::Error, message)),
    }
}

/// Rows for the result area. An empty result, or a diffs-only view with
/// nothing to show, becomes a single "No differences found" row.
pub fn build_rows(result: &DiffResult, show_only_diffs: bool) -> Vec<Row> {
    let nothing_to_show = result.segments.is_empty()
        || (show_only_diffs && !result.has_differences() && !result.is_error());
    if nothing_to_show {
        return vec![Row::single(None, ' ', RowStyle::Muted, NO_DIFFERENCES)];
    }

    let mut rows = Vec::with_capacity(result.segments.len());
    for segment in &result.segments {
        segment_rows(segment, &mut rows);
    }
    rows
}

/// Digits needed for the largest line number among the rows.
pub fn gutter_width(rows: &[Row]) -> usize {
    rows.iter()
        .filter_map(|row| row.line_number)
        .max()
        .map_or(1, |n| n.to_string().len())
}

fn gutter(row: &Row, width: usize) -> String {
    match row.line_number {
        Some(n) => format!("{n:>width$} "),
        None => " ".repeat(width + 1),
    }
}

/// Uncoloured report. Inline changes are bracketed as `[-old-]` / `{+new+}`.
pub fn write_plain<W: Write>(rows: &[Row], show_line_numbers: bool, out: &mut W) -> io::Result<()> {
    let width = gutter_width(rows);
    for row in rows {
        if show_line_numbers {
            write!(out, "{}", gutter(row, width))?;
        }
        write!(out, "{} ", row.marker)?;
        for (style, text) in &row.pieces {
            match style {
                RowStyle::RemovedSpan => write!(out, "[-{text}-]")?,
                RowStyle::AddedSpan => write!(out, "{{+{text}+}}")?,
                _ => write!(out, "{text}")?,
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Same layout as [`write_plain`] with the theme's diff colours instead of
/// bracket markup.
pub fn write_ansi<W: Write>(
    rows: &[Row],
    show_line_numbers: bool,
    theme: Theme,
    out: &mut W,
) -> io::Result<()> {
    let scheme = theme.colors();
    let width = gutter_width(rows);

    for row in rows {
        if show_line_numbers {
            queue!(
                out,
                SetForegroundColor(scheme.line_number_fg),
                Print(gutter(row, width)),
                ResetColor
            )?;
        }

        // Whole-line changes colour the marker too
        let line_style = match row.pieces.first() {
            Some((style @ (RowStyle::Added | RowStyle::Removed), _)) => *style,
            _ => RowStyle::Plain,
        };
        print_styled(out, &scheme, line_style, &format!("{} ", row.marker))?;

        for (style, text) in &row.pieces {
            print_styled(out, &scheme, *style, text)?;
        }
        queue!(out, Print("\n"))?;
    }

    out.flush()
}

fn print_styled<W: Write>(out: &mut W, scheme: &ColorScheme, style: RowStyle, text: &str) -> io::Result<()> {
    let (fg, bg) = style.colors(scheme);
    if let Some(fg) = fg {
        queue!(out, SetForegroundColor(fg))?;
    }
    if let Some(bg) = bg {
        queue!(out, SetBackgroundColor(bg))?;
    }
    queue!(out, Print(text))?;
    if fg.is_some() || bg.is_some() {
        queue!(out, ResetColor)?;
    }
    Ok(())
}


#[cfg(test)]
mod writer_tests {
    use super::*;
    use crate::compare::{compare, CompareOptions, Granularity};

    fn plain(left: &str, right: &str, options: CompareOptions, numbers: bool) -> String {
        let rows = build_rows(&compare(left, right, &options), options.show_only_diffs);
        let mut out = Vec::new();
        write_plain(&rows, numbers, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_write_plain_word_mode() {
        let output = plain("same\nfoo bar", "same\nfoo baz", CompareOptions::default(), false);
        assert_eq!(output, "  same\n~ foo [-bar-]{+baz+}\n");
    }

    #[test]
    fn test_write_plain_line_mode_with_numbers() {
        let options = CompareOptions {
            granularity: Granularity::Line,
            ..CompareOptions::default()
        };
        let output = plain("a\nb", "a\nc", options, true);
        assert_eq!(output, "1   a\n2 - b\n2 + c\n");
    }

    #[test]
    fn test_write_plain_collapsed() {
        let options = CompareOptions {
            granularity: Granularity::Line,
            show_only_diffs: true,
            ..CompareOptions::default()
        };
        let output = plain("a\nb\nc", "a\nb\nd", options, false);
        assert_eq!(output, "  ... 2 unchanged lines ...\n- c\n+ d\n");
    }

    #[test]
    fn test_write_ansi_contains_text_and_escapes() {
        let rows = build_rows(
            &compare("foo bar", "foo baz", &CompareOptions::default()),
            false,
        );
        let mut out = Vec::new();
        write_ansi(&rows, false, Theme::Dark, &mut out).unwrap();
        let output = String::from_utf8(out).unwrap();
        assert!(output.contains("foo "));
        assert!(output.contains("bar"));
        assert!(output.contains("baz"));
        assert!(output.contains('\u{1b}'));
        assert!(!output.contains("[-"));
    }

    #[test]
    fn test_write_ansi_plain_rows_have_no_colour() {
        let rows = build_rows(&compare("x", "x", &CompareOptions::default()), false);
        let mut out = Vec::new();
        write_ansi(&rows, false, Theme::Light, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "  x\n");
    }
}
