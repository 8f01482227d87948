//! Diff result construction.
//!
//! Splits both inputs into lines, runs `similar` at the selected granularity
//! and maps the resulting operations to a flat sequence of [`Segment`]s that
//! the rendering layer draws. Runs of unchanged lines are optionally collapsed
//! into a single counted segment.

use std::fmt;

use log::debug;
use serde::{Deserialize, Serialize};
use similar::{ChangeTag, DiffTag, TextDiff};

use crate::json::{prepare_pair, JsonMode};

/// Message carried by the error segment when JSON preprocessing fails.
pub const INVALID_JSON_MESSAGE: &str = "Invalid JSON input";

/// Comparison unit selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    #[value(alias = "character")]
    #[serde(alias = "character")]
    Char,
    #[default]
    Word,
    Line,
}

impl Granularity {
    /// Next mode in the Char -> Word -> Line cycle.
    pub fn next(self) -> Self {
        match self {
            Granularity::Char => Granularity::Word,
            Granularity::Word => Granularity::Line,
            Granularity::Line => Granularity::Char,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Granularity::Char => "Character",
            Granularity::Word => "Word",
            Granularity::Line => "Line",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Type of change for a run of text inside a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanTag {
    Common,
    Added,
    Removed,
}

/// A run of text with a single change type. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub tag: SpanTag,
    pub text: String,
}

impl Span {
    pub fn new(tag: SpanTag, text: impl Into<String>) -> Self {
        Span {
            tag,
            text: text.into(),
        }
    }
}

/// One entry of a diff result. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Line present in both inputs, numbered in v1.
    Unchanged { line_number: usize, content: String },
    /// Run of unchanged lines hidden by "show only diffs".
    Collapsed { count: usize },
    /// Line only in v2, numbered in v2.
    Added { line_number: usize, content: String },
    /// Line only in v1, numbered in v1.
    Removed { line_number: usize, content: String },
    /// Replaced line (line granularity), numbered in v1.
    Modified {
        line_number: usize,
        old: String,
        new: String,
    },
    /// Differing line at word or character granularity.
    Inline { line_number: usize, spans: Vec<Span> },
    Error { message: String },
}

impl Segment {
    /// True for segments that flag a difference between the inputs.
    pub fn is_change(&self) -> bool {
        matches!(
            self,
            Segment::Added { .. }
                | Segment::Removed { .. }
                | Segment::Modified { .. }
                | Segment::Inline { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompareOptions {
    pub granularity: Granularity,
    pub show_only_diffs: bool,
    pub json: JsonMode,
}

/// Result of comparing two inputs.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DiffResult {
    pub segments: Vec<Segment>,
    /// Both inputs were JSON and got compared in canonical form.
    pub json_normalized: bool,
}

impl DiffResult {
    fn error(message: &str) -> Self {
        DiffResult {
            segments: vec![Segment::Error {
                message: message.to_string(),
            }],
            json_normalized: false,
        }
    }

    pub fn has_differences(&self) -> bool {
        self.segments.iter().any(Segment::is_change)
    }

    /// Number of segments flagging a difference. A modified pair counts once.
    pub fn changed_lines(&self) -> usize {
        self.segments.iter().filter(|s| s.is_change()).count()
    }

    pub fn is_error(&self) -> bool {
        self.segments
            .iter()
            .any(|s| matches!(s, Segment::Error { .. }))
    }
}

/// Split text on `'\n'`. Empty text is one empty line and a trailing newline
/// yields a trailing empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Word,
    Space,
    Punct,
}

impl TokenKind {
    fn of(c: char) -> Self {
        if c.is_alphanumeric() || c == '_' {
            TokenKind::Word
        } else if c.is_whitespace() {
            TokenKind::Space
        } else {
            TokenKind::Punct
        }
    }
}

/// Tokenize a line for word-level diffing.
/// Word characters and whitespace form runs; each punctuation character is
/// its own token. Concatenating the tokens gives back the line.
///
/// Examples:
/// - "hello world" -> ["hello", " ", "world"]
/// - "foo.bar()" -> ["foo", ".", "bar", "(", ")"]
pub fn tokenize_words(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut current: Option<TokenKind> = None;

    for (i, c) in line.char_indices() {
        let kind = TokenKind::of(c);
        match current {
            Some(k) if k == kind && kind != TokenKind::Punct => {}
            Some(_) => {
                tokens.push(&line[start..i]);
                start = i;
                current = Some(kind);
            }
            None => {
                start = i;
                current = Some(kind);
            }
        }
    }

    if current.is_some() {
        tokens.push(&line[start..]);
    }

    tokens
}

/// Coalesces consecutive changes with the same tag into spans.
#[derive(Default)]
struct SpanBuilder {
    spans: Vec<Span>,
}

impl SpanBuilder {
    fn push(&mut self, tag: ChangeTag, text: &str) {
        if text.is_empty() {
            return;
        }
        let tag = match tag {
            ChangeTag::Equal => SpanTag::Common,
            ChangeTag::Insert => SpanTag::Added,
            ChangeTag::Delete => SpanTag::Removed,
        };
        match self.spans.last_mut() {
            Some(last) if last.tag == tag => last.text.push_str(text),
            _ => self.spans.push(Span::new(tag, text)),
        }
    }

    fn finish(self) -> Vec<Span> {
        self.spans
    }
}

/// Compute the inline diff of a single pair of lines.
pub fn inline_spans(old: &str, new: &str, granularity: Granularity) -> Vec<Span> {
    let mut spans = SpanBuilder::default();

    match granularity {
        Granularity::Char => {
            let diff = TextDiff::from_chars(old, new);
            for change in diff.iter_all_changes() {
                spans.push(change.tag(), change.value());
            }
        }
        Granularity::Word => {
            let old_tokens = tokenize_words(old);
            let new_tokens = tokenize_words(new);
            let diff = TextDiff::from_slices(&old_tokens, &new_tokens);
            for change in diff.iter_all_changes() {
                spans.push(change.tag(), change.value());
            }
        }
        Granularity::Line => {
            if old == new {
                spans.push(ChangeTag::Equal, old);
            } else {
                spans.push(ChangeTag::Delete, old);
                spans.push(ChangeTag::Insert, new);
            }
        }
    }

    spans.finish()
}

/// Accumulates segments, folding unchanged runs when only diffs are shown.
struct SegmentBuilder {
    show_only_diffs: bool,
    hidden: usize,
    segments: Vec<Segment>,
}

impl SegmentBuilder {
    fn new(show_only_diffs: bool) -> Self {
        SegmentBuilder {
            show_only_diffs,
            hidden: 0,
            segments: Vec::new(),
        }
    }

    fn unchanged(&mut self, line_number: usize, content: &str) {
        if self.show_only_diffs {
            self.hidden += 1;
        } else {
            self.segments.push(Segment::Unchanged {
                line_number,
                content: content.to_string(),
            });
        }
    }

    fn change(&mut self, segment: Segment) {
        self.flush_hidden();
        self.segments.push(segment);
    }

    fn flush_hidden(&mut self) {
        if self.hidden > 0 {
            self.segments.push(Segment::Collapsed { count: self.hidden });
            self.hidden = 0;
        }
    }

    fn finish(mut self) -> Vec<Segment> {
        self.flush_hidden();
        self.segments
    }
}

/// Line granularity: line-level diff, pairing adjacent deletions and
/// insertions into modified lines.
fn line_segments(old_text: &str, new_text: &str, builder: &mut SegmentBuilder) {
    let old_lines = split_lines(old_text);
    let new_lines = split_lines(new_text);
    let diff = TextDiff::from_slices(&old_lines, &new_lines);

    // Indices of pending deletions (v1) and insertions (v2) since the last equal run
    let mut removed: Vec<usize> = Vec::new();
    let mut added: Vec<usize> = Vec::new();

    for op in diff.ops() {
        let (tag, old_range, new_range) = op.as_tag_tuple();
        match tag {
            DiffTag::Equal => {
                flush_replacements(&old_lines, &new_lines, &mut removed, &mut added, builder);
                for idx in old_range {
                    builder.unchanged(idx + 1, old_lines[idx]);
                }
            }
            DiffTag::Delete => removed.extend(old_range),
            DiffTag::Insert => added.extend(new_range),
            DiffTag::Replace => {
                removed.extend(old_range);
                added.extend(new_range);
            }
        }
    }

    flush_replacements(&old_lines, &new_lines, &mut removed, &mut added, builder);
}

fn flush_replacements(
    old_lines: &[&str],
    new_lines: &[&str],
    removed: &mut Vec<usize>,
    added: &mut Vec<usize>,
    builder: &mut SegmentBuilder,
) {
    let paired = removed.len().min(added.len());

    for (&old_idx, &new_idx) in removed.iter().zip(added.iter()) {
        builder.change(Segment::Modified {
            line_number: old_idx + 1,
            old: old_lines[old_idx].to_string(),
            new: new_lines[new_idx].to_string(),
        });
    }
    for &old_idx in &removed[paired..] {
        builder.change(Segment::Removed {
            line_number: old_idx + 1,
            content: old_lines[old_idx].to_string(),
        });
    }
    for &new_idx in &added[paired..] {
        builder.change(Segment::Added {
            line_number: new_idx + 1,
            content: new_lines[new_idx].to_string(),
        });
    }

    removed.clear();
    added.clear();
}

/// Word and character granularity: line `i` of v1 against line `i` of v2.
/// Missing lines compare as empty.
fn positional_segments(
    old_text: &str,
    new_text: &str,
    granularity: Granularity,
    builder: &mut SegmentBuilder,
) {
    let old_lines = split_lines(old_text);
    let new_lines = split_lines(new_text);

    for i in 0..old_lines.len().max(new_lines.len()) {
        let old = old_lines.get(i).copied().unwrap_or("");
        let new = new_lines.get(i).copied().unwrap_or("");

        if old == new {
            builder.unchanged(i + 1, old);
        } else {
            builder.change(Segment::Inline {
                line_number: i + 1,
                spans: inline_spans(old, new, granularity),
            });
        }
    }
}

/// Compare two inputs and build the annotated segment sequence.
pub fn compare(left: &str, right: &str, options: &CompareOptions) -> DiffResult {
    let prepared = match prepare_pair(left, right, options.json) {
        Ok(prepared) => prepared,
        Err(err) => {
            debug!("json preprocessing failed: {err}");
            return DiffResult::error(INVALID_JSON_MESSAGE);
        }
    };

    let mut builder = SegmentBuilder::new(options.show_only_diffs);
    match options.granularity {
        Granularity::Line => line_segments(&prepared.left, &prepared.right, &mut builder),
        granularity => {
            positional_segments(&prepared.left, &prepared.right, granularity, &mut builder)
        }
    }

    let result = DiffResult {
        segments: builder.finish(),
        json_normalized: prepared.normalized,
    };
    debug!(
        "compared by {}: {} segments, {} changed",
        options.granularity,
        result.segments.len(),
        result.changed_lines()
    );
    result
}

#[cfg(test)]
mod tokenize_tests {
    use super::*;

    #[test]
    fn test_tokenize_simple_words() {
        assert_eq!(tokenize_words("hello world"), vec!["hello", " ", "world"]);
    }

    #[test]
    fn test_tokenize_punctuation() {
        assert_eq!(tokenize_words("foo.bar"), vec!["foo", ".", "bar"]);
    }

    #[test]
    fn test_tokenize_function_call() {
        assert_eq!(
            tokenize_words("getUserName()"),
            vec!["getUserName", "(", ")"]
        );
    }

    #[test]
    fn test_tokenize_repeated_punctuation_splits() {
        assert_eq!(tokenize_words("a->b"), vec!["a", "-", ">", "b"]);
    }

    #[test]
    fn test_tokenize_whitespace_runs() {
        assert_eq!(tokenize_words("a\t  b"), vec!["a", "\t  ", "b"]);
    }

    #[test]
    fn test_tokenize_empty() {
        assert_eq!(tokenize_words(""), Vec::<&str>::new());
    }

    #[test]
    fn test_tokenize_snake_case() {
        assert_eq!(tokenize_words("get_user_name"), vec!["get_user_name"]);
    }

    #[test]
    fn test_tokenize_json_line() {
        assert_eq!(
            tokenize_words("  \"key\": 12,"),
            vec!["  ", "\"", "key", "\"", ":", " ", "12", ","]
        );
    }

    #[test]
    fn test_tokenize_unicode_words() {
        assert_eq!(tokenize_words("привет мир"), vec!["привет", " ", "мир"]);
    }

    #[test]
    fn test_tokenize_concatenation_is_lossless() {
        let line = "  let x = foo(a, b) + 1; // done";
        assert_eq!(tokenize_words(line).concat(), line);
    }
}

#[cfg(test)]
mod span_tests {
    use super::*;

    fn side(spans: &[Span], skip: SpanTag) -> String {
        spans
            .iter()
            .filter(|s| s.tag != skip)
            .map(|s| s.text.as_str())
            .collect()
    }

    #[test]
    fn test_word_spans_single_change() {
        let spans = inline_spans("foo bar", "foo baz", Granularity::Word);
        assert_eq!(
            spans,
            vec![
                Span::new(SpanTag::Common, "foo "),
                Span::new(SpanTag::Removed, "bar"),
                Span::new(SpanTag::Added, "baz"),
            ]
        );
    }

    #[test]
    fn test_word_spans_addition() {
        let spans = inline_spans("a b", "a b c", Granularity::Word);
        assert!(spans
            .iter()
            .any(|s| s.tag == SpanTag::Added && s.text.contains('c')));
        assert!(!spans.iter().any(|s| s.tag == SpanTag::Removed));
    }

    #[test]
    fn test_char_spans() {
        let spans = inline_spans("abc", "abd", Granularity::Char);
        assert_eq!(
            spans,
            vec![
                Span::new(SpanTag::Common, "ab"),
                Span::new(SpanTag::Removed, "c"),
                Span::new(SpanTag::Added, "d"),
            ]
        );
    }

    #[test]
    fn test_char_spans_against_empty() {
        let spans = inline_spans("", "new", Granularity::Char);
        assert_eq!(spans, vec![Span::new(SpanTag::Added, "new")]);
    }

    #[test]
    fn test_line_spans() {
        let spans = inline_spans("old", "new", Granularity::Line);
        assert_eq!(
            spans,
            vec![
                Span::new(SpanTag::Removed, "old"),
                Span::new(SpanTag::Added, "new"),
            ]
        );
        let same = inline_spans("same", "same", Granularity::Line);
        assert_eq!(same, vec![Span::new(SpanTag::Common, "same")]);
    }

    #[test]
    fn test_spans_have_no_empty_text() {
        for granularity in [Granularity::Char, Granularity::Word, Granularity::Line] {
            let spans = inline_spans("", "x", granularity);
            assert!(spans.iter().all(|s| !s.text.is_empty()));
        }
    }

    #[test]
    fn test_spans_reconstruct_both_sides() {
        let old = "The quick brown fox, jumps.";
        let new = "The quick red fox jumps!";
        for granularity in [Granularity::Char, Granularity::Word, Granularity::Line] {
            let spans = inline_spans(old, new, granularity);
            assert_eq!(side(&spans, SpanTag::Added), old, "{granularity}");
            assert_eq!(side(&spans, SpanTag::Removed), new, "{granularity}");
        }
    }

    #[test]
    fn test_adjacent_spans_have_distinct_tags() {
        let spans = inline_spans("aaa bbb ccc", "xxx yyy zzz", Granularity::Char);
        for pair in spans.windows(2) {
            assert_ne!(pair[0].tag, pair[1].tag);
        }
    }
}


#[cfg(test)]
mod positional_mode_tests {
    use super::*;

    fn options(granularity: Granularity, show_only_diffs: bool) -> CompareOptions {
        CompareOptions {
            granularity,
            show_only_diffs,
            json: JsonMode::Off,
        }
    }

    #[test]
    fn test_word_mode_inline_segment() {
        let result = compare("same\nfoo bar", "same\nfoo baz", &options(Granularity::Word, false));
        assert_eq!(result.segments.len(), 2);
        assert!(matches!(
            &result.segments[1],
            Segment::Inline { line_number: 2, spans } if spans.len() == 3
        ));
    }

    #[test]
    fn test_missing_lines_compare_as_empty() {
        let result = compare("a", "a\nextra", &options(Granularity::Char, false));
        assert_eq!(
            result.segments[1],
            Segment::Inline {
                line_number: 2,
                spans: vec![Span::new(SpanTag::Added, "extra")],
            }
        );
    }

    #[test]
    fn test_shorter_right_side_removes() {
        let result = compare("a\ngone", "a", &options(Granularity::Word, false));
        assert_eq!(
            result.segments[1],
            Segment::Inline {
                line_number: 2,
                spans: vec![Span::new(SpanTag::Removed, "gone")],
            }
        );
    }

    #[test]
    fn test_diffs_only_collapses_runs_in_place() {
        let result = compare("1\n2\n3\n4\n5", "1\n2\nX\n4\n5", &options(Granularity::Word, true));
        assert_eq!(result.segments.len(), 3);
        assert_eq!(result.segments[0], Segment::Collapsed { count: 2 });
        assert!(matches!(result.segments[1], Segment::Inline { line_number: 3, .. }));
        assert_eq!(result.segments[2], Segment::Collapsed { count: 2 });
    }

    #[test]
    fn test_empty_inputs_yield_single_unchanged_line() {
        let result = compare("", "", &options(Granularity::Word, false));
        assert_eq!(
            result.segments,
            vec![Segment::Unchanged { line_number: 1, content: String::new() }]
        );
    }
}


#[cfg(test)]
mod granularity_tests {
    use super::*;

    #[test]
    fn test_granularity_cycle() {
        assert_eq!(Granularity::Char.next(), Granularity::Word);
        assert_eq!(Granularity::Word.next(), Granularity::Line);
        assert_eq!(Granularity::Line.next(), Granularity::Char);
    }

    #[test]
    fn test_granularity_default_is_word() {
        assert_eq!(Granularity::default(), Granularity::Word);
    }

    #[test]
    fn test_granularity_labels() {
        assert_eq!(Granularity::Char.to_string(), "Character");
        assert_eq!(Granularity::Line.label(), "Line");
    }
}
