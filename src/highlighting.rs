//! Syntax highlighting for pane contents. Panes holding valid JSON get the
//! JSON grammar; everything else is plain text.

use std::str::FromStr;

use crossterm::style::Color as CrosstermColor;
use syntect::easy::HighlightLines;
use syntect::highlighting::{
    Color, FontStyle, ScopeSelectors, Style, StyleModifier, Theme, ThemeItem, ThemeSettings,
};
use syntect::parsing::{SyntaxReference, SyntaxSet};

pub struct SyntaxHighlighter {
    pub syntax_set: SyntaxSet,
    pub theme: Theme,
}

impl SyntaxHighlighter {
    pub fn new(dark_mode: bool) -> Self {
        // Pane lines are handed over without their trailing '\n'
        let syntax_set = SyntaxSet::load_defaults_nonewlines();
        let theme = if dark_mode {
            build_theme("Pane Dark", Palette::dark())
        } else {
            build_theme("Pane Light", Palette::light())
        };

        SyntaxHighlighter { syntax_set, theme }
    }

    fn syntax(&self, is_json: bool) -> &SyntaxReference {
        let plain = self.syntax_set.find_syntax_plain_text();
        if is_json {
            self.syntax_set.find_syntax_by_extension("json").unwrap_or(plain)
        } else {
            plain
        }
    }

    /// Highlight the first `end` pane lines. The parser state carries over
    /// from line to line, so lines above the viewport still have to be fed in.
    pub fn highlight_lines<'a>(
        &self,
        lines: &'a [String],
        is_json: bool,
        end: usize,
    ) -> Vec<Vec<(Style, &'a str)>> {
        let mut h = HighlightLines::new(self.syntax(is_json), &self.theme);
        let plain = Style {
            foreground: self.theme.settings.foreground.unwrap_or(Color::WHITE),
            ..Style::default()
        };
        lines
            .iter()
            .take(end)
            .map(|line| {
                h.highlight_line(line, &self.syntax_set)
                    .unwrap_or_else(|_| vec![(plain, line.as_str())])
            })
            .collect()
    }
}

struct Palette {
    bg: Color,
    fg: Color,
    string: Color,
    constant: Color,
    key: Color,
    punctuation: Color,
}

impl Palette {
    fn dark() -> Self {
        Palette {
            bg: Color { r: 14, g: 20, b: 21, a: 255 },
            fg: Color { r: 206, g: 206, b: 206, a: 255 },
            string: Color { r: 110, g: 180, b: 80, a: 255 },
            constant: Color { r: 190, g: 130, b: 220, a: 255 },
            key: Color { r: 120, g: 160, b: 255, a: 255 },
            punctuation: Color { r: 119, g: 119, b: 119, a: 255 },
        }
    }

    fn light() -> Self {
        Palette {
            bg: Color { r: 247, g: 247, b: 247, a: 255 },
            fg: Color { r: 0, g: 0, b: 0, a: 255 },
            string: Color { r: 68, g: 140, b: 39, a: 255 },
            constant: Color { r: 122, g: 62, b: 157, a: 255 },
            key: Color { r: 50, g: 92, b: 192, a: 255 },
            punctuation: Color { r: 119, g: 119, b: 119, a: 255 },
        }
    }
}

fn scope_item(selector: &str, foreground: Color) -> Option<ThemeItem> {
    let scope = ScopeSelectors::from_str(selector).ok()?;
    Some(ThemeItem {
        scope,
        style: StyleModifier {
            foreground: Some(foreground),
            background: None,
            font_style: Some(FontStyle::default()),
        },
    })
}

fn build_theme(name: &str, palette: Palette) -> Theme {
    let mut theme = Theme {
        name: Some(name.to_string()),
        author: None,
        settings: ThemeSettings::default(),
        scopes: Vec::new(),
    };

    theme.settings.background = Some(palette.bg);
    theme.settings.foreground = Some(palette.fg);
    theme.settings.caret = Some(palette.fg);

    // Object keys are strings too; the longer selector wins
    let items = [
        ("string", palette.string),
        ("constant.numeric, constant.language", palette.constant),
        ("punctuation", palette.punctuation),
        ("meta.structure.dictionary.key string", palette.key),
    ];
    theme
        .scopes
        .extend(items.iter().filter_map(|(selector, fg)| scope_item(selector, *fg)));

    theme
}

// Conversion helper: the types are foreign, so no From impl
pub fn to_crossterm_color(c: Color) -> CrosstermColor {
    CrosstermColor::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}
