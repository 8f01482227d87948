use crossterm::style::Color;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    pub fn toggled(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    pub fn is_dark(self) -> bool {
        matches!(self, Theme::Dark)
    }
}

#[derive(Clone, Copy)]
pub struct ColorScheme {
    pub bg: Color,
    pub fg: Color,
    pub cursor_line_bg: Color,
    pub line_number_fg: Color,
    // Pane and result title bars
    pub title_bg: Color,
    pub title_fg: Color,
    pub title_focused_bg: Color,
    pub title_focused_fg: Color,
    pub separator_fg: Color,
    pub json_badge_bg: Color,
    pub json_badge_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    // Whole-line diff backgrounds
    pub diff_added_bg: Color,
    pub diff_removed_bg: Color,
    // Inline span highlights - stronger than the line backgrounds
    pub diff_added_span_bg: Color,
    pub diff_removed_span_bg: Color,
    /// Collapsed runs and the "no differences" banner
    pub muted_fg: Color,
    pub error_fg: Color,
    pub help_bg: Color,
    pub help_fg: Color,
}

impl Theme {
    pub fn colors(&self) -> ColorScheme {
        match self {
            Theme::Dark => ColorScheme {
                bg: Color::Black,
                fg: Color::White,
                cursor_line_bg: Color::Rgb { r: 40, g: 40, b: 40 },
                line_number_fg: Color::Rgb {
                    r: 120,
                    g: 120,
                    b: 120,
                },
                title_bg: Color::Rgb { r: 50, g: 50, b: 50 },
                title_fg: Color::Rgb {
                    r: 180,
                    g: 180,
                    b: 180,
                },
                title_focused_bg: Color::Rgb {
                    r: 50,
                    g: 70,
                    b: 90,
                },
                title_focused_fg: Color::Yellow,
                separator_fg: Color::Rgb { r: 80, g: 80, b: 80 },
                // Orange badge for panes holding valid JSON
                json_badge_bg: Color::Rgb {
                    r: 200,
                    g: 120,
                    b: 50,
                },
                json_badge_fg: Color::Black,
                status_bg: Color::DarkGrey,
                status_fg: Color::White,
                // Pale green/red line backgrounds
                diff_added_bg: Color::Rgb { r: 30, g: 50, b: 30 },
                diff_removed_bg: Color::Rgb { r: 50, g: 30, b: 30 },
                diff_added_span_bg: Color::Rgb {
                    r: 50,
                    g: 100,
                    b: 50,
                },
                diff_removed_span_bg: Color::Rgb {
                    r: 100,
                    g: 50,
                    b: 50,
                },
                muted_fg: Color::Rgb {
                    r: 130,
                    g: 130,
                    b: 130,
                },
                error_fg: Color::Rgb {
                    r: 240,
                    g: 90,
                    b: 90,
                },
                help_bg: Color::Rgb {
                    r: 50,
                    g: 70,
                    b: 90,
                },
                help_fg: Color::Yellow,
            },
            Theme::Light => ColorScheme {
                bg: Color::White,
                fg: Color::Black,
                cursor_line_bg: Color::Rgb {
                    r: 235,
                    g: 235,
                    b: 235,
                },
                line_number_fg: Color::Rgb {
                    r: 150,
                    g: 150,
                    b: 150,
                },
                title_bg: Color::Rgb {
                    r: 220,
                    g: 220,
                    b: 220,
                },
                title_fg: Color::Rgb { r: 60, g: 60, b: 60 },
                title_focused_bg: Color::Rgb {
                    r: 180,
                    g: 210,
                    b: 240,
                },
                title_focused_fg: Color::Rgb {
                    r: 50,
                    g: 50,
                    b: 150,
                },
                separator_fg: Color::Rgb {
                    r: 180,
                    g: 180,
                    b: 180,
                },
                json_badge_bg: Color::Rgb {
                    r: 230,
                    g: 140,
                    b: 60,
                },
                json_badge_fg: Color::Black,
                status_bg: Color::Rgb {
                    r: 100,
                    g: 100,
                    b: 100,
                },
                status_fg: Color::White,
                diff_added_bg: Color::Rgb {
                    r: 220,
                    g: 255,
                    b: 220,
                },
                diff_removed_bg: Color::Rgb {
                    r: 255,
                    g: 220,
                    b: 220,
                },
                diff_added_span_bg: Color::Rgb {
                    r: 170,
                    g: 240,
                    b: 170,
                },
                diff_removed_span_bg: Color::Rgb {
                    r: 255,
                    g: 175,
                    b: 175,
                },
                muted_fg: Color::Rgb {
                    r: 120,
                    g: 120,
                    b: 120,
                },
                error_fg: Color::Rgb {
                    r: 200,
                    g: 40,
                    b: 40,
                },
                help_bg: Color::Rgb {
                    r: 180,
                    g: 210,
                    b: 240,
                },
                help_fg: Color::Rgb {
                    r: 50,
                    g: 50,
                    b: 150,
                },
            },
        }
    }
}
