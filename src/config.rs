use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use directories::ProjectDirs;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::compare::{CompareOptions, Granularity};
use crate::json::JsonMode;
use crate::theme::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Whether `--print` output should carry ANSI colours.
    pub fn enabled(self) -> bool {
        match self {
            ColorChoice::Auto => std::io::stdout().is_terminal(),
            ColorChoice::Always => true,
            ColorChoice::Never => false,
        }
    }
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Side-by-side text and JSON comparison", long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Compare two files interactively
    textcmp old.json new.json

    # Compare the working copy of a file against HEAD
    textcmp --git src/main.rs

    # Print a line-level report of the differences only
    textcmp --print --mode line --diffs-only a.txt b.txt

KEYS:
    ^X exit   ^G help   ^O open file   ^K clear pane   ^F format JSON
    ^R granularity   ^D diffs only   ^L line numbers   ^T theme   Tab focus

CONFIG:
    Default config location: <config dir>/textcmp/config.toml
    Use --ignore-config to use built-in defaults instead.

EXIT STATUS (--print):
    0 no differences, 1 differences found, 2 error"#)]
pub struct Args {
    #[arg(help = "File loaded into the left pane (v1)")]
    pub left: Option<PathBuf>,

    #[arg(help = "File loaded into the right pane (v2)")]
    pub right: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        conflicts_with_all = ["left", "right"],
        help = "Compare FILE as committed in HEAD (v1) against the working copy (v2)"
    )]
    pub git: Option<PathBuf>,

    #[arg(short, long, value_enum, ignore_case = true, help = "Comparison granularity [default: from config, word]")]
    pub mode: Option<Granularity>,

    #[arg(long, help = "Collapse unchanged lines")]
    pub diffs_only: bool,

    #[arg(long, help = "Show line numbers")]
    pub line_numbers: bool,

    #[arg(long, value_enum, ignore_case = true, help = "JSON handling [default: from config, auto]")]
    pub json: Option<JsonMode>,

    #[arg(long, help = "Print the comparison to stdout instead of starting the editor")]
    pub print: bool,

    #[arg(long, value_enum, default_value_t = ColorChoice::Auto, help = "Colour --print output")]
    pub color: ColorChoice,

    #[arg(long, value_enum, ignore_case = true, help = "Colour theme [default: from config, dark]")]
    pub theme: Option<Theme>,

    #[arg(short, long, help = "Path to config file [default: <config dir>/textcmp/config.toml]")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Use built-in defaults, ignore config file")]
    pub ignore_config: bool,

    #[arg(long, value_name = "PATH", help = "Write log records to PATH")]
    pub log_file: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub mode: Granularity,
    pub show_only_diffs: bool,
    pub show_line_numbers: bool,
    pub json: JsonMode,
    pub theme: Theme,
}

impl Config {
    /// Command-line flags take precedence over the file. Boolean flags can
    /// only switch a setting on.
    pub fn with_overrides(mut self, args: &Args) -> Self {
        if let Some(mode) = args.mode {
            self.mode = mode;
        }
        if let Some(json) = args.json {
            self.json = json;
        }
        if let Some(theme) = args.theme {
            self.theme = theme;
        }
        self.show_only_diffs |= args.diffs_only;
        self.show_line_numbers |= args.line_numbers;
        self
    }

    pub fn compare_options(&self) -> CompareOptions {
        CompareOptions {
            granularity: self.mode,
            show_only_diffs: self.show_only_diffs,
            json: self.json,
        }
    }
}

/// Resolve the effective configuration: file (if any) then CLI overrides.
/// A missing default config file means built-in defaults; nothing is written.
pub fn load_config(args: &Args) -> Result<Config> {
    let base = if args.ignore_config {
        debug!("config file ignored");
        Config::default()
    } else if let Some(ref path) = args.config {
        if !path.exists() {
            bail!("Config file {:?} does not exist", path);
        }
        read_config(path)?
    } else {
        match get_default_config_path() {
            Some(path) if path.exists() => read_config(&path)?,
            _ => {
                debug!("no config file, using defaults");
                Config::default()
            }
        }
    };

    Ok(base.with_overrides(args))
}

pub fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file at {:?}", path))?;
    let config: Config =
        toml::from_str(&content).with_context(|| format!("Failed to parse config file {:?}", path))?;
    debug!("loaded config from {:?}: {:?}", path, config);
    Ok(config)
}

fn get_default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "textcmp").map(|dirs| dirs.config_dir().join("config.toml"))
}
