mod buffer;
mod compare;
mod config;
mod editor;
mod error;
mod event_handler;
mod file;
mod git;
mod highlighting;
mod json;
mod models;
mod navigation;
mod report;
mod text;
mod theme;
mod ui;

use anyhow::{bail, Context, Result};
use clap::Parser;
use compare::DiffResult;
use config::{load_config, Args, Config};
use editor::Editor;
use env_logger::Env;
use log::debug;
use models::PaneId;
use std::fs::File;
use std::io;
use std::path::Path;
use std::process::ExitCode;

/// Exit status of `--print`: 0 same, 1 different, 2 error.
const EXIT_DIFFERENT: u8 = 1;
const EXIT_ERROR: u8 = 2;

fn init_logging(args: &Args) -> Result<()> {
    // stderr output would corrupt the alternate screen
    let default_filter = if args.print || args.log_file.is_some() {
        "warn"
    } else {
        "off"
    };
    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or(default_filter));
    if let Some(ref path) = args.log_file {
        let file = File::create(path).with_context(|| format!("Failed to create log file {:?}", path))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}

fn read_input(path: &Path) -> Result<String> {
    file::read_text(path).with_context(|| format!("Failed to read {:?}", path))
}

fn read_head(path: &Path) -> Result<String> {
    git::get_head_content(path).with_context(|| format!("No HEAD version of {:?}", path))
}

fn print_report(args: &Args, config: &Config) -> Result<ExitCode> {
    let (left, right) = match (&args.git, &args.left, &args.right) {
        (Some(path), _, _) => (read_head(path)?, read_input(path)?),
        (None, Some(left), Some(right)) => (read_input(left)?, read_input(right)?),
        _ => bail!("--print needs two files or --git <FILE>"),
    };

    let result = compare::compare(&left, &right, &config.compare_options());
    let rows = report::build_rows(&result, config.show_only_diffs);

    let mut stdout = io::stdout().lock();
    if args.color.enabled() {
        report::write_ansi(&rows, config.show_line_numbers, config.theme, &mut stdout)?;
    } else {
        report::write_plain(&rows, config.show_line_numbers, &mut stdout)?;
    }

    Ok(ExitCode::from(exit_code(&result)))
}

fn exit_code(result: &DiffResult) -> u8 {
    if result.is_error() {
        EXIT_ERROR
    } else if result.has_differences() {
        EXIT_DIFFERENT
    } else {
        0
    }
}

fn run_editor(args: &Args, config: &Config) -> Result<ExitCode> {
    let mut editor = Editor::new(config);

    if let Some(ref path) = args.git {
        editor.set_text(PaneId::Left, &read_head(path)?);
        editor
            .load_file(PaneId::Right, path)
            .with_context(|| format!("Failed to read {:?}", path))?;
    } else {
        for (id, path) in [(PaneId::Left, &args.left), (PaneId::Right, &args.right)] {
            if let Some(path) = path {
                editor
                    .load_file(id, path)
                    .with_context(|| format!("Failed to read {:?}", path))?;
            }
        }
    }

    editor.run().context("Terminal error")?;
    Ok(ExitCode::SUCCESS)
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = load_config(&args)?;
    debug!("effective config: {:?}", config);

    if args.print {
        print_report(&args, &config)
    } else {
        run_editor(&args, &config)
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::from(EXIT_ERROR)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compare::{CompareOptions, Granularity};
    use json::JsonMode;

    fn options(json: JsonMode) -> CompareOptions {
        CompareOptions {
            granularity: Granularity::Line,
            show_only_diffs: false,
            json,
        }
    }

    #[test]
    fn test_exit_code_identical() {
        let result = compare::compare("a\nb", "a\nb", &options(JsonMode::Auto));
        assert_eq!(exit_code(&result), 0);
    }

    #[test]
    fn test_exit_code_different() {
        let result = compare::compare("a\nb", "a\nc", &options(JsonMode::Auto));
        assert_eq!(exit_code(&result), EXIT_DIFFERENT);
    }

    #[test]
    fn test_exit_code_forced_json_invalid_input() {
        let result = compare::compare("{}", "not json", &options(JsonMode::Force));
        assert_eq!(exit_code(&result), EXIT_ERROR);
    }

    #[test]
    fn test_exit_code_equal_json_after_canonicalisation() {
        let result = compare::compare(r#"{"b":1,"a":2}"#, r#"{"a":2.0,"b":1}"#, &options(JsonMode::Force));
        assert_eq!(exit_code(&result), 0);
    }
}
