//! JSON helpers: validity check, pretty printing and canonicalisation of a
//! pair of inputs before they are compared.

use std::borrow::Cow;

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::JsonError;

/// How JSON inputs are treated before comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum JsonMode {
    /// Canonicalise only when both sides parse.
    #[default]
    Auto,
    /// Both sides must parse; otherwise the comparison reports an error.
    Force,
    /// Compare raw text.
    Off,
}

/// Text pair ready for diffing.
#[derive(Debug)]
pub struct Prepared<'a> {
    pub left: Cow<'a, str>,
    pub right: Cow<'a, str>,
    /// True when both sides were re-serialised from parsed JSON.
    pub normalized: bool,
}

impl<'a> Prepared<'a> {
    fn raw(left: &'a str, right: &'a str) -> Self {
        Prepared {
            left: Cow::Borrowed(left),
            right: Cow::Borrowed(right),
            normalized: false,
        }
    }
}

/// Returns true if the text parses as a JSON document. Empty text does not.
pub fn is_valid_json(text: &str) -> bool {
    serde_json::from_str::<Value>(text).is_ok()
}

/// Pretty prints JSON with a two-space indent. Object keys come out sorted
/// and whole-valued floats print as integers (`1.0` and `1e2` become `1` and
/// `100`).
pub fn format_json(text: &str) -> Result<String, JsonError> {
    let value = parse(text, "input")?;
    to_pretty(value)
}

/// Canonicalises both sides according to `mode`.
pub fn prepare_pair<'a>(
    left: &'a str,
    right: &'a str,
    mode: JsonMode,
) -> Result<Prepared<'a>, JsonError> {
    match mode {
        JsonMode::Off => Ok(Prepared::raw(left, right)),
        JsonMode::Auto => match (parse(left, "v1"), parse(right, "v2")) {
            (Ok(l), Ok(r)) => {
                debug!("both inputs are JSON, comparing canonical form");
                canonical_pair(l, r)
            }
            _ => Ok(Prepared::raw(left, right)),
        },
        JsonMode::Force => {
            let l = parse(left, "v1")?;
            let r = parse(right, "v2")?;
            canonical_pair(l, r)
        }
    }
}

fn canonical_pair(left: Value, right: Value) -> Result<Prepared<'static>, JsonError> {
    Ok(Prepared {
        left: Cow::Owned(to_pretty(left)?),
        right: Cow::Owned(to_pretty(right)?),
        normalized: true,
    })
}

fn parse(text: &str, side: &'static str) -> Result<Value, JsonError> {
    serde_json::from_str(text).map_err(|source| JsonError::Parse { side, source })
}

fn to_pretty(value: Value) -> Result<String, JsonError> {
    serde_json::to_string_pretty(&integral_numbers(value)).map_err(JsonError::Serialize)
}

/// Rewrites finite floats with no fractional part as integers, recursively.
fn integral_numbers(value: Value) -> Value {
    match value {
        Value::Number(n) if n.is_f64() => Value::Number(n.as_f64().and_then(integral).unwrap_or(n)),
        Value::Array(items) => Value::Array(items.into_iter().map(integral_numbers).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, value)| (key, integral_numbers(value)))
                .collect(),
        ),
        other => other,
    }
}

fn integral(f: f64) -> Option<Number> {
    // 2^63 and 2^64 are exact as f64; both bounds are exclusive
    const I64_END: f64 = 9_223_372_036_854_775_808.0;
    const U64_END: f64 = 18_446_744_073_709_551_616.0;

    if !f.is_finite() || f.fract() != 0.0 {
        None
    } else if (-I64_END..I64_END).contains(&f) {
        Some(Number::from(f as i64))
    } else if (0.0..U64_END).contains(&f) {
        Some(Number::from(f as u64))
    } else {
        None
    }
}
