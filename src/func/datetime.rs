//! Date and Time Functions
//!
//! Every function here is a soft failure on bad input: anything that
//! cannot be parsed or rendered yields null rather than an error.

use chrono::{
    DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc,
};
use serde_json::Value;
use std::fmt::Write;

use crate::error::Error;
use crate::value::{any_arg, str_arg, NULL};

// Days between the spreadsheet epoch (1899-12-30) and the unix epoch.
// Serial dates are offset by this from 1899-12-30, as existing mapping
// data expects; do not correct it.
const SERIAL_DATE_OFFSET: f64 = 25569.0;
const MICROS_PER_DAY: f64 = 86_400_000_000.0;

const AWARE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M%:z",
];
const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// A parsed ISO-8601 date, with or without an offset
#[derive(Debug, Clone, Copy, PartialEq)]
enum Timestamp {
    Aware(DateTime<FixedOffset>),
    Naive(NaiveDateTime),
}
impl Timestamp {
    /// Parse ISO-8601 text. Every `Z` is read as a `+00:00` offset.
    fn parse(text: &str) -> Option<Self> {
        let text = text.replace('Z', "+00:00");
        AWARE_FORMATS
            .iter()
            .find_map(|f| DateTime::parse_from_str(&text, f).ok())
            .map(Self::Aware)
            .or_else(|| {
                NAIVE_FORMATS
                    .iter()
                    .find_map(|f| NaiveDateTime::parse_from_str(&text, f).ok())
                    .map(Self::Naive)
            })
            .or_else(|| {
                NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
                    .map(Self::Naive)
            })
            .filter(Self::in_range)
    }

    fn naive(&self) -> NaiveDateTime {
        match self {
            Self::Aware(dt) => dt.naive_local(),
            Self::Naive(dt) => *dt,
        }
    }

    fn in_range(&self) -> bool {
        (1..=9999).contains(&self.naive().year())
    }

    /// Render with a strftime pattern, or None if the pattern is invalid.
    ///
    /// `%f` is microseconds, and offset specifiers render as nothing on a
    /// date without an offset.
    fn format(&self, pattern: &str) -> Option<String> {
        let pattern = strftime_pattern(pattern, matches!(self, Self::Aware(_)));
        let mut out = String::new();
        let written = match self {
            Self::Aware(dt) => write!(out, "{}", dt.format(&pattern)),
            Self::Naive(dt) => write!(out, "{}", dt.format(&pattern)),
        };
        written.ok().map(|_| out)
    }

    /// `YYYY-MM-DDTHH:MM:SS[.ffffff][+HH:MM]`
    fn isoformat(&self) -> String {
        let naive = self.naive();
        let mut out = naive.format("%Y-%m-%dT%H:%M:%S").to_string();
        let micros = (naive.nanosecond() / 1_000) % 1_000_000;
        if micros != 0 {
            out.push_str(&format!(".{:06}", micros));
        }
        if let Self::Aware(dt) = self {
            out.push_str(&dt.format("%:z").to_string());
        }
        out
    }
}
impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Aware(dt.fixed_offset())
    }
}

/// Rewrite a strftime pattern into chrono's dialect
fn strftime_pattern(pattern: &str, has_offset: bool) -> String {
    let mut out = String::with_capacity(pattern.len() + 2);
    let mut chars = pattern.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('f') => out.push_str("%6f"),
            Some('z') | Some('Z') if !has_offset => {}
            Some(':') => match chars.next() {
                Some('z') if !has_offset => {}
                Some(next) => {
                    out.push_str("%:");
                    out.push(next);
                }
                None => out.push_str("%:"),
            },
            Some(next) => {
                out.push('%');
                out.push(next);
            }
            None => out.push('%'),
        }
    }
    out
}

/// Render a UTC instant as ISO-8601 with a `+00:00` offset
pub(crate) fn utc_isoformat(dt: DateTime<Utc>) -> String {
    Timestamp::from(dt).isoformat()
}

fn from_serial_date(days: f64) -> Option<DateTime<Utc>> {
    let epoch = Utc.with_ymd_and_hms(1899, 12, 30, 0, 0, 0).single()?;
    let micros = ((days - SERIAL_DATE_OFFSET) * MICROS_PER_DAY).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return None;
    }
    epoch.checked_add_signed(Duration::microseconds(micros as i64))
}

fn from_unix_seconds(seconds: f64) -> Option<DateTime<Utc>> {
    let micros = (seconds * 1_000_000.0).round();
    if !micros.is_finite() || micros.abs() >= i64::MAX as f64 {
        return None;
    }
    DateTime::<Utc>::from_timestamp_micros(micros as i64)
}

fn render(dt: Option<DateTime<Utc>>) -> Value {
    dt.map(Timestamp::from)
        .filter(Timestamp::in_range)
        .map(|ts| Value::String(ts.isoformat()))
        .unwrap_or(NULL)
}

/// Reformat an ISO-8601 date with a strftime pattern
pub fn format_date(args: &[Value]) -> Result<Value, Error> {
    let date = str_arg("formatDate", args, 0)?;
    let pattern = str_arg("formatDate", args, 1)?;
    match Timestamp::parse(date).and_then(|ts| ts.format(pattern)) {
        Some(formatted) => Ok(Value::String(formatted)),
        None => {
            tracing::debug!(date, pattern, "could not format date");
            Ok(NULL)
        }
    }
}

/// Parse a serial day number or an ISO-8601 string into ISO-8601
pub fn parse_date(args: &[Value]) -> Result<Value, Error> {
    let value = any_arg("parseDate", args, 0)?;
    let parsed = match value {
        Value::Number(n) => render(n.as_f64().and_then(from_serial_date)),
        Value::String(s) => Timestamp::parse(s)
            .map(|ts| Value::String(ts.isoformat()))
            .unwrap_or(NULL),
        _ => NULL,
    };
    if parsed.is_null() && !value.is_null() {
        tracing::debug!(%value, "could not parse date");
    }
    Ok(parsed)
}

fn parse_int(text: &str) -> Option<i64> {
    text.trim().parse::<i64>().ok()
}

/// Parse a duration into whole seconds
///
/// `"MM:SS"` becomes `MM * 60 + SS`, a bare integer string is taken as
/// seconds, and numbers pass through untouched.
pub fn parse_duration(args: &[Value]) -> Result<Value, Error> {
    let value = any_arg("parseDuration", args, 0)?;
    let parsed = match value {
        Value::Number(_) => Some(value.clone()),
        Value::String(s) if s.contains(':') => {
            let mut parts = s.split(':');
            let minutes = parts.next().and_then(parse_int);
            let seconds = parts.next().and_then(parse_int);
            minutes
                .zip(seconds)
                .and_then(|(m, s)| m.checked_mul(60)?.checked_add(s))
                .map(Value::from)
        }
        Value::String(s) => parse_int(s).map(Value::from),
        _ => None,
    };
    Ok(parsed.unwrap_or_else(|| {
        if !value.is_null() {
            tracing::debug!(%value, "could not parse duration");
        }
        NULL
    }))
}

/// Convert a unix timestamp into ISO-8601 UTC
///
/// The unit is seconds unless it is `"ms"` or `"milliseconds"`.
pub fn parse_unix_timestamp(args: &[Value]) -> Result<Value, Error> {
    let seconds = match args.first() {
        Some(Value::Number(n)) => n.as_f64(),
        _ => None,
    };
    let seconds = match args.get(1) {
        Some(Value::String(unit)) if unit == "ms" || unit == "milliseconds" => {
            seconds.map(|ms| ms / 1000.0)
        }
        _ => seconds,
    };
    Ok(render(seconds.and_then(from_unix_seconds)))
}
