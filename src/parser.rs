// Log line parser: `fridge_id,cooldown_number,cooldown_start,cooldown_end,warmup_start,warmup_end`.
// Lines not starting with a digit are comments. Rejections are typed and never fatal.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::models::ParsedRecord;

pub const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const FIELD_COUNT: usize = 6;

/// How much interval ordering is checked beyond the cooldown interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationPolicy {
    /// Only `cooldown_end >= cooldown_start`. Inverted warmup intervals pass and show up as
    /// negative durations.
    #[default]
    Lenient,
    /// Also `warmup_start >= cooldown_end` and `warmup_end >= warmup_start`.
    Strict,
}

/// Why a data line was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LineError {
    #[error("expected {expected} comma-separated fields, found {found}")]
    FieldCount { expected: usize, found: usize },
    #[error("{field} is not an integer: {value:?}")]
    InvalidInteger { field: &'static str, value: String },
    #[error("{field} is not a YYYY-MM-DD HH:MM:SS timestamp: {value:?}")]
    InvalidTimestamp { field: &'static str, value: String },
    #[error("{end} is earlier than {start}")]
    OutOfOrder {
        start: &'static str,
        end: &'static str,
    },
}

/// Parses one line. `Ok(None)` for comments and blank lines.
pub fn parse_line(line: &str, policy: ValidationPolicy) -> Result<Option<ParsedRecord>, LineError> {
    let line = line.trim();
    if !line.starts_with(|c: char| c.is_ascii_digit()) {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split(',').collect();
    if fields.len() != FIELD_COUNT {
        return Err(LineError::FieldCount {
            expected: FIELD_COUNT,
            found: fields.len(),
        });
    }

    let record = ParsedRecord {
        fridge_id: parse_integer("fridge_id", fields[0])?,
        cycle_number: parse_integer("cooldown_number", fields[1])?,
        cooldown_start: parse_timestamp("cooldown_start", fields[2])?,
        cooldown_end: parse_timestamp("cooldown_end", fields[3])?,
        warmup_start: parse_timestamp("warmup_start", fields[4])?,
        warmup_end: parse_timestamp("warmup_end", fields[5])?,
    };

    check_order(
        "cooldown_start",
        record.cooldown_start,
        "cooldown_end",
        record.cooldown_end,
    )?;
    if policy == ValidationPolicy::Strict {
        check_order(
            "cooldown_end",
            record.cooldown_end,
            "warmup_start",
            record.warmup_start,
        )?;
        check_order(
            "warmup_start",
            record.warmup_start,
            "warmup_end",
            record.warmup_end,
        )?;
    }

    Ok(Some(record))
}

/// Parses a `YYYY-MM-DD HH:MM:SS` field. The field is taken as-is: padding, signed years,
/// short components and leap seconds are rejected.
pub fn parse_timestamp(field: &'static str, value: &str) -> Result<NaiveDateTime, LineError> {
    let invalid = || LineError::InvalidTimestamp {
        field,
        value: value.to_string(),
    };
    if !has_timestamp_shape(value) {
        return Err(invalid());
    }
    let parsed = NaiveDateTime::parse_from_str(value, TIME_FORMAT).map_err(|_| invalid())?;
    if parsed.nanosecond() >= 1_000_000_000 {
        return Err(invalid());
    }
    Ok(parsed)
}

fn has_timestamp_shape(value: &str) -> bool {
    value.len() == 19
        && value.bytes().enumerate().all(|(i, b)| match i {
            4 | 7 => b == b'-',
            10 => b == b' ',
            13 | 16 => b == b':',
            _ => b.is_ascii_digit(),
        })
}

fn parse_integer(field: &'static str, value: &str) -> Result<i64, LineError> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|_| LineError::InvalidInteger {
            field,
            value: value.to_string(),
        })
}

fn check_order(
    start: &'static str,
    start_value: NaiveDateTime,
    end: &'static str,
    end_value: NaiveDateTime,
) -> Result<(), LineError> {
    if end_value < start_value {
        return Err(LineError::OutOfOrder { start, end });
    }
    Ok(())
}
