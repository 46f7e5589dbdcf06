// pt-BR display formatting: currency, numbers and dates.
use std::str::FromStr;
use std::sync::LazyLock;

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use regex::Regex;

const ZERO_BRL: &str = "R$ 0,00";

static NUMERIC_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(\d+\.?\d*|\.\d+)").expect("Invalid numeric prefix pattern"));

/// `R$ 1.234,50`; `None` and non-finite values render as `R$ 0,00`.
pub fn format_currency_brl(value: Option<f64>) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => {
            let body = group_decimal(v.abs(), 2);
            if v < 0.0 && has_nonzero_digit(&body) {
                format!("-R$ {}", body)
            } else {
                format!("R$ {}", body)
            }
        }
        None => ZERO_BRL.to_string(),
    }
}

/// Thousands grouped with `.`, `decimals` fraction digits after `,`; `"0"` for invalid input.
pub fn format_number(value: Option<f64>, decimals: usize) -> String {
    match value.filter(|v| v.is_finite()) {
        Some(v) => {
            let body = group_decimal(v.abs(), decimals);
            if v < 0.0 && has_nonzero_digit(&body) {
                format!("-{}", body)
            } else {
                body
            }
        }
        None => "0".to_string(),
    }
}

pub fn format_number_default(value: Option<f64>) -> String {
    format_number(value, 2)
}

fn group_decimal(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value);
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    if let Some(fraction) = fraction {
        grouped.push(',');
        grouped.push_str(fraction);
    }
    grouped
}

fn has_nonzero_digit(s: &str) -> bool {
    s.chars().any(|c| c.is_ascii_digit() && c != '0')
}

/// Display patterns understood by [`format_date`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DatePattern {
    #[default]
    DayMonthYear,
    DayMonthYearTime,
    Time,
}

impl DatePattern {
    /// Unknown patterns fall back to `DD/MM/YYYY`.
    pub fn parse(pattern: &str) -> Self {
        match pattern {
            "DD/MM/YYYY HH:mm" => DatePattern::DayMonthYearTime,
            "HH:mm" => DatePattern::Time,
            _ => DatePattern::DayMonthYear,
        }
    }

    fn chrono_format(self) -> &'static str {
        match self {
            DatePattern::DayMonthYear => "%d/%m/%Y",
            DatePattern::DayMonthYearTime => "%d/%m/%Y %H:%M",
            DatePattern::Time => "%H:%M",
        }
    }
}

pub fn format_datetime(value: &NaiveDateTime, pattern: DatePattern) -> String {
    value.format(pattern.chrono_format()).to_string()
}

/// Formats a date-like string; empty or unparsable input yields `""`.
pub fn format_date(value: &str, pattern: &str) -> String {
    parse_date_like(value)
        .map(|dt| format_datetime(&dt, DatePattern::parse(pattern)))
        .unwrap_or_default()
}

// Timestamps carrying an offset are shown in local time, like the browser does.
fn parse_date_like(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Local).naive_local());
    }

    const DATETIME_FORMATS: [&str; 8] = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];
    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(dt);
    }

    ["%Y-%m-%d", "%d/%m/%Y"]
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
}

/// Lenient parse of user-typed money: `"R$ 1.234,56"` -> `1234.56`, garbage -> `0.0`.
pub fn parse_currency_input(text: &str) -> f64 {
    let cleaned: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, ',' | '.' | '-'))
        .collect();

    // With a comma present the dots can only be thousands separators.
    let normalized = if cleaned.contains(',') {
        cleaned.replace('.', "").replacen(',', ".", 1)
    } else {
        cleaned
    };

    NUMERIC_PREFIX
        .find(&normalized)
        .and_then(|m| f64::from_str(m.as_str()).ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Strict pt-BR decimal parse: `"1.234,56"` -> `1234.56`.
pub fn parse_decimal(s: &str) -> Result<f64> {
    let normalized = s.trim()
        .replace('.', "")  // thousands separators
        .replace(',', ".");

    f64::from_str(&normalized)
        .map_err(|e| anyhow!("Failed to parse decimal '{}': {}", s, e))
}
