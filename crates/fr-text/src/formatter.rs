//! French date, currency and number formatting

use crate::{Result, TextError};
use chrono::{Datelike, NaiveDate};

/// French month names
const MONTHS_LONG: [&str; 12] = [
    "janvier",
    "février",
    "mars",
    "avril",
    "mai",
    "juin",
    "juillet",
    "août",
    "septembre",
    "octobre",
    "novembre",
    "décembre",
];

/// French text formatting utilities
pub struct FrFormatter;

impl FrFormatter {
    /// Format a date as `DD/MM/YYYY`
    pub fn format_date(date: NaiveDate) -> String {
        format_date(date)
    }

    /// Format a date as `15 janvier 2024`
    pub fn format_date_long(date: NaiveDate) -> String {
        format_date_long(date)
    }

    /// Format the month of a date as `janvier 2024`
    pub fn format_month_long(date: NaiveDate) -> String {
        format_month_long(date)
    }

    /// Format an amount in euros
    pub fn format_euro(amount: f64) -> String {
        format_euro(amount)
    }
}

/// Format a date as `DD/MM/YYYY`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Format the month of a date as `MM_YYYY`, used in receipt file names
pub fn format_month_stamp(date: NaiveDate) -> String {
    date.format("%m_%Y").to_string()
}

/// Format the month of a date in words
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use fr_text::format_month_long;
/// let date = NaiveDate::from_ymd_opt(2024, 8, 3).unwrap();
/// assert_eq!(format_month_long(date), "août 2024");
/// ```
pub fn format_month_long(date: NaiveDate) -> String {
    format!("{} {}", MONTHS_LONG[date.month0() as usize], date.year())
}

/// Format a date in words, with the ordinal "1er" for the first day
///
/// # Examples
/// ```
/// use chrono::NaiveDate;
/// use fr_text::format_date_long;
/// assert_eq!(format_date_long(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()), "15 janvier 2024");
/// assert_eq!(format_date_long(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()), "1er mars 2024");
/// ```
pub fn format_date_long(date: NaiveDate) -> String {
    let day = match date.day() {
        1 => "1er".to_string(),
        d => d.to_string(),
    };
    format!("{day} {}", format_month_long(date))
}

/// Format an amount with two decimals and the euro sign (`493.55 €`)
pub fn format_euro(amount: f64) -> String {
    format!("{} €", render_float("0.00", amount))
}

/// Wording of the prorated days line on a receipt
pub fn format_days_charged(days_charged: u32, days_in_month: u32) -> String {
    format!("{days_charged} jour(s) sur {days_in_month}")
}

/// Parse a `YYYY-MM-DD` date, the format of HTML date inputs
pub fn parse_iso_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|_| TextError::InvalidDate(text.to_string()))
}

/// Render a float with a formatting pattern
///
/// The decimal separator is the last `.` or `,` of the pattern, unless it
/// is the only separator and is followed by exactly three placeholders
/// (`#,###`), in which case it groups thousands. The first other separator
/// (`,`, `.` or a space) groups thousands.
///
/// # Examples
/// ```
/// use fr_text::render_float;
/// assert_eq!(render_float("#,###.##", 1234.5), "1,234.50");
/// assert_eq!(render_float("# ###,##", 1234.5), "1 234,50");
/// assert_eq!(render_float("#,###", 1234.5), "1,235");
/// ```
pub fn render_float(pattern: &str, n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let parsed = NumberPattern::parse(pattern);
    let precision = parsed.precision as usize;
    let scaled = (n.abs() * 10_f64.powi(parsed.precision as i32)).round();

    let (int_digits, frac_digits) = if scaled < u64::MAX as f64 {
        let scale = 10u64.pow(parsed.precision);
        let units = scaled as u64;
        (
            (units / scale).to_string(),
            format!("{:0precision$}", units % scale),
        )
    } else {
        // Beyond u64 units
        let text = format!("{:.precision$}", n.abs());
        match text.split_once('.') {
            Some((int, frac)) => (int.to_string(), frac.to_string()),
            None => (text, String::new()),
        }
    };

    let int_str = group_digits(&int_digits, parsed.grouping);
    let sign = if n < 0.0 && scaled != 0.0 { "-" } else { "" };

    if precision > 0 {
        format!("{sign}{int_str}{}{frac_digits}", parsed.decimal)
    } else {
        format!("{sign}{int_str}")
    }
}

/// Most decimal places a pattern can ask for
const MAX_PRECISION: u32 = 9;

/// Parsed number pattern
#[derive(Debug, PartialEq)]
struct NumberPattern {
    precision: u32,
    grouping: Option<char>,
    decimal: char,
}

impl NumberPattern {
    fn parse(pattern: &str) -> Self {
        if pattern.is_empty() {
            return Self {
                precision: 2,
                grouping: Some(','),
                decimal: '.',
            };
        }

        let separators: Vec<(usize, char)> = pattern
            .char_indices()
            .filter(|(_, c)| matches!(c, '.' | ',' | ' ' | '\u{a0}'))
            .collect();

        let decimal = separators
            .iter()
            .rev()
            .find(|(_, c)| matches!(c, '.' | ','))
            .and_then(|&(pos, sep)| {
                let placeholders = pattern[pos + sep.len_utf8()..]
                    .chars()
                    .filter(|c| matches!(c, '#' | '0'))
                    .count();
                let other_before = separators.iter().any(|&(p, s)| p < pos && s != sep);
                let same_kind = separators.iter().filter(|&&(_, s)| s == sep).count();

                if other_before || (same_kind == 1 && placeholders != 3) {
                    Some((pos, sep, placeholders))
                } else {
                    None
                }
            });

        let grouping = separators
            .iter()
            .find(|&&(p, s)| match decimal {
                Some((dp, dsep, _)) => p < dp && s != dsep,
                None => true,
            })
            .map(|&(_, s)| s);

        match decimal {
            Some((_, sep, precision)) => Self {
                precision: (precision as u32).min(MAX_PRECISION),
                grouping,
                decimal: sep,
            },
            None => Self {
                precision: 0,
                grouping,
                decimal: '.',
            },
        }
    }
}

/// Insert a grouping separator every three digits
fn group_digits(digits: &str, separator: Option<char>) -> String {
    let Some(sep) = separator else {
        return digits.to_string();
    };

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(sep);
        }
        out.push(c);
    }
    out
}
