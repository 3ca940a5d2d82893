//! French Text - formatting helpers for French rent receipts
//!
//! This crate provides:
//! - Date formatting (`15/01/2024`, `01_2024`, `15 janvier 2024`)
//! - Euro amounts (`493.55 €`) and pattern-based number rendering
//! - Receipt wording ("17 jour(s) sur 31")
//! - Line wrapping for addresses and notes
//! - File-name sanitizing
//!
//! # Example
//!
//! ```ignore
//! use fr_text::{format_date, format_euro, FrFormatter};
//!
//! let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
//! let text = format_date(date);                  // "15/01/2024"
//! let month = FrFormatter::format_month_long(date); // "janvier 2024"
//! let amount = format_euro(493.55);              // "493.55 €"
//! ```

mod filename;
mod formatter;
mod wrap;

pub use filename::sanitize_file_component;
pub use formatter::FrFormatter;
pub use wrap::wrap_lines;

// Re-export commonly used formatting functions
pub use formatter::{
    format_date, format_date_long, format_days_charged, format_euro, format_month_long,
    format_month_stamp, parse_iso_date, render_float,
};

use thiserror::Error;

/// Errors that can occur during French text processing
#[derive(Debug, Error)]
pub enum TextError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

/// Result type for text operations
pub type Result<T> = std::result::Result<T, TextError>;
