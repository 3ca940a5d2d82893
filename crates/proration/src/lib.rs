//! Proration - calendar-month billing periods for a lease
//!
//! This crate provides:
//! - `Money`, an exact amount in cents with half-away-from-zero rounding
//! - Calendar helpers (month boundaries, days in month, inclusive day counts)
//! - `compute_billing_periods`, which splits a lease term into one billing
//!   period per calendar month and prorates rent and charges by day
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use proration::{compute_billing_periods, LeaseTerm, Money};
//!
//! let term = LeaseTerm::new(
//!     NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 2, 10).unwrap(),
//!     Money::from_cents(90_000),
//!     Money::from_cents(10_000),
//! )?;
//!
//! let periods = compute_billing_periods(&term)?;
//! assert_eq!(periods.len(), 2);
//! assert_eq!(periods[0].rent_due.to_string(), "493.55");
//! assert_eq!(periods[0].total_due.to_string(), "548.39");
//! # Ok::<(), proration::BillingError>(())
//! ```

mod calendar;
mod money;
mod period;

pub use calendar::{
    days_in_month, first_day_of_month, inclusive_day_count, last_day_of_month, next_month_start,
    next_period_after,
};
pub use money::Money;
pub use period::{billing_periods, compute_billing_periods, total_due, BillingPeriod, LeaseTerm};

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur while computing billing periods
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    #[error("Invalid range: start date {start} is after end date {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid rate: {field} must not be negative (got {amount})")]
    InvalidRate { field: &'static str, amount: Money },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Amount too large: {0} + {1} overflows")]
    AmountOverflow(Money, Money),

    #[error("Date out of supported range after {0}")]
    DateOverflow(NaiveDate),
}

/// Result type for billing operations
pub type Result<T> = std::result::Result<T, BillingError>;
