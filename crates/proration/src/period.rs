//! Lease terms and their per-month billing periods

use crate::calendar::{
    first_day_of_month, inclusive_day_count, last_day_of_month, next_month_start, next_period_after,
};
use crate::{BillingError, Money, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A lease span with its monthly rates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaseTerm {
    /// First day billed
    pub start_date: NaiveDate,
    /// Last day billed (inclusive)
    pub end_date: NaiveDate,
    /// Rent for a full month
    pub monthly_rent: Money,
    /// Charges for a full month
    pub monthly_charges: Money,
}

impl LeaseTerm {
    /// Create a validated lease term
    pub fn new(
        start_date: NaiveDate,
        end_date: NaiveDate,
        monthly_rent: Money,
        monthly_charges: Money,
    ) -> Result<Self> {
        let term = Self {
            start_date,
            end_date,
            monthly_rent,
            monthly_charges,
        };
        term.validate()?;
        Ok(term)
    }

    /// Check the range and rates
    ///
    /// A start after the end is rejected with `InvalidRange`; negative rates
    /// are rejected with `InvalidRate` rather than clamped.
    pub fn validate(&self) -> Result<()> {
        if self.start_date > self.end_date {
            return Err(BillingError::InvalidRange {
                start: self.start_date,
                end: self.end_date,
            });
        }
        if self.monthly_rent.is_negative() {
            return Err(BillingError::InvalidRate {
                field: "monthly rent",
                amount: self.monthly_rent,
            });
        }
        if self.monthly_charges.is_negative() {
            return Err(BillingError::InvalidRate {
                field: "monthly charges",
                amount: self.monthly_charges,
            });
        }
        Ok(())
    }

    /// The term that follows this one: from the day after `end_date` to the
    /// end of that month, at the same rates.
    pub fn following_period(&self) -> Result<LeaseTerm> {
        let (start_date, end_date) =
            next_period_after(self.end_date).ok_or(BillingError::DateOverflow(self.end_date))?;
        Ok(LeaseTerm {
            start_date,
            end_date,
            ..*self
        })
    }
}

/// One calendar month's share of a lease term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingPeriod {
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    /// Days in `[period_start, period_end]`, inclusive
    pub days_charged: u32,
    /// Days in the calendar month of this period
    pub days_in_month: u32,
    pub rent_due: Money,
    pub charges_due: Money,
    /// Sum of the already rounded rent and charges
    pub total_due: Money,
}

impl BillingPeriod {
    /// True when the period covers only part of its month
    pub fn is_partial(&self) -> bool {
        self.days_charged < self.days_in_month
    }
}

/// Split a lease term into calendar-month billing periods.
///
/// Periods come back in chronological order, do not overlap and together
/// cover exactly `[start_date, end_date]`. Each amount is prorated as
/// `monthly * days_charged / days_in_month` and rounded to the cent; the
/// total is the sum of the rounded rent and charges.
///
/// # Errors
/// `InvalidRange` when the start is after the end, `InvalidRate` for a
/// negative rate, `AmountOverflow` when rent plus charges exceeds `Money`.
pub fn compute_billing_periods(term: &LeaseTerm) -> Result<Vec<BillingPeriod>> {
    term.validate()?;

    let mut periods = Vec::new();
    let mut cursor =
        first_day_of_month(term.start_date).ok_or(BillingError::DateOverflow(term.start_date))?;

    while cursor <= term.end_date {
        let month_start = cursor;
        let month_end = last_day_of_month(cursor).ok_or(BillingError::DateOverflow(cursor))?;

        let period_start = month_start.max(term.start_date);
        let period_end = month_end.min(term.end_date);

        let days_charged = day_count(period_start, period_end);
        let days_in_month = day_count(month_start, month_end);

        let rent_due = term.monthly_rent.prorate(days_charged, days_in_month);
        let charges_due = term.monthly_charges.prorate(days_charged, days_in_month);

        periods.push(BillingPeriod {
            period_start,
            period_end,
            days_charged,
            days_in_month,
            rent_due,
            charges_due,
            total_due: checked_sum(rent_due, charges_due)?,
        });

        cursor = next_month_start(cursor).ok_or(BillingError::DateOverflow(cursor))?;
    }

    Ok(periods)
}

/// Validate the inputs and compute their billing periods in one call
pub fn billing_periods(
    start_date: NaiveDate,
    end_date: NaiveDate,
    monthly_rent: Money,
    monthly_charges: Money,
) -> Result<Vec<BillingPeriod>> {
    let term = LeaseTerm::new(start_date, end_date, monthly_rent, monthly_charges)?;
    compute_billing_periods(&term)
}

/// Sum of `total_due` over all periods
///
/// # Errors
/// `AmountOverflow` when the sum leaves the range of `Money`.
pub fn total_due(periods: &[BillingPeriod]) -> Result<Money> {
    periods
        .iter()
        .try_fold(Money::ZERO, |acc, p| checked_sum(acc, p.total_due))
}

fn checked_sum(a: Money, b: Money) -> Result<Money> {
    a.checked_add(b).ok_or(BillingError::AmountOverflow(a, b))
}

// Both ends lie in one month, so the count is within 1..=31.
fn day_count(start: NaiveDate, end: NaiveDate) -> u32 {
    inclusive_day_count(start, end) as u32
}
