//! Property tests for billing period decomposition

use chrono::{Datelike, Duration, NaiveDate};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use proration::{
    billing_periods, compute_billing_periods, days_in_month, total_due, LeaseTerm, Money,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

prop_compose! {
    fn lease_term()(
        start_offset in 0i64..20_000,
        length in 0i64..1_500,
        rent_cents in 0i64..1_000_000,
        charges_cents in 0i64..200_000,
    ) -> LeaseTerm {
        let start = date(1990, 1, 1) + Duration::days(start_offset);
        LeaseTerm::new(
            start,
            start + Duration::days(length),
            Money::from_cents(rent_cents),
            Money::from_cents(charges_cents),
        )
        .unwrap()
    }
}

proptest! {
    #[test]
    fn periods_cover_the_term_without_gaps_or_overlaps(term in lease_term()) {
        let periods = compute_billing_periods(&term).unwrap();

        prop_assert!(!periods.is_empty());
        prop_assert_eq!(periods[0].period_start, term.start_date);
        prop_assert_eq!(periods[periods.len() - 1].period_end, term.end_date);

        for pair in periods.windows(2) {
            prop_assert_eq!(pair[0].period_end + Duration::days(1), pair[1].period_start);
        }

        let covered: i64 = periods.iter().map(|p| i64::from(p.days_charged)).sum();
        prop_assert_eq!(covered, (term.end_date - term.start_date).num_days() + 1);
    }

    #[test]
    fn each_period_stays_inside_one_month(term in lease_term()) {
        for period in compute_billing_periods(&term).unwrap() {
            prop_assert_eq!(period.period_start.year(), period.period_end.year());
            prop_assert_eq!(period.period_start.month(), period.period_end.month());
            prop_assert_eq!(
                Some(period.days_in_month),
                days_in_month(period.period_start.year(), period.period_start.month())
            );
            prop_assert!(period.days_charged >= 1);
            prop_assert!(period.days_charged <= period.days_in_month);
        }
    }

    #[test]
    fn amounts_never_exceed_the_monthly_rate(term in lease_term()) {
        for period in compute_billing_periods(&term).unwrap() {
            prop_assert!(period.rent_due <= term.monthly_rent);
            prop_assert!(period.charges_due <= term.monthly_charges);
            prop_assert_eq!(
                Some(period.total_due),
                period.rent_due.checked_add(period.charges_due)
            );
            if !period.is_partial() {
                prop_assert_eq!(period.rent_due, term.monthly_rent);
                prop_assert_eq!(period.charges_due, term.monthly_charges);
            }
        }
    }

    #[test]
    fn computation_is_idempotent(term in lease_term()) {
        let first = compute_billing_periods(&term).unwrap();
        let second = compute_billing_periods(&term).unwrap();
        prop_assert_eq!(first, second);
    }
}

#[test]
fn test_one_period_per_touched_month() {
    let periods = billing_periods(
        date(2023, 11, 30),
        date(2024, 3, 2),
        Money::from_cents(120_000),
        Money::from_cents(8_000),
    )
    .unwrap();

    let months: Vec<(i32, u32)> = periods
        .iter()
        .map(|p| (p.period_start.year(), p.period_start.month()))
        .collect();
    assert_eq!(
        months,
        vec![(2023, 11), (2023, 12), (2024, 1), (2024, 2), (2024, 3)]
    );
}

#[test]
fn test_january_proration_amounts() {
    let periods = billing_periods(
        date(2024, 1, 15),
        date(2024, 2, 10),
        Money::from_cents(90_000),
        Money::from_cents(10_000),
    )
    .unwrap();

    assert_eq!(periods[0].rent_due.to_string(), "493.55");
    assert_eq!(periods[0].charges_due.to_string(), "54.84");
    assert_eq!(periods[0].total_due.to_string(), "548.39");
    assert_eq!(total_due(&periods).unwrap().to_string(), "893.21");
}
