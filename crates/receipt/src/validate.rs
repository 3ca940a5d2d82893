//! Form validation

use crate::model::ReceiptForm;
use proration::{LeaseTerm, Money};
use thiserror::Error;

/// A form rule that failed, with the message shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Veuillez remplir le nom du bailleur")]
    MissingLandlordName,

    #[error("Veuillez ajouter au moins un locataire avec un nom")]
    MissingTenant,

    #[error("Veuillez définir les dates de début et fin")]
    MissingDates,

    #[error("La date de fin doit être après la date de début")]
    EndBeforeStart,

    #[error("Veuillez entrer un montant de loyer valide")]
    InvalidRent,

    #[error("Veuillez entrer un montant de charges valide")]
    NegativeCharges,
}

impl ReceiptForm {
    /// Check the form and return the lease term to bill.
    ///
    /// Rules are checked in the order the form presents them and the first
    /// failure is returned.
    pub fn validate(&self) -> Result<LeaseTerm, ValidationError> {
        if !self.landlord.has_name() {
            return Err(ValidationError::MissingLandlordName);
        }

        if !self.tenants.iter().any(|t| t.has_name()) {
            return Err(ValidationError::MissingTenant);
        }

        let (Some(start_date), Some(end_date)) = (self.start_date, self.end_date) else {
            return Err(ValidationError::MissingDates);
        };

        if start_date > end_date {
            return Err(ValidationError::EndBeforeStart);
        }

        if self.monthly_rent <= Money::ZERO {
            return Err(ValidationError::InvalidRent);
        }

        if self.monthly_charges.is_negative() {
            return Err(ValidationError::NegativeCharges);
        }

        Ok(LeaseTerm {
            start_date,
            end_date,
            monthly_rent: self.monthly_rent,
            monthly_charges: self.monthly_charges,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Party;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn valid_form() -> ReceiptForm {
        ReceiptForm {
            landlord: Party::new("Jean Dupont", "Paris"),
            tenants: vec![Party::new("Marie Martin", "Lyon")],
            start_date: Some(date(2024, 3, 1)),
            end_date: Some(date(2024, 3, 31)),
            monthly_rent: Money::from_cents(80_000),
            monthly_charges: Money::from_cents(5_000),
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_form() {
        let term = valid_form().validate().unwrap();
        assert_eq!(term.start_date, date(2024, 3, 1));
        assert_eq!(term.end_date, date(2024, 3, 31));
        assert_eq!(term.monthly_rent, Money::from_cents(80_000));
    }

    #[test]
    fn test_missing_landlord() {
        let mut form = valid_form();
        form.landlord.name = "   ".to_string();
        assert_eq!(form.validate(), Err(ValidationError::MissingLandlordName));
    }

    #[test]
    fn test_tenants_without_name() {
        let mut form = valid_form();
        form.tenants = vec![Party::new("", "Lyon")];
        assert_eq!(form.validate(), Err(ValidationError::MissingTenant));

        form.tenants.clear();
        assert_eq!(form.validate(), Err(ValidationError::MissingTenant));
    }

    #[test]
    fn test_missing_dates() {
        let mut form = valid_form();
        form.end_date = None;
        assert_eq!(form.validate(), Err(ValidationError::MissingDates));
    }

    #[test]
    fn test_end_before_start() {
        let mut form = valid_form();
        form.end_date = Some(date(2024, 2, 28));
        assert_eq!(form.validate(), Err(ValidationError::EndBeforeStart));
    }

    #[test]
    fn test_same_day_lease_is_valid() {
        let mut form = valid_form();
        form.end_date = form.start_date;
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_rent_must_be_positive() {
        let mut form = valid_form();
        form.monthly_rent = Money::ZERO;
        assert_eq!(form.validate(), Err(ValidationError::InvalidRent));
    }

    #[test]
    fn test_negative_charges() {
        let mut form = valid_form();
        form.monthly_charges = Money::from_cents(-100);
        assert_eq!(form.validate(), Err(ValidationError::NegativeCharges));
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let form = ReceiptForm::default();
        assert_eq!(form.validate(), Err(ValidationError::MissingLandlordName));

        let form = ReceiptForm {
            landlord: Party::new("Jean Dupont", ""),
            tenants: vec![Party::new("Marie Martin", "")],
            ..Default::default()
        };
        assert_eq!(form.validate(), Err(ValidationError::MissingDates));
    }
}
