//! Form model and per-receipt data

use chrono::NaiveDate;
use fr_text::{format_date, format_days_charged, format_month_long};
use proration::{BillingPeriod, Money};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// A landlord or a tenant
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Party {
    #[serde(default)]
    pub name: String,
    /// Postal address, possibly on several lines
    #[serde(default)]
    pub address: String,
}

impl Party {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
        }
    }

    pub fn has_name(&self) -> bool {
        !self.name.trim().is_empty()
    }

    /// True when neither the name nor the address was filled in
    pub fn is_blank(&self) -> bool {
        self.name.trim().is_empty() && self.address.trim().is_empty()
    }
}

/// How the monthly charges are billed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargeType {
    /// Flat fee
    Forfait,
    /// Advance on actual costs
    #[default]
    Provision,
}

impl ChargeType {
    pub fn label(self) -> &'static str {
        match self {
            ChargeType::Forfait => "forfait",
            ChargeType::Provision => "provision",
        }
    }

    /// Label of the charges line on a receipt
    pub fn charges_label(self) -> String {
        format!("Charges ({}) :", self.label())
    }
}

/// Everything the form collects for one generation run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptForm {
    #[serde(default)]
    pub landlord: Party,
    #[serde(default)]
    pub tenants: Vec<Party>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
    #[serde(default)]
    pub monthly_rent: Money,
    #[serde(default)]
    pub monthly_charges: Money,
    #[serde(default)]
    pub charge_type: ChargeType,
    #[serde(default)]
    pub notes: String,
}

/// Bound data for a single receipt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptData {
    pub landlord: Party,
    pub tenant: Party,
    pub period: BillingPeriod,
    pub charge_type: ChargeType,
    pub payment_date: Option<NaiveDate>,
    pub notes: String,
    /// Date printed in the footer
    pub generated_on: NaiveDate,
}

impl ReceiptData {
    pub fn new(
        form: &ReceiptForm,
        tenant: &Party,
        period: &BillingPeriod,
        generated_on: NaiveDate,
    ) -> Self {
        Self {
            landlord: form.landlord.clone(),
            tenant: tenant.clone(),
            period: period.clone(),
            charge_type: form.charge_type,
            payment_date: form.payment_date,
            notes: form.notes.clone(),
            generated_on,
        }
    }

    /// Document title, e.g. "Quittance de loyer - janvier 2024"
    pub fn title(&self) -> String {
        format!(
            "Quittance de loyer - {}",
            format_month_long(self.period.period_start)
        )
    }

    /// JSON view used by layout bindings
    ///
    /// Dates and amounts are already formatted for print.
    pub fn to_value(&self) -> Value {
        let period = &self.period;
        json!({
            "landlord": &self.landlord,
            "tenant": &self.tenant,
            "period": {
                "start": format_date(period.period_start),
                "end": format_date(period.period_end),
                "month": format_month_long(period.period_start),
                "isPartial": period.is_partial(),
                "daysCharged": format_days_charged(period.days_charged, period.days_in_month),
            },
            "amounts": {
                "rent": euro(period.rent_due),
                "charges": euro(period.charges_due),
                "total": euro(period.total_due),
            },
            "labels": {
                "charges": self.charge_type.charges_label(),
            },
            "paymentDate": self.payment_date.map(format_date).unwrap_or_default(),
            "notes": &self.notes,
            "hasNotes": !self.notes.trim().is_empty(),
            "hasSignature": false,
            "generatedOn": format!("Généré le {}", format_date(self.generated_on)),
        })
    }
}

/// Printed from the exact cents, never through a float
fn euro(amount: Money) -> String {
    format!("{amount} €")
}

/// One rendered receipt
#[derive(Debug, Clone)]
pub struct GeneratedReceipt {
    /// `Quittance_<tenant>_<MM_YYYY>.pdf`
    pub file_name: String,
    pub tenant_name: String,
    pub period: BillingPeriod,
    pub pdf: Vec<u8>,
}
