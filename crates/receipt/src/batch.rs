//! One receipt per tenant and per billing month

use crate::layout::Layout;
use crate::model::{GeneratedReceipt, ReceiptData, ReceiptForm};
use crate::render::ReceiptRenderer;
use crate::signature::Signature;
use crate::{ReceiptError, Result};
use chrono::NaiveDate;
use fr_text::{format_month_stamp, sanitize_file_component};
use proration::{compute_billing_periods, total_due};
use tracing::info;

/// Settings shared by every receipt of a run
#[derive(Debug, Clone, Copy)]
pub struct GenerateOptions<'a> {
    /// Date printed in the "Généré le" footer
    pub generated_on: NaiveDate,
    pub layout: &'a Layout,
    pub signature: Option<&'a Signature>,
}

impl<'a> GenerateOptions<'a> {
    pub fn new(generated_on: NaiveDate, layout: &'a Layout) -> Self {
        Self {
            generated_on,
            layout,
            signature: None,
        }
    }

    pub fn with_signature(mut self, signature: Option<&'a Signature>) -> Self {
        self.signature = signature;
        self
    }
}

/// File name of a receipt, e.g. `Quittance_Marie_Martin_01_2024.pdf`
pub fn receipt_file_name(tenant_name: &str, period_start: NaiveDate) -> String {
    format!(
        "Quittance_{}_{}.pdf",
        sanitize_file_component(tenant_name),
        format_month_stamp(period_start)
    )
}

/// Validate the form and render every receipt it calls for.
///
/// Receipts come back tenant by tenant, each tenant's months in order.
/// Tenants without a name are skipped.
///
/// # Errors
/// The first failing form rule, `NoPeriods` when the lease yields no
/// billing period, or any rendering failure.
pub fn generate_receipts(
    form: &ReceiptForm,
    options: &GenerateOptions<'_>,
) -> Result<Vec<GeneratedReceipt>> {
    let term = form.validate()?;
    let periods = compute_billing_periods(&term)?;
    if periods.is_empty() {
        return Err(ReceiptError::NoPeriods);
    }
    let due = total_due(&periods)?;

    let mut renderer = ReceiptRenderer::new(options.layout);
    if let Some(signature) = options.signature {
        renderer = renderer.with_signature(signature);
    }

    let mut receipts = Vec::new();
    for tenant in form.tenants.iter().filter(|t| t.has_name()) {
        for period in &periods {
            let data = ReceiptData::new(form, tenant, period, options.generated_on);
            let pdf = renderer.render(&data)?;
            receipts.push(GeneratedReceipt {
                file_name: receipt_file_name(&tenant.name, period.period_start),
                tenant_name: tenant.name.clone(),
                period: period.clone(),
                pdf,
            });
        }
    }

    info!(
        "Generated {} receipt(s) over {} period(s), {} due per tenant",
        receipts.len(),
        periods.len(),
        due
    );
    Ok(receipts)
}
