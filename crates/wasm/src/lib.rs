//! WASM bindings for quittance
//!
//! This crate provides JavaScript-friendly API for:
//! - Computing prorated billing periods
//! - French date and amount formatting
//! - Generating one receipt PDF per tenant and per month
//! - Saving and restoring the form state
//!
//! # Example (JavaScript)
//!
//! ```javascript
//! import init, { ReceiptGenerator, storageKey } from 'quittance-wasm';
//!
//! await init();
//!
//! const saved = localStorage.getItem(storageKey());
//! const generator = saved ? ReceiptGenerator.fromState(saved) : new ReceiptGenerator();
//!
//! generator.setForm({
//!   landlord: { name: "Jean Dupont", address: "Paris" },
//!   tenants: [{ name: "Marie Martin", address: "Lyon" }],
//!   startDate: "2024-01-15",
//!   endDate: "2024-02-10",
//!   monthlyRent: 900,
//!   monthlyCharges: 100,
//! });
//!
//! for (const { fileName, pdf } of generator.generate()) {
//!   download(fileName, pdf);
//! }
//! localStorage.setItem(storageKey(), generator.stateJson());
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use proration::Money;
use receipt::{GenerateOptions, Layout, SavedState, Signature};
use wasm_bindgen::prelude::*;

// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

fn js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

/// Key the host page stores the state document under
#[wasm_bindgen(js_name = storageKey)]
pub fn storage_key() -> String {
    receipt::STORAGE_KEY.to_string()
}

/// Split a lease into calendar-month billing periods
///
/// @param start - First day billed (YYYY-MM-DD)
/// @param end - Last day billed (YYYY-MM-DD)
/// @param rent - Monthly rent
/// @param charges - Monthly charges
/// @returns Array of { periodStart, periodEnd, daysCharged, daysInMonth, rentDue, chargesDue, totalDue }
#[wasm_bindgen(js_name = computeBillingPeriods)]
pub fn compute_billing_periods(
    start: &str,
    end: &str,
    rent: f64,
    charges: f64,
) -> Result<JsValue, JsValue> {
    let start = fr_text::parse_iso_date(start).map_err(js_error)?;
    let end = fr_text::parse_iso_date(end).map_err(js_error)?;
    let rent = Money::from_major(rent).map_err(js_error)?;
    let charges = Money::from_major(charges).map_err(js_error)?;

    let periods = proration::billing_periods(start, end, rent, charges).map_err(js_error)?;
    Ok(serde_wasm_bindgen::to_value(&periods)?)
}

/// French text formatting utilities
#[wasm_bindgen]
pub struct FrFormatter;

#[wasm_bindgen]
impl FrFormatter {
    /// Format an ISO date as DD/MM/YYYY
    ///
    /// @param date - Date (YYYY-MM-DD)
    /// @returns e.g. "15/01/2024"
    #[wasm_bindgen(js_name = formatDate)]
    pub fn format_date(date: &str) -> Result<String, JsValue> {
        let date = fr_text::parse_iso_date(date).map_err(js_error)?;
        Ok(fr_text::format_date(date))
    }

    /// Format the month of an ISO date
    ///
    /// @param date - Date (YYYY-MM-DD)
    /// @returns e.g. "janvier 2024"
    #[wasm_bindgen(js_name = formatMonthLong)]
    pub fn format_month_long(date: &str) -> Result<String, JsValue> {
        let date = fr_text::parse_iso_date(date).map_err(js_error)?;
        Ok(fr_text::format_month_long(date))
    }

    /// Format an amount in euros
    ///
    /// @param amount - Amount
    /// @returns e.g. "493.55 €"
    #[wasm_bindgen(js_name = formatEuro)]
    pub fn format_euro(amount: f64) -> String {
        fr_text::format_euro(amount)
    }

    /// Render a float with formatting pattern
    ///
    /// @param format - Format pattern (e.g., "# ###,##")
    /// @param n - Number to format
    /// @returns Formatted string
    #[wasm_bindgen(js_name = renderFloat)]
    pub fn render_float(format: &str, n: f64) -> String {
        fr_text::render_float(format, n)
    }
}

/// Receipt generator holding the form state
#[wasm_bindgen]
pub struct ReceiptGenerator {
    state: SavedState,
    signature: Option<Signature>,
    layout: Layout,
}

#[wasm_bindgen]
impl ReceiptGenerator {
    /// Create a generator with an empty form
    #[wasm_bindgen(constructor)]
    pub fn new() -> Result<ReceiptGenerator, JsValue> {
        Ok(ReceiptGenerator {
            state: SavedState::default(),
            signature: None,
            layout: Layout::standard().map_err(js_error)?,
        })
    }

    /// Restore a generator from a saved state document
    ///
    /// A saved signature that no longer decodes is dropped with a console
    /// warning.
    ///
    /// @param json - State JSON, as returned by stateJson()
    #[wasm_bindgen(js_name = fromState)]
    pub fn from_state(json: &str) -> Result<ReceiptGenerator, JsValue> {
        let mut state = SavedState::from_json(json).map_err(js_error)?;
        let signature = match state.signature() {
            Ok(signature) => signature,
            Err(e) => {
                web_sys::console::warn_1(&format!("Signature ignored: {e}").into());
                state.set_signature(None);
                None
            }
        };

        Ok(ReceiptGenerator {
            state,
            signature,
            layout: Layout::standard().map_err(js_error)?,
        })
    }

    /// Replace the receipt layout
    ///
    /// @param json - Layout JSON
    #[wasm_bindgen(js_name = setLayout)]
    pub fn set_layout(&mut self, json: &str) -> Result<(), JsValue> {
        self.layout = Layout::from_json(json).map_err(js_error)?;
        Ok(())
    }

    /// Current state as JSON, stamped with the current time
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&mut self) -> Result<String, JsValue> {
        if let Some(now) = DateTime::<Utc>::from_timestamp_millis(js_sys::Date::now() as i64) {
            self.state.stamp(now);
        }
        self.state.to_json().map_err(js_error)
    }

    /// Copy form values into the state
    ///
    /// @param form - { landlord, tenants, startDate, endDate, paymentDate,
    ///   monthlyRent, monthlyCharges, chargeType, notes }
    #[wasm_bindgen(js_name = setForm)]
    pub fn set_form(&mut self, form: JsValue) -> Result<(), JsValue> {
        let form: receipt::ReceiptForm = serde_wasm_bindgen::from_value(form)?;
        self.state.apply_form(&form);
        Ok(())
    }

    /// The form described by the state
    pub fn form(&self) -> Result<JsValue, JsValue> {
        Ok(serde_wasm_bindgen::to_value(&self.state.to_form())?)
    }

    /// Open a tenant slot
    ///
    /// @returns The slot number
    #[wasm_bindgen(js_name = addTenant)]
    pub fn add_tenant(&mut self) -> u32 {
        self.state.add_tenant()
    }

    /// Remove a tenant slot
    ///
    /// @returns false if there was no such slot
    #[wasm_bindgen(js_name = removeTenant)]
    pub fn remove_tenant(&mut self, index: u32) -> bool {
        self.state.remove_tenant(index)
    }

    /// Fill in a tenant slot
    ///
    /// @returns false if there was no such slot
    #[wasm_bindgen(js_name = setTenant)]
    pub fn set_tenant(&mut self, index: u32, name: &str, address: &str) -> bool {
        match self.state.tenant_mut(index) {
            Some(tenant) => {
                tenant.name = name.to_string();
                tenant.address = address.to_string();
                true
            }
            None => false,
        }
    }

    /// Set the landlord signature from an uploaded file
    ///
    /// @param data - File bytes (Uint8Array)
    /// @param mimeType - Declared file type
    #[wasm_bindgen(js_name = setSignature)]
    pub fn set_signature(&mut self, data: &[u8], mime_type: &str) -> Result<(), JsValue> {
        let signature = Signature::from_upload(data.to_vec(), mime_type).map_err(js_error)?;
        self.state.set_signature(Some(&signature));
        self.signature = Some(signature);
        Ok(())
    }

    /// Signature as a data URL, for previews
    #[wasm_bindgen(js_name = signatureDataUrl)]
    pub fn signature_data_url(&self) -> Option<String> {
        self.state.signature_image.clone()
    }

    #[wasm_bindgen(js_name = clearSignature)]
    pub fn clear_signature(&mut self) {
        self.state.set_signature(None);
        self.signature = None;
    }

    /// Move the dates to the next period after each generation
    #[wasm_bindgen(js_name = setPreFill)]
    pub fn set_pre_fill(&mut self, enabled: bool) {
        self.state.pre_fill_next_period = enabled;
    }

    /// Generate receipts dated today
    ///
    /// @returns Array of { fileName, pdf: Uint8Array }
    pub fn generate(&mut self) -> Result<js_sys::Array, JsValue> {
        let now = js_sys::Date::new_0();
        let today = NaiveDate::from_ymd_opt(
            now.get_full_year() as i32,
            now.get_month() + 1,
            now.get_date(),
        )
        .ok_or_else(|| JsValue::from_str("Invalid system date"))?;
        self.generate_on(today)
    }
}

impl ReceiptGenerator {
    /// Generate receipts with the given footer date
    ///
    /// After a successful run the dates move to the next period when
    /// pre-filling is enabled.
    pub fn generate_on(&mut self, generated_on: NaiveDate) -> Result<js_sys::Array, JsValue> {
        let options = GenerateOptions::new(generated_on, &self.layout)
            .with_signature(self.signature.as_ref());
        let receipts =
            receipt::generate_receipts(&self.state.to_form(), &options).map_err(js_error)?;

        let output = js_sys::Array::new();
        for receipt in &receipts {
            let entry = js_sys::Object::new();
            js_sys::Reflect::set(
                &entry,
                &"fileName".into(),
                &JsValue::from_str(&receipt.file_name),
            )?;
            js_sys::Reflect::set(
                &entry,
                &"pdf".into(),
                &js_sys::Uint8Array::from(receipt.pdf.as_slice()),
            )?;
            output.push(&entry);
        }

        self.state.advance_to_next_period().map_err(js_error)?;
        Ok(output)
    }

    pub fn state(&self) -> &SavedState {
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proration::BillingPeriod;
    use receipt::{Party, ReceiptForm};
    use wasm_bindgen_test::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_form() -> ReceiptForm {
        ReceiptForm {
            landlord: Party::new("Jean Dupont", "Paris"),
            tenants: vec![Party::new("Marie Martin", "Lyon")],
            start_date: Some(date(2024, 1, 15)),
            end_date: Some(date(2024, 2, 10)),
            monthly_rent: Money::from_cents(90_000),
            monthly_charges: Money::from_cents(10_000),
            ..Default::default()
        }
    }

    #[wasm_bindgen_test]
    fn test_compute_billing_periods() {
        let value = compute_billing_periods("2024-01-15", "2024-02-10", 900.0, 100.0).unwrap();
        let periods: Vec<BillingPeriod> = serde_wasm_bindgen::from_value(value).unwrap();

        assert_eq!(periods.len(), 2);
        assert_eq!(periods[0].days_charged, 17);
        assert_eq!(periods[0].total_due, Money::from_cents(54_839));
        assert_eq!(periods[1].days_in_month, 29);
    }

    #[wasm_bindgen_test]
    fn test_compute_billing_periods_rejects_reversed_range() {
        assert!(compute_billing_periods("2024-02-01", "2024-01-01", 900.0, 0.0).is_err());
        assert!(compute_billing_periods("01/02/2024", "2024-03-01", 900.0, 0.0).is_err());
    }

    #[wasm_bindgen_test]
    fn test_fr_formatter() {
        assert_eq!(FrFormatter::format_date("2024-01-15").unwrap(), "15/01/2024");
        assert_eq!(
            FrFormatter::format_month_long("2024-02-01").unwrap(),
            "février 2024"
        );
        assert_eq!(FrFormatter::format_euro(493.55), "493.55 €");
    }

    #[wasm_bindgen_test]
    fn test_generate_and_pre_fill() {
        let mut generator = ReceiptGenerator::new().unwrap();
        generator
            .set_form(serde_wasm_bindgen::to_value(&sample_form()).unwrap())
            .unwrap();
        generator.set_pre_fill(true);

        let files = generator.generate_on(date(2024, 2, 12)).unwrap();
        assert_eq!(files.length(), 2);

        let first = files.get(0);
        let name = js_sys::Reflect::get(&first, &"fileName".into()).unwrap();
        assert_eq!(
            name.as_string().as_deref(),
            Some("Quittance_Marie_Martin_01_2024.pdf")
        );

        assert_eq!(generator.state().date_start, Some(date(2024, 2, 11)));
        assert_eq!(generator.state().date_end, Some(date(2024, 2, 29)));
    }

    #[wasm_bindgen_test]
    fn test_state_round_trip() {
        let mut generator = ReceiptGenerator::new().unwrap();
        let slot = generator.add_tenant();
        assert!(generator.set_tenant(slot, "Paul Roux", "Lyon"));
        assert!(generator.remove_tenant(0));

        let json = generator.state_json().unwrap();
        let restored = ReceiptGenerator::from_state(&json).unwrap();
        assert_eq!(restored.state().tenants.len(), 1);
        assert_eq!(restored.state().tenants[0].name, "Paul Roux");
        assert!(restored.state().timestamp.is_some());
        assert_eq!(storage_key(), "rentReceiptData");
    }

    #[wasm_bindgen_test]
    fn test_signature_rejected() {
        let mut generator = ReceiptGenerator::new().unwrap();
        assert!(generator.set_signature(b"GIF89a", "image/webp").is_err());
        assert_eq!(generator.signature_data_url(), None);
    }
}
