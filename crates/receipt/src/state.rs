//! Persisted application state
//!
//! The form is saved as one JSON document under [`STORAGE_KEY`]. Every field
//! is optional on load so documents written by older versions, which only
//! kept the landlord, tenants and signature, still restore.

use crate::model::{ChargeType, Party, ReceiptForm};
use crate::signature::{Signature, SignatureError};
use crate::Result;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use proration::{next_period_after, BillingError, Money};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Key the state document is stored under
pub const STORAGE_KEY: &str = "rentReceiptData";

/// A tenant slot of the form
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantEntry {
    /// Stable slot number, never reused after removal
    pub index: u32,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub address: String,
}

/// Saved form state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedState {
    #[serde(default)]
    pub landlord_name: String,
    #[serde(default)]
    pub landlord_address: String,
    #[serde(default)]
    pub tenants: Vec<TenantEntry>,
    /// Signature as a data URL
    #[serde(default)]
    pub signature_image: Option<String>,
    #[serde(default)]
    pub pre_fill_next_period: bool,
    /// Next tenant slot number
    #[serde(default = "default_tenant_counter")]
    pub tenant_counter: u32,
    /// RFC 3339 time of the last save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_start: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_end: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub date_payment: Option<NaiveDate>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub rental_amount: Option<Money>,
    #[serde(default, deserialize_with = "blank_as_none")]
    pub charges_amount: Option<Money>,
    #[serde(default)]
    pub charge_type: Option<ChargeType>,
    #[serde(default)]
    pub notes: String,
}

fn default_tenant_counter() -> u32 {
    1
}

/// Read `null`, a missing field or an empty string as `None`
fn blank_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => T::deserialize(value).map(Some).map_err(de::Error::custom),
    }
}

impl Default for SavedState {
    /// A fresh form with its first, empty tenant slot
    fn default() -> Self {
        Self {
            landlord_name: String::new(),
            landlord_address: String::new(),
            tenants: vec![TenantEntry::default()],
            signature_image: None,
            pre_fill_next_period: false,
            tenant_counter: default_tenant_counter(),
            timestamp: None,
            date_start: None,
            date_end: None,
            date_payment: None,
            rental_amount: None,
            charges_amount: None,
            charge_type: None,
            notes: String::new(),
        }
    }
}

impl SavedState {
    /// State holding a form's values, tenants numbered from 0
    pub fn from_form(form: &ReceiptForm) -> Self {
        let tenants: Vec<TenantEntry> = form
            .tenants
            .iter()
            .zip(0..)
            .map(|(party, index)| TenantEntry {
                index,
                name: party.name.clone(),
                address: party.address.clone(),
            })
            .collect();
        let mut state = Self {
            tenant_counter: (tenants.len() as u32).max(default_tenant_counter()),
            tenants,
            ..Self::default()
        };
        state.apply_form(form);
        state
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Copy a form's values into the state
    ///
    /// Tenants are matched to existing slots by position; extra tenants get
    /// new slots and slots past the form's tenants are dropped.
    pub fn apply_form(&mut self, form: &ReceiptForm) {
        self.landlord_name = form.landlord.name.clone();
        self.landlord_address = form.landlord.address.clone();
        self.date_start = form.start_date;
        self.date_end = form.end_date;
        self.date_payment = form.payment_date;
        self.rental_amount = Some(form.monthly_rent);
        self.charges_amount = Some(form.monthly_charges);
        self.charge_type = Some(form.charge_type);
        self.notes = form.notes.clone();

        self.tenants.truncate(form.tenants.len());
        while self.tenants.len() < form.tenants.len() {
            self.add_tenant();
        }
        for (entry, party) in self.tenants.iter_mut().zip(&form.tenants) {
            entry.name = party.name.clone();
            entry.address = party.address.clone();
        }
    }

    /// The form these values describe; blank tenant slots are left out
    pub fn to_form(&self) -> ReceiptForm {
        ReceiptForm {
            landlord: Party::new(&self.landlord_name, &self.landlord_address),
            tenants: self
                .tenants
                .iter()
                .map(|t| Party::new(&t.name, &t.address))
                .filter(|p| !p.is_blank())
                .collect(),
            start_date: self.date_start,
            end_date: self.date_end,
            payment_date: self.date_payment,
            monthly_rent: self.rental_amount.unwrap_or_default(),
            monthly_charges: self.charges_amount.unwrap_or_default(),
            charge_type: self.charge_type.unwrap_or_default(),
            notes: self.notes.clone(),
        }
    }

    /// Open a new tenant slot and return its number
    pub fn add_tenant(&mut self) -> u32 {
        let past_last = self.tenants.iter().map(|t| t.index + 1).max().unwrap_or(0);
        let index = self.tenant_counter.max(past_last);
        self.tenant_counter = index + 1;
        self.tenants.push(TenantEntry {
            index,
            ..Default::default()
        });
        index
    }

    /// Remove a tenant slot; returns false if there was none with `index`
    pub fn remove_tenant(&mut self, index: u32) -> bool {
        let before = self.tenants.len();
        self.tenants.retain(|t| t.index != index);
        self.tenants.len() != before
    }

    pub fn tenant_mut(&mut self, index: u32) -> Option<&mut TenantEntry> {
        self.tenants.iter_mut().find(|t| t.index == index)
    }

    /// Decode the saved signature, if any
    pub fn signature(&self) -> std::result::Result<Option<Signature>, SignatureError> {
        self.signature_image
            .as_deref()
            .map(Signature::from_data_url)
            .transpose()
    }

    pub fn set_signature(&mut self, signature: Option<&Signature>) {
        self.signature_image = signature.map(Signature::to_data_url);
    }

    /// Move the lease dates to the period after the current one
    ///
    /// Only applies when pre-filling is enabled and an end date is set. The
    /// new start is the day after the old end; the new end is the last day of
    /// that month. Returns whether the dates moved.
    pub fn advance_to_next_period(&mut self) -> std::result::Result<bool, BillingError> {
        if !self.pre_fill_next_period {
            return Ok(false);
        }
        let Some(end) = self.date_end else {
            return Ok(false);
        };

        let (start, end) = next_period_after(end).ok_or(BillingError::DateOverflow(end))?;
        self.date_start = Some(start);
        self.date_end = Some(end);
        Ok(true)
    }

    /// Record the save time
    pub fn stamp(&mut self, at: DateTime<Utc>) {
        self.timestamp = Some(at.to_rfc3339_opts(SecondsFormat::Millis, true));
    }
}

/// Key-value storage for the state document
pub trait StateStore {
    /// Read the value under `key`, `None` when absent
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value
    fn write(&mut self, key: &str, value: &str) -> Result<()>;

    /// Remove the value under `key`
    fn remove(&mut self, key: &str) -> Result<()>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Store keeping one `<key>.json` file per key in a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StateStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&mut self, key: &str, value: &str) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        // Write to a temp file, then rename over the old one
        let path = self.path_for(key);
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, value)?;
        fs::rename(&temp_path, &path)?;

        debug!("Saved {key} to {:?}", path);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let path = self.path_for(key);
        if path.exists() {
            fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// Load the saved state, `None` when nothing was saved
pub fn load_state(store: &impl StateStore) -> Result<Option<SavedState>> {
    store
        .read(STORAGE_KEY)?
        .map(|json| SavedState::from_json(&json))
        .transpose()
}

/// Save the state under [`STORAGE_KEY`]
pub fn save_state(store: &mut impl StateStore, state: &SavedState) -> Result<()> {
    store.write(STORAGE_KEY, &state.to_json()?)
}

/// Load the saved state, falling back to a fresh one when it is missing or
/// unreadable
pub fn restore_or_default(store: &impl StateStore) -> SavedState {
    match load_state(store) {
        Ok(Some(state)) => state,
        Ok(None) => SavedState::default(),
        Err(e) => {
            warn!("Could not restore saved state: {e}");
            SavedState::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_default_has_one_tenant_slot() {
        let state = SavedState::default();
        assert_eq!(state.tenants.len(), 1);
        assert_eq!(state.tenants[0].index, 0);
        assert_eq!(state.tenant_counter, 1);
    }

    #[test]
    fn test_tenant_slots_are_not_reused() {
        let mut state = SavedState::default();
        assert_eq!(state.add_tenant(), 1);
        assert_eq!(state.add_tenant(), 2);
        assert!(state.remove_tenant(1));
        assert!(!state.remove_tenant(1));
        assert_eq!(state.add_tenant(), 3);

        let indices: Vec<u32> = state.tenants.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![0, 2, 3]);
        assert_eq!(state.tenant_counter, 4);
    }

    #[test]
    fn test_legacy_document() {
        let state = SavedState::from_json(
            r#"{
                "landlordName": "Jean Dupont",
                "landlordAddress": "Paris",
                "tenants": [{ "index": 0, "name": "Marie Martin", "address": "Lyon" }],
                "signatureImage": null,
                "timestamp": "2024-02-01T10:00:00.000Z"
            }"#,
        )
        .unwrap();

        assert_eq!(state.landlord_name, "Jean Dupont");
        assert!(!state.pre_fill_next_period);
        assert_eq!(state.tenant_counter, 1);
        assert_eq!(state.date_start, None);
        assert_eq!(state.charge_type, None);
    }

    #[test]
    fn test_blank_fields_load_as_none() {
        let state = SavedState::from_json(
            r#"{ "dateStart": "", "dateEnd": null, "rentalAmount": "", "chargesAmount": "45,5" }"#,
        )
        .unwrap();
        assert_eq!(state.date_start, None);
        assert_eq!(state.date_end, None);
        assert_eq!(state.rental_amount, None);
        assert_eq!(state.charges_amount, Some(Money::from_cents(4_550)));
    }

    #[test]
    fn test_form_round_trip() {
        let form = ReceiptForm {
            landlord: Party::new("Jean Dupont", "Paris"),
            tenants: vec![Party::new("Marie Martin", "Lyon"), Party::new("Paul Roux", "")],
            start_date: Some(date(2024, 1, 15)),
            end_date: Some(date(2024, 2, 10)),
            payment_date: None,
            monthly_rent: Money::from_cents(90_000),
            monthly_charges: Money::from_cents(10_000),
            charge_type: ChargeType::Forfait,
            notes: "Merci".to_string(),
        };

        let state = SavedState::from_form(&form);
        assert_eq!(state.tenant_counter, 2);
        let restored = SavedState::from_json(&state.to_json().unwrap()).unwrap();
        assert_eq!(restored.to_form(), form);
    }

    #[test]
    fn test_blank_tenants_are_left_out_of_the_form() {
        let mut state = SavedState::default();
        let index = state.add_tenant();
        state.tenant_mut(index).unwrap().name = "Paul Roux".to_string();

        let form = state.to_form();
        assert_eq!(form.tenants, vec![Party::new("Paul Roux", "")]);
    }

    #[test]
    fn test_apply_form_keeps_slot_numbers() {
        let mut state = SavedState::default();
        state.add_tenant();
        state.add_tenant();
        state.remove_tenant(1);

        let form = ReceiptForm {
            tenants: vec![Party::new("A", ""), Party::new("B", "")],
            ..Default::default()
        };
        state.apply_form(&form);

        let slots: Vec<(u32, &str)> = state
            .tenants
            .iter()
            .map(|t| (t.index, t.name.as_str()))
            .collect();
        assert_eq!(slots, vec![(0, "A"), (2, "B")]);
    }

    #[test]
    fn test_advance_to_next_period() {
        let mut state = SavedState {
            date_start: Some(date(2024, 1, 15)),
            date_end: Some(date(2024, 2, 10)),
            ..Default::default()
        };
        assert!(!state.advance_to_next_period().unwrap());

        state.pre_fill_next_period = true;
        assert!(state.advance_to_next_period().unwrap());
        assert_eq!(state.date_start, Some(date(2024, 2, 11)));
        assert_eq!(state.date_end, Some(date(2024, 2, 29)));

        assert!(state.advance_to_next_period().unwrap());
        assert_eq!(state.date_start, Some(date(2024, 3, 1)));
        assert_eq!(state.date_end, Some(date(2024, 3, 31)));
    }

    #[test]
    fn test_stamp() {
        let mut state = SavedState::default();
        let at = DateTime::from_timestamp(1_706_781_600, 0).unwrap();
        state.stamp(at);
        assert_eq!(state.timestamp.as_deref(), Some("2024-02-01T10:00:00.000Z"));
    }

    #[test]
    fn test_memory_store() {
        let mut store = MemoryStore::new();
        assert_eq!(load_state(&store).unwrap(), None);

        let mut state = SavedState::default();
        state.landlord_name = "Jean Dupont".to_string();
        save_state(&mut store, &state).unwrap();
        assert_eq!(load_state(&store).unwrap(), Some(state));

        store.remove(STORAGE_KEY).unwrap();
        assert_eq!(store.read(STORAGE_KEY).unwrap(), None);
    }

    #[test]
    fn test_corrupt_state_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.write(STORAGE_KEY, "{ not json").unwrap();

        assert!(load_state(&store).is_err());
        assert_eq!(restore_or_default(&store), SavedState::default());
    }
}
