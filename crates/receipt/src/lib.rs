//! Receipt - rent receipt ("quittance de loyer") generation
//!
//! This crate provides:
//! - The typed form model and its validation
//! - Landlord signature images (PNG, JPEG, GIF) and their data URLs
//! - JSON receipt layouts with `$.path` data bindings
//! - Rendering one receipt per tenant and per billing month
//! - The persisted application state and its storage backends
//!
//! # Example
//!
//! ```ignore
//! use receipt::{generate_receipts, GenerateOptions, Layout, ReceiptForm};
//!
//! let layout = Layout::standard()?;
//! let options = GenerateOptions::new(today, &layout);
//! for receipt in generate_receipts(&form, &options)? {
//!     std::fs::write(&receipt.file_name, &receipt.pdf)?;
//! }
//! ```

mod batch;
pub mod binding;
mod layout;
mod model;
mod render;
mod signature;
mod state;
mod validate;

pub use batch::{generate_receipts, receipt_file_name, GenerateOptions};
pub use layout::*;
pub use model::{ChargeType, GeneratedReceipt, Party, ReceiptData, ReceiptForm};
pub use render::ReceiptRenderer;
pub use signature::{Signature, SignatureError, ACCEPTED_MIME_TYPES, MAX_SIGNATURE_BYTES};
pub use state::{
    load_state, restore_or_default, save_state, FileStore, MemoryStore, SavedState, StateStore,
    TenantEntry, STORAGE_KEY,
};
pub use validate::ValidationError;

use thiserror::Error;

/// Errors that can occur while producing receipts
#[derive(Debug, Error)]
pub enum ReceiptError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Signature(#[from] SignatureError),

    #[error("Aucune période à facturer trouvée")]
    NoPeriods,

    #[error("Failed to parse layout: {0}")]
    Layout(String),

    #[error("Invalid data binding: {0}")]
    Binding(String),

    #[error("Billing error: {0}")]
    Billing(#[from] proration::BillingError),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for receipt operations
pub type Result<T> = std::result::Result<T, ReceiptError>;
