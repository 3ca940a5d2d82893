//! Generate receipts from a saved state directory
//!
//! Usage: cargo run -p receipt --example generate_receipts -- <state-dir> [out-dir]
//!
//! The state directory holds `rentReceiptData.json`. When it is missing, a
//! sample form is written there first. Set `RUST_LOG=receipt=debug` for
//! per-receipt logs.

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate, Utc};
use proration::Money;
use receipt::{
    generate_receipts, load_state, save_state, FileStore, GenerateOptions, Layout, SavedState,
};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn init_logger() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("receipt=info,info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact(),
        )
        .init();
}

fn sample_state() -> anyhow::Result<SavedState> {
    let mut state = SavedState {
        landlord_name: "Jean Dupont".to_string(),
        landlord_address: "12 rue de la Paix\n75002 Paris".to_string(),
        date_start: NaiveDate::from_ymd_opt(2024, 1, 15),
        date_end: NaiveDate::from_ymd_opt(2024, 3, 31),
        date_payment: NaiveDate::from_ymd_opt(2024, 1, 5),
        rental_amount: Some("900".parse::<Money>()?),
        charges_amount: Some("100".parse::<Money>()?),
        pre_fill_next_period: true,
        ..Default::default()
    };
    let first = state.tenants[0].index;
    if let Some(tenant) = state.tenant_mut(first) {
        tenant.name = "Marie Martin".to_string();
        tenant.address = "3 place Bellecour\n69002 Lyon".to_string();
    }
    Ok(state)
}

fn main() -> anyhow::Result<()> {
    init_logger();

    let mut args = std::env::args().skip(1);
    let Some(state_dir) = args.next() else {
        bail!("usage: generate_receipts <state-dir> [out-dir]");
    };
    let out_dir = args.next().unwrap_or_else(|| ".".to_string());

    let mut store = FileStore::new(&state_dir);
    let mut state = match load_state(&store)? {
        Some(state) => state,
        None => {
            info!("No saved state in {state_dir}, writing a sample form");
            sample_state()?
        }
    };

    let layout = Layout::standard()?;
    let signature = state.signature()?;
    let options = GenerateOptions::new(Local::now().date_naive(), &layout)
        .with_signature(signature.as_ref());

    let receipts = generate_receipts(&state.to_form(), &options)?;

    std::fs::create_dir_all(&out_dir)?;
    for receipt in &receipts {
        let path = std::path::Path::new(&out_dir).join(&receipt.file_name);
        std::fs::write(&path, &receipt.pdf)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("Wrote {}", path.display());
    }

    if state.advance_to_next_period()? {
        info!(
            "Next period pre-filled: {:?} to {:?}",
            state.date_start, state.date_end
        );
    }
    state.stamp(Utc::now());
    save_state(&mut store, &state)?;

    Ok(())
}
