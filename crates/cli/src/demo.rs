//! Fixed demo sequence over a fresh store, reporting each outcome on `out`.

use std::io::Write;
use std::path::Path;

use stockbook_core::DomainError;
use stockbook_inventory::{
    InventoryStore, LoadOutcome, PersistenceError, RemoveOutcome, format_low_items, load_data,
    print_data, save_data,
};

use crate::config::Config;

/// Run the demo and return the final store.
///
/// Every domain and persistence failure is reported and recovered; only a
/// failed write to `out` is returned as an error.
pub fn run<W: Write>(config: &Config, out: &mut W) -> anyhow::Result<InventoryStore> {
    let mut store = InventoryStore::new();
    let mut log: Vec<String> = Vec::new();

    for (name, qty) in [("apple", 10), ("banana", 5)] {
        if let Err(err) = store.add_item_logged(name, qty, &mut log) {
            report_domain_error(out, &err)?;
        }
    }

    for (name, qty) in [("apple", 3), ("orange", 1)] {
        match store.remove_item(name, qty) {
            Ok(RemoveOutcome::Removed) => writeln!(out, "Removed {name} from inventory")?,
            Ok(RemoveOutcome::Decremented { .. }) => {}
            Err(err) => report_domain_error(out, &err)?,
        }
    }

    writeln!(out, "Apple stock: {}", store.get_quantity("apple"))?;
    writeln!(
        out,
        "Low items: {}",
        format_low_items(&store.check_low_items(config.low_stock_threshold))
    )?;

    let path = config.inventory_path.as_path();
    match save_data(&store, path) {
        Ok(()) => writeln!(out, "Saved inventory to {}", path.display())?,
        Err(err) => writeln!(out, "Error saving to {}: {err}", path.display())?,
    }

    load_and_report(&mut store, path, out)?;

    print_data(&store, out)?;

    for entry in &log {
        tracing::debug!(entry = %entry, "add recorded");
    }

    Ok(store)
}

/// Reload `store` from `path` and print one line describing the outcome.
fn load_and_report<W: Write>(
    store: &mut InventoryStore,
    path: &Path,
    out: &mut W,
) -> std::io::Result<()> {
    match load_data(store, path) {
        Ok(outcome) => report_load(out, path, outcome),
        Err(err) => report_load_error(out, path, &err),
    }
}

fn report_domain_error<W: Write>(out: &mut W, err: &DomainError) -> std::io::Result<()> {
    match err {
        DomainError::NotFound(_) => writeln!(out, "{err}"),
        DomainError::Validation(_) => writeln!(out, "Error: {err}"),
    }
}

fn report_load<W: Write>(out: &mut W, path: &Path, outcome: LoadOutcome) -> std::io::Result<()> {
    match outcome {
        LoadOutcome::Loaded { .. } => writeln!(out, "Loaded inventory from {}", path.display()),
        LoadOutcome::Missing => writeln!(
            out,
            "File {} not found. Starting with empty inventory.",
            path.display()
        ),
    }
}

fn report_load_error<W: Write>(
    out: &mut W,
    path: &Path,
    err: &PersistenceError,
) -> std::io::Result<()> {
    match err {
        PersistenceError::NotAMap { .. } => writeln!(
            out,
            "Warning: {} does not contain a valid inventory map",
            path.display()
        ),
        PersistenceError::Decode { .. } => {
            writeln!(out, "Error: {} is not valid JSON", path.display())
        }
        PersistenceError::InvalidQuantity { .. } => writeln!(out, "Error: {err}"),
        PersistenceError::Io { .. } | PersistenceError::Encode(_) => {
            writeln!(out, "Error loading {}: {err}", path.display())
        }
    }
}
