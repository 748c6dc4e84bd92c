//! Import of portal table exports.
//!
//! The scraping layer parses each portal's discount tables and writes the
//! rows out as CSV; this module turns those exports into the snapshots the
//! planner consumes. Coupon cells are raw scraped text, so they go through
//! the tenant adapter; cells naming nothing in the catalog are skipped the
//! same way the parser skips unrecognized table rows.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use super::domain::{InventorySnapshot, UsageSnapshot};
use crate::tenants::TenantAdapter;

/// Errors raised while importing a portal export.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotImportError {
    #[error("failed to read export: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse export: {0}")]
    Csv(#[from] csv::Error),
    #[error("unknown history scope '{value}' (expected 'outlet' or 'all')")]
    UnknownScope { value: String },
}

#[derive(Debug, Deserialize)]
struct UsageRow {
    scope: String,
    coupon: String,
    quantity: String,
}

#[derive(Debug, Deserialize)]
struct InventoryRow {
    coupon: String,
    #[serde(default)]
    car: Option<u32>,
    #[serde(default)]
    total: Option<u32>,
}

/// Reads a usage export with `scope,coupon,quantity` rows. `scope` is
/// `outlet` for the tenant's own history table and `all` for the combined
/// cross-outlet table.
pub fn usage_from_reader<R: Read>(
    reader: R,
    adapter: &TenantAdapter,
) -> Result<UsageSnapshot, SnapshotImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut snapshot = UsageSnapshot::default();

    for record in csv_reader.deserialize::<UsageRow>() {
        let row = record?;
        let Some(key) = adapter.resolve(&row.coupon) else {
            debug!(coupon = %row.coupon, "skipping unrecognized coupon cell");
            continue;
        };
        let quantity = leading_quantity(&row.quantity);

        match row.scope.trim().to_ascii_lowercase().as_str() {
            "outlet" | "my" => snapshot.record_scoped(key, quantity),
            "all" | "global" => snapshot.record_global(key, quantity),
            other => {
                return Err(SnapshotImportError::UnknownScope {
                    value: other.to_string(),
                })
            }
        }
    }

    Ok(snapshot)
}

pub fn usage_from_path(
    path: impl AsRef<Path>,
    adapter: &TenantAdapter,
) -> Result<UsageSnapshot, SnapshotImportError> {
    let file = File::open(path)?;
    usage_from_reader(file, adapter)
}

/// Reads an inventory export with `coupon,car,total` rows. The portals
/// report a per-vehicle and an account-wide count that are normally equal;
/// the larger of the two is what is actually redeemable.
pub fn inventory_from_reader<R: Read>(
    reader: R,
    adapter: &TenantAdapter,
) -> Result<InventorySnapshot, SnapshotImportError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    let mut snapshot = InventorySnapshot::default();

    for record in csv_reader.deserialize::<InventoryRow>() {
        let row = record?;
        let Some(key) = adapter.resolve(&row.coupon) else {
            debug!(coupon = %row.coupon, "skipping unrecognized coupon cell");
            continue;
        };
        let available = row.car.unwrap_or(0).max(row.total.unwrap_or(0));
        snapshot.record(key, available);
    }

    Ok(snapshot)
}

pub fn inventory_from_path(
    path: impl AsRef<Path>,
    adapter: &TenantAdapter,
) -> Result<InventorySnapshot, SnapshotImportError> {
    let file = File::open(path)?;
    inventory_from_reader(file, adapter)
}

/// Extracts the first run of digits from a scraped quantity cell, so text
/// like `1매` or `수량: 2` parses; a cell with no digits counts as one row.
fn leading_quantity(raw: &str) -> u32 {
    let digits: String = raw
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().unwrap_or(1)
}

#[cfg(test)]
pub(crate) fn leading_quantity_for_tests(raw: &str) -> u32 {
    leading_quantity(raw)
}
