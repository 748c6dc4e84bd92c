use super::catalog::CouponCatalog;
use super::domain::{AllocationResult, CouponApplication, InventorySnapshot};

/// Clamps raw demand to available stock and converts it to application
/// records the scraping layer can execute.
///
/// Clipping only ever reduces counts; entries that clip to zero are dropped
/// rather than reported. A shortfall on one coupon type is never carried
/// over to top up another type in the same run — the validator and the
/// orchestrator decide what to do about an unmet target.
pub fn clip(
    result: &AllocationResult,
    inventory: &InventorySnapshot,
    catalog: &CouponCatalog,
) -> Vec<CouponApplication> {
    let mut applications = Vec::new();

    for entry in result.entries() {
        let Some(definition) = catalog.definition(&entry.key) else {
            continue;
        };
        let actual = entry.count.min(inventory.available_for(&entry.key));
        if actual == 0 {
            continue;
        }
        applications.push(CouponApplication {
            key: definition.key.clone(),
            display_name: definition.display_name.clone(),
            category: definition.category,
            count: actual,
        });
    }

    applications
}
