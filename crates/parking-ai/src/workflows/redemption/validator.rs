use super::catalog::CouponCatalog;
use super::domain::CouponApplication;

/// Whether a proposed set of applications grants at least `target_minutes`.
///
/// Purely informational: a `false` here is a signal for the orchestration
/// layer to alert, not an error — whatever stock allowed is still applied.
/// Applications referencing keys missing from the catalog contribute zero.
pub fn meets_target(
    applications: &[CouponApplication],
    catalog: &CouponCatalog,
    target_minutes: u32,
) -> bool {
    let granted: u64 = applications
        .iter()
        .map(|application| {
            u64::from(application.count)
                * u64::from(catalog.duration_minutes(&application.key).unwrap_or(0))
        })
        .sum();

    granted >= u64::from(target_minutes)
}
