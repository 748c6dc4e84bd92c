//! The allocation passes: close the gap between the minutes already granted
//! and the day's target, one coupon category at a time.

use super::catalog::CouponCatalog;
use super::domain::{AllocationResult, CouponCategory, DayKind, UsageSnapshot};

/// Computes the raw, pre-inventory demand needed to reach `target_minutes`.
///
/// Pure and deterministic: identical inputs always produce identical output.
/// The result may overshoot the target by up to one coupon duration (counts
/// are rounded up), but it never undershoots; and it never proposes removing
/// coupons that were already applied.
pub fn allocate(
    target_minutes: u32,
    catalog: &CouponCatalog,
    usage: &UsageSnapshot,
    day: DayKind,
) -> AllocationResult {
    let mut result = AllocationResult::default();

    let current: u64 = catalog
        .definitions()
        .iter()
        .map(|definition| {
            u64::from(usage.scoped_count(&definition.key)) * u64::from(definition.duration_minutes)
        })
        .sum();
    let mut remaining = u64::from(target_minutes).saturating_sub(current);
    if remaining == 0 {
        return result;
    }

    // Free pass. A free coupon is granted at most once per vehicle, and a
    // redemption recorded at any tenant blocks it everywhere.
    for definition in catalog.in_category(CouponCategory::Free) {
        if usage.global_count(&definition.key) > 0 {
            continue;
        }
        let grant_cap = u64::from(1u32.saturating_sub(usage.scoped_count(&definition.key)));
        let need = units_to_cover(remaining, definition.duration_minutes).min(grant_cap);
        if need > 0 {
            result.push(definition.key.clone(), need as u32);
            remaining = remaining.saturating_sub(need * u64::from(definition.duration_minutes));
        }
    }

    // Fill pass. Weekdays use paid coupons; weekend days use the weekend
    // category when the tenant has one, otherwise fall back to paid.
    let fill_category = match day {
        DayKind::Weekday => CouponCategory::Paid,
        DayKind::Weekend if catalog.has_weekend_category() => CouponCategory::Weekend,
        DayKind::Weekend => CouponCategory::Paid,
    };

    for definition in catalog.in_category(fill_category) {
        if remaining == 0 {
            break;
        }
        let need = units_to_cover(remaining, definition.duration_minutes);
        if need > 0 {
            result.push(definition.key.clone(), need as u32);
            remaining = remaining.saturating_sub(need * u64::from(definition.duration_minutes));
        }
    }

    result
}

/// Whole coupon units needed to cover `remaining` minutes, rounded up so a
/// partial-duration gap still gets one unit.
fn units_to_cover(remaining: u64, duration_minutes: u32) -> u64 {
    remaining.div_ceil(u64::from(duration_minutes))
}
