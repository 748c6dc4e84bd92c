use super::common::*;
use crate::workflows::redemption::domain::{CouponCategory, DayKind, UsageSnapshot};
use crate::workflows::redemption::{allocate, CouponCatalog};

#[test]
fn weekday_plan_combines_free_and_paid_coupons() {
    let result = allocate(
        180,
        &mixed_catalog(),
        &UsageSnapshot::default(),
        DayKind::Weekday,
    );

    assert_eq!(result.count_for(&key("free_1hour")), 1);
    assert_eq!(result.count_for(&key("paid_30min")), 4);
    assert_eq!(result.total_minutes(&mixed_catalog()), 180);
}

#[test]
fn returns_empty_result_when_target_already_met() {
    let usage = usage_with_scoped(&[("free_1hour", 1), ("paid_30min", 4)]);

    let result = allocate(180, &mixed_catalog(), &usage, DayKind::Weekday);

    assert!(result.is_empty());
}

#[test]
fn never_proposes_removing_excess_coupons() {
    let usage = usage_with_scoped(&[("paid_30min", 20)]);

    let result = allocate(180, &mixed_catalog(), &usage, DayKind::Weekday);

    assert!(result.is_empty());
}

#[test]
fn raw_demand_never_undershoots_the_gap() {
    let catalog = mixed_catalog();
    for target in [1, 29, 30, 31, 59, 60, 90, 125, 180, 500] {
        for scoped_paid in [0, 1, 3] {
            let usage = usage_with_scoped(&[("paid_30min", scoped_paid)]);
            let gap = u64::from(target).saturating_sub(u64::from(scoped_paid) * 30);

            let result = allocate(target, &catalog, &usage, DayKind::Weekday);

            assert!(
                result.total_minutes(&catalog) >= gap,
                "target {target} with {scoped_paid} paid coupons undershot",
            );
        }
    }
}

#[test]
fn ceil_rounding_overshoots_instead_of_undershooting() {
    let result = allocate(
        100,
        &mixed_catalog(),
        &UsageSnapshot::default(),
        DayKind::Weekday,
    );

    // 60 free + 2 × 30 paid = 120, the smallest whole-unit cover of 100.
    assert_eq!(result.total_minutes(&mixed_catalog()), 120);
}

#[test]
fn free_coupon_is_skipped_when_used_at_any_tenant() {
    let mut usage = UsageSnapshot::default();
    usage.record_global(key("free_1hour"), 1);

    let result = allocate(180, &mixed_catalog(), &usage, DayKind::Weekday);

    assert_eq!(result.count_for(&key("free_1hour")), 0);
    assert_eq!(result.count_for(&key("paid_30min")), 6);
}

#[test]
fn global_dedup_wins_even_when_scoped_count_is_zero() {
    let mut usage = UsageSnapshot::default();
    usage.record_global(key("free_1hour"), 2);

    let result = allocate(60, &mixed_catalog(), &usage, DayKind::Weekday);

    assert_eq!(result.count_for(&key("free_1hour")), 0);
    assert_eq!(result.count_for(&key("paid_30min")), 2);
}

#[test]
fn free_coupon_is_skipped_when_used_at_this_outlet() {
    let usage = usage_with_scoped(&[("free_1hour", 1)]);

    let result = allocate(180, &mixed_catalog(), &usage, DayKind::Weekday);

    assert_eq!(result.count_for(&key("free_1hour")), 0);
    // One hour already granted, 120 minutes left to fill.
    assert_eq!(result.count_for(&key("paid_30min")), 4);
}

#[test]
fn free_grant_is_capped_at_one_even_for_large_gaps() {
    let catalog = CouponCatalog::new(vec![
        definition("free_30min", "무료 30분할인", CouponCategory::Free, 30, 0),
        definition("paid_30min", "유료 30분할인", CouponCategory::Paid, 30, 1),
    ])
    .expect("catalog builds");

    let result = allocate(180, &catalog, &UsageSnapshot::default(), DayKind::Weekday);

    assert_eq!(result.count_for(&key("free_30min")), 1);
    assert_eq!(result.count_for(&key("paid_30min")), 5);
}

#[test]
fn second_free_definition_contributes_when_first_is_blocked() {
    let catalog = CouponCatalog::new(vec![
        definition("free_a", "무료할인 가", CouponCategory::Free, 60, 0),
        definition("free_b", "무료할인 나", CouponCategory::Free, 60, 0),
        definition("paid_30min", "유료 30분할인", CouponCategory::Paid, 30, 1),
    ])
    .expect("catalog builds");
    let mut usage = UsageSnapshot::default();
    usage.record_global(key("free_a"), 1);

    let result = allocate(120, &catalog, &usage, DayKind::Weekday);

    assert_eq!(result.count_for(&key("free_a")), 0);
    assert_eq!(result.count_for(&key("free_b")), 1);
    assert_eq!(result.count_for(&key("paid_30min")), 2);
}

#[test]
fn weekend_uses_weekend_category_when_present() {
    let result = allocate(
        120,
        &weekend_catalog(),
        &UsageSnapshot::default(),
        DayKind::Weekend,
    );

    assert_eq!(result.count_for(&key("free_1hour")), 1);
    assert_eq!(result.count_for(&key("weekend_1hour")), 1);
    assert_eq!(result.count_for(&key("paid_1hour")), 0);
}

#[test]
fn weekend_falls_back_to_paid_without_weekend_category() {
    let weekday = allocate(
        120,
        &mixed_catalog(),
        &UsageSnapshot::default(),
        DayKind::Weekday,
    );
    let weekend = allocate(
        120,
        &mixed_catalog(),
        &UsageSnapshot::default(),
        DayKind::Weekend,
    );

    assert_eq!(weekday, weekend);
    assert_eq!(weekend.count_for(&key("paid_30min")), 2);
}

#[test]
fn weekday_never_touches_weekend_coupons() {
    let result = allocate(
        180,
        &weekend_catalog(),
        &UsageSnapshot::default(),
        DayKind::Weekday,
    );

    assert_eq!(result.count_for(&key("weekend_1hour")), 0);
    assert_eq!(result.count_for(&key("paid_1hour")), 2);
}

#[test]
fn fill_pass_visits_definitions_in_priority_order() {
    let catalog = CouponCatalog::new(vec![
        definition("paid_1hour", "유료 1시간할인", CouponCategory::Paid, 60, 2),
        definition("paid_30min", "유료 30분할인", CouponCategory::Paid, 30, 1),
    ])
    .expect("catalog builds");

    let result = allocate(90, &catalog, &UsageSnapshot::default(), DayKind::Weekday);

    // Priority 1 wins even though it appears second in the catalog.
    assert_eq!(result.count_for(&key("paid_30min")), 3);
    assert_eq!(result.count_for(&key("paid_1hour")), 0);
}

#[test]
fn reordering_the_catalog_does_not_change_the_result() {
    let forward = CouponCatalog::new(vec![
        definition("free_1hour", "무료 1시간할인", CouponCategory::Free, 60, 0),
        definition("paid_30min", "유료 30분할인", CouponCategory::Paid, 30, 1),
        definition("paid_1hour", "유료 1시간할인", CouponCategory::Paid, 60, 2),
    ])
    .expect("catalog builds");
    let shuffled = CouponCatalog::new(vec![
        definition("paid_1hour", "유료 1시간할인", CouponCategory::Paid, 60, 2),
        definition("free_1hour", "무료 1시간할인", CouponCategory::Free, 60, 0),
        definition("paid_30min", "유료 30분할인", CouponCategory::Paid, 30, 1),
    ])
    .expect("catalog builds");
    let usage = UsageSnapshot::default();

    let from_forward = allocate(200, &forward, &usage, DayKind::Weekday);
    let from_shuffled = allocate(200, &shuffled, &usage, DayKind::Weekday);

    assert_eq!(from_forward, from_shuffled);
}

#[test]
fn duration_larger_than_remaining_still_grants_one_unit() {
    let catalog = CouponCatalog::new(vec![definition(
        "paid_1hour",
        "유료 1시간할인",
        CouponCategory::Paid,
        60,
        1,
    )])
    .expect("catalog builds");
    let usage = usage_with_scoped(&[("paid_1hour", 2)]);

    let result = allocate(150, &catalog, &usage, DayKind::Weekday);

    // 30 minutes short of the target still rounds up to a full coupon.
    assert_eq!(result.count_for(&key("paid_1hour")), 1);
}

#[test]
fn gap_stays_open_when_catalog_has_no_fill_coupons() {
    let usage = usage_with_scoped(&[("free_1hour", 1)]);

    let result = allocate(120, &free_only_catalog(), &usage, DayKind::Weekend);

    assert!(result.is_empty());
}

#[test]
fn empty_catalog_yields_empty_result() {
    let catalog = CouponCatalog::new(Vec::new()).expect("empty catalog is allowed");

    let result = allocate(180, &catalog, &UsageSnapshot::default(), DayKind::Weekday);

    assert!(result.is_empty());
}

#[test]
fn zero_target_yields_empty_result() {
    let result = allocate(
        0,
        &mixed_catalog(),
        &UsageSnapshot::default(),
        DayKind::Weekday,
    );

    assert!(result.is_empty());
}
