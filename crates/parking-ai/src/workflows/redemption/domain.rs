use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Canonical identifier for one coupon type within a tenant's catalog.
///
/// The portals themselves key their tables by human-readable display names;
/// those are translated at the boundary and never used as lookup keys here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CouponKey(pub String);

impl CouponKey {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier wrapper for the vehicle being discounted (plate number).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VehicleId(pub String);

impl fmt::Display for VehicleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Coupon categories recognized by the allocation passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CouponCategory {
    Free,
    Paid,
    Weekend,
}

impl CouponCategory {
    pub const fn label(self) -> &'static str {
        match self {
            CouponCategory::Free => "free",
            CouponCategory::Paid => "paid",
            CouponCategory::Weekend => "weekend",
        }
    }
}

/// One catalog entry: a coupon type with its fixed duration and try-order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponDefinition {
    pub key: CouponKey,
    pub display_name: String,
    pub category: CouponCategory,
    pub duration_minutes: u32,
    /// Lower values are tried first; ties keep catalog insertion order.
    pub priority: i32,
}

/// Target discount duration per day type, one per tenant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscountTarget {
    pub weekday_minutes: u32,
    pub weekend_minutes: u32,
}

impl DiscountTarget {
    pub const fn minutes_for(self, day: DayKind) -> u32 {
        match day {
            DayKind::Weekday => self.weekday_minutes,
            DayKind::Weekend => self.weekend_minutes,
        }
    }
}

/// Day classification driving target selection and the fill-pass category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayKind {
    Weekday,
    Weekend,
}

impl DayKind {
    /// Saturday and Sunday are weekend days; public holidays are handled by
    /// [`DayCalendar`] since the portals expose no calendar of their own.
    pub fn for_date(date: NaiveDate) -> Self {
        match date.weekday() {
            Weekday::Sat | Weekday::Sun => DayKind::Weekend,
            _ => DayKind::Weekday,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DayKind::Weekday => "weekday",
            DayKind::Weekend => "weekend",
        }
    }
}

/// Deployment-level calendar that treats listed public holidays as weekends.
#[derive(Debug, Clone, Default)]
pub struct DayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl DayCalendar {
    pub fn new(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    pub fn day_kind(&self, date: NaiveDate) -> DayKind {
        if self.holidays.contains(&date) {
            return DayKind::Weekend;
        }
        DayKind::for_date(date)
    }
}

/// Usage already recorded for one vehicle, split by scope.
///
/// `scoped` counts redemptions attributable to this tenant/outlet; `global`
/// counts redemptions anywhere, which is what enforces the one-time-only
/// free coupon rule across tenants. Built fresh per vehicle lookup and
/// discarded after one allocation call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageSnapshot {
    scoped: BTreeMap<CouponKey, u32>,
    global: BTreeMap<CouponKey, u32>,
}

impl UsageSnapshot {
    pub fn new(scoped: BTreeMap<CouponKey, u32>, global: BTreeMap<CouponKey, u32>) -> Self {
        Self { scoped, global }
    }

    pub fn scoped_count(&self, key: &CouponKey) -> u32 {
        self.scoped.get(key).copied().unwrap_or(0)
    }

    pub fn global_count(&self, key: &CouponKey) -> u32 {
        self.global.get(key).copied().unwrap_or(0)
    }

    pub fn record_scoped(&mut self, key: CouponKey, count: u32) {
        *self.scoped.entry(key).or_insert(0) += count;
    }

    pub fn record_global(&mut self, key: CouponKey, count: u32) {
        *self.global.entry(key).or_insert(0) += count;
    }

    pub fn scoped_is_empty(&self) -> bool {
        self.scoped.values().all(|count| *count == 0)
    }

    pub fn global_is_empty(&self) -> bool {
        self.global.values().all(|count| *count == 0)
    }

    /// Snapshot with the scoped view replaced by the global one. Used for
    /// portals that only expose the combined all-outlets history table.
    pub fn with_scoped_mirrored_from_global(&self) -> Self {
        Self {
            scoped: self.global.clone(),
            global: self.global.clone(),
        }
    }
}

/// Coupons currently in stock for this vehicle lookup; missing entries are
/// treated as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySnapshot {
    available: BTreeMap<CouponKey, u32>,
}

impl InventorySnapshot {
    pub fn new(available: BTreeMap<CouponKey, u32>) -> Self {
        Self { available }
    }

    pub fn available_for(&self, key: &CouponKey) -> u32 {
        self.available.get(key).copied().unwrap_or(0)
    }

    pub fn record(&mut self, key: CouponKey, count: u32) {
        let slot = self.available.entry(key).or_insert(0);
        *slot = (*slot).max(count);
    }

    pub fn is_empty(&self) -> bool {
        self.available.values().all(|count| *count == 0)
    }
}

/// One line of raw demand produced by the allocation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationEntry {
    pub key: CouponKey,
    pub count: u32,
}

/// Pre-inventory demand, ordered as allocated (free pass before fill pass,
/// then ascending priority). Produced and consumed within one planning call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllocationResult {
    entries: Vec<AllocationEntry>,
}

impl AllocationResult {
    pub fn push(&mut self, key: CouponKey, count: u32) {
        self.entries.push(AllocationEntry { key, count });
    }

    pub fn entries(&self) -> &[AllocationEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn count_for(&self, key: &CouponKey) -> u32 {
        self.entries
            .iter()
            .filter(|entry| &entry.key == key)
            .map(|entry| entry.count)
            .sum()
    }

    /// Total minutes this demand would grant, resolved against the catalog.
    pub fn total_minutes(&self, catalog: &super::catalog::CouponCatalog) -> u64 {
        self.entries
            .iter()
            .map(|entry| {
                u64::from(entry.count)
                    * u64::from(catalog.duration_minutes(&entry.key).unwrap_or(0))
            })
            .sum()
    }
}

/// The externally actionable artifact of one planning run.
///
/// The display name and category are what the scraping layer needs to click
/// the right button; the canonical key rides along so downstream checks
/// never have to key on display names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponApplication {
    pub key: CouponKey,
    pub display_name: String,
    pub category: CouponCategory,
    pub count: u32,
}

impl CouponApplication {
    pub fn is_valid(&self) -> bool {
        self.count > 0
    }
}
