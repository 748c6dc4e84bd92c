use std::fmt;

use serde::{Deserialize, Serialize};

use super::adapter::TenantAdapter;
use crate::workflows::redemption::{
    CouponCatalog, CouponCategory, CouponDefinition, CouponKey, DiscountTarget, UsageSnapshot,
};

/// The five parking-portal deployments this service plans for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TenantId {
    StoreA,
    StoreB,
    StoreC,
    StoreD,
    StoreE,
}

impl TenantId {
    pub const ALL: [TenantId; 5] = [
        TenantId::StoreA,
        TenantId::StoreB,
        TenantId::StoreC,
        TenantId::StoreD,
        TenantId::StoreE,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            TenantId::StoreA => "store_a",
            TenantId::StoreB => "store_b",
            TenantId::StoreC => "store_c",
            TenantId::StoreD => "store_d",
            TenantId::StoreE => "store_e",
        }
    }

    pub fn from_slug(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "store_a" | "a" => Some(TenantId::StoreA),
            "store_b" | "b" => Some(TenantId::StoreB),
            "store_c" | "c" => Some(TenantId::StoreC),
            "store_d" | "d" => Some(TenantId::StoreD),
            "store_e" | "e" => Some(TenantId::StoreE),
            _ => None,
        }
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything tenant-specific the planner needs: catalog, targets, legacy
/// display-name aliases, and portal quirks. Tenant differences live in these
/// configuration rows, never in engine code branches.
#[derive(Debug, Clone)]
pub struct TenantProfile {
    pub id: TenantId,
    pub catalog: CouponCatalog,
    pub target: DiscountTarget,
    adapter: TenantAdapter,
    scoped_history_mirrors_global: bool,
}

impl TenantProfile {
    pub fn adapter(&self) -> &TenantAdapter {
        &self.adapter
    }

    /// Applies portal quirks to a freshly parsed snapshot. Store C's portal
    /// only exposes the combined all-outlets history table, so its scoped
    /// view is derived from the global one.
    pub fn effective_usage(&self, usage: &UsageSnapshot) -> UsageSnapshot {
        if self.scoped_history_mirrors_global
            && usage.scoped_is_empty()
            && !usage.global_is_empty()
        {
            return usage.with_scoped_mirrored_from_global();
        }
        usage.clone()
    }
}

const STANDARD_TARGET: DiscountTarget = DiscountTarget {
    weekday_minutes: 180,
    weekend_minutes: 120,
};

fn definition(
    key: &str,
    display_name: &str,
    category: CouponCategory,
    duration_minutes: u32,
    priority: i32,
) -> CouponDefinition {
    CouponDefinition {
        key: CouponKey::new(key),
        display_name: display_name.to_string(),
        category,
        duration_minutes,
        priority,
    }
}

struct ProfileSeed {
    id: TenantId,
    definitions: Vec<CouponDefinition>,
    legacy_aliases: &'static [(&'static str, &'static str)],
    scoped_history_mirrors_global: bool,
}

impl ProfileSeed {
    fn build(self) -> TenantProfile {
        let catalog = CouponCatalog::new(self.definitions).expect("built-in catalog is valid");
        let adapter = TenantAdapter::for_catalog(&catalog, self.legacy_aliases);
        TenantProfile {
            id: self.id,
            catalog,
            target: STANDARD_TARGET,
            adapter,
            scoped_history_mirrors_global: self.scoped_history_mirrors_global,
        }
    }
}

fn store_a() -> TenantProfile {
    ProfileSeed {
        id: TenantId::StoreA,
        definitions: vec![
            definition("free_1hour", "30분할인권(무료)", CouponCategory::Free, 60, 0),
            definition("paid_1hour", "1시간할인권(유료)", CouponCategory::Paid, 60, 1),
            definition(
                "weekend_1hour",
                "1시간주말할인권(유료)",
                CouponCategory::Weekend,
                60,
                2,
            ),
        ],
        legacy_aliases: &[],
        scoped_history_mirrors_global: false,
    }
    .build()
}

fn store_b() -> TenantProfile {
    ProfileSeed {
        id: TenantId::StoreB,
        definitions: vec![
            definition("free_1hour", "무료 1시간할인", CouponCategory::Free, 60, 0),
            definition("paid_30min", "유료 30분할인", CouponCategory::Paid, 30, 1),
        ],
        legacy_aliases: &[],
        scoped_history_mirrors_global: false,
    }
    .build()
}

fn store_c() -> TenantProfile {
    ProfileSeed {
        id: TenantId::StoreC,
        definitions: vec![
            definition("free_1hour", "무료 1시간할인", CouponCategory::Free, 60, 0),
            definition("paid_30min", "유료 30분할인", CouponCategory::Paid, 30, 1),
            definition("paid_1hour", "유료 1시간할인", CouponCategory::Paid, 60, 2),
        ],
        // Older exports abbreviate the one-hour paid coupon.
        legacy_aliases: &[("유료할인권", "paid_1hour"), ("유료할인", "paid_1hour")],
        scoped_history_mirrors_global: true,
    }
    .build()
}

fn store_d() -> TenantProfile {
    ProfileSeed {
        id: TenantId::StoreD,
        definitions: vec![
            definition("free_1hour", "1시간 무료", CouponCategory::Free, 60, 0),
            definition("paid_30min", "30분 유료", CouponCategory::Paid, 30, 1),
        ],
        legacy_aliases: &[],
        scoped_history_mirrors_global: false,
    }
    .build()
}

fn store_e() -> TenantProfile {
    ProfileSeed {
        id: TenantId::StoreE,
        definitions: vec![
            definition("free_1hour", "(무료) 1시간할인", CouponCategory::Free, 60, 0),
            definition("paid_1hour", "(유료) 1시간할인", CouponCategory::Paid, 60, 1),
        ],
        legacy_aliases: &[],
        scoped_history_mirrors_global: false,
    }
    .build()
}

/// Registry of the built-in tenant profiles.
#[derive(Debug, Clone)]
pub struct TenantDirectory {
    profiles: Vec<TenantProfile>,
}

impl TenantDirectory {
    /// The standard five-deployment directory.
    pub fn standard() -> Self {
        Self {
            profiles: vec![store_a(), store_b(), store_c(), store_d(), store_e()],
        }
    }

    pub fn with_profiles(profiles: Vec<TenantProfile>) -> Self {
        Self { profiles }
    }

    pub fn get(&self, id: TenantId) -> Option<&TenantProfile> {
        self.profiles.iter().find(|profile| profile.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &TenantProfile> {
        self.profiles.iter()
    }
}
