use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::domain::{CouponCategory, CouponDefinition, CouponKey};

/// Immutable, insertion-ordered collection of a tenant's coupon definitions.
///
/// Construction is the configuration-loading boundary: malformed definitions
/// are rejected here so the allocation passes can assume well-formed data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CouponCatalog {
    definitions: Vec<CouponDefinition>,
}

impl CouponCatalog {
    /// An empty catalog is allowed and simply yields empty allocations.
    pub fn new(definitions: Vec<CouponDefinition>) -> Result<Self, CatalogError> {
        let mut seen = BTreeSet::new();
        for definition in &definitions {
            if definition.duration_minutes == 0 {
                return Err(CatalogError::ZeroDuration {
                    key: definition.key.clone(),
                });
            }
            if !seen.insert(definition.key.clone()) {
                return Err(CatalogError::DuplicateKey {
                    key: definition.key.clone(),
                });
            }
        }
        Ok(Self { definitions })
    }

    pub fn definitions(&self) -> &[CouponDefinition] {
        &self.definitions
    }

    pub fn definition(&self, key: &CouponKey) -> Option<&CouponDefinition> {
        self.definitions
            .iter()
            .find(|definition| &definition.key == key)
    }

    pub fn duration_minutes(&self, key: &CouponKey) -> Option<u32> {
        self.definition(key)
            .map(|definition| definition.duration_minutes)
    }

    pub fn contains(&self, key: &CouponKey) -> bool {
        self.definition(key).is_some()
    }

    /// Definitions of one category in ascending priority. The sort is stable,
    /// so equal priorities keep catalog insertion order.
    pub fn in_category(&self, category: CouponCategory) -> Vec<&CouponDefinition> {
        let mut selected: Vec<&CouponDefinition> = self
            .definitions
            .iter()
            .filter(|definition| definition.category == category)
            .collect();
        selected.sort_by_key(|definition| definition.priority);
        selected
    }

    pub fn has_weekend_category(&self) -> bool {
        self.definitions
            .iter()
            .any(|definition| definition.category == CouponCategory::Weekend)
    }
}

/// Validation errors raised while loading a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("coupon '{key}' declares a zero-minute duration")]
    ZeroDuration { key: CouponKey },
    #[error("coupon key '{key}' appears more than once in the catalog")]
    DuplicateKey { key: CouponKey },
}
