use crate::workflows::redemption::{CouponCatalog, CouponKey};

/// Normalizes raw cell text scraped from a portal table: strips BOM and
/// zero-width characters, collapses whitespace, lowercases ASCII.
pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

/// Stateless name↔key translation for one tenant's portal.
///
/// Portal history tables are keyed by display name, and the same coupon has
/// accumulated several display-name variants over the years. Resolution
/// tries an exact canonical-key match first (so callers that already speak
/// keys pass through), then scans the alias list in declaration order for
/// the first alias contained in the scraped cell. The adapter holds no
/// allocation logic.
#[derive(Debug, Clone)]
pub struct TenantAdapter {
    aliases: Vec<(String, CouponKey)>,
    keys: Vec<CouponKey>,
}

impl TenantAdapter {
    /// Builds the alias table from the catalog's display names, in catalog
    /// order, followed by any legacy aliases still seen in scraped tables.
    pub fn for_catalog(catalog: &CouponCatalog, legacy_aliases: &[(&str, &str)]) -> Self {
        let mut aliases = Vec::new();
        let mut keys = Vec::new();

        for definition in catalog.definitions() {
            aliases.push((
                normalize_label(&definition.display_name),
                definition.key.clone(),
            ));
            keys.push(definition.key.clone());
        }

        for (alias, key) in legacy_aliases {
            aliases.push((normalize_label(alias), CouponKey::new(*key)));
        }

        Self { aliases, keys }
    }

    /// Resolves a scraped cell (or an already-canonical key) to a coupon key.
    pub fn resolve(&self, cell: &str) -> Option<CouponKey> {
        let trimmed = cell.trim();
        if let Some(key) = self.keys.iter().find(|key| key.as_str() == trimmed) {
            return Some(key.clone());
        }

        let normalized = normalize_label(cell);
        self.aliases
            .iter()
            .find(|(alias, _)| !alias.is_empty() && normalized.contains(alias.as_str()))
            .map(|(_, key)| key.clone())
    }
}
