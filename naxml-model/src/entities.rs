//! Maintenance-synced reference entities: Department, TenderType, TaxRate.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::ids::{CompanyId, StoreId};
use crate::vendor::PosSource;

/// Shared shape for the three maintenance-synced entities. `code` is the
/// locally derived identifier; `pos_code` is the vendor's own code, preserved
/// verbatim (leading zeros intact).
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Department {
    pub store_id: StoreId,
    pub company_id: CompanyId,
    pub code: String,
    pub pos_code: String,
    pub name: String,
    pub is_taxable: bool,
    pub is_active: bool,
    pub pos_source: PosSource,
    pub last_synced_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TenderType {
    pub store_id: StoreId,
    pub company_id: CompanyId,
    pub code: String,
    pub pos_code: String,
    pub name: String,
    pub is_electronic: bool,
    pub is_active: bool,
    pub pos_source: PosSource,
    pub last_synced_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TaxRate {
    pub store_id: StoreId,
    pub company_id: CompanyId,
    pub code: String,
    pub pos_code: String,
    pub name: String,
    pub rate: Decimal,
    pub is_active: bool,
    pub pos_source: PosSource,
    pub last_synced_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A price-book line as exported to a POS, not synced back in. This crate
/// has no inbound projection for `PriceBookMaintenance` (see
/// `MovementReportProcessor::process`'s catch-all arm); the shape below only
/// needs to carry what `PosAdapter::export_price_book` writes out.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceBookItem {
    pub pos_code: String,
    pub description: String,
    pub price: Decimal,
    pub department_pos_code: String,
}

/// Derive a local `code` from a vendor `pos_code`/display name:
/// if `pos_code` matches `^[A-Z0-9_]+$` (case-insensitively) use it uppercased
/// and clipped to 50 chars; otherwise slugify the display name.
pub fn derive_local_code(pos_code: &str, display_name: &str) -> String {
    let upper = pos_code.to_ascii_uppercase();
    let is_code_like = !upper.is_empty()
        && upper
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if is_code_like {
        return upper.chars().take(50).collect();
    }

    slugify(display_name)
}

/// Uppercase, replace non-alphanumerics with `_`, trim leading/trailing `_`.
pub fn slugify(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push('_');
        }
    }
    out.trim_matches('_').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_like_pos_code_is_preserved_uppercased() {
        assert_eq!(derive_local_code("dept01", "Groceries"), "DEPT01");
    }

    #[test]
    fn code_like_pos_code_clipped_to_50() {
        let long = "a".repeat(80);
        assert_eq!(derive_local_code(&long, "x").len(), 50);
    }

    #[test]
    fn non_code_pos_code_slugifies_display_name() {
        assert_eq!(derive_local_code("!@#", "Hot Foods & Deli"), "HOT_FOODS_DELI");
    }

    #[test]
    fn slugify_trims_leading_trailing_underscores() {
        assert_eq!(slugify("  Beer/Wine  "), "BEER_WINE");
    }

    #[test]
    fn leading_zero_pos_code_round_trips() {
        // "001" must survive as a string, never coerced to a number.
        assert_eq!(derive_local_code("001", "Unleaded"), "001");
    }
}
