//! # Domain Types
//!
//! Core domain types used throughout the storefront cart.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    LineItem     │   │   CartTotals    │   │    Severity     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (time ms)   │   │  subtotal       │   │  Info           │       │
//! │  │  image_ref  ┐   │   │  tax            │   │  Success        │       │
//! │  │  name       ┘key│   │  total          │   │  Error          │       │
//! │  │  unit_price     │   │  item_count     │   │  Cart           │       │
//! │  │  quantity ≥ 1   │   │  total_quantity │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │    TaxRate      │                                                    │
//! │  │  bps (u32)      │                                                    │
//! │  │  1400 = 14%     │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;
use crate::DEFAULT_TAX_RATE_BPS;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1400 bps = 14%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

/// The storefront charges a flat 14%.
impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::from_bps(DEFAULT_TAX_RATE_BPS)
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// Largest line item id: the biggest integer a JSON number holds exactly.
pub const MAX_ITEM_ID: u64 = (1 << 53) - 1;

/// One product entry in the cart.
///
/// ## Identity
/// Two entries describe the same product when both `name` and `image_ref`
/// match. `id` is only a stable handle; it is never used for lookups.
///
/// ## Storage Shape
/// Serialized with the field names the storefront page has always written:
/// ```json
/// { "id": 1718000000000, "image": "img/tea.png", "name": "Green Tea", "price": 12.5, "quantity": 2 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Time-based id in milliseconds, unique within a cart.
    #[serde(deserialize_with = "bounded_id")]
    #[ts(type = "number")]
    pub id: u64,

    /// Opaque reference to the product image.
    #[serde(rename = "image")]
    pub image_ref: String,

    /// Product display name.
    pub name: String,

    /// Unit price, stored as a decimal number.
    #[serde(rename = "price", with = "crate::money::decimal")]
    #[ts(type = "number")]
    pub unit_price: Money,

    /// Always at least 1 while the item is in a cart.
    pub quantity: u32,
}

impl LineItem {
    /// Returns true if this entry is the product identified by `(name, image_ref)`.
    #[inline]
    pub fn is_product(&self, name: &str, image_ref: &str) -> bool {
        self.name == name && self.image_ref == image_ref
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

fn bounded_id<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let id = u64::deserialize(deserializer)?;
    if id > MAX_ITEM_ID {
        return Err(D::Error::custom(format!("item id {id} exceeds {MAX_ITEM_ID}")));
    }
    Ok(id)
}

// =============================================================================
// Cart Totals
// =============================================================================

/// Derived cart totals. Never stored; recomputed from the items on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartTotals {
    /// Number of distinct line items.
    #[ts(type = "number")]
    pub item_count: usize,
    /// Sum of all quantities.
    #[ts(type = "number")]
    pub total_quantity: u64,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl CartTotals {
    /// Builds totals from a subtotal, applying `rate` for the tax line.
    pub fn from_subtotal(
        subtotal: Money,
        rate: TaxRate,
        item_count: usize,
        total_quantity: u64,
    ) -> Self {
        let tax = subtotal.calculate_tax(rate);
        CartTotals {
            item_count,
            total_quantity,
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

// =============================================================================
// Notification Severity
// =============================================================================

/// How a toast notification is styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Neutral information.
    Info,
    /// An action completed (order placed, message sent).
    Success,
    /// Something went away or went wrong (removal, empty cart, failed save).
    Error,
    /// A product landed in the cart.
    Cart,
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Info
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
            Severity::Cart => "cart",
        };
        f.write_str(name)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn tea() -> LineItem {
        LineItem {
            id: 1,
            image_ref: "img/tea.png".to_string(),
            name: "Green Tea".to_string(),
            unit_price: Money::from_cents(1250),
            quantity: 2,
        }
    }

    #[test]
    fn test_default_tax_rate_is_fourteen_percent() {
        let rate = TaxRate::default();
        assert_eq!(rate.bps(), 1400);
        assert!((rate.percentage() - 14.0).abs() < 0.001);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(tea().line_total().cents(), 2500);
    }

    #[test]
    fn test_product_identity_needs_name_and_image() {
        let item = tea();
        assert!(item.is_product("Green Tea", "img/tea.png"));
        assert!(!item.is_product("Green Tea", "img/tea-large.png"));
        assert!(!item.is_product("Black Tea", "img/tea.png"));
    }

    #[test]
    fn test_line_item_storage_shape() {
        let json = serde_json::to_value(tea()).unwrap();
        assert_eq!(json["image"], "img/tea.png");
        assert_eq!(json["price"], 12.5);
        assert_eq!(json["quantity"], 2);
        assert!(json.get("image_ref").is_none());
    }

    #[test]
    fn test_totals_from_subtotal() {
        let totals = CartTotals::from_subtotal(Money::from_cents(1000), TaxRate::default(), 1, 1);
        assert_eq!(totals.tax.cents(), 140);
        assert_eq!(totals.total.cents(), 1140);
    }

    #[test]
    fn test_severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::Cart).unwrap(), "\"cart\"");
        assert_eq!(Severity::Success.to_string(), "success");
    }
}
