//! # Cart Panel Rendering
//!
//! The storefront does not draw anything itself. Each mutation builds a
//! [`CartView`] and hands it to a [`Renderer`], which owns the actual page.
//!
//! ## Panel Layout
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │  [img] Green Tea        12.50 $    [-] 2 [+]   [x]     │  ← CartLineView
//! │  [img] Mug               8.00 $    [-] 1 [+]   [x]     │
//! ├────────────────────────────────────────────────────────┤
//! │  Subtotal                                   33.00 $    │
//! │  Tax (14%)                                   4.62 $    │
//! │  Total                                      37.62 $    │
//! └────────────────────────────────────────────────────────┘
//! ```

use basket_core::{CartTotals, LineItem, TaxRate};
use serde::{Deserialize, Serialize};

/// The three buttons on every cart line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CartAction {
    Increase,
    Decrease,
    Remove,
}

impl CartAction {
    pub const ALL: [CartAction; 3] = [CartAction::Increase, CartAction::Decrease, CartAction::Remove];

    /// Quantity this action asks for, or `None` for an outright removal.
    /// A decrease from 1 yields 0, which the cart treats as a removal.
    pub fn target_quantity(self, current: u32) -> Option<i64> {
        match self {
            CartAction::Increase => Some(i64::from(current) + 1),
            CartAction::Decrease => Some(i64::from(current) - 1),
            CartAction::Remove => None,
        }
    }
}

/// One rendered cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineView {
    /// Position the line's actions address.
    pub index: usize,
    pub id: u64,
    pub image: String,
    pub name: String,
    /// Formatted unit price, e.g. `"12.50 $"`.
    pub unit_price: String,
    pub quantity: u32,
    pub line_total: String,
    pub actions: [CartAction; 3],
}

/// Everything the cart panel shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub is_empty: bool,
    pub lines: Vec<CartLineView>,
    pub item_count: usize,
    pub total_quantity: u64,
    pub subtotal: String,
    /// e.g. `"Tax (14%)"`
    pub tax_label: String,
    pub tax: String,
    pub total: String,
}

impl CartView {
    /// Builds the panel from the current items and their totals.
    pub fn build(items: &[LineItem], totals: &CartTotals, rate: TaxRate, symbol: &str) -> Self {
        let lines = items
            .iter()
            .enumerate()
            .map(|(index, item)| CartLineView {
                index,
                id: item.id,
                image: item.image_ref.clone(),
                name: item.name.clone(),
                unit_price: item.unit_price.with_symbol(symbol),
                quantity: item.quantity,
                line_total: item.line_total().with_symbol(symbol),
                actions: CartAction::ALL,
            })
            .collect();

        CartView {
            is_empty: items.is_empty(),
            lines,
            item_count: totals.item_count,
            total_quantity: totals.total_quantity,
            subtotal: totals.subtotal.with_symbol(symbol),
            tax_label: format!("Tax ({}%)", rate.percentage()),
            tax: totals.tax.with_symbol(symbol),
            total: totals.total.with_symbol(symbol),
        }
    }
}

/// Draws the cart panel.
pub trait Renderer: Send + Sync {
    /// Replaces the panel contents.
    fn render(&self, view: &CartView);

    /// Shows or hides the panel.
    fn set_panel_open(&self, open: bool);
}

/// Renderer for headless use; drops every view.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopRenderer;

impl Renderer for NoopRenderer {
    fn render(&self, _view: &CartView) {}

    fn set_panel_open(&self, _open: bool) {}
}
