//! # Cart State Machine
//!
//! The ordered list of line items and every rule that governs it.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  add(image, name, price)                                               │
//! │     ├── (name, image) present? ──► quantity += 1                       │
//! │     └── otherwise ──────────────► push LineItem { quantity: 1 }        │
//! │                                                                         │
//! │  set_quantity(index, n)                                                │
//! │     ├── n ≤ 0 ──────────────────► remove(index)                        │
//! │     └── otherwise ──────────────► items[index].quantity = n            │
//! │                                                                         │
//! │  remove(index) ─────────────────► items.remove(index)                  │
//! │  clear() ───────────────────────► items = []                           │
//! │  totals(rate) ──────────────────► (subtotal, tax, total), read only    │
//! │                                                                         │
//! │  States: EMPTY ◄──────► POPULATED                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - Insertion order is preserved
//! - No two items share a `(name, image_ref)` pair
//! - Every item has `quantity ≥ 1`
//! - Ids are strictly increasing and never reused within a cart, until they
//!   reach `MAX_ITEM_ID` and the items are renumbered
//! - Every line total fits in `Money`

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{CartTotals, LineItem, TaxRate, MAX_ITEM_ID};

/// What `add` did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// A new line item was appended at `index`.
    Appended { index: usize },
    /// The existing item at `index` now has `quantity`.
    Incremented { index: usize, quantity: u32 },
}

impl AddOutcome {
    /// Position of the affected item.
    pub fn index(&self) -> usize {
        match *self {
            AddOutcome::Appended { index } | AddOutcome::Incremented { index, .. } => index,
        }
    }
}

/// What `set_quantity` did to the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuantityChange {
    /// The item's quantity was replaced.
    Updated { index: usize, quantity: u32 },
    /// A non-positive quantity removed the item.
    Removed(LineItem),
}

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    items: Vec<LineItem>,
    /// Highest id handed out (or hydrated) so far.
    last_id: u64,
}

impl Cart {
    /// Creates a new empty cart.
    pub fn new() -> Self {
        Cart::default()
    }

    /// Rebuilds a cart from stored items.
    ///
    /// Stored data is only a mirror, so it is normalised rather than trusted:
    /// items with quantity 0 are dropped, duplicate products are merged into
    /// the first occurrence and ids above `MAX_ITEM_ID` are reissued.
    pub fn from_items(stored: Vec<LineItem>) -> Self {
        let mut cart = Cart::new();
        cart.last_id = stored
            .iter()
            .map(|item| item.id)
            .filter(|id| *id <= MAX_ITEM_ID)
            .max()
            .unwrap_or(0);

        for mut item in stored {
            if item.quantity == 0 {
                continue;
            }
            if item.id > MAX_ITEM_ID {
                item.id = cart.issue_id(0);
            }
            match cart.position_of(&item.name, &item.image_ref) {
                Some(index) => {
                    let existing = &mut cart.items[index];
                    existing.quantity = existing.quantity.saturating_add(item.quantity);
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Parses a stored JSON snapshot.
    pub fn from_snapshot(json: &str) -> Result<Self, serde_json::Error> {
        let items: Vec<LineItem> = serde_json::from_str(json)?;
        Ok(Cart::from_items(items))
    }

    /// Serializes the whole cart for storage (full snapshot, never a delta).
    pub fn to_snapshot(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Returns the item at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.items.get(index)
    }

    /// Returns the number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Checks if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Adds one unit of a product.
    ///
    /// `now` seeds the id of a newly appended item. Ids stay strictly
    /// increasing even when the clock stalls or steps backwards.
    pub fn add(
        &mut self,
        image_ref: &str,
        name: &str,
        unit_price: Money,
        now: DateTime<Utc>,
    ) -> AddOutcome {
        if let Some(index) = self.position_of(name, image_ref) {
            let item = &mut self.items[index];
            item.quantity = item.quantity.saturating_add(1);
            return AddOutcome::Incremented {
                index,
                quantity: item.quantity,
            };
        }

        let id = self.next_id(now);
        self.items.push(LineItem {
            id,
            image_ref: image_ref.to_string(),
            name: name.to_string(),
            unit_price,
            quantity: 1,
        });
        AddOutcome::Appended {
            index: self.items.len() - 1,
        }
    }

    /// Sets the quantity of the item at `index`; `quantity ≤ 0` removes it.
    pub fn set_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<QuantityChange> {
        self.check_index(index)?;

        if quantity <= 0 {
            return self.remove(index).map(QuantityChange::Removed);
        }

        let item = &self.items[index];
        let max = max_quantity(item.unit_price);
        let quantity = u32::try_from(quantity)
            .ok()
            .filter(|q| item.unit_price.checked_multiply_quantity(*q).is_some())
            .ok_or(CoreError::QuantityTooLarge {
                requested: quantity,
                max,
            })?;
        self.items[index].quantity = quantity;
        Ok(QuantityChange::Updated { index, quantity })
    }

    /// Removes and returns the item at `index`.
    pub fn remove(&mut self, index: usize) -> CoreResult<LineItem> {
        self.check_index(index)?;
        Ok(self.items.remove(index))
    }

    /// Empties the cart and returns how many line items were dropped.
    ///
    /// The id watermark is kept, so ids are not reused after a clear.
    pub fn clear(&mut self) -> usize {
        let dropped = self.items.len();
        self.items.clear();
        dropped
    }

    /// Computes subtotal, tax and total. Pure; the cart is not touched.
    pub fn totals(&self, rate: TaxRate) -> CartTotals {
        let subtotal: Money = self.items.iter().map(LineItem::line_total).sum();
        let total_quantity = self.items.iter().map(|i| u64::from(i.quantity)).sum();
        CartTotals::from_subtotal(subtotal, rate, self.items.len(), total_quantity)
    }

    fn position_of(&self, name: &str, image_ref: &str) -> Option<usize> {
        self.items.iter().position(|i| i.is_product(name, image_ref))
    }

    fn check_index(&self, index: usize) -> CoreResult<()> {
        if index < self.items.len() {
            Ok(())
        } else {
            Err(CoreError::IndexOutOfRange {
                index,
                len: self.items.len(),
            })
        }
    }

    fn next_id(&mut self, now: DateTime<Utc>) -> u64 {
        let millis = u64::try_from(now.timestamp_millis()).unwrap_or(0);
        self.issue_id(millis)
    }

    /// Hands out `max(floor, last + 1)`, never above `MAX_ITEM_ID`.
    fn issue_id(&mut self, floor: u64) -> u64 {
        if self.last_id >= MAX_ITEM_ID {
            self.rebase_ids();
        }
        let after_last = self.last_id.checked_add(1).unwrap_or(MAX_ITEM_ID);
        let id = floor.min(MAX_ITEM_ID).max(after_last);
        self.last_id = id;
        id
    }

    /// Renumbers the current items `1..=len` once the id space is used up.
    fn rebase_ids(&mut self) {
        for (n, item) in self.items.iter_mut().enumerate() {
            item.id = n as u64 + 1;
        }
        self.last_id = self.items.len() as u64;
    }
}

/// Largest quantity whose line total still fits in `Money`.
fn max_quantity(unit_price: Money) -> i64 {
    match unit_price.cents() {
        0 => u32::MAX as i64,
        cents => (i64::MAX / cents).min(u32::MAX as i64),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
