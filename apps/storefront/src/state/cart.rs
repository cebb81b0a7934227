//! # Cart State
//!
//! [`CartStore`] is the single writer of the cart: it applies every mutation
//! to the in-memory [`Cart`], mirrors the result to the key-value store and
//! tells the shopper what happened.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  Operation          Cart change               Toast                     │
//! │  ─────────          ───────────               ─────                     │
//! │                                                                         │
//! │  add()  ──────────► push / quantity += 1 ───► "{name} has been added…" │
//! │  set_quantity() ──► quantity = n (n ≤ 0 ────► "{name} removed…")       │
//! │  remove() ────────► items.remove(i) ────────► "{name} removed from cart"│
//! │  clear() ─────────► items = [] ─────────────► "Cart has been cleared"  │
//! │                                                                         │
//! │  Every change then writes the whole snapshot under one key.             │
//! │  A failed write keeps the change and adds an error toast.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;
use std::sync::Arc;

use basket_core::{
    AddOutcome, Cart, CartTotals, CoreResult, LineItem, Money, QuantityChange, Severity, TaxRate,
};
use basket_db::KeyValueStore;
use chrono::Utc;
use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

use crate::notify::Notifier;

/// Shown when a snapshot write fails.
pub const SAVE_FAILED_MESSAGE: &str = "Your cart could not be saved on this device";

/// The cart plus its persistence and notifications.
pub struct CartStore {
    cart: Cart,
    store: Arc<dyn KeyValueStore>,
    notifier: Arc<dyn Notifier>,
    storage_key: String,
    tax_rate: TaxRate,
    last_save_error: Option<String>,
}

impl CartStore {
    /// Loads the cart saved under `storage_key`.
    ///
    /// ## Startup Read
    /// - key absent → empty cart
    /// - snapshot unparseable → empty cart, logged at `warn`
    /// - store unreadable → empty cart, logged at `warn`
    pub async fn hydrate(
        store: Arc<dyn KeyValueStore>,
        notifier: Arc<dyn Notifier>,
        storage_key: impl Into<String>,
        tax_rate: TaxRate,
    ) -> Self {
        let storage_key = storage_key.into();

        let cart = match store.get(&storage_key).await {
            Ok(Some(snapshot)) => match Cart::from_snapshot(&snapshot) {
                Ok(cart) => cart,
                Err(e) => {
                    warn!(key = %storage_key, error = %e, "Stored cart is unreadable, starting empty");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(key = %storage_key, error = %e, "Could not read stored cart, starting empty");
                Cart::new()
            }
        };

        info!(key = %storage_key, items = cart.len(), "Cart hydrated");

        CartStore {
            cart,
            store,
            notifier,
            storage_key,
            tax_rate,
            last_save_error: None,
        }
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[LineItem] {
        self.cart.items()
    }

    pub fn len(&self) -> usize {
        self.cart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Current totals. Pure.
    pub fn totals(&self) -> CartTotals {
        self.cart.totals(self.tax_rate)
    }

    /// The error of the most recent snapshot write, cleared by the next
    /// successful one.
    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    /// Raises a toast through the store's notifier.
    pub fn notify(&self, message: &str, severity: Severity) {
        self.notifier.notify(message, severity);
    }

    /// Adds one unit of a product, appending it if it is new.
    pub async fn add(&mut self, image_ref: &str, name: &str, unit_price: Money) -> AddOutcome {
        let outcome = self.cart.add(image_ref, name, unit_price, Utc::now());
        debug!(name, ?outcome, "Cart add");

        self.persist().await;
        self.notify(&format!("{} has been added to the cart!", name), Severity::Cart);
        outcome
    }

    /// Sets a line's quantity; zero or less removes the line.
    pub async fn set_quantity(&mut self, index: usize, quantity: i64) -> CoreResult<QuantityChange> {
        let change = self.cart.set_quantity(index, quantity)?;
        debug!(index, quantity, "Cart quantity set");

        self.persist().await;
        if let QuantityChange::Removed(item) = &change {
            self.notify_removed(item);
        }
        Ok(change)
    }

    /// Removes the line at `index`.
    pub async fn remove(&mut self, index: usize) -> CoreResult<LineItem> {
        let item = self.cart.remove(index)?;
        debug!(index, name = %item.name, "Cart line removed");

        self.persist().await;
        self.notify_removed(&item);
        Ok(item)
    }

    /// Empties the cart. Returns how many lines were dropped.
    pub async fn clear(&mut self) -> usize {
        let dropped = self.cart.clear();
        debug!(dropped, "Cart cleared");

        self.persist().await;
        self.notify("Cart has been cleared", Severity::Error);
        dropped
    }

    fn notify_removed(&self, item: &LineItem) {
        self.notify(&format!("{} removed from cart", item.name), Severity::Error);
    }

    /// Writes the full snapshot. Failures are reported, never returned.
    async fn persist(&mut self) {
        let result = match self.cart.to_snapshot() {
            Ok(snapshot) => self
                .store
                .set(&self.storage_key, &snapshot)
                .await
                .map_err(|e| e.to_string()),
            Err(e) => Err(e.to_string()),
        };

        match result {
            Ok(()) => self.last_save_error = None,
            Err(e) => {
                warn!(key = %self.storage_key, error = %e, "Cart snapshot not saved");
                self.last_save_error = Some(e);
                self.notify(SAVE_FAILED_MESSAGE, Severity::Error);
            }
        }
    }
}

impl fmt::Debug for CartStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("storage_key", &self.storage_key)
            .field("tax_rate", &self.tax_rate)
            .field("last_save_error", &self.last_save_error)
            .finish_non_exhaustive()
    }
}

/// Shared handle to the one [`CartStore`].
///
/// ## Thread Safety
/// Commands and the deferred checkout task both go through the same
/// `tokio::sync::Mutex`, so mutations apply one at a time in arrival order.
#[derive(Debug, Clone)]
pub struct CartState {
    store: Arc<Mutex<CartStore>>,
}

impl CartState {
    pub fn new(store: CartStore) -> Self {
        CartState {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Exclusive access for a mutation.
    pub async fn lock(&self) -> MutexGuard<'_, CartStore> {
        self.store.lock().await
    }

    /// Executes a function with read access to the store.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let totals = cart_state.with_cart(|store| store.totals()).await;
    /// ```
    pub async fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&CartStore) -> R,
    {
        let store = self.store.lock().await;
        f(&store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::ToastCenter;
    use basket_db::MemoryStore;

    const KEY: &str = "cartLists";

    async fn store_with(backend: Arc<MemoryStore>) -> (CartStore, Arc<ToastCenter>) {
        let toasts = Arc::new(ToastCenter::default());
        let store = CartStore::hydrate(backend, toasts.clone(), KEY, TaxRate::default()).await;
        (store, toasts)
    }

    async fn fresh() -> (CartStore, Arc<MemoryStore>, Arc<ToastCenter>) {
        let backend = Arc::new(MemoryStore::new());
        let (store, toasts) = store_with(backend.clone()).await;
        (store, backend, toasts)
    }

    fn tea() -> (&'static str, &'static str, Money) {
        ("img/tea.png", "Green Tea", Money::from_cents(1000))
    }

    #[tokio::test]
    async fn test_add_same_product_twice_merges() {
        let (mut store, _, toasts) = fresh().await;
        let (img, name, price) = tea();

        store.add(img, name, price).await;
        let outcome = store.add(img, name, price).await;

        assert_eq!(outcome, AddOutcome::Incremented { index: 0, quantity: 2 });
        assert_eq!(store.len(), 1);
        assert_eq!(store.items()[0].quantity, 2);
        assert_eq!(
            toasts.messages(),
            vec![
                "Green Tea has been added to the cart!".to_string(),
                "Green Tea has been added to the cart!".to_string(),
            ]
        );
        assert_eq!(toasts.visible()[0].severity, Severity::Cart);
    }

    #[tokio::test]
    async fn test_totals_apply_fourteen_percent() {
        let (mut store, _, _) = fresh().await;
        let (img, name, price) = tea();
        store.add(img, name, price).await;

        let totals = store.totals();
        assert_eq!(totals.subtotal.cents(), 1000);
        assert_eq!(totals.tax.cents(), 140);
        assert_eq!(totals.total.cents(), 1140);
    }

    #[tokio::test]
    async fn test_set_quantity_zero_removes_and_notifies() {
        let (mut store, _, toasts) = fresh().await;
        let (img, name, price) = tea();
        store.add(img, name, price).await;
        store.add("img/mug.png", "Mug", Money::from_cents(800)).await;

        let change = store.set_quantity(0, 0).await.unwrap();
        assert!(matches!(change, QuantityChange::Removed(ref item) if item.name == "Green Tea"));
        assert_eq!(store.len(), 1);
        assert!(toasts.messages().contains(&"Green Tea removed from cart".to_string()));
    }

    #[tokio::test]
    async fn test_set_quantity_updates_without_toast() {
        let (mut store, _, toasts) = fresh().await;
        let (img, name, price) = tea();
        store.add(img, name, price).await;

        store.set_quantity(0, 5).await.unwrap();
        assert_eq!(store.items()[0].quantity, 5);
        assert_eq!(toasts.visible().len(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_index_changes_nothing() {
        let (mut store, backend, _) = fresh().await;
        let (img, name, price) = tea();
        store.add(img, name, price).await;
        let saved = backend.get(KEY).await.unwrap();

        assert!(store.remove(4).await.is_err());
        assert!(store.set_quantity(1, 3).await.is_err());
        assert_eq!(store.len(), 1);
        assert_eq!(backend.get(KEY).await.unwrap(), saved);
    }

    #[tokio::test]
    async fn test_remove_then_add_restarts_at_one() {
        let (mut store, _, _) = fresh().await;
        let (img, name, price) = tea();
        store.add(img, name, price).await;
        store.add(img, name, price).await;

        store.remove(0).await.unwrap();
        store.add(img, name, price).await;
        assert_eq!(store.items()[0].quantity, 1);
    }

    #[tokio::test]
    async fn test_clear_resets_totals_and_snapshot() {
        let (mut store, backend, toasts) = fresh().await;
        let (img, name, price) = tea();
        store.add(img, name, price).await;

        assert_eq!(store.clear().await, 1);
        assert!(store.is_empty());
        assert_eq!(store.totals(), CartTotals::default());
        assert_eq!(backend.get(KEY).await.unwrap().as_deref(), Some("[]"));
        assert_eq!(
            toasts.messages().last().map(String::as_str),
            Some("Cart has been cleared")
        );
    }

    #[tokio::test]
    async fn test_reload_reproduces_items_in_order() {
        let (mut store, backend, _) = fresh().await;
        store.add("img/a.png", "A", Money::from_cents(150)).await;
        store.add("img/b.png", "B", Money::from_cents(1999)).await;
        store.add("img/c.png", "C", Money::from_cents(5)).await;
        store.set_quantity(1, 4).await.unwrap();

        let (reloaded, _) = store_with(backend).await;
        assert_eq!(reloaded.items(), store.items());
        assert_eq!(reloaded.totals(), store.totals());
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_starts_empty() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(KEY, "{not json").await.unwrap();

        let (store, toasts) = store_with(backend).await;
        assert!(store.is_empty());
        assert!(toasts.visible().is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_snapshot_starts_empty_and_recovers() {
        for stored in [
            r#"[{"id":1,"image":"img/a.png","name":"A","price":9e16,"quantity":1}]"#,
            r#"[{"id":18446744073709551615,"image":"img/a.png","name":"A","price":1,"quantity":1}]"#,
        ] {
            let backend = Arc::new(MemoryStore::new());
            backend.set(KEY, stored).await.unwrap();

            let (mut store, _) = store_with(backend.clone()).await;
            assert!(store.is_empty());
            assert!(store.totals().total.is_zero());

            store.add("img/b.png", "B", Money::from_cents(100)).await;
            let (reloaded, _) = store_with(backend).await;
            assert_eq!(reloaded.items(), store.items());
        }
    }

    #[tokio::test]
    async fn test_reads_snapshot_written_by_page() {
        let backend = Arc::new(MemoryStore::new());
        backend
            .set(
                KEY,
                r#"[{"id":1718000000000,"image":"img/tea.png","name":"Green Tea","price":12.5,"quantity":2}]"#,
            )
            .await
            .unwrap();

        let (mut store, _) = store_with(backend).await;
        assert_eq!(store.items()[0].unit_price.cents(), 1250);
        assert_eq!(store.totals().subtotal.cents(), 2500);

        store.add("img/mug.png", "Mug", Money::from_cents(800)).await;
        assert!(store.items()[1].id > 1_718_000_000_000);
    }

    #[tokio::test]
    async fn test_failed_save_keeps_change_and_warns() {
        let backend = Arc::new(MemoryStore::with_quota(32));
        let (mut store, toasts) = store_with(backend.clone()).await;

        store
            .add("img/a-very-long-image-name.png", "Product", Money::from_cents(100))
            .await;

        assert_eq!(store.len(), 1);
        assert!(store.last_save_error().is_some());
        assert!(toasts.messages().contains(&SAVE_FAILED_MESSAGE.to_string()));
        assert_eq!(backend.get(KEY).await.unwrap(), None);

        store.clear().await;
        assert!(store.last_save_error().is_none());
    }

    #[tokio::test]
    async fn test_cart_state_serializes_access() {
        let (store, _, _) = fresh().await;
        let state = CartState::new(store);

        let (img, name, price) = tea();
        state.lock().await.add(img, name, price).await;
        let len = state.with_cart(|s| s.len()).await;
        assert_eq!(len, 1);
    }
}
