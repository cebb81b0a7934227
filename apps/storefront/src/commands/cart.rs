//! # Cart Commands
//!
//! Everything the cart panel and the product cards can ask for.
//!
//! ## Cart Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Lifecycle                                       │
//! │                                                                         │
//! │  ┌──────────┐  add_to_cart   ┌───────────┐  checkout   ┌────────────┐   │
//! │  │  Empty   │──────────────►│ Populated │────────────►│  Pending   │   │
//! │  │  Cart    │◄──────────────│           │             │   clear    │   │
//! │  └──────────┘  clear_cart /  └───────────┘             └─────┬──────┘   │
//! │       ▲        last remove        │  change_quantity         │          │
//! │       │                           │  remove_from_cart        │ grace    │
//! │       │                           │  apply(action)           │ period   │
//! │       └───────────────────────────┴──────────────────────────┘          │
//! │                                                                         │
//! │  checkout on an empty cart only raises "Your cart is empty!".           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use basket_core::validation::{parse_price, validate_image_ref, validate_product_name};
use basket_core::{CartTotals, LineItem, Severity};
use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::render::{CartAction, CartView, Renderer};
use crate::state::{CartState, CartStore};

/// Cart response including items and totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub items: Vec<LineItem>,
    pub totals: CartTotals,
}

impl From<&CartStore> for CartResponse {
    fn from(store: &CartStore) -> Self {
        CartResponse {
            items: store.items().to_vec(),
            totals: store.totals(),
        }
    }
}

/// Result of a checkout request.
#[derive(Debug)]
pub enum Checkout {
    /// Nothing to order; nothing was scheduled.
    EmptyCart,
    /// Order placed; the cart clears when the grace period ends.
    Placed(PendingClear),
}

/// The deferred clear that follows a checkout.
///
/// Dropping the handle leaves the clear scheduled.
#[derive(Debug)]
pub struct PendingClear {
    handle: JoinHandle<()>,
}

impl PendingClear {
    /// Stops the clear if it has not run yet.
    pub fn cancel(self) {
        debug!("Pending checkout clear cancelled");
        self.handle.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Waits for the clear. Returns false if it was cancelled.
    pub async fn wait(self) -> bool {
        match self.handle.await {
            Ok(()) => true,
            Err(e) if e.is_cancelled() => false,
            Err(e) => {
                warn!(error = %e, "Checkout clear task failed");
                false
            }
        }
    }
}

/// Cart commands bound to one cart and one panel.
#[derive(Clone)]
pub struct CartCommands {
    cart: CartState,
    renderer: Arc<dyn Renderer>,
    currency_symbol: String,
    checkout_grace: Duration,
}

impl CartCommands {
    pub fn new(
        cart: CartState,
        renderer: Arc<dyn Renderer>,
        currency_symbol: impl Into<String>,
        checkout_grace: Duration,
    ) -> Self {
        CartCommands {
            cart,
            renderer,
            currency_symbol: currency_symbol.into(),
            checkout_grace,
        }
    }

    /// Shared cart handle.
    pub fn state(&self) -> &CartState {
        &self.cart
    }

    /// Gets the current cart contents.
    pub async fn get_cart(&self) -> CartResponse {
        debug!("get_cart command");
        self.cart.with_cart(|store| CartResponse::from(store)).await
    }

    /// Builds the panel view without rendering it.
    pub async fn view(&self) -> CartView {
        let store = self.cart.lock().await;
        build_view(&store, &self.currency_symbol)
    }

    /// Adds one unit of the product on a card.
    ///
    /// ## Arguments
    /// * `image` - Image reference from the card
    /// * `name` - Product name from the card
    /// * `price_text` - Price as printed, e.g. `"$12.50"`
    ///
    /// ## Errors
    /// A blank name or image, or a price that is not a non-negative number,
    /// is rejected before the cart is touched and the shopper is told.
    pub async fn add_to_cart(
        &self,
        image: &str,
        name: &str,
        price_text: &str,
    ) -> Result<CartResponse, ApiError> {
        debug!(image, name, price_text, "add_to_cart command");

        let mut store = self.cart.lock().await;

        let checked = validate_product_name(name)
            .and_then(|_| validate_image_ref(image))
            .and_then(|_| parse_price(price_text));
        let unit_price = match checked {
            Ok(price) => price,
            Err(e) => {
                warn!(name, price_text, error = %e, "Product card rejected");
                store.notify(
                    &format!("Could not add {} to the cart", name.trim()),
                    Severity::Error,
                );
                return Err(e.into());
            }
        };

        store.add(image.trim(), name.trim(), unit_price).await;
        Ok(self.render(&store))
    }

    /// Sets the quantity of a line; zero or less removes it.
    pub async fn change_quantity(
        &self,
        index: usize,
        quantity: i64,
    ) -> Result<CartResponse, ApiError> {
        debug!(index, quantity, "change_quantity command");

        let mut store = self.cart.lock().await;
        store.set_quantity(index, quantity).await?;
        Ok(self.render(&store))
    }

    /// Removes a line from the cart.
    pub async fn remove_from_cart(&self, index: usize) -> Result<CartResponse, ApiError> {
        debug!(index, "remove_from_cart command");

        let mut store = self.cart.lock().await;
        store.remove(index).await?;
        Ok(self.render(&store))
    }

    /// Runs one of the buttons on a cart line.
    pub async fn apply(&self, index: usize, action: CartAction) -> Result<CartResponse, ApiError> {
        debug!(index, ?action, "apply command");

        let mut store = self.cart.lock().await;
        let current = store
            .items()
            .get(index)
            .map(|item| item.quantity)
            .ok_or_else(|| {
                ApiError::from(basket_core::CoreError::IndexOutOfRange {
                    index,
                    len: store.len(),
                })
            })?;

        match action.target_quantity(current) {
            Some(quantity) => {
                store.set_quantity(index, quantity).await?;
            }
            None => {
                store.remove(index).await?;
            }
        }
        Ok(self.render(&store))
    }

    /// Empties the cart.
    pub async fn clear_cart(&self) -> CartResponse {
        debug!("clear_cart command");

        let mut store = self.cart.lock().await;
        store.clear().await;
        self.render(&store)
    }

    /// Places the order.
    ///
    /// ## Behavior
    /// - Empty cart: "Your cart is empty!", nothing scheduled
    /// - Otherwise: "Your order has been placed. Thank you!", then after the
    ///   grace period the cart is cleared and the panel closed
    ///
    /// Changes made during the grace period are applied and then wiped by
    /// the clear.
    pub async fn checkout(&self) -> Checkout {
        debug!("checkout command");

        {
            let store = self.cart.lock().await;
            if store.is_empty() {
                store.notify("Your cart is empty!", Severity::Error);
                return Checkout::EmptyCart;
            }

            info!(
                items = store.len(),
                total = %store.totals().total,
                "Order placed"
            );
            store.notify("Your order has been placed. Thank you!", Severity::Success);
        }

        let this = self.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(this.checkout_grace).await;

            let mut store = this.cart.lock().await;
            store.clear().await;
            this.render(&store);
            this.renderer.set_panel_open(false);
            debug!("Checkout clear completed");
        });

        Checkout::Placed(PendingClear { handle })
    }

    /// Renders the panel and shows it.
    pub async fn open_cart(&self) -> CartResponse {
        debug!("open_cart command");

        let store = self.cart.lock().await;
        let response = self.render(&store);
        self.renderer.set_panel_open(true);
        response
    }

    /// Hides the panel.
    pub fn close_cart(&self) {
        debug!("close_cart command");
        self.renderer.set_panel_open(false);
    }

    fn render(&self, store: &CartStore) -> CartResponse {
        self.renderer.render(&build_view(store, &self.currency_symbol));
        CartResponse::from(store)
    }
}

impl std::fmt::Debug for CartCommands {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartCommands")
            .field("cart", &self.cart)
            .field("currency_symbol", &self.currency_symbol)
            .field("checkout_grace", &self.checkout_grace)
            .finish_non_exhaustive()
    }
}

fn build_view(store: &CartStore, symbol: &str) -> CartView {
    CartView::build(store.items(), &store.totals(), store.tax_rate(), symbol)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::notify::ToastCenter;
    use basket_core::TaxRate;
    use basket_db::MemoryStore;
    use std::sync::Mutex;

    /// Remembers the last view and panel state.
    #[derive(Default)]
    struct PanelSpy {
        last: Mutex<Option<CartView>>,
        open: Mutex<Option<bool>>,
        renders: Mutex<usize>,
    }

    impl Renderer for PanelSpy {
        fn render(&self, view: &CartView) {
            *self.last.lock().unwrap() = Some(view.clone());
            *self.renders.lock().unwrap() += 1;
        }

        fn set_panel_open(&self, open: bool) {
            *self.open.lock().unwrap() = Some(open);
        }
    }

    struct Harness {
        commands: CartCommands,
        panel: Arc<PanelSpy>,
        toasts: Arc<ToastCenter>,
    }

    async fn harness() -> Harness {
        let toasts = Arc::new(ToastCenter::default());
        let store = CartStore::hydrate(
            Arc::new(MemoryStore::new()),
            toasts.clone(),
            "cartLists",
            TaxRate::default(),
        )
        .await;
        let panel = Arc::new(PanelSpy::default());
        let commands = CartCommands::new(
            CartState::new(store),
            panel.clone(),
            "$",
            Duration::from_secs(2),
        );
        Harness {
            commands,
            panel,
            toasts,
        }
    }

    #[tokio::test]
    async fn test_add_to_cart_parses_price_and_renders() {
        let h = harness().await;

        let response = h
            .commands
            .add_to_cart("img/tea.png", "Green Tea", "$12.50")
            .await
            .unwrap();

        assert_eq!(response.items.len(), 1);
        assert_eq!(response.totals.subtotal.cents(), 1250);
        let view = h.panel.last.lock().unwrap().clone().unwrap();
        assert_eq!(view.lines[0].unit_price, "12.50 $");
    }

    #[tokio::test]
    async fn test_add_to_cart_rejects_non_numeric_price() {
        let h = harness().await;

        let err = h
            .commands
            .add_to_cart("img/tea.png", "Green Tea", "call us")
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(h.commands.get_cart().await.items.is_empty());
        assert_eq!(
            h.toasts.messages(),
            vec!["Could not add Green Tea to the cart".to_string()]
        );
        assert_eq!(*h.panel.renders.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_add_to_cart_rejects_price_above_maximum() {
        let h = harness().await;

        let err = h
            .commands
            .add_to_cart("img/gold.png", "Gold Bar", "$90000000000000000")
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert!(h.commands.get_cart().await.items.is_empty());
        assert_eq!(*h.panel.renders.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_quantity_limits() {
        let h = harness().await;
        h.commands
            .add_to_cart("img/gold.png", "Gold Bar", "$1000000")
            .await
            .unwrap();

        let response = h.commands.change_quantity(0, u32::MAX as i64).await.unwrap();
        assert_eq!(response.items[0].quantity, u32::MAX);
        assert_eq!(
            response.totals.subtotal.cents(),
            100_000_000 * u32::MAX as i64
        );

        let err = h.commands.change_quantity(0, u32::MAX as i64 + 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(h.commands.get_cart().await.items[0].quantity, u32::MAX);
    }

    #[tokio::test]
    async fn test_apply_actions() {
        let h = harness().await;
        h.commands.add_to_cart("img/mug.png", "Mug", "8").await.unwrap();

        let response = h.commands.apply(0, CartAction::Increase).await.unwrap();
        assert_eq!(response.items[0].quantity, 2);

        h.commands.apply(0, CartAction::Decrease).await.unwrap();
        let response = h.commands.apply(0, CartAction::Decrease).await.unwrap();
        assert!(response.items.is_empty());

        let err = h.commands.apply(0, CartAction::Remove).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test]
    async fn test_stale_index_is_cart_error() {
        let h = harness().await;
        let err = h.commands.change_quantity(2, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);

        let err = h.commands.remove_from_cart(0).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::CartError);
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_empty_cart_schedules_nothing() {
        let h = harness().await;

        assert!(matches!(h.commands.checkout().await, Checkout::EmptyCart));
        assert_eq!(h.toasts.messages(), vec!["Your cart is empty!".to_string()]);
        assert_eq!(*h.panel.open.lock().unwrap(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_checkout_clears_after_grace_period() {
        let h = harness().await;
        h.commands.open_cart().await;
        h.commands.add_to_cart("img/tea.png", "Green Tea", "10").await.unwrap();

        let pending = match h.commands.checkout().await {
            Checkout::Placed(pending) => pending,
            Checkout::EmptyCart => panic!("cart was not empty"),
        };
        tokio::task::yield_now().await;
        assert!(h
            .toasts
            .messages()
            .contains(&"Your order has been placed. Thank you!".to_string()));

        tokio::time::advance(Duration::from_millis(1_999)).await;
        tokio::task::yield_now().await;
        assert_eq!(h.commands.get_cart().await.items.len(), 1);
        assert!(!pending.is_finished());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert!(pending.wait().await);

        assert!(h.commands.get_cart().await.items.is_empty());
        assert_eq!(*h.panel.open.lock().unwrap(), Some(false));
        assert!(h.panel.last.lock().unwrap().as_ref().unwrap().is_empty);
        assert_eq!(
            h.toasts.messages().last().map(String::as_str),
            Some("Cart has been cleared")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancelled_checkout_keeps_cart() {
        let h = harness().await;
        h.commands.add_to_cart("img/tea.png", "Green Tea", "10").await.unwrap();

        match h.commands.checkout().await {
            Checkout::Placed(pending) => pending.cancel(),
            Checkout::EmptyCart => panic!("cart was not empty"),
        }

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(h.commands.get_cart().await.items.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_add_during_grace_period_is_wiped() {
        let h = harness().await;
        h.commands.add_to_cart("img/tea.png", "Green Tea", "10").await.unwrap();

        let pending = match h.commands.checkout().await {
            Checkout::Placed(pending) => pending,
            Checkout::EmptyCart => panic!("cart was not empty"),
        };

        tokio::time::advance(Duration::from_millis(500)).await;
        let during = h.commands.add_to_cart("img/mug.png", "Mug", "8").await.unwrap();
        assert_eq!(during.items.len(), 2);

        assert!(pending.wait().await);
        assert!(h.commands.get_cart().await.items.is_empty());
    }

    #[tokio::test]
    async fn test_open_and_close_panel() {
        let h = harness().await;

        let response = h.commands.open_cart().await;
        assert!(response.items.is_empty());
        assert_eq!(*h.panel.open.lock().unwrap(), Some(true));

        h.commands.close_cart();
        assert_eq!(*h.panel.open.lock().unwrap(), Some(false));
    }
}
