//! # Storefront
//!
//! The cart behind the Basket storefront page: hydrates the cart from
//! storage, runs the page's commands against it and raises toasts.
//!
//! ## Module Organization
//! ```text
//! storefront/
//! ├── lib.rs          ◄─── You are here (startup & tracing)
//! ├── config.rs       ◄─── StorefrontConfig (TOML)
//! ├── notify.rs       ◄─── Notifier trait, ToastCenter
//! ├── render.rs       ◄─── Renderer trait, CartView
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── cart.rs     ◄─── CartStore, CartState
//! │   └── catalog.rs  ◄─── CatalogState
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── cart.rs     ◄─── Cart commands and checkout
//! │   ├── catalog.rs  ◄─── Category filter
//! │   └── contact.rs  ◄─── Contact form
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod notify;
pub mod render;
pub mod state;

use std::sync::Arc;

use basket_core::{ContactForm, ProductCard};
use basket_db::{Database, DbConfig, KeyValueStore};
use tracing::info;
use tracing_subscriber::EnvFilter;

use commands::{CartCommands, FilterResponse};
use config::StorefrontConfig;
use error::ApiError;
use notify::ToastCenter;
use render::Renderer;
use state::{CartState, CartStore, CatalogState};

/// A running storefront: the cart, the catalog and the toast queue.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Storefront Startup                                │
/// │                                                                         │
/// │  1. Load StorefrontConfig (file or defaults)                            │
/// │                                                                         │
/// │  2. Open storage                                                        │
/// │     • SQLite with WAL mode, pending migrations applied                  │
/// │     • or any KeyValueStore handed in                                    │
/// │                                                                         │
/// │  3. Hydrate CartStore from the snapshot key                             │
/// │                                                                         │
/// │  4. Initialize state objects                                            │
/// │     • CartState: Arc<Mutex<CartStore>>                                  │
/// │     • CatalogState: product cards, filter = all                         │
/// │     • ToastCenter: shared Notifier                                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug)]
pub struct Storefront {
    config: StorefrontConfig,
    cart: CartCommands,
    catalog: CatalogState,
    toasts: Arc<ToastCenter>,
    database: Option<Database>,
}

impl Storefront {
    /// Starts the storefront on the configured SQLite file.
    pub async fn open(
        config: StorefrontConfig,
        renderer: Arc<dyn Renderer>,
        cards: Vec<ProductCard>,
    ) -> Result<Self, ApiError> {
        config.validate()?;

        let db_path = config.database_path()?;
        info!(?db_path, "Database path determined");

        let database = Database::new(DbConfig::new(db_path)).await?;
        info!("Database connected and migrations applied");

        let store: Arc<dyn KeyValueStore> = Arc::new(database.key_values());
        let mut storefront = Self::with_store(config, store, renderer, cards).await;
        storefront.database = Some(database);
        Ok(storefront)
    }

    /// Starts the storefront on an existing key-value store.
    pub async fn with_store(
        config: StorefrontConfig,
        store: Arc<dyn KeyValueStore>,
        renderer: Arc<dyn Renderer>,
        cards: Vec<ProductCard>,
    ) -> Self {
        let toasts = Arc::new(ToastCenter::new(config.toast_duration()));

        let cart_store = CartStore::hydrate(
            store,
            toasts.clone(),
            config.storage.storage_key.clone(),
            config.tax_rate(),
        )
        .await;

        let cart = CartCommands::new(
            CartState::new(cart_store),
            renderer,
            config.notifications.currency_symbol.clone(),
            config.checkout_grace(),
        );

        info!(cards = cards.len(), "Storefront ready");

        Storefront {
            config,
            cart,
            catalog: CatalogState::new(cards),
            toasts,
            database: None,
        }
    }

    pub fn config(&self) -> &StorefrontConfig {
        &self.config
    }

    /// Cart commands.
    pub fn cart(&self) -> &CartCommands {
        &self.cart
    }

    pub fn catalog(&self) -> &CatalogState {
        &self.catalog
    }

    pub fn toasts(&self) -> &ToastCenter {
        &self.toasts
    }

    /// Adds the product on the card at `index` to the cart.
    pub async fn add_card_to_cart(
        &self,
        index: usize,
    ) -> Result<commands::CartResponse, ApiError> {
        let card = self
            .catalog
            .card(index)
            .ok_or_else(|| ApiError::validation(format!("No product card at index {}", index)))?;
        self.cart
            .add_to_cart(&card.image_ref, &card.name, &card.price_text)
            .await
    }

    pub async fn filter_products(&self, category: &str) -> FilterResponse {
        commands::filter_products(&self.catalog, category).await
    }

    pub fn submit_contact_form(&self, form: &ContactForm) -> Result<ContactForm, ApiError> {
        commands::submit_contact_form(self.toasts.as_ref(), form)
    }

    /// Closes the database pool, if this storefront opened one.
    pub async fn shutdown(&self) {
        if let Some(db) = &self.database {
            db.close().await;
        }
        info!("Storefront stopped");
    }
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=storefront=trace` - Show trace for the storefront only
/// - Default: `info,basket=debug,storefront=debug,sqlx=warn`
///
/// Safe to call more than once; later calls are ignored.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,basket=debug,storefront=debug,sqlx=warn"));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
