//! # basket-core: Pure Cart Logic for the Basket Storefront
//!
//! This crate is the **heart** of the storefront cart. It contains the cart
//! state machine and its arithmetic as pure functions with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Basket Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Storefront page                              │   │
//! │  │    Product cards ──► Cart panel ──► Checkout ──► Toasts         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ commands                               │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 apps/storefront (CartStore)                     │   │
//! │  │    add_to_cart, change_quantity, remove_from_cart, checkout     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ basket-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│  │   │
//! │  │   │ LineItem  │  │   Money   │  │   Cart    │  │  prices   │  │   │
//! │  │   │ TaxRate   │  │  tax math │  │  totals   │  │  contact  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO STORAGE • NO TIMERS • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                basket-db (Storage Layer)                        │   │
//! │  │            SQLite key-value table holding the cart snapshot     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (LineItem, TaxRate, CartTotals, Severity)
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - The cart state machine
//! - [`catalog`] - Product category filter
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation (prices, contact form)
//!
//! ## Example Usage
//!
//! ```rust
//! use basket_core::{Cart, Money, TaxRate};
//! use chrono::Utc;
//!
//! let mut cart = Cart::new();
//! cart.add("img/tea.png", "Green Tea", Money::from_cents(1000), Utc::now());
//!
//! let totals = cart.totals(TaxRate::from_bps(1400));
//! assert_eq!(totals.tax.cents(), 140);
//! assert_eq!(totals.total.cents(), 1140);
//! ```

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{AddOutcome, Cart, QuantityChange};
pub use catalog::{CategoryFilter, ProductCard};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;
pub use validation::ContactForm;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax applied to every cart, in basis points (14%).
pub const DEFAULT_TAX_RATE_BPS: u32 = 1400;

/// Storage key the cart snapshot lives under.
///
/// Kept identical to the key the storefront page has always used, so carts
/// saved by earlier page versions still hydrate.
pub const DEFAULT_STORAGE_KEY: &str = "cartLists";

/// Delay between a successful checkout and the cart being cleared.
pub const CHECKOUT_GRACE_PERIOD_MS: u64 = 2_000;

/// How long a toast stays on screen unless dismissed.
pub const TOAST_DURATION_MS: u64 = 4_000;
