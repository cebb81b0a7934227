//! # Commands Module
//!
//! Everything the storefront page can invoke.
//!
//! ## Command Organization
//! ```text
//! commands/
//! ├── mod.rs      ◄─── You are here (exports)
//! ├── cart.rs     ◄─── Cart manipulation, checkout, panel
//! ├── catalog.rs  ◄─── Category filter
//! └── contact.rs  ◄─── Contact form
//! ```
//!
//! ## How Commands Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Command Flow                                         │
//! │                                                                         │
//! │  Page event (button click, form submit)                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  commands.add_to_cart(image, name, "$12.50").await                      │
//! │         │                                                               │
//! │         ├── validate input ──► ApiError + error toast                   │
//! │         ├── lock CartState, mutate CartStore (persists, notifies)       │
//! │         └── Renderer::render(&CartView)                                 │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Result<CartResponse, ApiError>  (serde-serializable)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cart;
pub mod catalog;
pub mod contact;

pub use cart::{CartCommands, CartResponse, Checkout, PendingClear};
pub use catalog::{filter_products, visible_products, FilterResponse};
pub use contact::submit_contact_form;
