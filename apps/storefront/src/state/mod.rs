//! # State Module
//!
//! Manages the storefront's shared state.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  ┌──────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │    CartState     │  │   CatalogState   │  │    ToastCenter       │  │
//! │  │                  │  │                  │  │    (notify.rs)       │  │
//! │  │  Arc<Mutex<      │  │  product cards   │  │                      │  │
//! │  │    CartStore>>   │  │  RwLock<filter>  │  │  Mutex<Vec<Toast>>   │  │
//! │  └──────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • CartState: one writer at a time, shared with the checkout task      │
//! │  • CatalogState: cards are fixed, only the filter changes              │
//! │  • ToastCenter: short critical sections, never held across .await      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart;
mod catalog;

pub use cart::{CartState, CartStore, SAVE_FAILED_MESSAGE};
pub use catalog::CatalogState;
