//! # basket-db: Storage Layer for the Basket Storefront
//!
//! This crate provides the durable key-value store the cart mirrors itself
//! into. It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Basket Data Flow                                 │
//! │                                                                         │
//! │  CartStore mutation (add / remove / clear ...)                         │
//! │       │  full JSON snapshot                                             │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     basket-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  KeyValue     │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │◄───│  Repository   │    │  (embedded)  │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │ implements                    │   │
//! │  │                        ┌───────▼───────┐   ┌───────────────┐  │   │
//! │  │                        │ KeyValueStore │◄──│ MemoryStore   │  │   │
//! │  │                        │    (trait)    │   │ (tests)       │  │   │
//! │  │                        └───────────────┘   └───────────────┘  │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite file (kv_store table)                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use basket_db::{Database, DbConfig, KeyValueStore};
//!
//! let db = Database::new(DbConfig::new("basket.db")).await?;
//! let store = db.key_values();
//! store.set("cartLists", "[]").await?;
//! ```

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use repository::kv::KeyValueRepository;
pub use store::{KeyValueStore, MemoryStore};
