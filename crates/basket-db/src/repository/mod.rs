//! # Repository Module
//!
//! SQL access lives here and nowhere else.
//!
//! ## Available Repositories
//!
//! - [`kv::KeyValueRepository`] - Durable key-value rows (`kv_store` table)

pub mod kv;
