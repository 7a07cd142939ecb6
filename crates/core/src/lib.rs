//! Garden Records Core - Cart domain and shared types.
//!
//! This crate provides the pieces shared by every Garden Records component:
//! - `storefront` - Public record shop (catalog, cart modal, checkout summary)
//! - `cli` - Command-line tools for session migrations and cart inspection
//!
//! # Architecture
//!
//! The core crate contains only types, pure functions and traits - no network,
//! no database, no filesystem. Persistence goes through the [`KeyValueStore`]
//! trait, which callers implement over whatever backs one browser's storage.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product IDs, prices and currencies
//! - [`cart`] - Cart lines, the cart collection and the read-modify-write [`CartStore`]
//! - [`storage`] - The [`KeyValueStore`] trait and an in-memory backend

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod storage;
pub mod types;

pub use cart::{
    AddOutcome, Cart, CartCandidate, CartLine, CartStore, CandidateError, DEFAULT_CART_KEY,
    QuantityChange,
};
pub use storage::{KeyValueStore, MemoryStorage};
pub use types::*;
