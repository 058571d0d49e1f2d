//! Partcart
//!
//! Partcart is a parts catalog and shopping cart core: stock-aware add-to-cart, quantity
//! adjustment and checkout, written through to a key-value store as JSON snapshots.

pub mod cart;
pub mod catalog;
pub mod config;
pub mod display;
pub mod parts;
pub mod prelude;
pub mod pricing;
pub mod receipt;
pub mod shop;
pub mod storage;
pub mod validation;
