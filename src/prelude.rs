//! Partcart prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError, CartLine, StockRelease},
    catalog::{Catalog, CatalogError},
    config::{ConfigError, ShopConfig, StorageKeys},
    display::{cart_table, catalog_table, format_money, part_table, search},
    parts::{Part, PartId},
    pricing::PricingError,
    receipt::CheckoutReceipt,
    shop::{Shop, ShopError},
    storage::{FileStorage, MemoryStorage, Storage, StorageError},
    validation::{PartDraft, PartForm, ValidationError},
};
