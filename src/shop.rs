//! Shop
//!
//! The application context: owns the catalog, cart and storage, and writes every change
//! through to storage. A change and its write succeed or fail together; if the write fails,
//! the in-memory stores are rolled back to where they were before the call.

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::{
    cart::{Cart, CartError, CartLine},
    catalog::{Catalog, CatalogError},
    config::{ConfigError, ShopConfig},
    parts::{Part, PartId},
    pricing::PricingError,
    receipt::CheckoutReceipt,
    storage::{Storage, StorageError, load_records, save_records},
    validation::{PartForm, ValidationError},
};

/// Errors surfaced to the user by shop operations.
#[derive(Debug, Error)]
pub enum ShopError {
    /// Invalid form input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Catalog update failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Cart update failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// The change could not be saved and was undone.
    #[error("changes could not be saved: {0}")]
    Persistence(#[from] StorageError),

    /// Invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Snapshots an operation writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Touches {
    Catalog,
    Both,
}

impl Touches {
    fn cart(self) -> bool {
        self == Self::Both
    }
}

/// Shop
#[derive(Debug)]
pub struct Shop<S: Storage> {
    catalog: Catalog,
    cart: Cart,
    storage: S,
    config: ShopConfig,
    currency: &'static Currency,
}

impl<S: Storage> Shop<S> {
    /// Open a shop over `storage`, loading any saved catalog and cart.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Config`] if the configured currency is unknown.
    pub fn open(storage: S, config: ShopConfig) -> Result<Self, ShopError> {
        let currency = config.currency()?;

        let catalog = Catalog::from_parts(load_records::<Part>(&storage, &config.keys.catalog));
        let cart = Cart::from_lines(
            load_records::<CartLine>(&storage, &config.keys.cart),
            config.stock_release(),
        );

        debug!(
            parts = catalog.len(),
            lines = cart.len(),
            "loaded shop state"
        );

        Ok(Self {
            catalog,
            cart,
            storage,
            config,
            currency,
        })
    }

    /// Create or update a part from form input.
    ///
    /// When editing, the form quantity is the part's total stock: units already reserved in
    /// the cart are subtracted from it.
    ///
    /// # Errors
    ///
    /// - [`ShopError::Validation`]: the form is invalid.
    /// - [`ShopError::Catalog`]: the edited stock is below the units reserved in the cart.
    /// - [`ShopError::Persistence`]: the catalog could not be saved.
    pub fn save_part(&mut self, form: &PartForm) -> Result<Part, ShopError> {
        let draft = form.parse()?;

        let part = self.transact(Touches::Catalog, |catalog, cart| {
            let reserved = draft
                .id()
                .and_then(|id| cart.get(id))
                .map_or(0, |line| line.quantity);

            Ok(catalog.upsert_reserved(draft, reserved)?)
        })?;

        debug!(part = %part.id, name = %part.name, quantity = part.quantity, "saved part");

        Ok(part)
    }

    /// Delete a part from the catalog. Cart lines for the part are kept.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Persistence`] if the catalog could not be saved.
    pub fn delete_part(&mut self, id: PartId) -> Result<Option<Part>, ShopError> {
        let removed = self.transact(Touches::Catalog, |catalog, _| Ok(catalog.remove(id)))?;

        debug!(part = %id, removed = removed.is_some(), "deleted part");

        Ok(removed)
    }

    /// Reserve one unit of a part and add it to the cart.
    ///
    /// # Errors
    ///
    /// - [`ShopError::Cart`]: the part is missing or out of stock.
    /// - [`ShopError::Persistence`]: the change could not be saved.
    pub fn add_to_cart(&mut self, id: PartId) -> Result<CartLine, ShopError> {
        let line = self.transact(Touches::Both, |catalog, cart| {
            Ok(cart.add_one(catalog, id)?)
        })?;

        debug!(part = %id, quantity = line.quantity, "added to cart");

        Ok(line)
    }

    /// Set a cart line's quantity, clamped to at least 1.
    ///
    /// # Errors
    ///
    /// - [`ShopError::Cart`]: not enough stock to grow the line.
    /// - [`ShopError::Persistence`]: the change could not be saved.
    pub fn set_quantity(
        &mut self,
        id: PartId,
        quantity: u32,
    ) -> Result<Option<CartLine>, ShopError> {
        let line = self.transact(Touches::Both, |catalog, cart| {
            Ok(cart.set_quantity(catalog, id, quantity)?)
        })?;

        debug!(part = %id, quantity = ?line.as_ref().map(|line| line.quantity), "set cart quantity");

        Ok(line)
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns [`ShopError::Persistence`] if the change could not be saved.
    pub fn remove_from_cart(&mut self, id: PartId) -> Result<Option<CartLine>, ShopError> {
        let removed =
            self.transact(Touches::Both, |catalog, cart| Ok(cart.remove(catalog, id)))?;

        debug!(part = %id, removed = removed.is_some(), "removed from cart");

        Ok(removed)
    }

    /// Check out the cart, emptying it and saving the final stock levels.
    ///
    /// # Errors
    ///
    /// - [`ShopError::Cart`]: the cart is empty.
    /// - [`ShopError::Persistence`]: the change could not be saved.
    pub fn checkout(&mut self) -> Result<CheckoutReceipt, ShopError> {
        let receipt = self.transact(Touches::Both, |_, cart| Ok(cart.checkout()?))?;

        info!(
            total = %receipt.total(),
            items = receipt.item_count(),
            "checkout complete"
        );

        Ok(receipt)
    }

    /// Catalog
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Cart
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Cart total, unrounded
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if stored cart lines total more than a decimal holds.
    pub fn total(&self) -> Result<Decimal, PricingError> {
        self.cart.total()
    }

    /// Display currency
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Configuration the shop was opened with
    pub fn config(&self) -> &ShopConfig {
        &self.config
    }

    /// Backing storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Mutable access to the backing storage.
    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Close the shop, returning its storage.
    pub fn into_storage(self) -> S {
        self.storage
    }

    fn transact<T>(
        &mut self,
        touches: Touches,
        op: impl FnOnce(&mut Catalog, &mut Cart) -> Result<T, ShopError>,
    ) -> Result<T, ShopError> {
        let catalog_before = self.catalog.clone();
        let cart_before = self.cart.clone();

        let result = op(&mut self.catalog, &mut self.cart).and_then(|value| {
            self.persist(touches)?;
            Ok(value)
        });

        if let Err(err) = &result {
            self.catalog = catalog_before;
            self.cart = cart_before;

            if matches!(err, ShopError::Persistence(_)) {
                error!(error = %err, "failed to save changes; rolled back");

                if let Err(restore_err) = self.persist(touches) {
                    error!(error = %restore_err, "failed to restore previous snapshot");
                }
            }
        }

        result
    }

    fn persist(&mut self, touches: Touches) -> Result<(), StorageError> {
        save_records(
            &mut self.storage,
            &self.config.keys.catalog,
            self.catalog.list(),
        )?;

        if touches.cart() {
            save_records(&mut self.storage, &self.config.keys.cart, self.cart.lines())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::storage::MemoryStorage;

    fn shop() -> Result<Shop<MemoryStorage>, ShopError> {
        Shop::open(MemoryStorage::new(), ShopConfig::default())
    }

    #[test]
    fn save_part_persists_catalog() -> TestResult {
        let mut shop = shop()?;

        let part = shop.save_part(&PartForm::new("Widget", "9.99", "2"))?;

        assert_eq!(
            shop.storage().get("parts").as_deref(),
            Some(format!(r#"[{{"id":{},"name":"Widget","price":9.99,"quantity":2}}]"#, part.id).as_str())
        );
        assert_eq!(shop.storage().get("cart"), None);

        Ok(())
    }

    #[test]
    fn save_part_rejects_invalid_form() -> TestResult {
        let mut shop = shop()?;

        let result = shop.save_part(&PartForm::new("Widget", "free", "2"));

        assert!(
            matches!(
                result,
                Err(ShopError::Validation(ValidationError::InvalidPrice(_)))
            ),
            "expected InvalidPrice, got {result:?}"
        );
        assert!(shop.catalog().is_empty());

        Ok(())
    }

    #[test]
    fn add_to_cart_persists_both_snapshots() -> TestResult {
        let mut shop = shop()?;
        let part = shop.save_part(&PartForm::new("Widget", "9.99", "2"))?;

        shop.add_to_cart(part.id)?;

        let reopened = Shop::open(shop.into_storage(), ShopConfig::default())?;

        assert_eq!(reopened.catalog().get(part.id).map(|part| part.quantity), Some(1));
        assert_eq!(reopened.cart().get(part.id).map(|line| line.quantity), Some(1));

        Ok(())
    }

    #[test]
    fn failed_write_rolls_back() -> TestResult {
        let mut shop = shop()?;
        let part = shop.save_part(&PartForm::new("Widget", "9.99", "2"))?;
        let used = shop.storage().used_bytes();

        shop.storage_mut().set_quota(Some(used));

        let result = shop.add_to_cart(part.id);

        assert!(
            matches!(result, Err(ShopError::Persistence(_))),
            "expected Persistence error, got {result:?}"
        );
        assert!(shop.cart().is_empty());
        assert_eq!(shop.catalog().get(part.id).map(|part| part.quantity), Some(2));

        let stored: Vec<Part> = load_records(shop.storage(), "parts");

        assert_eq!(stored.first().map(|part| part.quantity), Some(2));
        assert_eq!(shop.storage().get("cart"), None);

        Ok(())
    }

    #[test]
    fn editing_reserved_part_counts_cart_units() -> TestResult {
        let mut shop = shop()?;
        let part = shop.save_part(&PartForm::new("Gear", "12.50", "3"))?;

        shop.add_to_cart(part.id)?;
        shop.add_to_cart(part.id)?;

        let edited = shop.save_part(&PartForm::new("Gear", "12.50", "3").editing(part.id))?;

        assert_eq!(edited.quantity, 1);

        shop.remove_from_cart(part.id)?;

        assert_eq!(shop.catalog().get(part.id).map(|part| part.quantity), Some(3));

        Ok(())
    }

    #[test]
    fn editing_stock_below_reservation_is_rejected() -> TestResult {
        let mut shop = shop()?;
        let part = shop.save_part(&PartForm::new("Gear", "12.50", "3"))?;

        shop.add_to_cart(part.id)?;
        shop.add_to_cart(part.id)?;

        let result = shop.save_part(&PartForm::new("Gear", "12.50", "1").editing(part.id));

        assert!(
            matches!(
                result,
                Err(ShopError::Catalog(CatalogError::BelowReserved { reserved: 2, .. }))
            ),
            "expected BelowReserved, got {result:?}"
        );
        assert_eq!(shop.catalog().get(part.id).map(|part| part.quantity), Some(1));
        assert_eq!(shop.cart().get(part.id).map(|line| line.quantity), Some(2));

        Ok(())
    }

    #[test]
    fn cart_error_leaves_state_unchanged() -> TestResult {
        let mut shop = shop()?;

        let result = shop.add_to_cart(PartId::new(8));

        assert!(
            matches!(result, Err(ShopError::Cart(CartError::PartNotFound(_)))),
            "expected PartNotFound, got {result:?}"
        );
        assert_eq!(shop.storage().get("cart"), None);

        Ok(())
    }

    #[test]
    fn checkout_returns_receipt_and_empties_cart() -> TestResult {
        let mut shop = shop()?;
        let part = shop.save_part(&PartForm::new("Widget", "9.99", "2"))?;

        shop.add_to_cart(part.id)?;
        shop.add_to_cart(part.id)?;

        let total = shop.total()?;
        let receipt = shop.checkout()?;

        assert_eq!(receipt.total(), total);
        assert_eq!(receipt.total(), Decimal::new(1998, 2));
        assert!(shop.cart().is_empty());
        assert_eq!(shop.storage().get("cart").as_deref(), Some("[]"));

        Ok(())
    }

    #[test]
    fn unknown_currency_fails_to_open() {
        let config = ShopConfig {
            currency: "ABC".to_string(),
            ..ShopConfig::default()
        };

        let result = Shop::open(MemoryStorage::new(), config);

        assert!(
            matches!(result, Err(ShopError::Config(ConfigError::UnknownCurrency(_)))),
            "expected UnknownCurrency"
        );
    }
}
