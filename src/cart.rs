//! Cart
//!
//! Adding to the cart reserves stock: every unit in a cart line has already been taken out of
//! the catalog. Whether removing or shrinking a line gives that stock back is controlled by
//! [`StockRelease`].

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use thiserror::Error;
use tracing::debug;

use crate::{
    catalog::{Catalog, CatalogError},
    parts::{Part, PartId},
    pricing::{PricingError, add_line, line_total, total_price},
    receipt::CheckoutReceipt,
};

/// Errors related to cart operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CartError {
    /// No part with the given id exists in the catalog.
    #[error("Part {0} not found")]
    PartNotFound(PartId),

    /// Not enough catalog stock to reserve.
    #[error("Part {id} is out of stock: {available} available, {requested} requested")]
    OutOfStock {
        /// Part id
        id: PartId,

        /// Units still in stock
        available: u32,

        /// Units requested
        requested: u32,
    },

    /// Checkout was attempted with no lines in the cart.
    #[error("Your cart is empty")]
    EmptyCart,

    /// The cart total would not fit in a decimal.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Other catalog failure.
    #[error(transparent)]
    Catalog(CatalogError),
}

impl From<CatalogError> for CartError {
    fn from(error: CatalogError) -> Self {
        match error {
            CatalogError::PartNotFound(id) => Self::PartNotFound(id),
            CatalogError::OutOfStock {
                id,
                available,
                requested,
            } => Self::OutOfStock {
                id,
                available,
                requested,
            },
            other => Self::Catalog(other),
        }
    }
}

/// What happens to reserved stock when a cart line is removed or reduced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StockRelease {
    /// Reserved units go back to the catalog.
    #[default]
    Release,

    /// Reserved units stay out of the catalog.
    Retain,
}

impl From<bool> for StockRelease {
    fn from(release: bool) -> Self {
        if release { Self::Release } else { Self::Retain }
    }
}

/// A line in the cart.
///
/// `name` and `price` are copied from the part when the line is first created and do not
/// follow later catalog edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// Id of the part this line was created from
    pub id: PartId,

    /// Part name at add time
    pub name: String,

    /// Unit price at add time
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Reserved units, at least 1
    pub quantity: u32,
}

impl CartLine {
    fn from_part(part: &Part) -> Self {
        Self {
            id: part.id,
            name: part.name.clone(),
            price: part.price,
            quantity: 1,
        }
    }

    /// Price of all units in this line.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the subtotal does not fit in a decimal.
    pub fn subtotal(&self) -> Result<Decimal, PricingError> {
        line_total(self.price, self.quantity)
    }
}

/// Cart
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
    release: StockRelease,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new(release: StockRelease) -> Self {
        Self {
            lines: Vec::new(),
            release,
        }
    }

    /// Create a cart from previously stored lines.
    ///
    /// Lines with a zero quantity are dropped.
    pub fn from_lines(lines: impl Into<Vec<CartLine>>, release: StockRelease) -> Self {
        let mut lines = lines.into();

        lines.retain(|line| line.quantity > 0);

        Self { lines, release }
    }

    /// Reserve one unit of a part and add it to the cart.
    ///
    /// # Errors
    ///
    /// - [`CartError::PartNotFound`]: the part is not in the catalog.
    /// - [`CartError::OutOfStock`]: the part has no stock left.
    /// - [`CartError::Pricing`]: the cart total would overflow; nothing changes.
    pub fn add_one(&mut self, catalog: &mut Catalog, id: PartId) -> Result<CartLine, CartError> {
        let (price, quantity) = match self.get(id) {
            Some(line) => (line.price, line.quantity.saturating_add(1)),
            None => (catalog.get(id).ok_or(CartError::PartNotFound(id))?.price, 1),
        };

        self.total_with(id, price, quantity)?;

        let part = catalog.decrement_stock(id, 1)?;

        if let Some(line) = self.get_mut(id) {
            line.quantity = line.quantity.saturating_add(1);

            return Ok(line.clone());
        }

        let line = CartLine::from_part(&part);

        self.lines.push(line.clone());

        Ok(line)
    }

    /// Set the quantity of an existing line, clamped to at least 1.
    ///
    /// Growing a line reserves the extra units from the catalog. Shrinking it releases units
    /// according to the cart's [`StockRelease`] policy. Returns `None` if no line has this id.
    ///
    /// # Errors
    ///
    /// - [`CartError::OutOfStock`]: not enough stock to grow the line; nothing changes.
    /// - [`CartError::PartNotFound`]: growing a line whose part has left the catalog.
    /// - [`CartError::Pricing`]: the cart total would overflow; nothing changes.
    pub fn set_quantity(
        &mut self,
        catalog: &mut Catalog,
        id: PartId,
        quantity: u32,
    ) -> Result<Option<CartLine>, CartError> {
        let target = quantity.max(1);

        let Some((price, current)) = self.get(id).map(|line| (line.price, line.quantity)) else {
            return Ok(None);
        };

        match target.cmp(&current) {
            Ordering::Greater => {
                self.total_with(id, price, target)?;
                catalog.decrement_stock(id, target - current)?;
            }
            Ordering::Less => self.release(catalog, id, current - target),
            Ordering::Equal => {}
        }

        Ok(self.get_mut(id).map(|line| {
            line.quantity = target;
            line.clone()
        }))
    }

    /// Remove a line from the cart, returning it if it was present.
    pub fn remove(&mut self, catalog: &mut Catalog, id: PartId) -> Option<CartLine> {
        let position = self.lines.iter().position(|line| line.id == id)?;
        let line = self.lines.remove(position);

        self.release(catalog, id, line.quantity);

        Some(line)
    }

    /// Total price of every line, unrounded.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the total does not fit in a decimal. Lines added
    /// through the cart never overflow, so this only fails for stored lines loaded as-is.
    pub fn total(&self) -> Result<Decimal, PricingError> {
        total_price(&self.lines)
    }

    /// Empty the cart and return a receipt for its contents.
    ///
    /// Stock was reserved when lines were added, so nothing is checked against the catalog.
    ///
    /// # Errors
    ///
    /// - [`CartError::EmptyCart`]: there is nothing to check out.
    /// - [`CartError::Pricing`]: the total does not fit in a decimal; the cart is kept.
    pub fn checkout(&mut self) -> Result<CheckoutReceipt, CartError> {
        if self.is_empty() {
            return Err(CartError::EmptyCart);
        }

        let total = self.total()?;
        let lines: SmallVec<[CartLine; 4]> = self.lines.drain(..).collect();

        Ok(CheckoutReceipt::new(total, lines))
    }

    /// Remove every line without touching catalog stock.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Get the line for a part.
    pub fn get(&self, id: PartId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    /// All lines in the order they were first added.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Number of lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Stock release policy for removed or reduced lines.
    pub fn stock_release(&self) -> StockRelease {
        self.release
    }

    fn get_mut(&mut self, id: PartId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id == id)
    }

    /// Total the cart would have if the line for `id` held `quantity` units at `price`.
    fn total_with(
        &self,
        id: PartId,
        price: Decimal,
        quantity: u32,
    ) -> Result<Decimal, PricingError> {
        let others = self
            .lines
            .iter()
            .filter(|line| line.id != id)
            .try_fold(Decimal::ZERO, |total, line| {
                add_line(total, line.price, line.quantity)
            })?;

        add_line(others, price, quantity)
    }

    fn release(&self, catalog: &mut Catalog, id: PartId, quantity: u32) {
        if self.release == StockRelease::Retain {
            return;
        }

        if catalog.restock(id, quantity).is_none() {
            debug!(part = %id, quantity, "part left the catalog; reserved stock dropped");
        }
    }
}
