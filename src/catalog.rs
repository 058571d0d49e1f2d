//! Catalog

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    parts::{Part, PartId},
    validation::{PartDraft, ValidationError},
};

/// Errors related to catalog updates.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// Part fields failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// No part with the given id exists.
    #[error("Part {0} not found")]
    PartNotFound(PartId),

    /// Not enough stock to satisfy the request.
    #[error("Part {id} is out of stock: {available} available, {requested} requested")]
    OutOfStock {
        /// Part id
        id: PartId,

        /// Units currently in stock
        available: u32,

        /// Units requested
        requested: u32,
    },

    /// An edit set stock below the units already reserved in a cart.
    #[error("Part {id} has {reserved} units reserved; stock cannot be set to {stock}")]
    BelowReserved {
        /// Part id
        id: PartId,

        /// Requested total stock
        stock: u32,

        /// Units held in carts
        reserved: u32,
    },

    /// The id sequence has no values left.
    #[error("no part ids left to allocate")]
    IdExhausted,
}

/// Catalog of parts, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    parts: Vec<Part>,
    next_id: u64,
}

impl Catalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from previously stored parts.
    ///
    /// New ids continue from one past the greatest stored id.
    pub fn from_parts(parts: impl Into<Vec<Part>>) -> Self {
        let parts = parts.into();

        let next_id = parts
            .iter()
            .map(|part| part.id.get())
            .max()
            .map_or(1, |max| max.saturating_add(1));

        Self { parts, next_id }
    }

    /// Create or update a part.
    ///
    /// If `id` names an existing part, its fields are replaced in place. Otherwise a new part
    /// is appended with a fresh id.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::Validation`]: blank name, non-positive price or zero quantity.
    /// - [`CatalogError::IdExhausted`]: no fresh id could be allocated.
    pub fn upsert(
        &mut self,
        id: Option<PartId>,
        name: &str,
        price: Decimal,
        quantity: u32,
    ) -> Result<Part, CatalogError> {
        let draft = PartDraft::new(id, name, price, quantity)?;

        self.upsert_draft(draft)
    }

    /// Create or update a part from validated form input.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::IdExhausted`] if a new part is needed and no id is left.
    pub fn upsert_draft(&mut self, draft: PartDraft) -> Result<Part, CatalogError> {
        self.upsert_reserved(draft, 0)
    }

    /// Create or update a part while `reserved` of its units are held in a cart.
    ///
    /// On update the draft quantity is the part's new total stock, so the units left in the
    /// catalog are `quantity - reserved`. New parts ignore `reserved`.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::BelowReserved`]: the new stock is less than `reserved`; nothing
    ///   changes.
    /// - [`CatalogError::IdExhausted`]: a new part is needed and no id is left.
    pub fn upsert_reserved(
        &mut self,
        draft: PartDraft,
        reserved: u32,
    ) -> Result<Part, CatalogError> {
        let (id, name, price, quantity) = draft.into_fields();

        if let Some(part) = id.and_then(|id| self.get_mut(id)) {
            let remaining = quantity
                .checked_sub(reserved)
                .ok_or(CatalogError::BelowReserved {
                    id: part.id,
                    stock: quantity,
                    reserved,
                })?;

            part.name = name;
            part.price = price;
            part.quantity = remaining;

            return Ok(part.clone());
        }

        let part = Part {
            id: self.allocate_id()?,
            name,
            price,
            quantity,
        };

        self.parts.push(part.clone());

        Ok(part)
    }

    /// Remove a part, returning it if it was present.
    pub fn remove(&mut self, id: PartId) -> Option<Part> {
        let position = self.parts.iter().position(|part| part.id == id)?;

        Some(self.parts.remove(position))
    }

    /// Take `by` units out of stock.
    ///
    /// # Errors
    ///
    /// - [`CatalogError::PartNotFound`]: no part has this id.
    /// - [`CatalogError::OutOfStock`]: fewer than `by` units are in stock; stock is unchanged.
    pub fn decrement_stock(&mut self, id: PartId, by: u32) -> Result<Part, CatalogError> {
        let part = self.get_mut(id).ok_or(CatalogError::PartNotFound(id))?;

        part.quantity = part
            .quantity
            .checked_sub(by)
            .ok_or(CatalogError::OutOfStock {
                id,
                available: part.quantity,
                requested: by,
            })?;

        Ok(part.clone())
    }

    /// Put `by` units back into stock, if the part still exists.
    pub fn restock(&mut self, id: PartId, by: u32) -> Option<Part> {
        let part = self.get_mut(id)?;

        part.quantity = part.quantity.saturating_add(by);

        Some(part.clone())
    }

    /// Get a part by id.
    pub fn get(&self, id: PartId) -> Option<&Part> {
        self.parts.iter().find(|part| part.id == id)
    }

    /// All parts in insertion order.
    pub fn list(&self) -> &[Part] {
        &self.parts
    }

    /// Iterate over parts in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Part> {
        self.parts.iter()
    }

    /// Number of parts.
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    /// Whether the catalog has no parts.
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    fn get_mut(&mut self, id: PartId) -> Option<&mut Part> {
        self.parts.iter_mut().find(|part| part.id == id)
    }

    fn allocate_id(&mut self) -> Result<PartId, CatalogError> {
        let id = self.next_id.max(1);

        self.next_id = id.checked_add(1).ok_or(CatalogError::IdExhausted)?;

        Ok(PartId::new(id))
    }
}
