//! Validation
//!
//! Parsing and validation of raw part form input. The same rules apply whether
//! the form creates a new part or edits an existing one.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::parts::PartId;

/// Errors raised for invalid part input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Name was empty or only whitespace.
    #[error("part name must not be empty")]
    EmptyName,

    /// Price could not be parsed as a decimal number.
    #[error("invalid price: {0:?}")]
    InvalidPrice(String),

    /// Price was zero or negative.
    #[error("price must be greater than 0")]
    NonPositivePrice,

    /// Quantity could not be parsed as a whole number.
    #[error("invalid quantity: {0:?}")]
    InvalidQuantity(String),

    /// Quantity was zero or negative.
    #[error("quantity must be greater than 0")]
    NonPositiveQuantity,

    /// Part id could not be parsed.
    #[error("invalid part id: {0:?}")]
    InvalidId(String),
}

/// Parse a price string (e.g. `"9.99"`).
///
/// # Errors
///
/// - [`ValidationError::InvalidPrice`]: the string is not a plain decimal number.
/// - [`ValidationError::NonPositivePrice`]: the price is zero or negative.
pub fn parse_price(raw: &str) -> Result<Decimal, ValidationError> {
    let price = raw
        .trim()
        .parse::<Decimal>()
        .map_err(|_err| ValidationError::InvalidPrice(raw.to_string()))?;

    validate_price(price)
}

/// Parse a quantity string (e.g. `"3"`).
///
/// # Errors
///
/// - [`ValidationError::InvalidQuantity`]: the string is not a whole number, or is too large.
/// - [`ValidationError::NonPositiveQuantity`]: the quantity is zero or negative.
pub fn parse_quantity(raw: &str) -> Result<u32, ValidationError> {
    let quantity = raw
        .trim()
        .parse::<i64>()
        .map_err(|_err| ValidationError::InvalidQuantity(raw.to_string()))?;

    if quantity <= 0 {
        return Err(ValidationError::NonPositiveQuantity);
    }

    u32::try_from(quantity).map_err(|_err| ValidationError::InvalidQuantity(raw.to_string()))
}

/// Parse an optional id field; blank means "no id".
///
/// # Errors
///
/// Returns [`ValidationError::InvalidId`] if a non-blank value is not an unsigned integer.
pub fn parse_id(raw: &str) -> Result<Option<PartId>, ValidationError> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Ok(None);
    }

    trimmed
        .parse::<u64>()
        .map(|id| Some(PartId::new(id)))
        .map_err(|_err| ValidationError::InvalidId(raw.to_string()))
}

/// Trim a part name, rejecting blank names.
///
/// # Errors
///
/// Returns [`ValidationError::EmptyName`] if the name is blank.
pub fn validate_name(raw: &str) -> Result<String, ValidationError> {
    let name = raw.trim();

    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    Ok(name.to_string())
}

/// Reject zero or negative prices.
///
/// # Errors
///
/// Returns [`ValidationError::NonPositivePrice`] if `price <= 0`.
pub fn validate_price(price: Decimal) -> Result<Decimal, ValidationError> {
    if price <= Decimal::ZERO {
        return Err(ValidationError::NonPositivePrice);
    }

    Ok(price)
}

/// Raw part form input, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartForm {
    /// Id of the part being edited; blank when creating.
    pub id: String,

    /// Part name
    pub name: String,

    /// Unit price
    pub price: String,

    /// Stock quantity
    pub quantity: String,
}

impl PartForm {
    /// Create a form for a new part.
    pub fn new(name: impl Into<String>, price: impl Into<String>, quantity: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            name: name.into(),
            price: price.into(),
            quantity: quantity.into(),
        }
    }

    /// Target an existing part with this form.
    #[must_use]
    pub fn editing(mut self, id: PartId) -> Self {
        self.id = id.to_string();
        self
    }

    /// Parse and validate every field.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] encountered, checking id, name, price then quantity.
    pub fn parse(&self) -> Result<PartDraft, ValidationError> {
        let id = parse_id(&self.id)?;
        let name = validate_name(&self.name)?;
        let price = parse_price(&self.price)?;
        let quantity = parse_quantity(&self.quantity)?;

        Ok(PartDraft {
            id,
            name,
            price,
            quantity,
        })
    }
}

/// Validated part fields, ready to be written to the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartDraft {
    id: Option<PartId>,
    name: String,
    price: Decimal,
    quantity: u32,
}

impl PartDraft {
    /// Validate typed part fields.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if the name is blank, the price is not positive, or the
    /// quantity is zero.
    pub fn new(
        id: Option<PartId>,
        name: &str,
        price: Decimal,
        quantity: u32,
    ) -> Result<Self, ValidationError> {
        let name = validate_name(name)?;
        let price = validate_price(price)?;

        if quantity == 0 {
            return Err(ValidationError::NonPositiveQuantity);
        }

        Ok(Self {
            id,
            name,
            price,
            quantity,
        })
    }

    /// Id of the part to update, if any.
    pub fn id(&self) -> Option<PartId> {
        self.id
    }

    /// Trimmed part name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Unit price
    pub fn price(&self) -> Decimal {
        self.price
    }

    /// Stock quantity
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub(crate) fn into_fields(self) -> (Option<PartId>, String, Decimal, u32) {
        (self.id, self.name, self.price, self.quantity)
    }
}
