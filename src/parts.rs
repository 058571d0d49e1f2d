//! Parts

use std::fmt::{Display, Formatter, Result as FmtResult};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Part identifier
///
/// Serialized as a bare integer so snapshots keep the `{ "id": 1, ... }` shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartId(u64);

impl PartId {
    /// Creates a new part id.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw id value.
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for PartId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl Display for PartId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        Display::fmt(&self.0, f)
    }
}

/// Part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Part {
    /// Part id
    pub id: PartId,

    /// Part name
    pub name: String,

    /// Unit price
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,

    /// Available stock
    pub quantity: u32,
}

impl Part {
    /// Whether at least one unit is available.
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}
