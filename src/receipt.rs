//! Receipt

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;

use crate::{cart::CartLine, pricing::to_money};

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutReceipt {
    /// Cart total at checkout time, unrounded
    total: Decimal,

    /// Lines that were checked out
    lines: SmallVec<[CartLine; 4]>,
}

impl CheckoutReceipt {
    /// Create a new receipt with the given details.
    pub fn new(total: Decimal, lines: SmallVec<[CartLine; 4]>) -> Self {
        Self { total, lines }
    }

    /// Total amount paid
    pub fn total(&self) -> Decimal {
        self.total
    }

    /// Total amount paid, rounded for display
    pub fn total_money(&self, currency: &'static Currency) -> Money<'static, Currency> {
        to_money(self.total, currency)
    }

    /// Lines that were checked out
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Total units purchased.
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Confirmation message shown to the user after checkout.
    pub fn confirmation(&self, currency: &'static Currency) -> String {
        format!("Checkout successful! Total: {}", self.total_money(currency))
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use smallvec::smallvec;

    use super::*;
    use crate::parts::PartId;

    fn receipt() -> CheckoutReceipt {
        CheckoutReceipt::new(
            Decimal::new(1998, 2),
            smallvec![CartLine {
                id: PartId::new(1),
                name: "Widget".to_string(),
                price: Decimal::new(999, 2),
                quantity: 2,
            }],
        )
    }

    #[test]
    fn accessors_return_values_from_constructor() {
        let receipt = receipt();

        assert_eq!(receipt.total(), Decimal::new(1998, 2));
        assert_eq!(receipt.lines().len(), 1);
        assert_eq!(receipt.item_count(), 2);
    }

    #[test]
    fn total_money_is_rounded_to_minor_units() {
        let receipt = CheckoutReceipt::new(Decimal::new(10_005, 3), SmallVec::new());

        assert_eq!(receipt.total_money(GBP), Money::from_minor(1001, GBP));
    }

    #[test]
    fn confirmation_includes_formatted_total() {
        let message = receipt().confirmation(USD);

        assert_eq!(message, "Checkout successful! Total: $19.98");
    }
}
