//! Display
//!
//! Read-only projections of the catalog and cart for a renderer. Nothing here mutates state.

use rust_decimal::Decimal;
use rusty_money::iso::Currency;
use tabled::{Table, Tabled, settings::Style};

use crate::{
    cart::{Cart, CartLine},
    catalog::Catalog,
    parts::{Part, PartId},
    pricing::{PricingError, to_money},
};

/// Format an amount for display, rounded to the currency's minor units.
pub fn format_money(amount: Decimal, currency: &'static Currency) -> String {
    to_money(amount, currency).to_string()
}

/// Whether the "add to cart" action should be offered for a part.
pub fn can_add_to_cart(part: &Part) -> bool {
    part.in_stock()
}

/// Parts whose name contains `query`, ignoring case. A blank query matches everything.
pub fn search<'a>(catalog: &'a Catalog, query: &str) -> Vec<&'a Part> {
    let needle = query.trim().to_lowercase();

    catalog
        .iter()
        .filter(|part| needle.is_empty() || part.name.to_lowercase().contains(&needle))
        .collect()
}

/// Catalog table row
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct PartRow {
    /// Part id
    #[tabled(rename = "ID")]
    pub id: PartId,

    /// Part name
    #[tabled(rename = "Part")]
    pub name: String,

    /// Formatted unit price
    #[tabled(rename = "Price")]
    pub price: String,

    /// Stock level
    #[tabled(rename = "Stock")]
    pub stock: u32,

    /// Stock status
    #[tabled(rename = "Status")]
    pub status: &'static str,
}

impl PartRow {
    /// Project a part into a row.
    pub fn new(part: &Part, currency: &'static Currency) -> Self {
        Self {
            id: part.id,
            name: part.name.clone(),
            price: format_money(part.price, currency),
            stock: part.quantity,
            status: if can_add_to_cart(part) {
                "In stock"
            } else {
                "Out of stock"
            },
        }
    }
}

/// Cart table row
#[derive(Debug, Clone, PartialEq, Eq, Tabled)]
pub struct CartRow {
    /// Part id
    #[tabled(rename = "ID")]
    pub id: PartId,

    /// Part name
    #[tabled(rename = "Part")]
    pub name: String,

    /// Formatted unit price
    #[tabled(rename = "Price")]
    pub price: String,

    /// Units in the cart
    #[tabled(rename = "Qty")]
    pub quantity: u32,

    /// Formatted line subtotal
    #[tabled(rename = "Subtotal")]
    pub subtotal: String,
}

impl CartRow {
    /// Project a cart line into a row.
    ///
    /// # Errors
    ///
    /// Returns [`PricingError::Overflow`] if the line subtotal does not fit in a decimal.
    pub fn new(line: &CartLine, currency: &'static Currency) -> Result<Self, PricingError> {
        Ok(Self {
            id: line.id,
            name: line.name.clone(),
            price: format_money(line.price, currency),
            quantity: line.quantity,
            subtotal: format_money(line.subtotal()?, currency),
        })
    }
}

/// Rows for every part in catalog order.
pub fn catalog_rows(catalog: &Catalog, currency: &'static Currency) -> Vec<PartRow> {
    catalog
        .iter()
        .map(|part| PartRow::new(part, currency))
        .collect()
}

/// Rows for every cart line in cart order.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if any line subtotal does not fit in a decimal.
pub fn cart_rows(
    cart: &Cart,
    currency: &'static Currency,
) -> Result<Vec<CartRow>, PricingError> {
    cart.lines()
        .iter()
        .map(|line| CartRow::new(line, currency))
        .collect()
}

/// Render a selection of parts, such as search results, as a text table.
pub fn part_table(parts: &[&Part], currency: &'static Currency) -> String {
    let rows = parts.iter().map(|part| PartRow::new(part, currency));

    Table::new(rows).with(Style::modern_rounded()).to_string()
}

/// Render the catalog as a text table.
pub fn catalog_table(catalog: &Catalog, currency: &'static Currency) -> String {
    Table::new(catalog_rows(catalog, currency))
        .with(Style::modern_rounded())
        .to_string()
}

/// Render the cart as a text table followed by its total.
///
/// # Errors
///
/// Returns [`PricingError::Overflow`] if a subtotal or the total does not fit in a decimal.
pub fn cart_table(
    cart: &Cart,
    currency: &'static Currency,
) -> Result<String, PricingError> {
    let table = Table::new(cart_rows(cart, currency)?)
        .with(Style::modern_rounded())
        .to_string();

    Ok(format!("{table}\nTotal: {}", format_money(cart.total()?, currency)))
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use super::*;
    use crate::cart::StockRelease;

    fn catalog() -> Result<Catalog, crate::catalog::CatalogError> {
        let mut catalog = Catalog::new();

        catalog.upsert(None, "Widget", Decimal::new(999, 2), 2)?;
        catalog.upsert(None, "Hex Nut", Decimal::new(25, 2), 1)?;

        Ok(catalog)
    }

    #[test]
    fn format_money_rounds_to_cents() {
        assert_eq!(format_money(Decimal::new(19_984, 3), USD), "$19.98");
    }

    #[test]
    fn search_is_case_insensitive() -> TestResult {
        let catalog = catalog()?;

        let names: Vec<&str> = search(&catalog, "NUT")
            .into_iter()
            .map(|part| part.name.as_str())
            .collect();

        assert_eq!(names, ["Hex Nut"]);
        assert_eq!(search(&catalog, "  ").len(), 2);
        assert!(search(&catalog, "bolt").is_empty());

        Ok(())
    }

    #[test]
    fn part_row_marks_out_of_stock() -> TestResult {
        let mut catalog = catalog()?;
        let mut cart = Cart::new(StockRelease::Release);
        let nut = search(&catalog, "nut")
            .first()
            .map(|part| part.id)
            .ok_or("missing nut")?;

        cart.add_one(&mut catalog, nut)?;

        let rows = catalog_rows(&catalog, USD);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows.first().map(|row| row.status), Some("In stock"));
        assert_eq!(rows.get(1).map(|row| row.status), Some("Out of stock"));
        assert_eq!(rows.get(1).map(|row| row.price.as_str()), Some("$0.25"));

        Ok(())
    }

    #[test]
    fn cart_table_lists_lines_and_total() -> TestResult {
        let mut catalog = catalog()?;
        let mut cart = Cart::default();
        let widget = search(&catalog, "widget")
            .first()
            .map(|part| part.id)
            .ok_or("missing widget")?;

        cart.add_one(&mut catalog, widget)?;
        cart.add_one(&mut catalog, widget)?;

        let rows = cart_rows(&cart, USD)?;
        let table = cart_table(&cart, USD)?;

        assert_eq!(rows.first().map(|row| row.subtotal.as_str()), Some("$19.98"));
        assert!(table.contains("Widget"));
        assert!(table.contains("Subtotal"));
        assert!(table.ends_with("Total: $19.98"));

        Ok(())
    }

    #[test]
    fn part_table_matches_catalog_table_style() -> TestResult {
        let catalog = catalog()?;
        let everything = search(&catalog, "");
        let nuts = part_table(&search(&catalog, "nut"), USD);

        assert_eq!(part_table(&everything, USD), catalog_table(&catalog, USD));
        assert!(nuts.contains("Hex Nut"));
        assert!(!nuts.contains("Widget"));

        Ok(())
    }

    #[test]
    fn cart_table_reports_overflow() {
        let line = |id| CartLine {
            id: PartId::new(id),
            name: "Ingot".to_string(),
            price: Decimal::MAX,
            quantity: 1,
        };
        let cart = Cart::from_lines(vec![line(1), line(2)], StockRelease::Release);

        assert_eq!(cart_table(&cart, USD), Err(PricingError::Overflow));
    }

    #[test]
    fn catalog_table_has_header_and_rows() -> TestResult {
        let table = catalog_table(&catalog()?, USD);

        assert!(table.contains("Part"));
        assert!(table.contains("Hex Nut"));
        assert!(table.contains("$9.99"));

        Ok(())
    }
}
