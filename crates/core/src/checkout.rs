//! Order pricing.
//!
//! Prices are always recomputed server-side from catalog data; client-sent
//! prices are ignored.

use serde::Serialize;

use crate::types::Cents;

/// Largest quantity accepted for a single order line.
pub const MAX_LINE_QUANTITY: i32 = 99;

/// A chosen complement with its catalog price. `quantity` is per unit of the
/// parent line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricedComplement {
    pub price_cents: Cents,
    pub quantity: i32,
}

/// An order line with its resolved unit price (flavor pricing applied).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub unit_price_cents: Cents,
    pub quantity: i32,
    pub complements: Vec<PricedComplement>,
}

impl PricedLine {
    /// Unit price including complements.
    pub fn unit_total_cents(&self) -> Cents {
        self.unit_price_cents
            + self
                .complements
                .iter()
                .map(|c| c.price_cents * Cents::from(c.quantity))
                .sum::<Cents>()
    }

    pub fn total_cents(&self) -> Cents {
        self.unit_total_cents() * Cents::from(self.quantity)
    }
}

/// Totals stored on an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OrderTotals {
    pub subtotal_cents: Cents,
    pub discount_cents: Cents,
    pub delivery_fee_cents: Cents,
    pub total_cents: Cents,
}

pub fn validate_line_quantity(quantity: i32) -> Result<(), String> {
    if !(1..=MAX_LINE_QUANTITY).contains(&quantity) {
        return Err(format!(
            "Item quantity must be between 1 and {MAX_LINE_QUANTITY}"
        ));
    }
    Ok(())
}

pub fn validate_complement_quantity(quantity: i32) -> Result<(), String> {
    if quantity < 1 {
        return Err("Complement quantity must be at least 1".to_string());
    }
    Ok(())
}

/// Amounts a storefront client quotes back to us (subtotal, fee).
pub fn validate_quoted_amount(field: &str, cents: Cents) -> Result<(), String> {
    if cents < 0 {
        return Err(format!("{field} cannot be negative"));
    }
    Ok(())
}

/// Sum of line totals.
pub fn subtotal(lines: &[PricedLine]) -> Cents {
    lines.iter().map(PricedLine::total_cents).sum()
}

/// Combine subtotal, fee and discount. The total never goes below zero.
pub fn totals(lines: &[PricedLine], delivery_fee_cents: Cents, discount_cents: Cents) -> OrderTotals {
    let subtotal_cents = subtotal(lines);
    let gross = subtotal_cents + delivery_fee_cents;
    let discount_cents = discount_cents.clamp(0, gross.max(0));
    OrderTotals {
        subtotal_cents,
        discount_cents,
        delivery_fee_cents,
        total_cents: gross - discount_cents,
    }
}
