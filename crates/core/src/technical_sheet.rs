//! Technical sheet (ficha técnica) costing.
//!
//! A technical sheet lists the ingredients consumed to produce one batch of
//! a product; the batch yields `yield_portions` sellable units.

use serde::Serialize;

use crate::types::{Cents, DbId};

/// One ingredient line of a technical sheet, with the ingredient's cost.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLine {
    pub ingredient_id: DbId,
    pub quantity: f64,
    pub unit_cost_cents: Cents,
}

/// Costing summary of a product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetCost {
    pub total_cost_cents: Cents,
    pub cost_per_portion_cents: Cents,
    pub price_cents: Cents,
    /// Gross margin as a percentage of price, `None` when price is zero.
    pub margin_percent: Option<f64>,
}

pub fn validate_quantity(quantity: f64) -> Result<(), String> {
    if !quantity.is_finite() || quantity <= 0.0 {
        return Err("Ingredient quantity must be greater than zero".to_string());
    }
    Ok(())
}

pub fn validate_yield(yield_portions: i32) -> Result<(), String> {
    if yield_portions < 1 {
        return Err("yield_portions must be at least 1".to_string());
    }
    Ok(())
}

/// Validate a full set of sheet lines: positive quantities, no ingredient
/// listed twice.
pub fn validate_lines(lines: &[(DbId, f64)]) -> Result<(), String> {
    let mut ids: Vec<DbId> = Vec::with_capacity(lines.len());
    for (ingredient_id, quantity) in lines {
        validate_quantity(*quantity)?;
        if ids.contains(ingredient_id) {
            return Err(format!(
                "Ingredient {ingredient_id} appears more than once"
            ));
        }
        ids.push(*ingredient_id);
    }
    Ok(())
}

/// Total cost of a sheet, rounded to the nearest cent.
pub fn total_cost(lines: &[SheetLine]) -> Cents {
    let raw: f64 = lines
        .iter()
        .map(|l| l.quantity * l.unit_cost_cents as f64)
        .sum();
    raw.round() as Cents
}

/// Compute total cost, cost per portion and margin for a product.
pub fn cost_summary(lines: &[SheetLine], yield_portions: i32, price_cents: Cents) -> SheetCost {
    let total_cost_cents = total_cost(lines);
    let portions = yield_portions.max(1) as f64;
    let cost_per_portion_cents = (total_cost_cents as f64 / portions).round() as Cents;
    let margin_percent = if price_cents > 0 {
        let margin = (price_cents - cost_per_portion_cents) as f64 / price_cents as f64 * 100.0;
        Some((margin * 100.0).round() / 100.0)
    } else {
        None
    };

    SheetCost {
        total_cost_cents,
        cost_per_portion_cents,
        price_cents,
        margin_percent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: DbId, quantity: f64, cost: Cents) -> SheetLine {
        SheetLine {
            ingredient_id: id,
            quantity,
            unit_cost_cents: cost,
        }
    }

    #[test]
    fn total_cost_rounds() {
        // 0.25 kg at 3999/kg + 2 units at 150
        let lines = vec![line(1, 0.25, 3999), line(2, 2.0, 150)];
        assert_eq!(total_cost(&lines), 1300);
    }

    #[test]
    fn empty_sheet_costs_nothing() {
        let summary = cost_summary(&[], 1, 2000);
        assert_eq!(summary.total_cost_cents, 0);
        assert_eq!(summary.margin_percent, Some(100.0));
    }

    #[test]
    fn cost_per_portion_and_margin() {
        let lines = vec![line(1, 1.0, 4000)];
        let summary = cost_summary(&lines, 8, 2000);
        assert_eq!(summary.cost_per_portion_cents, 500);
        assert_eq!(summary.margin_percent, Some(75.0));
    }

    #[test]
    fn zero_price_has_no_margin() {
        let summary = cost_summary(&[line(1, 1.0, 100)], 1, 0);
        assert_eq!(summary.margin_percent, None);
    }

    #[test]
    fn lines_validation() {
        assert!(validate_lines(&[(1, 0.5), (2, 1.0)]).is_ok());
        assert!(validate_lines(&[(1, 0.0)]).is_err());
        assert!(validate_lines(&[(1, f64::NAN)]).is_err());
        assert!(validate_lines(&[(1, 1.0), (1, 2.0)]).is_err());
    }

    #[test]
    fn yield_validation() {
        assert!(validate_yield(0).is_err());
        assert!(validate_yield(1).is_ok());
    }
}
