//! Stock checks for stock-controlled products and ingredients.

/// Check that `requested` units of a product can be taken from stock.
pub fn check_product_stock(product_name: &str, available: i32, requested: i32) -> Result<(), String> {
    if requested > available {
        return Err(format!(
            "Insufficient stock for '{product_name}': {available} available, {requested} requested"
        ));
    }
    Ok(())
}

/// Apply a signed adjustment to an ingredient's stock level.
///
/// The resulting level may not be negative.
pub fn apply_ingredient_delta(current: f64, delta: f64) -> Result<f64, String> {
    if !delta.is_finite() {
        return Err("Stock adjustment must be a finite number".to_string());
    }
    let next = current + delta;
    if next < 0.0 {
        return Err(format!(
            "Adjustment would leave negative stock ({next:.3})"
        ));
    }
    Ok(next)
}

/// Whether an ingredient has dropped to or below its minimum level.
pub fn is_below_minimum(stock_quantity: f64, min_stock: f64) -> bool {
    min_stock > 0.0 && stock_quantity <= min_stock
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn product_stock_sufficient() {
        assert!(check_product_stock("Coca-Cola", 10, 10).is_ok());
    }

    #[test]
    fn product_stock_insufficient() {
        let err = check_product_stock("Coca-Cola", 2, 3).unwrap_err();
        assert!(err.contains("Insufficient stock for 'Coca-Cola'"));
    }

    #[test]
    fn ingredient_delta() {
        assert_eq!(apply_ingredient_delta(2.5, -1.0), Ok(1.5));
        assert_eq!(apply_ingredient_delta(0.0, 4.0), Ok(4.0));
        assert!(apply_ingredient_delta(1.0, -1.5).is_err());
        assert!(apply_ingredient_delta(1.0, f64::INFINITY).is_err());
    }

    #[test]
    fn below_minimum() {
        assert!(is_below_minimum(1.0, 2.0));
        assert!(is_below_minimum(2.0, 2.0));
        assert!(!is_below_minimum(3.0, 2.0));
        assert!(!is_below_minimum(0.0, 0.0));
    }
}
