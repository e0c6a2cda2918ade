//! Product catalog rules: field validation and flavor (sabor) pricing.

use std::sync::LazyLock;

use regex::Regex;

use crate::types::{Cents, DbId};

static CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"));

/// Maximum length of a product code.
pub const MAX_CODE_LEN: usize = 30;

/// Maximum length of a product name.
pub const MAX_NAME_LEN: usize = 120;

/// Flavor price is the most expensive selected flavor.
pub const FLAVOR_PRICING_HIGHEST: &str = "highest";

/// Flavor price is the average of the selected flavors.
pub const FLAVOR_PRICING_AVERAGE: &str = "average";

pub const VALID_FLAVOR_PRICING: &[&str] = &[FLAVOR_PRICING_HIGHEST, FLAVOR_PRICING_AVERAGE];

/// Validate a product code (unique per tenant, checked separately).
pub fn validate_code(code: &str) -> Result<(), String> {
    let code = code.trim();
    if code.is_empty() {
        return Err("Product code is required".to_string());
    }
    if code.len() > MAX_CODE_LEN {
        return Err(format!(
            "Product code must be at most {MAX_CODE_LEN} characters"
        ));
    }
    if !CODE_RE.is_match(code) {
        return Err(
            "Product code may only contain letters, digits, '-' and '_'".to_string(),
        );
    }
    Ok(())
}

/// Validate a required display name.
pub fn validate_name(entity: &str, name: &str) -> Result<(), String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("{entity} name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(format!(
            "{entity} name must be at most {MAX_NAME_LEN} characters"
        ));
    }
    Ok(())
}

/// Maximum length of a unit of measure symbol.
pub const MAX_UNIT_SYMBOL_LEN: usize = 10;

/// Validate a unit of measure symbol such as `kg` or `un`.
pub fn validate_unit_symbol(symbol: &str) -> Result<(), String> {
    let len = symbol.trim().chars().count();
    if len == 0 || len > MAX_UNIT_SYMBOL_LEN {
        return Err(format!(
            "Unit symbol must be between 1 and {MAX_UNIT_SYMBOL_LEN} characters"
        ));
    }
    Ok(())
}

/// Sellable products must have a strictly positive price.
pub fn validate_price(price_cents: Cents) -> Result<(), String> {
    if price_cents <= 0 {
        return Err("Price must be greater than zero".to_string());
    }
    Ok(())
}

pub fn validate_flavor_pricing(mode: &str) -> Result<(), String> {
    if VALID_FLAVOR_PRICING.contains(&mode) {
        Ok(())
    } else {
        Err(format!(
            "Invalid flavor pricing '{mode}'. Must be one of: {}",
            VALID_FLAVOR_PRICING.join(", ")
        ))
    }
}

pub fn validate_max_flavors(max_flavors: i32) -> Result<(), String> {
    if max_flavors < 1 {
        return Err("max_flavors must be at least 1".to_string());
    }
    Ok(())
}

/// Validate the flavor links of a product.
///
/// A product cannot list itself as a flavor and cannot list the same flavor
/// twice.
pub fn validate_flavor_links(product_id: Option<DbId>, flavor_ids: &[DbId]) -> Result<(), String> {
    if let Some(id) = product_id {
        if flavor_ids.contains(&id) {
            return Err("A product cannot be a flavor of itself".to_string());
        }
    }
    let mut seen = flavor_ids.to_vec();
    seen.sort_unstable();
    seen.dedup();
    if seen.len() != flavor_ids.len() {
        return Err("Duplicate flavor in list".to_string());
    }
    Ok(())
}

/// Compute the unit price of a line that combines several flavors.
///
/// With no flavors selected the product's own price applies. Averages are
/// rounded half up to the nearest cent.
pub fn flavor_unit_price(
    base_price: Cents,
    flavor_prices: &[Cents],
    max_flavors: i32,
    mode: &str,
) -> Result<Cents, String> {
    if flavor_prices.is_empty() {
        return Ok(base_price);
    }
    if flavor_prices.len() > max_flavors.max(1) as usize {
        return Err(format!("At most {max_flavors} flavor(s) may be selected"));
    }

    match mode {
        FLAVOR_PRICING_HIGHEST => Ok(flavor_prices.iter().copied().max().unwrap_or(base_price)),
        FLAVOR_PRICING_AVERAGE => {
            let sum: Cents = flavor_prices.iter().sum();
            let n = flavor_prices.len() as Cents;
            Ok((sum + n / 2) / n)
        }
        other => Err(format!("Invalid flavor pricing '{other}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_symbol_length() {
        assert!(validate_unit_symbol("kg").is_ok());
        assert!(validate_unit_symbol(" ").is_err());
        assert!(validate_unit_symbol("quilogramas").is_err());
    }

    #[test]
    fn code_validation() {
        assert!(validate_code("PZ-001").is_ok());
        assert!(validate_code("  ").is_err());
        assert!(validate_code("PZ 001").is_err());
        assert!(validate_code(&"X".repeat(31)).is_err());
    }

    #[test]
    fn name_required() {
        let err = validate_name("Product", "").unwrap_err();
        assert_eq!(err, "Product name is required");
        assert!(validate_name("Product", "Calabresa").is_ok());
    }

    #[test]
    fn price_must_be_positive() {
        assert!(validate_price(0).is_err());
        assert!(validate_price(-10).is_err());
        assert!(validate_price(1).is_ok());
    }

    #[test]
    fn flavor_links_reject_self_and_duplicates() {
        assert!(validate_flavor_links(Some(5), &[1, 5]).is_err());
        assert!(validate_flavor_links(Some(5), &[1, 1]).is_err());
        assert!(validate_flavor_links(None, &[1, 2, 3]).is_ok());
    }

    #[test]
    fn no_flavors_uses_base_price() {
        assert_eq!(flavor_unit_price(3500, &[], 2, "highest"), Ok(3500));
    }

    #[test]
    fn highest_flavor_pricing() {
        assert_eq!(
            flavor_unit_price(0, &[4000, 5500], 2, FLAVOR_PRICING_HIGHEST),
            Ok(5500)
        );
    }

    #[test]
    fn average_flavor_pricing_rounds_half_up() {
        assert_eq!(
            flavor_unit_price(0, &[4000, 4001], 2, FLAVOR_PRICING_AVERAGE),
            Ok(4001)
        );
        assert_eq!(
            flavor_unit_price(0, &[3000, 4000, 5000], 3, FLAVOR_PRICING_AVERAGE),
            Ok(4000)
        );
    }

    #[test]
    fn too_many_flavors_rejected() {
        let err = flavor_unit_price(0, &[1, 2, 3], 2, FLAVOR_PRICING_HIGHEST).unwrap_err();
        assert!(err.contains("At most 2"));
    }

    #[test]
    fn pricing_mode_validation() {
        assert!(validate_flavor_pricing("highest").is_ok());
        assert!(validate_flavor_pricing("cheapest").is_err());
    }
}
