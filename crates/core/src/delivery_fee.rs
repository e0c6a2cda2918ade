//! Delivery fee resolution.
//!
//! The fee for an address is looked up from the neighborhood/city table: a
//! neighborhood may override its city's default fee, and may require a
//! minimum order subtotal.

use serde::Serialize;

use crate::types::Cents;

/// Fee-relevant attributes of a city.
#[derive(Debug, Clone, Copy)]
pub struct CityFee {
    pub delivery_fee_cents: Cents,
    pub is_active: bool,
}

/// Fee-relevant attributes of a neighborhood.
#[derive(Debug, Clone, Copy)]
pub struct NeighborhoodFee {
    pub delivery_fee_cents: Option<Cents>,
    pub min_order_cents: Cents,
    pub is_active: bool,
}

/// Result of a fee lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeeQuote {
    pub fee_cents: Cents,
    pub min_order_cents: Cents,
}

/// Why an address could not be quoted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FeeError {
    #[error("Delivery is not available for this neighborhood")]
    NotDeliverable,

    #[error("Minimum order for this neighborhood is {min_order_cents} cents")]
    BelowMinimum { min_order_cents: Cents },
}

/// Resolve the delivery fee for a neighborhood and the order subtotal.
///
/// The effective minimum is the larger of the tenant-wide minimum and the
/// neighborhood's own minimum.
pub fn quote(
    city: CityFee,
    neighborhood: NeighborhoodFee,
    tenant_min_order_cents: Cents,
    subtotal_cents: Cents,
) -> Result<FeeQuote, FeeError> {
    if !city.is_active || !neighborhood.is_active {
        return Err(FeeError::NotDeliverable);
    }

    let min_order_cents = neighborhood.min_order_cents.max(tenant_min_order_cents);
    if subtotal_cents < min_order_cents {
        return Err(FeeError::BelowMinimum { min_order_cents });
    }

    let fee_cents = neighborhood
        .delivery_fee_cents
        .unwrap_or(city.delivery_fee_cents);

    Ok(FeeQuote {
        fee_cents,
        min_order_cents,
    })
}

pub fn validate_fee(fee_cents: Cents) -> Result<(), String> {
    if fee_cents < 0 {
        return Err("Delivery fee cannot be negative".to_string());
    }
    Ok(())
}

/// Validate a two-letter state abbreviation (`SP`, `mg`).
pub fn validate_state(state: &str) -> Result<(), String> {
    let state = state.trim();
    if state.len() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err("State must be a two-letter abbreviation".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CITY: CityFee = CityFee {
        delivery_fee_cents: 800,
        is_active: true,
    };

    fn hood(fee: Option<Cents>, min: Cents, active: bool) -> NeighborhoodFee {
        NeighborhoodFee {
            delivery_fee_cents: fee,
            min_order_cents: min,
            is_active: active,
        }
    }

    #[test]
    fn state_abbreviation() {
        assert!(validate_state("SP").is_ok());
        assert!(validate_state("mg").is_ok());
        assert!(validate_state("S").is_err());
        assert!(validate_state("S1").is_err());
    }

    #[test]
    fn city_fee_is_default() {
        let q = quote(CITY, hood(None, 0, true), 0, 3000).unwrap();
        assert_eq!(q.fee_cents, 800);
    }

    #[test]
    fn neighborhood_overrides_city() {
        let q = quote(CITY, hood(Some(500), 0, true), 0, 3000).unwrap();
        assert_eq!(q.fee_cents, 500);
    }

    #[test]
    fn zero_override_means_free_delivery() {
        let q = quote(CITY, hood(Some(0), 0, true), 0, 3000).unwrap();
        assert_eq!(q.fee_cents, 0);
    }

    #[test]
    fn inactive_areas_not_deliverable() {
        assert_eq!(
            quote(CITY, hood(None, 0, false), 0, 3000),
            Err(FeeError::NotDeliverable)
        );
        let closed_city = CityFee {
            is_active: false,
            ..CITY
        };
        assert_eq!(
            quote(closed_city, hood(None, 0, true), 0, 3000),
            Err(FeeError::NotDeliverable)
        );
    }

    #[test]
    fn minimum_uses_larger_of_tenant_and_neighborhood() {
        assert_eq!(
            quote(CITY, hood(None, 2000, true), 2500, 2400),
            Err(FeeError::BelowMinimum {
                min_order_cents: 2500
            })
        );
        let q = quote(CITY, hood(None, 2000, true), 1000, 2000).unwrap();
        assert_eq!(q.min_order_cents, 2000);
    }
}
