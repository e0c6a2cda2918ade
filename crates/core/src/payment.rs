//! Payment method kinds and cash-change validation.

use crate::types::Cents;

pub const PAYMENT_CASH: &str = "cash";
pub const PAYMENT_CARD: &str = "card";
pub const PAYMENT_PIX: &str = "pix";
pub const PAYMENT_VOUCHER: &str = "voucher";

pub const VALID_PAYMENT_KINDS: &[&str] = &[PAYMENT_CASH, PAYMENT_CARD, PAYMENT_PIX, PAYMENT_VOUCHER];

pub fn validate_kind(kind: &str) -> Result<(), String> {
    if VALID_PAYMENT_KINDS.contains(&kind) {
        Ok(())
    } else {
        Err(format!(
            "Invalid payment kind '{kind}'. Must be one of: {}",
            VALID_PAYMENT_KINDS.join(", ")
        ))
    }
}

/// Validate the "change for" amount a cash customer asks for.
///
/// Only cash payments may carry it, and it must cover the order total.
pub fn validate_change(
    kind: &str,
    change_for_cents: Option<Cents>,
    total_cents: Cents,
) -> Result<(), String> {
    match change_for_cents {
        None => Ok(()),
        Some(_) if kind != PAYMENT_CASH => {
            Err("Change can only be requested for cash payments".to_string())
        }
        Some(amount) if amount < total_cents => Err(format!(
            "Change amount must be at least the order total ({total_cents} cents)"
        )),
        Some(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds() {
        assert!(validate_kind("pix").is_ok());
        assert!(validate_kind("bitcoin").is_err());
    }

    #[test]
    fn change_only_for_cash() {
        assert!(validate_change(PAYMENT_CARD, Some(5000), 4000).is_err());
        assert!(validate_change(PAYMENT_CARD, None, 4000).is_ok());
    }

    #[test]
    fn change_must_cover_total() {
        assert!(validate_change(PAYMENT_CASH, Some(3999), 4000).is_err());
        assert!(validate_change(PAYMENT_CASH, Some(4000), 4000).is_ok());
        assert!(validate_change(PAYMENT_CASH, Some(10000), 4000).is_ok());
    }
}
