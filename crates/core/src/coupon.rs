//! Coupon validation and discount calculation.

use serde::Serialize;

use crate::types::{Cents, Timestamp};

pub const DISCOUNT_PERCENT: &str = "percent";
pub const DISCOUNT_FIXED: &str = "fixed";
pub const DISCOUNT_FREE_DELIVERY: &str = "free_delivery";

pub const VALID_DISCOUNT_KINDS: &[&str] = &[DISCOUNT_PERCENT, DISCOUNT_FIXED, DISCOUNT_FREE_DELIVERY];

/// Maximum length of a coupon code.
pub const MAX_CODE_LEN: usize = 40;

/// Normalize a customer-entered coupon code (trimmed, uppercase).
pub fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

/// Validate a coupon definition as entered by staff.
pub fn validate_definition(
    code: &str,
    discount_kind: &str,
    discount_value: i64,
    min_order_cents: Cents,
    max_uses: Option<i32>,
    starts_at: Option<Timestamp>,
    ends_at: Option<Timestamp>,
) -> Result<(), String> {
    let code = normalize_code(code);
    if code.is_empty() {
        return Err("Coupon code is required".to_string());
    }
    if code.len() > MAX_CODE_LEN || code.chars().any(char::is_whitespace) {
        return Err(format!(
            "Coupon code must be at most {MAX_CODE_LEN} characters without spaces"
        ));
    }

    match discount_kind {
        DISCOUNT_PERCENT if !(1..=100).contains(&discount_value) => {
            return Err("Percent discount must be between 1 and 100".to_string());
        }
        DISCOUNT_FIXED if discount_value <= 0 => {
            return Err("Fixed discount must be greater than zero".to_string());
        }
        DISCOUNT_FREE_DELIVERY if discount_value != 0 => {
            return Err("Free delivery coupons must have a discount value of 0".to_string());
        }
        DISCOUNT_PERCENT | DISCOUNT_FIXED | DISCOUNT_FREE_DELIVERY => {}
        other => {
            return Err(format!(
                "Invalid discount kind '{other}'. Must be one of: {}",
                VALID_DISCOUNT_KINDS.join(", ")
            ));
        }
    }

    if min_order_cents < 0 {
        return Err("min_order_cents cannot be negative".to_string());
    }
    if matches!(max_uses, Some(n) if n < 1) {
        return Err("max_uses must be at least 1 when set".to_string());
    }
    if let (Some(start), Some(end)) = (starts_at, ends_at) {
        if end <= start {
            return Err("ends_at must be after starts_at".to_string());
        }
    }
    Ok(())
}

/// The parts of a stored coupon that decide whether it applies.
#[derive(Debug, Clone)]
pub struct CouponTerms {
    pub discount_kind: String,
    pub discount_value: i64,
    pub min_order_cents: Cents,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub is_active: bool,
}

/// Why a coupon cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize)]
pub enum CouponRejection {
    #[error("Coupon is not active")]
    Inactive,

    #[error("Coupon is not valid yet")]
    NotStarted,

    #[error("Coupon has expired")]
    Expired,

    #[error("Coupon usage limit reached")]
    Exhausted,

    #[error("Order subtotal is below the coupon minimum of {min_order_cents} cents")]
    BelowMinimum { min_order_cents: Cents },
}

impl CouponTerms {
    /// Check whether the coupon applies to an order with `subtotal_cents`.
    pub fn check(&self, subtotal_cents: Cents, now: Timestamp) -> Result<(), CouponRejection> {
        if !self.is_active {
            return Err(CouponRejection::Inactive);
        }
        if matches!(self.starts_at, Some(start) if now < start) {
            return Err(CouponRejection::NotStarted);
        }
        if matches!(self.ends_at, Some(end) if now >= end) {
            return Err(CouponRejection::Expired);
        }
        if matches!(self.max_uses, Some(max) if self.used_count >= max) {
            return Err(CouponRejection::Exhausted);
        }
        if subtotal_cents < self.min_order_cents {
            return Err(CouponRejection::BelowMinimum {
                min_order_cents: self.min_order_cents,
            });
        }
        Ok(())
    }

    /// Discount granted for an order. Never exceeds what it discounts.
    ///
    /// Percent discounts round down to the cent.
    pub fn discount(&self, subtotal_cents: Cents, delivery_fee_cents: Cents) -> Cents {
        match self.discount_kind.as_str() {
            DISCOUNT_PERCENT => subtotal_cents.max(0) * self.discount_value.clamp(0, 100) / 100,
            DISCOUNT_FIXED => self.discount_value.clamp(0, subtotal_cents.max(0)),
            DISCOUNT_FREE_DELIVERY => delivery_fee_cents.max(0),
            _ => 0,
        }
    }
}
