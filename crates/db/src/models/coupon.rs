//! Coupon model and DTOs.

use comanda_core::coupon::CouponTerms;
use comanda_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `coupons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Coupon {
    pub id: DbId,
    pub tenant_id: DbId,
    pub code: String,
    pub discount_kind: String,
    pub discount_value: i64,
    pub min_order_cents: Cents,
    pub max_uses: Option<i32>,
    pub used_count: i32,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Coupon {
    pub fn terms(&self) -> CouponTerms {
        CouponTerms {
            discount_kind: self.discount_kind.clone(),
            discount_value: self.discount_value,
            min_order_cents: self.min_order_cents,
            max_uses: self.max_uses,
            used_count: self.used_count,
            starts_at: self.starts_at,
            ends_at: self.ends_at,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCoupon {
    pub code: String,
    pub discount_kind: String,
    pub discount_value: i64,
    pub min_order_cents: Option<Cents>,
    pub max_uses: Option<i32>,
    pub starts_at: Option<Timestamp>,
    pub ends_at: Option<Timestamp>,
}

/// DTO for updating a coupon. The code is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCoupon {
    pub discount_kind: Option<String>,
    pub discount_value: Option<i64>,
    pub min_order_cents: Option<Cents>,
    #[serde(default, deserialize_with = "crate::models::deserialize_some")]
    pub max_uses: Option<Option<i32>>,
    #[serde(default, deserialize_with = "crate::models::deserialize_some")]
    pub starts_at: Option<Option<Timestamp>>,
    #[serde(default, deserialize_with = "crate::models::deserialize_some")]
    pub ends_at: Option<Option<Timestamp>>,
    pub is_active: Option<bool>,
}
