//! Payment method model and DTOs.

use comanda_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `payment_methods` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PaymentMethod {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    pub kind: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentMethod {
    pub name: String,
    pub kind: String,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePaymentMethod {
    pub name: Option<String>,
    pub kind: Option<String>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}
