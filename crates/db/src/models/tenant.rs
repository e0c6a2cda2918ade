//! Tenant (restaurant account) model and DTOs.

use comanda_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `tenants` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tenant {
    pub id: DbId,
    pub name: String,
    pub slug: String,
    pub phone: Option<String>,
    pub is_open: bool,
    pub delivery_enabled: bool,
    pub pickup_enabled: bool,
    pub min_order_cents: Cents,
    pub estimated_delivery_mins: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a tenant.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateTenant {
    pub name: String,
    pub slug: String,
    pub phone: Option<String>,
}

/// DTO for updating tenant settings. All fields optional; slug is immutable.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTenant {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub is_open: Option<bool>,
    pub delivery_enabled: Option<bool>,
    pub pickup_enabled: Option<bool>,
    pub min_order_cents: Option<Cents>,
    pub estimated_delivery_mins: Option<i32>,
}
