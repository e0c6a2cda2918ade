//! Customer and delivery address models.

use comanda_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `customers` table. Customers are identified by phone
/// within a tenant.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Customer {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Customer contact data supplied at checkout. `phone` is already
/// normalized to digits.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerContact {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

/// A row from the `delivery_addresses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct DeliveryAddress {
    pub id: DbId,
    pub customer_id: DbId,
    pub neighborhood_id: DbId,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub reference: Option<String>,
    pub created_at: Timestamp,
}

/// Address supplied at checkout for delivery orders.
#[derive(Debug, Clone, Deserialize)]
pub struct NewDeliveryAddress {
    pub neighborhood_id: DbId,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub reference: Option<String>,
}
