//! Unit of measure model and DTOs.

use comanda_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `units` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Unit {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    pub symbol: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUnit {
    pub name: String,
    pub symbol: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUnit {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub is_active: Option<bool>,
}
