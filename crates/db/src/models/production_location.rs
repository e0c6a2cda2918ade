//! Production location (kitchen station) model and DTOs.

use comanda_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `production_locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ProductionLocation {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    pub printer_name: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateProductionLocation {
    pub name: String,
    pub printer_name: Option<String>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProductionLocation {
    pub name: Option<String>,
    pub printer_name: Option<String>,
    pub is_active: Option<bool>,
}
