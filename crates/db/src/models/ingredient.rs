//! Ingredient (stock-tracked insumo) model and DTOs.

use comanda_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ingredients` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Ingredient {
    pub id: DbId,
    pub tenant_id: DbId,
    pub unit_id: Option<DbId>,
    pub name: String,
    pub cost_cents: Cents,
    pub stock_quantity: f64,
    pub min_stock: f64,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Ingredient plus the derived low-stock flag returned by list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct IngredientWithStatus {
    #[serde(flatten)]
    pub ingredient: Ingredient,
    pub below_min_stock: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateIngredient {
    pub name: String,
    pub unit_id: Option<DbId>,
    pub cost_cents: Option<Cents>,
    pub stock_quantity: Option<f64>,
    pub min_stock: Option<f64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateIngredient {
    pub name: Option<String>,
    pub unit_id: Option<DbId>,
    pub cost_cents: Option<Cents>,
    pub min_stock: Option<f64>,
    pub is_active: Option<bool>,
}

/// Body of `POST /ingredients/{id}/stock`.
#[derive(Debug, Clone, Deserialize)]
pub struct StockAdjustment {
    pub delta: f64,
}
