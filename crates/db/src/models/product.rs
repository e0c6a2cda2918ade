//! Product model, nested-graph DTOs and list filters.

use comanda_core::pagination::SortSpec;
use comanda_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::category::Category;
use super::complement::ComplementGroupWithItems;

/// A row from the `products` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Product {
    pub id: DbId,
    pub tenant_id: DbId,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: Cents,
    pub category_id: Option<DbId>,
    pub production_location_id: Option<DbId>,
    pub unit_id: Option<DbId>,
    pub image_url: Option<String>,
    pub is_active: bool,
    pub available_for_delivery: bool,
    pub controls_stock: bool,
    pub stock_quantity: i32,
    pub max_flavors: i32,
    pub flavor_pricing: String,
    pub yield_portions: i32,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// One technical sheet line as supplied by the client.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TechnicalSheetEntry {
    pub ingredient_id: DbId,
    pub quantity: f64,
}

/// One technical sheet line joined with its ingredient.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct TechnicalSheetLine {
    pub ingredient_id: DbId,
    pub ingredient_name: String,
    pub unit_symbol: Option<String>,
    pub quantity: f64,
    pub cost_cents: Cents,
}

/// A flavor (sabor) linked to a product: another product of the same tenant.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FlavorSummary {
    pub id: DbId,
    pub code: String,
    pub name: String,
    pub price_cents: Cents,
    pub is_active: bool,
}

/// A product with its full nested graph.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub complement_groups: Vec<ComplementGroupWithItems>,
    pub flavors: Vec<FlavorSummary>,
    pub technical_sheet: Vec<TechnicalSheetLine>,
}

/// DTO for creating a product together with its nested collections.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateProduct {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub price_cents: Cents,
    pub category_id: Option<DbId>,
    pub production_location_id: Option<DbId>,
    pub unit_id: Option<DbId>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub available_for_delivery: Option<bool>,
    pub controls_stock: Option<bool>,
    pub stock_quantity: Option<i32>,
    pub max_flavors: Option<i32>,
    pub flavor_pricing: Option<String>,
    pub yield_portions: Option<i32>,
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub complement_group_ids: Vec<DbId>,
    #[serde(default)]
    pub flavor_ids: Vec<DbId>,
    #[serde(default)]
    pub technical_sheet: Vec<TechnicalSheetEntry>,
}

/// DTO for updating a product.
///
/// Scalar fields use `COALESCE` semantics. Nullable foreign keys distinguish
/// "absent" from `null`. A nested collection that is present replaces the
/// stored one wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProduct {
    pub code: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_cents: Option<Cents>,
    #[serde(default, deserialize_with = "crate::models::deserialize_some")]
    pub category_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "crate::models::deserialize_some")]
    pub production_location_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "crate::models::deserialize_some")]
    pub unit_id: Option<Option<DbId>>,
    pub image_url: Option<String>,
    pub is_active: Option<bool>,
    pub available_for_delivery: Option<bool>,
    pub controls_stock: Option<bool>,
    pub stock_quantity: Option<i32>,
    pub max_flavors: Option<i32>,
    pub flavor_pricing: Option<String>,
    pub yield_portions: Option<i32>,
    pub sort_order: Option<i32>,
    pub complement_group_ids: Option<Vec<DbId>>,
    pub flavor_ids: Option<Vec<DbId>>,
    pub technical_sheet: Option<Vec<TechnicalSheetEntry>>,
}

/// Filters for the paginated product list.
#[derive(Debug, Clone)]
pub struct ProductFilter {
    /// Plain text matched against name and code; wildcards are literal.
    pub search: Option<String>,
    pub category_id: Option<DbId>,
    pub is_active: Option<bool>,
    pub sort: SortSpec,
    pub limit: i64,
    pub offset: i64,
}

/// A category with the products shown under it on the public menu.
#[derive(Debug, Clone, Serialize)]
pub struct MenuSection {
    #[serde(flatten)]
    pub category: Category,
    pub products: Vec<Product>,
}
