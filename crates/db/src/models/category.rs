//! Category model and DTOs.

use comanda_core::category::TreeItem;
use comanda_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub tenant_id: DbId,
    pub parent_id: Option<DbId>,
    pub production_location_id: Option<DbId>,
    pub name: String,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl TreeItem for Category {
    fn id(&self) -> DbId {
        self.id
    }

    fn parent_id(&self) -> Option<DbId> {
        self.parent_id
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub parent_id: Option<DbId>,
    pub production_location_id: Option<DbId>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

/// DTO for updating a category.
///
/// `parent_id` and `production_location_id` distinguish "absent" (keep) from
/// `null` (clear).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::deserialize_some")]
    pub parent_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "crate::models::deserialize_some")]
    pub production_location_id: Option<Option<DbId>>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

