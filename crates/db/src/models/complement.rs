//! Complement group (addon group) and complement models and DTOs.

use comanda_core::complements::SelectionBounds;
use comanda_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `complement_groups` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ComplementGroup {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    pub min_select: i32,
    pub max_select: i32,
    pub is_required: bool,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl ComplementGroup {
    pub fn bounds(&self) -> SelectionBounds {
        SelectionBounds {
            min_select: self.min_select,
            max_select: self.max_select,
            is_required: self.is_required,
        }
    }
}

/// A row from the `complements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Complement {
    pub id: DbId,
    pub tenant_id: DbId,
    pub group_id: DbId,
    pub name: String,
    pub price_cents: Cents,
    pub sort_order: i32,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A complement group together with its complements.
#[derive(Debug, Clone, Serialize)]
pub struct ComplementGroupWithItems {
    #[serde(flatten)]
    pub group: ComplementGroup,
    pub complements: Vec<Complement>,
}

/// Complement supplied inline when creating a group.
#[derive(Debug, Clone, Deserialize)]
pub struct NewComplement {
    pub name: String,
    pub price_cents: Option<Cents>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateComplementGroup {
    pub name: String,
    pub min_select: Option<i32>,
    pub max_select: Option<i32>,
    pub is_required: Option<bool>,
    pub sort_order: Option<i32>,
    #[serde(default)]
    pub complements: Vec<NewComplement>,
}

impl CreateComplementGroup {
    /// Bounds after defaults are applied.
    pub fn bounds(&self) -> SelectionBounds {
        SelectionBounds {
            min_select: self.min_select.unwrap_or(0),
            max_select: self.max_select.unwrap_or(1),
            is_required: self.is_required.unwrap_or(false),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateComplementGroup {
    pub name: Option<String>,
    pub min_select: Option<i32>,
    pub max_select: Option<i32>,
    pub is_required: Option<bool>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateComplement {
    pub name: Option<String>,
    pub price_cents: Option<Cents>,
    pub sort_order: Option<i32>,
    pub is_active: Option<bool>,
}
