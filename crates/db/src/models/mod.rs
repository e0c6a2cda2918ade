//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches

use serde::{Deserialize, Deserializer};

pub mod category;
pub mod complement;
pub mod coupon;
pub mod customer;
pub mod delivery_area;
pub mod ingredient;
pub mod order;
pub mod payment_method;
pub mod product;
pub mod production_location;
pub mod tenant;
pub mod unit;
pub mod user;

/// Deserialize a field that distinguishes "absent" from "explicit null".
///
/// Use with `#[serde(default, deserialize_with = "deserialize_some")]` on an
/// `Option<Option<T>>`: absent -> `None`, `null` -> `Some(None)`,
/// value -> `Some(Some(v))`.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

/// One entry of a bulk reorder request.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SortOrderEntry {
    pub id: comanda_core::types::DbId,
    pub sort_order: i32,
}
