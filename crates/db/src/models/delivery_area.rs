//! Delivery area models: cities and their neighborhoods.

use comanda_core::delivery_fee::{CityFee, NeighborhoodFee};
use comanda_core::types::{Cents, DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `cities` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct City {
    pub id: DbId,
    pub tenant_id: DbId,
    pub name: String,
    pub state: String,
    pub delivery_fee_cents: Cents,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl City {
    pub fn fee(&self) -> CityFee {
        CityFee {
            delivery_fee_cents: self.delivery_fee_cents,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCity {
    pub name: String,
    pub state: String,
    pub delivery_fee_cents: Option<Cents>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCity {
    pub name: Option<String>,
    pub state: Option<String>,
    pub delivery_fee_cents: Option<Cents>,
    pub is_active: Option<bool>,
}

/// A row from the `neighborhoods` table.
///
/// A `null` fee means the city's default fee applies.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Neighborhood {
    pub id: DbId,
    pub tenant_id: DbId,
    pub city_id: DbId,
    pub name: String,
    pub delivery_fee_cents: Option<Cents>,
    pub min_order_cents: Cents,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Neighborhood {
    pub fn fee(&self) -> NeighborhoodFee {
        NeighborhoodFee {
            delivery_fee_cents: self.delivery_fee_cents,
            min_order_cents: self.min_order_cents,
            is_active: self.is_active,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNeighborhood {
    pub name: String,
    pub delivery_fee_cents: Option<Cents>,
    pub min_order_cents: Option<Cents>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNeighborhood {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::deserialize_some")]
    pub delivery_fee_cents: Option<Option<Cents>>,
    pub min_order_cents: Option<Cents>,
    pub is_active: Option<bool>,
}
