//! HTTP handlers, one module per resource.
//!
//! Admin handlers take an [`AuthUser`](crate::middleware::auth::AuthUser)
//! (or a role wrapper) and scope every query by its `tenant_id`. The
//! public storefront handlers in [`delivery`] resolve the tenant from the
//! `x-tenant` slug instead.

use comanda_core::error::CoreError;
use comanda_core::types::DbId;
use comanda_db::repositories::{ProductionLocationRepo, UnitRepo};
use serde::Serialize;

use crate::error::AppResult;
use crate::state::AppState;

pub mod auth;
pub mod categories;
pub mod complement_groups;
pub mod coupons;
pub mod delivery;
pub mod delivery_areas;
pub mod ingredients;
pub mod orders;
pub mod payment_methods;
pub mod production_locations;
pub mod products;
pub mod tenants;
pub mod units;
pub mod users;

/// Body returned by bulk reorder endpoints.
#[derive(Debug, Serialize)]
pub struct ReorderResult {
    pub updated: u64,
}

// ---------------------------------------------------------------------------
// Shared reference checks
// ---------------------------------------------------------------------------

/// Reject a production location id that does not belong to the tenant.
pub(crate) async fn ensure_production_location(
    state: &AppState,
    tenant_id: DbId,
    id: Option<DbId>,
) -> AppResult<()> {
    if let Some(id) = id {
        if !ProductionLocationRepo::exists(&state.pool, tenant_id, id).await? {
            return Err(CoreError::Validation(format!("Production location {id} not found")).into());
        }
    }
    Ok(())
}

/// Reject a unit id that does not belong to the tenant.
pub(crate) async fn ensure_unit(
    state: &AppState,
    tenant_id: DbId,
    id: Option<DbId>,
) -> AppResult<()> {
    if let Some(id) = id {
        if !UnitRepo::exists(&state.pool, tenant_id, id).await? {
            return Err(CoreError::Validation(format!("Unit {id} not found")).into());
        }
    }
    Ok(())
}
