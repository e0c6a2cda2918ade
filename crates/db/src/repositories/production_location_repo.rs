//! Repository for the `production_locations` table.

use std::collections::BTreeMap;

use comanda_core::types::DbId;
use sqlx::PgPool;

use crate::models::production_location::{
    CreateProductionLocation, ProductionLocation, UpdateProductionLocation,
};

const COLUMNS: &str = "id, tenant_id, name, printer_name, is_active, created_at, updated_at";

/// Provides CRUD operations for production locations.
pub struct ProductionLocationRepo;

impl ProductionLocationRepo {
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreateProductionLocation,
    ) -> Result<ProductionLocation, sqlx::Error> {
        let query = format!(
            "INSERT INTO production_locations (tenant_id, name, printer_name, is_active) \
             VALUES ($1, $2, $3, COALESCE($4, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductionLocation>(&query)
            .bind(tenant_id)
            .bind(&input.name)
            .bind(&input.printer_name)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<ProductionLocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM production_locations WHERE tenant_id = $1 AND id = $2"
        );
        sqlx::query_as::<_, ProductionLocation>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List production locations ordered by name.
    pub async fn list(
        pool: &PgPool,
        tenant_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<ProductionLocation>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM production_locations \
             WHERE tenant_id = $1 AND ($2 OR is_active = true) \
             ORDER BY name"
        );
        sqlx::query_as::<_, ProductionLocation>(&query)
            .bind(tenant_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Map of id to name for every location of a tenant, used for tickets.
    pub async fn name_map(
        pool: &PgPool,
        tenant_id: DbId,
    ) -> Result<BTreeMap<DbId, String>, sqlx::Error> {
        let rows: Vec<(DbId, String)> =
            sqlx::query_as("SELECT id, name FROM production_locations WHERE tenant_id = $1")
                .bind(tenant_id)
                .fetch_all(pool)
                .await?;
        Ok(rows.into_iter().collect())
    }

    pub async fn update(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateProductionLocation,
    ) -> Result<Option<ProductionLocation>, sqlx::Error> {
        let query = format!(
            "UPDATE production_locations SET \
                name = COALESCE($3, name), \
                printer_name = COALESCE($4, printer_name), \
                is_active = COALESCE($5, is_active) \
             WHERE tenant_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ProductionLocation>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.name)
            .bind(&input.printer_name)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a production location (set is_active = false).
    pub async fn deactivate(pool: &PgPool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE production_locations SET is_active = false \
             WHERE tenant_id = $1 AND id = $2 AND is_active = true",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Whether an id refers to a location owned by the tenant.
    pub async fn exists(pool: &PgPool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM production_locations WHERE tenant_id = $1 AND id = $2)",
        )
        .bind(tenant_id)
        .bind(id)
        .fetch_one(pool)
        .await
    }
}
