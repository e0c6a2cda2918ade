//! Repository for the `units` table.

use comanda_core::types::DbId;
use sqlx::PgPool;

use crate::models::unit::{CreateUnit, Unit, UpdateUnit};

const COLUMNS: &str = "id, tenant_id, name, symbol, is_active, created_at, updated_at";

/// Provides CRUD operations for units of measure.
pub struct UnitRepo;

impl UnitRepo {
    pub async fn create(pool: &PgPool, tenant_id: DbId, input: &CreateUnit) -> Result<Unit, sqlx::Error> {
        let query = format!(
            "INSERT INTO units (tenant_id, name, symbol) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Unit>(&query)
            .bind(tenant_id)
            .bind(&input.name)
            .bind(&input.symbol)
            .fetch_one(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        tenant_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<Unit>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM units \
             WHERE tenant_id = $1 AND ($2 OR is_active = true) \
             ORDER BY name"
        );
        sqlx::query_as::<_, Unit>(&query)
            .bind(tenant_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateUnit,
    ) -> Result<Option<Unit>, sqlx::Error> {
        let query = format!(
            "UPDATE units SET \
                name = COALESCE($3, name), \
                symbol = COALESCE($4, symbol), \
                is_active = COALESCE($5, is_active) \
             WHERE tenant_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Unit>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.name)
            .bind(&input.symbol)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn deactivate(pool: &PgPool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE units SET is_active = false \
             WHERE tenant_id = $1 AND id = $2 AND is_active = true",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(pool: &PgPool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM units WHERE tenant_id = $1 AND id = $2)")
            .bind(tenant_id)
            .bind(id)
            .fetch_one(pool)
            .await
    }
}
