//! Repository for the `ingredients` table.

use comanda_core::types::DbId;
use sqlx::PgPool;

use crate::models::ingredient::{CreateIngredient, Ingredient, UpdateIngredient};

const COLUMNS: &str = "id, tenant_id, unit_id, name, cost_cents, stock_quantity, min_stock, \
    is_active, created_at, updated_at";

/// Provides CRUD and stock adjustments for ingredients.
pub struct IngredientRepo;

impl IngredientRepo {
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreateIngredient,
    ) -> Result<Ingredient, sqlx::Error> {
        let query = format!(
            "INSERT INTO ingredients \
                (tenant_id, unit_id, name, cost_cents, stock_quantity, min_stock) \
             VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, 0), COALESCE($6, 0)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(tenant_id)
            .bind(input.unit_id)
            .bind(&input.name)
            .bind(input.cost_cents)
            .bind(input.stock_quantity)
            .bind(input.min_stock)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Ingredient>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM ingredients WHERE tenant_id = $1 AND id = $2");
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List ingredients; `below_min_only` keeps those at or under their minimum.
    pub async fn list(
        pool: &PgPool,
        tenant_id: DbId,
        include_inactive: bool,
        below_min_only: bool,
    ) -> Result<Vec<Ingredient>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM ingredients \
             WHERE tenant_id = $1 AND ($2 OR is_active = true) \
               AND (NOT $3 OR stock_quantity <= min_stock) \
             ORDER BY name"
        );
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(tenant_id)
            .bind(include_inactive)
            .bind(below_min_only)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateIngredient,
    ) -> Result<Option<Ingredient>, sqlx::Error> {
        let query = format!(
            "UPDATE ingredients SET \
                name = COALESCE($3, name), \
                unit_id = COALESCE($4, unit_id), \
                cost_cents = COALESCE($5, cost_cents), \
                min_stock = COALESCE($6, min_stock), \
                is_active = COALESCE($7, is_active) \
             WHERE tenant_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.name)
            .bind(input.unit_id)
            .bind(input.cost_cents)
            .bind(input.min_stock)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn deactivate(pool: &PgPool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE ingredients SET is_active = false \
             WHERE tenant_id = $1 AND id = $2 AND is_active = true",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Store a new stock level computed by the caller.
    ///
    /// The write is guarded on the level the caller read, so a concurrent
    /// adjustment makes this return `None` instead of losing an update.
    pub async fn set_stock(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        expected: f64,
        new_quantity: f64,
    ) -> Result<Option<Ingredient>, sqlx::Error> {
        let query = format!(
            "UPDATE ingredients SET stock_quantity = $4 \
             WHERE tenant_id = $1 AND id = $2 AND stock_quantity = $3 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Ingredient>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(expected)
            .bind(new_quantity)
            .fetch_optional(pool)
            .await
    }

    /// Count how many of `ids` are ingredients owned by the tenant.
    pub async fn count_owned(
        pool: &PgPool,
        tenant_id: DbId,
        ids: &[DbId],
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM ingredients WHERE tenant_id = $1 AND id = ANY($2)")
            .bind(tenant_id)
            .bind(ids)
            .fetch_one(pool)
            .await
    }
}
