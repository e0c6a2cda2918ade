//! Repository for the `categories` table.

use comanda_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{Category, CreateCategory, UpdateCategory};
use crate::models::SortOrderEntry;

const COLUMNS: &str = "id, tenant_id, parent_id, production_location_id, name, sort_order, \
    is_active, created_at, updated_at";

/// Recursion guard for ancestor walks; deeper than any valid hierarchy.
const MAX_WALK_DEPTH: i32 = 16;

/// Provides CRUD and hierarchy queries for categories.
pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreateCategory,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories \
                (tenant_id, parent_id, production_location_id, name, sort_order, is_active) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), COALESCE($6, true)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(tenant_id)
            .bind(input.parent_id)
            .bind(input.production_location_id)
            .bind(&input.name)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE tenant_id = $1 AND id = $2");
        sqlx::query_as::<_, Category>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List categories ordered by sort_order, then name.
    pub async fn list(
        pool: &PgPool,
        tenant_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM categories \
             WHERE tenant_id = $1 AND ($2 OR is_active = true) \
             ORDER BY sort_order, name"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(tenant_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    /// Update a category. Only supplied fields are applied; `Some(None)` on a
    /// nullable reference clears it.
    pub async fn update(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET \
                name = COALESCE($3, name), \
                parent_id = CASE WHEN $4 THEN $5 ELSE parent_id END, \
                production_location_id = CASE WHEN $6 THEN $7 ELSE production_location_id END, \
                sort_order = COALESCE($8, sort_order), \
                is_active = COALESCE($9, is_active) \
             WHERE tenant_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.name)
            .bind(input.parent_id.is_some())
            .bind(input.parent_id.flatten())
            .bind(input.production_location_id.is_some())
            .bind(input.production_location_id.flatten())
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    /// Deactivate a category (set is_active = false).
    pub async fn deactivate(pool: &PgPool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE categories SET is_active = false \
             WHERE tenant_id = $1 AND id = $2 AND is_active = true",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a batch of sort orders in one transaction.
    ///
    /// Returns the number of rows updated; ids of other tenants are skipped.
    pub async fn reorder(
        pool: &PgPool,
        tenant_id: DbId,
        entries: &[SortOrderEntry],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut updated = 0;
        for entry in entries {
            let result = sqlx::query(
                "UPDATE categories SET sort_order = $3 WHERE tenant_id = $1 AND id = $2",
            )
            .bind(tenant_id)
            .bind(entry.id)
            .bind(entry.sort_order)
            .execute(&mut *tx)
            .await?;
            updated += result.rows_affected();
        }
        tx.commit().await?;
        Ok(updated)
    }

    /// Ids and production locations from `id` up to the root, `id` first.
    ///
    /// Empty when the category does not exist for the tenant.
    pub async fn ancestor_chain(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Vec<(DbId, Option<DbId>)>, sqlx::Error> {
        sqlx::query_as(
            "WITH RECURSIVE chain AS ( \
                SELECT id, parent_id, production_location_id, 0 AS depth \
                FROM categories WHERE tenant_id = $1 AND id = $2 \
                UNION ALL \
                SELECT c.id, c.parent_id, c.production_location_id, chain.depth + 1 \
                FROM categories c JOIN chain ON c.id = chain.parent_id \
                WHERE c.tenant_id = $1 AND chain.depth < $3 \
             ) \
             SELECT id, production_location_id FROM chain ORDER BY depth",
        )
        .bind(tenant_id)
        .bind(id)
        .bind(MAX_WALK_DEPTH)
        .fetch_all(pool)
        .await
    }

    /// Every `(id, parent_id)` edge of the tenant's hierarchy.
    pub async fn edges(
        pool: &PgPool,
        tenant_id: DbId,
    ) -> Result<Vec<(DbId, Option<DbId>)>, sqlx::Error> {
        sqlx::query_as("SELECT id, parent_id FROM categories WHERE tenant_id = $1")
            .bind(tenant_id)
            .fetch_all(pool)
            .await
    }
}
