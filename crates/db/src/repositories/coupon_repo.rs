//! Repository for the `coupons` table.

use comanda_core::types::DbId;
use sqlx::PgPool;

use crate::models::coupon::{Coupon, CreateCoupon, UpdateCoupon};

const COLUMNS: &str = "id, tenant_id, code, discount_kind, discount_value, min_order_cents, \
    max_uses, used_count, starts_at, ends_at, is_active, created_at, updated_at";

/// Provides CRUD operations for coupons.
pub struct CouponRepo;

impl CouponRepo {
    /// Insert a coupon. `code` must already be normalized.
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        code: &str,
        input: &CreateCoupon,
    ) -> Result<Coupon, sqlx::Error> {
        let query = format!(
            "INSERT INTO coupons \
                (tenant_id, code, discount_kind, discount_value, min_order_cents, \
                 max_uses, starts_at, ends_at) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 0), $6, $7, $8) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(tenant_id)
            .bind(code)
            .bind(&input.discount_kind)
            .bind(input.discount_value)
            .bind(input.min_order_cents)
            .bind(input.max_uses)
            .bind(input.starts_at)
            .bind(input.ends_at)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coupons WHERE tenant_id = $1 AND id = $2");
        sqlx::query_as::<_, Coupon>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a coupon by its normalized code.
    pub async fn find_by_code(
        pool: &PgPool,
        tenant_id: DbId,
        code: &str,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM coupons WHERE tenant_id = $1 AND code = $2");
        sqlx::query_as::<_, Coupon>(&query)
            .bind(tenant_id)
            .bind(code)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        tenant_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<Coupon>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM coupons \
             WHERE tenant_id = $1 AND ($2 OR is_active = true) \
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(tenant_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateCoupon,
    ) -> Result<Option<Coupon>, sqlx::Error> {
        let query = format!(
            "UPDATE coupons SET \
                discount_kind = COALESCE($3, discount_kind), \
                discount_value = COALESCE($4, discount_value), \
                min_order_cents = COALESCE($5, min_order_cents), \
                max_uses = CASE WHEN $6 THEN $7 ELSE max_uses END, \
                starts_at = CASE WHEN $8 THEN $9 ELSE starts_at END, \
                ends_at = CASE WHEN $10 THEN $11 ELSE ends_at END, \
                is_active = COALESCE($12, is_active) \
             WHERE tenant_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Coupon>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.discount_kind)
            .bind(input.discount_value)
            .bind(input.min_order_cents)
            .bind(input.max_uses.is_some())
            .bind(input.max_uses.flatten())
            .bind(input.starts_at.is_some())
            .bind(input.starts_at.flatten())
            .bind(input.ends_at.is_some())
            .bind(input.ends_at.flatten())
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn deactivate(pool: &PgPool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE coupons SET is_active = false \
             WHERE tenant_id = $1 AND id = $2 AND is_active = true",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
