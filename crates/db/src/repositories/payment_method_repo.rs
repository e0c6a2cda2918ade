//! Repository for the `payment_methods` table.

use comanda_core::types::DbId;
use sqlx::PgPool;

use crate::models::payment_method::{CreatePaymentMethod, PaymentMethod, UpdatePaymentMethod};

const COLUMNS: &str = "id, tenant_id, name, kind, sort_order, is_active, created_at, updated_at";

/// Provides CRUD operations for payment methods.
pub struct PaymentMethodRepo;

impl PaymentMethodRepo {
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreatePaymentMethod,
    ) -> Result<PaymentMethod, sqlx::Error> {
        let query = format!(
            "INSERT INTO payment_methods (tenant_id, name, kind, sort_order) \
             VALUES ($1, $2, $3, COALESCE($4, 0)) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentMethod>(&query)
            .bind(tenant_id)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(input.sort_order)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<PaymentMethod>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM payment_methods WHERE tenant_id = $1 AND id = $2");
        sqlx::query_as::<_, PaymentMethod>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(
        pool: &PgPool,
        tenant_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<PaymentMethod>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM payment_methods \
             WHERE tenant_id = $1 AND ($2 OR is_active = true) \
             ORDER BY sort_order, name"
        );
        sqlx::query_as::<_, PaymentMethod>(&query)
            .bind(tenant_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdatePaymentMethod,
    ) -> Result<Option<PaymentMethod>, sqlx::Error> {
        let query = format!(
            "UPDATE payment_methods SET \
                name = COALESCE($3, name), \
                kind = COALESCE($4, kind), \
                sort_order = COALESCE($5, sort_order), \
                is_active = COALESCE($6, is_active) \
             WHERE tenant_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PaymentMethod>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.name)
            .bind(&input.kind)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn deactivate(pool: &PgPool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE payment_methods SET is_active = false \
             WHERE tenant_id = $1 AND id = $2 AND is_active = true",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
