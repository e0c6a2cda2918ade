//! Repository for the `tenants` table.

use comanda_core::types::DbId;
use sqlx::PgPool;

use crate::models::tenant::{CreateTenant, Tenant, UpdateTenant};
use crate::models::user::User;

const COLUMNS: &str = "id, name, slug, phone, is_open, delivery_enabled, pickup_enabled, \
    min_order_cents, estimated_delivery_mins, created_at, updated_at";

const USER_COLUMNS: &str = "id, tenant_id, username, email, password_hash, role, is_active, \
    last_login_at, created_at, updated_at";

/// Provides CRUD operations for tenants.
pub struct TenantRepo;

impl TenantRepo {
    /// Create a tenant and its first admin user in one transaction.
    pub async fn create_with_admin(
        pool: &PgPool,
        input: &CreateTenant,
        username: &str,
        email: &str,
        password_hash: &str,
    ) -> Result<(Tenant, User), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO tenants (name, slug, phone) VALUES ($1, $2, $3) RETURNING {COLUMNS}"
        );
        let tenant = sqlx::query_as::<_, Tenant>(&query)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(&input.phone)
            .fetch_one(&mut *tx)
            .await?;

        let query = format!(
            "INSERT INTO users (tenant_id, username, email, password_hash, role) \
             VALUES ($1, $2, $3, $4, 'admin') \
             RETURNING {USER_COLUMNS}"
        );
        let user = sqlx::query_as::<_, User>(&query)
            .bind(tenant.id)
            .bind(username)
            .bind(email)
            .bind(password_hash)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok((tenant, user))
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants WHERE id = $1");
        sqlx::query_as::<_, Tenant>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM tenants WHERE slug = $1");
        sqlx::query_as::<_, Tenant>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Update tenant settings. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateTenant,
    ) -> Result<Option<Tenant>, sqlx::Error> {
        let query = format!(
            "UPDATE tenants SET \
                name = COALESCE($2, name), \
                phone = COALESCE($3, phone), \
                is_open = COALESCE($4, is_open), \
                delivery_enabled = COALESCE($5, delivery_enabled), \
                pickup_enabled = COALESCE($6, pickup_enabled), \
                min_order_cents = COALESCE($7, min_order_cents), \
                estimated_delivery_mins = COALESCE($8, estimated_delivery_mins) \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Tenant>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.phone)
            .bind(input.is_open)
            .bind(input.delivery_enabled)
            .bind(input.pickup_enabled)
            .bind(input.min_order_cents)
            .bind(input.estimated_delivery_mins)
            .fetch_optional(pool)
            .await
    }
}
