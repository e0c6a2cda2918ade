//! Repository for `cities` and `neighborhoods`.

use comanda_core::types::DbId;
use sqlx::PgPool;

use crate::models::delivery_area::{
    City, CreateCity, CreateNeighborhood, Neighborhood, UpdateCity, UpdateNeighborhood,
};

const CITY_COLUMNS: &str =
    "id, tenant_id, name, state, delivery_fee_cents, is_active, created_at, updated_at";

const NEIGHBORHOOD_COLUMNS: &str = "id, tenant_id, city_id, name, delivery_fee_cents, \
    min_order_cents, is_active, created_at, updated_at";

/// Provides CRUD for the delivery area table.
pub struct DeliveryAreaRepo;

impl DeliveryAreaRepo {
    // ----- Cities -----

    pub async fn create_city(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreateCity,
    ) -> Result<City, sqlx::Error> {
        let query = format!(
            "INSERT INTO cities (tenant_id, name, state, delivery_fee_cents) \
             VALUES ($1, $2, UPPER($3), COALESCE($4, 0)) \
             RETURNING {CITY_COLUMNS}"
        );
        sqlx::query_as::<_, City>(&query)
            .bind(tenant_id)
            .bind(&input.name)
            .bind(&input.state)
            .bind(input.delivery_fee_cents)
            .fetch_one(pool)
            .await
    }

    pub async fn find_city(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<City>, sqlx::Error> {
        let query = format!("SELECT {CITY_COLUMNS} FROM cities WHERE tenant_id = $1 AND id = $2");
        sqlx::query_as::<_, City>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_cities(
        pool: &PgPool,
        tenant_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<City>, sqlx::Error> {
        let query = format!(
            "SELECT {CITY_COLUMNS} FROM cities \
             WHERE tenant_id = $1 AND ($2 OR is_active = true) \
             ORDER BY name, state"
        );
        sqlx::query_as::<_, City>(&query)
            .bind(tenant_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn update_city(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateCity,
    ) -> Result<Option<City>, sqlx::Error> {
        let query = format!(
            "UPDATE cities SET \
                name = COALESCE($3, name), \
                state = COALESCE(UPPER($4), state), \
                delivery_fee_cents = COALESCE($5, delivery_fee_cents), \
                is_active = COALESCE($6, is_active) \
             WHERE tenant_id = $1 AND id = $2 \
             RETURNING {CITY_COLUMNS}"
        );
        sqlx::query_as::<_, City>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.name)
            .bind(&input.state)
            .bind(input.delivery_fee_cents)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn deactivate_city(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE cities SET is_active = false \
             WHERE tenant_id = $1 AND id = $2 AND is_active = true",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    // ----- Neighborhoods -----

    pub async fn create_neighborhood(
        pool: &PgPool,
        tenant_id: DbId,
        city_id: DbId,
        input: &CreateNeighborhood,
    ) -> Result<Neighborhood, sqlx::Error> {
        let query = format!(
            "INSERT INTO neighborhoods \
                (tenant_id, city_id, name, delivery_fee_cents, min_order_cents) \
             VALUES ($1, $2, $3, $4, COALESCE($5, 0)) \
             RETURNING {NEIGHBORHOOD_COLUMNS}"
        );
        sqlx::query_as::<_, Neighborhood>(&query)
            .bind(tenant_id)
            .bind(city_id)
            .bind(&input.name)
            .bind(input.delivery_fee_cents)
            .bind(input.min_order_cents)
            .fetch_one(pool)
            .await
    }

    pub async fn find_neighborhood(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Neighborhood>, sqlx::Error> {
        let query = format!(
            "SELECT {NEIGHBORHOOD_COLUMNS} FROM neighborhoods WHERE tenant_id = $1 AND id = $2"
        );
        sqlx::query_as::<_, Neighborhood>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// A neighborhood together with the city it belongs to.
    pub async fn find_neighborhood_with_city(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<(Neighborhood, City)>, sqlx::Error> {
        let Some(neighborhood) = Self::find_neighborhood(pool, tenant_id, id).await? else {
            return Ok(None);
        };
        let city = Self::find_city(pool, tenant_id, neighborhood.city_id).await?;
        Ok(city.map(|city| (neighborhood, city)))
    }

    pub async fn list_neighborhoods(
        pool: &PgPool,
        tenant_id: DbId,
        city_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<Neighborhood>, sqlx::Error> {
        let query = format!(
            "SELECT {NEIGHBORHOOD_COLUMNS} FROM neighborhoods \
             WHERE tenant_id = $1 AND city_id = $2 AND ($3 OR is_active = true) \
             ORDER BY name"
        );
        sqlx::query_as::<_, Neighborhood>(&query)
            .bind(tenant_id)
            .bind(city_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    pub async fn update_neighborhood(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateNeighborhood,
    ) -> Result<Option<Neighborhood>, sqlx::Error> {
        let query = format!(
            "UPDATE neighborhoods SET \
                name = COALESCE($3, name), \
                delivery_fee_cents = CASE WHEN $4 THEN $5 ELSE delivery_fee_cents END, \
                min_order_cents = COALESCE($6, min_order_cents), \
                is_active = COALESCE($7, is_active) \
             WHERE tenant_id = $1 AND id = $2 \
             RETURNING {NEIGHBORHOOD_COLUMNS}"
        );
        sqlx::query_as::<_, Neighborhood>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.name)
            .bind(input.delivery_fee_cents.is_some())
            .bind(input.delivery_fee_cents.flatten())
            .bind(input.min_order_cents)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn deactivate_neighborhood(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE neighborhoods SET is_active = false \
             WHERE tenant_id = $1 AND id = $2 AND is_active = true",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
