//! Repository for `complement_groups`, `complements` and the product links.

use std::collections::HashMap;

use comanda_core::types::DbId;
use sqlx::PgPool;

use super::prefixed;
use crate::models::complement::{
    Complement, ComplementGroup, ComplementGroupWithItems, CreateComplementGroup, NewComplement,
    UpdateComplement, UpdateComplementGroup,
};

const GROUP_COLUMNS: &str = "id, tenant_id, name, min_select, max_select, is_required, \
    sort_order, is_active, created_at, updated_at";

const ITEM_COLUMNS: &str =
    "id, tenant_id, group_id, name, price_cents, sort_order, is_active, created_at, updated_at";

/// Provides CRUD for complement groups and their complements.
pub struct ComplementRepo;

impl ComplementRepo {
    /// Create a group and its inline complements in one transaction.
    pub async fn create_group(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreateComplementGroup,
    ) -> Result<ComplementGroupWithItems, sqlx::Error> {
        let bounds = input.bounds();
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO complement_groups \
                (tenant_id, name, min_select, max_select, is_required, sort_order) \
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, 0)) \
             RETURNING {GROUP_COLUMNS}"
        );
        let group = sqlx::query_as::<_, ComplementGroup>(&query)
            .bind(tenant_id)
            .bind(&input.name)
            .bind(bounds.min_select)
            .bind(bounds.max_select)
            .bind(bounds.is_required)
            .bind(input.sort_order)
            .fetch_one(&mut *tx)
            .await?;

        let mut complements = Vec::with_capacity(input.complements.len());
        for (position, item) in input.complements.iter().enumerate() {
            let complement =
                insert_complement(&mut tx, tenant_id, group.id, item, position as i32).await?;
            complements.push(complement);
        }

        tx.commit().await?;
        Ok(ComplementGroupWithItems { group, complements })
    }

    pub async fn find_group(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<ComplementGroupWithItems>, sqlx::Error> {
        let query = format!(
            "SELECT {GROUP_COLUMNS} FROM complement_groups WHERE tenant_id = $1 AND id = $2"
        );
        let group = sqlx::query_as::<_, ComplementGroup>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await?;

        let Some(group) = group else {
            return Ok(None);
        };
        let complements = Self::items_for_groups(pool, &[group.id], true).await?;
        Ok(Some(ComplementGroupWithItems { group, complements }))
    }

    /// List groups with their complements.
    pub async fn list_groups(
        pool: &PgPool,
        tenant_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<ComplementGroupWithItems>, sqlx::Error> {
        let query = format!(
            "SELECT {GROUP_COLUMNS} FROM complement_groups \
             WHERE tenant_id = $1 AND ($2 OR is_active = true) \
             ORDER BY sort_order, name"
        );
        let groups = sqlx::query_as::<_, ComplementGroup>(&query)
            .bind(tenant_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await?;
        Self::attach_items(pool, groups, include_inactive).await
    }

    pub async fn update_group(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateComplementGroup,
    ) -> Result<Option<ComplementGroup>, sqlx::Error> {
        let query = format!(
            "UPDATE complement_groups SET \
                name = COALESCE($3, name), \
                min_select = COALESCE($4, min_select), \
                max_select = COALESCE($5, max_select), \
                is_required = COALESCE($6, is_required), \
                sort_order = COALESCE($7, sort_order), \
                is_active = COALESCE($8, is_active) \
             WHERE tenant_id = $1 AND id = $2 \
             RETURNING {GROUP_COLUMNS}"
        );
        sqlx::query_as::<_, ComplementGroup>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.name)
            .bind(input.min_select)
            .bind(input.max_select)
            .bind(input.is_required)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn deactivate_group(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE complement_groups SET is_active = false \
             WHERE tenant_id = $1 AND id = $2 AND is_active = true",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Add a complement at the end of a group.
    pub async fn add_complement(
        pool: &PgPool,
        tenant_id: DbId,
        group_id: DbId,
        input: &NewComplement,
    ) -> Result<Complement, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let next: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(sort_order) + 1, 0) FROM complements WHERE group_id = $1",
        )
        .bind(group_id)
        .fetch_one(&mut *tx)
        .await?;
        let complement = insert_complement(&mut tx, tenant_id, group_id, input, next).await?;
        tx.commit().await?;
        Ok(complement)
    }

    pub async fn update_complement(
        pool: &PgPool,
        tenant_id: DbId,
        group_id: DbId,
        id: DbId,
        input: &UpdateComplement,
    ) -> Result<Option<Complement>, sqlx::Error> {
        let query = format!(
            "UPDATE complements SET \
                name = COALESCE($4, name), \
                price_cents = COALESCE($5, price_cents), \
                sort_order = COALESCE($6, sort_order), \
                is_active = COALESCE($7, is_active) \
             WHERE tenant_id = $1 AND group_id = $2 AND id = $3 \
             RETURNING {ITEM_COLUMNS}"
        );
        sqlx::query_as::<_, Complement>(&query)
            .bind(tenant_id)
            .bind(group_id)
            .bind(id)
            .bind(&input.name)
            .bind(input.price_cents)
            .bind(input.sort_order)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }

    pub async fn deactivate_complement(
        pool: &PgPool,
        tenant_id: DbId,
        group_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE complements SET is_active = false \
             WHERE tenant_id = $1 AND group_id = $2 AND id = $3 AND is_active = true",
        )
        .bind(tenant_id)
        .bind(group_id)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Groups linked to a product, in link order.
    pub async fn groups_for_product(
        pool: &PgPool,
        product_id: DbId,
        include_inactive: bool,
    ) -> Result<Vec<ComplementGroupWithItems>, sqlx::Error> {
        let query = format!(
            "SELECT {} FROM complement_groups g \
             JOIN product_complement_groups pcg ON pcg.group_id = g.id \
             WHERE pcg.product_id = $1 AND ($2 OR g.is_active = true) \
             ORDER BY pcg.sort_order, g.name",
            prefixed(GROUP_COLUMNS, "g")
        );
        let groups = sqlx::query_as::<_, ComplementGroup>(&query)
            .bind(product_id)
            .bind(include_inactive)
            .fetch_all(pool)
            .await?;
        Self::attach_items(pool, groups, include_inactive).await
    }

    /// Count how many of `ids` are groups owned by the tenant.
    pub async fn count_owned_groups(
        pool: &PgPool,
        tenant_id: DbId,
        ids: &[DbId],
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM complement_groups WHERE tenant_id = $1 AND id = ANY($2)",
        )
        .bind(tenant_id)
        .bind(ids)
        .fetch_one(pool)
        .await
    }

    async fn items_for_groups(
        pool: &PgPool,
        group_ids: &[DbId],
        include_inactive: bool,
    ) -> Result<Vec<Complement>, sqlx::Error> {
        let query = format!(
            "SELECT {ITEM_COLUMNS} FROM complements \
             WHERE group_id = ANY($1) AND ($2 OR is_active = true) \
             ORDER BY group_id, sort_order, name"
        );
        sqlx::query_as::<_, Complement>(&query)
            .bind(group_ids)
            .bind(include_inactive)
            .fetch_all(pool)
            .await
    }

    async fn attach_items(
        pool: &PgPool,
        groups: Vec<ComplementGroup>,
        include_inactive: bool,
    ) -> Result<Vec<ComplementGroupWithItems>, sqlx::Error> {
        let ids: Vec<DbId> = groups.iter().map(|g| g.id).collect();
        let mut by_group: HashMap<DbId, Vec<Complement>> = HashMap::new();
        for item in Self::items_for_groups(pool, &ids, include_inactive).await? {
            by_group.entry(item.group_id).or_default().push(item);
        }
        Ok(groups
            .into_iter()
            .map(|group| {
                let complements = by_group.remove(&group.id).unwrap_or_default();
                ComplementGroupWithItems { group, complements }
            })
            .collect())
    }
}

async fn insert_complement(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    tenant_id: DbId,
    group_id: DbId,
    input: &NewComplement,
    default_sort_order: i32,
) -> Result<Complement, sqlx::Error> {
    let query = format!(
        "INSERT INTO complements (tenant_id, group_id, name, price_cents, sort_order) \
         VALUES ($1, $2, $3, COALESCE($4, 0), COALESCE($5, $6)) \
         RETURNING {ITEM_COLUMNS}"
    );
    sqlx::query_as::<_, Complement>(&query)
        .bind(tenant_id)
        .bind(group_id)
        .bind(&input.name)
        .bind(input.price_cents)
        .bind(input.sort_order)
        .bind(default_sort_order)
        .fetch_one(&mut **tx)
        .await
}
