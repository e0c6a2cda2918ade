//! Repository for `products` and their nested collections: complement group
//! links, flavor links and technical sheet lines.

use comanda_core::types::DbId;
use sqlx::PgPool;

use super::{contains_pattern, prefixed};
use super::{CategoryRepo, ComplementRepo};
use crate::models::category::Category;
use crate::models::product::{
    CreateProduct, FlavorSummary, MenuSection, Product, ProductDetail, ProductFilter,
    TechnicalSheetEntry, TechnicalSheetLine, UpdateProduct,
};
use crate::models::SortOrderEntry;

const COLUMNS: &str = "id, tenant_id, code, name, description, price_cents, category_id, \
    production_location_id, unit_id, image_url, is_active, available_for_delivery, \
    controls_stock, stock_quantity, max_flavors, flavor_pricing, yield_portions, sort_order, \
    created_at, updated_at";

type Tx<'a> = sqlx::Transaction<'a, sqlx::Postgres>;

/// Provides CRUD for products and their nested graph.
pub struct ProductRepo;

impl ProductRepo {
    /// Build the WHERE clause for a product filter. Placeholders start at `$2`
    /// (`$1` is the tenant id); returns the clause and the next free index.
    fn filter_clause(filter: &ProductFilter) -> (String, u32) {
        let mut conditions = vec!["tenant_id = $1".to_string()];
        let mut bind_idx = 2u32;

        if filter.search.is_some() {
            conditions.push(format!("(name ILIKE ${bind_idx} OR code ILIKE ${bind_idx})"));
            bind_idx += 1;
        }
        if filter.category_id.is_some() {
            conditions.push(format!("category_id = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.is_active.is_some() {
            conditions.push(format!("is_active = ${bind_idx}"));
            bind_idx += 1;
        }

        (format!("WHERE {}", conditions.join(" AND ")), bind_idx)
    }

    /// One page of products matching the filter.
    pub async fn list(
        pool: &PgPool,
        tenant_id: DbId,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, sqlx::Error> {
        let (where_clause, bind_idx) = Self::filter_clause(filter);
        let query = format!(
            "SELECT {COLUMNS} FROM products {where_clause} \
             ORDER BY {order}, id \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            order = filter.sort.to_sql(),
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, Product>(&query).bind(tenant_id);
        if let Some(ref search) = filter.search {
            q = q.bind(contains_pattern(search));
        }
        if let Some(category_id) = filter.category_id {
            q = q.bind(category_id);
        }
        if let Some(is_active) = filter.is_active {
            q = q.bind(is_active);
        }
        q.bind(filter.limit).bind(filter.offset).fetch_all(pool).await
    }

    /// Total number of products matching the filter, ignoring pagination.
    pub async fn count(
        pool: &PgPool,
        tenant_id: DbId,
        filter: &ProductFilter,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = Self::filter_clause(filter);
        let query = format!("SELECT COUNT(*) FROM products {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query).bind(tenant_id);
        if let Some(ref search) = filter.search {
            q = q.bind(contains_pattern(search));
        }
        if let Some(category_id) = filter.category_id {
            q = q.bind(category_id);
        }
        if let Some(is_active) = filter.is_active {
            q = q.bind(is_active);
        }
        q.fetch_one(pool).await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE tenant_id = $1 AND id = $2");
        sqlx::query_as::<_, Product>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch several products at once. Missing ids are simply absent.
    pub async fn find_many(
        pool: &PgPool,
        tenant_id: DbId,
        ids: &[DbId],
    ) -> Result<Vec<Product>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products WHERE tenant_id = $1 AND id = ANY($2) ORDER BY id"
        );
        sqlx::query_as::<_, Product>(&query)
            .bind(tenant_id)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// Whether `code` is taken by another product of the tenant.
    pub async fn code_exists(
        pool: &PgPool,
        tenant_id: DbId,
        code: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS( \
                SELECT 1 FROM products \
                WHERE tenant_id = $1 AND code = $2 AND ($3::bigint IS NULL OR id <> $3) \
             )",
        )
        .bind(tenant_id)
        .bind(code)
        .bind(exclude_id)
        .fetch_one(pool)
        .await
    }

    /// Count how many of `ids` are products owned by the tenant.
    pub async fn count_owned(
        pool: &PgPool,
        tenant_id: DbId,
        ids: &[DbId],
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE tenant_id = $1 AND id = ANY($2)")
            .bind(tenant_id)
            .bind(ids)
            .fetch_one(pool)
            .await
    }

    /// A product with its complement groups, flavors and technical sheet.
    pub async fn find_detail(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<ProductDetail>, sqlx::Error> {
        let Some(product) = Self::find_by_id(pool, tenant_id, id).await? else {
            return Ok(None);
        };
        let complement_groups = ComplementRepo::groups_for_product(pool, id, true).await?;
        let flavors = Self::flavors(pool, id).await?;
        let technical_sheet = Self::technical_sheet(pool, id).await?;
        Ok(Some(ProductDetail {
            product,
            complement_groups,
            flavors,
            technical_sheet,
        }))
    }

    /// Flavor products linked to `product_id`, in link order.
    pub async fn flavors(pool: &PgPool, product_id: DbId) -> Result<Vec<FlavorSummary>, sqlx::Error> {
        sqlx::query_as::<_, FlavorSummary>(
            "SELECT p.id, p.code, p.name, p.price_cents, p.is_active \
             FROM product_flavors pf \
             JOIN products p ON p.id = pf.flavor_product_id \
             WHERE pf.product_id = $1 \
             ORDER BY pf.sort_order, p.name",
        )
        .bind(product_id)
        .fetch_all(pool)
        .await
    }

    /// Technical sheet lines joined with ingredient name, unit and cost.
    pub async fn technical_sheet(
        pool: &PgPool,
        product_id: DbId,
    ) -> Result<Vec<TechnicalSheetLine>, sqlx::Error> {
        sqlx::query_as::<_, TechnicalSheetLine>(
            "SELECT t.ingredient_id, i.name AS ingredient_name, u.symbol AS unit_symbol, \
                    t.quantity, i.cost_cents \
             FROM technical_sheet_items t \
             JOIN ingredients i ON i.id = t.ingredient_id \
             LEFT JOIN units u ON u.id = i.unit_id \
             WHERE t.product_id = $1 \
             ORDER BY i.name",
        )
        .bind(product_id)
        .fetch_all(pool)
        .await
    }

    /// Insert a product and its nested collections in one transaction.
    pub async fn create(
        pool: &PgPool,
        tenant_id: DbId,
        input: &CreateProduct,
    ) -> Result<Product, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO products \
                (tenant_id, code, name, description, price_cents, category_id, \
                 production_location_id, unit_id, image_url, is_active, \
                 available_for_delivery, controls_stock, stock_quantity, max_flavors, \
                 flavor_pricing, yield_portions, sort_order) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, COALESCE($10, true), \
                     COALESCE($11, true), COALESCE($12, false), COALESCE($13, 0), \
                     COALESCE($14, 1), COALESCE($15, 'highest'), COALESCE($16, 1), \
                     COALESCE($17, 0)) \
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(tenant_id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(input.category_id)
            .bind(input.production_location_id)
            .bind(input.unit_id)
            .bind(&input.image_url)
            .bind(input.is_active)
            .bind(input.available_for_delivery)
            .bind(input.controls_stock)
            .bind(input.stock_quantity)
            .bind(input.max_flavors)
            .bind(&input.flavor_pricing)
            .bind(input.yield_portions)
            .bind(input.sort_order)
            .fetch_one(&mut *tx)
            .await?;

        set_complement_groups_inner(&mut tx, product.id, &input.complement_group_ids).await?;
        set_flavors_inner(&mut tx, product.id, &input.flavor_ids).await?;
        set_technical_sheet_inner(&mut tx, product.id, &input.technical_sheet).await?;

        tx.commit().await?;
        Ok(product)
    }

    /// Update scalar fields and replace every supplied nested collection in
    /// one transaction.
    pub async fn update(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<Product>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE products SET \
                code = COALESCE($3, code), \
                name = COALESCE($4, name), \
                description = COALESCE($5, description), \
                price_cents = COALESCE($6, price_cents), \
                category_id = CASE WHEN $7 THEN $8 ELSE category_id END, \
                production_location_id = CASE WHEN $9 THEN $10 ELSE production_location_id END, \
                unit_id = CASE WHEN $11 THEN $12 ELSE unit_id END, \
                image_url = COALESCE($13, image_url), \
                is_active = COALESCE($14, is_active), \
                available_for_delivery = COALESCE($15, available_for_delivery), \
                controls_stock = COALESCE($16, controls_stock), \
                stock_quantity = COALESCE($17, stock_quantity), \
                max_flavors = COALESCE($18, max_flavors), \
                flavor_pricing = COALESCE($19, flavor_pricing), \
                yield_portions = COALESCE($20, yield_portions), \
                sort_order = COALESCE($21, sort_order) \
             WHERE tenant_id = $1 AND id = $2 \
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(&input.code)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price_cents)
            .bind(input.category_id.is_some())
            .bind(input.category_id.flatten())
            .bind(input.production_location_id.is_some())
            .bind(input.production_location_id.flatten())
            .bind(input.unit_id.is_some())
            .bind(input.unit_id.flatten())
            .bind(&input.image_url)
            .bind(input.is_active)
            .bind(input.available_for_delivery)
            .bind(input.controls_stock)
            .bind(input.stock_quantity)
            .bind(input.max_flavors)
            .bind(&input.flavor_pricing)
            .bind(input.yield_portions)
            .bind(input.sort_order)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(product) = product else {
            return Ok(None);
        };

        if let Some(ref ids) = input.complement_group_ids {
            set_complement_groups_inner(&mut tx, id, ids).await?;
        }
        if let Some(ref ids) = input.flavor_ids {
            set_flavors_inner(&mut tx, id, ids).await?;
        }
        if let Some(ref lines) = input.technical_sheet {
            set_technical_sheet_inner(&mut tx, id, lines).await?;
        }

        tx.commit().await?;
        Ok(Some(product))
    }

    /// Replace the complement group links. Returns false when the product
    /// does not exist for the tenant.
    pub async fn set_complement_groups(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        group_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if !lock_product(&mut tx, tenant_id, id).await? {
            return Ok(false);
        }
        set_complement_groups_inner(&mut tx, id, group_ids).await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Replace the flavor links. Returns false when the product does not exist.
    pub async fn set_flavors(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        flavor_ids: &[DbId],
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if !lock_product(&mut tx, tenant_id, id).await? {
            return Ok(false);
        }
        set_flavors_inner(&mut tx, id, flavor_ids).await?;
        tx.commit().await?;
        Ok(true)
    }

    /// Replace the technical sheet. Returns false when the product does not
    /// exist.
    pub async fn set_technical_sheet(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        lines: &[TechnicalSheetEntry],
    ) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        if !lock_product(&mut tx, tenant_id, id).await? {
            return Ok(false);
        }
        set_technical_sheet_inner(&mut tx, id, lines).await?;
        tx.commit().await?;
        Ok(true)
    }

    pub async fn deactivate(pool: &PgPool, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE products SET is_active = false \
             WHERE tenant_id = $1 AND id = $2 AND is_active = true",
        )
        .bind(tenant_id)
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Apply a batch of sort orders in one transaction.
    pub async fn reorder(
        pool: &PgPool,
        tenant_id: DbId,
        entries: &[SortOrderEntry],
    ) -> Result<u64, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let mut updated = 0;
        for entry in entries {
            let result = sqlx::query(
                "UPDATE products SET sort_order = $3 WHERE tenant_id = $1 AND id = $2",
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

    /// Public menu: active categories, each with its active products that are
    /// available for delivery. Categories with no such product are omitted.
    pub async fn menu(pool: &PgPool, tenant_id: DbId) -> Result<Vec<MenuSection>, sqlx::Error> {
        let categories: Vec<Category> = CategoryRepo::list(pool, tenant_id, false).await?;

        let query = format!(
            "SELECT {} FROM products p \
             JOIN categories c ON c.id = p.category_id \
             WHERE p.tenant_id = $1 AND p.is_active = true \
               AND p.available_for_delivery = true AND c.is_active = true \
             ORDER BY p.sort_order, p.name",
            prefixed(COLUMNS, "p")
        );
        let products = sqlx::query_as::<_, Product>(&query)
            .bind(tenant_id)
            .fetch_all(pool)
            .await?;

        Ok(categories
            .into_iter()
            .filter_map(|category| {
                let items: Vec<Product> = products
                    .iter()
                    .filter(|p| p.category_id == Some(category.id))
                    .cloned()
                    .collect();
                (!items.is_empty()).then_some(MenuSection {
                    category,
                    products: items,
                })
            })
            .collect())
    }
}

/// Lock the product row for the rest of the transaction.
async fn lock_product(tx: &mut Tx<'_>, tenant_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
    let found: Option<DbId> = sqlx::query_scalar(
        "SELECT id FROM products WHERE tenant_id = $1 AND id = $2 FOR UPDATE",
    )
    .bind(tenant_id)
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?;
    Ok(found.is_some())
}

async fn set_complement_groups_inner(
    tx: &mut Tx<'_>,
    product_id: DbId,
    group_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM product_complement_groups WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
    for (position, group_id) in group_ids.iter().enumerate() {
        sqlx::query(
            "INSERT INTO product_complement_groups (product_id, group_id, sort_order) \
             VALUES ($1, $2, $3)",
        )
        .bind(product_id)
        .bind(group_id)
        .bind(position as i32)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn set_flavors_inner(
    tx: &mut Tx<'_>,
    product_id: DbId,
    flavor_ids: &[DbId],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM product_flavors WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
    for (position, flavor_id) in flavor_ids.iter().enumerate() {
        sqlx::query(
            "INSERT INTO product_flavors (product_id, flavor_product_id, sort_order) \
             VALUES ($1, $2, $3)",
        )
        .bind(product_id)
        .bind(flavor_id)
        .bind(position as i32)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn set_technical_sheet_inner(
    tx: &mut Tx<'_>,
    product_id: DbId,
    lines: &[TechnicalSheetEntry],
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM technical_sheet_items WHERE product_id = $1")
        .bind(product_id)
        .execute(&mut **tx)
        .await?;
    for line in lines {
        sqlx::query(
            "INSERT INTO technical_sheet_items (product_id, ingredient_id, quantity) \
             VALUES ($1, $2, $3)",
        )
        .bind(product_id)
        .bind(line.ingredient_id)
        .bind(line.quantity)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}
