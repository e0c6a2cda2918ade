//! Repository for `orders`, their items and status history.

use std::collections::HashMap;

use comanda_core::order_status::OrderStatus;
use comanda_core::types::DbId;
use sqlx::PgPool;
use uuid::Uuid;

use super::prefixed;
use super::CustomerRepo;
use crate::models::order::{
    NewOrder, NewOrderItem, Order, OrderDetail, OrderFilter, OrderItem, OrderItemComplement,
    OrderItemDetail, OrderItemFlavor, OrderListItem, OrderStatusChange, PlaceOrderOutcome,
};

const COLUMNS: &str = "id, tenant_id, number, tracking_code, customer_id, delivery_address_id, \
    payment_method_id, coupon_id, order_type, status, subtotal_cents, discount_cents, \
    delivery_fee_cents, total_cents, change_for_cents, notes, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, order_id, product_id, product_name, quantity, unit_price_cents, \
    total_cents, production_location_id, notes";

const HISTORY_COLUMNS: &str = "id, order_id, from_status, to_status, changed_by, created_at";

type Tx<'a> = sqlx::Transaction<'a, sqlx::Postgres>;

/// Provides order placement, lookup and status changes.
pub struct OrderRepo;

impl OrderRepo {
    /// Persist a priced order in one transaction.
    ///
    /// Placement is serialized per tenant by locking the tenant row, which
    /// keeps order numbers gap-free. Stock and coupon usage are taken with
    /// guarded updates; if either guard fails nothing is written.
    pub async fn place(pool: &PgPool, order: &NewOrder) -> Result<PlaceOrderOutcome, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("SELECT id FROM tenants WHERE id = $1 FOR UPDATE")
            .bind(order.tenant_id)
            .execute(&mut *tx)
            .await?;

        for &(product_id, quantity) in &order.stock_reservations {
            let result = sqlx::query(
                "UPDATE products SET stock_quantity = stock_quantity - $3 \
                 WHERE tenant_id = $1 AND id = $2 AND controls_stock = true \
                   AND stock_quantity >= $3",
            )
            .bind(order.tenant_id)
            .bind(product_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() == 0 {
                return Ok(PlaceOrderOutcome::OutOfStock { product_id });
            }
        }

        if let Some(coupon_id) = order.coupon_id {
            let result = sqlx::query(
                "UPDATE coupons SET used_count = used_count + 1 \
                 WHERE tenant_id = $1 AND id = $2 AND is_active = true \
                   AND (max_uses IS NULL OR used_count < max_uses)",
            )
            .bind(order.tenant_id)
            .bind(coupon_id)
            .execute(&mut *tx)
            .await?;
            if result.rows_affected() == 0 {
                return Ok(PlaceOrderOutcome::CouponUnavailable);
            }
        }

        let customer = CustomerRepo::upsert_inner(&mut tx, order.tenant_id, &order.customer).await?;
        let address_id = match order.address {
            Some(ref address) => {
                Some(CustomerRepo::insert_address_inner(&mut tx, customer.id, address).await?.id)
            }
            None => None,
        };

        let number: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(number), 0) + 1 FROM orders WHERE tenant_id = $1",
        )
        .bind(order.tenant_id)
        .fetch_one(&mut *tx)
        .await?;

        let query = format!(
            "INSERT INTO orders \
                (tenant_id, number, tracking_code, customer_id, delivery_address_id, \
                 payment_method_id, coupon_id, order_type, status, subtotal_cents, \
                 discount_cents, delivery_fee_cents, total_cents, change_for_cents, notes) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
             RETURNING {COLUMNS}"
        );
        let placed = sqlx::query_as::<_, Order>(&query)
            .bind(order.tenant_id)
            .bind(number)
            .bind(Uuid::new_v4())
            .bind(customer.id)
            .bind(address_id)
            .bind(order.payment_method_id)
            .bind(order.coupon_id)
            .bind(order.order_type.as_str())
            .bind(OrderStatus::Pending.as_str())
            .bind(order.totals.subtotal_cents)
            .bind(order.totals.discount_cents)
            .bind(order.totals.delivery_fee_cents)
            .bind(order.totals.total_cents)
            .bind(order.change_for_cents)
            .bind(&order.notes)
            .fetch_one(&mut *tx)
            .await?;

        for item in &order.items {
            insert_item(&mut tx, placed.id, item).await?;
        }
        for &(product_id, quantity) in &order.stock_reservations {
            sqlx::query(
                "INSERT INTO order_stock_reservations (order_id, product_id, quantity) \
                 VALUES ($1, $2, $3)",
            )
            .bind(placed.id)
            .bind(product_id)
            .bind(quantity)
            .execute(&mut *tx)
            .await?;
        }
        insert_history(&mut tx, placed.id, None, OrderStatus::Pending, None).await?;

        tx.commit().await?;
        Ok(PlaceOrderOutcome::Placed(placed))
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM orders WHERE tenant_id = $1 AND id = $2");
        sqlx::query_as::<_, Order>(&query)
            .bind(tenant_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_tracking_code(
        pool: &PgPool,
        tenant_id: DbId,
        tracking_code: Uuid,
    ) -> Result<Option<Order>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM orders WHERE tenant_id = $1 AND tracking_code = $2");
        sqlx::query_as::<_, Order>(&query)
            .bind(tenant_id)
            .bind(tracking_code)
            .fetch_optional(pool)
            .await
    }

    /// Expand an order with its customer, address and items.
    pub async fn detail(pool: &PgPool, order: Order) -> Result<OrderDetail, sqlx::Error> {
        let customer = CustomerRepo::find_by_id(pool, order.tenant_id, order.customer_id)
            .await?
            .ok_or(sqlx::Error::RowNotFound)?;
        let delivery_address = match order.delivery_address_id {
            Some(address_id) => CustomerRepo::find_address(pool, address_id).await?,
            None => None,
        };
        let items = Self::items(pool, order.id).await?;
        Ok(OrderDetail {
            order,
            customer,
            delivery_address,
            items,
        })
    }

    /// Items of an order in insertion order, each with its complements and
    /// flavors.
    pub async fn items(pool: &PgPool, order_id: DbId) -> Result<Vec<OrderItemDetail>, sqlx::Error> {
        let query = format!("SELECT {ITEM_COLUMNS} FROM order_items WHERE order_id = $1 ORDER BY id");
        let items = sqlx::query_as::<_, OrderItem>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await?;

        let complements = sqlx::query_as::<_, OrderItemComplement>(
            "SELECT c.id, c.order_item_id, c.complement_id, c.name, c.quantity, c.price_cents \
             FROM order_item_complements c \
             JOIN order_items i ON i.id = c.order_item_id \
             WHERE i.order_id = $1 \
             ORDER BY c.id",
        )
        .bind(order_id)
        .fetch_all(pool)
        .await?;

        let flavors = sqlx::query_as::<_, OrderItemFlavor>(
            "SELECT f.order_item_id, f.product_id, f.name, f.price_cents \
             FROM order_item_flavors f \
             JOIN order_items i ON i.id = f.order_item_id \
             WHERE i.order_id = $1 \
             ORDER BY f.name",
        )
        .bind(order_id)
        .fetch_all(pool)
        .await?;

        let mut complements_by_item: HashMap<DbId, Vec<OrderItemComplement>> = HashMap::new();
        for c in complements {
            complements_by_item.entry(c.order_item_id).or_default().push(c);
        }
        let mut flavors_by_item: HashMap<DbId, Vec<OrderItemFlavor>> = HashMap::new();
        for f in flavors {
            flavors_by_item.entry(f.order_item_id).or_default().push(f);
        }

        Ok(items
            .into_iter()
            .map(|item| OrderItemDetail {
                complements: complements_by_item.remove(&item.id).unwrap_or_default(),
                flavors: flavors_by_item.remove(&item.id).unwrap_or_default(),
                item,
            })
            .collect())
    }

    fn filter_clause(filter: &OrderFilter) -> (String, u32) {
        let mut conditions = vec!["o.tenant_id = $1".to_string()];
        let mut bind_idx = 2u32;

        if filter.status.is_some() {
            conditions.push(format!("o.status = ${bind_idx}"));
            bind_idx += 1;
        }
        if filter.order_type.is_some() {
            conditions.push(format!("o.order_type = ${bind_idx}"));
            bind_idx += 1;
        }

        (format!("WHERE {}", conditions.join(" AND ")), bind_idx)
    }

    /// One page of orders with customer name and phone.
    pub async fn list(
        pool: &PgPool,
        tenant_id: DbId,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderListItem>, sqlx::Error> {
        let (where_clause, bind_idx) = Self::filter_clause(filter);
        let query = format!(
            "SELECT {columns}, c.name AS customer_name, c.phone AS customer_phone \
             FROM orders o \
             JOIN customers c ON c.id = o.customer_id \
             {where_clause} \
             ORDER BY o.{order}, o.id DESC \
             LIMIT ${bind_idx} OFFSET ${next_idx}",
            columns = prefixed(COLUMNS, "o"),
            order = filter.sort.to_sql(),
            next_idx = bind_idx + 1,
        );

        let mut q = sqlx::query_as::<_, OrderListItem>(&query).bind(tenant_id);
        if let Some(status) = filter.status {
            q = q.bind(status.as_str());
        }
        if let Some(order_type) = filter.order_type {
            q = q.bind(order_type.as_str());
        }
        q.bind(filter.limit).bind(filter.offset).fetch_all(pool).await
    }

    pub async fn count(
        pool: &PgPool,
        tenant_id: DbId,
        filter: &OrderFilter,
    ) -> Result<i64, sqlx::Error> {
        let (where_clause, _) = Self::filter_clause(filter);
        let query = format!("SELECT COUNT(*) FROM orders o {where_clause}");

        let mut q = sqlx::query_scalar::<_, i64>(&query).bind(tenant_id);
        if let Some(status) = filter.status {
            q = q.bind(status.as_str());
        }
        if let Some(order_type) = filter.order_type {
            q = q.bind(order_type.as_str());
        }
        q.fetch_one(pool).await
    }

    /// Move an order from `from` to `to` and record the change.
    ///
    /// Returns `None` when the order is no longer in `from` (a concurrent
    /// change won). Cancelling returns reserved stock and releases the
    /// coupon use.
    pub async fn update_status(
        pool: &PgPool,
        tenant_id: DbId,
        id: DbId,
        from: OrderStatus,
        to: OrderStatus,
        changed_by: Option<DbId>,
    ) -> Result<Option<Order>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE orders SET status = $4 \
             WHERE tenant_id = $1 AND id = $2 AND status = $3 \
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, Order>(&query)
            .bind(tenant_id)
            .bind(id)
            .bind(from.as_str())
            .bind(to.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        let Some(order) = order else {
            return Ok(None);
        };

        if to == OrderStatus::Cancelled {
            restore_stock(&mut tx, order.id).await?;
            if let Some(coupon_id) = order.coupon_id {
                sqlx::query(
                    "UPDATE coupons SET used_count = GREATEST(used_count - 1, 0) WHERE id = $1",
                )
                .bind(coupon_id)
                .execute(&mut *tx)
                .await?;
            }
        }

        insert_history(&mut tx, order.id, Some(from), to, changed_by).await?;
        tx.commit().await?;
        Ok(Some(order))
    }

    /// Status changes of an order, oldest first.
    pub async fn history(
        pool: &PgPool,
        order_id: DbId,
    ) -> Result<Vec<OrderStatusChange>, sqlx::Error> {
        let query = format!(
            "SELECT {HISTORY_COLUMNS} FROM order_status_history \
             WHERE order_id = $1 ORDER BY created_at, id"
        );
        sqlx::query_as::<_, OrderStatusChange>(&query)
            .bind(order_id)
            .fetch_all(pool)
            .await
    }
}

async fn insert_item(tx: &mut Tx<'_>, order_id: DbId, item: &NewOrderItem) -> Result<(), sqlx::Error> {
    let item_id: DbId = sqlx::query_scalar(
        "INSERT INTO order_items \
            (order_id, product_id, product_name, quantity, unit_price_cents, total_cents, \
             production_location_id, notes) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING id",
    )
    .bind(order_id)
    .bind(item.product_id)
    .bind(&item.product_name)
    .bind(item.quantity)
    .bind(item.unit_price_cents)
    .bind(item.total_cents)
    .bind(item.production_location_id)
    .bind(&item.notes)
    .fetch_one(&mut **tx)
    .await?;

    for complement in &item.complements {
        sqlx::query(
            "INSERT INTO order_item_complements \
                (order_item_id, complement_id, name, quantity, price_cents) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(item_id)
        .bind(complement.complement_id)
        .bind(&complement.name)
        .bind(complement.quantity)
        .bind(complement.price_cents)
        .execute(&mut **tx)
        .await?;
    }

    for flavor in &item.flavors {
        sqlx::query(
            "INSERT INTO order_item_flavors (order_item_id, product_id, name, price_cents) \
             VALUES ($1, $2, $3, $4)",
        )
        .bind(item_id)
        .bind(flavor.product_id)
        .bind(&flavor.name)
        .bind(flavor.price_cents)
        .execute(&mut **tx)
        .await?;
    }
    Ok(())
}

async fn insert_history(
    tx: &mut Tx<'_>,
    order_id: DbId,
    from: Option<OrderStatus>,
    to: OrderStatus,
    changed_by: Option<DbId>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO order_status_history (order_id, from_status, to_status, changed_by) \
         VALUES ($1, $2, $3, $4)",
    )
    .bind(order_id)
    .bind(from.map(OrderStatus::as_str))
    .bind(to.as_str())
    .bind(changed_by)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

/// Return the units an order took from stock when it was placed.
///
/// Reads the reservations recorded by `place`, so toggling `controls_stock`
/// afterwards does not change what a cancel gives back.
async fn restore_stock(tx: &mut Tx<'_>, order_id: DbId) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE products p SET stock_quantity = p.stock_quantity + r.quantity \
         FROM order_stock_reservations r \
         WHERE r.order_id = $1 AND p.id = r.product_id",
    )
    .bind(order_id)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
