//! Order models: rows, the fully-priced insert DTO and list filters.

use comanda_core::checkout::OrderTotals;
use comanda_core::order_status::{OrderStatus, OrderType};
use comanda_core::pagination::SortSpec;
use comanda_core::types::{Cents, DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::customer::{Customer, CustomerContact, DeliveryAddress, NewDeliveryAddress};

/// A row from the `orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub tenant_id: DbId,
    pub number: i32,
    pub tracking_code: Uuid,
    pub customer_id: DbId,
    pub delivery_address_id: Option<DbId>,
    pub payment_method_id: DbId,
    pub coupon_id: Option<DbId>,
    pub order_type: String,
    pub status: String,
    pub subtotal_cents: Cents,
    pub discount_cents: Cents,
    pub delivery_fee_cents: Cents,
    pub total_cents: Cents,
    pub change_for_cents: Option<Cents>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Order {
    pub fn status(&self) -> Result<OrderStatus, String> {
        self.status.parse()
    }

    pub fn order_type(&self) -> Result<OrderType, String> {
        self.order_type.parse()
    }
}

/// An order row joined with its customer's name for list views.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderListItem {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub order: Order,
    pub customer_name: String,
    pub customer_phone: String,
}

/// A row from the `order_items` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItem {
    pub id: DbId,
    pub order_id: DbId,
    pub product_id: DbId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price_cents: Cents,
    pub total_cents: Cents,
    pub production_location_id: Option<DbId>,
    pub notes: Option<String>,
}

/// A row from the `order_item_complements` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItemComplement {
    pub id: DbId,
    pub order_item_id: DbId,
    pub complement_id: DbId,
    pub name: String,
    pub quantity: i32,
    pub price_cents: Cents,
}

/// A row from the `order_item_flavors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderItemFlavor {
    pub order_item_id: DbId,
    pub product_id: DbId,
    pub name: String,
    pub price_cents: Cents,
}

/// An order item with its chosen complements and flavors.
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemDetail {
    #[serde(flatten)]
    pub item: OrderItem,
    pub complements: Vec<OrderItemComplement>,
    pub flavors: Vec<OrderItemFlavor>,
}

/// An order with customer, address and items.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetail {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Customer,
    pub delivery_address: Option<DeliveryAddress>,
    pub items: Vec<OrderItemDetail>,
}

/// A row from the `order_status_history` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct OrderStatusChange {
    pub id: DbId,
    pub order_id: DbId,
    pub from_status: Option<String>,
    pub to_status: String,
    pub changed_by: Option<DbId>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Insert DTOs (built server-side after pricing; never deserialized)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct NewOrderItemComplement {
    pub complement_id: DbId,
    pub name: String,
    pub quantity: i32,
    pub price_cents: Cents,
}

#[derive(Debug, Clone)]
pub struct NewOrderItemFlavor {
    pub product_id: DbId,
    pub name: String,
    pub price_cents: Cents,
}

#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: DbId,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price_cents: Cents,
    pub total_cents: Cents,
    pub production_location_id: Option<DbId>,
    pub notes: Option<String>,
    pub complements: Vec<NewOrderItemComplement>,
    pub flavors: Vec<NewOrderItemFlavor>,
}

/// A fully priced and validated order ready to be persisted.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub tenant_id: DbId,
    pub customer: CustomerContact,
    pub address: Option<NewDeliveryAddress>,
    pub order_type: OrderType,
    pub payment_method_id: DbId,
    pub coupon_id: Option<DbId>,
    pub totals: OrderTotals,
    pub change_for_cents: Option<Cents>,
    pub notes: Option<String>,
    pub items: Vec<NewOrderItem>,
    /// Units to take from stock, aggregated per stock-controlled product.
    pub stock_reservations: Vec<(DbId, i32)>,
}

/// Result of trying to persist a [`NewOrder`].
///
/// Stock and coupon limits are re-checked inside the insert transaction;
/// losing a race on either rolls the whole order back.
#[derive(Debug)]
pub enum PlaceOrderOutcome {
    Placed(Order),
    OutOfStock { product_id: DbId },
    CouponUnavailable,
}

/// Filters for the paginated order list.
#[derive(Debug, Clone)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub order_type: Option<OrderType>,
    pub sort: SortSpec,
    pub limit: i64,
    pub offset: i64,
}
