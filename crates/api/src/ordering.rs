//! Checkout pricing.
//!
//! Turns a customer cart into a fully priced [`NewOrder`]. Every price comes
//! from the catalog; amounts the client might send are never read. Stock and
//! coupon limits checked here are checked again inside the insert
//! transaction by [`OrderRepo::place`](comanda_db::repositories::OrderRepo::place).

use std::collections::{BTreeMap, HashMap};

use chrono::Utc;
use comanda_core::catalog::flavor_unit_price;
use comanda_core::checkout::{
    self, validate_complement_quantity, validate_line_quantity, PricedComplement, PricedLine,
};
use comanda_core::complements::validate_selection;
use comanda_core::coupon::normalize_code;
use comanda_core::customer::{validate_email, validate_phone};
use comanda_core::delivery_fee::{quote, FeeQuote};
use comanda_core::error::CoreError;
use comanda_core::order_status::OrderType;
use comanda_core::payment::validate_change;
use comanda_core::routing::resolve_location;
use comanda_core::stock::check_product_stock;
use comanda_core::types::{Cents, DbId};
use comanda_db::models::complement::ComplementGroupWithItems;
use comanda_db::models::coupon::Coupon;
use comanda_db::models::customer::{CustomerContact, NewDeliveryAddress};
use comanda_db::models::order::{NewOrder, NewOrderItem, NewOrderItemComplement, NewOrderItemFlavor};
use comanda_db::models::product::Product;
use comanda_db::models::tenant::Tenant;
use comanda_db::repositories::{
    CategoryRepo, ComplementRepo, CouponRepo, DeliveryAreaRepo, PaymentMethodRepo, ProductRepo,
};
use comanda_db::DbPool;
use serde::Deserialize;

use crate::error::{AppError, AppResult};

// ---------------------------------------------------------------------------
// Cart types
// ---------------------------------------------------------------------------

/// Body of `POST /delivery/orders`.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceOrderRequest {
    pub customer: CustomerContact,
    pub order_type: OrderType,
    /// Required for delivery orders, ignored for pickup.
    pub address: Option<NewDeliveryAddress>,
    pub payment_method_id: DbId,
    pub change_for_cents: Option<Cents>,
    pub coupon_code: Option<String>,
    pub notes: Option<String>,
    pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartItem {
    pub product_id: DbId,
    pub quantity: i32,
    pub notes: Option<String>,
    #[serde(default)]
    pub flavor_ids: Vec<DbId>,
    #[serde(default)]
    pub complements: Vec<CartComplement>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CartComplement {
    pub complement_id: DbId,
    /// Per unit of the parent line. Defaults to 1.
    pub quantity: Option<i32>,
}

fn invalid(msg: impl Into<String>) -> AppError {
    AppError::Core(CoreError::Validation(msg.into()))
}

// ---------------------------------------------------------------------------
// Shared checkout steps
// ---------------------------------------------------------------------------

/// Delivery fee and effective minimum for a neighborhood of the tenant.
pub async fn quote_delivery(
    pool: &DbPool,
    tenant: &Tenant,
    neighborhood_id: DbId,
    subtotal_cents: Cents,
) -> AppResult<FeeQuote> {
    let (neighborhood, city) =
        DeliveryAreaRepo::find_neighborhood_with_city(pool, tenant.id, neighborhood_id)
            .await?
            .ok_or_else(|| invalid(format!("Neighborhood {neighborhood_id} not found")))?;

    quote(
        city.fee(),
        neighborhood.fee(),
        tenant.min_order_cents,
        subtotal_cents,
    )
    .map_err(|err| invalid(err.to_string()))
}

/// Look up a coupon by customer-entered code and compute its discount.
pub async fn apply_coupon(
    pool: &DbPool,
    tenant_id: DbId,
    code: &str,
    subtotal_cents: Cents,
    delivery_fee_cents: Cents,
) -> AppResult<(Coupon, Cents)> {
    let code = normalize_code(code);
    let coupon = CouponRepo::find_by_code(pool, tenant_id, &code)
        .await?
        .ok_or_else(|| invalid(format!("Coupon '{code}' not found")))?;

    let terms = coupon.terms();
    terms
        .check(subtotal_cents, Utc::now())
        .map_err(|rejection| invalid(rejection.to_string()))?;
    let discount = terms.discount(subtotal_cents, delivery_fee_cents);
    Ok((coupon, discount))
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

/// Validate and price a cart for `tenant`.
pub async fn price_order(
    pool: &DbPool,
    tenant: &Tenant,
    req: &PlaceOrderRequest,
) -> AppResult<NewOrder> {
    check_accepting(tenant, req.order_type)?;
    if req.items.is_empty() {
        return Err(invalid("Order must contain at least one item"));
    }
    let customer = validate_customer(&req.customer)?;

    let product_ids: Vec<DbId> = req.items.iter().map(|i| i.product_id).collect();
    let products: HashMap<DbId, Product> = ProductRepo::find_many(pool, tenant.id, &product_ids)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut category_locations: HashMap<DbId, Vec<Option<DbId>>> = HashMap::new();
    let mut priced: Vec<PricedLine> = Vec::with_capacity(req.items.len());
    let mut items: Vec<NewOrderItem> = Vec::with_capacity(req.items.len());
    let mut ordered: Vec<(&Product, i32)> = Vec::with_capacity(req.items.len());

    for cart in &req.items {
        validate_line_quantity(cart.quantity).map_err(CoreError::Validation)?;
        let product = products
            .get(&cart.product_id)
            .filter(|p| p.is_active && p.available_for_delivery)
            .ok_or_else(|| invalid(format!("Product {} is not available", cart.product_id)))?;

        let (unit_price_cents, flavors) = price_flavors(pool, product, &cart.flavor_ids).await?;

        let groups = ComplementRepo::groups_for_product(pool, product.id, false).await?;
        let complements = select_complements(&product.name, &groups, &cart.complements)
            .map_err(CoreError::Validation)?;

        let chain: &[Option<DbId>] = match product.category_id {
            Some(category_id) if product.production_location_id.is_none() => {
                if !category_locations.contains_key(&category_id) {
                    let locations = CategoryRepo::ancestor_chain(pool, tenant.id, category_id)
                        .await?
                        .into_iter()
                        .map(|(_, location)| location)
                        .collect();
                    category_locations.insert(category_id, locations);
                }
                category_locations[&category_id].as_slice()
            }
            _ => &[],
        };
        let production_location_id = resolve_location(product.production_location_id, chain);

        let line = PricedLine {
            unit_price_cents,
            quantity: cart.quantity,
            complements: complements
                .iter()
                .map(|c| PricedComplement {
                    price_cents: c.price_cents,
                    quantity: c.quantity,
                })
                .collect(),
        };
        items.push(NewOrderItem {
            product_id: product.id,
            product_name: product.name.clone(),
            quantity: cart.quantity,
            unit_price_cents: line.unit_total_cents(),
            total_cents: line.total_cents(),
            production_location_id,
            notes: cart.notes.clone(),
            complements,
            flavors,
        });
        priced.push(line);
        ordered.push((product, cart.quantity));
    }

    let stock_reservations = reserve_stock(&ordered).map_err(CoreError::Validation)?;
    let subtotal_cents = checkout::subtotal(&priced);

    let (address, delivery_fee_cents) = match req.order_type {
        OrderType::Delivery => {
            let address = validate_address(req.address.as_ref())?;
            let fee = quote_delivery(pool, tenant, address.neighborhood_id, subtotal_cents).await?;
            (Some(address), fee.fee_cents)
        }
        OrderType::Pickup => {
            if subtotal_cents < tenant.min_order_cents {
                return Err(invalid(format!(
                    "Minimum order is {} cents",
                    tenant.min_order_cents
                )));
            }
            (None, 0)
        }
    };

    let (coupon_id, discount_cents) = match req.coupon_code.as_deref().map(str::trim) {
        Some(code) if !code.is_empty() => {
            let (coupon, discount) =
                apply_coupon(pool, tenant.id, code, subtotal_cents, delivery_fee_cents).await?;
            (Some(coupon.id), discount)
        }
        _ => (None, 0),
    };

    let payment = PaymentMethodRepo::find_by_id(pool, tenant.id, req.payment_method_id)
        .await?
        .filter(|m| m.is_active)
        .ok_or_else(|| {
            invalid(format!(
                "Payment method {} is not available",
                req.payment_method_id
            ))
        })?;

    let totals = checkout::totals(&priced, delivery_fee_cents, discount_cents);
    validate_change(&payment.kind, req.change_for_cents, totals.total_cents)
        .map_err(CoreError::Validation)?;

    Ok(NewOrder {
        tenant_id: tenant.id,
        customer,
        address,
        order_type: req.order_type,
        payment_method_id: payment.id,
        coupon_id,
        totals,
        change_for_cents: req.change_for_cents,
        notes: req
            .notes
            .as_ref()
            .map(|n| n.trim().to_string())
            .filter(|n| !n.is_empty()),
        items,
        stock_reservations,
    })
}

fn check_accepting(tenant: &Tenant, order_type: OrderType) -> AppResult<()> {
    if !tenant.is_open {
        return Err(invalid(format!("{} is closed right now", tenant.name)));
    }
    let enabled = match order_type {
        OrderType::Delivery => tenant.delivery_enabled,
        OrderType::Pickup => tenant.pickup_enabled,
    };
    if !enabled {
        return Err(invalid(format!(
            "{} orders are not accepted",
            order_type.as_str()
        )));
    }
    Ok(())
}

fn validate_customer(contact: &CustomerContact) -> AppResult<CustomerContact> {
    let name = contact.name.trim();
    if name.is_empty() {
        return Err(invalid("Customer name is required"));
    }
    let phone = validate_phone(&contact.phone).map_err(CoreError::Validation)?;
    let email = match contact.email.as_deref().map(str::trim) {
        Some(email) if !email.is_empty() => {
            validate_email(email).map_err(CoreError::Validation)?;
            Some(email.to_string())
        }
        _ => None,
    };
    Ok(CustomerContact {
        name: name.to_string(),
        phone,
        email,
    })
}

fn validate_address(address: Option<&NewDeliveryAddress>) -> AppResult<NewDeliveryAddress> {
    let address = address.ok_or_else(|| invalid("Delivery orders require an address"))?;
    if address.street.trim().is_empty() || address.number.trim().is_empty() {
        return Err(invalid("Address street and number are required"));
    }
    let optional = |v: &Option<String>| {
        v.as_ref()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };
    Ok(NewDeliveryAddress {
        neighborhood_id: address.neighborhood_id,
        street: address.street.trim().to_string(),
        number: address.number.trim().to_string(),
        complement: optional(&address.complement),
        reference: optional(&address.reference),
    })
}

/// Unit price of a line after flavor pricing, with the chosen flavors.
async fn price_flavors(
    pool: &DbPool,
    product: &Product,
    flavor_ids: &[DbId],
) -> AppResult<(Cents, Vec<NewOrderItemFlavor>)> {
    if flavor_ids.is_empty() {
        return Ok((product.price_cents, Vec::new()));
    }

    let mut seen = flavor_ids.to_vec();
    seen.sort_unstable();
    seen.dedup();
    if seen.len() != flavor_ids.len() {
        return Err(invalid(format!(
            "The same flavor was chosen twice for '{}'",
            product.name
        )));
    }

    let offered: HashMap<DbId, _> = ProductRepo::flavors(pool, product.id)
        .await?
        .into_iter()
        .filter(|f| f.is_active)
        .map(|f| (f.id, f))
        .collect();

    let mut chosen = Vec::with_capacity(flavor_ids.len());
    for id in flavor_ids {
        let flavor = offered.get(id).ok_or_else(|| {
            invalid(format!(
                "Flavor {id} is not offered for '{}'",
                product.name
            ))
        })?;
        chosen.push(NewOrderItemFlavor {
            product_id: flavor.id,
            name: flavor.name.clone(),
            price_cents: flavor.price_cents,
        });
    }

    let prices: Vec<Cents> = chosen.iter().map(|f| f.price_cents).collect();
    let unit = flavor_unit_price(
        product.price_cents,
        &prices,
        product.max_flavors,
        &product.flavor_pricing,
    )
    .map_err(CoreError::Validation)?;
    Ok((unit, chosen))
}

/// Resolve cart complements against the product's active groups and check
/// every group's selection bounds, including groups nothing was picked from.
fn select_complements(
    product_name: &str,
    groups: &[ComplementGroupWithItems],
    picks: &[CartComplement],
) -> Result<Vec<NewOrderItemComplement>, String> {
    let mut per_group: BTreeMap<DbId, i32> = BTreeMap::new();
    let mut chosen: Vec<NewOrderItemComplement> = Vec::with_capacity(picks.len());

    for pick in picks {
        if chosen.iter().any(|c| c.complement_id == pick.complement_id) {
            return Err(format!(
                "Complement {} listed twice for '{product_name}'",
                pick.complement_id
            ));
        }
        let quantity = pick.quantity.unwrap_or(1);
        validate_complement_quantity(quantity)?;

        let (group, complement) = groups
            .iter()
            .find_map(|g| {
                g.complements
                    .iter()
                    .find(|c| c.id == pick.complement_id && c.is_active)
                    .map(|c| (g, c))
            })
            .ok_or_else(|| {
                format!(
                    "Complement {} is not offered for '{product_name}'",
                    pick.complement_id
                )
            })?;

        *per_group.entry(group.group.id).or_default() += quantity;
        chosen.push(NewOrderItemComplement {
            complement_id: complement.id,
            name: complement.name.clone(),
            quantity,
            price_cents: complement.price_cents,
        });
    }

    for group in groups {
        let selected = per_group.get(&group.group.id).copied().unwrap_or(0);
        validate_selection(&group.group.name, &group.group.bounds(), selected)?;
    }
    Ok(chosen)
}

/// Aggregate requested units per stock-controlled product and check them
/// against the current level.
fn reserve_stock(ordered: &[(&Product, i32)]) -> Result<Vec<(DbId, i32)>, String> {
    let mut requested: BTreeMap<DbId, (&Product, i32)> = BTreeMap::new();
    for &(product, quantity) in ordered.iter().filter(|(p, _)| p.controls_stock) {
        requested.entry(product.id).or_insert((product, 0)).1 += quantity;
    }

    requested
        .into_values()
        .map(|(product, quantity)| {
            check_product_stock(&product.name, product.stock_quantity, quantity)
                .map(|()| (product.id, quantity))
        })
        .collect()
}
