//! Handlers for `/orders`: staff-side order management.
//!
//! Status changes go through [`OrderStatus::transition_to`]; the repository
//! then applies the change only if the stored status still matches, so two
//! operators acting on the same order cannot both win.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use comanda_core::error::CoreError;
use comanda_core::order_status::{OrderStatus, OrderType};
use comanda_core::pagination::{SortDirection, SortSpec};
use comanda_core::routing::{build_tickets, TicketLine};
use comanda_core::types::DbId;
use comanda_db::models::order::{Order, OrderFilter, OrderItemDetail};
use comanda_db::repositories::{OrderRepo, ProductionLocationRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

const ENTITY: &str = "Order";

const SORTABLE: &[&str] = &["created_at", "number", "total_cents"];

const DEFAULT_SORT: SortSpec = SortSpec {
    column: "created_at",
    direction: SortDirection::Desc,
};

/// Filters for `GET /orders`, read next to [`PaginationParams`].
#[derive(Debug, Deserialize)]
pub struct OrderListParams {
    pub status: Option<String>,
    pub order_type: Option<String>,
}

/// Body of `PUT /orders/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: OrderStatus,
}

/// GET /api/v1/orders
///
/// Newest first unless `sort` says otherwise.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(params): Query<OrderListParams>,
) -> AppResult<impl IntoResponse> {
    let page = pagination.resolve(SORTABLE, DEFAULT_SORT)?;
    let status = params
        .status
        .as_deref()
        .map(str::parse::<OrderStatus>)
        .transpose()
        .map_err(CoreError::Validation)?;
    let order_type = params
        .order_type
        .as_deref()
        .map(str::parse::<OrderType>)
        .transpose()
        .map_err(CoreError::Validation)?;

    let filter = OrderFilter {
        status,
        order_type,
        sort: page.sort,
        limit: page.limit,
        offset: page.offset,
    };
    let orders = OrderRepo::list(&state.pool, auth.tenant_id, &filter).await?;
    let total = OrderRepo::count(&state.pool, auth.tenant_id, &filter).await?;
    Ok(Json(PaginatedResponse::new(orders, &page, total)))
}

/// GET /api/v1/orders/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = find_order(&state, auth.tenant_id, id).await?;
    let detail = OrderRepo::detail(&state.pool, order).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/orders/{id}/status
///
/// Body: `{ "status": "confirmed" }`. Moving to `cancelled` gives back the
/// stock and coupon use the order consumed.
pub async fn update_status(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateStatusRequest>,
) -> AppResult<impl IntoResponse> {
    let order = find_order(&state, auth.tenant_id, id).await?;
    let current = order.status().map_err(CoreError::Internal)?;
    let order_type = order.order_type().map_err(CoreError::Internal)?;

    let next = current
        .transition_to(input.status, order_type)
        .map_err(CoreError::Validation)?;

    let updated = OrderRepo::update_status(
        &state.pool,
        auth.tenant_id,
        id,
        current,
        next,
        Some(auth.user_id),
    )
    .await?
    .ok_or_else(|| {
        AppError::Core(CoreError::Conflict(format!(
            "Order {id} changed status concurrently, reload and retry"
        )))
    })?;

    tracing::info!(
        tenant_id = auth.tenant_id,
        order_id = id,
        number = updated.number,
        from = current.as_str(),
        to = next.as_str(),
        user_id = auth.user_id,
        "Order status changed"
    );
    Ok(Json(DataResponse { data: updated }))
}

/// GET /api/v1/orders/{id}/history
pub async fn history(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = find_order(&state, auth.tenant_id, id).await?;
    let changes = OrderRepo::history(&state.pool, order.id).await?;
    Ok(Json(DataResponse { data: changes }))
}

/// GET /api/v1/orders/{id}/tickets
///
/// Kitchen tickets grouped by the location snapshotted on each item when
/// the order was placed.
pub async fn tickets(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let order = find_order(&state, auth.tenant_id, id).await?;
    let items = OrderRepo::items(&state.pool, order.id).await?;
    let names = ProductionLocationRepo::name_map(&state.pool, auth.tenant_id).await?;

    let lines = items.into_iter().map(ticket_line).collect();
    Ok(Json(DataResponse {
        data: build_tickets(lines, &names),
    }))
}

fn ticket_line(detail: OrderItemDetail) -> (Option<DbId>, TicketLine) {
    let mut extras: Vec<String> = detail
        .flavors
        .iter()
        .map(|f| format!("1/{} {}", detail.flavors.len(), f.name))
        .collect();
    extras.extend(
        detail
            .complements
            .iter()
            .map(|c| format!("{}x {}", c.quantity, c.name)),
    );

    let item = detail.item;
    (
        item.production_location_id,
        TicketLine {
            order_item_id: item.id,
            product_name: item.product_name,
            quantity: item.quantity,
            notes: item.notes,
            extras,
        },
    )
}

async fn find_order(state: &AppState, tenant_id: DbId, id: DbId) -> AppResult<Order> {
    OrderRepo::find_by_id(&state.pool, tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
}

#[cfg(test)]
mod tests {
    use comanda_db::models::order::{OrderItem, OrderItemComplement, OrderItemFlavor};

    use super::*;

    fn item(location: Option<DbId>) -> OrderItem {
        OrderItem {
            id: 7,
            order_id: 1,
            product_id: 3,
            product_name: "Pizza G".into(),
            quantity: 2,
            unit_price_cents: 5000,
            total_cents: 10000,
            production_location_id: location,
            notes: Some("no onion".into()),
        }
    }

    #[test]
    fn ticket_line_lists_flavors_then_complements() {
        let detail = OrderItemDetail {
            item: item(Some(4)),
            complements: vec![OrderItemComplement {
                id: 1,
                order_item_id: 7,
                complement_id: 9,
                name: "Catupiry".into(),
                quantity: 2,
                price_cents: 300,
            }],
            flavors: vec![
                OrderItemFlavor {
                    order_item_id: 7,
                    product_id: 10,
                    name: "Calabresa".into(),
                    price_cents: 4000,
                },
                OrderItemFlavor {
                    order_item_id: 7,
                    product_id: 11,
                    name: "Mussarela".into(),
                    price_cents: 3800,
                },
            ],
        };

        let (location, line) = ticket_line(detail);
        assert_eq!(location, Some(4));
        assert_eq!(line.order_item_id, 7);
        assert_eq!(line.quantity, 2);
        assert_eq!(
            line.extras,
            vec!["1/2 Calabresa", "1/2 Mussarela", "2x Catupiry"]
        );
    }

    #[test]
    fn ticket_line_without_extras() {
        let detail = OrderItemDetail {
            item: item(None),
            complements: vec![],
            flavors: vec![],
        };
        let (location, line) = ticket_line(detail);
        assert_eq!(location, None);
        assert!(line.extras.is_empty());
        assert_eq!(line.notes.as_deref(), Some("no onion"));
    }
}
