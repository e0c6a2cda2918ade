//! Handlers for `/payment-methods`.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use comanda_core::catalog::validate_name;
use comanda_core::error::CoreError;
use comanda_core::payment::validate_kind;
use comanda_core::types::DbId;
use comanda_db::models::payment_method::{CreatePaymentMethod, UpdatePaymentMethod};
use comanda_db::repositories::PaymentMethodRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "PaymentMethod";

/// GET /api/v1/payment-methods
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let methods =
        PaymentMethodRepo::list(&state.pool, auth.tenant_id, params.include_inactive).await?;
    Ok(Json(DataResponse { data: methods }))
}

/// POST /api/v1/payment-methods
pub async fn create(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreatePaymentMethod>,
) -> AppResult<impl IntoResponse> {
    validate_name("Payment method", &input.name).map_err(CoreError::Validation)?;
    validate_kind(&input.kind).map_err(CoreError::Validation)?;

    let method = PaymentMethodRepo::create(&state.pool, auth.tenant_id, &input).await?;
    tracing::info!(
        tenant_id = auth.tenant_id,
        payment_method_id = method.id,
        kind = %method.kind,
        "Payment method created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: method })))
}

/// PUT /api/v1/payment-methods/{id}
pub async fn update(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdatePaymentMethod>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name("Payment method", name).map_err(CoreError::Validation)?;
    }
    if let Some(kind) = &input.kind {
        validate_kind(kind).map_err(CoreError::Validation)?;
    }
    let method = PaymentMethodRepo::update(&state.pool, auth.tenant_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse { data: method }))
}

/// DELETE /api/v1/payment-methods/{id}
pub async fn deactivate(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if PaymentMethodRepo::deactivate(&state.pool, auth.tenant_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
    }
}
