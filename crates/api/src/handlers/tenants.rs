//! Handlers for tenant bootstrap (`/tenants`) and settings (`/tenant`).

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use comanda_core::customer::validate_email;
use comanda_core::error::CoreError;
use comanda_core::tenant::{validate_slug, validate_tenant_name};
use comanda_db::models::tenant::{CreateTenant, Tenant, UpdateTenant};
use comanda_db::models::user::User;
use comanda_db::repositories::TenantRepo;
use serde::{Deserialize, Serialize};

use crate::auth::password::{hash_password, validate_password_strength, MIN_PASSWORD_LENGTH};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// First admin account created together with a tenant.
#[derive(Debug, Deserialize)]
pub struct AdminAccount {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request body for `POST /tenants`.
#[derive(Debug, Deserialize)]
pub struct BootstrapTenantRequest {
    #[serde(flatten)]
    pub tenant: CreateTenant,
    pub admin: AdminAccount,
}

#[derive(Debug, Serialize)]
pub struct BootstrapTenantResponse {
    pub tenant: Tenant,
    pub admin: User,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/tenants
///
/// Public bootstrap: creates a tenant and its first admin user in one
/// transaction. A taken slug is a 409 from the unique constraint.
pub async fn create(
    State(state): State<AppState>,
    Json(mut input): Json<BootstrapTenantRequest>,
) -> AppResult<impl IntoResponse> {
    input.tenant.slug = input.tenant.slug.trim().to_string();
    validate_slug(&input.tenant.slug).map_err(CoreError::Validation)?;
    validate_tenant_name(&input.tenant.name).map_err(CoreError::Validation)?;

    let admin = &input.admin;
    if admin.username.trim().is_empty() {
        return Err(AppError::Core(CoreError::Validation(
            "Admin username is required".into(),
        )));
    }
    validate_email(&admin.email).map_err(CoreError::Validation)?;
    validate_password_strength(&admin.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;

    let password_hash = hash_password(&admin.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let (tenant, admin) = TenantRepo::create_with_admin(
        &state.pool,
        &input.tenant,
        admin.username.trim(),
        admin.email.trim(),
        &password_hash,
    )
    .await?;

    tracing::info!(tenant_id = tenant.id, slug = %tenant.slug, "Tenant created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse {
            data: BootstrapTenantResponse { tenant, admin },
        }),
    ))
}

/// GET /api/v1/tenant
pub async fn get_current(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let tenant = TenantRepo::find_by_id(&state.pool, auth.tenant_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tenant",
            id: auth.tenant_id,
        }))?;
    Ok(Json(DataResponse { data: tenant }))
}

/// PUT /api/v1/tenant
///
/// Update store settings: open/closed, enabled order types, minimum order
/// and estimated delivery time. The slug is immutable.
pub async fn update_current(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<UpdateTenant>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_tenant_name(name).map_err(CoreError::Validation)?;
    }
    if matches!(input.min_order_cents, Some(m) if m < 0) {
        return Err(AppError::Core(CoreError::Validation(
            "min_order_cents cannot be negative".into(),
        )));
    }
    if matches!(input.estimated_delivery_mins, Some(m) if m <= 0) {
        return Err(AppError::Core(CoreError::Validation(
            "estimated_delivery_mins must be greater than zero".into(),
        )));
    }

    let tenant = TenantRepo::update(&state.pool, auth.tenant_id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Tenant",
            id: auth.tenant_id,
        }))?;

    tracing::info!(
        tenant_id = tenant.id,
        user_id = auth.user_id,
        is_open = tenant.is_open,
        "Tenant settings updated"
    );

    Ok(Json(DataResponse { data: tenant }))
}
