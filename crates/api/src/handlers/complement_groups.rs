//! Handlers for `/complement-groups` and the complements inside them.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use comanda_core::catalog::validate_name;
use comanda_core::complements::{validate_bounds, validate_complement_price, SelectionBounds};
use comanda_core::error::CoreError;
use comanda_core::types::DbId;
use comanda_db::models::complement::{
    ComplementGroupWithItems, CreateComplementGroup, NewComplement, UpdateComplement,
    UpdateComplementGroup,
};
use comanda_db::repositories::ComplementRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

const GROUP: &str = "ComplementGroup";
const COMPLEMENT: &str = "Complement";

// ---------------------------------------------------------------------------
// Groups
// ---------------------------------------------------------------------------

/// GET /api/v1/complement-groups
///
/// Groups with their complements.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let groups =
        ComplementRepo::list_groups(&state.pool, auth.tenant_id, params.include_inactive).await?;
    Ok(Json(DataResponse { data: groups }))
}

/// GET /api/v1/complement-groups/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let group = find_group(&state, auth.tenant_id, id).await?;
    Ok(Json(DataResponse { data: group }))
}

/// POST /api/v1/complement-groups
///
/// Creates the group and any inline complements in one transaction.
pub async fn create(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateComplementGroup>,
) -> AppResult<impl IntoResponse> {
    validate_name("Complement group", &input.name).map_err(CoreError::Validation)?;
    validate_bounds(&input.bounds()).map_err(CoreError::Validation)?;
    for complement in &input.complements {
        validate_new_complement(complement)?;
    }

    let group = ComplementRepo::create_group(&state.pool, auth.tenant_id, &input).await?;
    tracing::info!(
        tenant_id = auth.tenant_id,
        group_id = group.group.id,
        complements = group.complements.len(),
        "Complement group created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: group })))
}

/// PUT /api/v1/complement-groups/{id}
///
/// Bounds are validated after merging the update with the stored values.
pub async fn update(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateComplementGroup>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name("Complement group", name).map_err(CoreError::Validation)?;
    }
    let current = find_group(&state, auth.tenant_id, id).await?.group;
    let merged = SelectionBounds {
        min_select: input.min_select.unwrap_or(current.min_select),
        max_select: input.max_select.unwrap_or(current.max_select),
        is_required: input.is_required.unwrap_or(current.is_required),
    };
    validate_bounds(&merged).map_err(CoreError::Validation)?;

    let group = ComplementRepo::update_group(&state.pool, auth.tenant_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: GROUP, id }))?;
    Ok(Json(DataResponse { data: group }))
}

/// DELETE /api/v1/complement-groups/{id}
pub async fn deactivate(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ComplementRepo::deactivate_group(&state.pool, auth.tenant_id, id).await? {
        tracing::info!(tenant_id = auth.tenant_id, group_id = id, "Complement group deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: GROUP, id }))
    }
}

// ---------------------------------------------------------------------------
// Complements
// ---------------------------------------------------------------------------

/// POST /api/v1/complement-groups/{id}/complements
pub async fn add_complement(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(group_id): Path<DbId>,
    Json(input): Json<NewComplement>,
) -> AppResult<impl IntoResponse> {
    validate_new_complement(&input)?;
    find_group(&state, auth.tenant_id, group_id).await?;

    let complement =
        ComplementRepo::add_complement(&state.pool, auth.tenant_id, group_id, &input).await?;
    tracing::info!(
        tenant_id = auth.tenant_id,
        group_id,
        complement_id = complement.id,
        "Complement added"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: complement })))
}

/// PUT /api/v1/complement-groups/{id}/complements/{complement_id}
pub async fn update_complement(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path((group_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateComplement>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name(COMPLEMENT, name).map_err(CoreError::Validation)?;
    }
    if let Some(price) = input.price_cents {
        validate_complement_price(price).map_err(CoreError::Validation)?;
    }
    let complement =
        ComplementRepo::update_complement(&state.pool, auth.tenant_id, group_id, id, &input)
            .await?
            .ok_or(AppError::Core(CoreError::NotFound {
                entity: COMPLEMENT,
                id,
            }))?;
    Ok(Json(DataResponse { data: complement }))
}

/// DELETE /api/v1/complement-groups/{id}/complements/{complement_id}
pub async fn deactivate_complement(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path((group_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if ComplementRepo::deactivate_complement(&state.pool, auth.tenant_id, group_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: COMPLEMENT,
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn find_group(
    state: &AppState,
    tenant_id: DbId,
    id: DbId,
) -> AppResult<ComplementGroupWithItems> {
    ComplementRepo::find_group(&state.pool, tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: GROUP, id }))
}

fn validate_new_complement(input: &NewComplement) -> AppResult<()> {
    validate_name(COMPLEMENT, &input.name).map_err(CoreError::Validation)?;
    validate_complement_price(input.price_cents.unwrap_or(0)).map_err(CoreError::Validation)?;
    Ok(())
}
