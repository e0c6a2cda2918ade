//! Handlers for `/categories`.
//!
//! Categories form a tree at most three levels deep. Every write that sets
//! a parent is checked against the stored hierarchy so cycles cannot form.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use comanda_core::catalog::validate_name;
use comanda_core::category::{build_tree, subtree_height, validate_parent};
use comanda_core::error::CoreError;
use comanda_core::types::DbId;
use comanda_db::models::category::{CreateCategory, UpdateCategory};
use comanda_db::models::SortOrderEntry;
use comanda_db::repositories::CategoryRepo;

use super::{ensure_production_location, ReorderResult};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::query::IncludeInactiveParams;
use crate::response::DataResponse;
use crate::state::AppState;

const ENTITY: &str = "Category";

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/categories
///
/// Flat list ordered by `sort_order`, then name.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let categories =
        CategoryRepo::list(&state.pool, auth.tenant_id, params.include_inactive).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// GET /api/v1/categories/tree
///
/// Nested view; each node carries its `children`.
pub async fn tree(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<IncludeInactiveParams>,
) -> AppResult<impl IntoResponse> {
    let categories =
        CategoryRepo::list(&state.pool, auth.tenant_id, params.include_inactive).await?;
    Ok(Json(DataResponse {
        data: build_tree(categories),
    }))
}

/// GET /api/v1/categories/{id}
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let category = CategoryRepo::find_by_id(&state.pool, auth.tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    Ok(Json(DataResponse { data: category }))
}

/// POST /api/v1/categories
pub async fn create(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Json(input): Json<CreateCategory>,
) -> AppResult<impl IntoResponse> {
    validate_name(ENTITY, &input.name).map_err(CoreError::Validation)?;
    check_parent(&state, auth.tenant_id, None, input.parent_id).await?;
    ensure_production_location(&state, auth.tenant_id, input.production_location_id).await?;

    let category = CategoryRepo::create(&state.pool, auth.tenant_id, &input).await?;
    tracing::info!(
        tenant_id = auth.tenant_id,
        category_id = category.id,
        parent_id = ?category.parent_id,
        "Category created"
    );
    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// PUT /api/v1/categories/{id}
///
/// `parent_id: null` moves the category to the root; an absent field keeps
/// the current parent.
pub async fn update(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<impl IntoResponse> {
    if let Some(name) = &input.name {
        validate_name(ENTITY, name).map_err(CoreError::Validation)?;
    }
    if CategoryRepo::find_by_id(&state.pool, auth.tenant_id, id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }));
    }
    if let Some(parent_id) = input.parent_id {
        check_parent(&state, auth.tenant_id, Some(id), parent_id).await?;
    }
    if let Some(location) = input.production_location_id {
        ensure_production_location(&state, auth.tenant_id, location).await?;
    }

    let category = CategoryRepo::update(&state.pool, auth.tenant_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    tracing::info!(tenant_id = auth.tenant_id, category_id = id, "Category updated");
    Ok(Json(DataResponse { data: category }))
}

/// DELETE /api/v1/categories/{id}
///
/// Soft-deactivates the category. Its products and children stay linked.
pub async fn deactivate(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if CategoryRepo::deactivate(&state.pool, auth.tenant_id, id).await? {
        tracing::info!(tenant_id = auth.tenant_id, category_id = id, "Category deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
    }
}

/// PUT /api/v1/categories/reorder
///
/// Body: `[{ "id": 1, "sort_order": 0 }, ...]`, applied in one transaction.
pub async fn reorder(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Json(entries): Json<Vec<SortOrderEntry>>,
) -> AppResult<impl IntoResponse> {
    let updated = CategoryRepo::reorder(&state.pool, auth.tenant_id, &entries).await?;
    Ok(Json(DataResponse {
        data: ReorderResult { updated },
    }))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Validate moving `category_id` (or a new category) under `parent_id`.
async fn check_parent(
    state: &AppState,
    tenant_id: DbId,
    category_id: Option<DbId>,
    parent_id: Option<DbId>,
) -> AppResult<()> {
    let parent_chain: Vec<DbId> = match parent_id {
        Some(parent) => {
            let chain = CategoryRepo::ancestor_chain(&state.pool, tenant_id, parent).await?;
            if chain.is_empty() {
                return Err(AppError::Core(CoreError::Validation(format!(
                    "Parent category {parent} not found"
                ))));
            }
            chain.into_iter().map(|(id, _)| id).collect()
        }
        None => Vec::new(),
    };

    let height = match category_id {
        Some(id) => {
            let edges = CategoryRepo::edges(&state.pool, tenant_id).await?;
            subtree_height(id, &edges)
        }
        None => 1,
    };

    validate_parent(category_id, parent_id, &parent_chain, height).map_err(CoreError::Validation)?;
    Ok(())
}
