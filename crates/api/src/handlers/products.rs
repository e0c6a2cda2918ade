//! Handlers for `/products` and their nested collections.
//!
//! A product owns three link collections: complement groups, flavors
//! (other products of the same tenant) and technical sheet lines. Every id
//! in those collections is checked against the caller's tenant before the
//! repository writes anything.

use std::collections::BTreeSet;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use comanda_core::catalog::{
    validate_code, validate_flavor_links, validate_flavor_pricing, validate_max_flavors,
    validate_name, validate_price,
};
use comanda_core::complements::validate_group_links;
use comanda_core::error::CoreError;
use comanda_core::pagination::{SortDirection, SortSpec};
use comanda_core::technical_sheet::{cost_summary, validate_lines, validate_yield, SheetLine};
use comanda_core::types::DbId;
use comanda_db::models::product::{
    CreateProduct, ProductDetail, ProductFilter, TechnicalSheetEntry, UpdateProduct,
};
use comanda_db::models::SortOrderEntry;
use comanda_db::repositories::{CategoryRepo, ComplementRepo, IngredientRepo, ProductRepo};
use serde::Deserialize;

use super::{ensure_production_location, ensure_unit, ReorderResult};
use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireManager;
use crate::query::PaginationParams;
use crate::response::{DataResponse, PaginatedResponse};
use crate::state::AppState;

const ENTITY: &str = "Product";

/// Columns accepted by `?sort=`.
const SORTABLE: &[&str] = &["name", "code", "price_cents", "sort_order", "created_at"];

const DEFAULT_SORT: SortSpec = SortSpec {
    column: "sort_order",
    direction: SortDirection::Asc,
};

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Filters for `GET /products`, read next to [`PaginationParams`].
#[derive(Debug, Deserialize)]
pub struct ProductListParams {
    /// Case-insensitive match on name or code.
    pub search: Option<String>,
    pub category_id: Option<DbId>,
    pub is_active: Option<bool>,
}

/// Body of `PUT /products/{id}/complement-groups`.
#[derive(Debug, Deserialize)]
pub struct SetComplementGroups {
    pub complement_group_ids: Vec<DbId>,
}

/// Body of `PUT /products/{id}/flavors`.
#[derive(Debug, Deserialize)]
pub struct SetFlavors {
    pub flavor_ids: Vec<DbId>,
}

/// Body of `PUT /products/{id}/technical-sheet`.
#[derive(Debug, Deserialize)]
pub struct SetTechnicalSheet {
    pub lines: Vec<TechnicalSheetEntry>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/products
///
/// Paginated; filters `search`, `category_id`, `is_active`.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(pagination): Query<PaginationParams>,
    Query(params): Query<ProductListParams>,
) -> AppResult<impl IntoResponse> {
    let page = pagination.resolve(SORTABLE, DEFAULT_SORT)?;
    let filter = ProductFilter {
        search: params
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty()),
        category_id: params.category_id,
        is_active: params.is_active,
        sort: page.sort,
        limit: page.limit,
        offset: page.offset,
    };

    let products = ProductRepo::list(&state.pool, auth.tenant_id, &filter).await?;
    let total = ProductRepo::count(&state.pool, auth.tenant_id, &filter).await?;
    Ok(Json(PaginatedResponse::new(products, &page, total)))
}

/// GET /api/v1/products/{id}
///
/// The product with its complement groups, flavors and technical sheet.
pub async fn get_by_id(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let detail = find_detail(&state, auth.tenant_id, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// POST /api/v1/products
///
/// Creates the product and its whole nested graph in one transaction. A
/// code already used by the tenant is rejected with 400.
pub async fn create(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Json(mut input): Json<CreateProduct>,
) -> AppResult<impl IntoResponse> {
    input.code = input.code.trim().to_string();
    validate_code(&input.code).map_err(CoreError::Validation)?;
    validate_name(ENTITY, &input.name).map_err(CoreError::Validation)?;
    validate_price(input.price_cents).map_err(CoreError::Validation)?;
    validate_settings(
        input.max_flavors,
        input.flavor_pricing.as_deref(),
        input.yield_portions,
        input.stock_quantity,
    )?;
    validate_flavor_links(None, &input.flavor_ids).map_err(CoreError::Validation)?;
    validate_sheet(&input.technical_sheet)?;

    let tenant_id = auth.tenant_id;
    ensure_code_free(&state, tenant_id, &input.code, None).await?;
    ensure_category(&state, tenant_id, input.category_id).await?;
    ensure_production_location(&state, tenant_id, input.production_location_id).await?;
    ensure_unit(&state, tenant_id, input.unit_id).await?;
    ensure_groups(&state, tenant_id, &input.complement_group_ids).await?;
    ensure_flavors(&state, tenant_id, &input.flavor_ids).await?;
    ensure_ingredients(&state, tenant_id, &input.technical_sheet).await?;

    let product = ProductRepo::create(&state.pool, tenant_id, &input).await?;
    tracing::info!(
        tenant_id,
        product_id = product.id,
        code = %product.code,
        "Product created"
    );

    let detail = find_detail(&state, tenant_id, product.id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: detail })))
}

/// PUT /api/v1/products/{id}
///
/// Scalar fields left out keep their value. Each nested collection that is
/// present replaces the stored one; all of it in one transaction.
pub async fn update(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(mut input): Json<UpdateProduct>,
) -> AppResult<impl IntoResponse> {
    let tenant_id = auth.tenant_id;

    if let Some(code) = input.code.as_mut() {
        *code = code.trim().to_string();
        validate_code(code).map_err(CoreError::Validation)?;
    }
    if let Some(name) = &input.name {
        validate_name(ENTITY, name).map_err(CoreError::Validation)?;
    }
    if let Some(price) = input.price_cents {
        validate_price(price).map_err(CoreError::Validation)?;
    }
    validate_settings(
        input.max_flavors,
        input.flavor_pricing.as_deref(),
        input.yield_portions,
        input.stock_quantity,
    )?;
    if let Some(flavor_ids) = &input.flavor_ids {
        validate_flavor_links(Some(id), flavor_ids).map_err(CoreError::Validation)?;
    }
    if let Some(lines) = &input.technical_sheet {
        validate_sheet(lines)?;
    }

    if let Some(code) = &input.code {
        ensure_code_free(&state, tenant_id, code, Some(id)).await?;
    }
    if let Some(category_id) = input.category_id {
        ensure_category(&state, tenant_id, category_id).await?;
    }
    if let Some(location) = input.production_location_id {
        ensure_production_location(&state, tenant_id, location).await?;
    }
    if let Some(unit) = input.unit_id {
        ensure_unit(&state, tenant_id, unit).await?;
    }
    if let Some(ids) = &input.complement_group_ids {
        ensure_groups(&state, tenant_id, ids).await?;
    }
    if let Some(ids) = &input.flavor_ids {
        ensure_flavors(&state, tenant_id, ids).await?;
    }
    if let Some(lines) = &input.technical_sheet {
        ensure_ingredients(&state, tenant_id, lines).await?;
    }

    ProductRepo::update(&state.pool, tenant_id, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;
    tracing::info!(tenant_id, product_id = id, "Product updated");

    let detail = find_detail(&state, tenant_id, id).await?;
    Ok(Json(DataResponse { data: detail }))
}

/// PUT /api/v1/products/{id}/complement-groups
///
/// Replaces the linked groups; array order becomes display order.
pub async fn set_complement_groups(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetComplementGroups>,
) -> AppResult<impl IntoResponse> {
    let tenant_id = auth.tenant_id;
    ensure_groups(&state, tenant_id, &input.complement_group_ids).await?;

    if !ProductRepo::set_complement_groups(&state.pool, tenant_id, id, &input.complement_group_ids)
        .await?
    {
        return Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }));
    }
    let groups = ComplementRepo::groups_for_product(&state.pool, id, true).await?;
    Ok(Json(DataResponse { data: groups }))
}

/// PUT /api/v1/products/{id}/flavors
pub async fn set_flavors(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetFlavors>,
) -> AppResult<impl IntoResponse> {
    let tenant_id = auth.tenant_id;
    validate_flavor_links(Some(id), &input.flavor_ids).map_err(CoreError::Validation)?;
    ensure_flavors(&state, tenant_id, &input.flavor_ids).await?;

    if !ProductRepo::set_flavors(&state.pool, tenant_id, id, &input.flavor_ids).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }));
    }
    let flavors = ProductRepo::flavors(&state.pool, id).await?;
    Ok(Json(DataResponse { data: flavors }))
}

/// GET /api/v1/products/{id}/technical-sheet
pub async fn get_technical_sheet(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_product(&state, auth.tenant_id, id).await?;
    let lines = ProductRepo::technical_sheet(&state.pool, id).await?;
    Ok(Json(DataResponse { data: lines }))
}

/// PUT /api/v1/products/{id}/technical-sheet
pub async fn set_technical_sheet(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SetTechnicalSheet>,
) -> AppResult<impl IntoResponse> {
    let tenant_id = auth.tenant_id;
    validate_sheet(&input.lines)?;
    ensure_ingredients(&state, tenant_id, &input.lines).await?;

    if !ProductRepo::set_technical_sheet(&state.pool, tenant_id, id, &input.lines).await? {
        return Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }));
    }
    let lines = ProductRepo::technical_sheet(&state.pool, id).await?;
    Ok(Json(DataResponse { data: lines }))
}

/// GET /api/v1/products/{id}/cost
///
/// Technical-sheet costing: total batch cost, cost per portion and gross
/// margin against the current price.
pub async fn cost(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let product = ProductRepo::find_by_id(&state.pool, auth.tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))?;

    let lines: Vec<SheetLine> = ProductRepo::technical_sheet(&state.pool, id)
        .await?
        .into_iter()
        .map(|line| SheetLine {
            ingredient_id: line.ingredient_id,
            quantity: line.quantity,
            unit_cost_cents: line.cost_cents,
        })
        .collect();

    let summary = cost_summary(&lines, product.yield_portions, product.price_cents);
    Ok(Json(DataResponse { data: summary }))
}

/// DELETE /api/v1/products/{id}
pub async fn deactivate(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if ProductRepo::deactivate(&state.pool, auth.tenant_id, id).await? {
        tracing::info!(tenant_id = auth.tenant_id, product_id = id, "Product deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
    }
}

/// PUT /api/v1/products/reorder
pub async fn reorder(
    RequireManager(auth): RequireManager,
    State(state): State<AppState>,
    Json(entries): Json<Vec<SortOrderEntry>>,
) -> AppResult<impl IntoResponse> {
    let updated = ProductRepo::reorder(&state.pool, auth.tenant_id, &entries).await?;
    Ok(Json(DataResponse {
        data: ReorderResult { updated },
    }))
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn validate_settings(
    max_flavors: Option<i32>,
    flavor_pricing: Option<&str>,
    yield_portions: Option<i32>,
    stock_quantity: Option<i32>,
) -> AppResult<()> {
    if let Some(max) = max_flavors {
        validate_max_flavors(max).map_err(CoreError::Validation)?;
    }
    if let Some(mode) = flavor_pricing {
        validate_flavor_pricing(mode).map_err(CoreError::Validation)?;
    }
    if let Some(portions) = yield_portions {
        validate_yield(portions).map_err(CoreError::Validation)?;
    }
    if matches!(stock_quantity, Some(q) if q < 0) {
        return Err(AppError::Core(CoreError::Validation(
            "stock_quantity cannot be negative".into(),
        )));
    }
    Ok(())
}

fn validate_sheet(lines: &[TechnicalSheetEntry]) -> AppResult<()> {
    let pairs: Vec<(DbId, f64)> = lines.iter().map(|l| (l.ingredient_id, l.quantity)).collect();
    validate_lines(&pairs).map_err(CoreError::Validation)?;
    Ok(())
}

/// Number of distinct ids, for comparing against ownership counts.
fn distinct(ids: impl IntoIterator<Item = DbId>) -> Vec<DbId> {
    ids.into_iter().collect::<BTreeSet<_>>().into_iter().collect()
}

// ---------------------------------------------------------------------------
// Tenant ownership checks
// ---------------------------------------------------------------------------

async fn find_detail(state: &AppState, tenant_id: DbId, id: DbId) -> AppResult<ProductDetail> {
    ProductRepo::find_detail(&state.pool, tenant_id, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
}

async fn ensure_product(state: &AppState, tenant_id: DbId, id: DbId) -> AppResult<()> {
    ProductRepo::find_by_id(&state.pool, tenant_id, id)
        .await?
        .map(|_| ())
        .ok_or(AppError::Core(CoreError::NotFound { entity: ENTITY, id }))
}

async fn ensure_code_free(
    state: &AppState,
    tenant_id: DbId,
    code: &str,
    exclude_id: Option<DbId>,
) -> AppResult<()> {
    if ProductRepo::code_exists(&state.pool, tenant_id, code, exclude_id).await? {
        return Err(AppError::Core(CoreError::Validation(format!(
            "Product code '{code}' is already in use"
        ))));
    }
    Ok(())
}

async fn ensure_category(state: &AppState, tenant_id: DbId, id: Option<DbId>) -> AppResult<()> {
    if let Some(id) = id {
        if CategoryRepo::find_by_id(&state.pool, tenant_id, id)
            .await?
            .is_none()
        {
            return Err(AppError::Core(CoreError::Validation(format!(
                "Category {id} not found"
            ))));
        }
    }
    Ok(())
}

async fn ensure_groups(state: &AppState, tenant_id: DbId, ids: &[DbId]) -> AppResult<()> {
    validate_group_links(ids).map_err(CoreError::Validation)?;
    let ids = distinct(ids.iter().copied());
    if ids.len() as i64 != ComplementRepo::count_owned_groups(&state.pool, tenant_id, &ids).await? {
        return Err(AppError::Core(CoreError::Validation(
            "One or more complement groups were not found".into(),
        )));
    }
    Ok(())
}

async fn ensure_flavors(state: &AppState, tenant_id: DbId, ids: &[DbId]) -> AppResult<()> {
    let ids = distinct(ids.iter().copied());
    if ids.len() as i64 != ProductRepo::count_owned(&state.pool, tenant_id, &ids).await? {
        return Err(AppError::Core(CoreError::Validation(
            "One or more flavor products were not found".into(),
        )));
    }
    Ok(())
}

async fn ensure_ingredients(
    state: &AppState,
    tenant_id: DbId,
    lines: &[TechnicalSheetEntry],
) -> AppResult<()> {
    let ids = distinct(lines.iter().map(|l| l.ingredient_id));
    if ids.len() as i64 != IngredientRepo::count_owned(&state.pool, tenant_id, &ids).await? {
        return Err(AppError::Core(CoreError::Validation(
            "One or more ingredients were not found".into(),
        )));
    }
    Ok(())
}
