use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use comanda_core::error::CoreError;
use serde_json::json;

/// Error type returned by every handler.
///
/// Renders as `{ "error": <message>, "code": <CODE> }`. Internal details
/// (SQL, constraint internals) are logged, never sent to clients.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed request outside domain validation (missing header, etc.).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Lookup by something other than a numeric id (tenant slug, tracking
    /// code, unknown route).
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

type Rendered = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Core(core) => render_core(core),
            AppError::Database(err) => render_sqlx(&err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal()
            }
        };

        (status, axum::Json(json!({ "error": message, "code": code }))).into_response()
    }
}

fn internal() -> Rendered {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

fn render_core(err: CoreError) -> Rendered {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal()
        }
    }
}

/// Map sqlx errors.
///
/// - `RowNotFound` is 404.
/// - A unique violation on a `uq_*` constraint is 409, with a readable
///   message for the constraints clients can actually hit.
/// - A foreign key violation is 400: the body referenced a missing row.
/// - Anything else is a logged 500.
fn render_sqlx(err: &sqlx::Error) -> Rendered {
    let sqlx::Error::Database(db_err) = err else {
        if matches!(err, sqlx::Error::RowNotFound) {
            return (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Resource not found".to_string(),
            );
        }
        tracing::error!(error = %err, "Database error");
        return internal();
    };

    let constraint = db_err.constraint().unwrap_or_default();
    match db_err.code().as_deref() {
        Some("23505") if constraint.starts_with("uq_") => (
            StatusCode::CONFLICT,
            "CONFLICT",
            duplicate_message(constraint),
        ),
        Some("23503") => (
            StatusCode::BAD_REQUEST,
            "BAD_REQUEST",
            format!("Referenced record does not exist: {constraint}"),
        ),
        _ => {
            tracing::error!(error = %db_err, constraint, "Database error");
            internal()
        }
    }
}

fn duplicate_message(constraint: &str) -> String {
    match constraint {
        "uq_tenants_slug" => "Tenant slug is already taken".to_string(),
        "uq_users_tenant_username" => "Username is already in use".to_string(),
        "uq_units_tenant_symbol" => "A unit with this symbol already exists".to_string(),
        "uq_products_tenant_code" => "A product with this code already exists".to_string(),
        "uq_cities_tenant_name_state" => "This city is already registered".to_string(),
        "uq_neighborhoods_city_name" => {
            "This neighborhood already exists in the city".to_string()
        }
        "uq_coupons_tenant_code" => "A coupon with this code already exists".to_string(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_constraints_get_readable_messages() {
        assert_eq!(
            duplicate_message("uq_coupons_tenant_code"),
            "A coupon with this code already exists"
        );
        assert_eq!(
            duplicate_message("uq_orders_tracking_code"),
            "Duplicate value violates unique constraint: uq_orders_tracking_code"
        );
    }
}
