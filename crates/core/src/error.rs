//! Domain error shared by the db and api crates.

use crate::types::DbId;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A tenant-scoped row that does not exist, or belongs to another tenant.
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input breaks a catalog, checkout or workflow rule.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The row changed underneath the request (order status, stock level).
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Stored data the domain cannot interpret, such as an unknown status.
    #[error("Internal error: {0}")]
    Internal(String),
}
