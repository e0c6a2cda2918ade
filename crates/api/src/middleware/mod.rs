//! Request extractors for tenancy, authentication and authorization.
//!
//! - [`tenant::PublicTenant`] -- Resolves the `x-tenant` slug for public routes.
//! - [`auth::AuthUser`] -- Authenticated staff user; checks the token's tenant.
//! - [`rbac::RequireManager`] -- Requires `manager` or `admin` role.
//! - [`rbac::RequireAdmin`] -- Requires the `admin` role.

pub mod auth;
pub mod rbac;
pub mod tenant;
