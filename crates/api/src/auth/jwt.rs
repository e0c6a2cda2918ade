//! JWT access-token generation/validation and the auth cookie.
//!
//! Access tokens are HS256-signed JWTs containing a [`Claims`] payload. The
//! same token is returned in the login body and set as an HttpOnly cookie so
//! browser clients never have to store it themselves.

use comanda_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT claims embedded in every access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject -- the user's internal database id.
    pub sub: DbId,
    /// Tenant the user belongs to.
    pub tenant_id: DbId,
    /// Slug of that tenant; must match the `x-tenant` request header.
    pub tenant_slug: String,
    /// The user's role name (`"admin"`, `"manager"`, `"staff"`).
    pub role: String,
    /// Expiration time (UTC Unix timestamp).
    pub exp: i64,
    /// Issued-at time (UTC Unix timestamp).
    pub iat: i64,
    /// Unique token identifier (UUID v4).
    pub jti: String,
}

/// Configuration for JWT token generation and the auth cookie.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// HMAC-SHA256 secret used to sign and verify tokens.
    pub secret: String,
    /// Token lifetime in hours (default: 12).
    pub expiry_hours: i64,
    /// Name of the cookie carrying the token (default: `token`).
    pub cookie_name: String,
    /// Whether the cookie is marked `Secure` (default: false).
    pub cookie_secure: bool,
}

/// Default token expiry in hours.
const DEFAULT_EXPIRY_HOURS: i64 = 12;
/// Default auth cookie name.
const DEFAULT_COOKIE_NAME: &str = "token";

impl JwtConfig {
    /// Load JWT configuration from environment variables.
    ///
    /// | Env Var            | Required | Default |
    /// |--------------------|----------|---------|
    /// | `JWT_SECRET`       | **yes**  | --      |
    /// | `JWT_EXPIRY_HOURS` | no       | `12`    |
    /// | `AUTH_COOKIE_NAME` | no       | `token` |
    /// | `COOKIE_SECURE`    | no       | `false` |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is not set or is empty.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        let expiry_hours: i64 = std::env::var("JWT_EXPIRY_HOURS")
            .unwrap_or_else(|_| DEFAULT_EXPIRY_HOURS.to_string())
            .parse()
            .expect("JWT_EXPIRY_HOURS must be a valid i64");

        let cookie_name =
            std::env::var("AUTH_COOKIE_NAME").unwrap_or_else(|_| DEFAULT_COOKIE_NAME.into());

        let cookie_secure: bool = std::env::var("COOKIE_SECURE")
            .unwrap_or_else(|_| "false".into())
            .parse()
            .expect("COOKIE_SECURE must be true or false");

        Self {
            secret,
            expiry_hours,
            cookie_name,
            cookie_secure,
        }
    }

    /// Token lifetime in seconds.
    pub fn expires_in_secs(&self) -> i64 {
        self.expiry_hours * 3600
    }
}

/// Generate an HS256 access token for a user of `tenant_id`.
pub fn generate_access_token(
    user_id: DbId,
    tenant_id: DbId,
    tenant_slug: &str,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now().timestamp();

    let claims = Claims {
        sub: user_id,
        tenant_id,
        tenant_slug: tenant_slug.to_string(),
        role: role.to_string(),
        exp: now + config.expires_in_secs(),
        iat: now,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(), // HS256
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Validate and decode an access token, returning the embedded [`Claims`].
///
/// Validates the signature and expiration automatically.
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(), // HS256, validates exp
    )?;
    Ok(token_data.claims)
}

/// `Set-Cookie` value carrying a freshly issued token.
pub fn auth_cookie(token: &str, config: &JwtConfig) -> String {
    let secure = if config.cookie_secure { "; Secure" } else { "" };
    format!(
        "{}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={}{secure}",
        config.cookie_name,
        config.expires_in_secs()
    )
}

/// `Set-Cookie` value that removes the auth cookie.
pub fn clear_auth_cookie(config: &JwtConfig) -> String {
    let secure = if config.cookie_secure { "; Secure" } else { "" };
    format!(
        "{}=; HttpOnly; Path=/; SameSite=Lax; Max-Age=0{secure}",
        config.cookie_name
    )
}

/// Find a cookie by name in a `Cookie` request header value.
pub fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
        .filter(|value| !value.is_empty())
}
