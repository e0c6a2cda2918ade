//! Tenant (restaurant account) validation.

use std::sync::LazyLock;

use regex::Regex;

/// Lowercase letters, digits and single hyphens; no leading/trailing hyphen.
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").expect("valid regex"));

pub const MIN_SLUG_LEN: usize = 2;
pub const MAX_SLUG_LEN: usize = 60;

/// Validate a tenant slug as used in the `x-tenant` header.
pub fn validate_slug(slug: &str) -> Result<(), String> {
    if slug.len() < MIN_SLUG_LEN || slug.len() > MAX_SLUG_LEN {
        return Err(format!(
            "Slug must be between {MIN_SLUG_LEN} and {MAX_SLUG_LEN} characters"
        ));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(
            "Slug may only contain lowercase letters, digits and single hyphens".to_string(),
        );
    }
    Ok(())
}

/// Validate a tenant display name.
pub fn validate_tenant_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Tenant name is required".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_slugs() {
        assert!(validate_slug("pizzaria-do-ze").is_ok());
        assert!(validate_slug("bar42").is_ok());
    }

    #[test]
    fn slug_rejects_uppercase_and_spaces() {
        assert!(validate_slug("Pizzaria").is_err());
        assert!(validate_slug("pizza ria").is_err());
    }

    #[test]
    fn slug_rejects_edge_hyphens() {
        assert!(validate_slug("-pizza").is_err());
        assert!(validate_slug("pizza-").is_err());
        assert!(validate_slug("pizza--ria").is_err());
    }

    #[test]
    fn slug_length_bounds() {
        assert!(validate_slug("a").is_err());
        assert!(validate_slug(&"a".repeat(61)).is_err());
    }

    #[test]
    fn blank_name_rejected() {
        assert!(validate_tenant_name("   ").is_err());
        assert!(validate_tenant_name("Cantina").is_ok());
    }
}
