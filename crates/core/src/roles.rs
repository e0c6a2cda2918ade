//! Well-known staff role names.
//!
//! These must match the values stored in the `users.role` column.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_MANAGER: &str = "manager";
pub const ROLE_STAFF: &str = "staff";

/// All valid role values.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_MANAGER, ROLE_STAFF];

/// Validate that a role string is one of the accepted values.
pub fn validate_role(role: &str) -> Result<(), String> {
    if VALID_ROLES.contains(&role) {
        Ok(())
    } else {
        Err(format!(
            "Invalid role '{role}'. Must be one of: {}",
            VALID_ROLES.join(", ")
        ))
    }
}

/// Whether the role may manage catalog and tenant settings.
pub fn is_manager_or_above(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_MANAGER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_roles_accepted() {
        for role in VALID_ROLES {
            assert!(validate_role(role).is_ok());
        }
    }

    #[test]
    fn unknown_role_rejected() {
        let err = validate_role("owner").unwrap_err();
        assert!(err.contains("Invalid role"));
    }

    #[test]
    fn staff_is_not_manager() {
        assert!(is_manager_or_above(ROLE_ADMIN));
        assert!(is_manager_or_above(ROLE_MANAGER));
        assert!(!is_manager_or_above(ROLE_STAFF));
    }
}
