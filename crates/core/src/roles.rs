//! Role names and ordering for the registry's access model.
//!
//! Three roles exist: `admin` (full access, including activity-log queries
//! and reference-data writes), `officer` (domain-entity CRUD), and `viewer`
//! (read-only). Roles are stored as plain text on the user row.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_OFFICER: &str = "officer";
pub const ROLE_VIEWER: &str = "viewer";

/// All known role names.
pub const KNOWN_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_OFFICER, ROLE_VIEWER];

/// Returns `true` if `role` is one of the known role names.
pub fn is_valid_role(role: &str) -> bool {
    KNOWN_ROLES.contains(&role)
}

/// Returns `true` if `role` may perform domain-entity mutations.
pub fn can_mutate(role: &str) -> bool {
    role == ROLE_ADMIN || role == ROLE_OFFICER
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_roles() {
        assert!(is_valid_role("admin"));
        assert!(is_valid_role("officer"));
        assert!(is_valid_role("viewer"));
        assert!(!is_valid_role("superuser"));
        assert!(!is_valid_role(""));
    }

    #[test]
    fn test_mutation_rights() {
        assert!(can_mutate(ROLE_ADMIN));
        assert!(can_mutate(ROLE_OFFICER));
        assert!(!can_mutate(ROLE_VIEWER));
    }
}
