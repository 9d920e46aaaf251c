//! Validation rules and status names for the registered-product catalogue.

/// Product registration statuses.
pub const STATUS_ACTIVE: &str = "active";
pub const STATUS_SUSPENDED: &str = "suspended";
pub const STATUS_REVOKED: &str = "revoked";

/// All known product statuses.
pub const KNOWN_STATUSES: &[&str] = &[STATUS_ACTIVE, STATUS_SUSPENDED, STATUS_REVOKED];

/// Maximum length for name / brand / manufacturer / category fields.
pub const MAX_FIELD_LEN: usize = 255;

/// Validate a product registration status.
pub fn validate_status(status: &str) -> Result<(), String> {
    if KNOWN_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Unknown product status '{status}'. Known statuses: {}",
            KNOWN_STATUSES.join(", ")
        ))
    }
}

/// Validate a required short text field.
pub fn validate_required_field(label: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{label} is required"));
    }
    if value.len() > MAX_FIELD_LEN {
        return Err(format!("{label} must be at most {MAX_FIELD_LEN} characters"));
    }
    Ok(())
}

/// Validate a registration number: non-empty, at most 50 characters.
pub fn validate_registration_no(registration_no: &str) -> Result<(), String> {
    if registration_no.trim().is_empty() {
        return Err("Registration number is required".to_string());
    }
    if registration_no.len() > 50 {
        return Err("Registration number must be at most 50 characters".to_string());
    }
    Ok(())
}
