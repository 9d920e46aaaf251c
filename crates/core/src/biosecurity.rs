//! Validation rules and status names for biosecurity non-compliance cases.

/// Case lifecycle statuses.
pub const STATUS_OPEN: &str = "open";
pub const STATUS_COMPOUNDED: &str = "compounded";
pub const STATUS_CLOSED: &str = "closed";

/// All known case statuses.
pub const KNOWN_STATUSES: &[&str] = &[STATUS_OPEN, STATUS_COMPOUNDED, STATUS_CLOSED];

/// Maximum length of the findings and action-taken text fields.
pub const MAX_TEXT_LEN: usize = 4000;

/// Validate a case status name.
pub fn validate_status(status: &str) -> Result<(), String> {
    if KNOWN_STATUSES.contains(&status) {
        Ok(())
    } else {
        Err(format!(
            "Unknown case status '{status}'. Known statuses: {}",
            KNOWN_STATUSES.join(", ")
        ))
    }
}

/// Validate a case number: non-empty, at most 50 characters.
pub fn validate_case_no(case_no: &str) -> Result<(), String> {
    if case_no.trim().is_empty() {
        return Err("Case number is required".to_string());
    }
    if case_no.len() > 50 {
        return Err("Case number must be at most 50 characters".to_string());
    }
    Ok(())
}

/// Validate a free-text field (findings, action taken).
pub fn validate_text(label: &str, text: &str) -> Result<(), String> {
    if text.len() > MAX_TEXT_LEN {
        return Err(format!("{label} must be at most {MAX_TEXT_LEN} characters"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names() {
        assert!(validate_status("open").is_ok());
        assert!(validate_status("compounded").is_ok());
        assert!(validate_status("closed").is_ok());
        assert!(validate_status("pending").is_err());
    }

    #[test]
    fn test_case_no() {
        assert!(validate_case_no("BIO/2024/0031").is_ok());
        assert!(validate_case_no("").is_err());
        assert!(validate_case_no("   ").is_err());
        assert!(validate_case_no(&"9".repeat(51)).is_err());
    }

    #[test]
    fn test_text_length() {
        assert!(validate_text("Findings", "unlicensed movement of poultry").is_ok());
        let err = validate_text("Findings", &"x".repeat(MAX_TEXT_LEN + 1)).unwrap_err();
        assert!(err.starts_with("Findings"));
    }
}
