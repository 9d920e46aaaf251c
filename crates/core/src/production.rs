//! Validation rules for production records.

/// Earliest reporting year accepted by the registry.
pub const MIN_REPORT_YEAR: i32 = 1990;

/// Latest reporting year accepted (generous headroom over "now" so that
/// pre-entered projections do not bounce).
pub const MAX_REPORT_YEAR: i32 = 2100;

/// Maximum length of the free-text remarks field.
pub const MAX_REMARKS_LEN: usize = 2000;

/// Validate a reporting year.
pub fn validate_year(year: i32) -> Result<(), String> {
    if !(MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(&year) {
        return Err(format!(
            "Year must be between {MIN_REPORT_YEAR} and {MAX_REPORT_YEAR}"
        ));
    }
    Ok(())
}

/// Validate a reporting month (1-12).
pub fn validate_month(month: i32) -> Result<(), String> {
    if !(1..=12).contains(&month) {
        return Err("Month must be between 1 and 12".to_string());
    }
    Ok(())
}

/// Validate a produced quantity. Zero is allowed (a nil return is a valid
/// monthly report); negatives are not.
pub fn validate_quantity(quantity: f64) -> Result<(), String> {
    if !quantity.is_finite() || quantity < 0.0 {
        return Err("Quantity must be a non-negative number".to_string());
    }
    Ok(())
}

/// Validate the optional remarks field.
pub fn validate_remarks(remarks: &str) -> Result<(), String> {
    if remarks.len() > MAX_REMARKS_LEN {
        return Err(format!(
            "Remarks must be at most {MAX_REMARKS_LEN} characters"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_bounds() {
        assert!(validate_year(2024).is_ok());
        assert!(validate_year(MIN_REPORT_YEAR).is_ok());
        assert!(validate_year(MAX_REPORT_YEAR).is_ok());
        assert!(validate_year(1989).is_err());
        assert!(validate_year(2101).is_err());
    }

    #[test]
    fn test_month_bounds() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn test_quantity() {
        assert!(validate_quantity(0.0).is_ok());
        assert!(validate_quantity(1250.5).is_ok());
        assert!(validate_quantity(-1.0).is_err());
        assert!(validate_quantity(f64::NAN).is_err());
        assert!(validate_quantity(f64::INFINITY).is_err());
    }

    #[test]
    fn test_remarks_length() {
        assert!(validate_remarks("harvest delayed by flooding").is_ok());
        assert!(validate_remarks(&"x".repeat(MAX_REMARKS_LEN)).is_ok());
        assert!(validate_remarks(&"x".repeat(MAX_REMARKS_LEN + 1)).is_err());
    }
}
