//! Validation rules for livestock stock counts.

/// Hard cap on a single premise's headcount per sex. A count above this is
/// a data-entry error, not a farm.
pub const MAX_HEADCOUNT: i64 = 10_000_000;

/// Validate a headcount figure (male or female column).
pub fn validate_headcount(label: &str, count: i64) -> Result<(), String> {
    if count < 0 {
        return Err(format!("{label} headcount must be non-negative"));
    }
    if count > MAX_HEADCOUNT {
        return Err(format!("{label} headcount must not exceed {MAX_HEADCOUNT}"));
    }
    Ok(())
}
