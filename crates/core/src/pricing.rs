//! Validation rules for retail price survey records.

/// Maximum accepted price per unit. Guards against fat-finger entries
/// (a survey price is per kg / per unit, not a lot total).
pub const MAX_PRICE: f64 = 1_000_000.0;

/// Maximum length of the market name field.
pub const MAX_MARKET_NAME_LEN: usize = 200;

/// Validate a surveyed price: strictly positive and within the sanity cap.
pub fn validate_price(price: f64) -> Result<(), String> {
    if !price.is_finite() || price <= 0.0 {
        return Err("Price must be a positive number".to_string());
    }
    if price > MAX_PRICE {
        return Err(format!("Price must not exceed {MAX_PRICE}"));
    }
    Ok(())
}

/// Validate the market name: non-empty, bounded length.
pub fn validate_market_name(name: &str) -> Result<(), String> {
    if name.trim().is_empty() {
        return Err("Market name is required".to_string());
    }
    if name.len() > MAX_MARKET_NAME_LEN {
        return Err(format!(
            "Market name must be at most {MAX_MARKET_NAME_LEN} characters"
        ));
    }
    Ok(())
}

/// Validate the unit label (e.g. "kg", "ekor", "dozen"): non-empty, short.
pub fn validate_unit(unit: &str) -> Result<(), String> {
    if unit.trim().is_empty() {
        return Err("Unit is required".to_string());
    }
    if unit.len() > 20 {
        return Err("Unit must be at most 20 characters".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_bounds() {
        assert!(validate_price(12.50).is_ok());
        assert!(validate_price(0.0).is_err());
        assert!(validate_price(-4.0).is_err());
        assert!(validate_price(f64::NAN).is_err());
        assert!(validate_price(MAX_PRICE + 1.0).is_err());
    }

    #[test]
    fn test_market_name() {
        assert!(validate_market_name("Pasar Besar Kuantan").is_ok());
        assert!(validate_market_name("").is_err());
        assert!(validate_market_name(&"m".repeat(MAX_MARKET_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn test_unit() {
        assert!(validate_unit("kg").is_ok());
        assert!(validate_unit("").is_err());
        assert!(validate_unit(&"u".repeat(21)).is_err());
    }
}
