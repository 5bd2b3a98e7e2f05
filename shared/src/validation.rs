//! Validation utilities for the Malawi Farm Advisory Platform
//!
//! Includes Malawi-specific phone number rules used at registration.

// ============================================================================
// Farm Validations
// ============================================================================

/// Upper bound on farm size, well above any smallholding
pub const MAX_FARM_SIZE_ACRES: f64 = 10_000.0;

/// Validate farm size in acres (must be positive)
pub fn validate_farm_size(acres: f64) -> Result<(), &'static str> {
    if !acres.is_finite() || acres <= 0.0 {
        return Err("Farm size must be greater than zero");
    }
    if acres > MAX_FARM_SIZE_ACRES {
        return Err("Farm size is too large");
    }
    Ok(())
}

/// Validate a calendar month (1-12)
pub fn validate_month(month: u32) -> Result<(), &'static str> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err("Month must be between 1 and 12")
    }
}

/// Validate growing period in days
pub fn validate_growing_period(days: i32) -> Result<(), &'static str> {
    if days <= 0 {
        return Err("Growing period must be positive");
    }
    Ok(())
}

// ============================================================================
// Account Validations
// ============================================================================

/// Validate username (3-150 chars, letters, digits and @/./+/-/_)
pub fn validate_username(username: &str) -> Result<(), &'static str> {
    if username.len() < 3 {
        return Err("Username must be at least 3 characters");
    }
    if username.len() > 150 {
        return Err("Username must be at most 150 characters");
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "@.+-_".contains(c))
    {
        return Err("Username may only contain letters, digits and @/./+/-/_");
    }
    Ok(())
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err("Password cannot be entirely numeric");
    }
    Ok(())
}

// ============================================================================
// Malawi-Specific Validations
// ============================================================================

/// Remove whitespace from a phone number as typed
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Validate Malawi phone number format
/// Accepts: 0991234567, 099 123 4567, +265991234567
///
/// After the `+265` or `0` prefix the number must start with 1 (landline),
/// 7, 8 or 9 (mobile networks) and be followed by exactly eight digits.
pub fn validate_malawi_phone(phone: &str) -> Result<(), &'static str> {
    let phone = normalize_phone(phone);

    let rest = phone
        .strip_prefix("+265")
        .or_else(|| phone.strip_prefix('0'))
        .ok_or("Phone number must start with +265 or 0")?;

    let mut chars = rest.chars();
    match chars.next() {
        Some('1' | '7' | '8' | '9') => {}
        _ => return Err("Invalid Malawi network prefix"),
    }

    let subscriber = chars.as_str();
    if subscriber.len() != 8 || !subscriber.chars().all(|c| c.is_ascii_digit()) {
        return Err("Invalid Malawi phone number format");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    // ========================================================================
    // Farm Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_farm_size() {
        assert!(validate_farm_size(2.5).is_ok());
        assert!(validate_farm_size(0.1).is_ok());
        assert!(validate_farm_size(0.0).is_err());
        assert!(validate_farm_size(-1.0).is_err());
        assert!(validate_farm_size(f64::NAN).is_err());
        assert!(validate_farm_size(20_000.0).is_err());
    }

    #[test]
    fn test_validate_month() {
        assert!(validate_month(1).is_ok());
        assert!(validate_month(12).is_ok());
        assert!(validate_month(0).is_err());
        assert!(validate_month(13).is_err());
    }

    #[test]
    fn test_validate_growing_period() {
        assert!(validate_growing_period(120).is_ok());
        assert!(validate_growing_period(0).is_err());
    }

    // ========================================================================
    // Account Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_username() {
        assert!(validate_username("banda_j").is_ok());
        assert!(validate_username("j.phiri@mw").is_ok());
        assert!(validate_username("ab").is_err());
        assert!(validate_username("has space").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("chimanga2024").is_ok());
        assert!(validate_password("short").is_err());
        assert!(validate_password("12345678").is_err());
    }

    // ========================================================================
    // Malawi Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_malawi_phone_valid() {
        assert!(validate_malawi_phone("0991234567").is_ok());
        assert!(validate_malawi_phone("0881234567").is_ok());
        assert!(validate_malawi_phone("+265991234567").is_ok());
        assert!(validate_malawi_phone("099 123 4567").is_ok());
        assert!(validate_malawi_phone("01234567").is_err());
        assert!(validate_malawi_phone("0111234567").is_ok());
    }

    #[test]
    fn test_validate_malawi_phone_invalid() {
        assert!(validate_malawi_phone("0591234567").is_err()); // bad network
        assert!(validate_malawi_phone("099123456").is_err()); // too short
        assert!(validate_malawi_phone("09912345678").is_err()); // too long
        assert!(validate_malawi_phone("+266991234567").is_err());
        assert!(validate_malawi_phone("0991234abc").is_err());
        assert!(validate_malawi_phone("").is_err());
    }

    proptest! {
        #[test]
        fn prop_local_and_international_forms_agree(network in prop::sample::select(vec!['1', '7', '8', '9']), rest in "[0-9]{8}") {
            let local = format!("0{network}{rest}");
            let intl = format!("+265{network}{rest}");
            prop_assert!(validate_malawi_phone(&local).is_ok());
            prop_assert!(validate_malawi_phone(&intl).is_ok());
        }

        #[test]
        fn prop_positive_sizes_are_valid(acres in 0.01f64..MAX_FARM_SIZE_ACRES) {
            prop_assert!(validate_farm_size(acres).is_ok());
        }
    }
}
