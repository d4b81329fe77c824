//! Common validation utilities.

use validator::ValidationError;

lazy_static::lazy_static! {
    /// Loose E.164 shape: optional leading `+`, 7 to 15 digits.
    static ref PHONE_REGEX: regex::Regex = regex::Regex::new(r"^\+?[0-9]{7,15}$").unwrap();
    static ref CURRENCY_REGEX: regex::Regex = regex::Regex::new(r"^[A-Z]{3}$").unwrap();
    static ref TAX_ID_LAST4_REGEX: regex::Regex = regex::Regex::new(r"^[0-9]{4}$").unwrap();
    static ref SLUG_REGEX: regex::Regex =
        regex::Regex::new(r"^[a-z0-9](?:[a-z0-9-]*[a-z0-9])?$").unwrap();
}

/// Smallest donation accepted, in cents.
pub const MIN_DONATION_CENTS: i64 = 100;

/// Validates a phone number in loose E.164 form (`+15551234567`).
///
/// Spaces, dashes and parentheses are ignored.
pub fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let normalized: String = phone
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect();

    if PHONE_REGEX.is_match(&normalized) {
        Ok(())
    } else {
        let mut err = ValidationError::new("phone_format");
        err.message = Some("Phone number must contain 7 to 15 digits".into());
        Err(err)
    }
}

/// Validates an ISO 4217 currency code (three uppercase letters).
pub fn validate_currency(code: &str) -> Result<(), ValidationError> {
    if CURRENCY_REGEX.is_match(code) {
        Ok(())
    } else {
        let mut err = ValidationError::new("currency_format");
        err.message = Some("Currency must be a three-letter ISO code".into());
        Err(err)
    }
}

/// Validates the last four digits of a taxpayer id.
pub fn validate_tax_id_last4(value: &str) -> Result<(), ValidationError> {
    if TAX_ID_LAST4_REGEX.is_match(value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("tax_id_format");
        err.message = Some("Tax id must be exactly 4 digits".into());
        Err(err)
    }
}

/// Validates a URL slug (lowercase alphanumerics separated by dashes).
pub fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if SLUG_REGEX.is_match(slug) {
        Ok(())
    } else {
        let mut err = ValidationError::new("slug_format");
        err.message = Some("Slug may only contain lowercase letters, digits and dashes".into());
        Err(err)
    }
}

/// Validates that a donation amount meets the minimum.
pub fn validate_donation_amount(amount_cents: i64) -> Result<(), ValidationError> {
    if amount_cents >= MIN_DONATION_CENTS {
        Ok(())
    } else {
        let mut err = ValidationError::new("amount_range");
        err.message = Some("Donation amount must be at least 1.00".into());
        Err(err)
    }
}

/// Validates that a counter or monetary total is non-negative.
pub fn validate_non_negative(value: i64) -> Result<(), ValidationError> {
    if value >= 0 {
        Ok(())
    } else {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("Value must be non-negative".into());
        Err(err)
    }
}
