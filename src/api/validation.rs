//! Client-side input validation.
//!
//! These checks run before a request is built; a failure means nothing is
//! sent to the backend.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Indian mobile number as accepted by the cook registration form
    static ref COOK_PHONE_REGEX: Regex = Regex::new(r"^[6-9]\d{9}$").unwrap();

    /// Loose email shape check; the backend does the authoritative one
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[^\s@]+@[^\s@]+\.[^\s@]+$"
    ).unwrap();
}

/// Minimum price a cook may list, in rupees
pub const MIN_PRICE: u32 = 50;

/// Reduce a phone number to its digits and keep at most the last ten.
///
/// `"+91 98765 43210"` becomes `"9876543210"`. Shorter inputs keep all of
/// their digits.
pub fn normalize_phone(input: &str) -> String {
    let digits: Vec<char> = input.chars().filter(|c| c.is_ascii_digit()).collect();
    let start = digits.len().saturating_sub(10);
    digits[start..].iter().collect()
}

/// Validate a cook's contact number
pub fn validate_cook_phone(phone: &str) -> Result<(), String> {
    if !COOK_PHONE_REGEX.is_match(phone) {
        return Err("Enter a valid 10-digit phone number".to_string());
    }
    Ok(())
}

pub fn validate_price(price: u32) -> Result<(), String> {
    if price < MIN_PRICE {
        return Err(format!("Price must be at least ₹{}", MIN_PRICE));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    let email = email.trim();
    if email.is_empty() {
        return Err("Email is required".to_string());
    }
    if email.len() > 254 {
        return Err("Email is too long (max 254 characters)".to_string());
    }
    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email address".to_string());
    }
    Ok(())
}

/// Reject empty or whitespace-only values for a named field
pub fn validate_required(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    Ok(())
}
