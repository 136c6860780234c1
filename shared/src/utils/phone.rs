//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Russian mobile number, trunk prefix 8 or country code +7
static RU_MOBILE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(8\d{10}|\+7\d{10})$").expect("static regex is valid")
});

/// Trim surrounding whitespace from a user-entered phone number
pub fn normalize_phone_number(phone: &str) -> String {
    phone.trim().to_string()
}

/// Check if a phone number is a valid Russian mobile number
///
/// Accepts `8XXXXXXXXXX` (11 digits) and `+7XXXXXXXXXX` (12 characters).
pub fn is_valid_ru_mobile(phone: &str) -> bool {
    RU_MOBILE_REGEX.is_match(&normalize_phone_number(phone))
}

/// Mask a phone number for display (e.g., +79****4567)
pub fn mask_phone_number(phone: &str) -> String {
    let chars: Vec<char> = normalize_phone_number(phone).chars().collect();
    if chars.len() >= 7 {
        let head: String = chars[..3].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{}****{}", head, tail)
    } else {
        "****".to_string()
    }
}
