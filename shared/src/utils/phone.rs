//! Phone number utilities for Philippine mobile numbers

use once_cell::sync::Lazy;
use regex::Regex;

// Philippine mobile number in local form: 9XXXXXXXXX
static PH_MOBILE_LOCAL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^9\d{9}$").expect("valid regex")
});

// International phone number regex (E.164 format)
static INTERNATIONAL_PHONE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+[1-9]\d{1,14}$").expect("valid regex")
});

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Strip everything but digits, the format the backend expects
pub fn format_phone_for_api(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Reduce a Philippine mobile number to its 10-digit local part (9XXXXXXXXX)
///
/// Accepts `9XXXXXXXXX`, `09XXXXXXXXX`, `639XXXXXXXXX` and `+639XXXXXXXXX`.
fn ph_local_part(phone: &str) -> Option<String> {
    let digits = format_phone_for_api(phone);
    let local = if let Some(rest) = digits.strip_prefix("63") {
        rest
    } else if let Some(rest) = digits.strip_prefix('0') {
        rest
    } else {
        digits.as_str()
    };

    if PH_MOBILE_LOCAL_REGEX.is_match(local) {
        Some(local.to_string())
    } else {
        None
    }
}

/// Check if a phone number is a valid Philippine mobile number
pub fn is_valid_ph_mobile(phone: &str) -> bool {
    ph_local_part(phone).is_some()
}

/// Check if a phone number is valid (international E.164 format)
pub fn is_valid_international_phone(phone: &str) -> bool {
    INTERNATIONAL_PHONE_REGEX.is_match(&normalize_phone_number(phone))
}

/// Check if a phone number is valid (Philippine mobile or international)
pub fn is_valid_phone(phone: &str) -> bool {
    is_valid_ph_mobile(phone) || is_valid_international_phone(phone)
}

/// Convert a Philippine mobile number to E.164 (+639XXXXXXXXX)
pub fn to_ph_e164(phone: &str) -> Option<String> {
    ph_local_part(phone).map(|local| format!("+63{}", local))
}

/// Mask a phone number for display and logs (e.g., +63****4567)
pub fn mask_phone_number(phone: &str) -> String {
    let normalized = normalize_phone_number(phone);
    if normalized.len() >= 7 {
        format!(
            "{}****{}",
            &normalized[0..3],
            &normalized[normalized.len() - 4..]
        )
    } else {
        "****".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("+63 917-123-4567"), "+639171234567");
        assert_eq!(normalize_phone_number("(0917) 123 4567"), "09171234567");
    }

    #[test]
    fn test_format_phone_for_api() {
        assert_eq!(format_phone_for_api("+63 917 123 4567"), "639171234567");
        assert_eq!(format_phone_for_api("9171234567"), "9171234567");
    }

    #[test]
    fn test_is_valid_ph_mobile() {
        assert!(is_valid_ph_mobile("9171234567"));
        assert!(is_valid_ph_mobile("09171234567"));
        assert!(is_valid_ph_mobile("+639171234567"));
        assert!(is_valid_ph_mobile("63 917 123 4567"));
        assert!(!is_valid_ph_mobile("8171234567")); // landline prefix
        assert!(!is_valid_ph_mobile("917123456")); // too short
        assert!(!is_valid_ph_mobile("+6391712345678")); // too long
    }

    #[test]
    fn test_is_valid_phone_accepts_international() {
        assert!(is_valid_phone("+14155552671"));
        assert!(is_valid_phone("09171234567"));
        assert!(!is_valid_phone("12345"));
    }

    #[test]
    fn test_to_ph_e164() {
        assert_eq!(to_ph_e164("0917 123 4567"), Some("+639171234567".to_string()));
        assert_eq!(to_ph_e164("9171234567"), Some("+639171234567".to_string()));
        assert_eq!(to_ph_e164("invalid"), None);
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+639171234567"), "+63****4567");
        assert_eq!(mask_phone_number("9171234567"), "917****4567");
        assert_eq!(mask_phone_number("12345"), "****");
    }
}
