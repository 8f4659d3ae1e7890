//! Helpers for OTP text entry

/// Keep only ASCII digits from raw keyboard or clipboard input
pub fn numeric_chars(value: &str) -> Vec<char> {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Check that `code` is exactly `length` ASCII digits
pub fn is_valid_otp_code(code: &str, length: usize) -> bool {
    code.len() == length && code.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_chars() {
        assert_eq!(numeric_chars("1a2-3 4"), vec!['1', '2', '3', '4']);
        assert!(numeric_chars("abc").is_empty());
        // Non-ASCII digits are not accepted
        assert!(numeric_chars("٣").is_empty());
    }

    #[test]
    fn test_is_valid_otp_code() {
        assert!(is_valid_otp_code("0420", 4));
        assert!(!is_valid_otp_code("042", 4));
        assert!(!is_valid_otp_code("04a0", 4));
    }
}
