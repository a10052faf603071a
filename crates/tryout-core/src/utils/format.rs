/// Number of digits in a US phone number without country code
const PHONE_DIGITS: usize = 10;

/// Number of digits in a ZIP code
const ZIP_DIGITS: usize = 5;

/// Apply the phone input mask to whatever the user has typed so far.
/// Non-digits are ignored and digits beyond the tenth are dropped, so the
/// result is always a prefix of `(XXX) XXX-XXXX`.
pub fn mask_phone(input: &str) -> String {
    let digits: String = input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(PHONE_DIGITS)
        .collect();

    match digits.len() {
        0 => String::new(),
        1..=3 => format!("({}", digits),
        4..=6 => format!("({}) {}", &digits[0..3], &digits[3..]),
        _ => format!("({}) {}-{}", &digits[0..3], &digits[3..6], &digits[6..]),
    }
}

/// Keep at most five ASCII digits.
pub fn mask_zip(input: &str) -> String {
    input
        .chars()
        .filter(|c| c.is_ascii_digit())
        .take(ZIP_DIGITS)
        .collect()
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::is_valid_phone;

    #[test]
    fn test_mask_phone_progressive() {
        assert_eq!(mask_phone(""), "");
        assert_eq!(mask_phone("8"), "(8");
        assert_eq!(mask_phone("860"), "(860");
        assert_eq!(mask_phone("8605"), "(860) 5");
        assert_eq!(mask_phone("860555"), "(860) 555");
        assert_eq!(mask_phone("8605551"), "(860) 555-1");
        assert_eq!(mask_phone("8605551234"), "(860) 555-1234");
    }

    #[test]
    fn test_mask_phone_reformats_existing_mask() {
        // Typing one more digit onto an already-masked value
        assert_eq!(mask_phone("(860) 5551"), "(860) 555-1");
        // Backspacing the dash leaves digits intact
        assert_eq!(mask_phone("(860) 555"), "(860) 555");
        assert_eq!(mask_phone("860-555-1234"), "(860) 555-1234");
    }

    #[test]
    fn test_mask_phone_drops_extra_digits() {
        assert_eq!(mask_phone("86055512345"), "(860) 555-1234");
        assert!(is_valid_phone(&mask_phone("860 555 1234 99")));
    }

    #[test]
    fn test_mask_zip() {
        assert_eq!(mask_zip("06103"), "06103");
        assert_eq!(mask_zip("061034"), "06103");
        assert_eq!(mask_zip("06a1"), "061");
        assert_eq!(mask_zip(""), "");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }
}
