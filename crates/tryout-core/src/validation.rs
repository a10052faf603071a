//! Field validation rules.
//!
//! Every check here is pure: the same input always yields the same verdict.
//! The wizard calls them whenever the underlying field changes and caches the
//! result.

use std::sync::LazyLock;

use regex::Regex;

/// `local@domain.tld` with no whitespace anywhere.
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// The display mask `(XXX) XXX-XXXX`. ASCII digits only.
static PHONE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\([0-9]{3}\) [0-9]{3}-[0-9]{4}$").expect("valid phone regex")
});

static ZIP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{5}$").expect("valid zip regex"));

/// True when the value contains anything other than whitespace.
pub fn is_non_empty(value: &str) -> bool {
    !value.trim().is_empty()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

pub fn is_valid_zip(value: &str) -> bool {
    ZIP_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_non_empty() {
        assert!(is_non_empty("a"));
        assert!(is_non_empty("  Sam  "));
        assert!(!is_non_empty(""));
        assert!(!is_non_empty("   "));
        assert!(!is_non_empty("\t\n"));
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("parent@example.com"));
        assert!(is_valid_email("a.b+tryouts@mail.school.org"));

        assert!(!is_valid_email(""));
        assert!(!is_valid_email("parent@example")); // no tld
        assert!(!is_valid_email("parent.example.com")); // no @
        assert!(!is_valid_email("par ent@example.com")); // embedded space
        assert!(!is_valid_email(" parent@example.com")); // leading space
        assert!(!is_valid_email("a@@example.com"));
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("(860) 555-1234"));

        assert!(!is_valid_phone("860-555-1234"));
        assert!(!is_valid_phone("8605551234"));
        assert!(!is_valid_phone("(860)555-1234")); // missing space
        assert!(!is_valid_phone("(860) 555-123")); // too short
        assert!(!is_valid_phone("(860) 555-12345")); // too long
        assert!(!is_valid_phone("(86O) 555-1234")); // letter O
        assert!(!is_valid_phone("(٨٦٠) 555-1234")); // non-ASCII digits
    }

    #[test]
    fn test_is_valid_zip() {
        assert!(is_valid_zip("06103"));

        assert!(!is_valid_zip("1234"));
        assert!(!is_valid_zip("123456"));
        assert!(!is_valid_zip("0610a"));
        assert!(!is_valid_zip(" 06103"));
        assert!(!is_valid_zip("06103-1234"));
    }

    #[test]
    fn test_checks_are_idempotent() {
        for input in ["(860) 555-1234", "bad", "06103", "x@y.z"] {
            assert_eq!(is_valid_phone(input), is_valid_phone(input));
            assert_eq!(is_valid_zip(input), is_valid_zip(input));
            assert_eq!(is_valid_email(input), is_valid_email(input));
        }
    }
}
