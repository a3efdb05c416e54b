//! Shape validation for the two identifier channels: Iranian mobile numbers
//! in normalized `+989XXXXXXXXX` form, and RFC-5322-subset email addresses.

use regex::Regex;
use std::sync::OnceLock;

static MOBILE_REGEX: OnceLock<Regex> = OnceLock::new();

/// `+98` followed by `9` (the mobile prefix digit) and nine more digits --
/// thirteen characters total including the leading `+`.
pub fn validate_mobile(mobile: &str) -> Result<(), String> {
    let regex = MOBILE_REGEX.get_or_init(|| Regex::new(r"^\+989\d{9}$").unwrap());
    if regex.is_match(mobile) {
        Ok(())
    } else {
        Err(format!(
            "mobile number `{}` does not match +989XXXXXXXXX",
            mobile
        ))
    }
}

pub fn validate_email(email: &str) -> Result<(), String> {
    let Some((local, domain)) = email.split_once('@') else {
        return Err(format!("invalid email format: {}", email));
    };
    if local.is_empty() || local.len() > 64 {
        return Err(format!("invalid email local part: {}", email));
    }
    if domain.is_empty() || domain.len() > 253 || !domain.contains('.') {
        return Err(format!("invalid email domain: {}", email));
    }
    if email.matches('@').count() != 1 {
        return Err(format!("invalid email format: {}", email));
    }
    Ok(())
}

/// `+` prefix selects the mobile path; anything else is treated as email,
/// matching the login flow's single-lookup identifier dispatch.
pub fn detect_identifier_type(identifier: &str) -> IdentifierType {
    if identifier.starts_with('+') {
        IdentifierType::Mobile
    } else {
        IdentifierType::Email
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentifierType {
    Mobile,
    Email,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_iran_mobile_passes() {
        assert!(validate_mobile("+989123456789").is_ok());
    }

    #[test]
    fn mobile_without_989_prefix_fails() {
        assert!(validate_mobile("+14155552671").is_err());
        assert!(validate_mobile("989123456789").is_err());
        assert!(validate_mobile("+98912345678").is_err()); // one digit short
    }

    #[test]
    fn well_formed_email_passes() {
        assert!(validate_email("john@example.com").is_ok());
    }

    #[test]
    fn email_missing_dot_in_domain_fails() {
        assert!(validate_email("john@examplecom").is_err());
    }

    #[test]
    fn email_with_two_at_signs_fails() {
        assert!(validate_email("jo@hn@example.com").is_err());
    }

    #[test]
    fn identifier_starting_with_plus_is_mobile() {
        assert_eq!(
            detect_identifier_type("+989123456789"),
            IdentifierType::Mobile
        );
        assert_eq!(
            detect_identifier_type("john@example.com"),
            IdentifierType::Email
        );
    }
}
