//! Masking policy for mobile numbers and email addresses in success
//! responses. The unmasked value is never returned to a caller of
//! signup/verify/forgot-password.

/// `+989123456789` -> `+98912****789`: keep the first five digits and the
/// last three, mask everything in between with exactly four asterisks.
pub fn mask_mobile(mobile: &str) -> String {
    let Some(digits) = mobile.strip_prefix('+') else {
        return "*".repeat(mobile.len());
    };
    if digits.len() < 8 {
        return format!("+{}", "*".repeat(digits.len()));
    }
    let first = &digits[..5];
    let last = &digits[digits.len() - 3..];
    format!("+{}****{}", first, last)
}

/// `john@example.com` -> `jo**@example.com`: keep the first two characters
/// of the local part, mask the rest, keep the domain untouched.
pub fn mask_email(email: &str) -> String {
    let Some((local, domain)) = email.split_once('@') else {
        return "*".repeat(email.len());
    };
    let keep: String = local.chars().take(2).collect();
    let masked_len = local.chars().count().saturating_sub(keep.chars().count()).max(1);
    format!("{}{}@{}", keep, "*".repeat(masked_len), domain)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_mobile_per_spec_example() {
        assert_eq!(mask_mobile("+989123456789"), "+98912****789");
    }

    #[test]
    fn masks_email_per_spec_example() {
        assert_eq!(mask_email("john@example.com"), "jo**@example.com");
    }

    #[test]
    fn masks_short_local_part_without_panicking() {
        assert_eq!(mask_email("ab@example.com"), "ab*@example.com");
    }
}
