//! Minimum password policy, checked at the flow layer before hashing.
//!
//! The teacher's tenant-scoped policy-template engine doesn't apply here --
//! there is exactly one policy, shared by every customer.

pub fn check_password_policy(password: &str, min_length: usize) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if password.len() < min_length {
        errors.push(format!(
            "password must be at least {} characters",
            min_length
        ));
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        errors.push("password must contain at least one uppercase letter".to_string());
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        errors.push("password must contain at least one digit".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_compliant_password() {
        assert!(check_password_policy("Secret12", 8).is_ok());
    }

    #[test]
    fn rejects_short_password() {
        assert!(check_password_policy("Ab1", 8).is_err());
    }

    #[test]
    fn rejects_missing_uppercase() {
        assert!(check_password_policy("secret12", 8).is_err());
    }

    #[test]
    fn rejects_missing_digit() {
        assert!(check_password_policy("Secretonly", 8).is_err());
    }
}
