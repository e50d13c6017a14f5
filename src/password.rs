use bcrypt::{hash, verify};

use crate::errors::AppError;

pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Returns the first rule the password breaks, if any.
pub fn policy_violation(password: &str) -> Option<&'static str> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Some("Password must be at least 8 characters long");
    }
    if !password.chars().any(|c| c.is_uppercase()) {
        return Some("Password must contain an uppercase letter");
    }
    if !password.chars().any(|c| c.is_lowercase()) {
        return Some("Password must contain a lowercase letter");
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some("Password must contain a number");
    }
    if password.chars().all(|c| c.is_alphanumeric()) {
        return Some("Password must contain a special character");
    }
    None
}

pub fn meets_policy(password: &str) -> bool {
    policy_violation(password).is_none()
}

pub fn check_policy(password: &str) -> Result<(), AppError> {
    match policy_violation(password) {
        Some(rule) => Err(AppError::validation(Some(rule))),
        None => Ok(()),
    }
}

pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    Ok(hash(password, cost)?)
}

// A malformed stored hash counts as a failed check
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    verify(password, password_hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_strong_password() {
        assert!(meets_policy("Sup3r-secret"));
        assert!(check_policy("Passw0rd!").is_ok());
    }

    #[test]
    fn reports_first_broken_rule() {
        assert_eq!(policy_violation("Ab1!"), Some("Password must be at least 8 characters long"));
        assert_eq!(policy_violation("password1!"), Some("Password must contain an uppercase letter"));
        assert_eq!(policy_violation("PASSWORD1!"), Some("Password must contain a lowercase letter"));
        assert_eq!(policy_violation("Password!!"), Some("Password must contain a number"));
        assert_eq!(policy_violation("Password12"), Some("Password must contain a special character"));
    }

    #[test]
    fn hashes_verify() {
        let hashed = hash_password("Passw0rd!", 4).unwrap();
        assert!(verify_password("Passw0rd!", &hashed));
        assert!(!verify_password("Passw0rd?", &hashed));
        assert!(!verify_password("Passw0rd!", "not-a-hash"));
    }
}
