//! Sign-in and sign-up drafts. Like panel drafts, they live only as long as
//! the screen that owns them.

use crate::panels::Precondition;

pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    pub fn precondition(&self) -> Precondition {
        if self.email.trim().is_empty() {
            return Precondition::fail("Please enter your email.");
        }
        if self.password.is_empty() {
            return Precondition::fail("Please enter your password.");
        }
        Precondition::Pass
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn precondition(&self) -> Precondition {
        if self.full_name.trim().is_empty() {
            return Precondition::fail("Please enter your full name.");
        }
        if self.email.trim().is_empty() {
            return Precondition::fail("Please enter your email.");
        }
        if self.password != self.confirm_password {
            return Precondition::fail("Passwords do not match");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Precondition::fail("Password must be at least 6 characters");
        }
        Precondition::Pass
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_up(password: &str, confirm: &str) -> SignUpForm {
        SignUpForm {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            password: password.to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    #[test]
    fn test_sign_in_requires_both_fields() {
        let mut form = SignInForm::default();
        assert!(!form.precondition().passed());
        form.email = "ada@example.com".to_string();
        assert_eq!(form.precondition().reason(), Some("Please enter your password."));
        form.password = "x".to_string();
        assert!(form.precondition().passed());
    }

    #[test]
    fn test_sign_up_password_mismatch_checked_first() {
        assert_eq!(sign_up("abc", "abd").precondition().reason(), Some("Passwords do not match"));
    }

    #[test]
    fn test_sign_up_minimum_password_length() {
        assert_eq!(
            sign_up("abcde", "abcde").precondition().reason(),
            Some("Password must be at least 6 characters")
        );
        assert!(sign_up("abcdef", "abcdef").precondition().passed());
    }

    #[test]
    fn test_sign_up_requires_name() {
        let mut form = sign_up("abcdef", "abcdef");
        form.full_name = "  ".to_string();
        assert!(!form.precondition().passed());
    }
}
