use crate::identity::model::Credentials;

pub const MIN_PASSWORD_LEN: usize = 6;

pub const REGISTRATION_SUCCEEDED: &str = "Registration successful!";

/// Rejections raised before the identity service is ever called.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("Please fill in all fields.")]
    MissingFields,
    #[error("Password must be at least 6 characters long.")]
    PasswordTooShort,
    #[error("Passwords do not match.")]
    PasswordMismatch,
}

#[derive(Clone, Debug, Default)]
pub struct SignInForm {
    pub email: String,
    pub password: String,
}

impl SignInForm {
    /// Only an entirely blank form is refused here. A single missing field goes to the
    /// service, which answers with `auth/missing-password` or `auth/invalid-email`.
    pub fn validate(&self) -> Result<Credentials, FormError> {
        if self.email.is_empty() && self.password.is_empty() {
            return Err(FormError::MissingFields);
        }
        Ok(Credentials::new(&self.email, &self.password))
    }
}

#[derive(Clone, Debug, Default)]
pub struct SignUpForm {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignUpForm {
    pub fn validate(&self) -> Result<Credentials, FormError> {
        if self.email.is_empty() || self.password.is_empty() || self.confirm_password.is_empty() {
            return Err(FormError::MissingFields);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(FormError::PasswordTooShort);
        }
        if self.password != self.confirm_password {
            return Err(FormError::PasswordMismatch);
        }
        Ok(Credentials::new(&self.email, &self.password))
    }
}
