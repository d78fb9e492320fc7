use async_trait::async_trait;
use tokio::sync::watch;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct User {
    pub email: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Credentials {
        Credentials {
            email: email.into(),
            password: password.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthFlow {
    SignIn,
    SignUp,
}

/// Failure reported by the identity provider: a cause code such as `auth/invalid-email`
/// and the provider's own message.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{message} ({code})")]
pub struct AuthError {
    pub code: String,
    pub message: String,
}

impl AuthError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> AuthError {
        AuthError {
            code: code.into(),
            message: message.into(),
        }
    }

    /// Text for the banner. Unknown codes fall back to the provider's message.
    pub fn friendly_message(&self, flow: AuthFlow) -> &str {
        let known = match (flow, self.code.as_str()) {
            (AuthFlow::SignIn, "auth/invalid-email") => Some("Invalid email format."),
            (AuthFlow::SignIn, "auth/invalid-credential") => {
                Some("Incorrect email or password. Please try again.")
            }
            (AuthFlow::SignIn, "auth/missing-password") => Some("Please enter a password."),
            (AuthFlow::SignUp, "auth/invalid-email") => Some("The email address is not valid."),
            (AuthFlow::SignUp, "auth/email-already-in-use") => {
                Some("The email address is already in use.")
            }
            (AuthFlow::SignUp, "auth/missing-email") => Some("Please provide an email address."),
            _ => None,
        };
        known.unwrap_or(self.message.as_str())
    }
}

#[async_trait]
pub trait IdentityService {
    async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError>;

    async fn sign_up(&self, credentials: &Credentials) -> Result<User, AuthError>;

    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Current user, updated on every sign-in and sign-out.
    fn subscribe(&self) -> watch::Receiver<Option<User>>;
}
