use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::watch;

use crate::identity::model::{AuthError, Credentials, IdentityService, User};
use crate::identity::validation::MIN_PASSWORD_LEN;

/// Process-local account store speaking the same cause codes as the hosted provider.
pub struct InMemoryIdentity {
    accounts: Mutex<HashMap<String, String>>,
    current: watch::Sender<Option<User>>,
}

impl InMemoryIdentity {
    pub fn new() -> InMemoryIdentity {
        let (current, _) = watch::channel(None);
        InMemoryIdentity {
            accounts: Mutex::new(HashMap::new()),
            current,
        }
    }

    /// Sign-up reports a blank address as `auth/missing-email`, sign-in as `auth/invalid-email`.
    fn check_email(email: &str, blank_code: &str) -> Result<(), AuthError> {
        if email.is_empty() {
            return Err(AuthError::new(
                blank_code,
                format!("Firebase: Error ({blank_code})."),
            ));
        }
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
            _ => Err(AuthError::new(
                "auth/invalid-email",
                "Firebase: Error (auth/invalid-email).",
            )),
        }
    }

    fn accounts(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, String>>, AuthError> {
        self.accounts
            .lock()
            .map_err(|_| AuthError::new("auth/internal-error", "Account store is unavailable."))
    }
}

impl Default for InMemoryIdentity {
    fn default() -> Self {
        InMemoryIdentity::new()
    }
}

#[async_trait]
impl IdentityService for InMemoryIdentity {
    async fn sign_in(&self, credentials: &Credentials) -> Result<User, AuthError> {
        Self::check_email(&credentials.email, "auth/invalid-email")?;
        if credentials.password.is_empty() {
            return Err(AuthError::new(
                "auth/missing-password",
                "Firebase: Error (auth/missing-password).",
            ));
        }

        let known = self
            .accounts()?
            .get(&credentials.email)
            .is_some_and(|password| *password == credentials.password);
        if !known {
            return Err(AuthError::new(
                "auth/invalid-credential",
                "Firebase: Error (auth/invalid-credential).",
            ));
        }

        let user = User {
            email: credentials.email.clone(),
        };
        tracing::info!(email = %user.email, "User logged in.");
        self.current.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn sign_up(&self, credentials: &Credentials) -> Result<User, AuthError> {
        Self::check_email(&credentials.email, "auth/missing-email")?;
        if credentials.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AuthError::new(
                "auth/weak-password",
                "Firebase: Password should be at least 6 characters (auth/weak-password).",
            ));
        }

        let mut accounts = self.accounts()?;
        if accounts.contains_key(&credentials.email) {
            return Err(AuthError::new(
                "auth/email-already-in-use",
                "Firebase: Error (auth/email-already-in-use).",
            ));
        }
        accounts.insert(credentials.email.clone(), credentials.password.clone());
        drop(accounts);

        let user = User {
            email: credentials.email.clone(),
        };
        tracing::info!(email = %user.email, "User registered.");
        Ok(user)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        if self.current.send_replace(None).is_some() {
            tracing::info!("User logged out.");
        }
        Ok(())
    }

    fn subscribe(&self) -> watch::Receiver<Option<User>> {
        self.current.subscribe()
    }
}
