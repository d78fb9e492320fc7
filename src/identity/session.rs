use tokio::sync::watch;

use crate::identity::model::{AuthFlow, IdentityService, User};
use crate::identity::validation::{SignInForm, SignUpForm, REGISTRATION_SUCCEEDED};

/// Transient message shown on top of a screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Banner {
    pub message: String,
}

impl Banner {
    pub fn new(message: impl Into<String>) -> Banner {
        Banner {
            message: message.into(),
        }
    }

    pub fn welcome(user: &User) -> Banner {
        Banner::new(format!("Welcome, {}!", user.email))
    }
}

/// Sign-in screen submit: local form check, then the provider. Failures come back as the banner
/// to show.
pub async fn submit_sign_in<S>(service: &S, form: &SignInForm) -> Result<User, Banner>
where
    S: IdentityService + ?Sized,
{
    let credentials = form.validate().map_err(|e| Banner::new(e.to_string()))?;
    service
        .sign_in(&credentials)
        .await
        .map_err(|e| Banner::new(e.friendly_message(AuthFlow::SignIn)))
}

/// Sign-up screen submit. There is a banner to show either way.
pub async fn submit_sign_up<S>(service: &S, form: &SignUpForm) -> Result<Banner, Banner>
where
    S: IdentityService + ?Sized,
{
    let credentials = form.validate().map_err(|e| Banner::new(e.to_string()))?;
    service
        .sign_up(&credentials)
        .await
        .map_err(|e| Banner::new(e.friendly_message(AuthFlow::SignUp)))?;
    Ok(Banner::new(REGISTRATION_SUCCEEDED))
}

/// Lets the welcome banner through once per signed-in session.
#[derive(Debug, Default)]
pub struct WelcomeGate {
    shown: bool,
}

impl WelcomeGate {
    /// Feed every auth-state change through here.
    pub fn on_auth_change(&mut self, user: Option<&User>) -> Option<Banner> {
        match user {
            Some(user) if !self.shown => {
                self.shown = true;
                Some(Banner::welcome(user))
            }
            Some(_) => None,
            None => {
                self.shown = false;
                None
            }
        }
    }
}

/// Follows the auth-state subscription and hands out welcome banners until it closes.
pub async fn welcome_banners(
    mut users: watch::Receiver<Option<User>>,
    banners: async_channel::Sender<Banner>,
) {
    let mut gate = WelcomeGate::default();
    loop {
        let user = users.borrow_and_update().clone();
        if let Some(banner) = gate.on_auth_change(user.as_ref()) {
            if banners.send(banner).await.is_err() {
                return;
            }
        }
        if users.changed().await.is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            email: "ada@example.com".into(),
        }
    }

    #[test]
    fn welcome_shows_once_until_sign_out() {
        let mut gate = WelcomeGate::default();
        let ada = user();

        assert_eq!(
            gate.on_auth_change(Some(&ada)),
            Some(Banner::new("Welcome, ada@example.com!"))
        );
        assert_eq!(gate.on_auth_change(Some(&ada)), None);
        assert_eq!(gate.on_auth_change(None), None);
        assert!(gate.on_auth_change(Some(&ada)).is_some());
    }
}
