use secrecy::{ExposeSecret, SecretString};

use super::error::FlowError;
use super::routes::{Route, query_param};
use super::state::AuthFlows;
use super::traits::{Notifier, SessionStore};
use super::types::{NotificationKind, Outcome};
use crate::api::Registration;
#[cfg(feature = "linkedin")]
use crate::linkedin::{self, AuthorizationRequest};
use crate::types::Role;
use crate::validation::{self, ValidationError};

/// Fields of the registration form.
pub struct RegistrationForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub linkedin_url: Option<String>,
}

/// Query parameters LinkedIn appends to the callback URL.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkedInCallback {
    pub code: Option<String>,
    pub state: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl LinkedInCallback {
    /// Read the parameters from a callback location such as
    /// `/linkedin/callback?code=...&state=...`.
    #[must_use]
    pub fn from_location(location: &str) -> Self {
        Self {
            code: query_param(location, "code"),
            state: query_param(location, "state"),
            error: query_param(location, "error"),
            error_description: query_param(location, "error_description"),
        }
    }
}

// ── Registration ───────────────────────────────────────────────────

impl<S: SessionStore, N: Notifier> AuthFlows<S, N> {
    /// Complete a registration opened from an email verification link.
    ///
    /// Without a link token nothing is sent: the user is told the link is invalid
    /// and sent back to the registration entry. Registration does not sign in.
    pub async fn register(&self, link_token: Option<&str>, form: RegistrationForm) -> Outcome {
        let token = match validation::require_link_token(link_token) {
            Ok(token) => token.to_owned(),
            Err(e) => {
                tracing::warn!("Registration opened without a verification token");
                self.fail(&e.into(), "Invalid or expired verification link");
                return Outcome::Navigate(Route::Register);
            }
        };

        match self.try_register(token, form).await {
            Ok(message) => {
                self.succeed(message.unwrap_or_else(|| {
                    "Registration successful! Please check your email for role selection."
                        .to_string()
                }));
                Outcome::Navigate(Route::Auth)
            }
            Err(e) => {
                self.fail(&e, "Registration failed");
                Outcome::Stay
            }
        }
    }

    async fn try_register(
        &self,
        token: String,
        form: RegistrationForm,
    ) -> Result<Option<String>, FlowError> {
        let first_name = validation::require("First name", &form.first_name)?.to_owned();
        let last_name = validation::require("Last name", &form.last_name)?.to_owned();
        let email = validation::require_email(&form.email)?.to_owned();
        validation::check_new_password(
            form.password.expose_secret(),
            form.confirm_password.expose_secret(),
        )?;

        let registration = Registration {
            token,
            first_name,
            last_name,
            email,
            password: form.password,
            confirm_password: form.confirm_password,
            linkedin_url: form
                .linkedin_url
                .map(|url| url.trim().to_string())
                .filter(|url| !url.is_empty()),
        };

        let response = self.api.register(&registration).await?;
        tracing::info!("Registration completed");
        Ok(response.message)
    }
}

// ── Login / Logout ─────────────────────────────────────────────────

impl<S: SessionStore, N: Notifier> AuthFlows<S, N> {
    /// Sign in with email and password. On success the session holds the new token and user.
    pub async fn login(&self, email: &str, password: &SecretString) -> Outcome {
        match self.try_login(email, password).await {
            Ok(message) => {
                self.succeed(message.unwrap_or_else(|| "Login successful".to_string()));
                Outcome::Navigate(Route::Dashboard)
            }
            Err(e) => {
                self.fail(&e, "Login failed");
                Outcome::Stay
            }
        }
    }

    async fn try_login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<Option<String>, FlowError> {
        let email = validation::require_email(email)?;
        validation::require("Password", password.expose_secret())?;

        let (token, user, message) = self
            .api
            .login(email, password)
            .await?
            .into_credentials("login")?;

        tracing::info!(user_id = %user.id, "Login successful");
        self.store.set(token, user);
        Ok(message)
    }

    /// Drop the session and return to the entry view.
    pub fn logout(&self) -> Outcome {
        if let Some(user) = self.store.get().user() {
            tracing::info!(user_id = %user.id, "Logged out");
        }
        self.store.clear();
        self.succeed("You have been logged out.".to_string());
        Outcome::Navigate(Route::Auth)
    }
}

// ── Password reset ─────────────────────────────────────────────────

impl<S: SessionStore, N: Notifier> AuthFlows<S, N> {
    /// Request a password reset email.
    pub async fn forgot_password(&self, email: &str) -> Outcome {
        match self.try_forgot_password(email).await {
            Ok(message) => {
                self.succeed(message.unwrap_or_else(|| {
                    "Password reset link sent. Please check your email.".to_string()
                }));
            }
            Err(e) => self.fail(&e, "Failed to send password reset link"),
        }
        Outcome::Stay
    }

    async fn try_forgot_password(&self, email: &str) -> Result<Option<String>, FlowError> {
        let email = validation::require_email(email)?;
        Ok(self.api.forgot_password(email).await?.message)
    }

    /// Set a new password from a reset link.
    ///
    /// A link without a token goes straight to the forgot-password view.
    /// On success the user is sent to log in with the new password.
    pub async fn reset_password(
        &self,
        link_token: Option<&str>,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Outcome {
        let Ok(token) = validation::require_link_token(link_token) else {
            tracing::warn!("Password reset opened without a token");
            return Outcome::Navigate(Route::ForgotPassword);
        };

        match self.try_reset_password(token, password, confirmation).await {
            Ok(message) => {
                self.succeed(message.unwrap_or_else(|| {
                    "Password reset successful. Please log in with your new password.".to_string()
                }));
                Outcome::Navigate(Route::Auth)
            }
            Err(e) => {
                self.fail(&e, "Password reset failed");
                Outcome::Stay
            }
        }
    }

    async fn try_reset_password(
        &self,
        token: &str,
        password: &SecretString,
        confirmation: &SecretString,
    ) -> Result<Option<String>, FlowError> {
        validation::check_new_password(password.expose_secret(), confirmation.expose_secret())?;
        Ok(self.api.reset_password(token, password).await?.message)
    }

    /// Ask for a fresh registration verification link.
    pub async fn request_verification_link(&self, email: &str) -> Outcome {
        match self.try_request_verification_link(email).await {
            Ok(message) => {
                self.succeed(message.unwrap_or_else(|| {
                    "Verification link sent. Please check your email.".to_string()
                }));
            }
            Err(e) => self.fail(&e, "Failed to send verification link"),
        }
        Outcome::Stay
    }

    async fn try_request_verification_link(
        &self,
        email: &str,
    ) -> Result<Option<String>, FlowError> {
        let email = validation::require_email(email)?;
        Ok(self.api.request_verification_link(email).await?.message)
    }
}

// ── LinkedIn ───────────────────────────────────────────────────────

impl<S: SessionStore, N: Notifier> AuthFlows<S, N> {
    /// Start LinkedIn sign-in: returns the URL to open and remembers its `state`.
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Config`] if LinkedIn sign-in is not configured.
    #[cfg(feature = "linkedin")]
    pub fn linkedin_authorize(&self) -> Result<AuthorizationRequest, FlowError> {
        let config = self
            .linkedin
            .as_ref()
            .ok_or_else(|| FlowError::Config("LinkedIn sign-in is not configured".into()))?;

        let request = linkedin::authorization_request(config);
        *self
            .pending_state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(request.state.clone());
        Ok(request)
    }

    /// Finish LinkedIn sign-in.
    ///
    /// Signs in and goes to role selection for accounts still on the guest role,
    /// otherwise to the dashboard. Any failure returns to the entry view.
    pub async fn linkedin_callback(&self, params: LinkedInCallback) -> Outcome {
        match self.try_linkedin_callback(params).await {
            Ok((role, message)) => {
                self.succeed(message.unwrap_or_else(|| "Signed in with LinkedIn".to_string()));
                if role == Role::Guest {
                    Outcome::Navigate(Route::RoleSelection)
                } else {
                    Outcome::Navigate(Route::Dashboard)
                }
            }
            Err(e) => {
                self.fail(&e, "LinkedIn sign-in failed");
                Outcome::Navigate(Route::Auth)
            }
        }
    }

    async fn try_linkedin_callback(
        &self,
        params: LinkedInCallback,
    ) -> Result<(Role, Option<String>), FlowError> {
        if let Some(error) = params.error {
            let desc = params.error_description.unwrap_or(error);
            return Err(FlowError::Provider(desc));
        }

        let code = params
            .code
            .filter(|c| !c.trim().is_empty())
            .ok_or(ValidationError::MissingField("Authorization code"))?;

        self.check_linkedin_state(params.state.as_deref())?;

        let (token, user, message) = self
            .api
            .linkedin_callback(&code, params.state.as_deref())
            .await?
            .into_credentials("LinkedIn sign-in")?;

        let role = user.role;
        tracing::info!(user_id = %user.id, "LinkedIn sign-in successful");
        self.store.set(token, user);
        Ok((role, message))
    }

    /// When an authorization request was issued, the callback must echo its `state`.
    /// The pending value is consumed either way.
    #[cfg(feature = "linkedin")]
    fn check_linkedin_state(&self, received: Option<&str>) -> Result<(), ValidationError> {
        let expected = self
            .pending_state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .take();

        match expected {
            Some(expected) if received != Some(expected.as_str()) => {
                tracing::warn!("LinkedIn state mismatch");
                Err(ValidationError::StateMismatch)
            }
            _ => Ok(()),
        }
    }

    #[cfg(not(feature = "linkedin"))]
    #[allow(clippy::unused_self)]
    fn check_linkedin_state(&self, _received: Option<&str>) -> Result<(), ValidationError> {
        Ok(())
    }
}

// ── Role selection ─────────────────────────────────────────────────

impl<S: SessionStore, N: Notifier> AuthFlows<S, N> {
    /// Choose the account role.
    ///
    /// Needs a session; without one the user is sent to the entry view.
    /// On success the stored profile carries the new role.
    pub async fn select_role(&self, role: Role) -> Outcome {
        match self.try_select_role(role).await {
            Ok(message) => {
                self.succeed(message.unwrap_or_else(|| format!("Role updated to {role}")));
                Outcome::Navigate(Route::Dashboard)
            }
            Err(FlowError::Unauthenticated) => {
                tracing::debug!("Role selection without a session");
                Outcome::Navigate(Route::Auth)
            }
            Err(e) => {
                self.fail(&e, "Failed to update role");
                Outcome::Stay
            }
        }
    }

    async fn try_select_role(&self, role: Role) -> Result<Option<String>, FlowError> {
        let token = self
            .store
            .get()
            .token()
            .cloned()
            .ok_or(FlowError::Unauthenticated)?;

        let response = self.api.update_role(&token, role).await?;

        // A logout or account switch during the request wins over the new role.
        if self
            .store
            .update_user_if(&token, |user| user.with_role(role))
        {
            tracing::info!(%role, "Role updated");
        } else {
            tracing::info!(%role, "Role updated after the session changed; local profile left as is");
        }
        Ok(response.message)
    }
}

// ── Helpers ────────────────────────────────────────────────────────

impl<S: SessionStore, N: Notifier> AuthFlows<S, N> {
    fn succeed(&self, message: String) {
        self.notifier.notify(message, NotificationKind::Success);
    }

    fn fail(&self, error: &FlowError, fallback: &str) {
        if error.is_client_side() {
            tracing::debug!(error = %error, "Rejected before sending");
        } else {
            tracing::error!(error = %error, "Request failed");
        }
        self.notifier
            .notify(error.user_message(fallback), NotificationKind::Error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_params_from_location() {
        let params =
            LinkedInCallback::from_location("/linkedin/callback?code=abc&state=xyz");
        assert_eq!(params.code.as_deref(), Some("abc"));
        assert_eq!(params.state.as_deref(), Some("xyz"));
        assert!(params.error.is_none());

        let params = LinkedInCallback::from_location(
            "/linkedin/callback?error=user_cancelled_login&error_description=The+user+cancelled",
        );
        assert_eq!(params.error.as_deref(), Some("user_cancelled_login"));
        assert_eq!(params.error_description.as_deref(), Some("The user cancelled"));
    }
}
