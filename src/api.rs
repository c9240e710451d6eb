use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use url::Url;

use crate::error::Error;
use crate::types::{AccessToken, Profile, Role};

/// Trikona API configuration.
///
/// The base URL is the only required field, so it is a constructor parameter.
///
/// ```rust,ignore
/// use trikona_auth::ApiConfig;
///
/// let config = ApiConfig::new("https://api.trikona.example/api/".parse()?)
///     .with_timeout(std::time::Duration::from_secs(10));
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct ApiConfig {
    pub(crate) base_url: Url,
    pub(crate) timeout: Option<Duration>,
}

impl ApiConfig {
    /// Create a new API configuration.
    ///
    /// A trailing `/` is added to the base path so endpoint paths join under it.
    #[must_use]
    pub fn new(mut base_url: Url) -> Self {
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }
        Self {
            base_url,
            timeout: None,
        }
    }

    /// Per-request timeout. Without one, the transport default applies.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Registration details submitted with a registration-link token.
pub struct Registration {
    pub token: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: SecretString,
    pub confirm_password: SecretString,
    pub linkedin_url: Option<String>,
}

impl Registration {
    fn body(&self) -> Value {
        let mut body = json!({
            "firstName": self.first_name,
            "lastName": self.last_name,
            "email": self.email,
            "password": self.password.expose_secret(),
            "confirmPassword": self.confirm_password.expose_secret(),
            "token": self.token,
        });
        if let Some(url) = &self.linkedin_url {
            body["linkedinUrl"] = Value::String(url.clone());
        }
        body
    }
}

/// Response of the register, login and LinkedIn callback endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[non_exhaustive]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<AccessToken>,
    #[serde(default)]
    pub user: Option<Profile>,
    #[serde(default)]
    pub message: Option<String>,
}

impl AuthResponse {
    /// Token and user together, or an error naming the missing part.
    pub(crate) fn into_credentials(
        self,
        operation: &'static str,
    ) -> Result<(AccessToken, Profile, Option<String>), Error> {
        let token = self.token.ok_or(Error::Incomplete {
            operation,
            field: "token",
        })?;
        let user = self.user.ok_or(Error::Incomplete {
            operation,
            field: "user",
        })?;
        Ok((token, user, self.message))
    }
}

/// Response of the informational endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
#[non_exhaustive]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Gateway to the Trikona `auth/...` endpoints.
pub struct AuthApi {
    config: ApiConfig,
    http: reqwest::Client,
}

impl AuthApi {
    /// Create a gateway with a default HTTP client.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
        }
    }

    /// Use a custom HTTP client (for connection pool reuse or testing).
    #[must_use]
    pub fn with_http_client(mut self, client: reqwest::Client) -> Self {
        self.http = client;
        self
    }

    #[must_use]
    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// Complete a registration started from an email verification link.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or
    /// [`Error::Request`] if the API rejects the registration.
    pub async fn register(&self, registration: &Registration) -> Result<AuthResponse, Error> {
        self.post("auth/register", "registration", registration.body(), None)
            .await
    }

    /// Exchange email and password for a session token.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] on network failure, or
    /// [`Error::Request`] on invalid credentials.
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AuthResponse, Error> {
        let body = json!({
            "email": email,
            "password": password.expose_secret(),
        });
        self.post("auth/login", "login", body, None).await
    }

    /// Ask the API to email a password reset link.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] or [`Error::Request`].
    pub async fn forgot_password(&self, email: &str) -> Result<MessageResponse, Error> {
        self.post(
            "auth/forgot-password",
            "forgot password",
            json!({ "email": email }),
            None,
        )
        .await
    }

    /// Set a new password using the token from a reset link.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] or [`Error::Request`].
    pub async fn reset_password(
        &self,
        token: &str,
        password: &SecretString,
    ) -> Result<MessageResponse, Error> {
        let body = json!({
            "token": token,
            "password": password.expose_secret(),
        });
        self.post("auth/reset-password", "password reset", body, None)
            .await
    }

    /// Hand a LinkedIn authorization code to the API.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] or [`Error::Request`].
    pub async fn linkedin_callback(
        &self,
        code: &str,
        state: Option<&str>,
    ) -> Result<AuthResponse, Error> {
        let mut body = json!({ "code": code });
        if let Some(state) = state {
            body["state"] = Value::String(state.to_owned());
        }
        self.post("auth/linkedin/callback", "LinkedIn sign-in", body, None)
            .await
    }

    /// Change the role of the user owning `token`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] or [`Error::Request`].
    pub async fn update_role(
        &self,
        token: &AccessToken,
        role: Role,
    ) -> Result<MessageResponse, Error> {
        self.post(
            "auth/update-role",
            "role update",
            json!({ "role": role }),
            Some(token),
        )
        .await
    }

    /// Ask the API to send a fresh registration verification link.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] or [`Error::Request`].
    pub async fn request_verification_link(&self, email: &str) -> Result<MessageResponse, Error> {
        self.post(
            "auth/request-verification",
            "verification link request",
            json!({ "email": email }),
            None,
        )
        .await
    }

    async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        operation: &'static str,
        body: Value,
        bearer: Option<&AccessToken>,
    ) -> Result<T, Error> {
        let url = self.config.base_url.join(path)?;
        tracing::debug!(operation, url = %url, "API request");

        let mut request = self.http.post(url).json(&body);
        if let Some(token) = bearer {
            request = request.bearer_auth(token.as_str());
        }
        if let Some(timeout) = self.config.timeout {
            request = request.timeout(timeout);
        }

        let response = request.send().await?;
        let response = Self::ensure_success(response, operation).await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        // Some endpoints answer 2xx with no body.
        let value: Value = if text.trim().is_empty() {
            json!({})
        } else {
            serde_json::from_str(&text).map_err(|source| Error::Decode { operation, source })?
        };

        // A 2xx carrying an `error` is still a rejection.
        if let Some(message) = field_text(&value, &["error"]) {
            return Err(Error::Request {
                operation,
                status,
                message: Some(message),
            });
        }
        serde_json::from_value(value).map_err(|source| Error::Decode { operation, source })
    }

    /// Checks HTTP response status; returns the response on success or an error with the
    /// server's `error` message.
    async fn ensure_success(
        response: reqwest::Response,
        operation: &'static str,
    ) -> Result<reqwest::Response, Error> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        Err(Error::Request {
            operation,
            status,
            message: error_message(&body),
        })
    }
}

/// `error` (or, failing that, `message`) from a JSON error body.
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    field_text(&value, &["error", "message"])
}

/// First of `keys` holding a non-blank string.
fn field_text(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(ToOwned::to_owned)
}
