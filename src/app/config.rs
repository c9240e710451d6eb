use std::time::Duration;

use url::Url;

use super::error::FlowError;
use crate::api::{ApiConfig, AuthApi};
#[cfg(feature = "linkedin")]
use crate::linkedin::LinkedInConfig;

/// Configuration for [`AuthFlows`](super::AuthFlows).
///
/// Use [`from_env()`](AppConfig::from_env) for convention-based setup,
/// or [`new()`](AppConfig::new) with `with_*` methods for full control.
pub struct AppConfig {
    pub(super) api: AuthApi,
    #[cfg(feature = "linkedin")]
    pub(super) linkedin: Option<LinkedInConfig>,
}

impl AppConfig {
    /// Create config with the required API gateway.
    #[must_use]
    pub fn new(api: AuthApi) -> Self {
        Self {
            api,
            #[cfg(feature = "linkedin")]
            linkedin: None,
        }
    }

    /// Create config from environment variables.
    ///
    /// # Required env vars
    /// - `TRIKONA_API_URL`: base URL of the API (the `auth/...` paths are joined to it)
    ///
    /// # Optional env vars
    /// - `TRIKONA_API_TIMEOUT_SECS`: per-request timeout in seconds
    /// - `LINKEDIN_CLIENT_ID` + `LINKEDIN_REDIRECT_URI`: enable LinkedIn sign-in
    /// - `LINKEDIN_SCOPES`: comma-separated scopes
    ///
    /// # Errors
    ///
    /// Returns [`FlowError::Config`] if required env vars are missing or values are invalid.
    pub fn from_env() -> Result<Self, FlowError> {
        let base_url = std::env::var("TRIKONA_API_URL")
            .map_err(|_| FlowError::Config("TRIKONA_API_URL is required".into()))?;
        let base_url: Url = base_url
            .parse()
            .map_err(|e| FlowError::Config(format!("TRIKONA_API_URL: {e}")))?;

        let mut api_config = ApiConfig::new(base_url);

        if let Ok(secs) = std::env::var("TRIKONA_API_TIMEOUT_SECS") {
            let secs: u64 = secs
                .trim()
                .parse()
                .map_err(|e| FlowError::Config(format!("TRIKONA_API_TIMEOUT_SECS: {e}")))?;
            api_config = api_config.with_timeout(Duration::from_secs(secs));
        }

        let config = Self::new(AuthApi::new(api_config));

        #[cfg(feature = "linkedin")]
        let config = match linkedin_from_env()? {
            Some(linkedin) => config.with_linkedin(linkedin),
            None => config,
        };

        Ok(config)
    }

    /// Enable LinkedIn sign-in.
    #[cfg(feature = "linkedin")]
    #[must_use]
    pub fn with_linkedin(mut self, linkedin: LinkedInConfig) -> Self {
        self.linkedin = Some(linkedin);
        self
    }

    #[must_use]
    pub fn api(&self) -> &AuthApi {
        &self.api
    }
}

#[cfg(feature = "linkedin")]
fn linkedin_from_env() -> Result<Option<LinkedInConfig>, FlowError> {
    let Ok(client_id) = std::env::var("LINKEDIN_CLIENT_ID") else {
        return Ok(None);
    };
    let redirect_uri = std::env::var("LINKEDIN_REDIRECT_URI").map_err(|_| {
        FlowError::Config("LINKEDIN_REDIRECT_URI is required when LINKEDIN_CLIENT_ID is set".into())
    })?;
    let redirect_uri: Url = redirect_uri
        .parse()
        .map_err(|e| FlowError::Config(format!("LINKEDIN_REDIRECT_URI: {e}")))?;

    let mut linkedin = LinkedInConfig::new(client_id, redirect_uri);
    if let Ok(scopes) = std::env::var("LINKEDIN_SCOPES") {
        linkedin = linkedin.with_scopes(
            scopes
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        );
    }
    Ok(Some(linkedin))
}
