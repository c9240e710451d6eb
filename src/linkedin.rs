use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use rand::Rng;
use url::Url;

/// LinkedIn sign-in configuration.
///
/// ```rust,ignore
/// use trikona_auth::LinkedInConfig;
///
/// let config = LinkedInConfig::new("client-id", "https://app.example/linkedin/callback".parse()?)
///     .with_scopes(vec!["openid".into(), "email".into()]);
/// ```
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct LinkedInConfig {
    pub(crate) client_id: String,
    pub(crate) redirect_uri: Url,
    pub(crate) auth_url: Url,
    pub(crate) scopes: Vec<String>,
}

impl LinkedInConfig {
    #[must_use]
    pub fn new(client_id: impl Into<String>, redirect_uri: Url) -> Self {
        Self {
            client_id: client_id.into(),
            redirect_uri,
            auth_url: "https://www.linkedin.com/oauth/v2/authorization"
                .parse()
                .expect("valid default URL"),
            scopes: vec!["r_liteprofile".into(), "r_emailaddress".into()],
        }
    }

    /// Override the LinkedIn authorization endpoint.
    #[must_use]
    pub fn with_auth_url(mut self, url: Url) -> Self {
        self.auth_url = url;
        self
    }

    /// Override the requested scopes (default: `["r_liteprofile", "r_emailaddress"]`).
    #[must_use]
    pub fn with_scopes(mut self, scopes: Vec<String>) -> Self {
        self.scopes = scopes;
        self
    }

    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    #[must_use]
    pub fn redirect_uri(&self) -> &Url {
        &self.redirect_uri
    }

    #[must_use]
    pub fn auth_url(&self) -> &Url {
        &self.auth_url
    }

    #[must_use]
    pub fn scopes(&self) -> &[String] {
        &self.scopes
    }
}

/// Where to send the browser, and the `state` to expect back on the callback.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct AuthorizationRequest {
    pub url: String,
    pub state: String,
}

/// Build a LinkedIn authorization URL with a fresh `state`.
#[must_use]
pub fn authorization_request(config: &LinkedInConfig) -> AuthorizationRequest {
    let state = generate_state();
    let scope = config.scopes.join(" ");

    let mut url = config.auth_url.clone();
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", &config.client_id)
        .append_pair("redirect_uri", config.redirect_uri.as_str())
        .append_pair("state", &state)
        .append_pair("scope", &scope);

    AuthorizationRequest {
        url: url.into(),
        state,
    }
}

/// Generates a random `state` parameter.
///
/// Returns a 22-character URL-safe string (16 random bytes → base64url).
#[must_use]
pub fn generate_state() -> String {
    let random_bytes: [u8; 16] = rand::rng().random();
    URL_SAFE_NO_PAD.encode(random_bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> LinkedInConfig {
        LinkedInConfig::new(
            "test-client",
            "https://app.example.com/linkedin/callback".parse().unwrap(),
        )
    }

    #[test]
    fn test_authorization_url_contains_params() {
        let req = authorization_request(&test_config());

        assert!(req.url.starts_with("https://www.linkedin.com/oauth/v2/authorization?"));
        assert!(req.url.contains("response_type=code"));
        assert!(req.url.contains("client_id=test-client"));
        assert!(req.url.contains(&format!("state={}", req.state)));
        assert!(req.url.contains("scope=r_liteprofile+r_emailaddress"));
        assert!(
            req.url
                .contains("redirect_uri=https%3A%2F%2Fapp.example.com%2Flinkedin%2Fcallback")
        );
    }

    #[test]
    fn test_authorization_state_unique_per_call() {
        let config = test_config();
        let req1 = authorization_request(&config);
        let req2 = authorization_request(&config);
        assert_ne!(req1.state, req2.state);
    }

    #[test]
    fn test_state_length_and_alphabet() {
        let state = generate_state();
        assert_eq!(state.len(), 22);
        assert!(
            state
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'),
            "state should be URL-safe: {state}"
        );
    }

    #[test]
    fn test_config_with_overrides() {
        let config = test_config()
            .with_auth_url("https://sso.example.com/authorize".parse().unwrap())
            .with_scopes(vec!["openid".into()]);

        assert_eq!(config.auth_url().as_str(), "https://sso.example.com/authorize");
        assert_eq!(config.scopes(), &["openid"]);
        assert_eq!(config.client_id(), "test-client");
    }
}
