/// Views of the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Login / sign-up entry point.
    Auth,
    LinkedInCallback,
    RoleSelection,
    Register,
    ForgotPassword,
    ResetPassword,
    Dashboard,
    Profile,
    NotFound,
}

impl Route {
    pub const ALL: [Self; 9] = [
        Self::Auth,
        Self::LinkedInCallback,
        Self::RoleSelection,
        Self::Register,
        Self::ForgotPassword,
        Self::ResetPassword,
        Self::Dashboard,
        Self::Profile,
        Self::NotFound,
    ];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Auth => "/auth",
            Self::LinkedInCallback => "/linkedin/callback",
            Self::RoleSelection => "/auth/role-selection",
            Self::Register => "/auth/register",
            Self::ForgotPassword => "/forgot-password",
            Self::ResetPassword => "/reset-password",
            Self::Dashboard => "/",
            Self::Profile => "/profile",
            Self::NotFound => "/404",
        }
    }

    /// Only the dashboard and profile are behind the guard.
    #[must_use]
    pub fn requires_auth(self) -> bool {
        matches!(self, Self::Dashboard | Self::Profile)
    }

    /// Resolve a location such as `/auth/register?token=abc`.
    ///
    /// Query string and fragment are ignored; a trailing `/` is tolerated.
    #[must_use]
    pub fn from_path(location: &str) -> Self {
        let path = location
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let path = match path.trim_end_matches('/') {
            "" => "/",
            p => p,
        };
        Self::ALL
            .into_iter()
            .find(|route| *route != Self::NotFound && route.path() == path)
            .unwrap_or(Self::NotFound)
    }
}

impl std::fmt::Display for Route {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path())
    }
}

/// Value of `name` in the query string of `location`, percent-decoded.
#[must_use]
pub fn query_param(location: &str, name: &str) -> Option<String> {
    let (_, query) = location.split_once('?')?;
    let query = query.split('#').next().unwrap_or_default();
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
