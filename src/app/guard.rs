use std::sync::Arc;

use super::routes::Route;
use super::traits::SessionStore;
use super::types::Session;

/// Result of checking a navigation against the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    RedirectToAuth,
}

/// Pure access rule: protected views need a token, everything else is open.
#[must_use]
pub fn can_access(session: &Session, requires_auth: bool) -> Decision {
    if requires_auth && session.token().is_none() {
        Decision::RedirectToAuth
    } else {
        Decision::Allow
    }
}

/// Where a navigation ends up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

/// Evaluates every navigation against the current session.
///
/// Nothing is cached: clearing the session blocks the very next protected
/// navigation. Views already rendered are not interrupted.
pub struct RouteGuard<S> {
    store: Arc<S>,
}

// Manual Clone: avoid derive adding an `S: Clone` bound.
impl<S> Clone for RouteGuard<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S: SessionStore> RouteGuard<S> {
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn can_access(&self, requires_auth: bool) -> Decision {
        can_access(&self.store.get(), requires_auth)
    }

    /// Resolve `location` and apply the guard to it.
    #[must_use]
    pub fn navigate(&self, location: &str) -> Navigation {
        let route = Route::from_path(location);
        match self.can_access(route.requires_auth()) {
            Decision::Allow => Navigation::Render(route),
            Decision::RedirectToAuth => {
                tracing::debug!(%route, "navigation denied, redirecting to auth");
                Navigation::Redirect(Route::Auth)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::store::MemorySessionStore;
    use crate::types::{AccessToken, Profile};

    fn signed_in() -> Session {
        Session::Authenticated {
            token: AccessToken::new("t1"),
            user: Profile::new("1", "A", "B", "a@b.co"),
        }
    }

    #[test]
    fn truth_table() {
        assert_eq!(can_access(&Session::Anonymous, true), Decision::RedirectToAuth);
        assert_eq!(can_access(&signed_in(), true), Decision::Allow);
        assert_eq!(can_access(&Session::Anonymous, false), Decision::Allow);
        assert_eq!(can_access(&signed_in(), false), Decision::Allow);
    }

    #[test]
    fn navigate_redirects_protected_views_when_anonymous() {
        let guard = RouteGuard::new(Arc::new(MemorySessionStore::new()));

        assert_eq!(guard.navigate("/"), Navigation::Redirect(Route::Auth));
        assert_eq!(guard.navigate("/profile"), Navigation::Redirect(Route::Auth));
        assert_eq!(
            guard.navigate("/auth/register?token=x"),
            Navigation::Render(Route::Register)
        );
        assert_eq!(guard.navigate("/nowhere"), Navigation::Render(Route::NotFound));
    }

    #[test]
    fn guard_sees_session_changes_immediately() {
        let store = Arc::new(MemorySessionStore::with_session(signed_in()));
        let guard = RouteGuard::new(Arc::clone(&store));
        assert_eq!(guard.navigate("/profile"), Navigation::Render(Route::Profile));

        store.clear();
        assert_eq!(guard.can_access(true), Decision::RedirectToAuth);
        assert_eq!(guard.navigate("/profile"), Navigation::Redirect(Route::Auth));
    }
}
