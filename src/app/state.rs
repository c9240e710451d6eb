use std::sync::Arc;
#[cfg(feature = "linkedin")]
use std::sync::Mutex;

use super::config::AppConfig;
use super::guard::RouteGuard;
use super::traits::{Notifier, SessionStore};
use super::types::Session;
use crate::api::AuthApi;
#[cfg(feature = "linkedin")]
use crate::linkedin::LinkedInConfig;
use crate::types::Profile;

/// Entry point for the authentication flows.
///
/// Cheap to clone; clones share the gateway, the session store and the notifier.
pub struct AuthFlows<S, N> {
    pub(super) api: Arc<AuthApi>,
    pub(super) store: Arc<S>,
    pub(super) notifier: Arc<N>,
    #[cfg(feature = "linkedin")]
    pub(super) linkedin: Option<Arc<LinkedInConfig>>,
    /// `state` issued by the last LinkedIn authorization request, awaiting its callback.
    #[cfg(feature = "linkedin")]
    pub(super) pending_state: Arc<Mutex<Option<String>>>,
}

// Manual Clone: avoid derive adding `S: Clone, N: Clone` bounds.
impl<S, N> Clone for AuthFlows<S, N> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            store: self.store.clone(),
            notifier: self.notifier.clone(),
            #[cfg(feature = "linkedin")]
            linkedin: self.linkedin.clone(),
            #[cfg(feature = "linkedin")]
            pending_state: self.pending_state.clone(),
        }
    }
}

impl<S: SessionStore, N: Notifier> AuthFlows<S, N> {
    #[must_use]
    pub fn new(config: AppConfig, store: Arc<S>, notifier: Arc<N>) -> Self {
        Self {
            api: Arc::new(config.api),
            store,
            notifier,
            #[cfg(feature = "linkedin")]
            linkedin: config.linkedin.map(Arc::new),
            #[cfg(feature = "linkedin")]
            pending_state: Arc::new(Mutex::new(None)),
        }
    }

    /// Guard sharing this instance's session store.
    #[must_use]
    pub fn guard(&self) -> RouteGuard<S> {
        RouteGuard::new(self.store.clone())
    }

    #[must_use]
    pub fn session(&self) -> Session {
        self.store.get()
    }

    /// Profile of the signed-in user, for the profile view.
    #[must_use]
    pub fn profile(&self) -> Option<Profile> {
        self.store.get().user().cloned()
    }

    #[must_use]
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }
}
