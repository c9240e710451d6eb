use std::sync::{PoisonError, RwLock};

use super::traits::SessionStore;
use super::types::Session;
use crate::types::{AccessToken, Profile};

/// Process-lifetime session kept in memory.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Session>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing session, e.g. one restored by the host application.
    #[must_use]
    pub fn with_session(session: Session) -> Self {
        Self {
            inner: RwLock::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Session {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn set(&self, token: AccessToken, user: Profile) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) =
            Session::Authenticated { token, user };
    }

    fn clear(&self) {
        *self.inner.write().unwrap_or_else(PoisonError::into_inner) = Session::Anonymous;
    }

    fn update_user_if(
        &self,
        token: &AccessToken,
        update: impl FnOnce(Profile) -> Profile,
    ) -> bool {
        let mut session = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        match std::mem::take(&mut *session) {
            Session::Authenticated { token: current, user } if current == *token => {
                *session = Session::Authenticated {
                    token: current,
                    user: update(user),
                };
                true
            }
            other => {
                *session = other;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::types::Role;

    fn user() -> Profile {
        Profile::new("u1", "Asha", "Rao", "asha@example.com").with_role(Role::Professional)
    }

    #[test]
    fn starts_anonymous() {
        assert_eq!(MemorySessionStore::new().get(), Session::Anonymous);
    }

    #[test]
    fn set_then_get_returns_exactly_what_was_set() {
        let store = MemorySessionStore::new();
        store.set(AccessToken::new("t1"), user());

        assert_eq!(
            store.get(),
            Session::Authenticated {
                token: AccessToken::new("t1"),
                user: user(),
            }
        );
    }

    #[test]
    fn set_replaces_previous_session() {
        let store = MemorySessionStore::new();
        store.set(AccessToken::new("t1"), user());
        let other = Profile::new("u2", "Ravi", "K", "ravi@example.com");
        store.set(AccessToken::new("t2"), other.clone());

        let session = store.get();
        assert_eq!(session.token().map(AccessToken::as_str), Some("t2"));
        assert_eq!(session.user(), Some(&other));
    }

    #[test]
    fn clear_returns_to_anonymous() {
        let store = MemorySessionStore::with_session(Session::Authenticated {
            token: AccessToken::new("t1"),
            user: user(),
        });
        store.clear();

        let session = store.get();
        assert!(session.token().is_none());
        assert!(session.user().is_none());
    }

    #[test]
    fn update_user_if_rewrites_matching_session() {
        let store = MemorySessionStore::new();
        store.set(AccessToken::new("t1"), user());

        assert!(store.update_user_if(&AccessToken::new("t1"), |u| u.with_role(Role::Company)));

        let session = store.get();
        assert_eq!(session.token().map(AccessToken::as_str), Some("t1"));
        assert_eq!(session.user().map(|u| u.role), Some(Role::Company));
    }

    #[test]
    fn update_user_if_leaves_other_sessions_alone() {
        let store = MemorySessionStore::new();
        assert!(!store.update_user_if(&AccessToken::new("t1"), |u| u.with_role(Role::Admin)));
        assert_eq!(store.get(), Session::Anonymous);

        let other = Profile::new("u2", "Ravi", "K", "ravi@example.com");
        store.set(AccessToken::new("t2"), other.clone());
        assert!(!store.update_user_if(&AccessToken::new("t1"), |u| u.with_role(Role::Admin)));
        assert_eq!(store.get().user(), Some(&other));
    }

    #[test]
    fn concurrent_writers_never_mix_records() {
        let store = Arc::new(MemorySessionStore::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for _ in 0..100 {
                        let id = format!("u{i}");
                        store.set(
                            AccessToken::new(format!("t{i}")),
                            Profile::new(id.as_str(), "N", "N", "n@example.com"),
                        );
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let session = store.get();
        let token = session.token().unwrap().as_str().trim_start_matches('t');
        let user = session.user().unwrap().id.to_string();
        assert_eq!(user.trim_start_matches('u'), token);
    }
}
