use super::types::{NotificationKind, Session};
use crate::types::{AccessToken, Profile};

/// Holder of the current [`Session`].
///
/// Updates are whole-record: token and user are always set or cleared together.
/// Swap in a fake implementation to drive flows in tests.
///
/// # Example
///
/// ```rust,ignore
/// struct KeyringStore { /* ... */ }
///
/// impl SessionStore for KeyringStore {
///     fn get(&self) -> Session { self.load().unwrap_or_default() }
///     fn set(&self, token: AccessToken, user: Profile) { self.save(token, user) }
///     fn clear(&self) { self.wipe() }
///     fn update_user_if(
///         &self,
///         token: &AccessToken,
///         update: impl FnOnce(Profile) -> Profile,
///     ) -> bool {
///         self.with_lock(|s| s.replace_user_if(token, update))
///     }
/// }
/// ```
pub trait SessionStore: Send + Sync + 'static {
    /// Snapshot of the current session.
    fn get(&self) -> Session;

    /// Replace the session with an authenticated one.
    fn set(&self, token: AccessToken, user: Profile);

    /// Return to the anonymous state.
    fn clear(&self);

    /// Rewrite the stored user, but only while the session still holds `token`.
    ///
    /// Check and write must happen under one lock so a concurrent `clear` or `set`
    /// is never overwritten. Returns `false` when the session had moved on.
    fn update_user_if(
        &self,
        token: &AccessToken,
        update: impl FnOnce(Profile) -> Profile,
    ) -> bool;
}

/// Sink for user-facing messages.
///
/// Fire-and-forget: implementations must not block and have no way to report failure.
pub trait Notifier: Send + Sync + 'static {
    fn notify(&self, message: String, kind: NotificationKind);
}
