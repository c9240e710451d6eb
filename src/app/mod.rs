//! Authentication flows for a UI shell.
//!
//! Each flow validates its input, calls the API, updates the session and
//! reports the result through a [`Notifier`]. Flows never return errors: they
//! return an [`Outcome`] telling the UI where to go next.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use trikona_auth::app::{AppConfig, AuthFlows, MemorySessionStore, Navigation, TracingNotifier};
//!
//! let flows = AuthFlows::new(
//!     AppConfig::from_env()?,
//!     Arc::new(MemorySessionStore::new()),
//!     Arc::new(TracingNotifier),
//! );
//!
//! let outcome = flows.login("asha@example.com", &password).await;
//!
//! match flows.guard().navigate("/profile") {
//!     Navigation::Render(route) => { /* draw the view */ }
//!     Navigation::Redirect(route) => { /* go to route.path() */ }
//! }
//! ```

mod config;
mod error;
mod flows;
mod guard;
mod notify;
mod routes;
mod state;
mod store;
mod traits;
mod types;

pub use config::AppConfig;
pub use error::FlowError;
pub use flows::{LinkedInCallback, RegistrationForm};
pub use guard::{Decision, Navigation, RouteGuard, can_access};
pub use notify::{ChannelNotifier, MemoryNotifier, TracingNotifier};
pub use routes::{Route, query_param};
pub use state::AuthFlows;
pub use store::MemorySessionStore;
pub use traits::{Notifier, SessionStore};
pub use types::{Notification, NotificationKind, Outcome, Session};
