#![doc = include_str!("../README.md")]

pub mod api;
pub mod app;
pub mod error;
#[cfg(feature = "linkedin")]
pub mod linkedin;
pub mod types;
pub mod validation;

// Re-exports for convenient access
pub use api::{ApiConfig, AuthApi, AuthResponse, MessageResponse, Registration};
pub use error::Error;
#[cfg(feature = "linkedin")]
pub use linkedin::{AuthorizationRequest, LinkedInConfig, authorization_request, generate_state};
pub use types::{AccessToken, Profile, Role, UserId};
pub use validation::{ValidationError, is_strong_password, is_valid_email};
