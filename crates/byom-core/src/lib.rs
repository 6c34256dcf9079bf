//! Client library for the BYOM AI Platform.
//!
//! The interesting part is the session layer in [`auth`]: a single
//! [`auth::CredentialStore`] owns the bearer token, a request interceptor
//! stamps it onto every outbound call, and a response interceptor ends the
//! session the moment the server answers 401. [`auth::SessionService`] wires
//! these together with an [`api::ApiClient`] and exposes login, register,
//! current user and logout.

pub mod api;
pub mod auth;
pub mod config;
pub mod models;

pub use api::{ApiClient, ApiError};
pub use auth::{AuthError, CredentialStore, Navigator, SessionService, SessionState};
pub use config::{Config, TokenStorageKind};
