//! Session and credential handling.
//!
//! This module provides:
//! - `CredentialStore`: the single owner of the current bearer token
//! - `TokenStorage` backends: file, OS keychain, memory
//! - `RequestAuthorizer` / `ResponseAuditor`: the interceptors that attach
//!   the token and end the session on a 401
//! - `SessionService`: login, register, current user, logout
//!
//! Tokens carry no client-side expiry; a session ends on logout or when the
//! server rejects the token.

pub mod auditor;
pub mod authorizer;
pub mod credentials;
pub mod error;
pub mod service;
pub mod storage;

pub use auditor::{Navigator, ResponseAuditor};
pub use authorizer::RequestAuthorizer;
pub use credentials::{CredentialStore, SessionState};
pub use error::AuthError;
pub use service::SessionService;
pub use storage::{FileTokenStorage, KeyringTokenStorage, MemoryTokenStorage, TokenStorage};
