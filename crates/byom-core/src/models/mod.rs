//! Wire types exchanged with the BYOM AI Platform backend.
//!
//! - `User`, `AuthSession`: identity and the token payload from login/register
//! - `Provider`, `NewProvider`, `ProviderUpdate`, `ProviderTest`: model provider administration

pub mod provider;
pub mod timestamp;
pub mod user;

pub use provider::{NewProvider, Provider, ProviderTest, ProviderType, ProviderUpdate};
pub use user::{AuthProvider, AuthSession, User};
