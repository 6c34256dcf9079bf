use reqwest::StatusCode;
use thiserror::Error;

use crate::api::ApiError;

#[derive(Error, Debug)]
pub enum AuthError {
    /// The backend answered but the operation did not succeed.
    #[error("{message}")]
    Failed {
        message: String,
        #[source]
        source: ApiError,
    },

    /// No response at all (timeout, connection refused, ...).
    #[error("Network error: {0}")]
    Transport(reqwest::Error),
}

impl AuthError {
    /// Translate an API failure. Transport failures pass through as-is;
    /// everything else becomes a message, taken from the backend's `detail`
    /// when `surface_detail` is set and falling back to `fallback`.
    pub(crate) fn from_api(err: ApiError, fallback: &str, surface_detail: bool) -> Self {
        match err {
            ApiError::NetworkError(e) if e.status().is_none() => AuthError::Transport(e),
            other => {
                let message = surface_detail
                    .then(|| other.detail())
                    .flatten()
                    .unwrap_or_else(|| fallback.to_string());
                AuthError::Failed { message, source: other }
            }
        }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AuthError::Failed { source, .. } => source.status(),
            AuthError::Transport(e) => e.status(),
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, AuthError::Transport(_))
    }
}
