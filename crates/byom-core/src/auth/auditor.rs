use std::sync::Arc;

use reqwest::StatusCode;
use tracing::warn;

use super::CredentialStore;
use crate::api::{ResponseInfo, ResponseInterceptor};

/// Collaborator that takes the application to its unauthenticated entry
/// point (the login screen, a "please log in" prompt, ...).
pub trait Navigator: Send + Sync {
    fn to_unauthenticated(&self);
}

impl<F> Navigator for F
where
    F: Fn() + Send + Sync,
{
    fn to_unauthenticated(&self) {
        self()
    }
}

/// Ends the session the moment the server rejects a credential.
///
/// Each rejected response clears the store and then navigates, once.
/// Navigation does not depend on the clear succeeding.
pub struct ResponseAuditor {
    store: Arc<CredentialStore>,
    navigator: Arc<dyn Navigator>,
}

impl ResponseAuditor {
    pub fn new(store: Arc<CredentialStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self { store, navigator }
    }

    pub fn is_rejection(status: Option<StatusCode>) -> bool {
        status == Some(StatusCode::UNAUTHORIZED)
    }
}

impl ResponseInterceptor for ResponseAuditor {
    fn intercept(&self, response: &ResponseInfo<'_>) {
        if !Self::is_rejection(response.status) {
            return;
        }
        warn!(
            method = %response.method,
            path = response.url.path(),
            "Credential rejected by server, ending session"
        );
        self.store.clear_token();
        self.navigator.to_unauthenticated();
    }
}
