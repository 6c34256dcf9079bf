use std::sync::Arc;

use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Request;
use tracing::{debug, warn};

use super::CredentialStore;
use crate::api::RequestInterceptor;

/// Stamps outbound requests with `Authorization: Bearer <token>` when a
/// token is present. Read-only with respect to the store.
pub struct RequestAuthorizer {
    store: Arc<CredentialStore>,
}

impl RequestAuthorizer {
    pub fn new(store: Arc<CredentialStore>) -> Self {
        Self { store }
    }

    fn bearer(token: &str) -> Option<HeaderValue> {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token)).ok()?;
        value.set_sensitive(true);
        Some(value)
    }
}

impl RequestInterceptor for RequestAuthorizer {
    fn intercept(&self, request: &mut Request) {
        let Some(token) = self.store.token() else {
            debug!(path = request.url().path(), "No credential, sending unauthenticated");
            return;
        };

        match Self::bearer(&token) {
            Some(value) => {
                request.headers_mut().insert(AUTHORIZATION, value);
            }
            // A token that cannot be a header value is never sent
            None => warn!("Stored token is not a valid header value, sending unauthenticated"),
        }
    }
}
