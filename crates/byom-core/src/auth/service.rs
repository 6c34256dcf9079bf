use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::{AuthError, CredentialStore, Navigator, RequestAuthorizer, ResponseAuditor, SessionState};
use crate::api::ApiClient;
use crate::config::Config;
use crate::models::{AuthSession, User};

const LOGIN_FAILED: &str = "login failed";
const REGISTRATION_FAILED: &str = "registration failed";
const CURRENT_USER_FAILED: &str = "failed to get user info";

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    email: &'a str,
    password: &'a str,
    workspace_name: &'a str,
}

/// Login, registration, identity lookup and logout against `/auth`.
///
/// Successful login or registration replaces the stored token with the
/// one the backend issued. Logout always leaves the store empty.
#[derive(Clone)]
pub struct SessionService {
    api: ApiClient,
    store: Arc<CredentialStore>,
}

impl SessionService {
    /// Wrap an existing client. The client is expected to carry a
    /// [`RequestAuthorizer`] and [`ResponseAuditor`] over the same store.
    pub fn new(api: ApiClient, store: Arc<CredentialStore>) -> Self {
        Self { api, store }
    }

    /// Build the authorizing client pipeline around `store`.
    pub fn connect(
        base_url: &str,
        timeout: Duration,
        store: Arc<CredentialStore>,
        navigator: Arc<dyn Navigator>,
    ) -> Result<Self> {
        let api = ApiClient::builder(base_url)
            .timeout(timeout)
            .request_interceptor(Arc::new(RequestAuthorizer::new(store.clone())))
            .response_interceptor(Arc::new(ResponseAuditor::new(store.clone(), navigator)))
            .build()?;
        Ok(Self::new(api, store))
    }

    pub fn from_config(config: &Config, navigator: Arc<dyn Navigator>) -> Result<Self> {
        let store = Arc::new(CredentialStore::new(config.token_storage()?));
        Self::connect(&config.api_base_url(), config.request_timeout(), store, navigator)
    }

    /// Client sharing this session's pipeline, for other endpoints.
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn store(&self) -> &Arc<CredentialStore> {
        &self.store
    }

    pub fn state(&self) -> SessionState {
        self.store.state()
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.is_authenticated()
    }

    pub fn set_token(&self, token: impl Into<String>) {
        self.store.set_token(token);
    }

    pub fn clear_token(&self) {
        self.store.clear_token();
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<AuthSession, AuthError> {
        let session: AuthSession = self
            .api
            .post_json("/auth/login", &LoginRequest { email, password })
            .await
            .map_err(|e| AuthError::from_api(e, LOGIN_FAILED, true))?;

        self.store.set_token(session.access_token.as_str());
        info!(user_id = session.user.id, "Logged in");
        Ok(session)
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        workspace_name: &str,
    ) -> Result<AuthSession, AuthError> {
        let body = RegisterRequest {
            email,
            password,
            workspace_name,
        };
        let session: AuthSession = self
            .api
            .post_json("/auth/register", &body)
            .await
            .map_err(|e| AuthError::from_api(e, REGISTRATION_FAILED, true))?;

        self.store.set_token(session.access_token.as_str());
        info!(user_id = session.user.id, workspace = workspace_name, "Registered");
        Ok(session)
    }

    /// Fetch the identity behind the current token. Backend detail is not
    /// surfaced for this call.
    pub async fn current_user(&self) -> Result<User, AuthError> {
        let user = self
            .api
            .get_json("/auth/me")
            .await
            .map_err(|e| AuthError::from_api(e, CURRENT_USER_FAILED, false))?;
        debug!("Fetched current user");
        Ok(user)
    }

    /// Tell the backend the session is over, then forget the token no
    /// matter how that went.
    pub async fn logout(&self) {
        if let Err(e) = self.api.post_empty("/auth/logout").await {
            warn!(error = %e, "Logout request failed, clearing local session anyway");
        }
        self.store.clear_token();
        info!("Logged out");
    }
}
