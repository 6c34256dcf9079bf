use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use super::storage::TokenStorage;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Unauthenticated,
    Authenticated,
}

/// In-memory view of the durable slot. `Unloaded` until the first read so
/// startup never touches storage eagerly.
enum Slot {
    Unloaded,
    Loaded(Option<String>),
}

/// Owner of the current bearer token.
///
/// The in-memory slot and its durable backing are mutated together under
/// one lock, so a read after `set_token` returns always observes that
/// token and memory never disagrees with the order writes were made in.
/// Persistence failures are logged and never reach the caller: the
/// in-memory value is authoritative for the running process.
pub struct CredentialStore {
    storage: Box<dyn TokenStorage>,
    slot: Mutex<Slot>,
}

impl CredentialStore {
    pub fn new(storage: Box<dyn TokenStorage>) -> Self {
        Self {
            storage,
            slot: Mutex::new(Slot::Unloaded),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replace the current token, persisting it before returning.
    pub fn set_token(&self, token: impl Into<String>) {
        let token = token.into();
        let mut slot = self.lock();
        if let Err(e) = self.storage.save(&token) {
            warn!(error = %e, "Failed to persist token");
        }
        *slot = Slot::Loaded(Some(token));
        debug!("Token stored");
    }

    /// Forget the current token. Clearing an empty store is a no-op.
    pub fn clear_token(&self) {
        let mut slot = self.lock();
        let had_token = !matches!(*slot, Slot::Loaded(None));
        if let Err(e) = self.storage.remove() {
            warn!(error = %e, "Failed to remove persisted token");
        }
        *slot = Slot::Loaded(None);
        if had_token {
            info!("Token cleared");
        }
    }

    /// Current token, loading the persisted one on first access.
    pub fn token(&self) -> Option<String> {
        let mut slot = self.lock();
        if let Slot::Loaded(ref token) = *slot {
            return token.clone();
        }

        let token = match self.storage.load() {
            Ok(token) => token,
            Err(e) => {
                warn!(error = %e, "Failed to load persisted token, starting unauthenticated");
                None
            }
        };
        debug!(restored = token.is_some(), "Credential store initialized");
        *slot = Slot::Loaded(token.clone());
        token
    }

    pub fn state(&self) -> SessionState {
        if self.token().is_some() {
            SessionState::Authenticated
        } else {
            SessionState::Unauthenticated
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.state() == SessionState::Authenticated
    }
}
