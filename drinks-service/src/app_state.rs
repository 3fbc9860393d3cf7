use std::sync::Arc;

use common_auth::{AuthGuard, JwtVerifier};

use crate::store::DrinkStore;

/// Shared application state used by handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) store: Arc<DrinkStore>,
    pub(crate) guard: AuthGuard,
}

impl AppState {
    pub fn new(store: Arc<DrinkStore>, verifier: Arc<JwtVerifier>) -> Self {
        Self { store, guard: AuthGuard::new(verifier) }
    }

    pub fn guard(&self) -> &AuthGuard {
        &self.guard
    }

    pub fn store(&self) -> &Arc<DrinkStore> {
        &self.store
    }
}
