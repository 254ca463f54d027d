use std::sync::Arc;

use crate::auth::secret_store::SecretStore;
use crate::services::auth_flow::AuthFlow;

/// Application state shared by every worker.
#[derive(Clone)]
pub struct AppState {
    /// Grant dispatch and token verification
    pub auth: Arc<AuthFlow>,
    /// Signing secret, shared with the rotation scheduler
    pub secrets: Arc<SecretStore>,
}

impl AppState {
    pub fn new(auth: Arc<AuthFlow>, secrets: Arc<SecretStore>) -> Self {
        Self { auth, secrets }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("secrets", &self.secrets)
            .finish_non_exhaustive()
    }
}
