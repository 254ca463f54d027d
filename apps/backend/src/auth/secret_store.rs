//! Process-wide holder of the current token signing secret.
//!
//! The current secret sits behind an `ArcSwap`: readers take a cheap
//! snapshot of the pointer, rotation publishes a fully built replacement in
//! one store. Prior secrets are dropped, which is what invalidates every
//! token issued under them.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use rand::rngs::OsRng;
use rand::TryRngCore;
use tracing::info;

use crate::errors::{DomainError, InfraErrorKind};

/// Size of generated secrets in bytes (HS256 key length).
pub const SECRET_LEN: usize = 32;

/// Opaque symmetric signing key. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct SigningSecret(Vec<u8>);

impl SigningSecret {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SigningSecret([{} bytes])", self.0.len())
    }
}

/// Derives replacement secrets for rotation.
pub trait SecretSource: Send + Sync {
    fn next_secret(&self) -> Result<SigningSecret, DomainError>;
}

/// Draws fresh secrets from the operating system RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandomSecretSource;

impl SecretSource for OsRandomSecretSource {
    fn next_secret(&self) -> Result<SigningSecret, DomainError> {
        let mut bytes = vec![0u8; SECRET_LEN];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
            DomainError::infra(
                InfraErrorKind::SecretSource,
                format!("OS random source failed: {e}"),
            )
        })?;
        Ok(SigningSecret(bytes))
    }
}

pub struct SecretStore {
    current: ArcSwap<SigningSecret>,
    generation: AtomicU64,
    source: Arc<dyn SecretSource>,
}

impl SecretStore {
    /// Store seeded with an explicit initial secret (generation 0).
    pub fn new(initial: SigningSecret, source: Arc<dyn SecretSource>) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
            generation: AtomicU64::new(0),
            source,
        }
    }

    /// Store whose initial secret is drawn from `source`.
    pub fn generate(source: Arc<dyn SecretSource>) -> Result<Self, DomainError> {
        let initial = source.next_secret()?;
        Ok(Self::new(initial, source))
    }

    /// Secret in effect right now.
    pub fn current(&self) -> Arc<SigningSecret> {
        self.current.load_full()
    }

    /// Number of successful rotations since construction.
    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Replace the current secret with a freshly derived one.
    ///
    /// On a source failure the current secret and generation are untouched.
    /// Only the scheduler calls this, so rotations never race each other.
    pub fn rotate(&self) -> Result<u64, DomainError> {
        let next = self.source.next_secret()?;
        self.current.store(Arc::new(next));
        let generation = self.generation.fetch_add(1, Ordering::AcqRel) + 1;
        info!(generation, "signing secret rotated");
        Ok(generation)
    }
}

impl fmt::Debug for SecretStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretStore")
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}
