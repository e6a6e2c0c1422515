//! Persisted bearer token.
//!
//! SYSTEM CONTEXT
//! ==============
//! One string value under a fixed key. The browser keeps it in
//! `localStorage`, the CLI in a file; tests use memory. Nothing here expires
//! the token, and reads never fail loudly: an unreadable value is simply
//! "no token".

#[cfg(test)]
#[path = "credentials_test.rs"]
mod credentials_test;

use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Key the token is stored under.
pub const STORAGE_KEY: &str = "jwt";

/// Errors from persisting or clearing the token.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// The backing storage is not reachable (no window, no config dir, ...).
    #[error("credential storage unavailable: {0}")]
    Unavailable(String),

    /// Writing or removing the stored value failed.
    #[error("credential storage write failed: {0}")]
    Write(String),
}

/// Synchronous get/set/clear over a single persisted token.
pub trait CredentialStore {
    /// Current token, or `None` when absent or unreadable.
    fn get(&self) -> Option<String>;

    /// Persist `token`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] if the backing storage rejects the write.
    fn set(&self, token: &str) -> Result<(), CredentialError>;

    /// Remove the stored token. Clearing an absent token succeeds.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError`] if the backing storage rejects the removal.
    fn clear(&self) -> Result<(), CredentialError>;
}

/// Normalize a raw stored value into a bare token.
///
/// Older builds of the web client stored `JSON.stringify(jwt)`, so a value
/// wrapped in double quotes is unwrapped. Blank values read as absent.
#[must_use]
pub fn normalize_stored(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let unquoted = if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        serde_json::from_str::<String>(trimmed).unwrap_or_else(|_| trimmed[1..trimmed.len() - 1].to_owned())
    } else {
        trimmed.to_owned()
    };
    let token = unquoted.trim();
    if token.is_empty() { None } else { Some(token.to_owned()) }
}

// =============================================================================
// MEMORY
// =============================================================================

/// Token held in process memory only.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    token: Mutex<Option<String>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self { token: Mutex::new(Some(token.into())) }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<String> {
        let guard = self.token.lock().ok()?;
        guard.as_deref().and_then(normalize_stored)
    }

    fn set(&self, token: &str) -> Result<(), CredentialError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|e| CredentialError::Write(e.to_string()))?;
        *guard = Some(token.to_owned());
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|e| CredentialError::Write(e.to_string()))?;
        *guard = None;
        Ok(())
    }
}

// =============================================================================
// FILE
// =============================================================================

/// Token persisted as the sole contents of one file.
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self) -> Option<String> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        normalize_stored(&raw)
    }

    fn set(&self, token: &str) -> Result<(), CredentialError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| CredentialError::Write(e.to_string()))?;
            }
        }
        std::fs::write(&self.path, token).map_err(|e| CredentialError::Write(e.to_string()))?;
        tracing::debug!(path = %self.path.display(), "stored session token");
        Ok(())
    }

    fn clear(&self) -> Result<(), CredentialError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(CredentialError::Write(e.to_string())),
        }
    }
}
