use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Session file name in the data directory
const SESSION_FILE: &str = "session.json";

/// On-disk token shape. Key names are fixed; changing them invalidates
/// every existing session file.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct StoredTokens {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

/// Single source of truth for the current authentication tokens.
///
/// The store holds an access/refresh token pair in memory and mirrors it to
/// a session file so the session survives restarts. No expiry inspection
/// happens client-side; token validity is determined only by server
/// responses. Clone is cheap - clones share the same underlying state, so a
/// store can be handed to an `ApiClient` and kept by the caller.
#[derive(Debug, Clone)]
pub struct SessionStore {
    tokens: Arc<RwLock<StoredTokens>>,
    path: Option<PathBuf>,
}

impl SessionStore {
    /// Open the store backed by `data_dir/session.json`, loading any tokens
    /// a previous run left behind.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let path = data_dir.into().join(SESSION_FILE);
        let tokens = Self::load_from(&path);
        Self {
            tokens: Arc::new(RwLock::new(tokens)),
            path: Some(path),
        }
    }

    /// An unpersisted store. Used by tests and callers that manage token
    /// lifetime themselves.
    pub fn in_memory() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(StoredTokens::default())),
            path: None,
        }
    }

    fn load_from(path: &Path) -> StoredTokens {
        if !path.exists() {
            return StoredTokens::default();
        }
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(tokens) => tokens,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Session file is corrupt, starting unauthenticated");
                    StoredTokens::default()
                }
            },
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read session file");
                StoredTokens::default()
            }
        }
    }

    /// True iff an access token is present. Side-effect free.
    pub fn is_authenticated(&self) -> bool {
        self.read().access_token.is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        self.read().access_token.clone()
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.read().refresh_token.clone()
    }

    /// Overwrite both tokens, in memory and on disk. Always succeeds;
    /// persistence failures are logged and the in-memory state stands.
    pub fn set_tokens(&self, access: impl Into<String>, refresh: impl Into<String>) {
        let mut tokens = self.write();
        tokens.access_token = Some(access.into());
        tokens.refresh_token = Some(refresh.into());
        self.persist(&tokens);
    }

    /// Replace only the access token. The refresh endpoint in this contract
    /// does not rotate the refresh token.
    pub(crate) fn set_access_token(&self, access: String) {
        let mut tokens = self.write();
        tokens.access_token = Some(access);
        self.persist(&tokens);
    }

    /// Remove both tokens from memory and disk. Idempotent; clearing an
    /// already-empty store is a no-op.
    pub fn clear_tokens(&self) {
        let mut tokens = self.write();
        tokens.access_token = None;
        tokens.refresh_token = None;
        drop(tokens);

        if let Some(ref path) = self.path {
            if path.exists() {
                if let Err(e) = std::fs::remove_file(path) {
                    warn!(path = %path.display(), error = %e, "Failed to remove session file");
                }
            }
        }
    }

    fn persist(&self, tokens: &StoredTokens) {
        let Some(ref path) = self.path else {
            return;
        };
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                warn!(path = %path.display(), error = %e, "Failed to create session directory");
                return;
            }
        }
        match serde_json::to_string_pretty(tokens) {
            Ok(contents) => {
                if let Err(e) = std::fs::write(path, contents) {
                    warn!(path = %path.display(), error = %e, "Failed to write session file");
                } else {
                    debug!(path = %path.display(), "Session persisted");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize session"),
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, StoredTokens> {
        self.tokens.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, StoredTokens> {
        self.tokens.write().unwrap_or_else(|e| e.into_inner())
    }
}
