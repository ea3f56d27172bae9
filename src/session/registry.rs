// file: src/session/registry.rs
// description: in-memory registry of issued session tokens
// reference: https://docs.rs/sha2

use crate::session::context::{SessionContext, SessionState};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::sync::Mutex;
use tracing::debug;
use uuid::Uuid;

/// Maps token digests to session contexts. Raw tokens are never stored.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: Mutex<HashMap<String, SessionContext>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new session and return the bearer token for it.
    pub fn issue(&self, context: SessionContext) -> String {
        let token = Uuid::new_v4().simple().to_string();
        debug!("Issued session for '{}'", context.username);
        self.lock().insert(hash_token(&token), context);
        token
    }

    pub fn resolve(&self, token: &str) -> SessionState {
        match self.lock().get(&hash_token(token)) {
            Some(ctx) => SessionState::Authenticated(ctx.clone()),
            None => SessionState::Anonymous,
        }
    }

    pub fn revoke(&self, token: &str) -> bool {
        self.lock().remove(&hash_token(token)).is_some()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // The map stays consistent even if a holder panicked.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, SessionContext>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
