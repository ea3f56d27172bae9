// file: src/server/state.rs
// description: shared request state and session token extraction
// reference: https://docs.rs/axum/0.7/axum/extract/struct.State.html

use crate::database::Database;
use crate::pipeline::UploadPipeline;
use crate::server::error::ApiError;
use crate::session::{SessionContext, SessionRegistry, SessionState};
use axum::http::HeaderMap;
use axum::http::header::{AUTHORIZATION, COOKIE};
use std::sync::Arc;

pub const SESSION_COOKIE: &str = "co_session";

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionRegistry>,
    pub pipeline: Arc<UploadPipeline>,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(db: Database, max_upload_bytes: usize) -> Self {
        Self {
            sessions: Arc::new(SessionRegistry::new()),
            pipeline: Arc::new(UploadPipeline::new(db, max_upload_bytes)),
            max_upload_bytes,
        }
    }

    pub fn database(&self) -> &Database {
        self.pipeline.database()
    }

    pub fn session(&self, headers: &HeaderMap) -> SessionState {
        match session_token(headers) {
            Some(token) => self.sessions.resolve(&token),
            None => SessionState::Anonymous,
        }
    }

    pub fn require_session(&self, headers: &HeaderMap) -> Result<SessionContext, ApiError> {
        match self.session(headers) {
            SessionState::Authenticated(ctx) => Ok(ctx),
            SessionState::Anonymous => Err(ApiError::Unauthorized),
        }
    }

    pub fn require_admin(&self, headers: &HeaderMap) -> Result<SessionContext, ApiError> {
        let ctx = self.require_session(headers)?;
        ctx.require_admin()?;
        Ok(ctx)
    }
}

/// Bearer header first, then the session cookie.
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(token.trim().to_string());
    }

    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}

pub fn session_cookie(token: &str) -> String {
    format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn token_from_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("theme=dark; co_session=abc123; other=1"),
        );
        assert_eq!(session_token(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn bearer_wins_over_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("co_session=cookie"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer header"));
        assert_eq!(session_token(&headers).as_deref(), Some("header"));
    }

    #[test]
    fn missing_or_empty_token() {
        let mut headers = HeaderMap::new();
        assert!(session_token(&headers).is_none());

        headers.insert(COOKIE, HeaderValue::from_static("co_session="));
        assert!(session_token(&headers).is_none());
    }
}
