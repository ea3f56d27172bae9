// file: src/session/context.rs
// description: explicit session state and the view each state renders
// reference: request-driven state transitions

use crate::error::{PipelineError, Result};
use crate::models::Role;
use serde::Serialize;

/// Identity of an authenticated caller, passed to every gated operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionContext {
    pub username: String,
    pub role: Role,
}

impl SessionContext {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn require_admin(&self) -> Result<()> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(PipelineError::Forbidden)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticated(SessionContext),
}

/// The page a request should be answered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Login,
    Faculty,
    Admin,
}

impl SessionState {
    pub fn login(self, context: SessionContext) -> Self {
        SessionState::Authenticated(context)
    }

    pub fn logout(self) -> Self {
        SessionState::Anonymous
    }

    pub fn context(&self) -> Option<&SessionContext> {
        match self {
            SessionState::Anonymous => None,
            SessionState::Authenticated(ctx) => Some(ctx),
        }
    }

    pub fn require(&self) -> Result<&SessionContext> {
        self.context().ok_or(PipelineError::Unauthorized)
    }

    pub fn view(&self) -> View {
        match self {
            SessionState::Anonymous => View::Login,
            SessionState::Authenticated(ctx) if ctx.is_admin() => View::Admin,
            SessionState::Authenticated(_) => View::Faculty,
        }
    }
}
