// file: src/session/gateway.rs
// description: credential checks and admin-gated account creation
// reference: internal auth flow

use crate::database::{Database, UserStore};
use crate::error::{PipelineError, Result};
use crate::models::Role;
use crate::session::context::SessionContext;
use crate::utils::Validator;
use tracing::{info, warn};

pub struct AuthGateway<'a> {
    users: UserStore<'a>,
}

impl<'a> AuthGateway<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self {
            users: UserStore::new(db),
        }
    }

    /// Resolve credentials to a session, or `AuthenticationFailed`.
    pub fn login(&self, username: &str, password: &str) -> Result<SessionContext> {
        match self.users.authenticate(username, password)? {
            Some(role) => {
                info!("User '{}' logged in as {}", username, role);
                Ok(SessionContext::new(username, role))
            }
            None => {
                warn!("Rejected login for '{}'", username);
                Err(PipelineError::AuthenticationFailed)
            }
        }
    }

    /// Admin-only. Existing usernames are ignored without error.
    pub fn add_user(
        &self,
        actor: &SessionContext,
        username: &str,
        password: &str,
        role: Role,
    ) -> Result<bool> {
        actor.require_admin()?;
        self.register(username, password, role)
    }

    /// Unchecked variant for the command line and startup bootstrap.
    pub fn register(&self, username: &str, password: &str, role: Role) -> Result<bool> {
        Validator::validate_username(username)?;
        Validator::validate_password(password)?;
        self.users.add_user(username, password, role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::SchemaManager;
    use tempfile::{TempDir, tempdir};

    fn setup() -> (TempDir, Database) {
        let dir = tempdir().unwrap();
        let db = Database::at(dir.path().join("users.db")).unwrap();
        SchemaManager::new(&db).initialize().unwrap();
        (dir, db)
    }

    #[test]
    fn test_login_flow() {
        let (_dir, db) = setup();
        let gateway = AuthGateway::new(&db);

        gateway.register("alice", "pw1", Role::Faculty).unwrap();
        gateway.register("alice", "pw2", Role::Faculty).unwrap();

        assert!(matches!(
            gateway.login("alice", "pw2"),
            Err(PipelineError::AuthenticationFailed)
        ));
        let ctx = gateway.login("alice", "pw1").unwrap();
        assert_eq!(ctx, SessionContext::new("alice", Role::Faculty));
    }

    #[test]
    fn test_add_user_requires_admin() {
        let (_dir, db) = setup();
        let gateway = AuthGateway::new(&db);

        let faculty = SessionContext::new("alice", Role::Faculty);
        let err = gateway
            .add_user(&faculty, "bob", "pw", Role::Faculty)
            .unwrap_err();
        assert!(matches!(err, PipelineError::Forbidden));

        let admin = SessionContext::new("root", Role::Admin);
        assert!(gateway.add_user(&admin, "bob", "pw", Role::Faculty).unwrap());
        assert_eq!(gateway.login("bob", "pw").unwrap().role, Role::Faculty);
    }

    #[test]
    fn test_register_validates_input() {
        let (_dir, db) = setup();
        let gateway = AuthGateway::new(&db);

        assert!(gateway.register("", "pw", Role::Faculty).is_err());
        assert!(gateway.register("bad\tname", "pw", Role::Faculty).is_err());
        assert!(gateway.register("dr smith", "pw", Role::Faculty).unwrap());
        assert!(gateway.register("carol", "", Role::Faculty).is_err());
    }
}
