// file: src/server/mod.rs
// description: web interface startup and module exports
// reference: https://docs.rs/axum/0.7/axum/fn.serve.html

pub mod error;
pub mod handlers;
pub mod pages;
pub mod router;
pub mod state;

pub use error::ApiError;
pub use router::build_router;
pub use state::AppState;

use crate::config::Config;
use crate::database::{Database, SchemaManager};
use crate::error::Result;
use crate::models::Role;
use crate::session::AuthGateway;
use tracing::info;

/// Open the store, create missing tables and the configured admin account.
pub fn prepare_database(config: &Config) -> Result<Database> {
    let db = Database::new(&config.database)?;
    SchemaManager::new(&db).initialize()?;

    if let Some((username, password)) = config.bootstrap_admin()
        && AuthGateway::new(&db).register(username, password, Role::Admin)?
    {
        info!("Created bootstrap admin '{}'", username);
    }

    Ok(db)
}

pub async fn serve(config: &Config) -> Result<()> {
    let db = prepare_database(config)?;
    let state = AppState::new(db, config.max_upload_bytes());
    let app = build_router(state);

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::UserStore;
    use tempfile::tempdir;

    #[test]
    fn prepare_database_creates_schema_and_admin() {
        let dir = tempdir().unwrap();
        let mut config = Config::default_config();
        config.database.path = dir.path().join("data/users.db");
        config.auth.bootstrap_admin_username = Some("root".to_string());
        config.auth.bootstrap_admin_password = Some("toor".to_string());

        let db = prepare_database(&config).unwrap();
        assert!(SchemaManager::new(&db).verify_schema().unwrap());
        assert_eq!(
            UserStore::new(&db).authenticate("root", "toor").unwrap(),
            Some(Role::Admin)
        );

        // Second start leaves the existing account alone.
        prepare_database(&config).unwrap();
        assert_eq!(UserStore::new(&db).list().unwrap().len(), 1);
    }
}
