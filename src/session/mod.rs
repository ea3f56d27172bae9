// file: src/session/mod.rs
// description: session state, token registry and auth gateway exports
// reference: internal module structure

pub mod context;
pub mod gateway;
pub mod registry;

pub use context::{SessionContext, SessionState, View};
pub use gateway::AuthGateway;
pub use registry::SessionRegistry;
