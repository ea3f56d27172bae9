// file: src/config.rs
// description: application configuration management with toml support
// reference: https://docs.rs/config

use crate::error::{PipelineError, Result};
use dotenvy::dotenv;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub max_upload_mb: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub path: PathBuf,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub bootstrap_admin_username: Option<String>,
    #[serde(default)]
    pub bootstrap_admin_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReportConfig {
    pub output_dir: PathBuf,
    #[serde(default = "default_parallel_workers")]
    pub parallel_workers: usize,
}

fn default_parallel_workers() -> usize {
    4
}

impl Config {
    pub fn load(path: Option<&Path>) -> Result<Self> {
        dotenv().ok();

        let mut builder = config::Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        } else {
            builder = builder.add_source(config::File::from(Path::new("config/default.toml")));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("CO_VERIFIER")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        let config: Config = settings
            .try_deserialize()
            .map_err(|e| PipelineError::Config(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn default_config() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8501,
                max_upload_mb: 10,
            },
            database: DatabaseConfig {
                path: PathBuf::from("users.db"),
            },
            auth: AuthConfig::default(),
            report: ReportConfig {
                output_dir: PathBuf::from("./reports"),
                parallel_workers: default_parallel_workers(),
            },
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.server.max_upload_mb * 1024 * 1024
    }

    /// Returns the bootstrap admin credentials when both halves are configured.
    pub fn bootstrap_admin(&self) -> Option<(&str, &str)> {
        match (
            self.auth.bootstrap_admin_username.as_deref(),
            self.auth.bootstrap_admin_password.as_deref(),
        ) {
            (Some(user), Some(pass)) if !user.trim().is_empty() && !pass.is_empty() => {
                Some((user, pass))
            }
            _ => None,
        }
    }

    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(PipelineError::Config(
                "server.port must be greater than 0".to_string(),
            ));
        }

        if self.server.max_upload_mb == 0 {
            return Err(PipelineError::Config(
                "max_upload_mb must be greater than 0".to_string(),
            ));
        }

        if self.report.parallel_workers == 0 {
            return Err(PipelineError::Config(
                "report.parallel_workers must be greater than 0".to_string(),
            ));
        }

        if self.database.path.as_os_str().is_empty() {
            return Err(PipelineError::Config(
                "database.path must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
