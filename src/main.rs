// file: src/main.rs
// description: commandline application entry point with command handling
// reference: application bootstrap and orchestration

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use co_verifier::utils::logging::{format_error, format_success, format_warning};
use co_verifier::{
    AuthGateway, BatchOptions, BatchOrchestrator, Config, CsvScanner, Database, HealthCheck,
    HealthReport, ProgressTracker, Role, SchemaManager, SessionContext, UploadLogRecorder,
    UploadPipeline, UserStore,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Parser)]
#[command(name = "co_verifier")]
#[command(author = "cipher")]
#[command(version = "0.1.0")]
#[command(about = "Bloom's taxonomy and course outcome verifier for question papers", long_about = None)]
struct Cli {
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "config/default.toml"
    )]
    config: PathBuf,

    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    color: bool,

    #[arg(short, long, action = ArgAction::SetTrue)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web interface
    Serve,

    /// Classify question paper CSV files into report spreadsheets
    Classify {
        /// CSV files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Record each file in the upload log as this user
        #[arg(short, long)]
        user: Option<String>,

        /// Also write each report as JSON plus a manifest
        #[arg(long)]
        json: bool,

        #[arg(short, long)]
        pretty: bool,

        #[arg(long, value_name = "NUM")]
        workers: Option<usize>,
    },

    /// Add an account; an existing username is left unchanged
    AddUser {
        username: String,

        password: String,

        #[arg(long, default_value = "faculty")]
        role: Role,
    },

    /// List accounts
    Users,

    /// Print the upload history
    Logs,

    /// Create the database tables
    InitDb,

    /// Check database reachability and schema
    Health,

    Reset {
        #[arg(long)]
        confirm: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    co_verifier::utils::logging::init_logger(cli.color, cli.verbose);
    colored::control::set_override(cli.color);

    info!("Loading configuration from: {}", cli.config.display());

    let config = if cli.config.exists() {
        Config::load(Some(cli.config.as_path())).context("Failed to load configuration")?
    } else {
        warn!(
            "Config file {} not found, using default configuration",
            cli.config.display()
        );
        Config::default_config()
    };

    match cli.command {
        Commands::Serve => {
            co_verifier::server::serve(&config)
                .await
                .context("Server failed")?;
        }
        Commands::Classify {
            paths,
            output,
            user,
            json,
            pretty,
            workers,
        } => {
            let options = BatchOptions {
                output_dir: output.unwrap_or_else(|| config.report.output_dir.clone()),
                parallel_workers: workers.unwrap_or(config.report.parallel_workers),
                export_json: json,
                pretty_json: pretty,
            };
            cmd_classify(&config, &paths, options, user.as_deref(), cli.color).await?;
        }
        Commands::AddUser {
            username,
            password,
            role,
        } => {
            cmd_add_user(&config, &username, &password, role)?;
        }
        Commands::Users => {
            cmd_users(&config)?;
        }
        Commands::Logs => {
            cmd_logs(&config)?;
        }
        Commands::InitDb => {
            cmd_init_db(&config)?;
        }
        Commands::Health => {
            cmd_health(&config)?;
        }
        Commands::Reset { confirm } => {
            cmd_reset(&config, confirm)?;
        }
    }

    Ok(())
}

fn open_database(config: &Config) -> Result<Database> {
    co_verifier::server::prepare_database(config).context("Failed to open database")
}

async fn cmd_classify(
    config: &Config,
    paths: &[PathBuf],
    options: BatchOptions,
    user: Option<&str>,
    color: bool,
) -> Result<()> {
    let scanner = CsvScanner::with_max_file_size(config.max_upload_bytes() as u64);
    let files = scanner.scan(paths).context("Failed to scan inputs")?;

    let mut orchestrator =
        BatchOrchestrator::new(options).context("Failed to prepare output directory")?;

    if let Some(username) = user {
        let db = open_database(config)?;
        let account = UserStore::new(&db)
            .find(username)?
            .with_context(|| format!("Unknown user '{}'", username))?;

        info!("Recording uploads as '{}'", account.username);
        orchestrator = orchestrator.with_upload_log(
            UploadPipeline::new(db, config.max_upload_bytes()),
            SessionContext::new(account.username, account.role),
        );
    }

    let progress = Arc::new(ProgressTracker::with_color(files.len(), color));
    let summary = orchestrator.run(files, progress).await?;

    for report in &summary.reports {
        println!(
            "{}",
            format_success(&format!(
                "{} -> {} ({} questions)",
                report.source.display(),
                report.report_path.display(),
                report.questions
            ))
        );
        if let Some(json_path) = &report.json_path {
            println!("  json: {}", json_path.display());
        }
    }

    if let Some(manifest) = &summary.manifest {
        println!("{}", format_success(&format!("Manifest: {}", manifest.display())));
    }

    if summary.stats.files_failed > 0 {
        println!(
            "{}",
            format_warning(&format!(
                "{} file(s) could not be classified, see log output",
                summary.stats.files_failed
            ))
        );
    }

    Ok(())
}

fn cmd_add_user(config: &Config, username: &str, password: &str, role: Role) -> Result<()> {
    let db = open_database(config)?;

    if AuthGateway::new(&db)
        .register(username, password, role)
        .context("Failed to add user")?
    {
        println!("{}", format_success(&format!("Added {} '{}'", role, username)));
    } else {
        println!(
            "{}",
            format_warning(&format!("User '{}' already exists, left unchanged", username))
        );
    }

    Ok(())
}

fn cmd_users(config: &Config) -> Result<()> {
    let db = open_database(config)?;
    let users = UserStore::new(&db).list()?;

    if users.is_empty() {
        println!("No users");
        return Ok(());
    }

    println!("{:<32} role", "username");
    for user in users {
        println!("{:<32} {}", user.username, user.role);
    }

    Ok(())
}

fn cmd_logs(config: &Config) -> Result<()> {
    let db = open_database(config)?;
    let logs = UploadLogRecorder::new(&db).list()?;

    if logs.is_empty() {
        println!("No uploads recorded");
        return Ok(());
    }

    println!("{:<24} {:<20} filename", "username", "timestamp");
    for log in &logs {
        println!("{:<24} {:<20} {}", log.username, log.timestamp, log.filename);
    }
    info!("{} upload(s)", logs.len());

    Ok(())
}

fn cmd_init_db(config: &Config) -> Result<()> {
    let db = open_database(config)?;
    println!(
        "{}",
        format_success(&format!("Schema ready at {}", db.path().display()))
    );
    Ok(())
}

fn cmd_health(config: &Config) -> Result<()> {
    let db = Database::new(&config.database).context("Failed to open database")?;
    let report = HealthReport::new(
        vec![HealthCheck::database(&db)],
        env!("CARGO_PKG_VERSION").to_string(),
    );

    println!("{}", report.format());

    if !report.is_healthy() {
        error!("Health check did not pass");
        return Err(anyhow::anyhow!("Unhealthy: {:?}", report.overall_status));
    }

    Ok(())
}

fn cmd_reset(config: &Config, confirm: bool) -> Result<()> {
    if !confirm {
        println!(
            "{}",
            format_error("This will delete all users and upload logs. Use --confirm to proceed")
        );
        return Ok(());
    }

    warn!("Resetting database - all data will be lost");

    let db = Database::new(&config.database).context("Failed to open database")?;
    let schema_manager = SchemaManager::new(&db);
    schema_manager
        .drop_all_tables()
        .context("Failed to drop tables")?;
    schema_manager
        .initialize()
        .context("Failed to recreate schema")?;

    info!("Schema recreated - database reset complete");
    Ok(())
}
