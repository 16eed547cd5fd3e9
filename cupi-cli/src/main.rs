//! CUPI CLI - command-line front end for the Unity Connection provisioning API.
//!
//! Lists and provisions schedules, users and call handlers on a Unity
//! Connection server from the terminal. Useful for scripting bulk changes
//! and for checking what the server holds.

mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::{debug, info};

use cupi_core::config::AppConfig;
use cupi_core::error::CuResult;
use cupi_core::logging;

/// Unity Connection provisioning client.
#[derive(Parser)]
#[command(
    name = "cupi",
    version,
    about = "Unity Connection provisioning CLI",
    long_about = "A command-line interface for the Cisco Unity Connection provisioning API.\n\
                  Create and inspect schedules, users, call handlers and greetings."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    /// Server host name or address (overrides config and environment).
    #[arg(long, global = true)]
    host: Option<String>,

    /// Administrator user name (overrides config and environment).
    #[arg(short, long, global = true)]
    username: Option<String>,

    /// Administrator password (prompted for when not set anywhere).
    #[arg(short, long, global = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the server answers and show the cluster.
    Status {
        /// Save the connection settings once the server answers.
        #[arg(long)]
        save: bool,
    },
    /// List Connection locations.
    Locations,
    /// List and provision schedules.
    Schedules {
        #[command(subcommand)]
        action: commands::schedules::SchedulesAction,
    },
    /// List and provision users.
    Users {
        #[command(subcommand)]
        action: commands::users::UsersAction,
    },
    /// List and configure call handlers.
    Handlers {
        #[command(subcommand)]
        action: commands::handlers::HandlersAction,
    },
}

#[tokio::main]
async fn main() -> CuResult<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config_path = match &cli.config {
        Some(path) => path.clone(),
        None => AppConfig::default_config_path()?,
    };
    let mut config = match &cli.config {
        Some(path) => AppConfig::load_from_file(path)?,
        None => AppConfig::load_default()?,
    };
    let stored_password = config.server.password.clone();
    config.apply_env_overrides();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(username) = cli.username {
        config.server.username = username;
    }
    if let Some(password) = cli.password {
        config.server.password = password;
    }
    // Passwords from flags or the environment are never written to disk.
    let keep_password = config.server.password == stored_password;

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
    let log_dir = config.effective_log_dir()?;
    let _guard = logging::init_logging(log_level, &log_dir, config.logging.json_output)?;

    info!("CUPI CLI v{}", cupi_core::constants::APP_VERSION);
    debug!(host = %config.server.host, "configuration loaded");

    let api = commands::create_api_client(&mut config)?;

    // Dispatch to command handlers
    match cli.command {
        Commands::Status { save } => {
            let target = save.then(|| (config.to_saved(keep_password), config_path.as_path()));
            commands::status::run(&api, target, cli.format).await
        }
        Commands::Locations => commands::locations::run(&api, cli.format).await,
        Commands::Schedules { action } => commands::schedules::run(&api, action, cli.format).await,
        Commands::Users { action } => commands::users::run(&api, action, cli.format).await,
        Commands::Handlers { action } => commands::handlers::run(&api, action, cli.format).await,
    }
}
