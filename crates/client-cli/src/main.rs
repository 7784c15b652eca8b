use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod auth;
mod config;
mod controller;
mod documents;
mod session;
mod tui;

use api::{ApiClient, ChatClient, DocumentClient};
use controller::ChatController;
use session::Session;

#[derive(Parser)]
#[command(name = "lipi")]
#[command(about = "Terminal client for the Lipi document-digitization service")]
#[command(version)]
struct Cli {
    /// Backend URL (overrides config and LIPI_API_URL)
    #[arg(long)]
    server: Option<String>,

    /// Auth token (overrides the stored one)
    #[arg(long)]
    token: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Log in to the Lipi backend
    Login {
        /// Email to log in with (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Create an account and log in
    Signup,
    /// Log out and discard the stored token
    Logout,
    /// Show the identity behind the stored token
    Whoami,
    /// Upload a scanned document (image or PDF)
    Upload {
        /// File to upload
        file: PathBuf,
        /// Attach the document to a chat
        #[arg(long)]
        chat: Option<String>,
    },
    /// Manage uploaded documents
    Documents {
        #[command(subcommand)]
        action: Option<DocumentsAction>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum DocumentsAction {
    /// List all uploaded documents
    List,
    /// Show one document, including extracted text when available
    Show { id: String },
    /// Delete a document
    Delete { id: String },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Set a configuration value
    Set {
        /// Configuration key (server, token)
        key: String,
        /// Configuration value
        value: String,
    },
    /// Get a configuration value
    Get {
        /// Configuration key
        key: String,
    },
    /// Show all configuration
    Show,
    /// Get the config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lipi=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = config::Config::load().unwrap_or_default();
    let base_url = config.api_url(cli.server.clone());

    // Reading the token discards an expired one; persist the discard.
    let had_token = config.remote.token.is_some();
    let stored = config.valid_token();
    if had_token && stored.is_none() {
        if let Err(err) = config.save() {
            tracing::warn!("failed to persist expired-token removal: {err:#}");
        }
    }
    let token = cli.token.clone().or(stored);

    let api = Arc::new(ApiClient::new(base_url, token));
    let mut session = Session::new(api.clone());

    match cli.command {
        Some(Commands::Login { email }) => auth::login(&mut session, email).await,
        Some(Commands::Signup) => auth::signup(&mut session).await,
        Some(Commands::Logout) => auth::logout(&mut session).await,
        Some(Commands::Whoami) => auth::whoami(&mut session).await,
        Some(Commands::Upload { file, chat }) => {
            if api.token().is_none() {
                print_login_hint();
                return Ok(());
            }
            documents::upload(&DocumentClient::new(api.clone()), &file, chat).await
        }
        Some(Commands::Documents { action }) => {
            if api.token().is_none() {
                print_login_hint();
                return Ok(());
            }
            let client = DocumentClient::new(api.clone());
            match action.unwrap_or(DocumentsAction::List) {
                DocumentsAction::List => documents::list(&client).await,
                DocumentsAction::Show { id } => documents::show(&client, &id).await,
                DocumentsAction::Delete { id } => documents::delete(&client, &id).await,
            }
        }
        Some(Commands::Config { action }) => handle_config_command(action).await,
        None => {
            // Default: the chat surface. Resolve the persisted token
            // first; only a completed check may redirect to login.
            session.initialize().await;
            if !session.is_authenticated() {
                print_login_hint();
                return Ok(());
            }

            let controller = ChatController::new(ChatClient::new(api.clone()));
            let documents = DocumentClient::new(api.clone());

            tracing::info!("opening chat surface against {}", api.base_url());
            match tui::run(session, controller, documents).await? {
                tui::TuiOutcome::SessionExpired => {
                    eprintln!("\x1b[33m🔐 Session expired.\x1b[0m");
                    eprintln!("   Run '\x1b[1mlipi login\x1b[0m' to continue.");
                }
                tui::TuiOutcome::LoggedOut => {
                    println!("\x1b[32m✅ Logged out successfully\x1b[0m");
                }
                tui::TuiOutcome::Quit => {}
            }
            Ok(())
        }
    }
}

fn print_login_hint() {
    eprintln!("\x1b[33m🔐 Not logged in.\x1b[0m");
    eprintln!("   Run '\x1b[1mlipi login\x1b[0m' to authenticate.");
}

async fn handle_config_command(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Set { key, value } => {
            let mut config = config::Config::load().unwrap_or_default();
            match key.as_str() {
                "server" => config.remote.server = Some(value),
                "token" => {
                    config.remote.token = Some(value);
                    config.remote.token_expires_at = None;
                }
                _ => anyhow::bail!("Unknown config key: {}. Valid keys: server, token", key),
            }
            config.save()?;
            println!("Configuration saved");
        }
        ConfigAction::Get { key } => {
            let config = config::Config::load()?;
            let value = match key.as_str() {
                "server" => config.remote.server.unwrap_or_default(),
                "token" => config
                    .remote
                    .token
                    .map(|_| "****")
                    .unwrap_or_default()
                    .to_string(),
                _ => anyhow::bail!("Unknown config key: {}", key),
            };
            println!("{}", value);
        }
        ConfigAction::Show => {
            let config = config::Config::load()?;
            println!("server: {}", config.remote.server.unwrap_or_default());
            println!(
                "token: {}",
                config.remote.token.map(|_| "****").unwrap_or_default()
            );
        }
        ConfigAction::Path => {
            let path = config::Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}
