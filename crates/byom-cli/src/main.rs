//! byom - command-line client for the BYOM AI Platform.
//!
//! Signs in against the platform API, keeps the session token between runs,
//! and offers a few provider administration commands on top of it.

mod commands;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use byom_core::{Config, SessionService};

/// Directory for a rolling log file, in addition to stderr
const ENV_LOG_DIR: &str = "BYOM_LOG_DIR";

const USAGE: &str = "\
Usage: byom <command> [args]

Commands:
  login [email]                     Sign in and store the session token
  register <email> <workspace>      Create an account and workspace
  whoami                            Show the signed-in account
  status                            Show session state and API endpoint
  logout                            End the session
  providers list                    List model providers
  providers get <id>                Show one provider
  providers create <name> <type> <base_url>
                                    Register a provider (openai | ollama | http)
  providers enable <id>             Mark a provider active
  providers disable <id>            Mark a provider inactive
  providers test <id> [<id>...]     Check provider connectivity
  providers delete <id>             Remove a provider

Environment:
  BYOM_API_URL          API base URL (default http://localhost:8000/api)
  BYOM_TOKEN_STORAGE    file | keyring | memory
  BYOM_PASSWORD         Password for login/register instead of prompting
  BYOM_PROVIDER_API_KEY API key for `providers create` instead of prompting
  BYOM_LOG_DIR          Also write logs to a daily file in this directory
  RUST_LOG              Log filter (default warn)";

/// Initialize the tracing subscriber for logging.
/// The returned guard must live until exit so buffered file logs are flushed.
fn init_tracing() -> Option<WorkerGuard> {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let (file_layer, guard) = match std::env::var(ENV_LOG_DIR) {
        Ok(dir) if !dir.is_empty() => {
            let appender = tracing_appender::rolling::daily(dir, "byom.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        _ => (None, None),
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer)
        .with(filter)
        .init();

    guard
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    let _guard = init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first().map(String::as_str) else {
        eprintln!("{}", USAGE);
        return Ok(());
    };
    if matches!(command, "help" | "-h" | "--help") {
        println!("{}", USAGE);
        return Ok(());
    }

    let mut config = Config::load()?;
    let service = SessionService::from_config(&config, Arc::new(commands::prompt_login))?;
    info!(api = %config.api_base_url(), "byom starting");

    match (command, &args[1..]) {
        ("login", rest) => commands::login(&service, &mut config, rest.first().cloned()).await,
        ("register", [email, workspace]) => {
            commands::register(&service, &mut config, email, workspace).await
        }
        ("whoami", []) => commands::whoami(&service).await,
        ("status", []) => commands::status(&service, &config),
        ("logout", []) => commands::logout(&service).await,
        ("providers", rest) => commands::providers(&service, rest).await,
        _ => {
            eprintln!("{}", USAGE);
            Err(anyhow::anyhow!("Unknown command or wrong arguments: {}", args.join(" ")))
        }
    }
}
