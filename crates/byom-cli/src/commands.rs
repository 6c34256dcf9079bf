use std::io::{self, Write};

use anyhow::{Context, Result};
use futures::future::join_all;
use tracing::warn;

use byom_core::models::{NewProvider, ProviderType, ProviderUpdate};
use byom_core::{ApiError, AuthError, Config, SessionService};

/// Password env var, checked before prompting
const ENV_PASSWORD: &str = "BYOM_PASSWORD";

/// API key for `providers create`, checked before prompting
const ENV_PROVIDER_API_KEY: &str = "BYOM_PROVIDER_API_KEY";

/// Maximum length for table cells before truncation
const MAX_CELL_WIDTH: usize = 40;

/// Unauthenticated entry point for the CLI: the server rejected our token,
/// so tell the user how to get a new one.
pub fn prompt_login() {
    eprintln!("Your session has ended. Run `byom login` to sign in again.");
}

fn prompt(label: &str) -> Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

fn password() -> Result<String> {
    if let Ok(password) = std::env::var(ENV_PASSWORD) {
        if !password.is_empty() {
            return Ok(password);
        }
    }
    rpassword::prompt_password("Password: ").context("Failed to read password")
}

/// AuthErrors are shown as the message alone, like an inline form error
fn auth_failure(err: AuthError) -> anyhow::Error {
    match err {
        AuthError::Transport(e) => anyhow::Error::new(e).context("Unable to reach the server"),
        other => anyhow::anyhow!(other.message()),
    }
}

fn remember_email(config: &mut Config, email: &str) {
    config.last_email = Some(email.to_string());
    if let Err(e) = config.save() {
        warn!(error = %e, "Failed to save config");
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.parse()
        .with_context(|| format!("Invalid provider id: {}", raw))
}

fn new_provider(name: &str, kind: &str, base_url: &str, api_key: Option<String>) -> Result<NewProvider> {
    let provider_type: ProviderType = kind.parse().map_err(|e: String| anyhow::anyhow!(e))?;
    Ok(NewProvider {
        name: name.to_string(),
        provider_type,
        base_url: base_url.to_string(),
        api_key: api_key.filter(|k| !k.is_empty()),
        headers: None,
        config: None,
    })
}

/// Empty input means the provider needs no key (e.g. a local Ollama)
fn provider_api_key() -> Result<String> {
    if let Ok(key) = std::env::var(ENV_PROVIDER_API_KEY) {
        return Ok(key);
    }
    rpassword::prompt_password("API key (blank for none): ").context("Failed to read API key")
}

/// Admin endpoints answer with a `detail` worth showing verbatim
fn admin_failure(err: ApiError) -> anyhow::Error {
    match err.detail() {
        Some(detail) => anyhow::anyhow!(detail),
        None => err.into(),
    }
}

pub async fn login(service: &SessionService, config: &mut Config, email: Option<String>) -> Result<()> {
    let email = match email.or_else(|| config.last_email.clone()) {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    if email.is_empty() {
        return Err(anyhow::anyhow!("Email required"));
    }
    let password = password()?;

    let session = service.login(&email, &password).await.map_err(auth_failure)?;
    remember_email(config, &email);
    println!("Logged in as {}", session.user.email);
    Ok(())
}

pub async fn register(
    service: &SessionService,
    config: &mut Config,
    email: &str,
    workspace: &str,
) -> Result<()> {
    let password = password()?;
    let session = service
        .register(email, &password, workspace)
        .await
        .map_err(auth_failure)?;
    remember_email(config, email);
    println!("Registered {} with workspace \"{}\"", session.user.email, workspace);
    Ok(())
}

pub async fn whoami(service: &SessionService) -> Result<()> {
    if !service.is_authenticated() {
        println!("Not logged in");
        return Ok(());
    }
    let user = service.current_user().await.map_err(auth_failure)?;
    println!("{}", user.email);
    println!("  id:        {}", user.id);
    println!("  provider:  {}", user.auth_provider);
    println!("  verified:  {}", if user.is_verified { "yes" } else { "no" });
    println!("  active:    {}", if user.is_active { "yes" } else { "no" });
    println!("  since:     {}", user.created_at.format("%b %d, %Y"));
    Ok(())
}

pub fn status(service: &SessionService, config: &Config) -> Result<()> {
    println!("API:      {}", config.api_base_url());
    println!("Storage:  {:?}", config.token_storage);
    println!("Session:  {:?}", service.state());
    Ok(())
}

pub async fn logout(service: &SessionService) -> Result<()> {
    service.logout().await;
    println!("Logged out");
    Ok(())
}

pub async fn providers(service: &SessionService, args: &[String]) -> Result<()> {
    let api = service.api();
    match args {
        [cmd] if cmd == "list" => {
            let providers = api.list_providers().await?;
            if providers.is_empty() {
                println!("No providers configured");
            }
            for p in providers {
                println!(
                    "{:>5}  {:<8} {:<20} {} {}",
                    p.id,
                    p.provider_type,
                    truncate(&p.name, 20),
                    truncate(&p.base_url, MAX_CELL_WIDTH),
                    if p.is_active { "" } else { "(inactive)" }
                );
            }
            Ok(())
        }
        [cmd, id] if cmd == "get" => {
            let provider = api.get_provider(parse_id(id)?).await?;
            println!("{}", serde_json::to_string_pretty(&provider)?);
            Ok(())
        }
        [cmd, ids @ ..] if cmd == "test" && !ids.is_empty() => {
            let ids = ids.iter().map(|id| parse_id(id)).collect::<Result<Vec<_>>>()?;
            let results = join_all(ids.iter().map(|&id| api.test_provider(id))).await;
            for (id, result) in ids.iter().zip(results) {
                match result {
                    Ok(test) if test.success => {
                        println!("{:>5}  ok    {}  {}", id, test.latency_display(), test.message)
                    }
                    Ok(test) => println!(
                        "{:>5}  FAIL  {}  {}",
                        id,
                        test.message,
                        test.error.unwrap_or_default()
                    ),
                    Err(e) => println!("{:>5}  ERROR {}", id, e),
                }
            }
            Ok(())
        }
        [cmd, name, kind, base_url] if cmd == "create" => {
            let new = new_provider(name, kind, base_url, Some(provider_api_key()?))?;
            let provider = api.create_provider(&new).await.map_err(admin_failure)?;
            println!("Created provider {} ({})", provider.id, provider.name);
            Ok(())
        }
        [cmd, id] if cmd == "enable" || cmd == "disable" => {
            let id = parse_id(id)?;
            let update = ProviderUpdate::active(cmd == "enable");
            let provider = api.update_provider(id, &update).await.map_err(admin_failure)?;
            println!(
                "Provider {} is now {}",
                provider.id,
                if provider.is_active { "active" } else { "inactive" }
            );
            Ok(())
        }
        [cmd, id] if cmd == "delete" => {
            let id = parse_id(id)?;
            api.delete_provider(id).await.map_err(admin_failure)?;
            println!("Deleted provider {}", id);
            Ok(())
        }
        _ => Err(anyhow::anyhow!(
            "Usage: byom providers list | get <id> | create <name> <type> <base_url> | \
             enable <id> | disable <id> | test <id>... | delete <id>"
        )),
    }
}
