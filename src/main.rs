//! HopCache CLI - command-line access to a remote HopCache key-value cache
//!
//! Thin front-end over the client library: parses arguments, resolves
//! configuration, runs one cache operation, and prints the outcome.

use colored::Colorize;
use console::style;
use hopcache_client::cli::{Cli, Commands};
use hopcache_client::{CacheClient, CacheValue, ClientError, Config, Result};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

/// Main application entry point
fn run() -> i32 {
    let cli = Cli::parse_args();

    let result = tokio::runtime::Runtime::new()
        .map_err(|err| ClientError::Internal(format!("failed to start runtime: {err}")))
        .and_then(|runtime| runtime.block_on(execute(cli)));

    match result {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            err.exit_code()
        }
    }
}

/// Resolve configuration, build the client, and execute the requested command
async fn execute(cli: Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load_or_default(),
    };
    config.merge(&cli.overrides());

    if config.verbose {
        println!("HopCache CLI v{}", env!("CARGO_PKG_VERSION"));
        println!("Host: {}", config.host);
    }

    let client = CacheClient::new(&config)?;

    match cli.command {
        Commands::Get { keys, pretty } => handle_get(&client, &keys, pretty).await,
        Commands::Set { key, value } => handle_set(&client, &key, &value).await,
        Commands::Delete { key } => handle_delete(&client, &key).await,
        Commands::Exists { key } => handle_exists(&client, &key).await,
        Commands::Keys => handle_keys(&client).await,
        Commands::Values => handle_values(&client).await,
        Commands::Length => handle_length(&client).await,
        Commands::Clean { yes } => handle_clean(&client, yes).await,
        Commands::Info => handle_info(&client).await,
        Commands::Version => handle_version(),
    }
}

/// Fetch one or more keys, concurrently when more than one is given
async fn handle_get(client: &CacheClient, keys: &[String], pretty: bool) -> Result<()> {
    let values = futures::future::try_join_all(keys.iter().map(|key| client.get(key))).await?;

    for (key, value) in keys.iter().zip(values) {
        if keys.len() > 1 {
            println!("{}", style(key).bold());
        }
        if pretty {
            let rendered = serde_json::to_string_pretty(&value)
                .map_err(|err| ClientError::Internal(err.to_string()))?;
            println!("{rendered}");
        } else {
            println!("{value}");
        }
    }
    Ok(())
}

/// Parse the value argument and store it
async fn handle_set(client: &CacheClient, key: &str, raw_value: &str) -> Result<()> {
    let value: CacheValue = serde_json::from_str(raw_value)
        .map_err(|err| ClientError::InvalidArgument(format!("value must be a JSON map: {err}")))?;

    let _ack = client.set(key, &value).await?;
    println!("{} Set {key}", "✓".green());
    Ok(())
}

/// Handle delete command
async fn handle_delete(client: &CacheClient, key: &str) -> Result<()> {
    let _ack = client.delete(key).await?;
    println!("{} Deleted {key}", "✓".green());
    Ok(())
}

/// Handle exists command
async fn handle_exists(client: &CacheClient, key: &str) -> Result<()> {
    let exists = client.exists(key).await?;
    println!("{exists}");
    Ok(())
}

/// Handle keys command
async fn handle_keys(client: &CacheClient) -> Result<()> {
    let keys = client.keys().await?;
    if keys.is_empty() {
        println!("Cache is empty.");
        return Ok(());
    }
    for key in keys {
        println!("{key}");
    }
    Ok(())
}

/// Handle values command
async fn handle_values(client: &CacheClient) -> Result<()> {
    let values = client.values().await?;
    if values.is_empty() {
        println!("Cache is empty.");
        return Ok(());
    }
    for value in values {
        println!("{value}");
    }
    Ok(())
}

/// Handle length command
async fn handle_length(client: &CacheClient) -> Result<()> {
    let length = client.length().await?;
    println!("{length}");
    Ok(())
}

/// Flush the cache, confirming first unless --yes was passed
async fn handle_clean(client: &CacheClient, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(format!(
                "Flush every entry from the cache at {}?",
                style(client.host()).bold()
            ))
            .default(false)
            .interact()
            .map_err(|err| ClientError::Internal(err.to_string()))?;

        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    let _ack = client.clean().await?;
    println!("{} Cache flushed", "✓".green());
    Ok(())
}

/// Handle info command
async fn handle_info(client: &CacheClient) -> Result<()> {
    let report = client.info().await?;
    println!("{report}");
    Ok(())
}

/// Handle version command
fn handle_version() -> Result<()> {
    println!("HopCache CLI v{}", env!("CARGO_PKG_VERSION"));
    Ok(())
}
