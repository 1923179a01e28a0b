//! CLI administration tool for tinyurl-service.
//!
//! Shortens and inspects URLs, prints statistics and runs database
//! maintenance directly against the store, without going through HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Shorten a URL
//! cargo run --bin admin -- shorten https://example.com/some/long/path
//!
//! # Show a stored record
//! cargo run --bin admin -- show 42
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection / apply migrations
//! cargo run --bin admin -- db check
//! cargo run --bin admin -- db migrate
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` or `DB_PATH`, plus `BASE_URL` and
//! `SHORTEN_STRATEGY` for the `shorten` command.

use tinyurl_service::api::dto::shorten::ShortenRequest;
use tinyurl_service::application::services::ShortenService;
use tinyurl_service::config::{self, Config};
use tinyurl_service::domain::repositories::UrlRepository;
use tinyurl_service::error::AppError;
use tinyurl_service::infrastructure::persistence::SqliteUrlRepository;
use tinyurl_service::server;
use tinyurl_service::utils::fingerprint::fingerprint;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::SqlitePool;
use std::sync::Arc;
use validator::Validate;

/// CLI tool for managing tinyurl-service.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Shorten a URL
    Shorten {
        /// Destination URL
        url: String,
    },

    /// Show the record behind a short id
    Show {
        /// Short id
        id: i64,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Apply pending migrations
    Migrate,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    let pool = server::connect_pool(&config).await?;

    match cli.command {
        Commands::Shorten { url } => shorten(&config, &pool, url).await?,
        Commands::Show { id } => show(&config, &pool, id).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    pool.close().await;

    Ok(())
}

/// Shortens a URL with the configured strategy.
///
/// An already shortened URL is reported together with its existing id.
async fn shorten(config: &Config, pool: &SqlitePool, url: String) -> Result<()> {
    println!("{}", "Shorten URL".bright_blue().bold());
    println!();

    let request = ShortenRequest { url };
    request.validate().context("Invalid URL")?;

    let repository = Arc::new(SqliteUrlRepository::new(pool.clone()));
    let service = ShortenService::new(repository.clone(), config.shorten_strategy);
    println!("  Strategy: {}", service.strategy().to_string().bright_black());

    match service.shorten(request.url.clone()).await {
        Ok(record) => {
            println!("{}", "Created".green().bold());
            print_record(config, record.id, &record.url, &record.signature);
        }
        Err(AppError::Conflict { .. }) => {
            println!("{}", "URL exists already".yellow().bold());
            let signature = fingerprint(&request.url);
            if let Some(record) = repository
                .find_by_signature(&signature)
                .await
                .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
            {
                print_record(config, record.id, &record.url, &record.signature);
            }
        }
        Err(e) => anyhow::bail!("Failed to shorten URL: {}", e),
    }

    Ok(())
}

/// Prints a stored record by id.
async fn show(config: &Config, pool: &SqlitePool, id: i64) -> Result<()> {
    let repository = SqliteUrlRepository::new(pool.clone());

    let record = repository
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?
        .with_context(|| format!("No record with id {}", id))?;

    print_record(config, record.id, &record.url, &record.signature);

    Ok(())
}

fn print_record(config: &Config, id: i64, url: &str, signature: &str) {
    println!();
    println!("  ID:        {}", id.to_string().bright_white().bold());
    println!("  URL:       {}", url.cyan());
    println!("  Signature: {}", signature.bright_black());
    println!(
        "  Short URL: {}",
        format!("{}/{}", config.base_url, id).bright_yellow()
    );
    println!();
}

/// Displays the number of stored records.
async fn handle_stats(pool: &SqlitePool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let repository = SqliteUrlRepository::new(pool.clone());
    let count = repository
        .count()
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    println!("  URLs: {}", count.to_string().bright_green().bold());
    println!();

    Ok(())
}

/// Handles database maintenance commands.
async fn handle_db_action(action: DbAction, pool: &SqlitePool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let version: String = sqlx::query_scalar("SELECT sqlite_version()")
                .fetch_one(pool)
                .await?;

            println!("{}", "Database connection OK".green().bold());
            println!("  SQLite: {}", version.bright_white());
        }
        DbAction::Migrate => {
            println!("{}", "Applying migrations...".bright_blue());

            server::migrate(pool).await?;

            println!("{}", "Migrations applied".green().bold());
        }
    }

    Ok(())
}
