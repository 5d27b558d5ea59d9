//! CLI administration tool for shorty.
//!
//! Inspects and repairs click counters without going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Compare durable and cached click counts of a code
//! cargo run --bin admin -- stats AbC1234
//!
//! # Write the cached click count to PostgreSQL now
//! cargo run --bin admin -- sync AbC1234
//!
//! # Flush, then drop both cache entries of a code
//! cargo run --bin admin -- evict AbC1234
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Same as the server: `DATABASE_URL` (or `DB_*`) is required, `REDIS_URL`
//! (or `REDIS_*`) is needed for any cached value to be visible.

use shorty::application::services::{RedirectService, StatsService};
use shorty::config::{self, Config};
use shorty::domain::repositories::UrlRepository;
use shorty::infrastructure::cache::ClickCache;
use shorty::infrastructure::persistence::PgUrlRepository;
use shorty::server::{connect_cache, connect_database};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing shorty.
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
    /// Show durable and cached click counts of a short code
    Stats {
        /// Short code to inspect
        code: String,
    },

    /// Flush the cached click count of a short code to the database
    Sync {
        /// Short code to flush
        code: String,
    },

    /// Flush the cached click count, then drop both cache entries of a short code
    Evict {
        /// Short code to evict
        code: String,
    },

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

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;
    let pool = connect_database(&config).await?;

    match cli.command {
        Commands::Stats { code } => handle_stats(&config, &pool, &code).await?,
        Commands::Sync { code } => handle_sync(&config, &pool, &code).await?,
        Commands::Evict { code } => handle_evict(&config, &pool, &code).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

fn repository(pool: &PgPool) -> Arc<dyn UrlRepository> {
    Arc::new(PgUrlRepository::new(Arc::new(pool.clone())))
}

/// Prints the durable record next to the live cache counter.
async fn handle_stats(config: &Config, pool: &PgPool, code: &str) -> Result<()> {
    let cache = connect_cache(config).await?;
    let service = StatsService::new(repository(pool), cache);

    let (record, cached) = service.click_views(code).await?;

    println!("{}", format!("Stats for {}", record.code).bright_blue().bold());
    println!();
    println!("  Long URL:       {}", record.long_url.bright_white());
    println!(
        "  Durable clicks: {}",
        record.clicks.to_string().bright_green().bold()
    );

    match cached {
        Some(clicks) => {
            let lag = clicks - record.clicks;
            println!(
                "  Cached clicks:  {}",
                clicks.to_string().bright_green().bold()
            );
            if lag > 0 {
                println!("  Unflushed:      {}", lag.to_string().yellow());
            }
        }
        None => println!("  Cached clicks:  {}", "not cached".yellow()),
    }

    println!("  Created:        {}", record.created_at);
    println!("  Updated:        {}", record.updated_at);
    println!();

    Ok(())
}

/// Writes the cached counter to the durable store immediately.
async fn handle_sync(config: &Config, pool: &PgPool, code: &str) -> Result<()> {
    if !config.is_redis_enabled() {
        println!(
            "{}",
            "Redis is not configured, there is no cached counter to flush".yellow()
        );
        return Ok(());
    }

    let cache = connect_cache(config).await?;
    let service = RedirectService::new(
        repository(pool),
        cache,
        config.service_settings().write_back,
    );

    match service.flush_clicks(code).await? {
        Some(clicks) => println!(
            "{}",
            format!("Flushed {} clicks for {}", clicks, code)
                .green()
                .bold()
        ),
        None => println!("{}", format!("No cached counter for {}", code).yellow()),
    }

    Ok(())
}

/// Drops the cache entries of a code once its counter is safely flushed.
///
/// The next redirect refills the URL entry and, with seeding enabled,
/// rebuilds the counter from the durable value.
async fn handle_evict(config: &Config, pool: &PgPool, code: &str) -> Result<()> {
    let cache = connect_cache(config).await?;
    let service = RedirectService::new(
        repository(pool),
        cache.clone(),
        config.service_settings().write_back,
    );

    if let Some(clicks) = service.flush_clicks(code).await? {
        println!("  Flushed {} clicks", clicks.to_string().bright_green());
    }

    cache.evict(code).await?;
    println!("{}", format!("Evicted {} from cache", code).green().bold());

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            if repository(pool).health_check().await {
                println!("{}", "Database connection OK".green().bold());
            } else {
                anyhow::bail!("Database did not answer");
            }
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;
            let urls: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM urls")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  Short links: {}", urls.to_string().bright_green().bold());
            println!();
        }
    }

    Ok(())
}
