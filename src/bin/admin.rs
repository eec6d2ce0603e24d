//! CLI administration tool for quicklink.
//!
//! Provides maintenance commands and statistics without going through the
//! HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Delete expired short URLs (asks for confirmation)
//! cargo run --bin admin -- cleanup
//!
//! # Same, without the prompt (cron jobs)
//! cargo run --bin admin -- cleanup -y
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same configuration as the server (`DATABASE_URL` or the `DB_*`
//! components, pool settings). A `.env` file is honored.

use quicklink::config;
use quicklink::domain::entities::UrlRecord;
use quicklink::domain::repositories::{
    ListQuery, OrderField, SortDirection, UrlFilter, UrlRepository,
};
use quicklink::infrastructure::persistence::PgUrlRepository;
use quicklink::server::connect_pool;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

const TOP_LIMIT: i64 = 5;

/// CLI tool for managing quicklink.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Delete expired short URLs
    Cleanup {
        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
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

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env().context("Invalid configuration")?;
    let pool = connect_pool(&config).await?;

    let repo = PgUrlRepository::new(Arc::new(pool.clone()));

    let result = match cli.command {
        Commands::Cleanup { yes } => handle_cleanup(&repo, yes).await,
        Commands::Stats => handle_stats(&repo).await,
        Commands::Db { action } => handle_db_action(action, &pool).await,
    };

    pool.close().await;
    result
}

/// Deletes every URL whose expiry lies in the past.
///
/// Shows how many rows are affected and asks before deleting unless
/// `--yes` is given.
async fn handle_cleanup(repo: &PgUrlRepository, skip_confirm: bool) -> Result<()> {
    println!("{}", "🧹 Cleanup expired URLs".bright_blue().bold());
    println!();

    let expired = repo.count(UrlFilter::Expired).await?;

    if expired == 0 {
        println!("{}", "  Nothing to clean up".green());
        return Ok(());
    }

    println!(
        "  Expired URLs: {}",
        expired.to_string().bright_yellow().bold()
    );
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete them?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let deleted = repo.delete_expired().await?;

    println!();
    println!(
        "{} {}",
        "✅ Deleted".green().bold(),
        format!("{} URL(s)", deleted).bright_white()
    );
    println!();

    Ok(())
}

/// Displays URL counts and the most clicked links.
///
/// # Output Format
///
/// ```text
/// 📊 Statistics
///
///   URLs:     120
///   Active:   118
///   Expired:  2
///
///   Top 5 by clicks
///   Code        Clicks   Original URL
///   ───────────────────────────────────────────────
///   promo       1042     https://example.com/landing
/// ```
async fn handle_stats(repo: &PgUrlRepository) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let (total, active, expired) = tokio::try_join!(
        repo.count(UrlFilter::All),
        repo.count(UrlFilter::Active),
        repo.count(UrlFilter::Expired),
    )?;

    println!("  URLs:     {}", total.to_string().bright_green().bold());
    println!("  Active:   {}", active.to_string().bright_green().bold());
    println!("  Expired:  {}", expired.to_string().bright_yellow().bold());
    println!();

    let top = repo
        .find_many(
            ListQuery::new(TOP_LIMIT, 0).order_by(OrderField::ClickCount, SortDirection::Desc),
        )
        .await?;

    if top.is_empty() {
        return Ok(());
    }

    println!("  {}", format!("Top {} by clicks", TOP_LIMIT).bright_white().bold());
    println!(
        "  {:<12} {:<8} {}",
        "Code".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Original URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(60).bright_black());

    for record in &top {
        print_top_row(record);
    }
    println!();

    Ok(())
}

fn print_top_row(record: &UrlRecord) {
    let code = if record.is_expired_at(Utc::now()) {
        record.short_code.bright_black()
    } else {
        record.short_code.cyan()
    };

    println!(
        "  {:<12} {:<8} {}",
        code,
        record.click_count.to_string().bright_green(),
        truncate(&record.original_url, 60)
    );
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let head: String = s.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", head)
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            let size: String =
                sqlx::query_scalar("SELECT pg_size_pretty(pg_total_relation_size('urls'))")
                    .fetch_one(pool)
                    .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!("  urls table: {}", size.bright_white());
            println!();
        }
    }

    Ok(())
}
