//! CLI administration tool for link-shortener.
//!
//! Manages links and performs database checks without going through the
//! HTTP API. Uses the same services and validation as the server.
//!
//! # Usage
//!
//! ```bash
//! # List links, optionally filtered
//! cargo run --bin admin -- links list --search example --page 2
//!
//! # Create a link with a custom slug
//! cargo run --bin admin -- links create https://example.com --slug promo
//!
//! # Delete a link
//! cargo run --bin admin -- links delete promo
//!
//! # Export links to CSV
//! cargo run --bin admin -- links export --search example
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! Reads the same variables as the server (`DATABASE_URL` or `DB_*`,
//! `PUBLIC_BASE_URL`, `EXPORT_DIR`, `EXPORT_TIMEZONE`).

use link_shortener::application::services::ListLinksQuery;
use link_shortener::config::Config;
use link_shortener::infrastructure::export::LocalExportStorage;
use link_shortener::infrastructure::persistence::PgLinkRepository;
use link_shortener::server::connect_database;
use link_shortener::state::AppState;

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing link-shortener.
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
    /// Manage short links
    Links {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link management subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// List links, newest first
    List {
        /// Only links whose URL contains this text (case-insensitive)
        #[arg(short, long)]
        search: Option<String>,

        #[arg(short, long, default_value_t = 1)]
        page: u32,

        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },

    /// Create a short link
    Create {
        /// Destination URL (http or https)
        url: String,

        /// Custom slug (lowercase letters and digits); generated when omitted
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Permanently delete a link
    Delete {
        slug: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Export links to a CSV report
    Export {
        #[arg(short, long)]
        search: Option<String>,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    let pool = connect_database(&config).await?;

    match cli.command {
        Commands::Links { action } => handle_link_action(action, &config, pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

/// Dispatches link management commands through the application services.
async fn handle_link_action(action: LinkAction, config: &Config, pool: PgPool) -> Result<()> {
    let repo = Arc::new(PgLinkRepository::new(Arc::new(pool)));
    let storage = Arc::new(LocalExportStorage::new(&config.export_dir, &config.public_base_url).await?);
    let state = AppState::build(repo, storage, config.export_timezone, &config.public_base_url);

    match action {
        LinkAction::List {
            search,
            page,
            page_size,
        } => list_links(&state, search, page, page_size).await,
        LinkAction::Create { url, slug } => create_link(&state, url, slug).await,
        LinkAction::Delete { slug, yes } => delete_link(&state, slug, yes).await,
        LinkAction::Export { search } => export_links(&state, search).await,
    }
}

/// Lists links in a table.
///
/// # Output Format
///
/// ```text
/// 📋 Links
///
///   Slug         Visits   Created            URL
///   ──────────────────────────────────────────────────────────────────────
///   promo        42       2026-01-15 10:30   https://example.com/summer
/// ```
async fn list_links(
    state: &AppState,
    search: Option<String>,
    page: u32,
    page_size: u32,
) -> Result<()> {
    println!("{}", "📋 Links".bright_blue().bold());
    println!();

    let result = state
        .link_service
        .list_links(ListLinksQuery {
            search,
            page: Some(page),
            page_size: Some(page_size),
            ..Default::default()
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to list links: {}", e))?;

    if result.items.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<12} {:<8} {:<18} {}",
        "Slug".bright_white().bold(),
        "Visits".bright_white().bold(),
        "Created".bright_white().bold(),
        "URL".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &result.items {
        println!(
            "  {:<12} {:<8} {:<18} {}",
            link.slug.cyan(),
            link.visits.to_string().bright_green(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            link.original_url
        );
    }

    println!();
    println!(
        "  Page {} of {} ({} links)",
        result.page.to_string().bright_white().bold(),
        result.total_pages().to_string().bright_white().bold(),
        result.total.to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

async fn create_link(state: &AppState, url: String, slug: Option<String>) -> Result<()> {
    println!("{}", "🔗 Create Link".bright_blue().bold());
    println!();

    let link = state
        .link_service
        .create_link(url, slug)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create link: {}", e))?;

    println!("{}", "✅ Link created successfully!".green().bold());
    println!();
    println!("  Slug:      {}", link.slug.cyan());
    println!(
        "  Short URL: {}",
        state.link_service.short_url(&link.slug).bright_yellow()
    );
    println!("  Target:    {}", link.original_url);
    println!();

    Ok(())
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(state: &AppState, slug: String, skip_confirm: bool) -> Result<()> {
    println!("{}", "🗑️  Delete Link".bright_blue().bold());
    println!();

    let link = state
        .link_service
        .get_link(&slug)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    println!("  Slug:   {}", link.slug.cyan());
    println!("  Target: {}", link.original_url);
    println!("  Visits: {}", link.visits.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link permanently?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    state
        .link_service
        .delete_link(&slug)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete link: {}", e))?;

    println!("{}", "✅ Link deleted".green().bold());
    println!();

    Ok(())
}

async fn export_links(state: &AppState, search: Option<String>) -> Result<()> {
    println!("{}", "📤 Export Links".bright_blue().bold());
    println!();

    let report = state
        .export_service
        .export_links(search)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to export links: {}", e))?;

    println!(
        "{} {} rows written",
        "✅".green(),
        report.rows.to_string().bright_white().bold()
    );
    println!("  Report: {}", report.report_url.bright_yellow());
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
                .fetch_one(pool)
                .await?;

            println!("{}", "✅ Database connection OK".green().bold());
            println!(
                "  Links: {}",
                links_count.to_string().bright_green().bold()
            );
        }
    }

    Ok(())
}
