//! CLI administration tool for site-bot.
//!
//! Works directly against the configured store, without the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Register a sitemap (resolves it first)
//! cargo run --bin admin -- feeds add https://example.com/sitemap.xml
//!
//! # Monitor domains in search results
//! cargo run --bin admin -- domains add example.com example.org
//!
//! # Run the sitemap check now and wait for the report
//! cargo run --bin admin -- run feeds
//!
//! # Show what is monitored
//! cargo run --bin admin -- status
//!
//! # Send a test notification
//! cargo run --bin admin -- notify test
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`site_bot::config`]. Without `REDIS_URL` the tool
//! works on an empty in-memory store, which is only useful for `run` against
//! nothing and `notify test`.

use site_bot::api::dto::snapshots::SnapshotQuery;
use site_bot::config::load_from_env;
use site_bot::domain::entities::{
    DispatchResult, DomainAddOutcome, DomainRemoveOutcome, RunReport,
};
use site_bot::server::connect_store;
use site_bot::state::{AppMonitor, AppState};

use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// CLI tool for managing site-bot.
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
    /// Manage registered sitemaps
    Feeds {
        #[command(subcommand)]
        action: FeedAction,
    },

    /// Manage search-monitored domains
    Domains {
        #[command(subcommand)]
        action: DomainAction,
    },

    /// Run a monitoring pass now
    Run {
        #[command(subcommand)]
        target: RunTarget,
    },

    /// Show feeds, domains and channels
    Status,

    /// Notification tools
    Notify {
        #[command(subcommand)]
        action: NotifyAction,
    },

    /// Print a stored snapshot
    Snapshot {
        /// Site host, e.g. example.com
        domain: String,

        /// current, latest or dated
        #[arg(short, long, default_value = "current")]
        kind: String,

        /// Day of a dated snapshot (YYYYMMDD, default today)
        #[arg(short, long)]
        date: Option<String>,
    },
}

#[derive(Subcommand)]
enum FeedAction {
    /// Register a sitemap, or refresh it if already registered
    Add { url: String },

    /// Unregister a sitemap
    Remove {
        url: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List registered sitemaps
    List,
}

#[derive(Subcommand)]
enum DomainAction {
    /// Add one or more domains
    Add {
        #[arg(required = true)]
        domains: Vec<String>,
    },

    /// Remove one or more domains and their stored search results
    Remove {
        #[arg(required = true)]
        domains: Vec<String>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// List monitored domains
    List,
}

#[derive(Subcommand)]
enum RunTarget {
    /// Check every registered sitemap
    Feeds,

    /// Check search results of every monitored domain
    Search,
}

#[derive(Subcommand)]
enum NotifyAction {
    /// Send a test message to every enabled channel
    Test,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let cli = Cli::parse();

    let config = load_from_env()?;
    let store = connect_store(&config).await?;
    let state = AppState::build(&config, store)?;
    let monitor = state.monitor;

    match cli.command {
        Commands::Feeds { action } => handle_feed_action(action, &monitor).await?,
        Commands::Domains { action } => handle_domain_action(action, &monitor).await?,
        Commands::Run { target } => handle_run(target, &monitor).await?,
        Commands::Status => handle_status(&monitor).await?,
        Commands::Notify {
            action: NotifyAction::Test,
        } => {
            println!("{}", "📨 Test Notification".bright_blue().bold());
            println!();
            print_dispatch(&monitor.send_test_message().await);
        }
        Commands::Snapshot { domain, kind, date } => {
            handle_snapshot(&monitor, domain, kind, date).await?
        }
    }

    Ok(())
}

async fn handle_feed_action(action: FeedAction, monitor: &Arc<AppMonitor>) -> Result<()> {
    match action {
        FeedAction::Add { url } => {
            println!("{}", "🗺️  Register Sitemap".bright_blue().bold());
            println!();
            println!("  Resolving {} ...", url.cyan());

            let refresh = monitor.feeds().add(&url).await?;

            println!();
            if refresh.newly_registered {
                println!("{}", "✅ Feed registered".green().bold());
            } else {
                println!("{}", "🔄 Feed refreshed".green().bold());
            }
            println!("  Domain:   {}", refresh.domain.cyan());
            println!("  URLs:     {}", refresh.resolved.to_string().bright_white());
            println!(
                "  New URLs: {}",
                refresh.new_urls.len().to_string().bright_yellow()
            );
            for url in refresh.new_urls.iter().take(10) {
                println!("    {}", url.bright_black());
            }
            if refresh.new_urls.len() > 10 {
                println!("    ... and {} more", refresh.new_urls.len() - 10);
            }
        }
        FeedAction::Remove { url, yes } => {
            println!("{}", "🗑️  Unregister Sitemap".bright_blue().bold());
            println!();
            println!("  Feed: {}", url.cyan());
            println!();

            if !yes && !confirm("Remove this feed? Snapshots are kept.")? {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }

            monitor.feeds().remove(&url).await?;
            println!("{}", "✅ Feed removed".green().bold());
        }
        FeedAction::List => {
            println!("{}", "📋 Registered Sitemaps".bright_blue().bold());
            println!();

            let feeds = monitor.feeds().list().await?;
            if feeds.is_empty() {
                println!("{}", "  No feeds registered".yellow());
                return Ok(());
            }
            for (index, url) in feeds.iter().enumerate() {
                println!("  {:<3} {}", (index + 1).to_string().bright_black(), url.cyan());
            }
            println!();
            println!("  Total: {}", feeds.len().to_string().bright_white().bold());
        }
    }

    println!();
    Ok(())
}

async fn handle_domain_action(action: DomainAction, monitor: &Arc<AppMonitor>) -> Result<()> {
    match action {
        DomainAction::Add { domains } => {
            println!("{}", "🔍 Add Monitored Domains".bright_blue().bold());
            println!();

            for domain in domains {
                match monitor.domains().add(&domain).await {
                    Ok(DomainAddOutcome::Added) => {
                        println!("  {} {}", "✅".green(), domain.cyan())
                    }
                    Ok(DomainAddOutcome::AlreadyMonitored) => println!(
                        "  {} {} {}",
                        "➖".yellow(),
                        domain.cyan(),
                        "(already monitored)".bright_black()
                    ),
                    Err(e) => println!("  {} {} {}", "❌".red(), domain.cyan(), e.to_string().red()),
                }
            }
        }
        DomainAction::Remove { domains, yes } => {
            println!("{}", "🗑️  Remove Monitored Domains".bright_blue().bold());
            println!();
            println!("  Domains: {}", domains.join(", ").cyan());
            println!();

            if !yes && !confirm("Remove these domains and their stored search results?")? {
                println!("{}", "❌ Cancelled".red());
                return Ok(());
            }

            for domain in domains {
                match monitor.domains().remove(&domain).await {
                    Ok(DomainRemoveOutcome::Removed) => {
                        println!("  {} {}", "✅".green(), domain.cyan())
                    }
                    Ok(DomainRemoveOutcome::NotMonitored) => println!(
                        "  {} {} {}",
                        "➖".yellow(),
                        domain.cyan(),
                        "(was not monitored)".bright_black()
                    ),
                    Err(e) => println!("  {} {} {}", "❌".red(), domain.cyan(), e.to_string().red()),
                }
            }
        }
        DomainAction::List => {
            println!("{}", "📋 Monitored Domains".bright_blue().bold());
            println!();

            let domains = monitor.domains().list_with_last_check().await?;
            if domains.is_empty() {
                println!("{}", "  No domains monitored".yellow());
                return Ok(());
            }

            println!(
                "  {:<40} {}",
                "Domain".bright_white().bold(),
                "Last check".bright_white().bold()
            );
            println!("  {}", "─".repeat(75).bright_black());
            for item in &domains {
                println!(
                    "  {:<40} {}",
                    item.domain.cyan(),
                    item.last_check.as_deref().unwrap_or("never").bright_black()
                );
            }
            println!();
            println!("  Total: {}", domains.len().to_string().bright_white().bold());
        }
    }

    println!();
    Ok(())
}

async fn handle_run(target: RunTarget, monitor: &Arc<AppMonitor>) -> Result<()> {
    let report = match target {
        RunTarget::Feeds => {
            println!("{}", "⏱️  Sitemap Run".bright_blue().bold());
            monitor.run_scheduled().await?
        }
        RunTarget::Search => {
            println!("{}", "⏱️  Search Monitor Run".bright_blue().bold());
            monitor.run_search_monitor().await?
        }
    };

    print_report(&report);
    Ok(())
}

fn print_report(report: &RunReport) {
    println!();
    if report.items.is_empty() {
        println!("{}", "  Nothing to check".yellow());
        println!();
        return;
    }

    for item in &report.items {
        if item.success {
            println!(
                "  {} {} {}",
                "✅".green(),
                item.target.cyan(),
                format!("{} new", item.new_items).bright_yellow()
            );
        } else {
            let message = item
                .error
                .as_ref()
                .map(|e| e.message.clone())
                .unwrap_or_default();
            println!("  {} {} {}", "❌".red(), item.target.cyan(), message.red());
        }
    }

    println!();
    println!(
        "  Checked: {}  Failed: {}  New: {}",
        report.items.len().to_string().bright_white().bold(),
        report.failed_count().to_string().red(),
        report.total_new.to_string().bright_yellow().bold()
    );
    if let Some(digest) = &report.digest {
        println!();
        println!("{}", "  Digest:".bright_white());
        print_dispatch(digest);
    }
    println!();
}

fn print_dispatch(result: &DispatchResult) {
    if result.total == 0 {
        println!("{}", "  No notification channel enabled".yellow());
        return;
    }

    for (channel, outcome) in &result.channels {
        if outcome.success {
            println!("  {} {}", "✅".green(), channel.cyan());
        } else {
            println!(
                "  {} {} {}",
                "❌".red(),
                channel.cyan(),
                outcome.error.as_deref().unwrap_or("").red()
            );
        }
    }
}

async fn handle_status(monitor: &Arc<AppMonitor>) -> Result<()> {
    println!("{}", "📊 Status".bright_blue().bold());
    println!();

    let status = monitor.status().await?;

    println!("{}", "Feeds:".bright_white().bold());
    if status.feeds.is_empty() {
        println!("{}", "  none".bright_black());
    }
    for feed in &status.feeds {
        println!(
            "  {:<50} {}",
            feed.url.cyan(),
            feed.last_update.as_deref().unwrap_or("never").bright_black()
        );
    }

    println!();
    println!("{}", "Domains:".bright_white().bold());
    if status.domains.is_empty() {
        println!("{}", "  none".bright_black());
    }
    for domain in &status.domains {
        println!(
            "  {:<50} {}",
            domain.domain.cyan(),
            domain.last_check.as_deref().unwrap_or("never").bright_black()
        );
    }

    println!();
    let channels = if status.channels.is_empty() {
        "none".yellow()
    } else {
        status.channels.join(", ").green()
    };
    println!("  Channels:   {}", channels);
    println!(
        "  Search API: {}",
        if status.search_configured {
            "configured".green()
        } else {
            "not configured".yellow()
        }
    );
    println!();

    Ok(())
}

async fn handle_snapshot(
    monitor: &Arc<AppMonitor>,
    domain: String,
    kind: String,
    date: Option<String>,
) -> Result<()> {
    let kind = SnapshotQuery {
        kind: Some(kind),
        date,
    }
    .to_kind()?;

    let snapshot = monitor.snapshot(&domain.to_lowercase(), kind).await?;

    println!(
        "{} {} {}",
        "🗂️  Snapshot".bright_blue().bold(),
        snapshot.domain.cyan(),
        snapshot.kind.bright_black()
    );
    println!();
    for url in &snapshot.urls {
        println!("  {}", url);
    }
    println!();
    println!("  Total: {}", snapshot.urls.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
