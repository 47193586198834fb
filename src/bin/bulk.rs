//! Batch shortening tool for link-gateway.
//!
//! Runs the same shortener client, cache and rate limit as the server against
//! a JSON export of content items, without going through HTTP.
//!
//! # Usage
//!
//! ```bash
//! # Report which items would get short links
//! cargo run --bin bulk -- check items.json
//!
//! # Shorten all eligible items, pausing between items
//! cargo run --bin bulk -- run items.json
//!
//! # Include legacy items and write the report to a file
//! cargo run --bin bulk -- run items.json --include-ineligible --output report.json
//!
//! # Shorten a single URL
//! cargo run --bin bulk -- shorten https://example.com/blog/my-post
//! ```
//!
//! # Input Format
//!
//! A JSON array of content items:
//!
//! ```json
//! [{ "_id": "abc", "slug": { "current": "my-post" }, "title": "My post", "publishedAt": "2025-10-01T09:00:00Z" }]
//! ```
//!
//! # Environment Variables
//!
//! Same as the server; see [`link_gateway::config`].

use link_gateway::application::services::{BulkJob, BulkOptions, BulkProgress};
use link_gateway::config::{self, Config};
use link_gateway::domain::entities::{ContentItem, ShortenOptions};
use link_gateway::server::build_state;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::io::Write;
use std::path::PathBuf;
use tokio::sync::watch;

/// CLI tool for batch shortening.
#[derive(Parser)]
#[command(name = "bulk")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the eligibility verdict for every item
    Check {
        /// JSON file with an array of content items
        file: PathBuf,
    },

    /// Shorten items from a file
    Run {
        /// JSON file with an array of content items
        file: PathBuf,

        /// Also shorten items that fail eligibility
        #[arg(long)]
        include_ineligible: bool,

        /// Override the publish-date cutoff for every item
        #[arg(long)]
        force: bool,

        /// Write the JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Shorten a single long URL
    Shorten {
        url: String,

        /// Explicit alias to request
        #[arg(short, long)]
        alias: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = config::load_from_env()?;

    match cli.command {
        Commands::Check { file } => check(&config, &file)?,
        Commands::Run {
            file,
            include_ineligible,
            force,
            output,
            yes,
        } => {
            let options = BulkOptions {
                include_ineligible,
                force,
            };
            run(&config, &file, options, output, yes).await?;
        }
        Commands::Shorten { url, alias } => shorten(&config, &url, alias).await?,
    }

    Ok(())
}

fn load_items(file: &PathBuf) -> Result<Vec<ContentItem>> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("{} is not a JSON array of content items", file.display()))
}

/// Prints the eligibility table without touching the provider.
fn check(config: &Config, file: &PathBuf) -> Result<()> {
    let items = load_items(file)?;
    let validator = config.eligibility_validator();

    println!(
        "{} {} items, cutoff {}",
        "🔎 Eligibility".bright_blue().bold(),
        items.len(),
        validator.cutoff().to_rfc3339()
    );
    println!();

    let mut eligible = 0;
    for item in &items {
        let verdict = validator.validate(item);
        if verdict.is_eligible {
            eligible += 1;
            println!("  {} {}", "✓".green(), item.report_key());
        } else {
            println!(
                "  {} {} {}",
                "✗".red(),
                item.report_key(),
                format!("({})", verdict.reasons.join("; ")).dimmed()
            );
        }
    }

    println!();
    println!(
        "{} of {} items eligible",
        eligible.to_string().bold(),
        items.len()
    );

    Ok(())
}

/// Runs a batch with a live progress line.
async fn run(
    config: &Config,
    file: &PathBuf,
    options: BulkOptions,
    output: Option<PathBuf>,
    skip_confirm: bool,
) -> Result<()> {
    let items = load_items(file)?;
    let state = build_state(config).await?;

    let plan = state.bulk.plan(&items, options);
    let selected = plan.selected.len();

    println!("{}", "🔗 Bulk shorten".bright_blue().bold());
    println!();
    println!("  Items:     {}", items.len());
    println!("  Selected:  {}", selected.to_string().green());
    println!("  Skipped:   {}", plan.skipped.len().to_string().yellow());
    println!(
        "  Pacing:    {}ms between items (~{}s)",
        state.bulk.delay().as_millis(),
        (state.bulk.delay() * selected.saturating_sub(1) as u32).as_secs()
    );
    if !state.shortener.is_configured() {
        println!(
            "  {}",
            "⚠️  No SHORTENER_API_KEY set; long URLs will be returned".yellow()
        );
    }
    println!();

    if selected == 0 {
        println!("{}", "Nothing to do".dimmed());
        return Ok(());
    }

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Shorten {} items?", selected))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".yellow());
            return Ok(());
        }
    }

    let (tx, mut rx) = watch::channel(BulkProgress::default());
    let printer = tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let progress = *rx.borrow_and_update();
            print!("\r  Progress: {}/{}", progress.completed, progress.total);
            let _ = std::io::stdout().flush();
        }
        println!();
    });

    let job = state.bulk.run_batch_with_progress(&items, options, &tx).await;
    drop(tx);
    let _ = printer.await;

    print_report(&job);

    if let Some(path) = output {
        let json = serde_json::to_string_pretty(&job)?;
        std::fs::write(&path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!("Report written to {}", path.display().to_string().cyan());
    }

    Ok(())
}

fn print_report(job: &BulkJob) {
    println!();
    for entry in &job.results {
        let result = &entry.result;
        if result.is_shortened() {
            println!(
                "  {} {} → {}",
                "✓".green(),
                entry.id,
                result.short_url.cyan()
            );
        } else {
            let reason = job
                .error_for(&entry.id)
                .map(str::to_string)
                .unwrap_or_else(|| "unchanged".to_string());
            println!("  {} {} ({})", "!".yellow(), entry.id, reason.yellow());
        }
    }

    for error in job.errors.iter().filter(|e| job.result_for(&e.id).is_none()) {
        println!("  {} {}: {}", "✗".red(), error.id, error.message.red());
    }

    println!();
    println!(
        "{} shortened, {} with errors, {} skipped",
        job.shortened_count().to_string().green().bold(),
        job.errors.len().to_string().red(),
        job.skipped.len().to_string().yellow()
    );
}

async fn shorten(config: &Config, url: &str, alias: Option<String>) -> Result<()> {
    let state = build_state(config).await?;
    let options = ShortenOptions {
        domain: None,
        alias,
    };

    let result = state.shortener.shorten(url, &options).await;

    if result.is_shortened() {
        println!("{} {}", "✓".green(), result.short_url.cyan().bold());
    } else {
        println!(
            "{} {} ({})",
            "!".yellow(),
            result.short_url,
            result
                .error_reason
                .map(|r| r.to_string())
                .unwrap_or_default()
                .yellow()
        );
    }

    let status = state.shortener.rate_limit_status();
    println!(
        "{}",
        format!(
            "Rate limit: {}/{} in window",
            status.requests_in_window, status.max_requests
        )
        .dimmed()
    );

    Ok(())
}
