//! picscout main entry point
//!
//! Command-line interface for the breadth-first image discovery crawler.

use clap::Parser;
use picscout::config::{load_config, validate, Config};
use picscout::crawler::start;
use picscout::event::CrawlEvent;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// picscout: breadth-first image discovery crawler
///
/// Crawls each domain breadth-first under a page budget and depth bound,
/// then prints every unique image URL it discovered.
#[derive(Parser, Debug)]
#[command(name = "picscout")]
#[command(version)]
#[command(about = "Breadth-first image discovery crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG", conflicts_with = "domain")]
    config: Option<PathBuf>,

    /// Domain to crawl (repeatable); alternative to a config file
    #[arg(short, long = "domain")]
    domain: Vec<String>,

    /// Maximum domains crawled concurrently
    #[arg(long)]
    concurrency: Option<u32>,

    /// Maximum pages visited per domain
    #[arg(long = "max-pages")]
    max_pages: Option<u32>,

    /// Maximum link depth from each seed page
    #[arg(long = "max-depth")]
    max_depth: Option<u32>,

    /// Disable the headless render fallback
    #[arg(long = "no-render")]
    no_render: bool,

    /// Write the discovered image URLs to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print crawl events as JSON lines while running
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = build_config(&cli)?;
    tracing::info!(
        domains = config.domains.len(),
        concurrency = config.crawler.concurrency,
        "starting picscout"
    );

    let json = cli.json;
    let summary = start(
        config,
        move |event| {
            if json {
                if let Ok(line) = serde_json::to_string(&event) {
                    println!("{}", line);
                }
            } else {
                log_event(&event);
            }
        },
        |_| {},
    )
    .await?;

    export_images(&summary.images, cli.output.as_deref())?;
    Ok(())
}

/// Builds the effective config from a file or from --domain flags
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = if let Some(path) = &cli.config {
        load_config(path)?
    } else if !cli.domain.is_empty() {
        Config::from_domains(cli.domain.clone())
    } else {
        anyhow::bail!("provide a config file or at least one --domain");
    };

    if let Some(concurrency) = cli.concurrency {
        config.crawler.concurrency = concurrency;
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages_per_domain = max_pages;
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if cli.no_render {
        config.crawler.render_fallback = false;
    }

    validate(&config)?;
    Ok(config)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("picscout=info,warn"),
            1 => EnvFilter::new("picscout=debug,info"),
            2 => EnvFilter::new("picscout=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Mirrors crawl events into the log stream
fn log_event(event: &CrawlEvent) {
    match event {
        CrawlEvent::Info { message } => tracing::info!("{}", message),
        CrawlEvent::Progress { domain, url, depth } => {
            tracing::info!("[{}] crawling {} (depth {})", domain, url, depth)
        }
        CrawlEvent::Warn { message } => tracing::warn!("{}", message),
        CrawlEvent::DomainProgress {
            domain,
            pages_visited,
        } => tracing::info!("[{}] {} pages visited", domain, pages_visited),
        CrawlEvent::DomainDone {
            domain,
            processed_domains,
        } => tracing::info!("[{}] done ({} domains processed)", domain, processed_domains),
        CrawlEvent::Error { message } => tracing::error!("{}", message),
        CrawlEvent::Done { unique_images } => {
            tracing::info!("crawl complete: {} unique images", unique_images)
        }
    }
}

/// Writes the newline-delimited image list to a file or stdout
fn export_images(images: &[String], output: Option<&std::path::Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            let mut list = images.join("\n");
            if !list.is_empty() {
                list.push('\n');
            }
            std::fs::write(path, list)?;
            tracing::info!("wrote {} image URLs to {}", images.len(), path.display());
        }
        None => {
            for url in images {
                println!("{}", url);
            }
        }
    }
    Ok(())
}
