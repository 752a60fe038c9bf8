//! Binary entry point for feedfilter.
//!
//! This binary provides the CLI interface for the feed filter engine.

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(missing_docs)]
// Allow print_stderr in main binary for CLI output
#![allow(clippy::print_stderr)]
#![allow(clippy::print_stdout)]
// Allow needless_pass_by_value for command functions
#![allow(clippy::needless_pass_by_value)]
// Allow multiple crate versions from transitive dependencies
#![allow(clippy::multiple_crate_versions)]

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use feedfilter::config::FilterConfig;
use feedfilter::models::parse_items;
use feedfilter::observability::{self, EventBus, InitOptions};
use feedfilter::{BlockList, Classifier, FeedItem, FilterStats, FilterWorker, MatchTier};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// Feedfilter - keyword and hashtag filter for video feeds.
#[derive(Parser)]
#[command(name = "feedfilter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Path to the lifetime statistics file.
    #[arg(long, global = true, env = "FEEDFILTER_STATS_PATH")]
    stats_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand)]
enum Commands {
    /// Classify a batch of feed items (JSON array or JSON lines).
    Classify {
        /// Input file (default: stdin).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Blocked keyword; repeat to block several. Overrides the configured list.
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,

        /// Blocked hashtag; repeat to block several. Overrides the configured list.
        #[arg(long = "hashtag")]
        hashtags: Vec<String>,

        /// Match tier: strict, relaxed, or hardened.
        #[arg(short, long)]
        tier: Option<MatchTier>,
    },

    /// Check a single text as if it were an item title.
    Check {
        /// The text to check.
        text: String,

        /// Blocked keyword; repeat to block several. Overrides the configured list.
        #[arg(short, long = "keyword")]
        keywords: Vec<String>,

        /// Match tier: strict, relaxed, or hardened.
        #[arg(short, long)]
        tier: Option<MatchTier>,
    },

    /// Show or reset the lifetime filtered counter.
    Stats {
        /// Reset the counter to zero.
        #[arg(long)]
        reset: bool,
    },

    /// Manage configuration.
    Config {
        /// Show current configuration.
        #[arg(long)]
        show: bool,
    },
}

/// Main entry point.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {e:#}");
            return ExitCode::FAILURE;
        },
    };

    if let Err(e) = observability::init_from_config(
        &config.logging,
        InitOptions {
            verbose: cli.verbose || config.debug_mode,
        },
    ) {
        eprintln!("Failed to initialize logging: {e}");
        return ExitCode::FAILURE;
    }

    match run_command(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        },
    }
}

/// Runs the selected command.
async fn run_command(cli: Cli, config: FilterConfig) -> Result<()> {
    let stats_path = cli.stats_file.or_else(FilterStats::default_path);

    match cli.command {
        Commands::Classify {
            input,
            keywords,
            hashtags,
            tier,
        } => cmd_classify(config, stats_path, input, keywords, hashtags, tier).await,

        Commands::Check {
            text,
            keywords,
            tier,
        } => cmd_check(config, text, keywords, tier),

        Commands::Stats { reset } => cmd_stats(stats_path, reset),

        Commands::Config { show } => cmd_config(&config, show),
    }
}

/// Loads configuration, then applies environment overrides.
///
/// `--config` wins over `FEEDFILTER_CONFIG_PATH`; either must load.
fn load_config(path: Option<&Path>) -> Result<FilterConfig> {
    let explicit = path.map(Path::to_path_buf).or_else(FilterConfig::explicit_path);
    let mut config = match explicit {
        Some(path) => FilterConfig::load_from_file(&path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => FilterConfig::load_default()?,
    };
    config.apply_env_overrides()?;
    Ok(config)
}

/// Builds the block-list, preferring lists given on the command line.
fn block_list(config: &FilterConfig, keywords: &[String], hashtags: &[String]) -> BlockList {
    let keywords = if keywords.is_empty() {
        config.block_keywords.as_slice()
    } else {
        keywords
    };
    let hashtags = if hashtags.is_empty() {
        config.block_hashtags.as_slice()
    } else {
        hashtags
    };
    BlockList::new(keywords, hashtags)
}

/// Classify command.
async fn cmd_classify(
    mut config: FilterConfig,
    stats_path: Option<PathBuf>,
    input: Option<PathBuf>,
    keywords: Vec<String>,
    hashtags: Vec<String>,
    tier: Option<MatchTier>,
) -> Result<()> {
    if let Some(tier) = tier {
        config.tier = tier;
    }
    let block = block_list(&config, &keywords, &hashtags);

    let raw = match &input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        },
    };
    let items: Vec<FeedItem> = parse_items(&raw)?
        .into_iter()
        .map(FeedItem::with_extracted_hashtags)
        .collect();

    let events = config.debug_mode.then(EventBus::default);
    if let Some(bus) = &events {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            while let Ok(event) = rx.recv().await {
                eprintln!("[feedfilter {}] {}", event.meta.source, event.message);
            }
        });
    }

    let worker = FilterWorker::start(&config, events);
    let outcome = worker.process(items, block).await?;
    worker.shutdown()?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);

    if let Some(path) = stats_path {
        if outcome.filtered_count > 0 {
            FilterStats::record(&path, outcome.filtered_count as u64)?;
        }
    }
    Ok(())
}

/// Check command.
fn cmd_check(
    config: FilterConfig,
    text: String,
    keywords: Vec<String>,
    tier: Option<MatchTier>,
) -> Result<()> {
    let block = block_list(&config, &keywords, &[]);
    let mut classifier = Classifier::new(tier.unwrap_or(config.tier));
    let item = FeedItem::new("check", text).with_extracted_hashtags();
    let result = classifier.classify(&item, &block.keywords, &block.hashtags);
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Stats command.
fn cmd_stats(stats_path: Option<PathBuf>, reset: bool) -> Result<()> {
    let path = stats_path.context("no data directory available for statistics")?;
    let mut stats = FilterStats::load(&path)?;
    if reset {
        stats.reset();
        stats.save(&path)?;
        println!("Statistics reset");
        return Ok(());
    }
    println!("Filtered items: {}", stats.filtered_count);
    println!("Batches: {}", stats.batches);
    println!("Stats file: {}", path.display());
    Ok(())
}

/// Config command.
fn cmd_config(config: &FilterConfig, show: bool) -> Result<()> {
    if !show {
        println!("Use --show to display configuration");
        return Ok(());
    }

    println!("Current Configuration");
    println!("=====================");
    println!();
    println!("Filter Enabled: {}", config.filter_enabled);
    println!("Debug Mode: {}", config.debug_mode);
    println!("Match Tier: {}", config.tier);
    println!("Max Pattern Size: {}", config.max_pattern_size);
    println!(
        "Seen Set: compact above {} to {}",
        config.seen.high_water, config.seen.retain
    );
    println!();
    println!("Blocked Keywords ({}):", config.block_keywords.len());
    for keyword in &config.block_keywords {
        println!("  {keyword}");
    }
    println!();
    println!("Blocked Hashtags ({}):", config.block_hashtags.len());
    for hashtag in &config.block_hashtags {
        println!("  {hashtag}");
    }
    Ok(())
}
