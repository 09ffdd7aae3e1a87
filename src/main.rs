use anyhow::{Context, Result};
use clap::Parser;
use hnfeed::app::{App, AppEvent};
use hnfeed::config::Config;
use hnfeed::nav::RouteName;
use hnfeed::source::{AlgoliaSource, StorySource};
use hnfeed::story::Story;
use hnfeed::ui;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "hnfeed", about = "Terminal Hacker News story browser")]
struct Args {
    /// Config file (default: ~/.config/hnfeed/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Seconds between page requests
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    interval: Option<u64>,

    /// Stories per page window
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u64).range(1..))]
    per_page: Option<u64>,

    /// Screen to start on
    #[arg(long, value_name = "SCREEN", value_parser = ["stories", "posts", "counter"])]
    screen: Option<String>,

    /// Write logs to FILE instead of stderr
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Print one page of stories to stdout and exit
    #[arg(long)]
    once: bool,

    /// Page to print with --once
    #[arg(long, default_value_t = 0, requires = "once")]
    page: u32,
}

/// Initialize tracing. Without a log file, output goes to stderr.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::from_default_env();
    match log_file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(io::stderr)
                .init();
        }
    }
    Ok(())
}

/// File config with CLI flags layered on top.
fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = match args.config.clone().or_else(Config::default_path) {
        Some(path) => Config::load(&path)
            .with_context(|| format!("Failed to load config '{}'", path.display()))?,
        None => Config::default(),
    };

    if let Some(secs) = args.interval {
        config.refresh_interval_secs = secs;
    }
    if let Some(n) = args.per_page {
        config.items_per_page = usize::try_from(n).context("--per-page is too large")?;
    }
    if let Some(screen) = &args.screen {
        config.initial_screen = screen.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// One story per block: title, author, date and tags, then a blank line.
fn write_listing(out: &mut impl Write, stories: &[Story]) -> io::Result<()> {
    for (i, story) in stories.iter().enumerate() {
        if i > 0 {
            writeln!(out)?;
        }
        for line in ui::listing_lines(story) {
            writeln!(out, "{}", line)?;
        }
    }
    out.flush()
}

async fn print_once(source: &AlgoliaSource, page: u32) -> Result<()> {
    let stories = source
        .fetch_page(page)
        .await
        .with_context(|| format!("Failed to fetch page {}", page))?;
    tracing::info!(page, count = stories.len(), "Fetched stories");

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_listing(&mut out, &stories).context("Failed to write listing")?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.log_file.as_deref())?;

    let config = resolve_config(&args)?;
    let source = AlgoliaSource::new(&config.api_base_url).context("Failed to create API client")?;

    if args.once {
        return print_once(&source, args.page).await;
    }

    tracing::info!(
        screen = ?RouteName::from_str_name(&config.initial_screen),
        interval_secs = config.refresh_interval_secs,
        per_page = config.items_per_page,
        "Starting hnfeed"
    );

    let mut app = App::new(Arc::new(source), &config);
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;
    Ok(())
}
