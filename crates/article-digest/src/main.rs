use anyhow::{Context, Result};
use clap::Parser;
use shared::{
    default_sources, Config, ContentExtractor, HttpFeedReader, HuggingFaceSummarizer,
    LogNotifier, Notifier, Pipeline, SeenStore, TwilioNotifier,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "article-digest")]
#[command(about = "Summarize new articles from RSS feeds and send them over WhatsApp")]
struct Args {
    /// File recording the article URLs that were already sent
    #[arg(long, env = "SEEN_FILE", default_value = "seen_urls.txt")]
    seen_file: PathBuf,

    /// Log messages instead of sending them, and leave the seen file untouched
    #[arg(long)]
    dry_run: bool,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loads .env first so clap can see SEEN_FILE from it
    let config = Config::from_env();
    let args = Args::parse();
    init_logging();

    let sources = default_sources();
    let store = SeenStore::new(&args.seen_file);

    let feeds = HttpFeedReader::new().context("Failed to create feed reader")?;
    let extractor = ContentExtractor::new().context("Failed to create content extractor")?;

    println!("🤖 Preparing summarization model {}...", config.summarizer.model);
    let summarizer =
        HuggingFaceSummarizer::new(&config.summarizer).context("Failed to create summarizer")?;

    let notifier: Box<dyn Notifier> = if args.dry_run {
        println!("🧪 Dry run: messages will be logged, not sent");
        Box::new(LogNotifier)
    } else {
        Box::new(TwilioNotifier::new().context("Failed to create notifier")?)
    };

    let mut pipeline = Pipeline::new(&feeds, &extractor, &summarizer, notifier.as_ref());
    if args.dry_run {
        pipeline = pipeline.without_persisting();
    }

    println!("\n📰 Checking {} feeds...", sources.len());
    let report = pipeline
        .run(&sources, &store)
        .await
        .with_context(|| format!("Failed to update {}", store.path().display()))?;

    let elapsed = report.finished_at - report.started_at;
    println!(
        "\n✓ Sent {} new articles, skipped {} already seen ({}s)",
        report.sent,
        report.skipped,
        elapsed.num_seconds()
    );
    if report.sources_failed > 0 {
        println!(
            "⚠ {} of {} feeds could not be read",
            report.sources_failed,
            sources.len()
        );
    }
    if !report.failures.is_empty() {
        println!("\n⚠ Failed to process {} articles (will retry next run):", report.failed());
        for (url, reason) in &report.failures {
            println!("  ✗ {}", url);
            println!("    {}", reason);
        }
    }

    Ok(())
}
