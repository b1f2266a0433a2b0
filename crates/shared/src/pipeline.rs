use chrono::Utc;
use std::collections::HashSet;

use crate::error::Result;
use crate::extractor::ArticleFetcher;
use crate::feed::FeedReader;
use crate::models::{Entry, EntryOutcome, RunReport, Source};
use crate::notifier::{format_message, Notifier};
use crate::seen::SeenStore;
use crate::summarizer::{truncate_input, Summarizer};

/// One pass over every configured source.
///
/// The collaborators are built once by the caller and borrowed for the whole
/// run, so the summarization model is set up a single time no matter how many
/// articles are processed. Everything runs sequentially.
pub struct Pipeline<'a> {
    feeds: &'a dyn FeedReader,
    fetcher: &'a dyn ArticleFetcher,
    summarizer: &'a dyn Summarizer,
    notifier: &'a dyn Notifier,
    persist: bool,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        feeds: &'a dyn FeedReader,
        fetcher: &'a dyn ArticleFetcher,
        summarizer: &'a dyn Summarizer,
        notifier: &'a dyn Notifier,
    ) -> Self {
        Self {
            feeds,
            fetcher,
            summarizer,
            notifier,
            persist: true,
        }
    }

    /// Leave the seen-set file untouched at the end of the run
    pub fn without_persisting(mut self) -> Self {
        self.persist = false;
        self
    }

    /// Load the seen-set, process every source in order, then write the
    /// seen-set back once.
    ///
    /// Feed and entry failures are logged and counted, never propagated; only
    /// seen-set storage errors abort the run.
    pub async fn run(&self, sources: &[Source], store: &SeenStore) -> Result<RunReport> {
        let mut report = RunReport::new(Utc::now());
        let mut seen = store.load()?;
        tracing::info!(count = seen.len(), path = %store.path().display(), "loaded seen-set");

        for source in sources {
            let entries = match self.feeds.read(source).await {
                Ok(entries) => entries,
                Err(e) => {
                    tracing::warn!(source = %source.name, feed = %source.feed_url, error = %e, "failed to read feed");
                    report.sources_failed += 1;
                    continue;
                }
            };
            report.sources_processed += 1;
            tracing::info!(source = %source.name, entries = entries.len(), "read feed");

            for entry in &entries {
                let outcome = self.process_entry(source, entry, &seen).await;
                if outcome == EntryOutcome::Sent {
                    seen.insert(entry.url.clone());
                }
                report.record(&entry.url, outcome);
            }
        }

        if self.persist {
            store.save(&seen)?;
            tracing::info!(count = seen.len(), "saved seen-set");
        }

        report.finished_at = Utc::now();
        Ok(report)
    }

    /// Decide what to do with one entry and do it
    pub async fn process_entry(
        &self,
        source: &Source,
        entry: &Entry,
        seen: &HashSet<String>,
    ) -> EntryOutcome {
        if seen.contains(&entry.url) {
            tracing::debug!(url = %entry.url, "already sent, skipping");
            return EntryOutcome::Skipped;
        }

        match self.deliver(source, entry).await {
            Ok(()) => {
                tracing::info!(source = %source.name, url = %entry.url, title = %entry.title, "sent summary");
                EntryOutcome::Sent
            }
            Err(e) => {
                tracing::warn!(url = %entry.url, error = %e, "failed to process entry");
                EntryOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Extract, summarize and notify, stopping at the first failing stage
    async fn deliver(&self, source: &Source, entry: &Entry) -> Result<()> {
        let content = self.fetcher.fetch_text(&entry.url).await?;
        let summary = self.summarizer.summarize(truncate_input(&content)).await?;
        let body = format_message(&source.name, &entry.title, &summary, &entry.url);
        self.notifier.send(&body).await
    }
}
