use chrono::{DateTime, Utc};

/// A configured feed to poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    pub name: String,
    pub feed_url: String,
}

impl Source {
    pub fn new(name: impl Into<String>, feed_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            feed_url: feed_url.into(),
        }
    }
}

/// Feeds polled when nothing else is configured
pub fn default_sources() -> Vec<Source> {
    vec![
        Source::new(
            "Accenture Blog",
            "https://www.accenture.com/us-en/blogs/blogs-index-rss",
        ),
        Source::new("McKinsey Insights", "https://www.mckinsey.com/insights/rss"),
        Source::new("BCG Publications", "https://www.bcg.com/feeds/publications"),
    ]
}

/// One item parsed out of a feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub url: String,
    pub title: String,
}

impl Entry {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
        }
    }
}

/// What happened to a single feed entry during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome {
    Skipped,
    Sent,
    Failed { reason: String },
}

/// Totals collected over one pass of the pipeline
#[derive(Debug, Clone)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub sources_processed: usize,
    pub sources_failed: usize,
    pub sent: usize,
    pub skipped: usize,
    /// (url, reason) for every entry that will be retried next run
    pub failures: Vec<(String, String)>,
}

impl RunReport {
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            sources_processed: 0,
            sources_failed: 0,
            sent: 0,
            skipped: 0,
            failures: Vec::new(),
        }
    }

    pub fn record(&mut self, url: &str, outcome: EntryOutcome) {
        match outcome {
            EntryOutcome::Skipped => self.skipped += 1,
            EntryOutcome::Sent => self.sent += 1,
            EntryOutcome::Failed { reason } => self.failures.push((url.to_string(), reason)),
        }
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_sources_are_named_and_ordered() {
        let sources = default_sources();
        let names: Vec<&str> = sources.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            vec!["Accenture Blog", "McKinsey Insights", "BCG Publications"]
        );
    }

    #[test]
    fn report_counts_each_outcome() {
        let mut report = RunReport::new(Utc::now());
        report.record("https://x.com/a", EntryOutcome::Sent);
        report.record("https://x.com/b", EntryOutcome::Skipped);
        report.record(
            "https://x.com/c",
            EntryOutcome::Failed {
                reason: "boom".to_string(),
            },
        );

        assert_eq!(report.sent, 1);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed(), 1);
        assert_eq!(
            report.failures[0],
            ("https://x.com/c".to_string(), "boom".to_string())
        );
    }
}
