// Public modules
pub mod config;
pub mod error;
pub mod extractor;
pub mod feed;
pub mod models;
pub mod notifier;
pub mod pipeline;
pub mod seen;
pub mod summarizer;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use config::{Config, SummarizerConfig};
pub use error::PipelineError;
pub use extractor::{ArticleFetcher, ContentExtractor};
pub use feed::{FeedReader, HttpFeedReader};
pub use models::{default_sources, Entry, EntryOutcome, RunReport, Source};
pub use notifier::{LogNotifier, Notifier, TwilioNotifier};
pub use pipeline::Pipeline;
pub use seen::SeenStore;
pub use summarizer::{HuggingFaceSummarizer, Summarizer};
