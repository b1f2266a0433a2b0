use async_trait::async_trait;
use feed_rs::model::Link;
use feed_rs::parser;
use reqwest::Client;
use std::time::Duration;

use crate::config::USER_AGENT;
use crate::error::{PipelineError, Result};
use crate::models::{Entry, Source};

const FEED_TIMEOUT_SECS: u64 = 30;

/// Turns a configured source into the entries its feed currently lists.
#[async_trait]
pub trait FeedReader: Send + Sync {
    async fn read(&self, source: &Source) -> Result<Vec<Entry>>;
}

/// Reads RSS, Atom and JSON feeds over HTTP
pub struct HttpFeedReader {
    client: Client,
}

impl HttpFeedReader {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(FEED_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PipelineError::FeedParse(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl FeedReader for HttpFeedReader {
    async fn read(&self, source: &Source) -> Result<Vec<Entry>> {
        let response = self
            .client
            .get(&source.feed_url)
            .send()
            .await
            .map_err(|e| PipelineError::FeedParse(format!("failed to fetch feed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::FeedParse(format!("HTTP error: {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PipelineError::FeedParse(format!("failed to read feed body: {}", e)))?;

        parse_feed(&bytes)
    }
}

/// Parse a feed document into entries, keeping the order the feed lists them in.
///
/// Entries without a link cannot be fetched or deduplicated, so they are dropped.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<Entry>> {
    let feed = parser::parse(bytes)
        .map_err(|e| PipelineError::FeedParse(format!("failed to parse feed: {}", e)))?;

    let entries = feed
        .entries
        .into_iter()
        .filter_map(|entry| {
            let title = entry
                .title
                .map(|t| t.content.trim().to_string())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "(untitled)".to_string());

            match article_link(entry.links) {
                Some(href) => Some(Entry::new(href, title)),
                None => {
                    tracing::warn!(id = %entry.id, title = %title, "feed entry has no link, skipping");
                    None
                }
            }
        })
        .collect();

    Ok(entries)
}

/// The link pointing at the article itself.
///
/// Atom entries may list `replies`, `edit` or `self` links ahead of the
/// article, so an `alternate` (or untyped) link wins over position.
fn article_link(links: Vec<Link>) -> Option<String> {
    let alternate = links
        .iter()
        .position(|l| matches!(l.rel.as_deref(), None | Some("alternate")));

    links
        .into_iter()
        .nth(alternate.unwrap_or(0))
        .map(|l| l.href)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::serve_once;

    #[test]
    fn parses_rss_items_in_order() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Insights</title>
    <link>https://example.com</link>
    <description>Test feed</description>
    <item>
      <title>First Post</title>
      <link>https://example.com/1</link>
    </item>
    <item>
      <title>Second Post</title>
      <link>https://example.com/2</link>
    </item>
  </channel>
</rss>"#;

        let entries = parse_feed(xml.as_bytes()).unwrap();

        assert_eq!(
            entries,
            vec![
                Entry::new("https://example.com/1", "First Post"),
                Entry::new("https://example.com/2", "Second Post"),
            ]
        );
    }

    #[test]
    fn parses_atom_entries() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Publications</title>
  <id>urn:uuid:60a76c80-d399-11d9-b93C-0003939e0af6</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <entry>
    <title>Atom Entry</title>
    <link href="https://example.com/atom-1"/>
    <id>urn:uuid:1225c695-cfb8-4ebb-aaaa-80da344efa6a</id>
    <updated>2024-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

        let entries = parse_feed(xml.as_bytes()).unwrap();

        assert_eq!(entries, vec![Entry::new("https://example.com/atom-1", "Atom Entry")]);
    }

    #[test]
    fn atom_entry_uses_alternate_link_over_earlier_ones() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Blog</title>
  <id>tag:blog.example.com,1999:blog-1</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <entry>
    <id>tag:blog.example.com,1999:blog-1.post-1</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <title>Post</title>
    <link rel="replies" type="application/atom+xml" href="https://blog.example.com/feeds/1/comments"/>
    <link rel="edit" type="application/atom+xml" href="https://blog.example.com/feeds/posts/1"/>
    <link rel="alternate" type="text/html" href="https://blog.example.com/2024/01/post.html"/>
  </entry>
</feed>"#;

        let entries = parse_feed(xml.as_bytes()).unwrap();

        assert_eq!(
            entries,
            vec![Entry::new("https://blog.example.com/2024/01/post.html", "Post")]
        );
    }

    #[test]
    fn falls_back_to_first_link_without_alternate() {
        let xml = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Blog</title>
  <id>tag:blog.example.com,1999:blog-2</id>
  <updated>2024-01-01T00:00:00Z</updated>
  <entry>
    <id>tag:blog.example.com,1999:blog-2.post-1</id>
    <updated>2024-01-01T00:00:00Z</updated>
    <title>Only related</title>
    <link rel="related" href="https://other.example.com/story"/>
    <link rel="via" href="https://via.example.com/story"/>
  </entry>
</feed>"#;

        let entries = parse_feed(xml.as_bytes()).unwrap();

        assert_eq!(entries[0].url, "https://other.example.com/story");
    }

    #[test]
    fn skips_items_without_link_and_defaults_title() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Test</title>
    <link>https://example.com</link>
    <description>Test</description>
    <item>
      <title>No link here</title>
    </item>
    <item>
      <link>https://example.com/untitled</link>
    </item>
  </channel>
</rss>"#;

        let entries = parse_feed(xml.as_bytes()).unwrap();

        assert_eq!(entries, vec![Entry::new("https://example.com/untitled", "(untitled)")]);
    }

    #[tokio::test]
    async fn server_error_is_a_feed_error() {
        let base = serve_once("500 Internal Server Error", "oops").await;
        let reader = HttpFeedReader::new().unwrap();
        let source = Source::new("Down", format!("{}/rss", base));

        let result = reader.read(&source).await;

        match result {
            Err(PipelineError::FeedParse(msg)) => assert!(msg.contains("500")),
            other => panic!("expected feed error, got {other:?}"),
        }
    }

    #[test]
    fn malformed_feed_is_a_feed_error() {
        let result = parse_feed(b"<html><body>not a feed</body></html>");

        assert!(matches!(result, Err(PipelineError::FeedParse(_))));
    }
}
