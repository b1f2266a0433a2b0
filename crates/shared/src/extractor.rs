use async_trait::async_trait;
use reqwest::Client;
use scraper::{Html, Selector};
use std::time::Duration;
use url::Url;

use crate::config::USER_AGENT;
use crate::error::{PipelineError, Result};

const ARTICLE_TIMEOUT_SECS: u64 = 10;

/// Downloads an article and reduces it to readable text.
#[async_trait]
pub trait ArticleFetcher: Send + Sync {
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

pub struct ContentExtractor {
    client: Client,
}

impl ContentExtractor {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(ARTICLE_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PipelineError::Fetch(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl ArticleFetcher for ContentExtractor {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let url = Url::parse(url)
            .map_err(|e| PipelineError::Fetch(format!("invalid URL {}: {}", url, e)))?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| PipelineError::Fetch(format!("failed to send HTTP request: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Fetch(format!("HTTP error: {}", status)));
        }

        let html = response
            .text()
            .await
            .map_err(|e| PipelineError::Fetch(format!("failed to read response body: {}", e)))?;

        extract_paragraphs(&html)
    }
}

/// Collect the text of every `<p>` element, one paragraph per line.
///
/// Whitespace inside a paragraph is collapsed to single spaces. A page with no
/// paragraphs yields an empty string.
pub fn extract_paragraphs(html: &str) -> Result<String> {
    let selector = Selector::parse("p")
        .map_err(|e| PipelineError::Extraction(format!("invalid selector: {}", e)))?;

    let document = Html::parse_document(html);

    let paragraphs: Vec<String> = document
        .select(&selector)
        .map(|p| {
            p.text()
                .flat_map(str::split_whitespace)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    Ok(paragraphs.join("\n"))
}
