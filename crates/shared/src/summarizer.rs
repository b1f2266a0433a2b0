use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::SummarizerConfig;
use crate::error::{PipelineError, Result};

/// Longest input handed to the model, in characters
pub const MAX_INPUT_CHARS: usize = 1000;

const MAX_SUMMARY_TOKENS: u32 = 130;
const MIN_SUMMARY_TOKENS: u32 = 30;

/// Reduces article text to a short summary.
///
/// Callers bound the input with [`truncate_input`] first.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, text: &str) -> Result<String>;
}

/// Keep the first `MAX_INPUT_CHARS` characters of `text`.
///
/// This bounds model input only; it may cut mid-sentence or mid-word.
pub fn truncate_input(text: &str) -> &str {
    match text.char_indices().nth(MAX_INPUT_CHARS) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

#[derive(Debug, Serialize)]
struct SummaryRequest<'a> {
    inputs: &'a str,
    parameters: GenerationParameters,
}

#[derive(Debug, Serialize)]
struct GenerationParameters {
    max_length: u32,
    min_length: u32,
    do_sample: bool,
}

impl<'a> SummaryRequest<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            inputs: text,
            parameters: GenerationParameters {
                max_length: MAX_SUMMARY_TOKENS,
                min_length: MIN_SUMMARY_TOKENS,
                do_sample: false,
            },
        }
    }
}

#[derive(Debug, Deserialize)]
struct SummaryResponse {
    summary_text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

/// Hosted pretrained summarization model on a Hugging Face inference endpoint.
///
/// Build it once per run and share it by reference; the HTTP client and
/// endpoint are resolved here rather than per article.
pub struct HuggingFaceSummarizer {
    client: Client,
    url: String,
    api_token: Option<String>,
}

impl HuggingFaceSummarizer {
    pub fn new(config: &SummarizerConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .map_err(|e| {
                PipelineError::Summarization(format!("failed to create HTTP client: {}", e))
            })?;

        let url = format!(
            "{}/{}",
            config.endpoint.trim_end_matches('/'),
            config.model
        );

        Ok(Self {
            client,
            url,
            api_token: config.api_token.clone(),
        })
    }
}

#[async_trait]
impl Summarizer for HuggingFaceSummarizer {
    async fn summarize(&self, text: &str) -> Result<String> {
        let mut request = self.client.post(&self.url).json(&SummaryRequest::new(text));
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            PipelineError::Summarization(format!("failed to reach summarization model: {}", e))
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            PipelineError::Summarization(format!("failed to read model response: {}", e))
        })?;

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorResponse>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(PipelineError::Summarization(format!(
                "model returned {}: {}",
                status, detail
            )));
        }

        parse_summary(&body)
    }
}

/// Pick the best (first) summary out of a model response
fn parse_summary(body: &str) -> Result<String> {
    let summaries: Vec<SummaryResponse> = serde_json::from_str(body).map_err(|e| {
        PipelineError::Summarization(format!("failed to parse model response: {}", e))
    })?;

    summaries
        .into_iter()
        .next()
        .map(|s| s.summary_text.trim().to_string())
        .ok_or_else(|| PipelineError::Summarization("model returned no summary".to_string()))
}
