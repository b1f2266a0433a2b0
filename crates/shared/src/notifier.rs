use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::env;
use std::time::Duration;

use crate::error::{PipelineError, Result};

const TWILIO_API_BASE: &str = "https://api.twilio.com/2010-04-01";

pub const ACCOUNT_SID_VAR: &str = "TWILIO_ACCOUNT_SID";
pub const AUTH_TOKEN_VAR: &str = "TWILIO_AUTH_TOKEN";
pub const SENDER_VAR: &str = "TWILIO_WHATSAPP_FROM";
pub const RECIPIENT_VAR: &str = "WHATSAPP_TO";

/// Delivers a finished message body to the reader.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, body: &str) -> Result<()>;
}

/// Render the message for one article: source, title, summary and link on
/// separate lines.
pub fn format_message(source: &str, title: &str, summary: &str, url: &str) -> String {
    format!("{}\n{}\n{}\n{}", source, title, summary, url)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TwilioCredentials {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
    pub to: String,
}

impl TwilioCredentials {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Resolve every credential through `lookup`; the first missing one fails.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| PipelineError::Auth(format!("{} not set", key)))
        };

        Ok(Self {
            account_sid: get(ACCOUNT_SID_VAR)?,
            auth_token: get(AUTH_TOKEN_VAR)?,
            from: get(SENDER_VAR)?,
            to: get(RECIPIENT_VAR)?,
        })
    }
}

#[derive(Debug, Deserialize)]
struct TwilioError {
    message: String,
}

/// Sends WhatsApp messages through the Twilio Messages API.
///
/// Credentials are read from the environment on every send, so a missing
/// variable fails that message only.
pub struct TwilioNotifier {
    client: Client,
    api_base: String,
}

impl TwilioNotifier {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PipelineError::Delivery(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_base: TWILIO_API_BASE.to_string(),
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn messages_url(&self, account_sid: &str) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            self.api_base.trim_end_matches('/'),
            urlencoding::encode(account_sid)
        )
    }

    pub async fn send_with(&self, credentials: &TwilioCredentials, body: &str) -> Result<()> {
        let response = self
            .client
            .post(self.messages_url(&credentials.account_sid))
            .basic_auth(&credentials.account_sid, Some(&credentials.auth_token))
            .form(&[
                ("From", credentials.from.as_str()),
                ("To", credentials.to.as_str()),
                ("Body", body),
            ])
            .send()
            .await
            .map_err(|e| PipelineError::Delivery(format!("failed to reach Twilio: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response
            .text()
            .await
            .unwrap_or_else(|_| String::from("unknown error"));
        Err(classify_failure(status, &text))
    }
}

#[async_trait]
impl Notifier for TwilioNotifier {
    async fn send(&self, body: &str) -> Result<()> {
        let credentials = TwilioCredentials::from_env()?;
        self.send_with(&credentials, body).await
    }
}

/// Map a rejected Twilio request onto the error taxonomy
fn classify_failure(status: StatusCode, body: &str) -> PipelineError {
    let detail = serde_json::from_str::<TwilioError>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| body.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            PipelineError::Auth(format!("Twilio rejected credentials ({}): {}", status, detail))
        }
        _ => PipelineError::Delivery(format!("Twilio returned {}: {}", status, detail)),
    }
}

/// Logs messages instead of sending them. Used for dry runs.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, body: &str) -> Result<()> {
        tracing::info!(body = %body, "dry run, message not sent");
        Ok(())
    }
}
