use std::env;

/// Sent with every feed and article request
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; ArticleDigest/1.0)";

pub const DEFAULT_SUMMARIZER_ENDPOINT: &str = "https://router.huggingface.co/hf-inference/models";
pub const DEFAULT_SUMMARIZER_MODEL: &str = "sshleifer/distilbart-cnn-12-6";

/// Where the summarization model lives and how to authenticate to it
#[derive(Debug, Clone)]
pub struct SummarizerConfig {
    pub endpoint: String,
    pub model: String,
    pub api_token: Option<String>,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SUMMARIZER_ENDPOINT.to_string(),
            model: DEFAULT_SUMMARIZER_MODEL.to_string(),
            api_token: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub summarizer: SummarizerConfig,
}

impl Config {
    /// Build the configuration from the environment.
    ///
    /// Messaging credentials are not read here; the notifier looks them up
    /// when it first sends.
    pub fn from_env() -> Self {
        Self::try_load_dotenv();

        let defaults = SummarizerConfig::default();
        let summarizer = SummarizerConfig {
            endpoint: non_empty_var("SUMMARIZER_ENDPOINT").unwrap_or(defaults.endpoint),
            model: non_empty_var("SUMMARIZER_MODEL").unwrap_or(defaults.model),
            api_token: non_empty_var("HF_API_TOKEN"),
        };

        Self { summarizer }
    }

    fn try_load_dotenv() {
        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/article-digest/.env
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join("article-digest").join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }

        // If none found, that's okay - variables may be set in the environment
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_hosted_distilbart() {
        let config = Config::default();

        assert_eq!(config.summarizer.endpoint, DEFAULT_SUMMARIZER_ENDPOINT);
        assert_eq!(config.summarizer.model, "sshleifer/distilbart-cnn-12-6");
        assert!(config.summarizer.api_token.is_none());
    }
}
