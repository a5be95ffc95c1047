//! Runtime configuration.
//!
//! Every setting is a command-line flag with an environment variable
//! fallback, so a `.env` file (loaded by `dotenvy` at startup) is enough to
//! run the service.

use clap::Args;
use std::path::PathBuf;

pub const DEFAULT_API_URL: &str = "https://api.anthropic.com";
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";
pub const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Connection settings for the completion provider.
#[derive(Args, Debug, Clone)]
pub struct ProviderConfig {
    /// Anthropic API key.
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Base URL of the Anthropic API.
    #[arg(long, env = "ANTHROPIC_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Model used for every reply.
    #[arg(long, env = "LESSON_CHAT_MODEL", default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Upper bound on generated tokens per reply.
    #[arg(long, env = "LESSON_CHAT_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    pub max_tokens: u32,

    /// Client-side request timeout in seconds. Unset means no timeout.
    #[arg(long, env = "LESSON_CHAT_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,
}

/// Where conversation records are written.
#[derive(Args, Debug, Clone)]
pub struct LogConfig {
    /// Directory holding the daily conversation log files.
    #[arg(long, env = "LESSON_CHAT_LOG_DIR", default_value = "logs")]
    pub log_dir: PathBuf,
}

/// Listener and rate limit settings for the web server.
#[derive(Args, Debug, Clone)]
pub struct ServerConfig {
    #[arg(long, env = "LESSON_CHAT_HOST", default_value = "0.0.0.0", help = "Address to bind the web server to.")]
    pub host: String,

    #[arg(long, env = "PORT", default_value_t = 5000, help = "Port for the web server.")]
    pub port: u16,

    /// Requests per minute per client on the chat endpoints.
    #[arg(long, env = "LESSON_CHAT_CHAT_LIMIT_PER_MINUTE", default_value_t = 5)]
    pub chat_limit_per_minute: u32,

    /// Requests per hour per client across all routes.
    #[arg(long, env = "LESSON_CHAT_LIMIT_PER_HOUR", default_value_t = 100)]
    pub limit_per_hour: u32,

    /// Key rate limits on the first `X-Forwarded-For` hop. Only set this
    /// behind a reverse proxy that overwrites the header.
    #[arg(long, env = "LESSON_CHAT_TRUST_FORWARDED_FOR")]
    pub trust_forwarded_for: bool,
}

impl ServerConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.port == 0 {
            anyhow::bail!("Server port cannot be 0");
        }
        if self.chat_limit_per_minute == 0 || self.limit_per_hour == 0 {
            anyhow::bail!("Rate limits must be greater than 0");
        }
        Ok(())
    }
}

impl ProviderConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_key.trim().is_empty() {
            anyhow::bail!("ANTHROPIC_API_KEY cannot be empty");
        }
        if self.max_tokens == 0 {
            anyhow::bail!("max_tokens must be greater than 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provider_config(api_key: &str, max_tokens: u32) -> ProviderConfig {
        ProviderConfig {
            api_key: api_key.to_string(),
            api_url: DEFAULT_API_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens,
            timeout_secs: None,
        }
    }

    #[test]
    fn test_provider_config_validation() {
        assert!(provider_config("sk-test", DEFAULT_MAX_TOKENS).validate().is_ok());
        assert!(provider_config("  ", DEFAULT_MAX_TOKENS).validate().is_err());
        assert!(provider_config("sk-test", 0).validate().is_err());
    }

    #[test]
    fn test_server_config_validation() {
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 5000,
            chat_limit_per_minute: 5,
            limit_per_hour: 100,
            trust_forwarded_for: false,
        };
        assert!(config.validate().is_ok());
        assert!(ServerConfig { port: 0, ..config.clone() }.validate().is_err());
        assert!(ServerConfig { chat_limit_per_minute: 0, ..config }.validate().is_err());
    }
}
