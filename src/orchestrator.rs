//! Turns a user utterance into the text shown back to the user.
//!
//! The orchestrator never fails: provider errors become a canned apology in
//! the detected language, and an empty provider reply becomes a placeholder.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::detector;
use crate::locale::Locale;
use crate::prompts;
use crate::provider::{CompletionProvider, CompletionRequest};

/// Sampling is pinned so identical inputs give stable phrasing.
pub const TEMPERATURE: f32 = 0.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyOutcome {
    Generated,
    Placeholder,
    Apology,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub locale: Locale,
    pub text: String,
    pub outcome: ReplyOutcome,
}

#[derive(Clone)]
pub struct Orchestrator {
    provider: Arc<dyn CompletionProvider>,
    max_tokens: u32,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn CompletionProvider>, max_tokens: u32) -> Self {
        Self {
            provider,
            max_tokens,
        }
    }

    /// Request sent to the provider for `text` in `locale`.
    pub fn build_request(&self, locale: Locale, text: &str) -> CompletionRequest {
        CompletionRequest {
            system: prompts::system_instruction(locale).to_string(),
            user_text: text.to_string(),
            max_tokens: self.max_tokens,
            temperature: TEMPERATURE,
        }
    }

    pub async fn respond(&self, text: &str) -> Reply {
        let locale = detector::detect(text);
        info!(%locale, "Answering user message");

        let request = self.build_request(locale, text);
        debug!(system = %request.system, "Built completion request");

        match self.provider.complete(&request).await {
            Ok(completion) => {
                let (body, outcome) = if completion.text.trim().is_empty() {
                    warn!(%locale, "Provider returned an empty reply");
                    (prompts::no_reply_placeholder(locale), ReplyOutcome::Placeholder)
                } else {
                    (completion.text.as_str(), ReplyOutcome::Generated)
                };
                Reply {
                    locale,
                    text: format!("{}\n\n{}", body, prompts::postscript(locale)),
                    outcome,
                }
            }
            Err(e) => {
                warn!(%locale, error = %e, "Completion provider failed");
                Reply {
                    locale,
                    text: prompts::apology(locale).to_string(),
                    outcome: ReplyOutcome::Apology,
                }
            }
        }
    }
}
