pub mod chat;
pub mod config;
pub mod conversation_log;
pub mod detector;
pub mod error;
pub mod locale;
pub mod orchestrator;
pub mod prompts;
pub mod provider;
pub mod rate_limit;
pub mod web_server;

pub use chat::ChatService;
pub use conversation_log::{Channel, ConversationLog, ConversationRecord};
pub use detector::{detect, normalize};
pub use locale::Locale;
pub use orchestrator::{Orchestrator, Reply, ReplyOutcome};
pub use provider::{AnthropicProvider, Completion, CompletionProvider, CompletionRequest, ProviderError};
