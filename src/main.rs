use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tracing::info;

use lesson_chat::config::{LogConfig, ProviderConfig, ServerConfig};
use lesson_chat::web_server::{self, AppState};
use lesson_chat::{chat, AnthropicProvider, ChatService, ConversationLog, Orchestrator};

// Define the command-line interface structure using clap
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

// Define the available subcommands
#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Start the chat web server.
    Start {
        #[command(flatten)]
        server: ServerConfig,
        #[command(flatten)]
        provider: ProviderConfig,
        #[command(flatten)]
        log: LogConfig,
    },
    /// Chat with the assistant in the terminal.
    Chat {
        #[command(flatten)]
        provider: ProviderConfig,
        #[command(flatten)]
        log: LogConfig,
    },
    /// Print the language detected for a piece of text.
    Detect {
        /// Text to classify.
        text: String,
    },
}

fn build_chat_service(provider: &ProviderConfig, log: &LogConfig) -> Result<ChatService> {
    provider.validate()?;
    let client = AnthropicProvider::new(provider).context("Failed to build Anthropic client")?;
    let orchestrator = Orchestrator::new(Arc::new(client), provider.max_tokens);
    let conversation_log = Arc::new(ConversationLog::new(log.log_dir.clone()));
    info!(log_dir = %log.log_dir.display(), model = %provider.model, "Chat service ready");
    Ok(ChatService::new(orchestrator, conversation_log))
}

// The main entry point of the application, using tokio's async runtime
#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (for environment variables like API keys)
    dotenvy::dotenv().ok();

    // Reads log level from RUST_LOG environment variable (e.g., RUST_LOG=info,lesson_chat=debug)
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start {
            server,
            provider,
            log,
        } => {
            server.validate()?;
            info!("Starting lesson chat on {}:{}...", server.host, server.port);
            let chat_service = Arc::new(build_chat_service(&provider, &log)?);
            let state = AppState::new(chat_service, "templates");
            web_server::start_web_server(&server, state).await?;
            info!("Shutdown complete.");
        }
        Commands::Chat { provider, log } => {
            let service = build_chat_service(&provider, &log)?;
            chat::run_interactive_chat(&service)
                .await
                .context("Chat session failed")?;
        }
        Commands::Detect { text } => {
            let locale = lesson_chat::detect(&text);
            println!("{} ({})", locale, locale.code());
        }
    }

    Ok(())
}
