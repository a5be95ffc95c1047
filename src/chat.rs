// Chat logic shared by the web UI handlers and the interactive terminal chat.

use anyhow::{Context, Result};
use std::io::{BufRead, Write};
use std::sync::Arc;
use tracing::{error, info};

use crate::conversation_log::{Channel, ConversationLog, ConversationRecord};
use crate::orchestrator::{Orchestrator, Reply};

/// Answers a message and records the exchange in the conversation log.
pub struct ChatService {
    orchestrator: Orchestrator,
    log: Arc<ConversationLog>,
}

impl ChatService {
    pub fn new(orchestrator: Orchestrator, log: Arc<ConversationLog>) -> Self {
        Self { orchestrator, log }
    }

    /// The reply is only returned once its record has been written.
    pub async fn handle(&self, channel: Channel, text: &str) -> Result<Reply> {
        let reply = self.orchestrator.respond(text).await;
        self.record(channel, text, &reply).await?;
        Ok(reply)
    }

    async fn record(&self, channel: Channel, text: &str, reply: &Reply) -> Result<()> {
        let record = ConversationRecord::new(channel, text, &reply.text, reply.locale);
        self.log
            .append(&record)
            .await
            .context("Failed to save conversation")
    }
}

/// Line-based chat on stdin/stdout until EOF or `/quit`.
pub async fn run_interactive_chat(service: &ChatService) -> Result<()> {
    info!("Starting interactive chat...");
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run_chat_session(service, stdin.lock(), stdout.lock()).await?;
    info!("Chat session finished.");
    Ok(())
}

async fn run_chat_session<R: BufRead, W: Write>(
    service: &ChatService,
    input: R,
    mut output: W,
) -> Result<()> {
    writeln!(output, "Ask anything about artificial intelligence. Type /quit to leave.")?;

    let mut lines = input.lines();
    loop {
        write!(output, "> ")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read from stdin")?;
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if message == "/quit" {
            break;
        }

        let reply = service.orchestrator.respond(message).await;
        // A lost record does not end the session; the reply is still shown.
        if let Err(e) = service.record(Channel::Text, message, &reply).await {
            error!("{:#}", e);
        }
        writeln!(output, "\n{}\n", reply.text)?;
    }
    Ok(())
}
