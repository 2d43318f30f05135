use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{error, info};

use crate::application::{AppError, CommandProcessor, CommandRequest, menu};
use crate::application::menu::MenuAction;

/// Words that end a session.
const QUIT_WORDS: [&str; 2] = ["quit", "exit"];

/// Outcome counters for a finished session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub handled: usize,
    pub failed: usize,
}

/// Line-oriented chat transport: every non-empty line is one command and
/// every command gets exactly one reply.
///
/// A bare menu number selects a shortcut: zero-argument commands run right
/// away, the others answer with their usage line.
pub struct ChatSession<R, W> {
    processor: CommandProcessor,
    reader: R,
    writer: W,
    greeting: bool,
}

impl<R, W> ChatSession<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(processor: CommandProcessor, reader: R, writer: W) -> Self {
        Self {
            processor,
            reader,
            writer,
            greeting: true,
        }
    }

    /// Whether to print the menu when the session starts.
    pub fn with_greeting(mut self, greeting: bool) -> Self {
        self.greeting = greeting;
        self
    }

    /// Serve commands until EOF or a quit word.
    pub async fn run(mut self) -> Result<SessionSummary> {
        let mut summary = SessionSummary::default();
        info!("Chat session started");

        if self.greeting {
            self.send(&menu::render()).await?;
        }

        let mut line = String::new();
        loop {
            line.clear();
            let read = self
                .reader
                .read_line(&mut line)
                .await
                .context("Failed to read from chat input")?;
            if read == 0 {
                break;
            }

            let input = line.trim();
            if input.is_empty() {
                continue;
            }
            if QUIT_WORDS.contains(&input.to_lowercase().as_str()) {
                break;
            }

            summary.handled += 1;
            let reply = match self.respond(input).await {
                Ok(reply) => reply,
                Err(err) => {
                    summary.failed += 1;
                    error!(input, error = %err, "Command failed");
                    format!("command failed: {}", err)
                }
            };
            self.send(&reply).await?;
        }

        info!(
            handled = summary.handled,
            failed = summary.failed,
            "Chat session ended"
        );
        Ok(summary)
    }

    async fn respond(&self, input: &str) -> Result<String, AppError> {
        match menu::select(input) {
            Some(MenuAction::Run(kind)) => {
                self.processor
                    .process(&CommandRequest::new(kind.name(), Vec::new()))
                    .await
            }
            Some(MenuAction::Prompt(kind)) => Ok(format!("use: {}", kind.usage())),
            None => match CommandRequest::parse_line(input) {
                Some(request) => self.processor.process(&request).await,
                None => Ok(String::new()),
            },
        }
    }

    async fn send(&mut self, text: &str) -> Result<()> {
        let mut message = String::with_capacity(text.len() + 1);
        message.push_str(text);
        message.push('\n');
        self.writer
            .write_all(message.as_bytes())
            .await
            .context("Failed to write chat reply")?;
        self.writer.flush().await.context("Failed to flush chat reply")?;
        Ok(())
    }
}
