//! Terminal host for the chat driver: each stdin line is typed into the input
//! and sent with Enter, replies are printed as they arrive.

use std::io::Write;

use ac_support_chat::services::{
    chat_driver::{ChatDriver, SendTrigger, TriggerKind},
    chat_view::{ChatLog, EntryId, MemoryInput, MessageRole, SendControl},
    relay_client::HttpRelayTransport,
};
use anyhow::{Context, bail};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

#[derive(Parser, Debug)]
#[command(name = "ac-chat", about = "Chat with the AC support relay from a terminal")]
struct Args {
    /// Relay endpoint that receives `{ "prompt": ... }`.
    #[arg(
        long,
        env = "AC_CHAT_ENDPOINT",
        default_value = "http://127.0.0.1:3000/api/diagnose-ac"
    )]
    endpoint: String,
}

#[derive(Default)]
struct TerminalLog {
    next_id: u64,
    last_printed: Option<EntryId>,
}

impl ChatLog for TerminalLog {
    fn append(&mut self, role: MessageRole, text: &str) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;

        let label = match role {
            MessageRole::User => "you",
            MessageRole::Bot => "ai ",
        };
        println!("{label} > {text}");
        self.last_printed = Some(id);
        id
    }

    fn remove(&mut self, entry: EntryId) {
        // Only the most recent line can be taken back off a terminal.
        if self.last_printed == Some(entry) {
            print!("\x1b[1A\x1b[2K");
            self.last_printed = None;
        }
    }

    fn scroll_to_latest(&mut self) {
        if let Err(err) = std::io::stdout().flush() {
            debug!(error = %err, "failed to flush terminal output");
        }
    }
}

#[derive(Default)]
struct StdinControl {
    trigger: Option<SendTrigger>,
}

impl SendControl for StdinControl {
    fn register_send_trigger(&mut self, trigger: SendTrigger) {
        self.trigger = Some(trigger);
    }
}

impl StdinControl {
    /// Feeds stdin into the input until EOF. Each line waits for its reply
    /// before the next one is read.
    async fn pump(self, input: MemoryInput) -> anyhow::Result<()> {
        let Some(trigger) = self.trigger else {
            bail!("no send trigger registered");
        };

        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Some(line) = lines.next_line().await.context("reading stdin")? {
            input.set(line);
            if trigger.fire_and_wait(TriggerKind::EnterKey).await.is_none() {
                break;
            }
        }

        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .init();

    let args = Args::parse();

    let input = MemoryInput::new();
    let driver = ChatDriver::new(
        TerminalLog::default(),
        input.clone(),
        HttpRelayTransport::new(args.endpoint),
    );

    let mut control = StdinControl::default();
    driver.attach(&mut control);
    let worker = tokio::spawn(driver.run());

    control.pump(input).await?;
    worker.await.context("chat driver task failed")?;

    Ok(())
}
