// src/services/chat_driver.rs
//! Chat UI driver: turns a send action into one round trip to the relay and
//! renders the outcome into the injected log.
//!
//! Triggers are consumed one at a time in the order they were fired, so at most
//! one exchange is in flight per driver. A trigger fired mid-exchange waits its
//! turn and reads the input only when it runs.

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use crate::message::ChatRequest;
use crate::services::chat_view::{ChatLog, EntryId, InputField, MessageRole, SendControl};
use crate::services::relay_client::RelayTransport;

pub const THINKING_PLACEHOLDER: &str = "AI sedang berpikir...";
pub const CLIENT_ERROR_MESSAGE: &str = "Maaf, terjadi kesalahan. Coba lagi nanti.";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerKind {
    Button,
    EnterKey,
}

impl TriggerKind {
    /// Only Enter sends; every other key is ordinary typing.
    pub fn from_key(key: &str) -> Option<Self> {
        (key == "Enter").then_some(Self::EnterKey)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExchangeOutcome {
    /// Input was blank; nothing rendered, nothing sent.
    Skipped,
    Replied,
    Failed,
}

#[derive(Debug)]
struct TriggerEvent {
    kind: TriggerKind,
    done: Option<oneshot::Sender<ExchangeOutcome>>,
}

/// Handed to the host through [`SendControl::register_send_trigger`].
#[derive(Debug, Clone)]
pub struct SendTrigger {
    tx: mpsc::UnboundedSender<TriggerEvent>,
}

impl SendTrigger {
    /// Fire and forget. Returns `false` once the driver has stopped.
    pub fn fire(&self, kind: TriggerKind) -> bool {
        self.tx.send(TriggerEvent { kind, done: None }).is_ok()
    }

    pub fn key_press(&self, key: &str) -> bool {
        match TriggerKind::from_key(key) {
            Some(kind) => self.fire(kind),
            None => false,
        }
    }

    /// Fire and wait until the resulting exchange has been rendered.
    pub async fn fire_and_wait(&self, kind: TriggerKind) -> Option<ExchangeOutcome> {
        let (done, finished) = oneshot::channel();
        self.tx
            .send(TriggerEvent {
                kind,
                done: Some(done),
            })
            .ok()?;
        finished.await.ok()
    }
}

struct Panel<L, I, T> {
    log: L,
    input: I,
    transport: T,
}

impl<L: ChatLog, I: InputField, T: RelayTransport> Panel<L, I, T> {
    fn append(&mut self, role: MessageRole, text: &str) -> EntryId {
        let id = self.log.append(role, text);
        self.log.scroll_to_latest();
        id
    }

    async fn send_message(&mut self) -> ExchangeOutcome {
        let prompt = self.input.value().trim().to_string();
        if prompt.is_empty() {
            return ExchangeOutcome::Skipped;
        }

        self.append(MessageRole::User, &prompt);
        self.input.clear();
        let placeholder = self.append(MessageRole::Bot, THINKING_PLACEHOLDER);

        let result = self.transport.submit(&ChatRequest::new(prompt)).await;
        self.log.remove(placeholder);

        match result {
            Ok(reply) => {
                self.append(MessageRole::Bot, &reply.response);
                ExchangeOutcome::Replied
            }
            Err(err) => {
                warn!(error = %err, "chat exchange failed");
                self.append(MessageRole::Bot, CLIENT_ERROR_MESSAGE);
                ExchangeOutcome::Failed
            }
        }
    }
}

pub struct ChatDriver<L, I, T> {
    panel: Panel<L, I, T>,
    triggers_tx: mpsc::UnboundedSender<TriggerEvent>,
    triggers_rx: mpsc::UnboundedReceiver<TriggerEvent>,
}

impl<L: ChatLog, I: InputField, T: RelayTransport> ChatDriver<L, I, T> {
    pub fn new(log: L, input: I, transport: T) -> Self {
        let (triggers_tx, triggers_rx) = mpsc::unbounded_channel();
        Self {
            panel: Panel {
                log,
                input,
                transport,
            },
            triggers_tx,
            triggers_rx,
        }
    }

    pub fn trigger(&self) -> SendTrigger {
        SendTrigger {
            tx: self.triggers_tx.clone(),
        }
    }

    pub fn attach<C: SendControl + ?Sized>(&self, control: &mut C) {
        control.register_send_trigger(self.trigger());
    }

    /// One exchange, driven directly rather than through a trigger.
    pub async fn send_message(&mut self) -> ExchangeOutcome {
        self.panel.send_message().await
    }

    /// Serves triggers until every [`SendTrigger`] handed out has been dropped.
    pub async fn run(self) {
        let ChatDriver {
            mut panel,
            triggers_tx,
            mut triggers_rx,
        } = self;
        drop(triggers_tx);

        while let Some(event) = triggers_rx.recv().await {
            debug!(kind = ?event.kind, "send triggered");
            let outcome = panel.send_message().await;
            if let Some(done) = event.done {
                let _ = done.send(outcome);
            }
        }

        debug!("all send triggers dropped, chat driver stopping");
    }
}
