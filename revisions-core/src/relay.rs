//! Message relay between the three surfaces.
//!
//! Every envelope names its destination. The relay pumps a single queue
//! until it is empty, so a command and every hop it triggers are delivered
//! in send order before the caller regains control.

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::coordinator::Coordinator;
use crate::document::DocumentSurface;
use crate::message::Message;
use crate::popup::PopupState;

/// Where a message is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Owns the page tier and the revision store.
    Document,
    /// Holds credentials and talks to the network.
    Coordinator,
    /// The user-facing control surface.
    Ui,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub to: Surface,
    pub message: Message,
}

/// Sending half handed to each surface.
#[derive(Debug, Clone)]
pub struct Outbox {
    tx: UnboundedSender<Envelope>,
}

impl Outbox {
    pub fn send(&self, to: Surface, message: Message) {
        let event = message.event();
        if self.tx.send(Envelope { to, message }).is_err() {
            debug!(event, ?to, "Relay is gone, dropping message");
        }
    }
}

pub struct Relay {
    outbox: Outbox,
    inbox: UnboundedReceiver<Envelope>,
    document: DocumentSurface,
    coordinator: Coordinator,
    popup: PopupState,
}

impl Relay {
    /// A fresh queue, for wiring a relay or driving one surface alone.
    pub fn channel() -> (Outbox, UnboundedReceiver<Envelope>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Outbox { tx }, rx)
    }

    pub fn new(document: DocumentSurface, coordinator: Coordinator, popup: PopupState) -> Self {
        let (outbox, inbox) = Self::channel();
        Self {
            outbox,
            inbox,
            document,
            coordinator,
            popup,
        }
    }

    pub fn outbox(&self) -> &Outbox {
        &self.outbox
    }

    /// Queues a message; nothing is delivered until [`Relay::run_until_idle`].
    pub fn send(&self, to: Surface, message: Message) {
        self.outbox.send(to, message);
    }

    pub fn document(&self) -> &DocumentSurface {
        &self.document
    }

    pub fn popup(&self) -> &PopupState {
        &self.popup
    }

    /// Delivers queued envelopes until none are left.
    ///
    /// Returns the messages the UI received, in delivery order.
    pub async fn run_until_idle(&mut self) -> Vec<Message> {
        let mut delivered = Vec::new();

        loop {
            let envelope = match self.inbox.try_recv() {
                Ok(envelope) => envelope,
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            };
            debug!(event = envelope.message.event(), to = ?envelope.to, "Delivering message");

            match envelope.to {
                Surface::Document => self.document.handle(envelope.message, &self.outbox),
                Surface::Coordinator => {
                    self.coordinator
                        .handle(envelope.message, &self.outbox)
                        .await
                }
                Surface::Ui => {
                    if self.popup.apply(&envelope.message) {
                        delivered.push(envelope.message);
                    }
                }
            }
        }

        delivered
    }
}
