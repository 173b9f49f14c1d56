//! Caller-owned outbox of built messages

use crate::error::{Error, FetchError, Result};
use crate::service::MailService;
use crate::types::{MessageRef, OutboundMessage};
use tracing::{info, warn};

/// Append-only list of built messages, addressed by index.
///
/// Indices are handed out by [`Session::add`] and stay valid for the life of
/// the session.
#[derive(Debug, Clone, Default)]
pub struct Session {
    messages: Vec<OutboundMessage>,
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its index
    pub fn add(&mut self, message: OutboundMessage) -> usize {
        self.messages.push(message);
        self.messages.len() - 1
    }

    pub fn get(&self, index: usize) -> Result<&OutboundMessage> {
        self.messages.get(index).ok_or(Error::NoSuchMessage(index))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Send the message at `index`
    pub fn send<M>(&self, index: usize, service: &M, user_id: &str) -> Result<MessageRef>
    where
        M: MailService + ?Sized,
    {
        let message = self.get(index)?;
        let sent = service
            .send_message(user_id, message)
            .map_err(|source| FetchError::Send { source })
            .inspect_err(|e| warn!(index, error = %e, "Failed to send message"))?;
        info!(index, message_id = %sent.id, "Message sent");
        Ok(sent)
    }

    /// Create a draft from the message at `index`
    pub fn create_draft<M>(&self, index: usize, service: &M, user_id: &str) -> Result<MessageRef>
    where
        M: MailService + ?Sized,
    {
        let message = self.get(index)?;
        let draft = service
            .create_draft(user_id, message)
            .map_err(|source| FetchError::Draft { source })
            .inspect_err(|e| warn!(index, error = %e, "Failed to create draft"))?;
        info!(index, draft_id = %draft.id, "Draft created");
        Ok(draft)
    }
}
