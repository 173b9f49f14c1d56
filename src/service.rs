//! Collaborators supplied by the caller: the mail provider and attachment storage

use crate::error::{ServiceError, StoreError};
use crate::types::{AttachmentBody, MessageRef, OutboundMessage, RawMessage};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Resolves attachment blobs by ID
pub trait AttachmentFetcher {
    fn get_attachment(
        &self,
        user_id: &str,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<AttachmentBody, ServiceError>;
}

/// Blocking interface to a mail provider.
///
/// Calls have no timeout on this side; cancellation policy belongs to the
/// implementation.
pub trait MailService: AttachmentFetcher {
    /// List message IDs carrying all of the given labels
    fn list_messages(
        &self,
        user_id: &str,
        label_ids: &[String],
    ) -> Result<Vec<MessageRef>, ServiceError>;

    /// Fetch a full message
    fn get_message(&self, user_id: &str, id: &str) -> Result<RawMessage, ServiceError>;

    /// Remove labels from a message
    fn remove_labels(
        &self,
        user_id: &str,
        id: &str,
        label_ids: &[String],
    ) -> Result<(), ServiceError>;

    fn send_message(
        &self,
        user_id: &str,
        message: &OutboundMessage,
    ) -> Result<MessageRef, ServiceError>;

    fn create_draft(
        &self,
        user_id: &str,
        message: &OutboundMessage,
    ) -> Result<MessageRef, ServiceError>;
}

/// Destination for downloaded attachments
pub trait AttachmentStore {
    /// Persist `data` under `filename`, replacing any previous content
    fn save(&self, filename: &str, data: &[u8]) -> Result<(), StoreError>;
}

/// Writes attachments into a directory.
///
/// The file name is joined to the directory as given. Names containing
/// separators or `..` are not rejected, so callers handling untrusted
/// messages should point this at a scratch directory.
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Store into the process's working directory
    #[must_use]
    pub fn current_dir() -> Self {
        Self::new(".")
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl Default for DirectoryStore {
    fn default() -> Self {
        Self::current_dir()
    }
}

impl AttachmentStore for DirectoryStore {
    fn save(&self, filename: &str, data: &[u8]) -> Result<(), StoreError> {
        let path = self.root.join(filename);
        std::fs::write(&path, data).map_err(|source| StoreError {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = data.len(), "Saved attachment");
        Ok(())
    }
}
