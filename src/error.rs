//! Error types for message building and parsing

use std::path::PathBuf;
use thiserror::Error;

/// Error raised by a mail provider collaborator
pub type ServiceError = Box<dyn std::error::Error + Send + Sync>;

/// Errors that can occur while building an outbound message
#[derive(Error, Debug)]
pub enum BuildError {
    /// The attachment file could not be opened or read
    #[error("Failed to read attachment {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A text attachment did not contain valid UTF-8
    #[error("Attachment {} is not valid UTF-8 text", path.display())]
    Utf8 { path: PathBuf },

    /// The MIME document could not be serialized
    #[error("Failed to serialize message: {0}")]
    Serialize(String),
}

/// Errors reported by the provider while listing, fetching or modifying messages
#[derive(Error, Debug)]
pub enum FetchError {
    /// Listing messages failed
    #[error("Failed to list messages: {source}")]
    List {
        #[source]
        source: ServiceError,
    },

    /// Fetching a single message failed
    #[error("Failed to get message {id}: {source}")]
    Message {
        id: String,
        #[source]
        source: ServiceError,
    },

    /// Fetching an attachment blob failed
    #[error("Failed to get attachment {attachment_id} of message {message_id}: {source}")]
    Attachment {
        message_id: String,
        attachment_id: String,
        #[source]
        source: ServiceError,
    },

    /// Changing the labels of a message failed
    #[error("Failed to modify labels of message {id}: {source}")]
    Modify {
        id: String,
        #[source]
        source: ServiceError,
    },

    /// Sending a message failed
    #[error("Failed to send message: {source}")]
    Send {
        #[source]
        source: ServiceError,
    },

    /// Creating a draft failed
    #[error("Failed to create draft: {source}")]
    Draft {
        #[source]
        source: ServiceError,
    },
}

/// Errors raised while decoding message content
#[derive(Error, Debug)]
pub enum DecodeError {
    /// Malformed base64url payload
    #[error("Invalid base64url data in {context}: {source}")]
    Base64 {
        context: String,
        #[source]
        source: base64::DecodeError,
    },

    /// Decoded bytes were expected to be UTF-8 text
    #[error("Invalid UTF-8 text in {context}")]
    Utf8 { context: String },

    /// A wire part broke the single-role rule
    #[error("Invalid message part: {0}")]
    Part(String),

    /// Provider JSON could not be read
    #[error("Invalid message JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A raw MIME document could not be parsed
    #[error("Invalid MIME document: {0}")]
    Mime(#[from] mailparse::MailParseError),
}

/// Attachment persistence failed
#[derive(Error, Debug)]
#[error("Failed to write attachment {}: {source}", path.display())]
pub struct StoreError {
    pub path: PathBuf,
    #[source]
    pub source: std::io::Error,
}

/// Any error produced by this crate
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Store(#[from] StoreError),

    /// A session index that was never handed out
    #[error("Message {0} does not exist")]
    NoSuchMessage(usize),
}

/// Result type for message operations
pub type Result<T> = std::result::Result<T, Error>;
