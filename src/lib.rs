// Enforce at crate level
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

//! Gmail MIME toolkit
//!
//! Builds outbound MIME messages wrapped in the provider's base64url `raw`
//! envelope, and reduces provider message structures (headers plus a nested
//! part tree) to a flat, printable summary.
//!
//! # Features
//!
//! - Plain text messages and messages with one attached file
//! - Attachment type guessing by file extension
//! - Strongly typed part tree: text leaf, attachment reference or container
//! - Body text extraction from plain and HTML parts
//! - Attachment download through caller-supplied collaborators
//! - Bulk read of unread messages with a configurable failure policy
//!
//! # Example
//!
//! ```rust
//! use gmail_mime::{
//!     build_plain_message, extract_summary, DirectoryStore, ExtractOptions, RawMessage,
//! };
//!
//! let outbound = build_plain_message("a@x.com", "b@x.com", "Hi", "Hello").unwrap();
//!
//! let mime = outbound.decode().unwrap();
//! let (message, attachments) = RawMessage::from_mime(&mime).unwrap();
//! let summary = extract_summary(
//!     &message,
//!     &attachments,
//!     &DirectoryStore::current_dir(),
//!     &ExtractOptions::default(),
//! )
//! .unwrap();
//!
//! assert_eq!(summary.subject, "Hi");
//! assert_eq!(summary.body_text.trim_end(), "Hello");
//! print!("{summary}");
//! ```

mod builder;
mod config;
mod convert;
mod error;
mod html;
mod parser;
mod service;
mod session;
mod types;

pub mod encoding;
pub mod mime_type;

pub use builder::{build_attachment_message, build_plain_message};
pub use config::{BatchPolicy, ExtractOptions};
pub use convert::LocalAttachments;
pub use error::{BuildError, DecodeError, Error, FetchError, Result, ServiceError, StoreError};
pub use html::{decode_entities, visible_text};
pub use parser::{BatchEntry, PartWalker, extract_summary, get_summary, list_and_mark_read};
pub use service::{AttachmentFetcher, AttachmentStore, DirectoryStore, MailService};
pub use session::Session;
pub use types::*;
