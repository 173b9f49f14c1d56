//! Reduction of provider message structures to flat summaries

use crate::config::{BatchPolicy, ExtractOptions};
use crate::encoding::{decode_base64url, decode_base64url_text};
use crate::error::{Error, FetchError, Result};
use crate::html::visible_text;
use crate::service::{AttachmentFetcher, AttachmentStore, MailService};
use crate::types::{Header, MimePartNode, ParsedSummary, RawMessage};
use tracing::{debug, info, warn};

/// Summarize a message: first `From`, `Date` and `Subject` headers, the
/// visible text of its body parts, and the saved attachment if any.
///
/// Top-level parts are walked in order with [`PartWalker`]. The body text is
/// the concatenation of every plain and HTML part, with markup stripped once
/// over the whole. When several attachments are present the last one is
/// reported.
pub fn extract_summary<F, S>(
    message: &RawMessage,
    fetcher: &F,
    store: &S,
    options: &ExtractOptions,
) -> Result<ParsedSummary>
where
    F: AttachmentFetcher + ?Sized,
    S: AttachmentStore + ?Sized,
{
    let headers = &message.payload.headers;
    let mut walker = PartWalker::new(&message.id, fetcher, store, options);
    for part in &message.payload.parts {
        walker.walk_part(part)?;
    }
    let (body, attachment_ref) = walker.into_parts();

    let summary = ParsedSummary {
        from: first_header(headers, "From"),
        date: first_header(headers, "Date"),
        subject: first_header(headers, "Subject"),
        body_text: visible_text(&body),
        attachment_ref,
    };

    debug!(
        message_id = %message.id,
        parts = message.payload.parts.len(),
        body_chars = summary.body_text.len(),
        "Extracted summary: {} from {}",
        summary.subject,
        summary.from
    );

    Ok(summary)
}

/// First value of a header, matched case-insensitively; empty when absent
fn first_header(headers: &[Header], name: &str) -> String {
    headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case(name))
        .map(|h| h.value.clone())
        .unwrap_or_default()
}

/// Accumulates body text and the attachment reference while visiting parts
pub struct PartWalker<'a, F: ?Sized, S: ?Sized> {
    message_id: &'a str,
    fetcher: &'a F,
    store: &'a S,
    options: &'a ExtractOptions,
    body: String,
    attachment_ref: Option<String>,
}

impl<'a, F, S> PartWalker<'a, F, S>
where
    F: AttachmentFetcher + ?Sized,
    S: AttachmentStore + ?Sized,
{
    pub fn new(
        message_id: &'a str,
        fetcher: &'a F,
        store: &'a S,
        options: &'a ExtractOptions,
    ) -> Self {
        Self {
            message_id,
            fetcher,
            store,
            options,
            body: String::new(),
            attachment_ref: None,
        }
    }

    /// Visit one top-level part.
    ///
    /// - A named attachment is fetched, saved under its file name and recorded.
    /// - A `text/plain` or `text/html` leaf has its data appended to the body.
    /// - A `multipart/alternative` container contributes its direct text
    ///   children; deeper nesting is not followed.
    /// - Anything else is ignored.
    pub fn walk_part(&mut self, part: &MimePartNode) -> Result<()> {
        match part {
            MimePartNode::Attachment {
                filename,
                attachment_id,
                ..
            } if !filename.is_empty() => {
                self.save_attachment(filename, attachment_id)?;
                self.attachment_ref = Some(filename.clone());
            }
            MimePartNode::Text { data, mime_type } if part.is_body_text() => {
                self.append_text(data.as_deref(), mime_type)?;
            }
            MimePartNode::Container { mime_type, parts }
                if mime_type.eq_ignore_ascii_case("multipart/alternative") =>
            {
                for child in parts {
                    if let MimePartNode::Text { data, mime_type } = child
                        && child.is_body_text()
                    {
                        self.append_text(data.as_deref(), mime_type)?;
                    }
                }
            }
            other => {
                debug!(message_id = %self.message_id, mime_type = other.mime_type(), "Skipping part");
            }
        }
        Ok(())
    }

    /// Raw (unstripped) body text gathered so far
    #[must_use]
    pub fn body(&self) -> &str {
        &self.body
    }

    #[must_use]
    pub fn attachment_ref(&self) -> Option<&str> {
        self.attachment_ref.as_deref()
    }

    #[must_use]
    pub fn into_parts(self) -> (String, Option<String>) {
        (self.body, self.attachment_ref)
    }

    fn append_text(&mut self, data: Option<&str>, mime_type: &str) -> Result<()> {
        let Some(data) = data.filter(|d| !d.is_empty()) else {
            return Ok(());
        };
        let context = format!("{mime_type} part of message {}", self.message_id);
        let text = decode_base64url_text(data, &context)?;
        self.body.push_str(&text);
        Ok(())
    }

    fn save_attachment(&self, filename: &str, attachment_id: &str) -> Result<()> {
        if !self.options.save_attachments {
            debug!(message_id = %self.message_id, filename, "Attachment download disabled");
            return Ok(());
        }

        let blob = self
            .fetcher
            .get_attachment(&self.options.user_id, self.message_id, attachment_id)
            .map_err(|source| FetchError::Attachment {
                message_id: self.message_id.to_string(),
                attachment_id: attachment_id.to_string(),
                source,
            })?;
        let context = format!("attachment {filename} of message {}", self.message_id);
        let bytes = decode_base64url(&blob.data, &context)?;
        self.store.save(filename, &bytes)?;

        debug!(message_id = %self.message_id, filename, bytes = bytes.len(), "Downloaded attachment");
        Ok(())
    }
}

/// Fetch one message by ID and summarize it
pub fn get_summary<M, S>(
    service: &M,
    store: &S,
    options: &ExtractOptions,
    id: &str,
) -> Result<ParsedSummary>
where
    M: MailService + ?Sized,
    S: AttachmentStore + ?Sized,
{
    let message = service
        .get_message(&options.user_id, id)
        .map_err(|source| FetchError::Message {
            id: id.to_string(),
            source,
        })
        .inspect_err(|e| warn!(message_id = id, error = %e, "Failed to get message"))?;

    extract_summary(&message, service, store, options)
        .inspect_err(|e| warn!(message_id = id, error = %e, "Failed to summarize message"))
}

/// Outcome of one message in a bulk read
#[derive(Debug)]
pub struct BatchEntry {
    pub id: String,
    pub outcome: Result<ParsedSummary>,
}

/// Summarize every unread inbox message and mark each one read.
///
/// Messages are processed in the order the provider lists them. A message is
/// marked read only after it was summarized. A failing message gets an entry
/// carrying its error. With [`BatchPolicy::AbortOnError`] that entry is the
/// last one and the remaining messages are left untouched; with
/// [`BatchPolicy::Isolate`] the loop continues. Only a failure to list the
/// inbox is returned as `Err`.
pub fn list_and_mark_read<M, S>(
    service: &M,
    store: &S,
    options: &ExtractOptions,
) -> Result<Vec<BatchEntry>>
where
    M: MailService + ?Sized,
    S: AttachmentStore + ?Sized,
{
    let refs = service
        .list_messages(&options.user_id, &options.unread_labels)
        .map_err(|source| FetchError::List { source })
        .inspect_err(|e| warn!(error = %e, "Failed to list unread messages"))?;

    info!(count = refs.len(), "Total unread messages in inbox");

    let mut entries = Vec::with_capacity(refs.len());
    for message_ref in refs {
        let id = message_ref.id;
        let outcome = read_and_mark(service, store, options, &id);
        let abort = outcome.is_err() && options.batch_policy == BatchPolicy::AbortOnError;
        if let Err(e) = &outcome {
            if abort {
                warn!(message_id = %id, error = %e, "Stopping bulk read");
            } else {
                warn!(message_id = %id, error = %e, "Skipping message");
            }
        }
        entries.push(BatchEntry { id, outcome });
        if abort {
            break;
        }
    }

    Ok(entries)
}

fn read_and_mark<M, S>(
    service: &M,
    store: &S,
    options: &ExtractOptions,
    id: &str,
) -> Result<ParsedSummary>
where
    M: MailService + ?Sized,
    S: AttachmentStore + ?Sized,
{
    let summary = get_summary(service, store, options, id)?;

    service
        .remove_labels(
            &options.user_id,
            id,
            std::slice::from_ref(&options.mark_read_label),
        )
        .map_err(|source| {
            Error::from(FetchError::Modify {
                id: id.to_string(),
                source,
            })
        })
        .inspect_err(|e| warn!(message_id = id, error = %e, "Failed to mark message read"))?;

    Ok(summary)
}
