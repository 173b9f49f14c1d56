//! Outbound message construction
//!
//! Messages are serialized with `mail_builder`, then wrapped as base64url in
//! the provider's `raw` envelope. Header values are written as given: ASCII
//! values verbatim, anything else as an RFC 2047 encoded word. Line breaks
//! inside a header value are rejected since they would split the header block.

use crate::encoding::encode_base64url;
use crate::error::BuildError;
use crate::mime_type;
use crate::types::OutboundMessage;
use mail_builder::MessageBuilder;
use mail_builder::headers::HeaderType;
use mail_builder::headers::raw::Raw;
use mail_builder::headers::text::Text;
use mail_builder::mime::BodyPart;
use std::path::Path;
use tracing::{debug, warn};

/// Build a single-part `text/plain` message.
pub fn build_plain_message(
    sender: &str,
    to: &str,
    subject: &str,
    body_text: &str,
) -> Result<OutboundMessage, BuildError> {
    envelope(sender, to, subject)
        .map(|builder| builder.text_body(body_text))
        .and_then(|builder| wrap(builder, "plain"))
        .inspect_err(|e| warn!(to, error = %e, "Failed to build message"))
}

/// Build a `multipart/mixed` message with a text body and one attached file.
///
/// The attachment's type is guessed from the file extension, falling back to
/// `application/octet-stream` for unknown or compressed files. The
/// attachment filename is `file_path` exactly as given, directory components
/// included.
pub fn build_attachment_message(
    sender: &str,
    to: &str,
    subject: &str,
    body_text: &str,
    file_path: impl AsRef<Path>,
) -> Result<OutboundMessage, BuildError> {
    let path = file_path.as_ref();
    with_attachment(sender, to, subject, body_text, path)
        .and_then(|builder| wrap(builder, "attachment"))
        .inspect_err(|e| {
            warn!(to, path = %path.display(), error = %e, "Failed to build message with attachment");
        })
}

fn with_attachment<'x>(
    sender: &'x str,
    to: &'x str,
    subject: &'x str,
    body_text: &'x str,
    path: &Path,
) -> Result<MessageBuilder<'x>, BuildError> {
    let builder = envelope(sender, to, subject)?.text_body(body_text);
    let (content_type, contents) = attachment_body(path)?;
    let filename = path.to_string_lossy().into_owned();
    Ok(builder.attachment(content_type, filename, contents))
}

fn wrap(builder: MessageBuilder<'_>, kind: &'static str) -> Result<OutboundMessage, BuildError> {
    let document = builder
        .write_to_vec()
        .map_err(|e| BuildError::Serialize(e.to_string()))?;
    let raw = encode_base64url(&document);
    debug!(kind, mime_bytes = document.len(), raw_bytes = raw.len(), "Built message");
    Ok(OutboundMessage { raw })
}

/// `to`, `from`, `subject` in the order they are set on the message
fn envelope<'x>(
    sender: &'x str,
    to: &'x str,
    subject: &'x str,
) -> Result<MessageBuilder<'x>, BuildError> {
    [("to", to), ("from", sender), ("subject", subject)]
        .into_iter()
        .try_fold(MessageBuilder::new(), |builder, (name, value)| {
            Ok(builder.header(name, header_value(name, value)?))
        })
}

/// Addresses and subject are not validated, only kept on one line
fn header_value<'x>(name: &str, value: &'x str) -> Result<HeaderType<'x>, BuildError> {
    if value.contains(['\r', '\n']) {
        return Err(BuildError::Serialize(format!(
            "header {name} contains a line break"
        )));
    }
    Ok(if value.is_ascii() {
        HeaderType::Raw(Raw::new(value))
    } else {
        HeaderType::Text(Text::new(value))
    })
}

/// Read the attachment and pick its content type and body representation
fn attachment_body(path: &Path) -> Result<(&'static str, BodyPart<'static>), BuildError> {
    let content_type = mime_type::guess(path).attachment_type();
    let main_type = content_type.split_once('/').map_or("application", |(m, _)| m);

    let data = std::fs::read(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), content_type, bytes = data.len(), "Read attachment");

    let contents = if main_type == "text" {
        let text = String::from_utf8(data).map_err(|_| BuildError::Utf8 {
            path: path.to_path_buf(),
        })?;
        BodyPart::Text(text.into())
    } else {
        BodyPart::Binary(data.into())
    };
    Ok((content_type, contents))
}
