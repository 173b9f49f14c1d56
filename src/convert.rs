//! Decomposition of raw MIME documents into the provider message structure
//!
//! This lets locally stored messages, including the builder's own output, go
//! through the same summary path as messages fetched from the provider.

use crate::encoding::encode_base64url;
use crate::error::{DecodeError, ServiceError};
use crate::service::AttachmentFetcher;
use crate::types::{AttachmentBody, Header, MimePartNode, Payload, RawMessage};
use mailparse::{MailHeaderMap, ParsedMail};
use std::collections::HashMap;
use tracing::debug;

/// Attachment blobs lifted out of a local MIME document, keyed by the IDs
/// assigned during conversion
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalAttachments {
    blobs: HashMap<String, Vec<u8>>,
}

impl LocalAttachments {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a blob and return its ID
    pub fn insert(&mut self, data: Vec<u8>) -> String {
        let id = format!("local-{}", self.blobs.len());
        self.blobs.insert(id.clone(), data);
        id
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&[u8]> {
        self.blobs.get(id).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl AttachmentFetcher for LocalAttachments {
    fn get_attachment(
        &self,
        _user_id: &str,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<AttachmentBody, ServiceError> {
        self.get(attachment_id)
            .map(|data| AttachmentBody {
                data: encode_base64url(data),
            })
            .ok_or_else(|| {
                format!("no attachment {attachment_id} in local message {message_id}").into()
            })
    }
}

impl RawMessage {
    /// Parse a raw RFC 5322 document into the provider structure.
    ///
    /// Multipart documents keep their part tree; a single-part document
    /// becomes a payload with that one part. Parts with a file name (from
    /// `Content-Disposition` or the `name` type parameter) become attachment
    /// references whose bytes are returned in [`LocalAttachments`].
    pub fn from_mime(raw: &[u8]) -> Result<(Self, LocalAttachments), DecodeError> {
        let parsed = mailparse::parse_mail(raw)?;
        let mut attachments = LocalAttachments::new();

        let headers = parsed
            .headers
            .iter()
            .map(|h| Header::new(h.get_key(), h.get_value()))
            .collect();

        let parts = if parsed.subparts.is_empty() {
            vec![convert_part(&parsed, &mut attachments)?]
        } else {
            parsed
                .subparts
                .iter()
                .map(|part| convert_part(part, &mut attachments))
                .collect::<Result<Vec<_>, _>>()?
        };

        debug!(
            parts = parts.len(),
            attachments = attachments.len(),
            "Converted MIME document"
        );

        let message = Self {
            payload: Payload { headers, parts },
            ..Self::default()
        };
        Ok((message, attachments))
    }
}

fn convert_part(
    part: &ParsedMail,
    attachments: &mut LocalAttachments,
) -> Result<MimePartNode, DecodeError> {
    let mime_type = part.ctype.mimetype.to_lowercase();

    if mime_type.starts_with("multipart/") {
        let children = part
            .subparts
            .iter()
            .map(|child| convert_part(child, attachments))
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(MimePartNode::container(mime_type, children));
    }

    let data = part.get_body_raw()?;
    if let Some(filename) = part_filename(part) {
        let attachment_id = attachments.insert(data);
        return Ok(MimePartNode::attachment(mime_type, filename, attachment_id));
    }

    let data = (!data.is_empty()).then(|| encode_base64url(&data));
    Ok(MimePartNode::text(mime_type, data))
}

fn part_filename(part: &ParsedMail) -> Option<String> {
    let disposition = part.get_content_disposition();
    let (name, header, param) = match disposition.params.get("filename") {
        Some(name) => (name, "Content-Disposition", "filename"),
        None => (part.ctype.params.get("name")?, "Content-Type", "name"),
    };
    if name.is_empty() {
        return None;
    }

    // mailparse strips the quotes of a quoted-string but keeps its escapes
    let quoted = part
        .headers
        .get_first_value(header)
        .is_some_and(|raw| raw.to_ascii_lowercase().contains(&format!("{param}=\"")));
    Some(if quoted {
        unescape_quoted(name)
    } else {
        name.clone()
    })
}

fn unescape_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.extend(chars.next()),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_part_document_becomes_one_part() {
        let raw = b"From: a@x.com\r\nSubject: Hi\r\n\r\nHello";
        let (message, attachments) = RawMessage::from_mime(raw).unwrap();

        assert_eq!(message.payload.parts.len(), 1);
        assert_eq!(message.payload.parts[0].mime_type(), "text/plain");
        assert!(attachments.is_empty());
    }

    #[test]
    fn local_attachment_lookup() {
        let mut attachments = LocalAttachments::new();
        let id = attachments.insert(b"abc".to_vec());

        let body = attachments.get_attachment("me", "m1", &id).unwrap();
        assert_eq!(body.data, encode_base64url(b"abc"));
        assert!(attachments.get_attachment("me", "m1", "missing").is_err());
    }

    #[test]
    fn quoted_filename_escapes_are_removed() {
        let raw = b"Content-Type: multipart/mixed; boundary=\"b\"\r\n\r\n\
            --b\r\nContent-Type: text/plain\r\n\r\nbody\r\n\
            --b\r\nContent-Type: application/pdf\r\n\
            Content-Disposition: attachment; filename=\"/tmp/a\\\\b\\\"c.pdf\"\r\n\
            Content-Transfer-Encoding: base64\r\n\r\nYWJj\r\n--b--\r\n";
        let (message, attachments) = RawMessage::from_mime(raw).unwrap();

        match &message.payload.parts[1] {
            MimePartNode::Attachment {
                filename,
                attachment_id,
                ..
            } => {
                assert_eq!(filename, r#"/tmp/a\b"c.pdf"#);
                assert_eq!(attachments.get(attachment_id), Some(&b"abc"[..]));
            }
            other => panic!("expected attachment, got {other:?}"),
        }
    }

    #[test]
    fn unquoted_filename_is_kept() {
        let raw = b"Content-Type: application/octet-stream; name=a\\b.bin\r\n\r\nxyz";
        let (message, _) = RawMessage::from_mime(raw).unwrap();
        assert!(matches!(
            &message.payload.parts[0],
            MimePartNode::Attachment { filename, .. } if filename == r"a\b.bin"
        ));
    }

    #[test]
    fn unescape_handles_trailing_backslash() {
        assert_eq!(unescape_quoted(r#"a\"b\\c\"#), r#"a"b\c"#);
    }
}
