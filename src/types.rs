//! Message types exchanged with the mail provider

use crate::encoding::decode_base64url;
use crate::error::DecodeError;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Encoded outbound message, ready for a send or draft-create call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Base64url encoding of the serialized MIME document
    pub raw: String,
}

impl OutboundMessage {
    /// Recover the MIME document bytes
    pub fn decode(&self) -> Result<Vec<u8>, DecodeError> {
        decode_base64url(&self.raw, "raw message")
    }

    /// Serialize as the provider's `{"raw": ...}` envelope
    pub fn to_json(&self) -> Result<String, DecodeError> {
        serde_json::to_string(self).map_err(Into::into)
    }
}

/// Message identifier as returned by list, send and draft calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRef {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thread_id: Option<String>,
}

impl MessageRef {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            thread_id: None,
        }
    }
}

/// A message as returned by the provider's "get message" call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMessage {
    #[serde(default)]
    pub id: String,

    #[serde(default)]
    pub label_ids: Vec<String>,

    #[serde(default)]
    pub payload: Payload,
}

impl RawMessage {
    /// Read a message from the provider's JSON representation
    pub fn from_json(json: &str) -> Result<Self, DecodeError> {
        serde_json::from_str(json).map_err(Into::into)
    }
}

/// Top-level payload: headers plus the part tree
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payload {
    #[serde(default)]
    pub headers: Vec<Header>,

    #[serde(default)]
    pub parts: Vec<MimePartNode>,
}

/// A single header entry; names may repeat
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Header {
    pub name: String,
    pub value: String,
}

impl Header {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Body of an attachment blob returned by "get attachment by ID"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentBody {
    /// Base64url encoded bytes
    pub data: String,
}

/// One node of an inbound message's part tree.
///
/// A node plays exactly one role. On the wire the provider sends a loose
/// record with optional `filename`, `body.data`, `body.attachmentId` and
/// `parts`; conversion rejects records that combine roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "WirePart", into = "WirePart")]
pub enum MimePartNode {
    /// Leaf with inline base64url data (possibly absent)
    Text {
        mime_type: String,
        data: Option<String>,
    },

    /// Leaf referring to a blob fetched separately
    Attachment {
        mime_type: String,
        filename: String,
        attachment_id: String,
    },

    /// Multipart container
    Container {
        mime_type: String,
        parts: Vec<MimePartNode>,
    },
}

impl MimePartNode {
    pub fn text(mime_type: impl Into<String>, data: Option<String>) -> Self {
        Self::Text {
            mime_type: mime_type.into(),
            data,
        }
    }

    pub fn attachment(
        mime_type: impl Into<String>,
        filename: impl Into<String>,
        attachment_id: impl Into<String>,
    ) -> Self {
        Self::Attachment {
            mime_type: mime_type.into(),
            filename: filename.into(),
            attachment_id: attachment_id.into(),
        }
    }

    pub fn container(mime_type: impl Into<String>, parts: Vec<Self>) -> Self {
        Self::Container {
            mime_type: mime_type.into(),
            parts,
        }
    }

    #[must_use]
    pub fn mime_type(&self) -> &str {
        match self {
            Self::Text { mime_type, .. }
            | Self::Attachment { mime_type, .. }
            | Self::Container { mime_type, .. } => mime_type,
        }
    }

    /// True for `text/plain` and `text/html` nodes
    #[must_use]
    pub fn is_body_text(&self) -> bool {
        let mime_type = self.mime_type();
        mime_type.eq_ignore_ascii_case("text/plain") || mime_type.eq_ignore_ascii_case("text/html")
    }
}

/// Loose provider representation of a message part
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    part_id: Option<String>,

    #[serde(default)]
    mime_type: String,

    #[serde(default)]
    filename: String,

    #[serde(default)]
    body: WireBody,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    parts: Vec<WirePart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    attachment_id: Option<String>,

    #[serde(default)]
    size: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    data: Option<String>,
}

impl TryFrom<WirePart> for MimePartNode {
    type Error = DecodeError;

    fn try_from(wire: WirePart) -> Result<Self, Self::Error> {
        let WirePart {
            part_id,
            mime_type,
            filename,
            body,
            parts,
        } = wire;
        let label = part_id.unwrap_or_else(|| mime_type.clone());
        let data = body.data.filter(|d| !d.is_empty());

        if !parts.is_empty() {
            if data.is_some() || body.attachment_id.is_some() {
                return Err(DecodeError::Part(format!(
                    "container {label} also carries a body"
                )));
            }
            let parts = parts
                .into_iter()
                .map(Self::try_from)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Self::Container { mime_type, parts });
        }

        match (body.attachment_id, data) {
            (Some(_), Some(_)) => Err(DecodeError::Part(format!(
                "part {label} has both inline data and an attachment reference"
            ))),
            (Some(attachment_id), None) => Ok(Self::Attachment {
                mime_type,
                filename,
                attachment_id,
            }),
            (None, _) if !filename.is_empty() => Err(DecodeError::Part(format!(
                "attachment {filename} in part {label} has no attachmentId"
            ))),
            (None, data) => Ok(Self::Text { mime_type, data }),
        }
    }
}

impl From<MimePartNode> for WirePart {
    fn from(node: MimePartNode) -> Self {
        match node {
            MimePartNode::Text { mime_type, data } => Self {
                mime_type,
                body: WireBody {
                    size: data.as_ref().map_or(0, |d| d.len() as u64),
                    data,
                    ..WireBody::default()
                },
                ..Self::default()
            },
            MimePartNode::Attachment {
                mime_type,
                filename,
                attachment_id,
            } => Self {
                mime_type,
                filename,
                body: WireBody {
                    attachment_id: Some(attachment_id),
                    ..WireBody::default()
                },
                ..Self::default()
            },
            MimePartNode::Container { mime_type, parts } => Self {
                mime_type,
                parts: parts.into_iter().map(Self::from).collect(),
                ..Self::default()
            },
        }
    }
}

/// Normalized view of an inbound message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedSummary {
    /// First `From` header, empty if absent
    pub from: String,

    /// First `Date` header, empty if absent
    pub date: String,

    /// First `Subject` header, empty if absent
    pub subject: String,

    /// Visible text of all plain and HTML parts in traversal order
    pub body_text: String,

    /// File name of the saved attachment, if any
    pub attachment_ref: Option<String>,
}

impl ParsedSummary {
    /// The `Date` header parsed as RFC 2822
    #[must_use]
    pub fn parsed_date(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc2822(self.date.trim()).ok()
    }
}

/// Console report layout: `From`, `Date`, `Subject`, `Message Body`,
/// `Attachment`, followed by a blank line
impl fmt::Display for ParsedSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "From: {}", self.from)?;
        writeln!(f, "Date: {}", self.date)?;
        writeln!(f, "Subject: {}", self.subject)?;
        writeln!(f, "Message Body: \n{}", self.body_text)?;
        writeln!(
            f,
            "Attachment: {}\n",
            self.attachment_ref.as_deref().unwrap_or("None")
        )
    }
}
