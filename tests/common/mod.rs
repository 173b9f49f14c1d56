#![allow(dead_code)]

use gmail_mime::{
    AttachmentBody, AttachmentFetcher, AttachmentStore, Header, MailService, MessageRef,
    MimePartNode, OutboundMessage, Payload, RawMessage, ServiceError, StoreError, encoding,
};
use std::cell::RefCell;
use std::collections::HashMap;

/// Encode text the way the provider encodes inline part data
pub fn b64(text: &str) -> String {
    encoding::encode_base64url(text.as_bytes())
}

pub fn text_part(mime_type: &str, text: &str) -> MimePartNode {
    MimePartNode::text(mime_type, Some(b64(text)))
}

pub fn message(id: &str, headers: &[(&str, &str)], parts: Vec<MimePartNode>) -> RawMessage {
    RawMessage {
        id: id.to_string(),
        label_ids: vec!["INBOX".to_string(), "UNREAD".to_string()],
        payload: Payload {
            headers: headers.iter().map(|(n, v)| Header::new(*n, *v)).collect(),
            parts,
        },
    }
}

/// In-memory provider recording every call
#[derive(Default)]
pub struct FakeMailbox {
    pub messages: Vec<RawMessage>,
    pub attachments: HashMap<String, Vec<u8>>,
    pub failing: Vec<String>,
    pub failing_modify: Vec<String>,
    pub failing_list: bool,
    pub marked_read: RefCell<Vec<String>>,
    pub attachment_calls: RefCell<Vec<(String, String)>>,
    pub sent: RefCell<Vec<OutboundMessage>>,
    pub drafts: RefCell<Vec<OutboundMessage>>,
}

impl FakeMailbox {
    pub fn with_messages(messages: Vec<RawMessage>) -> Self {
        Self {
            messages,
            ..Self::default()
        }
    }
}

impl AttachmentFetcher for FakeMailbox {
    fn get_attachment(
        &self,
        _user_id: &str,
        message_id: &str,
        attachment_id: &str,
    ) -> Result<AttachmentBody, ServiceError> {
        self.attachment_calls
            .borrow_mut()
            .push((message_id.to_string(), attachment_id.to_string()));
        self.attachments
            .get(attachment_id)
            .map(|data| AttachmentBody {
                data: encoding::encode_base64url(data),
            })
            .ok_or_else(|| "attachment not found".into())
    }
}

impl MailService for FakeMailbox {
    fn list_messages(
        &self,
        _user_id: &str,
        label_ids: &[String],
    ) -> Result<Vec<MessageRef>, ServiceError> {
        if self.failing_list {
            return Err("list unavailable".into());
        }
        Ok(self
            .messages
            .iter()
            .filter(|m| label_ids.iter().all(|l| m.label_ids.contains(l)))
            .map(|m| MessageRef::new(m.id.clone()))
            .collect())
    }

    fn get_message(&self, _user_id: &str, id: &str) -> Result<RawMessage, ServiceError> {
        if self.failing.iter().any(|f| f == id) {
            return Err(format!("backend error for {id}").into());
        }
        self.messages
            .iter()
            .find(|m| m.id == id)
            .cloned()
            .ok_or_else(|| "not found".into())
    }

    fn remove_labels(
        &self,
        _user_id: &str,
        id: &str,
        _label_ids: &[String],
    ) -> Result<(), ServiceError> {
        if self.failing_modify.iter().any(|f| f == id) {
            return Err(format!("cannot modify {id}").into());
        }
        self.marked_read.borrow_mut().push(id.to_string());
        Ok(())
    }

    fn send_message(
        &self,
        _user_id: &str,
        message: &OutboundMessage,
    ) -> Result<MessageRef, ServiceError> {
        self.sent.borrow_mut().push(message.clone());
        Ok(MessageRef::new(format!("sent-{}", self.sent.borrow().len())))
    }

    fn create_draft(
        &self,
        _user_id: &str,
        message: &OutboundMessage,
    ) -> Result<MessageRef, ServiceError> {
        self.drafts.borrow_mut().push(message.clone());
        Ok(MessageRef::new("draft-1"))
    }
}

/// Store keeping writes in memory
#[derive(Default)]
pub struct MemoryStore {
    pub files: RefCell<Vec<(String, Vec<u8>)>>,
}

impl AttachmentStore for MemoryStore {
    fn save(&self, filename: &str, data: &[u8]) -> Result<(), StoreError> {
        self.files
            .borrow_mut()
            .push((filename.to_string(), data.to_vec()));
        Ok(())
    }
}
