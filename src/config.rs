//! Options controlling message extraction

use serde::{Deserialize, Serialize};

/// What a bulk read does when one message fails
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchPolicy {
    /// Stop at the first failing message and return its error
    #[default]
    AbortOnError,

    /// Record the failure for that message and continue with the rest
    Isolate,
}

/// Options for [`extract_summary`](crate::extract_summary) and the bulk reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractOptions {
    /// Provider user the calls are made for
    pub user_id: String,

    /// Download attachments into the store; when false the attachment name is
    /// still reported but nothing is fetched
    pub save_attachments: bool,

    /// Failure handling for bulk reads
    pub batch_policy: BatchPolicy,

    /// Labels selecting the messages of a bulk read
    pub unread_labels: Vec<String>,

    /// Label removed from each message once it has been read
    pub mark_read_label: String,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            user_id: "me".to_string(),
            save_attachments: true,
            batch_policy: BatchPolicy::default(),
            unread_labels: vec!["INBOX".to_string(), "UNREAD".to_string()],
            mark_read_label: "UNREAD".to_string(),
        }
    }
}

impl ExtractOptions {
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    #[must_use]
    pub fn with_batch_policy(mut self, policy: BatchPolicy) -> Self {
        self.batch_policy = policy;
        self
    }

    #[must_use]
    pub fn with_save_attachments(mut self, save: bool) -> Self {
        self.save_attachments = save;
        self
    }
}
