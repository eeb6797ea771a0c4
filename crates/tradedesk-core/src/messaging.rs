//! Conversations and messages
//!
//! A conversation embeds its messages. The unread count is always derived
//! from the per-message read flags, never stored alongside them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::filter::matches_search;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: String,
    pub subject: String,
    pub participants: Vec<String>,
    /// Sourcing request this thread is about, if any
    pub related_request: Option<String>,
    #[serde(default)]
    pub messages: Vec<Message>,
    #[serde(default)]
    pub archived: bool,
    #[serde(default)]
    pub starred: bool,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    pub fn unread_count(&self) -> usize {
        self.messages.iter().filter(|m| !m.read).count()
    }

    pub fn last_message(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Append a message. The sender has obviously read their own message.
    pub fn push_message(&mut self, sender: impl Into<String>, body: impl Into<String>) -> &Message {
        let now = Utc::now();
        self.messages.push(Message {
            id: crate::new_id("msg"),
            sender: sender.into(),
            body: body.into(),
            sent_at: now,
            read: true,
        });
        self.updated_at = now;
        let idx = self.messages.len() - 1;
        &self.messages[idx]
    }

    /// Mark every message read; returns how many changed.
    pub fn mark_all_read(&mut self) -> usize {
        let mut changed = 0;
        for message in self.messages.iter_mut().filter(|m| !m.read) {
            message.read = true;
            changed += 1;
        }
        changed
    }

    pub fn apply(&mut self, patch: ConversationPatch) {
        if let Some(v) = patch.subject {
            self.subject = v;
        }
        if let Some(v) = patch.archived {
            self.archived = v;
        }
        if let Some(v) = patch.starred {
            self.starred = v;
        }
        if patch.read == Some(true) {
            self.mark_all_read();
        }
    }

    pub fn summary(&self) -> ConversationSummary {
        let last = self.last_message();
        ConversationSummary {
            id: self.id.clone(),
            subject: self.subject.clone(),
            participants: self.participants.clone(),
            related_request: self.related_request.clone(),
            preview: last.map(|m| preview(&m.body)).unwrap_or_default(),
            last_sender: last.map(|m| m.sender.clone()),
            unread_count: self.unread_count(),
            message_count: self.messages.len(),
            archived: self.archived,
            starred: self.starred,
            updated_at: self.updated_at,
        }
    }
}

const PREVIEW_CHARS: usize = 120;

fn preview(body: &str) -> String {
    let mut chars = body.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}

/// List row for the inbox.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub id: String,
    pub subject: String,
    pub participants: Vec<String>,
    pub related_request: Option<String>,
    pub preview: String,
    pub last_sender: Option<String>,
    pub unread_count: usize,
    pub message_count: usize,
    pub archived: bool,
    pub starred: bool,
    pub updated_at: DateTime<Utc>,
}

/// Conversation detail as returned by the API, with the derived count inline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationView {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub unread_count: usize,
}

impl From<Conversation> for ConversationView {
    fn from(conversation: Conversation) -> Self {
        let unread_count = conversation.unread_count();
        Self {
            conversation,
            unread_count,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewConversation {
    pub subject: String,
    pub participants: Vec<String>,
    pub related_request: Option<String>,
    /// Opening message
    pub body: String,
}

impl NewConversation {
    pub fn validate(&self) -> crate::Result<()> {
        if self.subject.trim().is_empty() {
            return Err(crate::Error::InvalidRequest("subject is required".to_string()));
        }
        if self.participants.is_empty() {
            return Err(crate::Error::InvalidRequest(
                "at least one participant is required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn into_conversation(self, sender: &str) -> Conversation {
        let mut conversation = Conversation {
            id: crate::new_id("conv"),
            subject: self.subject,
            participants: self.participants,
            related_request: self.related_request,
            messages: Vec::new(),
            archived: false,
            starred: false,
            updated_at: Utc::now(),
        };
        if !self.body.trim().is_empty() {
            conversation.push_message(sender, self.body);
        }
        conversation
    }
}

/// Partial update accepted by `PATCH /api/messages/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationPatch {
    pub subject: Option<String>,
    pub archived: Option<bool>,
    pub starred: Option<bool>,
    /// `true` marks every message read; `false` is ignored
    pub read: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationFilter {
    pub search: Option<String>,
    #[serde(default)]
    pub unread_only: bool,
    /// `None` shows only active threads; `Some(true)` only archived ones
    pub archived: Option<bool>,
}

impl ConversationFilter {
    pub fn matches(&self, conversation: &Conversation) -> bool {
        if self.unread_only && conversation.unread_count() == 0 {
            return false;
        }
        if conversation.archived != self.archived.unwrap_or(false) {
            return false;
        }
        matches_search(
            self.search.as_deref(),
            std::iter::once(conversation.subject.as_str())
                .chain(conversation.participants.iter().map(String::as_str))
                .chain(conversation.messages.iter().map(|m| m.body.as_str())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conversation() -> Conversation {
        let mut conv = NewConversation {
            subject: "Quote for HDPE granules".to_string(),
            participants: vec!["buyer@acme.test".to_string(), "agent@broker.test".to_string()],
            related_request: Some("src_1".to_string()),
            body: "Can you confirm MOQ?".to_string(),
        }
        .into_conversation("buyer@acme.test");
        conv.messages.push(Message {
            id: "msg_in".to_string(),
            sender: "agent@broker.test".to_string(),
            body: "MOQ is one container".to_string(),
            sent_at: Utc::now(),
            read: false,
        });
        conv
    }

    #[test]
    fn test_unread_count_is_derived() {
        let mut conv = conversation();
        assert_eq!(conv.unread_count(), 1);
        assert_eq!(conv.mark_all_read(), 1);
        assert_eq!(conv.unread_count(), 0);
        assert_eq!(conv.mark_all_read(), 0);
    }

    #[test]
    fn test_own_message_does_not_count_as_unread() {
        let mut conv = conversation();
        conv.mark_all_read();
        conv.push_message("buyer@acme.test", "Thanks");
        assert_eq!(conv.unread_count(), 0);
        assert_eq!(conv.summary().message_count, 3);
    }

    #[test]
    fn test_filter_excludes_archived_by_default() {
        let mut conv = conversation();
        assert!(ConversationFilter::default().matches(&conv));
        conv.archived = true;
        assert!(!ConversationFilter::default().matches(&conv));
        let archived = ConversationFilter {
            archived: Some(true),
            ..Default::default()
        };
        assert!(archived.matches(&conv));
    }

    #[test]
    fn test_filter_searches_message_bodies() {
        let conv = conversation();
        let filter = ConversationFilter {
            search: Some("container".to_string()),
            ..Default::default()
        };
        assert!(filter.matches(&conv));
    }

    #[test]
    fn test_unread_only_filter() {
        let mut conv = conversation();
        let filter = ConversationFilter {
            unread_only: true,
            ..Default::default()
        };
        assert!(filter.matches(&conv));
        conv.mark_all_read();
        assert!(!filter.matches(&conv));
    }

    #[test]
    fn test_preview_truncates_long_bodies() {
        let long = "x".repeat(200);
        let p = preview(&long);
        assert_eq!(p.chars().count(), PREVIEW_CHARS + 1);
        assert!(p.ends_with('…'));
        assert_eq!(preview("short"), "short");
    }

    #[test]
    fn test_patch_read_marks_all() {
        let mut conv = conversation();
        conv.apply(ConversationPatch {
            starred: Some(true),
            read: Some(true),
            ..Default::default()
        });
        assert!(conv.starred);
        assert_eq!(conv.unread_count(), 0);
    }
}
